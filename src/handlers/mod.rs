// handlers/mod.rs - Two security tiers plus the health probe
//
// Public (no auth) → Protected (JWT auth via jwt_auth_middleware)
pub mod health;
pub mod protected;
pub mod public;
