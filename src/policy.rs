//! Authorization rules for mutating resources.

use crate::database::models::Review;
use crate::middleware::AuthUser;

/// Only the author of a review may change or remove it.
pub fn can_modify_review(actor: &AuthUser, review: &Review) -> bool {
    actor.user_id == review.user_id
}
