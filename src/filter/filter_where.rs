use super::error::FilterError;
use super::filter::validate_identifier;
use super::types::{FilterOp, FilterValue, FilterWhereInfo};

/// Renders AND-ed conditions into a WHERE body with positional parameters.
pub struct FilterWhere {
    param_values: Vec<FilterValue>,
}

impl FilterWhere {
    pub fn generate(
        conditions: &[FilterWhereInfo],
    ) -> Result<(String, Vec<FilterValue>), FilterError> {
        let mut filter_where = Self { param_values: vec![] };
        let mut sql_conditions = Vec::with_capacity(conditions.len());
        for condition in conditions {
            sql_conditions.push(filter_where.build_sql_condition(condition)?);
        }
        Ok((sql_conditions.join(" AND "), filter_where.param_values))
    }

    fn build_sql_condition(&mut self, condition: &FilterWhereInfo) -> Result<String, FilterError> {
        validate_identifier(&condition.column).map_err(FilterError::InvalidColumn)?;
        let quoted_column = format!("\"{}\"", condition.column);
        let placeholder = self.param(condition.data.clone());
        Ok(match condition.operator {
            FilterOp::Eq => format!("{} = {}", quoted_column, placeholder),
            FilterOp::ILike => format!("{} ILIKE {}", quoted_column, placeholder),
        })
    }

    fn param(&mut self, value: FilterValue) -> String {
        self.param_values.push(value);
        format!("${}", self.param_values.len())
    }
}
