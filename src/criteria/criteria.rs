use serde_json::Value;

use super::error::CriteriaError;
use super::types::{OrderInfo, Predicate, PredicateOp, SortDirection, SqlFragment};

/// Composable filter/sort/limit/offset specification for list queries.
///
/// Predicates accumulate as descriptors and are ANDed uniformly when the
/// SQL fragment is generated; callers never have to track whether a base
/// predicate already exists. Column names are validated identifiers and
/// values are always bound as parameters.
#[derive(Debug, Clone, Default)]
pub struct Criteria {
    predicates: Vec<Predicate>,
    order: Vec<OrderInfo>,
    limit: Option<i64>,
    offset: Option<i64>,
}

impl Criteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Case-sensitive substring match on a column
    pub fn contains(
        &mut self,
        column: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<&mut Self, CriteriaError> {
        self.push(column, PredicateOp::Contains, Value::String(value.into()))
    }

    pub fn eq(
        &mut self,
        column: impl Into<String>,
        value: Value,
    ) -> Result<&mut Self, CriteriaError> {
        self.push(column, PredicateOp::Eq, value)
    }

    pub fn is_null(&mut self, column: impl Into<String>) -> Result<&mut Self, CriteriaError> {
        self.push(column, PredicateOp::IsNull, Value::Null)
    }

    pub fn order_by(
        &mut self,
        column: impl Into<String>,
        sort: SortDirection,
    ) -> Result<&mut Self, CriteriaError> {
        let column = column.into();
        Self::validate_column(&column)?;
        self.order.push(OrderInfo { column, sort });
        Ok(self)
    }

    pub fn limit(&mut self, limit: i64) -> &mut Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(&mut self, offset: i64) -> &mut Self {
        self.offset = Some(offset);
        self
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    fn push(
        &mut self,
        column: impl Into<String>,
        op: PredicateOp,
        value: Value,
    ) -> Result<&mut Self, CriteriaError> {
        let column = column.into();
        Self::validate_column(&column)?;
        self.predicates.push(Predicate { column, op, value });
        Ok(self)
    }

    /// Render `WHERE .. ORDER BY .. LIMIT .. OFFSET ..` with `$n`
    /// placeholders starting after `starting_param_index`. Columns are
    /// qualified with `alias` when given, so joined queries stay
    /// unambiguous.
    pub fn to_sql_suffix(&self, alias: Option<&str>, starting_param_index: usize) -> SqlFragment {
        let mut params: Vec<Value> = Vec::new();
        let mut conditions: Vec<String> = Vec::new();

        for predicate in &self.predicates {
            let column = Self::quote_column(alias, &predicate.column);
            match predicate.op {
                PredicateOp::Contains => {
                    params.push(predicate.value.clone());
                    conditions.push(format!(
                        "{} LIKE '%' || ${} || '%'",
                        column,
                        starting_param_index + params.len()
                    ));
                }
                PredicateOp::Eq => {
                    params.push(predicate.value.clone());
                    conditions.push(format!(
                        "{} = ${}",
                        column,
                        starting_param_index + params.len()
                    ));
                }
                PredicateOp::IsNull => {
                    conditions.push(format!("{} IS NULL", column));
                }
            }
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let order_clause = if self.order.is_empty() {
            String::new()
        } else {
            let parts: Vec<String> = self
                .order
                .iter()
                .map(|info| format!("{} {}", Self::quote_column(alias, &info.column), info.sort.to_sql()))
                .collect();
            format!("ORDER BY {}", parts.join(", "))
        };

        let limit_clause = match (self.limit, self.offset) {
            (Some(limit), Some(offset)) => format!("LIMIT {} OFFSET {}", limit, offset),
            (Some(limit), None) => format!("LIMIT {}", limit),
            (None, Some(offset)) => format!("OFFSET {}", offset),
            (None, None) => String::new(),
        };

        let sql = [where_clause, order_clause, limit_clause]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        SqlFragment { sql, params }
    }

    fn quote_column(alias: Option<&str>, column: &str) -> String {
        match alias {
            Some(alias) => format!("\"{}\".\"{}\"", alias, column),
            None => format!("\"{}\"", column),
        }
    }

    fn validate_column(column: &str) -> Result<(), CriteriaError> {
        let mut chars = column.chars();
        let valid_head = matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_');
        if !valid_head || !column.chars().all(|c| c.is_alphanumeric() || c == '_') {
            return Err(CriteriaError::InvalidColumn(column.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_criteria_generates_no_sql() {
        let criteria = Criteria::new();
        let fragment = criteria.to_sql_suffix(None, 0);
        assert_eq!(fragment.sql, "");
        assert!(fragment.params.is_empty());
    }

    #[test]
    fn predicates_are_anded_in_insertion_order() {
        let mut criteria = Criteria::new();
        criteria.contains("name", "burger").unwrap();
        criteria.contains("city", "Copenhagen").unwrap();
        criteria.is_null("deleted_at").unwrap();

        let fragment = criteria.to_sql_suffix(None, 0);
        assert_eq!(
            fragment.sql,
            "WHERE \"name\" LIKE '%' || $1 || '%' AND \"city\" LIKE '%' || $2 || '%' AND \"deleted_at\" IS NULL"
        );
        assert_eq!(fragment.params, vec![json!("burger"), json!("Copenhagen")]);
    }

    #[test]
    fn alias_qualifies_every_column() {
        let mut criteria = Criteria::new();
        criteria.eq("country", json!("DNK")).unwrap();
        criteria.order_by("name", SortDirection::Asc).unwrap();

        let fragment = criteria.to_sql_suffix(Some("l"), 0);
        assert_eq!(
            fragment.sql,
            "WHERE \"l\".\"country\" = $1 ORDER BY \"l\".\"name\" ASC"
        );
    }

    #[test]
    fn starting_param_index_shifts_placeholders() {
        let mut criteria = Criteria::new();
        criteria.contains("name", "pizza").unwrap();

        let fragment = criteria.to_sql_suffix(None, 2);
        assert_eq!(fragment.sql, "WHERE \"name\" LIKE '%' || $3 || '%'");
    }

    #[test]
    fn limit_and_offset_render_after_order() {
        let mut criteria = Criteria::new();
        criteria.order_by("iso3", SortDirection::Desc).unwrap();
        criteria.limit(20).offset(40);

        let fragment = criteria.to_sql_suffix(None, 0);
        assert_eq!(fragment.sql, "ORDER BY \"iso3\" DESC LIMIT 20 OFFSET 40");
    }

    #[test]
    fn rejects_invalid_column_names() {
        let mut criteria = Criteria::new();
        assert!(criteria.contains("name; DROP TABLE", "x").is_err());
        assert!(criteria.is_null("1stcolumn").is_err());
        assert!(criteria.eq("", json!("x")).is_err());
    }
}
