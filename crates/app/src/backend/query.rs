//! PostgREST query parameters.

use std::fmt::Display;

/// Filter, projection and ordering parameters for a table request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    params: Vec<(String, String)>,
}

impl Query {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Columns (and embedded resources) to return, e.g. `*,roles(role_name)`.
    #[must_use]
    pub fn select(self, columns: &str) -> Self {
        self.param("select", columns.to_string())
    }

    #[must_use]
    pub fn eq(self, column: &str, value: impl Display) -> Self {
        self.param(column, format!("eq.{value}"))
    }

    #[must_use]
    pub fn gte(self, column: &str, value: impl Display) -> Self {
        self.param(column, format!("gte.{value}"))
    }

    #[must_use]
    pub fn lte(self, column: &str, value: impl Display) -> Self {
        self.param(column, format!("lte.{value}"))
    }

    /// `IS` comparison, for `null`, `true` and `false`.
    #[must_use]
    pub fn is(self, column: &str, value: &str) -> Self {
        self.param(column, format!("is.{value}"))
    }

    #[must_use]
    pub fn order_desc(self, column: &str) -> Self {
        self.param("order", format!("{column}.desc"))
    }

    #[must_use]
    pub fn order_asc(self, column: &str) -> Self {
        self.param("order", format!("{column}.asc"))
    }

    #[must_use]
    pub fn limit(self, limit: u32) -> Self {
        self.param("limit", limit.to_string())
    }

    #[must_use]
    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    fn param(mut self, key: &str, value: String) -> Self {
        self.params.push((key.to_string(), value));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(query: &Query) -> Vec<(&str, &str)> {
        query
            .params()
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
            .collect()
    }

    #[test]
    fn filters_render_as_operator_prefixed_values() {
        let query = Query::new()
            .select("*")
            .eq("redeemed", false)
            .gte("created_at", "2026-01-01T00:00:00Z")
            .lte("created_at", "2026-01-31T23:59:59Z")
            .order_desc("consecutive")
            .limit(10);

        assert_eq!(
            pairs(&query),
            vec![
                ("select", "*"),
                ("redeemed", "eq.false"),
                ("created_at", "gte.2026-01-01T00:00:00Z"),
                ("created_at", "lte.2026-01-31T23:59:59Z"),
                ("order", "consecutive.desc"),
                ("limit", "10"),
            ]
        );
    }

    #[test]
    fn repeated_columns_are_kept_for_range_filters() {
        let query = Query::new().gte("id", 1).lte("id", 5);

        assert_eq!(query.params().len(), 2);
    }

    #[test]
    fn is_filter_uses_is_operator() {
        let query = Query::new().is("branch_id", "null");

        assert_eq!(pairs(&query), vec![("branch_id", "is.null")]);
    }
}
