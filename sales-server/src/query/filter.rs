//! Filter Predicate Builder
//!
//! Two-step pipeline, both steps pure:
//!
//! 1. [`SaleFilter::from_params`] — explicit typed decode of the raw query
//!    parameters. Malformed values (non-numeric ages, invalid dates,
//!    whitespace-only search) normalize to "absent" rather than erroring.
//! 2. [`FilterPredicate::from_filter`] — the canonical filter becomes a SQL
//!    WHERE clause with positional bindings. A record matches iff it
//!    satisfies the conjunction of all present clauses; an all-absent
//!    filter produces an empty clause (match everything).

use serde::Deserialize;
use sqlx::Sqlite;

use crate::utils::time::{parse_date_end, parse_date_start};

/// Raw query parameters for `GET /sales`.
///
/// Everything is `Option<String>` on purpose: the permissive-parsing policy
/// means a malformed filter must become "absent", not a 400 from the
/// deserializer. Only `page`/`limit` are validated downstream.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub customer_region: Option<String>,
    pub gender: Option<String>,
    pub age_min: Option<String>,
    pub age_max: Option<String>,
    pub product_category: Option<String>,
    pub tags: Option<String>,
    pub payment_method: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}

/// Canonical, fully-typed filter values.
///
/// Multi-select fields hold normalized token lists (trimmed, de-duplicated,
/// empties dropped); an empty list means the filter is absent. Date bounds
/// are UTC epoch milliseconds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaleFilter {
    pub search: Option<String>,
    pub customer_regions: Vec<String>,
    pub genders: Vec<String>,
    pub age_min: Option<i64>,
    pub age_max: Option<i64>,
    pub product_categories: Vec<String>,
    pub tags: Vec<String>,
    pub payment_methods: Vec<String>,
    pub date_from: Option<i64>,
    pub date_to: Option<i64>,
}

impl SaleFilter {
    /// Decode raw parameters into canonical filter values.
    pub fn from_params(params: &ListParams) -> Self {
        Self {
            search: params
                .search
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            customer_regions: parse_multi_select(params.customer_region.as_deref()),
            genders: parse_multi_select(params.gender.as_deref()),
            age_min: parse_opt_int(params.age_min.as_deref()),
            age_max: parse_opt_int(params.age_max.as_deref()),
            product_categories: parse_multi_select(params.product_category.as_deref()),
            tags: parse_multi_select(params.tags.as_deref()),
            payment_methods: parse_multi_select(params.payment_method.as_deref()),
            date_from: params.date_from.as_deref().and_then(parse_date_start),
            date_to: params.date_to.as_deref().and_then(parse_date_end),
        }
    }
}

/// Normalize a comma-separated multi-select value.
pub fn parse_multi_select(value: Option<&str>) -> Vec<String> {
    match value {
        Some(s) => normalize_tokens(s.split(',')),
        None => Vec::new(),
    }
}

/// Normalize any sequence of tokens into the canonical ordered-unique list:
/// trim each token, drop empties, de-duplicate keeping first occurrence.
pub fn normalize_tokens<'a, I>(tokens: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut out: Vec<String> = Vec::new();
    for token in tokens {
        let token = token.trim();
        if !token.is_empty() && !out.iter().any(|t| t == token) {
            out.push(token.to_string());
        }
    }
    out
}

/// Integer parse-or-absent (never an error, never a NaN-ish sentinel)
fn parse_opt_int(value: Option<&str>) -> Option<i64> {
    value.and_then(|s| s.trim().parse::<i64>().ok())
}

/// Escape LIKE metacharacters so the input matches literally.
///
/// Used with `LIKE ? ESCAPE '\'`: `%`, `_` and the escape character itself
/// are neutralized, the input is data rather than a pattern.
pub fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '\\' | '%' | '_' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

/// A bound value for a positional placeholder
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    Text(String),
    Integer(i64),
}

/// SQL filter predicate: WHERE conditions plus their bindings, in order.
///
/// Built entirely from a [`SaleFilter`]; applied to concrete sqlx queries by
/// the repository layer.
#[derive(Debug, Clone, Default)]
pub struct FilterPredicate {
    conditions: Vec<String>,
    bindings: Vec<QueryValue>,
}

impl FilterPredicate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Translate a canonical filter into SQL conditions.
    pub fn from_filter(filter: &SaleFilter) -> Self {
        let mut predicate = Self::new();

        if let Some(ref search) = filter.search {
            let pattern = format!("%{}%", escape_like(search));
            predicate.conditions.push(
                "(customer_name LIKE ? ESCAPE '\\' OR phone_number LIKE ? ESCAPE '\\')"
                    .to_string(),
            );
            predicate.bindings.push(QueryValue::Text(pattern.clone()));
            predicate.bindings.push(QueryValue::Text(pattern));
        }

        predicate.add_in_condition("customer_region", &filter.customer_regions);
        predicate.add_in_condition("gender", &filter.genders);

        if let Some(age_min) = filter.age_min {
            predicate.conditions.push("age >= ?".to_string());
            predicate.bindings.push(QueryValue::Integer(age_min));
        }
        if let Some(age_max) = filter.age_max {
            predicate.conditions.push("age <= ?".to_string());
            predicate.bindings.push(QueryValue::Integer(age_max));
        }

        predicate.add_in_condition("product_category", &filter.product_categories);

        // tags is a JSON array column; match records whose tag set intersects
        // the selected set
        if !filter.tags.is_empty() {
            let placeholders = vec!["?"; filter.tags.len()].join(", ");
            predicate.conditions.push(format!(
                "EXISTS (SELECT 1 FROM json_each(sale.tags) WHERE json_each.value IN ({placeholders}))"
            ));
            for tag in &filter.tags {
                predicate.bindings.push(QueryValue::Text(tag.clone()));
            }
        }

        predicate.add_in_condition("payment_method", &filter.payment_methods);

        if let Some(date_from) = filter.date_from {
            predicate.conditions.push("date >= ?".to_string());
            predicate.bindings.push(QueryValue::Integer(date_from));
        }
        if let Some(date_to) = filter.date_to {
            predicate.conditions.push("date <= ?".to_string());
            predicate.bindings.push(QueryValue::Integer(date_to));
        }

        predicate
    }

    /// Add an IN condition over a normalized token list (no-op when empty)
    fn add_in_condition(&mut self, column: &str, values: &[String]) {
        if values.is_empty() {
            return;
        }
        let placeholders = vec!["?"; values.len()].join(", ");
        self.conditions.push(format!("{column} IN ({placeholders})"));
        for value in values {
            self.bindings.push(QueryValue::Text(value.clone()));
        }
    }

    /// Build the WHERE clause (empty string if no conditions)
    pub fn build_where_clause(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.conditions.join(" AND "))
        }
    }

    /// Apply bindings to a `query_as` query
    pub fn apply_bindings_as<'a, 'b, O>(
        &'b self,
        mut query: sqlx::query::QueryAs<'a, Sqlite, O, <Sqlite as sqlx::Database>::Arguments<'a>>,
    ) -> sqlx::query::QueryAs<'a, Sqlite, O, <Sqlite as sqlx::Database>::Arguments<'a>>
    where
        'b: 'a,
    {
        for binding in &self.bindings {
            query = match binding {
                QueryValue::Text(s) => query.bind(s),
                QueryValue::Integer(i) => query.bind(*i),
            };
        }
        query
    }

    /// Apply bindings to a `query_scalar` query
    pub fn apply_bindings_scalar<'a, 'b, O>(
        &'b self,
        mut query: sqlx::query::QueryScalar<'a, Sqlite, O, <Sqlite as sqlx::Database>::Arguments<'a>>,
    ) -> sqlx::query::QueryScalar<'a, Sqlite, O, <Sqlite as sqlx::Database>::Arguments<'a>>
    where
        O: Send + Unpin,
        'b: 'a,
    {
        for binding in &self.bindings {
            query = match binding {
                QueryValue::Text(s) => query.bind(s),
                QueryValue::Integer(i) => query.bind(*i),
            };
        }
        query
    }
}
