//! Sort Spec Builder
//!
//! Maps the `sortBy`/`sortOrder` tokens onto a fixed allow-list of indexed
//! columns. Unknown tokens fall back to the defaults instead of erroring;
//! the allow-list keeps arbitrary field names out of the ORDER BY clause.

/// Sortable fields (allow-list)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Date,
    Quantity,
    CustomerName,
}

impl SortField {
    /// Map a `sortBy` token; unknown or absent tokens default to `Date`
    pub fn from_token(token: Option<&str>) -> Self {
        match token {
            Some("date") => Self::Date,
            Some("quantity") => Self::Quantity,
            Some("customerName") => Self::CustomerName,
            _ => Self::Date,
        }
    }

    pub fn column(self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Quantity => "quantity",
            Self::CustomerName => "customer_name",
        }
    }
}

/// Sort direction; only the exact token `"asc"` selects ascending
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn from_token(token: Option<&str>) -> Self {
        match token {
            Some("asc") => Self::Asc,
            _ => Self::Desc,
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Single-field sort key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn from_params(sort_by: Option<&str>, sort_order: Option<&str>) -> Self {
        Self {
            field: SortField::from_token(sort_by),
            direction: SortDirection::from_token(sort_order),
        }
    }

    /// Build the ORDER BY clause
    pub fn order_by_clause(&self) -> String {
        format!(" ORDER BY {} {}", self.field.column(), self.direction.as_sql())
    }
}

impl Default for SortSpec {
    fn default() -> Self {
        Self::from_params(None, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_date_descending() {
        let spec = SortSpec::from_params(None, None);
        assert_eq!(spec.field, SortField::Date);
        assert_eq!(spec.direction, SortDirection::Desc);
        assert_eq!(spec.order_by_clause(), " ORDER BY date DESC");
    }

    #[test]
    fn unknown_sort_field_falls_back_to_date() {
        let spec = SortSpec::from_params(Some("finalAmount"), Some("asc"));
        assert_eq!(spec.field, SortField::Date);
        // injection attempts never reach the clause
        let spec = SortSpec::from_params(Some("date; DROP TABLE sale"), None);
        assert_eq!(spec.order_by_clause(), " ORDER BY date DESC");
    }

    #[test]
    fn only_exact_asc_sorts_ascending() {
        assert_eq!(SortDirection::from_token(Some("asc")), SortDirection::Asc);
        assert_eq!(SortDirection::from_token(Some("ASC")), SortDirection::Desc);
        assert_eq!(SortDirection::from_token(Some("ascending")), SortDirection::Desc);
        assert_eq!(SortDirection::from_token(None), SortDirection::Desc);
    }

    #[test]
    fn allow_listed_fields_map_to_columns() {
        assert_eq!(
            SortSpec::from_params(Some("customerName"), Some("asc")).order_by_clause(),
            " ORDER BY customer_name ASC"
        );
        assert_eq!(
            SortSpec::from_params(Some("quantity"), Some("desc")).order_by_clause(),
            " ORDER BY quantity DESC"
        );
    }
}
