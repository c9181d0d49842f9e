//! Sales Query Service
//!
//! Three read-only operations over the sale collection: paginated list,
//! lookup by id, and the faceted filter-options summary. Stateless; every
//! call receives the pool handle explicitly.

use serde::Serialize;
use sqlx::SqlitePool;

use crate::db::models::Sale;
use crate::db::repository::sale;
use crate::query::{FilterPredicate, ListParams, SaleFilter, SortSpec};
use crate::utils::time::millis_to_rfc3339;
use crate::utils::{AppError, AppResult};

/// Hard cap on page size; keeps a single request from dragging the whole
/// table into memory.
pub const MAX_PAGE_SIZE: i64 = 100;

const DEFAULT_PAGE: i64 = 1;
const DEFAULT_PAGE_SIZE: i64 = 10;

/// Fallback age range when the collection is empty
const DEFAULT_AGE_RANGE: (i64, i64) = (18, 65);

/// Pagination metadata for a list response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: i64,
    pub total_pages: i64,
    pub total_items: i64,
    pub items_per_page: i64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

/// One page of sales plus pagination metadata
#[derive(Debug, Clone, Serialize)]
pub struct SalesPage {
    pub data: Vec<Sale>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgeRange {
    pub min_age: i64,
    pub max_age: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub min_date: Option<String>,
    pub max_date: Option<String>,
}

/// Dropdown filter options derived from the data itself.
///
/// Recomputed on every request — freshness over latency, fine at
/// dashboard scale.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    pub customer_regions: Vec<String>,
    pub genders: Vec<String>,
    pub product_categories: Vec<String>,
    pub tags: Vec<String>,
    pub payment_methods: Vec<String>,
    pub age_range: AgeRange,
    pub date_range: DateRange,
}

/// Decode a page/limit parameter.
///
/// Absent falls back to the default; an explicitly invalid value (non-numeric
/// or non-positive) is rejected with a validation error rather than silently
/// defaulted.
fn parse_page_param(value: Option<&str>, default: i64, name: &str) -> AppResult<i64> {
    match value {
        None => Ok(default),
        Some(raw) => match raw.trim().parse::<i64>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(AppError::Validation(format!(
                "{name} must be a positive integer, got '{raw}'"
            ))),
        },
    }
}

/// List matching sales: one page of records plus the total count under the
/// same predicate. The two sub-queries run concurrently; no snapshot
/// isolation is needed between them.
pub async fn list(pool: &SqlitePool, params: &ListParams) -> AppResult<SalesPage> {
    let current_page = parse_page_param(params.page.as_deref(), DEFAULT_PAGE, "page")?;
    let limit =
        parse_page_param(params.limit.as_deref(), DEFAULT_PAGE_SIZE, "limit")?.min(MAX_PAGE_SIZE);

    let filter = SaleFilter::from_params(params);
    let predicate = FilterPredicate::from_filter(&filter);
    let sort = SortSpec::from_params(params.sort_by.as_deref(), params.sort_order.as_deref());

    // checked: a huge page value must not wrap into a negative OFFSET
    let offset = current_page
        .checked_sub(1)
        .and_then(|p| p.checked_mul(limit))
        .ok_or_else(|| {
            AppError::Validation(format!("page {current_page} is out of range"))
        })?;

    let (data, total_items) = tokio::try_join!(
        sale::find_page(pool, &predicate, &sort, limit, offset),
        sale::count(pool, &predicate),
    )?;

    let total_pages = if total_items == 0 {
        0
    } else {
        (total_items + limit - 1) / limit
    };

    Ok(SalesPage {
        data,
        pagination: Pagination {
            current_page,
            total_pages,
            total_items,
            items_per_page: limit,
            has_next_page: current_page < total_pages,
            has_prev_page: current_page > 1,
        },
    })
}

/// Look up a single sale. A malformed identifier is indistinguishable from a
/// missing one: both are NotFound, never an infrastructure error.
pub async fn get_by_id(pool: &SqlitePool, raw_id: &str) -> AppResult<Sale> {
    let id: i64 = raw_id
        .trim()
        .parse()
        .map_err(|_| AppError::sale_not_found())?;
    sale::find_by_id(pool, id)
        .await?
        .ok_or_else(AppError::sale_not_found)
}

/// Derive the dropdown filter options: distinct values per categorical
/// field plus age/date extrema, all facets computed concurrently.
pub async fn filter_options(pool: &SqlitePool) -> AppResult<FilterOptions> {
    let (
        customer_regions,
        genders,
        product_categories,
        payment_methods,
        tags,
        (min_age, max_age),
        (min_date, max_date),
    ) = tokio::try_join!(
        sale::distinct_values(pool, "customer_region"),
        sale::distinct_values(pool, "gender"),
        sale::distinct_values(pool, "product_category"),
        sale::distinct_values(pool, "payment_method"),
        sale::distinct_tags(pool),
        sale::age_extrema(pool),
        sale::date_extrema(pool),
    )?;

    let age_range = match (min_age, max_age) {
        (Some(min_age), Some(max_age)) => AgeRange { min_age, max_age },
        _ => AgeRange {
            min_age: DEFAULT_AGE_RANGE.0,
            max_age: DEFAULT_AGE_RANGE.1,
        },
    };

    Ok(FilterOptions {
        customer_regions,
        genders,
        product_categories,
        tags,
        payment_methods,
        age_range,
        date_range: DateRange {
            min_date: min_date.map(millis_to_rfc3339),
            max_date: max_date.map(millis_to_rfc3339),
        },
    })
}
