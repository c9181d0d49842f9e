//! Sale Repository
//!
//! Read path for the dashboard plus the insert/clear pair used by the
//! bulk loader. All filtering goes through [`FilterPredicate`]; column
//! names never come from user input.

use sqlx::SqlitePool;

use super::RepoResult;
use crate::db::models::Sale;
use crate::query::{FilterPredicate, SortSpec};

const SALE_SELECT: &str = "SELECT id, customer_id, customer_name, phone_number, gender, age, \
     customer_region, customer_type, product_id, product_name, brand, product_category, tags, \
     quantity, price_per_unit, discount_percentage, total_amount, final_amount, date, \
     payment_method, order_status, delivery_type, store_id, store_location, salesperson_id, \
     employee_name FROM sale";

/// Fetch one page of matching records, ordered by the sort spec
pub async fn find_page(
    pool: &SqlitePool,
    predicate: &FilterPredicate,
    sort: &SortSpec,
    limit: i64,
    offset: i64,
) -> RepoResult<Vec<Sale>> {
    let sql = format!(
        "{SALE_SELECT}{}{} LIMIT ? OFFSET ?",
        predicate.build_where_clause(),
        sort.order_by_clause()
    );
    let query = sqlx::query_as::<_, Sale>(&sql);
    let rows = predicate
        .apply_bindings_as(query)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Count all records matching the predicate
pub async fn count(pool: &SqlitePool, predicate: &FilterPredicate) -> RepoResult<i64> {
    let sql = format!("SELECT COUNT(*) FROM sale{}", predicate.build_where_clause());
    let query = sqlx::query_scalar::<_, i64>(&sql);
    let total = predicate.apply_bindings_scalar(query).fetch_one(pool).await?;
    Ok(total)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Sale>> {
    let sql = format!("{SALE_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Sale>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Distinct non-empty values of one categorical column, ascending.
///
/// `column` is a compile-time constant supplied by the service layer,
/// never user input.
pub async fn distinct_values(pool: &SqlitePool, column: &'static str) -> RepoResult<Vec<String>> {
    let sql =
        format!("SELECT DISTINCT {column} FROM sale WHERE {column} <> '' ORDER BY {column} ASC");
    let values = sqlx::query_scalar::<_, String>(&sql).fetch_all(pool).await?;
    Ok(values)
}

/// Distinct non-empty tags across all records (tag sets unrolled), ascending
pub async fn distinct_tags(pool: &SqlitePool) -> RepoResult<Vec<String>> {
    let values = sqlx::query_scalar::<_, String>(
        "SELECT DISTINCT json_each.value FROM sale, json_each(sale.tags) \
         WHERE json_each.value <> '' ORDER BY json_each.value ASC",
    )
    .fetch_all(pool)
    .await?;
    Ok(values)
}

/// Min/max age over the whole collection (`(None, None)` when empty)
pub async fn age_extrema(pool: &SqlitePool) -> RepoResult<(Option<i64>, Option<i64>)> {
    let row = sqlx::query_as::<_, (Option<i64>, Option<i64>)>("SELECT MIN(age), MAX(age) FROM sale")
        .fetch_one(pool)
        .await?;
    Ok(row)
}

/// Min/max date (millis) over the whole collection (`(None, None)` when empty)
pub async fn date_extrema(pool: &SqlitePool) -> RepoResult<(Option<i64>, Option<i64>)> {
    let row =
        sqlx::query_as::<_, (Option<i64>, Option<i64>)>("SELECT MIN(date), MAX(date) FROM sale")
            .fetch_one(pool)
            .await?;
    Ok(row)
}

/// Insert one record (bulk loader only; no HTTP write path exists)
pub async fn insert<'e, E>(executor: E, sale: &Sale) -> RepoResult<()>
where
    E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
{
    let now = crate::utils::time::now_millis();
    sqlx::query(
        "INSERT INTO sale (id, customer_id, customer_name, phone_number, gender, age, \
         customer_region, customer_type, product_id, product_name, brand, product_category, tags, \
         quantity, price_per_unit, discount_percentage, total_amount, final_amount, date, \
         payment_method, order_status, delivery_type, store_id, store_location, salesperson_id, \
         employee_name, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(sale.id)
    .bind(&sale.customer_id)
    .bind(&sale.customer_name)
    .bind(&sale.phone_number)
    .bind(&sale.gender)
    .bind(sale.age)
    .bind(&sale.customer_region)
    .bind(&sale.customer_type)
    .bind(&sale.product_id)
    .bind(&sale.product_name)
    .bind(&sale.brand)
    .bind(&sale.product_category)
    .bind(&sale.tags)
    .bind(sale.quantity)
    .bind(sale.price_per_unit)
    .bind(sale.discount_percentage)
    .bind(sale.total_amount)
    .bind(sale.final_amount)
    .bind(sale.date)
    .bind(&sale.payment_method)
    .bind(&sale.order_status)
    .bind(&sale.delivery_type)
    .bind(&sale.store_id)
    .bind(&sale.store_location)
    .bind(&sale.salesperson_id)
    .bind(&sale.employee_name)
    .bind(now)
    .bind(now)
    .execute(executor)
    .await?;
    Ok(())
}

/// Clear the table before a fresh bulk load
pub async fn delete_all(pool: &SqlitePool) -> RepoResult<u64> {
    let result = sqlx::query("DELETE FROM sale").execute(pool).await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{ListParams, SaleFilter};
    use sqlx::sqlite::SqlitePoolOptions;
    use sqlx::types::Json;

    /// In-memory pool with migrations applied.
    ///
    /// One connection max: each `:memory:` connection is its own database.
    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::migrate!("./migrations").run(&pool).await.unwrap();
        pool
    }

    fn sale_fixture(id: i64, name: &str, age: i64, date: i64) -> Sale {
        Sale {
            id,
            customer_id: format!("CUST-{id}"),
            customer_name: name.to_string(),
            phone_number: format!("+1-555-000{id}"),
            gender: "Female".to_string(),
            age,
            customer_region: "North".to_string(),
            customer_type: "Regular".to_string(),
            product_id: format!("PROD-{id}"),
            product_name: "Espresso Machine".to_string(),
            brand: "Lux".to_string(),
            product_category: "Appliances".to_string(),
            tags: Json(vec![]),
            quantity: 1,
            price_per_unit: 100.0,
            discount_percentage: 0.0,
            total_amount: 100.0,
            final_amount: 100.0,
            date,
            payment_method: "Card".to_string(),
            order_status: "Delivered".to_string(),
            delivery_type: "Home".to_string(),
            store_id: "ST-1".to_string(),
            store_location: "Lisbon".to_string(),
            salesperson_id: "SP-1".to_string(),
            employee_name: "Joana".to_string(),
        }
    }

    fn predicate_for(params: ListParams) -> FilterPredicate {
        FilterPredicate::from_filter(&SaleFilter::from_params(&params))
    }

    const JAN_1: i64 = 1_704_067_200_000; // 2024-01-01T00:00:00Z
    const JAN_2: i64 = 1_704_153_600_000;
    const JAN_3: i64 = 1_704_240_000_000;

    #[tokio::test]
    async fn empty_predicate_matches_everything() {
        let pool = test_pool().await;
        for (id, age, date) in [(1, 20, JAN_1), (2, 30, JAN_2), (3, 40, JAN_3)] {
            insert(&pool, &sale_fixture(id, "Alice", age, date)).await.unwrap();
        }

        let predicate = FilterPredicate::new();
        assert_eq!(count(&pool, &predicate).await.unwrap(), 3);
        let page = find_page(&pool, &predicate, &SortSpec::default(), 10, 0)
            .await
            .unwrap();
        assert_eq!(page.len(), 3);
        // default sort: date descending
        assert_eq!(page[0].id, 3);
        assert_eq!(page[2].id, 1);
    }

    #[tokio::test]
    async fn search_matches_literally_not_as_pattern() {
        let pool = test_pool().await;
        insert(&pool, &sale_fixture(1, "100% Cotton Co", 30, JAN_1)).await.unwrap();
        insert(&pool, &sale_fixture(2, "100x Cotton Co", 30, JAN_1)).await.unwrap();

        let predicate = predicate_for(ListParams {
            search: Some("100%".to_string()),
            ..Default::default()
        });
        let rows = find_page(&pool, &predicate, &SortSpec::default(), 10, 0)
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, 1);

        // underscore must not act as a single-char wildcard either
        let predicate = predicate_for(ListParams {
            search: Some("100_".to_string()),
            ..Default::default()
        });
        assert_eq!(count(&pool, &predicate).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn search_also_covers_phone_number() {
        let pool = test_pool().await;
        insert(&pool, &sale_fixture(7, "Maria", 30, JAN_1)).await.unwrap();

        let predicate = predicate_for(ListParams {
            search: Some("555-0007".to_string()),
            ..Default::default()
        });
        assert_eq!(count(&pool, &predicate).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn inverted_age_range_matches_nothing() {
        let pool = test_pool().await;
        insert(&pool, &sale_fixture(1, "Alice", 30, JAN_1)).await.unwrap();

        let predicate = predicate_for(ListParams {
            age_min: Some("40".to_string()),
            age_max: Some("20".to_string()),
            ..Default::default()
        });
        assert_eq!(count(&pool, &predicate).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn date_to_is_inclusive_through_end_of_day() {
        let pool = test_pool().await;
        // exactly 2024-01-02T23:59:59.999Z
        insert(&pool, &sale_fixture(1, "Alice", 30, 1_704_239_999_999)).await.unwrap();
        // first millisecond of the next day
        insert(&pool, &sale_fixture(2, "Bob", 30, 1_704_240_000_000)).await.unwrap();

        let predicate = predicate_for(ListParams {
            date_to: Some("2024-01-02".to_string()),
            ..Default::default()
        });
        let rows = find_page(&pool, &predicate, &SortSpec::default(), 10, 0)
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, 1);
    }

    #[tokio::test]
    async fn tags_filter_matches_any_selected_tag() {
        let pool = test_pool().await;
        let mut sale = sale_fixture(1, "Alice", 30, JAN_1);
        sale.tags = Json(vec!["new".to_string(), "promo".to_string()]);
        insert(&pool, &sale).await.unwrap();
        insert(&pool, &sale_fixture(2, "Bob", 30, JAN_1)).await.unwrap();

        let predicate = predicate_for(ListParams {
            tags: Some("promo,clearance".to_string()),
            ..Default::default()
        });
        let rows = find_page(&pool, &predicate, &SortSpec::default(), 10, 0)
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, 1);

        // a tag present in no record: zero matches, not an error
        let predicate = predicate_for(ListParams {
            tags: Some("nonexistent".to_string()),
            ..Default::default()
        });
        assert_eq!(count(&pool, &predicate).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn combined_age_and_date_filters() {
        let pool = test_pool().await;
        for (id, age, date) in [(1, 20, JAN_1), (2, 30, JAN_2), (3, 40, JAN_3)] {
            insert(&pool, &sale_fixture(id, "Alice", age, date)).await.unwrap();
        }

        // ageMin=25 AND dateFrom=2024-01-02 excludes the Jan 1 (age 20)
        // record by both clauses; ageMax absent, dateTo absent
        let predicate = predicate_for(ListParams {
            age_min: Some("25".to_string()),
            date_from: Some("2024-01-02".to_string()),
            date_to: Some("2024-01-02".to_string()),
            ..Default::default()
        });
        let rows = find_page(&pool, &predicate, &SortSpec::default(), 10, 0)
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].age, 30);
        assert_eq!(rows[0].date, JAN_2);
    }

    #[tokio::test]
    async fn sort_by_customer_name_ascending() {
        let pool = test_pool().await;
        insert(&pool, &sale_fixture(1, "Carol", 30, JAN_1)).await.unwrap();
        insert(&pool, &sale_fixture(2, "Alice", 30, JAN_2)).await.unwrap();
        insert(&pool, &sale_fixture(3, "Bob", 30, JAN_3)).await.unwrap();

        let sort = SortSpec::from_params(Some("customerName"), Some("asc"));
        let rows = find_page(&pool, &FilterPredicate::new(), &sort, 10, 0)
            .await
            .unwrap();
        let names: Vec<&str> = rows.iter().map(|s| s.customer_name.as_str()).collect();
        assert_eq!(names, vec!["Alice", "Bob", "Carol"]);
    }

    #[tokio::test]
    async fn limit_and_offset_page_through_results() {
        let pool = test_pool().await;
        for id in 1..=5 {
            insert(&pool, &sale_fixture(id, "Alice", 30, JAN_1 + id)).await.unwrap();
        }

        let sort = SortSpec::from_params(Some("date"), Some("asc"));
        let page = find_page(&pool, &FilterPredicate::new(), &sort, 2, 2)
            .await
            .unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].id, 3);
        assert_eq!(page[1].id, 4);
    }

    #[tokio::test]
    async fn find_by_id_roundtrip_and_miss() {
        let pool = test_pool().await;
        let mut sale = sale_fixture(42, "Alice", 30, JAN_1);
        sale.tags = Json(vec!["vip".to_string()]);
        insert(&pool, &sale).await.unwrap();

        let found = find_by_id(&pool, 42).await.unwrap().unwrap();
        assert_eq!(found.customer_name, "Alice");
        assert_eq!(found.tags.0, vec!["vip".to_string()]);

        assert!(find_by_id(&pool, 999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn facets_are_distinct_sorted_and_unrolled() {
        let pool = test_pool().await;
        let mut a = sale_fixture(1, "Alice", 25, JAN_1);
        a.customer_region = "South".to_string();
        a.tags = Json(vec!["promo".to_string(), "new".to_string()]);
        let mut b = sale_fixture(2, "Bob", 45, JAN_3);
        b.tags = Json(vec!["new".to_string()]);
        insert(&pool, &a).await.unwrap();
        insert(&pool, &b).await.unwrap();

        assert_eq!(
            distinct_values(&pool, "customer_region").await.unwrap(),
            vec!["North", "South"]
        );
        assert_eq!(distinct_tags(&pool).await.unwrap(), vec!["new", "promo"]);
        assert_eq!(age_extrema(&pool).await.unwrap(), (Some(25), Some(45)));
        assert_eq!(date_extrema(&pool).await.unwrap(), (Some(JAN_1), Some(JAN_3)));
    }

    #[tokio::test]
    async fn extrema_on_empty_collection_are_none() {
        let pool = test_pool().await;
        assert_eq!(age_extrema(&pool).await.unwrap(), (None, None));
        assert_eq!(date_extrema(&pool).await.unwrap(), (None, None));
        assert!(distinct_tags(&pool).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_all_clears_the_table() {
        let pool = test_pool().await;
        insert(&pool, &sale_fixture(1, "Alice", 30, JAN_1)).await.unwrap();
        assert_eq!(delete_all(&pool).await.unwrap(), 1);
        assert_eq!(count(&pool, &FilterPredicate::new()).await.unwrap(), 0);
    }
}
