//! Points ledger - Per-user balances, trades, and the statistics aggregation.
//!
//! Balances live in the sparse `user_product_points` table; a missing row is a
//! zero balance. Lookups return `Option` so every caller supplies the zero
//! default itself.

use crate::{
    entities::{
        Product, Trade, User, UserProductPoints, product, trade, user_product_points,
    },
    errors::{Error, Result},
    schemas::ProductPointsStats,
};
use sea_orm::{
    QueryOrder, Set,
    prelude::*,
    sea_query::{Expr, OnConflict},
};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info, instrument};

/// Returns the balance row's points for a user and product, `None` if no row exists.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_user_points<C>(db: &C, user_id: i64, product_id: i64) -> Result<Option<i64>>
where
    C: ConnectionTrait,
{
    Ok(UserProductPoints::find_by_id((user_id, product_id))
        .one(db)
        .await?
        .map(|row| row.points))
}

/// Returns every balance of a user keyed by product id.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_user_balances<C>(db: &C, user_id: i64) -> Result<HashMap<i64, i64>>
where
    C: ConnectionTrait,
{
    let rows = UserProductPoints::find()
        .filter(user_product_points::Column::UserId.eq(user_id))
        .all(db)
        .await?;
    Ok(rows
        .into_iter()
        .map(|row| (row.product_id, row.points))
        .collect())
}

/// Adds `delta` points to a user's balance on a product, creating the row if needed.
///
/// The write is one `INSERT ... ON CONFLICT DO UPDATE SET points = points + delta`
/// so concurrent accruals are not lost and two first accruals cannot collide on
/// the primary key. The update only applies while the new balance fits in an
/// `i64`; otherwise nothing is written.
///
/// # Errors
/// Returns an error if:
/// - The user or product does not exist
/// - The new balance would overflow (`Error::InvalidInput`)
/// - The database operation fails
#[instrument(skip(db))]
pub async fn add_user_points(
    db: &DatabaseConnection,
    user_id: i64,
    product_id: i64,
    delta: i64,
) -> Result<user_product_points::Model> {
    ensure_user_and_product(db, user_id, product_id).await?;

    let fits = if delta >= 0 {
        user_product_points::Column::Points.lte(i64::MAX - delta)
    } else {
        user_product_points::Column::Points.gte(i64::MIN - delta)
    };
    let on_conflict = OnConflict::columns([
        user_product_points::Column::UserId,
        user_product_points::Column::ProductId,
    ])
    .value(
        user_product_points::Column::Points,
        Expr::col(user_product_points::Column::Points).add(delta),
    )
    .action_and_where(fits)
    .to_owned();

    let row = user_product_points::ActiveModel {
        user_id: Set(user_id),
        product_id: Set(product_id),
        points: Set(delta),
    };
    let written = UserProductPoints::insert(row)
        .on_conflict(on_conflict)
        .exec_without_returning(db)
        .await?;
    if written == 0 {
        return Err(points_overflow());
    }

    let balance = UserProductPoints::find_by_id((user_id, product_id))
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("Points balance", format!("{user_id}/{product_id}")))?;
    info!(
        "User {} now holds {} points on product {}",
        user_id, balance.points, product_id
    );
    Ok(balance)
}

/// Records a redemption of `quantity` units of a product by a user.
///
/// # Errors
/// Returns an error if:
/// - The quantity is not positive
/// - The user or product does not exist
/// - The database insert operation fails
#[instrument(skip(db))]
pub async fn record_trade(
    db: &DatabaseConnection,
    user_id: i64,
    product_id: i64,
    quantity: i64,
) -> Result<trade::Model> {
    if quantity <= 0 {
        return Err(Error::invalid_input("Trade quantity must be positive"));
    }
    ensure_user_and_product(db, user_id, product_id).await?;

    let trade = trade::ActiveModel {
        user_id: Set(user_id),
        product_id: Set(product_id),
        quantity: Set(quantity),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    let trade = trade.insert(db).await?;
    info!(
        "Recorded trade {} of {} units of product {} for user {}",
        trade.id, quantity, product_id, user_id
    );
    Ok(trade)
}

/// Returns a user's trades in the order they were recorded.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_trades_of_user<C>(db: &C, user_id: i64) -> Result<Vec<trade::Model>>
where
    C: ConnectionTrait,
{
    Trade::find()
        .filter(trade::Column::UserId.eq(user_id))
        .order_by_asc(trade::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Aggregates used, available and total points per product name.
///
/// Every product starts at zero and takes its available points from `balances`.
/// Each trade then *sets* the used points of its product to
/// `points_per_purchase * quantity`, so when a product has several trades the
/// last one in `trades` wins. Products without `points_per_purchase` count as 0.
///
/// # Errors
/// Returns `Error::NotFound` if a trade references a product missing from
/// `products`, or `Error::InvalidInput` if a product's points do not fit in an
/// `i64`.
pub fn compute_points_stats(
    products: &[product::Model],
    balances: &HashMap<i64, i64>,
    trades: &[trade::Model],
) -> Result<BTreeMap<String, ProductPointsStats>> {
    let mut stats: BTreeMap<String, ProductPointsStats> = BTreeMap::new();
    let by_id: HashMap<i64, &product::Model> = products.iter().map(|p| (p.id, p)).collect();

    for product in products {
        let entry = stats.entry(product.name.clone()).or_default();
        *entry = ProductPointsStats {
            available_points: balances.get(&product.id).copied().unwrap_or(0),
            ..ProductPointsStats::default()
        };
    }

    for trade in trades {
        let product = by_id
            .get(&trade.product_id)
            .ok_or_else(|| Error::not_found("Product", trade.product_id))?;
        let entry = stats.entry(product.name.clone()).or_default();
        // TODO: accumulate across trades once the intended semantics for repeated redemptions are settled
        entry.used_points = product
            .points_per_purchase
            .unwrap_or(0)
            .checked_mul(trade.quantity)
            .ok_or_else(points_overflow)?;
    }

    for entry in stats.values_mut() {
        entry.total_points = entry
            .available_points
            .checked_add(entry.used_points)
            .ok_or_else(points_overflow)?;
    }

    debug!(
        "Computed points stats for {} products from {} trades",
        stats.len(),
        trades.len()
    );
    Ok(stats)
}

/// Loads the catalog snapshot, balances and trades of a user and aggregates them.
///
/// # Errors
/// Returns an error if a query fails or a trade references an unknown product.
pub async fn load_points_stats<C>(
    db: &C,
    user_id: i64,
) -> Result<BTreeMap<String, ProductPointsStats>>
where
    C: ConnectionTrait,
{
    let products = Product::find()
        .order_by_asc(product::Column::Id)
        .all(db)
        .await?;
    let balances = get_user_balances(db, user_id).await?;
    let trades = get_trades_of_user(db, user_id).await?;
    compute_points_stats(&products, &balances, &trades)
}

fn points_overflow() -> Error {
    Error::invalid_input("Points overflow")
}

async fn ensure_user_and_product(db: &DatabaseConnection, user_id: i64, product_id: i64) -> Result<()> {
    User::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("User", user_id))?;
    Product::find_by_id(product_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("Product", product_id))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    fn product(id: i64, name: &str, points_per_purchase: Option<i64>) -> product::Model {
        product::Model {
            id,
            name: name.to_string(),
            product_form_id: 1,
            description: None,
            price: 1.0,
            is_in_program: points_per_purchase.is_some(),
            points_per_purchase,
            points_for_redemption: points_per_purchase.map(|p| p * 10),
        }
    }

    fn trade(id: i64, product_id: i64, quantity: i64) -> trade::Model {
        trade::Model {
            id,
            user_id: 1,
            product_id,
            quantity,
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_stats_all_zero_without_history() {
        let products = vec![product(1, "A", Some(3)), product(2, "B", None)];
        let stats = compute_points_stats(&products, &HashMap::new(), &[]).unwrap();

        assert_eq!(stats.len(), 2);
        assert!(stats.values().all(|s| *s == ProductPointsStats::default()));
    }

    #[test]
    fn test_stats_balance_only() {
        let products = vec![product(1, "P", Some(3))];
        let balances = HashMap::from([(1, 5)]);
        let stats = compute_points_stats(&products, &balances, &[]).unwrap();

        assert_eq!(
            stats["P"],
            ProductPointsStats {
                used_points: 0,
                available_points: 5,
                total_points: 5,
            }
        );
    }

    #[test]
    fn test_stats_last_trade_wins() {
        let products = vec![product(1, "A", Some(3))];
        let trades = vec![trade(1, 1, 2), trade(2, 1, 4)];
        let balances = HashMap::from([(1, 7)]);
        let stats = compute_points_stats(&products, &balances, &trades).unwrap();

        assert_eq!(stats["A"].used_points, 12);
        assert_eq!(stats["A"].available_points, 7);
        assert_eq!(stats["A"].total_points, 19);
    }

    #[test]
    fn test_stats_product_without_points_per_purchase() {
        let products = vec![product(1, "A", None)];
        let trades = vec![trade(1, 1, 5)];
        let stats = compute_points_stats(&products, &HashMap::new(), &trades).unwrap();

        assert_eq!(stats["A"].used_points, 0);
    }

    #[test]
    fn test_stats_trade_outside_snapshot_fails() {
        let products = vec![product(1, "A", Some(3))];
        let trades = vec![trade(1, 42, 1)];
        let result = compute_points_stats(&products, &HashMap::new(), &trades);

        assert!(matches!(result, Err(Error::NotFound { entity: "Product", .. })));
    }

    #[tokio::test]
    async fn test_missing_balance_is_none() -> Result<()> {
        let (db, product) = setup_with_product().await?;
        let user = create_test_user(&db, "Ana").await?;

        assert_eq!(get_user_points(&db, user.id, product.id).await?, None);
        assert!(get_user_balances(&db, user.id).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_add_user_points_accumulates() -> Result<()> {
        let (db, product) = setup_with_product().await?;
        let user = create_test_user(&db, "Ana").await?;

        let first = add_user_points(&db, user.id, product.id, 5).await?;
        assert_eq!(first.points, 5);

        let second = add_user_points(&db, user.id, product.id, 7).await?;
        assert_eq!(second.points, 12);

        assert_eq!(get_user_points(&db, user.id, product.id).await?, Some(12));
        assert_eq!(get_user_balances(&db, user.id).await?.get(&product.id), Some(&12));

        Ok(())
    }

    #[tokio::test]
    async fn test_add_user_points_unknown_entities() -> Result<()> {
        let (db, product) = setup_with_product().await?;
        let user = create_test_user(&db, "Ana").await?;

        let no_user = add_user_points(&db, 999, product.id, 5).await;
        assert!(matches!(no_user, Err(Error::NotFound { entity: "User", .. })));

        let no_product = add_user_points(&db, user.id, 999, 5).await;
        assert!(matches!(
            no_product,
            Err(Error::NotFound { entity: "Product", .. })
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_record_trade() -> Result<()> {
        let (db, product) = setup_with_product().await?;
        let user = create_test_user(&db, "Ana").await?;

        let invalid = record_trade(&db, user.id, product.id, 0).await;
        assert!(matches!(invalid, Err(Error::InvalidInput { .. })));

        let first = record_trade(&db, user.id, product.id, 2).await?;
        let second = record_trade(&db, user.id, product.id, 4).await?;

        let trades = get_trades_of_user(&db, user.id).await?;
        assert_eq!(trades.len(), 2);
        assert_eq!(trades[0].id, first.id);
        assert_eq!(trades[1].id, second.id);
        assert_eq!(trades[1].quantity, 4);

        Ok(())
    }

    #[test]
    fn test_stats_used_points_overflow_is_an_error() {
        let products = vec![product(1, "A", Some(i64::MAX / 2))];
        let trades = vec![trade(1, 1, 3)];
        let result = compute_points_stats(&products, &HashMap::new(), &trades);

        assert!(matches!(result, Err(Error::InvalidInput { .. })));
    }

    #[test]
    fn test_stats_total_points_overflow_is_an_error() {
        let products = vec![product(1, "A", Some(1))];
        let balances = HashMap::from([(1, i64::MAX)]);
        let trades = vec![trade(1, 1, 1)];
        let result = compute_points_stats(&products, &balances, &trades);

        assert!(matches!(result, Err(Error::InvalidInput { .. })));
    }

    #[tokio::test]
    async fn test_stats_overflow_after_large_enrollment() -> Result<()> {
        let (db, product) = setup_with_product().await?;
        let user = create_test_user(&db, "Ana").await?;
        let service = crate::core::ProductService::new(db.clone());
        service
            .register_product_in_program(product.id, i64::MAX / 2, 1)
            .await?;
        record_trade(&db, user.id, product.id, 3).await?;

        let result = service.get_products_stats_of_user(user.id).await;
        assert!(matches!(result, Err(Error::InvalidInput { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_add_user_points_overflow_leaves_balance_intact() -> Result<()> {
        let (db, product) = setup_with_product().await?;
        let user = create_test_user(&db, "Ana").await?;

        add_user_points(&db, user.id, product.id, i64::MAX).await?;
        let overflow = add_user_points(&db, user.id, product.id, 1).await;
        assert!(matches!(overflow, Err(Error::InvalidInput { .. })));
        assert_eq!(
            get_user_points(&db, user.id, product.id).await?,
            Some(i64::MAX)
        );

        let products = crate::core::ProductService::new(db.clone())
            .get_products_of_user(user.id, None)
            .await?;
        assert_eq!(products[0].points_count, i64::MAX);

        Ok(())
    }

    #[tokio::test]
    async fn test_add_user_points_underflow_is_rejected() -> Result<()> {
        let (db, product) = setup_with_product().await?;
        let user = create_test_user(&db, "Ana").await?;

        add_user_points(&db, user.id, product.id, i64::MIN).await?;
        let underflow = add_user_points(&db, user.id, product.id, -1).await;
        assert!(matches!(underflow, Err(Error::InvalidInput { .. })));
        assert_eq!(
            get_user_points(&db, user.id, product.id).await?,
            Some(i64::MIN)
        );

        Ok(())
    }
}
