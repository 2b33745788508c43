//! Product business logic - Read access to the catalog and program enrollment.
//!
//! [`ProductService`] exposes products in two projections: the full
//! [`ProductOut`] and the summary [`SimpleProduct`]. User-scoped queries join
//! the user's point balances; a product without a balance row reports zero
//! points. Enrollment is a single conditional update, so two concurrent
//! enrollments of the same product cannot both succeed.

use crate::{
    core::points,
    entities::{Product, ProductForm, UserProductPoints, product, product_form, user_product_points},
    errors::{Error, Result},
    schemas::{ProductListing, ProductOut, ProductPointsStats, ProgramFilter, SimpleProduct},
};
use sea_orm::{
    JoinType, QueryOrder, QuerySelect, RelationDef,
    prelude::*,
    sea_query::{Expr, IntoCondition},
};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info, instrument};

/// Service over the product catalog.
#[derive(Debug, Clone)]
pub struct ProductService {
    db: DatabaseConnection,
}

impl ProductService {
    /// Creates a service using the given connection.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Returns every dispensing form.
    ///
    /// # Errors
    /// Returns an error if the database query fails.
    #[instrument(skip(self))]
    pub async fn get_product_forms(&self) -> Result<Vec<product_form::Model>> {
        ProductForm::find()
            .order_by_asc(product_form::Column::Id)
            .all(&self.db)
            .await
            .map_err(Into::into)
    }

    /// Lists products, optionally filtered by a textual enrollment flag.
    ///
    /// Without a flag every product is returned in the summary shape with zero
    /// points. With `"true"` or `"false"` (any case) the matching products are
    /// returned in full detail.
    ///
    /// # Errors
    /// Returns `Error::InvalidInput` for any other flag text, or an error if the
    /// database query fails.
    #[instrument(skip(self))]
    pub async fn get_products(&self, is_in_program: Option<&str>) -> Result<ProductListing> {
        match is_in_program {
            None => Ok(ProductListing::Simple(self.list_products().await?)),
            Some(flag) => {
                let filter: ProgramFilter = flag.parse()?;
                Ok(ProductListing::Detailed(
                    self.list_products_filtered(filter).await?,
                ))
            }
        }
    }

    /// Lists every product in the summary shape with zero points.
    ///
    /// # Errors
    /// Returns an error if the database query fails.
    pub async fn list_products(&self) -> Result<Vec<SimpleProduct>> {
        let rows = Product::find()
            .find_also_related(ProductForm)
            .order_by_asc(product::Column::Id)
            .all(&self.db)
            .await?;

        rows.into_iter()
            .map(|(product, form)| {
                let form_name = form_name(&product, form)?;
                Ok(SimpleProduct::from_model(&product, &form_name, 0))
            })
            .collect()
    }

    /// Lists products matching the enrollment filter in full detail.
    ///
    /// # Errors
    /// Returns an error if the database query fails.
    pub async fn list_products_filtered(&self, filter: ProgramFilter) -> Result<Vec<ProductOut>> {
        let rows = Product::find()
            .find_also_related(ProductForm)
            .filter(product::Column::IsInProgram.eq(filter.is_in_program()))
            .order_by_asc(product::Column::Id)
            .all(&self.db)
            .await?;

        rows.into_iter()
            .map(|(product, form)| {
                let form_name = form_name(&product, form)?;
                Ok(ProductOut::from_model(&product, &form_name, 0))
            })
            .collect()
    }

    /// Returns one product in full detail.
    ///
    /// # Errors
    /// Returns `Error::NotFound` if the product does not exist, or an error if the
    /// database query fails.
    #[instrument(skip(self))]
    pub async fn get_product(&self, id: i64) -> Result<ProductOut> {
        let (product, form) = Product::find_by_id(id)
            .find_also_related(ProductForm)
            .one(&self.db)
            .await?
            .ok_or_else(|| Error::not_found("Product", id))?;

        let form_name = form_name(&product, form)?;
        Ok(ProductOut::from_model(&product, &form_name, 0))
    }

    /// Returns one product, looked up by exact name, in the summary shape.
    ///
    /// # Errors
    /// Returns `Error::NotFound` if no product has that name, or an error if the
    /// database query fails.
    #[instrument(skip(self))]
    pub async fn get_product_by_name(&self, name: &str) -> Result<SimpleProduct> {
        let (product, form) = Product::find()
            .filter(product::Column::Name.eq(name))
            .find_also_related(ProductForm)
            .order_by_asc(product::Column::Id)
            .one(&self.db)
            .await?
            .ok_or_else(|| Error::not_found("Product", name))?;

        let form_name = form_name(&product, form)?;
        Ok(SimpleProduct::from_model(&product, &form_name, 0))
    }

    /// Lists products annotated with a user's point balance.
    ///
    /// Every product is returned (optionally filtered by enrollment) whether or
    /// not the user holds points on it.
    ///
    /// # Errors
    /// Returns an error if the database query fails.
    #[instrument(skip(self))]
    pub async fn get_products_of_user(
        &self,
        user_id: i64,
        is_in_program: Option<bool>,
    ) -> Result<Vec<SimpleProduct>> {
        let mut query = Product::find()
            .select_also(UserProductPoints)
            .join(JoinType::LeftJoin, user_points_join(user_id))
            .order_by_asc(product::Column::Id);
        if let Some(flag) = is_in_program {
            query = query.filter(product::Column::IsInProgram.eq(flag));
        }

        let rows = query.all(&self.db).await?;
        let forms = self.form_names().await?;
        debug!("Loaded {} products for user {}", rows.len(), user_id);

        rows.into_iter()
            .map(|(product, balance)| {
                let form_name = forms
                    .get(&product.product_form_id)
                    .ok_or_else(|| Error::not_found("Product form", product.product_form_id))?;
                let points = balance.map_or(0, |row| row.points);
                Ok(SimpleProduct::from_model(&product, form_name, points))
            })
            .collect()
    }

    /// Returns one product in full detail with a user's point balance.
    ///
    /// # Errors
    /// Returns `Error::NotFound` only if the product does not exist; a product the
    /// user holds no points on is reported with zero points.
    #[instrument(skip(self))]
    pub async fn get_product_of_user(&self, user_id: i64, product_id: i64) -> Result<ProductOut> {
        let (product, balance) = Product::find()
            .select_also(UserProductPoints)
            .join(JoinType::LeftJoin, user_points_join(user_id))
            .filter(product::Column::Id.eq(product_id))
            .one(&self.db)
            .await?
            .ok_or_else(|| Error::not_found("Product", product_id))?;

        let form = product.find_related(ProductForm).one(&self.db).await?;
        let form_name = form_name(&product, form)?;
        let points = balance.map_or(0, |row| row.points);
        Ok(ProductOut::from_model(&product, &form_name, points))
    }

    /// Enrolls a product in the points program.
    ///
    /// The enrollment flag and both point parameters are written by one
    /// `UPDATE ... WHERE id = ? AND is_in_program = false`; whether the product
    /// was enrolled is decided by the rows that update affected.
    ///
    /// # Errors
    /// Returns an error if:
    /// - Either points parameter is negative
    /// - The product does not exist (`Error::NotFound`)
    /// - The product is already enrolled (`Error::AlreadyInDatabase`)
    /// - The database operation fails
    #[instrument(skip(self))]
    pub async fn register_product_in_program(
        &self,
        product_id: i64,
        points_per_purchase: i64,
        points_for_redemption: i64,
    ) -> Result<ProductOut> {
        validate_points_parameters(points_per_purchase, points_for_redemption)?;

        let result = Product::update_many()
            .col_expr(product::Column::IsInProgram, Expr::value(true))
            .col_expr(
                product::Column::PointsPerPurchase,
                Expr::value(points_per_purchase),
            )
            .col_expr(
                product::Column::PointsForRedemption,
                Expr::value(points_for_redemption),
            )
            .filter(product::Column::Id.eq(product_id))
            .filter(product::Column::IsInProgram.eq(false))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            let existing = Product::find_by_id(product_id).one(&self.db).await?;
            return Err(match existing {
                None => Error::not_found("Product", product_id),
                Some(_) => Error::AlreadyInDatabase {
                    message: "Product already in program".to_string(),
                },
            });
        }

        info!(
            "Enrolled product {} in program: {} points per purchase, {} for redemption",
            product_id, points_per_purchase, points_for_redemption
        );
        self.get_product(product_id).await
    }

    /// Computes used, available and total points per product name for a user.
    ///
    /// See [`points::compute_points_stats`] for the accounting rules.
    ///
    /// # Errors
    /// Returns `Error::NotFound` if one of the user's trades references a product
    /// missing from the catalog, or an error if a database query fails.
    #[instrument(skip(self))]
    pub async fn get_products_stats_of_user(
        &self,
        user_id: i64,
    ) -> Result<BTreeMap<String, ProductPointsStats>> {
        points::load_points_stats(&self.db, user_id).await
    }

    async fn form_names(&self) -> Result<HashMap<i64, String>> {
        Ok(ProductForm::find()
            .all(&self.db)
            .await?
            .into_iter()
            .map(|form| (form.id, form.name))
            .collect())
    }
}

/// Rejects negative enrollment parameters.
pub(crate) fn validate_points_parameters(
    points_per_purchase: i64,
    points_for_redemption: i64,
) -> Result<()> {
    if points_per_purchase < 0 || points_for_redemption < 0 {
        return Err(Error::invalid_input("Points parameters cannot be negative"));
    }
    Ok(())
}

/// Left join from products to the given user's balance rows.
fn user_points_join(user_id: i64) -> RelationDef {
    product::Relation::UserPoints
        .def()
        .on_condition(move |_left, right| {
            Expr::col((right, user_product_points::Column::UserId))
                .eq(user_id)
                .into_condition()
        })
}

fn form_name(product: &product::Model, form: Option<product_form::Model>) -> Result<String> {
    form.map(|f| f.name)
        .ok_or_else(|| Error::not_found("Product form", product.product_form_id))
}
