//! Purchase request workflow - Submitting claims and moving them between states.
//!
//! A request starts in [`INITIAL_REQUEST_STATE`]. Any text is accepted as a new
//! state; transition rules belong to the caller.

use crate::{
    entities::{
        Pharmacy, Product, ProductForm, Request, User, product, product_form, request, user,
    },
    errors::{Error, Result},
    schemas::{
        PharmacyOut, ProductOut, RequestIn, RequestOut, RequestStateUpdate, SimpleRequest,
        UserOut,
    },
};
use sea_orm::{QueryOrder, Set, prelude::*};
use std::collections::HashMap;
use tracing::{info, instrument};

/// State assigned to newly submitted requests.
pub const INITIAL_REQUEST_STATE: &str = "pending";

/// Submits a purchase request.
///
/// # Errors
/// Returns an error if:
/// - The quantity is not positive or the invoice image is empty
/// - The pharmacy, user or product does not exist
/// - The database insert operation fails
#[instrument(skip(db, input), fields(invoice_id = input.invoice_id, user_id = input.user_id))]
pub async fn create_request(db: &DatabaseConnection, input: RequestIn) -> Result<RequestOut> {
    input.validate()?;

    Pharmacy::find_by_id(input.pharmacy_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("Pharmacy", input.pharmacy_id))?;
    User::find_by_id(input.user_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("User", input.user_id))?;
    Product::find_by_id(input.product_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("Product", input.product_id))?;

    let request = request::ActiveModel {
        invoice_id: Set(input.invoice_id),
        purchase_date: Set(input.purchase_date),
        product_quantity: Set(input.product_quantity),
        invoice_image: Set(input.invoice_image),
        request_state: Set(INITIAL_REQUEST_STATE.to_string()),
        pharmacy_id: Set(input.pharmacy_id),
        user_id: Set(input.user_id),
        product_id: Set(input.product_id),
        ..Default::default()
    };
    let request = request.insert(db).await?;
    info!("Created request {} for invoice {}", request.id, request.invoice_id);

    to_request_out(db, request).await
}

/// Replaces the state of a request.
///
/// # Errors
/// Returns `Error::NotFound` if the request does not exist, or an error if the
/// database operation fails.
#[instrument(skip(db))]
pub async fn update_request_state(
    db: &DatabaseConnection,
    request_id: i64,
    update: RequestStateUpdate,
) -> Result<RequestOut> {
    let mut request: request::ActiveModel = Request::find_by_id(request_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("Request", request_id))?
        .into();

    request.request_state = Set(update.request_state);
    let request = request.update(db).await?;
    info!(
        "Request {} moved to state '{}'",
        request.id, request.request_state
    );

    to_request_out(db, request).await
}

/// Returns one request with its pharmacy, user and product.
///
/// # Errors
/// Returns `Error::NotFound` if the request does not exist, or an error if a
/// database query fails.
pub async fn get_request(db: &DatabaseConnection, request_id: i64) -> Result<RequestOut> {
    let request = Request::find_by_id(request_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("Request", request_id))?;
    to_request_out(db, request).await
}

/// Lists every request in the flattened shape, oldest first.
///
/// # Errors
/// Returns an error if a database query fails.
pub async fn list_requests(db: &DatabaseConnection) -> Result<Vec<SimpleRequest>> {
    let rows = Request::find()
        .find_also_related(User)
        .order_by_asc(request::Column::Id)
        .all(db)
        .await?;
    flatten_requests(db, rows).await
}

/// Lists the requests submitted by one user in the flattened shape, oldest first.
///
/// # Errors
/// Returns an error if a database query fails.
pub async fn list_requests_of_user(
    db: &DatabaseConnection,
    user_id: i64,
) -> Result<Vec<SimpleRequest>> {
    let rows = Request::find()
        .filter(request::Column::UserId.eq(user_id))
        .find_also_related(User)
        .order_by_asc(request::Column::Id)
        .all(db)
        .await?;
    flatten_requests(db, rows).await
}

async fn flatten_requests(
    db: &DatabaseConnection,
    rows: Vec<(request::Model, Option<user::Model>)>,
) -> Result<Vec<SimpleRequest>> {
    let products: HashMap<i64, product::Model> = Product::find()
        .all(db)
        .await?
        .into_iter()
        .map(|p| (p.id, p))
        .collect();
    let forms: HashMap<i64, String> = ProductForm::find()
        .all(db)
        .await?
        .into_iter()
        .map(|f| (f.id, f.name))
        .collect();

    rows.into_iter()
        .map(|(request, user)| {
            let user = user.ok_or_else(|| Error::not_found("User", request.user_id))?;
            let product = products
                .get(&request.product_id)
                .ok_or_else(|| Error::not_found("Product", request.product_id))?;
            let form_name = forms
                .get(&product.product_form_id)
                .ok_or_else(|| Error::not_found("Product form", product.product_form_id))?;

            Ok(SimpleRequest {
                id: request.id,
                invoice_id: request.invoice_id,
                product_name: format!("{} {}", product.name, form_name),
                request_state: request.request_state,
                client_name: user.name,
                purchase_date: request.purchase_date,
            })
        })
        .collect()
}

async fn to_request_out(db: &DatabaseConnection, request: request::Model) -> Result<RequestOut> {
    let pharmacy = request
        .find_related(Pharmacy)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("Pharmacy", request.pharmacy_id))?;
    let user = request
        .find_related(User)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("User", request.user_id))?;
    let (product, form) = Product::find_by_id(request.product_id)
        .find_also_related(ProductForm)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("Product", request.product_id))?;
    let form: product_form::Model =
        form.ok_or_else(|| Error::not_found("Product form", product.product_form_id))?;

    Ok(RequestOut {
        id: request.id,
        invoice_id: request.invoice_id,
        purchase_date: request.purchase_date,
        product_quantity: request.product_quantity,
        invoice_image: request.invoice_image,
        request_state: request.request_state,
        pharmacy: PharmacyOut::from(pharmacy),
        user: UserOut::from(user),
        product: ProductOut::from_model(&product, &form.name, 0),
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use chrono::NaiveDate;

    async fn submit(
        db: &DatabaseConnection,
        pharmacy_id: i64,
        user_id: i64,
        product_id: i64,
    ) -> Result<RequestOut> {
        create_request(
            db,
            RequestIn {
                invoice_id: 1001,
                purchase_date: NaiveDate::from_ymd_opt(2024, 5, 17).unwrap(),
                product_quantity: 2,
                invoice_image: "aGVsbG8=".to_string(),
                pharmacy_id,
                user_id,
                product_id,
            },
        )
        .await
    }

    #[tokio::test]
    async fn test_create_request_starts_pending() -> Result<()> {
        let (db, product) = setup_with_product().await?;
        let user = create_test_user(&db, "Ana").await?;
        let pharmacy = create_test_pharmacy(&db, "Central").await?;

        let out = submit(&db, pharmacy.id, user.id, product.id).await?;
        assert_eq!(out.request_state, INITIAL_REQUEST_STATE);
        assert_eq!(out.product_quantity, 2);
        assert_eq!(out.pharmacy.name, "Central");
        assert_eq!(out.user.name, "Ana");
        assert_eq!(out.product.name, "Test Product tablet");

        Ok(())
    }

    #[tokio::test]
    async fn test_create_request_unknown_references() -> Result<()> {
        let (db, product) = setup_with_product().await?;
        let user = create_test_user(&db, "Ana").await?;
        let pharmacy = create_test_pharmacy(&db, "Central").await?;

        let no_pharmacy = submit(&db, 999, user.id, product.id).await;
        assert!(matches!(
            no_pharmacy,
            Err(Error::NotFound { entity: "Pharmacy", .. })
        ));

        let no_user = submit(&db, pharmacy.id, 999, product.id).await;
        assert!(matches!(no_user, Err(Error::NotFound { entity: "User", .. })));

        let no_product = submit(&db, pharmacy.id, user.id, 999).await;
        assert!(matches!(
            no_product,
            Err(Error::NotFound { entity: "Product", .. })
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_update_request_state_accepts_any_text() -> Result<()> {
        let (db, product) = setup_with_product().await?;
        let user = create_test_user(&db, "Ana").await?;
        let pharmacy = create_test_pharmacy(&db, "Central").await?;
        let created = submit(&db, pharmacy.id, user.id, product.id).await?;

        let updated = update_request_state(
            &db,
            created.id,
            RequestStateUpdate {
                request_state: "needs second look".to_string(),
            },
        )
        .await?;
        assert_eq!(updated.request_state, "needs second look");

        let fetched = get_request(&db, created.id).await?;
        assert_eq!(fetched.request_state, "needs second look");

        let missing = update_request_state(
            &db,
            999,
            RequestStateUpdate {
                request_state: "approved".to_string(),
            },
        )
        .await;
        assert!(matches!(missing, Err(Error::NotFound { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_list_requests_flattens_names() -> Result<()> {
        let (db, product) = setup_with_product().await?;
        let ana = create_test_user(&db, "Ana").await?;
        let luis = create_test_user(&db, "Luis").await?;
        let pharmacy = create_test_pharmacy(&db, "Central").await?;
        submit(&db, pharmacy.id, ana.id, product.id).await?;
        submit(&db, pharmacy.id, luis.id, product.id).await?;

        let all = list_requests(&db).await?;
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].client_name, "Ana");
        assert_eq!(all[0].product_name, "Test Product tablet");
        assert_eq!(all[1].client_name, "Luis");

        let of_luis = list_requests_of_user(&db, luis.id).await?;
        assert_eq!(of_luis.len(), 1);
        assert_eq!(of_luis[0].client_name, "Luis");
        assert_eq!(of_luis[0].request_state, INITIAL_REQUEST_STATE);

        Ok(())
    }
}
