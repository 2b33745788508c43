//! Purchase request records.
//!
//! A request is submitted as [`RequestIn`], moved between states with
//! [`RequestStateUpdate`], and read back either in full ([`RequestOut`]) or as the
//! flattened [`SimpleRequest`] used by list views.

use super::{PharmacyOut, ProductOut, UserOut};
use crate::errors::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Full request with its pharmacy, user and product embedded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestOut {
    /// Request id
    pub id: i64,
    /// Invoice number
    pub invoice_id: i64,
    /// Date of purchase
    pub purchase_date: NaiveDate,
    /// Units purchased
    pub product_quantity: i64,
    /// Encoded invoice image
    pub invoice_image: String,
    /// Current state
    pub request_state: String,
    /// Where the purchase happened
    pub pharmacy: PharmacyOut,
    /// Who submitted the request
    pub user: UserOut,
    /// What was purchased
    pub product: ProductOut,
}

/// Payload for submitting a new request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestIn {
    /// Invoice number
    pub invoice_id: i64,
    /// Date of purchase
    pub purchase_date: NaiveDate,
    /// Units purchased
    pub product_quantity: i64,
    /// Encoded invoice image
    pub invoice_image: String,
    /// Pharmacy id
    pub pharmacy_id: i64,
    /// User id
    pub user_id: i64,
    /// Product id
    pub product_id: i64,
}

impl RequestIn {
    /// Checks the fields that can be validated without the store.
    ///
    /// # Errors
    /// Returns `Error::InvalidInput` if the quantity is not positive or the
    /// invoice image is empty.
    pub fn validate(&self) -> Result<()> {
        if self.product_quantity <= 0 {
            return Err(Error::invalid_input("Product quantity must be positive"));
        }
        if self.invoice_image.trim().is_empty() {
            return Err(Error::invalid_input("Invoice image cannot be empty"));
        }
        Ok(())
    }
}

/// Payload for moving a request to a new state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestStateUpdate {
    /// New state; any text is accepted
    pub request_state: String,
}

/// Flattened request for list views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleRequest {
    /// Request id
    pub id: i64,
    /// Invoice number
    pub invoice_id: i64,
    /// Product display name including form
    pub product_name: String,
    /// Current state
    pub request_state: String,
    /// Name of the submitting user
    pub client_name: String,
    /// Date of purchase
    pub purchase_date: NaiveDate,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    fn request_in() -> RequestIn {
        RequestIn {
            invoice_id: 1001,
            purchase_date: NaiveDate::from_ymd_opt(2024, 5, 17).unwrap(),
            product_quantity: 2,
            invoice_image: "aGVsbG8=".to_string(),
            pharmacy_id: 1,
            user_id: 1,
            product_id: 1,
        }
    }

    #[test]
    fn test_request_in_from_json() {
        let json = r#"{
            "invoice_id": 1001,
            "purchase_date": "2024-05-17",
            "product_quantity": 2,
            "invoice_image": "aGVsbG8=",
            "pharmacy_id": 1,
            "user_id": 1,
            "product_id": 1
        }"#;
        let parsed: RequestIn = serde_json::from_str(json).unwrap();
        assert_eq!(parsed, request_in());
    }

    #[test]
    fn test_request_in_validation() {
        assert!(request_in().validate().is_ok());

        let zero_quantity = RequestIn {
            product_quantity: 0,
            ..request_in()
        };
        assert!(matches!(
            zero_quantity.validate(),
            Err(Error::InvalidInput { .. })
        ));

        let no_image = RequestIn {
            invoice_image: "  ".to_string(),
            ..request_in()
        };
        assert!(matches!(no_image.validate(), Err(Error::InvalidInput { .. })));
    }

    #[test]
    fn test_simple_request_serializes_date_as_iso() {
        let simple = SimpleRequest {
            id: 4,
            invoice_id: 1001,
            product_name: "Ibuprofen tablet".to_string(),
            request_state: "pending".to_string(),
            client_name: "Ana".to_string(),
            purchase_date: NaiveDate::from_ymd_opt(2024, 5, 17).unwrap(),
        };
        let json = serde_json::to_value(&simple).unwrap();
        assert_eq!(json["purchase_date"], "2024-05-17");
        assert_eq!(json["client_name"], "Ana");
    }
}
