use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::CheckoutError;

/// One line of a client-held cart: a product snapshot plus a quantity.
///
/// The cart lives in the browser; this type exists for typed clients and
/// tests. The checkout endpoint deliberately does not schema-check lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub id: String,
    pub name: String,
    pub price: u64,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderReceipt {
    pub success: bool,
    pub message: String,
    pub order_id: String,
}

/// Extract the cart lines from a checkout request body.
///
/// The only validation performed is that a `cart` key is present and holds
/// an array; line contents pass through untouched.
///
/// # Errors
///
/// `CheckoutError::MissingCart` when the key is absent,
/// `CheckoutError::NotAnArray` when it holds anything but an array.
pub fn parse_cart(body: &Value) -> Result<&[Value], CheckoutError> {
    let cart = body.get("cart").ok_or(CheckoutError::MissingCart)?;
    cart.as_array()
        .map(Vec::as_slice)
        .ok_or(CheckoutError::NotAnArray)
}

/// Fabricate an order acknowledgement.
///
/// The id is time-based (`ORD-<unix-millis>`); uniqueness across processes
/// is not guaranteed and nothing is persisted or charged.
#[must_use]
pub fn place_order() -> OrderReceipt {
    OrderReceipt {
        success: true,
        message: "Order placed successfully!".to_string(),
        order_id: format!("ORD-{}", Utc::now().timestamp_millis()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_cart_accepts_empty_array() {
        let body = json!({ "cart": [] });
        let cart = parse_cart(&body).expect("empty cart is valid");
        assert!(cart.is_empty());
    }

    #[test]
    fn parse_cart_accepts_arbitrary_line_shapes() {
        let body = json!({ "cart": [{ "id": "prod_laptop", "quantity": 2 }, { "anything": true }] });
        let cart = parse_cart(&body).expect("lines are not schema-checked");
        assert_eq!(cart.len(), 2);
    }

    #[test]
    fn parse_cart_rejects_missing_cart() {
        let body = json!({});
        assert_eq!(parse_cart(&body).unwrap_err(), CheckoutError::MissingCart);
    }

    #[test]
    fn parse_cart_rejects_non_array_cart() {
        let body = json!({ "cart": "not-an-array" });
        assert_eq!(parse_cart(&body).unwrap_err(), CheckoutError::NotAnArray);

        let body = json!({ "cart": { "id": "prod_laptop" } });
        assert_eq!(parse_cart(&body).unwrap_err(), CheckoutError::NotAnArray);
    }

    #[test]
    fn place_order_returns_success_receipt() {
        let receipt = place_order();
        assert!(receipt.success);
        assert_eq!(receipt.message, "Order placed successfully!");
        let suffix = receipt
            .order_id
            .strip_prefix("ORD-")
            .expect("order id carries the ORD- prefix");
        assert!(suffix.parse::<i64>().is_ok(), "suffix is a timestamp");
    }

    #[test]
    fn order_receipt_serializes_camel_case() {
        let receipt = place_order();
        let json = serde_json::to_value(&receipt).expect("serialize");
        assert!(json.get("orderId").is_some());
        assert!(json.get("order_id").is_none());
        assert_eq!(json["success"], true);
    }

    #[test]
    fn cart_line_round_trips() {
        let line = CartLine {
            id: "prod_laptop".to_string(),
            name: "Laptop".to_string(),
            price: 60_000,
            quantity: 2,
        };
        let json = serde_json::to_string(&line).expect("serialize");
        let decoded: CartLine = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(decoded, line);
    }
}
