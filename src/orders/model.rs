//! Order models and data structures for the GiftMarket client

use serde::{Deserialize, Serialize};

/// Tradable asset categories
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    Gift,
    Username,
    Number,
}

impl OrderType {
    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            OrderType::Gift => "NFT gift",
            OrderType::Username => "NFT username",
            OrderType::Number => "NFT number",
        }
    }
}

/// Payment rails a seller can accept
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Wallet,
    Card,
    Platform,
}

impl PaymentMethod {
    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Wallet => "Crypto wallet",
            PaymentMethod::Card => "Bank card",
            PaymentMethod::Platform => "Platform balance",
        }
    }
}

/// Settlement currencies known to the marketplace
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Rub,
    Usd,
    Eur,
    Kzt,
    Uah,
    Ton,
    Stars,
}

impl Currency {
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Rub => "RUB",
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Kzt => "KZT",
            Currency::Uah => "UAH",
            Currency::Ton => "TON",
            Currency::Stars => "STARS",
        }
    }
}

/// Order lifecycle states
///
/// The ordering matters: an order only ever moves forward through
/// `Active < Paid < Completed`, and `PartialOrd` is what transition checks
/// rely on. There is no cancellation or expiry state.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Active,
    Paid,
    Completed,
}

impl OrderStatus {
    /// Whether `target` is the single legal next state from `self`
    pub fn can_advance_to(&self, target: OrderStatus) -> bool {
        matches!(
            (self, target),
            (OrderStatus::Active, OrderStatus::Paid) | (OrderStatus::Paid, OrderStatus::Completed)
        )
    }
}

/// Order as held by the server and cached client-side
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Order {
    pub id: i64,
    /// Short shareable alphanumeric code
    pub code: String,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub payment_method: PaymentMethod,
    pub amount: f64,
    pub currency: Currency,
    pub description: String,
    pub seller_id: i64,
    /// Absent until a buyer joins; immutable afterwards (server-enforced)
    pub buyer_id: Option<i64>,
    /// Seller requisites frozen at creation time, never a live reference
    pub seller_requisites: String,
    pub status: OrderStatus,
}

impl Order {
    /// Relative shareable reference for this order
    pub fn share_link(&self) -> String {
        format!("?order={}", self.code)
    }
}

/// Request DTO for creating an order
#[derive(Debug, Serialize, Clone)]
pub struct CreateOrderRequest {
    pub seller_external_id: String,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub payment_method: PaymentMethod,
    pub amount: f64,
    pub currency: Currency,
    pub description: String,
    pub seller_requisites: String,
}

impl CreateOrderRequest {
    /// Validate request
    pub fn validate(&self) -> Result<(), String> {
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err("Amount must be a positive number".to_string());
        }
        if self.description.trim().is_empty() {
            return Err("Description must not be empty".to_string());
        }
        Ok(())
    }
}

/// Request body for PUT /orders/{id}/status
#[derive(Debug, Serialize)]
pub struct StatusUpdateRequest {
    pub status: OrderStatus,
    pub external_id: String,
}

/// Request body for POST /orders/{id}/join
#[derive(Debug, Serialize)]
pub struct JoinOrderRequest {
    pub buyer_external_id: String,
}
