//! Identity, requisites and stats models

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::Validate;

use crate::orders::{Currency, PaymentMethod};

/// Per-channel payment-destination data for the current identity
///
/// Each field is independently optional; presence of a channel's fields gates
/// which payment methods the identity may offer as a seller.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Requisites {
    pub wallet_address: Option<String>,
    pub card_number: Option<String>,
    pub card_bank: Option<String>,
    pub card_currency: Option<Currency>,
    pub platform_handle: Option<String>,
}

impl Requisites {
    /// Whether this identity can sell against the given payment method
    pub fn supports(&self, method: PaymentMethod) -> bool {
        match method {
            PaymentMethod::Wallet => self.wallet_address.is_some(),
            PaymentMethod::Card => {
                self.card_number.is_some()
                    && self.card_bank.is_some()
                    && self.card_currency.is_some()
            }
            PaymentMethod::Platform => self.platform_handle.is_some(),
        }
    }

    /// Merge a partial update into the local copy; absent fields are untouched
    pub fn merge(&mut self, patch: &RequisitesPatch) {
        if let Some(wallet) = &patch.wallet_address {
            self.wallet_address = Some(wallet.clone());
        }
        if let Some(number) = &patch.card_number {
            self.card_number = Some(number.clone());
        }
        if let Some(bank) = &patch.card_bank {
            self.card_bank = Some(bank.clone());
        }
        if let Some(currency) = patch.card_currency {
            self.card_currency = Some(currency);
        }
        if let Some(handle) = &patch.platform_handle {
            self.platform_handle = Some(handle.clone());
        }
    }
}

/// Partial requisites update; only present fields go over the wire
#[derive(Debug, Serialize, Clone, Default, Validate)]
pub struct RequisitesPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "wallet address must not be empty"))]
    pub wallet_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "card number must not be empty"))]
    pub card_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "card bank must not be empty"))]
    pub card_bank: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_currency: Option<Currency>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "platform handle must not be empty"))]
    pub platform_handle: Option<String>,
}

/// Server-owned aggregate statistics for an identity
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Stats {
    pub completed_deals: u32,
    /// Cumulative traded volume per settlement currency
    #[serde(default)]
    pub volumes: HashMap<Currency, f64>,
}

/// Resolved identity for the current session
#[derive(Debug, Clone)]
pub struct Identity {
    /// Server-assigned opaque id
    pub id: i64,
    /// Durable client-generated pseudonymous identifier
    pub external_id: String,
    pub display_name: String,
    /// Server-granted role claim; client-side checks remain advisory
    pub is_admin: bool,
    pub requisites: Requisites,
    pub stats: Stats,
}

/// Request body for POST /users (idempotent upsert on external id)
#[derive(Debug, Serialize, Clone)]
pub struct UpsertUserRequest {
    pub external_id: String,
    pub display_name: String,
}

/// Full user record returned by the upsert endpoint
#[derive(Debug, Deserialize, Clone)]
pub struct UserRecord {
    pub id: i64,
    pub external_id: String,
    pub display_name: String,
    #[serde(default)]
    pub is_admin: bool,
    pub wallet_address: Option<String>,
    pub card_number: Option<String>,
    pub card_bank: Option<String>,
    pub card_currency: Option<Currency>,
    pub platform_handle: Option<String>,
    #[serde(default)]
    pub completed_deals: u32,
    #[serde(default)]
    pub volumes: HashMap<Currency, f64>,
}

impl From<UserRecord> for Identity {
    fn from(record: UserRecord) -> Self {
        Identity {
            id: record.id,
            external_id: record.external_id,
            display_name: record.display_name,
            is_admin: record.is_admin,
            requisites: Requisites {
                wallet_address: record.wallet_address,
                card_number: record.card_number,
                card_bank: record.card_bank,
                card_currency: record.card_currency,
                platform_handle: record.platform_handle,
            },
            stats: Stats {
                completed_deals: record.completed_deals,
                volumes: record.volumes,
            },
        }
    }
}
