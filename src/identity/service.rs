//! Identity resolution and requisites management

use chrono::Utc;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::api::MarketApi;
use crate::config::Config;
use crate::error::{ClientError, ClientResult, Notice};
use crate::identity::{Identity, RequisitesPatch, UpsertUserRequest};
use crate::orders::Currency;
use crate::state::Session;

/// File under the data dir holding the durable external id
const EXTERNAL_ID_FILE: &str = "external_id";

pub struct IdentityService {
    api: Arc<dyn MarketApi>,
    session: Arc<Session>,
    id_path: PathBuf,
    display_name: String,
}

impl IdentityService {
    pub fn new(api: Arc<dyn MarketApi>, session: Arc<Session>, config: &Config) -> Self {
        Self {
            api,
            session,
            id_path: config.data_dir.join(EXTERNAL_ID_FILE),
            display_name: config.display_name.clone(),
        }
    }

    /// Load the durable external id, generating and persisting one on first
    /// run. The id is never regenerated while the file stays readable.
    fn load_or_create_external_id(&self) -> ClientResult<String> {
        if let Ok(existing) = fs::read_to_string(&self.id_path) {
            let existing = existing.trim();
            if !existing.is_empty() {
                return Ok(existing.to_string());
            }
        }

        // Timestamp plus random component; collision-resistant enough for
        // single-device use, not cryptographically unique.
        let generated = format!(
            "user-{}-{}",
            Utc::now().timestamp_millis(),
            Uuid::new_v4().simple()
        );

        if let Some(parent) = self.id_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.id_path, &generated)?;
        tracing::info!(external_id = %generated, "Generated new external id");
        Ok(generated)
    }

    /// Resolve the current identity against the server's idempotent upsert
    /// endpoint and replace local identity state with the authoritative
    /// response. Any failure leaves the session degraded; there is no retry
    /// loop here.
    pub async fn resolve(&self) -> ClientResult<Identity> {
        let external_id = self.load_or_create_external_id()?;
        let record = self
            .api
            .upsert_user(UpsertUserRequest {
                external_id,
                display_name: self.display_name.clone(),
            })
            .await?;

        let identity: Identity = record.into();
        self.session.set_identity(identity.clone()).await;
        tracing::debug!(
            user_id = identity.id,
            is_admin = identity.is_admin,
            "Identity resolved"
        );
        Ok(identity)
    }

    /// Save the wallet requisite
    pub async fn save_wallet(&self, address: &str) -> ClientResult<()> {
        let address = address.trim();
        if address.is_empty() {
            return Err(ClientError::Validation(
                "Enter a wallet address".to_string(),
            ));
        }
        self.apply_patch(
            RequisitesPatch {
                wallet_address: Some(address.to_string()),
                ..Default::default()
            },
            "Wallet saved",
        )
        .await
    }

    /// Save the bank-card requisite; number, bank and currency are all required
    pub async fn save_card(&self, number: &str, bank: &str, currency: Currency) -> ClientResult<()> {
        let number = number.trim();
        let bank = bank.trim();
        if number.is_empty() || bank.is_empty() {
            return Err(ClientError::Validation(
                "Fill in the card number and bank".to_string(),
            ));
        }
        self.apply_patch(
            RequisitesPatch {
                card_number: Some(number.to_string()),
                card_bank: Some(bank.to_string()),
                card_currency: Some(currency),
                ..Default::default()
            },
            "Bank card saved",
        )
        .await
    }

    /// Save the platform-handle requisite
    pub async fn save_platform(&self, handle: &str) -> ClientResult<()> {
        let handle = handle.trim();
        if handle.is_empty() {
            return Err(ClientError::Validation(
                "Enter a platform handle".to_string(),
            ));
        }
        self.apply_patch(
            RequisitesPatch {
                platform_handle: Some(handle.to_string()),
                ..Default::default()
            },
            "Platform handle saved",
        )
        .await
    }

    /// Send the partial update and merge it into local identity state.
    /// Last write wins server-side; there is no delete operation.
    async fn apply_patch(&self, patch: RequisitesPatch, success_title: &str) -> ClientResult<()> {
        patch.validate()?;

        let external_id = self
            .session
            .external_id()
            .await
            .ok_or_else(|| ClientError::Precondition("Identity not resolved".to_string()))?;

        self.api
            .update_requisites(&external_id, patch.clone())
            .await?;
        self.session.merge_requisites(&patch).await;
        self.session
            .notices
            .push(Notice::success(success_title, "Requisites updated"))
            .await;
        Ok(())
    }
}
