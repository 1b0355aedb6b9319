//! Order-entry wizard
//!
//! A strictly linear three-step draft: asset type, payment method, then
//! amount and description. Stepping back keeps already-set fields; stepping
//! forward past the payment step is blocked when the chosen method's
//! requisite is missing. Nothing is persisted across sessions; submission is
//! one atomic create call built by `build`.

use crate::error::{ClientError, ClientResult};
use crate::identity::Identity;
use crate::orders::{CreateOrderRequest, Currency, OrderType, PaymentMethod};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WizardStep {
    AssetType,
    Payment,
    Terms,
}

#[derive(Debug, Default)]
pub struct OrderWizard {
    step: Option<WizardStep>,
    order_type: Option<OrderType>,
    payment_method: Option<PaymentMethod>,
    amount: Option<String>,
    description: Option<String>,
}

/// Method-specific message shown when the prerequisite requisite is absent
fn missing_requisite_message(method: PaymentMethod) -> String {
    match method {
        PaymentMethod::Wallet => "Add a wallet address in Requisites first".to_string(),
        PaymentMethod::Card => "Add a bank card in Requisites first".to_string(),
        PaymentMethod::Platform => "Add a platform handle in Requisites first".to_string(),
    }
}

impl OrderWizard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a fresh draft at step one, discarding any previous one
    pub fn start(&mut self) {
        *self = Self::default();
        self.step = Some(WizardStep::AssetType);
    }

    pub fn step(&self) -> Option<WizardStep> {
        self.step
    }

    pub fn is_open(&self) -> bool {
        self.step.is_some()
    }

    /// Step one: pick the asset type and advance
    pub fn select_type(&mut self, order_type: OrderType) -> ClientResult<()> {
        if self.step.is_none() {
            return Err(ClientError::Validation("No draft in progress".to_string()));
        }
        self.order_type = Some(order_type);
        self.step = Some(WizardStep::Payment);
        Ok(())
    }

    /// Step two: pick the payment method; blocked when the seller has no
    /// requisite for it
    pub fn select_payment(
        &mut self,
        method: PaymentMethod,
        identity: &Identity,
    ) -> ClientResult<()> {
        if self.step != Some(WizardStep::Payment) && self.step != Some(WizardStep::Terms) {
            return Err(ClientError::Validation(
                "Pick an asset type first".to_string(),
            ));
        }
        if !identity.requisites.supports(method) {
            return Err(ClientError::Validation(missing_requisite_message(method)));
        }
        self.payment_method = Some(method);
        self.step = Some(WizardStep::Terms);
        Ok(())
    }

    /// Step three: record the raw amount input and description
    pub fn enter_terms(&mut self, amount: impl Into<String>, description: impl Into<String>) {
        self.amount = Some(amount.into());
        self.description = Some(description.into());
    }

    /// Return to a previous step; fields already set are retained
    pub fn back(&mut self) {
        self.step = match self.step {
            Some(WizardStep::Terms) => Some(WizardStep::Payment),
            Some(WizardStep::Payment) | Some(WizardStep::AssetType) => Some(WizardStep::AssetType),
            None => None,
        };
    }

    /// Discard the draft entirely
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Assemble the atomic create request. The currency is derived from the
    /// payment method and the seller-requisites snapshot is frozen here from
    /// the identity's current requisites; later edits never touch the order.
    pub fn build(&self, seller: &Identity) -> ClientResult<CreateOrderRequest> {
        let order_type = self
            .order_type
            .ok_or_else(|| ClientError::Validation("Pick an asset type".to_string()))?;
        let payment_method = self
            .payment_method
            .ok_or_else(|| ClientError::Validation("Pick a payment method".to_string()))?;

        let raw_amount = self
            .amount
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ClientError::Validation("Enter an amount".to_string()))?;
        let amount = raw_amount
            .parse::<f64>()
            .ok()
            .filter(|a| a.is_finite() && *a > 0.0)
            .ok_or_else(|| {
                ClientError::Validation("Amount must be a positive number".to_string())
            })?;

        let description = self
            .description
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ClientError::Validation("Enter a description".to_string()))?
            .to_string();

        let requisites = &seller.requisites;
        let (currency, seller_requisites) = match payment_method {
            PaymentMethod::Wallet => {
                let wallet = requisites
                    .wallet_address
                    .clone()
                    .ok_or_else(|| ClientError::Validation(missing_requisite_message(payment_method)))?;
                (Currency::Ton, wallet)
            }
            PaymentMethod::Card => {
                let (number, bank, currency) = match (
                    &requisites.card_number,
                    &requisites.card_bank,
                    requisites.card_currency,
                ) {
                    (Some(number), Some(bank), Some(currency)) => (number, bank, currency),
                    _ => {
                        return Err(ClientError::Validation(missing_requisite_message(
                            payment_method,
                        )))
                    }
                };
                (currency, format!("{} ({})", number, bank))
            }
            PaymentMethod::Platform => {
                let handle = requisites
                    .platform_handle
                    .clone()
                    .ok_or_else(|| ClientError::Validation(missing_requisite_message(payment_method)))?;
                (Currency::Stars, handle)
            }
        };

        Ok(CreateOrderRequest {
            seller_external_id: seller.external_id.clone(),
            order_type,
            payment_method,
            amount,
            currency,
            description,
            seller_requisites,
        })
    }
}
