//! reqwest implementation of the marketplace API contract

use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use serde::Deserialize;

use super::MarketApi;
use crate::error::{ClientError, ClientResult};
use crate::identity::{RequisitesPatch, UpsertUserRequest, UserRecord};
use crate::notifications::Notification;
use crate::orders::{CreateOrderRequest, JoinOrderRequest, Order, OrderStatus, StatusUpdateRequest};

/// HTTP client for the remote marketplace server
pub struct HttpApi {
    client: reqwest::Client,
    base_url: String,
}

/// Error body shape used by the server on non-2xx responses
#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

impl HttpApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Map a non-2xx response into the client error taxonomy
    async fn check(response: Response, what: &str) -> ClientResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.error)
            .unwrap_or_else(|| format!("{} failed with status {}", what, status));

        Err(match status {
            StatusCode::NOT_FOUND => ClientError::NotFound(message),
            StatusCode::BAD_REQUEST
            | StatusCode::FORBIDDEN
            | StatusCode::CONFLICT
            | StatusCode::UNPROCESSABLE_ENTITY => ClientError::Precondition(message),
            _ => ClientError::Network(message),
        })
    }
}

#[async_trait]
impl MarketApi for HttpApi {
    async fn upsert_user(&self, request: UpsertUserRequest) -> ClientResult<UserRecord> {
        let response = self
            .client
            .post(self.url("/users"))
            .json(&request)
            .send()
            .await?;
        let record = Self::check(response, "identity resolution")
            .await?
            .json::<UserRecord>()
            .await?;
        Ok(record)
    }

    async fn list_orders(&self, external_id: &str) -> ClientResult<Vec<Order>> {
        let response = self
            .client
            .get(self.url(&format!("/users/{}/orders", external_id)))
            .send()
            .await?;
        let orders = Self::check(response, "order listing")
            .await?
            .json::<Vec<Order>>()
            .await?;
        Ok(orders)
    }

    async fn update_requisites(
        &self,
        external_id: &str,
        patch: RequisitesPatch,
    ) -> ClientResult<()> {
        let response = self
            .client
            .put(self.url(&format!("/users/{}/requisites", external_id)))
            .json(&patch)
            .send()
            .await?;
        Self::check(response, "requisites update").await?;
        Ok(())
    }

    async fn list_notifications(&self, external_id: &str) -> ClientResult<Vec<Notification>> {
        let response = self
            .client
            .get(self.url(&format!("/users/{}/notifications", external_id)))
            .send()
            .await?;
        let notifications = Self::check(response, "notification listing")
            .await?
            .json::<Vec<Notification>>()
            .await?;
        Ok(notifications)
    }

    async fn mark_notification_read(&self, id: i64) -> ClientResult<()> {
        let response = self
            .client
            .put(self.url(&format!("/notifications/{}/read", id)))
            .send()
            .await?;
        Self::check(response, "notification acknowledgement").await?;
        Ok(())
    }

    async fn create_order(&self, request: CreateOrderRequest) -> ClientResult<Order> {
        let response = self
            .client
            .post(self.url("/orders"))
            .json(&request)
            .send()
            .await?;
        let order = Self::check(response, "order creation")
            .await?
            .json::<Order>()
            .await?;
        Ok(order)
    }

    async fn get_order_by_code(&self, code: &str) -> ClientResult<Order> {
        let response = self
            .client
            .get(self.url(&format!("/orders/{}", code)))
            .send()
            .await?;
        let order = Self::check(response, "order lookup")
            .await?
            .json::<Order>()
            .await?;
        Ok(order)
    }

    async fn update_order_status(
        &self,
        order_id: i64,
        status: OrderStatus,
        external_id: &str,
    ) -> ClientResult<Order> {
        let body = StatusUpdateRequest {
            status,
            external_id: external_id.to_string(),
        };
        let response = self
            .client
            .put(self.url(&format!("/orders/{}/status", order_id)))
            .json(&body)
            .send()
            .await?;
        let order = Self::check(response, "status update")
            .await?
            .json::<Order>()
            .await?;
        Ok(order)
    }

    async fn join_order(&self, order_id: i64, external_id: &str) -> ClientResult<()> {
        let body = JoinOrderRequest {
            buyer_external_id: external_id.to_string(),
        };
        let response = self
            .client
            .post(self.url(&format!("/orders/{}/join", order_id)))
            .json(&body)
            .send()
            .await?;
        Self::check(response, "order join").await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let api = HttpApi::new("http://localhost:3000/api/");
        assert_eq!(api.url("/users"), "http://localhost:3000/api/users");
    }
}
