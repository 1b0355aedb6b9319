//! GiftMarket client binary
//!
//! Bootstraps a session: resolves the identity, loads the order cache,
//! optionally resolves a deep-link order code passed as the first argument,
//! then runs the notification reconciliation loop and the decorative rate
//! walk until shutdown.

use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;

use giftmarket_client::api::{HttpApi, MarketApi};
use giftmarket_client::config::Config;
use giftmarket_client::error::Notice;
use giftmarket_client::identity::IdentityService;
use giftmarket_client::notifications::NotificationReconciler;
use giftmarket_client::orders::{DeepLinkOutcome, DeepLinkResolver, OrderService};
use giftmarket_client::rates;
use giftmarket_client::state::Session;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .with_target(true)
        .init();

    tracing::info!(api = %config.api_base_url, "Starting GiftMarket client");

    let api: Arc<dyn MarketApi> = Arc::new(HttpApi::new(config.api_base_url.clone()));
    let session = Arc::new(Session::new());
    let identity_service = Arc::new(IdentityService::new(api.clone(), session.clone(), &config));
    let order_service = Arc::new(OrderService::new(api.clone(), session.clone()));

    // Resolve identity; a failure leaves the session degraded (no identity)
    // and the ambient polls simply skip until the next resolution attempt.
    match identity_service.resolve().await {
        Ok(identity) => {
            tracing::info!(external_id = %identity.external_id, "Identity resolved");
            match order_service.refresh().await {
                Ok(count) => tracing::info!(count, "Order cache loaded"),
                Err(err) => {
                    session
                        .notices
                        .push(Notice::from_error("Could not load orders", &err))
                        .await;
                }
            }
        }
        Err(err) => {
            session
                .notices
                .push(Notice::from_error("Could not connect to the server", &err))
                .await;
        }
    }

    // Optional deep-link order code from argv
    if let Some(code) = std::env::args().nth(1) {
        let resolver =
            DeepLinkResolver::new(api.clone(), session.clone(), order_service.clone());
        match resolver.resolve(&code).await {
            Ok(DeepLinkOutcome::JoinOffer(offer)) => {
                tracing::info!(
                    code = %offer.order.code,
                    amount = offer.order.amount,
                    currency = offer.order.currency.code(),
                    requisites = %offer.payment_requisites(),
                    "Join offer available"
                );
            }
            Ok(DeepLinkOutcome::OwnOrder(order)) => {
                tracing::info!(code = %order.code, "Deep link points at own order");
            }
            Err(err) => {
                tracing::warn!(code = %code, error = %err, "Deep-link resolution failed");
            }
        }
    }

    // Start the two recurring tasks.
    let reconciler = Arc::new(NotificationReconciler::new(
        api.clone(),
        session.clone(),
        order_service.clone(),
        identity_service.clone(),
    ));
    tokio::spawn(reconciler.run(Duration::from_secs(config.poll_interval_secs)));

    tokio::spawn(rates::run_rate_walk(
        session.clone(),
        Duration::from_secs(config.rate_walk_interval_secs),
    ));

    shutdown_signal().await;
    tracing::info!("Session ended");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down");
        }
    }
}
