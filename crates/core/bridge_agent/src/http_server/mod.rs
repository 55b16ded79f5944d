//! The bridge's own HTTP listener.
//!
//! Every inbound request is an isolated transaction: a GET on any path
//! triggers the button-to-light flow, a POST on any path is acknowledged
//! as an inbound notification. The two paths share nothing but the
//! resource proxy.

use crate::error::BridgeError;
use axum::routing::get;
use axum::Router;
use onem2m_api::http_proxy::M2mResourceProxy;
use std::sync::Arc;
use tokio::net::TcpListener;

mod error;
mod notification;
mod trigger;

pub(crate) fn bridge_router(proxy: Arc<dyn M2mResourceProxy>) -> Router {
    let handlers = get(trigger::trigger_light_update).post(notification::acknowledge_notification);
    Router::new()
        .route("/", handlers.clone())
        .route("/{*path}", handlers)
        .with_state(proxy)
}

pub async fn serve(
    listener: TcpListener,
    proxy: Arc<dyn M2mResourceProxy>,
) -> Result<(), BridgeError> {
    axum::serve(listener, bridge_router(proxy)).await?;
    Ok(())
}
