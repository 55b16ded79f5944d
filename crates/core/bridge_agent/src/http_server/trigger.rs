use crate::policy;
use axum::extract::State;
use axum::response::Html;
use onem2m_api::http_proxy::ButtonState;
use onem2m_api::http_proxy::M2mResourceProxy;
use onem2m_api::http_proxy::UnknownStateReason;
use std::sync::Arc;
use tracing::error;
use tracing::info;
use tracing::warn;

const TRIGGER_ACK_BODY: &str = "Action completed successfully!";

/// GET on any path: retrieve the button state and drive the light after it.
///
/// The caller always gets a 200 acknowledgment; a failed actuation is
/// logged, never reported back through the transport status.
pub(crate) async fn trigger_light_update(
    State(proxy): State<Arc<dyn M2mResourceProxy>>,
) -> Html<&'static str> {
    let state = proxy.retrieve_button_state().await;

    match policy::decide(&state) {
        Some(command) => {
            info!("Switching the light {}", command.value());
            if let Err(err) = proxy.create_content_instance(command.value()).await {
                error!("Failed to switch the light {}: {err}", command.value());
            }
        }
        None => log_no_action(&state),
    }

    Html(TRIGGER_ACK_BODY)
}

fn log_no_action(state: &ButtonState) {
    match state {
        ButtonState::Unknown(UnknownStateReason::UnrecognizedValue(value)) => {
            warn!("Button state {value:?} is unrecognized. No action taken.");
        }
        ButtonState::Unknown(UnknownStateReason::RetrieveFailed(reason)) => {
            warn!("Failed to retrieve the button state: {reason}. No action taken.");
        }
        ButtonState::On | ButtonState::Off => {}
    }
}
