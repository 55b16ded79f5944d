use super::error::HttpRequestError;
use axum::body::Bytes;
use axum::http::HeaderMap;
use axum::response::AppendHeaders;
use axum::response::IntoResponse;
use onem2m_api::envelope;
use onem2m_api::envelope::EnvelopeError;
use onem2m_api::envelope::NotificationEnvelope;
use onem2m_api::envelope::Rsc;
use tracing::info;

/// POST on any path: a CREATE notification pushed by the middleware.
///
/// The payload is only logged; the acknowledgment echoes the inbound
/// request identifier with the protocol OK status code.
pub(crate) async fn acknowledge_notification(
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, HttpRequestError> {
    let envelope = NotificationEnvelope::from_headers(&headers)?;
    let payload = std::str::from_utf8(&body).map_err(|_| EnvelopeError::UndecodableBody)?;

    info!(
        "Notification received: Content-Type: {}, Request ID: {}, Payload: {payload}",
        envelope.content_type.as_deref().unwrap_or("-"),
        envelope.request_identifier_lossy(),
    );

    Ok(AppendHeaders(envelope::ack_headers(
        &envelope.request_identifier,
        Rsc::OK,
    )))
}
