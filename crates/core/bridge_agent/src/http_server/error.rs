use axum::response::IntoResponse;
use hyper::StatusCode;
use onem2m_api::envelope::EnvelopeError;

#[derive(Debug, thiserror::Error)]
pub enum HttpRequestError {
    #[error(transparent)]
    FromEnvelope(#[from] EnvelopeError),
}

impl IntoResponse for HttpRequestError {
    fn into_response(self) -> axum::response::Response {
        use HttpRequestError::*;
        let status_code = match self {
            FromEnvelope(_) => {
                tracing::error!("{self}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        status_code.into_response()
    }
}
