//! The resource client: the two outbound protocol operations performed
//! against the middleware server (CSE).
//!
//! A RETRIEVE failure is absorbed into [`ButtonState::Unknown`] so the
//! caller can carry on; a CREATE failure is surfaced as an error so the
//! caller decides how to report it.

use crate::envelope::FilterUsage;
use crate::envelope::ResultContent;
use crate::envelope::RetrieveRequest;
use crate::envelope::Rsc;
use crate::envelope::X_M2M_ORIGIN;
use crate::envelope::X_M2M_RI;
use async_trait::async_trait;
use http::header::CONTENT_TYPE;
use mockall::automock;
use nanoid::nanoid;
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use tracing::warn;

/// The middleware endpoints the bridge talks to.
#[derive(Debug, Clone)]
pub struct M2mEndPoint {
    retrieve_url: String,
    base_url: String,
    light_path: String,
}

impl M2mEndPoint {
    pub fn new(retrieve_url: &str, base_url: &str, light_path: &str) -> M2mEndPoint {
        M2mEndPoint {
            retrieve_url: retrieve_url.into(),
            base_url: base_url.trim_end_matches('/').into(),
            light_path: light_path.into(),
        }
    }

    /// The conditional RETRIEVE endpoint, verbatim as configured.
    ///
    /// The configured URL may carry a fixed query string of its own; the
    /// envelope parameters are appended to it.
    pub fn url_for_retrieve(&self) -> String {
        self.retrieve_url.clone()
    }

    /// The `DATA` container of the light resource, where content
    /// instances are created.
    pub fn url_for_create_cin(&self) -> String {
        let mut url = self.base_url.clone();
        url.push_str(&self.light_path);
        url.push_str("/DATA");
        url
    }
}

/// State of the button resource, as far as the bridge could tell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ButtonState {
    On,
    Off,
    Unknown(UnknownStateReason),
}

/// Why a retrieved button state is unusable.
///
/// Both reasons lead to the same action (none), but they mean different
/// things to an operator and are logged differently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnknownStateReason {
    /// The middleware answered, but not with `ON` or `OFF`.
    UnrecognizedValue(String),

    /// The RETRIEVE itself failed: transport error or non-200 status.
    RetrieveFailed(String),
}

impl ButtonState {
    /// Interpret the body of a successful RETRIEVE.
    ///
    /// Surrounding whitespace is trimmed; only an exact `ON`/`OFF` match
    /// counts.
    pub fn from_retrieved_text(body: &str) -> ButtonState {
        match body.trim() {
            "ON" => ButtonState::On,
            "OFF" => ButtonState::Off,
            other => ButtonState::Unknown(UnknownStateReason::UnrecognizedValue(other.to_owned())),
        }
    }
}

#[derive(Error, Debug)]
pub enum ProxyError {
    #[error(transparent)]
    Client(#[from] reqwest::Error),
}

#[derive(Error, Debug)]
pub enum ContentInstanceError {
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    #[error("CREATE rejected with HTTP status {http}, protocol status {rsc:?}")]
    ProtocolStatus {
        http: reqwest::StatusCode,
        rsc: Option<Rsc>,
    },
}

/// The two protocol operations the bridge performs, behind a seam so the
/// gateway handlers can be exercised against a mock.
#[automock]
#[async_trait]
pub trait M2mResourceProxy: Send + Sync {
    /// Conditional RETRIEVE of the button state.
    ///
    /// Never fails: every transport or protocol failure is reported as
    /// [`ButtonState::Unknown`] with the reason attached.
    async fn retrieve_button_state(&self) -> ButtonState;

    /// CREATE a content instance carrying `value` in the light's `DATA`
    /// container.
    async fn create_content_instance(&self, value: &str) -> Result<(), ContentInstanceError>;
}

/// Connection settings of [`HttpResourceProxy`], read once at startup.
#[derive(Debug, Clone)]
pub struct ProxySettings {
    pub end_point: M2mEndPoint,
    pub originator: String,
    pub credentials: String,
    pub release_version: String,
    pub button_path: String,
    pub filter_criteria: BTreeMap<String, Vec<String>>,
    pub request_timeout: Duration,
}

/// The reqwest-backed implementation of [`M2mResourceProxy`].
pub struct HttpResourceProxy {
    http_con: reqwest::Client,
    settings: ProxySettings,
}

impl HttpResourceProxy {
    pub fn try_new(settings: ProxySettings) -> Result<HttpResourceProxy, ProxyError> {
        // Every outbound call is bounded by the configured timeout; a
        // hung middleware stalls one handler invocation, not the bridge.
        let http_con = reqwest::Client::builder()
            .timeout(settings.request_timeout)
            .build()?;

        Ok(HttpResourceProxy { http_con, settings })
    }

    fn retrieve_request(&self) -> RetrieveRequest {
        RetrieveRequest {
            to: self.settings.button_path.clone(),
            originator: self.settings.originator.clone(),
            request_identifier: nanoid!(),
            release_version: self.settings.release_version.clone(),
            filter_usage: FilterUsage::ConditionalRetrieval,
            filter_criteria: self.settings.filter_criteria.clone(),
            result_content: ResultContent::ChildResources,
        }
    }
}

#[async_trait]
impl M2mResourceProxy for HttpResourceProxy {
    async fn retrieve_button_state(&self) -> ButtonState {
        let url = self.settings.end_point.url_for_retrieve();
        let request = self.retrieve_request();

        let response = match self
            .http_con
            .get(&url)
            .query(&request.query_pairs())
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                warn!("RETRIEVE request to {url} failed: {err}");
                return ButtonState::Unknown(UnknownStateReason::RetrieveFailed(err.to_string()));
            }
        };

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            warn!("RETRIEVE request to {url} answered with HTTP status {status}");
            return ButtonState::Unknown(UnknownStateReason::RetrieveFailed(format!(
                "HTTP status {status}"
            )));
        }

        match response.text().await {
            Ok(body) => ButtonState::from_retrieved_text(&body),
            Err(err) => {
                warn!("Reading the RETRIEVE response body failed: {err}");
                ButtonState::Unknown(UnknownStateReason::RetrieveFailed(err.to_string()))
            }
        }
    }

    async fn create_content_instance(&self, value: &str) -> Result<(), ContentInstanceError> {
        let url = self.settings.end_point.url_for_create_cin();
        let request_identifier = nanoid!();

        let response = self
            .http_con
            .post(&url)
            .header(X_M2M_ORIGIN, self.settings.credentials.as_str())
            .header(X_M2M_RI, request_identifier.as_str())
            .header(CONTENT_TYPE, "text/plain")
            .body(value.to_owned())
            .send()
            .await?;

        // The middleware echoes the request identifier it was sent.
        if let Some(echoed) = response.headers().get(X_M2M_RI) {
            if echoed.as_bytes() != request_identifier.as_bytes() {
                warn!(
                    "CREATE response echoed request identifier {:?}, expected {request_identifier:?}",
                    String::from_utf8_lossy(echoed.as_bytes())
                );
            }
        }

        let http = response.status();
        let rsc = Rsc::from_headers(response.headers());
        let protocol_success = rsc.is_none_or(Rsc::is_success);

        if http.is_success() && protocol_success {
            debug!("CREATE content instance {value:?} accepted by {url}");
            Ok(())
        } else {
            Err(ContentInstanceError::ProtocolStatus { http, rsc })
        }
    }
}
