//! Wire representation of the OneM2M-over-HTTP protocol envelope.
//!
//! The envelope is carried by HTTP headers (`X-M2M-RI`, `X-M2M-RSC`,
//! `X-M2M-Origin`) and, for RETRIEVE requests, by query parameters.

use http::header::HeaderMap;
use http::header::HeaderName;
use http::header::HeaderValue;
use http::header::CONTENT_LENGTH;
use http::header::CONTENT_TYPE;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Request identifier: the correlation token of a protocol operation.
pub const X_M2M_RI: HeaderName = HeaderName::from_static("x-m2m-ri");

/// Response status code: the protocol-level outcome, distinct from the
/// transport status.
pub const X_M2M_RSC: HeaderName = HeaderName::from_static("x-m2m-rsc");

/// Originator: the identity asserted by the caller of an operation.
pub const X_M2M_ORIGIN: HeaderName = HeaderName::from_static("x-m2m-origin");

#[derive(Error, Debug, PartialEq, Eq)]
pub enum EnvelopeError {
    #[error("Missing Content-Length header")]
    MissingContentLength,

    #[error("Invalid Content-Length header: {0:?}")]
    InvalidContentLength(String),

    #[error("Missing X-M2M-RI header")]
    MissingRequestIdentifier,

    #[error("Notification body is not valid UTF-8")]
    UndecodableBody,
}

/// Protocol response status code, e.g. `2000` for OK.
///
/// The `2xxx` class signals success, everything else a protocol-level
/// failure, whatever the transport status was.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rsc(pub u16);

impl Rsc {
    pub const OK: Rsc = Rsc(2000);
    pub const CREATED: Rsc = Rsc(2001);

    pub fn is_success(self) -> bool {
        (2000..3000).contains(&self.0)
    }

    /// Extract the `X-M2M-RSC` header, if the peer sent one.
    pub fn from_headers(headers: &HeaderMap) -> Option<Rsc> {
        headers
            .get(X_M2M_RSC)?
            .to_str()
            .ok()?
            .trim()
            .parse()
            .ok()
            .map(Rsc)
    }
}

impl fmt::Display for Rsc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterUsage {
    Discovery,
    ConditionalRetrieval,
}

impl FilterUsage {
    pub fn as_str(self) -> &'static str {
        match self {
            FilterUsage::Discovery => "discovery",
            FilterUsage::ConditionalRetrieval => "conditionalRetrieval",
        }
    }
}

/// How much of the matched resource tree a RETRIEVE should return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultContent {
    Attributes,
    ChildResources,
}

impl ResultContent {
    pub fn as_str(self) -> &'static str {
        match self {
            ResultContent::Attributes => "attributes",
            ResultContent::ChildResources => "childResources",
        }
    }
}

/// The outbound envelope of a conditional RETRIEVE.
#[derive(Debug, Clone)]
pub struct RetrieveRequest {
    pub to: String,
    pub originator: String,
    pub request_identifier: String,
    pub release_version: String,
    pub filter_usage: FilterUsage,
    pub filter_criteria: BTreeMap<String, Vec<String>>,
    pub result_content: ResultContent,
}

impl RetrieveRequest {
    /// Encode the envelope as query parameters.
    ///
    /// Filter criteria are serialized one `filterCriteria=<key>:<value>`
    /// pair per value; keys are visited in map order so the encoding is
    /// deterministic.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("to", self.to.clone()),
            ("originator", self.originator.clone()),
            ("requestIdentifier", self.request_identifier.clone()),
            ("releaseVersionIndicator", self.release_version.clone()),
            ("filterUsage", self.filter_usage.as_str().to_owned()),
        ];
        for (key, values) in &self.filter_criteria {
            for value in values {
                pairs.push(("filterCriteria", format!("{key}:{value}")));
            }
        }
        pairs.push(("resultContent", self.result_content.as_str().to_owned()));
        pairs
    }
}

/// The envelope of an inbound CREATE notification.
///
/// The request identifier is kept as the raw header value so the
/// acknowledgment can echo it byte for byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationEnvelope {
    pub content_length: usize,
    pub content_type: Option<String>,
    pub request_identifier: HeaderValue,
}

impl NotificationEnvelope {
    pub fn from_headers(headers: &HeaderMap) -> Result<Self, EnvelopeError> {
        let content_length = headers
            .get(CONTENT_LENGTH)
            .ok_or(EnvelopeError::MissingContentLength)?;
        let content_length = content_length
            .to_str()
            .ok()
            .and_then(|value| value.parse::<usize>().ok())
            .ok_or_else(|| {
                EnvelopeError::InvalidContentLength(
                    String::from_utf8_lossy(content_length.as_bytes()).into_owned(),
                )
            })?;

        let content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);

        // A notification without a request identifier cannot be
        // acknowledged per protocol, so it is rejected outright instead
        // of being answered with an invented correlation token.
        let request_identifier = headers
            .get(X_M2M_RI)
            .ok_or(EnvelopeError::MissingRequestIdentifier)?
            .clone();

        Ok(NotificationEnvelope {
            content_length,
            content_type,
            request_identifier,
        })
    }

    /// Printable form of the request identifier, for logging only.
    pub fn request_identifier_lossy(&self) -> String {
        String::from_utf8_lossy(self.request_identifier.as_bytes()).into_owned()
    }
}

/// Headers of a notification acknowledgment: the response status code and
/// the verbatim echo of the inbound request identifier.
pub fn ack_headers(request_identifier: &HeaderValue, rsc: Rsc) -> [(HeaderName, HeaderValue); 2] {
    [
        (X_M2M_RSC, HeaderValue::from(rsc.0)),
        (X_M2M_RI, request_identifier.clone()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn retrieve_request() -> RetrieveRequest {
        RetrieveRequest {
            to: "/Button/Button_Status".into(),
            originator: "Cmyself".into(),
            request_identifier: "123".into(),
            release_version: "3".into(),
            filter_usage: FilterUsage::ConditionalRetrieval,
            filter_criteria: BTreeMap::from([(
                "lbl".to_owned(),
                vec!["tag:greeting".to_owned()],
            )]),
            result_content: ResultContent::ChildResources,
        }
    }

    #[test]
    fn retrieve_query_pairs_are_encoded_in_protocol_order() {
        let pairs = retrieve_request().query_pairs();

        assert_eq!(
            pairs,
            vec![
                ("to", "/Button/Button_Status".to_owned()),
                ("originator", "Cmyself".to_owned()),
                ("requestIdentifier", "123".to_owned()),
                ("releaseVersionIndicator", "3".to_owned()),
                ("filterUsage", "conditionalRetrieval".to_owned()),
                ("filterCriteria", "lbl:tag:greeting".to_owned()),
                ("resultContent", "childResources".to_owned()),
            ]
        );
    }

    #[test]
    fn multi_valued_filter_criteria_repeat_the_parameter() {
        let mut request = retrieve_request();
        request.filter_criteria = BTreeMap::from([
            ("lbl".to_owned(), vec!["tag:a".to_owned(), "tag:b".to_owned()]),
            ("ty".to_owned(), vec!["4".to_owned()]),
        ]);

        let criteria: Vec<String> = request
            .query_pairs()
            .into_iter()
            .filter(|(name, _)| *name == "filterCriteria")
            .map(|(_, value)| value)
            .collect();

        assert_eq!(criteria, vec!["lbl:tag:a", "lbl:tag:b", "ty:4"]);
    }

    #[test]
    fn notification_envelope_is_decoded_from_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_LENGTH, HeaderValue::from_static("5"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        headers.insert(X_M2M_RI, HeaderValue::from_static("req-42"));

        let envelope = NotificationEnvelope::from_headers(&headers).unwrap();

        assert_eq!(envelope.content_length, 5);
        assert_eq!(envelope.content_type.as_deref(), Some("text/plain"));
        assert_eq!(envelope.request_identifier, "req-42");
    }

    #[test]
    fn notification_envelope_without_content_length_is_rejected() {
        let mut headers = HeaderMap::new();
        headers.insert(X_M2M_RI, HeaderValue::from_static("req-42"));

        let error = NotificationEnvelope::from_headers(&headers).unwrap_err();

        assert_eq!(error, EnvelopeError::MissingContentLength);
    }

    #[test_case("five")]
    #[test_case("-5")]
    #[test_case("")]
    fn notification_envelope_with_invalid_content_length_is_rejected(length: &str) {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_LENGTH, HeaderValue::from_str(length).unwrap());
        headers.insert(X_M2M_RI, HeaderValue::from_static("req-42"));

        let error = NotificationEnvelope::from_headers(&headers).unwrap_err();

        assert_eq!(error, EnvelopeError::InvalidContentLength(length.to_owned()));
    }

    #[test]
    fn notification_envelope_without_request_identifier_is_rejected() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_LENGTH, HeaderValue::from_static("5"));

        let error = NotificationEnvelope::from_headers(&headers).unwrap_err();

        assert_eq!(error, EnvelopeError::MissingRequestIdentifier);
    }

    #[test]
    fn ack_headers_echo_the_request_identifier_byte_for_byte() {
        let inbound = HeaderValue::from_static("req-42");

        let [(rsc_name, rsc_value), (ri_name, ri_value)] = ack_headers(&inbound, Rsc::OK);

        assert_eq!(rsc_name, X_M2M_RSC);
        assert_eq!(rsc_value, "2000");
        assert_eq!(ri_name, X_M2M_RI);
        assert_eq!(ri_value.as_bytes(), inbound.as_bytes());
    }

    #[test_case(2000, true)]
    #[test_case(2001, true)]
    #[test_case(2999, true)]
    #[test_case(1999, false)]
    #[test_case(4004, false)]
    #[test_case(5000, false)]
    fn rsc_success_class_is_2xxx(code: u16, success: bool) {
        assert_eq!(Rsc(code).is_success(), success);
    }

    #[test]
    fn rsc_is_parsed_from_response_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(X_M2M_RSC, HeaderValue::from_static("2001"));

        assert_eq!(Rsc::from_headers(&headers), Some(Rsc::CREATED));
    }

    #[test]
    fn garbled_rsc_header_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(X_M2M_RSC, HeaderValue::from_static("not-a-code"));

        assert_eq!(Rsc::from_headers(&headers), None);
    }
}
