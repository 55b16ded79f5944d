use crate::BridgeAgentOpt;
use onem2m_api::http_proxy::M2mEndPoint;
use onem2m_api::http_proxy::ProxySettings;
use std::collections::BTreeMap;
use std::net::IpAddr;
use std::time::Duration;

/// Process-wide configuration, read once at startup and passed by
/// reference; nothing here changes while the bridge is running.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    pub bind_address: IpAddr,
    pub port: u16,
    pub middleware_url: String,
    pub retrieve_url: String,
    pub button_path: String,
    pub light_path: String,
    pub originator: String,
    pub credentials: String,
    pub release_version: String,
    pub request_timeout: Duration,
}

impl From<BridgeAgentOpt> for BridgeConfig {
    fn from(opt: BridgeAgentOpt) -> Self {
        BridgeConfig {
            bind_address: opt.bind_address,
            port: opt.port,
            middleware_url: opt.middleware_url,
            retrieve_url: opt.retrieve_url,
            button_path: opt.button_path,
            light_path: opt.light_path,
            originator: opt.originator,
            credentials: opt.credentials,
            release_version: opt.release_version,
            request_timeout: Duration::from_secs(opt.request_timeout_sec),
        }
    }
}

impl BridgeConfig {
    pub fn proxy_settings(&self) -> ProxySettings {
        ProxySettings {
            end_point: M2mEndPoint::new(&self.retrieve_url, &self.middleware_url, &self.light_path),
            originator: self.originator.clone(),
            credentials: self.credentials.clone(),
            release_version: self.release_version.clone(),
            button_path: self.button_path.clone(),
            filter_criteria: default_filter_criteria(),
            request_timeout: self.request_timeout,
        }
    }
}

/// Filter criteria attached to every conditional RETRIEVE of the button.
fn default_filter_criteria() -> BTreeMap<String, Vec<String>> {
    BTreeMap::from([("lbl".to_owned(), vec!["tag:greeting".to_owned()])])
}
