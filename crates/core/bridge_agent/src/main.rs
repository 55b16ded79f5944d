mod config;
mod error;
mod http_server;
mod policy;

use crate::config::BridgeConfig;
use crate::error::BridgeError;
use bridge_utils::logging::initialise_tracing_subscriber;
use clap::Parser;
use onem2m_api::http_proxy::HttpResourceProxy;
use std::net::IpAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

const AFTER_HELP_TEXT: &str = r#"`bridge-agent` listens for plain HTTP requests:
  * a GET on any path retrieves the button state from the middleware and,
    when the state is exactly ON or OFF, posts that value into the light
    resource's DATA container;
  * a POST on any path is taken as a notification pushed by the middleware
    and is acknowledged with the `X-M2M-RSC`/`X-M2M-RI` protocol headers.

All middleware endpoints, resource paths and the credential are supplied at
startup and never change while the bridge is running."#;

#[derive(Debug, clap::Parser)]
#[clap(
name = clap::crate_name!(),
version = clap::crate_version!(),
about = clap::crate_description!(),
after_help = AFTER_HELP_TEXT
)]
pub struct BridgeAgentOpt {
    /// Turn-on the debug log level.
    ///
    /// If off only reports ERROR, WARN, and INFO
    /// If on also reports DEBUG and TRACE
    #[clap(long)]
    pub debug: bool,

    /// Port the bridge listens on.
    #[clap(long, env = "BRIDGE_PORT", default_value_t = 9999)]
    pub port: u16,

    /// Address the bridge listens on.
    #[clap(long, env = "BRIDGE_BIND_ADDRESS", default_value = "0.0.0.0")]
    pub bind_address: IpAddr,

    /// Base URL of the middleware server.
    #[clap(
        long,
        env = "BRIDGE_MIDDLEWARE_URL",
        default_value = "http://127.0.0.1:8080"
    )]
    pub middleware_url: String,

    /// URL the conditional RETRIEVE of the button state is sent to.
    #[clap(
        long,
        env = "BRIDGE_RETRIEVE_URL",
        default_value = "http://127.0.0.1:8080/webui/index.html?ri=id-in&or=CAdmin"
    )]
    pub retrieve_url: String,

    /// Resource path of the button within the middleware tree.
    #[clap(long, env = "BRIDGE_BUTTON_PATH", default_value = "/Button/Button_Status")]
    pub button_path: String,

    /// Resource path of the light; content instances are created under
    /// its DATA container.
    #[clap(long, env = "BRIDGE_LIGHT_PATH", default_value = "/~/in-cse/in-name/Light")]
    pub light_path: String,

    /// Originator identity asserted on RETRIEVE requests.
    #[clap(long, env = "BRIDGE_ORIGINATOR", default_value = "Cmyself")]
    pub originator: String,

    /// Credential asserted on CREATE requests.
    #[clap(long, env = "BRIDGE_CREDENTIALS", default_value = "admin:admin")]
    pub credentials: String,

    /// Release version indicator sent on RETRIEVE requests.
    #[clap(long, env = "BRIDGE_RELEASE_VERSION", default_value = "3")]
    pub release_version: String,

    /// Timeout in seconds applied to every outbound middleware call.
    #[clap(long, env = "BRIDGE_REQUEST_TIMEOUT_SEC", default_value_t = 10)]
    pub request_timeout_sec: u64,
}

#[tokio::main]
async fn main() -> Result<(), BridgeError> {
    let opt = BridgeAgentOpt::parse();
    initialise_tracing_subscriber(opt.debug);

    let config = BridgeConfig::from(opt);
    let proxy = HttpResourceProxy::try_new(config.proxy_settings())?;

    let listener = TcpListener::bind((config.bind_address, config.port)).await?;
    info!("HTTP Server running on port {}", config.port);

    http_server::serve(listener, Arc::new(proxy)).await
}
