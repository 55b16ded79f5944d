use onem2m_api::http_proxy::ProxyError;

#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error(transparent)]
    FromIo(#[from] std::io::Error),

    #[error(transparent)]
    FromProxy(#[from] ProxyError),
}
