use axum::http::{HeaderMap, header};
use std::net::SocketAddr;

const X_FORWARDED_FOR: &str = "x-forwarded-for";

/// Client identity recorded into the binding claims.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct ClientContext {
    pub ip: String,
    pub agent: String,
}

impl ClientContext {
    /// Derive the client address and agent of a request.
    ///
    /// The first `X-Forwarded-For` hop is only honoured when `trust_forwarded_for`
    /// is set, since any client can send that header.
    pub fn from_request(
        headers: &HeaderMap,
        peer: SocketAddr,
        trust_forwarded_for: bool,
    ) -> Self {
        let forwarded = trust_forwarded_for
            .then(|| forwarded_for(headers))
            .flatten();
        let ip = forwarded.unwrap_or_else(|| peer.ip().to_string());

        // Non-UTF-8 bytes are kept as replacement characters rather than dropped.
        let agent = headers
            .get(header::USER_AGENT)
            .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
            .unwrap_or_default();

        Self { ip, agent }
    }
}

fn forwarded_for(headers: &HeaderMap) -> Option<String> {
    headers
        .get(X_FORWARDED_FOR)
        .map(|value| String::from_utf8_lossy(value.as_bytes()))
        .and_then(|value| {
            value
                .split(',')
                .next()
                .map(str::trim)
                .filter(|hop| !hop.is_empty())
                .map(str::to_string)
        })
}
