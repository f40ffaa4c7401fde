//! Request metadata extraction.

use std::net::{IpAddr, SocketAddr};

use axum::{
    extract::{ConnectInfo, FromRequestParts},
    http::{Extensions, HeaderMap, header::USER_AGENT, request::Parts},
};
use classiq_core::attendance::RequestMeta;
use classiq_core::network::normalize;

use crate::AppState;

const FORWARDED_FOR: &str = "x-forwarded-for";

/// Resolves the client address.
///
/// With `trust_forwarded_for` the first `X-Forwarded-For` hop wins; otherwise
/// only the socket peer counts, so the header cannot be spoofed past the
/// network allow-list.
pub fn client_ip(headers: &HeaderMap, extensions: &Extensions, trust_forwarded_for: bool) -> Option<IpAddr> {
    let forwarded = trust_forwarded_for
        .then(|| headers.get(FORWARDED_FOR))
        .flatten()
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .and_then(|first| first.trim().parse::<IpAddr>().ok());

    forwarded
        .or_else(|| {
            extensions
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip())
        })
        .map(normalize)
}

/// Client address and user agent of the current request.
#[derive(Debug, Clone, Default)]
pub struct ClientMeta(pub RequestMeta);

impl FromRequestParts<AppState> for ClientMeta {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let ip = client_ip(&parts.headers, &parts.extensions, state.trust_forwarded_for);
        let device = parts
            .headers
            .get(USER_AGENT)
            .and_then(|value| value.to_str().ok());
        Ok(Self(RequestMeta::new(ip, device)))
    }
}
