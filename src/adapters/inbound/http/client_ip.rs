use axum::http::HeaderMap;
use std::net::IpAddr;

/// Address of the caller as reported by a fronting proxy.
///
/// `X-Forwarded-For` wins (its first entry is the original client), then
/// `X-Real-IP`. Unparseable values are ignored.
pub fn forwarded_client_ip(headers: &HeaderMap) -> Option<IpAddr> {
    let forwarded_for = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .and_then(|first| first.trim().parse().ok());

    forwarded_for.or_else(|| {
        headers
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse().ok())
    })
}
