use axum::http::Request;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use tower_governor::{key_extractor::KeyExtractor, GovernorError};

/// Client-IP key extractor that works behind a reverse proxy and in plain
/// Docker: X-Forwarded-For first, then the peer address, then a shared
/// localhost bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallbackIpKeyExtractor;

impl KeyExtractor for FallbackIpKeyExtractor {
    type Key = IpAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        let forwarded = req
            .headers()
            .get("x-forwarded-for")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(',').next())
            .and_then(|value| value.trim().parse::<IpAddr>().ok());

        if let Some(ip) = forwarded {
            return Ok(ip);
        }

        if let Some(info) = req
            .extensions()
            .get::<axum::extract::ConnectInfo<SocketAddr>>()
        {
            return Ok(info.0.ip());
        }

        // Requests without an identifiable IP share one bucket
        Ok(IpAddr::V4(Ipv4Addr::LOCALHOST))
    }
}
