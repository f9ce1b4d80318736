//! Shared HTTP Client Module
//!
//! Provides a global, lazy-initialized HTTP client for vision API calls so
//! every caption request reuses pooled connections and TLS sessions.

use once_cell::sync::Lazy;
use reqwest::Client;
use std::time::Duration;

/// Global HTTP client for vision API calls
///
/// - 120s timeout so a hung request eventually fails its item
/// - small idle pool, requests are issued one at a time
pub static VISION_CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .timeout(Duration::from_secs(120))
        .pool_max_idle_per_host(2)
        .pool_idle_timeout(Duration::from_secs(90))
        .tcp_keepalive(Duration::from_secs(60))
        .tcp_nodelay(true)
        .build()
        .expect("Failed to create vision HTTP client")
});

/// Get the global vision HTTP client
#[inline]
pub fn vision_client() -> &'static Client {
    &VISION_CLIENT
}
