//! Application configuration loaded from environment variables.

use std::time::Duration;

use checkout::{HttpRelayConfig, ShippingPolicy};
use common::Money;

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST`: bind address (default: `"0.0.0.0"`)
/// - `PORT`: listen port (default: `3000`)
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
/// - `DATABASE_URL`: PostgreSQL connection string (unset: in-memory order store)
/// - `SHIPPING_FLAT_RATE_CENTS`: shipping charge in minor units (default: `0`)
/// - `SHIPPING_FREE_OVER_CENTS`: subtotal at which shipping is waived (unset: never)
/// - `ORDER_NOTIFY_URL`: email relay endpoint (unset: notifications disabled)
/// - `ORDER_NOTIFY_API_KEY`: bearer token for the relay
/// - `ORDER_NOTIFY_RECIPIENT`: inbox for new-order messages
/// - `ORDER_NOTIFY_TIMEOUT_MS`: relay request timeout (default: `10000`)
/// - `MANUAL_ORDER_PHONE`: phone number manual orders are addressed to
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub database_url: Option<String>,
    pub shipping_flat_rate_cents: i64,
    pub shipping_free_over_cents: Option<i64>,
    pub notify_url: Option<String>,
    pub notify_api_key: Option<String>,
    pub notify_recipient: String,
    pub notify_timeout: Duration,
    pub manual_order_phone: String,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration from an arbitrary key lookup. Unparseable numbers
    /// and empty strings fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Self {
            host: get("HOST").unwrap_or(defaults.host),
            port: get("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            log_level: get("RUST_LOG").unwrap_or(defaults.log_level),
            database_url: get("DATABASE_URL"),
            shipping_flat_rate_cents: get("SHIPPING_FLAT_RATE_CENTS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.shipping_flat_rate_cents),
            shipping_free_over_cents: get("SHIPPING_FREE_OVER_CENTS").and_then(|v| v.parse().ok()),
            notify_url: get("ORDER_NOTIFY_URL"),
            notify_api_key: get("ORDER_NOTIFY_API_KEY"),
            notify_recipient: get("ORDER_NOTIFY_RECIPIENT").unwrap_or(defaults.notify_recipient),
            notify_timeout: get("ORDER_NOTIFY_TIMEOUT_MS")
                .and_then(|v| v.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.notify_timeout),
            manual_order_phone: get("MANUAL_ORDER_PHONE").unwrap_or(defaults.manual_order_phone),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Shipping policy applied to submitted orders.
    pub fn shipping_policy(&self) -> ShippingPolicy {
        let policy = ShippingPolicy::flat(Money::from_cents(self.shipping_flat_rate_cents));
        match self.shipping_free_over_cents {
            Some(threshold) => policy.with_free_over(Money::from_cents(threshold)),
            None => policy,
        }
    }

    /// HTTP relay settings, if a relay endpoint is configured.
    pub fn relay_config(&self) -> Option<HttpRelayConfig> {
        self.notify_url.as_ref().map(|url| HttpRelayConfig {
            url: url.clone(),
            api_key: self.notify_api_key.clone(),
            timeout: self.notify_timeout,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: "info".to_string(),
            database_url: None,
            shipping_flat_rate_cents: 0,
            shipping_free_over_cents: None,
            notify_url: None,
            notify_api_key: None,
            notify_recipient: String::new(),
            notify_timeout: Duration::from_millis(10_000),
            manual_order_phone: String::new(),
        }
    }
}
