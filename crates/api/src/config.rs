//! Service configuration loaded from environment variables.

/// Inventory service configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST` — bind address (default: `"0.0.0.0"`)
/// - `INVENTORY_PORT` — listen port (default: `8001`)
/// - `INVENTORY_DATABASE_URL` — Postgres URL; in-memory store when unset
/// - `RUST_LOG` — tracing filter directive (default: `"info"`)
#[derive(Debug, Clone)]
pub struct InventoryConfig {
    pub host: String,
    pub port: u16,
    pub database_url: Option<String>,
    pub log_level: String,
}

impl InventoryConfig {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            host: host_from_env(),
            port: port_from_env("INVENTORY_PORT", 8001),
            database_url: std::env::var("INVENTORY_DATABASE_URL").ok(),
            log_level: log_level_from_env(),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8001,
            database_url: None,
            log_level: "info".to_string(),
        }
    }
}

/// Orders service configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST` — bind address (default: `"0.0.0.0"`)
/// - `ORDERS_PORT` — listen port (default: `8002`)
/// - `ORDERS_DATABASE_URL` — Postgres URL; in-memory store when unset
/// - `INVENTORY_URL` — inventory service base URL
///   (default: `"http://inventory:8001"`)
/// - `RUST_LOG` — tracing filter directive (default: `"info"`)
#[derive(Debug, Clone)]
pub struct OrdersConfig {
    pub host: String,
    pub port: u16,
    pub database_url: Option<String>,
    pub inventory_url: String,
    pub log_level: String,
}

impl OrdersConfig {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            host: host_from_env(),
            port: port_from_env("ORDERS_PORT", 8002),
            database_url: std::env::var("ORDERS_DATABASE_URL").ok(),
            inventory_url: std::env::var("INVENTORY_URL")
                .unwrap_or_else(|_| "http://inventory:8001".to_string()),
            log_level: log_level_from_env(),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for OrdersConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8002,
            database_url: None,
            inventory_url: "http://inventory:8001".to_string(),
            log_level: "info".to_string(),
        }
    }
}

fn host_from_env() -> String {
    std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string())
}

fn port_from_env(var: &str, default: u16) -> u16 {
    std::env::var(var)
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(default)
}

fn log_level_from_env() -> String {
    std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = InventoryConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8001);
        assert!(config.database_url.is_none());
        assert_eq!(config.log_level, "info");

        let config = OrdersConfig::default();
        assert_eq!(config.port, 8002);
        assert_eq!(config.inventory_url, "http://inventory:8001");
    }

    #[test]
    fn test_addr_formatting() {
        let config = InventoryConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            ..InventoryConfig::default()
        };
        assert_eq!(config.addr(), "127.0.0.1:8080");
    }

    #[test]
    fn test_addr_default() {
        assert_eq!(InventoryConfig::default().addr(), "0.0.0.0:8001");
        assert_eq!(OrdersConfig::default().addr(), "0.0.0.0:8002");
    }
}
