//! Environment-driven server configuration.

use std::net::SocketAddr;
use std::path::PathBuf;

/// Default server port, matching the dashboard's expected origin.
pub const DEFAULT_PORT: u16 = 3000;

/// Runtime configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port the HTTP server binds on (`TICKETD_PORT`).
    pub port: u16,

    /// Directory holding tickets.json and the account files
    /// (`TICKETD_DATA_DIR`).
    pub data_dir: PathBuf,

    /// Exact origin allowed for credentialed CORS requests
    /// (`TICKETD_ALLOWED_ORIGIN`).
    pub allowed_origin: String,
}

impl Config {
    /// Loads configuration from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        let port = std::env::var("TICKETD_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let data_dir = std::env::var("TICKETD_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| Self::default_data_dir());

        let allowed_origin = std::env::var("TICKETD_ALLOWED_ORIGIN")
            .unwrap_or_else(|_| format!("http://localhost:{port}"));

        Self {
            port,
            data_dir,
            allowed_origin,
        }
    }

    /// Returns the default data directory.
    fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("ticketd")
    }

    /// Socket address the server binds on.
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::from(([127, 0, 0, 1], self.port))
    }

    /// Path of the ticket backing file.
    pub fn tickets_path(&self) -> PathBuf {
        self.data_dir.join("tickets.json")
    }

    /// Path of the admin credential file.
    pub fn admin_accounts_path(&self) -> PathBuf {
        self.data_dir.join("admin-accounts.json")
    }

    /// Path of the client credential file.
    pub fn client_accounts_path(&self) -> PathBuf {
        self.data_dir.join("client-accounts.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_paths() {
        let config = Config {
            port: 3000,
            data_dir: PathBuf::from("/tmp/ticketd"),
            allowed_origin: "http://localhost:3000".into(),
        };

        assert_eq!(config.tickets_path(), PathBuf::from("/tmp/ticketd/tickets.json"));
        assert_eq!(
            config.admin_accounts_path(),
            PathBuf::from("/tmp/ticketd/admin-accounts.json")
        );
        assert_eq!(config.bind_addr().port(), 3000);
    }
}
