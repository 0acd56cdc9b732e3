//! Process settings: HTTP binding and database connection.

/// Default request body limit: 1 MiB.
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub body_limit: usize,
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "127.0.0.1".into(),
            port: 3000,
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }
}

/// Either a full `url` (PostgreSQL or `sqlite:`) or the discrete PostgreSQL settings.
#[derive(Clone, PartialEq)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub max_connections: u32,
    /// Create the `agence` and `vehicule` tables at startup when missing.
    pub auto_migrate: bool,
}

impl DatabaseConfig {
    /// Single-connection config for a URL; an in-memory SQLite database must not be split across connections.
    pub fn from_url(url: impl Into<String>) -> Self {
        DatabaseConfig {
            url: Some(url.into()),
            max_connections: 1,
            ..Default::default()
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig {
            url: None,
            host: "localhost".into(),
            port: 5432,
            user: "postgres".into(),
            password: String::new(),
            name: "agence_vehicule".into(),
            max_connections: 5,
            auto_migrate: true,
        }
    }
}

// Hand-written so the password never reaches the logs.
impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &self.url.as_ref().map(|_| "<set>"))
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("name", &self.name)
            .field("max_connections", &self.max_connections)
            .field("auto_migrate", &self.auto_migrate)
            .finish()
    }
}
