//! Server configuration from flags and environment.

use std::net::SocketAddr;

use clap::Parser;

use crate::db::DEFAULT_MAX_CONNECTIONS;

#[derive(Parser, Debug, Clone)]
#[command(name = "todo-server", version, about = "HTTP CRUD service for todo items")]
pub struct ServerConfig {
    /// Address to bind to
    #[arg(long, short = 'b', env = "TODO_BIND", default_value = "127.0.0.1:8080")]
    pub bind: SocketAddr,

    /// SQLite connection string; `sqlite::memory:` keeps everything in RAM
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://todos.db")]
    pub database_url: String,

    /// Maximum pooled connections for file-backed databases
    #[arg(long, env = "TODO_MAX_CONNECTIONS", default_value_t = DEFAULT_MAX_CONNECTIONS)]
    pub max_connections: u32,

    /// Browser origin allowed by CORS
    #[arg(long, env = "TODO_CORS_ORIGIN", default_value = "http://localhost:4200")]
    pub cors_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8080)),
            database_url: "sqlite://todos.db".to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            cors_origin: "http://localhost:4200".to_string(),
        }
    }
}
