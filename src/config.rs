use std::env;
use std::path::PathBuf;

use dotenv::dotenv;

/// Process configuration, read from the environment once at startup.
/// `DATABASE_URL` decides the record-store backing: set, the server runs
/// against Postgres with disk-resident uploads; unset, it runs the
/// ephemeral in-memory store with inline image references.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: Option<String>,
    pub upload_dir: PathBuf,
    pub jwt_secret: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();
        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|e| {
            panic!("Failed to get env with name 'JWT_SECRET': {:?}", e);
        });
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|port| port.parse().ok())
                .unwrap_or(8080),
            database_url: env::var("DATABASE_URL").ok(),
            upload_dir: env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("uploads")),
            jwt_secret,
        }
    }
}
