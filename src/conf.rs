use config::{Config, ConfigError, Environment};
use lazy_static::lazy_static;
use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct Settings {
    pub service_name: String,
    pub listen_port: String,
    pub database_url: String,
    pub database_pool_max_connections: u32,
    pub upload_dir: String,
    pub cookie_secure: bool,
    pub session_days: i64,
    pub session_remember_days: i64,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let conf = Config::builder()
            .set_default("service_name", "joblite")?
            .set_default("listen_port", "8000")?
            .set_default("database_url", "sqlite://joblite.db")?
            .set_default("database_pool_max_connections", 5)?
            .set_default("upload_dir", "uploads")?
            .set_default("cookie_secure", false)?
            .set_default("session_days", 1)?
            .set_default("session_remember_days", 30)?
            .add_source(Environment::default())
            .build()?;
        conf.try_deserialize()
    }
}

lazy_static! {
    pub static ref settings: Settings = Settings::new().expect("improperly configured");
}
