use config::{Config, ConfigError, Environment};
use lazy_static::lazy_static;
use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct Settings {
    pub service_name: String,
    pub listen_port: String,
    pub database_url: String,
    pub database_pool_max_connections: u32,
    //storage
    pub s3_endpoint: String,
    pub s3_region: String,
    pub s3_bucket_name: String,
    //llm
    pub ai_endpoint: String,
    pub ai_provider: String,
    pub ai_model: String,
    pub ai_key: String,
    //queue
    pub queue_max_attempts: i32,
    pub queue_backoff_base_ms: i64,
    pub queue_poll_interval_ms: u64,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let conf = Config::builder()
            .add_source(Environment::default())
            .set_default("service_name", "cveval")?
            .set_default("listen_port", "8000")?
            .set_default("database_pool_max_connections", 5)?
            .set_default("queue_max_attempts", 3)?
            .set_default("queue_backoff_base_ms", 5000)?
            .set_default("queue_poll_interval_ms", 1000)?
            .build()?;
        let mut s: Settings = conf.try_deserialize()?;
        match s.ai_provider.as_str(){
        "ollama" => {
            s.ai_key = "ollama".into();
            s.ai_endpoint = "http://localhost:11434/v1".into();
            if s.ai_model.is_empty(){
                s.ai_model = "gemma3:12b".into();
            }
        },
        "openai" => {
            s.ai_endpoint = "https://api.openai.com/v1".into();
            if s.ai_model.is_empty(){
                s.ai_model = "gpt-4o-mini".into();
            }
        },
        "gemini" => {
            s.ai_endpoint = "https://generativelanguage.googleapis.com/v1beta/openai".into();
            if s.ai_model.is_empty(){
                s.ai_model = "gemini-2.5-flash".into();
            }
        },
        _ => {}
    }
        Ok(s)
    }
}

lazy_static! {
    pub static ref settings: Settings = Settings::new().expect("improperly configured");
}
