use dotenvy::dotenv;
use std::env;

pub fn load_env() {
    dotenv().ok();
}

pub fn get_env(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("Missing env var: {}", key))
}

// BIND_ADDR overrides the default listen address.
pub fn bind_addr() -> String {
    env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string())
}
