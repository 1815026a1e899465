//! Configuration module for Herald.

mod app_config;
mod section;

pub use app_config::{AppConfig, ServerConfig};
pub use section::PluginSection;
