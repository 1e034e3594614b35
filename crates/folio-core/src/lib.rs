pub mod config;
pub mod error;
pub mod server;

pub use config::{AppConfig, CursorConfig, EasingType, NavConfig, ScrollConfig, ServerConfig};
pub use error::{Error, Result};
pub use server::AssetServer;
