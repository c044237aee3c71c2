//! Wire Config is a registry of configs which are injected like any other dependency.
//!
//! Configs are plain structs registered by type. The [ConfigProvider] answers requests for them
//! directly, or binds all of them into a [wire_di::ContextBuilder] so components receive their
//! configuration through ordinary field, constructor or method injection.
//!
//! # Examples
//!
//! ```rust
//! use wire_config::ConfigProvider;
//!
//! struct AppConfig {
//!     host: String,
//!     port: u16,
//! }
//!
//! let mut configs = ConfigProvider::new();
//! configs
//!     .add_config(AppConfig {
//!         host: "localhost".to_string(),
//!         port: 8080,
//!     })
//!     .unwrap();
//!
//! let config = configs.get_config::<AppConfig>().unwrap();
//! assert_eq!(config.host, "localhost");
//! assert_eq!(config.port, 8080);
//! ```

pub mod errors;
pub mod provider;

pub use errors::ConfigError;
pub use provider::ConfigProvider;
