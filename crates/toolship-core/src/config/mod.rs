//! Configuration loading
//!
//! Looks for `toolship.toml` in the working directory, then in the user's
//! config directory, and falls back to built-in defaults.

pub mod parser;
pub mod paths;
pub mod schema;
pub mod store;

pub use parser::{parse_toolship_toml, parse_toolship_toml_str};
pub use schema::{
    ReleaseConfig, RemoteConfig, ScheduleConfig, ServiceConfig, ToolConfig, ToolshipConfig,
};
pub use store::{ConfigSource, ConfigStore};
