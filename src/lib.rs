pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};

pub use adapters::WikiClient;
pub use config::{cli::LocalStorage, toml_config::AppConfig};
pub use crate::core::{engine::CraftEngine, materials::MaterialResolver};
pub use utils::error::{CraftError, Result};
