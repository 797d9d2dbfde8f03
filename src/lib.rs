pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::config::{cli::LocalStorage, toml_config::TomlConfig};
pub use crate::core::{
    engine::ExperimentEngine, payoff::PayoffRule, pipeline::SessionPipeline, session::Session,
};
pub use crate::domain::currency::Currency;
pub use crate::domain::model::{Group, Player, Role, Subsession};
pub use crate::utils::error::{GameError, Result};
