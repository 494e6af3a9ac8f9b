pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, toml_config::TomlConfig};

pub use adapters::http::ApiClient;
pub use core::{etl::EtlEngine, pipeline::DogHousePipeline};
pub use domain::doghouse::DogHouse;
pub use domain::model::{Answer, Breed, Dog, RunReport};
pub use utils::error::{DogHouseError, Result};
