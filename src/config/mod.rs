//! Configuration system
//!
//! - `macros`: the `config_struct!` macro (fields with embedded defaults)
//! - `schemas`: every configuration section
//! - `utils`: load/save/validate and environment overrides
//!
//! The loaded `Config` is passed into each component at construction; there
//! is no global configuration object.

pub mod macros;
mod schemas;
mod utils;

pub use schemas::*;
pub use utils::{apply_env_overrides, load_config_from_path, save_config, validate_config};
