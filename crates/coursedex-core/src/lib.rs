//! coursedex-core: Catalog model, configuration, errors, and logging for coursedex.

pub mod api;
pub mod availability;
pub mod build_info;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod paths;

pub use availability::Availability;
pub use config::Config;
pub use error::{Error, Result};
pub use model::Catalog;
