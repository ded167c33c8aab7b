#[cfg(feature = "cli")]
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::core::repository::{LoadStatus, SheetRepository};
pub use crate::core::source::HttpSheetSource;
pub use crate::core::store::SheetStore;
pub use crate::utils::error::{Result, SheetError};
