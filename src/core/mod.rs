pub mod projector;
pub mod repository;
pub mod source;
pub mod store;

pub use crate::domain::model::{SheetData, SheetSnapshot};
pub use crate::domain::ports::{ConfigProvider, SheetSource};
pub use crate::utils::error::Result;
