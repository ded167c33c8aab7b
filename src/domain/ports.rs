use crate::domain::model::SheetData;
use crate::utils::error::Result;
use async_trait::async_trait;

/// Where the initial dataset comes from. Fetched exactly once per session;
/// everything after that is in-memory.
#[async_trait]
pub trait SheetSource: Send + Sync {
    async fn fetch_sheet(&self) -> Result<SheetData>;
}

pub trait ConfigProvider: Send + Sync {
    fn api_endpoint(&self) -> &str;
    fn sheet_slug(&self) -> &str;
}
