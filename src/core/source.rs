use crate::core::{ConfigProvider, SheetSource};
use crate::domain::model::{SheetData, SheetEnvelope};
use crate::utils::error::{Result, SheetError};
use reqwest::Client;

/// Fetches the sheet dataset from the remote question-tracker API.
pub struct HttpSheetSource<C: ConfigProvider> {
    config: C,
    client: Client,
}

impl<C: ConfigProvider> HttpSheetSource<C> {
    pub fn new(config: C) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    fn sheet_url(&self) -> String {
        format!(
            "{}/get-sheet-by-slug/{}",
            self.config.api_endpoint().trim_end_matches('/'),
            self.config.sheet_slug()
        )
    }
}

#[async_trait::async_trait]
impl<C: ConfigProvider> SheetSource for HttpSheetSource<C> {
    async fn fetch_sheet(&self) -> Result<SheetData> {
        let url = self.sheet_url();
        tracing::debug!("Making API request to: {}", url);

        let response = self.client.get(&url).send().await?;
        tracing::debug!("API response status: {}", response.status());

        let body = response.error_for_status()?.text().await?;
        let envelope: SheetEnvelope = serde_json::from_str(&body)?;

        if !envelope.status.success {
            return Err(SheetError::ApiRejected {
                message: envelope.status.message,
            });
        }

        envelope.data.ok_or(SheetError::ApiRejected {
            message: "response envelope carried no data".to_string(),
        })
    }
}
