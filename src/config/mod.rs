use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_non_empty_string, validate_url, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "qsheet")]
#[command(about = "Track progress through a curated practice question sheet")]
pub struct CliConfig {
    #[arg(
        long,
        default_value = "https://node.codolio.com/api/question-tracker/v1/sheet/public"
    )]
    pub api_endpoint: String,

    #[arg(long, default_value = "striver-sde-sheet")]
    pub sheet_slug: String,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl ConfigProvider for CliConfig {
    fn api_endpoint(&self) -> &str {
        &self.api_endpoint
    }

    fn sheet_slug(&self) -> &str {
        &self.sheet_slug
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_url("api_endpoint", &self.api_endpoint)?;
        validate_non_empty_string("sheet_slug", &self.sheet_slug)?;
        Ok(())
    }
}
