use serde::Serialize;

use crate::middleware::response::{ApiResponse, ApiResult};
use crate::platforms::{all_scrape_defaults, Platform, ScrapeDefaults};

#[derive(Debug, Serialize)]
pub struct PlatformEntry {
    pub platform: Platform,
    pub tag: &'static str,
    #[serde(flatten)]
    pub defaults: ScrapeDefaults,
}

/// GET /api/platforms - The static per-platform scrape defaults table.
pub async fn list() -> ApiResult<Vec<PlatformEntry>> {
    let entries = all_scrape_defaults()
        .iter()
        .map(|(platform, defaults)| PlatformEntry {
            platform: *platform,
            tag: platform.tag(),
            defaults: *defaults,
        })
        .collect();
    Ok(ApiResponse::success(entries))
}
