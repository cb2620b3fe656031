//! Per-page title extraction.

use reqwest::Client;
use scraper::{Html, Selector};
use std::time::Duration;
use tracing::debug;

use crate::config::CrawlConfig;

/// Outcome of a title lookup. A page that cannot be fetched or carries no
/// usable `<title>` yields `Missing`; the caller decides the placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageTitle {
    Extracted(String),
    Missing,
}

/// Fetch a page and extract its `<title>` text. Never fails: network
/// errors, non-2xx statuses, and titleless pages all map to `Missing`.
pub async fn fetch_title(client: &Client, url: &str, config: &CrawlConfig) -> PageTitle {
    let response = match client
        .get(url)
        .timeout(Duration::from_secs(config.fetch_timeout_secs))
        .send()
        .await
        .and_then(|r| r.error_for_status())
    {
        Ok(response) => response,
        Err(e) => {
            debug!(url = %url, error = %e, "page fetch failed");
            return PageTitle::Missing;
        }
    };

    match response.text().await {
        Ok(html) => extract_title(&html),
        Err(e) => {
            debug!(url = %url, error = %e, "failed to read page body");
            PageTitle::Missing
        }
    }
}

/// Extract the trimmed text of the first `<title>` element.
pub fn extract_title(html: &str) -> PageTitle {
    let document = Html::parse_document(html);
    let selector = match Selector::parse("title") {
        Ok(selector) => selector,
        Err(_) => return PageTitle::Missing,
    };

    document
        .select(&selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|title| !title.is_empty())
        .map(PageTitle::Extracted)
        .unwrap_or(PageTitle::Missing)
}
