//! Crawl layer: sitemap discovery, sitemap expansion, and page title
//! extraction. All HTTP goes through a shared client built here.

pub mod locator;
pub mod page;
pub mod sitemap;

pub use locator::{discover_sitemap, normalize_base};
pub use page::{fetch_title, PageTitle};
pub use sitemap::expand_sitemap;

use anyhow::{Context, Result};
use reqwest::Client;
use thiserror::Error;

use crate::config::CrawlConfig;

/// Crawl failures that abort the run. Per-page title failures are not
/// errors; they degrade to [`PageTitle::Missing`].
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("failed to fetch sitemap {url}: {source}")]
    SitemapFetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("invalid sitemap XML at {url}: {message}")]
    SitemapParse { url: String, message: String },
}

/// Build the HTTP client shared by all crawl requests. Timeouts are applied
/// per request since robots.txt and page fetches use different budgets.
pub fn build_client(config: &CrawlConfig) -> Result<Client> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()
        .context("failed to build HTTP client")
}
