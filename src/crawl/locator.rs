//! Sitemap discovery via robots.txt.

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use crate::config::CrawlConfig;

// Case-sensitive match on the directive name.
static SITEMAP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"Sitemap:\s*(\S+)").unwrap());

/// Normalize a base site address: prepend https:// when no scheme is given
/// and strip any trailing slash.
pub fn normalize_base(base_url: &str) -> String {
    let base = if base_url.starts_with("http") {
        base_url.to_string()
    } else {
        format!("https://{}", base_url)
    };
    base.trim_end_matches('/').to_string()
}

/// Return the site's sitemap URL. Checks robots.txt for a `Sitemap:`
/// directive and returns the first one found; on any failure (network
/// error, non-200 status, no directive) falls back to `<base>/sitemap.xml`.
/// The fallback is a best-effort guess, not a verified address.
pub async fn discover_sitemap(client: &Client, base_url: &str, config: &CrawlConfig) -> String {
    let base = normalize_base(base_url);
    let robots_url = format!("{}/robots.txt", base);

    match client
        .get(&robots_url)
        .timeout(Duration::from_secs(config.robots_timeout_secs))
        .send()
        .await
    {
        Ok(response) if response.status() == reqwest::StatusCode::OK => {
            if let Ok(body) = response.text().await {
                if let Some(captures) = SITEMAP_RE.captures(&body) {
                    return captures[1].to_string();
                }
                debug!(url = %robots_url, "robots.txt has no Sitemap directive");
            }
        }
        Ok(response) => {
            debug!(url = %robots_url, status = %response.status(), "robots.txt fetch returned non-200");
        }
        Err(e) => {
            debug!(url = %robots_url, error = %e, "robots.txt fetch failed");
        }
    }

    format!("{}/sitemap.xml", base)
}
