use anyhow::{bail, Context, Result};
use std::fs;
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

use crate::config::Config;
use crate::crawl;
use crate::crawl::PageTitle;
use crate::llm::client::LlmClient;
use crate::llm::{factory, prompts};
use crate::pacing::{FixedDelayPacer, Pacer};
use crate::wxr::{Post, WxrBuilder};

#[allow(clippy::too_many_arguments)]
pub async fn run(
    url: String,
    domain_filter: Option<String>,
    max_posts: usize,
    output: String,
    site_title: Option<String>,
    config_path: Option<String>,
    model_override: Option<String>,
    dry_run: bool,
) -> Result<()> {
    // Load config (explicit path, working dir, or user config dir)
    let mut config = Config::load_with_path(config_path)?;

    // Apply CLI overrides
    if let Some(ref model) = model_override {
        info!("CLI override: model = {}", model);
        config.llm.model = model.clone();
    }

    let base = crawl::normalize_base(&url);
    let client = crawl::build_client(&config.crawl)?;

    // Locate and expand the sitemap
    let sitemap_url = crawl::discover_sitemap(&client, &base, &config.crawl).await;
    info!("Discovered sitemap: {}", sitemap_url);

    let mut urls = crawl::expand_sitemap(&client, &sitemap_url, &config.crawl).await?;
    info!("Sitemap expanded to {} page URLs", urls.len());

    // Filter page URLs if a pattern was given
    if let Some(ref filter) = domain_filter {
        urls.retain(|u| u.contains(filter.as_str()));
        info!("{} URLs match filter {:?}", urls.len(), filter);
    }

    if urls.is_empty() {
        bail!("No URLs found.");
    }

    urls.truncate(max_posts);

    // Create LLM client via factory
    let llm = factory::create_client(&config, dry_run)?;
    if dry_run {
        info!("Using mock LLM client");
    } else {
        info!(
            "Using {} provider with model {}",
            config.llm.provider, config.llm.model
        );
    }

    let pacer = FixedDelayPacer::new(Duration::from_millis(config.crawl.delay_ms));
    let posts = generate_posts(&client, llm.as_ref(), &pacer, &urls, &base, &config).await?;

    // Assemble and write the export in one operation
    let site_title = site_title.unwrap_or_else(|| default_site_title(&base));
    let xml = WxrBuilder::new(site_title, base).posts(posts).build()?;
    fs::write(&output, xml).with_context(|| format!("failed to write {}", output))?;
    info!("✓ WXR file saved to {}", output);

    Ok(())
}

/// Scrape a title and generate a body for each URL, in order. Posts are
/// numbered from 1; the position doubles as the export post id.
async fn generate_posts(
    client: &reqwest::Client,
    llm: &dyn LlmClient,
    pacer: &dyn Pacer,
    urls: &[String],
    base: &str,
    config: &Config,
) -> Result<Vec<Post>> {
    let mut posts = Vec::with_capacity(urls.len());

    for (i, page_url) in urls.iter().enumerate() {
        let id = (i + 1) as u32;

        let title = match crawl::fetch_title(client, page_url, &config.crawl).await {
            PageTitle::Extracted(title) => title,
            PageTitle::Missing => {
                warn!("No title for {}, using placeholder", page_url);
                format!("Untitled Post {}", id)
            }
        };

        info!("[{}/{}] Generating post for {:?}", id, urls.len(), title);
        let content = llm.complete(&prompts::blog_post(&title)).await?;

        posts.push(Post {
            id,
            title,
            content,
            guid: format!("{}/?p={}", base.trim_end_matches('/'), id),
        });

        // Respect rate limits and politeness
        pacer.pause().await;
    }

    Ok(posts)
}

fn default_site_title(base: &str) -> String {
    Url::parse(base)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_else(|| base.to_string())
}
