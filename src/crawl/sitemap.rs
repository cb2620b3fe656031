//! Sitemap fetching and expansion.
//!
//! A sitemap is either a `<urlset>` of page URLs or a `<sitemapindex>`
//! pointing at further sitemaps. Expansion flattens the whole tree into one
//! page-URL list, depth-first in document order.

use quick_xml::events::Event;
use quick_xml::Reader;
use reqwest::Client;
use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tracing::{debug, warn};

use super::CrawlError;
use crate::config::CrawlConfig;

/// Fetch a sitemap and flatten it (and any nested sitemap indexes) into the
/// list of page URLs it covers. Fetch or parse failures are fatal; there is
/// no retry.
pub async fn expand_sitemap(
    client: &Client,
    sitemap_url: &str,
    config: &CrawlConfig,
) -> Result<Vec<String>, CrawlError> {
    let mut visited = HashSet::new();
    expand_recursive(client, sitemap_url.to_string(), config, &mut visited).await
}

// Boxed future: async recursion needs an indirection for a sized return
// type. Expansion stays sequential so document order is preserved.
fn expand_recursive<'a>(
    client: &'a Client,
    url: String,
    config: &'a CrawlConfig,
    visited: &'a mut HashSet<String>,
) -> Pin<Box<dyn Future<Output = Result<Vec<String>, CrawlError>> + Send + 'a>> {
    Box::pin(async move {
        // A sitemap index that references itself (directly or through a
        // chain) would otherwise recurse forever.
        if !visited.insert(url.clone()) {
            warn!(url = %url, "sitemap already expanded, skipping cycle");
            return Ok(Vec::new());
        }

        debug!(url = %url, "fetching sitemap");

        let response = client
            .get(&url)
            .timeout(Duration::from_secs(config.fetch_timeout_secs))
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|source| CrawlError::SitemapFetch {
                url: url.clone(),
                source,
            })?;

        let xml = response
            .text()
            .await
            .map_err(|source| CrawlError::SitemapFetch {
                url: url.clone(),
                source,
            })?;

        let locs = parse_locs(&xml).map_err(|message| CrawlError::SitemapParse {
            url: url.clone(),
            message,
        })?;

        if is_sitemap_index(&xml) {
            let mut pages = Vec::new();
            for child in locs {
                pages.extend(expand_recursive(client, child, config, visited).await?);
            }
            Ok(pages)
        } else {
            Ok(locs)
        }
    })
}

/// Check whether the XML document is a sitemap index.
pub fn is_sitemap_index(xml: &str) -> bool {
    xml.contains("<sitemapindex")
}

/// Collect all `<loc>` text values in document order. In a `<urlset>` these
/// are page URLs; in a `<sitemapindex>` they are child sitemap URLs.
pub fn parse_locs(xml: &str) -> Result<Vec<String>, String> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut locs = Vec::new();
    let mut in_loc = false;
    // quick-xml 0.38 splits text around entity references into separate `Text`
    // and `GeneralRef` events, so accumulate the full unescaped `<loc>` value
    // across those fragments before pushing it.
    let mut buf = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"loc" => {
                in_loc = true;
                buf.clear();
            }
            Ok(Event::End(e)) if e.local_name().as_ref() == b"loc" => {
                in_loc = false;
                let value = buf.trim();
                if !value.is_empty() {
                    locs.push(value.to_string());
                }
            }
            Ok(Event::Text(text)) if in_loc => {
                let decoded = text.decode().map_err(|e| e.to_string())?;
                buf.push_str(&decoded);
            }
            Ok(Event::GeneralRef(r)) if in_loc => {
                let name = r.decode().map_err(|e| e.to_string())?;
                let raw = format!("&{};", name);
                let unescaped = quick_xml::escape::unescape(&raw).map_err(|e| e.to_string())?;
                buf.push_str(&unescaped);
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(format!("XML parse error: {}", e)),
            _ => {}
        }
    }

    Ok(locs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_locs_basic() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url>
    <loc>https://example.com/page1</loc>
    <lastmod>2024-01-15</lastmod>
  </url>
  <url>
    <loc>https://example.com/page2</loc>
  </url>
</urlset>"#;

        let locs = parse_locs(xml).unwrap();
        assert_eq!(
            locs,
            vec![
                "https://example.com/page1".to_string(),
                "https://example.com/page2".to_string()
            ]
        );
    }

    #[test]
    fn test_parse_locs_preserves_document_order() {
        let xml = r#"<urlset>
  <url><loc>https://example.com/c</loc></url>
  <url><loc>https://example.com/a</loc></url>
  <url><loc>https://example.com/b</loc></url>
</urlset>"#;

        let locs = parse_locs(xml).unwrap();
        assert_eq!(locs[0], "https://example.com/c");
        assert_eq!(locs[1], "https://example.com/a");
        assert_eq!(locs[2], "https://example.com/b");
    }

    #[test]
    fn test_parse_locs_unescapes_entities() {
        let xml = r#"<urlset>
  <url><loc>https://example.com/page?foo=1&amp;bar=2</loc></url>
</urlset>"#;

        let locs = parse_locs(xml).unwrap();
        assert_eq!(locs[0], "https://example.com/page?foo=1&bar=2");
    }

    #[test]
    fn test_parse_locs_empty_sitemap() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
</urlset>"#;

        let locs = parse_locs(xml).unwrap();
        assert!(locs.is_empty());
    }

    #[test]
    fn test_parse_locs_malformed_xml() {
        let xml = r#"<urlset><url><loc>https://example.com/page1</url></urlset>"#;
        assert!(parse_locs(xml).is_err());
    }

    #[test]
    fn test_is_sitemap_index_detection() {
        let index_xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <sitemap><loc>https://example.com/sitemap-1.xml</loc></sitemap>
</sitemapindex>"#;

        let urlset_xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url><loc>https://example.com/page1</loc></url>
</urlset>"#;

        assert!(is_sitemap_index(index_xml));
        assert!(!is_sitemap_index(urlset_xml));
    }

    #[test]
    fn test_parse_locs_of_index_returns_child_sitemaps() {
        let xml = r#"<sitemapindex>
  <sitemap><loc>https://example.com/sitemap-1.xml</loc></sitemap>
  <sitemap><loc>https://example.com/sitemap-2.xml</loc></sitemap>
</sitemapindex>"#;

        let locs = parse_locs(xml).unwrap();
        assert_eq!(locs.len(), 2);
        assert_eq!(locs[0], "https://example.com/sitemap-1.xml");
    }
}
