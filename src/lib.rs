//! wxrgen - Rebuild a site's posts as a WordPress WXR import file
//!
//! Crawls a website's sitemap, scrapes each page's title, generates a
//! replacement article body through an LLM chat-completions API, and
//! assembles the results into a WXR (WordPress eXtended RSS) document
//! ready for import.

pub mod cli;
pub mod config;
pub mod crawl;
pub mod llm;
pub mod pacing;
pub mod util;
pub mod wxr;
