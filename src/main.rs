use anyhow::Result;
use clap::{Parser, Subcommand};

mod cli;
mod config;
mod crawl;
mod llm;
mod pacing;
mod util;
mod wxr;

#[derive(Parser)]
#[command(name = "wxrgen", version)]
#[command(about = "Generate a WordPress WXR import file from a site's sitemap", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Crawl a site's sitemap and rebuild its posts as a WXR export
    Generate {
        /// Base website URL (e.g. https://example.com)
        url: String,

        /// Substring to filter page URLs (optional)
        #[arg(long)]
        domain_filter: Option<String>,

        /// Limit number of posts to generate
        #[arg(long, default_value_t = 20)]
        max_posts: usize,

        /// Output WXR file path
        #[arg(short = 'o', long, default_value = "generated_posts.xml")]
        output: String,

        /// Channel title for the export (defaults to the site host)
        #[arg(long)]
        site_title: Option<String>,

        /// Path to config file (defaults to ~/.config/wxrgen/config.toml or ./wxrgen.toml)
        #[arg(long)]
        config: Option<String>,

        /// Override LLM model (e.g., "gpt-4o-mini")
        #[arg(long)]
        model: Option<String>,

        /// Use mock LLM client for testing
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            url,
            domain_filter,
            max_posts,
            output,
            site_title,
            config,
            model,
            dry_run,
        } => {
            cli::generate::run(
                url,
                domain_filter,
                max_posts,
                output,
                site_title,
                config,
                model,
                dry_run,
            )
            .await?;
        }
    }

    Ok(())
}
