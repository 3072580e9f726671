use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use std::time::Duration;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use newsreader::config::{self, HeadlinesConfig, DEFAULT_BASE_URL, DEFAULT_COUNTRY};
use newsreader::feed::{find_article, FeedState};
use newsreader::render;
use newsreader::storage::FileStore;
use newsreader::{bookmarked_ids, Article, BookmarkStore, HeadlinesClient};

const WIDTH: usize = 80;

#[derive(Parser)]
#[command(name = "newsreader")]
#[command(about = "Read top headlines and keep local bookmarks", long_about = None)]
struct Cli {
    /// Credential for the headlines endpoint
    #[arg(long, env = "NEWSREADER_API_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,

    #[arg(long, env = "NEWSREADER_BASE_URL", default_value = DEFAULT_BASE_URL, global = true)]
    base_url: String,

    #[arg(short, long, env = "NEWSREADER_COUNTRY", default_value = DEFAULT_COUNTRY, global = true)]
    country: String,

    /// Where bookmarks are kept (defaults to the XDG data directory)
    #[arg(long, global = true)]
    data_dir: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List top headlines
    Headlines,
    /// List bookmarked articles
    Bookmarks,
    /// Bookmark or unbookmark an article
    Toggle {
        #[arg(short, long)]
        id: String,
    },
    /// Show a single article
    Show {
        #[arg(short, long)]
        id: String,
    },
}

impl Cli {
    /// Builds the headlines client, or `None` when no API key is configured.
    fn headlines_client(&self) -> Result<Option<HeadlinesClient>> {
        let Some(api_key) = self.api_key.clone() else {
            return Ok(None);
        };

        let mut headlines_config = HeadlinesConfig::new(api_key)
            .with_base_url(self.base_url.clone())
            .with_default_country(self.country.clone());
        if let Some(secs) = self.timeout {
            headlines_config = headlines_config.with_timeout(Duration::from_secs(secs));
        }

        HeadlinesClient::new(headlines_config)
            .map(Some)
            .context("Failed to build HTTP client")
    }

    fn require_headlines_client(&self) -> Result<HeadlinesClient> {
        self.headlines_client()?
            .ok_or_else(|| anyhow!("No API key: pass --api-key or set NEWSREADER_API_KEY"))
    }

    async fn bookmark_store(&self) -> Result<BookmarkStore<FileStore>> {
        let data_dir = config::resolve_data_dir(self.data_dir.as_deref());
        let storage = FileStore::open(&data_dir)
            .await
            .with_context(|| format!("Failed to open data directory {}", data_dir.display()))?;
        Ok(BookmarkStore::new(storage))
    }
}

async fn lookup(cli: &Cli, store: &BookmarkStore<FileStore>, id: &str) -> Result<(Article, bool)> {
    let client = cli.headlines_client()?;
    if client.is_none() {
        warn!("No API key configured, looking up {} in bookmarks only", id);
    }
    find_article(client.as_ref(), store, id)
        .await
        .ok_or_else(|| anyhow!("Article not found: {}", id))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Headlines => {
            let client = cli.require_headlines_client()?;
            let store = cli.bookmark_store().await?;
            let feed = FeedState::load(&client, &store, &cli.country).await;
            print!("{}", render::render_list(feed.articles(), feed.bookmarked(), WIDTH));
        }
        Commands::Bookmarks => {
            let store = cli.bookmark_store().await?;
            let bookmarks = store.get_all().await;
            if bookmarks.is_empty() {
                println!("No bookmarked articles yet");
            } else {
                print!("{}", render::render_list(&bookmarks, &bookmarked_ids(&bookmarks), WIDTH));
            }
        }
        Commands::Toggle { ref id } => {
            let store = cli.bookmark_store().await?;
            let (article, _) = lookup(&cli, &store, id).await?;
            let outcome = store.toggle(&article).await;
            print!("{}", render::render_toggle(outcome, &article));
        }
        Commands::Show { ref id } => {
            let store = cli.bookmark_store().await?;
            let (article, bookmarked) = lookup(&cli, &store, id).await?;
            print!("{}", render::render_article(&article, bookmarked, WIDTH));
        }
    }

    Ok(())
}
