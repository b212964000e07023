//! CLI entry point for folio-rs

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use folio_rs::{commands, server, Folio};

#[derive(Parser)]
#[command(name = "folio-rs")]
#[command(version)]
#[command(about = "Content pipeline for a markdown portfolio blog", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List site content
    #[command(alias = "ls")]
    List {
        /// Type of content to list (posts, slugs, featured, tags, categories)
        #[arg(default_value = "posts")]
        r#type: String,
    },

    /// Show a single post
    Show {
        slug: String,

        /// Print the post view as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print a post's table of contents
    Toc {
        slug: String,

        /// Print the nested HTML list instead of text
        #[arg(long)]
        html: bool,
    },

    /// Print the sitemap
    Sitemap,

    /// Print robots.txt
    Robots,

    /// Print the Atom feed
    Feed,

    /// Report posts with malformed front-matter
    Check,

    /// Precompute every post and write the site documents
    #[command(alias = "b")]
    Build,

    /// Clean the public folder
    Clean,

    /// Create a new post
    New {
        /// Title of the new post
        title: String,

        /// Slug for the new post (defaults to the slugified title)
        #[arg(short, long)]
        slug: Option<String>,
    },

    /// Start the JSON server
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "folio_rs=debug,info"
    } else {
        "folio_rs=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    if let Commands::Version = cli.command {
        println!("folio-rs version {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let folio = Folio::new(&base_dir)?;

    match cli.command {
        Commands::List { r#type } => commands::list::run(&folio, &r#type)?,

        Commands::Show { slug, json } => commands::show::run(&folio, &slug, json)?,

        Commands::Toc { slug, html } => commands::show::run_toc(&folio, &slug, html)?,

        Commands::Sitemap => commands::documents::run(&folio, "sitemap")?,

        Commands::Robots => commands::documents::run(&folio, "robots")?,

        Commands::Feed => commands::documents::run(&folio, "feed")?,

        Commands::Check => commands::check::run(&folio)?,

        Commands::Build => {
            tracing::info!("Building into {:?}...", folio.public_dir);
            let report = folio.build()?;
            println!("Built {} posts in {:?}", report.posts, report.elapsed);
        }

        Commands::Clean => {
            tracing::info!("Cleaning public folder...");
            folio.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::New { title, slug } => {
            let path = folio.new_post(&title, slug.as_deref())?;
            println!("Created: {}", path.display());
        }

        Commands::Server { port, ip } => {
            tracing::info!("Starting server at http://{}:{}", ip, port);
            server::start(&folio, &ip, port).await?;
        }

        Commands::Version => unreachable!(),
    }

    Ok(())
}
