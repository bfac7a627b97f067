//! CLI entry point for blogsmith

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "blogsmith")]
#[command(version)]
#[command(about = "Build a static blog from Markdown posts and Tera templates", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    /// Override base_url from _config.yml and BASE_URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the site (default)
    #[command(alias = "g")]
    Generate {
        /// Skip malformed posts with a warning instead of aborting
        #[arg(long)]
        skip_invalid: bool,

        /// Delete the output directory before writing
        #[arg(long)]
        clean: bool,
    },

    /// Delete the output directory
    Clean,

    /// List posts or categories
    List {
        /// Type of content to list (post, category)
        #[arg(default_value = "post")]
        r#type: String,
    },

    /// Create a new post
    New {
        /// Title of the new post
        title: String,

        /// Category of the new post
        #[arg(short = 'C', long, default_value = "uncategorized")]
        category: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "blogsmith=debug,info"
    } else {
        "blogsmith=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to read current directory")?,
    };

    let mut blog = blogsmith::Blog::new(&base_dir)?;
    if let Some(url) = cli.base_url {
        blog.config.base_url = url;
    }

    let command = cli.command.unwrap_or(Commands::Generate {
        skip_invalid: false,
        clean: false,
    });

    match command {
        Commands::Generate {
            skip_invalid,
            clean,
        } => {
            blog.config.skip_invalid_posts |= skip_invalid;
            blog.config.clean_output |= clean;

            tracing::info!("Generating static files...");
            let report = blog.generate()?;
            if report.skipped > 0 {
                tracing::warn!("{} posts were skipped", report.skipped);
            }
            println!("Blog generated successfully.");
            println!(
                "  {} posts, {} categories, {} assets",
                report.posts, report.categories, report.assets
            );
        }

        Commands::Clean => {
            tracing::info!("Cleaning output folder...");
            blog.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::List { r#type } => {
            blogsmith::commands::list::run(&blog, &r#type)?;
        }

        Commands::New { title, category } => {
            let path = blog.new_post(&title, &category)?;
            println!("Created: {:?}", path);
        }
    }

    Ok(())
}
