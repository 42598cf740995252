mod build;
mod config;
mod db;
mod error;
mod model;
mod pages;
mod pipeline;
mod routes;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::config::Settings;
use crate::db::{RestaurantStore, SqliteStore};
use crate::pipeline::slug::location_slug;
use crate::routes::Route;

#[derive(Parser)]
#[command(name = "pho_listings", about = "Vietnamese restaurant directory pages from SQLite")]
struct Cli {
    /// SQLite database (overrides PHO_DB_PATH / pho.toml)
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    /// Results per listing page
    #[arg(long, global = true)]
    page_size: Option<usize>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Listing page for a state and city
    Listing {
        state: String,
        city: String,
        #[arg(default_value = "1")]
        page: String,
    },
    /// Detail page for one restaurant
    Restaurant { id: i64 },
    /// Cities of one state
    State { state: String },
    /// Search restaurants by name or address (empty term lists everything)
    Search {
        #[arg(default_value = "")]
        term: String,
    },
    /// Render whatever page a URL path resolves to
    Route { path: String },
    /// Print every static route
    Routes,
    /// Render every page to JSON files
    Build {
        /// Output directory (default: out_dir setting)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let mut settings = Settings::load()?;
    if let Some(db) = cli.db {
        settings.db_path = db;
    }
    if let Some(page_size) = cli.page_size {
        settings.page_size = page_size;
    }
    let ctx = settings.pipeline_context()?;
    let store = SqliteStore::open(&settings.db_path)
        .with_context(|| format!("Cannot open restaurant database {:?}", settings.db_path))?;

    let result = match cli.command {
        Commands::Listing { state, city, page } => {
            let route = Route::parse(&format!(
                "/{}/{}/{}",
                location_slug(&state),
                location_slug(&city),
                page
            ))?;
            print_page(&pages::render(&store, &ctx, &route)?)
        }
        Commands::Restaurant { id } => {
            let record = pipeline::detail::find_restaurant(store.select_by_id(id), id)?;
            let view = pipeline::detail::assemble_detail(&record, &ctx);
            print_page(&pages::Page::Restaurant(view))
        }
        Commands::State { state } => {
            let route = Route::parse(&format!("/{}", location_slug(&state)))?;
            print_page(&pages::render(&store, &ctx, &route)?)
        }
        Commands::Search { term } => print_page(&pages::search(&store, &term)),
        Commands::Route { path } => {
            let route = Route::parse(&path)?;
            print_page(&pages::render(&store, &ctx, &route)?)
        }
        Commands::Routes => {
            let routes = build::static_routes(&store, &ctx)?;
            for route in &routes {
                println!("{}", route.path());
            }
            eprintln!("{} routes", routes.len());
            Ok(())
        }
        Commands::Build { out } => {
            let out = out.unwrap_or_else(|| settings.out_dir.clone());
            let stats = build::build_site(&store, &ctx, &out)?;
            println!(
                "Wrote {} states, {} cities, {} listing pages, {} restaurant pages to {:?} ({} skipped).",
                stats.states, stats.cities, stats.listings, stats.restaurants, out, stats.skipped
            );
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        eprintln!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn print_page(page: &pages::Page) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(page)?);
    Ok(())
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
