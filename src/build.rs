use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

use crate::db::RestaurantStore;
use crate::model::Restaurant;
use crate::pages::Page;
use crate::pipeline::browse::{assemble_search, assemble_state};
use crate::pipeline::detail::assemble_detail;
use crate::pipeline::listing::assemble_listing;
use crate::pipeline::ranking::page_count;
use crate::pipeline::PipelineContext;
use crate::routes::Route;

const CITY_CHUNK: usize = 50;

/// All records of one (state, city) pair, as fetched once at build time.
struct CityBatch {
    state: String,
    city: String,
    records: Vec<Restaurant>,
}

struct RenderedPage {
    route: Route,
    body: String,
}

#[derive(Debug, Default, Serialize)]
pub struct BuildStats {
    pub states: usize,
    pub cities: usize,
    pub listings: usize,
    pub restaurants: usize,
    pub skipped: usize,
}

#[derive(Serialize)]
struct Manifest<'a> {
    generated_at: String,
    stats: &'a BuildStats,
    routes: Vec<String>,
}

/// Every route the site serves: search, one page per state, every listing
/// page of every city, and one detail page per restaurant.
pub fn static_routes(store: &impl RestaurantStore, ctx: &PipelineContext) -> Result<Vec<Route>> {
    let mut routes = vec![Route::Search];
    for state in store.select_states()? {
        routes.push(Route::State {
            state: state.to_lowercase(),
        });
    }
    for (state, city) in store.select_all_state_city_pairs()? {
        let records = store.select_by_state_city(&state, &city)?;
        routes.extend(city_routes(&state, &city, &records, ctx));
    }
    Ok(routes)
}

fn city_routes(state: &str, city: &str, records: &[Restaurant], ctx: &PipelineContext) -> Vec<Route> {
    let state = state.to_lowercase();
    let city = city.to_lowercase();
    let listings = (1..=page_count(records.len(), ctx.page_size)).map(|page| Route::Listing {
        state: state.clone(),
        city: city.clone(),
        page,
    });
    let details = records.iter().map(|r| Route::Restaurant {
        state: state.clone(),
        city: city.clone(),
        id: r.id,
    });
    listings.chain(details).collect()
}

/// Render every static route to `{out_dir}{path}.json`.
///
/// The store is read on this thread; view assembly for each chunk of cities
/// runs on the rayon pool, then files are written in order.
pub fn build_site(
    store: &impl RestaurantStore,
    ctx: &PipelineContext,
    out_dir: &Path,
) -> Result<BuildStats> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output dir {:?}", out_dir))?;

    let mut stats = BuildStats::default();
    let mut routes: Vec<String> = Vec::new();

    // Search landing and state pages
    let index = Page::Search(assemble_search("", store.search("")));
    write_page(out_dir, &Route::Search, &serde_json::to_string_pretty(&index)?)?;
    routes.push(Route::Search.path());

    for state in store.select_states()? {
        let state = state.to_lowercase();
        let route = Route::State {
            state: state.clone(),
        };
        match assemble_state(&state, store.select_cities(&state)) {
            Ok(view) => {
                write_page(out_dir, &route, &serde_json::to_string_pretty(&Page::State(view))?)?;
                routes.push(route.path());
                stats.states += 1;
            }
            Err(e) => {
                warn!("Skipping {}: {}", route.path(), e);
                stats.skipped += 1;
            }
        }
    }

    let pairs = store.select_all_state_city_pairs()?;
    info!("Building listings for {} cities", pairs.len());

    let pb = ProgressBar::new(pairs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} cities ({per_sec})")?
            .progress_chars("#>-"),
    );

    for chunk in pairs.chunks(CITY_CHUNK) {
        let mut batches = Vec::with_capacity(chunk.len());
        for (state, city) in chunk {
            match store.select_by_state_city(state, city) {
                Ok(records) => batches.push(CityBatch {
                    state: state.to_lowercase(),
                    city: city.to_lowercase(),
                    records,
                }),
                Err(e) => {
                    warn!("Skipping {}/{}: {}", state, city, e);
                    stats.skipped += 1;
                }
            }
        }

        let rendered: Vec<Result<Vec<RenderedPage>>> =
            batches.par_iter().map(|b| render_city(b, ctx)).collect();

        for pages in rendered {
            for page in pages? {
                write_page(out_dir, &page.route, &page.body)?;
                match page.route {
                    Route::Listing { .. } => stats.listings += 1,
                    Route::Restaurant { .. } => stats.restaurants += 1,
                    _ => {}
                }
                routes.push(page.route.path());
            }
            stats.cities += 1;
        }
        pb.inc(chunk.len() as u64);
    }
    pb.finish_and_clear();

    let manifest = Manifest {
        generated_at: chrono::Utc::now().to_rfc3339(),
        stats: &stats,
        routes,
    };
    std::fs::write(
        out_dir.join("manifest.json"),
        serde_json::to_string_pretty(&manifest)?,
    )
    .context("Failed to write manifest")?;

    info!(
        "Built {} listing pages and {} restaurant pages across {} cities",
        stats.listings, stats.restaurants, stats.cities
    );
    Ok(stats)
}

fn render_city(batch: &CityBatch, ctx: &PipelineContext) -> Result<Vec<RenderedPage>> {
    let mut pages = Vec::new();
    for route in city_routes(&batch.state, &batch.city, &batch.records, ctx) {
        let page = match &route {
            Route::Listing { state, city, page } => Page::Listing(assemble_listing(
                state,
                city,
                *page,
                Ok(batch.records.clone()),
                ctx,
            )?),
            Route::Restaurant { id, .. } => {
                let Some(record) = batch.records.iter().find(|r| r.id == *id) else {
                    continue;
                };
                Page::Restaurant(assemble_detail(record, ctx))
            }
            _ => continue,
        };
        pages.push(RenderedPage {
            body: serde_json::to_string_pretty(&page)?,
            route,
        });
    }
    Ok(pages)
}

fn output_path(out_dir: &Path, route: &Route) -> PathBuf {
    match route {
        Route::Search => out_dir.join("index.json"),
        _ => out_dir.join(format!("{}.json", route.path().trim_start_matches('/'))),
    }
}

fn write_page(out_dir: &Path, route: &Route, body: &str) -> Result<()> {
    let path = output_path(out_dir, route);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, body).with_context(|| format!("Failed to write {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::fixtures;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("pho_listings_{}_{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn routes_cover_every_page() {
        let store = fixtures::store();
        let routes = static_routes(&store, &PipelineContext::default()).unwrap();
        let paths: Vec<String> = routes.iter().map(Route::path).collect();

        assert_eq!(paths[0], "/");
        assert!(paths.contains(&"/california".to_string()));
        assert!(paths.contains(&"/california/san-jose/2".to_string()));
        assert!(!paths.contains(&"/california/san-jose/3".to_string()));
        assert!(paths.contains(&"/california/san-jose/restaurant/4".to_string()));
        assert!(paths.contains(&"/washington/seattle/1".to_string()));

        let listings = routes.iter().filter(|r| matches!(r, Route::Listing { .. })).count();
        let details = routes.iter().filter(|r| matches!(r, Route::Restaurant { .. })).count();
        // san jose: 2 pages, houston: 1, seattle: 1
        assert_eq!(listings, 4);
        assert_eq!(details, 15);
    }

    #[test]
    fn build_writes_all_pages() {
        let store = fixtures::store();
        let out = scratch_dir("build");
        let stats = build_site(&store, &PipelineContext::default(), &out).unwrap();

        assert_eq!(stats.states, 3);
        assert_eq!(stats.cities, 3);
        assert_eq!(stats.listings, 4);
        assert_eq!(stats.restaurants, 15);
        assert_eq!(stats.skipped, 0);

        assert!(out.join("index.json").exists());
        assert!(out.join("texas.json").exists());
        assert!(out.join("manifest.json").exists());
        assert!(out.join("texas/houston/restaurant/21.json").exists());

        let page2 = std::fs::read_to_string(out.join("california/san-jose/2.json")).unwrap();
        let json: serde_json::Value = serde_json::from_str(&page2).unwrap();
        assert_eq!(json["kind"], "listing");
        assert_eq!(json["cards"].as_array().map(|c| c.len()), Some(12));
        assert_eq!(json["has_more"], false);

        let _ = std::fs::remove_dir_all(&out);
    }

    #[test]
    fn smaller_pages_mean_more_listings() {
        let store = fixtures::store();
        let ctx = PipelineContext {
            page_size: 5,
            ..PipelineContext::default()
        };
        let routes = static_routes(&store, &ctx).unwrap();
        let san_jose_pages = routes
            .iter()
            .filter(|r| matches!(r, Route::Listing { city, .. } if city == "san jose"))
            .count();
        assert_eq!(san_jose_pages, 3);
    }
}
