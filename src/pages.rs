use serde::Serialize;
use tracing::debug;

use crate::db::RestaurantStore;
use crate::error::ListingError;
use crate::pipeline::browse::{assemble_search, assemble_state, SearchView, StateView};
use crate::pipeline::detail::{assemble_detail, find_restaurant, RestaurantView};
use crate::pipeline::listing::{assemble_listing, ListingView};
use crate::pipeline::PipelineContext;
use crate::routes::Route;

/// A render-ready view model for one route.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Page {
    Search(SearchView),
    State(StateView),
    Listing(ListingView),
    Restaurant(RestaurantView),
}

/// One read against the store, then the pure pipeline.
pub fn render(
    store: &impl RestaurantStore,
    ctx: &PipelineContext,
    route: &Route,
) -> Result<Page, ListingError> {
    debug!("Rendering {}", route.path());
    match route {
        Route::Search => Ok(Page::Search(assemble_search("", store.search("")))),
        Route::State { state } => Ok(Page::State(assemble_state(state, store.select_cities(state))?)),
        Route::Listing { state, city, page } => {
            let fetched = store.select_by_state_city(state, city);
            Ok(Page::Listing(assemble_listing(state, city, *page, fetched, ctx)?))
        }
        Route::Restaurant { id, .. } => {
            let record = find_restaurant(store.select_by_id(*id), *id)?;
            Ok(Page::Restaurant(assemble_detail(&record, ctx)))
        }
    }
}

/// Search landing page for a free-text term.
pub fn search(store: &impl RestaurantStore, term: &str) -> Page {
    Page::Search(assemble_search(term, store.search(term)))
}
