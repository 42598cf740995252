use serde::Serialize;
use tracing::{debug, warn};

use super::features::{
    badges_for, category_icon, residual_categories, true_attributes, BadgeGroup, CategoryBadges,
    Group,
};
use super::ranking::{paginate, rank};
use super::slug::title_case;
use super::{PipelineContext, DESCRIPTION_PLACEHOLDER};
use crate::error::{ListingError, StoreError};
use crate::model::Restaurant;
use crate::routes::{listing_path, restaurant_path};

/// One restaurant card on a city listing page.
#[derive(Debug, Clone, Serialize)]
pub struct ListingCard {
    pub id: i64,
    pub name: String,
    pub kind: Option<String>,
    pub description: String,
    pub address: Option<String>,
    pub price_range: Option<String>,
    pub rating: Option<f64>,
    pub reviews: Option<i64>,
    pub directions: Option<String>,
    pub detail_path: String,
    /// Listing cards only show dining badges.
    pub badges: BadgeGroup,
    pub residual: Vec<CategoryBadges>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListingView {
    pub state: String,
    pub city: String,
    pub heading: String,
    pub title: String,
    pub description: String,
    pub page: usize,
    pub total: usize,
    pub cards: Vec<ListingCard>,
    pub has_more: bool,
    pub next_page_path: Option<String>,
}

#[cfg(test)]
impl ListingView {
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// Build a city listing page from the store's answer for (state, city).
///
/// A store failure means the page does not exist. An empty answer is a valid,
/// empty listing.
pub fn assemble_listing(
    state: &str,
    city: &str,
    page: usize,
    fetched: Result<Vec<Restaurant>, StoreError>,
    ctx: &PipelineContext,
) -> Result<ListingView, ListingError> {
    if page < 1 {
        return Err(ListingError::InvalidPage(page.to_string()));
    }

    let records = fetched.map_err(|e| {
        warn!("Listing query failed for {}/{}: {}", state, city, e);
        ListingError::NotFound(format!("{}/{}", state, city))
    })?;

    let window = paginate(rank(records, ctx.review_threshold), page, ctx.page_size)?;
    debug!(
        state,
        city,
        page,
        shown = window.items.len(),
        total = window.total,
        "assembled listing"
    );

    let cards = window
        .items
        .iter()
        .map(|r| build_card(r, state, city, ctx))
        .collect();

    let city_title = title_case(city);
    let state_title = title_case(state);

    Ok(ListingView {
        state: state.to_string(),
        city: city.to_string(),
        heading: format!("Best Vietnamese Restaurants in {}, {}", city_title, state_title),
        title: format!(
            "Best Vietnamese Restaurants in {}, {} page {}",
            city_title, state_title, page
        ),
        description: format!(
            "Find the Best Vietnamese Restaurant in {}, {}",
            city_title, state_title
        ),
        page,
        total: window.total,
        cards,
        has_more: window.has_more,
        next_page_path: window.has_more.then(|| listing_path(state, city, page + 1)),
    })
}

fn build_card(r: &Restaurant, state: &str, city: &str, ctx: &PipelineContext) -> ListingCard {
    let residual = residual_categories(&r.about, &ctx.taxonomy.known_categories())
        .into_iter()
        .map(|(category, attrs)| CategoryBadges {
            icon: category_icon(&ctx.taxonomy, &category),
            badges: true_attributes(Some(&attrs)),
            category,
        })
        .collect();

    ListingCard {
        id: r.id,
        name: r.name.clone(),
        kind: r.kind.clone(),
        description: r
            .description
            .clone()
            .unwrap_or_else(|| DESCRIPTION_PLACEHOLDER.to_string()),
        address: r.full_address.clone(),
        price_range: r.range.clone(),
        rating: r.rating,
        reviews: r.reviews,
        directions: r.location_link.clone(),
        detail_path: restaurant_path(state, city, r.id),
        badges: badges_for(&r.about, &ctx.taxonomy, Group::Dining),
        residual,
    }
}
