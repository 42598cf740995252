use serde::Serialize;
use tracing::warn;

use super::features::{group_badges, BadgeGroup, Taxonomy};
use super::{PipelineContext, DESCRIPTION_PLACEHOLDER};
use crate::error::{ListingError, StoreError};
use crate::model::{Restaurant, WorkingHours};
use crate::routes::restaurant_path;

const DEFAULT_PRICE_RANGE: &str = "$";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HoursRow {
    pub day: String,
    pub hours: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RestaurantView {
    pub id: i64,
    pub name: String,
    pub subtitle: String,
    pub title: String,
    pub canonical_path: String,
    pub description: String,
    pub address: Option<String>,
    pub price_range: String,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub directions: Option<String>,
    pub reviews_link: Option<String>,
    pub booking_link: Option<String>,
    pub photo: Option<String>,
    pub rating: Option<f64>,
    pub reviews: Option<i64>,
    pub hours: Vec<HoursRow>,
    pub groups: Vec<BadgeGroup>,
    pub amenities: Vec<&'static str>,
}

/// Weekdays in `day_order` first; anything else after, in source order.
pub fn ordered_hours(hours: &WorkingHours, taxonomy: &Taxonomy) -> Vec<HoursRow> {
    let mut rows: Vec<(usize, HoursRow)> = hours
        .iter()
        .map(|(day, h)| {
            let rank = taxonomy.day_rank(day).unwrap_or(usize::MAX);
            (
                rank,
                HoursRow {
                    day: day.to_string(),
                    hours: h.to_string(),
                },
            )
        })
        .collect();
    rows.sort_by_key(|(rank, _)| *rank);
    rows.into_iter().map(|(_, row)| row).collect()
}

/// Unwrap the store's answer for one id; errors and misses are both "not found".
pub fn find_restaurant(
    fetched: Result<Option<Restaurant>, StoreError>,
    id: i64,
) -> Result<Restaurant, ListingError> {
    match fetched {
        Ok(Some(r)) => Ok(r),
        Ok(None) => Err(ListingError::NotFound(format!("restaurant {}", id))),
        Err(e) => {
            warn!("Restaurant query failed for {}: {}", id, e);
            Err(ListingError::NotFound(format!("restaurant {}", id)))
        }
    }
}

pub fn assemble_detail(r: &Restaurant, ctx: &PipelineContext) -> RestaurantView {
    let kind = r.kind.as_deref().unwrap_or("Restaurant");
    let subtitle = format!("{} in {}, {}", kind, r.city, r.us_state);

    RestaurantView {
        id: r.id,
        name: r.name.clone(),
        title: format!("{} - {}", r.name, subtitle),
        subtitle,
        canonical_path: restaurant_path(&r.us_state, &r.city, r.id),
        description: r
            .description
            .clone()
            .unwrap_or_else(|| DESCRIPTION_PLACEHOLDER.to_string()),
        address: r.full_address.clone(),
        price_range: r
            .range
            .clone()
            .unwrap_or_else(|| DEFAULT_PRICE_RANGE.to_string()),
        phone: r.phone.clone(),
        website: r.site.clone(),
        directions: r.location_link.clone(),
        reviews_link: r.location_review_link.clone(),
        booking_link: r.booking_appointment_link.clone(),
        photo: r.photo.clone(),
        rating: r.rating,
        reviews: r.reviews,
        hours: ordered_hours(&r.working_hours, &ctx.taxonomy),
        groups: group_badges(&r.about, &ctx.taxonomy),
        amenities: r.amenities.offered(),
    }
}
