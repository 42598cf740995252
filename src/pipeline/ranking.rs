use serde::Serialize;

use super::slug::is_decimal_segment;
use crate::error::ListingError;
use crate::model::Restaurant;

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const DEFAULT_REVIEW_THRESHOLD: i64 = 50;

/// Well-reviewed places (at least `review_threshold` reviews) first, then by
/// rating. The sort is stable: the store already orders by rating and review
/// count, and equal records must keep that order between builds.
pub fn rank(mut records: Vec<Restaurant>, review_threshold: i64) -> Vec<Restaurant> {
    records.sort_by(|a, b| {
        let tier_a = a.rank_reviews() >= review_threshold;
        let tier_b = b.rank_reviews() >= review_threshold;
        tier_b
            .cmp(&tier_a)
            .then_with(|| b.rank_rating().total_cmp(&a.rank_rating()))
    });
    records
}

/// Records from page 1 through `page`, plus whether any remain after it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Window<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub total: usize,
    pub has_more: bool,
}

/// Cumulative window: page N holds pages 1..=N, not page N alone.
///
/// `has_more` is `total > page * page_size`; a list that ends exactly on a
/// page boundary has no next page.
pub fn paginate<T>(mut records: Vec<T>, page: usize, page_size: usize) -> Result<Window<T>, ListingError> {
    if page < 1 {
        return Err(ListingError::InvalidPage(page.to_string()));
    }
    if page_size < 1 {
        return Err(ListingError::InvalidPageSize(page_size));
    }

    let total = records.len();
    let end = page.saturating_mul(page_size);
    records.truncate(end);

    Ok(Window {
        items: records,
        page,
        total,
        has_more: total > end,
    })
}

/// Number of listing pages needed to show `total` records.
pub fn page_count(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}

/// Parse a 1-based page segment. Only the canonical spelling is accepted:
/// `+2`, `02` and ` 2` are not page 2.
pub fn parse_page(segment: &str) -> Result<usize, ListingError> {
    if !is_decimal_segment(segment) {
        return Err(ListingError::InvalidPage(segment.to_string()));
    }
    match segment.parse::<usize>() {
        Ok(page) if page >= 1 => Ok(page),
        _ => Err(ListingError::InvalidPage(segment.to_string())),
    }
}
