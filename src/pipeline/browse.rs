use serde::Serialize;
use tracing::warn;

use super::slug::title_case;
use crate::error::{ListingError, StoreError};
use crate::model::Restaurant;
use crate::routes::{listing_path, restaurant_path};

#[derive(Debug, Clone, Serialize)]
pub struct CityLink {
    pub name: String,
    pub path: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StateView {
    pub state: String,
    pub heading: String,
    pub cities: Vec<CityLink>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub id: i64,
    pub name: String,
    pub address: Option<String>,
    pub path: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchView {
    pub term: String,
    pub hits: Vec<SearchHit>,
}

/// Cities of one state. The store decides matching; a failure means no page.
pub fn assemble_state(
    state: &str,
    fetched: Result<Vec<String>, StoreError>,
) -> Result<StateView, ListingError> {
    let cities = fetched.map_err(|e| {
        warn!("City query failed for {}: {}", state, e);
        ListingError::NotFound(state.to_string())
    })?;

    Ok(StateView {
        state: state.to_string(),
        heading: format!("Vietnamese Restaurants in {}", title_case(state)),
        cities: cities
            .into_iter()
            .map(|city| CityLink {
                path: listing_path(state, &city, 1),
                name: city,
            })
            .collect(),
    })
}

/// Search landing results. A failed search shows no hits rather than an error page.
pub fn assemble_search(term: &str, fetched: Result<Vec<Restaurant>, StoreError>) -> SearchView {
    let records = fetched.unwrap_or_else(|e| {
        warn!("Search failed for {:?}: {}", term, e);
        Vec::new()
    });

    SearchView {
        term: term.to_string(),
        hits: records
            .into_iter()
            .map(|r| SearchHit {
                path: restaurant_path(&r.us_state, &r.city, r.id),
                id: r.id,
                name: r.name,
                address: r.full_address,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_lists_city_links() {
        let view = assemble_state(
            "california",
            Ok(vec!["San Jose".to_string(), "Westminster".to_string()]),
        )
        .unwrap();
        assert_eq!(view.heading, "Vietnamese Restaurants in California");
        assert_eq!(view.cities[0].path, "/california/san-jose/1");
        assert_eq!(view.cities[1].name, "Westminster");
    }

    #[test]
    fn state_store_error_is_not_found() {
        let err = assemble_state("california", Err(StoreError::Sqlite(rusqlite::Error::InvalidQuery)));
        assert!(err.unwrap_err().is_not_found());
    }

    #[test]
    fn search_hits_link_to_detail() {
        let r = Restaurant {
            id: 7,
            name: "Pho 7".into(),
            city: "Sugar Land".into(),
            us_state: "Texas".into(),
            ..Default::default()
        };
        let view = assemble_search("pho", Ok(vec![r]));
        assert_eq!(view.hits[0].path, "/texas/sugar-land/restaurant/7");

        let failed = assemble_search("pho", Err(StoreError::Sqlite(rusqlite::Error::InvalidQuery)));
        assert!(failed.hits.is_empty());
    }
}
