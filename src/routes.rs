use crate::error::ListingError;
use crate::pipeline::ranking::parse_page;
use crate::pipeline::slug::{is_decimal_segment, location_slug, parse_segment};

/// Page shapes served by the site. Locations are held decoded ("san jose").
///
/// Restaurant detail pages live only under `/{state}/{city}/restaurant/{id}`;
/// the older `/{state}/{city}/{page}/{id}` and `/{state}/{city}/{id}` shapes
/// are not served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Search,
    State { state: String },
    Listing { state: String, city: String, page: usize },
    Restaurant { state: String, city: String, id: i64 },
}

impl Route {
    pub fn parse(path: &str) -> Result<Route, ListingError> {
        let segments: Vec<&str> = path
            .split(['?', '#'])
            .next()
            .unwrap_or("")
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        match segments.as_slice() {
            [] => Ok(Route::Search),
            [state] => Ok(Route::State {
                state: parse_segment(state)?,
            }),
            // bare city URL is the first listing page
            [state, city] => Ok(Route::Listing {
                state: parse_segment(state)?,
                city: parse_segment(city)?,
                page: 1,
            }),
            [state, city, page] => Ok(Route::Listing {
                state: parse_segment(state)?,
                city: parse_segment(city)?,
                page: parse_page(page)?,
            }),
            [state, city, "restaurant", id] => Ok(Route::Restaurant {
                state: parse_segment(state)?,
                city: parse_segment(city)?,
                id: parse_id(id)?,
            }),
            _ => Err(ListingError::UnknownRoute(path.to_string())),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Search => "/".to_string(),
            Route::State { state } => state_path(state),
            Route::Listing { state, city, page } => listing_path(state, city, *page),
            Route::Restaurant { state, city, id } => restaurant_path(state, city, *id),
        }
    }
}

pub fn state_path(state: &str) -> String {
    format!("/{}", location_slug(state))
}

pub fn listing_path(state: &str, city: &str, page: usize) -> String {
    format!("/{}/{}/{}", location_slug(state), location_slug(city), page)
}

pub fn restaurant_path(state: &str, city: &str, id: i64) -> String {
    format!(
        "/{}/{}/restaurant/{}",
        location_slug(state),
        location_slug(city),
        id
    )
}

fn parse_id(segment: &str) -> Result<i64, ListingError> {
    if !is_decimal_segment(segment) {
        return Err(ListingError::InvalidId(segment.to_string()));
    }
    segment
        .parse::<i64>()
        .map_err(|_| ListingError::InvalidId(segment.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_listing() {
        assert_eq!(
            Route::parse("/california/san-jose/2").unwrap(),
            Route::Listing {
                state: "california".into(),
                city: "san jose".into(),
                page: 2
            }
        );
        assert_eq!(
            Route::parse("/california/san-jose").unwrap(),
            Route::parse("/california/san-jose/1").unwrap()
        );
    }

    #[test]
    fn parses_restaurant() {
        assert_eq!(
            Route::parse("/texas/houston/restaurant/42/").unwrap(),
            Route::Restaurant {
                state: "texas".into(),
                city: "houston".into(),
                id: 42
            }
        );
    }

    #[test]
    fn parses_search_and_state() {
        assert_eq!(Route::parse("/").unwrap(), Route::Search);
        assert_eq!(Route::parse("").unwrap(), Route::Search);
        assert_eq!(
            Route::parse("/new-york?ref=x").unwrap(),
            Route::State {
                state: "new york".into()
            }
        );
    }

    #[test]
    fn rejects_bad_segments() {
        assert_eq!(
            Route::parse("/california/san-jose/0"),
            Err(ListingError::InvalidPage("0".into()))
        );
        assert!(matches!(
            Route::parse("/california/san-jose/abc"),
            Err(ListingError::InvalidPage(_))
        ));
        for alias in ["/california/san-jose/+2", "/california/san-jose/002"] {
            assert_eq!(
                Route::parse(alias),
                Err(ListingError::InvalidPage(alias.rsplit('/').next().unwrap_or("").into()))
            );
        }
        assert!(matches!(
            Route::parse("/california/san-jose/restaurant/+7"),
            Err(ListingError::InvalidId(_))
        ));
        assert!(matches!(
            Route::parse("/california/san-jose/restaurant/x1"),
            Err(ListingError::InvalidId(_))
        ));
        // legacy detail shape
        assert!(matches!(
            Route::parse("/california/san-jose/1/17"),
            Err(ListingError::UnknownRoute(_))
        ));
    }

    #[test]
    fn paths_round_trip() {
        for path in [
            "/",
            "/california",
            "/california/san-jose/3",
            "/texas/houston/restaurant/9",
        ] {
            assert_eq!(Route::parse(path).unwrap().path(), path);
        }
    }

    #[test]
    fn path_builders_normalize_case() {
        assert_eq!(listing_path("California", "San Jose", 1), "/california/san-jose/1");
        assert_eq!(restaurant_path("Texas", "Sugar Land", 5), "/texas/sugar-land/restaurant/5");
        assert_eq!(state_path("New York"), "/new-york");
    }
}
