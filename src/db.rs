use std::path::Path;

use rusqlite::functions::FunctionFlags;
use rusqlite::types::Type;
use rusqlite::{Connection, OpenFlags, Row};

use crate::error::StoreError;
use crate::model::{About, Amenities, Restaurant, WorkingHours};

pub const DEFAULT_DB_PATH: &str = "data/restaurants.sqlite";

/// Read side of the restaurant table. Every method is a single idempotent read.
pub trait RestaurantStore {
    /// Case-insensitive match on state and city, best rated first.
    fn select_by_state_city(&self, state: &str, city: &str) -> Result<Vec<Restaurant>, StoreError>;
    /// Distinct (state, city) pairs, one per case-insensitive spelling.
    fn select_all_state_city_pairs(&self) -> Result<Vec<(String, String)>, StoreError>;
    fn select_by_id(&self, id: i64) -> Result<Option<Restaurant>, StoreError>;
    fn select_states(&self) -> Result<Vec<String>, StoreError>;
    fn select_cities(&self, state: &str) -> Result<Vec<String>, StoreError>;
    /// Substring match on name or full address; an empty term matches all.
    fn search(&self, term: &str) -> Result<Vec<Restaurant>, StoreError>;
}

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open an existing database read-only. This crate never writes to it.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|source| StoreError::Open {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_connection(conn)
    }

    /// Wrap a connection and register `unicode_lower`, a `str::to_lowercase`
    /// fold. SQLite's own `LOWER`, `LIKE` and `NOCASE` only fold ASCII.
    pub fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.create_scalar_function(
            "unicode_lower",
            1,
            FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
            |ctx| Ok(ctx.get::<Option<String>>(0)?.map(|text| text.to_lowercase())),
        )?;
        Ok(SqliteStore { conn })
    }

    fn query_restaurants(
        &self,
        sql_where: &str,
        params: &[&dyn rusqlite::ToSql],
    ) -> Result<Vec<Restaurant>, StoreError> {
        let sql = format!(
            "SELECT {} FROM restaurants {}
             ORDER BY rating DESC NULLS LAST, reviews DESC NULLS LAST, id",
            select_columns(),
            sql_where
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params, restaurant_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

const RECORD_COLUMNS: &str = "id, name, site, subtypes, type, phone, full_address, street, city,
    postal_code, us_state, photo, working_hours, about, \"range\", description, location_link,
    location_review_link, booking_appointment_link, rating, reviews";

fn select_columns() -> String {
    format!("{}, {}", RECORD_COLUMNS, Amenities::COLUMNS.join(", "))
}

impl RestaurantStore for SqliteStore {
    fn select_by_state_city(&self, state: &str, city: &str) -> Result<Vec<Restaurant>, StoreError> {
        self.query_restaurants(
            "WHERE unicode_lower(us_state) = ?1 AND unicode_lower(city) = ?2",
            &[&state.to_lowercase(), &city.to_lowercase()],
        )
    }

    fn select_all_state_city_pairs(&self) -> Result<Vec<(String, String)>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT MIN(us_state), MIN(city) FROM restaurants
             GROUP BY unicode_lower(us_state), unicode_lower(city)
             ORDER BY unicode_lower(us_state), unicode_lower(city)",
        )?;
        let rows = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn select_by_id(&self, id: i64) -> Result<Option<Restaurant>, StoreError> {
        Ok(self.query_restaurants("WHERE id = ?1", &[&id])?.into_iter().next())
    }

    fn select_states(&self) -> Result<Vec<String>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT MIN(us_state) FROM restaurants
             GROUP BY unicode_lower(us_state)
             ORDER BY unicode_lower(us_state)",
        )?;
        let rows = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn select_cities(&self, state: &str) -> Result<Vec<String>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT MIN(city) FROM restaurants
             WHERE unicode_lower(us_state) = ?1
             GROUP BY unicode_lower(city)
             ORDER BY unicode_lower(city)",
        )?;
        let rows = stmt
            .query_map([state.to_lowercase()], |row| row.get(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn search(&self, term: &str) -> Result<Vec<Restaurant>, StoreError> {
        // instr() takes the term literally, so `%` and `_` need no escaping
        self.query_restaurants(
            "WHERE instr(unicode_lower(name), ?1) > 0
                OR instr(unicode_lower(full_address), ?1) > 0",
            &[&term.trim().to_lowercase()],
        )
    }
}

fn restaurant_from_row(row: &Row) -> rusqlite::Result<Restaurant> {
    let working_hours: WorkingHours = json_column(row, "working_hours")?;
    let about: About = json_column(row, "about")?;

    Ok(Restaurant {
        id: row.get("id")?,
        name: row.get("name")?,
        site: row.get("site")?,
        subtypes: row.get("subtypes")?,
        kind: row.get("type")?,
        phone: row.get("phone")?,
        full_address: row.get("full_address")?,
        street: row.get("street")?,
        city: row.get("city")?,
        postal_code: row.get("postal_code")?,
        us_state: row.get("us_state")?,
        photo: row.get("photo")?,
        working_hours,
        about,
        range: row.get("range")?,
        description: row.get("description")?,
        location_link: row.get("location_link")?,
        location_review_link: row.get("location_review_link")?,
        booking_appointment_link: row.get("booking_appointment_link")?,
        rating: row.get("rating")?,
        reviews: row.get("reviews")?,
        amenities: Amenities {
            broth: row.get("broth")?,
            chicken_pho: row.get("chicken_pho")?,
            vegan_pho: row.get("vegan_pho")?,
            brisket: row.get("brisket")?,
            oxtail: row.get("oxtail")?,
            banh_mi: row.get("banh_mi")?,
            egg_rolls: row.get("egg_rolls")?,
            spring_rolls: row.get("spring_rolls")?,
            rice_vermicelli: row.get("rice_vermicelli")?,
            boba: row.get("boba")?,
            vietnamese_coffee: row.get("vietnamese_coffee")?,
            portion_sizes: row.get("portion_sizes")?,
            spicy_options: row.get("spicy_options")?,
            prices: row.get("prices")?,
            parking: row.get("parking")?,
        },
    })
}

/// Decode a JSON text column; NULL and empty text become the default value.
fn json_column<T>(row: &Row, name: &str) -> rusqlite::Result<T>
where
    T: Default + serde::de::DeserializeOwned,
{
    let raw: Option<String> = row.get(name)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") | Some("null") => Ok(T::default()),
        Some(text) => serde_json::from_str(text).map_err(|e| {
            let idx = row.as_ref().column_index(name).unwrap_or(0);
            rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))
        }),
    }
}
