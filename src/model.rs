use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

/// Attribute name → presence flag for one `about` category.
pub type Attributes = IndexMap<String, bool>;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: i64,
    pub name: String,
    pub site: Option<String>,
    pub subtypes: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub phone: Option<String>,
    pub full_address: Option<String>,
    pub street: Option<String>,
    pub city: String,
    pub postal_code: Option<String>,
    pub us_state: String,
    pub photo: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub working_hours: WorkingHours,
    #[serde(default, deserialize_with = "null_as_default")]
    pub about: About,
    pub range: Option<String>,
    pub description: Option<String>,
    pub location_link: Option<String>,
    pub location_review_link: Option<String>,
    pub booking_appointment_link: Option<String>,
    pub rating: Option<f64>,
    pub reviews: Option<i64>,
    #[serde(flatten)]
    pub amenities: Amenities,
}

impl Restaurant {
    /// Review count used for ranking; absent counts as zero.
    pub fn rank_reviews(&self) -> i64 {
        self.reviews.unwrap_or(0)
    }

    /// Rating used for ranking; absent counts as zero.
    pub fn rank_rating(&self) -> f64 {
        self.rating.unwrap_or(0.0)
    }
}

/// Day name → free-text hours, in the order the data store returned them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkingHours(pub IndexMap<String, String>);

impl WorkingHours {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(d, h)| (d.as_str(), h.as_str()))
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Two-level feature map: category → attribute → flag.
///
/// A category may be present with a `null` value; it is kept as `None` so
/// callers can tell "listed but empty" from "never listed" if they care.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct About(pub IndexMap<String, Option<Attributes>>);

impl About {
    pub fn category(&self, name: &str) -> Option<&Attributes> {
        self.0.get(name).and_then(Option::as_ref)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&Attributes>)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Flat dish/amenity columns. These overlap with `about` and are surfaced as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Amenities {
    pub broth: Option<bool>,
    pub chicken_pho: Option<bool>,
    pub vegan_pho: Option<bool>,
    pub brisket: Option<bool>,
    pub oxtail: Option<bool>,
    pub banh_mi: Option<bool>,
    pub egg_rolls: Option<bool>,
    pub spring_rolls: Option<bool>,
    pub rice_vermicelli: Option<bool>,
    pub boba: Option<bool>,
    pub vietnamese_coffee: Option<bool>,
    pub portion_sizes: Option<bool>,
    pub spicy_options: Option<bool>,
    pub prices: Option<bool>,
    pub parking: Option<bool>,
}

impl Amenities {
    pub const COLUMNS: [&'static str; 15] = [
        "broth",
        "chicken_pho",
        "vegan_pho",
        "brisket",
        "oxtail",
        "banh_mi",
        "egg_rolls",
        "spring_rolls",
        "rice_vermicelli",
        "boba",
        "vietnamese_coffee",
        "portion_sizes",
        "spicy_options",
        "prices",
        "parking",
    ];

    fn flags(&self) -> [(Option<bool>, &'static str); 15] {
        [
            (self.broth, "Broth"),
            (self.chicken_pho, "Chicken pho"),
            (self.vegan_pho, "Vegan pho"),
            (self.brisket, "Brisket"),
            (self.oxtail, "Oxtail"),
            (self.banh_mi, "Banh mi"),
            (self.egg_rolls, "Egg rolls"),
            (self.spring_rolls, "Spring rolls"),
            (self.rice_vermicelli, "Rice vermicelli"),
            (self.boba, "Boba"),
            (self.vietnamese_coffee, "Vietnamese coffee"),
            (self.portion_sizes, "Portion sizes"),
            (self.spicy_options, "Spicy options"),
            (self.prices, "Prices"),
            (self.parking, "Parking"),
        ]
    }

    /// Display labels of every flag that is explicitly true, in column order.
    pub fn offered(&self) -> Vec<&'static str> {
        self.flags()
            .into_iter()
            .filter_map(|(flag, label)| (flag == Some(true)).then_some(label))
            .collect()
    }

    /// Values in `COLUMNS` order.
    #[cfg(test)]
    pub fn values(&self) -> [Option<bool>; 15] {
        self.flags().map(|(flag, _)| flag)
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
