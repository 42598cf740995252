use std::collections::HashSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::model::{About, Attributes};

/// Symbolic icon names; the presentation layer maps them to glyphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Icon {
    Users,
    Car,
    Coffee,
    Baby,
    CreditCard,
    Toilet,
    Star,
    PawPrint,
    Calendar,
    Accessibility,
    Handshake,
    UtensilsCrossed,
    Utensils,
    Ellipsis,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Group {
    Features,
    Dining,
    Accessibility,
    Others,
}

impl Group {
    pub const ALL: [Group; 4] = [Group::Features, Group::Dining, Group::Accessibility, Group::Others];

    pub fn label(self) -> &'static str {
        match self {
            Group::Features => "Features",
            Group::Dining => "Dining",
            Group::Accessibility => "Accessibility",
            Group::Others => "Others",
        }
    }
}

/// Category grouping, icon table and weekday order for one deployment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Taxonomy {
    pub features: Vec<String>,
    pub dining: Vec<String>,
    pub accessibility: Vec<String>,
    pub icons: IndexMap<String, Icon>,
    pub default_icon: Icon,
    pub day_order: Vec<String>,
}

impl Default for Taxonomy {
    fn default() -> Self {
        fn strings(xs: &[&str]) -> Vec<String> {
            xs.iter().map(|s| s.to_string()).collect()
        }
        let icons = [
            ("Atmosphere", Icon::Users),
            ("Parking", Icon::Car),
            ("Offerings", Icon::Coffee),
            ("Crowd", Icon::Users),
            ("Children", Icon::Baby),
            ("Payments", Icon::CreditCard),
            ("Amenities", Icon::Toilet),
            ("Highlights", Icon::Star),
            ("Pets", Icon::PawPrint),
            ("Planning", Icon::Calendar),
            ("Accessibility", Icon::Accessibility),
            ("From the business", Icon::Handshake),
            ("Dining options", Icon::UtensilsCrossed),
            ("Service options", Icon::Utensils),
            ("Popular for", Icon::Star),
        ]
        .into_iter()
        .map(|(name, icon)| (name.to_string(), icon))
        .collect();

        Taxonomy {
            features: strings(&["Atmosphere", "Highlights", "Payments", "Pets", "Planning"]),
            dining: strings(&["Popular for", "Service options", "Dining options", "Offerings"]),
            accessibility: strings(&["Accessibility", "Amenities", "Parking", "Crowd"]),
            icons,
            default_icon: Icon::Ellipsis,
            day_order: strings(&[
                "Monday",
                "Tuesday",
                "Wednesday",
                "Thursday",
                "Friday",
                "Saturday",
                "Sunday",
            ]),
        }
    }
}

impl Taxonomy {
    /// Categories configured for a group. `Others` is computed, so it has none.
    pub fn categories(&self, group: Group) -> &[String] {
        match group {
            Group::Features => &self.features,
            Group::Dining => &self.dining,
            Group::Accessibility => &self.accessibility,
            Group::Others => &[],
        }
    }

    pub fn known_categories(&self) -> HashSet<&str> {
        self.features
            .iter()
            .chain(&self.dining)
            .chain(&self.accessibility)
            .map(String::as_str)
            .collect()
    }

    /// Position of a weekday in `day_order`, ignoring ASCII case.
    pub fn day_rank(&self, day: &str) -> Option<usize> {
        self.day_order.iter().position(|d| d.eq_ignore_ascii_case(day.trim()))
    }
}

/// Names of the true attributes in a category, in source order.
pub fn true_attributes(category: Option<&Attributes>) -> Vec<String> {
    category
        .map(|attrs| {
            attrs
                .iter()
                .filter(|(_, present)| **present)
                .map(|(name, _)| name.clone())
                .collect()
        })
        .unwrap_or_default()
}

/// Top-level categories outside `known`, with their full attribute maps.
///
/// Categories stored as `null` carry nothing to show and are skipped.
pub fn residual_categories(about: &About, known: &HashSet<&str>) -> Vec<(String, Attributes)> {
    about
        .iter()
        .filter(|(name, _)| !known.contains(name))
        .filter_map(|(name, attrs)| attrs.map(|a| (name.to_string(), a.clone())))
        .collect()
}

pub fn category_icon(taxonomy: &Taxonomy, category: &str) -> Icon {
    taxonomy
        .icons
        .get(category)
        .copied()
        .unwrap_or(taxonomy.default_icon)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryBadges {
    pub category: String,
    pub icon: Icon,
    pub badges: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BadgeGroup {
    pub group: Group,
    pub label: &'static str,
    pub categories: Vec<CategoryBadges>,
}

impl BadgeGroup {
    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    #[cfg(test)]
    pub fn badges(&self) -> impl Iterator<Item = &str> {
        self.categories
            .iter()
            .flat_map(|c| c.badges.iter().map(String::as_str))
    }
}

/// Badges for one group. Categories without a true attribute are left out.
pub fn badges_for(about: &About, taxonomy: &Taxonomy, group: Group) -> BadgeGroup {
    let sources: Vec<(String, Vec<String>)> = match group {
        Group::Others => residual_categories(about, &taxonomy.known_categories())
            .into_iter()
            .map(|(name, attrs)| {
                let badges = true_attributes(Some(&attrs));
                (name, badges)
            })
            .collect(),
        _ => taxonomy
            .categories(group)
            .iter()
            .map(|name| (name.clone(), true_attributes(about.category(name))))
            .collect(),
    };

    let categories = sources
        .into_iter()
        .filter(|(_, badges)| !badges.is_empty())
        .map(|(category, badges)| CategoryBadges {
            icon: category_icon(taxonomy, &category),
            category,
            badges,
        })
        .collect();

    BadgeGroup {
        group,
        label: group.label(),
        categories,
    }
}

/// All four groups in display order.
pub fn group_badges(about: &About, taxonomy: &Taxonomy) -> Vec<BadgeGroup> {
    Group::ALL
        .into_iter()
        .map(|g| badges_for(about, taxonomy, g))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn about(json: &str) -> About {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn true_attributes_keeps_order() {
        let attrs: Attributes = serde_json::from_str(r#"{"a":true,"b":false,"c":true}"#).unwrap();
        assert_eq!(true_attributes(Some(&attrs)), vec!["a", "c"]);
    }

    #[test]
    fn true_attributes_of_absent_category() {
        assert!(true_attributes(None).is_empty());
        let a = about(r#"{"Parking":null}"#);
        assert!(true_attributes(a.category("Parking")).is_empty());
        assert!(true_attributes(a.category("Pets")).is_empty());
    }

    #[test]
    fn residuals_skip_known_and_keep_order() {
        let tax = Taxonomy::default();
        let a = about(
            r#"{"From the business":{"Women-owned":true},"Parking":{"Free lot":true},
                "Children":{"Good for kids":false,"High chairs":true},"Ghost":null}"#,
        );
        let residual = residual_categories(&a, &tax.known_categories());
        let names: Vec<&str> = residual.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["From the business", "Children"]);
        // full map, including false entries
        assert_eq!(residual[1].1.len(), 2);
    }

    #[test]
    fn parking_lands_in_accessibility() {
        let tax = Taxonomy::default();
        let a = about(r#"{"Parking":{"Free lot":true}}"#);
        let groups = group_badges(&a, &tax);

        let access = groups.iter().find(|g| g.group == Group::Accessibility).unwrap();
        assert_eq!(access.categories.len(), 1);
        assert_eq!(access.categories[0].category, "Parking");
        assert_eq!(access.categories[0].icon, Icon::Car);
        assert_eq!(access.categories[0].badges, vec!["Free lot"]);

        assert!(residual_categories(&a, &tax.known_categories()).is_empty());
        let others = groups.iter().find(|g| g.group == Group::Others).unwrap();
        assert!(others.is_empty());
    }

    #[test]
    fn groups_follow_taxonomy_order() {
        let tax = Taxonomy::default();
        let a = about(
            r#"{"Offerings":{"Vegan options":true},"Popular for":{"Lunch":true,"Dinner":true}}"#,
        );
        let dining = badges_for(&a, &tax, Group::Dining);
        let cats: Vec<&str> = dining.categories.iter().map(|c| c.category.as_str()).collect();
        assert_eq!(cats, vec!["Popular for", "Offerings"]);
        assert_eq!(dining.badges().collect::<Vec<_>>(), vec!["Lunch", "Dinner", "Vegan options"]);
    }

    #[test]
    fn icon_is_total() {
        let tax = Taxonomy::default();
        assert_eq!(category_icon(&tax, "Pets"), Icon::PawPrint);
        assert_eq!(category_icon(&tax, "Something new"), Icon::Ellipsis);
        assert_eq!(category_icon(&tax, ""), Icon::Ellipsis);
    }

    #[test]
    fn taxonomy_overrides_from_json() {
        let tax: Taxonomy = serde_json::from_str(
            r#"{"dining":["Menu"],"default_icon":"star","icons":{"Menu":"utensils"}}"#,
        )
        .unwrap();
        assert_eq!(tax.categories(Group::Dining), ["Menu".to_string()]);
        assert!(tax.categories(Group::Accessibility).iter().any(|c| c == "Parking"));
        assert_eq!(category_icon(&tax, "Menu"), Icon::Utensils);
        assert_eq!(category_icon(&tax, "Pets"), Icon::Star);
    }

    #[test]
    fn day_rank_ignores_case() {
        let tax = Taxonomy::default();
        assert_eq!(tax.day_rank("monday"), Some(0));
        assert_eq!(tax.day_rank("Sunday"), Some(6));
        assert_eq!(tax.day_rank("Holidays"), None);
    }
}
