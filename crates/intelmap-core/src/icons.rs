//! Icon/category catalogue used to dress graph nodes.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// The icon descriptor attached to a placed entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Icon {
    pub name: String,
    /// Icon asset path; empty when neither the id nor the category default is known.
    pub icon: String,
    pub category: String,
    pub category_name: String,
}

pub trait IconCatalogue: Send + Sync {
    /// Look up `icon_id` within `category`.
    ///
    /// An unknown id falls back to the category's default icon. An unknown
    /// category yields an empty icon with `display_name` as category name.
    fn lookup(&self, category: &str, icon_id: &str, display_name: &str) -> Icon;
}

#[derive(Debug, Clone, Deserialize)]
pub struct IconCategory {
    pub name: String,
    #[serde(default)]
    pub default_icon: String,
    #[serde(default)]
    pub icons: Vec<IconEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IconEntry {
    pub id: String,
    pub icon: String,
}

/// An in-memory catalogue, either the built-in set or loaded from JSON
/// (`{"people": {"name": "People", "default_icon": "...", "icons": [...]}}`).
#[derive(Debug, Clone, Default)]
pub struct StaticIconCatalogue {
    categories: HashMap<String, IconCategory>,
}

impl StaticIconCatalogue {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        Ok(Self {
            categories: serde_json::from_str(json)?,
        })
    }

    /// The categories the graph builder asks for.
    pub fn builtin() -> Self {
        fn category(name: &str, default_icon: &str, icons: &[(&str, &str)]) -> IconCategory {
            IconCategory {
                name: name.to_string(),
                default_icon: default_icon.to_string(),
                icons: icons
                    .iter()
                    .map(|(id, icon)| IconEntry {
                        id: id.to_string(),
                        icon: icon.to_string(),
                    })
                    .collect(),
            }
        }

        let categories = HashMap::from([
            (
                "people".to_string(),
                category("People", "gfx/people/person.svg", &[("person", "gfx/people/person.svg")]),
            ),
            (
                "buildings".to_string(),
                category(
                    "Buildings",
                    "gfx/buildings/building.svg",
                    &[
                        ("house", "gfx/buildings/house.svg"),
                        ("building", "gfx/buildings/building.svg"),
                    ],
                ),
            ),
            (
                "military".to_string(),
                category(
                    "Military",
                    "gfx/military/mil_unit.svg",
                    &[("mil_intel", "gfx/military/mil_intel.svg")],
                ),
            ),
            (
                "vehicles".to_string(),
                category("Vehicles", "gfx/vehicles/car.svg", &[("car", "gfx/vehicles/car.svg")]),
            ),
            (
                "aviation".to_string(),
                category(
                    "Aviation",
                    "gfx/aviation/airport.svg",
                    &[("airport", "gfx/aviation/airport.svg")],
                ),
            ),
        ]);
        Self { categories }
    }
}

impl IconCatalogue for StaticIconCatalogue {
    fn lookup(&self, category: &str, icon_id: &str, display_name: &str) -> Icon {
        let Some(cat) = self.categories.get(category) else {
            return Icon {
                name: display_name.to_string(),
                icon: String::new(),
                category: category.to_string(),
                category_name: display_name.to_string(),
            };
        };
        let icon = cat
            .icons
            .iter()
            .find(|i| i.id == icon_id)
            .map(|i| i.icon.clone())
            .unwrap_or_else(|| cat.default_icon.clone());
        Icon {
            name: display_name.to_string(),
            icon,
            category: category.to_string(),
            category_name: cat.name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_icon() {
        let icon = StaticIconCatalogue::builtin().lookup("buildings", "house", "Residential Address");
        assert_eq!(icon.icon, "gfx/buildings/house.svg");
        assert_eq!(icon.category_name, "Buildings");
        assert_eq!(icon.name, "Residential Address");
    }

    #[test]
    fn unknown_id_uses_category_default() {
        let icon = StaticIconCatalogue::builtin().lookup("vehicles", "tank", "Vehicle X");
        assert_eq!(icon.icon, "gfx/vehicles/car.svg");
    }

    #[test]
    fn unknown_category_passes_label_through() {
        let icon = StaticIconCatalogue::builtin().lookup("boats", "ferry", "Ferry");
        assert_eq!(icon.icon, "");
        assert_eq!(icon.category, "boats");
        assert_eq!(icon.category_name, "Ferry");
    }

    #[test]
    fn loads_from_json() {
        let catalogue = StaticIconCatalogue::from_json(
            r#"{"people": {"name": "Persons", "icons": [{"id": "person", "icon": "p.png"}]}}"#,
        )
        .unwrap();
        let icon = catalogue.lookup("people", "person", "Ann LEE");
        assert_eq!(icon.icon, "p.png");
        assert_eq!(icon.category_name, "Persons");
        assert_eq!(catalogue.lookup("people", "other", "x").icon, "");
    }
}
