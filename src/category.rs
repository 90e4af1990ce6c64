//! Place categories
//!
//! A closed set of categories, each carrying a label and the style tokens a
//! map widget needs to draw its marker. Resolution from a string is total:
//! anything unrecognized falls back to [`Category::General`].

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Category of a saved place
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Category {
    #[default]
    General,
    Home,
    Work,
    Food,
    Leisure,
    Shopping,
}

/// Visual tokens for a category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryStyle {
    /// Human-readable label
    pub label: &'static str,
    /// Marker fill color (hex)
    pub color: &'static str,
    /// Icon identifier understood by the frontend
    pub icon: &'static str,
}

const STYLES: [(Category, &str, CategoryStyle); 6] = [
    (
        Category::General,
        "general",
        CategoryStyle { label: "General", color: "#3b82f6", icon: "map-pin" },
    ),
    (
        Category::Home,
        "home",
        CategoryStyle { label: "Home", color: "#22c55e", icon: "home" },
    ),
    (
        Category::Work,
        "work",
        CategoryStyle { label: "Work", color: "#8b5cf6", icon: "briefcase" },
    ),
    (
        Category::Food,
        "food",
        CategoryStyle { label: "Food", color: "#f97316", icon: "utensils" },
    ),
    (
        Category::Leisure,
        "leisure",
        CategoryStyle { label: "Leisure", color: "#ec4899", icon: "trees" },
    ),
    (
        Category::Shopping,
        "shopping",
        CategoryStyle { label: "Shopping", color: "#eab308", icon: "shopping-bag" },
    ),
];

impl Category {
    /// Resolve a stored or user-entered value, defaulting when unknown
    pub fn resolve(value: &str) -> Self {
        let wanted = value.trim().to_lowercase();
        STYLES
            .iter()
            .find(|(_, id, _)| *id == wanted)
            .map(|(category, _, _)| *category)
            .unwrap_or_default()
    }

    /// Resolve an optional value; `None` maps to the default
    pub fn resolve_opt(value: Option<&str>) -> Self {
        value.map(Self::resolve).unwrap_or_default()
    }

    /// Stable identifier used in storage and the API
    pub fn id(&self) -> &'static str {
        self.entry().1
    }

    /// Label and style tokens
    pub fn style(&self) -> CategoryStyle {
        self.entry().2
    }

    fn entry(&self) -> &'static (Category, &'static str, CategoryStyle) {
        // Every variant has exactly one row in STYLES.
        STYLES
            .iter()
            .find(|(category, _, _)| category == self)
            .unwrap_or(&STYLES[0])
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl std::str::FromStr for Category {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::resolve(s))
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.id())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(Self::resolve_opt(raw.as_deref()))
    }
}

/// Information about a category, as listed by the CLI and the API
#[derive(Debug, Clone, Serialize)]
pub struct CategoryInfo {
    pub id: &'static str,
    #[serde(flatten)]
    pub style: CategoryStyle,
}

/// List all categories in display order
pub fn available_categories() -> Vec<CategoryInfo> {
    STYLES
        .iter()
        .map(|(_, id, style)| CategoryInfo { id, style: *style })
        .collect()
}
