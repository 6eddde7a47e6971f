//! The storefront's fixed category set.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Product category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Decoracion,
    Muebles,
    Lashroom,
}

impl Category {
    /// Every category, in menu order.
    pub const ALL: [Category; 3] = [Category::Decoracion, Category::Muebles, Category::Lashroom];

    /// Wire value (e.g., "muebles").
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Decoracion => "decoracion",
            Category::Muebles => "muebles",
            Category::Lashroom => "lashroom",
        }
    }

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Decoracion => "Decoración",
            Category::Muebles => "Muebles",
            Category::Lashroom => "Lashroom",
        }
    }

    /// Known subcategories shown in the storefront menu.
    pub fn subcategories(&self) -> &'static [&'static str] {
        match self {
            Category::Decoracion => &["Letras Retroiluminadas"],
            Category::Muebles => &["Sofás", "Sitiales", "Comedores", "Rack Tv"],
            Category::Lashroom => &["Camillas", "Lámparas", "Accesorios"],
        }
    }

    /// Parse a wire value, ignoring case.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "decoracion" => Some(Category::Decoracion),
            "muebles" => Some(Category::Muebles),
            "lashroom" => Some(Category::Lashroom),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::parse(s).ok_or_else(|| format!("unknown category: {s}"))
    }
}
