// Visualization id parsing and the static category vocabulary
use serde::Serialize;

pub const ID_DELIMITER: char = '/';
pub const CATEGORY_DELIMITER: char = '_';

pub const TKN_PROCEDURE: &str = "http://cida.usgs.gov/def/NAR/procedure/TKN";
pub const TKN_DISCRETE_PROPERTY: &str = "http://cida.usgs.gov/def/NAR/property/TKN/discrete";

/// Map a server-side constituent code to its display name (case-insensitive)
pub fn constituent_for_code(code: &str) -> Option<&'static str> {
    match code.to_ascii_lowercase().as_str() {
        "nh3" | "tkn" => Some("nitrogen"),
        "no23" => Some("nitrate"),
        "op" | "tp" => Some("phosphorus"),
        "si" | "ssc" => Some("sediment"),
        "q" => Some("streamflow"),
        _ => None,
    }
}

/// Components encoded in a visualization id such as `"nh3/discrete_annual"`.
///
/// Parsing never fails: unrecognized pieces are simply absent. A second
/// segment with more than one `_` is treated as an opaque category name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IdComponents {
    pub constituent: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
}

impl IdComponents {
    pub fn parse(id: &str) -> Self {
        let mut segments = id.split(ID_DELIMITER);
        let constituent = segments
            .next()
            .and_then(constituent_for_code)
            .map(str::to_string);

        let (category, subcategory) = match segments.next().filter(|s| !s.is_empty()) {
            Some(segment) => {
                let parts: Vec<&str> = segment.split(CATEGORY_DELIMITER).collect();
                match parts.as_slice() {
                    // only `<category>_<qualifier>` carries a subcategory
                    [category, _] if !category.is_empty() => {
                        (Some(category.to_string()), Some(segment.to_string()))
                    }
                    _ => (Some(segment.to_string()), None),
                }
            }
            None => (None, None),
        };

        Self {
            constituent,
            category,
            subcategory,
        }
    }

    pub fn category(&self) -> Option<Category> {
        self.category.as_deref().and_then(Category::from_name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Discrete,
    Load,
    Flow,
}

impl Category {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "discrete" => Some(Category::Discrete),
            "load" => Some(Category::Load),
            "flow" => Some(Category::Flow),
            _ => None,
        }
    }
}

/// Additional series a plot needs beyond its primary data
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AncillaryDescriptor {
    pub procedure: String,
    pub observed_property: String,
}

impl AncillaryDescriptor {
    pub fn new(procedure: &str, observed_property: &str) -> Self {
        Self {
            procedure: procedure.to_string(),
            observed_property: observed_property.to_string(),
        }
    }
}
