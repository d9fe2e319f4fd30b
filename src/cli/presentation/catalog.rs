//! Catalog presentation: selectable options per field.

use super::shared::{format_section_heading, to_pretty_json};
use crate::config::{CatalogConfig, CatalogField};
use crate::error::ApiError;

pub fn format_options_text(catalog: &CatalogConfig) -> String {
    let mut sections = Vec::new();
    for field in CatalogField::ALL {
        let mut section = format!("{}\n", format_section_heading(field.name()));
        for (i, option) in catalog.options(field).iter().enumerate() {
            let marker = if i == 0 { " (default)" } else { "" };
            section.push_str(&format!("  {}{}\n", option, marker));
        }
        sections.push(section);
    }
    sections.join("\n")
}

pub fn format_options_json(catalog: &CatalogConfig) -> Result<String, ApiError> {
    let mut map = serde_json::Map::new();
    for field in CatalogField::ALL {
        map.insert(
            field.name().to_string(),
            serde_json::json!(catalog.options(field)),
        );
    }
    to_pretty_json(&map)
}
