//! Controlled vocabularies for analysis output
//!
//! Later schema revisions constrain brand, colour, and subcategory to known
//! catalog values. The lists are configuration-loaded, not hard-coded, so
//! they can grow without code changes; empty lists leave the corresponding
//! field unconstrained.

use serde::Deserialize;

/// Configurable enumerations rendered into the analysis instructions.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Vocabularies {
    pub brands: Vec<String>,
    pub colours: Vec<String>,
    pub subcategories: Vec<String>,
}

impl Vocabularies {
    pub fn is_empty(&self) -> bool {
        self.brands.is_empty() && self.colours.is_empty() && self.subcategories.is_empty()
    }

    /// Render the non-empty lists as instruction constraints.
    pub fn render_constraints(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }

        let mut lines = Vec::new();
        if !self.brands.is_empty() {
            lines.push(format!(
                "- brand must be one of: {}",
                self.brands.join(", ")
            ));
        }
        if !self.colours.is_empty() {
            lines.push(format!(
                "- color must be one of: {}",
                self.colours.join(", ")
            ));
        }
        if !self.subcategories.is_empty() {
            lines.push(format!(
                "- subcategory must be one of: {}",
                self.subcategories.join(", ")
            ));
        }
        Some(lines.join("\n"))
    }
}
