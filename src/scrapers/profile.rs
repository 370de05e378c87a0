//! Selector and label table for the search site.
//!
//! Navigation and parsing read every site-specific literal from here.

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SiteProfile {
    #[serde(default)]
    pub selectors: Selectors,
    #[serde(default)]
    pub labels: ListingLabels,
    #[serde(default)]
    pub timings: Timings,
}

/// A dropdown option located by id and expected text
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OptionSelector {
    pub selector: String,
    pub text: String,
}

impl OptionSelector {
    fn new(selector: &str, text: &str) -> Self {
        Self {
            selector: selector.to_string(),
            text: text.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Selectors {
    pub property_types_toggle: String,
    pub property_type_options: Vec<OptionSelector>,
    pub business_type_toggle: String,
    pub business_type_option: OptionSelector,
    pub city_placeholder: String,
    pub first_suggestion: String,
    pub search_button: String,
    /// Glob the URL must match once results are showing
    pub results_url: String,
    pub pagination: String,
    pub results_list: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            property_types_toggle: "#propertyTypes".to_string(),
            property_type_options: vec![
                OptionSelector::new("#react-select-2-option-2", "Oficinas"),
                OptionSelector::new("#react-select-2-option-3", "Locales"),
                OptionSelector::new("#react-select-2-option-4", "Bodegas"),
            ],
            business_type_toggle: "#businessType".to_string(),
            business_type_option: OptionSelector::new(
                "#react-select-3-option-2",
                "Compra Nuevo y Usado",
            ),
            city_placeholder: "Ciudad, Zona o Barrio".to_string(),
            first_suggestion: "#react-autowhatever-location-section-0-item-0".to_string(),
            search_button: "Buscar".to_string(),
            results_url: "**?search=form".to_string(),
            pagination: ".paginator.pagination".to_string(),
            results_list: ".realestate-results-list.browse-results-list".to_string(),
        }
    }
}

/// Literal text fragments of a rendered listing card
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ListingLabels {
    /// Leading whitespace only genuine listing cards start with
    pub card_signature: String,
    pub action_boilerplate: String,
    /// Applied in order after the signature and boilerplate are removed
    pub layout_replacements: Vec<(String, String)>,
    pub field_delimiter: String,
    pub label_delimiter: String,
    pub location_delimiter: String,
    pub bathrooms_label: String,
    pub rent_token: String,
    pub sale_token: String,
    /// Removed from the type+modality text to leave the building type
    pub type_noise: Vec<String>,
    pub currency_symbol: String,
    pub area_unit: String,
}

impl Default for ListingLabels {
    fn default() -> Self {
        Self {
            card_signature: "\t\n\n".to_string(),
            action_boilerplate: "\n\nAgregar a favorito\n\t\nContactar".to_string(),
            layout_replacements: vec![
                ("\n\n\t".to_string(), " | ".to_string()),
                ("\n\n".to_string(), ": ".to_string()),
                ("\n".to_string(), " | ".to_string()),
            ],
            field_delimiter: " | ".to_string(),
            label_delimiter: ": ".to_string(),
            location_delimiter: ", ".to_string(),
            bathrooms_label: "Baños".to_string(),
            rent_token: "Arriendo".to_string(),
            sale_token: "Venta".to_string(),
            type_noise: ["en Venta", "Comercial", "y Arriendo", "en Arriendo"]
                .into_iter()
                .map(String::from)
                .collect(),
            currency_symbol: "$".to_string(),
            area_unit: "m²".to_string(),
        }
    }
}

/// Fixed waits, in milliseconds
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Timings {
    pub clear_settle_ms: u64,
    pub suggestion_settle_ms: u64,
    pub page_settle_ms: u64,
    pub url_timeout_ms: u64,
    pub url_poll_ms: u64,
    pub element_timeout_ms: u64,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            clear_settle_ms: 1000,
            suggestion_settle_ms: 2000,
            page_settle_ms: 1000,
            url_timeout_ms: 30_000,
            url_poll_ms: 250,
            element_timeout_ms: 30_000,
        }
    }
}

impl Timings {
    pub fn clear_settle(&self) -> Duration {
        Duration::from_millis(self.clear_settle_ms)
    }

    pub fn suggestion_settle(&self) -> Duration {
        Duration::from_millis(self.suggestion_settle_ms)
    }

    pub fn page_settle(&self) -> Duration {
        Duration::from_millis(self.page_settle_ms)
    }

    pub fn url_timeout(&self) -> Duration {
        Duration::from_millis(self.url_timeout_ms)
    }

    pub fn url_poll(&self) -> Duration {
        Duration::from_millis(self.url_poll_ms.max(1))
    }

    pub fn element_timeout(&self) -> Duration {
        Duration::from_millis(self.element_timeout_ms)
    }
}
