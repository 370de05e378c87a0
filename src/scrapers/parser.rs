use crate::models::{BuildingType, Modality, PropertyRecord};
use crate::scrapers::profile::ListingLabels;
use thiserror::Error;

/// Why a listing card was dropped. Drops are not errors; callers only log them.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Discard {
    #[error("expected 4 or 5 fields, found {0}")]
    FieldCount(usize),
    #[error("expected 2 or 3 location parts, found {0}")]
    LocationParts(usize),
    #[error("unknown building type `{0}`")]
    BuildingType(String),
    #[error("field `{0}` has no value")]
    MissingValue(String),
    #[error("price `{0}` is not numeric")]
    Price(String),
    #[error("area `{0}` is not numeric")]
    Area(String),
    #[error("count `{0}` is not an integer")]
    Count(String),
}

/// Turns the rendered text of one listing card into a [`PropertyRecord`].
///
/// Pure text transformation: the same input always gives the same record
/// or the same discard.
pub struct RecordParser<'a> {
    labels: &'a ListingLabels,
}

impl<'a> RecordParser<'a> {
    pub fn new(labels: &'a ListingLabels) -> Self {
        Self { labels }
    }

    /// Rewrite the card text into `location | Label: value | ...` form,
    /// backfilling a zero bathrooms field the site leaves out.
    pub fn normalize(&self, raw: &str) -> String {
        let labels = self.labels;
        let mut text = raw
            .replace(&labels.card_signature, "")
            .replace(&labels.action_boilerplate, "");
        for (from, to) in &labels.layout_replacements {
            text = text.replace(from, to);
        }

        if !text.contains(&labels.bathrooms_label) {
            text.push_str(&labels.field_delimiter);
            text.push_str(&labels.bathrooms_label);
            text.push_str(&labels.label_delimiter);
            text.push('0');
        }
        text
    }

    pub fn parse(&self, raw: &str) -> Result<PropertyRecord, Discard> {
        let canonical = self.normalize(raw);
        let segments: Vec<&str> = canonical.split(self.labels.field_delimiter.as_str()).collect();

        let (location, price, area, rooms, bathrooms) = match segments.as_slice() {
            [location, price, area, bathrooms] => (*location, *price, *area, None, *bathrooms),
            [location, price, area, rooms, bathrooms] => {
                (*location, *price, *area, Some(*rooms), *bathrooms)
            }
            other => return Err(Discard::FieldCount(other.len())),
        };

        let parts: Vec<&str> = location.split(self.labels.location_delimiter.as_str()).collect();
        let (type_text, neighborhood, city) = match parts.as_slice() {
            [type_text, city] => (*type_text, None, *city),
            [type_text, neighborhood, city] => (*type_text, Some(*neighborhood), *city),
            other => return Err(Discard::LocationParts(other.len())),
        };

        let rooms = match rooms {
            Some(segment) => parse_count(self.value(segment)?)?,
            None => 0,
        };

        Ok(PropertyRecord {
            building_type: self.building_type(type_text)?,
            modality: self.modality(type_text),
            neighborhood: neighborhood.map(|n| n.trim().to_lowercase()),
            city: city.trim().to_lowercase(),
            price_cop: self.price(self.value(price)?)?,
            area_sq_meters: self.area(self.value(area)?)?,
            rooms,
            bathrooms: parse_count(self.value(bathrooms)?)?,
        })
    }

    fn value<'s>(&self, segment: &'s str) -> Result<&'s str, Discard> {
        segment
            .split_once(self.labels.label_delimiter.as_str())
            .map(|(_, value)| value.trim())
            .filter(|value| !value.is_empty())
            .ok_or_else(|| Discard::MissingValue(segment.to_string()))
    }

    fn building_type(&self, type_text: &str) -> Result<BuildingType, Discard> {
        let mut label = type_text.to_string();
        for noise in &self.labels.type_noise {
            label = label.replace(noise.as_str(), "");
        }
        let label = label.trim().to_lowercase();
        BuildingType::from_label(&label).ok_or(Discard::BuildingType(label))
    }

    // Rent is checked first, so a "Venta y Arriendo" card counts as rent
    fn modality(&self, type_text: &str) -> Modality {
        if type_text.contains(&self.labels.rent_token) {
            Modality::Rent
        } else if type_text.contains(&self.labels.sale_token) {
            Modality::Sale
        } else {
            Modality::Unspecified
        }
    }

    fn price(&self, value: &str) -> Result<u64, Discard> {
        let digits: String = value
            .replace(&self.labels.currency_symbol, "")
            .chars()
            .filter(|c| !matches!(c, '.' | ',' | ' ' | '\u{a0}'))
            .collect();
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(Discard::Price(value.to_string()));
        }
        digits.parse().map_err(|_| Discard::Price(value.to_string()))
    }

    // Same locale as the price: `.` groups thousands, `,` marks decimals
    fn area(&self, value: &str) -> Result<String, Discard> {
        let number = value
            .strip_suffix(self.labels.area_unit.as_str())
            .unwrap_or(value)
            .trim()
            .replace('.', "")
            .replace(',', ".");

        let numeric = !number.is_empty()
            && number.chars().all(|c| c.is_ascii_digit() || c == '.')
            && number.parse::<f64>().is_ok();
        if numeric {
            Ok(number)
        } else {
            Err(Discard::Area(value.to_string()))
        }
    }
}

fn parse_count(value: &str) -> Result<u32, Discard> {
    value.parse().map_err(|_| Discard::Count(value.to_string()))
}
