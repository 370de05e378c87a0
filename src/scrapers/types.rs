use crate::error::ParseError;
use crate::models::Modality;
use serde::{Deserialize, Serialize};

/// One (city, modality) search pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFilter {
    pub city: String,
    pub modality: Modality,
}

impl SearchFilter {
    /// Every city gets a sale pass followed by a rent pass
    pub fn passes(cities: &[String]) -> Vec<SearchFilter> {
        cities
            .iter()
            .flat_map(|city| {
                [Modality::Sale, Modality::Rent].map(|modality| SearchFilter {
                    city: city.clone(),
                    modality,
                })
            })
            .collect()
    }

    /// Whether a parsed record belongs to this pass. Both passes see the
    /// combined buy/rent result set, so each listing is kept by exactly one.
    pub fn keeps(&self, modality: Modality) -> bool {
        match self.modality {
            Modality::Sale => matches!(modality, Modality::Sale | Modality::Unspecified),
            other => modality == other,
        }
    }
}

/// Position within the paginated results of one pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationState {
    current: u32,
    total: u32,
}

impl PaginationState {
    pub fn new(total: u32) -> Result<Self, ParseError> {
        if total == 0 {
            return Err(ParseError::ZeroPages);
        }
        Ok(Self { current: 1, total })
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    /// Move to the next page, if any
    pub fn advance(&mut self) -> Option<u32> {
        if self.current >= self.total {
            return None;
        }
        self.current += 1;
        Some(self.current)
    }
}

/// Bounded retry around navigation steps that can fail on timing alone
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RetryPolicy {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,
}

fn default_max_attempts() -> u32 {
    1
}

fn default_backoff_ms() -> u64 {
    2000
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff_ms: default_backoff_ms(),
        }
    }
}
