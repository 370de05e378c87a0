use crate::error::NavigationError;
use crate::scrapers::traits::{BrowserPage, Locator, Role};

/// Collects the raw text of each listing card on the current results page
pub struct ListingExtractor<'a> {
    cards: Locator,
    signature: &'a str,
}

impl<'a> ListingExtractor<'a> {
    /// `signature` is the leading whitespace only real listing cards render;
    /// share buttons and other navigation elements in the list lack it.
    pub fn new(results_list: &str, signature: &'a str) -> Self {
        Self {
            cards: Locator::role_within(Role::Navigation, results_list),
            signature,
        }
    }

    /// Listing texts in on-page order
    pub fn visible_listings<P: BrowserPage>(&self, page: &P) -> Result<Vec<String>, NavigationError> {
        let texts = page.inner_texts(&self.cards)?;
        Ok(self.filter_cards(texts))
    }

    pub fn filter_cards(&self, texts: Vec<String>) -> Vec<String> {
        texts
            .into_iter()
            .filter(|text| text.starts_with(self.signature))
            .collect()
    }
}
