use crate::error::ScrapeError;
use crate::models::PropertyRecord;
use crate::scrapers::listings::ListingExtractor;
use crate::scrapers::navigation::NavigationController;
use crate::scrapers::pagination::PaginationIndexer;
use crate::scrapers::parser::RecordParser;
use crate::scrapers::profile::SiteProfile;
use crate::scrapers::traits::BrowserPage;
use crate::scrapers::types::{PaginationState, RetryPolicy, SearchFilter};
use tracing::{debug, info};

/// Commercial listing scraper for metrocuadrado.com.
///
/// Runs every (city, modality) pass through one browser page, strictly in
/// order, and visits every result page of a pass before starting the next.
pub struct MetrocuadradoScraper<'a, P: BrowserPage> {
    nav: NavigationController<'a, P>,
    pagination: PaginationIndexer,
    extractor: ListingExtractor<'a>,
    parser: RecordParser<'a>,
}

impl<'a, P: BrowserPage> MetrocuadradoScraper<'a, P> {
    pub fn new(page: &'a P, profile: &'a SiteProfile, retry: RetryPolicy) -> Result<Self, ScrapeError> {
        Ok(Self {
            nav: NavigationController::new(page, profile, retry)?,
            pagination: PaginationIndexer::new(&profile.selectors.pagination),
            extractor: ListingExtractor::new(
                &profile.selectors.results_list,
                &profile.labels.card_signature,
            ),
            parser: RecordParser::new(&profile.labels),
        })
    }

    /// Scrape sale and rent listings for every city. Any navigation or
    /// pagination failure aborts the whole run and nothing is returned.
    pub fn scrape(&mut self, base_url: &str, cities: &[String]) -> Result<Vec<PropertyRecord>, ScrapeError> {
        self.nav.open(base_url)?;

        let mut records = Vec::new();
        for (idx, filter) in SearchFilter::passes(cities).iter().enumerate() {
            // Filter selection sticks for the rest of the session
            if idx == 0 {
                self.nav.apply_search_filters()?;
            }

            let mut found = self.scrape_pass(filter, idx > 0)?;
            info!(
                "{} / {}: {} listings",
                filter.city,
                filter.modality,
                found.len()
            );
            records.append(&mut found);
        }

        info!("Scraped {} listings across {} cities", records.len(), cities.len());
        Ok(records)
    }

    fn scrape_pass(&mut self, filter: &SearchFilter, is_repeat_search: bool) -> Result<Vec<PropertyRecord>, ScrapeError> {
        info!("Searching {} ({})", filter.city, filter.modality);
        self.nav.enter_city(&filter.city, is_repeat_search)?;

        let total = self.pagination.total_pages(self.nav.page())?;
        let mut pages = PaginationState::new(total)?;
        info!("{} result pages for {}", pages.total(), filter.city);

        let mut records = self.scrape_current_page(filter, pages.current())?;
        while let Some(number) = pages.advance() {
            self.nav.go_to_page(number)?;
            records.extend(self.scrape_current_page(filter, number)?);
        }
        Ok(records)
    }

    fn scrape_current_page(&self, filter: &SearchFilter, number: u32) -> Result<Vec<PropertyRecord>, ScrapeError> {
        let cards = self.extractor.visible_listings(self.nav.page())?;

        let mut records = Vec::new();
        let mut discarded = 0;
        for card in &cards {
            match self.parser.parse(card) {
                Ok(record) if filter.keeps(record.modality) => records.push(record),
                Ok(_) => {}
                Err(reason) => {
                    discarded += 1;
                    debug!("Discarded listing on page {}: {}", number, reason);
                }
            }
        }

        debug!(
            "Page {} ({:?}): {} cards, {} kept, {} discarded",
            number,
            self.nav.state(),
            cards.len(),
            records.len(),
            discarded
        );
        Ok(records)
    }
}
