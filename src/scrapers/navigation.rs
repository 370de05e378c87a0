use crate::error::{NavigationError, ScrapeError};
use crate::scrapers::profile::{Selectors, SiteProfile, Timings};
use crate::scrapers::traits::{BrowserPage, Locator, Role};
use crate::scrapers::types::RetryPolicy;
use regex::Regex;
use std::time::Duration;
use tracing::{debug, info, warn};

/// URL glob where `**` matches anything and `*` stops at `/`.
/// Everything else, `?` included, is literal.
#[derive(Debug, Clone)]
pub struct UrlPattern {
    glob: String,
    regex: Regex,
}

impl UrlPattern {
    pub fn glob(glob: &str) -> Result<Self, ScrapeError> {
        let mut pattern = String::from("^");
        let mut chars = glob.chars().peekable();
        while let Some(c) = chars.next() {
            if c == '*' {
                if chars.peek() == Some(&'*') {
                    chars.next();
                    pattern.push_str(".*");
                } else {
                    pattern.push_str("[^/]*");
                }
            } else {
                pattern.push_str(&regex::escape(&c.to_string()));
            }
        }
        pattern.push('$');

        let regex = Regex::new(&pattern).map_err(|source| ScrapeError::UrlPattern {
            glob: glob.to_string(),
            source,
        })?;
        Ok(Self {
            glob: glob.to_string(),
            regex,
        })
    }

    pub fn matches(&self, url: &str) -> bool {
        self.regex.is_match(url)
    }

    pub fn as_str(&self) -> &str {
        &self.glob
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavState {
    Idle,
    FiltersApplied,
    CityEntered,
    SearchSubmitted,
    OnResultsPage(u32),
}

/// Walks the search form and result pages of one browser page
pub struct NavigationController<'a, P: BrowserPage> {
    page: &'a P,
    selectors: &'a Selectors,
    timings: &'a Timings,
    results_url: UrlPattern,
    retry: RetryPolicy,
    state: NavState,
}

impl<'a, P: BrowserPage> NavigationController<'a, P> {
    pub fn new(page: &'a P, profile: &'a SiteProfile, retry: RetryPolicy) -> Result<Self, ScrapeError> {
        Ok(Self {
            page,
            selectors: &profile.selectors,
            timings: &profile.timings,
            results_url: UrlPattern::glob(&profile.selectors.results_url)?,
            retry,
            state: NavState::Idle,
        })
    }

    pub fn state(&self) -> NavState {
        self.state
    }

    pub fn page(&self) -> &'a P {
        self.page
    }

    pub fn open(&mut self, base_url: &str) -> Result<(), NavigationError> {
        info!("Opening {}", base_url);
        self.page.goto(base_url)?;
        self.state = NavState::Idle;
        Ok(())
    }

    /// Pick the office/store/warehouse types and the combined buy/rent
    /// transaction. The selection survives later searches in the session.
    pub fn apply_search_filters(&mut self) -> Result<(), NavigationError> {
        let selectors = self.selectors;
        debug!("Applying search filters");

        let types_toggle = Locator::css(&selectors.property_types_toggle);
        self.page.click(&types_toggle)?;
        for option in &selectors.property_type_options {
            self.page
                .click(&Locator::css_with_text(&option.selector, &option.text))?;
        }
        self.page.click(&types_toggle)?;

        let business_toggle = Locator::css(&selectors.business_type_toggle);
        let business = &selectors.business_type_option;
        self.page.click(&business_toggle)?;
        self.page
            .click(&Locator::css_with_text(&business.selector, &business.text))?;
        self.page.click(&business_toggle)?;

        self.state = NavState::FiltersApplied;
        Ok(())
    }

    /// Type `city`, pick the first suggestion and submit the search.
    /// On a repeat search the input still holds the previous city.
    pub fn enter_city(&mut self, city: &str, is_repeat_search: bool) -> Result<(), NavigationError> {
        let input = Locator::placeholder(&self.selectors.city_placeholder);

        if is_repeat_search {
            self.page.clear(&input)?;
            self.page.pause(self.timings.clear_settle());
        }

        debug!("Typing city {}", city);
        self.page.fill(&input, city)?;
        self.page.pause(self.timings.suggestion_settle());
        // Free text alone does not scope the search; the suggestion does
        self.page
            .click(&Locator::css(&self.selectors.first_suggestion))?;
        self.state = NavState::CityEntered;

        let search = Locator::role(Role::Button, &self.selectors.search_button);
        self.state = NavState::SearchSubmitted;
        self.with_retry("submit search", |nav| {
            nav.page.click(&search)?;
            nav.wait_for_results()
        })?;

        self.state = NavState::OnResultsPage(1);
        Ok(())
    }

    pub fn go_to_page(&mut self, number: u32) -> Result<(), NavigationError> {
        debug!("Going to results page {}", number);
        let link = Locator::role(Role::Link, number.to_string());

        self.page.scroll_into_view(&link)?;
        self.with_retry("change page", |nav| {
            nav.page.force_click(&link)?;
            nav.wait_for_results()
        })?;
        // The grid has no loading indicator to wait on
        self.page.pause(self.timings.page_settle());

        self.state = NavState::OnResultsPage(number);
        Ok(())
    }

    fn wait_for_results(&self) -> Result<(), NavigationError> {
        let timeout = self.timings.url_timeout();
        let poll = self.timings.url_poll();
        let mut waited = Duration::ZERO;

        loop {
            let url = self.page.current_url()?;
            if self.results_url.matches(&url) {
                return Ok(());
            }
            if waited >= timeout {
                return Err(NavigationError::UrlTimeout {
                    pattern: self.results_url.as_str().to_string(),
                    last_url: url,
                    waited,
                });
            }
            self.page.pause(poll);
            waited += poll;
        }
    }

    fn with_retry<T>(
        &self,
        step: &str,
        mut op: impl FnMut(&Self) -> Result<T, NavigationError>,
    ) -> Result<T, NavigationError> {
        let mut attempt = 1;
        loop {
            match op(self) {
                Ok(value) => return Ok(value),
                Err(e) if e.is_transient() && attempt < self.retry.max_attempts => {
                    let backoff_ms = self.retry.backoff_ms.saturating_mul(u64::from(attempt));
                    let backoff = Duration::from_millis(backoff_ms);
                    warn!(
                        "{} failed (attempt {}/{}): {}; retrying in {:?}",
                        step, attempt, self.retry.max_attempts, e, backoff
                    );
                    self.page.pause(backoff);
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
