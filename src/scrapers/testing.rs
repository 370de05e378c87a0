//! Scripted stand-in for a browser tab, driven by the default site profile.

use crate::error::NavigationError;
use crate::scrapers::profile::Selectors;
use crate::scrapers::traits::{BrowserPage, Locator, Role};
use std::cell::RefCell;
use std::collections::HashSet;
use std::time::Duration;

pub const BASE_URL: &str = "https://www.metrocuadrado.com/";

#[derive(Default)]
struct FakeState {
    url: String,
    city_input: String,
    current_page: u32,
    elapsed: Duration,
    log: Vec<String>,
    searches: Vec<String>,
    stalled_clicks: u32,
}

/// Simulates the search site: searching lands on page 1 of `pages`,
/// page links switch the visible listing cards. Time is virtual.
pub struct FakePage {
    selectors: Selectors,
    pages: Vec<Vec<String>>,
    missing: HashSet<String>,
    state: RefCell<FakeState>,
}

impl FakePage {
    pub fn new(pages: Vec<Vec<String>>) -> Self {
        Self {
            selectors: Selectors::default(),
            pages,
            missing: HashSet::new(),
            state: RefCell::new(FakeState::default()),
        }
    }

    /// Make the element behind `locator` absent from the page
    pub fn without(mut self, locator: &Locator) -> Self {
        self.missing.insert(locator.to_string());
        self
    }

    /// The next `count` navigating clicks leave the URL unchanged
    pub fn stall_clicks(&self, count: u32) {
        self.state.borrow_mut().stalled_clicks = count;
    }

    pub fn log(&self) -> Vec<String> {
        self.state.borrow().log.clone()
    }

    /// City input contents at each search submission
    pub fn searches(&self) -> Vec<String> {
        self.state.borrow().searches.clone()
    }

    pub fn elapsed(&self) -> Duration {
        self.state.borrow().elapsed
    }

    pub fn current_page(&self) -> u32 {
        self.state.borrow().current_page
    }

    fn check(&self, locator: &Locator) -> Result<(), NavigationError> {
        if self.missing.contains(&locator.to_string()) {
            return Err(NavigationError::ElementNotFound {
                locator: locator.to_string(),
            });
        }
        Ok(())
    }

    fn record(&self, entry: String) {
        self.state.borrow_mut().log.push(entry);
    }

    fn results_url() -> String {
        format!("{BASE_URL}oficina-local-bodega/venta-y-arriendo/?search=form")
    }

    fn page_number(&self, locator: &Locator) -> Option<u32> {
        match locator {
            Locator::Role { role: Role::Link, name: Some(name), within: None } => {
                name.parse().ok()
            }
            _ => None,
        }
    }
}

impl BrowserPage for FakePage {
    fn goto(&self, url: &str) -> Result<(), NavigationError> {
        self.record(format!("goto {url}"));
        self.state.borrow_mut().url = url.to_string();
        Ok(())
    }

    fn current_url(&self) -> Result<String, NavigationError> {
        Ok(self.state.borrow().url.clone())
    }

    fn click(&self, locator: &Locator) -> Result<(), NavigationError> {
        self.check(locator)?;
        self.record(format!("click {locator}"));

        if *locator == Locator::role(Role::Button, &self.selectors.search_button) {
            let mut state = self.state.borrow_mut();
            let city = state.city_input.clone();
            state.searches.push(city);
            if state.stalled_clicks > 0 {
                state.stalled_clicks -= 1;
            } else {
                state.url = Self::results_url();
                state.current_page = 1;
            }
        }
        Ok(())
    }

    fn force_click(&self, locator: &Locator) -> Result<(), NavigationError> {
        self.check(locator)?;
        self.record(format!("force_click {locator}"));

        if let Some(page) = self.page_number(locator) {
            let mut state = self.state.borrow_mut();
            if state.stalled_clicks > 0 {
                state.stalled_clicks -= 1;
                state.url = format!("{BASE_URL}cargando");
            } else {
                state.url = Self::results_url();
                state.current_page = page;
            }
        }
        Ok(())
    }

    fn fill(&self, locator: &Locator, text: &str) -> Result<(), NavigationError> {
        self.check(locator)?;
        self.record(format!("fill {locator} {text}"));
        // The city input keeps whatever was typed before
        self.state.borrow_mut().city_input.push_str(text);
        Ok(())
    }

    fn clear(&self, locator: &Locator) -> Result<(), NavigationError> {
        self.check(locator)?;
        self.record(format!("clear {locator}"));
        self.state.borrow_mut().city_input.clear();
        Ok(())
    }

    fn scroll_into_view(&self, locator: &Locator) -> Result<(), NavigationError> {
        self.check(locator)?;
        self.record(format!("scroll {locator}"));
        Ok(())
    }

    fn inner_texts(&self, locator: &Locator) -> Result<Vec<String>, NavigationError> {
        self.check(locator)?;
        let cards = Locator::role_within(Role::Navigation, &self.selectors.results_list);
        if *locator != cards {
            return Ok(Vec::new());
        }
        let current = self.state.borrow().current_page as usize;
        Ok(current
            .checked_sub(1)
            .and_then(|idx| self.pages.get(idx))
            .cloned()
            .unwrap_or_default())
    }

    fn content(&self) -> Result<String, NavigationError> {
        if self.pages.is_empty() {
            return Ok("<html><body><p>Sin resultados</p></body></html>".to_string());
        }
        let items: String = (1..=self.pages.len())
            .map(|n| format!("<li><a href=\"?page={n}\">{n}</a></li>"))
            .collect();
        Ok(format!(
            "<html><body><ul class=\"paginator pagination\">{items}<li><a>›</a></li><li><a>»</a></li></ul></body></html>"
        ))
    }

    fn screenshot(&self) -> Result<Vec<u8>, NavigationError> {
        Ok(b"\x89PNG".to_vec())
    }

    fn pause(&self, duration: Duration) {
        let mut state = self.state.borrow_mut();
        state.elapsed += duration;
        state.log.push(format!("pause {}ms", duration.as_millis()));
    }
}
