use crate::error::NavigationError;
use crate::scrapers::traits::{BrowserPage, Locator};
use anyhow::{Context, Result};
use headless_chrome::browser::tab::NoElementFound;
use headless_chrome::protocol::cdp::Page::CaptureScreenshotFormatOption;
use headless_chrome::{Browser, Element, LaunchOptions, Tab};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, info};

// Sets the value through the native setter so React notices the change
const CLEAR_INPUT_JS: &str = r#"function() {
    const setter = Object.getOwnPropertyDescriptor(HTMLInputElement.prototype, 'value').set;
    setter.call(this, '');
    this.dispatchEvent(new Event('input', { bubbles: true }));
}"#;

const FORCE_CLICK_JS: &str = "function() { this.click(); }";

/// One Chrome instance with the single tab the whole run drives
pub struct ChromeSession {
    browser: Browser,
    tab: Arc<Tab>,
    element_timeout: Duration,
}

impl ChromeSession {
    /// Launch Chrome and open the tab
    pub fn launch(headless: bool, element_timeout: Duration) -> Result<Self> {
        info!(
            "Launching {} Chrome...",
            if headless { "headless" } else { "visible" }
        );

        let options = LaunchOptions::default_builder()
            .headless(headless)
            .window_size(Some((1366, 900)))
            .idle_browser_timeout(element_timeout.max(Duration::from_secs(120)))
            .build()
            .context("Failed to build launch options")?;

        let browser = Browser::new(options).context("Failed to launch Chrome browser")?;
        let tab = browser.new_tab().context("Failed to open browser tab")?;
        tab.set_default_timeout(element_timeout);

        Ok(Self {
            browser,
            tab,
            element_timeout,
        })
    }

    pub fn close(self) -> Result<()> {
        info!("Closing browser");
        self.tab.close(true).context("Failed to close tab")?;
        drop(self.browser);
        Ok(())
    }

    fn locate(&self, locator: &Locator) -> Result<Element<'_>, NavigationError> {
        let timeout = self.element_timeout;
        debug!("Locating {}", locator);

        if let Locator::Css {
            selector,
            has_text: Some(text),
        } = locator
        {
            self.tab
                .wait_for_element_with_custom_timeout(selector, timeout)
                .map_err(not_found(locator))?;
            let candidates = self.tab.find_elements(selector).map_err(not_found(locator))?;
            return candidates
                .into_iter()
                .find(|el| {
                    el.get_inner_text()
                        .map(|inner| inner.contains(text.as_str()))
                        .unwrap_or(false)
                })
                .ok_or_else(|| NavigationError::ElementNotFound {
                    locator: locator.to_string(),
                });
        }

        if let Some(xpath) = locator.to_xpath() {
            return self
                .tab
                .wait_for_xpath_with_custom_timeout(&xpath, timeout)
                .map_err(not_found(locator));
        }

        let css = locator.to_css().ok_or_else(|| NavigationError::ElementNotFound {
            locator: locator.to_string(),
        })?;
        self.tab
            .wait_for_element_with_custom_timeout(&css, timeout)
            .map_err(not_found(locator))
    }
}

fn not_found<E>(locator: &Locator) -> impl FnOnce(E) -> NavigationError + '_ {
    move |_| NavigationError::ElementNotFound {
        locator: locator.to_string(),
    }
}

fn browser_error<E: Into<anyhow::Error>>(err: E) -> NavigationError {
    NavigationError::Browser(err.into())
}

/// No match is an empty page; any other lookup failure is a driver error
fn found_or_empty<T>(lookup: Result<Vec<T>>) -> Result<Vec<T>, NavigationError> {
    match lookup {
        Ok(found) => Ok(found),
        Err(e) if e.is::<NoElementFound>() => Ok(Vec::new()),
        Err(e) => Err(browser_error(e)),
    }
}

impl BrowserPage for ChromeSession {
    fn goto(&self, url: &str) -> Result<(), NavigationError> {
        self.tab.navigate_to(url).map_err(browser_error)?;
        self.tab.wait_until_navigated().map_err(browser_error)?;
        Ok(())
    }

    fn current_url(&self) -> Result<String, NavigationError> {
        Ok(self.tab.get_url())
    }

    fn click(&self, locator: &Locator) -> Result<(), NavigationError> {
        self.locate(locator)?.click().map_err(browser_error)?;
        Ok(())
    }

    fn force_click(&self, locator: &Locator) -> Result<(), NavigationError> {
        self.locate(locator)?
            .call_js_fn(FORCE_CLICK_JS, vec![], false)
            .map_err(browser_error)?;
        Ok(())
    }

    fn fill(&self, locator: &Locator, text: &str) -> Result<(), NavigationError> {
        let element = self.locate(locator)?;
        element.click().map_err(browser_error)?;
        element.type_into(text).map_err(browser_error)?;
        Ok(())
    }

    fn clear(&self, locator: &Locator) -> Result<(), NavigationError> {
        self.locate(locator)?
            .call_js_fn(CLEAR_INPUT_JS, vec![], false)
            .map_err(browser_error)?;
        Ok(())
    }

    fn scroll_into_view(&self, locator: &Locator) -> Result<(), NavigationError> {
        self.locate(locator)?
            .scroll_into_view()
            .map_err(browser_error)?;
        Ok(())
    }

    fn inner_texts(&self, locator: &Locator) -> Result<Vec<String>, NavigationError> {
        if let Locator::Role {
            within: Some(container),
            ..
        } = locator
        {
            self.locate(&Locator::css(container))?;
        }

        let elements = found_or_empty(match (locator.to_xpath(), locator.to_css()) {
            (Some(xpath), _) => self.tab.find_elements_by_xpath(&xpath),
            (None, Some(css)) => self.tab.find_elements(&css),
            (None, None) => return Ok(Vec::new()),
        })?;

        elements
            .iter()
            .map(|el| el.get_inner_text().map_err(browser_error))
            .collect()
    }

    fn content(&self) -> Result<String, NavigationError> {
        self.tab.get_content().map_err(browser_error)
    }

    fn screenshot(&self) -> Result<Vec<u8>, NavigationError> {
        self.tab
            .capture_screenshot(CaptureScreenshotFormatOption::Png, None, None, true)
            .map_err(browser_error)
    }

    fn pause(&self, duration: Duration) {
        thread::sleep(duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_match_reads_as_empty_page() {
        let lookup: Result<Vec<u32>> = Err(NoElementFound {}.into());
        assert_eq!(found_or_empty(lookup).unwrap(), Vec::<u32>::new());
    }

    #[test]
    fn test_dropped_connection_is_a_browser_error() {
        let lookup: Result<Vec<u32>> = Err(anyhow::anyhow!("connection closed"));
        let err = found_or_empty(lookup).unwrap_err();
        assert!(matches!(err, NavigationError::Browser(ref e) if e.to_string() == "connection closed"));
    }

    #[test]
    fn test_found_elements_pass_through() {
        assert_eq!(found_or_empty(Ok(vec![1, 2])).unwrap(), vec![1, 2]);
    }
}
