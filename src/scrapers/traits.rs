use crate::error::NavigationError;
use std::fmt;
use std::time::Duration;

/// ARIA roles the search UI is located by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Button,
    Link,
    ListItem,
    Navigation,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Button => "button",
            Role::Link => "link",
            Role::ListItem => "listitem",
            Role::Navigation => "navigation",
        }
    }

    /// Element that carries this role without an explicit attribute
    pub fn implicit_tag(&self) -> &'static str {
        match self {
            Role::Button => "button",
            Role::Link => "a",
            Role::ListItem => "li",
            Role::Navigation => "nav",
        }
    }

    /// Selector for every element with this role, optionally inside `scope`
    pub fn css_within(&self, scope: Option<&str>) -> String {
        let scope = scope.map(|s| format!("{s} ")).unwrap_or_default();
        format!(
            "{scope}{}, {scope}[role=\"{}\"]",
            self.implicit_tag(),
            self.as_str()
        )
    }
}

/// How to find an element on the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    Css {
        selector: String,
        has_text: Option<String>,
    },
    Placeholder(String),
    Role {
        role: Role,
        /// Exact accessible name, whitespace-normalized
        name: Option<String>,
        /// CSS selector of the container to search within
        within: Option<String>,
    },
}

impl Locator {
    pub fn css(selector: impl Into<String>) -> Self {
        Locator::Css {
            selector: selector.into(),
            has_text: None,
        }
    }

    pub fn css_with_text(selector: impl Into<String>, text: impl Into<String>) -> Self {
        Locator::Css {
            selector: selector.into(),
            has_text: Some(text.into()),
        }
    }

    pub fn placeholder(text: impl Into<String>) -> Self {
        Locator::Placeholder(text.into())
    }

    pub fn role(role: Role, name: impl Into<String>) -> Self {
        Locator::Role {
            role,
            name: Some(name.into()),
            within: None,
        }
    }

    pub fn role_within(role: Role, container: impl Into<String>) -> Self {
        Locator::Role {
            role,
            name: None,
            within: Some(container.into()),
        }
    }

    /// CSS selector equivalent, when the locator has one
    pub fn to_css(&self) -> Option<String> {
        match self {
            Locator::Css { selector, .. } => Some(selector.clone()),
            Locator::Placeholder(text) => Some(format!(
                "[placeholder=\"{}\"]",
                text.replace('\\', "\\\\").replace('"', "\\\"")
            )),
            Locator::Role { role, name: None, within } => Some(role.css_within(within.as_deref())),
            Locator::Role { name: Some(_), .. } => None,
        }
    }

    /// XPath for named roles, matched on normalized text like an accessible name
    pub fn to_xpath(&self) -> Option<String> {
        let Locator::Role { role, name: Some(name), within } = self else {
            return None;
        };
        if within.is_some() {
            return None;
        }
        let tag = role.implicit_tag();
        let href = if matches!(role, Role::Link) { "[@href]" } else { "" };
        Some(format!(
            "//*[(self::{tag}{href}) or @role='{}'][normalize-space(.)={}]",
            role.as_str(),
            xpath_literal(name)
        ))
    }
}

fn xpath_literal(text: &str) -> String {
    if !text.contains('\'') {
        return format!("'{text}'");
    }
    if !text.contains('"') {
        return format!("\"{text}\"");
    }
    let parts: Vec<String> = text.split('\'').map(|p| format!("'{p}'")).collect();
    format!("concat({})", parts.join(", \"'\", "))
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Css { selector, has_text: None } => write!(f, "css={selector}"),
            Locator::Css { selector, has_text: Some(text) } => {
                write!(f, "css={selector}[has-text=\"{text}\"]")
            }
            Locator::Placeholder(text) => write!(f, "placeholder={text}"),
            Locator::Role { role, name, within } => {
                if let Some(within) = within {
                    write!(f, "{within} >> ")?;
                }
                write!(f, "role={}", role.as_str())?;
                if let Some(name) = name {
                    write!(f, "[name=\"{name}\"]")?;
                }
                Ok(())
            }
        }
    }
}

/// Capabilities the scraper needs from a live browser page.
/// Every call blocks until the browser has acted on it.
pub trait BrowserPage {
    fn goto(&self, url: &str) -> Result<(), NavigationError>;

    fn current_url(&self) -> Result<String, NavigationError>;

    fn click(&self, locator: &Locator) -> Result<(), NavigationError>;

    /// Click through the DOM, ignoring anything that overlays the element
    fn force_click(&self, locator: &Locator) -> Result<(), NavigationError>;

    /// Focus the element and type `text` into it
    fn fill(&self, locator: &Locator, text: &str) -> Result<(), NavigationError>;

    fn clear(&self, locator: &Locator) -> Result<(), NavigationError>;

    fn scroll_into_view(&self, locator: &Locator) -> Result<(), NavigationError>;

    /// Rendered text of every element matching `locator`, in document order
    fn inner_texts(&self, locator: &Locator) -> Result<Vec<String>, NavigationError>;

    /// Serialized DOM of the whole page
    fn content(&self) -> Result<String, NavigationError>;

    fn screenshot(&self) -> Result<Vec<u8>, NavigationError>;

    /// Fixed wait; the only signal available for client-side rendering
    fn pause(&self, duration: Duration);
}
