use crate::error::{ParseError, ScrapeError};
use crate::scrapers::traits::{BrowserPage, Role};
use scraper::{Html, Selector};
use tracing::debug;

/// Reads the page count out of the results pagination control
pub struct PaginationIndexer {
    entries_css: String,
}

impl PaginationIndexer {
    pub fn new(container: &str) -> Self {
        Self {
            entries_css: Role::ListItem.css_within(Some(container)),
        }
    }

    pub fn total_pages<P: BrowserPage>(&self, page: &P) -> Result<u32, ScrapeError> {
        let html = page.content()?;
        Ok(self.total_pages_in(&html)?)
    }

    /// Count pages from a serialized results page
    pub fn total_pages_in(&self, html: &str) -> Result<u32, ParseError> {
        let selector = Selector::parse(&self.entries_css).map_err(|_| ParseError::Selector {
            selector: self.entries_css.clone(),
        })?;

        let document = Html::parse_document(html);
        let entries: Vec<String> = document
            .select(&selector)
            .map(|li| li.text().collect::<String>().trim().to_string())
            .collect();
        debug!("Pagination entries: {:?}", entries);

        total_pages_from_entries(&entries)
    }
}

/// The last two entries are the next/last arrows; the one before them is
/// the highest page number.
pub fn total_pages_from_entries(entries: &[String]) -> Result<u32, ParseError> {
    if entries.len() < 3 {
        return Err(ParseError::PaginationTooShort {
            entries: entries.len(),
        });
    }
    let text = entries[entries.len() - 3].trim();
    text.parse().map_err(|_| ParseError::PageNumber {
        text: text.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_third_from_last_entry() {
        assert_eq!(
            total_pages_from_entries(&entries(&["1", "2", "3", "›", "»"])).unwrap(),
            3
        );
        assert_eq!(
            total_pages_from_entries(&entries(&["1", "2", "...", "25", "›", "»"])).unwrap(),
            25
        );
    }

    #[test]
    fn test_too_few_entries() {
        let err = total_pages_from_entries(&entries(&["›", "»"])).unwrap_err();
        assert!(matches!(err, ParseError::PaginationTooShort { entries: 2 }));

        let err = total_pages_from_entries(&[]).unwrap_err();
        assert!(matches!(err, ParseError::PaginationTooShort { entries: 0 }));
    }

    #[test]
    fn test_non_numeric_entry() {
        let err = total_pages_from_entries(&entries(&["...", "›", "»"])).unwrap_err();
        assert!(matches!(err, ParseError::PageNumber { text } if text == "..."));
    }

    #[test]
    fn test_reads_pagination_from_html() {
        let html = r#"
            <html><body>
              <ul class="other"><li>99</li><li>a</li><li>b</li></ul>
              <ul class="paginator pagination">
                <li class="item"><a href="?page=1"> 1 </a></li>
                <li class="item"><a href="?page=2">2</a></li>
                <li class="item"><a href="?page=3">3</a></li>
                <li class="item"><a href="?page=4">4</a></li>
                <li class="item next"><a href="?page=2">›</a></li>
                <li class="item last"><a href="?page=4">»</a></li>
              </ul>
            </body></html>
        "#;
        let indexer = PaginationIndexer::new(".paginator.pagination");
        assert_eq!(indexer.total_pages_in(html).unwrap(), 4);
    }

    #[test]
    fn test_entries_are_scoped_to_the_container() {
        let indexer = PaginationIndexer::new(".paginator.pagination");
        assert_eq!(
            indexer.entries_css,
            ".paginator.pagination li, .paginator.pagination [role=\"listitem\"]"
        );
    }

    #[test]
    fn test_missing_pagination_control() {
        let indexer = PaginationIndexer::new(".paginator.pagination");
        let err = indexer
            .total_pages_in("<html><body><p>Sin resultados</p></body></html>")
            .unwrap_err();
        assert!(matches!(err, ParseError::PaginationTooShort { entries: 0 }));
    }
}
