pub mod browser;
pub mod listings;
pub mod metrocuadrado;
pub mod navigation;
pub mod pagination;
pub mod parser;
pub mod profile;
pub mod traits;
pub mod types;

#[cfg(test)]
pub mod testing;

pub use browser::ChromeSession;
pub use metrocuadrado::MetrocuadradoScraper;
pub use profile::SiteProfile;
pub use traits::BrowserPage;
pub use types::RetryPolicy;
