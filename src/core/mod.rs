pub mod generator;
pub mod loader;

pub use generator::HtmlGenerator;
pub use loader::{Loader, SiteContent};
