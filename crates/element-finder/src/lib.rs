//! Element Finder: tries nine resolution strategies in priority order
//! against a target document and returns the best match with confidence.

mod errors;
mod finder;
mod strategy;

pub use errors::{FinderDiagnostics, FinderError};
pub use finder::{DefaultElementFinder, ElementFinder, FindOutcome, FinderOptions};
pub use strategy::Strategy;
