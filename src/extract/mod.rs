//! Extraction of project records from catalog markup
//!
//! This module contains the two parsing passes of the pipeline:
//! - Reference discovery from a listing page
//! - Field-by-field detail extraction from a project page
//!
//! Both are pure functions over already-fetched markup.

mod detail;
mod listing;
pub mod query;

pub use detail::extract_detail;
pub use listing::discover;
