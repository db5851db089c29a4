//! Opportunity Scoreboard view model
//!
//! Takes a list of opportunity records from a data source, derives the
//! presentation fields for each, and answers filtered/sorted/aggregated views
//! for whatever UI layer sits on top.

pub mod board;
pub mod constants;
pub mod error;
pub mod format;
mod lenient;
pub mod opportunity;
pub mod view;

pub use board::Scoreboard;
pub use error::{FetchError, ParseCategoryError, ParseSortFieldError};
pub use opportunity::{BarColor, DisplayOpportunity, RawOpportunity, enrich};
pub use view::{CATEGORY_OPTIONS, CategoryFilter, CategoryOption, SortDirection, SortField, ViewState};
