//! Search module.
//!
//! Contains the shop's filters, sort options and pagination.

mod filter;
mod query;
mod results;

pub use filter::{Filter, PriceRange, DEFAULT_MAX_PRICE};
pub use query::{
    NoRatings, RatingLookup, SearchQuery, SortOption, DEFAULT_PER_PAGE, PER_PAGE_OPTIONS,
};
pub use results::{Pagination, SearchResults};
