pub mod display;

pub use display::{print_search_banner, SearchSummary};
