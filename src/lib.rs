// 三层架构模块
pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

// 重新导出主要类型
pub use domain::{parse_timespan, scan_directory, FileFilter, ScanOutcome, TimespanError};
pub use application::Config;
pub use infrastructure::{ErrorLogger, ErrorType, Logger, LoggerTrait};
pub use presentation::{print_search_banner, SearchSummary};
