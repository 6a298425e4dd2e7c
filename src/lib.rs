//! Sales Updater - add daily stock and sales figures to an Excel workbook
//!
//! The operator uploads the daily sales workbook, picks a company and one of
//! its varieties, and adds quantities to the stock and/or sales columns of
//! that row. The workbook is written back with every other cell, formula and
//! style untouched.
//!
//! # Example
//!
//! ```no_run
//! use sales_updater::config::LayoutConfig;
//! use sales_updater::delivery::today;
//! use sales_updater::session::UpdateSession;
//! use sales_updater::types::UpdateTarget;
//!
//! let bytes = std::fs::read("daily_sales.xlsx")?;
//! let session = UpdateSession::open(bytes, LayoutConfig::default())?;
//!
//! let selections = session.initial_selections();
//! let selections = session.choose_company(selections, "AgriCo")?;
//! let selections = session.choose_variety(selections, "Hybrid-9")?;
//! let selections = session.set_increment(selections, UpdateTarget::Stock, 25);
//!
//! let updated = session.confirm(&selections, today())?;
//! std::fs::write(&updated.file_name, &updated.bytes)?;
//! # Ok::<(), sales_updater::error::UpdaterError>(())
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod delivery;
pub mod error;
pub mod excel;
pub mod selection;
pub mod session;
pub mod types;

// Re-export commonly used types
pub use config::LayoutConfig;
pub use error::{UpdaterError, UpdaterResult};
pub use session::UpdateSession;
pub use types::{Selections, UpdateReport, UpdateTarget};
