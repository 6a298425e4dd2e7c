//! Sales Updater API Server module
//!
//! Provides the HTTP surface for uploading a workbook, choosing a row and
//! downloading the updated file. Run with `sales-updater-server`.

pub mod handlers;
pub mod server;

pub use server::{build_router, run_api_server};
