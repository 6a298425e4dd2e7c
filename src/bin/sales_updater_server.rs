//! Sales Updater API Server binary
//!
//! HTTP surface for uploading a workbook, choosing a row and downloading the
//! updated file.

use clap::Parser;
use sales_updater::api::{run_api_server, server::ApiConfig, server::DEFAULT_MAX_UPLOAD_BYTES};
use sales_updater::config::LayoutConfig;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sales-updater-server")]
#[command(version)]
#[command(about = "Sales Updater API Server - upload, update and download daily sales workbooks")]
#[command(long_about = r#"
Sales Updater API Server

Stateless endpoints; the request body is always the raw .xlsx file:
  - POST /api/v1/choices?company=&variety=
        Companies, varieties of the chosen company, and update targets
  - POST /api/v1/update?company=&variety=&targets=Stock,Sales&stock=&sales=
        Returns updated_sales_<YYYY-MM-DD>.xlsx as an attachment

Additional endpoints:
  - GET  /health           - Health check
  - GET  /version          - Server version info
  - GET  /                 - API documentation

Example usage:
  sales-updater-server                           # Start on localhost:8080
  sales-updater-server --host 0.0.0.0 --port 3000

  curl -X POST --data-binary @daily.xlsx -o updated.xlsx \
    "http://localhost:8080/api/v1/update?company=AgriCo&variety=Hybrid-9&stock=25"
"#)]
struct Args {
    /// Host address to bind to (use 0.0.0.0 for all interfaces)
    #[arg(short = 'H', long, default_value = "127.0.0.1", env = "SALES_UPDATER_HOST")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "8080", env = "SALES_UPDATER_PORT")]
    port: u16,

    /// Maximum accepted upload size in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_UPLOAD_BYTES, env = "SALES_UPDATER_MAX_UPLOAD")]
    max_upload_bytes: usize,

    /// YAML file overriding sheet names and column identifiers
    #[arg(long, env = "SALES_UPDATER_LAYOUT")]
    layout: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = ApiConfig {
        host: args.host,
        port: args.port,
        max_upload_bytes: args.max_upload_bytes,
        layout: LayoutConfig::load(args.layout.as_deref())?,
    };

    run_api_server(config).await
}
