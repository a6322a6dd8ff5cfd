//! EMS API Server binary
//!
//! HTTP REST API for the billing converter.

use clap::Parser;
use ems_convert::api::{run_api_server, server::ApiConfig};

#[derive(Parser, Debug)]
#[command(name = "ems-server")]
#[command(version)]
#[command(about = "EMS API Server - HTTP REST API for electricity billing conversion")]
#[command(long_about = r#"
EMS API Server - HTTP REST API

Endpoints:
  - POST /api/v1/sheets   - Sheet names common to all workbooks
  - POST /api/v1/convert  - Convert workbooks to CSV/XLSX (optionally zipped)

Additional endpoints:
  - GET  /health          - Health check
  - GET  /version         - Server version info
  - GET  /                - API documentation

Paths in requests are resolved on the server's filesystem, and
/api/v1/convert writes into any output_dir the caller names. Cross-origin
browser requests are only allowed from localhost pages. Do not bind to a
public interface on an untrusted network.

Example usage:
  ems-server                           # Start on localhost:8080
  ems-server --host 0.0.0.0 --port 3000

  curl -X POST http://localhost:8080/api/v1/convert \
    -H "Content-Type: application/json" \
    -d '{"files": ["north.xlsx", "south.xlsx"], "mode": "combined", "output_dir": "out"}'
"#)]
struct Args {
    /// Host address to bind to (use 0.0.0.0 for all interfaces)
    #[arg(short = 'H', long, default_value = "127.0.0.1", env = "EMS_HOST")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "8080", env = "EMS_PORT")]
    port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = ApiConfig {
        host: args.host,
        port: args.port,
    };

    run_api_server(config).await
}
