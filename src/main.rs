//! route-planner CLI entry point
//!
//! Driving route planner - CLI + web app

use route_planner::cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
