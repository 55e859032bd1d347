//! route-planner: Driving Route Planner
//!
//! A library and CLI tool that plans driving routes from the user's position
//! to a searched or map-selected destination, with alternative routes.
//!
//! ## Features
//!
//! - Forward and reverse geocoding (Nominatim)
//! - Great-circle distance gate in front of the routing provider
//! - Up to three alternative routes (OpenRouteService)
//! - Live origin tracking with a fixed fallback city
//! - Last-issued-wins handling of overlapping searches
//! - HTTP API + CLI interface
//!
//! ## Quick Start
//!
//! ```rust
//! use route_planner::coord::distance::{check_within_limit, great_circle_meters};
//! use route_planner::coord::Coordinate;
//!
//! let lagos = Coordinate::new(6.5244, 3.3792);
//! let island = Coordinate::new(6.4281, 3.4219);
//!
//! let meters = great_circle_meters(lagos, island);
//! println!("Straight-line distance: {:.0} m", meters);
//!
//! assert!(check_within_limit(lagos, island, 150_000.0).is_ok());
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod coord;
pub mod error;
pub mod format;
pub mod geo;
pub mod location;
pub mod planner;
pub mod routing;
pub mod server;

// Re-export commonly used types
pub use config::Config;
pub use coord::Coordinate;
pub use error::{Error, PlanningError, Result};
pub use planner::{PlanningSession, PlanningState, PlanningStatus};
