//! Output formatters
//!
//! Provides trait-based output formatting for planning state snapshots.

pub mod gpx;
pub mod json;
pub mod text;

use crate::error::Result;
use crate::planner::PlanningState;
use serde::{Deserialize, Serialize};

/// Information about an output format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatInfo {
    /// Format name
    pub name: String,
    /// Format description
    pub description: String,
}

/// Trait for output formatters
pub trait OutputFormatter: Send + Sync {
    /// Get the format name
    fn name(&self) -> &str;

    /// Get the format description
    fn description(&self) -> &str;

    /// Format a planning state snapshot
    fn format(&self, state: &PlanningState) -> Result<String>;
}

/// Get a formatter by name
pub fn get_formatter(name: &str) -> Option<Box<dyn OutputFormatter>> {
    match name.to_lowercase().as_str() {
        "json" => Some(Box::new(json::JsonFormatter)),
        "text" => Some(Box::new(text::TextFormatter)),
        "gpx" => Some(Box::new(gpx::GpxFormatter)),
        _ => None,
    }
}

/// List all available formatters
pub fn available_formats() -> Vec<FormatInfo> {
    [
        &json::JsonFormatter as &dyn OutputFormatter,
        &text::TextFormatter,
        &gpx::GpxFormatter,
    ]
    .into_iter()
    .map(|f| FormatInfo {
        name: f.name().to_string(),
        description: f.description().to_string(),
    })
    .collect()
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::coord::Coordinate;
    use crate::geo::ResolvedPlace;
    use crate::location::OriginEstimate;
    use crate::planner::{PlanningState, PlanningStatus};
    use crate::routing::{route_label, RouteCandidate, RouteSet};

    /// Two routes from the default origin to Lagos Island
    pub fn ready_state() -> PlanningState {
        let origin = Coordinate::new(6.5244, 3.3792);
        let destination = Coordinate::new(6.4281, 3.4219);
        let candidates = [(1, 15), (2, 19)]
            .into_iter()
            .map(|(rank, minutes)| RouteCandidate {
                rank,
                duration_minutes: minutes,
                path: vec![origin, Coordinate::new(6.47, 3.40), destination],
                label: route_label(rank, "Lagos Island"),
            })
            .collect();

        PlanningState {
            origin: OriginEstimate::pending(origin),
            start_label: "Lagos, Nigeria".to_string(),
            destination: Some(ResolvedPlace::new(destination, "Lagos Island, Lagos")),
            routes: Some(RouteSet {
                origin,
                destination,
                candidates,
            }),
            status: PlanningStatus::Ready,
            error: None,
            message: None,
            sequence: 1,
        }
    }
}
