//! Planning state snapshots

use crate::error::PlanningError;
use crate::geo::ResolvedPlace;
use crate::location::OriginEstimate;
use crate::routing::RouteSet;
use serde::{Deserialize, Serialize};

/// Where the session is in its planning cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanningStatus {
    #[default]
    Idle,
    Resolving,
    Routing,
    Ready,
    Error,
}

/// Read-only snapshot of a planning session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanningState {
    pub origin: OriginEstimate,
    /// Name shown for the start of the route
    pub start_label: String,
    pub destination: Option<ResolvedPlace>,
    /// Cleared whenever a new trigger starts
    pub routes: Option<RouteSet>,
    pub status: PlanningStatus,
    pub error: Option<PlanningError>,
    /// User-facing text for `error`
    pub message: Option<String>,
    /// Sequence number of the latest trigger
    pub sequence: u64,
}

impl PlanningState {
    pub fn is_ready(&self) -> bool {
        self.status == PlanningStatus::Ready
    }
}
