//! Planning session
//!
//! [`PlanningSession`] owns the planning state and runs the two triggers:
//! a text search and a map selection. Both end in the same gating pass:
//! distance check against the current origin, then a routing request.
//!
//! Triggers may overlap. Each one takes the next sequence number when it
//! starts, and an asynchronous result is applied only while its number is
//! still the latest. A slow early search therefore never overwrites a later
//! one, whatever order the responses arrive in.

pub mod state;

pub use state::{PlanningState, PlanningStatus};

use crate::config::Config;
use crate::constants::origin::DEFAULT_LABEL;
use crate::constants::routing::{DISTANCE_LIMIT_METERS, MAX_ALTERNATIVES};
use crate::coord::distance::{check_within_limit, LimitCheck};
use crate::coord::Coordinate;
use crate::error::{PlanningError, Result};
use crate::geo::nominatim::NominatimBackend;
use crate::geo::{GeoBackend, GeoResolver, ResolvedPlace};
use crate::location::{ConfiguredSource, FixOptions, LocationTracker, PositionFix, PositionSource};
use crate::routing::openroute::OpenRouteClient;
use crate::routing::{RouteError, RouteProvider, RouteSet};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};

/// Routing limits applied by the gating pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanningLimits {
    /// Inclusive cap on the straight-line origin to destination distance
    pub distance_limit_meters: f64,
    pub max_alternatives: usize,
}

impl Default for PlanningLimits {
    fn default() -> Self {
        Self {
            distance_limit_meters: DISTANCE_LIMIT_METERS,
            max_alternatives: MAX_ALTERNATIVES,
        }
    }
}

impl From<&Config> for PlanningLimits {
    fn from(config: &Config) -> Self {
        Self {
            distance_limit_meters: config.routing.distance_limit_meters,
            max_alternatives: config.routing.max_alternatives,
        }
    }
}

/// Mutable part of the state, guarded together with the sequence counter
#[derive(Debug, Default)]
struct Plan {
    destination: Option<ResolvedPlace>,
    routes: Option<RouteSet>,
    status: PlanningStatus,
    error: Option<PlanningError>,
    latest: u64,
}

/// Route planning session
pub struct PlanningSession<G, R, S> {
    resolver: GeoResolver<G>,
    router: R,
    tracker: LocationTracker<S>,
    limits: PlanningLimits,
    default_label: String,
    observing: AtomicBool,
    plan: RwLock<Plan>,
}

impl<G, R, S> PlanningSession<G, R, S>
where
    G: GeoBackend,
    R: RouteProvider,
    S: PositionSource,
{
    /// Create an idle session
    pub fn new(
        resolver: GeoResolver<G>,
        router: R,
        tracker: LocationTracker<S>,
        limits: PlanningLimits,
    ) -> Self {
        Self {
            resolver,
            router,
            tracker,
            limits,
            default_label: DEFAULT_LABEL.to_string(),
            observing: AtomicBool::new(false),
            plan: RwLock::new(Plan::default()),
        }
    }

    /// Name used for the default origin
    pub fn with_default_label(mut self, label: impl Into<String>) -> Self {
        self.default_label = label.into();
        self
    }

    pub fn limits(&self) -> PlanningLimits {
        self.limits
    }

    pub fn tracker(&self) -> &LocationTracker<S> {
        &self.tracker
    }

    /// Start continuous origin observation
    pub fn start_tracking(&self) {
        self.observing.store(true, Ordering::SeqCst);
        self.tracker.start();
    }

    /// Stop continuous origin observation
    pub fn stop_tracking(&self) {
        self.observing.store(false, Ordering::SeqCst);
        self.tracker.stop();
    }

    /// Snapshot of the current state
    pub async fn state(&self) -> PlanningState {
        let plan = self.plan.read().await;
        let origin = self.tracker.current();

        PlanningState {
            start_label: origin.start_label(&self.default_label),
            origin,
            destination: plan.destination.clone(),
            routes: plan.routes.clone(),
            status: plan.status,
            error: plan.error.clone(),
            message: plan.error.as_ref().map(ToString::to_string),
            sequence: plan.latest,
        }
    }

    /// Plan a route to a place typed by the user
    ///
    /// A blank query changes nothing.
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str) -> PlanningState {
        let query = query.trim();
        if query.is_empty() {
            debug!("Ignoring blank search");
            return self.state().await;
        }

        let seq = self.begin().await;
        match self.resolver.resolve_forward(query).await {
            Ok(place) => self.route_to(seq, place, query).await,
            Err(e) => {
                debug!(seq, error = %e, "Search found nothing");
                self.fail(seq, PlanningError::DestinationNotFound).await;
            }
        }

        self.state().await
    }

    /// Plan a route to a point picked on the map
    ///
    /// The point is named through reverse geocoding, which cannot fail, so
    /// only invalid coordinates are rejected.
    #[instrument(skip(self))]
    pub async fn select(&self, point: Coordinate) -> Result<PlanningState> {
        point.validate()?;

        let seq = self.begin().await;
        let place = self.resolver.resolve_reverse(point).await;
        let label = place.label.clone();
        self.route_to(seq, place, &label).await;

        Ok(self.state().await)
    }

    /// Ask for a fresh position fix ("try again")
    ///
    /// On success, continuous observation started through
    /// [`start_tracking`](Self::start_tracking) resumes from the fresh fix,
    /// which stays Available until the next one.
    pub async fn retry_location(&self) -> std::result::Result<PositionFix, PlanningError> {
        let fix = self.tracker.request_once().await?;
        if self.observing.load(Ordering::SeqCst) {
            info!("Resuming location observation");
            self.tracker.resume();
        }
        Ok(fix)
    }

    /// Register a new trigger; routes, destination and error are cleared
    async fn begin(&self) -> u64 {
        let mut plan = self.plan.write().await;
        plan.latest += 1;
        plan.destination = None;
        plan.routes = None;
        plan.error = None;
        plan.status = PlanningStatus::Resolving;
        plan.latest
    }

    /// Apply `update` only if `seq` is still the latest trigger
    async fn apply(&self, seq: u64, update: impl FnOnce(&mut Plan)) -> bool {
        let mut plan = self.plan.write().await;
        if plan.latest != seq {
            debug!(seq, latest = plan.latest, "Discarding superseded result");
            return false;
        }
        update(&mut plan);
        true
    }

    async fn fail(&self, seq: u64, error: PlanningError) {
        self.apply(seq, |plan| {
            debug!(error = %error, "Planning failed");
            plan.routes = None;
            plan.status = PlanningStatus::Error;
            plan.error = Some(error);
        })
        .await;
    }

    /// Gating pass shared by both triggers
    async fn route_to(&self, seq: u64, place: ResolvedPlace, route_label: &str) {
        let origin = self.tracker.current().coordinate;
        let destination = place.coordinate;

        let published = self
            .apply(seq, |plan| {
                plan.destination = Some(place.clone());
                plan.routes = None;
                plan.error = None;
            })
            .await;
        if !published {
            return;
        }

        if let LimitCheck::Exceeded { distance_meters } =
            check_within_limit(origin, destination, self.limits.distance_limit_meters)
        {
            info!(distance_meters, limit = self.limits.distance_limit_meters, "Destination beyond routing limit");
            self.fail(
                seq,
                PlanningError::DistanceExceeded {
                    distance_meters,
                    limit_meters: self.limits.distance_limit_meters,
                },
            )
            .await;
            return;
        }

        if !self
            .apply(seq, |plan| plan.status = PlanningStatus::Routing)
            .await
        {
            return;
        }

        let result = self
            .router
            .fetch_routes(origin, destination, self.limits.max_alternatives, route_label)
            .await;

        match result {
            Ok(routes) => {
                let count = routes.len();
                if self
                    .apply(seq, |plan| {
                        plan.destination = Some(place);
                        plan.routes = Some(routes);
                        plan.status = PlanningStatus::Ready;
                    })
                    .await
                {
                    info!(seq, routes = count, "Routes ready");
                }
            }
            Err(RouteError::NoRoute) => self.fail(seq, PlanningError::NoRoute).await,
            Err(RouteError::ProviderUnavailable(reason)) => {
                debug!(%reason, "Routing provider unavailable");
                self.fail(seq, PlanningError::ProviderUnavailable).await
            }
        }
    }
}

/// Session wired to the live web services
pub type LiveSession = PlanningSession<NominatimBackend, OpenRouteClient, ConfiguredSource>;

impl LiveSession {
    /// Build a session from configuration, taking the origin from `source`
    pub fn from_config(config: &Config, source: ConfiguredSource) -> Result<Self> {
        let resolver = GeoResolver::new(NominatimBackend::new(&config.geocoding)?);
        let router = OpenRouteClient::new(&config.routing, config.api_keys.openrouteservice.clone())?;
        let tracker = LocationTracker::new(
            source,
            FixOptions::from(&config.location),
            config.location.default_origin(),
        );

        Ok(Self::new(resolver, router, tracker, PlanningLimits::from(config))
            .with_default_label(config.location.default_label.clone()))
    }
}
