//! Location tracking
//!
//! A [`LocationTracker`] observes a [`PositionSource`] and publishes the
//! freshest [`OriginEstimate`] on a `watch` channel. Readers only ever see
//! the latest value; there is no history.

pub mod fixed;
pub mod ip;

use crate::config::LocationConfig;
use crate::coord::Coordinate;
use crate::error::PlanningError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// A single position reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionFix {
    pub coordinate: Coordinate,
    /// Accuracy radius in meters, when the source reports one
    pub accuracy_meters: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

impl PositionFix {
    pub fn now(coordinate: Coordinate, accuracy_meters: Option<f64>) -> Self {
        Self {
            coordinate,
            accuracy_meters,
            timestamp: Utc::now(),
        }
    }
}

/// Options applied to every fix
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixOptions {
    /// A fix that takes longer than this fails with [`LocationError::Timeout`]
    pub timeout: Duration,
    /// Delay between fixes while observing continuously
    pub interval: Duration,
}

impl Default for FixOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(15),
            interval: Duration::from_secs(30),
        }
    }
}

impl From<&LocationConfig> for FixOptions {
    fn from(config: &LocationConfig) -> Self {
        Self {
            timeout: config.fix_timeout(),
            interval: config.watch_interval(),
        }
    }
}

/// Why a position fix failed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocationError {
    #[error("Location permission denied")]
    PermissionDenied,

    #[error("Position unavailable: {0}")]
    PositionUnavailable(String),

    #[error("Timed out waiting for a position fix")]
    Timeout,

    #[error("No position source configured")]
    Unsupported,
}

impl From<LocationError> for PlanningError {
    fn from(_: LocationError) -> Self {
        PlanningError::LocationUnavailable
    }
}

/// A device or service that can report where we are
///
/// Each call must produce a fresh fix; sources do not cache.
pub trait PositionSource: Send + Sync + 'static {
    fn current_position(
        &self,
        options: &FixOptions,
    ) -> impl std::future::Future<Output = Result<PositionFix, LocationError>> + Send;
}

/// Where the origin coordinate came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OriginSource {
    Live,
    Default,
}

/// State of the position feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    /// Waiting for a fix
    Pending,
    /// Last fix succeeded
    Available,
    /// Last fix failed or permission was denied
    Unavailable,
}

/// The origin a route is planned from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OriginEstimate {
    pub coordinate: Coordinate,
    pub source: OriginSource,
    pub confidence: Confidence,
}

impl OriginEstimate {
    /// No fix yet: the default coordinate stands in
    pub fn pending(default: Coordinate) -> Self {
        Self {
            coordinate: default,
            source: OriginSource::Default,
            confidence: Confidence::Pending,
        }
    }

    pub fn live(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            source: OriginSource::Live,
            confidence: Confidence::Available,
        }
    }

    pub fn unavailable(default: Coordinate) -> Self {
        Self {
            coordinate: default,
            source: OriginSource::Default,
            confidence: Confidence::Unavailable,
        }
    }

    /// Waiting again; a previous live coordinate is kept until replaced
    fn awaiting(&self) -> Self {
        Self {
            confidence: Confidence::Pending,
            ..self.clone()
        }
    }

    /// Name shown for the start of the route
    pub fn start_label(&self, default_label: &str) -> String {
        match (self.source, self.confidence) {
            (OriginSource::Live, _) => "Your Location".to_string(),
            (OriginSource::Default, Confidence::Unavailable) => format!("{} (default)", default_label),
            (OriginSource::Default, _) => default_label.to_string(),
        }
    }
}

/// Observes a position source and publishes origin estimates
///
/// Dropping the tracker stops any running observation.
#[derive(Debug)]
pub struct LocationTracker<S> {
    source: Arc<S>,
    options: FixOptions,
    default_origin: Coordinate,
    tx: Arc<watch::Sender<OriginEstimate>>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl<S: PositionSource> LocationTracker<S> {
    /// Create a tracker in the Pending state; nothing is observed until
    /// [`start`](Self::start) or [`request_once`](Self::request_once)
    pub fn new(source: S, options: FixOptions, default_origin: Coordinate) -> Self {
        let (tx, _rx) = watch::channel(OriginEstimate::pending(default_origin));
        Self {
            source: Arc::new(source),
            options,
            default_origin,
            tx: Arc::new(tx),
            task: Mutex::new(None),
        }
    }

    /// Latest estimate
    pub fn current(&self) -> OriginEstimate {
        self.tx.borrow().clone()
    }

    /// Receiver that always holds the latest estimate
    pub fn subscribe(&self) -> watch::Receiver<OriginEstimate> {
        self.tx.subscribe()
    }

    /// Whether continuous observation is running
    pub fn is_observing(&self) -> bool {
        self.task
            .lock()
            .map(|task| task.as_ref().is_some_and(|handle| !handle.is_finished()))
            .unwrap_or(false)
    }

    /// Start (or restart) continuous observation in the Pending state
    ///
    /// Every fix replaces the coordinate. The first failure marks the origin
    /// Unavailable and ends observation; call `start` again to retry.
    pub fn start(&self) {
        self.stop();
        self.tx.send_modify(|estimate| *estimate = estimate.awaiting());
        self.spawn_observer(Duration::ZERO);
    }

    /// Restart observation right after a fresh fix
    ///
    /// The published estimate is kept as is and the next fix is taken one
    /// interval later.
    pub fn resume(&self) {
        self.stop();
        self.spawn_observer(self.options.interval);
    }

    fn spawn_observer(&self, first_delay: Duration) {
        let source = Arc::clone(&self.source);
        let tx = Arc::clone(&self.tx);
        let options = self.options;
        let default_origin = self.default_origin;

        let handle = tokio::spawn(async move {
            if !first_delay.is_zero() {
                tokio::time::sleep(first_delay).await;
            }
            loop {
                let fix = fix_with_timeout(source.as_ref(), &options).await;
                let failed = fix.is_err();
                publish(&tx, fix, default_origin);
                if failed {
                    break;
                }
                tokio::time::sleep(options.interval).await;
            }
            debug!("Location observation ended");
        });

        if let Ok(mut task) = self.task.lock() {
            *task = Some(handle);
        }
    }

    /// Stop continuous observation; the last estimate stays published
    pub fn stop(&self) {
        if let Ok(mut task) = self.task.lock() {
            if let Some(handle) = task.take() {
                handle.abort();
            }
        }
    }

    /// Take a single fix, publish it and return it
    ///
    /// Used as the manual "try again" action; continuous observation, if
    /// running, is left alone.
    pub async fn request_once(&self) -> Result<PositionFix, LocationError> {
        self.tx.send_modify(|estimate| *estimate = estimate.awaiting());
        let fix = fix_with_timeout(self.source.as_ref(), &self.options).await;
        publish(&self.tx, fix.clone(), self.default_origin);
        fix
    }
}

impl<S> Drop for LocationTracker<S> {
    fn drop(&mut self) {
        if let Ok(task) = self.task.get_mut() {
            if let Some(handle) = task.take() {
                handle.abort();
            }
        }
    }
}

async fn fix_with_timeout<S: PositionSource>(
    source: &S,
    options: &FixOptions,
) -> Result<PositionFix, LocationError> {
    match tokio::time::timeout(options.timeout, source.current_position(options)).await {
        Ok(result) => result,
        Err(_) => Err(LocationError::Timeout),
    }
}

fn publish(
    tx: &watch::Sender<OriginEstimate>,
    fix: Result<PositionFix, LocationError>,
    default_origin: Coordinate,
) {
    let estimate = match fix {
        Ok(fix) => {
            debug!(coordinate = %fix.coordinate, "Position fix");
            OriginEstimate::live(fix.coordinate)
        }
        Err(e) => {
            warn!(error = %e, "Position fix failed, falling back to default origin");
            OriginEstimate::unavailable(default_origin)
        }
    };

    tx.send_if_modified(|current| {
        if *current == estimate {
            return false;
        }
        if current.confidence != estimate.confidence {
            info!(from = ?current.confidence, to = ?estimate.confidence, "Origin confidence changed");
        }
        *current = estimate;
        true
    });
}

/// Position source chosen by configuration
#[derive(Debug)]
pub enum ConfiguredSource {
    Ip(ip::IpPositionSource),
    Fixed(fixed::FixedPositionSource),
    /// No source: every fix fails with [`LocationError::Unsupported`]
    Disabled,
}

impl ConfiguredSource {
    /// Build the source named by `location.source`
    pub fn from_config(config: &LocationConfig) -> crate::error::Result<Self> {
        match config.source.as_str() {
            "ip" => Ok(Self::Ip(ip::IpPositionSource::new(&config.ip_api_url)?)),
            "none" => Ok(Self::Disabled),
            other => Err(crate::error::Error::Config(format!(
                "Unknown location source: {}",
                other
            ))),
        }
    }
}

impl PositionSource for ConfiguredSource {
    async fn current_position(&self, options: &FixOptions) -> Result<PositionFix, LocationError> {
        match self {
            Self::Ip(source) => source.current_position(options).await,
            Self::Fixed(source) => source.current_position(options).await,
            Self::Disabled => Err(LocationError::Unsupported),
        }
    }
}
