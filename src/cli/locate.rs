//! Locate command handler
//!
//! Takes a single position fix and prints the resulting origin.

use crate::cli::init_logging;
use crate::config::Config;
use crate::error::Result;
use crate::location::{ConfiguredSource, FixOptions, LocationTracker, OriginEstimate, PositionFix};
use clap::Args;

/// Locate command arguments
#[derive(Args)]
pub struct LocateArgs {
    /// Print the origin estimate as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run the locate command
pub async fn run(args: LocateArgs) -> Result<()> {
    init_logging("warn");

    let config = Config::load()?;
    let tracker = LocationTracker::new(
        ConfiguredSource::from_config(&config.location)?,
        FixOptions::from(&config.location),
        config.location.default_origin(),
    );

    let fix = match tracker.request_once().await {
        Ok(fix) => Some(fix),
        Err(e) => {
            eprintln!("{} ({})", crate::error::PlanningError::from(e.clone()), e);
            None
        }
    };

    let origin = tracker.current();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&origin)?);
    } else {
        println!(
            "{}",
            describe(&origin, fix.as_ref(), &config.location.default_label)
        );
    }

    Ok(())
}

/// One-line origin summary, with the fix accuracy when the source reports it
fn describe(origin: &OriginEstimate, fix: Option<&PositionFix>, default_label: &str) -> String {
    let line = format!("{} {}", origin.start_label(default_label), origin.coordinate);
    match fix.and_then(|fix| fix.accuracy_meters) {
        Some(accuracy) => format!("{} (within {:.0} m)", line, accuracy),
        None => line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::Coordinate;

    #[test]
    fn test_describe_reports_accuracy() {
        let here = Coordinate::new(6.6018, 3.3515);
        let origin = OriginEstimate::live(here);
        let fix = PositionFix::now(here, Some(25.0));

        let line = describe(&origin, Some(&fix), "Lagos, Nigeria");
        assert!(line.starts_with("Your Location "));
        assert!(line.ends_with("(within 25 m)"));
    }

    #[test]
    fn test_describe_without_accuracy() {
        let lagos = Coordinate::new(6.5244, 3.3792);
        let origin = OriginEstimate::unavailable(lagos);

        let line = describe(&origin, None, "Lagos, Nigeria");
        assert!(line.starts_with("Lagos, Nigeria (default) "));
        assert!(!line.contains("within"));
    }
}
