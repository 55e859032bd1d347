//! GPX output formatter
//!
//! Origin and destination become waypoints; every route candidate becomes a
//! track with a single segment.

use crate::coord::Coordinate;
use crate::error::Result;
use crate::format::OutputFormatter;
use crate::planner::PlanningState;
use chrono::Utc;
use quick_xml::escape::escape;
use std::fmt::Write;

/// GPX formatter - outputs a GPX 1.1 file
pub struct GpxFormatter;

impl OutputFormatter for GpxFormatter {
    fn name(&self) -> &str {
        "gpx"
    }

    fn description(&self) -> &str {
        "GPX tracks for each route"
    }

    fn format(&self, state: &PlanningState) -> Result<String> {
        let mut gpx = String::new();

        gpx.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        gpx.push('\n');
        gpx.push_str(r#"<gpx version="1.1" creator="route-planner" xmlns="http://www.topografix.com/GPX/1/1">"#);
        gpx.push('\n');

        gpx.push_str("  <metadata>\n");
        let _ = writeln!(gpx, "    <time>{}</time>", Utc::now().to_rfc3339());
        gpx.push_str("  </metadata>\n");

        push_waypoint(&mut gpx, state.origin.coordinate, &state.start_label);
        if let Some(destination) = &state.destination {
            push_waypoint(&mut gpx, destination.coordinate, &destination.label);
        }

        for route in state.routes.iter().flat_map(|set| &set.candidates) {
            gpx.push_str("  <trk>\n");
            let _ = writeln!(gpx, "    <name>{}</name>", escape(&route.label));
            let _ = writeln!(gpx, "    <desc>{} min</desc>", route.duration_minutes);
            let _ = writeln!(gpx, "    <number>{}</number>", route.rank);
            gpx.push_str("    <trkseg>\n");
            for point in &route.path {
                let _ = writeln!(gpx, r#"      <trkpt lat="{}" lon="{}"/>"#, point.lat, point.lng);
            }
            gpx.push_str("    </trkseg>\n");
            gpx.push_str("  </trk>\n");
        }

        gpx.push_str("</gpx>\n");
        Ok(gpx)
    }
}

fn push_waypoint(gpx: &mut String, at: Coordinate, name: &str) {
    let _ = writeln!(gpx, r#"  <wpt lat="{}" lon="{}">"#, at.lat, at.lng);
    let _ = writeln!(gpx, "    <name>{}</name>", escape(name));
    gpx.push_str("  </wpt>\n");
}
