//! Human-readable text output formatter

use crate::error::Result;
use crate::format::OutputFormatter;
use crate::planner::{PlanningState, PlanningStatus};
use std::fmt::Write;

/// Text formatter - one line per route, or the error message
pub struct TextFormatter;

impl OutputFormatter for TextFormatter {
    fn name(&self) -> &str {
        "text"
    }

    fn description(&self) -> &str {
        "Human-readable text"
    }

    fn format(&self, state: &PlanningState) -> Result<String> {
        let mut output = String::new();

        // Infallible for String
        let _ = writeln!(output, "From: {} {}", state.start_label, state.origin.coordinate);
        if let Some(destination) = &state.destination {
            let _ = writeln!(output, "To:   {} {}", destination.label, destination.coordinate);
        }
        output.push('\n');

        match (&state.status, &state.message) {
            (PlanningStatus::Error, Some(message)) => {
                let _ = writeln!(output, "{}", message);
            }
            _ => match &state.routes {
                Some(routes) if !routes.is_empty() => {
                    for route in &routes.candidates {
                        let marker = if route.is_primary() { '*' } else { ' ' };
                        let _ = writeln!(
                            output,
                            "{} {:>4} min  {}",
                            marker, route.duration_minutes, route.label
                        );
                    }
                }
                _ => {
                    let _ = writeln!(output, "No routes ({:?})", state.status);
                }
            },
        }

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlanningError;
    use crate::format::test_support::ready_state;

    #[test]
    fn test_text_format() {
        let output = TextFormatter.format(&ready_state()).unwrap();

        assert!(output.contains("From: Lagos, Nigeria (6.524400, 3.379200)"));
        assert!(output.contains("To:   Lagos Island, Lagos"));
        assert!(output.contains("*   15 min  Route 1 to Lagos Island"));
        assert!(output.contains("    19 min  Route 2 to Lagos Island"));
    }

    #[test]
    fn test_text_format_error() {
        let mut state = ready_state();
        state.routes = None;
        state.status = PlanningStatus::Error;
        state.error = Some(PlanningError::NoRoute);
        state.message = Some(PlanningError::NoRoute.to_string());

        let output = TextFormatter.format(&state).unwrap();
        assert!(output.contains("No route found."));
        assert!(!output.contains(" min "));
    }
}
