//! JSON output formatter

use crate::error::Result;
use crate::format::OutputFormatter;
use crate::planner::PlanningState;

/// JSON formatter - outputs the full state as pretty-printed JSON
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        "Full planning state as JSON"
    }

    fn format(&self, state: &PlanningState) -> Result<String> {
        Ok(serde_json::to_string_pretty(state)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::test_support::ready_state;

    #[test]
    fn test_json_format() {
        let output = JsonFormatter.format(&ready_state()).unwrap();
        let parsed: PlanningState = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed, ready_state());
    }

    #[test]
    fn test_json_field_names() {
        let output = JsonFormatter.format(&ready_state()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["status"], "ready");
        assert_eq!(value["origin"]["confidence"], "pending");
        assert_eq!(value["routes"]["candidates"][1]["duration_minutes"], 19);
        assert_eq!(value["routes"]["candidates"][0]["path"][0]["lat"], 6.5244);
        assert!(value["error"].is_null());
    }
}
