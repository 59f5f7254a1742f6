use crate::emit::report::SuggestionReport;

/// Emit a report as YAML.
///
/// # Errors
///
/// Returns an error if YAML serialization fails.
pub fn emit_yaml(report: &SuggestionReport) -> Result<String, String> {
    serde_yaml::to_string(report).map_err(|e| format!("yaml serialization failed: {e}"))
}

/// Emit a report as pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn emit_json(report: &SuggestionReport) -> Result<String, String> {
    serde_json::to_string_pretty(report)
        .map(|mut s| {
            s.push('\n');
            s
        })
        .map_err(|e| format!("json serialization failed: {e}"))
}
