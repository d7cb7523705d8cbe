use crate::sample::Sample;

/// Separator between the endpoint prefix and the assertion text in check
/// names, e.g. `"Apps - status is 200"`.
pub const CHECK_NAME_SEPARATOR: &str = " - ";

/// Endpoint key for samples carrying neither an `endpoint` nor a `check` tag.
pub const UNKNOWN_ENDPOINT: &str = "Unknown";

/// Resolve the endpoint key for a sample.
///
/// Precedence: explicit `endpoint` tag, then the text before the first
/// `" - "` in the `check` tag, then [`UNKNOWN_ENDPOINT`]. This is the only
/// classification path; no call site applies its own heuristic.
pub fn resolve(sample: &Sample) -> String {
    if let Some(tag) = sample.tags.get("endpoint") {
        if !tag.is_empty() {
            return tag.clone();
        }
    }
    if let Some(check) = sample.tags.get("check") {
        let name = check
            .split(CHECK_NAME_SEPARATOR)
            .next()
            .unwrap_or(check)
            .trim();
        if !name.is_empty() {
            return name.to_string();
        }
    }
    UNKNOWN_ENDPOINT.to_string()
}
