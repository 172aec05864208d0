pub const WILDCARD: &str = "*";

/// Deterministic platform check run before any oracle call: the pattern must
/// occur in the URL, ignoring case. `"*"` admits every URL.
pub fn passes(url: &str, platform_pattern: &str) -> bool {
    if platform_pattern == WILDCARD {
        return true;
    }
    url.to_lowercase()
        .contains(&platform_pattern.to_lowercase())
}
