/// Canonical form used for name comparisons: lowercase, fully qualified.
pub fn normalize_name(name: &str) -> String {
    let trimmed = name.trim();
    let mut normalized = trimmed.to_ascii_lowercase();
    if !normalized.ends_with('.') {
        normalized.push('.');
    }
    normalized
}

/// True when `name` equals `zone` or is a subdomain of it. The root zone
/// contains every name.
pub fn is_in_zone(name: &str, zone: &str) -> bool {
    let name = normalize_name(name);
    let zone = normalize_name(zone);

    if zone == "." || name == zone {
        return true;
    }

    name.ends_with(&format!(".{}", zone))
}
