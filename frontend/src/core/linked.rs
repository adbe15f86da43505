//! Location strings derived from the geography selection

fn join_present(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Location text the default site takes on whenever a ward is selected.
///
/// Returns `None` while no ward is chosen; the default site is then left as is.
pub fn default_site_location(region: &str, district: &str, ward: &str) -> Option<String> {
    if ward.trim().is_empty() {
        return None;
    }
    Some(join_present(&[ward, district, region]))
}

/// Location submitted for a site whose own location was left blank
pub fn fallback_site_location(ward: &str, district: &str) -> String {
    join_present(&[ward, district])
}
