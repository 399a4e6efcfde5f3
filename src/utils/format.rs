//! Human-readable renderings of distances, durations and speeds.

/// `"1.2 km"` from 1000 m upwards, otherwise whole meters (`"850 m"`).
pub fn format_distance(meters: f64) -> String {
    if meters >= 1000.0 {
        format!("{:.1} km", meters / 1000.0)
    } else {
        format!("{} m", meters.max(0.0).round() as u64)
    }
}

/// `"1h 5m"` when at least an hour remains, otherwise `"12 min"`.
pub fn format_duration(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{} min", minutes)
    }
}

/// Meters per second rendered as km/h with one decimal.
pub fn format_speed_kmh(meters_per_second: f64) -> String {
    format!("{:.1} km/h", meters_per_second * 3.6)
}
