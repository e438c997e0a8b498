//! Friction-ellipse bookkeeping for the combined tire force budget.

/// Longitudinal force still available once `lateral_used` of `lateral_max`
/// is spent cornering, for a tire that could deliver `longitudinal_capacity`
/// in a straight line.
///
/// Lateral and longitudinal grip share one elliptical budget:
/// `(lat / lat_max)^2 + (long / long_max)^2 <= 1`.
pub fn remaining_longitudinal_capacity(lateral_used: f64, lateral_max: f64, longitudinal_capacity: f64) -> f64 {
    if lateral_max <= 0.0 {
        return 0.0;
    }
    let ratio = lateral_used / lateral_max;
    (1.0 - ratio * ratio).max(0.0).sqrt() * longitudinal_capacity
}

/// Position of a force pair on the friction ellipse: 1.0 is saturated, above
/// 1.0 is beyond the grip limit.
pub fn ellipse_utilisation(longitudinal: f64, lateral: f64, longitudinal_max: f64, lateral_max: f64) -> f64 {
    let long = if longitudinal_max > 0.0 { longitudinal / longitudinal_max } else { 0.0 };
    let lat = if lateral_max > 0.0 { lateral / lateral_max } else { 0.0 };
    long.hypot(lat)
}
