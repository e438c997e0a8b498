use nalgebra::Vector2;

/// A track centreline parameterized by distance along the track.
///
/// Implemented by the fitted spline in the `track` crate, and by any
/// pre-fitted curve an ingestion tool hands over together with its own
/// curvature table.
pub trait Centerline {
    /// Total length L of the centreline in metres.
    fn length(&self) -> f64;

    /// Whether the centreline forms a loop.
    fn is_closed(&self) -> bool;

    /// Position at distance `s`. Closed centrelines accept any `s` and wrap
    /// it modulo L.
    fn position(&self, s: f64) -> Vector2<f64>;
}

impl<C: Centerline + ?Sized> Centerline for &C {
    fn length(&self) -> f64 {
        (**self).length()
    }

    fn is_closed(&self) -> bool {
        (**self).is_closed()
    }

    fn position(&self, s: f64) -> Vector2<f64> {
        (**self).position(s)
    }
}
