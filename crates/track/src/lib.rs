pub mod spline;
pub mod curve;
pub mod curvature;
pub mod sampling;
pub mod layout;

pub use curve::TrackCurve;
pub use curvature::{triangle_radius, RadiusEstimate};
pub use sampling::SampledTrack;
pub use layout::{Section, TrackLayout};
