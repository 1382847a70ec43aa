pub mod bezier;
pub mod distribution;
pub mod random;

pub use bezier::{asymmetric_s_curve, evaluate_cubic, BezierPath};
pub use distribution::{Placement, PlacementSet, ScatterParams, SpatialDistributor};
