//! Keyframed curves over normalized time.

/// Piecewise curves and the nine-curve transform set.
pub mod curve;
/// Easing functions applied between keys.
pub mod ease;
