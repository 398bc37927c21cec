//! Vector and quaternion helpers for bone orientation
//!
//! Orientation of a bone is the rotation that carries the canonical
//! reference axis onto the bone direction. Built from the half-vector
//! form: axis part = cross(a, b), scalar part = 1 + dot(a, b).

use nalgebra::{Point3, Quaternion, UnitQuaternion, Vector3};

/// Canonical bone axis (bones point along +Z when unrotated)
pub const REFERENCE_AXIS: Vector3<f64> = Vector3::new(0.0, 0.0, 1.0);

/// Canonical horizontal axis used to square the shoulder and hip lines
pub const HORIZONTAL_AXIS: Vector3<f64> = Vector3::new(0.0, 1.0, 0.0);

/// Below this magnitude a vector has no usable direction
pub const DEGENERATE_EPSILON: f64 = 1e-12;

/// Unit vector along `v`, or `None` if `v` is (numerically) zero
pub fn try_normalize(v: &Vector3<f64>) -> Option<Vector3<f64>> {
    v.try_normalize(DEGENERATE_EPSILON)
}

/// Unit vector along `v`, falling back to `fallback` when `v` has no direction
pub fn normalize_or(v: &Vector3<f64>, fallback: Vector3<f64>) -> Vector3<f64> {
    try_normalize(v).unwrap_or(fallback)
}

/// Any unit vector perpendicular to `v`
pub fn any_perpendicular(v: &Vector3<f64>) -> Vector3<f64> {
    // Cross with whichever basis axis is least aligned with v
    let basis = if v.x.abs() < 0.9 {
        Vector3::x()
    } else {
        Vector3::y()
    };
    normalize_or(&v.cross(&basis), Vector3::z())
}

/// Rotation carrying unit vector `from` onto unit vector `to`
///
/// Both inputs must already be unit length. When `to` is exactly opposite
/// `from` the half-vector form collapses to a zero quaternion; in that case
/// the result is a half turn about an axis perpendicular to `from`.
pub fn rotation_between(from: &Vector3<f64>, to: &Vector3<f64>) -> UnitQuaternion<f64> {
    let axis = from.cross(to);
    let raw = Quaternion::from_parts(1.0 + from.dot(to), axis);

    if raw.norm() < DEGENERATE_EPSILON {
        let perpendicular = any_perpendicular(from);
        tracing::warn!(
            "opposite vectors in rotation_between, half turn about {:?}",
            perpendicular
        );
        return UnitQuaternion::from_quaternion(Quaternion::from_parts(0.0, perpendicular));
    }

    UnitQuaternion::from_quaternion(raw)
}

/// Rotates `point` by `rotation` about `origin`
pub fn rotate_about(
    rotation: &UnitQuaternion<f64>,
    point: &Vector3<f64>,
    origin: &Vector3<f64>,
) -> Vector3<f64> {
    let rotated = rotation.transform_point(&Point3::from(point - origin));
    rotated.coords + origin
}

/// Arithmetic mean of two positions
pub fn midpoint(a: &Vector3<f64>, b: &Vector3<f64>) -> Vector3<f64> {
    (a + b) * 0.5
}
