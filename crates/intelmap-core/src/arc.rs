//! Great-circle interpolation for flight paths.

use crate::model::LatLng;

/// Sample the great-circle path from `from` to `to` into `segments + 1`
/// points, endpoints included.
///
/// Coincident points (central angle below 1e-10 rad) short-circuit to
/// `[from, to]`. A `segments` of zero is treated as one.
pub fn great_circle_arc(from: LatLng, to: LatLng, segments: usize) -> Vec<LatLng> {
    let (lat1, lng1) = (from.lat.to_radians(), from.lng.to_radians());
    let (lat2, lng2) = (to.lat.to_radians(), to.lng.to_radians());

    // Haversine central angle.
    let d = 2.0
        * (((lat1 - lat2) / 2.0).sin().powi(2)
            + lat1.cos() * lat2.cos() * ((lng1 - lng2) / 2.0).sin().powi(2))
        .sqrt()
        .asin();
    if d < 1e-10 {
        return vec![from, to];
    }

    let segments = segments.max(1);
    let sin_d = d.sin();
    (0..=segments)
        .map(|i| {
            let f = i as f64 / segments as f64;
            let a = ((1.0 - f) * d).sin() / sin_d;
            let b = (f * d).sin() / sin_d;
            let x = a * lat1.cos() * lng1.cos() + b * lat2.cos() * lng2.cos();
            let y = a * lat1.cos() * lng1.sin() + b * lat2.cos() * lng2.sin();
            let z = a * lat1.sin() + b * lat2.sin();
            LatLng::new(
                z.atan2((x * x + y * y).sqrt()).to_degrees(),
                y.atan2(x).to_degrees(),
            )
        })
        .collect()
}
