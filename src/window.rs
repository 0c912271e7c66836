//! Window functions used by the filter designers.

use std::f32::consts::PI;

/// Generate a Blackman window of `ntaps` points.
///
/// `w(n) = 0.42 - 0.5·cos(2πn/(N-1)) + 0.08·cos(4πn/(N-1))`
pub fn blackman(ntaps: usize) -> Vec<f32> {
    let denom = (ntaps - 1) as f32;
    (0..ntaps)
        .map(|i| {
            0.42 - 0.5 * (2.0 * PI * i as f32 / denom).cos()
                + 0.08 * (4.0 * PI * i as f32 / denom).cos()
        })
        .collect()
}
