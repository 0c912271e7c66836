//! FIR tap design.
//!
//! Windowed-sinc designs with a Blackman window: a real low-pass, a real
//! band-pass and a complex band-pass (a frequency-shifted low-pass
//! prototype, usable across negative frequencies). Each design function
//! validates its parameters and returns the tap array; the `*_filter`
//! constructors below hand the taps straight to a [`FirFilter`].
//!
//! The tap count follows the harris approximation
//! `ntaps = attenuation · sample_rate / (22 · transition_width)`, forced
//! odd so the filter has a center tap.

use std::f64::consts::PI;

use crate::error::{Error, Result};
use crate::fir::FirFilter;
use crate::window;

fn compute_ntaps(sample_rate: f64, transition_width: f64, attenuation_db: f64) -> usize {
    let ntaps = (attenuation_db * sample_rate / (22.0 * transition_width)) as usize;
    if ntaps % 2 == 0 {
        ntaps + 1
    } else {
        ntaps
    }
}

/// Design a real low-pass filter.
///
/// The taps are normalized so the DC gain equals `gain`. Fails on a
/// non-positive sample rate or transition width, or a cutoff outside
/// `(0, sample_rate/2]`.
pub fn design_low_pass(
    gain: f64,
    sample_rate: f64,
    cutoff: f64,
    transition_width: f64,
    attenuation_db: f64,
) -> Result<Vec<f32>> {
    if sample_rate <= 0.0 {
        return Err(Error::config("sample rate must be positive"));
    }
    if cutoff <= 0.0 || cutoff > sample_rate / 2.0 {
        return Err(Error::config(
            "cutoff must lie in (0, sample_rate/2]",
        ));
    }
    if transition_width <= 0.0 {
        return Err(Error::config("transition width must be positive"));
    }

    let ntaps = compute_ntaps(sample_rate, transition_width, attenuation_db);
    let w = window::blackman(ntaps);
    let m = (ntaps - 1) as i64 / 2;
    let fw_t0 = 2.0 * PI * cutoff / sample_rate;

    let mut taps = vec![0.0f32; ntaps];
    for n in -m..=m {
        let i = (n + m) as usize;
        taps[i] = if n == 0 {
            // analytic limit of sin(n·w0)/(n·π) at n = 0
            (fw_t0 / PI * w[i] as f64) as f32
        } else {
            ((n as f64 * fw_t0).sin() / (n as f64 * PI) * w[i] as f64) as f32
        };
    }

    // normalize to the requested DC gain
    let mut fmax = taps[m as usize] as f64;
    for n in 1..=m {
        fmax += 2.0 * taps[(n + m) as usize] as f64;
    }
    let scale = gain / fmax;
    for tap in &mut taps {
        *tap = (*tap as f64 * scale) as f32;
    }
    Ok(taps)
}

/// Design a real band-pass filter.
///
/// The taps are the difference of two windowed sinc responses, normalized
/// so the response at the band center equals `gain`. Fails on a
/// non-positive sample rate or transition width, cutoffs outside
/// `(0, sample_rate/2]` or `low_cutoff >= high_cutoff`.
pub fn design_band_pass(
    gain: f64,
    sample_rate: f64,
    low_cutoff: f64,
    high_cutoff: f64,
    transition_width: f64,
    attenuation_db: f64,
) -> Result<Vec<f32>> {
    if sample_rate <= 0.0 {
        return Err(Error::config("sample rate must be positive"));
    }
    if low_cutoff <= 0.0 || high_cutoff > sample_rate / 2.0 {
        return Err(Error::config(
            "cutoffs must lie in (0, sample_rate/2]",
        ));
    }
    if low_cutoff >= high_cutoff {
        return Err(Error::config("low cutoff must be below the high cutoff"));
    }
    if transition_width <= 0.0 {
        return Err(Error::config("transition width must be positive"));
    }

    let ntaps = compute_ntaps(sample_rate, transition_width, attenuation_db);
    let w = window::blackman(ntaps);
    let m = (ntaps - 1) as i64 / 2;
    let fw_t0 = 2.0 * PI * low_cutoff / sample_rate;
    let fw_t1 = 2.0 * PI * high_cutoff / sample_rate;

    let mut taps = vec![0.0f32; ntaps];
    for n in -m..=m {
        let i = (n + m) as usize;
        taps[i] = if n == 0 {
            ((fw_t1 - fw_t0) / PI * w[i] as f64) as f32
        } else {
            (((n as f64 * fw_t1).sin() - (n as f64 * fw_t0).sin()) / (n as f64 * PI)
                * w[i] as f64) as f32
        };
    }

    // normalize at the band center rather than at DC
    let fw_center = 0.5 * (fw_t0 + fw_t1);
    let mut fmax = taps[m as usize] as f64;
    for n in 1..=m {
        fmax += 2.0 * taps[(n + m) as usize] as f64 * (n as f64 * fw_center).cos();
    }
    let scale = gain / fmax;
    for tap in &mut taps {
        *tap = (*tap as f64 * scale) as f32;
    }
    Ok(taps)
}

/// Design a complex band-pass filter.
///
/// A real low-pass prototype for half the band width is shifted to the
/// band center by a linearly increasing phase, yielding separate real and
/// imaginary tap arrays. Cutoffs may span negative frequencies; the band
/// must lie in `[-sample_rate/2, sample_rate/2]` with
/// `low_cutoff < high_cutoff`.
pub fn design_complex_band_pass(
    gain: f64,
    sample_rate: f64,
    low_cutoff: f64,
    high_cutoff: f64,
    transition_width: f64,
    attenuation_db: f64,
) -> Result<(Vec<f32>, Vec<f32>)> {
    if sample_rate <= 0.0 {
        return Err(Error::config("sample rate must be positive"));
    }
    if low_cutoff < -sample_rate / 2.0 || high_cutoff > sample_rate / 2.0 {
        return Err(Error::config(
            "cutoffs must lie in [-sample_rate/2, sample_rate/2]",
        ));
    }
    if low_cutoff >= high_cutoff {
        return Err(Error::config("low cutoff must be below the high cutoff"));
    }
    if transition_width <= 0.0 {
        return Err(Error::config("transition width must be positive"));
    }

    let prototype = design_low_pass(
        gain,
        sample_rate,
        (high_cutoff - low_cutoff) / 2.0,
        transition_width,
        attenuation_db,
    )?;
    let ntaps = prototype.len();
    let freq = PI * (high_cutoff + low_cutoff) / sample_rate;
    let mut phase = -freq * (ntaps / 2) as f64;

    let mut taps_re = vec![0.0f32; ntaps];
    let mut taps_im = vec![0.0f32; ntaps];
    for i in 0..ntaps {
        taps_re[i] = (prototype[i] as f64 * phase.cos()) as f32;
        taps_im[i] = (prototype[i] as f64 * phase.sin()) as f32;
        phase += freq;
    }
    Ok((taps_re, taps_im))
}

/// Build a decimating low-pass [`FirFilter`] in one call.
pub fn low_pass_filter(
    decimation: usize,
    gain: f64,
    sample_rate: f64,
    cutoff: f64,
    transition_width: f64,
    attenuation_db: f64,
) -> Result<FirFilter> {
    let taps = design_low_pass(gain, sample_rate, cutoff, transition_width, attenuation_db)?;
    FirFilter::new(taps, None, decimation)
}

/// Build a decimating band-pass [`FirFilter`] in one call.
pub fn band_pass_filter(
    decimation: usize,
    gain: f64,
    sample_rate: f64,
    low_cutoff: f64,
    high_cutoff: f64,
    transition_width: f64,
    attenuation_db: f64,
) -> Result<FirFilter> {
    let taps = design_band_pass(
        gain,
        sample_rate,
        low_cutoff,
        high_cutoff,
        transition_width,
        attenuation_db,
    )?;
    FirFilter::new(taps, None, decimation)
}

/// Build a decimating complex band-pass [`FirFilter`] in one call.
pub fn complex_band_pass_filter(
    decimation: usize,
    gain: f64,
    sample_rate: f64,
    low_cutoff: f64,
    high_cutoff: f64,
    transition_width: f64,
    attenuation_db: f64,
) -> Result<FirFilter> {
    let (taps_re, taps_im) = design_complex_band_pass(
        gain,
        sample_rate,
        low_cutoff,
        high_cutoff,
        transition_width,
        attenuation_db,
    )?;
    FirFilter::new(taps_re, Some(taps_im), decimation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_low_pass_is_odd_length() {
        let taps = design_low_pass(1.0, 1_000_000.0, 100_000.0, 10_000.0, 60.0).unwrap();
        assert_eq!(taps.len() % 2, 1);
    }

    #[test]
    fn test_low_pass_dc_gain() {
        for gain in [1.0, 2.5] {
            let taps = design_low_pass(gain, 1_000_000.0, 100_000.0, 50_000.0, 60.0).unwrap();
            let dc: f64 = taps.iter().map(|&t| t as f64).sum();
            assert_relative_eq!(dc, gain, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_low_pass_symmetry() {
        let taps = design_low_pass(1.0, 1_000_000.0, 100_000.0, 50_000.0, 60.0).unwrap();
        for i in 0..taps.len() / 2 {
            assert_relative_eq!(taps[i], taps[taps.len() - 1 - i], epsilon = 1e-6);
        }
    }

    #[test]
    fn test_low_pass_rejects_bad_parameters() {
        assert!(design_low_pass(1.0, 0.0, 1_000.0, 100.0, 60.0).is_err());
        assert!(design_low_pass(1.0, -8_000.0, 1_000.0, 100.0, 60.0).is_err());
        assert!(design_low_pass(1.0, 8_000.0, 0.0, 100.0, 60.0).is_err());
        // cutoff beyond Nyquist
        assert!(design_low_pass(1.0, 8_000.0, 5_000.0, 100.0, 60.0).is_err());
        assert!(design_low_pass(1.0, 8_000.0, 1_000.0, 0.0, 60.0).is_err());
    }

    #[test]
    fn test_band_pass_center_gain() {
        let rate = 1_000_000.0;
        let (low, high) = (100_000.0, 200_000.0);
        let taps = design_band_pass(1.0, rate, low, high, 20_000.0, 60.0).unwrap();
        assert_eq!(taps.len() % 2, 1);
        // evaluate the response at the band center
        let m = (taps.len() - 1) / 2;
        let wc = PI * (low + high) / rate;
        let mut response = taps[m] as f64;
        for n in 1..=m {
            response += 2.0 * taps[m + n] as f64 * (n as f64 * wc).cos();
        }
        assert_relative_eq!(response, 1.0, epsilon = 1e-4);
    }

    #[test]
    fn test_band_pass_rejects_inverted_band() {
        assert!(design_band_pass(1.0, 1_000_000.0, 200_000.0, 100_000.0, 10_000.0, 60.0).is_err());
        assert!(design_band_pass(1.0, 1_000_000.0, 100_000.0, 100_000.0, 10_000.0, 60.0).is_err());
        assert!(design_band_pass(1.0, 1_000_000.0, 0.0, 100_000.0, 10_000.0, 60.0).is_err());
        assert!(
            design_band_pass(1.0, 1_000_000.0, 100_000.0, 600_000.0, 10_000.0, 60.0).is_err()
        );
    }

    #[test]
    fn test_complex_band_pass_magnitude_matches_prototype() {
        let (low, high) = (-100_000.0, 300_000.0);
        let (taps_re, taps_im) =
            design_complex_band_pass(1.0, 1_000_000.0, low, high, 50_000.0, 60.0).unwrap();
        let prototype =
            design_low_pass(1.0, 1_000_000.0, (high - low) / 2.0, 50_000.0, 60.0).unwrap();
        assert_eq!(taps_re.len(), prototype.len());
        for i in 0..prototype.len() {
            let magnitude = (taps_re[i] as f64).hypot(taps_im[i] as f64);
            assert_relative_eq!(magnitude, (prototype[i] as f64).abs(), epsilon = 1e-6);
        }
    }

    #[test]
    fn test_complex_band_pass_allows_negative_band() {
        assert!(
            design_complex_band_pass(1.0, 1_000_000.0, -200_000.0, -100_000.0, 20_000.0, 60.0)
                .is_ok()
        );
        assert!(
            design_complex_band_pass(1.0, 1_000_000.0, -600_000.0, 0.0, 20_000.0, 60.0).is_err()
        );
    }

    #[test]
    fn test_filter_constructors() {
        let filter = low_pass_filter(4, 1.0, 1_000_000.0, 100_000.0, 50_000.0, 60.0).unwrap();
        assert_eq!(filter.decimation(), 4);
        assert_eq!(filter.num_taps() % 2, 1);
        assert!(complex_band_pass_filter(
            2,
            1.0,
            1_000_000.0,
            -100_000.0,
            100_000.0,
            50_000.0,
            60.0
        )
        .is_ok());
    }

    #[test]
    fn test_attenuation_drives_tap_count() {
        let short = design_low_pass(1.0, 1_000_000.0, 100_000.0, 100_000.0, 40.0).unwrap();
        let long = design_low_pass(1.0, 1_000_000.0, 100_000.0, 100_000.0, 80.0).unwrap();
        assert!(long.len() > short.len());
    }
}
