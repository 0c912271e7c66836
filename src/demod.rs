//! FM demodulation.
//!
//! The quadrature discriminator measures the phase advance between
//! consecutive complex samples: `arg(x[n] · conj(x[n-1]))`, scaled by a
//! gain. For an FM signal the phase advance is proportional to the
//! instantaneous frequency deviation, so the output is the modulating
//! signal. The previous sample is carried across calls so chunked
//! demodulation matches one-shot demodulation.

use crate::packet::SamplePacket;

/// Quadrature (differential-phase) FM demodulator.
///
/// For a deviation of `Δf` Hz at sample rate `fs`, a gain of
/// `fs / (2π·Δf)` normalizes full deviation to ±1.0.
#[derive(Debug, Clone)]
pub struct QuadratureDemodulator {
    gain: f32,
    history_re: f32,
    history_im: f32,
}

impl QuadratureDemodulator {
    /// Create a demodulator with the given output gain.
    ///
    /// The history starts at zero, so the first output sample of a fresh
    /// stream is 0.
    pub fn new(gain: f32) -> Self {
        Self {
            gain,
            history_re: 0.0,
            history_im: 0.0,
        }
    }

    /// Output gain.
    pub fn gain(&self) -> f32 {
        self.gain
    }

    /// Clear the carried history (restart the stream).
    pub fn reset(&mut self) {
        self.history_re = 0.0;
        self.history_im = 0.0;
    }

    /// Demodulate `length` input samples starting at `offset`, appending
    /// the result to the real channel of `output`.
    ///
    /// Produces `min(length, free output capacity)` samples and returns
    /// that count; the sample rate is unchanged. The last consumed input
    /// sample becomes the history for the next call.
    pub fn demodulate(
        &mut self,
        input: &SamplePacket,
        output: &mut SamplePacket,
        offset: usize,
        length: usize,
    ) -> usize {
        let produced = length.min(output.capacity() - output.size());
        let in_re = input.re_buf();
        let in_im = input.im_buf();
        let out_offset = output.size();
        let out_re = output.re_buf_mut();

        let mut prev_re = self.history_re;
        let mut prev_im = self.history_im;
        for x in 0..produced {
            let re = in_re[offset + x];
            let im = in_im[offset + x];
            out_re[out_offset + x] =
                self.gain * (im * prev_re - re * prev_im).atan2(re * prev_re + im * prev_im);
            prev_re = re;
            prev_im = im;
        }
        self.history_re = prev_re;
        self.history_im = prev_im;

        output.set_size(out_offset + produced);
        output.set_sample_rate(input.sample_rate());
        produced
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use num_complex::Complex;
    use std::f32::consts::PI;

    fn tone_packet(frequency: f32, sample_rate: u32, count: usize) -> SamplePacket {
        let samples: Vec<Complex<f32>> = (0..count)
            .map(|n| {
                Complex::from_polar(1.0, 2.0 * PI * frequency * n as f32 / sample_rate as f32)
            })
            .collect();
        let re = samples.iter().map(|s| s.re).collect();
        let im = samples.iter().map(|s| s.im).collect();
        SamplePacket::from_buffers(re, im, 0, sample_rate).unwrap()
    }

    #[test]
    fn test_dc_input_demodulates_to_zero() {
        let input = SamplePacket::from_buffers(vec![0.7; 32], vec![0.0; 32], 0, 48_000).unwrap();
        let mut output = SamplePacket::new(32);
        let mut demod = QuadratureDemodulator::new(1.0);
        assert_eq!(demod.demodulate(&input, &mut output, 0, 32), 32);
        for value in output.re() {
            assert_relative_eq!(value, 0.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_tone_demodulates_to_constant() {
        // 1 kHz tone at 48 kHz: phase advance 2π/48 per sample
        let input = tone_packet(1_000.0, 48_000, 64);
        let mut output = SamplePacket::new(64);
        let mut demod = QuadratureDemodulator::new(2.0);
        demod.demodulate(&input, &mut output, 0, 64);
        let expected = 2.0 * 2.0 * PI * 1_000.0 / 48_000.0;
        // first sample works against zero history
        for value in &output.re()[1..] {
            assert_relative_eq!(*value, expected, epsilon = 1e-4);
        }
        assert_eq!(output.sample_rate(), 48_000);
    }

    #[test]
    fn test_negative_frequency_flips_sign() {
        let input = tone_packet(-1_000.0, 48_000, 16);
        let mut output = SamplePacket::new(16);
        let mut demod = QuadratureDemodulator::new(1.0);
        demod.demodulate(&input, &mut output, 0, 16);
        for value in &output.re()[1..] {
            assert!(*value < 0.0);
        }
    }

    #[test]
    fn test_chunked_equals_one_shot() {
        let input = tone_packet(2_500.0, 48_000, 48);

        let mut demod = QuadratureDemodulator::new(1.0);
        let mut one_shot = SamplePacket::new(48);
        demod.demodulate(&input, &mut one_shot, 0, 48);

        demod.reset();
        let mut chunked = SamplePacket::new(48);
        assert_eq!(demod.demodulate(&input, &mut chunked, 0, 17), 17);
        assert_eq!(demod.demodulate(&input, &mut chunked, 17, 31), 31);

        assert_eq!(chunked.size(), one_shot.size());
        for (a, e) in chunked.re().iter().zip(one_shot.re()) {
            assert_relative_eq!(*a, e, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_output_capacity_clamps() {
        let input = tone_packet(1_000.0, 48_000, 32);
        let mut output = SamplePacket::new(10);
        let mut demod = QuadratureDemodulator::new(1.0);
        assert_eq!(demod.demodulate(&input, &mut output, 0, 32), 10);
        assert_eq!(output.size(), 10);
        assert_eq!(demod.demodulate(&input, &mut output, 10, 22), 0);
    }

    #[test]
    fn test_reset_restores_cold_start() {
        let input = tone_packet(1_000.0, 48_000, 16);
        let mut demod = QuadratureDemodulator::new(1.0);
        let mut first = SamplePacket::new(16);
        demod.demodulate(&input, &mut first, 0, 16);
        demod.reset();
        let mut second = SamplePacket::new(16);
        demod.demodulate(&input, &mut second, 0, 16);
        for (a, e) in second.re().iter().zip(first.re()) {
            assert_relative_eq!(*a, e);
        }
    }
}
