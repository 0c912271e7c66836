//! Test helper utilities for generating synthetic I/Q byte streams

use std::f32::consts::PI;

/// Generate a complex sine wave as interleaved unsigned 8-bit I/Q bytes
///
/// # Arguments
/// * `frequency` - Frequency in Hz
/// * `sample_rate` - Sample rate in Hz
/// * `num_samples` - Number of samples to generate
#[allow(dead_code)]
pub fn generate_sine_wave_u8(frequency: f32, sample_rate: u32, num_samples: usize) -> Vec<u8> {
    let mut buffer = Vec::with_capacity(num_samples * 2);
    let angular_freq = 2.0 * PI * frequency / sample_rate as f32;

    for n in 0..num_samples {
        let phase = angular_freq * n as f32;
        let i = phase.cos();
        let q = phase.sin();

        // Convert from [-1, 1] to [0, 255]
        let i_byte = ((i + 1.0) * 127.5) as u8;
        let q_byte = ((q + 1.0) * 127.5) as u8;

        buffer.push(i_byte);
        buffer.push(q_byte);
    }

    buffer
}

/// Generate a complex sine wave as interleaved signed 8-bit I/Q bytes
#[allow(dead_code)]
pub fn generate_sine_wave_s8(frequency: f32, sample_rate: u32, num_samples: usize) -> Vec<u8> {
    let mut buffer = Vec::with_capacity(num_samples * 2);
    let angular_freq = 2.0 * PI * frequency / sample_rate as f32;

    for n in 0..num_samples {
        let phase = angular_freq * n as f32;
        let i = (phase.cos() * 127.0) as i8;
        let q = (phase.sin() * 127.0) as i8;

        buffer.push(i as u8);
        buffer.push(q as u8);
    }

    buffer
}

/// Generate a constant signal as interleaved signed 8-bit I/Q bytes
///
/// `i_value` and `q_value` are normalized amplitudes in [-1, 1].
#[allow(dead_code)]
pub fn generate_dc_signal_s8(num_samples: usize, i_value: f32, q_value: f32) -> Vec<u8> {
    let i_byte = (i_value * 127.0).clamp(-128.0, 127.0) as i8 as u8;
    let q_byte = (q_value * 127.0).clamp(-128.0, 127.0) as i8 as u8;

    let mut buffer = Vec::with_capacity(num_samples * 2);
    for _ in 0..num_samples {
        buffer.push(i_byte);
        buffer.push(q_byte);
    }

    buffer
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_sine_wave_u8_length() {
        let samples = generate_sine_wave_u8(1000.0, 96000, 100);
        assert_eq!(samples.len(), 200); // 100 samples * 2 bytes per sample
    }

    #[test]
    fn test_generate_dc_signal_s8() {
        let samples = generate_dc_signal_s8(10, 0.5, -0.5);
        assert_eq!(samples.len(), 20);
        for pair in samples.chunks(2) {
            assert_eq!(pair[0] as i8, 63);
            assert_eq!(pair[1] as i8, -63);
        }
    }
}
