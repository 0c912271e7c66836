//! Combined byte conversion and frequency down-mixing.
//!
//! Converting raw bytes to floats and multiplying by a complex exponential
//! are fused into a single table lookup: a 2-D table of size
//! `cosine_length × 256` holds `lookup(byte) · cos(phase)` (real channel)
//! and `lookup(byte) · sin(phase)` (imaginary channel) for every phase point
//! and byte value. Mixing a sample is then two indexed loads.
//!
//! The table holds an integer number of whole mixing cycles, so the phase
//! index wraps modulo `cosine_length` without any discontinuity. The current
//! phase offset (`base_index`) is carried across calls, which makes chunked
//! processing bit-identical to one-shot processing.

use std::f64::consts::PI;

use tracing::debug;

use crate::lut::LookupTable;
use crate::packet::SamplePacket;

/// Fused byte→float converter and frequency shifter.
///
/// The lookup table is expensive to generate (`cosine_length × 256` trig
/// evaluations per channel) and is meant to be reused across many calls at
/// the same tuning; [`FormatConverter`](crate::convert::FormatConverter)
/// takes care of regenerating it only when the mix frequency changes.
#[derive(Debug, Clone)]
pub struct Mixer {
    lut_re: Vec<f32>,
    lut_im: Vec<f32>,
    cosine_length: usize,
    cosine_frequency: i64,
    base_index: usize,
}

impl Mixer {
    /// Create a mixer with no table. [`generate_lookup_table`] must be
    /// called before the first mix.
    ///
    /// [`generate_lookup_table`]: Mixer::generate_lookup_table
    pub fn new() -> Self {
        Self {
            lut_re: Vec::new(),
            lut_im: Vec::new(),
            cosine_length: 0,
            cosine_frequency: 0,
            base_index: 0,
        }
    }

    /// Frequency (Hz) currently baked into the lookup table, 0 if none.
    pub fn cosine_frequency(&self) -> i64 {
        self.cosine_frequency
    }

    /// Length of the lookup table in phase points.
    pub fn cosine_length(&self) -> usize {
        self.cosine_length
    }

    /// Regenerate the lookup table for a new mix frequency.
    ///
    /// `cosine_length` must span an integer number of whole mixing cycles
    /// (see [`FormatConverter`](crate::convert::FormatConverter) for the
    /// length search). Resets the phase offset to zero.
    pub fn generate_lookup_table(
        &mut self,
        sample_rate: u32,
        mix_frequency: i64,
        cosine_length: usize,
        lut: &LookupTable,
    ) {
        debug!(
            cosine_length,
            mix_frequency, "generating mixer lookup table"
        );
        self.cosine_length = cosine_length;
        self.cosine_frequency = mix_frequency;
        self.base_index = 0;
        self.lut_re.clear();
        self.lut_im.clear();
        self.lut_re.reserve(cosine_length * 256);
        self.lut_im.reserve(cosine_length * 256);

        for x in 0..cosine_length {
            let phase = 2.0 * PI * mix_frequency as f64 * x as f64 / sample_rate as f64;
            let cosine = phase.cos() as f32;
            let sine = phase.sin() as f32;
            for b in 0..=255u8 {
                let amplitude = lut.lookup(b);
                self.lut_re.push(amplitude * cosine);
                self.lut_im.push(amplitude * sine);
            }
        }
    }

    /// Mix and convert interleaved 8-bit I/Q bytes, appending to `packet`.
    ///
    /// Appends `min(input.len()/2, free capacity)` samples starting at
    /// `packet.size()`, advances the packet size and the carried phase
    /// offset, and returns the number of samples appended. Returns 0 if no
    /// table has been generated yet.
    pub fn mix_interleaved_8bit(&mut self, input: &[u8], packet: &mut SamplePacket) -> usize {
        if self.cosine_length == 0 {
            return 0;
        }
        let offset = packet.size();
        let count = (input.len() / 2).min(packet.capacity() - offset);
        let (re, im) = packet.bufs_mut();
        for k in 0..count {
            let phase = (self.base_index + k) % self.cosine_length;
            re[offset + k] = self.lut_re[phase * 256 + input[2 * k] as usize];
            im[offset + k] = self.lut_im[phase * 256 + input[2 * k + 1] as usize];
        }
        self.base_index = (self.base_index + count) % self.cosine_length;
        packet.set_size(offset + count);
        count
    }

    /// Reset the carried phase offset to zero (restart the stream).
    pub fn reset(&mut self) {
        self.base_index = 0;
    }
}

impl Default for Mixer {
    fn default() -> Self {
        Self::new()
    }
}
