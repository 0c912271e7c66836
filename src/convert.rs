//! Conversion of raw source bytes into [`SamplePacket`]s.
//!
//! A [`FormatConverter`] is the entry stage of the pipeline. It knows the
//! byte format the source delivers, the frequency the source is tuned to and
//! its sample rate, and offers two paths into a packet:
//!
//! * [`fill_into`](FormatConverter::fill_into) — plain byte→float
//!   conversion at the tuned frequency;
//! * [`mix_into`](FormatConverter::mix_into) — conversion fused with a
//!   frequency shift that centers a channel elsewhere in the captured band.
//!
//! Both paths stamp the packet with the frequency and sample rate of the
//! produced samples.

use tracing::warn;

use crate::lut::LookupTable;
use crate::mixer::Mixer;
use crate::packet::SamplePacket;
use crate::{PipelineContext, SampleFormat};

/// Stateful converter from raw interleaved I/Q bytes to complex samples.
///
/// One converter serves one byte source. The mixer lookup table is cached
/// between calls and regenerated only when the sample rate changes or the
/// requested channel moves to a different mix frequency.
#[derive(Debug, Clone)]
pub struct FormatConverter {
    format: SampleFormat,
    frequency: u64,
    sample_rate: u32,
    lut: Option<LookupTable>,
    mixer: Mixer,
    mixer_table_valid: bool,
    max_mixer_table_len: usize,
}

impl FormatConverter {
    /// Create a converter for the given sample format.
    ///
    /// The tuned frequency and sample rate start at zero; set them before
    /// the first [`mix_into`](FormatConverter::mix_into) call.
    pub fn new(ctx: &PipelineContext, format: SampleFormat) -> Self {
        let lut = match format {
            SampleFormat::Signed8 => Some(LookupTable::signed_8bit()),
            SampleFormat::Unsigned8 => Some(LookupTable::unsigned_8bit()),
            // 16-bit paths are reserved but not implemented
            SampleFormat::Signed16 | SampleFormat::Unsigned16 => None,
        };
        Self {
            format,
            frequency: 0,
            sample_rate: 0,
            lut,
            mixer: Mixer::new(),
            mixer_table_valid: false,
            max_mixer_table_len: ctx.max_mixer_table_len(),
        }
    }

    /// Sample format this converter expects.
    pub fn format(&self) -> SampleFormat {
        self.format
    }

    /// Frequency (Hz) the source is tuned to.
    pub fn frequency(&self) -> u64 {
        self.frequency
    }

    /// Set the frequency the source is tuned to.
    pub fn set_frequency(&mut self, frequency: u64) {
        self.frequency = frequency;
    }

    /// Sample rate (Hz) of the source.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Set the sample rate of the source. Invalidates the cached mixer
    /// table; it is regenerated on the next mixing call.
    pub fn set_sample_rate(&mut self, sample_rate: u32) {
        if sample_rate != self.sample_rate {
            self.sample_rate = sample_rate;
            self.mixer_table_valid = false;
        }
    }

    /// Convert raw bytes and append them to `packet` without mixing.
    ///
    /// Appends at most the packet's free capacity, stamps the packet with
    /// the tuned frequency and sample rate and returns the number of samples
    /// appended. Unsupported formats log a warning and return 0.
    pub fn fill_into(&mut self, input: &[u8], packet: &mut SamplePacket) -> usize {
        let lut = match &self.lut {
            Some(lut) => lut,
            None => {
                warn!(format = ?self.format, "sample format not supported");
                return 0;
            }
        };
        let offset = packet.size();
        let count = (input.len() / 2).min(packet.capacity() - offset);
        let (re, im) = packet.bufs_mut();
        for k in 0..count {
            re[offset + k] = lut.lookup(input[2 * k]);
            im[offset + k] = lut.lookup(input[2 * k + 1]);
        }
        packet.set_size(offset + count);
        packet.set_frequency(self.frequency);
        packet.set_sample_rate(self.sample_rate);
        count
    }

    /// Convert raw bytes, shift `channel_frequency` to baseband and append
    /// the result to `packet`.
    ///
    /// The mixer lookup table is regenerated if the sample rate changed
    /// since the last call or the channel moved to a different mix
    /// frequency. Stamps the packet with `channel_frequency` and the sample
    /// rate and returns the number of samples appended. Unsupported formats
    /// log a warning and return 0.
    pub fn mix_into(
        &mut self,
        input: &[u8],
        packet: &mut SamplePacket,
        channel_frequency: u64,
    ) -> usize {
        let lut = match &self.lut {
            Some(lut) => lut,
            None => {
                warn!(format = ?self.format, "sample format not supported");
                return 0;
            }
        };

        let mix_frequency = self.resolve_mix_frequency(channel_frequency);
        if !self.mixer_table_valid || mix_frequency != self.mixer.cosine_frequency() {
            let cosine_length = self.optimal_cosine_length(mix_frequency);
            self.mixer
                .generate_lookup_table(self.sample_rate, mix_frequency, cosine_length, lut);
            self.mixer_table_valid = true;
        }

        let count = self.mixer.mix_interleaved_8bit(input, packet);
        packet.set_frequency(channel_frequency);
        packet.set_sample_rate(self.sample_rate);
        count
    }

    /// Nominal mix frequency, aliased into a representable range.
    ///
    /// A mix frequency of zero, or one whose period exceeds the table
    /// ceiling, is shifted up by one sample rate. The sampled spectrum is
    /// periodic in the sample rate, so the aliased tone mixes identically.
    fn resolve_mix_frequency(&self, channel_frequency: u64) -> i64 {
        let mut mix = channel_frequency as i64 - self.frequency as i64;
        if mix == 0
            || self.sample_rate as i64 / mix.unsigned_abs() as i64
                > self.max_mixer_table_len as i64
        {
            mix += self.sample_rate as i64;
        }
        mix
    }

    /// Table length with the least phase rounding error: the largest
    /// improvement over one cycle among integer multiples of the cycle
    /// length that fit under the ceiling, and at least 1.
    fn optimal_cosine_length(&self, mix_frequency: i64) -> usize {
        let cycle_length = self.sample_rate as f64 / mix_frequency.unsigned_abs() as f64;
        let mut best_length = cycle_length as usize;
        let mut best_error = (best_length as f64 - cycle_length).abs();
        let mut i = 1.0;
        while i * cycle_length < self.max_mixer_table_len as f64 {
            let candidate = (i * cycle_length) as usize;
            let error = (candidate as f64 - i * cycle_length).abs();
            if error < best_error {
                best_length = candidate;
                best_error = error;
            }
            i += 1.0;
        }
        best_length.max(1)
    }
}
