//! Streaming FIR filtering with decimation.
//!
//! A [`FirFilter`] computes a dense correlation of its taps against the
//! input and strides the output by the decimation factor. The trailing
//! `num_taps − 1` consumed samples are kept as history between calls, so
//! windows spanning a call boundary are identical to windows computed from
//! one continuous stream: filtering a signal in chunks is numerically equal
//! to filtering it in one shot.
//!
//! Three kernels share the control structure:
//!
//! * [`filter_complex_signal`](FirFilter::filter_complex_signal) — real
//!   taps, complex signal (channel selection, decimation);
//! * [`filter_real_signal`](FirFilter::filter_real_signal) — real taps,
//!   real signal (audio post-processing after demodulation);
//! * [`filter_complex_taps`](FirFilter::filter_complex_taps) — complex
//!   taps, complex signal (asymmetric pass bands).

use tracing::warn;

use crate::error::{Error, Result};
use crate::packet::SamplePacket;

/// Decimating FIR filter with cross-call history.
///
/// Built from tap arrays, usually via the design functions in
/// [`firdes`](crate::firdes). Not internally synchronized: one instance per
/// stream, one stream per thread.
#[derive(Debug, Clone)]
pub struct FirFilter {
    taps_re: Vec<f32>,
    taps_im: Option<Vec<f32>>,
    decimation: usize,
    remainder_re: Vec<f32>,
    remainder_im: Vec<f32>,
}

impl FirFilter {
    /// Create a filter from its taps and decimation factor.
    ///
    /// `taps_im` is `None` for real-valued taps. Fails on empty taps, a
    /// decimation factor of zero or mismatched tap array lengths.
    pub fn new(taps_re: Vec<f32>, taps_im: Option<Vec<f32>>, decimation: usize) -> Result<Self> {
        if taps_re.is_empty() {
            return Err(Error::config("at least one filter tap is required"));
        }
        if decimation == 0 {
            return Err(Error::config("decimation factor must be at least 1"));
        }
        if let Some(im) = &taps_im {
            if im.len() != taps_re.len() {
                return Err(Error::config(
                    "real and imaginary tap arrays must be of the same length",
                ));
            }
        }
        let history = taps_re.len() - 1;
        Ok(Self {
            taps_re,
            taps_im,
            decimation,
            remainder_re: vec![0.0; history],
            remainder_im: vec![0.0; history],
        })
    }

    /// Number of taps.
    pub fn num_taps(&self) -> usize {
        self.taps_re.len()
    }

    /// Decimation factor.
    pub fn decimation(&self) -> usize {
        self.decimation
    }

    /// Clear the carried history (restart the stream).
    pub fn reset(&mut self) {
        self.remainder_re.fill(0.0);
        self.remainder_im.fill(0.0);
    }

    /// Filter `length` complex input samples starting at `offset` with real
    /// taps, appending to `output`.
    ///
    /// Produces `min(length / decimation, free output capacity)` samples and
    /// returns the number of input samples consumed (`produced ×
    /// decimation`), so the caller knows how far to advance. Tags `output`
    /// with the decimated sample rate.
    pub fn filter_complex_signal(
        &mut self,
        input: &SamplePacket,
        output: &mut SamplePacket,
        offset: usize,
        length: usize,
    ) -> usize {
        let produced = (length / self.decimation).min(output.capacity() - output.size());
        let consumed = produced * self.decimation;
        let num_taps = self.taps_re.len();
        let in_re = input.re_buf();
        let in_im = input.im_buf();
        let out_offset = output.size();
        let (out_re, out_im) = output.bufs_mut();

        for x in 0..produced {
            let base = (offset + x * self.decimation) as isize - num_taps as isize + 1;
            let mut acc_re = 0.0f32;
            let mut acc_im = 0.0f32;
            for (i, &tap) in self.taps_re.iter().enumerate() {
                let idx = base + i as isize;
                if idx >= 0 {
                    acc_re += tap * in_re[idx as usize];
                    acc_im += tap * in_im[idx as usize];
                } else {
                    let r = (idx + num_taps as isize - 1) as usize;
                    acc_re += tap * self.remainder_re[r];
                    acc_im += tap * self.remainder_im[r];
                }
            }
            out_re[out_offset + x] = acc_re;
            out_im[out_offset + x] = acc_im;
        }

        self.save_remainder(in_re, Some(in_im), offset + consumed);
        output.set_size(out_offset + produced);
        output.set_sample_rate(input.sample_rate() / self.decimation as u32);
        consumed
    }

    /// Same as [`filter_complex_signal`](FirFilter::filter_complex_signal)
    /// but for a real-valued signal: only the real channel is read and
    /// written, and only the real history is carried.
    pub fn filter_real_signal(
        &mut self,
        input: &SamplePacket,
        output: &mut SamplePacket,
        offset: usize,
        length: usize,
    ) -> usize {
        let produced = (length / self.decimation).min(output.capacity() - output.size());
        let consumed = produced * self.decimation;
        let num_taps = self.taps_re.len();
        let in_re = input.re_buf();
        let out_offset = output.size();
        let out_re = output.re_buf_mut();

        for x in 0..produced {
            let base = (offset + x * self.decimation) as isize - num_taps as isize + 1;
            let mut acc = 0.0f32;
            for (i, &tap) in self.taps_re.iter().enumerate() {
                let idx = base + i as isize;
                if idx >= 0 {
                    acc += tap * in_re[idx as usize];
                } else {
                    acc += tap * self.remainder_re[(idx + num_taps as isize - 1) as usize];
                }
            }
            out_re[out_offset + x] = acc;
        }

        self.save_remainder(in_re, None, offset + consumed);
        output.set_size(out_offset + produced);
        output.set_sample_rate(input.sample_rate() / self.decimation as u32);
        consumed
    }

    /// Filter with complex taps and a complex signal (full complex
    /// multiply-accumulate). Warns and returns 0 if the filter was built
    /// without imaginary taps.
    pub fn filter_complex_taps(
        &mut self,
        input: &SamplePacket,
        output: &mut SamplePacket,
        offset: usize,
        length: usize,
    ) -> usize {
        let taps_im = match &self.taps_im {
            Some(taps_im) => taps_im,
            None => {
                warn!("filter has no imaginary taps; nothing filtered");
                return 0;
            }
        };
        let produced = (length / self.decimation).min(output.capacity() - output.size());
        let consumed = produced * self.decimation;
        let num_taps = self.taps_re.len();
        let in_re = input.re_buf();
        let in_im = input.im_buf();
        let out_offset = output.size();
        let (out_re, out_im) = output.bufs_mut();

        for x in 0..produced {
            let base = (offset + x * self.decimation) as isize - num_taps as isize + 1;
            let mut acc_re = 0.0f32;
            let mut acc_im = 0.0f32;
            for i in 0..num_taps {
                let idx = base + i as isize;
                let (sig_re, sig_im) = if idx >= 0 {
                    (in_re[idx as usize], in_im[idx as usize])
                } else {
                    let r = (idx + num_taps as isize - 1) as usize;
                    (self.remainder_re[r], self.remainder_im[r])
                };
                acc_re += self.taps_re[i] * sig_re - taps_im[i] * sig_im;
                acc_im += self.taps_re[i] * sig_im + taps_im[i] * sig_re;
            }
            out_re[out_offset + x] = acc_re;
            out_im[out_offset + x] = acc_im;
        }

        self.save_remainder(in_re, Some(in_im), offset + consumed);
        output.set_size(out_offset + produced);
        output.set_sample_rate(input.sample_rate() / self.decimation as u32);
        consumed
    }

    // Keep the last num_taps−1 samples of the consumed stream as history.
    // When fewer than that were consumed, the old history is shifted and
    // the new samples appended, so the invariant holds for short calls too.
    fn save_remainder(&mut self, in_re: &[f32], in_im: Option<&[f32]>, end: usize) {
        let history = self.taps_re.len() - 1;
        if history == 0 {
            return;
        }
        if end >= history {
            self.remainder_re.copy_from_slice(&in_re[end - history..end]);
            if let Some(in_im) = in_im {
                self.remainder_im.copy_from_slice(&in_im[end - history..end]);
            }
        } else {
            self.remainder_re.copy_within(end.., 0);
            self.remainder_re[history - end..].copy_from_slice(&in_re[..end]);
            if let Some(in_im) = in_im {
                self.remainder_im.copy_within(end.., 0);
                self.remainder_im[history - end..].copy_from_slice(&in_im[..end]);
            }
        }
    }
}
