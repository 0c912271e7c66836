//! Complex sample packets.
//!
//! A [`SamplePacket`] is the buffer type handed between pipeline stages: two
//! parallel `f32` buffers (real and imaginary parts) of fixed capacity, a
//! count of valid leading samples and the center frequency / sample rate the
//! samples were recorded at.
//!
//! Packets are never resized. Stages append starting at `size()` and stop
//! silently when the capacity is reached; the caller drains a packet by
//! resetting its size to zero (or swaps in a fresh packet).

use num_complex::Complex;

use crate::error::{Error, Result};

/// A bounded buffer of complex samples plus recording metadata.
///
/// # Example
///
/// ```
/// use iqflow::packet::SamplePacket;
///
/// let mut packet = SamplePacket::new(1024);
/// assert_eq!(packet.size(), 0);
/// assert_eq!(packet.capacity(), 1024);
///
/// packet.set_sample_rate(2_000_000);
/// packet.set_frequency(97_000_000);
/// ```
#[derive(Debug, Clone)]
pub struct SamplePacket {
    re: Vec<f32>,
    im: Vec<f32>,
    frequency: u64,
    sample_rate: u32,
    size: usize,
}

impl SamplePacket {
    /// Create an empty packet with the given capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            re: vec![0.0; capacity],
            im: vec![0.0; capacity],
            frequency: 0,
            sample_rate: 0,
            size: 0,
        }
    }

    /// Wrap two existing buffers. All samples are considered valid.
    ///
    /// Fails if the buffers differ in length.
    pub fn from_buffers(re: Vec<f32>, im: Vec<f32>, frequency: u64, sample_rate: u32) -> Result<Self> {
        let size = re.len();
        Self::from_buffers_with_size(re, im, frequency, sample_rate, size)
    }

    /// Wrap two existing buffers with only the first `size` samples valid.
    ///
    /// Fails if the buffers differ in length or `size` exceeds their length.
    pub fn from_buffers_with_size(
        re: Vec<f32>,
        im: Vec<f32>,
        frequency: u64,
        sample_rate: u32,
        size: usize,
    ) -> Result<Self> {
        if re.len() != im.len() {
            return Err(Error::config("re and im buffers must be of the same length"));
        }
        if size > re.len() {
            return Err(Error::config("size must be smaller or equal the buffer length"));
        }
        Ok(Self {
            re,
            im,
            frequency,
            sample_rate,
            size,
        })
    }

    /// Number of valid samples in this packet.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Maximum number of samples this packet can hold.
    pub fn capacity(&self) -> usize {
        self.re.len()
    }

    /// Set the number of valid samples, clamped to the capacity.
    pub fn set_size(&mut self, size: usize) {
        self.size = size.min(self.capacity());
    }

    /// Copy of the real parts of the valid samples.
    pub fn re(&self) -> Vec<f32> {
        self.re[..self.size].to_vec()
    }

    /// Copy of the imaginary parts of the valid samples.
    pub fn im(&self) -> Vec<f32> {
        self.im[..self.size].to_vec()
    }

    /// Copy of the valid samples as complex numbers.
    pub fn samples(&self) -> Vec<Complex<f32>> {
        self.re[..self.size]
            .iter()
            .zip(&self.im[..self.size])
            .map(|(&re, &im)| Complex::new(re, im))
            .collect()
    }

    /// Center frequency at which these samples were recorded.
    pub fn frequency(&self) -> u64 {
        self.frequency
    }

    /// Set the center frequency for this packet.
    pub fn set_frequency(&mut self, frequency: u64) {
        self.frequency = frequency;
    }

    /// Sample rate at which these samples were recorded.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Set the sample rate for this packet.
    pub fn set_sample_rate(&mut self, sample_rate: u32) {
        self.sample_rate = sample_rate;
    }

    // Full-capacity buffer access for the pipeline stages. Indices in
    // [size, capacity) hold stale data from earlier fills.

    pub(crate) fn re_buf(&self) -> &[f32] {
        &self.re
    }

    pub(crate) fn im_buf(&self) -> &[f32] {
        &self.im
    }

    pub(crate) fn re_buf_mut(&mut self) -> &mut [f32] {
        &mut self.re
    }

    pub(crate) fn bufs_mut(&mut self) -> (&mut [f32], &mut [f32]) {
        (&mut self.re, &mut self.im)
    }
}
