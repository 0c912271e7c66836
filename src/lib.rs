#![doc = include_str!("../readme.md")]

pub mod convert;
pub mod demod;
pub mod error;
pub mod fir;
pub mod firdes;
pub mod lut;
pub mod mixer;
pub mod packet;
pub mod source;
pub mod window;

pub use error::{Error, Result};
pub use packet::SamplePacket;

/**
 * Raw I/Q sample format
 */
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SampleFormat {
    /// Interleaved signed 8-bit I/Q (e.g. HackRF)
    Signed8,
    /// Interleaved unsigned 8-bit I/Q (e.g. RTL-SDR)
    Unsigned8,
    /// Interleaved signed 16-bit I/Q (reserved, not yet implemented)
    Signed16,
    /// Interleaved unsigned 16-bit I/Q (reserved, not yet implemented)
    Unsigned16,
}

/// Default ceiling for the mixer lookup-table length (phase points).
pub const DEFAULT_MAX_MIXER_TABLE_LEN: usize = 500;

/// Execution context shared by the pipeline stages.
///
/// The context owns the backend parameters that used to be global state in
/// GPU-backed implementations of this pipeline. Create one at startup, pass
/// it by reference into stage constructors and drop it at shutdown.
///
/// # Example
///
/// ```
/// use iqflow::{PipelineContext, SampleFormat};
/// use iqflow::convert::FormatConverter;
///
/// let ctx = PipelineContext::new();
/// let converter = FormatConverter::new(&ctx, SampleFormat::Signed8);
/// ```
#[derive(Debug, Clone)]
pub struct PipelineContext {
    max_mixer_table_len: usize,
}

impl PipelineContext {
    /// Create a context with the default mixer table ceiling.
    pub fn new() -> Self {
        Self {
            max_mixer_table_len: DEFAULT_MAX_MIXER_TABLE_LEN,
        }
    }

    /// Create a context with a custom mixer table ceiling.
    ///
    /// The ceiling bounds the length (in phase points) of the mixer's
    /// complex-exponential lookup table. Larger tables resolve lower mix
    /// frequencies exactly at the cost of memory (`len × 256` floats per
    /// channel).
    pub fn with_max_mixer_table_len(max_mixer_table_len: usize) -> Result<Self> {
        if max_mixer_table_len == 0 {
            return Err(Error::config("mixer table ceiling must be at least 1"));
        }
        Ok(Self {
            max_mixer_table_len,
        })
    }

    /// Maximum mixer lookup-table length in phase points.
    pub fn max_mixer_table_len(&self) -> usize {
        self.max_mixer_table_len
    }
}

impl Default for PipelineContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_default_ceiling() {
        let ctx = PipelineContext::new();
        assert_eq!(ctx.max_mixer_table_len(), DEFAULT_MAX_MIXER_TABLE_LEN);
    }

    #[test]
    fn test_context_custom_ceiling() {
        let ctx = PipelineContext::with_max_mixer_table_len(100).unwrap();
        assert_eq!(ctx.max_mixer_table_len(), 100);
    }

    #[test]
    fn test_context_zero_ceiling_rejected() {
        assert!(PipelineContext::with_max_mixer_table_len(0).is_err());
    }
}
