//! Byte-to-amplitude lookup tables.
//!
//! ADCs deliver I/Q samples as raw bytes; the mapping to a normalized
//! amplitude in `[-1, 1]` depends on the encoding. A [`LookupTable`]
//! precomputes that mapping for all 256 byte values so conversion is a
//! single indexed load per byte.

/// Immutable 256-entry table mapping a raw byte to a calibrated amplitude.
///
/// The table is indexed by the byte's bit pattern; the sign/offset
/// interpretation of the encoding is baked into the entries.
#[derive(Debug, Clone)]
pub struct LookupTable {
    table: [f32; 256],
}

impl LookupTable {
    /// Table for signed 8-bit samples: byte `b` maps to `(b as i8) / 128`,
    /// i.e. `(i - 128) / 128` over the offset index `i = b + 128`.
    pub fn signed_8bit() -> Self {
        let mut table = [0.0f32; 256];
        for (b, entry) in table.iter_mut().enumerate() {
            *entry = (b as u8 as i8) as f32 / 128.0;
        }
        Self { table }
    }

    /// Table for unsigned 8-bit samples: byte `b` maps to `(b - 127.4) / 128`.
    ///
    /// The offset is 127.4 rather than 127.5 to compensate for the DC bias
    /// of common unsigned ADC encodings.
    pub fn unsigned_8bit() -> Self {
        let mut table = [0.0f32; 256];
        for (b, entry) in table.iter_mut().enumerate() {
            *entry = (b as f32 - 127.4) / 128.0;
        }
        Self { table }
    }

    /// Amplitude for the given raw byte.
    #[inline]
    pub fn lookup(&self, byte: u8) -> f32 {
        self.table[byte as usize]
    }
}
