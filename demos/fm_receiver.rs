//! Wideband FM receiver: raw I/Q capture file in, demodulated audio out.
//!
//! Reads unsigned 8-bit interleaved I/Q bytes (RTL-SDR convention), shifts
//! the requested station to baseband, low-pass filters and decimates down to
//! a rate suitable for FM, demodulates and writes the audio as little-endian
//! f32 samples on stdout:
//!
//! ```text
//! cargo run --example fm_receiver -- capture.iq 99500000 100300000 2000000 \
//!     | aplay -f FLOAT_LE -r 31250 -c 1
//! ```

use std::io::Write;

use iqflow::convert::FormatConverter;
use iqflow::demod::QuadratureDemodulator;
use iqflow::firdes;
use iqflow::source::IqByteRead;
use iqflow::{Error, PipelineContext, Result, SampleFormat, SamplePacket};

const CHUNK_SIZE: usize = 1 << 16;
const CHANNEL_DECIMATION: usize = 8;
const AUDIO_DECIMATION: usize = 8;
const FM_DEVIATION: f32 = 75_000.0;

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 5 {
        eprintln!(
            "usage: {} <capture.iq> <tuned_hz> <channel_hz> <sample_rate_hz>",
            args[0]
        );
        return Err(Error::config("expected four arguments"));
    }
    let tuned: u64 = args[2]
        .parse()
        .map_err(|_| Error::config("tuned frequency must be an integer"))?;
    let channel: u64 = args[3]
        .parse()
        .map_err(|_| Error::config("channel frequency must be an integer"))?;
    let sample_rate: u32 = args[4]
        .parse()
        .map_err(|_| Error::config("sample rate must be an integer"))?;

    let ctx = PipelineContext::new();
    let mut converter = FormatConverter::new(&ctx, SampleFormat::Unsigned8);
    converter.set_frequency(tuned);
    converter.set_sample_rate(sample_rate);

    let channel_rate = sample_rate / CHANNEL_DECIMATION as u32;
    let audio_rate = channel_rate / AUDIO_DECIMATION as u32;
    let mut channel_filter = firdes::low_pass_filter(
        CHANNEL_DECIMATION,
        1.0,
        sample_rate as f64,
        (channel_rate / 2) as f64,
        (channel_rate / 8) as f64,
        40.0,
    )?;
    let mut demodulator = QuadratureDemodulator::new(
        channel_rate as f32 / (2.0 * std::f32::consts::PI * FM_DEVIATION),
    );
    let mut audio_filter = firdes::low_pass_filter(
        AUDIO_DECIMATION,
        1.0,
        channel_rate as f64,
        (audio_rate / 2) as f64,
        (audio_rate / 8) as f64,
        40.0,
    )?;

    let mut baseband = SamplePacket::new(CHUNK_SIZE);
    let mut channel_out = SamplePacket::new(CHUNK_SIZE / CHANNEL_DECIMATION);
    let mut demodulated = SamplePacket::new(CHUNK_SIZE / CHANNEL_DECIMATION);
    let mut audio = SamplePacket::new(CHUNK_SIZE / (CHANNEL_DECIMATION * AUDIO_DECIMATION));

    let stdout = std::io::stdout();
    let mut stdout = stdout.lock();

    let reader = IqByteRead::from_file(
        &args[1],
        tuned,
        sample_rate,
        CHUNK_SIZE,
        SampleFormat::Unsigned8,
    )?;
    for frame in reader {
        let frame = frame?;
        baseband.set_size(0);
        converter.mix_into(&frame, &mut baseband, channel);

        channel_out.set_size(0);
        channel_filter.filter_complex_signal(&baseband, &mut channel_out, 0, baseband.size());

        demodulated.set_size(0);
        demodulator.demodulate(&channel_out, &mut demodulated, 0, channel_out.size());

        audio.set_size(0);
        audio_filter.filter_real_signal(&demodulated, &mut audio, 0, demodulated.size());

        for sample in audio.re() {
            stdout.write_all(&sample.to_le_bytes())?;
        }
    }
    stdout.flush()?;
    Ok(())
}
