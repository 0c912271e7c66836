//! Raw I/Q Byte Sources
//!
//! This module provides functionality to read raw interleaved I/Q bytes from
//! various sources, including files, standard input, and TCP streams. The
//! readers yield whole-sample byte frames ready to feed a
//! [`FormatConverter`](crate::convert::FormatConverter), and provide both
//! synchronous and asynchronous interfaces.
use std::io::Read;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::Stream;
use tokio::io::AsyncBufRead;

use crate::SampleFormat;

/**
 * Byte Source Configuration
 */
pub struct SourceConfig {
    pub format: SampleFormat,
    pub frequency: u64,
    pub sample_rate: u32,
    pub chunk_size: usize,
}

impl SourceConfig {
    pub fn new(frequency: u64, sample_rate: u32, chunk_size: usize, format: SampleFormat) -> Self {
        Self {
            format,
            frequency,
            sample_rate,
            chunk_size,
        }
    }
}

/**
 * Synchronous Byte Reader
 */
pub struct IqByteRead<R: Read> {
    config: SourceConfig,
    reader: R,
}

impl IqByteRead<std::io::BufReader<std::fs::File>> {
    pub fn from_file<P: AsRef<Path>>(
        path: P,
        frequency: u64,
        sample_rate: u32,
        chunk_size: usize,
        format: SampleFormat,
    ) -> Result<Self, std::io::Error> {
        let path = expanduser(path.as_ref().to_path_buf());
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let config = SourceConfig::new(frequency, sample_rate, chunk_size, format);
        Ok(Self { config, reader })
    }

    pub fn config(&self) -> &SourceConfig {
        &self.config
    }

    fn read_frame(&mut self) -> Result<Vec<u8>, std::io::Error> {
        let bytes_per_sample = self.config.format.bytes_per_sample();
        let mut buffer = vec![0u8; self.config.chunk_size * bytes_per_sample];
        self.reader.read_exact(&mut buffer)?;
        Ok(buffer)
    }
}

impl Iterator for IqByteRead<std::io::BufReader<std::fs::File>> {
    type Item = Result<Vec<u8>, std::io::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.read_frame() {
            Ok(buffer) => Some(Ok(buffer)),
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => None,
            Err(e) => Some(Err(e)),
        }
    }
}

/**
 * Asynchronous Byte Reader
 */
pub struct IqByteAsyncRead<R: tokio::io::AsyncBufRead + Unpin> {
    config: SourceConfig,
    reader: R,
}

impl IqByteAsyncRead<tokio::io::BufReader<tokio::fs::File>> {
    pub fn from_file<P: AsRef<Path>>(
        path: P,
        frequency: u64,
        sample_rate: u32,
        chunk_size: usize,
        format: SampleFormat,
    ) -> impl std::future::Future<
        Output = Result<IqByteAsyncRead<tokio::io::BufReader<tokio::fs::File>>, std::io::Error>,
    > {
        let path = expanduser(path.as_ref().to_path_buf());
        async move {
            let file = tokio::fs::File::open(path).await?;
            let reader = tokio::io::BufReader::new(file);
            let config = SourceConfig::new(frequency, sample_rate, chunk_size, format);
            Ok(IqByteAsyncRead { config, reader })
        }
    }
}

impl IqByteAsyncRead<tokio::io::BufReader<tokio::io::Stdin>> {
    pub fn from_stdin(
        frequency: u64,
        sample_rate: u32,
        chunk_size: usize,
        format: SampleFormat,
    ) -> Self {
        let reader = tokio::io::BufReader::new(tokio::io::stdin());
        let config = SourceConfig::new(frequency, sample_rate, chunk_size, format);
        Self { config, reader }
    }
}

impl IqByteAsyncRead<tokio::io::BufReader<tokio::net::TcpStream>> {
    pub async fn from_tcp(
        address: &str,
        port: u16,
        frequency: u64,
        sample_rate: u32,
        chunk_size: usize,
        format: SampleFormat,
    ) -> Result<Self, std::io::Error> {
        let stream = tokio::net::TcpStream::connect((address, port)).await?;
        let reader = tokio::io::BufReader::new(stream);
        let config = SourceConfig::new(frequency, sample_rate, chunk_size, format);
        Ok(Self { config, reader })
    }
}

impl<R: AsyncBufRead + Unpin + Send + 'static> Stream for IqByteAsyncRead<R> {
    type Item = Result<Vec<u8>, std::io::Error>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        let bytes_per_sample = this.config.format.bytes_per_sample();
        let mut buffer = vec![0u8; this.config.chunk_size * bytes_per_sample];
        let mut total_read = 0;

        while total_read < buffer.len() {
            let mut read_buf = tokio::io::ReadBuf::new(&mut buffer[total_read..]);
            match Pin::new(&mut this.reader).poll_read(cx, &mut read_buf) {
                Poll::Ready(Ok(())) => {
                    let filled = read_buf.filled().len();
                    if filled == 0 {
                        break;
                    }
                    total_read += filled;
                }
                Poll::Ready(Err(e)) => {
                    if e.kind() == std::io::ErrorKind::UnexpectedEof && total_read > 0 {
                        break;
                    } else if e.kind() == std::io::ErrorKind::UnexpectedEof {
                        return Poll::Ready(None);
                    } else {
                        return Poll::Ready(Some(Err(e)));
                    }
                }
                Poll::Pending => return Poll::Pending,
            }
        }

        if total_read == 0 {
            Poll::Ready(None)
        } else {
            // drop a trailing partial sample
            buffer.truncate(total_read - total_read % bytes_per_sample);
            Poll::Ready(Some(Ok(buffer)))
        }
    }
}

impl SampleFormat {
    /// Number of raw bytes per complex sample in this format.
    pub fn bytes_per_sample(self) -> usize {
        match self {
            SampleFormat::Signed8 | SampleFormat::Unsigned8 => 2,
            SampleFormat::Signed16 | SampleFormat::Unsigned16 => 4,
        }
    }
}

fn expanduser(path: PathBuf) -> PathBuf {
    // Check if the path starts with "~"
    if let Some(stripped) = path.to_str().and_then(|p| p.strip_prefix("~")) {
        if let Some(home_dir) = dirs::home_dir() {
            // Join the home directory with the rest of the path
            return home_dir.join(stripped.trim_start_matches('/'));
        }
    }
    path
}
