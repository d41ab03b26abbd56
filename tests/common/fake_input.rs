//! Fake input streams for driving the pipeline without a real stdin.
//!
//! [`fake_input`] returns a writer/reader pair backed by an in-memory duplex
//! pipe, so a test can feed lines one at a time while the pipeline is already
//! running. [`FailingReader`] yields some bytes and then an I/O error.

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::io::{AsyncRead, AsyncWriteExt, DuplexStream, ReadBuf};

/// A handle for pushing log lines into a fake input stream.
pub struct FakeInputWriter {
    stream: DuplexStream,
}

impl FakeInputWriter {
    /// Send a log line. Adds a trailing newline if not already present.
    pub async fn send_line(&mut self, line: &str) {
        self.stream.write_all(line.as_bytes()).await.unwrap();
        if !line.ends_with('\n') {
            self.stream.write_all(b"\n").await.unwrap();
        }
    }

    /// Send bytes verbatim; no newline is added.
    pub async fn send_raw(&mut self, bytes: &[u8]) {
        self.stream.write_all(bytes).await.unwrap();
    }

    /// Close the stream, causing the reader to see EOF.
    pub fn close(self) {
        // The stream is dropped, which closes the pipe.
    }
}

/// Create a linked writer/reader pair.
///
/// ```rust
/// let (mut writer, reader) = fake_input();
/// let mut running = Pipeline::new(Vec::new()).spawn(reader);
/// writer.send_line(LINE_REDIRECT).await;
/// writer.close();
/// ```
pub fn fake_input() -> (FakeInputWriter, DuplexStream) {
    let (writer, reader) = tokio::io::duplex(4096);
    (FakeInputWriter { stream: writer }, reader)
}

/// Yields `data`, then fails every further read.
pub struct FailingReader {
    data: Vec<u8>,
    pos: usize,
}

impl FailingReader {
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: data.into(),
            pos: 0,
        }
    }
}

impl AsyncRead for FailingReader {
    fn poll_read(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let start = self.pos;
        if start < self.data.len() {
            let n = buf.remaining().min(self.data.len() - start);
            buf.put_slice(&self.data[start..start + n]);
            self.pos += n;
            Poll::Ready(Ok(()))
        } else {
            Poll::Ready(Err(io::Error::new(io::ErrorKind::Other, "device unplugged")))
        }
    }
}
