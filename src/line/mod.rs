//! Byte-stream line framing.
//!
//! [`LineCodec`] carves CR/LF-terminated lines out of a growing receive
//! buffer and decodes them with the configured text encoding. Bytes after
//! the last terminator stay buffered until the next read completes them.
//! [`LineFramer`] pairs the codec with its own buffer for callers that
//! drive reads themselves.

#[cfg(feature = "tokio")]
mod codec;

use bytes::BytesMut;
use encoding::Encoding;
use tracing::trace;

use crate::error::LineError;

/// Longest line accepted before the rest of it is discarded.
pub const MAX_LINE_LEN: usize = 8191;

/// How much of an over-long line is kept for the parse-error report.
const REPORTED_HEAD_LEN: usize = 64;

/// Line splitter and text decoder shared by the read and write paths.
#[derive(Clone, Debug)]
pub struct LineCodec {
    encoding: &'static Encoding,
    max_line_len: usize,
    /// Bytes already searched for a terminator.
    scanned: usize,
    /// Dropping bytes until the end of an over-long line.
    discarding: bool,
}

impl LineCodec {
    pub fn new(encoding: &'static Encoding) -> Self {
        Self::with_max_line_len(encoding, MAX_LINE_LEN)
    }

    pub fn with_max_line_len(encoding: &'static Encoding, max_line_len: usize) -> Self {
        Self {
            encoding,
            max_line_len,
            scanned: 0,
            discarding: false,
        }
    }

    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    /// Take the next complete line out of `buf`.
    ///
    /// Returns `None` when `buf` holds no terminator yet. Empty lines are
    /// skipped. A line longer than the limit is reported once and the rest
    /// of it is dropped.
    pub fn decode_line(&mut self, buf: &mut BytesMut) -> Option<Result<String, LineError>> {
        loop {
            let start = self.scanned.min(buf.len());
            let Some(offset) = buf[start..].iter().position(|&b| b == b'\n') else {
                if buf.len() > self.max_line_len {
                    let head = (!self.discarding).then(|| self.head(&buf[..]));
                    buf.clear();
                    self.scanned = 0;
                    if let Some(head) = head {
                        self.discarding = true;
                        return Some(Err(LineError::TooLong {
                            limit: self.max_line_len,
                            head,
                        }));
                    }
                    return None;
                }
                self.scanned = buf.len();
                return None;
            };

            let end = start + offset;
            let line = buf.split_to(end + 1);
            self.scanned = 0;

            if self.discarding {
                trace!(bytes = line.len(), "dropped tail of over-long line");
                self.discarding = false;
                continue;
            }
            if end > self.max_line_len {
                return Some(Err(LineError::TooLong {
                    limit: self.max_line_len,
                    head: self.head(&line[..end]),
                }));
            }

            let mut body = &line[..end];
            while let Some((&last, rest)) = body.split_last() {
                if last != b'\r' && last != b'\n' {
                    break;
                }
                body = rest;
            }
            if body.is_empty() {
                continue;
            }

            let (text, _) = self.encoding.decode_without_bom_handling(body);
            return Some(Ok(text.into_owned()));
        }
    }

    /// The first bytes of a discarded line, decoded lossily for reporting.
    fn head(&self, bytes: &[u8]) -> String {
        let bytes = &bytes[..bytes.len().min(REPORTED_HEAD_LEN)];
        let (text, _) = self.encoding.decode_without_bom_handling(bytes);
        text.into_owned()
    }

    /// Append `line` and a CR/LF terminator to `dst`.
    pub fn encode_line(&self, line: &str, dst: &mut BytesMut) {
        let (bytes, _, _) = self.encoding.encode(line);
        dst.reserve(bytes.len() + 2);
        dst.extend_from_slice(&bytes);
        dst.extend_from_slice(b"\r\n");
    }
}

/// A [`LineCodec`] with its own receive buffer.
#[derive(Debug)]
pub struct LineFramer {
    codec: LineCodec,
    buffer: BytesMut,
}

impl LineFramer {
    pub fn new(encoding: &'static Encoding) -> Self {
        Self::with_codec(LineCodec::new(encoding))
    }

    pub fn with_codec(codec: LineCodec) -> Self {
        Self {
            codec,
            buffer: BytesMut::with_capacity(1024),
        }
    }

    /// Append freshly read bytes.
    pub fn extend(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Next complete line, if any.
    pub fn next_line(&mut self) -> Option<Result<String, LineError>> {
        self.codec.decode_line(&mut self.buffer)
    }

    /// Bytes waiting for a terminator.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }
}
