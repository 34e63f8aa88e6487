//! `tokio_util` codec glue for [`LineCodec`].

use std::io;

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};
use tracing::trace;

use super::LineCodec;
use crate::error::LineError;

impl Decoder for LineCodec {
    /// Per-line failures are yielded as items so the stream keeps going.
    type Item = Result<String, LineError>;
    type Error = io::Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        Ok(self.decode_line(src))
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let line = self.decode_line(src);
        if line.is_none() && !src.is_empty() {
            trace!(bytes = src.len(), "discarding unterminated line at eof");
            src.clear();
            self.scanned = 0;
        }
        Ok(line)
    }
}

impl Encoder<String> for LineCodec {
    type Error = io::Error;

    fn encode(&mut self, line: String, dst: &mut BytesMut) -> Result<(), Self::Error> {
        self.encode_line(&line, dst);
        Ok(())
    }
}
