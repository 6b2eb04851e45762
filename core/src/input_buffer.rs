//! Incremental UTF-8 decoding of the segmenter's input stream.
//!
//! The scan buffer works on `char` units, while callers hand the segmenter any
//! `std::io::Read`. `InputBuffer` sits between the two: it pulls bytes on
//! demand, keeps multi-byte sequences that were split across reads, and hands
//! out whole characters.

use crate::error::{Result, SegmentError};
use std::io::{ErrorKind, Read};

const READ_CHUNK: usize = 4096;

/// Byte reader that yields decoded characters.
#[derive(Debug)]
pub struct InputBuffer<R> {
    reader: R,
    /// Bytes read but not yet decoded; may end in a partial sequence.
    pending: Vec<u8>,
    /// Stream offset of `pending[0]`.
    decoded_bytes: u64,
    eof: bool,
}

impl<R: Read> InputBuffer<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            pending: Vec::new(),
            decoded_bytes: 0,
            eof: false,
        }
    }

    /// Whether the underlying reader reported end of stream and every byte
    /// has been decoded.
    pub fn is_exhausted(&self) -> bool {
        self.eof && self.pending.is_empty()
    }

    /// Fill `out` with up to `out.len()` characters.
    ///
    /// Short counts only happen at end of stream; `Ok(0)` means the stream is
    /// exhausted.
    pub fn read_chars(&mut self, out: &mut [char]) -> Result<usize> {
        let mut filled = 0;
        loop {
            filled += self.decode_into(&mut out[filled..])?;
            if filled == out.len() || self.eof {
                break;
            }
            self.pull()?;
        }
        if self.eof && filled < out.len() && !self.pending.is_empty() {
            // the stream ended inside a multi-byte sequence
            return Err(SegmentError::Decode {
                offset: self.decoded_bytes,
            });
        }
        Ok(filled)
    }

    fn pull(&mut self) -> Result<()> {
        let mut chunk = [0u8; READ_CHUNK];
        let read = loop {
            match self.reader.read(&mut chunk) {
                Ok(n) => break n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        };
        if read == 0 {
            self.eof = true;
        } else {
            self.pending.extend_from_slice(&chunk[..read]);
        }
        Ok(())
    }

    fn decode_into(&mut self, out: &mut [char]) -> Result<usize> {
        if out.is_empty() || self.pending.is_empty() {
            return Ok(0);
        }
        let valid = match std::str::from_utf8(&self.pending) {
            Ok(text) => text.len(),
            Err(e) if e.valid_up_to() == 0 && e.error_len().is_some() => {
                return Err(SegmentError::Decode {
                    offset: self.decoded_bytes,
                });
            }
            Err(e) => e.valid_up_to(),
        };
        let text = match std::str::from_utf8(&self.pending[..valid]) {
            Ok(text) => text,
            Err(_) => return Ok(0),
        };

        let mut count = 0;
        let mut used = 0;
        for (slot, ch) in out.iter_mut().zip(text.chars()) {
            *slot = ch;
            count += 1;
            used += ch.len_utf8();
        }
        self.pending.drain(..used);
        self.decoded_bytes += used as u64;
        Ok(count)
    }
}
