//! Streaming segment reader.
//!
//! [`SegmentReader`] pulls one segment at a time out of any [`BufRead`] source. A
//! segment ends at the first unescaped segment terminator; blank segments and the
//! line breaks many senders put between segments are skipped.
//!
//! ## Examples
//!
//! ```rust
//! use edi_text::{SegmentReader, Separators};
//!
//! let text = "UNH+1+ORDERS:D:96A:UN'\r\nFTX+AAI+++Ship?'s note'\r\nUNT+3+1'";
//! let mut reader = SegmentReader::new(text.as_bytes(), Separators::edifact());
//!
//! assert_eq!(reader.read_segment().unwrap(), "UNH+1+ORDERS:D:96A:UN");
//! assert_eq!(reader.read_segment().unwrap(), "FTX+AAI+++Ship?'s note");
//! assert_eq!(reader.read_segment().unwrap(), "UNT+3+1");
//! assert_eq!(reader.read_segment().unwrap(), "");
//! ```

use std::io::{BufRead, Read};

use crate::{Error, Result, Separators};

/// Reads segments from a character stream.
///
/// The reader owns the stream until [`SegmentReader::into_inner`] hands it back;
/// dropping the reader drops the stream. Reads block on the underlying source.
///
/// Also usable as an [`Iterator`] yielding `Result<String>` until the stream is
/// exhausted or a read fails.
pub struct SegmentReader<R> {
    inner: R,
    separators: Separators,
    /// Number of non-blank segments returned so far.
    segments_read: usize,
    /// Set after end of stream or an error.
    finished: bool,
}

impl<R: BufRead> SegmentReader<R> {
    /// Creates a reader over `inner` using `separators`.
    pub fn new(inner: R, separators: Separators) -> Self {
        Self {
            inner,
            separators,
            segments_read: 0,
            finished: false,
        }
    }

    /// Returns the number of segments read.
    #[must_use]
    pub fn segments_read(&self) -> usize {
        self.segments_read
    }

    /// Returns the separators in use.
    #[must_use]
    pub fn separators(&self) -> &Separators {
        &self.separators
    }

    /// Gets a reference to the underlying stream.
    #[must_use]
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Unwraps the reader, returning the underlying stream.
    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Reads the next non-blank segment without its terminator.
    ///
    /// Returns an empty string once the stream holds no further content.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the segment terminator is empty, and
    /// [`Error::Io`] if the stream fails or is not valid UTF-8.
    pub fn read_segment(&mut self) -> Result<String> {
        let terminator = self.separators.segment_terminator.clone();
        if terminator.is_empty() {
            return Err(Error::invalid_argument("segment terminator must not be empty"));
        }

        let mut buffer = String::new();
        while let Some(ch) = self.next_char()? {
            buffer.push(ch);
            if !buffer.ends_with(terminator.as_str()) {
                continue;
            }

            let body_len = buffer.len() - terminator.len();
            if self.is_escaped(&buffer[..body_len]) {
                continue;
            }

            let segment = trim_line_breaks(&buffer[..body_len]);
            if segment.is_empty() {
                buffer.clear();
                continue;
            }

            let segment = segment.to_string();
            self.segments_read += 1;
            tracing::trace!(segments_read = self.segments_read, len = segment.len(), "read segment");
            return Ok(segment);
        }

        let rest = trim_line_breaks(&buffer);
        if rest.trim().is_empty() {
            tracing::debug!(segments_read = self.segments_read, "end of segment stream");
            return Ok(String::new());
        }
        self.segments_read += 1;
        Ok(rest.to_string())
    }

    // A terminator is escaped by an odd run of escape markers in front of it; an even
    // run is a sequence of literal escape markers.
    fn is_escaped(&self, body: &str) -> bool {
        let escape = self.separators.escape.as_str();
        if escape.is_empty() {
            return false;
        }

        let mut run = 0;
        let mut rest = body;
        while let Some(stripped) = rest.strip_suffix(escape) {
            run += 1;
            rest = stripped;
        }
        run % 2 == 1
    }

    fn next_char(&mut self) -> Result<Option<char>> {
        let first = {
            let available = self.inner.fill_buf()?;
            match available.first() {
                Some(byte) => *byte,
                None => return Ok(None),
            }
        };
        self.inner.consume(1);

        let width = utf8_width(first)
            .ok_or_else(|| Error::io("stream did not contain valid UTF-8"))?;
        let mut bytes = [first, 0, 0, 0];
        if width > 1 {
            self.inner.read_exact(&mut bytes[1..width])?;
        }

        std::str::from_utf8(&bytes[..width])
            .ok()
            .and_then(|s| s.chars().next())
            .map(Some)
            .ok_or_else(|| Error::io("stream did not contain valid UTF-8"))
    }
}

impl<R: BufRead> Iterator for SegmentReader<R> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.read_segment() {
            Ok(segment) if segment.is_empty() => {
                self.finished = true;
                None
            }
            Ok(segment) => Some(Ok(segment)),
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

/// Splits a complete text blob into its segments.
///
/// # Examples
///
/// ```rust
/// use edi_text::{read_segments, Separators};
///
/// let segments = read_segments("ST*850*0001~BEG*00*SA*PO1~~SE*3*0001~", &Separators::x12()).unwrap();
/// assert_eq!(segments, vec!["ST*850*0001", "BEG*00*SA*PO1", "SE*3*0001"]);
/// ```
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] if the segment terminator is empty.
pub fn read_segments(text: &str, separators: &Separators) -> Result<Vec<String>> {
    SegmentReader::new(text.as_bytes(), separators.clone()).collect()
}

fn trim_line_breaks(text: &str) -> &str {
    text.trim_matches(|ch| ch == '\r' || ch == '\n')
}

fn utf8_width(first: u8) -> Option<usize> {
    match first {
        0x00..=0x7F => Some(1),
        0xC2..=0xDF => Some(2),
        0xE0..=0xEF => Some(3),
        0xF0..=0xF4 => Some(4),
        _ => None,
    }
}
