//! # edi_text
//!
//! Escape-aware tokenizing and envelope writing for segment-delimited EDI text
//! (UN/EDIFACT and ANSI X12).
//!
//! ## What is in the box?
//!
//! - **Tokenizer**: splits interchanges, segments and elements while honoring the
//!   escape marker (`?+` is a literal `+` in EDIFACT)
//! - **Segment Reader**: pulls one segment at a time out of any `BufRead`
//! - **Containers**: header / items / trailer envelopes whose trailer counts are kept
//!   in sync on every append
//! - **Trailer Synthesis**: message `SE` / `UNT` segments are rebuilt with the correct
//!   segment count and zero-padded control number when written
//!
//! ## Quick Start
//!
//! ### Reading
//!
//! ```rust
//! use edi_text::{read_segments, split, EmptyHandling, Separators};
//!
//! let seps = Separators::edifact();
//! let segments = read_segments("UNB+UNOC?+3+SENDER'UNZ+0+1'", &seps).unwrap();
//! assert_eq!(segments, vec!["UNB+UNOC?+3+SENDER", "UNZ+0+1"]);
//!
//! let elements = split(&segments[0], &seps.escape, &seps.data_element, EmptyHandling::Keep, true).unwrap();
//! assert_eq!(elements[1..], ["UNOC+3", "SENDER"]);
//! ```
//!
//! ### Writing
//!
//! ```rust
//! use edi_text::{segment, Container, Message, MessageFamily, SegmentNode, Separators};
//!
//! let mut group = Container::new(
//!     Some(segment!("GS", "PO", "SENDER", "RECEIVER", "20230101", "1200", "7", "X", "005010")),
//!     |gs: &SegmentNode, count| segment!("GE", count, gs.value(5).unwrap_or_default()),
//!     Separators::x12(),
//! );
//! group.add_item(
//!     Message::new(MessageFamily::X12)
//!         .with_segment(segment!("ST", "850", "0001"))
//!         .with_segment(segment!("BEG", "00", "SA", "PO-1")),
//! );
//!
//! let text = group.generate_text(None).unwrap().concat();
//! assert_eq!(
//!     text,
//!     "GS*PO*SENDER*RECEIVER*20230101*1200*7*X*005010~ST*850*0001~BEG*00*SA*PO-1~SE*3*0001~GE*1*7~"
//! );
//! ```
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events (`trace` per segment read and trailer written,
//! `debug` per container update). Install any subscriber to see them.
//!
//! ## Safety Guarantees
//!
//! - No `unsafe` code blocks
//! - Tag classification is bounds-checked and reports short segments as errors
//! - Proper error propagation with `Result` types

pub mod classify;
pub mod container;
pub mod error;
pub mod macros;
pub mod reader;
pub mod segment;
pub mod separators;
pub mod tokenizer;

pub use classify::{classify_segment_tag, escape_line, is_separator_char, SegmentTag};
pub use container::{
    control_number_width, pad_control_number, to_text, Container, ContainerBuilder,
};
pub use error::{Error, Result};
pub use reader::{read_segments, SegmentReader};
pub use segment::{
    extract_control_number, Element, Message, MessageFamily, SegmentNode, SegmentTree,
};
pub use separators::Separators;
pub use tokenizer::{
    join_escaped, split, split_components, split_elements, split_repetitions, unescape,
    EmptyHandling,
};

/// Parses a complete interchange text into segment nodes.
///
/// # Examples
///
/// ```rust
/// use edi_text::{parse_str, Separators};
///
/// let nodes = parse_str("ST*850*0001~BEG*00*SA*PO-1~SE*3*0001~", &Separators::x12()).unwrap();
/// assert_eq!(nodes.len(), 3);
/// assert_eq!(nodes[1].value(2), Some("PO-1"));
/// ```
///
/// # Errors
///
/// Returns an error if the separators are unusable or a segment has no tag.
pub fn parse_str(text: &str, separators: &Separators) -> Result<Vec<SegmentNode>> {
    read_segments(text, separators)?
        .iter()
        .map(|segment| SegmentNode::parse(segment, separators))
        .collect()
}

/// Parses interchange text read from `reader` into segment nodes.
///
/// # Errors
///
/// Returns [`Error::Io`] if reading fails, otherwise as [`parse_str`].
pub fn from_reader<R>(reader: R, separators: &Separators) -> Result<Vec<SegmentNode>>
where
    R: std::io::BufRead,
{
    SegmentReader::new(reader, separators.clone())
        .map(|segment| SegmentNode::parse(&segment?, separators))
        .collect()
}

/// Renders segment nodes and joins them into one interchange string.
///
/// # Examples
///
/// ```rust
/// use edi_text::{segment, to_string, Separators};
///
/// let text = to_string(&[segment!("UNH", "1"), segment!("UNT", 2, 1)], &Separators::edifact());
/// assert_eq!(text, "UNH+1'UNT+2+1'");
/// ```
#[must_use]
pub fn to_string(nodes: &[SegmentNode], separators: &Separators) -> String {
    nodes.iter().map(|node| node.render(separators)).collect()
}
