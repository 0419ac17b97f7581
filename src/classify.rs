//! Separator and segment tag classification.
//!
//! - [`is_separator_char`] and [`escape_line`] protect free text embedded in a segment
//! - [`classify_segment_tag`] recognizes envelope segments by their leading tag

use crate::{Error, Result, Separators};

/// Envelope and control segment tags known to the writer.
///
/// Anything else classifies as [`SegmentTag::Regular`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SegmentTag {
    /// X12 interchange control header
    Isa,
    /// X12 interchange control trailer
    Iea,
    /// X12 functional group header
    Gs,
    /// X12 functional group trailer
    Ge,
    /// X12 transaction set header
    St,
    /// X12 transaction set trailer
    Se,
    /// EDIFACT service string advice
    Una,
    /// EDIFACT interchange header
    Unb,
    /// EDIFACT interchange trailer
    Unz,
    /// EDIFACT functional group header
    Ung,
    /// EDIFACT functional group trailer
    Une,
    /// EDIFACT message header
    Unh,
    /// EDIFACT message trailer
    Unt,
    /// Any data segment
    Regular,
}

impl SegmentTag {
    /// Returns the tag text as it appears at the start of a segment.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            SegmentTag::Isa => "ISA",
            SegmentTag::Iea => "IEA",
            SegmentTag::Gs => "GS",
            SegmentTag::Ge => "GE",
            SegmentTag::St => "ST",
            SegmentTag::Se => "SE",
            SegmentTag::Una => "UNA",
            SegmentTag::Unb => "UNB",
            SegmentTag::Unz => "UNZ",
            SegmentTag::Ung => "UNG",
            SegmentTag::Une => "UNE",
            SegmentTag::Unh => "UNH",
            SegmentTag::Unt => "UNT",
            SegmentTag::Regular => "",
        }
    }

    /// Returns `true` for segments that close a message, group or interchange.
    #[must_use]
    pub const fn is_trailer(&self) -> bool {
        matches!(
            self,
            SegmentTag::Iea
                | SegmentTag::Ge
                | SegmentTag::Se
                | SegmentTag::Unz
                | SegmentTag::Une
                | SegmentTag::Unt
        )
    }
}

/// Returns `true` if `ch` occurs in any of the five configured separators.
///
/// # Examples
///
/// ```rust
/// use edi_text::{is_separator_char, Separators};
///
/// let seps = Separators::edifact();
/// assert!(is_separator_char('+', &seps));
/// assert!(is_separator_char('?', &seps));
/// assert!(!is_separator_char('A', &seps));
/// ```
#[must_use]
pub fn is_separator_char(ch: char, separators: &Separators) -> bool {
    separators.iter().any(|separator| separator.contains(ch))
}

/// Prefixes every separator character in `text` with the escape marker.
///
/// Without an escape marker the text is returned unchanged.
///
/// # Examples
///
/// ```rust
/// use edi_text::{escape_line, Separators};
///
/// let seps = Separators::edifact();
/// assert_eq!(escape_line("O'Brien + Sons?", &seps), "O?'Brien ?+ Sons??");
/// ```
#[must_use]
pub fn escape_line(text: &str, separators: &Separators) -> String {
    if !separators.has_escape() {
        return text.to_string();
    }

    let mut output = String::with_capacity(text.len() + 8);
    for ch in text.chars() {
        if is_separator_char(ch, separators) {
            output.push_str(&separators.escape);
        }
        output.push(ch);
    }
    output
}

/// Classifies a segment by its first three characters, case-insensitively.
///
/// Two-letter X12 tags (`GS`, `GE`, `ST`, `SE`) match when the third character is
/// not alphanumeric, which is the element separator in well-formed text.
///
/// # Examples
///
/// ```rust
/// use edi_text::{classify_segment_tag, SegmentTag};
///
/// assert_eq!(classify_segment_tag("unt+4+1").unwrap(), SegmentTag::Unt);
/// assert_eq!(classify_segment_tag("SE*4*0001").unwrap(), SegmentTag::Se);
/// assert_eq!(classify_segment_tag("BGM+220").unwrap(), SegmentTag::Regular);
/// ```
///
/// # Errors
///
/// Returns [`Error::SegmentTooShort`] if `segment` has fewer than three characters.
pub fn classify_segment_tag(segment: &str) -> Result<SegmentTag> {
    let head: Vec<char> = segment.chars().take(3).collect();
    if head.len() < 3 {
        return Err(Error::segment_too_short(segment));
    }
    let tag = match upper(&head).as_str() {
        "ISA" => SegmentTag::Isa,
        "IEA" => SegmentTag::Iea,
        "UNA" => SegmentTag::Una,
        "UNB" => SegmentTag::Unb,
        "UNZ" => SegmentTag::Unz,
        "UNG" => SegmentTag::Ung,
        "UNE" => SegmentTag::Une,
        "UNH" => SegmentTag::Unh,
        "UNT" => SegmentTag::Unt,
        _ if !head[2].is_alphanumeric() => match upper(&head[..2]).as_str() {
            "GS" => SegmentTag::Gs,
            "GE" => SegmentTag::Ge,
            "ST" => SegmentTag::St,
            "SE" => SegmentTag::Se,
            _ => SegmentTag::Regular,
        },
        _ => SegmentTag::Regular,
    };
    Ok(tag)
}

fn upper(chars: &[char]) -> String {
    chars.iter().flat_map(|ch| ch.to_uppercase()).collect()
}
