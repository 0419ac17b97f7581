//! Segment nodes and the tree-builder boundary.
//!
//! A typed business document reaches the writer as an ordered list of
//! [`SegmentNode`]s. Whatever produces that list (a schema-driven builder, a
//! hand-written mapping, or the [`Message`] type in this module) implements
//! [`SegmentTree`].
//!
//! ## Examples
//!
//! ```rust
//! use edi_text::{segment, Separators};
//!
//! let unh = segment!("UNH", "1", ["ORDERS", "D", "96A", "UN"]);
//! assert_eq!(unh.render(&Separators::edifact()), "UNH+1+ORDERS:D:96A:UN'");
//! ```

use serde::{Deserialize, Serialize};

use crate::classify::{escape_line, SegmentTag};
use crate::tokenizer::{split_components, split_elements, split_repetitions, unescape};
use crate::{Error, Result, Separators};

/// Message syntax family, which decides the header and trailer tags of a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageFamily {
    /// ANSI X12 transaction sets (`ST` / `SE`)
    X12,
    /// UN/EDIFACT messages (`UNH` / `UNT`)
    Edifact,
}

impl MessageFamily {
    /// Tag of the segment that opens a message.
    #[must_use]
    pub const fn header_tag(&self) -> &'static str {
        match self {
            MessageFamily::X12 => "ST",
            MessageFamily::Edifact => "UNH",
        }
    }

    /// Tag of the segment that closes a message.
    #[must_use]
    pub const fn trailer_tag(&self) -> &'static str {
        self.trailer_segment_tag().as_str()
    }

    /// Classification of the segment that closes a message.
    #[must_use]
    pub const fn trailer_segment_tag(&self) -> SegmentTag {
        match self {
            MessageFamily::X12 => SegmentTag::Se,
            MessageFamily::Edifact => SegmentTag::Unt,
        }
    }

    /// Position of the control number among the header's data elements.
    ///
    /// `ST*850*0001` carries it second, `UNH+1+ORDERS:...` first.
    #[must_use]
    pub const fn control_number_position(&self) -> usize {
        match self {
            MessageFamily::X12 => 2,
            MessageFamily::Edifact => 1,
        }
    }
}

/// One data element: a list of repetitions, each a list of components.
///
/// A simple element is one repetition with one component.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Element {
    pub repetitions: Vec<Vec<String>>,
}

impl Element {
    /// Creates a simple element holding `value`.
    pub fn simple(value: impl Into<String>) -> Self {
        Element {
            repetitions: vec![vec![value.into()]],
        }
    }

    /// Creates a composite element from its components.
    pub fn composite(components: Vec<String>) -> Self {
        Element {
            repetitions: vec![components],
        }
    }

    /// Returns the first component of the first repetition, or `""`.
    #[must_use]
    pub fn value(&self) -> &str {
        self.components()
            .first()
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// Returns the components of the first repetition.
    #[must_use]
    pub fn components(&self) -> &[String] {
        self.repetitions.first().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns `true` if every component is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.repetitions.iter().flatten().all(String::is_empty)
    }

    fn render(&self, separators: &Separators) -> String {
        self.repetitions
            .iter()
            .map(|components| {
                let mut escaped: Vec<String> = components
                    .iter()
                    .map(|component| escape_line(component, separators))
                    .collect();
                while escaped.last().is_some_and(String::is_empty) {
                    escaped.pop();
                }
                escaped.join(&separators.component_element)
            })
            .collect::<Vec<_>>()
            .join(&separators.repetition)
    }
}

/// A segment-level leaf node: a tag followed by data elements.
///
/// Element content is stored unescaped; [`SegmentNode::render`] escapes it for the
/// target separators.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SegmentNode {
    pub tag: String,
    pub elements: Vec<Element>,
}

impl SegmentNode {
    /// Creates a segment with no elements.
    pub fn new(tag: impl Into<String>) -> Self {
        SegmentNode {
            tag: tag.into(),
            elements: Vec::new(),
        }
    }

    /// Appends a simple element.
    #[must_use]
    pub fn with_element(mut self, value: impl Into<String>) -> Self {
        self.elements.push(Element::simple(value));
        self
    }

    /// Appends a composite element.
    #[must_use]
    pub fn with_composite(mut self, components: Vec<String>) -> Self {
        self.elements.push(Element::composite(components));
        self
    }

    /// Appends an element.
    pub fn push_element(&mut self, element: Element) {
        self.elements.push(element);
    }

    /// Returns the value of the element at `index` (zero-based, tag excluded).
    #[must_use]
    pub fn value(&self, index: usize) -> Option<&str> {
        self.elements.get(index).map(Element::value)
    }

    /// Renders the segment as one line, terminator included.
    ///
    /// Trailing empty elements and components are dropped.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use edi_text::{SegmentNode, Separators};
    ///
    /// let ftx = SegmentNode::new("FTX")
    ///     .with_element("AAI")
    ///     .with_element("")
    ///     .with_element("")
    ///     .with_element("Deliver 10+ units")
    ///     .with_element("");
    /// assert_eq!(ftx.render(&Separators::edifact()), "FTX+AAI+++Deliver 10?+ units'");
    /// ```
    #[must_use]
    pub fn render(&self, separators: &Separators) -> String {
        if self.tag.eq_ignore_ascii_case("UNA") {
            return self.render_service_advice(separators);
        }

        let mut elements: Vec<String> = if self.tag.eq_ignore_ascii_case("ISA") {
            self.elements.iter().map(|e| e.value().to_string()).collect()
        } else {
            self.elements.iter().map(|e| e.render(separators)).collect()
        };
        while elements.last().is_some_and(String::is_empty) {
            elements.pop();
        }

        let mut line = self.tag.clone();
        for element in &elements {
            line.push_str(&separators.data_element);
            line.push_str(element);
        }
        line.push_str(&separators.segment_terminator);
        line
    }

    // The advice declares the separators it is written with. Only the decimal mark
    // comes from the stored advice.
    fn render_service_advice(&self, separators: &Separators) -> String {
        let decimal_mark = self
            .value(0)
            .and_then(|advice| advice.chars().nth(2))
            .unwrap_or('.');
        let or_space = |value: &str| {
            if value.is_empty() {
                " ".to_string()
            } else {
                value.to_string()
            }
        };

        format!(
            "UNA{}{}{}{}{}{}",
            separators.component_element,
            separators.data_element,
            decimal_mark,
            or_space(&separators.escape),
            or_space(&separators.repetition),
            separators.segment_terminator
        )
    }

    /// Parses one segment of text into a node.
    ///
    /// A trailing segment terminator is ignored. `ISA` elements are kept whole since
    /// they declare the component and repetition separators themselves, and a `UNA`
    /// advice keeps its five service characters as a single element.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use edi_text::{SegmentNode, Separators};
    ///
    /// let node = SegmentNode::parse("UNB+UNOC:3+SENDER?+1+RECEIVER'", &Separators::edifact()).unwrap();
    /// assert_eq!(node.tag, "UNB");
    /// assert_eq!(node.elements[0].components(), ["UNOC", "3"]);
    /// assert_eq!(node.value(1), Some("SENDER+1"));
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the segment has no tag or the data
    /// element separator is empty.
    pub fn parse(text: &str, separators: &Separators) -> Result<Self> {
        let line = text.trim_matches(|ch| ch == '\r' || ch == '\n');
        if line
            .get(..3)
            .is_some_and(|head| head.eq_ignore_ascii_case("UNA"))
        {
            let advice: String = line[3..].chars().take(5).collect();
            return Ok(SegmentNode::new("UNA").with_element(advice));
        }

        let body = strip_terminator(line, separators).trim();

        let mut parts = split_elements(body, separators)?.into_iter();
        let tag = parts.next().unwrap_or_default();
        if tag.is_empty() {
            return Err(Error::invalid_argument("segment has no tag"));
        }

        let elements = if tag.eq_ignore_ascii_case("ISA") {
            parts.map(Element::simple).collect()
        } else {
            parts
                .map(|raw| parse_element(&raw, separators))
                .collect::<Result<Vec<_>>>()?
        };

        Ok(SegmentNode { tag, elements })
    }
}

fn strip_terminator<'a>(text: &'a str, separators: &Separators) -> &'a str {
    let terminator = separators.segment_terminator.as_str();
    if terminator.is_empty() {
        return text;
    }
    let trimmed = text.trim_end_matches(|ch| ch == '\r' || ch == '\n');
    let Some(body) = trimmed.strip_suffix(terminator) else {
        return text;
    };
    // An odd run of escape markers makes the terminator part of the content.
    let escape = separators.escape.as_str();
    if !escape.is_empty() {
        let run = body.len() - body.trim_end_matches(escape).len();
        if (run / escape.len()) % 2 == 1 {
            return text;
        }
    }
    body
}

fn parse_element(raw: &str, separators: &Separators) -> Result<Element> {
    let repetitions = if separators.repetition.is_empty() {
        vec![raw.to_string()]
    } else {
        split_repetitions(raw, separators)?
    };

    let repetitions = repetitions
        .iter()
        .map(|repetition| {
            let components = if separators.component_element.is_empty() {
                vec![repetition.clone()]
            } else {
                split_components(repetition, separators)?
            };
            Ok(components
                .iter()
                .map(|component| unescape(component, separators))
                .collect())
        })
        .collect::<Result<Vec<Vec<String>>>>()?;

    Ok(Element { repetitions })
}

/// A value that renders to an ordered list of segments.
///
/// This is the seam to the tree builder: implementors turn a domain value into
/// segment nodes, and the [`Container`](crate::Container) takes care of envelopes
/// and trailers.
pub trait SegmentTree {
    /// Returns the segment nodes of this value in document order.
    ///
    /// # Errors
    ///
    /// Implementations report mapping failures, usually as [`Error::Custom`].
    fn segment_nodes(&self) -> Result<Vec<SegmentNode>>;

    /// Returns the message family if this value is a single message.
    ///
    /// Messages get their trailer synthesized when written; envelopes and plain
    /// segment lists return `None`.
    fn message_family(&self) -> Option<MessageFamily> {
        None
    }

    /// Renders every segment node to one line of text.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`SegmentTree::segment_nodes`].
    fn render(&self, separators: &Separators) -> Result<Vec<String>> {
        Ok(self
            .segment_nodes()?
            .iter()
            .map(|node| node.render(separators))
            .collect())
    }

    /// Extracts the control number echoed by the message trailer.
    ///
    /// The default reads it from the message header among `rendered`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the separators cannot split a segment.
    fn control_number(&self, rendered: &[String], separators: &Separators) -> Result<String> {
        match self.message_family() {
            Some(family) => extract_control_number(rendered, separators, family),
            None => Ok(String::new()),
        }
    }
}

/// Finds the message header of `family` in `rendered` and returns its control number.
///
/// Returns an empty string if no header is present.
///
/// # Examples
///
/// ```rust
/// use edi_text::{extract_control_number, MessageFamily, Separators};
///
/// let rendered = vec!["ST*850*0042~".to_string(), "BEG*00~".to_string()];
/// let number = extract_control_number(&rendered, &Separators::x12(), MessageFamily::X12).unwrap();
/// assert_eq!(number, "0042");
/// ```
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] if the data element separator is empty.
pub fn extract_control_number(
    rendered: &[String],
    separators: &Separators,
    family: MessageFamily,
) -> Result<String> {
    let tag = family.header_tag();
    let header = rendered.iter().find(|line| {
        line.strip_prefix(tag)
            .is_some_and(|rest| rest.starts_with(separators.data_element.as_str()))
    });
    let Some(header) = header else {
        return Ok(String::new());
    };

    let node = SegmentNode::parse(header, separators)?;
    Ok(node
        .value(family.control_number_position() - 1)
        .unwrap_or_default()
        .to_string())
}

impl SegmentTree for SegmentNode {
    fn segment_nodes(&self) -> Result<Vec<SegmentNode>> {
        Ok(vec![self.clone()])
    }
}

impl SegmentTree for Vec<SegmentNode> {
    fn segment_nodes(&self) -> Result<Vec<SegmentNode>> {
        Ok(self.clone())
    }
}

/// A single message of a known family built from segment nodes.
///
/// Any `SE`/`UNT` trailer among the segments is replaced when the message is
/// written through a [`Container`](crate::Container).
///
/// # Examples
///
/// ```rust
/// use edi_text::{segment, Message, MessageFamily};
///
/// let message = Message::new(MessageFamily::X12)
///     .with_segment(segment!("ST", "850", "0001"))
///     .with_segment(segment!("BEG", "00", "SA", "PO-1"));
/// assert_eq!(message.segments().len(), 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    family: MessageFamily,
    segments: Vec<SegmentNode>,
}

impl Message {
    /// Creates an empty message of `family`.
    #[must_use]
    pub fn new(family: MessageFamily) -> Self {
        Message {
            family,
            segments: Vec::new(),
        }
    }

    /// Appends a segment.
    #[must_use]
    pub fn with_segment(mut self, segment: SegmentNode) -> Self {
        self.segments.push(segment);
        self
    }

    /// Appends a segment.
    pub fn push(&mut self, segment: SegmentNode) {
        self.segments.push(segment);
    }

    /// Returns the message family.
    #[must_use]
    pub fn family(&self) -> MessageFamily {
        self.family
    }

    /// Returns the segments in document order.
    #[must_use]
    pub fn segments(&self) -> &[SegmentNode] {
        &self.segments
    }

    /// Parses message text into a message of `family`.
    ///
    /// # Errors
    ///
    /// Returns an error if the text cannot be split into segments and elements.
    pub fn parse(text: &str, separators: &Separators, family: MessageFamily) -> Result<Self> {
        let segments = crate::reader::read_segments(text, separators)?
            .iter()
            .map(|segment| SegmentNode::parse(segment, separators))
            .collect::<Result<Vec<_>>>()?;
        Ok(Message { family, segments })
    }
}

impl SegmentTree for Message {
    fn segment_nodes(&self) -> Result<Vec<SegmentNode>> {
        Ok(self.segments.clone())
    }

    fn message_family(&self) -> Option<MessageFamily> {
        Some(self.family)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_trims_trailing_empties() {
        let seps = Separators::edifact();
        let node = SegmentNode::new("NAD")
            .with_element("BY")
            .with_composite(vec!["5412345000013".into(), "".into(), "9".into(), "".into()])
            .with_element("");
        assert_eq!(node.render(&seps), "NAD+BY+5412345000013::9'");
    }

    #[test]
    fn test_render_repetitions() {
        let seps = Separators::x12();
        let node = SegmentNode {
            tag: "REF".to_string(),
            elements: vec![Element {
                repetitions: vec![vec!["A".into()], vec!["B".into(), "C".into()]],
            }],
        };
        assert_eq!(node.render(&seps), "REF*A^B:C~");
    }

    #[test]
    fn test_parse_unescapes_components() {
        let seps = Separators::edifact();
        let node = SegmentNode::parse("FTX+AAI+++10?:30 ?? more?'s'", &seps).unwrap();
        assert_eq!(node.tag, "FTX");
        assert_eq!(node.value(3), Some("10:30 ? more's"));
        assert_eq!(node.render(&seps), "FTX+AAI+++10?:30 ?? more?'s'");
    }

    #[test]
    fn test_parse_keeps_isa_elements_whole() {
        let seps = Separators::x12();
        let isa = "ISA*00*          *00*          *ZZ*SENDER         *ZZ*RECEIVER       *230101*1200*^*00501*000000001*0*P*:~";
        let node = SegmentNode::parse(isa, &seps).unwrap();
        assert_eq!(node.elements.len(), 16);
        assert_eq!(node.value(10), Some("^"));
        assert_eq!(node.value(15), Some(":"));
        assert_eq!(node.render(&seps), isa);
    }

    #[test]
    fn test_parse_una() {
        let seps = Separators::from_una("UNA:+,? '").unwrap();
        let node = SegmentNode::parse("UNA:+,? '", &seps).unwrap();
        assert_eq!(node.tag, "UNA");
        assert_eq!(node.render(&seps), "UNA:+,? '");
    }

    #[test]
    fn test_una_declares_render_separators() {
        let node = SegmentNode::parse("UNA:+,? '", &Separators::edifact()).unwrap();
        let alt = Separators::edifact()
            .with_component_element(">")
            .with_data_element("|")
            .with_escape("")
            .with_segment_terminator("~");
        assert_eq!(node.render(&alt), "UNA>|, *~");
        assert_eq!(Separators::from_una(&node.render(&alt)).unwrap(), alt);
    }

    #[test]
    fn test_parse_rejects_missing_tag() {
        let seps = Separators::edifact();
        assert!(matches!(
            SegmentNode::parse("+A+B'", &seps),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_family_trailer_tags() {
        assert_eq!(MessageFamily::X12.trailer_segment_tag(), SegmentTag::Se);
        assert_eq!(MessageFamily::Edifact.trailer_tag(), "UNT");
        assert!(MessageFamily::Edifact.trailer_segment_tag().is_trailer());
    }

    #[test]
    fn test_control_number_edifact() {
        let seps = Separators::edifact();
        let rendered = vec![
            "UNH+ME000123+ORDERS:D:96A:UN'".to_string(),
            "BGM+220+PO1'".to_string(),
        ];
        let message = Message::new(MessageFamily::Edifact);
        assert_eq!(message.control_number(&rendered, &seps).unwrap(), "ME000123");
    }

    #[test]
    fn test_control_number_missing_header() {
        let seps = Separators::x12();
        let rendered = vec!["STX*1~".to_string(), "BEG*00~".to_string()];
        assert_eq!(
            extract_control_number(&rendered, &seps, MessageFamily::X12).unwrap(),
            ""
        );
    }

    #[test]
    fn test_plain_nodes_have_no_family() {
        let nodes = vec![SegmentNode::new("UNB"), SegmentNode::new("UNZ")];
        assert_eq!(nodes.message_family(), None);
        assert_eq!(nodes.render(&Separators::edifact()).unwrap(), vec!["UNB'", "UNZ'"]);
    }
}
