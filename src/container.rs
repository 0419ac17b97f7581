//! Header / items / trailer containers.
//!
//! A [`Container`] collects the items of one envelope (messages in a group, groups in
//! an interchange) under an optional header. The trailer is never set by hand: it is
//! computed from the header and the item count by a strategy bound at construction,
//! and refreshed on every append.
//!
//! Writing a container also repairs message trailers. Each item with a
//! [`MessageFamily`](crate::MessageFamily) gets its `SE` / `UNT` segment rebuilt from
//! the rendered segment count and the message control number.
//!
//! ## Examples
//!
//! ```rust
//! use edi_text::{segment, Container, Message, MessageFamily, SegmentNode, Separators};
//!
//! let header = segment!("UNB", ["UNOC", "3"], "SENDER", "RECEIVER", ["230101", "1200"], "42");
//! let mut interchange = Container::new(
//!     Some(header),
//!     |header: &SegmentNode, count| {
//!         segment!("UNZ", count.to_string(), header.value(4).unwrap_or_default())
//!     },
//!     Separators::edifact(),
//! );
//!
//! interchange.add_item(
//!     Message::new(MessageFamily::Edifact)
//!         .with_segment(segment!("UNH", "1", ["ORDERS", "D", "96A", "UN"]))
//!         .with_segment(segment!("BGM", "220", "PO-1")),
//! );
//!
//! let lines = interchange.generate_text(None).unwrap();
//! assert_eq!(
//!     lines,
//!     vec![
//!         "UNB+UNOC:3+SENDER+RECEIVER+230101:1200+42'",
//!         "UNH+1+ORDERS:D:96A:UN'",
//!         "BGM+220+PO-1'",
//!         "UNT+3+0001'",
//!         "UNZ+1+42'",
//!     ]
//! );
//! ```

use std::fmt;
use std::marker::PhantomData;

use crate::classify::classify_segment_tag;
use crate::{Error, MessageFamily, Result, SegmentNode, SegmentTree, Separators};

type TrailerFn<H, T> = Box<dyn Fn(&H, usize) -> T>;

/// An envelope: optional header, ordered items, and a derived trailer.
///
/// The trailer is present exactly when the header is, and always reflects the
/// current item count. Appending requires `&mut self`; one writer at a time.
pub struct Container<H, I, T> {
    header: Option<H>,
    items: Vec<I>,
    trailer: Option<T>,
    trailer_fn: TrailerFn<H, T>,
    separators: Separators,
}

impl<H, I, T> Container<H, I, T> {
    /// Creates an empty container.
    ///
    /// `trailer_fn` computes the trailer from the header and the item count. It runs
    /// immediately when a header is given, so an empty envelope already has a trailer.
    pub fn new<F>(header: Option<H>, trailer_fn: F, separators: Separators) -> Self
    where
        F: Fn(&H, usize) -> T + 'static,
    {
        Self::from_parts(header, Box::new(trailer_fn), separators)
    }

    fn from_parts(header: Option<H>, trailer_fn: TrailerFn<H, T>, separators: Separators) -> Self {
        let trailer = header.as_ref().map(|h| trailer_fn(h, 0));
        Container {
            header,
            items: Vec::new(),
            trailer,
            trailer_fn,
            separators,
        }
    }

    /// Returns a builder for containers assembled from optional parts.
    #[must_use]
    pub fn builder() -> ContainerBuilder<H, I, T> {
        ContainerBuilder::new()
    }

    /// Appends one item and refreshes the trailer.
    pub fn add_item(&mut self, item: I) {
        self.items.push(item);
        self.refresh_trailer();
    }

    /// Appends items in order and refreshes the trailer.
    pub fn add_items<It>(&mut self, items: It)
    where
        It: IntoIterator<Item = I>,
    {
        self.items.extend(items);
        self.refresh_trailer();
    }

    fn refresh_trailer(&mut self) {
        if let Some(header) = &self.header {
            self.trailer = Some((self.trailer_fn)(header, self.items.len()));
        }
        tracing::debug!(
            items = self.items.len(),
            has_trailer = self.trailer.is_some(),
            "container updated"
        );
    }

    /// Returns the header.
    #[must_use]
    pub fn header(&self) -> Option<&H> {
        self.header.as_ref()
    }

    /// Returns the items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[I] {
        &self.items
    }

    /// Returns the derived trailer.
    #[must_use]
    pub fn trailer(&self) -> Option<&T> {
        self.trailer.as_ref()
    }

    /// Returns the number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if no items were added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the separators used when none are passed to `generate_text`.
    #[must_use]
    pub fn separators(&self) -> &Separators {
        &self.separators
    }
}

impl<H, I, T> Container<H, I, T>
where
    H: SegmentTree,
    I: SegmentTree,
    T: SegmentTree,
{
    /// Renders header, items and trailer as segment lines.
    ///
    /// Uses `separators` when given, otherwise the container's own. Items that are
    /// messages get their trailer synthesized (see [`to_text`]). Generating does not
    /// mutate the container, so repeated calls give the same lines.
    ///
    /// # Errors
    ///
    /// Propagates rendering errors from the header, items or trailer.
    pub fn generate_text(&self, separators: Option<&Separators>) -> Result<Vec<String>> {
        let separators = separators.unwrap_or(&self.separators);
        let mut lines = Vec::new();

        if let Some(header) = &self.header {
            lines.extend(header.render(separators)?);
        }
        for item in &self.items {
            lines.extend(to_text(item, separators, item.message_family().is_some())?);
        }
        if let Some(trailer) = &self.trailer {
            lines.extend(trailer.render(separators)?);
        }
        Ok(lines)
    }
}

impl<H, I, T> SegmentTree for Container<H, I, T>
where
    H: SegmentTree,
    I: SegmentTree,
    T: SegmentTree,
{
    fn segment_nodes(&self) -> Result<Vec<SegmentNode>> {
        self.generate_text(None)?
            .iter()
            .map(|line| SegmentNode::parse(line, &self.separators))
            .collect()
    }

    fn render(&self, separators: &Separators) -> Result<Vec<String>> {
        self.generate_text(Some(separators))
    }
}

impl<H, I, T> fmt::Debug for Container<H, I, T>
where
    H: fmt::Debug,
    I: fmt::Debug,
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("header", &self.header)
            .field("items", &self.items)
            .field("trailer", &self.trailer)
            .field("separators", &self.separators)
            .finish_non_exhaustive()
    }
}

/// Builds a [`Container`] from parts that may be missing.
///
/// # Examples
///
/// ```rust
/// use edi_text::{Container, Error, SegmentNode, Separators};
///
/// let missing = Container::<SegmentNode, SegmentNode, SegmentNode>::builder()
///     .with_separators(Separators::x12())
///     .build();
/// assert!(matches!(missing, Err(Error::InvalidArgument(_))));
/// ```
pub struct ContainerBuilder<H, I, T> {
    header: Option<H>,
    trailer_fn: Option<TrailerFn<H, T>>,
    separators: Option<Separators>,
    _items: PhantomData<I>,
}

impl<H, I, T> ContainerBuilder<H, I, T> {
    /// Creates a builder with no parts set.
    #[must_use]
    pub fn new() -> Self {
        ContainerBuilder {
            header: None,
            trailer_fn: None,
            separators: None,
            _items: PhantomData,
        }
    }

    /// Sets the header.
    #[must_use]
    pub fn with_header(mut self, header: H) -> Self {
        self.header = Some(header);
        self
    }

    /// Sets the trailer strategy.
    #[must_use]
    pub fn with_trailer_fn<F>(mut self, trailer_fn: F) -> Self
    where
        F: Fn(&H, usize) -> T + 'static,
    {
        self.trailer_fn = Some(Box::new(trailer_fn));
        self
    }

    /// Sets the default separators.
    #[must_use]
    pub fn with_separators(mut self, separators: Separators) -> Self {
        self.separators = Some(separators);
        self
    }

    /// Builds the container.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the trailer strategy or the separators
    /// were not set.
    pub fn build(self) -> Result<Container<H, I, T>> {
        let trailer_fn = self
            .trailer_fn
            .ok_or_else(|| Error::invalid_argument("trailer function is required"))?;
        let separators = self
            .separators
            .ok_or_else(|| Error::invalid_argument("default separators are required"))?;
        Ok(Container::from_parts(self.header, trailer_fn, separators))
    }
}

impl<H, I, T> Default for ContainerBuilder<H, I, T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Renders `item` and, for messages, rebuilds its trailer segment.
///
/// With `is_message` set and a known message family:
///
/// 1. a trailing `SE` / `UNT` segment already among the rendered lines is removed
/// 2. the segment count covers the remaining segments plus the new trailer
/// 3. the control number comes from [`SegmentTree::control_number`] and is
///    zero-padded (see [`pad_control_number`])
/// 4. the new trailer is appended last
///
/// An item that renders no segments gets no trailer.
///
/// # Examples
///
/// ```rust
/// use edi_text::{segment, to_text, Message, MessageFamily, Separators};
///
/// let message = Message::new(MessageFamily::X12)
///     .with_segment(segment!("ST", "850", "12"))
///     .with_segment(segment!("BEG", "00", "SA", "PO-1"));
/// let lines = to_text(&message, &Separators::x12(), true).unwrap();
/// assert_eq!(lines.last().map(String::as_str), Some("SE*3*0012~"));
/// ```
///
/// # Errors
///
/// Propagates errors from rendering and control number extraction.
pub fn to_text<S>(item: &S, separators: &Separators, is_message: bool) -> Result<Vec<String>>
where
    S: SegmentTree + ?Sized,
{
    let mut rendered = item.render(separators)?;
    if !is_message || rendered.is_empty() {
        return Ok(rendered);
    }
    let Some(family) = item.message_family() else {
        return Ok(rendered);
    };

    let replaced = rendered
        .last()
        .is_some_and(|last| is_trailer_segment(last, family, separators));
    if replaced {
        rendered.pop();
    }
    let segment_count = rendered.len() + 1;

    let control_number = item.control_number(&rendered, separators)?;
    let trailer = format!(
        "{tag}{des}{count}{des}{number}{term}",
        tag = family.trailer_tag(),
        des = separators.data_element,
        count = segment_count,
        number = pad_control_number(&control_number, control_number_width(&control_number)),
        term = separators.segment_terminator,
    );
    tracing::trace!(replaced, segment_count, %trailer, "synthesized message trailer");

    rendered.push(trailer);
    Ok(rendered)
}

// Segments too short to carry a tag are never trailers.
fn is_trailer_segment(line: &str, family: MessageFamily, separators: &Separators) -> bool {
    let expected = family.trailer_segment_tag();
    if !matches!(classify_segment_tag(line), Ok(found) if found == expected) {
        return false;
    }

    line.get(expected.as_str().len()..).is_some_and(|rest| {
        rest.starts_with(separators.data_element.as_str())
            || rest.starts_with(separators.segment_terminator.as_str())
    })
}

/// Returns the zero-pad width for a control number: 9 above four characters, else 4.
///
/// # Examples
///
/// ```rust
/// use edi_text::control_number_width;
///
/// assert_eq!(control_number_width("42"), 4);
/// assert_eq!(control_number_width("12345"), 9);
/// ```
#[must_use]
pub fn control_number_width(control_number: &str) -> usize {
    if control_number.chars().count() > 4 {
        9
    } else {
        4
    }
}

/// Left-pads `control_number` with zeros to `width` characters.
///
/// Longer values are returned unchanged.
///
/// # Examples
///
/// ```rust
/// use edi_text::pad_control_number;
///
/// assert_eq!(pad_control_number("42", 4), "0042");
/// assert_eq!(pad_control_number("55", 9), "000000055");
/// ```
#[must_use]
pub fn pad_control_number(control_number: &str, width: usize) -> String {
    format!("{control_number:0>width$}")
}
