//! Separator configuration for EDI text.
//!
//! This module provides [`Separators`], the five delimiter strings in effect while
//! reading or writing an interchange:
//!
//! - segment terminator (`'` in EDIFACT, `~` in X12)
//! - data element separator (`+` / `*`)
//! - component element separator (`:` / `:`)
//! - repetition separator (`*` / `^`)
//! - escape marker (`?` in EDIFACT, none in X12)
//!
//! ## Examples
//!
//! ```rust
//! use edi_text::Separators;
//!
//! // EDIFACT defaults
//! let seps = Separators::edifact();
//! assert_eq!(seps.data_element, "+");
//!
//! // X12 with a newline terminator
//! let seps = Separators::x12().with_segment_terminator("\r\n");
//! assert!(seps.terminator_is_newline());
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// The five delimiter strings of an interchange.
///
/// Fields are compared by exact string match, so terminators longer than one
/// character (such as `"\r\n"`) are supported. An empty escape marker means the
/// syntax has no escaping.
///
/// # Examples
///
/// ```rust
/// use edi_text::Separators;
///
/// let seps = Separators::new()
///     .with_segment_terminator("~")
///     .with_data_element("*")
///     .with_component_element(">")
///     .with_repetition("^")
///     .with_escape("");
/// assert!(!seps.has_escape());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Separators {
    pub segment_terminator: String,
    pub data_element: String,
    pub component_element: String,
    pub repetition: String,
    pub escape: String,
}

impl Default for Separators {
    fn default() -> Self {
        Separators::edifact()
    }
}

impl Separators {
    /// Creates the default separator set (EDIFACT service characters).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// EDIFACT default service characters: `'`, `+`, `:`, `*`, `?`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use edi_text::Separators;
    ///
    /// let seps = Separators::edifact();
    /// assert_eq!(seps.segment_terminator, "'");
    /// assert_eq!(seps.escape, "?");
    /// ```
    #[must_use]
    pub fn edifact() -> Self {
        Separators {
            segment_terminator: "'".to_string(),
            data_element: "+".to_string(),
            component_element: ":".to_string(),
            repetition: "*".to_string(),
            escape: "?".to_string(),
        }
    }

    /// Common X12 delimiters: `~`, `*`, `:`, `^` and no escape marker.
    #[must_use]
    pub fn x12() -> Self {
        Separators {
            segment_terminator: "~".to_string(),
            data_element: "*".to_string(),
            component_element: ":".to_string(),
            repetition: "^".to_string(),
            escape: String::new(),
        }
    }

    /// Reads the separators declared by an EDIFACT `UNA` service string advice.
    ///
    /// The advice is `UNA` followed by six characters: component separator, data
    /// element separator, decimal mark, escape marker, repetition separator and
    /// segment terminator. The decimal mark has no delimiter role and is ignored.
    /// A space in the escape or repetition position means "not used".
    ///
    /// # Examples
    ///
    /// ```rust
    /// use edi_text::Separators;
    ///
    /// let seps = Separators::from_una("UNA:+.? '").unwrap();
    /// assert_eq!(seps, Separators::edifact().with_repetition(""));
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `text` does not start with a complete
    /// `UNA` advice.
    pub fn from_una(text: &str) -> Result<Self> {
        let rest = text
            .strip_prefix("UNA")
            .ok_or_else(|| Error::invalid_argument("service string advice must start with UNA"))?;
        let chars: Vec<char> = rest.chars().take(6).collect();
        if chars.len() < 6 {
            return Err(Error::invalid_argument(
                "service string advice needs six service characters",
            ));
        }

        let optional = |ch: char| {
            if ch == ' ' {
                String::new()
            } else {
                ch.to_string()
            }
        };

        Ok(Separators {
            component_element: chars[0].to_string(),
            data_element: chars[1].to_string(),
            escape: optional(chars[3]),
            repetition: optional(chars[4]),
            segment_terminator: chars[5].to_string(),
        })
    }

    /// Sets the segment terminator.
    #[must_use]
    pub fn with_segment_terminator(mut self, terminator: &str) -> Self {
        self.segment_terminator = terminator.to_string();
        self
    }

    /// Sets the data element separator.
    #[must_use]
    pub fn with_data_element(mut self, separator: &str) -> Self {
        self.data_element = separator.to_string();
        self
    }

    /// Sets the component element separator.
    #[must_use]
    pub fn with_component_element(mut self, separator: &str) -> Self {
        self.component_element = separator.to_string();
        self
    }

    /// Sets the repetition separator.
    #[must_use]
    pub fn with_repetition(mut self, separator: &str) -> Self {
        self.repetition = separator.to_string();
        self
    }

    /// Sets the escape marker. An empty string disables escaping.
    #[must_use]
    pub fn with_escape(mut self, escape: &str) -> Self {
        self.escape = escape.to_string();
        self
    }

    /// Returns `true` if an escape marker is configured.
    #[must_use]
    pub fn has_escape(&self) -> bool {
        !self.escape.is_empty()
    }

    /// Returns `true` if the segment terminator is a newline sequence.
    #[must_use]
    pub fn terminator_is_newline(&self) -> bool {
        matches!(self.segment_terminator.as_str(), "\n" | "\r\n" | "\r")
    }

    /// Iterates over the five separator strings.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        [
            self.segment_terminator.as_str(),
            self.data_element.as_str(),
            self.component_element.as_str(),
            self.repetition.as_str(),
            self.escape.as_str(),
        ]
        .into_iter()
    }
}
