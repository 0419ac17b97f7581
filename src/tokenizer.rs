//! Escape-aware tokenizing of EDI text.
//!
//! [`split`] breaks a string on a separator while treating escaped separators as
//! literal content. The same routine splits interchanges into segments, segments into
//! data elements, and data elements into components, depending on which separator
//! the caller passes.
//!
//! ## Escaping Rules
//!
//! With escape marker `?` and separator `+`:
//!
//! ```text
//! UNOC?+3+SENDER   ->  ["UNOC+3", "SENDER"]
//! A??+B            ->  ["A?", "B"]        (with doubled-escape collapse)
//! ```
//!
//! ## Examples
//!
//! ```rust
//! use edi_text::{split, EmptyHandling};
//!
//! let tokens = split("UNB+UNOC?+3+SENDER", "?", "+", EmptyHandling::Keep, true).unwrap();
//! assert_eq!(tokens, vec!["UNB", "UNOC+3", "SENDER"]);
//! ```

use crate::classify::escape_line;
use crate::{Error, Result, Separators};

/// What to do with empty tokens produced by adjacent separators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum EmptyHandling {
    /// Keep every token, empty ones included. Element positions stay stable.
    #[default]
    Keep,
    /// Remove all empty tokens from the result.
    Drop,
}

/// Splits `input` on `separator`, honoring `escape`.
///
/// - An empty `escape` degrades to a plain split.
/// - A separator preceded by the escape marker is literal: the marker is removed
///   and the separator kept in the token.
/// - With `collapse_doubled_escape`, a doubled escape marker anywhere in a token
///   becomes a single literal marker. Without it, only a doubled marker at the very
///   end of a token collapses.
/// - The final token is trimmed of surrounding whitespace.
///
/// Runs in a single pass over `input`.
///
/// # Examples
///
/// ```rust
/// use edi_text::{split, EmptyHandling};
///
/// let tokens = split("a++b", "", "+", EmptyHandling::Drop, false).unwrap();
/// assert_eq!(tokens, vec!["a", "b"]);
/// ```
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] if `separator` is empty.
pub fn split(
    input: &str,
    escape: &str,
    separator: &str,
    empty_handling: EmptyHandling,
    collapse_doubled_escape: bool,
) -> Result<Vec<String>> {
    let sep = separator
        .chars()
        .next()
        .ok_or_else(|| Error::invalid_argument("separator must not be empty"))?;

    let mut tokens: Vec<String> = match escape.chars().next() {
        None => input.split(separator).map(str::to_string).collect(),
        Some(esc) => split_escaped(input, esc, sep, collapse_doubled_escape),
    };

    if empty_handling == EmptyHandling::Drop {
        tokens.retain(|token| !token.is_empty());
    }
    Ok(tokens)
}

fn split_escaped(input: &str, esc: char, sep: char, collapse: bool) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    // The previous character that can still escape the next one.
    let mut previous: Option<char> = None;

    for ch in input.chars() {
        if ch == sep {
            if previous == Some(esc) {
                current.pop();
                current.push(ch);
                previous = Some(ch);
            } else {
                tokens.push(close_token(current, esc, collapse));
                current = String::new();
                previous = None;
            }
            continue;
        }

        if collapse && ch == esc && previous == Some(esc) {
            // Keep the marker already in the buffer as the literal one.
            previous = None;
            continue;
        }

        current.push(ch);
        previous = Some(ch);
    }

    tokens.push(close_token(current, esc, collapse).trim().to_string());
    tokens
}

// Collapsing mode already folded every doubled marker while scanning.
fn close_token(mut token: String, esc: char, collapsed: bool) -> String {
    if collapsed {
        return token;
    }
    let mut tail = token.chars().rev();
    if tail.next() == Some(esc) && tail.next() == Some(esc) {
        token.pop();
    }
    token
}

/// Splits a segment into data elements using `separators`.
///
/// The tag is returned as the first token.
///
/// # Examples
///
/// ```rust
/// use edi_text::{split_elements, Separators};
///
/// let elements = split_elements("NAD+BY+5412345000013::9", &Separators::edifact()).unwrap();
/// assert_eq!(elements, vec!["NAD", "BY", "5412345000013::9"]);
/// ```
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] if the data element separator is empty.
pub fn split_elements(segment: &str, separators: &Separators) -> Result<Vec<String>> {
    split_keep_escapes(segment, separators, &separators.data_element)
}

/// Splits a data element into component elements using `separators`.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] if the component separator is empty.
pub fn split_components(element: &str, separators: &Separators) -> Result<Vec<String>> {
    split_keep_escapes(element, separators, &separators.component_element)
}

/// Splits a data element into its repetitions using `separators`.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] if the repetition separator is empty.
pub fn split_repetitions(element: &str, separators: &Separators) -> Result<Vec<String>> {
    split_keep_escapes(element, separators, &separators.repetition)
}

// Splitting on one level must leave the escapes of deeper levels in place, so only
// escapes in front of `separator` are consumed here.
fn split_keep_escapes(input: &str, separators: &Separators, separator: &str) -> Result<Vec<String>> {
    let sep = separator
        .chars()
        .next()
        .ok_or_else(|| Error::invalid_argument("separator must not be empty"))?;
    let Some(esc) = separators.escape.chars().next() else {
        return Ok(input.split(separator).map(str::to_string).collect());
    };

    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut chars = input.chars();

    while let Some(ch) = chars.next() {
        if ch == esc {
            match chars.next() {
                Some(next) if next == sep => current.push(next),
                Some(next) => {
                    current.push(ch);
                    current.push(next);
                }
                None => current.push(ch),
            }
        } else if ch == sep {
            tokens.push(std::mem::take(&mut current));
        } else {
            current.push(ch);
        }
    }
    tokens.push(current);
    Ok(tokens)
}

/// Removes escape markers from a fully split value.
///
/// Every escape marker makes the following character literal.
///
/// # Examples
///
/// ```rust
/// use edi_text::{unescape, Separators};
///
/// assert_eq!(unescape("10?+ units??", &Separators::edifact()), "10+ units?");
/// ```
#[must_use]
pub fn unescape(value: &str, separators: &Separators) -> String {
    let Some(esc) = separators.escape.chars().next() else {
        return value.to_string();
    };

    let mut output = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(ch) = chars.next() {
        if ch == esc {
            match chars.next() {
                Some(next) => output.push(next),
                None => output.push(ch),
            }
        } else {
            output.push(ch);
        }
    }
    output
}

/// Escapes each token and joins them with `separator`.
///
/// Every separator character is escaped, so [`split`] with doubled-escape collapse
/// restores tokens whose only special characters are `separator` and the escape
/// marker. Other escaped characters are restored by [`unescape`].
///
/// # Examples
///
/// ```rust
/// use edi_text::{join_escaped, split, EmptyHandling, Separators};
///
/// let seps = Separators::edifact();
/// let line = join_escaped(&["UNOC+3", "SENDER"], "+", &seps);
/// assert_eq!(line, "UNOC?+3+SENDER");
/// assert_eq!(
///     split(&line, "?", "+", EmptyHandling::Keep, true).unwrap(),
///     vec!["UNOC+3", "SENDER"]
/// );
/// ```
#[must_use]
pub fn join_escaped<S: AsRef<str>>(tokens: &[S], separator: &str, separators: &Separators) -> String {
    tokens
        .iter()
        .map(|token| escape_line(token.as_ref(), separators))
        .collect::<Vec<_>>()
        .join(separator)
}
