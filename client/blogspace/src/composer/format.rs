//! Inline markup insertion at the cursor
//!
//! Offsets are character offsets, not bytes, so multi-byte text behaves like
//! a text area selection.

use std::ops::Range;
use std::str::FromStr;

use blog_types::ClientError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Bold,
    Italic,
    List,
    Link,
}

impl Format {
    /// Markup wrapping `selected`
    pub fn wrap(&self, selected: &str) -> String {
        match self {
            Format::Bold => format!("**{}**", selected),
            Format::Italic => format!("*{}*", selected),
            Format::List => format!("\n- {}", selected),
            Format::Link => format!("[{}](https://example.com)", selected),
        }
    }
}

impl FromStr for Format {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bold" | "b" => Ok(Format::Bold),
            "italic" | "i" => Ok(Format::Italic),
            "list" | "l" => Ok(Format::List),
            "link" | "a" => Ok(Format::Link),
            other => Err(ClientError::Validation(format!(
                "Unknown format '{}'",
                other
            ))),
        }
    }
}

/// Replace `selection` in `content` with its formatted version
///
/// Returns the new content and the cursor position just after the inserted
/// markup. Out-of-range offsets are clamped and a reversed range is
/// normalised.
pub fn apply(content: &str, selection: Range<usize>, format: Format) -> (String, usize) {
    let len = content.chars().count();
    let (mut start, mut end) = (selection.start.min(len), selection.end.min(len));
    if start > end {
        std::mem::swap(&mut start, &mut end);
    }

    let start_byte = byte_offset(content, start);
    let end_byte = byte_offset(content, end);
    let inserted = format.wrap(&content[start_byte..end_byte]);

    let mut updated = String::with_capacity(content.len() + inserted.len());
    updated.push_str(&content[..start_byte]);
    updated.push_str(&inserted);
    updated.push_str(&content[end_byte..]);

    (updated, start + inserted.chars().count())
}

fn byte_offset(content: &str, char_offset: usize) -> usize {
    content
        .char_indices()
        .nth(char_offset)
        .map(|(idx, _)| idx)
        .unwrap_or(content.len())
}
