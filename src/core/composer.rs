//! # Composer
//!
//! The pending message text plus the edit target it belongs to.
//!
//! With no edit target the buffer becomes a new message; with one it replaces
//! that message's text. A buffer that is empty or whitespace-only can't be
//! sent. The blank check is re-run after every edit so the send affordance
//! always reflects the current buffer.

use std::fmt;
use std::ops::Range;

use crate::api::MessageId;

/// What a valid buffer turns into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Create { text: String },
    Edit { id: MessageId, text: String },
}

impl Submission {
    pub fn text(&self) -> &str {
        match self {
            Submission::Create { text } | Submission::Edit { text, .. } => text,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposeError {
    /// Buffer is empty or only whitespace.
    Blank,
}

impl fmt::Display for ComposeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComposeError::Blank => write!(f, "message is empty"),
        }
    }
}

impl std::error::Error for ComposeError {}

/// `^\s*$` with the ECMAScript `\s` set: Unicode white space plus the BOM,
/// minus NEL (U+0085).
pub fn is_blank(text: &str) -> bool {
    text.chars().all(is_space)
}

fn is_space(c: char) -> bool {
    match c {
        '\u{FEFF}' => true,
        '\u{85}' => false,
        _ => c.is_whitespace(),
    }
}

#[derive(Debug, Clone)]
pub struct Composer {
    buffer: String,
    edit_target: Option<MessageId>,
    blank: bool,
}

impl Default for Composer {
    fn default() -> Self {
        Self::new()
    }
}

impl Composer {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            edit_target: None,
            blank: true,
        }
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn edit_target(&self) -> Option<&MessageId> {
        self.edit_target.as_ref()
    }

    pub fn is_editing(&self) -> bool {
        self.edit_target.is_some()
    }

    pub fn is_blank(&self) -> bool {
        self.blank
    }

    /// Whether the send affordance is enabled.
    pub fn can_send(&self) -> bool {
        !self.buffer.is_empty() && !self.blank
    }

    /// Insert `text` at byte offset `pos` (must be a char boundary).
    pub fn insert(&mut self, pos: usize, text: &str) {
        self.buffer.insert_str(pos, text);
        self.refresh();
    }

    /// Remove a byte range (must lie on char boundaries).
    pub fn remove(&mut self, range: Range<usize>) {
        self.buffer.drain(range);
        self.refresh();
    }

    /// Replace the whole buffer, keeping the edit target.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.buffer = text.into();
        self.refresh();
    }

    /// Turn the buffer into a request, or reject it if blank.
    pub fn submission(&self) -> Result<Submission, ComposeError> {
        if self.blank {
            return Err(ComposeError::Blank);
        }
        let text = self.buffer.clone();
        Ok(match &self.edit_target {
            Some(id) => Submission::Edit {
                id: id.clone(),
                text,
            },
            None => Submission::Create { text },
        })
    }

    /// The server accepted the submission: clear buffer and edit target.
    pub fn submitted(&mut self) {
        self.buffer.clear();
        self.edit_target = None;
        self.refresh();
    }

    /// Load an existing message into the buffer for in-place editing.
    pub fn begin_edit(&mut self, id: MessageId, text: &str) {
        self.edit_target = Some(id);
        self.set_text(text);
    }

    /// Abandon the edit and clear the buffer.
    pub fn cancel_edit(&mut self) {
        self.edit_target = None;
        self.buffer.clear();
        self.refresh();
    }

    fn refresh(&mut self) {
        self.blank = is_blank(&self.buffer);
    }
}
