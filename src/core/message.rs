//! The message model: who said what, when, with which attachments and
//! reactions. Messages are immutable once created except for their
//! reaction set, which only the store may touch.

use chrono::{DateTime, Local};

use crate::core::drafts::PreviewHandle;

/// Stable identity for a message within one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Author {
    Me,
    Other,
}

impl Author {
    pub fn as_str(self) -> &'static str {
        match self {
            Author::Me => "me",
            Author::Other => "other",
        }
    }

    pub fn is_me(self) -> bool {
        self == Author::Me
    }
}

impl AsRef<str> for Author {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl TryFrom<&str> for Author {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "me" => Ok(Author::Me),
            "other" => Ok(Author::Other),
            _ => Err(format!("invalid author: {value}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttachmentKind {
    Image,
    File,
}

impl AttachmentKind {
    /// Classify from a MIME type; anything that is not an image previews
    /// as a generic file.
    pub fn from_mime(mime: &str) -> Self {
        if mime.starts_with("image/") {
            AttachmentKind::Image
        } else {
            AttachmentKind::File
        }
    }
}

/// A file attached to a sent message. Owns the preview handle that was
/// staged while the attachment was still a draft.
#[derive(Debug)]
pub struct Attachment {
    pub kind: AttachmentKind,
    pub name: String,
    pub size: u64,
    pub mime: String,
    pub preview: PreviewHandle,
}

/// One emoji reaction. The session is single-user, so a reaction is either
/// ours or seed data from the other party.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reaction {
    pub emoji: String,
    pub author: Author,
}

#[derive(Debug)]
pub struct Message {
    pub id: MessageId,
    pub author: Author,
    pub text: String,
    pub created_at: DateTime<Local>,
    pub attachments: Vec<Attachment>,
    pub reactions: Vec<Reaction>,
}

impl Message {
    pub fn new(
        id: MessageId,
        author: Author,
        text: impl Into<String>,
        created_at: DateTime<Local>,
    ) -> Self {
        Self {
            id,
            author,
            text: text.into(),
            created_at,
            attachments: Vec::new(),
            reactions: Vec::new(),
        }
    }

    pub fn is_mine(&self) -> bool {
        self.author.is_me()
    }

    pub fn has_reaction(&self, emoji: &str, author: Author) -> bool {
        self.reactions
            .iter()
            .any(|r| r.emoji == emoji && r.author == author)
    }
}
