//! The chat store: the single mutation path for the conversation.
//!
//! State transitions are explicit methods (`send_message`, `add_reaction`,
//! `remove_reaction`); consumers read snapshots. There is no network and
//! no persistence; the "other" side of the conversation is seed data.

use chrono::{DateTime, Duration, Local};
use tracing::debug;

use crate::core::drafts::DraftAttachment;
use crate::core::message::{Author, Message, MessageId, Reaction};

/// Messages closer together than this share one time separator.
const GROUP_WINDOW_MINUTES: i64 = 15;

#[derive(Debug, Default)]
pub struct ChatStore {
    messages: Vec<Message>,
    next_id: u64,
}

impl ChatStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-populated with the static "other" side of the
    /// conversation, timestamped relative to now.
    pub fn with_seed() -> Self {
        Self::with_seed_at(Local::now())
    }

    pub fn with_seed_at(now: DateTime<Local>) -> Self {
        let mut store = Self::new();
        store.push_seed("Hey! Are you here?", now - Duration::hours(24));
        store.push_seed(
            "Here's the plan for the release notes:\n\
             - review the **draft**\n\
             - check the `changelog` formatting\n\
             - publish at https://example.com/releases",
            now - Duration::hours(23) + Duration::minutes(5),
        );
        store.push_seed("Ping me when you get a chance.", now - Duration::minutes(10));
        store
    }

    fn push_seed(&mut self, text: &str, created_at: DateTime<Local>) {
        let id = self.allocate_id();
        self.messages
            .push(Message::new(id, Author::Other, text, created_at));
    }

    fn allocate_id(&mut self) -> MessageId {
        self.next_id += 1;
        MessageId(self.next_id)
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn get(&self, id: MessageId) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == id)
    }

    /// Append a message from us. The text arrives pre-trimmed from the
    /// composer but is trimmed again here so the store never holds a
    /// whitespace-only message; an empty send with no drafts is refused.
    pub fn send_message(
        &mut self,
        text: &str,
        drafts: Vec<DraftAttachment>,
    ) -> Option<MessageId> {
        let text = text.trim();
        if text.is_empty() && drafts.is_empty() {
            return None;
        }

        let id = self.allocate_id();
        let mut message = Message::new(id, Author::Me, text, Local::now());
        message.attachments = drafts
            .into_iter()
            .map(DraftAttachment::into_attachment)
            .collect();
        debug!(
            id = id.0,
            attachments = message.attachments.len(),
            "sending message"
        );
        self.messages.push(message);
        Some(id)
    }

    /// Add a reaction; a duplicate (same emoji, same author) is a no-op.
    /// Returns whether the transcript changed.
    pub fn add_reaction(&mut self, id: MessageId, emoji: &str, author: Author) -> bool {
        let Some(message) = self.messages.iter_mut().find(|m| m.id == id) else {
            return false;
        };
        if message.has_reaction(emoji, author) {
            return false;
        }
        debug!(id = id.0, emoji, "adding reaction");
        message.reactions.push(Reaction {
            emoji: emoji.to_string(),
            author,
        });
        true
    }

    /// Remove a reaction. Returns whether the transcript changed.
    pub fn remove_reaction(&mut self, id: MessageId, emoji: &str, author: Author) -> bool {
        let Some(message) = self.messages.iter_mut().find(|m| m.id == id) else {
            return false;
        };
        let before = message.reactions.len();
        message
            .reactions
            .retain(|r| !(r.emoji == emoji && r.author == author));
        if message.reactions.len() != before {
            debug!(id = id.0, emoji, "removing reaction");
            true
        } else {
            false
        }
    }

    /// Toggle our own reaction on a message.
    pub fn toggle_reaction(&mut self, id: MessageId, emoji: &str) {
        if !self.remove_reaction(id, emoji, Author::Me) {
            self.add_reaction(id, emoji, Author::Me);
        }
    }
}

/// Whether the transcript shows a time separator before a message sent at
/// `cur`, given the previous message's timestamp. A new calendar day or a
/// gap of more than fifteen minutes starts a new group.
pub fn needs_time_separator(prev: Option<DateTime<Local>>, cur: DateTime<Local>) -> bool {
    let Some(prev) = prev else {
        return true;
    };
    prev.date_naive() != cur.date_naive()
        || cur - prev > Duration::minutes(GROUP_WINDOW_MINUTES)
}

/// Separator label, e.g. "Sep 3, 14:05".
pub fn format_separator(ts: DateTime<Local>) -> String {
    ts.format("%b %-d, %H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::drafts::PreviewHandle;
    use crate::core::message::AttachmentKind;
    use chrono::TimeZone;

    fn draft() -> DraftAttachment {
        DraftAttachment {
            kind: AttachmentKind::Image,
            name: "pic.png".into(),
            size: 3,
            mime: "image/png".into(),
            preview: PreviewHandle::from_bytes(b"pic").unwrap(),
        }
    }

    #[test]
    fn seed_transcript_is_from_the_other_party() {
        let store = ChatStore::with_seed();
        assert!(!store.is_empty());
        assert!(store.messages().iter().all(|m| m.author == Author::Other));
    }

    #[test]
    fn send_appends_a_trimmed_message_from_me() {
        let mut store = ChatStore::with_seed();
        let before = store.len();
        let id = store.send_message("  hello  ", Vec::new()).unwrap();
        assert_eq!(store.len(), before + 1);
        let message = store.get(id).unwrap();
        assert_eq!(message.text, "hello");
        assert_eq!(message.author, Author::Me);
    }

    #[test]
    fn empty_send_without_drafts_is_refused() {
        let mut store = ChatStore::new();
        assert!(store.send_message("   ", Vec::new()).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn draft_only_send_is_accepted_and_keeps_the_preview() {
        let mut store = ChatStore::new();
        let id = store.send_message("", vec![draft()]).unwrap();
        let message = store.get(id).unwrap();
        assert_eq!(message.attachments.len(), 1);
        assert!(!message.attachments[0].preview.is_released());
    }

    #[test]
    fn message_ids_are_unique_and_increasing() {
        let mut store = ChatStore::new();
        let a = store.send_message("a", Vec::new()).unwrap();
        let b = store.send_message("b", Vec::new()).unwrap();
        assert!(b > a);
    }

    #[test]
    fn reactions_toggle_per_author() {
        let mut store = ChatStore::new();
        let id = store.send_message("hi", Vec::new()).unwrap();

        assert!(store.add_reaction(id, "👍", Author::Me));
        // Duplicate from the same author is a no-op.
        assert!(!store.add_reaction(id, "👍", Author::Me));
        // The other party's identical emoji is a distinct reaction.
        assert!(store.add_reaction(id, "👍", Author::Other));
        assert_eq!(store.get(id).unwrap().reactions.len(), 2);

        assert!(store.remove_reaction(id, "👍", Author::Me));
        assert!(!store.remove_reaction(id, "👍", Author::Me));
        assert_eq!(store.get(id).unwrap().reactions.len(), 1);
    }

    #[test]
    fn toggle_reaction_round_trips() {
        let mut store = ChatStore::new();
        let id = store.send_message("hi", Vec::new()).unwrap();
        store.toggle_reaction(id, "🎉");
        assert!(store.get(id).unwrap().has_reaction("🎉", Author::Me));
        store.toggle_reaction(id, "🎉");
        assert!(!store.get(id).unwrap().has_reaction("🎉", Author::Me));
    }

    #[test]
    fn reactions_on_unknown_messages_are_ignored() {
        let mut store = ChatStore::new();
        assert!(!store.add_reaction(MessageId(99), "👍", Author::Me));
        assert!(!store.remove_reaction(MessageId(99), "👍", Author::Me));
    }

    #[test]
    fn separators_follow_day_and_gap_rules() {
        let base = Local.with_ymd_and_hms(2026, 8, 29, 12, 0, 0).unwrap();

        assert!(needs_time_separator(None, base));
        // Ten minutes later, same group.
        assert!(!needs_time_separator(Some(base), base + Duration::minutes(10)));
        // Sixteen minutes later, new group.
        assert!(needs_time_separator(Some(base), base + Duration::minutes(16)));
        // Next day, new group even if the clock gap is small.
        let late = Local.with_ymd_and_hms(2026, 8, 29, 23, 55, 0).unwrap();
        assert!(needs_time_separator(Some(late), late + Duration::minutes(10)));
    }

    #[test]
    fn separator_label_has_day_and_time() {
        let ts = Local.with_ymd_and_hms(2026, 9, 3, 14, 5, 0).unwrap();
        assert_eq!(format_separator(ts), "Sep 3, 14:05");
    }
}
