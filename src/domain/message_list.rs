//! Message list presentation.
//!
//! Turns a room's raw messages into the sequence the chat view renders:
//! - search filtering on content and author name
//! - author/day grouping (`show_name` on the first message of a run,
//!   `show_avatar` on the last)
//! - one day separator per calendar day
//! - anonymity, role badge and reply preview resolution
//!
//! Everything is recomputed from scratch on each render pass.

use chrono::{DateTime, FixedOffset, Local, NaiveDate, Offset, Utc};

use super::{chat_session::PinnedMessages, message::Message, role::Role};

pub const ANONYMOUS_NAME: &str = "Anonymous";
pub const UNKNOWN_AUTHOR_NAME: &str = "User";
pub const OWN_AUTHOR_NAME: &str = "You";
pub const MISSING_REPLY_CONTENT: &str = "Original message not found";

/// Inputs that do not come from the message list itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenterContext {
    pub current_user_id: Option<String>,
    pub room_is_anonymous: bool,
    /// Offset used to decide calendar days and clock times.
    pub offset: FixedOffset,
    pub today: NaiveDate,
}

impl PresenterContext {
    /// Context for the machine's local timezone at the current instant.
    pub fn local(current_user_id: Option<String>, room_is_anonymous: bool) -> Self {
        let now = Local::now();
        Self {
            current_user_id,
            room_is_anonymous,
            offset: now.offset().fix(),
            today: now.date_naive(),
        }
    }

    fn day_of(&self, at: DateTime<Utc>) -> NaiveDate {
        at.with_timezone(&self.offset).date_naive()
    }

    fn is_own(&self, message: &Message) -> bool {
        self.current_user_id.as_deref() == Some(message.user_id.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayFlags {
    pub show_name: bool,
    pub show_avatar: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyPreview {
    pub target_id: String,
    pub author: String,
    pub content: String,
    pub found: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageView {
    pub id: String,
    /// Position in the filtered list.
    pub index: usize,
    pub is_own: bool,
    pub flags: DisplayFlags,
    /// Name shown in the header line ("You" for own messages).
    pub header_name: String,
    /// Name with anonymity resolved, used for avatars and reply bars.
    pub display_name: String,
    pub badge: Option<Role>,
    pub time: String,
    pub content: String,
    pub reply: Option<ReplyPreview>,
    pub is_pinned: bool,
}

impl MessageView {
    pub fn avatar_initial(&self) -> char {
        self.display_name
            .chars()
            .next()
            .map(|ch| ch.to_ascii_uppercase())
            .unwrap_or('?')
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatListElement {
    DaySeparator(String),
    Message(Box<MessageView>),
}

/// Case-insensitive filter on content and author name.
///
/// A blank query returns every message.
pub fn filter_messages<'a>(messages: &'a [Message], query: &str) -> Vec<&'a Message> {
    if query.trim().is_empty() {
        return messages.iter().collect();
    }

    let needle = query.to_lowercase();
    messages
        .iter()
        .filter(|message| {
            message.content.to_lowercase().contains(&needle)
                || message
                    .author_name()
                    .unwrap_or_default()
                    .to_lowercase()
                    .contains(&needle)
        })
        .collect()
}

/// Computes grouping flags from each message's immediate neighbours.
pub fn display_flags(messages: &[&Message], context: &PresenterContext) -> Vec<DisplayFlags> {
    let same_run = |a: &Message, b: &Message| {
        a.user_id == b.user_id && context.day_of(a.created_at) == context.day_of(b.created_at)
    };

    messages
        .iter()
        .enumerate()
        .map(|(index, message)| {
            let previous = index.checked_sub(1).and_then(|i| messages.get(i));
            let next = messages.get(index + 1);
            DisplayFlags {
                show_name: previous.map_or(true, |prev| !same_run(prev, message)),
                show_avatar: next.map_or(true, |next| !same_run(message, next)),
            }
        })
        .collect()
}

/// Resolves the visible author name, honouring room and message anonymity.
pub fn resolve_display_name(message: &Message, room_is_anonymous: bool) -> String {
    if room_is_anonymous || message.is_anonymous {
        return ANONYMOUS_NAME.to_owned();
    }

    message
        .author_name()
        .unwrap_or(UNKNOWN_AUTHOR_NAME)
        .to_owned()
}

/// Badge for a message, hidden for anonymous messages and missing profiles.
pub fn resolve_badge(message: &Message, room_is_anonymous: bool) -> Option<Role> {
    if room_is_anonymous || message.is_anonymous {
        return None;
    }

    message
        .author
        .as_ref()
        .map(|author| Role::from_raw(author.raw_role()))
}

/// Looks the reply target up in the full, unfiltered list.
pub fn resolve_reply(all_messages: &[Message], target_id: &str) -> ReplyPreview {
    match all_messages.iter().find(|message| message.id == target_id) {
        Some(target) => ReplyPreview {
            target_id: target_id.to_owned(),
            author: if target.is_anonymous {
                ANONYMOUS_NAME.to_owned()
            } else {
                target
                    .author_name()
                    .unwrap_or(UNKNOWN_AUTHOR_NAME)
                    .to_owned()
            },
            content: target.content.clone(),
            found: true,
        },
        None => ReplyPreview {
            target_id: target_id.to_owned(),
            author: UNKNOWN_AUTHOR_NAME.to_owned(),
            content: MISSING_REPLY_CONTENT.to_owned(),
            found: false,
        },
    }
}

/// Builds the rendered sequence: day separators interleaved with message views.
pub fn build_chat_list_elements(
    all_messages: &[Message],
    query: &str,
    pinned: &PinnedMessages,
    context: &PresenterContext,
) -> Vec<ChatListElement> {
    let filtered = filter_messages(all_messages, query);
    let flags = display_flags(&filtered, context);

    let mut elements = Vec::with_capacity(filtered.len() + 1);
    let mut previous_day: Option<NaiveDate> = None;

    for (index, (message, flags)) in filtered.iter().zip(flags).enumerate() {
        let day = context.day_of(message.created_at);
        if previous_day != Some(day) {
            elements.push(ChatListElement::DaySeparator(day_label(day, context.today)));
            previous_day = Some(day);
        }

        let is_own = context.is_own(message);
        let display_name = resolve_display_name(message, context.room_is_anonymous);

        elements.push(ChatListElement::Message(Box::new(MessageView {
            id: message.id.clone(),
            index,
            is_own,
            flags,
            header_name: if is_own {
                OWN_AUTHOR_NAME.to_owned()
            } else {
                display_name.clone()
            },
            display_name,
            badge: resolve_badge(message, context.room_is_anonymous),
            time: format_time(message.created_at, &context.offset),
            content: message.content.clone(),
            reply: message
                .reply_to
                .as_deref()
                .map(|target_id| resolve_reply(all_messages, target_id)),
            is_pinned: pinned.contains(&message.id),
        })));
    }

    elements
}

/// Converts a filtered-list message index to its element index.
pub fn message_index_to_element_index(
    elements: &[ChatListElement],
    message_index: usize,
) -> Option<usize> {
    elements.iter().position(|element| {
        matches!(element, ChatListElement::Message(view) if view.index == message_index)
    })
}

pub fn day_label(day: NaiveDate, today: NaiveDate) -> String {
    if day == today {
        "Today".to_owned()
    } else if today.pred_opt() == Some(day) {
        "Yesterday".to_owned()
    } else {
        day.format("%d %b %Y").to_string()
    }
}

fn format_time(at: DateTime<Utc>, offset: &FixedOffset) -> String {
    at.with_timezone(offset).format("%H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::domain::message::AuthorProfile;

    const ALICE: &str = "alice";
    const BOB: &str = "bob";

    fn at(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, day, hour, minute, 0).unwrap()
    }

    fn msg(id: &str, user_id: &str, name: &str, content: &str, created_at: DateTime<Utc>) -> Message {
        Message {
            id: id.to_owned(),
            room_id: "room-1".to_owned(),
            user_id: user_id.to_owned(),
            author: Some(AuthorProfile {
                name: Some(name.to_owned()),
                avatar_url: None,
                qualification: Some("paramedic".to_owned()),
                user_type: None,
            }),
            content: content.to_owned(),
            created_at,
            is_anonymous: false,
            reply_to: None,
        }
    }

    fn context() -> PresenterContext {
        PresenterContext {
            current_user_id: Some(ALICE.to_owned()),
            room_is_anonymous: false,
            offset: FixedOffset::east_opt(0).unwrap(),
            today: NaiveDate::from_ymd_opt(2026, 2, 15).unwrap(),
        }
    }

    fn views(elements: &[ChatListElement]) -> Vec<&MessageView> {
        elements
            .iter()
            .filter_map(|element| match element {
                ChatListElement::Message(view) => Some(view.as_ref()),
                ChatListElement::DaySeparator(_) => None,
            })
            .collect()
    }

    fn separators(elements: &[ChatListElement]) -> Vec<&str> {
        elements
            .iter()
            .filter_map(|element| match element {
                ChatListElement::DaySeparator(label) => Some(label.as_str()),
                ChatListElement::Message(_) => None,
            })
            .collect()
    }

    #[test]
    fn blank_query_returns_every_message() {
        let messages = vec![
            msg("1", ALICE, "Alice", "Hello", at(14, 10, 0)),
            msg("2", BOB, "Bob", "Hi", at(14, 10, 1)),
        ];

        assert_eq!(filter_messages(&messages, "").len(), 2);
        assert_eq!(filter_messages(&messages, "   ").len(), 2);
    }

    #[test]
    fn filter_matches_content_case_insensitively() {
        let messages = vec![
            msg("1", ALICE, "Alice", "Intubation tips", at(14, 10, 0)),
            msg("2", BOB, "Bob", "Shift swap?", at(14, 10, 1)),
        ];

        let filtered = filter_messages(&messages, "INTUB");

        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "1");
    }

    #[test]
    fn filter_matches_author_name() {
        let messages = vec![
            msg("1", ALICE, "Alice", "Hello", at(14, 10, 0)),
            msg("2", BOB, "Bob", "Hi", at(14, 10, 1)),
        ];

        let filtered = filter_messages(&messages, "bob");

        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "2");
    }

    #[test]
    fn filter_result_is_subset_of_input() {
        let messages = vec![
            msg("1", ALICE, "Alice", "cardiac arrest drill", at(14, 10, 0)),
            msg("2", BOB, "Bob", "Cardiology CE", at(14, 10, 1)),
            msg("3", BOB, "Bob", "lunch?", at(14, 10, 2)),
        ];

        for query in ["card", "CARD", "a", "zzz", "Bob"] {
            let filtered = filter_messages(&messages, query);
            assert!(filtered.len() <= messages.len());
            for message in filtered {
                assert!(messages.iter().any(|original| original.id == message.id));
            }
        }
    }

    #[test]
    fn filter_tolerates_missing_author_profile() {
        let mut message = msg("1", ALICE, "Alice", "Hello", at(14, 10, 0));
        message.author = None;
        let messages = vec![message];

        assert!(filter_messages(&messages, "alice").is_empty());
        assert_eq!(filter_messages(&messages, "hello").len(), 1);
    }

    #[test]
    fn consecutive_same_author_same_day_hides_later_name() {
        let messages = vec![
            msg("1", BOB, "Bob", "First", at(14, 10, 0)),
            msg("2", BOB, "Bob", "Second", at(14, 10, 1)),
            msg("3", BOB, "Bob", "Third", at(14, 10, 2)),
        ];
        let refs: Vec<&Message> = messages.iter().collect();

        let flags = display_flags(&refs, &context());

        assert!(flags[0].show_name);
        assert!(!flags[1].show_name);
        assert!(!flags[2].show_name);
        assert!(!flags[0].show_avatar);
        assert!(!flags[1].show_avatar);
        assert!(flags[2].show_avatar);
    }

    #[test]
    fn author_change_starts_new_run() {
        let messages = vec![
            msg("1", BOB, "Bob", "Hi", at(14, 10, 0)),
            msg("2", ALICE, "Alice", "Hey", at(14, 10, 1)),
        ];
        let refs: Vec<&Message> = messages.iter().collect();

        let flags = display_flags(&refs, &context());

        assert!(flags.iter().all(|f| f.show_name && f.show_avatar));
    }

    #[test]
    fn day_change_starts_new_run_for_same_author() {
        let messages = vec![
            msg("1", BOB, "Bob", "Late", at(13, 23, 59)),
            msg("2", BOB, "Bob", "Early", at(14, 0, 1)),
        ];
        let refs: Vec<&Message> = messages.iter().collect();

        let flags = display_flags(&refs, &context());

        assert!(flags[0].show_avatar);
        assert!(flags[1].show_name);
    }

    #[test]
    fn day_boundary_follows_offset() {
        let messages = vec![
            msg("1", BOB, "Bob", "Late", at(13, 23, 0)),
            msg("2", BOB, "Bob", "Early", at(14, 0, 30)),
        ];
        let refs: Vec<&Message> = messages.iter().collect();
        let mut ctx = context();
        ctx.offset = FixedOffset::east_opt(2 * 3600).unwrap();

        let flags = display_flags(&refs, &ctx);

        assert!(!flags[1].show_name, "both fall on 14 Feb at UTC+2");
    }

    #[test]
    fn one_separator_per_day_in_order() {
        let messages = vec![
            msg("1", BOB, "Bob", "a", at(12, 9, 0)),
            msg("2", ALICE, "Alice", "b", at(12, 11, 0)),
            msg("3", BOB, "Bob", "c", at(14, 8, 0)),
            msg("4", BOB, "Bob", "d", at(15, 8, 0)),
            msg("5", ALICE, "Alice", "e", at(15, 9, 0)),
        ];

        let elements =
            build_chat_list_elements(&messages, "", &PinnedMessages::default(), &context());

        assert_eq!(
            separators(&elements),
            vec!["12 Feb 2026", "Yesterday", "Today"]
        );
        assert!(matches!(elements[0], ChatListElement::DaySeparator(_)));
        assert_eq!(elements.len(), 8);
    }

    #[test]
    fn separators_follow_filtered_list() {
        let messages = vec![
            msg("1", BOB, "Bob", "protocol update", at(12, 9, 0)),
            msg("2", BOB, "Bob", "lunch", at(14, 9, 0)),
            msg("3", BOB, "Bob", "protocol question", at(15, 9, 0)),
        ];

        let elements =
            build_chat_list_elements(&messages, "protocol", &PinnedMessages::default(), &context());

        assert_eq!(separators(&elements), vec!["12 Feb 2026", "Today"]);
        assert_eq!(views(&elements).len(), 2);
    }

    #[test]
    fn own_messages_use_you_in_header() {
        let messages = vec![msg("1", ALICE, "Alice", "Hello", at(15, 9, 0))];

        let elements =
            build_chat_list_elements(&messages, "", &PinnedMessages::default(), &context());
        let view = views(&elements)[0];

        assert!(view.is_own);
        assert_eq!(view.header_name, "You");
        assert_eq!(view.display_name, "Alice");
    }

    #[test]
    fn anonymous_room_hides_identity_and_badge() {
        let messages = vec![msg("1", BOB, "Bob", "Salary question", at(15, 9, 0))];
        let mut ctx = context();
        ctx.room_is_anonymous = true;

        let elements = build_chat_list_elements(&messages, "", &PinnedMessages::default(), &ctx);
        let view = views(&elements)[0];

        assert_eq!(view.header_name, "Anonymous");
        assert_eq!(view.badge, None);
    }

    #[test]
    fn anonymous_message_hides_identity() {
        let mut message = msg("1", BOB, "Bob", "Hmm", at(15, 9, 0));
        message.is_anonymous = true;

        assert_eq!(resolve_display_name(&message, false), "Anonymous");
        assert_eq!(resolve_badge(&message, false), None);
    }

    #[test]
    fn missing_profile_falls_back_to_user_without_badge() {
        let mut message = msg("1", BOB, "Bob", "Hmm", at(15, 9, 0));
        message.author = None;

        assert_eq!(resolve_display_name(&message, false), "User");
        assert_eq!(resolve_badge(&message, false), None);
    }

    #[test]
    fn badge_resolves_from_qualification() {
        let message = msg("1", BOB, "Bob", "Hmm", at(15, 9, 0));

        assert_eq!(resolve_badge(&message, false), Some(Role::Paramedic));
    }

    #[test]
    fn reply_preview_uses_full_list_even_when_filtered_out() {
        let mut reply = msg("2", ALICE, "Alice", "agreed", at(15, 9, 1));
        reply.reply_to = Some("1".to_owned());
        let messages = vec![msg("1", BOB, "Bob", "Use the new protocol", at(15, 9, 0)), reply];

        let elements =
            build_chat_list_elements(&messages, "agreed", &PinnedMessages::default(), &context());
        let preview = views(&elements)[0].reply.clone().expect("reply preview");

        assert!(preview.found);
        assert_eq!(preview.author, "Bob");
        assert_eq!(preview.content, "Use the new protocol");
    }

    #[test]
    fn reply_preview_falls_back_when_target_missing() {
        let preview = resolve_reply(&[], "gone");

        assert!(!preview.found);
        assert_eq!(preview.author, "User");
        assert_eq!(preview.content, MISSING_REPLY_CONTENT);
    }

    #[test]
    fn reply_preview_to_anonymous_message_hides_author() {
        let mut target = msg("1", BOB, "Bob", "secret", at(15, 9, 0));
        target.is_anonymous = true;

        assert_eq!(resolve_reply(&[target], "1").author, "Anonymous");
    }

    #[test]
    fn pinned_flag_reflects_pinned_set() {
        let messages = vec![
            msg("1", ALICE, "Alice", "Pinned", at(15, 9, 0)),
            msg("2", ALICE, "Alice", "Not pinned", at(15, 9, 1)),
        ];
        let mut pinned = PinnedMessages::default();
        pinned.toggle("1");

        let elements = build_chat_list_elements(&messages, "", &pinned, &context());
        let views = views(&elements);

        assert!(views[0].is_pinned);
        assert!(!views[1].is_pinned);
    }

    #[test]
    fn message_index_maps_across_separators() {
        let messages = vec![
            msg("1", BOB, "Bob", "a", at(14, 9, 0)),
            msg("2", BOB, "Bob", "b", at(15, 9, 0)),
        ];
        let elements =
            build_chat_list_elements(&messages, "", &PinnedMessages::default(), &context());

        assert_eq!(message_index_to_element_index(&elements, 0), Some(1));
        assert_eq!(message_index_to_element_index(&elements, 1), Some(3));
        assert_eq!(message_index_to_element_index(&elements, 2), None);
    }

    #[test]
    fn time_is_formatted_in_offset() {
        let messages = vec![msg("1", BOB, "Bob", "a", at(15, 9, 5))];
        let mut ctx = context();
        ctx.offset = FixedOffset::west_opt(5 * 3600).unwrap();

        let elements = build_chat_list_elements(&messages, "", &PinnedMessages::default(), &ctx);

        assert_eq!(views(&elements)[0].time, "04:05");
    }

    #[test]
    fn avatar_initial_uses_display_name() {
        let messages = vec![msg("1", BOB, "bob", "a", at(15, 9, 5))];
        let elements =
            build_chat_list_elements(&messages, "", &PinnedMessages::default(), &context());

        assert_eq!(views(&elements)[0].avatar_initial(), 'B');
    }
}
