mod common;

use common::*;
use giveaway_bot::api::models::{Media, MediaKind, PostKind, PostStatus};
use giveaway_bot::conversation::{ConversationState, Incoming, Reply};
use giveaway_bot::drafts::{draft_key, DraftField, DraftStore};
use giveaway_bot::platform::MemberStatus;

fn photo(file_id: &str, caption: Option<&str>, group_id: Option<&str>) -> Incoming {
    Incoming::Media {
        media: Media {
            file_id: file_id.to_string(),
            kind: MediaKind::Photo,
        },
        caption: caption.map(str::to_string),
        entities: Vec::new(),
        group_id: group_id.map(str::to_string),
    }
}

#[tokio::test]
async fn test_full_campaign_drafting_scenario() {
    let h = harness(
        FakeBackend::with_channels(vec![
            channel("-1001", "@first_channel"),
            channel("-1002", "@second_channel"),
        ]),
        FakeMessenger::default(),
    );
    let c = &h.conversation;

    assert_eq!(c.begin_gift(ADMIN).await.unwrap(), Reply::AskStartPost);
    assert_eq!(c.state(ADMIN), ConversationState::WaitStartPost);

    let reply = c.handle_input(ADMIN, Incoming::text("Win a prize!")).await.unwrap();
    assert_eq!(reply, Reply::AskPostDate);
    assert_eq!(c.state(ADMIN), ConversationState::WaitStartPostDate);

    let reply = c.handle_input(ADMIN, Incoming::text("01.01.2025 12:00")).await.unwrap();
    match reply {
        Reply::ChannelPicker(channels) => assert_eq!(channels.len(), 2),
        other => panic!("expected channel picker, got {other:?}"),
    }
    assert_eq!(c.state(ADMIN), ConversationState::WaitStartPostChannels);

    match c.select_channel(ADMIN, "-1001").await.unwrap() {
        Reply::ChannelPicker(remaining) => {
            assert_eq!(remaining, vec![channel("-1002", "@second_channel")]);
        }
        other => panic!("expected channel picker, got {other:?}"),
    }

    assert_eq!(c.finish_gift(ADMIN).await.unwrap(), Reply::GiftSaved);
    assert!(c.state(ADMIN).is_idle());

    let created = h.backend.created.lock().unwrap();
    assert_eq!(created.len(), 1);
    let gift = &created[0];
    assert_eq!(gift.start_post_content, "Win a prize!");
    assert_eq!(gift.start_post_date.to_rfc3339(), "2025-01-01T09:00:00+00:00");
    assert_eq!(gift.start_post_status, PostStatus::Awaiting);
    assert_eq!(gift.channels, vec!["-1001".to_string()]);
    assert!(gift.start_post_media.is_none());
}

#[tokio::test]
async fn test_duplicate_selection_is_committed_once() {
    let h = harness(
        FakeBackend::with_channels(vec![channel("-1001", "@first_channel")]),
        FakeMessenger::default(),
    );
    let c = &h.conversation;

    c.begin_gift(ADMIN).await.unwrap();
    c.handle_input(ADMIN, photo("file-1", Some("Win!"), None)).await.unwrap();
    c.handle_input(ADMIN, Incoming::text("25.12.2024 18:00")).await.unwrap();
    c.select_channel(ADMIN, "-1001").await.unwrap();
    c.select_channel(ADMIN, "-1001").await.unwrap();
    c.finish_gift(ADMIN).await.unwrap();

    let created = h.backend.created.lock().unwrap();
    assert_eq!(created[0].channels, vec!["-1001".to_string()]);
    assert_eq!(created[0].start_post_media.as_deref(), Some("file-1"));
    assert_eq!(created[0].start_post_media_type, Some(MediaKind::Photo));
    assert_eq!(created[0].start_post_date.to_rfc3339(), "2024-12-25T15:00:00+00:00");
}

#[tokio::test]
async fn test_finish_without_channels_stays_in_picker() {
    let h = harness(
        FakeBackend::with_channels(vec![channel("-1001", "@first_channel")]),
        FakeMessenger::default(),
    );
    let c = &h.conversation;

    c.begin_gift(ADMIN).await.unwrap();
    c.handle_input(ADMIN, Incoming::text("Win a prize!")).await.unwrap();
    c.handle_input(ADMIN, Incoming::text("01.01.2025 12:00")).await.unwrap();

    assert_eq!(c.finish_gift(ADMIN).await.unwrap(), Reply::NoChannelsSelected);
    assert_eq!(c.state(ADMIN), ConversationState::WaitStartPostChannels);
    assert!(h.backend.created.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_gift_needs_a_channel_first() {
    let h = harness(FakeBackend::default(), FakeMessenger::default());
    let c = &h.conversation;

    assert_eq!(c.begin_gift(ADMIN).await.unwrap(), Reply::NoChannelsForGift);
    assert!(c.state(ADMIN).is_idle());
}

#[tokio::test]
async fn test_entering_a_post_state_clears_only_that_side() {
    let h = harness(
        FakeBackend::with_channels(vec![channel("-1001", "@first_channel")]),
        FakeMessenger::default(),
    );
    let end_key = draft_key(ADMIN, PostKind::End, DraftField::Content);
    let start_key = draft_key(ADMIN, PostKind::Start, DraftField::Content);
    h.store.set(&end_key, "old end text").await.unwrap();
    h.store.set(&start_key, "old start text").await.unwrap();

    h.conversation.begin_gift(ADMIN).await.unwrap();

    assert_eq!(h.store.get(&start_key).await.unwrap(), None);
    assert_eq!(h.store.get(&end_key).await.unwrap().as_deref(), Some("old end text"));

    h.conversation.begin_end_post(ADMIN, "gift-1").await.unwrap();
    assert_eq!(h.store.get(&end_key).await.unwrap(), None);
}

#[tokio::test]
async fn test_empty_content_keeps_waiting() {
    let h = harness(
        FakeBackend::with_channels(vec![channel("-1001", "@first_channel")]),
        FakeMessenger::default(),
    );
    let c = &h.conversation;
    c.begin_gift(ADMIN).await.unwrap();

    for input in [Incoming::text("   "), photo("file-1", None, None), Incoming::Other] {
        assert_eq!(c.handle_input(ADMIN, input).await.unwrap(), Reply::EmptyContent);
        assert_eq!(c.state(ADMIN), ConversationState::WaitStartPost);
    }
}

#[tokio::test]
async fn test_malformed_date_keeps_waiting() {
    let h = harness(
        FakeBackend::with_channels(vec![channel("-1001", "@first_channel")]),
        FakeMessenger::default(),
    );
    let c = &h.conversation;
    c.begin_gift(ADMIN).await.unwrap();
    c.handle_input(ADMIN, Incoming::text("Win a prize!")).await.unwrap();

    for raw in ["2025-01-01 12:00", "31.02.2025 12:00", "1.1.2025 12:00"] {
        assert_eq!(
            c.handle_input(ADMIN, Incoming::text(raw)).await.unwrap(),
            Reply::DateFormatError,
            "should reject {raw}"
        );
        assert_eq!(c.state(ADMIN), ConversationState::WaitStartPostDate);
    }
}

#[tokio::test]
async fn test_album_gets_one_notice_and_nothing_is_stored() {
    let h = harness(
        FakeBackend::with_channels(vec![channel("-1001", "@first_channel")]),
        FakeMessenger::default(),
    );
    let c = &h.conversation;
    c.begin_gift(ADMIN).await.unwrap();

    let first = c
        .handle_input(ADMIN, photo("file-1", Some("Win!"), Some("album-1")))
        .await
        .unwrap();
    let second = c
        .handle_input(ADMIN, photo("file-2", None, Some("album-1")))
        .await
        .unwrap();

    assert_eq!(first, Reply::SingleMediaOnly);
    assert_eq!(second, Reply::Ignored);
    assert_eq!(c.state(ADMIN), ConversationState::WaitStartPost);
    assert!(h.store.is_empty());
}

#[tokio::test]
async fn test_malformed_handle_never_reaches_platform() {
    let h = harness(FakeBackend::default(), FakeMessenger::default());
    let c = &h.conversation;
    c.begin_add_channel(ADMIN).await.unwrap();

    for raw in ["example_channel", "@abc", "@bad-name", "https://t.me/example"] {
        assert_eq!(
            c.handle_input(ADMIN, Incoming::text(raw)).await.unwrap(),
            Reply::ChannelFormatError
        );
        assert_eq!(c.state(ADMIN), ConversationState::WaitChannel);
    }
    assert_eq!(h.messenger.call_count(), 0);
}

#[tokio::test]
async fn test_channel_added_when_admin_has_rights() {
    let h = harness(
        FakeBackend::default(),
        FakeMessenger::with_channel("@example_channel", -1001, ADMIN, MemberStatus::Owner),
    );
    let c = &h.conversation;
    c.begin_add_channel(ADMIN).await.unwrap();

    let reply = c
        .handle_input(ADMIN, Incoming::text("  @example_channel "))
        .await
        .unwrap();

    assert_eq!(reply, Reply::ChannelList(vec![channel("-1001", "@example_channel")]));
    assert!(c.state(ADMIN).is_idle());
}

#[tokio::test]
async fn test_channel_rejected_without_rights_or_access() {
    let h = harness(
        FakeBackend::default(),
        FakeMessenger::with_channel("@example_channel", -1001, ADMIN, MemberStatus::Member),
    );
    let c = &h.conversation;

    c.begin_add_channel(ADMIN).await.unwrap();
    let reply = c.handle_input(ADMIN, Incoming::text("@example_channel")).await.unwrap();
    assert_eq!(reply, Reply::ChannelRightsError);
    assert!(c.state(ADMIN).is_idle());

    c.begin_add_channel(ADMIN).await.unwrap();
    let reply = c.handle_input(ADMIN, Incoming::text("@unknown_channel")).await.unwrap();
    assert_eq!(reply, Reply::ChannelAccessError);
    assert!(c.state(ADMIN).is_idle());

    assert!(h.backend.channels.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_input_without_active_flow_is_ignored() {
    let h = harness(FakeBackend::default(), FakeMessenger::default());
    let c = &h.conversation;

    assert_eq!(c.handle_input(ADMIN, Incoming::text("hello")).await.unwrap(), Reply::Ignored);
    assert_eq!(c.select_channel(ADMIN, "-1001").await.unwrap(), Reply::Ignored);
    assert_eq!(c.finish_gift(ADMIN).await.unwrap(), Reply::Ignored);
    assert!(h.store.is_empty());
}

#[tokio::test]
async fn test_admin_sessions_do_not_interfere() {
    let h = harness(
        FakeBackend::with_channels(vec![channel("-1001", "@first_channel")]),
        FakeMessenger::default(),
    );
    let c = &h.conversation;
    let other = ADMIN + 1;

    c.begin_gift(ADMIN).await.unwrap();
    c.begin_add_channel(other).await.unwrap();
    c.handle_input(ADMIN, Incoming::text("Win a prize!")).await.unwrap();

    assert_eq!(c.state(ADMIN), ConversationState::WaitStartPostDate);
    assert_eq!(c.state(other), ConversationState::WaitChannel);
}
