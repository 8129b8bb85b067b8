use serde_json::json;

use super::*;

fn make_comment(id: &str, kind: CommentType, at: Timestamp) -> Comment {
    Comment {
        id: id.to_owned(),
        kind,
        text: "looks off".to_owned(),
        author: "Riley".to_owned(),
        position: Point::new(10.0, 20.0),
        created_at: at,
        reactions: ReactionTally::default(),
        user_reacted: None,
        replies: Vec::new(),
        guest_created: false,
    }
}

// =============================================================
// CommentType
// =============================================================

#[test]
fn type_rank_orders_technical_conceptual_details() {
    assert!(CommentType::Technical.rank() < CommentType::Conceptual.rank());
    assert!(CommentType::Conceptual.rank() < CommentType::Details.rank());
}

#[test]
fn type_serde_is_uppercase() {
    assert_eq!(serde_json::to_string(&CommentType::Technical).unwrap(), "\"TECHNICAL\"");
    let back: CommentType = serde_json::from_str("\"DETAILS\"").unwrap();
    assert_eq!(back, CommentType::Details);
}

// =============================================================
// Timestamp normalization
// =============================================================

#[test]
fn timestamp_from_integer_millis() {
    assert_eq!(normalize_timestamp(&json!(1_700_000_000_000_i64)), Timestamp::Instant(1_700_000_000_000));
}

#[test]
fn timestamp_from_float_millis() {
    assert_eq!(normalize_timestamp(&json!(1234.0)), Timestamp::Instant(1234));
}

#[test]
fn timestamp_from_digit_string() {
    assert_eq!(normalize_timestamp(&json!("1700000000000")), Timestamp::Instant(1_700_000_000_000));
}

#[test]
fn timestamp_from_firebase_object() {
    let value = json!({ "seconds": 1_700_000_000_i64, "nanoseconds": 500 });
    assert_eq!(normalize_timestamp(&value), Timestamp::Instant(1_700_000_000_000));
}

#[test]
fn timestamp_from_iso_string_is_unknown() {
    // Only digit strings are a supported legacy shape; ISO strings never
    // appeared on comment records and fall back to Unknown.
    assert_eq!(normalize_timestamp(&json!("2026-03-01T12:00:00Z")), Timestamp::Unknown);
}

#[test]
fn timestamp_from_garbage_is_unknown() {
    assert_eq!(normalize_timestamp(&json!("last tuesday")), Timestamp::Unknown);
    assert_eq!(normalize_timestamp(&json!(null)), Timestamp::Unknown);
    assert_eq!(normalize_timestamp(&json!({ "sec": 5 })), Timestamp::Unknown);
    assert_eq!(normalize_timestamp(&json!([1, 2])), Timestamp::Unknown);
}

#[test]
fn timestamp_deserializes_through_serde() {
    let ts: Timestamp = serde_json::from_str("1234").unwrap();
    assert_eq!(ts, Timestamp::Instant(1234));
    let ts: Timestamp = serde_json::from_str("{\"seconds\": 2}").unwrap();
    assert_eq!(ts, Timestamp::Instant(2000));
    let ts: Timestamp = serde_json::from_str("null").unwrap();
    assert_eq!(ts, Timestamp::Unknown);
}

#[test]
fn timestamp_epoch_millis_accessor() {
    assert_eq!(Timestamp::Instant(42).epoch_millis(), Some(42));
    assert_eq!(Timestamp::Unknown.epoch_millis(), None);
}

// =============================================================
// Reaction reducer
// =============================================================

#[test]
fn toggle_sets_reaction_and_increments() {
    let mut tally = ReactionTally::default();
    let mut record = ReactionRecord::default();
    toggle_reaction(&mut tally, &mut record, ReactionKind::Agreed);
    assert_eq!(tally, ReactionTally { agreed: 1, disagreed: 0 });
    assert_eq!(record.active(), Some(ReactionKind::Agreed));
}

#[test]
fn double_toggle_returns_to_zero() {
    let mut tally = ReactionTally::default();
    let mut record = ReactionRecord::default();
    toggle_reaction(&mut tally, &mut record, ReactionKind::Agreed);
    toggle_reaction(&mut tally, &mut record, ReactionKind::Agreed);
    assert_eq!(tally, ReactionTally::default());
    assert_eq!(record.active(), None);
}

#[test]
fn switching_reaction_moves_the_count() {
    let mut tally = ReactionTally { agreed: 3, disagreed: 1 };
    let mut record = ReactionRecord { agreed: true, disagreed: false };
    toggle_reaction(&mut tally, &mut record, ReactionKind::Disagreed);
    assert_eq!(tally, ReactionTally { agreed: 2, disagreed: 2 });
    assert_eq!(record.active(), Some(ReactionKind::Disagreed));
}

#[test]
fn at_most_one_flag_after_any_sequence() {
    let mut tally = ReactionTally::default();
    let mut record = ReactionRecord::default();
    let sequence = [
        ReactionKind::Agreed,
        ReactionKind::Disagreed,
        ReactionKind::Disagreed,
        ReactionKind::Agreed,
        ReactionKind::Agreed,
        ReactionKind::Disagreed,
    ];
    for kind in sequence {
        toggle_reaction(&mut tally, &mut record, kind);
        assert!(!(record.agreed && record.disagreed));
        let expected = ReactionTally {
            agreed: u32::from(record.agreed),
            disagreed: u32::from(record.disagreed),
        };
        assert_eq!(tally, expected);
    }
}

#[test]
fn decrement_clamps_at_zero_on_inconsistent_input() {
    // A record claiming an active reaction the tally never counted.
    let mut tally = ReactionTally::default();
    let mut record = ReactionRecord { agreed: true, disagreed: false };
    toggle_reaction(&mut tally, &mut record, ReactionKind::Agreed);
    assert_eq!(tally, ReactionTally::default());
    assert_eq!(record.active(), None);
}

// =============================================================
// Placeholders and permissions
// =============================================================

#[test]
fn display_text_falls_back_when_empty() {
    let mut comment = make_comment("c1", CommentType::Technical, Timestamp::Unknown);
    comment.text = "  ".to_owned();
    assert_eq!(comment.display_text(), NO_TEXT_PLACEHOLDER);
    comment.text = "real feedback".to_owned();
    assert_eq!(comment.display_text(), "real feedback");
}

#[test]
fn display_author_falls_back_when_missing() {
    let mut comment = make_comment("c1", CommentType::Technical, Timestamp::Unknown);
    comment.author = String::new();
    assert_eq!(comment.display_author(), ANONYMOUS_AUTHOR);
}

#[test]
fn own_comments_are_modifiable() {
    let comment = make_comment("c1", CommentType::Details, Timestamp::Unknown);
    assert!(comment.can_modify("Riley"));
    assert!(comment.can_modify("someone else"));
}

#[test]
fn guest_comments_only_modifiable_by_author() {
    let mut comment = make_comment("c1", CommentType::Details, Timestamp::Unknown);
    comment.guest_created = true;
    assert!(comment.can_modify("Riley"));
    assert!(!comment.can_modify("someone else"));
}

// =============================================================
// Thread ordering
// =============================================================

#[test]
fn thread_order_by_type_then_time() {
    let details = make_comment("a", CommentType::Details, Timestamp::Instant(2));
    let technical = make_comment("b", CommentType::Technical, Timestamp::Instant(1));
    let conceptual = make_comment("c", CommentType::Conceptual, Timestamp::Instant(3));

    let mut comments = [details, technical, conceptual];
    comments.sort_by(thread_order);

    assert_eq!(comments[0].kind, CommentType::Technical);
    assert_eq!(comments[1].kind, CommentType::Conceptual);
    assert_eq!(comments[2].kind, CommentType::Details);
}

#[test]
fn same_type_sorts_by_timestamp_ascending() {
    let newer = make_comment("a", CommentType::Technical, Timestamp::Instant(200));
    let older = make_comment("b", CommentType::Technical, Timestamp::Instant(100));
    let mut comments = [newer, older];
    comments.sort_by(thread_order);
    assert_eq!(comments[0].id, "b");
    assert_eq!(comments[1].id, "a");
}

#[test]
fn unknown_timestamp_falls_back_to_id_order() {
    let x = make_comment("x", CommentType::Technical, Timestamp::Unknown);
    let a = make_comment("a", CommentType::Technical, Timestamp::Instant(100));
    let mut comments = [x, a];
    comments.sort_by(thread_order);
    assert_eq!(comments[0].id, "a");
    assert_eq!(comments[1].id, "x");
}

#[test]
fn identical_timestamps_break_tie_by_id() {
    let b = make_comment("b", CommentType::Details, Timestamp::Instant(5));
    let a = make_comment("a", CommentType::Details, Timestamp::Instant(5));
    let mut comments = [b, a];
    comments.sort_by(thread_order);
    assert_eq!(comments[0].id, "a");
}

// =============================================================
// Comment serde
// =============================================================

#[test]
fn comment_deserializes_legacy_shapes() {
    let raw = json!({
        "id": "c-9",
        "type": "CONCEPTUAL",
        "position": { "x": 4.0, "y": 8.0 },
        "createdAt": { "seconds": 1_700_000_000_i64 },
        "reactions": { "agreed": 2, "disagreed": 0 }
    });
    let comment: Comment = serde_json::from_value(raw).unwrap();
    assert_eq!(comment.kind, CommentType::Conceptual);
    assert_eq!(comment.created_at, Timestamp::Instant(1_700_000_000_000));
    assert_eq!(comment.display_text(), NO_TEXT_PLACEHOLDER);
    assert_eq!(comment.display_author(), ANONYMOUS_AUTHOR);
    assert!(!comment.guest_created);
    assert!(comment.replies.is_empty());
}

#[test]
fn comment_serde_roundtrip() {
    let mut comment = make_comment("c1", CommentType::Details, Timestamp::Instant(77));
    comment.replies.push(Reply {
        id: "r1".to_owned(),
        author: "Sam".to_owned(),
        text: "agreed".to_owned(),
        created_at: Timestamp::Instant(78),
    });
    comment.user_reacted = Some(ReactionKind::Agreed);
    let json = serde_json::to_string(&comment).unwrap();
    let back: Comment = serde_json::from_str(&json).unwrap();
    assert_eq!(back.id, "c1");
    assert_eq!(back.replies.len(), 1);
    assert_eq!(back.user_reacted, Some(ReactionKind::Agreed));
    assert_eq!(back.created_at, Timestamp::Instant(77));
}
