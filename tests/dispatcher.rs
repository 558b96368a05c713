mod common;

use common::fixtures::{photo_message, png_bytes, text_message};
use common::mock_transport::{MockTransport, Sent};
use polybot::dispatch::dispatcher::{
    CONCAT_PENDING_TEXT, FAILURE_TEXT, GREETING_TEXT, MISSING_COMMAND_TEXT,
};
use polybot::dispatch::{DispatchSettings, PhotoStore};
use polybot::image::decode_rgb;
use polybot::{BotMode, Dispatcher, Outcome};

const CHAT: i64 = 100;

fn setup(mode: BotMode) -> (tempfile::TempDir, Dispatcher<MockTransport>) {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = tempfile::tempdir().unwrap();
    let settings = DispatchSettings { mode, blur_level: 4, ..Default::default() };
    let dispatcher = Dispatcher::new(MockTransport::new(), PhotoStore::new(dir.path()), settings);
    (dir, dispatcher)
}

fn last_photo_shape(dispatcher: &Dispatcher<MockTransport>) -> (usize, usize) {
    let bytes = dispatcher.transport().photos().pop().expect("a photo was sent");
    let rgb = decode_rgb(&bytes).unwrap();
    (rgb.len(), rgb[0].len())
}

#[test]
fn caption_runs_filter_and_sends_photo() {
    let (dir, d) = setup(BotMode::ImageProcessing);
    d.transport().add_file("p1", png_bytes(12, 8));

    let outcome = d.handle_message(&photo_message(CHAT, 1, "p1", Some("Blur")));
    assert_eq!(outcome, Outcome::Processed { caption: "blur".into(), shape: (5, 9) });
    assert_eq!(last_photo_shape(&d), (5, 9));
    assert!(dir.path().join("photos/p1_filtered.png").exists());

    match d.transport().sent().last().unwrap() {
        Sent::Photo { chat_id, file_name, .. } => {
            assert_eq!(*chat_id, CHAT);
            assert_eq!(file_name, "p1_filtered.png");
        }
        other => panic!("expected a photo, got {:?}", other),
    }
}

#[test]
fn rotate2_keeps_dimensions() {
    let (_dir, d) = setup(BotMode::ImageProcessing);
    d.transport().add_file("p1", png_bytes(7, 3));

    let outcome = d.handle_message(&photo_message(CHAT, 1, "p1", Some("rotate2")));
    assert_eq!(outcome, Outcome::Processed { caption: "rotate2".into(), shape: (3, 7) });

    let single = d.handle_message(&photo_message(CHAT, 2, "p1", Some("rotate")));
    assert_eq!(single, Outcome::Processed { caption: "rotate".into(), shape: (7, 3) });
}

#[test]
fn unknown_caption_lists_commands() {
    let (_dir, d) = setup(BotMode::ImageProcessing);
    d.transport().add_file("p1", png_bytes(4, 4));

    let outcome = d.handle_message(&photo_message(CHAT, 1, "p1", Some("sharpen")));
    assert_eq!(outcome, Outcome::UnknownCommand("sharpen".into()));
    let reply = d.transport().last_text().unwrap();
    assert!(reply.starts_with("Unknown command."));
    assert!(d.transport().photos().is_empty());
}

#[test]
fn concat_pairing_lifecycle() {
    let (_dir, d) = setup(BotMode::ImageProcessing);
    d.transport().add_file("a", png_bytes(5, 6));
    d.transport().add_file("b", png_bytes(3, 6));
    d.transport().add_file("c", png_bytes(3, 6));

    // No pending image and no caption.
    assert_eq!(d.handle_message(&photo_message(CHAT, 1, "b", None)), Outcome::MissingCommand);
    assert_eq!(d.transport().last_text().unwrap(), MISSING_COMMAND_TEXT);

    // First half.
    match d.handle_message(&photo_message(CHAT, 2, "a", Some("concat"))) {
        Outcome::PendingStored { path } => assert!(path.ends_with("photos/a.png")),
        other => panic!("unexpected outcome {:?}", other),
    }
    assert_eq!(d.transport().last_text().unwrap(), CONCAT_PENDING_TEXT);
    assert!(d.sessions().pending_first(CHAT).is_some());

    // Second half joins to the right of the first.
    assert_eq!(
        d.handle_message(&photo_message(CHAT, 3, "b", None)),
        Outcome::Concatenated { shape: (6, 8) }
    );
    assert_eq!(last_photo_shape(&d), (6, 8));
    assert!(d.sessions().pending_first(CHAT).is_none());
    // Nothing pending, so the chat is no longer tracked.
    assert!(d.sessions().is_empty());

    // The slot is single use.
    assert_eq!(d.handle_message(&photo_message(CHAT, 4, "c", None)), Outcome::MissingCommand);
}

#[test]
fn failed_concat_keeps_pending_image() {
    let (_dir, d) = setup(BotMode::ImageProcessing);
    d.transport().add_file("tall", png_bytes(4, 9));
    d.transport().add_file("short", png_bytes(4, 5));
    d.transport().add_file("match", png_bytes(2, 9));

    d.handle_message(&photo_message(CHAT, 1, "tall", Some("concat")));
    let outcome = d.handle_message(&photo_message(CHAT, 2, "short", None));
    assert!(matches!(outcome, Outcome::Failed(_)));
    assert_eq!(d.transport().last_text().unwrap(), FAILURE_TEXT);
    assert!(d.sessions().pending_first(CHAT).is_some());

    // A compatible photo still pairs with the preserved slot.
    assert_eq!(
        d.handle_message(&photo_message(CHAT, 3, "match", None)),
        Outcome::Concatenated { shape: (9, 6) }
    );
}

#[test]
fn unreadable_concat_photo_is_not_stored() {
    let (_dir, d) = setup(BotMode::ImageProcessing);
    d.transport().add_file("junk", b"not an image".to_vec());
    d.transport().add_file("b", png_bytes(3, 3));

    let outcome = d.handle_message(&photo_message(CHAT, 1, "junk", Some("concat")));
    assert!(matches!(outcome, Outcome::Failed(_)));
    assert_eq!(d.transport().last_text().unwrap(), FAILURE_TEXT);
    assert!(d.sessions().pending_first(CHAT).is_none());

    // The next uncaptioned photo has nothing to pair with.
    assert_eq!(d.handle_message(&photo_message(CHAT, 2, "b", None)), Outcome::MissingCommand);
}

#[test]
fn failed_upload_keeps_pending_image() {
    let (_dir, d) = setup(BotMode::ImageProcessing);
    d.transport().add_file("a", png_bytes(2, 2));
    d.transport().add_file("b", png_bytes(2, 2));

    d.handle_message(&photo_message(CHAT, 1, "a", Some("concat")));
    d.transport().fail_photo_sends(true);
    assert!(matches!(d.handle_message(&photo_message(CHAT, 2, "b", None)), Outcome::Failed(_)));
    assert!(d.sessions().pending_first(CHAT).is_some());
}

#[test]
fn pending_image_never_expires() {
    let (_dir, d) = setup(BotMode::ImageProcessing);
    d.transport().add_file("a", png_bytes(2, 2));
    d.transport().add_file("b", png_bytes(2, 2));

    d.handle_message(&photo_message(CHAT, 1, "a", Some("concat")));
    // Unrelated traffic in between does not clear the slot, and there is no
    // timeout: the next uncaptioned photo pairs no matter how much later.
    d.handle_message(&text_message(CHAT, 2, "hi"));
    d.handle_message(&photo_message(CHAT, 3, "b", Some("nonsense")));
    assert!(d.sessions().pending_first(CHAT).is_some());

    assert_eq!(
        d.handle_message(&photo_message(CHAT, 4, "b", None)),
        Outcome::Concatenated { shape: (2, 4) }
    );
}

#[test]
fn sessions_are_per_chat() {
    let (_dir, d) = setup(BotMode::ImageProcessing);
    d.transport().add_file("a", png_bytes(2, 2));

    d.handle_message(&photo_message(1, 1, "a", Some("concat")));
    assert_eq!(d.handle_message(&photo_message(2, 2, "a", None)), Outcome::MissingCommand);
    assert!(d.sessions().pending_first(1).is_some());
}

#[test]
fn concurrent_chats_each_use_their_slot_once() {
    const PAIRS: usize = 6;
    const OTHERS: i64 = 4;
    let (_dir, d) = setup(BotMode::ImageProcessing);
    for i in 0..PAIRS {
        d.transport().add_file(&format!("first{}", i), png_bytes(4, 5));
        d.transport().add_file(&format!("second{}", i), png_bytes(3, 5));
    }
    for chat in 1..=OTHERS {
        d.transport().add_file(&format!("other{}", chat), png_bytes(6, 6));
    }

    let (pair_outcomes, other_outcomes) = std::thread::scope(|s| {
        let pairs: Vec<_> = (0..PAIRS)
            .map(|i| {
                let d = &d;
                s.spawn(move || {
                    let id = 10 * i as i64;
                    let first = d.handle_message(&photo_message(CHAT, id, &format!("first{}", i), Some("concat")));
                    let second = d.handle_message(&photo_message(CHAT, id + 1, &format!("second{}", i), None));
                    (first, second)
                })
            })
            .collect();
        let others: Vec<_> = (1..=OTHERS)
            .map(|chat| {
                let d = &d;
                s.spawn(move || d.handle_message(&photo_message(chat, 1, &format!("other{}", chat), Some("segment"))))
            })
            .collect();
        (
            pairs.into_iter().map(|h| h.join().unwrap()).collect::<Vec<_>>(),
            others.into_iter().map(|h| h.join().unwrap()).collect::<Vec<_>>(),
        )
    });

    for outcome in &other_outcomes {
        assert_eq!(outcome, &Outcome::Processed { caption: "segment".into(), shape: (6, 6) });
    }

    let mut stored = 0;
    let mut joined = 0;
    for (first, second) in &pair_outcomes {
        assert!(matches!(first, Outcome::PendingStored { .. }), "unexpected {:?}", first);
        stored += 1;
        match second {
            Outcome::Concatenated { shape } => {
                assert_eq!(*shape, (5, 7));
                joined += 1;
            }
            Outcome::MissingCommand => {}
            other => panic!("unexpected outcome {:?}", other),
        }
    }
    // Every pairing consumed a slot some `concat` filled, and a slot is never
    // read twice: the last message of each thread is an uncaptioned photo, so
    // at least one pairing happened after the final `concat`.
    assert!(joined >= 1);
    assert!(joined <= stored);
    assert!(d.sessions().pending_first(CHAT).is_none());
    assert!(d.sessions().is_empty());
}

#[test]
fn filter_failure_is_reported_not_raised() {
    let (_dir, d) = setup(BotMode::ImageProcessing);
    // 3x3 is smaller than the configured 4x4 blur window.
    d.transport().add_file("tiny", png_bytes(3, 3));

    let outcome = d.handle_message(&photo_message(CHAT, 1, "tiny", Some("blur")));
    assert!(matches!(outcome, Outcome::Failed(_)));
    assert_eq!(d.transport().last_text().unwrap(), FAILURE_TEXT);
}

#[test]
fn missing_attachment_is_a_failure() {
    let (_dir, d) = setup(BotMode::ImageProcessing);
    let outcome = d.handle_message(&photo_message(CHAT, 1, "ghost", Some("segment")));
    assert!(matches!(outcome, Outcome::Failed(_)));
}

#[test]
fn undecodable_photo_is_a_failure() {
    let (_dir, d) = setup(BotMode::ImageProcessing);
    d.transport().add_file("junk", b"definitely not a png".to_vec());
    let outcome = d.handle_message(&photo_message(CHAT, 1, "junk", Some("contour")));
    assert!(matches!(outcome, Outcome::Failed(_)));
}

#[test]
fn text_in_image_mode() {
    let (_dir, d) = setup(BotMode::ImageProcessing);
    assert_eq!(d.handle_message(&text_message(CHAT, 1, "HI")), Outcome::Greeted);
    assert_eq!(d.transport().last_text().unwrap(), GREETING_TEXT);
    assert_eq!(d.handle_message(&text_message(CHAT, 2, "blur please")), Outcome::MissingCommand);
}

#[test]
fn echo_mode_repeats_text() {
    let (_dir, d) = setup(BotMode::Echo);
    assert_eq!(d.handle_message(&text_message(CHAT, 1, "hello there")), Outcome::Echoed);
    assert_eq!(d.transport().last_text().unwrap(), "Your original message: hello there");
}

#[test]
fn quote_mode_quotes_unless_asked_not_to() {
    let (_dir, d) = setup(BotMode::Quote);
    assert_eq!(d.handle_message(&text_message(CHAT, 9, "quote this")), Outcome::Quoted);
    assert_eq!(
        d.transport().sent().last().unwrap(),
        &Sent::Quote { chat_id: CHAT, text: "quote this".into(), quoted: 9 }
    );

    let before = d.transport().sent().len();
    assert_eq!(d.handle_message(&text_message(CHAT, 10, "Please don't quote me")), Outcome::Ignored);
    assert_eq!(d.transport().sent().len(), before);
}
