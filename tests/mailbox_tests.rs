//! Frame Mailbox Tests
//!
//! Handoff between a receive thread and the control loop.
//! Run with: cargo test --test mailbox_tests

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use rover_firmware::control::mailbox::FrameMailbox;
use rover_firmware::protocol::frame::ControlFrame;

/// Frame whose every field carries the same sequence number
fn stamped(seq: i32) -> ControlFrame {
    ControlFrame {
        axis1: seq,
        axis2: seq,
        slides: [[seq; 2]; 4],
        buttons: [seq; 8],
    }
}

fn is_whole(frame: &ControlFrame) -> bool {
    let seq = frame.axis1;
    frame.axis2 == seq
        && frame.slides.iter().flatten().all(|&v| v == seq)
        && frame.buttons.iter().all(|&v| v == seq)
}

#[test]
fn test_take_clears_pending_frame() {
    let mailbox = FrameMailbox::new();
    assert_eq!(mailbox.take(), None);
    mailbox.post(stamped(1));
    assert_eq!(mailbox.take(), Some(stamped(1)));
    assert_eq!(mailbox.take(), None);
}

#[test]
fn test_latest_post_wins() {
    let mailbox = FrameMailbox::new();
    mailbox.post(stamped(1));
    mailbox.post(stamped(2));
    assert_eq!(mailbox.take(), Some(stamped(2)));
}

#[test]
fn test_wrong_size_payload_keeps_pending_frame() {
    let mailbox = FrameMailbox::default();
    mailbox.post(stamped(7));
    assert!(mailbox.deliver(&[0u8; 20]).is_err());
    assert_eq!(mailbox.rejected(), 1);
    assert_eq!(mailbox.take(), Some(stamped(7)));
}

#[test]
fn test_concurrent_posts_never_tear() {
    const FRAMES: i32 = 20_000;

    let mailbox = FrameMailbox::new();
    let done = AtomicBool::new(false);

    let (taken, last) = thread::scope(|s| {
        s.spawn(|| {
            for seq in 1..=FRAMES {
                if seq % 2 == 0 {
                    mailbox.post(stamped(seq));
                } else {
                    mailbox
                        .deliver(&stamped(seq).encode())
                        .expect("72-byte payload");
                }
            }
            done.store(true, Ordering::Release);
        });

        let mut taken = 0u32;
        let mut last = 0;
        loop {
            let finished = done.load(Ordering::Acquire);
            if let Some(frame) = mailbox.take() {
                assert!(is_whole(&frame), "torn frame {frame:?}");
                assert!(frame.axis1 > last, "went backwards to {}", frame.axis1);
                last = frame.axis1;
                taken += 1;
            } else if finished {
                break;
            }
        }
        (taken, last)
    });

    assert!(taken >= 1);
    assert_eq!(last, FRAMES);
    assert_eq!(mailbox.rejected(), 0);
}
