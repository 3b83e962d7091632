//! Tick-loop tests: key commands go in, encoded frames come out.

use std::time::Duration;

use tokio::sync::mpsc;

use hopper_core::config::{VK_LEFT, VK_RIGHT, VK_SPACE};
use hopper_core::motion::MotionPhase;
use hopper_core::protocol::decode_frame;
use hopper_core::render::Frame;
use hopper_core::test_helpers::fast_config;
use hopper_runner::session::{SessionBroadcast, SessionCommand, SessionConfig, spawn_session};

const RECV_TIMEOUT: Duration = Duration::from_secs(5);

fn limited(max_ticks: u64) -> SessionConfig {
    SessionConfig {
        game: fast_config(),
        max_ticks: Some(max_ticks),
    }
}

/// Drain the broadcast channel until `Ended`, decoding every frame.
async fn collect_frames(rx: &mut mpsc::UnboundedReceiver<SessionBroadcast>) -> Vec<Frame> {
    let mut frames = Vec::new();
    loop {
        let msg = tokio::time::timeout(RECV_TIMEOUT, rx.recv())
            .await
            .expect("session should keep broadcasting");
        match msg {
            Some(SessionBroadcast::Frame(data)) => {
                frames.push(decode_frame(&data).expect("frame should decode"));
            },
            Some(SessionBroadcast::Ended) | None => return frames,
        }
    }
}

#[tokio::test]
async fn idle_session_emits_resting_frames() {
    let (_cmd_tx, mut rx, handle) = spawn_session(limited(10));
    let frames = collect_frames(&mut rx).await;
    handle.await.unwrap();

    assert_eq!(frames.len(), 10);
    for (i, frame) in frames.iter().enumerate() {
        assert_eq!(frame.tick, i as u64 + 1);
        assert_eq!(frame.phase, MotionPhase::Grounded);
        assert_eq!(frame.rect.y, 575, "Resting box sits on the bottom edge");
        assert_eq!(frame.jumps_remaining, 2);
    }
}

#[tokio::test]
async fn queued_jump_arcs_and_lands() {
    let (cmd_tx, mut rx, handle) = spawn_session(limited(40));
    cmd_tx.send(SessionCommand::KeyPressed(VK_SPACE)).unwrap();

    let frames = collect_frames(&mut rx).await;
    handle.await.unwrap();
    assert_eq!(frames.len(), 40);

    // The press is applied before the first tick, which takes off.
    assert_eq!(frames[0].phase, MotionPhase::Rising);
    assert_eq!(frames[0].jumps_remaining, 1);
    assert_eq!(frames[0].position.y(), 0.0);

    let peak = frames
        .iter()
        .map(|f| f.position.y())
        .fold(f32::MIN, f32::max);
    assert!((peak - 144.0).abs() < 1e-2, "peak was {peak}");

    // Airborne for thirty ticks after take-off.
    assert!(frames[29].position.y() > 0.0);
    assert_eq!(frames[30].phase, MotionPhase::Grounded);
    assert_eq!(frames[30].jumps_remaining, 2);
    assert!(frames[31..].iter().all(|f| f.position.y() == 0.0));
}

#[tokio::test]
async fn held_right_key_walks_into_wall() {
    let (cmd_tx, mut rx, handle) = spawn_session(limited(100));
    cmd_tx.send(SessionCommand::KeyPressed(VK_RIGHT)).unwrap();

    let frames = collect_frames(&mut rx).await;
    handle.await.unwrap();

    let xs: Vec<f32> = frames.iter().map(|f| f.position.x()).collect();
    assert!(xs.windows(2).all(|w| w[1] >= w[0]), "x should never decrease");
    assert_eq!(*xs.last().unwrap(), 490.0);
    assert_eq!(frames.last().unwrap().rect.x + 110, 600);
}

#[tokio::test]
async fn opposing_keys_hold_still() {
    let (cmd_tx, mut rx, handle) = spawn_session(limited(20));
    cmd_tx.send(SessionCommand::KeyPressed(VK_LEFT)).unwrap();
    cmd_tx.send(SessionCommand::KeyPressed(VK_RIGHT)).unwrap();

    let frames = collect_frames(&mut rx).await;
    handle.await.unwrap();
    assert!(frames.iter().all(|f| f.position.x() == 0.0));
}

#[tokio::test]
async fn stop_command_ends_session() {
    let (cmd_tx, mut rx, handle) = spawn_session(SessionConfig {
        game: fast_config(),
        max_ticks: None,
    });

    let first = tokio::time::timeout(RECV_TIMEOUT, rx.recv()).await.unwrap();
    assert!(matches!(first, Some(SessionBroadcast::Frame(_))));

    cmd_tx.send(SessionCommand::Stop).unwrap();
    let _ = collect_frames(&mut rx).await;
    tokio::time::timeout(RECV_TIMEOUT, handle)
        .await
        .expect("session should exit after Stop")
        .unwrap();
}

#[tokio::test]
async fn dropping_command_sender_ends_session() {
    let (cmd_tx, mut rx, handle) = spawn_session(SessionConfig {
        game: fast_config(),
        max_ticks: None,
    });
    drop(cmd_tx);

    let _ = collect_frames(&mut rx).await;
    tokio::time::timeout(RECV_TIMEOUT, handle)
        .await
        .expect("session should exit once input is gone")
        .unwrap();
}

#[tokio::test]
async fn unmapped_keys_do_not_disturb_state() {
    let (cmd_tx, mut rx, handle) = spawn_session(limited(5));
    cmd_tx.send(SessionCommand::KeyPressed(65)).unwrap();
    cmd_tx.send(SessionCommand::KeyReleased(9999)).unwrap();

    let frames = collect_frames(&mut rx).await;
    handle.await.unwrap();
    assert_eq!(frames.len(), 5);
    assert!(
        frames
            .iter()
            .all(|f| f.phase == MotionPhase::Grounded && f.position.x() == 0.0)
    );
}
