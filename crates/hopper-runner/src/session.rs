use bytes::Bytes;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use hopper_core::config::HopperConfig;
use hopper_core::player::Player;
use hopper_core::protocol::encode_frame;

/// Commands sent from the input side to the tick loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    KeyPressed(u32),
    KeyReleased(u32),
    Stop,
}

/// Messages sent from the tick loop to the renderer.
#[derive(Debug, Clone)]
pub enum SessionBroadcast {
    /// MessagePack-encoded [`hopper_core::render::Frame`].
    ///
    /// Frames leave the loop already in wire format so the same bytes can be
    /// handed to a renderer in another process. In-process consumers decode
    /// them with [`hopper_core::protocol::decode_frame`].
    Frame(Bytes),
    /// The loop has exited.
    Ended,
}

/// Configuration for a spawned session.
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    pub game: HopperConfig,
    /// End the session after this many ticks. `None` runs until stopped.
    pub max_ticks: Option<u64>,
}

/// Spawn the tick loop as a tokio task.
/// Returns the command sender, broadcast receiver and task handle.
pub fn spawn_session(
    config: SessionConfig,
) -> (
    mpsc::UnboundedSender<SessionCommand>,
    mpsc::UnboundedReceiver<SessionBroadcast>,
    JoinHandle<()>,
) {
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
    let (broadcast_tx, broadcast_rx) = mpsc::unbounded_channel();

    let handle = tokio::spawn(async move {
        run_tick_loop(config, cmd_rx, broadcast_tx).await;
    });

    (cmd_tx, broadcast_rx, handle)
}

/// Fixed-rate loop. The player is owned by this task, so key events and
/// ticks are serialized: a tick never observes a half-applied input change.
async fn run_tick_loop(
    config: SessionConfig,
    mut cmd_rx: mpsc::UnboundedReceiver<SessionCommand>,
    broadcast_tx: mpsc::UnboundedSender<SessionBroadcast>,
) {
    let game = config.game;
    let mut player = Player::new(&game);

    // Late ticks are not made up: every tick is one unit of simulated time.
    let mut interval = tokio::time::interval(game.tick_interval());
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut tick: u64 = 0;
    tracing::debug!(interval_ms = game.tick_interval_ms, "Session started");

    loop {
        tokio::select! {
            biased;

            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(SessionCommand::KeyPressed(code)) => player.handle_key_pressed(code),
                    Some(SessionCommand::KeyReleased(code)) => player.handle_key_released(code),
                    Some(SessionCommand::Stop) | None => break,
                }
            }
            _ = interval.tick() => {
                tick += 1;
                player.on_tick();

                let frame = player.frame(tick, &game);
                match encode_frame(&frame) {
                    Ok(data) => {
                        if broadcast_tx.send(SessionBroadcast::Frame(Bytes::from(data))).is_err() {
                            tracing::debug!(tick, "Renderer gone, stopping session");
                            break;
                        }
                    },
                    Err(e) => tracing::error!(tick, error = %e, "Failed to encode frame"),
                }

                if config.max_ticks.is_some_and(|max| tick >= max) {
                    break;
                }
            }
        }
    }

    tracing::debug!(ticks = tick, "Session ended");
    let _ = broadcast_tx.send(SessionBroadcast::Ended);
}
