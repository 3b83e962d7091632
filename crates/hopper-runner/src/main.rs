use tokio::io::AsyncBufReadExt;
use tracing_subscriber::EnvFilter;

use hopper_core::config::HopperConfig;
use hopper_core::protocol::decode_frame;
use hopper_runner::script::{ScriptLine, parse_line};
use hopper_runner::session::{SessionBroadcast, SessionCommand, SessionConfig, spawn_session};
use hopper_runner::sink::{AsciiSink, FrameSink, LogSink};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = HopperConfig::load();
    let ascii = std::env::args().skip(1).any(|arg| arg == "--ascii");
    tracing::info!(
        tick_interval_ms = config.tick_interval_ms,
        viewport = ?config.viewport,
        "Hopper starting"
    );

    let (cmd_tx, mut frame_rx, session) = spawn_session(SessionConfig {
        game: config.clone(),
        max_ticks: None,
    });

    let viewport = config.viewport;
    let renderer = tokio::spawn(async move {
        let mut sink: Box<dyn FrameSink + Send> = if ascii {
            Box::new(AsciiSink::new(std::io::stdout(), viewport, 60, 20))
        } else {
            Box::new(LogSink)
        };
        while let Some(msg) = frame_rx.recv().await {
            match msg {
                SessionBroadcast::Frame(data) => match decode_frame(&data) {
                    Ok(frame) => sink.draw(&frame),
                    Err(e) => tracing::warn!(error = %e, "Dropping undecodable frame"),
                },
                SessionBroadcast::Ended => break,
            }
        }
    });

    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                tracing::error!(error = %e, "Failed to read stdin");
                break;
            },
        };
        match parse_line(&line, &config.keys) {
            Ok(ScriptLine::Key(cmd)) => {
                if cmd_tx.send(cmd).is_err() {
                    break;
                }
            },
            Ok(ScriptLine::Wait(ticks)) => {
                let ticks = u32::try_from(ticks).unwrap_or(u32::MAX);
                tokio::time::sleep(config.tick_interval().saturating_mul(ticks)).await;
            },
            Ok(ScriptLine::Quit) => break,
            Ok(ScriptLine::Blank) => {},
            Err(e) => tracing::warn!(line = %line, "Skipping input: {e}"),
        }
    }

    let _ = cmd_tx.send(SessionCommand::Stop);
    if let Err(e) = session.await {
        tracing::error!(error = %e, "Session task failed");
    }
    if let Err(e) = renderer.await {
        tracing::error!(error = %e, "Renderer task failed");
    }
    tracing::info!("Hopper stopped");
}
