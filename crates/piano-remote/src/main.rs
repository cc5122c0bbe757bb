use piano_proto::rpc::RpcRequest;
use piano_remote::{connection, gateway::CommandGateway, monitor::Monitor, store::PlayerEvent};
use tokio::io::AsyncBufReadExt;
use tokio::sync::mpsc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let data_dir = piano_proto::platform::data_dir();
    std::fs::create_dir_all(&data_dir)?;
    let log_path = data_dir.join("piano-remote.log");

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    let config = piano_proto::config::Config::load().unwrap_or_default();

    let log_filter =
        std::env::var("RUST_LOG").unwrap_or_else(|_| config.log.filter.clone());
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(log_filter.as_str())
        .with_ansi(false)
        .init();

    eprintln!("piano-remote log: {}", log_path.display());
    info!("piano-remote starting, daemon at {}", config.server.ws_url());

    // ── Channels: pushes in, calls out ───────────────────────────────────────
    let (event_tx, event_rx) = mpsc::channel::<PlayerEvent>(256);
    let (call_tx, call_rx) = mpsc::channel::<RpcRequest>(64);

    // ── Connection task ──────────────────────────────────────────────────────
    tokio::spawn(connection::run(config.server.clone(), event_tx, call_rx));

    // ── Stdin commands → gateway ─────────────────────────────────────────────
    let gateway = CommandGateway::new(call_tx);
    spawn_stdin_commands(gateway);

    // ── Reconcile loop ───────────────────────────────────────────────────────
    let monitor = Monitor::new();
    tokio::select! {
        _ = monitor.run(event_rx) => {}
        _ = tokio::signal::ctrl_c() => info!("interrupted, shutting down"),
    }

    Ok(())
}

/// Minimal command reader: p = pause, r = resume, n = skip,
/// `s <idx>` = change station.
fn spawn_stdin_commands(gateway: CommandGateway) {
    tokio::spawn(async move {
        let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            match line.trim() {
                "" => {}
                "p" => gateway.pause(),
                "r" => gateway.resume(),
                "n" => gateway.skip(),
                cmd => {
                    if let Some(idx) = cmd.strip_prefix("s ").and_then(|s| s.parse().ok()) {
                        gateway.change_station(idx);
                    } else {
                        eprintln!("unknown command: {} (p/r/n/s <idx>)", cmd);
                    }
                }
            }
        }
    });
}
