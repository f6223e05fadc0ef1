use std::sync::Arc;

use photon_replica_monitor::{
    ReplicaMonitor, StatusPoller, StatusPresenter, StatusView, health,
};
use url::Url;

/// Minimal presenter that writes the status page content to stdout.
struct StdoutPresenter;

impl StatusPresenter for StdoutPresenter {
    fn loading(&self, active: bool) {
        if active {
            println!("(refreshing...)");
        }
    }

    fn render(&self, view: &StatusView) {
        println!("replica set: {}", view.status.replica_set_name);
        println!("{}", view.summary.headline());
        for member in &view.status.members {
            println!(
                "  {:<24} {:<12} uptime: {:<12} ping: {}",
                member.name,
                member.state.display_name(),
                health::format_uptime(member.uptime),
                health::format_ping(member),
            );
        }
    }

    fn render_error(&self, message: &str) {
        println!("failed to load replica set status: {message}");
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing for better logging
    tracing_subscriber::fmt::init();

    let endpoint = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "http://localhost:5000/api/replicaset/status".to_string());
    let monitor = ReplicaMonitor::new(Url::parse(&endpoint)?);

    let poller = StatusPoller::new(monitor, Arc::new(StdoutPresenter));
    poller.start().await;

    println!("Watching {endpoint}. Press Ctrl+C to stop...");
    tokio::signal::ctrl_c().await?;

    poller.shutdown().await;
    Ok(())
}
