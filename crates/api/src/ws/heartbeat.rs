use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::ws::manager::WsManager;

/// Interval between heartbeat pings (in seconds).
const HEARTBEAT_INTERVAL_SECS: u64 = 30;

/// Spawn a background task that sends periodic Ping frames to all connected
/// WebSocket clients until `cancel` fires.
pub fn start_heartbeat(
    ws_manager: Arc<WsManager>,
    cancel: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(HEARTBEAT_INTERVAL_SECS));

        loop {
            tokio::select! {
                () = cancel.cancelled() => {
                    tracing::debug!("Heartbeat cancelled");
                    break;
                }
                _ = interval.tick() => {
                    let count = ws_manager.connection_count().await;
                    tracing::debug!(count, "WebSocket heartbeat ping");
                    ws_manager.ping_all().await;
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use axum::extract::ws::Message;

    use super::*;

    #[tokio::test]
    async fn pings_connections_and_stops_on_cancel() {
        let manager = Arc::new(WsManager::new());
        let mut rx = manager.add("conn-1".to_string(), 1).await;
        let cancel = CancellationToken::new();

        let handle = start_heartbeat(Arc::clone(&manager), cancel.clone());

        // The first interval tick fires immediately.
        assert!(matches!(rx.recv().await, Some(Message::Ping(_))));

        cancel.cancel();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("heartbeat should stop")
            .unwrap();
    }
}
