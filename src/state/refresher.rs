use crate::state::messages::NetworkRequest;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::interval;

/// Periodic event-list refresh — every 60 seconds. Registrations close and
/// events fill up while the app is open; only the list is refreshed, local
/// draft edits are never touched.
pub struct PeriodicRefresher {
    network_requests: mpsc::Sender<NetworkRequest>,
}

impl PeriodicRefresher {
    pub fn new(network_requests: mpsc::Sender<NetworkRequest>) -> Self {
        Self { network_requests }
    }

    pub async fn run(self) {
        let mut events_interval = interval(Duration::from_secs(60));
        // Skip the immediate first tick so startup loading isn't double-triggered.
        events_interval.tick().await;

        loop {
            events_interval.tick().await;
            let _ = self.network_requests.send(NetworkRequest::LoadEvents).await;
        }
    }
}
