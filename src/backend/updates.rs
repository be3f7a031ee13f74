use std::{
    sync::{mpsc::Sender, Arc},
    time::Duration,
};

use tokio::{
    runtime::Handle,
    sync::watch,
    time::{self, MissedTickBehavior},
};

use crate::{domain::events::AppEvent, usecases::contracts::RoomActivityWatcher};

use super::SupabaseApi;

const ROOM_MONITOR_STARTED: &str = "ROOM_MONITOR_STARTED";
const ROOM_MONITOR_STOPPED: &str = "ROOM_MONITOR_STOPPED";
const ROOM_MONITOR_POLL_FAILED: &str = "ROOM_MONITOR_POLL_FAILED";
const ROOM_MONITOR_SIGNAL_SEND_FAILED: &str = "ROOM_MONITOR_SIGNAL_SEND_FAILED";

/// Polls the open room's newest message id and reports changes as
/// `AppEvent::RoomActivity`. One room at a time; watching another room
/// replaces the previous poll task.
#[derive(Debug)]
pub struct RoomActivityMonitor {
    handle: Handle,
    api: Arc<SupabaseApi>,
    event_tx: Sender<AppEvent>,
    poll_interval: Duration,
    stop_tx: Option<watch::Sender<bool>>,
}

impl RoomActivityMonitor {
    pub fn new(
        handle: Handle,
        api: Arc<SupabaseApi>,
        event_tx: Sender<AppEvent>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            handle,
            api,
            event_tx,
            poll_interval,
            stop_tx: None,
        }
    }
}

impl RoomActivityWatcher for RoomActivityMonitor {
    fn watch(&mut self, room_id: &str) {
        self.stop();

        let (stop_tx, stop_rx) = watch::channel(false);
        self.handle.spawn(run_monitor(
            Arc::clone(&self.api),
            room_id.to_owned(),
            self.poll_interval,
            self.event_tx.clone(),
            stop_rx,
        ));
        self.stop_tx = Some(stop_tx);

        tracing::info!(code = ROOM_MONITOR_STARTED, room_id, "room activity monitor started");
    }

    fn stop(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(true);
        }
    }
}

impl Drop for RoomActivityMonitor {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run_monitor(
    api: Arc<SupabaseApi>,
    room_id: String,
    poll_interval: Duration,
    event_tx: Sender<AppEvent>,
    mut stop_rx: watch::Receiver<bool>,
) {
    let mut ticker = time::interval(poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut tracker = NewestMessageTracker::default();

    loop {
        tokio::select! {
            changed = stop_rx.changed() => {
                if changed.is_err() || *stop_rx.borrow() {
                    tracing::info!(code = ROOM_MONITOR_STOPPED, room_id = %room_id, "room activity monitor stopped");
                    return;
                }
            }
            _ = ticker.tick() => {
                match api.latest_message_id(&room_id).await {
                    Ok(latest) => {
                        if !tracker.observe(latest) {
                            continue;
                        }
                        tracing::debug!(room_id = %room_id, "new message observed by room monitor");
                        let event = AppEvent::RoomActivity { room_id: room_id.clone() };
                        if let Err(error) = event_tx.send(event) {
                            tracing::warn!(
                                code = ROOM_MONITOR_SIGNAL_SEND_FAILED,
                                error = %error,
                                "room monitor failed to signal the UI loop"
                            );
                            return;
                        }
                    }
                    Err(error) => {
                        tracing::warn!(
                            code = ROOM_MONITOR_POLL_FAILED,
                            error = %error,
                            "room monitor poll failed; keeping monitor alive"
                        );
                    }
                }
            }
        }
    }
}

/// Remembers the newest id seen. The first observation is the baseline and
/// never counts as activity.
#[derive(Debug, Default)]
struct NewestMessageTracker {
    baseline: Option<Option<String>>,
}

impl NewestMessageTracker {
    fn observe(&mut self, latest: Option<String>) -> bool {
        match self.baseline.replace(latest.clone()) {
            None => false,
            Some(previous) => previous != latest,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_observation_is_baseline() {
        let mut tracker = NewestMessageTracker::default();

        assert!(!tracker.observe(Some("m1".to_owned())));
        assert!(!tracker.observe(Some("m1".to_owned())));
    }

    #[test]
    fn new_newest_id_is_activity() {
        let mut tracker = NewestMessageTracker::default();
        tracker.observe(None);

        assert!(tracker.observe(Some("m1".to_owned())));
        assert!(!tracker.observe(Some("m1".to_owned())));
        assert!(tracker.observe(Some("m2".to_owned())));
    }
}
