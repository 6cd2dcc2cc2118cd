//! Notification backends for surfacing weather events.

use std::path::PathBuf;

use crate::WeatherEvent;

/// Destination for weather events.
///
/// Configure where the monitor should surface classification changes and
/// snapshots. The monitor never talks to clients directly; a notifier is the
/// seam through which the host observes it.
#[derive(Debug)]
pub enum Notifier {
    /// Write the latest snapshot to a JSON file.
    ///
    /// The file is overwritten on every polling cycle; only
    /// [`WeatherEvent::SnapshotReady`] events are written.
    File(PathBuf),

    /// Send every event through a channel.
    ///
    /// Use `Notifier::channel()` to create this variant and get the receiver.
    #[cfg(feature = "tokio")]
    Channel(tokio::sync::mpsc::Sender<WeatherEvent>),
}

impl Notifier {
    /// Create a file notifier.
    ///
    /// # Example
    ///
    /// ```rust
    /// use skywatch_sdk::Notifier;
    ///
    /// let notifier = Notifier::file("weather.json");
    /// ```
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Notifier::File(path.into())
    }

    /// Create a channel notifier and return both the notifier and receiver.
    ///
    /// # Example
    ///
    /// ```rust
    /// use skywatch_sdk::Notifier;
    ///
    /// let (notifier, mut rx) = Notifier::channel(16);
    ///
    /// // Later, receive events
    /// // while let Some(event) = rx.recv().await {
    /// //     println!("weather event: {event:?}");
    /// // }
    /// ```
    #[cfg(feature = "tokio")]
    pub fn channel(buffer: usize) -> (Self, tokio::sync::mpsc::Receiver<WeatherEvent>) {
        let (tx, rx) = tokio::sync::mpsc::channel(buffer);
        (Notifier::Channel(tx), rx)
    }

    /// Surface an event to this notifier.
    #[cfg(feature = "tokio")]
    pub(crate) async fn emit(&self, event: &WeatherEvent) -> std::io::Result<()> {
        match self {
            Notifier::File(path) => {
                if let WeatherEvent::SnapshotReady(snapshot) = event {
                    let json = serde_json::to_string_pretty(snapshot)?;
                    tokio::fs::write(path, json).await?;
                }
            }
            Notifier::Channel(tx) => {
                // Best effort send (don't block the poll loop if the host
                // stops draining).
                let _ = tx.try_send(event.clone());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skywatch_types::{ParamState, UpdateStatus, WeatherSnapshot};

    #[tokio::test]
    async fn channel_notifier_delivers_events() {
        let (notifier, mut rx) = Notifier::channel(4);
        let event = WeatherEvent::StatusChanged(ParamState::Alert);
        notifier.emit(&event).await.unwrap();

        assert_eq!(rx.recv().await.unwrap(), event);
    }

    #[tokio::test]
    async fn full_channel_drops_instead_of_blocking() {
        let (notifier, mut rx) = Notifier::channel(1);
        let first = WeatherEvent::CycleFinished(UpdateStatus::Ok);
        let second = WeatherEvent::CycleFinished(UpdateStatus::Alert);

        notifier.emit(&first).await.unwrap();
        notifier.emit(&second).await.unwrap(); // silently dropped

        assert_eq!(rx.recv().await.unwrap(), first);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn file_notifier_writes_latest_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weather.json");
        let notifier = Notifier::file(&path);

        // Non-snapshot events do not touch the file.
        notifier
            .emit(&WeatherEvent::StatusChanged(ParamState::Ok))
            .await
            .unwrap();
        assert!(!path.exists());

        let snapshot = WeatherSnapshot::builder()
            .timestamp_ms(99)
            .parameter("WEATHER_WIND_SPEED", |p| p.value(4.2))
            .build();
        notifier
            .emit(&WeatherEvent::SnapshotReady(snapshot.clone()))
            .await
            .unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let back: WeatherSnapshot = serde_json::from_str(&written).unwrap();
        assert_eq!(back, snapshot);
    }
}
