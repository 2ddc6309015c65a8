//! Foreground/background signal

use std::sync::Mutex;
use tokio::sync::broadcast;

/// Visibility of the client window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Hidden,
    /// Any state the shell reports that is neither (e.g. prerender)
    Other,
}

/// Source of visibility changes
pub trait VisibilitySource: Send + Sync {
    /// Visibility right now
    fn current(&self) -> Visibility;

    /// Stream of visibility changes, one item per change event
    fn subscribe(&self) -> broadcast::Receiver<Visibility>;
}

/// Visibility source fed by the host's change handler
#[derive(Debug)]
pub struct VisibilityChannel {
    current: Mutex<Visibility>,
    events: broadcast::Sender<Visibility>,
}

impl VisibilityChannel {
    pub fn new(initial: Visibility) -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            current: Mutex::new(initial),
            events,
        }
    }

    /// Record a change event. Every call is delivered to subscribers, even
    /// when the state did not change.
    pub fn set(&self, visibility: Visibility) {
        *self.current.lock().unwrap_or_else(|p| p.into_inner()) = visibility;
        // No receivers is fine: nothing is listening yet
        let _ = self.events.send(visibility);
    }
}

impl VisibilitySource for VisibilityChannel {
    fn current(&self) -> Visibility {
        *self.current.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn subscribe(&self) -> broadcast::Receiver<Visibility> {
        self.events.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_channel_delivers_each_event() {
        let channel = VisibilityChannel::new(Visibility::Visible);
        let mut rx = channel.subscribe();

        channel.set(Visibility::Hidden);
        channel.set(Visibility::Hidden);

        assert_eq!(rx.recv().await.unwrap(), Visibility::Hidden);
        assert_eq!(rx.recv().await.unwrap(), Visibility::Hidden);
        assert_eq!(channel.current(), Visibility::Hidden);
    }
}
