//! Input Adapters
//!
//! Touch panels, shake detectors and network handlers run on their own
//! schedules. Instead of calling into the engine from wherever they happen to
//! be, they post [`InputEvent`]s to a bounded channel that the scheduler
//! drains between frames, so input is applied in arrival order and never
//! races a frame for the state lock.

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::command::Command;

/// Something that happened outside the engine
#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
    /// Touch panel sample in display pixels
    Touch { pressed: bool, x: f32, y: f32 },
    /// Shake detected by the accelerometer
    Shake { intensity: f32 },
    /// Display command from the network
    Command(Command),
}

/// Producer side of the input channel
///
/// Sending never blocks: when the channel is full the event is dropped.
#[derive(Clone, Debug)]
pub struct InputSender {
    tx: mpsc::Sender<InputEvent>,
}

impl InputSender {
    /// Queue an event; returns `false` if it was dropped
    pub fn send(&self, event: InputEvent) -> bool {
        match self.tx.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(event)) => {
                tracing::warn!(?event, "Input channel full, dropping event");
                false
            }
            Err(TrySendError::Closed(_)) => {
                tracing::debug!("Input channel closed");
                false
            }
        }
    }

    pub fn touch(&self, pressed: bool, x: f32, y: f32) -> bool {
        self.send(InputEvent::Touch { pressed, x, y })
    }

    pub fn shake(&self, intensity: f32) -> bool {
        self.send(InputEvent::Shake { intensity })
    }

    pub fn command(&self, command: Command) -> bool {
        self.send(InputEvent::Command(command))
    }

    /// Parse and queue a JSON command
    ///
    /// Malformed JSON is logged and dropped.
    pub fn command_json(&self, json: &str) -> bool {
        match Command::parse(json) {
            Ok(command) => self.command(command),
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring malformed command");
                false
            }
        }
    }

    /// Whether the consumer is gone
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Consumer side of the input channel
#[derive(Debug)]
pub struct InputReceiver {
    rx: mpsc::Receiver<InputEvent>,
}

impl InputReceiver {
    /// Wait for the next event (`None` once every sender is gone)
    pub async fn recv(&mut self) -> Option<InputEvent> {
        self.rx.recv().await
    }

    /// Take an event if one is waiting
    pub fn try_recv(&mut self) -> Option<InputEvent> {
        self.rx.try_recv().ok()
    }
}

/// Create a bounded input channel
#[must_use]
pub fn input_channel(capacity: usize) -> (InputSender, InputReceiver) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (InputSender { tx }, InputReceiver { rx })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_full_channel_drops() {
        let (tx, mut rx) = input_channel(2);
        assert!(tx.shake(0.5));
        assert!(tx.touch(true, 1.0, 2.0));
        assert!(!tx.shake(1.0));

        assert_eq!(rx.try_recv(), Some(InputEvent::Shake { intensity: 0.5 }));
        assert_eq!(
            rx.try_recv(),
            Some(InputEvent::Touch {
                pressed: true,
                x: 1.0,
                y: 2.0
            })
        );
        assert_eq!(rx.try_recv(), None);
    }

    #[test]
    fn test_closed_channel() {
        let (tx, rx) = input_channel(4);
        drop(rx);
        assert!(tx.is_closed());
        assert!(!tx.shake(1.0));
    }

    #[test]
    fn test_command_json() {
        let (tx, mut rx) = input_channel(4);
        assert!(tx.command_json(r#"{"cmd":"blink"}"#));
        assert!(!tx.command_json("{"));
        assert_eq!(rx.try_recv(), Some(InputEvent::Command(Command::Blink)));
    }

    #[tokio::test]
    async fn test_recv_ends_when_senders_drop() {
        let (tx, mut rx) = input_channel(4);
        tx.shake(0.3);
        drop(tx);
        assert_eq!(rx.recv().await, Some(InputEvent::Shake { intensity: 0.3 }));
        assert_eq!(rx.recv().await, None);
    }
}
