//! Transport capability

use tokio::sync::mpsc;

use crate::TransportError;

/// Fire-and-forget outbound channel.
///
/// `send` must not block; delivery is not acknowledged.
pub trait Transport: Send {
    /// Whether a channel is currently open
    fn is_open(&self) -> bool;

    /// Hand a serialized payload to the channel
    fn send(&self, payload: String) -> Result<(), TransportError>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn is_open(&self) -> bool {
        (**self).is_open()
    }

    fn send(&self, payload: String) -> Result<(), TransportError> {
        (**self).send(payload)
    }
}

/// Transport that forwards payloads to an in-process channel
pub struct ChannelTransport {
    sender: mpsc::Sender<String>,
}

impl ChannelTransport {
    /// Create a transport and the receiving end of its channel
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<String>) {
        let (sender, receiver) = mpsc::channel(capacity);
        (Self { sender }, receiver)
    }
}

impl Transport for ChannelTransport {
    fn is_open(&self) -> bool {
        !self.sender.is_closed()
    }

    fn send(&self, payload: String) -> Result<(), TransportError> {
        self.sender.try_send(payload).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => TransportError::Full,
            mpsc::error::TrySendError::Closed(_) => TransportError::Closed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_transport_delivers() {
        let (transport, mut rx) = ChannelTransport::channel(4);
        assert!(transport.is_open());

        transport.send("hello".to_string()).unwrap();
        assert_eq!(rx.try_recv().unwrap(), "hello");
    }

    #[test]
    fn test_closed_after_receiver_dropped() {
        let (transport, rx) = ChannelTransport::channel(4);
        drop(rx);

        assert!(!transport.is_open());
        assert!(matches!(
            transport.send("x".to_string()),
            Err(TransportError::Closed)
        ));
    }

    #[test]
    fn test_full_queue_reported() {
        let (transport, _rx) = ChannelTransport::channel(1);
        transport.send("a".to_string()).unwrap();
        assert!(matches!(
            transport.send("b".to_string()),
            Err(TransportError::Full)
        ));
    }

    #[test]
    fn test_boxed_transport() {
        let (transport, mut rx) = ChannelTransport::channel(1);
        let boxed: Box<dyn Transport> = Box::new(transport);

        assert!(boxed.is_open());
        boxed.send("boxed".to_string()).unwrap();
        assert_eq!(rx.try_recv().unwrap(), "boxed");
    }
}
