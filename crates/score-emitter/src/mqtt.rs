//! MQTT transport
//!
//! Connection state is tracked from the MQTT event loop, which also owns
//! reconnection. Publishing never blocks the caller.

use rumqttc::{AsyncClient, ConnectionError, Event, MqttOptions, Packet, QoS};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::transport::Transport;
use crate::TransportError;

/// MQTT connection configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MqttConfig {
    /// Broker host name
    pub broker_host: String,
    /// Broker port
    pub broker_port: u16,
    /// Keep-alive interval (seconds)
    pub keep_alive_secs: u64,
    /// Delay before the event loop retries after a connection error (milliseconds)
    pub reconnect_delay_ms: u64,
    /// Outgoing request queue capacity
    pub queue_capacity: usize,
}

impl Default for MqttConfig {
    fn default() -> Self {
        Self {
            broker_host: "localhost".to_string(),
            broker_port: 1883,
            keep_alive_secs: 30,
            reconnect_delay_ms: 2000,
            queue_capacity: 16,
        }
    }
}

/// Topic that scores for a subject are published to
pub fn score_topic(subject_id: &str) -> String {
    format!("subjects/{}/attention", subject_id)
}

/// Publishes score messages to `subjects/{subject_id}/attention`
pub struct MqttTransport {
    client: AsyncClient,
    topic: String,
    connected: Arc<AtomicBool>,
    event_loop: JoinHandle<()>,
}

impl MqttTransport {
    /// Start the MQTT client for a subject. Must be called within a tokio runtime.
    ///
    /// Returns immediately; the transport reports closed until the broker
    /// acknowledges the connection.
    pub fn start(config: &MqttConfig, subject_id: &str) -> Self {
        let mut options = MqttOptions::new(
            format!("attention-{}", subject_id),
            &config.broker_host,
            config.broker_port,
        );
        options.set_keep_alive(Duration::from_secs(config.keep_alive_secs));

        let (client, mut eventloop) = AsyncClient::new(options, config.queue_capacity);
        let connected = Arc::new(AtomicBool::new(false));

        let flag = Arc::clone(&connected);
        let retry_delay = Duration::from_millis(config.reconnect_delay_ms);
        let broker = format!("{}:{}", config.broker_host, config.broker_port);

        let event_loop = tokio::spawn(async move {
            loop {
                match eventloop.poll().await {
                    Ok(event) => {
                        if let Some(open) = connection_change(&event) {
                            if flag.swap(open, Ordering::SeqCst) != open {
                                if open {
                                    info!("Connected to MQTT broker: {}", broker);
                                } else {
                                    warn!("MQTT broker closed the connection: {}", broker);
                                }
                            }
                        }
                    }
                    Err(e) => {
                        if flag.swap(false, Ordering::SeqCst) {
                            warn!("MQTT connection lost: {}", e);
                        } else if !matches!(e, ConnectionError::RequestsDone) {
                            debug!("MQTT connect attempt failed: {}", e);
                        }
                        tokio::time::sleep(retry_delay).await;
                    }
                }
            }
        });

        Self {
            client,
            topic: score_topic(subject_id),
            connected,
            event_loop,
        }
    }

    /// Topic this transport publishes to
    pub fn topic(&self) -> &str {
        &self.topic
    }
}

/// Map an MQTT event to a connection-state change, if it is one
fn connection_change(event: &Event) -> Option<bool> {
    match event {
        Event::Incoming(Packet::ConnAck(_)) => Some(true),
        Event::Incoming(Packet::Disconnect) => Some(false),
        _ => None,
    }
}

impl Transport for MqttTransport {
    fn is_open(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn send(&self, payload: String) -> Result<(), TransportError> {
        self.client
            .try_publish(&self.topic, QoS::AtMostOnce, false, payload)
            .map_err(|e| TransportError::Publish(e.to_string()))
    }
}

impl Drop for MqttTransport {
    fn drop(&mut self) {
        self.event_loop.abort();
    }
}
