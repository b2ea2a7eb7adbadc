//! MQTT publish notifier.

use std::time::{Duration, SystemTime};

use rumqttc::{Client, Event, MqttOptions, Outgoing, Packet, QoS};

use super::{NotifyError, Notifier, change_message};

/// Channel capacity for the rumqttc request queue; one publish and one
/// disconnect is all that ever goes through it.
const REQUEST_QUEUE_CAP: usize = 10;

/// Notifier that publishes the change message to an MQTT topic.
///
/// Each notification opens a fresh connection under a newly generated
/// client id, publishes at QoS 2, waits for the exactly-once handshake
/// to complete and disconnects. The synchronous `rumqttc` client runs on
/// the blocking pool; nothing else happens concurrently anyway.
#[derive(Debug, Clone)]
pub struct MqttNotifier {
    host: String,
    port: u16,
    topic: String,
}

impl MqttNotifier {
    /// Creates a notifier publishing to `topic` on the broker at
    /// `host:port`.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16, topic: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port,
            topic: topic.into(),
        }
    }

    /// Returns the configured topic.
    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }
}

/// Generates a client id unique enough for a one-shot session.
pub(super) fn generated_client_id() -> String {
    let nanos = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .subsec_nanos();
    format!("da-ddns-{}-{nanos}", std::process::id())
}

/// Connects, publishes at QoS 2, waits for completion, disconnects.
fn publish_blocking(
    host: &str,
    port: u16,
    topic: &str,
    payload: String,
) -> Result<(), NotifyError> {
    let mut options = MqttOptions::new(generated_client_id(), host, port);
    options.set_keep_alive(Duration::from_secs(5));

    let (client, mut connection) = Client::new(options, REQUEST_QUEUE_CAP);
    client.publish(topic, QoS::ExactlyOnce, false, payload)?;

    // Drive the connection until the QoS 2 handshake finishes (PUBCOMP
    // from the broker), then tear the link down.
    for event in connection.iter() {
        match event {
            Ok(Event::Incoming(Packet::PubComp(_))) => client.disconnect()?,
            Ok(Event::Outgoing(Outgoing::Disconnect)) => break,
            Ok(_) => {}
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}

impl Notifier for MqttNotifier {
    async fn notify(&self, old_ip: &str, new_ip: &str) -> Result<(), NotifyError> {
        let host = self.host.clone();
        let port = self.port;
        let topic = self.topic.clone();
        let payload = change_message(old_ip, new_ip);

        let result = tokio::task::spawn_blocking(move || {
            publish_blocking(&host, port, &topic, payload)
        })
        .await
        .expect("MQTT publish task panicked");

        if result.is_ok() {
            tracing::info!("Message sent to MQTT topic {}", self.topic);
        }
        result
    }
}
