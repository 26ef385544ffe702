// MQTT Task - Published Geräte-Events an MQTT Broker
use defmt::{Debug2Format, error, info, warn};
use embassy_net::{IpAddress, Stack, dns::DnsQueryType, tcp::TcpSocket};
use embassy_time::{Duration, Timer, with_timeout};

use rust_mqtt::client::client::MqttClient;
use rust_mqtt::client::client_config::{ClientConfig, MqttVersion};
use rust_mqtt::packet::v5::publish_packet::QualityOfService;
use rust_mqtt::utils::rng_generator::CountingRng;
use rust_mqtt::utils::types::EncodedString;

use crate::DeviceEventSubscriber;
use crate::config::*;

/// MQTT Task - läuft parallel zu anderen Tasks
///
/// Dieser Task übernimmt das Event-Publishing:
/// - Wartet auf Netzwerk-Verbindung
/// - Verbindet sich mit MQTT Broker
/// - Empfängt Geräte-Events via PubSubChannel
/// - Published jedes Event **sofort** als JSON (event-basiert)
/// - Automatisches Reconnect bei Fehlern
///
/// # Parameter
/// - `stack`: embassy-net Stack für Netzwerk-Zugriff
/// - `event_subscriber`: PubSub Subscriber für Geräte-Events
#[embassy_executor::task]
pub async fn mqtt_task(stack: &'static Stack<'static>, mut event_subscriber: DeviceEventSubscriber) {
    info!("MQTT: Task started, waiting for network...");
    wait_for_network(stack).await;
    info!("MQTT: Network ready");

    loop {
        match mqtt_connect_and_publish(stack, &mut event_subscriber).await {
            Ok(_) => warn!("MQTT: Connection closed normally"),
            Err(e) => error!("MQTT: Error: {}", e),
        }
        info!("MQTT: Reconnecting in {}s...", MQTT_RECONNECT_DELAY_SECS);
        Timer::after(Duration::from_secs(MQTT_RECONNECT_DELAY_SECS)).await;
    }
}

/// Wartet bis Netzwerk-Verbindung verfügbar ist
///
/// Prüft kontinuierlich Link-Status und DHCP-Konfiguration.
async fn wait_for_network(stack: &'static Stack<'static>) {
    loop {
        if stack.is_link_up() {
            if let Some(_) = stack.config_v4() {
                break;
            }
        }
        Timer::after(Duration::from_millis(500)).await;
    }
}

/// Verbindet mit MQTT Broker und published Geräte-Events
///
/// Diese Funktion übernimmt den kompletten MQTT-Lifecycle:
/// 1. DNS-Auflösung des Broker-Hostnames
/// 2. TCP-Verbindung aufbauen
/// 3. MQTT CONNECT senden
/// 4. Geräte-Events empfangen und als JSON publishen
///
/// Bei jedem Fehler wird die Funktion beendet und der Haupt-Loop
/// startet automatisch einen Reconnect-Versuch.
async fn mqtt_connect_and_publish(
    stack: &'static Stack<'static>,
    event_subscriber: &mut DeviceEventSubscriber,
) -> Result<(), MqttError> {
    // DNS Lookup
    info!("MQTT: Resolving '{}'...", MQTT_BROKER);
    let broker_ip = resolve_hostname(stack, MQTT_BROKER).await?;
    info!("MQTT: Resolved to {}", Debug2Format(&broker_ip));

    // TCP Connect
    let mut rx_buffer = [0u8; 4096];
    let mut tx_buffer = [0u8; 4096];
    let mut socket = TcpSocket::new(*stack, &mut rx_buffer, &mut tx_buffer);
    socket.set_timeout(Some(Duration::from_secs(10)));

    socket
        .connect((broker_ip, MQTT_PORT))
        .await
        .map_err(|_| MqttError::ConnectionFailed)?;
    info!("MQTT: TCP connected");

    // MQTT Client Configuration
    let rng = CountingRng(20000);
    let mut config = ClientConfig::<5, _>::new(MqttVersion::MQTTv5, rng);
    config.client_id = EncodedString {
        string: MQTT_CLIENT_ID,
        len: MQTT_CLIENT_ID.len() as u16,
    };
    config.keep_alive = 30;
    config.max_packet_size = MQTT_BUFFER_SIZE as u32;

    // MQTT Buffer
    let mut send_buffer = [0u8; MQTT_BUFFER_SIZE];
    let mut recv_buffer = [0u8; MQTT_BUFFER_SIZE];

    // MQTT Client erstellen
    let mut client = MqttClient::<_, 5, _>::new(
        socket,
        &mut send_buffer,
        MQTT_BUFFER_SIZE,
        &mut recv_buffer,
        MQTT_BUFFER_SIZE,
        config,
    );

    // MQTT CONNECT
    client
        .connect_to_broker()
        .await
        .map_err(|_| MqttError::ProtocolError)?;
    info!("MQTT: Connected to broker");

    // Publish Loop - Event-basiert
    // Wartet blockierend auf neue Geräte-Events und published diese sofort
    loop {
        // Warte auf nächstes Event (blockiert bis Broadcast kommt)
        let event = event_subscriber.next_message_pure().await;
        info!(
            "MQTT: Event {}.{} -> '{}', publishing...",
            event.device.as_str(),
            event.action.as_str(),
            event.reply.as_str()
        );

        // Event als JSON serialisieren
        let mut json_buffer = [0u8; MQTT_BUFFER_SIZE];
        let len = serde_json_core::to_slice(&event, &mut json_buffer)
            .map_err(|_| MqttError::SerializeFailed)?;

        client
            .send_message(
                MQTT_TOPIC_EVENTS,
                &json_buffer[..len],
                QualityOfService::QoS0,
                false,
            )
            .await
            .map_err(|_| MqttError::PublishFailed)?;

        info!("MQTT: Published {} bytes", len);
    }
}

/// Löst Hostname zu IPv4-Adresse auf
///
/// Nutzt embassy-net DNS-Stack mit konfigurierbarem Timeout.
async fn resolve_hostname(
    stack: &'static Stack<'static>,
    hostname: &str,
) -> Result<embassy_net::Ipv4Address, MqttError> {
    let result = with_timeout(
        Duration::from_secs(DNS_TIMEOUT_SECS),
        stack.dns_query(hostname, DnsQueryType::A),
    )
    .await;

    match result {
        Ok(Ok(addrs)) => {
            for addr in addrs {
                if let IpAddress::Ipv4(ipv4) = addr {
                    return Ok(ipv4);
                }
            }
            Err(MqttError::DnsResolutionFailed)
        }
        Ok(Err(_)) => Err(MqttError::DnsResolutionFailed),
        Err(_) => Err(MqttError::DnsTimeout),
    }
}

/// MQTT Fehler-Typen
///
/// Alle möglichen Fehler die während MQTT-Operationen auftreten können.
#[derive(Debug)]
enum MqttError {
    DnsResolutionFailed,
    DnsTimeout,
    ConnectionFailed,
    ProtocolError,
    SerializeFailed,
    PublishFailed,
}

impl defmt::Format for MqttError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            MqttError::DnsResolutionFailed => defmt::write!(fmt, "DNS failed"),
            MqttError::DnsTimeout => defmt::write!(fmt, "DNS timeout"),
            MqttError::ConnectionFailed => defmt::write!(fmt, "Connection failed"),
            MqttError::ProtocolError => defmt::write!(fmt, "Protocol error"),
            MqttError::SerializeFailed => defmt::write!(fmt, "Serialize failed"),
            MqttError::PublishFailed => defmt::write!(fmt, "Publish failed"),
        }
    }
}
