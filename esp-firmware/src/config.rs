// Projekt-Konfiguration: Konstanten und Hardware-Zuordnungen
#![allow(dead_code)]

// ============================================================================
// Node-Identität
// ============================================================================

/// Versions-/Identitäts-String des Nodes
/// Wird auf version.rmi an Clients gemeldet
pub const NODE_VERSION: &str = concat!("esp-heimsteuerung v", env!("CARGO_PKG_VERSION"));

// ============================================================================
// Geräte-Konfiguration
// ============================================================================

/// Gerätename des Rollladens (eindeutig innerhalb der Registry)
pub const BLINDS_NAME: &str = "RollerBlinds-1";

/// Gerätename des geschalteten Ausgangs
pub const LIGHT_NAME: &str = "Light-1";

/// Tick-Intervall der Geräte-Loop in Millisekunden
/// Jeder Zyklus: höchstens einen Invoke-Request abarbeiten, dann jedes
/// lokale Gerät genau einmal ticken
pub const DEVICE_TICK_INTERVAL_MS: u64 = 2;

// ============================================================================
// Schrittmotor (Rollladen)
// ============================================================================

// Die GPIO-Zuordnung (Motor-Phasen, Relais, Status-LED) ist über die
// typisierten Peripherals in `tasks::node::node_task` festgelegt

/// Maximale Schrittrate in Schritten pro Sekunde
pub const STEPPER_MAX_SPEED: u32 = 500;

/// Beschleunigung in Schritten pro Sekunde²
pub const STEPPER_ACCELERATION: u32 = 50;

// ============================================================================
// Geschalteter Ausgang (Relais) & Status-LED
// ============================================================================

/// Helligkeits-Level für die Indikator-LED (0-255)
/// Wert ist gedimmt für Augenschonung
pub const LED_BRIGHTNESS: u8 = 10;

/// RMT Taktfrequenz in MHz
/// 80 MHz ist optimal für WS2812 LED-Timing
pub const RMT_CLOCK_MHZ: u32 = 80;

// ============================================================================
// Flash-Persistenz
// ============================================================================

/// Basis-Adresse der Geräte-Zustände im Flash
/// Liegt in der NVS-Partition der Standard-Partitionstabelle
pub const FLASH_STORE_BASE: u32 = 0x9000;

/// Speicher-Layout: Rollladen belegt 9 Bytes ab Offset 0
/// (down-position i32, last-known-position i32, open-pending u8)
pub const BLINDS_STORE_OFFSET: usize = 0;

/// Speicher-Layout: Aktor belegt 1 Byte
pub const LIGHT_STORE_OFFSET: usize = 16;

// ============================================================================
// WiFi Konfiguration
// ============================================================================

/// WiFi SSID (Netzwerk-Name)
/// Wird zur Build-Zeit aus der Environment Variable WIFI_SSID geladen
/// Setze diese in .env file (siehe .env.example)
pub const WIFI_SSID: &str = env!(
    "WIFI_SSID",
    "WiFi SSID nicht gesetzt! Erstelle .env file (siehe .env.example)"
);

/// WiFi Passwort
/// Wird zur Build-Zeit aus der Environment Variable WIFI_PASSWORD geladen
/// Setze diese in .env file (siehe .env.example)
pub const WIFI_PASSWORD: &str = env!(
    "WIFI_PASSWORD",
    "WiFi Password nicht gesetzt! Erstelle .env file (siehe .env.example)"
);

/// Heap-Größe für WiFi (Bytes)
/// WiFi benötigt dynamischen Speicher für Pakete
pub const WIFI_HEAP_SIZE: usize = 65536; // 64 KB

/// Zusätzliche Heap-Größe (Bytes)
pub const EXTRA_HEAP_SIZE: usize = 36864; // 36 KB

// Gesamt-Heap: ~100 KB für WiFi-Stack

// ============================================================================
// MQTT Konfiguration (Geräte-Event-Publishing)
// ============================================================================

/// MQTT Broker Hostname oder IP-Adresse
/// Wird zur Build-Zeit aus der Environment Variable MQTT_BROKER geladen
pub const MQTT_BROKER: &str = env!(
    "MQTT_BROKER",
    "MQTT Broker nicht gesetzt! Erstelle .env file (siehe .env.example)"
);

/// MQTT Broker Port
/// Standard: 1883 (unverschlüsselt), 8883 (TLS)
pub const MQTT_PORT: u16 = 1883;

/// MQTT Client ID - eindeutige Kennung für diesen Node
pub const MQTT_CLIENT_ID: &str = env!(
    "MQTT_CLIENT_ID",
    "MQTT Client ID nicht gesetzt! Erstelle .env file (siehe .env.example)"
);

/// MQTT Publish Topic für Geräte-Events
/// Jedes abgeschlossene Invoke wird hier als JSON-Event published
pub const MQTT_TOPIC_EVENTS: &str = env!(
    "MQTT_TOPIC_EVENTS",
    "MQTT Topic Events nicht gesetzt! Erstelle .env file (siehe .env.example)"
);

/// MQTT Reconnect Delay in Sekunden
/// Wartezeit nach Verbindungsfehler vor erneutem Versuch
pub const MQTT_RECONNECT_DELAY_SECS: u64 = 5;

/// MQTT Buffer-Größe in Bytes
/// Muss groß genug für MQTT-Pakete sein
pub const MQTT_BUFFER_SIZE: usize = 1024;

/// DNS Query Timeout in Sekunden
pub const DNS_TIMEOUT_SECS: u64 = 10;

// ============================================================================
// mDNS-Konfiguration
// ============================================================================

/// mDNS Hostname (ohne .local suffix)
/// Der Node wird erreichbar sein unter: <MDNS_HOSTNAME>.local
pub const MDNS_HOSTNAME: &str = "heim";

/// mDNS TTL (Time To Live) in Sekunden
/// Gibt an, wie lange andere Geräte die mDNS-Antwort cachen dürfen
pub const MDNS_TTL_SECS: u32 = 120;

/// mDNS Reconnect Delay in Sekunden
/// Wartezeit nach Fehler vor erneutem Versuch
pub const MDNS_RECONNECT_DELAY_SECS: u64 = 5;

/// mDNS Port (Standard: 5353)
/// Multicast DNS nutzt Port 5353 laut RFC 6762
pub const MDNS_PORT: u16 = 5353;

/// mDNS IPv4 Multicast-Adresse (224.0.0.251)
/// Standard mDNS Multicast-Gruppe laut RFC 6762
pub const MDNS_MULTICAST_ADDR: [u8; 4] = [224, 0, 0, 251];

/// UDP Buffer-Größen für mDNS (TX, RX in Bytes)
/// edge-nal-embassy benötigt Buffer für UDP-Pakete
pub const MDNS_UDP_BUFFER_SIZE: usize = 512;

/// mDNS Receive/Send Buffer-Größen in Bytes
/// 1500 Bytes = Standard MTU für Ethernet/WiFi
pub const MDNS_PACKET_BUFFER_SIZE: usize = 1500;

// ============================================================================
// HTTP Server Konfiguration (Invoke-Protokoll)
// ============================================================================

/// HTTP Server Port
pub const HTTP_PORT: u16 = 80;

/// HTTP Buffer-Größe in Bytes
/// Für HTTP Request/Response Headers und Body
pub const HTTP_BUFFER_SIZE: usize = 1024;

/// TCP RX Buffer-Größe in Bytes
/// Für eingehende TCP-Daten vom Client
pub const TCP_RX_BUFFER_SIZE: usize = 1024;

/// TCP TX Buffer-Größe in Bytes
/// Für ausgehende TCP-Daten zum Client
pub const TCP_TX_BUFFER_SIZE: usize = 1024;

/// Maximale Länge eines Invoke-Request-Bodies in Bytes
/// ["device-name","action-name","parameter"] bleibt deutlich darunter
pub const INVOKE_BODY_SIZE: usize = 256;

/// Timeout für eine Invoke-Antwort der Geräte-Loop in Millisekunden
/// Handler sind O(1); wenn hier nichts kommt, ist die Loop blockiert
pub const INVOKE_REPLY_TIMEOUT_MS: u64 = 500;
