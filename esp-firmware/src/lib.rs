// Library-Root: Wiederverwendbare Logik und Module
// Keine Standard-Bibliothek (Embedded System)
#![no_std]

// Module
pub mod config;
pub mod hal;
pub mod tasks;
pub mod web;

// Re-exports von esp-core
pub use esp_core::{
    ActionReply, Actuator, Device, DeviceEvent, DeviceRegistry, DispatchError, MotorOrientation,
    NameString, OutMode, RollerBlinds,
};

// Embassy Channel-Typen
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::channel::{Channel, Receiver, Sender};
use embassy_sync::pubsub::{PubSubChannel, Publisher, Subscriber};

/// Parameter eines Invoke-Requests (bounded, ein Parameter pro Request)
pub type ParamString = heapless::String<64>;

/// Invoke-Request vom HTTP-Task an die Geräte-Loop
///
/// Trägt die drei String-Felder des Wire-Formats in owned Form, damit
/// die Nachricht den Request-Buffer des HTTP-Tasks überleben kann.
#[derive(Debug, Clone)]
pub struct InvokeRequest {
    pub device: NameString,
    pub action: NameString,
    pub parameter: ParamString,
}

/// Ergebnis eines Dispatches, zurück an den HTTP-Task
pub type InvokeOutcome = Result<ActionReply, DispatchError>;

// ============================================================================
// Type-Aliase für Channel-Typen
// ============================================================================
//
// Diese Type-Aliase vereinfachen die Lesbarkeit der Funktionssignaturen.
// Statt:  Sender<'static, NoopRawMutex, InvokeRequest, 1>
// Nutze:  InvokeRequestSender

/// Channel für Invoke-Requests (HTTP → Geräte-Loop)
/// - 1: Nachrichten-Kapazität (höchstens ein Request in flight)
pub type InvokeRequestChannel = Channel<NoopRawMutex, InvokeRequest, 1>;

/// Sender für Invoke-Requests (HTTP-Task)
pub type InvokeRequestSender = Sender<'static, NoopRawMutex, InvokeRequest, 1>;

/// Receiver für Invoke-Requests (Geräte-Loop empfängt)
pub type InvokeRequestReceiver = Receiver<'static, NoopRawMutex, InvokeRequest, 1>;

/// Channel für Invoke-Antworten (Geräte-Loop → HTTP)
/// Kapazität 1, gekoppelt an den Request-Channel
pub type InvokeReplyChannel = Channel<NoopRawMutex, InvokeOutcome, 1>;

/// Sender für Invoke-Antworten (Geräte-Loop)
pub type InvokeReplySender = Sender<'static, NoopRawMutex, InvokeOutcome, 1>;

/// Receiver für Invoke-Antworten (HTTP-Task empfängt)
pub type InvokeReplyReceiver = Receiver<'static, NoopRawMutex, InvokeOutcome, 1>;

/// PubSubChannel für Geräte-Event-Broadcasts
/// - 2: Nachrichten-Kapazität im Queue
/// - 4: Maximale Anzahl Subscribers (1 MQTT + Reserve)
/// - 1: Publish WaitResult Slots
pub type DeviceEventChannel = PubSubChannel<NoopRawMutex, DeviceEvent, 2, 4, 1>;

/// Publisher für Geräte-Events (Geräte-Loop)
pub type DeviceEventPublisher = Publisher<'static, NoopRawMutex, DeviceEvent, 2, 4, 1>;

/// Subscriber für Geräte-Events (MQTT-Task)
pub type DeviceEventSubscriber = Subscriber<'static, NoopRawMutex, DeviceEvent, 2, 4, 1>;
