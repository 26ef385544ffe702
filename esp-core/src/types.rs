//! Core Types für die Geräte-Steuerung
//!
//! Datenstrukturen ohne Hardware-Dependencies

use core::fmt::Write;
use heapless::String;

/// Maximale Länge einer Aktions-Antwort
///
/// Groß genug für das `dump`-JSON eines Rollladens mit Extremwerten.
pub const REPLY_CAPACITY: usize = 160;

/// Antwort eines Aktions-Handlers (bounded, kein Heap)
pub type ActionReply = String<REPLY_CAPACITY>;

/// Geräte- und Aktionsnamen (bounded, kein Heap)
pub type NameString = String<32>;

/// Fehler beim Ausführen einer Aktion auf einem bekannten Gerät
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionError {
    /// Der Aktionsname steht nicht in der Aktions-Tabelle der Geräteklasse
    UnknownAction,
}

/// Fehler beim Routing eines Invoke-Requests
///
/// Beides sind Client-Fehler: sie werden als Fehler-Antwort an den
/// Aufrufer gemeldet und sind nie fatal für den Node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchError {
    /// Kein registriertes Gerät trägt den angefragten Namen
    DeviceNotFound,
    /// Gerät gefunden, aber die Aktion ist unbekannt
    Action(ActionError),
}

/// Fehlertext einer Fehler-Antwort an den Aufrufer (bounded)
pub type ErrorReply = String<64>;

impl DispatchError {
    /// Formatiert den Fehlertext der Antwort an den Aufrufer
    ///
    /// Nennt je nach Fehlerfall den unbekannten Geräte- bzw.
    /// Aktionsnamen; ein überlanger Name wird abgeschnitten.
    pub fn reply_text(&self, device: &str, action: &str) -> ErrorReply {
        let mut message = ErrorReply::new();
        let _ = match self {
            DispatchError::DeviceNotFound => write!(message, "Device not found: {device}"),
            DispatchError::Action(_) => write!(message, "Action not found: {action}"),
        };
        message
    }
}

/// Einbaurichtung des Rollladen-Motors
///
/// Normalisiert die Drehrichtung, damit "positive Schritte = schließen"
/// unabhängig von der physischen Verdrahtung gilt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotorOrientation {
    Left,
    Right,
}

impl MotorOrientation {
    /// Vorzeichen das auf alle manuellen Bewegungs-Kommandos
    /// angewendet wird
    pub fn rotation_sens(self) -> i32 {
        match self {
            MotorOrientation::Left => 1,
            MotorOrientation::Right => -1,
        }
    }
}

/// Device Event für Channel-Kommunikation
///
/// Wird nach jedem abgeschlossenen Invoke vom Geräte-Task an die
/// Publisher-Tasks (MQTT) gebroadcastet, damit entfernte Listener über
/// Geräte-Aktivität informiert werden.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DeviceEvent {
    pub device: NameString,
    pub action: NameString,
    pub reply: ActionReply,
}

impl DeviceEvent {
    /// Erstellt ein DeviceEvent aus geborgten Strings
    ///
    /// Überlange Werte werden an der Kapazitätsgrenze abgeschnitten
    /// (Zeichen-, nicht Byte-genau).
    pub fn new(device: &str, action: &str, reply: &str) -> Self {
        Self {
            device: bounded(device),
            action: bounded(action),
            reply: bounded(reply),
        }
    }
}

/// Kopiert einen String in einen bounded String, abgeschnitten an der
/// Kapazitätsgrenze
fn bounded<const N: usize>(value: &str) -> String<N> {
    let mut out = String::new();
    for c in value.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

// ============================================================================
// defmt::Format Implementations (optional feature)
// ============================================================================

#[cfg(feature = "defmt")]
impl defmt::Format for ActionError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            ActionError::UnknownAction => defmt::write!(fmt, "UnknownAction"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for DispatchError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            DispatchError::DeviceNotFound => defmt::write!(fmt, "DeviceNotFound"),
            DispatchError::Action(e) => defmt::write!(fmt, "Action({})", e),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for DeviceEvent {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "DeviceEvent {{ device: {}, action: {}, reply: {} }}",
            self.device.as_str(),
            self.action.as_str(),
            self.reply.as_str()
        )
    }
}
