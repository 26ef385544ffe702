//! Actuator - geschalteter Ausgang mit optionalem Status-Indikator
//!
//! Einfaches Zwei-Zustands- (oder stufenloses) Gerät, dessen Zustand
//! Neustarts überlebt. Der optionale Indikator (adressierbare LED) wird
//! bei jeder Zustandsänderung mitgeführt, aber nie persistiert - seine
//! Farbe ist vollständig aus dem Schaltzustand abgeleitet.

use core::fmt::Write;
use rgb::RGB8;

use crate::device::Device;
use crate::logic::level_from_parameter;
use crate::traits::{OutputPort, PersistentStore, SmartLedWriter};
use crate::types::{ActionError, ActionReply};

const DEVICE_CLASS: &str = "js.hera.dev.Actuator";

const ACTIONS: &[&str] = &["on", "off", "set", "state", "dump"];

/// Betriebsart des Ausgangs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutMode {
    /// Zwei-Zustands-Ausgang; jeder Pegel > 0 schaltet voll durch
    Digital,
    /// Stufenloser Ausgang; der Pegel wird unverändert durchgereicht
    Leveled,
}

/// Status-Indikator: LED plus die beiden konfigurierten Farben
struct Indicator<L: SmartLedWriter> {
    led: L,
    on_color: RGB8,
    off_color: RGB8,
}

/// Geschalteter Ausgang mit persistiertem Zustand
///
/// `store_offset = None` ist eine gültige Konfiguration ("keine
/// Persistenz"); der Zustand startet dann nach jedem Neustart bei 0.
pub struct Actuator<P: OutputPort, S: PersistentStore, L: SmartLedWriter> {
    name: &'static str,
    port: P,
    out_mode: OutMode,
    store: S,
    store_offset: Option<usize>,
    indicator: Option<Indicator<L>>,
    level: u8,
}

impl<P: OutputPort, S: PersistentStore, L: SmartLedWriter> Actuator<P, S, L> {
    /// Aktor ohne Indikator
    pub fn new(
        name: &'static str,
        port: P,
        out_mode: OutMode,
        store: S,
        store_offset: Option<usize>,
    ) -> Self {
        Self {
            name,
            port,
            out_mode,
            store,
            store_offset,
            indicator: None,
            level: 0,
        }
    }

    /// Aktor mit Status-LED und den beiden Zustandsfarben
    pub fn with_indicator(
        name: &'static str,
        port: P,
        out_mode: OutMode,
        led: L,
        on_color: RGB8,
        off_color: RGB8,
        store: S,
        store_offset: Option<usize>,
    ) -> Self {
        Self {
            name,
            port,
            out_mode,
            store,
            store_offset,
            indicator: Some(Indicator {
                led,
                on_color,
                off_color,
            }),
            level: 0,
        }
    }

    /// Aktueller Pegel (Diagnose)
    pub fn level(&self) -> u8 {
        self.level
    }

    /// Treibt Ausgang und Indikator entsprechend dem aktuellen Pegel
    fn update(&mut self) {
        let drive = match self.out_mode {
            OutMode::Digital => {
                if self.level > 0 {
                    u8::MAX
                } else {
                    0
                }
            }
            OutMode::Leveled => self.level,
        };
        self.port.set_level(drive);

        if let Some(indicator) = self.indicator.as_mut() {
            let color = if self.level > 0 {
                indicator.on_color
            } else {
                indicator.off_color
            };
            // Indikator ist reine Anzeige; ein Schreibfehler ändert den
            // Schaltzustand nicht
            let _ = indicator.led.write(color);
        }
    }

    /// Zustandsänderung: Speicher aktualisieren, persistieren, Ausgänge
    /// treiben
    fn set_level(&mut self, level: u8) -> ActionReply {
        self.level = level;
        if let Some(offset) = self.store_offset {
            self.store.write_byte(offset, level);
        }
        self.update();
        self.state_reply()
    }

    fn state_reply(&self) -> ActionReply {
        let mut reply = ActionReply::new();
        match self.out_mode {
            OutMode::Digital => {
                let _ = reply.push_str(if self.level > 0 { "1" } else { "0" });
            }
            OutMode::Leveled => {
                let _ = write!(reply, "{}", self.level as f32 / 255.0);
            }
        }
        reply
    }

    fn dump(&self) -> ActionReply {
        let mut reply = ActionReply::new();
        let _ = write!(
            reply,
            "{{\"level\":{},\"persisted\":{},\"indicator\":{}}}",
            self.level,
            self.store_offset.is_some(),
            self.indicator.is_some()
        );
        reply
    }
}

impl<P: OutputPort, S: PersistentStore, L: SmartLedWriter> Device for Actuator<P, S, L> {
    fn name(&self) -> &str {
        self.name
    }

    fn device_class(&self) -> &'static str {
        DEVICE_CLASS
    }

    fn actions(&self) -> &'static [&'static str] {
        ACTIONS
    }

    /// Stellt den Pegel aus dem Speicher wieder her und treibt die
    /// Ausgänge, bevor das Gerät erreichbar wird
    fn setup(&mut self) {
        if let Some(offset) = self.store_offset {
            self.level = self.store.read_byte(offset);
        }
        self.update();
    }

    fn invoke(&mut self, action: &str, parameter: &str) -> Result<ActionReply, ActionError> {
        match action {
            "on" => Ok(self.set_level(u8::MAX)),
            "off" => Ok(self.set_level(0)),
            "set" => Ok(self.set_level(level_from_parameter(parameter))),
            "state" => Ok(self.state_reply()),
            "dump" => Ok(self.dump()),
            _ => Err(ActionError::UnknownAction),
        }
    }
}
