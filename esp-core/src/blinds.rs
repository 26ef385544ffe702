//! RollerBlinds - positionsgeführter Rollladen-Aktor
//!
//! Zustandsmaschine für einen schrittmotor-getriebenen Rollladen mit
//! Kalibrierung und absturzsicherer Positions-Persistenz. Die zentrale
//! Idee: ein persistiertes Pending-Flag markiert jede laufende
//! automatische Bewegung. Wird das Flag beim Start gesetzt vorgefunden,
//! wurde die letzte Bewegung unterbrochen und die gespeicherten
//! Schrittzahlen passen nicht mehr zur physischen Realität - die einzig
//! sichere Reaktion ist eine erzwungene Neukalibrierung.

use core::fmt::Write;

use crate::device::Device;
use crate::logic::{parse_percent, target_steps};
use crate::traits::{PersistentStore, StepperDriver};
use crate::types::{ActionError, ActionReply, MotorOrientation};

/// Persistenz-Layout relativ zur Basis-Adresse, in dieser festen
/// Reihenfolge
const ADDR_DOWN_POSITION: usize = 0;
const ADDR_LAST_KNOWN_POSITION: usize = ADDR_DOWN_POSITION + 4;
const ADDR_OPEN_PENDING: usize = ADDR_LAST_KNOWN_POSITION + 4;

/// Belegte Bytes im Persistenz-Speicher pro Instanz
pub const STORE_SIZE: usize = ADDR_OPEN_PENDING + 1;

const DEVICE_CLASS: &str = "js.hera.dev.RollerBlinds";

const ACTIONS: &[&str] = &[
    "open",
    "close",
    "position",
    "state",
    "move",
    "stop",
    "updateUpPosition",
    "updateDownPosition",
    "dump",
];

/// Schrittmotor-getriebener Rollladen
///
/// Bewegung läuft nie innerhalb eines `invoke`-Aufrufs zu Ende: `open`
/// startet sie nur, der zyklische `tick` arbeitet sie inkrementell ab,
/// `position`/`state` melden den Fortschritt.
pub struct RollerBlinds<M: StepperDriver, S: PersistentStore> {
    name: &'static str,
    stepper: M,
    store: S,
    store_base: Option<usize>,

    /// Schrittzahl der ganz geschlossenen Endlage; nur die Kalibrierung
    /// ändert diesen Wert
    down_position: i32,

    /// Letzte Schrittzahl die sicher der physischen Realität entspricht
    last_known_position: i32,

    /// True genau solange eine automatische Bewegung läuft; wird bei
    /// jedem Übergang synchron persistiert (Crash-Marker)
    open_pending: bool,

    /// True solange den gespeicherten Positionen nicht zu trauen ist;
    /// blockiert alle automatischen Bewegungs-Kommandos
    calibration_required: bool,

    /// Manuelle Kalibrierfahrt; nie persistiert, geht bei Neustart
    /// verloren (dann muss ohnehin neu kalibriert werden)
    moving_steps: i32,

    /// ±1, aus der Einbaurichtung des Motors
    rotation_sens: i32,
}

impl<M: StepperDriver, S: PersistentStore> RollerBlinds<M, S> {
    /// Erstellt einen Rollladen
    ///
    /// `store_base = None` bedeutet: keine Persistenz konfiguriert, alle
    /// Positionen sind flüchtig.
    pub fn new(
        name: &'static str,
        stepper: M,
        store: S,
        store_base: Option<usize>,
        orientation: MotorOrientation,
    ) -> Self {
        Self {
            name,
            stepper,
            store,
            store_base,
            down_position: 0,
            last_known_position: 0,
            open_pending: false,
            calibration_required: false,
            moving_steps: 0,
            rotation_sens: orientation.rotation_sens(),
        }
    }

    // ------------------------------------------------------------------
    // Diagnose-Zugriffe (read-only)

    pub fn down_position(&self) -> i32 {
        self.down_position
    }

    pub fn last_known_position(&self) -> i32 {
        self.last_known_position
    }

    pub fn open_pending(&self) -> bool {
        self.open_pending
    }

    pub fn calibration_required(&self) -> bool {
        self.calibration_required
    }

    pub fn moving_steps(&self) -> i32 {
        self.moving_steps
    }

    // ------------------------------------------------------------------
    // Persistenz-Helfer

    fn persist_open_pending(&mut self) {
        if let Some(base) = self.store_base {
            self.store
                .write_byte(base + ADDR_OPEN_PENDING, self.open_pending as u8);
        }
    }

    fn persist_down_position(&mut self) {
        if let Some(base) = self.store_base {
            self.store
                .write_i32(base + ADDR_DOWN_POSITION, self.down_position);
        }
    }

    fn persist_last_known_position(&mut self) {
        if let Some(base) = self.store_base {
            self.store
                .write_i32(base + ADDR_LAST_KNOWN_POSITION, self.last_known_position);
        }
    }

    // ------------------------------------------------------------------
    // Aktions-Handler

    /// Startet eine automatische Fahrt zum gegebenen Öffnungsgrad
    ///
    /// Das Pending-Flag wird persistiert *bevor* die Bewegung beginnt;
    /// erst damit ist eine Unterbrechung nach Neustart erkennbar. Ein
    /// `open` während einer laufenden automatischen Fahrt setzt nur das
    /// Ziel neu (Supersede); eine laufende manuelle Fahrt wird
    /// abgebrochen.
    fn open(&mut self, parameter: &str) -> ActionReply {
        if self.calibration_required {
            // Bewegung verweigert - Antwort wie eine reine Status-Abfrage
            return self.state_reply();
        }

        self.moving_steps = 0;
        self.open_pending = true;
        self.persist_open_pending();
        self.stepper.enable_outputs();

        let percent = parse_percent(parameter);
        self.stepper
            .move_to(target_steps(percent, self.down_position));

        self.state_reply()
    }

    /// Fährt ganz zu - äquivalent zu `open(0)`
    fn close(&mut self) -> ActionReply {
        self.open("0.0");
        self.position_reply()
    }

    /// Startet eine manuelle Kalibrierfahrt mit vorzeichenbehafteter
    /// Schrittzahl
    ///
    /// Während einer laufenden automatischen Fahrt verweigert; manuelle
    /// und automatische Bewegung überlappen nie.
    fn manual_move(&mut self, parameter: &str) -> ActionReply {
        if !self.open_pending {
            self.moving_steps = parameter.trim().parse().unwrap_or(0);
        }
        self.position_reply()
    }

    /// Hält eine manuelle Fahrt sofort an
    fn manual_stop(&mut self) -> ActionReply {
        self.moving_steps = 0;
        self.position_reply()
    }

    /// Definiert die aktuelle physische Position als Schrittzahl Null
    /// (Referenz "ganz offen")
    fn update_up_position(&mut self) -> ActionReply {
        self.stepper.set_current_position(0);
        self.position_reply()
    }

    /// Übernimmt die aktuelle Schrittzahl als neue Endlage "ganz
    /// geschlossen" und beendet damit den unkalibrierten Zustand
    ///
    /// Die aktuelle Position ist in diesem Moment sicher bekannt, also
    /// wird sie auch als letzte bekannte Position mit persistiert.
    fn update_down_position(&mut self) -> ActionReply {
        self.calibration_required = false;
        self.down_position = self.stepper.current_position();
        self.persist_down_position();
        self.last_known_position = self.stepper.current_position();
        self.persist_last_known_position();
        self.position_reply()
    }

    /// Aktuelle Schrittzahl als String
    fn position_reply(&self) -> ActionReply {
        let mut reply = ActionReply::new();
        let _ = write!(reply, "{}", self.stepper.current_position());
        reply
    }

    /// Aktuelle Position als Anteil der Endlage
    ///
    /// 0.0 = offen, 1.0 = geschlossen. Per Konvention "1.0" solange nie
    /// kalibriert wurde (`down_position == 0`).
    fn state_reply(&self) -> ActionReply {
        let mut reply = ActionReply::new();
        if self.down_position == 0 {
            let _ = reply.push_str("1.0");
        } else {
            let ratio =
                (self.stepper.current_position() as f32 / self.down_position as f32).abs();
            let _ = write!(reply, "{ratio}");
        }
        reply
    }

    /// Serialisiert den kompletten in-memory Zustand als JSON-Blob,
    /// ohne Seiteneffekte
    fn dump(&self) -> ActionReply {
        let mut reply = ActionReply::new();
        let _ = write!(
            reply,
            "{{\"calibrationRequired\":{},\"movingSteps\":{},\"downPosition\":{},\"lastKnownPosition\":{},\"openPending\":{}}}",
            self.calibration_required,
            self.moving_steps,
            self.down_position,
            self.last_known_position,
            self.open_pending
        );
        reply
    }
}

impl<M: StepperDriver, S: PersistentStore> Device for RollerBlinds<M, S> {
    fn name(&self) -> &str {
        self.name
    }

    fn device_class(&self) -> &'static str {
        DEVICE_CLASS
    }

    fn actions(&self) -> &'static [&'static str] {
        ACTIONS
    }

    /// Lädt die persistierten Positionen und prüft den Crash-Marker
    ///
    /// Ein gesetztes Pending-Flag beweist eine unterbrochene automatische
    /// Fahrt: die physische Position ist relativ zum gespeicherten Modell
    /// unbekannt. Dann werden alle Positionen auf Null zurückgesetzt, das
    /// Flag gelöscht (und sofort persistiert) und eine Neukalibrierung
    /// erzwungen. Andernfalls wird der Schrittzähler aus der letzten
    /// bekannten Position geseedet.
    fn setup(&mut self) {
        if let Some(base) = self.store_base {
            self.down_position = self.store.read_i32(base + ADDR_DOWN_POSITION);
            self.last_known_position = self.store.read_i32(base + ADDR_LAST_KNOWN_POSITION);
            self.open_pending = self.store.read_byte(base + ADDR_OPEN_PENDING) != 0;
        }

        if self.open_pending {
            self.down_position = 0;
            self.last_known_position = 0;
            self.open_pending = false;
            self.calibration_required = true;
            self.persist_down_position();
            self.persist_last_known_position();
            self.persist_open_pending();
        }

        self.stepper.set_current_position(self.last_known_position);
    }

    /// Arbeitet einen Scheduler-Zyklus Bewegung ab
    ///
    /// Manuelle Fahrt hat Vorrang. Beim Erreichen des automatischen Ziels
    /// wird zuerst das Pending-Flag gelöscht und persistiert, dann der
    /// Motor stromlos geschaltet, dann die Endposition persistiert. Geht
    /// zwischen den beiden Schreibvorgängen der Strom verloren, ist das
    /// schlimmste Ergebnis eine erzwungene Neukalibrierung - nie eine
    /// unbestätigte Position, der fälschlich vertraut würde.
    fn tick(&mut self) {
        if self.moving_steps != 0 {
            // moving_steps ist nur während der Kalibrierung gesetzt, wenn
            // der Rollladen von Hand an die Endlagen gefahren wird
            self.stepper
                .move_relative(self.rotation_sens * self.moving_steps);
            self.stepper.run();
            return;
        }

        if !self.open_pending {
            return;
        }

        self.stepper.run();
        if self.stepper.distance_to_go() == 0 {
            self.open_pending = false;
            self.persist_open_pending();
            self.stepper.disable_outputs();

            self.last_known_position = self.stepper.current_position();
            self.persist_last_known_position();
        }
    }

    fn invoke(&mut self, action: &str, parameter: &str) -> Result<ActionReply, ActionError> {
        match action {
            "open" => Ok(self.open(parameter)),
            "close" => Ok(self.close()),
            "position" => Ok(self.position_reply()),
            "state" => Ok(self.state_reply()),
            "move" => Ok(self.manual_move(parameter)),
            "stop" => Ok(self.manual_stop()),
            "updateUpPosition" => Ok(self.update_up_position()),
            "updateDownPosition" => Ok(self.update_down_position()),
            "dump" => Ok(self.dump()),
            _ => Err(ActionError::UnknownAction),
        }
    }
}
