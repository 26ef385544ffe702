//! Integration Tests für die Geräte-Logik
//!
//! Diese Tests laufen auf dem Host (x86_64) und nutzen in-memory Mocks
//! für Schrittmotor, Persistenz-Speicher, Ausgangs-Port und Status-LED.
//! Die Mocks teilen ihren Zustand über Arc<Mutex<..>>, damit Tests nach
//! dem Move ins Gerät weiter beobachten können - und damit sich ein
//! Stromausfall simulieren lässt: Gerät wegwerfen, neues Gerät über
//! denselben Speicher-Bytes aufbauen.

use std::sync::{Arc, Mutex};

use esp_core::{
    Actuator, Device, DeviceRegistry, MotorOrientation, OutMode, RollerBlinds,
    ActionError, DispatchError, LedError, OutputPort, PersistentStore, SmartLedWriter,
    StepperDriver,
};
use rgb::RGB8;

// ============================================================================
// Mock Stepper
// ============================================================================

#[derive(Default)]
struct StepperState {
    position: i32,
    target: i32,
    outputs_enabled: bool,
}

/// AccelStepper-artiger Mock: `run()` macht höchstens einen Schritt
/// Richtung Ziel
#[derive(Clone, Default)]
struct MockStepper {
    state: Arc<Mutex<StepperState>>,
}

impl MockStepper {
    fn new() -> Self {
        Self::default()
    }

    fn position(&self) -> i32 {
        self.state.lock().unwrap().position
    }

    fn outputs_enabled(&self) -> bool {
        self.state.lock().unwrap().outputs_enabled
    }

    /// Simuliert dass der Motor physisch an dieser Position steht
    /// (z.B. vom Bediener dorthin gefahren)
    fn force_position(&self, position: i32) {
        let mut state = self.state.lock().unwrap();
        state.position = position;
        state.target = position;
    }
}

impl StepperDriver for MockStepper {
    fn move_to(&mut self, target: i32) {
        self.state.lock().unwrap().target = target;
    }

    fn move_relative(&mut self, steps: i32) {
        let mut state = self.state.lock().unwrap();
        state.target = state.position + steps;
    }

    fn run(&mut self) -> bool {
        let mut state = self.state.lock().unwrap();
        match state.target - state.position {
            0 => {}
            d if d > 0 => state.position += 1,
            _ => state.position -= 1,
        }
        state.target != state.position
    }

    fn distance_to_go(&self) -> i32 {
        let state = self.state.lock().unwrap();
        state.target - state.position
    }

    fn current_position(&self) -> i32 {
        self.state.lock().unwrap().position
    }

    fn set_current_position(&mut self, position: i32) {
        let mut state = self.state.lock().unwrap();
        state.position = position;
        state.target = position;
    }

    fn enable_outputs(&mut self) {
        self.state.lock().unwrap().outputs_enabled = true;
    }

    fn disable_outputs(&mut self) {
        self.state.lock().unwrap().outputs_enabled = false;
    }
}

// ============================================================================
// Mock Persistent Store
// ============================================================================

/// 64 Byte geteilter Speicher; Klone sehen dieselben Bytes
#[derive(Clone)]
struct MockStore {
    bytes: Arc<Mutex<[u8; 64]>>,
}

impl MockStore {
    fn new() -> Self {
        Self {
            bytes: Arc::new(Mutex::new([0; 64])),
        }
    }

    fn byte(&self, offset: usize) -> u8 {
        self.bytes.lock().unwrap()[offset]
    }

    fn i32(&self, offset: usize) -> i32 {
        let bytes = self.bytes.lock().unwrap();
        i32::from_le_bytes([
            bytes[offset],
            bytes[offset + 1],
            bytes[offset + 2],
            bytes[offset + 3],
        ])
    }
}

impl PersistentStore for MockStore {
    fn read_byte(&mut self, offset: usize) -> u8 {
        self.bytes.lock().unwrap()[offset]
    }

    fn write_byte(&mut self, offset: usize, value: u8) {
        self.bytes.lock().unwrap()[offset] = value;
    }
}

// Persistenz-Layout des Rollladens (Basis-Offset 0 in allen Tests)
const ADDR_DOWN_POSITION: usize = 0;
const ADDR_LAST_KNOWN_POSITION: usize = 4;
const ADDR_OPEN_PENDING: usize = 8;

// ============================================================================
// Mock Output Port & Mock LED
// ============================================================================

#[derive(Clone, Default)]
struct MockPort {
    level: Arc<Mutex<u8>>,
}

impl MockPort {
    fn new() -> Self {
        Self::default()
    }

    fn level(&self) -> u8 {
        *self.level.lock().unwrap()
    }
}

impl OutputPort for MockPort {
    fn set_level(&mut self, level: u8) {
        *self.level.lock().unwrap() = level;
    }
}

#[derive(Default)]
struct LedState {
    last_color: Option<RGB8>,
    write_count: usize,
}

#[derive(Clone, Default)]
struct MockLedWriter {
    state: Arc<Mutex<LedState>>,
}

impl MockLedWriter {
    fn new() -> Self {
        Self::default()
    }

    fn last_color(&self) -> Option<RGB8> {
        self.state.lock().unwrap().last_color
    }

    fn write_count(&self) -> usize {
        self.state.lock().unwrap().write_count
    }
}

impl SmartLedWriter for MockLedWriter {
    fn write(&mut self, color: RGB8) -> Result<(), LedError> {
        let mut state = self.state.lock().unwrap();
        state.last_color = Some(color);
        state.write_count += 1;
        Ok(())
    }
}

// ============================================================================
// Test-Helfer
// ============================================================================

const ON_COLOR: RGB8 = RGB8 { r: 0, g: 80, b: 0 };
const OFF_COLOR: RGB8 = RGB8 { r: 80, g: 0, b: 0 };

fn blinds(stepper: &MockStepper, store: &MockStore) -> RollerBlinds<MockStepper, MockStore> {
    RollerBlinds::new(
        "RollerBlinds-1",
        stepper.clone(),
        store.clone(),
        Some(0),
        MotorOrientation::Left,
    )
}

/// Frisch kalibrierter Rollladen: Endlage `down`, ganz geschlossen
fn calibrated_blinds(
    stepper: &MockStepper,
    store: &MockStore,
    down: i32,
) -> RollerBlinds<MockStepper, MockStore> {
    let mut device = blinds(stepper, store);
    device.setup();
    device.invoke("updateUpPosition", "").unwrap();
    stepper.force_position(down);
    device.invoke("updateDownPosition", "").unwrap();
    device
}

/// Tickt bis die automatische Bewegung abgeschlossen ist
fn tick_until_idle(device: &mut RollerBlinds<MockStepper, MockStore>) {
    for _ in 0..10_000 {
        if !device.open_pending() {
            return;
        }
        device.tick();
    }
    panic!("automatic move never completed");
}

// ============================================================================
// Tests: Mocks
// ============================================================================

#[test]
fn test_mock_stepper_runs_one_step_towards_target() {
    let mut stepper = MockStepper::new();
    stepper.move_to(3);

    assert!(stepper.run());
    assert_eq!(stepper.current_position(), 1);
    assert_eq!(stepper.distance_to_go(), 2);

    assert!(stepper.run());
    assert!(!stepper.run());
    assert_eq!(stepper.current_position(), 3);
    assert_eq!(stepper.distance_to_go(), 0);
}

#[test]
fn test_mock_store_clones_share_bytes() {
    let store = MockStore::new();
    let mut handle = store.clone();
    handle.write_i32(4, -1234);
    assert_eq!(store.i32(4), -1234);
}

// ============================================================================
// Tests: RollerBlinds - Kalibrierung
// ============================================================================

#[test]
fn test_fresh_device_reports_fully_closed() {
    // Scenario A: nie kalibriert -> state ist per Konvention "1.0"
    let stepper = MockStepper::new();
    let store = MockStore::new();
    let mut device = blinds(&stepper, &store);
    device.setup();

    assert_eq!(device.invoke("state", "").unwrap().as_str(), "1.0");
    assert!(!device.calibration_required());
}

#[test]
fn test_calibration_via_manual_moves() {
    // P4: Referenz oben setzen, N Schritte fahren, Referenz unten setzen
    let stepper = MockStepper::new();
    let store = MockStore::new();
    let mut device = blinds(&stepper, &store);
    device.setup();

    assert_eq!(device.invoke("updateUpPosition", "").unwrap().as_str(), "0");

    device.invoke("move", "1").unwrap();
    for _ in 0..1000 {
        device.tick();
    }
    device.invoke("stop", "").unwrap();
    assert_eq!(stepper.position(), 1000);

    device.invoke("updateDownPosition", "").unwrap();

    assert_eq!(device.down_position(), 1000);
    assert!(!device.calibration_required());
    // beide Positionen sind jetzt persistiert
    assert_eq!(store.i32(ADDR_DOWN_POSITION), 1000);
    assert_eq!(store.i32(ADDR_LAST_KNOWN_POSITION), 1000);
}

#[test]
fn test_manual_move_respects_rotation_sens() {
    // Bei Rechts-Einbau kehrt sich die Richtung um: positive Schritte
    // bewegen den Zähler negativ
    let stepper = MockStepper::new();
    let store = MockStore::new();
    let mut device = RollerBlinds::new(
        "RollerBlinds-1",
        stepper.clone(),
        store.clone(),
        Some(0),
        MotorOrientation::Right,
    );
    device.setup();

    device.invoke("move", "2").unwrap();
    for _ in 0..10 {
        device.tick();
    }

    assert_eq!(stepper.position(), -10);
}

#[test]
fn test_manual_move_malformed_parameter_is_zero() {
    let stepper = MockStepper::new();
    let store = MockStore::new();
    let mut device = blinds(&stepper, &store);
    device.setup();

    device.invoke("move", "schnell").unwrap();
    assert_eq!(device.moving_steps(), 0);

    for _ in 0..10 {
        device.tick();
    }
    assert_eq!(stepper.position(), 0);
}

#[test]
fn test_update_up_position_zeroes_step_counter() {
    let stepper = MockStepper::new();
    let store = MockStore::new();
    let mut device = blinds(&stepper, &store);
    device.setup();

    stepper.force_position(777);
    let reply = device.invoke("updateUpPosition", "").unwrap();
    assert_eq!(reply.as_str(), "0");
    assert_eq!(stepper.position(), 0);
}

// ============================================================================
// Tests: RollerBlinds - automatische Bewegung
// ============================================================================

#[test]
fn test_open_moves_to_target_and_persists_position() {
    // Scenario B: down=1000, open(0.5) -> Ziel 500
    let stepper = MockStepper::new();
    let store = MockStore::new();
    let mut device = calibrated_blinds(&stepper, &store, 1000);

    device.invoke("open", "0.5").unwrap();
    assert!(device.open_pending());

    tick_until_idle(&mut device);

    assert_eq!(device.invoke("position", "").unwrap().as_str(), "500");
    assert!(!device.open_pending());
    assert_eq!(store.i32(ADDR_LAST_KNOWN_POSITION), 500);
    assert_eq!(store.byte(ADDR_OPEN_PENDING), 0);
    // Motor ist im Stillstand stromlos
    assert!(!stepper.outputs_enabled());
}

#[test]
fn test_open_persists_pending_marker_before_motion() {
    let stepper = MockStepper::new();
    let store = MockStore::new();
    let mut device = calibrated_blinds(&stepper, &store, 1000);

    device.invoke("open", "1.0").unwrap();

    // Marker steht im Speicher bevor auch nur ein Schritt gelaufen ist
    assert_eq!(store.byte(ADDR_OPEN_PENDING), 1);
    assert_eq!(stepper.position(), 1000);
    assert!(stepper.outputs_enabled());
}

#[test]
fn test_open_malformed_parameter_closes_fully() {
    // fehlerhafter Parameter parst zu 0.0 -> Ziel ist die Endlage
    let stepper = MockStepper::new();
    let store = MockStore::new();
    let mut device = calibrated_blinds(&stepper, &store, 100);

    device.invoke("open", "halb").unwrap();
    tick_until_idle(&mut device);

    assert_eq!(stepper.position(), 100);
}

#[test]
fn test_open_supersedes_running_move() {
    // Neues open während laufender Fahrt setzt nur das Ziel neu
    let stepper = MockStepper::new();
    let store = MockStore::new();
    let mut device = calibrated_blinds(&stepper, &store, 1000);

    device.invoke("open", "1.0").unwrap();
    for _ in 0..100 {
        device.tick();
    }
    assert!(device.open_pending());

    device.invoke("open", "0.5").unwrap();
    tick_until_idle(&mut device);

    assert_eq!(stepper.position(), 500);
    assert_eq!(store.i32(ADDR_LAST_KNOWN_POSITION), 500);
}

#[test]
fn test_close_targets_down_position() {
    let stepper = MockStepper::new();
    let store = MockStore::new();
    let mut device = calibrated_blinds(&stepper, &store, 1000);

    device.invoke("open", "1.0").unwrap();
    tick_until_idle(&mut device);
    assert_eq!(stepper.position(), 0);

    let reply = device.invoke("close", "").unwrap();
    // close antwortet mit der aktuellen Schrittzahl
    assert_eq!(reply.as_str(), "0");

    tick_until_idle(&mut device);
    assert_eq!(stepper.position(), 1000);
    assert_eq!(device.invoke("state", "").unwrap().as_str(), "1");
}

#[test]
fn test_state_query_is_idempotent() {
    // P3: state hat keine Seiteneffekte
    let stepper = MockStepper::new();
    let store = MockStore::new();
    let mut device = calibrated_blinds(&stepper, &store, 1000);

    device.invoke("open", "0.5").unwrap();
    tick_until_idle(&mut device);

    let first = device.invoke("state", "").unwrap();
    let second = device.invoke("state", "").unwrap();
    let third = device.invoke("state", "").unwrap();
    assert_eq!(first, second);
    assert_eq!(second, third);
    assert_eq!(first.as_str(), "0.5");
    assert_eq!(stepper.position(), 500);
    assert!(!device.open_pending());
}

#[test]
fn test_manual_and_automatic_motion_are_exclusive() {
    // P5: open bricht eine manuelle Fahrt ab; beide Modi halten nie
    // gleichzeitig
    let stepper = MockStepper::new();
    let store = MockStore::new();
    let mut device = calibrated_blinds(&stepper, &store, 1000);

    device.invoke("move", "10").unwrap();
    assert_eq!(device.moving_steps(), 10);

    device.invoke("open", "0.5").unwrap();
    assert_eq!(device.moving_steps(), 0);
    assert!(device.open_pending());

    // und umgekehrt: move während automatischer Fahrt wird verweigert
    device.invoke("move", "7").unwrap();
    assert_eq!(device.moving_steps(), 0);
    assert!(device.open_pending());
}

#[test]
fn test_volatile_configuration_never_touches_store() {
    let stepper = MockStepper::new();
    let store = MockStore::new();
    let mut device = RollerBlinds::new(
        "RollerBlinds-1",
        stepper.clone(),
        store.clone(),
        None,
        MotorOrientation::Left,
    );
    device.setup();

    device.invoke("open", "0.0").unwrap();
    tick_until_idle(&mut device);
    device.invoke("updateDownPosition", "").unwrap();

    for offset in 0..16 {
        assert_eq!(store.byte(offset), 0);
    }
}

#[test]
fn test_dump_reports_all_fields() {
    let stepper = MockStepper::new();
    let store = MockStore::new();
    let mut device = calibrated_blinds(&stepper, &store, 1000);

    let dump = device.invoke("dump", "").unwrap();
    assert_eq!(
        dump.as_str(),
        "{\"calibrationRequired\":false,\"movingSteps\":0,\"downPosition\":1000,\"lastKnownPosition\":1000,\"openPending\":false}"
    );
}

#[test]
fn test_unknown_action_is_an_error() {
    let stepper = MockStepper::new();
    let store = MockStore::new();
    let mut device = blinds(&stepper, &store);
    device.setup();

    let result = device.invoke("explode", "");
    assert_eq!(result, Err(ActionError::UnknownAction));
}

// ============================================================================
// Tests: RollerBlinds - Crash-Recovery
// ============================================================================

#[test]
fn test_interrupted_move_forces_recalibration() {
    // Scenario C / P1: Stromausfall mitten in der Fahrt
    let stepper = MockStepper::new();
    let store = MockStore::new();
    let mut device = calibrated_blinds(&stepper, &store, 1000);

    device.invoke("open", "1.0").unwrap();
    for _ in 0..100 {
        device.tick();
    }
    assert!(device.open_pending());
    assert_eq!(store.byte(ADDR_OPEN_PENDING), 1);

    // "Stromausfall": Gerät weg, neues Gerät über denselben Bytes
    drop(device);
    let restarted_stepper = MockStepper::new();
    let mut restarted = RollerBlinds::new(
        "RollerBlinds-1",
        restarted_stepper.clone(),
        store.clone(),
        Some(0),
        MotorOrientation::Left,
    );
    restarted.setup();

    assert!(restarted.calibration_required());
    assert_eq!(restarted.down_position(), 0);
    assert_eq!(restarted.last_known_position(), 0);
    assert!(!restarted.open_pending());
    // der Recovery-Zustand ist selbst persistiert
    assert_eq!(store.byte(ADDR_OPEN_PENDING), 0);
    assert_eq!(store.i32(ADDR_DOWN_POSITION), 0);
    assert_eq!(store.i32(ADDR_LAST_KNOWN_POSITION), 0);
}

#[test]
fn test_open_refused_while_calibration_required() {
    // P2: open ist im unkalibrierten Zustand eine reine Status-Abfrage
    let stepper = MockStepper::new();
    let store = MockStore::new();
    let mut device = calibrated_blinds(&stepper, &store, 1000);

    device.invoke("open", "1.0").unwrap();
    device.tick();
    drop(device);

    let restarted_stepper = MockStepper::new();
    let mut restarted = RollerBlinds::new(
        "RollerBlinds-1",
        restarted_stepper.clone(),
        store.clone(),
        Some(0),
        MotorOrientation::Left,
    );
    restarted.setup();
    assert!(restarted.calibration_required());

    let reply = restarted.invoke("open", "0.5").unwrap();
    assert_eq!(reply.as_str(), "1.0");
    assert!(!restarted.open_pending());
    assert_eq!(restarted.moving_steps(), 0);
    assert!(!restarted_stepper.outputs_enabled());

    for _ in 0..50 {
        restarted.tick();
    }
    assert_eq!(restarted_stepper.position(), 0);
}

#[test]
fn test_clean_restart_trusts_stored_position() {
    // Gegenprobe zu P1: ohne Pending-Marker wird dem Speicher vertraut
    // und der Schrittzähler aus der letzten bekannten Position geseedet
    let stepper = MockStepper::new();
    let store = MockStore::new();
    let mut device = calibrated_blinds(&stepper, &store, 1000);

    device.invoke("open", "0.5").unwrap();
    tick_until_idle(&mut device);
    drop(device);

    let restarted_stepper = MockStepper::new();
    let mut restarted = RollerBlinds::new(
        "RollerBlinds-1",
        restarted_stepper.clone(),
        store.clone(),
        Some(0),
        MotorOrientation::Left,
    );
    restarted.setup();

    assert!(!restarted.calibration_required());
    assert_eq!(restarted.down_position(), 1000);
    assert_eq!(restarted.last_known_position(), 500);
    assert_eq!(restarted_stepper.position(), 500);
    assert_eq!(restarted.invoke("state", "").unwrap().as_str(), "0.5");
}

#[test]
fn test_recalibration_survives_power_cycle() {
    // Nach Crash-Recovery und Neukalibrierung darf ein weiterer Neustart
    // nicht wieder im unkalibrierten Zustand landen
    let stepper = MockStepper::new();
    let store = MockStore::new();
    let mut device = calibrated_blinds(&stepper, &store, 1000);

    device.invoke("open", "1.0").unwrap();
    device.tick();
    drop(device);

    let second_stepper = MockStepper::new();
    let mut second = blinds(&second_stepper, &store);
    second.setup();
    assert!(second.calibration_required());

    // Neukalibrierung
    second.invoke("updateUpPosition", "").unwrap();
    second_stepper.force_position(800);
    second.invoke("updateDownPosition", "").unwrap();
    drop(second);

    let third_stepper = MockStepper::new();
    let mut third = blinds(&third_stepper, &store);
    third.setup();

    assert!(!third.calibration_required());
    assert_eq!(third.down_position(), 800);
    assert_eq!(third_stepper.position(), 800);
}

// ============================================================================
// Tests: Actuator
// ============================================================================

#[test]
fn test_actuator_on_off() {
    let port = MockPort::new();
    let store = MockStore::new();
    let mut device: Actuator<MockPort, MockStore, MockLedWriter> = Actuator::new(
        "Light-1",
        port.clone(),
        OutMode::Digital,
        store.clone(),
        Some(32),
    );
    device.setup();

    let reply = device.invoke("on", "").unwrap();
    assert_eq!(reply.as_str(), "1");
    assert_eq!(port.level(), 255);

    let reply = device.invoke("off", "").unwrap();
    assert_eq!(reply.as_str(), "0");
    assert_eq!(port.level(), 0);
}

#[test]
fn test_actuator_leveled_set() {
    let port = MockPort::new();
    let store = MockStore::new();
    let mut device: Actuator<MockPort, MockStore, MockLedWriter> = Actuator::new(
        "Dimmer-1",
        port.clone(),
        OutMode::Leveled,
        store.clone(),
        None,
    );
    device.setup();

    device.invoke("set", "0.5").unwrap();
    assert_eq!(port.level(), 127);

    device.invoke("set", "1.0").unwrap();
    assert_eq!(port.level(), 255);
}

#[test]
fn test_actuator_digital_drives_full_level() {
    // Digital: jeder persistierte Pegel > 0 schaltet voll durch
    let port = MockPort::new();
    let store = MockStore::new();
    store.clone().write_byte(32, 7);

    let mut device: Actuator<MockPort, MockStore, MockLedWriter> = Actuator::new(
        "Light-1",
        port.clone(),
        OutMode::Digital,
        store.clone(),
        Some(32),
    );
    device.setup();

    assert_eq!(port.level(), 255);
    assert_eq!(device.invoke("state", "").unwrap().as_str(), "1");
}

#[test]
fn test_actuator_state_survives_restart() {
    let port = MockPort::new();
    let store = MockStore::new();
    let mut device: Actuator<MockPort, MockStore, MockLedWriter> = Actuator::new(
        "Light-1",
        port.clone(),
        OutMode::Digital,
        store.clone(),
        Some(32),
    );
    device.setup();
    device.invoke("on", "").unwrap();
    assert_eq!(store.byte(32), 255);
    drop(device);

    let restarted_port = MockPort::new();
    let mut restarted: Actuator<MockPort, MockStore, MockLedWriter> = Actuator::new(
        "Light-1",
        restarted_port.clone(),
        OutMode::Digital,
        store.clone(),
        Some(32),
    );
    restarted.setup();

    assert_eq!(restarted_port.level(), 255);
    assert_eq!(restarted.invoke("state", "").unwrap().as_str(), "1");
}

#[test]
fn test_actuator_without_persistence_never_touches_store() {
    let port = MockPort::new();
    let store = MockStore::new();
    let mut device: Actuator<MockPort, MockStore, MockLedWriter> =
        Actuator::new("Light-1", port.clone(), OutMode::Digital, store.clone(), None);
    device.setup();

    device.invoke("on", "").unwrap();

    for offset in 0..64 {
        assert_eq!(store.byte(offset), 0);
    }
}

#[test]
fn test_actuator_indicator_follows_state() {
    let port = MockPort::new();
    let store = MockStore::new();
    let led = MockLedWriter::new();
    let mut device = Actuator::with_indicator(
        "Light-1",
        port.clone(),
        OutMode::Digital,
        led.clone(),
        ON_COLOR,
        OFF_COLOR,
        store.clone(),
        Some(32),
    );
    device.setup();
    assert_eq!(led.last_color(), Some(OFF_COLOR));

    device.invoke("on", "").unwrap();
    assert_eq!(led.last_color(), Some(ON_COLOR));

    device.invoke("off", "").unwrap();
    assert_eq!(led.last_color(), Some(OFF_COLOR));
    assert_eq!(led.write_count(), 3);
}

#[test]
fn test_actuator_unknown_action() {
    let port = MockPort::new();
    let store = MockStore::new();
    let mut device: Actuator<MockPort, MockStore, MockLedWriter> =
        Actuator::new("Light-1", port, OutMode::Digital, store, None);

    assert_eq!(device.invoke("blink", ""), Err(ActionError::UnknownAction));
}

// ============================================================================
// Tests: Registry & Dispatch
// ============================================================================

#[test]
fn test_dispatch_to_roller_blinds_by_name() {
    // Scenario D: Dispatch per Gerätename liefert die aktuelle
    // Schrittzahl; unbekannter Name ist ein Fehler-Ergebnis
    let stepper = MockStepper::new();
    let store = MockStore::new();
    let mut blinds_device = calibrated_blinds(&stepper, &store, 1000);

    let port = MockPort::new();
    let mut light: Actuator<MockPort, MockStore, MockLedWriter> =
        Actuator::new("Light-1", port, OutMode::Digital, store.clone(), Some(32));

    let mut devices: [&mut dyn Device; 2] = [&mut blinds_device, &mut light];
    let mut registry = DeviceRegistry::new(&mut devices);

    let reply = registry.dispatch("RollerBlinds-1", "position", "").unwrap();
    assert_eq!(reply.as_str(), "1000");

    let result = registry.dispatch("RollerBlinds-9", "position", "");
    assert_eq!(result, Err(DispatchError::DeviceNotFound));
}

#[test]
fn test_dispatch_error_reply_wording() {
    // Fehlertexte wie sie die RMI-Antwort an den Aufrufer meldet
    let stepper = MockStepper::new();
    let store = MockStore::new();
    let mut blinds_device = calibrated_blinds(&stepper, &store, 1000);

    let mut devices: [&mut dyn Device; 1] = [&mut blinds_device];
    let mut registry = DeviceRegistry::new(&mut devices);

    let err = registry
        .dispatch("RollerBlinds-9", "position", "")
        .unwrap_err();
    assert_eq!(
        err.reply_text("RollerBlinds-9", "position").as_str(),
        "Device not found: RollerBlinds-9"
    );

    let err = registry
        .dispatch("RollerBlinds-1", "explodier", "")
        .unwrap_err();
    assert_eq!(
        err.reply_text("RollerBlinds-1", "explodier").as_str(),
        "Action not found: explodier"
    );
}

#[test]
fn test_registry_ticks_drive_motion_to_completion() {
    let stepper = MockStepper::new();
    let store = MockStore::new();
    let mut blinds_device = calibrated_blinds(&stepper, &store, 100);

    let mut devices: [&mut dyn Device; 1] = [&mut blinds_device];
    let mut registry = DeviceRegistry::new(&mut devices);

    registry.dispatch("RollerBlinds-1", "open", "1.0").unwrap();
    for _ in 0..200 {
        registry.tick_all();
    }

    let reply = registry.dispatch("RollerBlinds-1", "position", "").unwrap();
    assert_eq!(reply.as_str(), "0");
    assert_eq!(store.byte(ADDR_OPEN_PENDING), 0);
}

#[test]
fn test_device_classes_and_action_tables() {
    let stepper = MockStepper::new();
    let store = MockStore::new();
    let blinds_device = blinds(&stepper, &store);

    let port = MockPort::new();
    let light: Actuator<MockPort, MockStore, MockLedWriter> =
        Actuator::new("Light-1", port, OutMode::Digital, store.clone(), None);

    assert_eq!(blinds_device.device_class(), "js.hera.dev.RollerBlinds");
    assert_eq!(light.device_class(), "js.hera.dev.Actuator");
    assert!(blinds_device.is_local());

    assert!(blinds_device.actions().contains(&"updateDownPosition"));
    assert!(blinds_device.actions().contains(&"dump"));
    assert!(light.actions().contains(&"set"));
    assert!(!light.actions().contains(&"open"));
}
