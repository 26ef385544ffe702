// Schrittmotor-Treiber für ULN2003 (4-Phasen Unipolar-Motor)
//
// Implementiert das StepperDriver Trait aus esp-core.
// Nicht-blockierend: run() macht pro Aufruf höchstens einen Schritt,
// die Schrittrate wird über embassy-time Zeitstempel begrenzt.

use embassy_time::{Duration, Instant};
use esp_core::StepperDriver;
use esp_hal::gpio::{Level, Output};

/// Vollschritt-Sequenz für 4-Phasen Motoren (IN1..IN4)
/// Zwei Spulen gleichzeitig aktiv für maximales Drehmoment
const STEP_SEQUENCE: [[bool; 4]; 4] = [
    [true, true, false, false],
    [false, true, true, false],
    [false, false, true, true],
    [true, false, false, true],
];

/// Schrittmotor an vier GPIO-Ausgängen
///
/// Position und Ziel werden in Schritten geführt. Die Rampe hebt die
/// Schrittrate pro ausgeführtem Schritt um die Beschleunigung an,
/// bis zur maximalen Rate.
pub struct GpioStepper {
    pins: [Output<'static>; 4],
    position: i32,
    target: i32,
    phase: usize,
    speed: u32,
    max_speed: u32,
    acceleration: u32,
    last_step: Instant,
    outputs_enabled: bool,
}

impl GpioStepper {
    /// Erstellt einen neuen GpioStepper
    ///
    /// # Parameter
    /// - `pins`: Die vier Phasen-Ausgänge in Reihenfolge IN1..IN4
    /// - `max_speed`: Maximale Schrittrate (Schritte/s)
    /// - `acceleration`: Raten-Zuwachs pro Schritt (Schritte/s²)
    pub fn new(pins: [Output<'static>; 4], max_speed: u32, acceleration: u32) -> Self {
        Self {
            pins,
            position: 0,
            target: 0,
            phase: 0,
            speed: 0,
            max_speed,
            acceleration,
            last_step: Instant::now(),
            outputs_enabled: false,
        }
    }

    /// Mindestabstand zwischen zwei Schritten bei aktueller Rate
    fn step_interval(&self) -> Duration {
        Duration::from_micros(1_000_000 / self.speed.max(1) as u64)
    }

    /// Legt das Phasen-Muster auf die Ausgänge
    /// Bei deaktivierten Ausgängen bleiben alle Pins Low (stromlos)
    fn apply_phase(&mut self) {
        let pattern = STEP_SEQUENCE[self.phase];
        for (pin, active) in self.pins.iter_mut().zip(pattern) {
            let level = if active && self.outputs_enabled {
                Level::High
            } else {
                Level::Low
            };
            pin.set_level(level);
        }
    }
}

impl StepperDriver for GpioStepper {
    fn move_to(&mut self, target: i32) {
        self.target = target;
    }

    fn move_relative(&mut self, steps: i32) {
        self.target = self.position + steps;
    }

    fn run(&mut self) -> bool {
        if self.position == self.target {
            self.speed = 0;
            return false;
        }

        // Schrittrate begrenzen: erst schreiten wenn das Intervall abgelaufen ist
        let now = Instant::now();
        if self.speed > 0 && now - self.last_step < self.step_interval() {
            return true;
        }
        self.speed = (self.speed + self.acceleration).min(self.max_speed);
        self.last_step = now;

        if self.target > self.position {
            self.position += 1;
            self.phase = (self.phase + 1) % 4;
        } else {
            self.position -= 1;
            self.phase = (self.phase + 3) % 4;
        }
        self.apply_phase();

        self.position != self.target
    }

    fn distance_to_go(&self) -> i32 {
        self.target - self.position
    }

    fn current_position(&self) -> i32 {
        self.position
    }

    fn set_current_position(&mut self, position: i32) {
        self.position = position;
        self.target = position;
        self.speed = 0;
    }

    fn enable_outputs(&mut self) {
        self.outputs_enabled = true;
        self.apply_phase();
    }

    fn disable_outputs(&mut self) {
        self.outputs_enabled = false;
        for pin in &mut self.pins {
            pin.set_low();
        }
    }
}
