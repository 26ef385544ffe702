//! Hardware Abstraction Traits
//!
//! Diese Traits definieren Schnittstellen für Hardware-Zugriff
//! ohne konkrete Implementierung.
//!
//! # Implementierungen
//! - **Production:** GPIO/RMT/Flash-basierte Typen in esp-firmware
//! - **Testing:** in-memory Mocks in esp-tests

use rgb::RGB8;

/// Fehler-Typ für LED-Operationen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedError {
    WriteFailed,
}

/// Trait für SmartLED Hardware-Zugriff
///
/// Abstrahiert den Zugriff auf RGB LEDs (WS2812/Neopixel).
/// Wird als Status-Indikator für Aktoren verwendet: die LED zeigt
/// den Schaltzustand lokal an, ihr Zustand wird nie persistiert.
pub trait SmartLedWriter: Send {
    /// Schreibt eine RGB-Farbe auf die LED
    ///
    /// # Fehlerbehandlung
    /// Gibt `LedError::WriteFailed` zurück wenn Hardware-Zugriff fehlschlägt
    fn write(&mut self, color: RGB8) -> Result<(), LedError>;
}

/// Trait für den nichtflüchtigen Byte-Speicher
///
/// Byte-adressierbarer Key/Value-Store (Key = Offset, Value = Feld fester
/// Breite). Es gibt keine Transaktionen: die einzige Atomaritäts-Einheit
/// ist das Schreiben eines einzelnen Feldes. Mehrfeld-Updates müssen ihre
/// Schreib-Reihenfolge selbst so wählen, dass ein Stromausfall dazwischen
/// keinen unwiederbringlichen Zustand hinterlässt.
///
/// Schreibfehler werden nicht modelliert; der Speicher gilt als immer
/// verfügbar.
pub trait PersistentStore: Send {
    /// Liest ein Byte an der gegebenen Adresse
    fn read_byte(&mut self, offset: usize) -> u8;

    /// Schreibt ein Byte an die gegebene Adresse
    fn write_byte(&mut self, offset: usize, value: u8);

    /// Liest ein 4-Byte-Feld (little-endian)
    fn read_i32(&mut self, offset: usize) -> i32 {
        let bytes = [
            self.read_byte(offset),
            self.read_byte(offset + 1),
            self.read_byte(offset + 2),
            self.read_byte(offset + 3),
        ];
        i32::from_le_bytes(bytes)
    }

    /// Schreibt ein 4-Byte-Feld (little-endian)
    fn write_i32(&mut self, offset: usize, value: i32) {
        for (i, byte) in value.to_le_bytes().iter().enumerate() {
            self.write_byte(offset + i, *byte);
        }
    }
}

/// Trait für den Schrittmotor-Treiber
///
/// Minimaler Vertrag einer AccelStepper-artigen Bewegungs-Primitive:
/// absolute Zielvorgabe plus inkrementelles Abarbeiten. Die
/// Geschwindigkeits-/Beschleunigungskurve ist Sache des Treibers, nicht
/// der Zustandsmaschine.
pub trait StepperDriver: Send {
    /// Setzt eine absolute Zielposition (in Motorschritten)
    fn move_to(&mut self, target: i32);

    /// Setzt eine Zielposition relativ zur aktuellen Position
    fn move_relative(&mut self, steps: i32);

    /// Arbeitet höchstens ein Bewegungs-Inkrement ab
    ///
    /// Gibt `true` zurück solange der Motor sein Ziel noch nicht
    /// erreicht hat. Darf nie blockieren.
    fn run(&mut self) -> bool;

    /// Verbleibende Schritte bis zur Zielposition (vorzeichenbehaftet)
    fn distance_to_go(&self) -> i32;

    /// Aktueller Schrittzähler
    fn current_position(&self) -> i32;

    /// Überschreibt den Schrittzähler ohne physische Bewegung
    fn set_current_position(&mut self, position: i32);

    /// Aktiviert die Motor-Ausgänge
    fn enable_outputs(&mut self);

    /// Deaktiviert die Motor-Ausgänge (Stromsparen im Stillstand)
    fn disable_outputs(&mut self);
}

/// Trait für geschaltete Ausgänge
///
/// Treiber-Seite eines Aktors. `level` ist 0..=255; ein digitaler Port
/// interpretiert jeden Wert > 0 als "ein". Schreibzugriffe gelten als
/// sofort und zuverlässig, es gibt keine Retries.
pub trait OutputPort: Send {
    /// Setzt den Ausgangspegel
    fn set_level(&mut self, level: u8);
}
