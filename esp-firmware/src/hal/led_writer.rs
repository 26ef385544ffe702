// SmartLED Writer Implementierung für den Aktor-Indikator
//
// Implementiert das SmartLedWriter Trait aus esp-core
// auf Basis des ESP32 RMT Peripherals.

use esp_core::{LedError, SmartLedWriter};
use esp_hal::Blocking;
use esp_hal::rmt::Rmt;
use esp_hal::time::Rate;
use esp_hal_smartled::SmartLedsAdapter;
use rgb::RGB8;
use smart_leds_trait::SmartLedsWrite;

// Buffer-Größe für 1 LED (3 Farben * 8 Bits + 1 Reset)
const LED_BUFFER_SIZE: usize = 25;

/// Real Hardware LED Writer
///
/// Nutzt ESP32 RMT Peripheral um WS2812 LEDs anzusteuern.
///
/// Hinweis: Der Buffer muss 'static sein, daher wird er im Task erstellt
/// und als Parameter übergeben statt im Constructor allokiert.
pub struct RmtLedWriter<'a> {
    led: SmartLedsAdapter<'a, LED_BUFFER_SIZE>,
}

impl<'a> RmtLedWriter<'a> {
    /// Erstellt einen neuen RmtLedWriter
    ///
    /// # Parameter
    /// - `gpio8`: GPIO8 Peripheral für LED-Datenleitung
    /// - `rmt_peripheral`: RMT Peripheral
    /// - `rmt_clock_mhz`: RMT Clock Frequenz in MHz (z.B. 80)
    /// - `buffer`: Buffer für LED-Daten (erstellt mit smart_led_buffer!(1) Macro)
    pub fn new(
        gpio8: esp_hal::peripherals::GPIO8<'a>,
        rmt_peripheral: esp_hal::peripherals::RMT<'a>,
        rmt_clock_mhz: u32,
        buffer: &'a mut [esp_hal::rmt::PulseCode; LED_BUFFER_SIZE],
    ) -> Self {
        // RMT initialisieren
        let rmt: Rmt<'a, Blocking> =
            Rmt::new(rmt_peripheral, Rate::from_mhz(rmt_clock_mhz)).unwrap();

        // SmartLED Adapter erstellen
        let led = SmartLedsAdapter::new(rmt.channel0, gpio8, buffer);

        Self { led }
    }
}

impl<'a> SmartLedWriter for RmtLedWriter<'a> {
    fn write(&mut self, color: RGB8) -> Result<(), LedError> {
        self.led
            .write([color].into_iter())
            .map_err(|_| LedError::WriteFailed)
    }
}
