// GPIO-Ausgang für geschaltete Verbraucher (Relais, Lampe)
//
// Implementiert das OutputPort Trait aus esp-core.

use esp_core::OutputPort;
use esp_hal::gpio::Output;

/// Digitaler Ausgang an einem GPIO-Pin
///
/// Level 0 schaltet den Pin Low, alles andere High.
/// Feinere Abstufung (PWM) ist Sache eines anderen Ports.
pub struct GpioOutputPort {
    pin: Output<'static>,
}

impl GpioOutputPort {
    pub fn new(pin: Output<'static>) -> Self {
        Self { pin }
    }
}

impl OutputPort for GpioOutputPort {
    fn set_level(&mut self, level: u8) {
        if level > 0 {
            self.pin.set_high();
        } else {
            self.pin.set_low();
        }
    }
}
