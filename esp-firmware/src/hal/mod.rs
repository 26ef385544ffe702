// Hardware Abstraction Layer (HAL) Module
//
// Konkrete Implementierungen der esp-core Hardware-Traits.
// Die Geräte-Logik in esp-core kennt nur die Traits; erst hier
// werden GPIO, RMT und Flash angebunden.

pub mod flash_store;
pub mod led_writer;
pub mod out_port;
pub mod stepper;

pub use flash_store::FlashStore;
pub use led_writer::RmtLedWriter;
pub use out_port::GpioOutputPort;
pub use stepper::GpioStepper;
