//! ESP Core - Platform-agnostic Geräte-Logik und Traits
//!
//! Diese Crate enthält KEINE Hardware-Dependencies.
//! Sie definiert die Geräte-Abstraktion, die Dispatch-Registry und die
//! Zustandsmaschinen der steuerbaren Geräte.

#![no_std]

pub mod actuator;
pub mod blinds;
pub mod device;
pub mod logic;
pub mod registry;
pub mod traits;
pub mod types;

// Re-exports für einfachen Zugriff
pub use actuator::{Actuator, OutMode};
pub use blinds::RollerBlinds;
pub use device::Device;
pub use logic::{level_from_parameter, parse_percent, target_steps};
pub use registry::DeviceRegistry;
pub use traits::{LedError, OutputPort, PersistentStore, SmartLedWriter, StepperDriver};
pub use types::{
    ActionError, ActionReply, DeviceEvent, DispatchError, ErrorReply, MotorOrientation, NameString,
};
