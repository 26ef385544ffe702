//! Device Registry & Dispatch
//!
//! Die Registry besitzt die feste, beim Start aufgebaute Geräte-Sammlung
//! und routet eingehende Invoke-Requests: linearer Scan über die Geräte
//! nach Name, dann Aktions-Auflösung im Gerät selbst. Nach dem Start wird
//! die Sammlung nie mehr verändert.

use crate::device::Device;
use crate::types::{ActionReply, DispatchError};

/// Registry über einen fest dimensionierten Satz von Geräten
///
/// Hält die Geräte als Trait-Objekte; die Slice-Länge steht zur Build-Zeit
/// fest, es gibt keine dynamische Registrierung.
pub struct DeviceRegistry<'d> {
    devices: &'d mut [&'d mut dyn Device],
}

impl<'d> DeviceRegistry<'d> {
    pub fn new(devices: &'d mut [&'d mut dyn Device]) -> Self {
        Self { devices }
    }

    /// Anzahl registrierter Geräte
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Sucht ein Gerät per Namen (linearer Scan)
    pub fn resolve(&mut self, name: &str) -> Option<&mut (dyn Device + 'd)> {
        self.devices
            .iter_mut()
            .find(|device| device.name() == name)
            .map(|device| &mut **device)
    }

    /// Routet einen Invoke-Request zum passenden Gerät und Handler
    ///
    /// Beide Fehlerfälle (unbekanntes Gerät, unbekannte Aktion) werden dem
    /// Aufrufer gemeldet und sind nie fatal für den Node.
    pub fn dispatch(
        &mut self,
        device: &str,
        action: &str,
        parameter: &str,
    ) -> Result<ActionReply, DispatchError> {
        match self.resolve(device) {
            Some(found) => found
                .invoke(action, parameter)
                .map_err(DispatchError::Action),
            None => Err(DispatchError::DeviceNotFound),
        }
    }

    /// Initialisiert alle lokalen Geräte
    ///
    /// Remote-Proxies haben keinen Hardware- oder Speicher-Zugriff und
    /// werden übersprungen.
    pub fn setup_all(&mut self) {
        for device in self.devices.iter_mut() {
            if device.is_local() {
                device.setup();
            }
        }
    }

    /// Tickt jedes lokale Gerät genau einmal
    ///
    /// Die Antwortzeit der Control-Loop ist damit die Summe der
    /// Tick-Kosten, nicht die Dauer einer Bewegung.
    pub fn tick_all(&mut self) {
        for device in self.devices.iter_mut() {
            if device.is_local() {
                device.tick();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ActionError;
    use core::fmt::Write;

    /// Minimales Testgerät: zählt Ticks und meldet sie als Aktion
    struct CounterDevice {
        name: &'static str,
        local: bool,
        ticks: u32,
    }

    impl CounterDevice {
        fn new(name: &'static str, local: bool) -> Self {
            Self {
                name,
                local,
                ticks: 0,
            }
        }
    }

    impl Device for CounterDevice {
        fn name(&self) -> &str {
            self.name
        }

        fn device_class(&self) -> &'static str {
            "js.hera.dev.Counter"
        }

        fn is_local(&self) -> bool {
            self.local
        }

        fn actions(&self) -> &'static [&'static str] {
            &["ticks"]
        }

        fn tick(&mut self) {
            self.ticks += 1;
        }

        fn invoke(&mut self, action: &str, _parameter: &str) -> Result<ActionReply, ActionError> {
            match action {
                "ticks" => {
                    let mut reply = ActionReply::new();
                    let _ = write!(reply, "{}", self.ticks);
                    Ok(reply)
                }
                _ => Err(ActionError::UnknownAction),
            }
        }
    }

    #[test]
    fn test_dispatch_routes_by_name() {
        let mut a = CounterDevice::new("a", true);
        let mut b = CounterDevice::new("b", true);
        let mut devices: [&mut dyn Device; 2] = [&mut a, &mut b];
        let mut registry = DeviceRegistry::new(&mut devices);

        registry.tick_all();
        registry.tick_all();

        let reply = registry.dispatch("b", "ticks", "").unwrap();
        assert_eq!(reply.as_str(), "2");
    }

    #[test]
    fn test_dispatch_unknown_device() {
        let mut a = CounterDevice::new("a", true);
        let mut devices: [&mut dyn Device; 1] = [&mut a];
        let mut registry = DeviceRegistry::new(&mut devices);

        let result = registry.dispatch("fehlt", "ticks", "");
        assert_eq!(result, Err(DispatchError::DeviceNotFound));
    }

    #[test]
    fn test_dispatch_unknown_action() {
        let mut a = CounterDevice::new("a", true);
        let mut devices: [&mut dyn Device; 1] = [&mut a];
        let mut registry = DeviceRegistry::new(&mut devices);

        let result = registry.dispatch("a", "explodier", "");
        assert_eq!(
            result,
            Err(DispatchError::Action(ActionError::UnknownAction))
        );
    }

    #[test]
    fn test_remote_devices_are_not_ticked() {
        let mut local = CounterDevice::new("lokal", true);
        let mut remote = CounterDevice::new("fern", false);
        let mut devices: [&mut dyn Device; 2] = [&mut local, &mut remote];
        let mut registry = DeviceRegistry::new(&mut devices);

        registry.tick_all();

        assert_eq!(registry.dispatch("lokal", "ticks", "").unwrap().as_str(), "1");
        assert_eq!(registry.dispatch("fern", "ticks", "").unwrap().as_str(), "0");
    }

    #[test]
    fn test_resolve_finds_registered_device() {
        let mut a = CounterDevice::new("a", true);
        let mut devices: [&mut dyn Device; 1] = [&mut a];
        let mut registry = DeviceRegistry::new(&mut devices);

        assert!(registry.resolve("a").is_some());
        assert!(registry.resolve("b").is_none());
        assert_eq!(registry.len(), 1);
    }
}
