// Flash-basierter PersistentStore für Geräte-Zustände
//
// Implementiert das PersistentStore Trait aus esp-core über das
// interne Flash des ESP32 (esp-storage / embedded-storage).

use defmt::warn;
use embedded_storage::{ReadStorage, Storage};
use esp_core::PersistentStore;
use esp_storage::FlashStorage;

/// Byte-Store in einem Flash-Fenster ab `base`
///
/// esp-storage übernimmt das Read-Modify-Write der Flash-Sektoren,
/// daher sind Einzelbyte-Schreiber hier direkt möglich. Jede Geräte-
/// Instanz bekommt ihr eigenes Fenster über eine eigene Basis-Adresse.
pub struct FlashStore {
    flash: FlashStorage,
    base: u32,
}

impl FlashStore {
    /// Erstellt einen neuen FlashStore ab der Basis-Adresse
    ///
    /// Die Basis muss in einem Bereich liegen, den weder App-Image
    /// noch Bootloader nutzen (siehe Partitionstabelle).
    pub fn new(base: u32) -> Self {
        Self {
            flash: FlashStorage::new(),
            base,
        }
    }
}

impl PersistentStore for FlashStore {
    fn read_byte(&mut self, offset: usize) -> u8 {
        let mut buf = [0u8; 1];
        if let Err(e) = self.flash.read(self.base + offset as u32, &mut buf) {
            warn!(
                "FLASH: read at offset {} failed: {}",
                offset,
                defmt::Debug2Format(&e)
            );
            return 0;
        }
        buf[0]
    }

    fn write_byte(&mut self, offset: usize, value: u8) {
        if let Err(e) = self.flash.write(self.base + offset as u32, &[value]) {
            warn!(
                "FLASH: write at offset {} failed: {}",
                offset,
                defmt::Debug2Format(&e)
            );
        }
    }
}
