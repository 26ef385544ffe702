//! Geräte-Abstraktion
//!
//! Jedes steuerbare Objekt des Nodes implementiert [`Device`]: ein Name,
//! eine statische Aktions-Tabelle und ein `invoke`-Einstiegspunkt mit
//! String-Aktion und String-Parameter. Das Trait ist object-safe, damit
//! die Registry einen fest dimensionierten Satz heterogener Geräte als
//! Trait-Objekte halten kann.

use crate::types::{ActionError, ActionReply};

/// Vertrag für alle steuerbaren Geräte des Nodes
///
/// Geräte werden einmal beim Start konstruiert, per [`Device::setup`]
/// initialisiert und leben bis zum Prozessende. Mutiert wird der Zustand
/// ausschließlich über `invoke` und den zyklischen `tick` - beides läuft
/// strikt sequenziell in derselben Control-Loop, es gibt keine echte
/// Nebenläufigkeit.
pub trait Device {
    /// Eindeutiger Gerätename innerhalb der Registry (unveränderlich)
    fn name(&self) -> &str;

    /// Gepunkteter hierarchischer Klassen-Bezeichner
    /// (z.B. "js.hera.dev.RollerBlinds")
    ///
    /// Dient Clients zur Typ-Erkennung, nicht dem Dispatch.
    fn device_class(&self) -> &'static str;

    /// Lebt das Gerät auf diesem Node?
    ///
    /// Remote-Proxies geben `false` zurück; sie erhalten weder `setup`
    /// noch `tick` und greifen nie direkt auf Hardware zu.
    fn is_local(&self) -> bool {
        true
    }

    /// Statische Aktions-Tabelle der Geräteklasse
    ///
    /// Von allen Instanzen einer Klasse geteilt, zur Laufzeit read-only.
    fn actions(&self) -> &'static [&'static str];

    /// Stellt den Zustand aus dem Persistenz-Speicher wieder her
    ///
    /// Läuft bevor das Gerät erreichbar wird.
    fn setup(&mut self) {}

    /// Ein Scheduler-Zyklus für inkrementelle, nicht-blockierende Arbeit
    ///
    /// Lang laufende physische Bewegung wird hier Schritt für Schritt
    /// abgearbeitet statt in einem einzelnen blockierenden Aufruf.
    fn tick(&mut self) {}

    /// Führt eine benannte Aktion synchron aus
    ///
    /// Der Handler läuft bis zum Ende, bevor das Ergebnis zurückgegeben
    /// wird; er muss deshalb O(1) bezüglich physischer Bewegung sein.
    /// Ein Aktionsname außerhalb der Tabelle ist ein Client-Fehler und
    /// ergibt [`ActionError::UnknownAction`], nie stillen Erfolg.
    fn invoke(&mut self, action: &str, parameter: &str) -> Result<ActionReply, ActionError>;
}
