// Web-Modul für den HTTP-Teil des Invoke-Protokolls
// Organisiert alle Web-bezogenen Komponenten

pub mod protocol;
