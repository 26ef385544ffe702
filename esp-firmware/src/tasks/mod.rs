// Task-Modul: Enthält alle Embassy Tasks
//
// Jeder Task läuft asynchron und unabhängig.
// Tasks kommunizieren über Embassy Channels (HTTP ↔ Geräte-Loop → MQTT).

pub mod http;
pub mod mdns;
pub mod mqtt;
pub mod node;
pub mod wifi;

// Re-export Tasks für einfachen Import
pub use http::http_server_task;
pub use mdns::mdns_responder_task;
pub use mqtt::mqtt_task;
pub use node::node_task;
pub use wifi::{connection_task, dhcp_task, net_task};
