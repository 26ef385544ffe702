// Invoke-Protokoll-Definitionen
// Definiert die JSON-Bodies der RMI-Endpunkte

use serde::Deserialize;

use crate::{NameString, ParamString};

/// Body eines Invoke-Requests: JSON-Array aus drei Strings
///
/// `["geräte-name", "aktions-name", "parameter"]`
///
/// Der Parameter ist immer vorhanden, ggf. als leerer String. Überlange
/// Felder lassen die Deserialisierung fehlschlagen (bounded Strings).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InvokeBody(pub NameString, pub NameString, pub ParamString);

/// URL eines Event-Listeners (subscribe.rmi)
pub type ListenerUrl = heapless::String<128>;

/// Body eines Subscribe-Requests: JSON-Array aus einer Listener-URL
pub type SubscribeBody = (ListenerUrl,);
