//! Integration Tests für die Invoke-Kanal-Disziplin
//!
//! HTTP-Task und Geräte-Loop koppeln sich über Kanäle mit Kapazität 1.
//! Gibt der HTTP-Task einen Request per Timeout auf, stellt die
//! Geräte-Loop ihre Antwort trotzdem noch zu; sie bleibt im Kanal
//! liegen. Ohne Verwerfen erhielte ab dann jeder Request die Antwort
//! seines Vorgängers. Diese Tests sichern die Verwerf-Disziplin ab, die
//! der HTTP-Task vor jedem neuen Request anwendet.

use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::channel::{Channel, Receiver};
use esp_core::{ActionReply, DispatchError};

type InvokeOutcome = Result<ActionReply, DispatchError>;
type ReplyChannel = Channel<NoopRawMutex, InvokeOutcome, 1>;
type ReplyReceiver<'a> = Receiver<'a, NoopRawMutex, InvokeOutcome, 1>;

/// Verwirft liegengebliebene Antworten aufgegebener Requests
/// (identische Disziplin wie im HTTP-Task vor jedem neuen Request)
fn drain_stale_replies(receiver: &ReplyReceiver<'_>) {
    while receiver.try_receive().is_ok() {}
}

fn reply(text: &str) -> InvokeOutcome {
    let mut reply = ActionReply::new();
    reply.push_str(text).unwrap();
    Ok(reply)
}

#[test]
fn test_stale_reply_is_discarded_before_next_request() {
    let channel = ReplyChannel::new();
    let sender = channel.sender();
    let receiver = channel.receiver();

    // Request 1 läuft in den Timeout; die Geräte-Loop stellt ihre
    // Antwort trotzdem noch zu
    sender.try_send(reply("1")).unwrap();

    // Requests 2 und 3: erst verwerfen, dann die eigene Antwort
    // entgegennehmen - die Zuordnung bleibt dauerhaft korrekt
    drain_stale_replies(&receiver);
    sender.try_send(reply("2")).unwrap();
    assert_eq!(receiver.try_receive().unwrap().unwrap().as_str(), "2");

    drain_stale_replies(&receiver);
    sender.try_send(reply("3")).unwrap();
    assert_eq!(receiver.try_receive().unwrap().unwrap().as_str(), "3");

    // keine Antwort übrig
    assert!(receiver.try_receive().is_err());
}

#[test]
fn test_without_discard_replies_shift_by_one() {
    // Das Fehlerbild das die Disziplin verhindert: einmal aus dem Takt,
    // immer aus dem Takt
    let channel = ReplyChannel::new();
    let sender = channel.sender();
    let receiver = channel.receiver();

    sender.try_send(reply("1")).unwrap();

    // Request 2 ohne Verwerfen: erhält die Antwort des Vorgängers
    assert_eq!(receiver.try_receive().unwrap().unwrap().as_str(), "1");
    sender.try_send(reply("2")).unwrap();

    // und der Versatz pflanzt sich fort
    assert_eq!(receiver.try_receive().unwrap().unwrap().as_str(), "2");
}

#[test]
fn test_discard_on_empty_channel_is_a_no_op() {
    let channel = ReplyChannel::new();
    let sender = channel.sender();
    let receiver = channel.receiver();

    drain_stale_replies(&receiver);

    sender.try_send(reply("42")).unwrap();
    assert_eq!(receiver.try_receive().unwrap().unwrap().as_str(), "42");
}
