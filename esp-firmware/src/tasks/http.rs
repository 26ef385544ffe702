// HTTP Server Task - Stellt die RMI-Endpunkte des Invoke-Protokolls bereit
use defmt::{info, warn};
use embassy_net::Stack;
use embassy_time::{Duration, with_timeout};
use picoserve::{
    extract::Json,
    io::embedded_io_async,
    response::IntoResponse,
    routing::{get, post},
};

use crate::config::{
    HTTP_BUFFER_SIZE, HTTP_PORT, INVOKE_BODY_SIZE, INVOKE_REPLY_TIMEOUT_MS, NODE_VERSION,
    TCP_RX_BUFFER_SIZE, TCP_TX_BUFFER_SIZE,
};
use crate::web::protocol::{InvokeBody, SubscribeBody};
use crate::{InvokeReplyReceiver, InvokeRequestSender};
use esp_core::ErrorReply;

/// Response-Enum für die RMI-Endpunkte
/// Bildet die drei Antwort-Klassen des Protokolls ab
enum RmiResponse {
    /// 200: Aktion ausgeführt, Ergebnis im Body
    Result(crate::ActionReply),
    /// 204: Aktion ausgeführt, kein Ergebnis
    NoContent,
    /// 500: Routing-Fehler, Fehlertext im Body
    ServerError(ErrorReply),
    /// 503: Geräte-Loop hat nicht rechtzeitig geantwortet
    Unavailable,
}

impl IntoResponse for RmiResponse {
    async fn write_to<
        R: embedded_io_async::Read,
        W: picoserve::response::ResponseWriter<Error = R::Error>,
    >(
        self,
        connection: picoserve::response::Connection<'_, R>,
        response_writer: W,
    ) -> Result<picoserve::ResponseSent, W::Error> {
        use picoserve::response::{Response, StatusCode};

        match self {
            RmiResponse::Result(reply) => {
                Response::new(StatusCode::OK, reply.as_str())
                    .write_to(connection, response_writer)
                    .await
            }
            RmiResponse::NoContent => {
                Response::new(StatusCode::new(204), "")
                    .write_to(connection, response_writer)
                    .await
            }
            RmiResponse::ServerError(message) => {
                Response::new(StatusCode::new(500), message.as_str())
                    .write_to(connection, response_writer)
                    .await
            }
            RmiResponse::Unavailable => {
                Response::new(StatusCode::new(503), "Device loop not responding")
                    .with_header("Retry-After", "1")
                    .write_to(connection, response_writer)
                    .await
            }
        }
    }
}

/// Arbeitet einen Invoke-Request ab: an die Geräte-Loop übergeben und
/// auf das Dispatch-Ergebnis warten
///
/// Der Channel hat Kapazität 1 und dieser Task existiert genau einmal;
/// Requests laufen dadurch strikt nacheinander durch den Node.
async fn handle_invoke(
    request_sender: InvokeRequestSender,
    reply_receiver: InvokeReplyReceiver,
    body: InvokeBody,
) -> RmiResponse {
    let InvokeBody(device, action, parameter) = body;

    // Läuft ein Request in den Timeout, liefert die Geräte-Loop ihre
    // Antwort trotzdem noch in den Channel. Liegengebliebene Antworten
    // müssen vor dem nächsten Request verworfen werden, sonst beantwortet
    // jeder Request dauerhaft den jeweils vorherigen
    while reply_receiver.try_receive().is_ok() {
        warn!("HTTP: discarding stale reply of a timed-out request");
    }
    info!(
        "HTTP: invoke {}.{}({})",
        device.as_str(),
        action.as_str(),
        parameter.as_str()
    );

    // Namen für Fehlertexte behalten, der Request wandert in den Channel
    let device_name = device.clone();
    let action_name = action.clone();

    request_sender
        .send(crate::InvokeRequest {
            device,
            action,
            parameter,
        })
        .await;

    let outcome = with_timeout(
        Duration::from_millis(INVOKE_REPLY_TIMEOUT_MS),
        reply_receiver.receive(),
    )
    .await;

    match outcome {
        Ok(Ok(reply)) if reply.is_empty() => RmiResponse::NoContent,
        Ok(Ok(reply)) => RmiResponse::Result(reply),
        Ok(Err(e)) => {
            RmiResponse::ServerError(e.reply_text(device_name.as_str(), action_name.as_str()))
        }
        Err(_) => RmiResponse::Unavailable,
    }
}

/// HTTP Server Task - läuft parallel zu anderen Tasks
///
/// Stellt die drei RMI-Endpunkte bereit:
/// - POST /js/hera/dev/HostSystem/invoke.rmi     → Aktion ausführen
/// - POST /js/hera/dev/HostSystem/subscribe.rmi  → Listener registrieren
/// - GET  /js/hera/dev/HostSystem/version.rmi    → Node-Version melden
///
/// Bewusst KEIN Task-Pool: eine einzelne Instanz serialisiert die
/// Requests, mehr Parallelität gibt das Invoke-Protokoll nicht her.
///
/// # Parameter
/// - `stack`: embassy-net Stack für Netzwerk-Zugriff
/// - `request_sender`: Channel Sender für Invoke-Requests (zur Geräte-Loop)
/// - `reply_receiver`: Channel Receiver für Invoke-Antworten
#[embassy_executor::task]
pub async fn http_server_task(
    stack: &'static Stack<'static>,
    request_sender: InvokeRequestSender,
    reply_receiver: InvokeReplyReceiver,
) {
    info!("HTTP: Server starting on port {}...", HTTP_PORT);

    // Router-Konfiguration: die drei RMI-Endpunkte
    let app = picoserve::Router::new()
        .route(
            "/js/hera/dev/HostSystem/invoke.rmi",
            post(
                move |Json::<InvokeBody, INVOKE_BODY_SIZE>(body)| async move {
                    handle_invoke(request_sender, reply_receiver, body).await
                },
            ),
        )
        .route(
            "/js/hera/dev/HostSystem/subscribe.rmi",
            post(
                |Json::<SubscribeBody, INVOKE_BODY_SIZE>((listener,))| async move {
                    // Listener werden über MQTT bedient; die Registrierung
                    // wird nur bestätigt
                    info!("HTTP: subscribe from {}", listener.as_str());
                    RmiResponse::NoContent
                },
            ),
        )
        .route(
            "/js/hera/dev/HostSystem/version.rmi",
            get(serve_version).post(serve_version),
        );

    // Server-Konfiguration
    let config = picoserve::Config::new(picoserve::Timeouts {
        start_read_request: Some(Duration::from_secs(5)),
        read_request: Some(Duration::from_secs(1)),
        write: Some(Duration::from_secs(1)),
        persistent_start_read_request: Some(Duration::from_secs(5)),
    })
    .keep_connection_alive();

    // HTTP-Buffer für Requests/Responses
    let mut http_buffer = [0u8; HTTP_BUFFER_SIZE];

    // TCP-Buffers für Socket
    let mut rx_buffer = [0u8; TCP_RX_BUFFER_SIZE];
    let mut tx_buffer = [0u8; TCP_TX_BUFFER_SIZE];

    // Server erstellen
    let server = picoserve::Server::new(&app, &config, &mut http_buffer);

    // Server starten (lauscht auf HTTP_PORT)
    let _ = server
        .listen_and_serve(0, *stack, HTTP_PORT, &mut rx_buffer, &mut tx_buffer)
        .await;

    info!("HTTP: Server task ended");
}

/// Meldet den Versions-/Identitäts-String des Nodes
async fn serve_version() -> impl IntoResponse {
    picoserve::response::Response::new(picoserve::response::StatusCode::OK, NODE_VERSION)
        .with_header("Content-Type", "text/plain; charset=utf-8")
}
