// mDNS Responder Task - Advertised den Node-Hostnamen via Multicast DNS
//
// Der Node wird damit unter einem lesbaren Hostnamen (z.B. "heim.local")
// im lokalen Netzwerk erreichbar, ohne dass ein DNS-Server benötigt wird.
// Steuerungs-Clients finden die RMI-Endpunkte über diesen Namen.
//
// Technische Details:
// - Protokoll: mDNS (RFC 6762)
// - Transport: UDP Multicast auf 224.0.0.251:5353
// - Unterstützt: A-Records (IPv4 Hostname-Auflösung)
// - Library: edge-mdns (no_std), edge-nal-embassy als embassy-net Adapter

use defmt::{Debug2Format, error, info, warn};
use embassy_net::Stack;
use embassy_time::{Duration, Timer};

use core::net::{Ipv4Addr, SocketAddr};
use core::sync::atomic::{AtomicU32, Ordering};

use edge_mdns::{HostAnswersMdnsHandler, buf::VecBufAccess, domain::base::Ttl, host::Host, io};
use edge_nal::{MulticastV4, UdpBind, UdpSplit};
use edge_nal_embassy::{Udp, UdpBuffers};
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::signal::Signal;

use crate::config::{
    MDNS_HOSTNAME, MDNS_MULTICAST_ADDR, MDNS_PACKET_BUFFER_SIZE, MDNS_PORT,
    MDNS_RECONNECT_DELAY_SECS, MDNS_TTL_SECS, MDNS_UDP_BUFFER_SIZE,
};

/// Atomischer Counter für den mDNS-RNG
static RNG_COUNTER: AtomicU32 = AtomicU32::new(0);

/// Random Number Generator für mDNS Transaction IDs
///
/// Ein wrapping counter statt echter Zufallszahlen; für mDNS
/// ausreichend, da nur Eindeutigkeit benötigt wird.
fn mdns_rng(buf: &mut [u8]) {
    let mut counter = RNG_COUNTER.fetch_add(1, Ordering::Relaxed);
    for chunk in buf.chunks_mut(4) {
        let bytes = counter.to_le_bytes();
        let len = chunk.len().min(4);
        chunk[..len].copy_from_slice(&bytes[..len]);
        counter = counter.wrapping_add(1);
    }
}

/// mDNS Responder Task
///
/// Advertised den Node via mDNS unter dem Hostnamen aus `MDNS_HOSTNAME`.
/// Nach erfolgreicher Initialisierung ist der Node erreichbar unter
/// `<MDNS_HOSTNAME>.local`, z.B.:
///
/// ```bash
/// curl -d '["Light-1","on",""]' http://heim.local/js/hera/dev/HostSystem/invoke.rmi
/// ```
///
/// Bei jedem Fehler: automatischer Neustart des Responders nach
/// MDNS_RECONNECT_DELAY_SECS.
#[embassy_executor::task]
pub async fn mdns_responder_task(stack: &'static Stack<'static>) {
    info!("mDNS: Task started, waiting for network...");
    wait_for_network(stack).await;
    info!("mDNS: Network ready");

    loop {
        match run_mdns_responder(stack).await {
            Ok(_) => warn!("mDNS: Responder stopped normally"),
            Err(e) => error!("mDNS: Error: {}", e),
        }
        info!("mDNS: Reconnecting in {}s...", MDNS_RECONNECT_DELAY_SECS);
        Timer::after(Duration::from_secs(MDNS_RECONNECT_DELAY_SECS)).await;
    }
}

/// Wartet bis Netzwerk-Verbindung verfügbar ist
///
/// Prüft kontinuierlich Link-Status und DHCP-Konfiguration.
/// Identisches Pattern wie in `mqtt.rs` verwendet.
async fn wait_for_network(stack: &'static Stack<'static>) {
    loop {
        if stack.is_link_up() {
            if let Some(_) = stack.config_v4() {
                break;
            }
        }
        Timer::after(Duration::from_millis(500)).await;
    }
}

/// Führt die mDNS Responder Loop aus
///
/// Lifecycle: IP vom DHCP holen, UDP-Socket auf 0.0.0.0:5353 binden,
/// Multicast-Gruppe joinen, dann blocking auf Queries antworten.
async fn run_mdns_responder(stack: &'static Stack<'static>) -> Result<(), MdnsError> {
    // IP-Adresse vom DHCP holen
    let our_ip = stack.config_v4().unwrap().address.address();
    info!("mDNS: Using IP {}", Debug2Format(&our_ip));

    // UDP Adapter erstellen (edge-nal-embassy → embassy-net)
    // StaticCell wird nur einmal initialisiert, weitere Calls returnen die
    // existierende Referenz - wichtig für die Reconnect-Loop
    static UDP_BUFFERS: static_cell::StaticCell<
        UdpBuffers<1, MDNS_UDP_BUFFER_SIZE, MDNS_UDP_BUFFER_SIZE>,
    > = static_cell::StaticCell::new();
    let udp_buffers = UDP_BUFFERS.init_with(|| UdpBuffers::new());
    let udp_stack = Udp::new(*stack, udp_buffers);

    // Multicast Socket auf 0.0.0.0:MDNS_PORT binden
    let mut socket = udp_stack
        .bind(SocketAddr::new(Ipv4Addr::UNSPECIFIED.into(), MDNS_PORT))
        .await
        .map_err(|_| MdnsError::SocketBindFailed)?;

    // Join Multicast-Gruppe (mDNS IPv4)
    socket
        .join_v4(Ipv4Addr::from(MDNS_MULTICAST_ADDR), Ipv4Addr::UNSPECIFIED)
        .await
        .map_err(|_| MdnsError::MulticastJoinFailed)?;

    // Socket in RX/TX splitten für edge-mdns API
    let (recv, send) = socket.split();

    // Host-Konfiguration für mDNS Responses
    let host = Host {
        hostname: MDNS_HOSTNAME,            // Hostname ohne .local Suffix
        ipv4: our_ip.into(),                // Unsere IPv4-Adresse vom DHCP
        ipv6: [0u8; 16].into(),             // IPv6 nicht unterstützt (kein proto-ipv6 in smoltcp)
        ttl: Ttl::from_secs(MDNS_TTL_SECS), // Cache-Dauer für Clients
    };

    // mDNS Packet Buffers (stack-allocated, 1500 Bytes = Standard MTU)
    let recv_buf = VecBufAccess::<NoopRawMutex, MDNS_PACKET_BUFFER_SIZE>::new();
    let send_buf = VecBufAccess::<NoopRawMutex, MDNS_PACKET_BUFFER_SIZE>::new();

    // Signal für Broadcast-Notifications (nicht verwendet, aber von API benötigt)
    let signal = Signal::<NoopRawMutex, ()>::new();

    // mDNS Responder erstellen
    let mdns = io::Mdns::new(
        Some(our_ip), // IPv4 Interface
        None,         // Kein IPv6
        recv,         // UDP RX
        send,         // UDP TX
        recv_buf,     // RX Buffer
        send_buf,     // TX Buffer
        mdns_rng,     // RNG für Transaction IDs
        &signal,      // Broadcast Signal
    );

    info!(
        "mDNS: Responder running, advertising '{}.local'",
        MDNS_HOSTNAME
    );

    // Blocking: Läuft bis Fehler auftritt
    // HostAnswersMdnsHandler implementiert einfache A-Record Responses
    // (nur Hostname → IP, kein Service Discovery)
    mdns.run(HostAnswersMdnsHandler::new(&host))
        .await
        .map_err(|_| MdnsError::ResponderFailed)?;

    Ok(())
}

/// mDNS Fehler-Typen
///
/// Jeder Fehler führt zu einem Reconnect-Versuch im Haupt-Loop.
#[derive(Debug)]
enum MdnsError {
    SocketBindFailed,
    MulticastJoinFailed,
    ResponderFailed,
}

impl defmt::Format for MdnsError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            MdnsError::SocketBindFailed => defmt::write!(fmt, "Socket bind failed"),
            MdnsError::MulticastJoinFailed => defmt::write!(fmt, "Multicast join failed"),
            MdnsError::ResponderFailed => defmt::write!(fmt, "Responder failed"),
        }
    }
}
