// Keine Standard-Bibliothek verwenden (Embedded System)
#![no_std]
// Kein normaler main() Einstiegspunkt (wird von esp_rtos bereitgestellt)
#![no_main]
// Verbiete mem::forget - gefährlich bei ESP HAL Types mit DMA-Buffern
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]
// Verbiete große Stack-Frames (Stack ist auf Embedded Systemen begrenzt)
#![deny(clippy::large_stack_frames)]

// Heap Allocator (WiFi benötigt dynamischen Speicher)
extern crate alloc;

// Embassy Async Runtime
use embassy_executor::Spawner;
use embassy_net::{Config as NetConfig, Stack, StackResources};
use embassy_time::{Duration, Timer};

// ESP32-C6 HAL
use esp_hal::clock::CpuClock;
use esp_hal::rng::Rng;
use esp_hal::timer::timg::TimerGroup;

// Backtrace bei Panic und println!() Support
use {esp_backtrace as _, esp_println as _};

// Projekt-Module und Konfiguration
use esp_heimsteuerung::config::{EXTRA_HEAP_SIZE, WIFI_HEAP_SIZE};
use esp_heimsteuerung::tasks::{
    connection_task, dhcp_task, http_server_task, mdns_responder_task, mqtt_task, net_task,
    node_task,
};
use esp_heimsteuerung::{DeviceEventChannel, InvokeReplyChannel, InvokeRequestChannel};

// ESP-IDF App Descriptor - erforderlich für den Bootloader!
// Ohne diesen schlägt das Flashen mit "ESP-IDF App Descriptor missing" fehl
esp_bootloader_esp_idf::esp_app_desc!();

/// Main Entry Point
///
/// Initialisiert Hardware, WiFi, startet Embassy Runtime und spawnt Tasks.
/// Danach schläft main() - alle Arbeit läuft in Tasks.
#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    // ESP32-C6 Konfiguration: CPU auf maximale Taktfrequenz (160 MHz)
    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    // Heap Allocator initialisieren (WiFi braucht dynamischen Speicher!)
    // Zwei Bereiche: reclaimed RAM (64 KB) + extra (36 KB) = 100 KB total
    esp_alloc::heap_allocator!(
        #[esp_hal::ram(reclaimed)]
        size: WIFI_HEAP_SIZE
    );
    esp_alloc::heap_allocator!(size: EXTRA_HEAP_SIZE);

    // Embassy Runtime initialisieren (Timer + Software Interrupt)
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    let sw_interrupt =
        esp_hal::interrupt::software::SoftwareInterruptControl::new(peripherals.SW_INTERRUPT);
    esp_rtos::start(timg0.timer0, sw_interrupt.software_interrupt0);

    // WiFi Hardware initialisieren
    static RADIO_INIT: static_cell::StaticCell<esp_radio::Controller> =
        static_cell::StaticCell::new();
    let radio_init =
        RADIO_INIT.init(esp_radio::init().expect("Failed to initialize Wi-Fi/BLE controller"));

    let (wifi_controller, wifi_interface) =
        esp_radio::wifi::new(radio_init, peripherals.WIFI, Default::default())
            .expect("Failed to initialize Wi-Fi");

    // Netzwerk-Stack erstellen
    // Random seed für TCP/IP Stack (von Hardware RNG)
    let rng = Rng::new();
    let seed = (rng.random() as u64) << 32 | rng.random() as u64;

    // Static resources für embassy-net
    // 8 Sockets: MQTT (1) + HTTP-Listener (1) + mDNS (1) + DNS + Reserve
    static RESOURCES: static_cell::StaticCell<StackResources<8>> = static_cell::StaticCell::new();
    let resources = RESOURCES.init(StackResources::new());

    // embassy-net erstellt Stack + Runner (nutzt STA interface für Client-Modus)
    let (stack, runner) = embassy_net::new(
        wifi_interface.sta,
        NetConfig::dhcpv4(Default::default()),
        resources,
        seed,
    );

    // Stack muss 'static sein für Tasks
    static STACK: static_cell::StaticCell<Stack<'static>> = static_cell::StaticCell::new();
    let stack = &*STACK.init(stack);

    // Invoke-Channels erstellen (HTTP ↔ Geräte-Loop)
    // Kapazität 1 auf beiden: das Protokoll kennt nur einen Request in flight
    static REQUEST_CHANNEL: static_cell::StaticCell<InvokeRequestChannel> =
        static_cell::StaticCell::new();
    let request_channel = REQUEST_CHANNEL.init(InvokeRequestChannel::new());
    let request_sender = request_channel.sender();
    let request_receiver = request_channel.receiver();

    static REPLY_CHANNEL: static_cell::StaticCell<InvokeReplyChannel> =
        static_cell::StaticCell::new();
    let reply_channel = REPLY_CHANNEL.init(InvokeReplyChannel::new());
    let reply_sender = reply_channel.sender();
    let reply_receiver = reply_channel.receiver();

    // Event-Channel erstellen (Geräte-Loop → MQTT)
    // PubSubChannel für Broadcast: alle Subscribers bekommen jedes Event
    static EVENT_CHANNEL: static_cell::StaticCell<DeviceEventChannel> =
        static_cell::StaticCell::new();
    let event_channel = &*EVENT_CHANNEL.init(DeviceEventChannel::new());
    let event_publisher = event_channel.publisher().unwrap();

    // Spawn Geräte-Loop (besitzt Stepper, Relais, Indikator-LED und Flash)
    spawner
        .spawn(node_task(
            peripherals.GPIO18,
            peripherals.GPIO19,
            peripherals.GPIO20,
            peripherals.GPIO21,
            peripherals.GPIO2,
            peripherals.GPIO8,
            peripherals.RMT,
            request_receiver,
            reply_sender,
            event_publisher,
        ))
        .unwrap();

    // Spawn WiFi Tasks
    spawner.spawn(connection_task(wifi_controller)).unwrap();
    spawner.spawn(net_task(runner)).unwrap();
    spawner.spawn(dhcp_task(stack)).unwrap();

    // Spawn MQTT Task (mit Subscriber für Geräte-Events)
    let mqtt_subscriber = event_channel.subscriber().unwrap();
    spawner.spawn(mqtt_task(stack, mqtt_subscriber)).unwrap();

    // Spawn HTTP Server Task (genau einer: Requests laufen seriell)
    spawner
        .spawn(http_server_task(stack, request_sender, reply_receiver))
        .unwrap();

    // Spawn mDNS Responder Task (für heim.local Hostname)
    spawner.spawn(mdns_responder_task(stack)).unwrap();

    // Main-Loop: schläft (alle Arbeit läuft in Tasks)
    loop {
        Timer::after(Duration::from_secs(3600)).await;
    }
}
