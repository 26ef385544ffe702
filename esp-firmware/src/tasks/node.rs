// Geräte-Loop Task - Besitzt alle Geräte und arbeitet Invokes ab
use defmt::{info, warn};
use embassy_time::{Duration, Timer};
use esp_core::{
    Actuator, Device, DeviceEvent, DeviceRegistry, MotorOrientation, OutMode, RollerBlinds,
};
use esp_hal::gpio::{Level, Output, OutputConfig};
use esp_hal_smartled::smart_led_buffer;
use rgb::RGB8;

use crate::config::{
    BLINDS_NAME, BLINDS_STORE_OFFSET, DEVICE_TICK_INTERVAL_MS, FLASH_STORE_BASE, LED_BRIGHTNESS,
    LIGHT_NAME, LIGHT_STORE_OFFSET, RMT_CLOCK_MHZ, STEPPER_ACCELERATION, STEPPER_MAX_SPEED,
};
use crate::hal::{FlashStore, GpioOutputPort, GpioStepper, RmtLedWriter};
use crate::{DeviceEventPublisher, InvokeReplySender, InvokeRequestReceiver};

/// Geräte-Loop - Testbare Logik ohne Hardware-Abhängigkeit
///
/// Ein Zyklus pro Tick-Intervall:
/// 1. Höchstens einen Invoke-Request entgegennehmen, an die Registry
///    dispatchen und das Ergebnis zurücksenden
/// 2. Jedes lokale Gerät genau einmal ticken (Bewegungs-Inkremente)
///
/// Alle Geräte leben exklusiv in diesem Task; Handler und Ticks laufen
/// dadurch strikt sequenziell, nie verschachtelt.
///
/// # Parameter
/// - `registry`: Registry mit allen Geräten des Nodes
/// - `request_receiver`: Channel Receiver für Invoke-Requests (vom HTTP-Task)
/// - `reply_sender`: Channel Sender für Invoke-Antworten (zum HTTP-Task)
/// - `event_publisher`: PubSub Publisher für Geräte-Events (zum MQTT-Task)
pub async fn node_logic(
    registry: &mut DeviceRegistry<'_>,
    request_receiver: InvokeRequestReceiver,
    reply_sender: InvokeReplySender,
    event_publisher: DeviceEventPublisher,
) {
    // Persistierten Zustand laden, Crash-Recovery, Ausgänge herstellen
    registry.setup_all();
    info!("NODE: {} devices ready", registry.len());

    loop {
        // Eingehenden Request abarbeiten (non-blocking)
        if let Ok(request) = request_receiver.try_receive() {
            info!(
                "NODE: invoke {}.{}({})",
                request.device.as_str(),
                request.action.as_str(),
                request.parameter.as_str()
            );

            let outcome = registry.dispatch(
                request.device.as_str(),
                request.action.as_str(),
                request.parameter.as_str(),
            );

            match &outcome {
                Ok(reply) => {
                    // Abgeschlossenes Invoke als Event broadcasten
                    let event = DeviceEvent::new(
                        request.device.as_str(),
                        request.action.as_str(),
                        reply.as_str(),
                    );
                    event_publisher.publish_immediate(event);
                }
                Err(e) => warn!("NODE: dispatch failed: {}", e),
            }

            reply_sender.send(outcome).await;
        }

        // Bewegungs-Inkremente aller lokalen Geräte
        registry.tick_all();

        // Async Delay: gibt CPU an andere Tasks zurück
        Timer::after(Duration::from_millis(DEVICE_TICK_INTERVAL_MS)).await;
    }
}

/// Geräte-Loop Task - Embassy Task für parallele Ausführung
///
/// Übernimmt die Hardware-Initialisierung, baut die Geräte und ruft dann
/// die testbare `node_logic()` Funktion auf.
///
/// # GPIO-Zuordnung
/// Die Verdrahtung ist über die typisierten Peripheral-Parameter
/// festgelegt:
/// - GPIO18..GPIO21: Motor-Phasen IN1..IN4 (ULN2003-Treiber)
/// - GPIO2: Relais-Ausgang
/// - GPIO8: RGB Status-LED (WS2812, via RMT)
#[embassy_executor::task]
#[allow(clippy::too_many_arguments)]
pub async fn node_task(
    in1: esp_hal::peripherals::GPIO18<'static>,
    in2: esp_hal::peripherals::GPIO19<'static>,
    in3: esp_hal::peripherals::GPIO20<'static>,
    in4: esp_hal::peripherals::GPIO21<'static>,
    light_pin: esp_hal::peripherals::GPIO2<'static>,
    led_pin: esp_hal::peripherals::GPIO8<'static>,
    rmt_peripheral: esp_hal::peripherals::RMT<'static>,
    request_receiver: InvokeRequestReceiver,
    reply_sender: InvokeReplySender,
    event_publisher: DeviceEventPublisher,
) {
    // Schrittmotor: vier Phasen-Ausgänge, anfangs stromlos
    let stepper = GpioStepper::new(
        [
            Output::new(in1, Level::Low, OutputConfig::default()),
            Output::new(in2, Level::Low, OutputConfig::default()),
            Output::new(in3, Level::Low, OutputConfig::default()),
            Output::new(in4, Level::Low, OutputConfig::default()),
        ],
        STEPPER_MAX_SPEED,
        STEPPER_ACCELERATION,
    );

    let mut blinds = RollerBlinds::new(
        BLINDS_NAME,
        stepper,
        FlashStore::new(FLASH_STORE_BASE),
        Some(BLINDS_STORE_OFFSET),
        MotorOrientation::Left,
    );

    // Indikator-LED: RmtLedWriter kapselt RMT + SmartLED
    // Buffer muss den Task überleben, daher hier statt im Constructor
    let mut rmt_buffer = smart_led_buffer!(1);
    let indicator = RmtLedWriter::new(led_pin, rmt_peripheral, RMT_CLOCK_MHZ, &mut rmt_buffer);

    let port = GpioOutputPort::new(Output::new(light_pin, Level::Low, OutputConfig::default()));
    let mut light = Actuator::with_indicator(
        LIGHT_NAME,
        port,
        OutMode::Digital,
        indicator,
        RGB8 {
            r: 0,
            g: LED_BRIGHTNESS,
            b: 0,
        },
        RGB8 { r: 0, g: 0, b: 0 },
        FlashStore::new(FLASH_STORE_BASE),
        Some(LIGHT_STORE_OFFSET),
    );

    let mut devices: [&mut dyn Device; 2] = [&mut blinds, &mut light];
    let mut registry = DeviceRegistry::new(&mut devices);

    // Geräte-Loop aufrufen (jetzt testbar!)
    node_logic(&mut registry, request_receiver, reply_sender, event_publisher).await;
}
