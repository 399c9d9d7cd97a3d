//! Rover Firmware Main Application
//!
//! Entry point for the STM32G474-based caterpillar rover.
//! Brings every output up in the off state, pairs with the transmitter,
//! then spawns the radio receive pump and the 20 ms control loop.

#![no_std]
#![no_main]

use defmt::{debug, error, info, warn};
use embassy_executor::Spawner;
use embassy_stm32::adc::{AdcChannel, AnyAdcChannel};
use embassy_stm32::gpio::OutputType;
use embassy_stm32::mode::Async;
use embassy_stm32::peripherals::{ADC1, TIM1, TIM2, TIM3};
use embassy_stm32::time::hz;
use embassy_stm32::timer::simple_pwm::{PwmPin, SimplePwm, SimplePwmChannel};
use embassy_stm32::usart::{self, Uart, UartRx};
use embassy_stm32::{bind_interrupts, peripherals};
use embassy_time::{Delay, Timer};
use {defmt_rtt as _, panic_probe as _};

use rover_firmware::control::mailbox::FrameMailbox;
use rover_firmware::control::scheduler::{ControlLoop, TelemetryOutcome};
use rover_firmware::drivers::{Buzzer, HBridge, Led, RoverActuators};
use rover_firmware::hal::adc::BatteryAdc;
use rover_firmware::hal::radio::{pump_frames, BridgeRadio};
use rover_firmware::prelude::*;

bind_interrupts!(struct Irqs {
    USART2 => usart::InterruptHandler<peripherals::USART2>;
});

/// Ticks between status lines (10 s)
const STATUS_EVERY_TICKS: u32 = 500;

/// Receive-to-loop frame handoff
static MAILBOX: FrameMailbox = FrameMailbox::new();

type MotorChannel = SimplePwmChannel<'static, TIM1>;
type BuzzerChannel = SimplePwmChannel<'static, TIM2>;
type LedChannel = SimplePwmChannel<'static, TIM3>;
type Rover = ControlLoop<
    'static,
    RoverActuators<MotorChannel, BuzzerChannel, LedChannel>,
    BatteryAdc<'static, AnyAdcChannel<ADC1>>,
    BridgeRadio<'static>,
>;

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Rover Firmware v{}", env!("CARGO_PKG_VERSION"));

    let config = embassy_stm32::Config::default();
    let p = embassy_stm32::init(config);

    // Motors: TIM1 CH1-CH4 on PA8-PA11
    let motor_pwm = SimplePwm::new(
        p.TIM1,
        Some(PwmPin::new_ch1(p.PA8, OutputType::PushPull)),
        Some(PwmPin::new_ch2(p.PA9, OutputType::PushPull)),
        Some(PwmPin::new_ch3(p.PA10, OutputType::PushPull)),
        Some(PwmPin::new_ch4(p.PA11, OutputType::PushPull)),
        hz(MOTOR_PWM_HZ),
        Default::default(),
    );
    let mut motors = motor_pwm.split();
    motors.ch1.enable();
    motors.ch2.enable();
    motors.ch3.enable();
    motors.ch4.enable();

    // Buzzer: TIM2 CH1 on PA0, timer runs at the tone frequency
    let buzzer_pwm = SimplePwm::new(
        p.TIM2,
        Some(PwmPin::new_ch1(p.PA0, OutputType::PushPull)),
        None,
        None,
        None,
        hz(BUZZER_TONE_HZ),
        Default::default(),
    );
    let mut buzzer = buzzer_pwm.split().ch1;
    buzzer.enable();

    // LEDs: TIM3 CH1 (warning, PA6) and CH2 (link, PA7)
    let led_pwm = SimplePwm::new(
        p.TIM3,
        Some(PwmPin::new_ch1(p.PA6, OutputType::PushPull)),
        Some(PwmPin::new_ch2(p.PA7, OutputType::PushPull)),
        None,
        None,
        hz(LED_PWM_HZ),
        Default::default(),
    );
    let mut leds = led_pwm.split();
    leds.ch1.enable();
    leds.ch2.enable();

    let actuators = RoverActuators::new(
        HBridge::new(motors.ch1, motors.ch2),
        HBridge::new(motors.ch3, motors.ch4),
        Buzzer::new(buzzer),
        Led::new(leds.ch2),
        Led::new(leds.ch1),
    );
    info!("Outputs initialized, all off");

    let battery = BatteryAdc::new(p.ADC1, p.PA1.degrade_adc());

    let mut uart_config = usart::Config::default();
    uart_config.baudrate = BRIDGE_BAUD;
    let uart = match Uart::new(
        p.USART2,
        p.PA3,
        p.PA2,
        Irqs,
        p.DMA1_CH1,
        p.DMA1_CH2,
        uart_config,
    ) {
        Ok(uart) => uart,
        Err(e) => halt("bridge uart config", e).await,
    };
    let (tx, rx) = uart.split();
    info!("Radio bridge UART initialized at {} baud", BRIDGE_BAUD);

    let peer = match peer_address() {
        Ok(peer) => peer,
        Err(e) => halt("ROVER_PEER_MAC", e).await,
    };

    let mut rover: Rover =
        ControlLoop::new(peer, &MAILBOX, actuators, battery, BridgeRadio::new(tx, rx));

    match rover.pair(&mut Delay, radio_channel()) {
        Ok(paired) => info!("Pairing complete: {}", paired),
        Err(e) => warn!("Pairing failed ({}), staying unpaired", e),
    }

    if let Some(rx) = rover.link_mut().take_rx() {
        spawner.spawn(radio_rx_task(rx, peer)).unwrap();
    }
    spawner.spawn(control_task(rover)).unwrap();

    info!("Tasks spawned");
}

/// Radio receive task - decodes bridge traffic into the mailbox
#[embassy_executor::task]
async fn radio_rx_task(rx: UartRx<'static, Async>, peer: PeerAddress) {
    pump_frames(rx, peer, &MAILBOX).await
}

/// Control task - one rover tick every 20 ms
#[embassy_executor::task]
async fn control_task(mut rover: Rover) {
    let mut ticker = Ticker::every(Duration::from_millis(LOOP_INTERVAL_MS));
    loop {
        ticker.next().await;
        let report = rover.tick(Instant::now().as_millis());
        if rover.ticks() % STATUS_EVERY_TICKS == 0 {
            debug!(
                "tick {}: {} battery={}mV sent={}",
                rover.ticks(),
                report.state,
                report.battery_mv,
                report.telemetry == TelemetryOutcome::Sent
            );
        }
    }
}

/// Log a fatal startup error and idle with every output off
async fn halt(what: &str, e: impl defmt::Format) -> ! {
    error!("{} failed: {}", what, e);
    loop {
        Timer::after(Duration::from_secs(10)).await;
    }
}
