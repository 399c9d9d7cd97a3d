//! Control Loop
//!
//! Owns the link context and runs one fixed sequence per tick:
//!
//! 1. read the battery and send telemetry (once a peer exists)
//! 2. take the newest control frame from the mailbox
//! 3. advance the link watchdog
//! 4. compute the actuator command
//! 5. apply it, plus the low-battery warning
//!
//! Pacing is left to the caller (an `embassy_time::Ticker` on target, a
//! plain loop in tests).

use embedded_hal::delay::DelayNs;

use crate::control::dispatcher::dispatch;
use crate::control::mailbox::FrameMailbox;
use crate::control::pairing::{Paired, PairingError, PairingManager};
use crate::control::watchdog::LinkWatchdog;
use crate::platform::{Actuators, BatterySensor, PeerRegistry, SendError, TelemetryLink};
use crate::power::BatteryMonitor;
use crate::protocol::frame::{ControlFrame, TelemetryFrame};
use crate::types::{ActuatorCommand, LinkState, PeerAddress, RadioChannel};

/// What happened to this tick's telemetry
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TelemetryOutcome {
    /// Handed to the radio
    Sent,
    /// Not attempted, no peer yet
    Skipped,
    /// Radio refused it
    Failed(SendError),
}

#[cfg(feature = "embedded")]
impl defmt::Format for TelemetryOutcome {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Sent => defmt::write!(f, "Sent"),
            Self::Skipped => defmt::write!(f, "Skipped"),
            Self::Failed(e) => defmt::write!(f, "Failed({})", e),
        }
    }
}

/// Summary of one tick
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickReport {
    /// Link state after the watchdog step
    pub state: LinkState,
    /// Command that was applied
    pub command: ActuatorCommand,
    /// Battery reading taken this tick
    pub battery_mv: i32,
    /// Telemetry result
    pub telemetry: TelemetryOutcome,
    /// A new control frame was consumed
    pub frame_arrived: bool,
}

/// Rover control loop
pub struct ControlLoop<'m, A, B, T> {
    /// Remote controller address
    peer: PeerAddress,
    /// Inbound frame handoff
    mailbox: &'m FrameMailbox,
    /// Motors, buzzer and LEDs
    actuators: A,
    /// Battery voltage source
    battery: B,
    /// Outbound radio
    link: T,
    /// Link state machine
    watchdog: LinkWatchdog,
    /// Pairing state
    pairing: PairingManager,
    /// Low-battery tracking
    monitor: BatteryMonitor,
    /// Most recent control frame
    latest: ControlFrame,
    /// Buzzer is currently sounding
    buzzer_on: bool,
    /// Ticks run
    ticks: u32,
    /// Telemetry sends that failed
    send_failures: u32,
}

impl<'m, A, B, T> ControlLoop<'m, A, B, T>
where
    A: Actuators,
    B: BatterySensor,
    T: TelemetryLink,
{
    /// Create a loop with default watchdog, pairing and battery settings
    pub fn new(
        peer: PeerAddress,
        mailbox: &'m FrameMailbox,
        actuators: A,
        battery: B,
        link: T,
    ) -> Self {
        Self {
            peer,
            mailbox,
            actuators,
            battery,
            link,
            watchdog: LinkWatchdog::default(),
            pairing: PairingManager::default(),
            monitor: BatteryMonitor::default(),
            latest: ControlFrame::NEUTRAL,
            buzzer_on: false,
            ticks: 0,
            send_failures: 0,
        }
    }

    /// Replace the watchdog (custom loss threshold)
    #[must_use]
    pub fn with_watchdog(mut self, watchdog: LinkWatchdog) -> Self {
        self.watchdog = watchdog;
        self
    }

    /// Replace the pairing manager (custom retry policy)
    #[must_use]
    pub fn with_pairing(mut self, pairing: PairingManager) -> Self {
        self.pairing = pairing;
        self
    }

    /// Pair with the configured peer through the outbound radio
    ///
    /// On success the watchdog enters `Paired` and the link indicator is
    /// lit straight away.
    ///
    /// # Errors
    ///
    /// Returns [`PairingError`] if the peer could not be registered. The
    /// loop stays `Unpaired` and keeps every output off.
    pub fn pair<D: DelayNs>(
        &mut self,
        delay: &mut D,
        channel: RadioChannel,
    ) -> Result<Paired, PairingError>
    where
        T: PeerRegistry,
    {
        let proof = self
            .pairing
            .pair(&mut self.link, delay, self.peer, channel)?;
        self.watchdog.on_paired(&proof);
        self.actuators.set_link_indicator(u8::MAX);
        Ok(proof)
    }

    /// Run one tick at time `now_ms`
    pub fn tick(&mut self, now_ms: u64) -> TickReport {
        self.ticks = self.ticks.wrapping_add(1);

        let battery_mv = self.battery.read_millivolts();
        self.monitor.update(battery_mv);
        let telemetry = self.send_telemetry(battery_mv);

        let arrived = self.mailbox.take();
        let frame_arrived = arrived.is_some();
        if let Some(frame) = arrived {
            self.latest = frame;
        }

        let previous = self.watchdog.state();
        let state = self.watchdog.on_tick(frame_arrived);
        if state != previous {
            info!("link {} -> {}", previous, state);
        }

        let command = dispatch(state, &self.latest, now_ms);
        self.apply(&command);

        TickReport {
            state,
            command,
            battery_mv,
            telemetry,
            frame_arrived,
        }
    }

    fn send_telemetry(&mut self, battery_mv: i32) -> TelemetryOutcome {
        if !self.watchdog.state().has_peer() {
            return TelemetryOutcome::Skipped;
        }
        let frame = TelemetryFrame::new(battery_mv).encode();
        match self.link.send(&self.peer, &frame) {
            Ok(()) => TelemetryOutcome::Sent,
            Err(e) => {
                self.send_failures = self.send_failures.saturating_add(1);
                warn!("telemetry send failed: {}", e);
                TelemetryOutcome::Failed(e)
            }
        }
    }

    fn apply(&mut self, command: &ActuatorCommand) {
        self.actuators.drive_motor1(command.motor1);
        self.actuators.drive_motor2(command.motor2);

        // Tone starts on the rising edge only; off is written every tick.
        if command.buzzer {
            if !self.buzzer_on {
                self.actuators.set_buzzer(true);
            }
        } else {
            self.actuators.set_buzzer(false);
        }
        self.buzzer_on = command.buzzer;

        self.actuators.set_link_indicator(command.indicator);
        self.actuators
            .set_battery_warning(self.monitor.warning_brightness());
    }

    /// Current link state
    #[must_use]
    pub fn state(&self) -> LinkState {
        self.watchdog.state()
    }

    /// Watchdog snapshot
    #[must_use]
    pub fn watchdog(&self) -> &LinkWatchdog {
        &self.watchdog
    }

    /// Most recent control frame (neutral until one arrives)
    #[must_use]
    pub fn latest_frame(&self) -> &ControlFrame {
        &self.latest
    }

    /// Battery monitor snapshot
    #[must_use]
    pub fn battery(&self) -> &BatteryMonitor {
        &self.monitor
    }

    /// Configured peer
    #[must_use]
    pub fn peer(&self) -> PeerAddress {
        self.peer
    }

    /// Ticks run so far
    #[must_use]
    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    /// Telemetry sends that failed
    #[must_use]
    pub fn send_failures(&self) -> u32 {
        self.send_failures
    }

    /// Actuator outputs
    #[must_use]
    pub fn actuators(&self) -> &A {
        &self.actuators
    }

    /// Outbound radio
    #[must_use]
    pub fn link(&self) -> &T {
        &self.link
    }

    /// Outbound radio, mutable
    pub fn link_mut(&mut self) -> &mut T {
        &mut self.link
    }
}
