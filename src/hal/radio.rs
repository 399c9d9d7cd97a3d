//! Radio Bridge Driver
//!
//! The 2.4 GHz radio sits on a companion module reached over USART2 using
//! the framing in [`crate::protocol::bridge`]. [`BridgeRadio`] owns the
//! transmit half for telemetry and, until [`BridgeRadio::take_rx`] hands it
//! to the receive task, the receive half for pairing replies.

use embassy_futures::block_on;
use embassy_stm32::mode::Async;
use embassy_stm32::usart::{UartRx, UartTx};
use embassy_time::{with_timeout, Duration, Instant, TimeoutError};

use crate::config::{BRIDGE_REPLY_BUDGET, BRIDGE_REPLY_TIMEOUT_MS};
use crate::control::mailbox::FrameMailbox;
use crate::platform::{PeerRegistry, RegistrationError, SendError, TelemetryLink};
use crate::protocol::bridge::{self, BridgeMessage, BridgeParser, BridgeStatus};
use crate::types::PeerAddress;

/// Receive buffer for one idle-line burst
const RX_CHUNK: usize = 128;

/// Radio bridge over USART2
pub struct BridgeRadio<'d> {
    tx: UartTx<'d, Async>,
    rx: Option<UartRx<'d, Async>>,
    parser: BridgeParser,
}

impl<'d> BridgeRadio<'d> {
    /// Wrap both halves of the bridge UART
    #[must_use]
    pub fn new(tx: UartTx<'d, Async>, rx: UartRx<'d, Async>) -> Self {
        Self {
            tx,
            rx: Some(rx),
            parser: BridgeParser::new(),
        }
    }

    /// Hand the receive half to the frame pump
    ///
    /// Pairing is no longer possible afterwards.
    pub fn take_rx(&mut self) -> Option<UartRx<'d, Async>> {
        self.rx.take()
    }

    fn request(&mut self, msg: &BridgeMessage) -> Result<(), RegistrationError> {
        self.tx
            .blocking_write(&bridge::encode(msg))
            .map_err(|_| RegistrationError::NoReply)
    }

    /// Wait for the next non-datagram message
    ///
    /// Bounded by [`BRIDGE_REPLY_TIMEOUT_MS`] per request, so a silent
    /// bridge fails the attempt instead of stalling pairing.
    fn await_reply(&mut self) -> Result<BridgeMessage, RegistrationError> {
        let rx = self.rx.as_mut().ok_or(RegistrationError::NoReply)?;
        let deadline = Instant::now() + Duration::from_millis(BRIDGE_REPLY_TIMEOUT_MS);
        let reply = bridge::next_reply(&mut self.parser, BRIDGE_REPLY_BUDGET, || {
            let remaining = deadline.saturating_duration_since(Instant::now());
            let mut byte = [0u8; 1];
            match block_on(with_timeout(remaining, rx.read(&mut byte))) {
                Ok(Ok(())) => Some(byte[0]),
                Ok(Err(e)) => {
                    warn!("bridge rx error: {}", e);
                    None
                }
                Err(TimeoutError) => None,
            }
        });
        if reply.is_none() {
            self.parser.clear();
        }
        reply.ok_or(RegistrationError::NoReply)
    }
}

impl PeerRegistry for BridgeRadio<'_> {
    fn current_channel(&mut self) -> Result<u8, RegistrationError> {
        self.request(&BridgeMessage::QueryChannel)?;
        match self.await_reply()? {
            BridgeMessage::ChannelReport(ch) => Ok(ch),
            BridgeMessage::Status(BridgeStatus::Error(code)) => {
                Err(RegistrationError::Rejected(code))
            }
            _ => Err(RegistrationError::NoReply),
        }
    }

    fn add_peer(&mut self, peer: &PeerAddress, channel: u8) -> Result<(), RegistrationError> {
        self.request(&BridgeMessage::AddPeer {
            peer: *peer,
            channel,
        })?;
        match self.await_reply()? {
            BridgeMessage::Status(BridgeStatus::Ok) => Ok(()),
            BridgeMessage::Status(BridgeStatus::Exists) => {
                Err(RegistrationError::AlreadyRegistered)
            }
            BridgeMessage::Status(BridgeStatus::Error(code)) => {
                Err(RegistrationError::Rejected(code))
            }
            _ => Err(RegistrationError::NoReply),
        }
    }
}

impl TelemetryLink for BridgeRadio<'_> {
    fn send(&mut self, peer: &PeerAddress, payload: &[u8]) -> Result<(), SendError> {
        let msg = BridgeMessage::datagram(*peer, payload)
            .map_err(|_| SendError::TooLong(payload.len()))?;
        self.tx
            .blocking_write(&bridge::encode(&msg))
            .map_err(|_| SendError::Transport)
    }
}

/// Feed received bridge traffic into the mailbox, forever
///
/// Datagrams from `peer` are decoded as control frames; anything from
/// another sender is ignored. Bridge status replies to telemetry sends are
/// logged when they report an error.
pub async fn pump_frames(
    mut rx: UartRx<'_, Async>,
    peer: PeerAddress,
    mailbox: &FrameMailbox,
) -> ! {
    let mut parser = BridgeParser::new();
    let mut buf = [0u8; RX_CHUNK];
    loop {
        let len = match rx.read_until_idle(&mut buf).await {
            Ok(len) => len,
            Err(e) => {
                warn!("bridge rx error: {}", e);
                parser.clear();
                continue;
            }
        };
        for &byte in &buf[..len] {
            match parser.feed(byte) {
                Ok(Some(BridgeMessage::Datagram { peer: from, payload })) => {
                    if from == peer {
                        let _ = mailbox.deliver(&payload);
                    } else {
                        debug!("ignored datagram from {}", from);
                    }
                }
                Ok(Some(BridgeMessage::Status(BridgeStatus::Error(code)))) => {
                    warn!("bridge reported send error {}", code);
                }
                Ok(_) => {}
                Err(e) => warn!("bridge frame: {}", e),
            }
        }
    }
}
