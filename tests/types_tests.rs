//! Type Tests
//!
//! Tests for peer addresses, channels, link states and actuator commands.

use rover_firmware::types::{
    ActuatorCommand, AddressError, Direction, LinkState, MotorDrive, PeerAddress, RadioChannel,
};

// ============================================================================
// Peer Address
// ============================================================================

#[test]
fn test_peer_address_parse_colon() {
    let addr = PeerAddress::parse("24:6F:28:A1:B2:C3").unwrap();
    assert_eq!(addr.octets(), [0x24, 0x6F, 0x28, 0xA1, 0xB2, 0xC3]);
}

#[test]
fn test_peer_address_parse_dash_lowercase() {
    let addr = PeerAddress::parse("24-6f-28-a1-b2-c3").unwrap();
    assert_eq!(addr, PeerAddress::new([0x24, 0x6F, 0x28, 0xA1, 0xB2, 0xC3]));
}

#[test]
fn test_peer_address_display_is_upper_colon() {
    let addr = PeerAddress::new([0x0A, 0x1B, 0x2C, 0x3D, 0x4E, 0x5F]);
    assert_eq!(addr.to_string(), "0A:1B:2C:3D:4E:5F");
    assert_eq!(PeerAddress::parse(&addr.to_string()), Ok(addr));
}

#[test]
fn test_peer_address_debug() {
    let addr = PeerAddress::BROADCAST;
    assert_eq!(format!("{addr:?}"), "PeerAddress(FF:FF:FF:FF:FF:FF)");
}

#[test]
fn test_peer_address_rejects_bad_length() {
    assert_eq!(PeerAddress::parse(""), Err(AddressError::Length(0)));
    assert_eq!(
        PeerAddress::parse("24:6F:28:A1:B2"),
        Err(AddressError::Length(14))
    );
    assert_eq!(
        PeerAddress::parse("24:6F:28:A1:B2:C3:"),
        Err(AddressError::Length(18))
    );
}

#[test]
fn test_peer_address_rejects_bad_digit() {
    assert_eq!(
        PeerAddress::parse("24:6G:28:A1:B2:C3"),
        Err(AddressError::Digit(4))
    );
    assert_eq!(
        PeerAddress::parse("Z4:6F:28:A1:B2:C3"),
        Err(AddressError::Digit(0))
    );
}

#[test]
fn test_peer_address_rejects_bad_separator() {
    assert_eq!(
        PeerAddress::parse("24:6F.28:A1:B2:C3"),
        Err(AddressError::Separator(5))
    );
}

#[test]
fn test_peer_address_bytes() {
    let addr = PeerAddress::new([1, 2, 3, 4, 5, 6]);
    assert_eq!(addr.as_bytes(), &[1, 2, 3, 4, 5, 6]);
}

// ============================================================================
// Radio Channel
// ============================================================================

#[test]
fn test_radio_channel_default_is_auto() {
    assert_eq!(RadioChannel::default(), RadioChannel::Auto);
}

#[test]
fn test_radio_channel_fixed_range() {
    assert_eq!(RadioChannel::fixed(1), Some(RadioChannel::Fixed(1)));
    assert_eq!(RadioChannel::fixed(14), Some(RadioChannel::Fixed(14)));
    assert_eq!(RadioChannel::fixed(0), None);
    assert_eq!(RadioChannel::fixed(15), None);
}

// ============================================================================
// Link State
// ============================================================================

#[test]
fn test_link_state_default_is_unpaired() {
    assert_eq!(LinkState::default(), LinkState::Unpaired);
}

#[test]
fn test_link_state_predicates() {
    assert!(!LinkState::Unpaired.is_paired());
    assert!(!LinkState::Unpaired.has_peer());
    assert!(LinkState::Paired.is_paired());
    assert!(LinkState::Paired.has_peer());
    assert!(!LinkState::Lost.is_paired());
    assert!(LinkState::Lost.has_peer());
}

// ============================================================================
// Actuator Command
// ============================================================================

#[test]
fn test_motor_drive_stop() {
    assert!(MotorDrive::STOP.is_stopped());
    assert!(MotorDrive::new(Direction::Reverse, 0).is_stopped());
    assert!(!MotorDrive::new(Direction::Forward, 1).is_stopped());
}

#[test]
fn test_safe_command_is_all_off() {
    let safe = ActuatorCommand::SAFE;
    assert!(safe.is_safe_stop());
    assert_eq!(safe.indicator, 0);
    assert_eq!(ActuatorCommand::default(), safe);
}

#[test]
fn test_buzzer_breaks_safe_stop() {
    let cmd = ActuatorCommand {
        buzzer: true,
        ..ActuatorCommand::SAFE
    };
    assert!(!cmd.is_safe_stop());
}
