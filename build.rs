//! Build script for rover firmware
//!
//! Handles:
//! - Linker scripts for the embedded binary
//! - Rebuild tracking for the build-time peer configuration
//! - The breathing indicator table, computed once on the host

use std::{env, f64::consts, fmt::Write as _, fs, path::PathBuf};

/// Breathing period in milliseconds, one table entry per millisecond
const BREATHING_PERIOD_MS: u32 = 2000;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Peer MAC and radio channel are baked in by `config::peer_address()`
    println!("cargo:rerun-if-env-changed=ROVER_PEER_MAC");
    println!("cargo:rerun-if-env-changed=ROVER_RADIO_CHANNEL");

    write_breathing_table();

    // Linker scripts only apply to the target binary, never to host tests
    if env::var_os("CARGO_FEATURE_EMBEDDED").is_some() {
        println!("cargo:rustc-link-arg-bins=--nmagic");
        println!("cargo:rustc-link-arg-bins=-Tlink.x");
        println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
    }
}

/// Raised sine over one period: round(255 * (sin(2*pi*phase - pi/2) + 1) / 2)
fn write_breathing_table() {
    let mut table = format!("const BREATHING_TABLE: [u8; {BREATHING_PERIOD_MS}] = [");
    for t in 0..BREATHING_PERIOD_MS {
        let phase = f64::from(t) / f64::from(BREATHING_PERIOD_MS);
        let wave = (consts::TAU * phase - consts::FRAC_PI_2).sin();
        let level = (255.0 * (wave + 1.0) / 2.0).round().clamp(0.0, 255.0) as u8;
        write!(table, "{level},").unwrap();
    }
    table.push_str("];\n");

    let out = PathBuf::from(env::var_os("OUT_DIR").unwrap());
    fs::write(out.join("breathing.rs"), table).unwrap();
}
