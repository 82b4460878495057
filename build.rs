use std::fs;
use std::path::Path;
use serde::Deserialize;

#[derive(Deserialize)]
struct BuildConfig {
    serial: Serial,
    capture: Capture,
}

#[derive(Deserialize)]
struct Serial {
    port: String,
    baud_rate: u32,
    poll_interval_us: u64,
}

#[derive(Deserialize)]
struct Capture {
    sample_rate: u32,
    max_samples: usize,
    output_path: String,
}

// Read config.toml at compile time and expose it as rustc env vars
fn main() {
    println!("cargo:rerun-if-changed=config.toml");

    let config_path = Path::new("config.toml");
    if !config_path.exists() {
        panic!("config.toml not found!");
    }

    let config_str = fs::read_to_string(config_path).expect("Failed to read config.toml");
    let config: BuildConfig = toml::from_str(&config_str).expect("Failed to parse config.toml");

    // Serial transport
    println!("cargo:rustc-env=DEFAULT_PORT={}", config.serial.port);
    println!("cargo:rustc-env=DEFAULT_BAUD_RATE={}", config.serial.baud_rate);
    println!("cargo:rustc-env=DEFAULT_POLL_INTERVAL_US={}", config.serial.poll_interval_us);

    // Capture and output
    println!("cargo:rustc-env=DEFAULT_SAMPLE_RATE={}", config.capture.sample_rate);
    println!("cargo:rustc-env=DEFAULT_MAX_SAMPLES={}", config.capture.max_samples);
    println!("cargo:rustc-env=DEFAULT_OUTPUT_PATH={}", config.capture.output_path);
}
