//! Build script for neppi-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates device.toml and embeds it as a postcard blob

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use neppi_core::config::DeviceConfig;

fn main() {
    setup_linker();
    encode_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
}

/// Parse, validate and encode device.toml
fn encode_config() {
    println!("cargo:rerun-if-changed=device.toml");

    let config_path = Path::new("device.toml");
    if !config_path.exists() {
        fail(&["device.toml not found", "Create one next to Cargo.toml"]);
    }

    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => fail(&["Failed to read device.toml", &e.to_string()]),
    };

    let config: DeviceConfig = match toml::from_str(&content) {
        Ok(config) => config,
        Err(e) => {
            let message = e.to_string();
            let mut lines = vec!["Invalid device.toml"];
            lines.extend(message.lines());
            fail(&lines);
        }
    };

    if let Err(e) = config.validate() {
        fail(&["Invalid device configuration", &format!("{:?}", e)]);
    }

    let bytes = match postcard::to_allocvec(&config) {
        Ok(bytes) => bytes,
        Err(e) => fail(&["Failed to encode device.toml", &e.to_string()]),
    };

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    fs::write(out_dir.join("device_config.bin"), &bytes).unwrap();

    println!(
        "cargo:warning=device.toml validated ({} bytes encoded)",
        bytes.len()
    );
}

/// Abort the build with a boxed error message
fn fail(lines: &[&str]) -> ! {
    let body = lines
        .iter()
        .map(|line| {
            let line = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", line)
        })
        .collect::<Vec<_>>()
        .join("\n");

    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        body
    );
}
