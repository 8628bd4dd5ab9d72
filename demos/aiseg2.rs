// SPDX-License-Identifier: MPL-2.0

//! Test program: Discover an AiSEG2 gateway and read or operate it.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example aiseg2 -- <username> <password> [shutter-name open|close|stop]
//! ```
//!
//! # Example
//!
//! ```bash
//! # List shutters and rooms
//! RUST_LOG=aiseg2_lib=debug cargo run --example aiseg2 -- aiseg password
//!
//! # Close the garage shutter
//! cargo run --example aiseg2 -- aiseg password Garage close
//! ```

use std::env;

use aiseg2_lib::protocol::ClientConfig;
use aiseg2_lib::types::ShutterOperation;
use aiseg2_lib::{Gateway, discover};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 3 {
        eprintln!(
            "Usage: {} <username> <password> [shutter-name open|close|stop]",
            args[0]
        );
        std::process::exit(1);
    }

    let gateway = Gateway::new(ClientConfig::new().with_credentials(&args[1], &args[2]))?;

    println!("Searching for AiSEG2...");
    let address = discover().await?;
    println!("Found AiSEG2 at {address}");

    if let (Some(name), Some(op)) = (args.get(3), args.get(4)) {
        let operation: ShutterOperation = op.parse()?;
        let message = gateway.operate_shutter(address, name, operation).await?;
        println!("{message}");
        return Ok(());
    }

    let listing = gateway.get_shutters(address).await?;
    println!("\nDevices:");
    for device in listing.iter() {
        let kind = if device.is_shutter() { "shutter" } else { "device" };
        println!(
            "  - {} [{kind}] nodeId={} eoj={} {}",
            device.name, device.node_id, device.eoj, device.condition
        );
    }

    println!("\nAir environment:");
    for room in gateway.get_air_environment(address).await? {
        println!("  - {}: {} C, {} %", room.name, room.temp, room.humi);
    }

    Ok(())
}
