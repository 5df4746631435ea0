//! Print the state of a receiver and follow its updates for a while
//!
//! ```text
//! RUST_LOG=debug cargo run --example status -- socket://192.168.1.50:50000
//! ```

use anyhow::{Context, Result};
use log::info;
use std::time::Duration;
use ynca::subunits::zone;
use ynca::{FunctionSpec, Ynca};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let address = std::env::args()
        .nth(1)
        .context("usage: status <serial port | socket://host[:port]>")?;

    let mut ynca = Ynca::builder(&address)
        .on_disconnect(|| eprintln!("Receiver disconnected"))
        .build()?;
    ynca.initialize()
        .await
        .with_context(|| format!("initializing {}", address))?;

    for subunit in ynca.subunits() {
        println!("[{}]", subunit.id());
        for function in subunit.schema().functions() {
            let descriptor = function.descriptor();
            if !descriptor.cmd().can_get() {
                continue;
            }
            if let Some(value) = subunit.get_raw(descriptor.name())? {
                println!("  {:<20} {}", descriptor.attribute_name(), value);
            }
        }
    }

    if let Some(main) = ynca.main() {
        if let Some(volume) = main.get(&zone::VOL)? {
            info!("Main zone volume is {} dB", volume);
        }
        main.register_update_callback(|function, value| {
            println!("MAIN {} -> {}", function, value);
        });
    }

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {}
        _ = tokio::time::sleep(Duration::from_secs(60)) => {}
    }

    ynca.close().await;
    Ok(())
}
