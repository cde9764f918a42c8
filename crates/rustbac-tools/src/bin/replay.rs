use clap::Parser;
use rustbac_device::{run, ChannelTransport, ServiceEvent};
use rustbac_tools::DeviceDescription;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;

/// Feeds recorded requests through a device and prints every reply as JSON.
#[derive(Parser, Debug)]
#[command(name = "bacnet-replay")]
struct Args {
    #[arg(long)]
    description: PathBuf,
    /// JSON array of service events.
    #[arg(long)]
    events: PathBuf,
    #[arg(long, default_value_t = 3000)]
    apdu_timeout_ms: u64,
    #[arg(long, default_value_t = 1)]
    sweep_interval_secs: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let description =
        DeviceDescription::from_json(&std::fs::read_to_string(&args.description)?)?;
    let events: Vec<ServiceEvent> =
        serde_json::from_str(&std::fs::read_to_string(&args.events)?)?;

    let (transport, mut outbound) =
        ChannelTransport::new(Duration::from_millis(args.apdu_timeout_ms));
    let device = description.build(transport)?;
    log::info!("replaying {} event(s) against device {}", events.len(), device.id());

    let printer = tokio::spawn(async move {
        while let Some(message) = outbound.recv().await {
            match serde_json::to_string(&message) {
                Ok(line) => println!("{line}"),
                Err(e) => log::error!("cannot serialize outbound message: {e}"),
            }
        }
    });

    let (tx, rx) = mpsc::unbounded_channel();
    for event in events {
        tx.send(event)?;
    }
    drop(tx);

    let device = run(device, rx, Duration::from_secs(args.sweep_interval_secs)).await;
    let subscriptions = device.root().subscriptions().len();
    drop(device);
    printer.await?;

    log::info!("replay finished, {subscriptions} object-level subscription(s) active");
    Ok(())
}
