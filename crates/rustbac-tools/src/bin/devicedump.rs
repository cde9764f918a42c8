use clap::Parser;
use rustbac_device::RecordingTransport;
use rustbac_tools::{DeviceDescription, ObjectTypeArg};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "bacnet-devicedump")]
struct Args {
    /// JSON device description to load.
    #[arg(long)]
    description: PathBuf,
    /// Only print objects of this type.
    #[arg(long, value_enum)]
    object_type: Option<ObjectTypeArg>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let json = std::fs::read_to_string(&args.description)?;
    let device = DeviceDescription::from_json(&json)?.build(RecordingTransport::default())?;

    let prefix = args
        .object_type
        .map(|t| format!("{}:", t.into_object_type()));
    let dump: std::collections::BTreeMap<_, _> = device
        .dump_objects()
        .into_iter()
        .filter(|(id, _)| prefix.as_deref().map_or(true, |p| id.starts_with(p)))
        .collect();

    println!("{}", serde_json::to_string_pretty(&dump)?);
    Ok(())
}
