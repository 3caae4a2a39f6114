use anyhow::{anyhow, Context as ErrorContext, Result};
use beacon::{
    advertiser::{BluetoothAdvertiser, SimulatedAdvertiser},
    config::BeaconConfig,
    deamonize, emit,
};
use clap::{arg, value_parser, ArgAction, Command};
use futures::FutureExt;
use uuid::Uuid;

async fn run() -> Result<()> {
    let matches = Command::new("beacon")
        .version("0.1")
        .arg(
            arg!(
                -n --name <NAME> "Set the advertised local name"
            )
            .required(false),
        )
        .arg(
            arg!(
                -u --uuid <UUID> "Add a service uuid to the advertisement"
            )
            .required(false)
            .action(ArgAction::Append),
        )
        .arg(
            arg!(
                -d --duration <SECONDS> "How long to keep the beacon active"
            )
            .required(false)
            .value_parser(value_parser!(u64)),
        )
        .arg(
            arg!(
                -c --config <PATH> "Load beacon settings from a config file"
            )
            .required(false),
        )
        .arg(
            arg!(
                -S --simulate "Log the beacon instead of using the bluetooth adapter"
            )
            .action(ArgAction::SetTrue),
        )
        .arg(
            arg!(
                -D --deamon "run the beacon as a deamon"
            )
            .action(ArgAction::SetTrue),
        )
        .get_matches();

    let mut beacon = match matches.get_one::<String>("config") {
        Some(path) => BeaconConfig::from_file(path)
            .await
            .context("error loading config file")?,
        None => BeaconConfig::default(),
    };

    if let Some(name) = matches.get_one::<String>("name") {
        beacon.local_name = name.clone();
    }

    let uuids = matches
        .get_many::<String>("uuid")
        .map(|x| x.map(|x| Uuid::parse_str(x)).collect::<Result<Vec<_>, _>>())
        .transpose()
        .context("error parsing service uuid")?;
    if let Some(uuids) = uuids {
        beacon.service_uuids = uuids;
    }

    if let Some(duration) = matches.get_one::<u64>("duration") {
        beacon.duration_secs = *duration;
    }

    if *matches.get_one::<bool>("deamon").unwrap() {
        deamonize()
            .map_err(|_| anyhow!("deamon creation error"))
            .context("failed to create a deamon")?;
    }

    let shutdown = tokio::signal::ctrl_c().map(|x| {
        x.ok();
    });

    if *matches.get_one::<bool>("simulate").unwrap() {
        let mut advertiser = SimulatedAdvertiser::new();
        emit::emit(&mut advertiser, &beacon, shutdown).await
    } else {
        let mut advertiser = BluetoothAdvertiser::new()
            .await
            .context("failed to acquire bluetooth adapter")?;
        emit::emit(&mut advertiser, &beacon, shutdown).await
    }
}

fn main() -> Result<()> {
    env_logger::init_from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, "info"),
    );

    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(run())
}
