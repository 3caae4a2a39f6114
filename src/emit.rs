use std::future::Future;

use anyhow::Result;
use log::info;
use tokio::time::sleep;

use crate::{advertiser::Advertiser, config::BeaconConfig};

/// Runs one advertising session: start, hold for the configured
/// duration, stop. Once start has succeeded the stop call runs on
/// every exit path of the hold, shutdown included.
pub async fn emit<A, F>(advertiser: &mut A, beacon: &BeaconConfig, shutdown: F) -> Result<()>
where
    A: Advertiser + ?Sized,
    F: Future<Output = ()>,
{
    advertiser.start(beacon).await?;
    info!(
        "beacon `{}` active for {} seconds",
        beacon.local_name, beacon.duration_secs
    );

    tokio::select! {
        _ = sleep(beacon.duration()) => {
            info!("beacon duration elapsed");
        }
        _ = shutdown => {
            info!("shutdown requested, stopping beacon early");
        }
    }

    advertiser.stop().await
}
