use std::time::Duration;

use anyhow::{bail, Context as ErrorContext, Result};
use async_trait::async_trait;
use bluer::{
    adv::{Advertisement, AdvertisementHandle, Type},
    Adapter, Session,
};
use log::{debug, info};
use tokio::time::sleep;

use crate::config::BeaconConfig;

/// Seam between the emit sequence and the platform advertising stack,
/// so the bluetooth adapter can be swapped for a double.
#[async_trait]
pub trait Advertiser {
    /// Returns once advertising has begun.
    async fn start(&mut self, beacon: &BeaconConfig) -> Result<()>;
    async fn stop(&mut self) -> Result<()>;
    fn is_active(&self) -> bool;
}

pub struct BluetoothAdvertiser {
    session: Session,
    adapter: Adapter,
    handle: Option<AdvertisementHandle>,
}

impl BluetoothAdvertiser {
    pub async fn new() -> Result<Self> {
        let session = Session::new().await?;
        let adapter = session.default_adapter().await?;
        adapter.set_powered(true).await?;

        info!(
            "running on bluetooth adapter `{}` with address `{}`",
            adapter.name(),
            adapter.address().await?,
        );

        Ok(BluetoothAdvertiser {
            session,
            adapter,
            handle: None,
        })
    }
}

#[async_trait]
impl Advertiser for BluetoothAdvertiser {
    async fn start(&mut self, beacon: &BeaconConfig) -> Result<()> {
        if self.handle.is_some() {
            bail!("advertisement already registered");
        }

        let advert = Advertisement {
            advertisement_type: Type::Peripheral,
            service_uuids: beacon.service_uuids.iter().copied().collect(),
            manufacturer_data: beacon.manufacturer_data.clone(),
            discoverable: Some(beacon.discoverable),
            local_name: Some(beacon.local_name.clone()),
            ..Default::default()
        };
        debug!("registering advertisement {:?}", advert);

        let handle = self
            .adapter
            .advertise(advert)
            .await
            .context("failed to register advertisement")?;
        self.handle = Some(handle);
        Ok(())
    }

    async fn stop(&mut self) -> Result<()> {
        match self.handle.take() {
            Some(handle) => drop(handle),
            None => bail!("no advertisement registered"),
        }
        // bluetoothd unregisters asynchronously, give it a moment
        sleep(Duration::from_secs(1)).await;
        Ok(())
    }

    fn is_active(&self) -> bool {
        self.handle.is_some()
    }
}

/// Stand-in for machines without an adapter, mirroring the real
/// advertiser's lifecycle while only logging.
pub struct SimulatedAdvertiser {
    active: bool,
}

impl SimulatedAdvertiser {
    pub fn new() -> Self {
        SimulatedAdvertiser { active: false }
    }
}

#[async_trait]
impl Advertiser for SimulatedAdvertiser {
    async fn start(&mut self, beacon: &BeaconConfig) -> Result<()> {
        if self.active {
            bail!("advertisement already registered");
        }
        info!(
            "simulated beacon `{}` with services {:?}",
            beacon.local_name, beacon.service_uuids
        );
        self.active = true;
        Ok(())
    }

    async fn stop(&mut self) -> Result<()> {
        if !self.active {
            bail!("no advertisement registered");
        }
        info!("simulated beacon stopped");
        self.active = false;
        Ok(())
    }

    fn is_active(&self) -> bool {
        self.active
    }
}
