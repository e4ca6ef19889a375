use crate::characteristic::{Characteristic, DEVICE_INFORMATION_SERVICE, THERMOSTAT_SERVICE};
use crate::error::{Error, Result};
use async_trait::async_trait;
use bluest::{Adapter, Device};
use futures_util::StreamExt;
use log::{debug, warn};
use std::collections::HashMap;
use tokio::time::{timeout, Duration};

/// The Bluetooth boundary of the crate.
///
/// A transport owns the link to exactly one physical device and moves raw
/// byte buffers to and from its characteristics. BLE GATT serializes
/// operations per connection, so all methods take `&mut self` and at most
/// one operation is in flight at a time.
///
/// Errors from `read` and `write` are reported as
/// [`Error::ConnectionLost`] or [`Error::Timeout`]; recovering (or not) is
/// the caller's business.
#[async_trait]
pub trait Transport: Send {
    async fn connect(&mut self) -> Result<()>;
    async fn disconnect(&mut self) -> Result<()>;
    async fn read(&mut self, characteristic: Characteristic) -> Result<Vec<u8>>;
    async fn write(&mut self, characteristic: Characteristic, data: &[u8]) -> Result<()>;
}

/// [`Transport`] implementation on top of the cross-platform `bluest` crate.
pub struct BluestTransport {
    adapter: Adapter,
    device: Device,
    characteristics: HashMap<Characteristic, bluest::Characteristic>,
    operation_timeout: Duration,
}

impl BluestTransport {
    /// The local name Comet Blue thermostats advertise.
    pub const DEVICE_NAME: &'static str = "Comet Blue";
    /// How long to scan for the device before giving up.
    const DISCOVERY_TIMEOUT: Duration = Duration::from_secs(30);
    /// Per read/write deadline once connected.
    const OPERATION_TIMEOUT: Duration = Duration::from_secs(10);

    /// Scan for a device advertising the given local name and return a
    /// transport bound to it. The device is not connected yet.
    pub async fn discover(device_name: &str) -> Result<Self> {
        let adapter = Adapter::default()
            .await
            .ok_or_else(|| Error::Connection("default Bluetooth adapter not found".into()))?;
        adapter.wait_available().await.map_err(connection_error)?;

        let device = timeout(
            Self::DISCOVERY_TIMEOUT,
            Self::find_device(&adapter, device_name),
        )
        .await
        .map_err(|_| Error::Timeout(Self::DISCOVERY_TIMEOUT))??;

        Ok(Self {
            adapter,
            device,
            characteristics: HashMap::new(),
            operation_timeout: Self::OPERATION_TIMEOUT,
        })
    }

    async fn find_device(adapter: &Adapter, device_name: &str) -> Result<Device> {
        debug!("scanning for '{device_name}'");
        let mut scan = adapter.scan(&[]).await.map_err(connection_error)?;
        while let Some(discovered) = scan.next().await {
            // Unnamed advertisements are not the thermostat.
            let name = match discovered.device.name_async().await {
                Ok(name) => name,
                Err(_) => continue,
            };
            if name == device_name {
                debug!("found '{device_name}' ({})", discovered.device.id());
                return Ok(discovered.device);
            }
        }
        Err(Error::Connection(format!("device '{device_name}' not found")))
    }

    fn handle(&self, characteristic: Characteristic) -> Result<&bluest::Characteristic> {
        self.characteristics
            .get(&characteristic)
            .ok_or(Error::CharacteristicNotFound(characteristic))
    }

    async fn resolve_characteristics(&mut self) -> Result<()> {
        self.characteristics.clear();
        for service_uuid in [THERMOSTAT_SERVICE, DEVICE_INFORMATION_SERVICE] {
            let services = self
                .device
                .discover_services_with_uuid(service_uuid)
                .await
                .map_err(connection_error)?;
            let Some(service) = services.first() else {
                if service_uuid == THERMOSTAT_SERVICE {
                    return Err(Error::Connection(
                        "device does not expose the Comet Blue service".into(),
                    ));
                }
                warn!("device has no Device Information service, identification unavailable");
                continue;
            };
            for characteristic in Characteristic::ALL {
                if characteristic.service_uuid() != service_uuid {
                    continue;
                }
                let found = service
                    .discover_characteristics_with_uuid(characteristic.uuid())
                    .await
                    .map_err(connection_error)?;
                match found.first() {
                    Some(handle) => {
                        self.characteristics.insert(characteristic, handle.clone());
                    }
                    None => warn!("device has no {characteristic} characteristic"),
                }
            }
        }
        debug!("connected, {} characteristics resolved", self.characteristics.len());
        Ok(())
    }
}

#[async_trait]
impl Transport for BluestTransport {
    async fn connect(&mut self) -> Result<()> {
        self.adapter
            .connect_device(&self.device)
            .await
            .map_err(connection_error)?;

        // The thermostat accepts a single connection at a time, so a
        // failed service setup must release the link before reporting.
        if let Err(err) = self.resolve_characteristics().await {
            if let Err(err) = self.adapter.disconnect_device(&self.device).await {
                warn!("failed to disconnect after service discovery error: {err}");
            }
            return Err(err);
        }
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<()> {
        self.characteristics.clear();
        self.adapter
            .disconnect_device(&self.device)
            .await
            .map_err(connection_error)
    }

    async fn read(&mut self, characteristic: Characteristic) -> Result<Vec<u8>> {
        let handle = self.handle(characteristic)?;
        let data = timeout(self.operation_timeout, handle.read())
            .await
            .map_err(|_| Error::Timeout(self.operation_timeout))?
            .map_err(|err| Error::ConnectionLost(err.to_string()))?;
        debug!("read {characteristic}: 0x{}", hex::encode(&data));
        Ok(data)
    }

    async fn write(&mut self, characteristic: Characteristic, data: &[u8]) -> Result<()> {
        let handle = self.handle(characteristic)?;
        debug!("write {characteristic}: 0x{}", hex::encode(data));
        timeout(self.operation_timeout, handle.write(data))
            .await
            .map_err(|_| Error::Timeout(self.operation_timeout))?
            .map_err(|err| Error::ConnectionLost(err.to_string()))
    }
}

fn connection_error(err: bluest::Error) -> Error {
    Error::Connection(err.to_string())
}
