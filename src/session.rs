use crate::characteristic::Characteristic;
use crate::error::{Error, Result};
use crate::transport::{BluestTransport, Transport};
use crate::value::{
    decode_datetime, decode_string, encode_datetime, DeviceStatus, Identification, Mode,
    Temperatures, TemperaturesUpdate, OFFSET_TEMPERATURE_MAX, OFFSET_TEMPERATURE_MIN,
    TARGET_TEMPERATURE_MAX, TARGET_TEMPERATURE_MIN, TEMPERATURE_OFF,
};
use chrono::NaiveDateTime;
use log::{debug, warn};

/// One authenticated connection to one physical thermostat.
///
/// A session is opened with [`open`](Self::open) (or
/// [`connect`](Self::connect) to discover the device over `bluest` first),
/// used through the typed accessors, and released with
/// [`close`](Self::close). Writes are only accepted by the device after PIN
/// authentication, which `open` performs as its last step.
///
/// If the connection drops mid-operation, that operation fails with
/// [`Error::ConnectionLost`] and every later call fails with
/// [`Error::NotAuthenticated`] until a fresh session is opened. The session
/// never retries on its own.
///
/// A session owns its connection exclusively and performs one GATT
/// operation at a time; run one session per device, in its own task, to talk
/// to several thermostats at once.
pub struct ThermostatSession<T: Transport> {
    transport: T,
    authenticated: bool,
    identification: Option<Identification>,
}

impl ThermostatSession<BluestTransport> {
    /// Discover a thermostat by its advertised name and open a session to it.
    ///
    /// The factory PIN is `0`.
    pub async fn connect(device_name: &str, pin: u32) -> Result<Self> {
        let transport = BluestTransport::discover(device_name).await?;
        Self::open(transport, pin).await
    }

    /// [`connect`](Self::connect) with the stock advertised name.
    pub async fn connect_default_name(pin: u32) -> Result<Self> {
        Self::connect(BluestTransport::DEVICE_NAME, pin).await
    }
}

impl<T: Transport> ThermostatSession<T> {
    /// Connect the transport and authenticate with the device PIN.
    ///
    /// Fails with [`Error::Connection`] if the device cannot be reached,
    /// [`Error::Timeout`] if it stops answering during setup and
    /// [`Error::Authentication`] if it rejects the PIN write. On every
    /// failure after the transport connected, the transport is disconnected
    /// before the error is returned.
    pub async fn open(mut transport: T, pin: u32) -> Result<Self> {
        transport.connect().await?;
        debug!("connected, authenticating");
        if let Err(err) = transport.write(Characteristic::Pin, &pin.to_le_bytes()).await {
            if let Err(err) = transport.disconnect().await {
                warn!("failed to disconnect after failed authentication: {err}");
            }
            // A rejected PIN surfaces as a failed GATT write; timeouts and
            // other kinds keep their own identity.
            return Err(match err {
                Error::ConnectionLost(reason) => Error::Authentication(reason),
                other => other,
            });
        }
        Ok(Self {
            transport,
            authenticated: true,
            identification: None,
        })
    }

    /// Release the connection. Idempotent and safe to call in any state;
    /// disconnect failures are logged, never surfaced.
    pub async fn close(&mut self) {
        if !self.authenticated {
            return;
        }
        self.authenticated = false;
        if let Err(err) = self.transport.disconnect().await {
            warn!("failed to disconnect cleanly: {err}");
        }
    }

    /// The operating mode, derived from the status register and, in manual
    /// mode, the target temperature.
    pub async fn get_mode(&mut self) -> Result<Mode> {
        let status = self.get_device_status().await?;
        if !status.manual_mode {
            return Ok(Mode::Auto);
        }
        let temperatures = self.get_temperatures().await?;
        Ok(if temperatures.is_off() {
            Mode::Off
        } else {
            Mode::Manual
        })
    }

    /// Switch the operating mode. [`Mode::Off`] also drives the target
    /// temperature to the "valve closed" value; switching back to
    /// [`Mode::Manual`] afterwards leaves that target in place until a new
    /// one is set.
    pub async fn set_mode(&mut self, mode: Mode) -> Result<()> {
        let mut status = self.get_device_status().await?;
        status.manual_mode = mode != Mode::Auto;
        self.write(Characteristic::Status, &status.encode()).await?;
        if mode == Mode::Off {
            let update = TemperaturesUpdate {
                target_temperature: Some(TEMPERATURE_OFF),
                ..Default::default()
            };
            self.write(Characteristic::Temperatures, &update.encode())
                .await?;
        }
        Ok(())
    }

    /// The full decoded temperatures register.
    pub async fn get_temperatures(&mut self) -> Result<Temperatures> {
        let data = self.read(Characteristic::Temperatures).await?;
        Temperatures::decode(&data)
    }

    /// Current ambient temperature in °C, adjusted by the calibration
    /// offset.
    pub async fn get_temperature(&mut self) -> Result<f32> {
        Ok(self.get_temperatures().await?.ambient_temperature())
    }

    /// The manually set target temperature in °C.
    pub async fn get_target_temperature(&mut self) -> Result<f32> {
        Ok(self.get_temperatures().await?.target_temperature)
    }

    /// Set the target temperature, between [`TARGET_TEMPERATURE_MIN`] and
    /// [`TARGET_TEMPERATURE_MAX`]; values outside that range fail with
    /// [`Error::OutOfRange`] without touching the device. The device stores
    /// half-degree steps, so the value is rounded to the nearest 0.5 °C
    /// before it is written.
    pub async fn set_target_temperature(&mut self, degrees: f32) -> Result<()> {
        check_range(
            "target temperature",
            degrees,
            TARGET_TEMPERATURE_MIN,
            TARGET_TEMPERATURE_MAX,
        )?;
        let update = TemperaturesUpdate {
            target_temperature: Some(degrees),
            ..Default::default()
        };
        self.write(Characteristic::Temperatures, &update.encode())
            .await
    }

    /// The calibration offset in °C.
    pub async fn get_offset_temperature(&mut self) -> Result<f32> {
        Ok(self.get_temperatures().await?.offset_temperature)
    }

    /// Set the calibration offset, between [`OFFSET_TEMPERATURE_MIN`] and
    /// [`OFFSET_TEMPERATURE_MAX`]. Like the target temperature, the offset
    /// is rounded to the device's half-degree resolution before the write.
    pub async fn set_offset_temperature(&mut self, degrees: f32) -> Result<()> {
        check_range(
            "offset temperature",
            degrees,
            OFFSET_TEMPERATURE_MIN,
            OFFSET_TEMPERATURE_MAX,
        )?;
        let update = TemperaturesUpdate {
            offset_temperature: Some(degrees),
            ..Default::default()
        };
        self.write(Characteristic::Temperatures, &update.encode())
            .await
    }

    /// The decoded status register.
    pub async fn get_device_status(&mut self) -> Result<DeviceStatus> {
        let data = self.read(Characteristic::Status).await?;
        DeviceStatus::decode(&data)
    }

    /// True if the buttons on the device are locked.
    pub async fn get_childlock(&mut self) -> Result<bool> {
        Ok(self.get_device_status().await?.childlock)
    }

    /// Lock or unlock the buttons on the device.
    pub async fn set_childlock(&mut self, locked: bool) -> Result<()> {
        let mut status = self.get_device_status().await?;
        status.childlock = locked;
        self.write(Characteristic::Status, &status.encode()).await
    }

    /// Battery level in percent.
    pub async fn get_battery_level(&mut self) -> Result<u8> {
        let data = self.read(Characteristic::Battery).await?;
        match data[..] {
            [level] => Ok(level),
            _ => Err(Error::Decode {
                characteristic: Characteristic::Battery,
                reason: format!("expected 1 byte, got {}", data.len()),
            }),
        }
    }

    /// The identification strings of the device. They never change while
    /// the session is open, so they are fetched once and served from cache
    /// afterwards.
    pub async fn get_identification(&mut self) -> Result<Identification> {
        if let Some(identification) = &self.identification {
            return Ok(identification.clone());
        }
        let manufacturer = self.read_string(Characteristic::ManufacturerName).await?;
        let model = self.read_string(Characteristic::ModelNumber).await?;
        let firmware_revision = self.read_string(Characteristic::FirmwareRevision).await?;
        let software_revision = self.read_string(Characteristic::SoftwareRevision).await?;
        let identification = Identification {
            manufacturer,
            model,
            firmware_revision,
            software_revision,
        };
        self.identification = Some(identification.clone());
        Ok(identification)
    }

    /// The device clock. Seconds are not stored and read back as zero.
    pub async fn get_datetime(&mut self) -> Result<NaiveDateTime> {
        let data = self.read(Characteristic::DateTime).await?;
        decode_datetime(&data)
    }

    /// Set the device clock. Years outside 2000..=2255 fail with
    /// [`Error::OutOfRange`].
    pub async fn set_datetime(&mut self, t: NaiveDateTime) -> Result<()> {
        let data = encode_datetime(t)?;
        self.write(Characteristic::DateTime, &data).await
    }

    async fn read_string(&mut self, characteristic: Characteristic) -> Result<String> {
        let data = self.read(characteristic).await?;
        decode_string(characteristic, data)
    }

    async fn read(&mut self, characteristic: Characteristic) -> Result<Vec<u8>> {
        self.ensure_authenticated()?;
        let result = self.transport.read(characteristic).await;
        self.track_connection(result)
    }

    async fn write(&mut self, characteristic: Characteristic, data: &[u8]) -> Result<()> {
        self.ensure_authenticated()?;
        let result = self.transport.write(characteristic, data).await;
        self.track_connection(result)
    }

    fn ensure_authenticated(&self) -> Result<()> {
        if self.authenticated {
            Ok(())
        } else {
            Err(Error::NotAuthenticated)
        }
    }

    /// A lost connection ends the authenticated state; the caller has to
    /// open a fresh session.
    fn track_connection<V>(&mut self, result: Result<V>) -> Result<V> {
        if let Err(Error::ConnectionLost(_)) = &result {
            self.authenticated = false;
        }
        result
    }
}

fn check_range(what: &'static str, value: f32, min: f32, max: f32) -> Result<()> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(Error::OutOfRange {
            what,
            value: value as f64,
            min: min as f64,
            max: max as f64,
        })
    }
}
