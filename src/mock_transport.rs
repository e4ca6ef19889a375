//! Scripted in-memory transport for exercising the session without a radio.

use crate::characteristic::Characteristic;
use crate::error::{Error, Result};
use crate::transport::Transport;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Default)]
pub(crate) struct MockTransport {
    /// Readable register contents, keyed by characteristic.
    pub registers: HashMap<Characteristic, Vec<u8>>,
    /// Every write that reached the transport, in order.
    pub writes: Vec<(Characteristic, Vec<u8>)>,
    pub reads: usize,
    /// Shared so tests can still observe the link after a failed open has
    /// consumed and dropped the transport.
    pub connected: Arc<AtomicBool>,
    pub disconnects: Arc<AtomicUsize>,
    /// Fail the next connect attempt.
    pub fail_connect: bool,
    /// Reject the PIN write during session setup.
    pub reject_pin: bool,
    /// Drop the link on the next read, like a device walking out of range.
    pub drop_link_on_next_read: bool,
    /// Time out the next read without dropping the link.
    pub timeout_on_next_read: bool,
    /// Time out the next write without dropping the link.
    pub timeout_on_next_write: bool,
}

impl MockTransport {
    /// A transport preloaded with plausible register contents.
    pub fn with_defaults() -> Self {
        let mut registers = HashMap::new();
        // 21.5°C current, 19°C target, 16/21°C low/high, 0°C offset
        registers.insert(
            Characteristic::Temperatures,
            vec![43, 38, 32, 42, 0, 8, 10],
        );
        registers.insert(Characteristic::Status, vec![0x01, 0x00, 0x00]);
        registers.insert(Characteristic::Battery, vec![87]);
        registers.insert(Characteristic::DateTime, vec![30, 12, 1, 6, 24]);
        registers.insert(
            Characteristic::ManufacturerName,
            b"EUROtronic GmbH".to_vec(),
        );
        registers.insert(Characteristic::ModelNumber, b"Comet Blue".to_vec());
        registers.insert(Characteristic::FirmwareRevision, b"COBL0126".to_vec());
        registers.insert(
            Characteristic::SoftwareRevision,
            b"0.0.6-sygonix1".to_vec(),
        );
        Self {
            registers,
            ..Default::default()
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn connect(&mut self) -> Result<()> {
        if self.fail_connect {
            return Err(Error::Connection("device out of range".into()));
        }
        self.connected.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<()> {
        self.disconnects.fetch_add(1, Ordering::SeqCst);
        self.connected.store(false, Ordering::SeqCst);
        Ok(())
    }

    async fn read(&mut self, characteristic: Characteristic) -> Result<Vec<u8>> {
        self.reads += 1;
        if self.timeout_on_next_read {
            self.timeout_on_next_read = false;
            return Err(Error::Timeout(Duration::from_secs(10)));
        }
        if self.drop_link_on_next_read {
            self.drop_link_on_next_read = false;
            self.connected.store(false, Ordering::SeqCst);
            return Err(Error::ConnectionLost("link dropped".into()));
        }
        self.registers
            .get(&characteristic)
            .cloned()
            .ok_or(Error::CharacteristicNotFound(characteristic))
    }

    async fn write(&mut self, characteristic: Characteristic, data: &[u8]) -> Result<()> {
        if self.timeout_on_next_write {
            self.timeout_on_next_write = false;
            return Err(Error::Timeout(Duration::from_secs(10)));
        }
        if characteristic == Characteristic::Pin && self.reject_pin {
            return Err(Error::ConnectionLost("write not permitted".into()));
        }
        self.writes.push((characteristic, data.to_vec()));
        // Writes land in the registers so subsequent reads see their own
        // effects. The temperatures register honors the device's "leave
        // unchanged" marker.
        match self.registers.get_mut(&characteristic) {
            Some(register)
                if characteristic == Characteristic::Temperatures
                    && register.len() == data.len() =>
            {
                for (stored, &incoming) in register.iter_mut().zip(data) {
                    if incoming != 0x80 {
                        *stored = incoming;
                    }
                }
            }
            _ => {
                self.registers.insert(characteristic, data.to_vec());
            }
        }
        Ok(())
    }
}
