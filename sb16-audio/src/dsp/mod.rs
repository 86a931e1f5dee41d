//! DSP protocol engine.
//!
//! The DSP is driven through a four-register command interface: bytes go
//! out through the write-data port and come back through the read-data
//! port, each gated by a status bit that must be polled first. On top of
//! those two primitives sit the reset handshake, the version query, and
//! the output-programming sequence that starts a DMA-fed playback pass.
//!
//! All polling is bounded: a chip that never becomes ready surfaces
//! [`Error::DeviceNotResponding`] instead of hanging the caller, with a
//! short delay between polls rather than a hot spin.

pub mod registers;

use embedded_hal::delay::DelayNs;

use crate::bus::PortIo;
use crate::config::Config;
use crate::Error;

use self::registers as reg;

/// Driver for the card's digital signal processor.
///
/// Generic over the port bus and a delay provider. The delay paces the
/// reset pulse (≥3 µs by the datasheet) and the gap between status polls.
pub struct Sb16Dsp<B, D> {
    bus: B,
    delay: D,
    base: u16,
    poll_retries: u32,
    poll_interval_us: u32,
}

impl<B, D> Sb16Dsp<B, D>
where
    B: PortIo,
    D: DelayNs,
{
    /// Create a driver for the DSP at `config.base_port`.
    pub fn new(bus: B, delay: D, config: &Config) -> Self {
        Sb16Dsp {
            bus,
            delay,
            base: config.base_port,
            poll_retries: config.poll_retries,
            poll_interval_us: config.poll_interval_us,
        }
    }

    /// Consume the driver and return the bus and delay.
    pub fn into_parts(self) -> (B, D) {
        (self.bus, self.delay)
    }

    fn port(&self, offset: u16) -> u16 {
        self.base + offset
    }

    /// Poll a status register until `ready` accepts its value.
    fn poll<F>(&mut self, offset: u16, ready: F) -> Result<(), Error>
    where
        F: Fn(u8) -> bool,
    {
        for _ in 0..self.poll_retries {
            if ready(self.bus.read(self.port(offset))) {
                return Ok(());
            }
            self.delay.delay_us(self.poll_interval_us);
        }
        Err(Error::DeviceNotResponding)
    }

    // ── Byte-level primitives ──────────────────────────────────────────

    /// Wait until the chip has data, then read one byte from it.
    pub fn read_data(&mut self) -> Result<u8, Error> {
        self.poll(reg::READ_STATUS, |status| status & reg::STATUS_BIT != 0)?;
        Ok(self.bus.read(self.port(reg::READ_DATA)))
    }

    /// Wait until the chip's inbound buffer drains, then send one byte.
    pub fn write_data(&mut self, value: u8) -> Result<(), Error> {
        self.poll(reg::WRITE_STATUS, |status| status & reg::STATUS_BIT == 0)?;
        self.bus.write(self.port(reg::WRITE_DATA), value);
        Ok(())
    }

    // ── Handshakes ─────────────────────────────────────────────────────

    /// Reset the DSP and wait for its ready byte.
    ///
    /// Pulses the reset register 1 → 0 with the datasheet-mandated ≥3 µs
    /// gap, then drains the read port until the chip answers
    /// [`registers::READY`]. One poll budget covers the whole handshake,
    /// so a chip streaming garbage still times out.
    pub fn reset(&mut self) -> Result<(), Error> {
        self.bus.write(self.port(reg::RESET), 1);
        self.delay.delay_us(reg::RESET_PULSE_US);
        self.bus.write(self.port(reg::RESET), 0);

        for _ in 0..self.poll_retries {
            if self.bus.read(self.port(reg::READ_STATUS)) & reg::STATUS_BIT != 0
                && self.bus.read(self.port(reg::READ_DATA)) == reg::READY
            {
                return Ok(());
            }
            self.delay.delay_us(self.poll_interval_us);
        }
        Err(Error::DeviceNotResponding)
    }

    /// Query the DSP version and log it.
    pub fn version(&mut self) -> Result<(u8, u8), Error> {
        self.write_data(reg::GET_VERSION)?;
        let major = self.read_data()?;
        let minor = self.read_data()?;
        log::info!("sb16: DSP version {major}.{minor}");
        Ok((major, minor))
    }

    /// Program the output rate and start an 8-bit DMA playback pass of
    /// `len` bytes (1..=65536).
    ///
    /// The chip begins pulling from the armed DMA channel as soon as the
    /// last parameter byte lands, so the channel must be configured
    /// before this is called.
    pub fn program_output(&mut self, rate: u16, len: usize) -> Result<(), Error> {
        debug_assert!(len >= 1 && len <= crate::constants::MAX_TRANSFER_BYTES);
        let count = (len - 1) as u16;

        self.write_data(reg::SET_OUTPUT_RATE)?;
        // Rate goes out high byte first; the block size goes low byte
        // first. That asymmetry is the chip's command encoding.
        self.write_data((rate >> 8) as u8)?;
        self.write_data(rate as u8)?;
        self.write_data(reg::BEGIN_OUTPUT)?;
        self.write_data(reg::MODE_MONO_UNSIGNED)?;
        self.write_data(count as u8)?;
        self.write_data((count >> 8) as u8)?;
        Ok(())
    }
}
