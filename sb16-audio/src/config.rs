//! Runtime device configuration.
//!
//! The original card exposes its base port and DMA channel as jumpers;
//! the driver takes them as data so one build covers any jumper setting.

use crate::constants::{DEFAULT_BASE_PORT, DEFAULT_DMA_CHANNEL, DEFAULT_SAMPLE_RATE};
use crate::Error;

/// Hardware and polling parameters for one card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Base I/O port; all DSP registers sit at fixed offsets from it.
    pub base_port: u16,
    /// ISA DMA channel the card is wired to (8-bit controller, 0..=3).
    pub dma_channel: u8,
    /// Output sample rate in Hz.
    pub sample_rate: u16,
    /// Status polls attempted before a handshake is abandoned.
    pub poll_retries: u32,
    /// Delay between status polls, in microseconds.
    pub poll_interval_us: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            base_port: DEFAULT_BASE_PORT,
            dma_channel: DEFAULT_DMA_CHANNEL,
            sample_rate: DEFAULT_SAMPLE_RATE,
            // 10_000 × 10 µs: a 100 ms ceiling on any single handshake,
            // far beyond what a working chip needs after reset.
            poll_retries: 10_000,
            poll_interval_us: 10,
        }
    }
}

impl Config {
    /// Check the configuration against hardware limits.
    pub fn validate(&self) -> Result<(), Error> {
        if self.dma_channel > 3 {
            return Err(Error::InvalidConfig);
        }
        if self.sample_rate == 0 {
            return Err(Error::InvalidConfig);
        }
        if self.poll_retries == 0 {
            return Err(Error::InvalidConfig);
        }
        Ok(())
    }
}
