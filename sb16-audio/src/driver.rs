//! Device facade: the character-device shaped surface over the core.
//!
//! [`SoundBlaster16`] owns the DSP engine, the DMA controller driver and
//! the staging buffer. Construction brings the hardware up (reset pulse,
//! version handshake); [`write`](SoundBlaster16::write) accumulates bytes
//! and fires a playback pass whenever the buffer fills; shutdown resets
//! the chip. `open`/`release` hold no state — the host may call them
//! freely — and `read` never produces data on this playback-only device.

use embedded_hal::delay::DelayNs;

use crate::buffer::StagingBuffer;
use crate::bus::PortIo;
use crate::config::Config;
use crate::constants::MAX_TRANSFER_BYTES;
use crate::dma::{self, IsaDma};
use crate::dsp::Sb16Dsp;
use crate::Error;

/// Playback driver for one card.
pub struct SoundBlaster16<'a, B, D> {
    dsp: Sb16Dsp<B, D>,
    dma: IsaDma<B>,
    buffer: StagingBuffer<'a>,
    config: Config,
}

/// Arm the DMA channel, then command the DSP to consume it.
///
/// Strictly in that order: the chip begins requesting bytes as soon as
/// the output command completes, and an unarmed channel corrupts the
/// head of the transfer.
fn start_playback<B, D>(
    dsp: &mut Sb16Dsp<B, D>,
    dma: &mut IsaDma<B>,
    config: &Config,
    phys: u32,
    len: usize,
) -> Result<(), Error>
where
    B: PortIo,
    D: DelayNs,
{
    log::info!("sb16: starting playback, {len} bytes at {} Hz", config.sample_rate);
    dma.configure_single_write(config.dma_channel, phys, len);
    dsp.program_output(config.sample_rate, len)
}

impl<'a, B, D> SoundBlaster16<'a, B, D>
where
    B: PortIo,
    D: DelayNs,
{
    /// Bring the card up.
    ///
    /// `dsp_bus` and `dma_bus` address different hardware (the card and
    /// the mainboard DMA controller); they may be two handles to the same
    /// underlying bus. `buffer` must reside at physical address
    /// `buffer_phys`, inside the ISA DMA window and within one 64 KiB
    /// physical page — placing it there is the host allocator's job.
    ///
    /// Validation runs before any port is touched; a failed bring-up
    /// returns `Err` and leaves nothing half-initialized.
    pub fn new(
        config: Config,
        dsp_bus: B,
        dma_bus: B,
        delay: D,
        buffer: &'a mut [u8],
        buffer_phys: u32,
    ) -> Result<Self, Error> {
        config.validate()?;
        if buffer.is_empty() || buffer.len() > MAX_TRANSFER_BYTES {
            return Err(Error::InvalidConfig);
        }
        if !dma::addressable(buffer_phys, buffer.len()) {
            return Err(Error::BufferUnaddressable);
        }

        let mut dsp = Sb16Dsp::new(dsp_bus, delay, &config);
        dsp.reset()?;
        let (major, minor) = dsp.version()?;
        log::info!(
            "sb16: card at {:#05x}, DSP {major}.{minor}, {} byte staging buffer",
            config.base_port,
            buffer.len()
        );

        Ok(SoundBlaster16 {
            dsp,
            dma: IsaDma::new(dma_bus),
            buffer: StagingBuffer::new(buffer, buffer_phys),
            config,
        })
    }

    /// Accept playback bytes.
    ///
    /// Copies as much of `bytes` as fits into the staging buffer and
    /// returns the number accepted; the caller resubmits the remainder.
    /// Filling the last byte synchronously arms the DMA channel and
    /// starts the hardware on the whole buffer, after which the next
    /// cycle begins empty.
    pub fn write(&mut self, bytes: &[u8]) -> Result<usize, Error> {
        let SoundBlaster16 {
            dsp,
            dma,
            buffer,
            config,
        } = self;
        let accepted =
            buffer.submit(bytes, |phys, len| start_playback(dsp, dma, config, phys, len))?;
        log::debug!(
            "sb16: accepted {accepted} of {} bytes, {} staged",
            bytes.len(),
            buffer.len()
        );
        Ok(accepted)
    }

    /// Playback-only device: never yields data.
    pub fn read(&mut self, _dst: &mut [u8]) -> usize {
        0
    }

    /// Open hook. No per-open state exists.
    pub fn open(&self) {
        log::debug!("sb16: device opened");
    }

    /// Release hook, the counterpart of [`open`](Self::open).
    pub fn release(&self) {
        log::debug!("sb16: device released");
    }

    /// Bytes currently staged and awaiting a trigger.
    pub fn staged(&self) -> usize {
        self.buffer.len()
    }

    /// Staging buffer capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// Discard staged audio and reset the DSP.
    ///
    /// Safe to call at any point after construction, including repeatedly.
    pub fn shutdown(&mut self) -> Result<(), Error> {
        self.buffer.clear();
        self.dsp.reset()?;
        log::info!("sb16: shut down");
        Ok(())
    }

    /// Consume the driver and return the buses and delay provider.
    pub fn into_parts(self) -> (B, B, D) {
        let (dsp_bus, delay) = self.dsp.into_parts();
        (dsp_bus, self.dma.into_parts(), delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_BASE_PORT;
    use crate::dsp::registers as reg;
    use core::cell::RefCell;

    // ── Simulated card shared between the two bus handles ─────────────

    struct CardState {
        log: [(u16, u8); 96],
        log_count: usize,
        queue: [u8; 8],
        queue_len: usize,
        queue_pos: usize,
        last_reset: u8,
    }

    impl CardState {
        fn new() -> Self {
            CardState {
                log: [(0, 0); 96],
                log_count: 0,
                queue: [0; 8],
                queue_len: 0,
                queue_pos: 0,
                last_reset: 0,
            }
        }

        fn produce(&mut self, value: u8) {
            self.queue[self.queue_len] = value;
            self.queue_len += 1;
        }

        fn writes(&self) -> &[(u16, u8)] {
            &self.log[..self.log_count]
        }
    }

    /// One handle per hardware block; both append to the same log so
    /// tests can assert cross-device ordering.
    struct BusHandle<'a>(&'a RefCell<CardState>);

    impl PortIo for BusHandle<'_> {
        fn read(&mut self, port: u16) -> u8 {
            let mut card = self.0.borrow_mut();
            if port == DEFAULT_BASE_PORT + reg::READ_STATUS {
                if card.queue_pos < card.queue_len {
                    reg::STATUS_BIT
                } else {
                    0
                }
            } else if port == DEFAULT_BASE_PORT + reg::WRITE_STATUS {
                0 // always ready to accept
            } else if port == DEFAULT_BASE_PORT + reg::READ_DATA {
                if card.queue_pos < card.queue_len {
                    let value = card.queue[card.queue_pos];
                    card.queue_pos += 1;
                    value
                } else {
                    0xFF
                }
            } else {
                0xFF
            }
        }

        fn write(&mut self, port: u16, value: u8) {
            let mut card = self.0.borrow_mut();
            let index = card.log_count;
            card.log[index] = (port, value);
            card.log_count += 1;
            if port == DEFAULT_BASE_PORT + reg::RESET {
                if card.last_reset == 1 && value == 0 {
                    card.produce(reg::READY);
                }
                card.last_reset = value;
            } else if port == DEFAULT_BASE_PORT + reg::WRITE_DATA && value == reg::GET_VERSION {
                card.produce(4);
                card.produce(13);
            }
        }
    }

    struct NoDelay;

    impl DelayNs for NoDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    fn bring_up<'a>(
        card: &'a RefCell<CardState>,
        config: Config,
        buffer: &'a mut [u8],
        phys: u32,
    ) -> Result<SoundBlaster16<'a, BusHandle<'a>, NoDelay>, Error> {
        SoundBlaster16::new(config, BusHandle(card), BusHandle(card), NoDelay, buffer, phys)
    }

    #[test]
    fn invalid_channel_rejected_before_port_access() {
        let card = RefCell::new(CardState::new());
        let mut buffer = [0u8; 16];
        let config = Config {
            dma_channel: 7,
            ..Config::default()
        };

        let result = bring_up(&card, config, &mut buffer, 0x1000);
        assert!(matches!(result, Err(Error::InvalidConfig)));
        assert_eq!(card.borrow().log_count, 0);
    }

    #[test]
    fn unaddressable_buffer_rejected_before_port_access() {
        let card = RefCell::new(CardState::new());
        let mut buffer = [0u8; 32];

        // Straddles a 64 KiB physical page.
        let result = bring_up(&card, Config::default(), &mut buffer, 0xFFF0);
        assert!(matches!(result, Err(Error::BufferUnaddressable)));
        assert_eq!(card.borrow().log_count, 0);
    }

    #[test]
    fn empty_buffer_rejected() {
        let card = RefCell::new(CardState::new());
        let mut buffer = [0u8; 0];
        let result = bring_up(&card, Config::default(), &mut buffer, 0x1000);
        assert!(matches!(result, Err(Error::InvalidConfig)));
    }

    #[test]
    fn bring_up_resets_then_queries_version() {
        let card = RefCell::new(CardState::new());
        let mut buffer = [0u8; 16];

        let driver = bring_up(&card, Config::default(), &mut buffer, 0x1000).unwrap();
        assert_eq!(driver.capacity(), 16);
        assert_eq!(driver.staged(), 0);

        let state = card.borrow();
        assert_eq!(
            &state.writes()[..3],
            &[
                (DEFAULT_BASE_PORT + reg::RESET, 1),
                (DEFAULT_BASE_PORT + reg::RESET, 0),
                (DEFAULT_BASE_PORT + reg::WRITE_DATA, reg::GET_VERSION),
            ]
        );
    }

    #[test]
    fn read_never_produces_data() {
        let card = RefCell::new(CardState::new());
        let mut buffer = [0u8; 16];
        let mut driver = bring_up(&card, Config::default(), &mut buffer, 0x1000).unwrap();

        driver.open();
        let mut out = [0u8; 8];
        assert_eq!(driver.read(&mut out), 0);
        driver.release();
    }

    #[test]
    fn shutdown_is_repeatable_and_discards_staged_bytes() {
        let card = RefCell::new(CardState::new());
        let mut buffer = [0u8; 16];
        let mut driver = bring_up(&card, Config::default(), &mut buffer, 0x1000).unwrap();

        driver.write(&[1, 2, 3]).unwrap();
        assert_eq!(driver.staged(), 3);

        driver.shutdown().unwrap();
        assert_eq!(driver.staged(), 0);
        driver.shutdown().unwrap();

        // Three reset pulses in total: bring-up plus two shutdowns.
        let state = card.borrow();
        let pulses = state
            .writes()
            .iter()
            .filter(|&&(port, value)| port == DEFAULT_BASE_PORT + reg::RESET && value == 1)
            .count();
        assert_eq!(pulses, 3);
    }
}
