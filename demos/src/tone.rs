//! Tone playback — simplest possible use of the driver.
//!
//! Streams a 440 Hz sine, rendered as 8-bit unsigned mono at 11 025 Hz,
//! through the full write → staging buffer → DMA-arm → DSP-program path.
//! No card is required: the hardware side is a small simulation of the
//! DSP register block and the mainboard DMA controller, so this runs
//! anywhere and prints what a real card would have been told.
//!
//! ```text
//!   sine samples ──► SoundBlaster16::write ──► staging buffer (64 KiB)
//!                                                   │ full
//!                                                   ▼
//!                      simulated 8237 + DSP ◄── playback trigger
//! ```

use std::cell::RefCell;
use std::f32::consts::TAU;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use sb16_audio::bus::PortIo;
use sb16_audio::constants::{DEFAULT_BASE_PORT, DMA_BUFFER_BYTES};
use sb16_audio::{Config, SoundBlaster16};

const TONE_HZ: f32 = 440.0;
const SECONDS: usize = 12;
const WRITE_CHUNK: usize = 4096;

// ── Console sink for the driver's log lines ────────────────────────────────

struct ConsoleLogger;

impl log::Log for ConsoleLogger {
    fn enabled(&self, _metadata: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        eprintln!("[{}] {}", record.level(), record.args());
    }

    fn flush(&self) {}
}

static LOGGER: ConsoleLogger = ConsoleLogger;

// ── Simulated card ─────────────────────────────────────────────────────────

/// DSP register block plus DMA controller, enough of both for the driver
/// to believe a card is present: answers the reset pulse with the ready
/// byte, reports a DSP version, and decodes the output-programming
/// command stream.
#[derive(Default)]
struct SimCard {
    last_reset: u8,
    last_rate: u16,
    read_queue: Vec<u8>,
    /// Parameter bytes collected for the in-flight DSP command.
    pending: Vec<u8>,
    pending_for: u8,
    /// Completed playback programmings: (rate, mode, block size).
    playbacks: Vec<(u16, u8, u16)>,
    dma_writes: Vec<(u16, u8)>,
}

impl SimCard {
    fn dsp_command(&mut self, value: u8) {
        if self.pending_for != 0 {
            self.pending.push(value);
            let done = match self.pending_for {
                0x41 => self.pending.len() == 2,
                0xC0 => self.pending.len() == 3,
                _ => true,
            };
            if done {
                match self.pending_for {
                    0x41 => {
                        self.last_rate =
                            u16::from(self.pending[0]) << 8 | u16::from(self.pending[1]);
                    }
                    0xC0 => {
                        let mode = self.pending[0];
                        let count =
                            u16::from(self.pending[1]) | u16::from(self.pending[2]) << 8;
                        self.playbacks.push((self.last_rate, mode, count));
                    }
                    _ => {}
                }
                self.pending.clear();
                self.pending_for = 0;
            }
            return;
        }
        match value {
            0xE1 => self.read_queue.extend([4, 13]),
            0x41 | 0xC0 => self.pending_for = value,
            _ => {}
        }
    }
}

/// Shared handle: the driver wants one bus per hardware block.
#[derive(Clone)]
struct SimBus(Rc<RefCell<SimCard>>);

impl PortIo for SimBus {
    fn read(&mut self, port: u16) -> u8 {
        let mut card = self.0.borrow_mut();
        match port.checked_sub(DEFAULT_BASE_PORT) {
            Some(0xE) => {
                if card.read_queue.is_empty() {
                    0
                } else {
                    0x80
                }
            }
            Some(0xC) => 0, // always ready for the next command byte
            Some(0xA) => {
                if card.read_queue.is_empty() {
                    0xFF
                } else {
                    card.read_queue.remove(0)
                }
            }
            _ => 0xFF,
        }
    }

    fn write(&mut self, port: u16, value: u8) {
        let mut card = self.0.borrow_mut();
        match port.checked_sub(DEFAULT_BASE_PORT) {
            Some(0x6) => {
                if card.last_reset == 1 && value == 0 {
                    card.read_queue.push(0xAA);
                }
                card.last_reset = value;
            }
            Some(0xC) => card.dsp_command(value),
            _ => card.dma_writes.push((port, value)),
        }
    }
}

struct HostDelay;

impl DelayNs for HostDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(std::time::Duration::from_nanos(u64::from(ns)));
    }
}

// ── Demo ───────────────────────────────────────────────────────────────────

fn render_tone(rate: u16, samples: usize) -> Vec<u8> {
    (0..samples)
        .map(|n| {
            let phase = TAU * TONE_HZ * n as f32 / f32::from(rate);
            (127.0 + 127.0 * phase.sin()) as u8
        })
        .collect()
}

fn main() {
    log::set_logger(&LOGGER).expect("logger already set");
    log::set_max_level(log::LevelFilter::Info);

    let config = Config::default();
    let card = Rc::new(RefCell::new(SimCard::default()));

    // A real host hands over DMA-reachable memory; the simulation only
    // needs the address to be plausible (64 KiB-aligned, below 16 MiB).
    let mut buffer = vec![0u8; DMA_BUFFER_BYTES];
    let phys = 0x08_0000;

    let mut driver = SoundBlaster16::new(
        config,
        SimBus(card.clone()),
        SimBus(card.clone()),
        HostDelay,
        &mut buffer,
        phys,
    )
    .expect("bring-up against the simulated card failed");

    driver.open();

    let pcm = render_tone(config.sample_rate, usize::from(config.sample_rate) * SECONDS);
    println!(
        "streaming {} bytes of {TONE_HZ} Hz tone in {WRITE_CHUNK}-byte writes",
        pcm.len()
    );

    let mut sent = 0;
    while sent < pcm.len() {
        let end = (sent + WRITE_CHUNK).min(pcm.len());
        let mut chunk = &pcm[sent..end];
        while !chunk.is_empty() {
            let accepted = driver.write(chunk).expect("write failed");
            chunk = &chunk[accepted..];
            sent += accepted;
        }
    }

    println!("{} bytes streamed, {} still staged", sent, driver.staged());
    driver.release();
    driver.shutdown().expect("shutdown failed");

    let card = card.borrow();
    println!("simulated card saw {} playback pass(es):", card.playbacks.len());
    for (i, (rate, mode, count)) in card.playbacks.iter().enumerate() {
        println!(
            "  pass {i}: rate {rate} Hz, mode {mode:#04x}, {} bytes",
            u32::from(*count) + 1
        );
    }
    println!(
        "DMA controller received {} register writes",
        card.dma_writes.len()
    );
}
