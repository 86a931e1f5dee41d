//! # sb16-audio
//!
//! A `no_std` playback driver core for the Sound Blaster 16. It implements
//! the card's DSP command protocol (reset handshake, version query, sample
//! rate and transfer programming) and the one-shot ISA DMA pipeline that
//! feeds it, behind a character-device style `write` surface.
//!
//! The host environment stays in charge of everything around the core:
//! device-file registration, dispatching user writes into [`SoundBlaster16::write`],
//! allocating DMA-reachable memory for the staging buffer, and owning the
//! IRQ/DMA lines. The driver is generic over a [`bus::PortIo`] bus and an
//! [`embedded_hal::delay::DelayNs`] provider, so the whole protocol runs
//! unmodified against a simulated register block in tests.
//!
//! ## Architecture
//!
//! | Layer | Module | Purpose |
//! |-------|--------|---------|
//! | Bus | [`bus`] | Byte-wide port I/O trait, raw x86 accessors (feature-gated) |
//! | Protocol | [`dsp`] | DSP reset/version handshakes, rate + transfer programming |
//! | DMA | [`dma`] | One-shot 8237 channel setup under the shared-controller lock |
//! | Buffering | [`buffer`] | Fixed staging buffer: fill, trigger-on-full, reset |
//! | Facade | [`driver`] | Bring-up, `write`/`read`, `open`/`release`, shutdown |
//!
//! ## Quick start
//!
//! ```ignore
//! use sb16_audio::{Config, SoundBlaster16};
//! use sb16_audio::bus::X86PortIo;
//!
//! // `buffer` must live at physical address `phys`, below 16 MiB and not
//! // crossing a 64 KiB physical page — the host's DMA allocator's job.
//! let mut card = SoundBlaster16::new(
//!     Config::default(), X86PortIo, X86PortIo, delay, buffer, phys,
//! )?;
//!
//! card.open();
//! let mut sent = 0;
//! while sent < pcm.len() {
//!     sent += card.write(&pcm[sent..])?; // trigger fires when the buffer fills
//! }
//! card.release();
//! ```
//!
//! ## Features
//!
//! | Feature | Default | Enables |
//! |---------|---------|---------|
//! | `port-x86` | no | [`bus::X86PortIo`], raw `in`/`out` accessors |
//!
//! ## Device model
//!
//! - 8-bit unsigned mono PCM at a fixed programmed rate
//! - single-cycle DMA, fire-and-forget: no completion interrupt, the
//!   hardware drains the buffer on its own after the trigger
//! - playback-only: `read` never produces data

#![no_std]

pub mod constants;
pub mod config;
pub mod bus;
pub mod dsp;
pub mod dma;
pub mod buffer;
pub mod driver;

pub use config::Config;
pub use driver::SoundBlaster16;


/// Driver error values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The DSP did not become ready within the configured poll budget.
    DeviceNotResponding,
    /// The staging buffer is full and no playback trigger has drained it.
    OutOfSpace,
    /// Rejected device configuration or buffer size.
    InvalidConfig,
    /// The staging buffer lies outside the ISA DMA controller's reach.
    BufferUnaddressable,
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::DeviceNotResponding => write!(f, "DSP not responding"),
            Error::OutOfSpace => write!(f, "staging buffer full"),
            Error::InvalidConfig => write!(f, "invalid device configuration"),
            Error::BufferUnaddressable => write!(f, "buffer not reachable by ISA DMA"),
        }
    }
}
