//! DSP register offsets and command bytes.
//!
//! Offsets are relative to the card's base I/O port. The write-data port
//! doubles as the write-status port: written, it carries a command or
//! parameter byte; read, bit 7 reports whether the chip's inbound buffer
//! is still full.

// ── Register offsets ───────────────────────────────────────────────────────

/// Reset register (write). Pulsing 1 then 0 resets the DSP.
pub const RESET: u16 = 0x6;

/// Read-data register: the last byte the chip produced.
pub const READ_DATA: u16 = 0xA;

/// Write-data register: command and parameter bytes to the chip.
pub const WRITE_DATA: u16 = 0xC;

/// Write-status register (read): bit 7 set = inbound buffer still full.
pub const WRITE_STATUS: u16 = 0xC;

/// Read-status register (read): bit 7 set = outbound data available.
pub const READ_STATUS: u16 = 0xE;

/// The busy/ready bit in both status registers.
pub const STATUS_BIT: u8 = 0x80;

// ── Protocol constants ─────────────────────────────────────────────────────

/// Byte the DSP produces once a reset pulse has taken effect.
pub const READY: u8 = 0xAA;

/// Minimum width of the reset pulse, in microseconds.
pub const RESET_PULSE_US: u32 = 3;

// ── Commands ───────────────────────────────────────────────────────────────

/// Report the DSP version: the chip answers major byte, then minor byte.
pub const GET_VERSION: u8 = 0xE1;

/// Set the output sample rate; high byte then low byte follow.
pub const SET_OUTPUT_RATE: u8 = 0x41;

/// Begin 8-bit DMA output; mode byte and block size follow.
pub const BEGIN_OUTPUT: u8 = 0xC0;

/// Transfer mode parameter: mono, unsigned samples, single-cycle.
pub const MODE_MONO_UNSIGNED: u8 = 0x00;
