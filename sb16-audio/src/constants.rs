/// Default base I/O port of the card (factory jumper setting).
pub const DEFAULT_BASE_PORT: u16 = 0x220;

/// Default 8-bit ISA DMA channel wired to the card.
pub const DEFAULT_DMA_CHANNEL: u8 = 1;

/// Default playback sample rate in Hz.
pub const DEFAULT_SAMPLE_RATE: u16 = 11_025;

/// Default staging buffer capacity in bytes: sixteen 4 KiB pages.
pub const DMA_BUFFER_BYTES: usize = 4096 << 4;

/// Largest one-shot transfer: the DSP block-size parameter and the DMA
/// count register both hold `len - 1` in 16 bits.
pub const MAX_TRANSFER_BYTES: usize = 1 << 16;
