//! Configuration types for the SAI driver

use super::error::{ConfigError, ConfigResult};
use crate::internal::constants::{
    DATA_REGISTER_BYTES, DEFAULT_SAMPLE_RATE_HZ, DEFAULT_WATERMARK, FIFO_DEPTH, MAX_DATA_LINES,
};

/// Transfer direction of a transceiver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Transmitter (memory to FIFO)
    Transmit,
    /// Receiver (FIFO to memory)
    Receive,
}

impl Direction {
    /// Both directions, transmit first
    pub const ALL: [Direction; 2] = [Direction::Transmit, Direction::Receive];
}

/// Audio word width
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum WordWidth {
    /// 8 bits per word
    Bits8 = 8,
    /// 16 bits per word
    #[default]
    Bits16 = 16,
    /// 24 bits per word
    Bits24 = 24,
    /// 32 bits per word
    Bits32 = 32,
}

impl WordWidth {
    /// Width in bits
    #[must_use]
    pub const fn bits(self) -> u32 {
        self as u32
    }

    /// Number of buffer bytes carried by one FIFO word
    #[must_use]
    pub const fn bytes(self) -> usize {
        self as usize / 8
    }
}

/// How data requests are serviced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransferMode {
    /// One word per channel per FIFO request interrupt
    #[default]
    Interrupt,
    /// One watermark of words per channel per DMA completion
    Dma,
}

/// Set of enabled data lines.
///
/// Words of a multi-line transfer are interleaved across the enabled lines in
/// ascending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelMask(u8);

impl ChannelMask {
    /// Data line 0
    pub const CHANNEL0: Self = Self(1 << 0);
    /// Data line 1
    pub const CHANNEL1: Self = Self(1 << 1);
    /// Data line 2
    pub const CHANNEL2: Self = Self(1 << 2);
    /// Data line 3
    pub const CHANNEL3: Self = Self(1 << 3);
    /// Data line 4
    pub const CHANNEL4: Self = Self(1 << 4);
    /// Data line 5
    pub const CHANNEL5: Self = Self(1 << 5);
    /// Data line 6
    pub const CHANNEL6: Self = Self(1 << 6);
    /// Data line 7
    pub const CHANNEL7: Self = Self(1 << 7);

    /// Create from raw mask bits
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    /// Raw mask bits
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Union of two masks
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Check if a data line is enabled
    #[must_use]
    pub const fn contains(self, channel: u8) -> bool {
        (channel as usize) < MAX_DATA_LINES && (self.0 >> channel) & 1 != 0
    }

    /// Number of enabled data lines
    #[must_use]
    pub const fn count(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Check if no data line is enabled
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Index of the `n`-th enabled data line, counting from zero
    #[must_use]
    pub fn nth(self, n: usize) -> Option<u8> {
        (0..MAX_DATA_LINES as u8)
            .filter(|&ch| self.contains(ch))
            .nth(n)
    }
}

impl Default for ChannelMask {
    fn default() -> Self {
        Self::CHANNEL0
    }
}

impl core::ops::BitOr for ChannelMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

/// Resolved transfer format of one transceiver.
///
/// Clock, frame sync and protocol settings are resolved by the caller and
/// applied by the port; the engine only uses the word size, the enabled data
/// lines, the watermark and the transfer mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TransferFormat {
    /// Sample rate in Hz (forwarded to the port)
    pub sample_rate_hz: u32,
    /// Word width
    pub word_width: WordWidth,
    /// Enabled data lines
    pub channel_mask: ChannelMask,
    /// FIFO watermark in words
    pub watermark: usize,
    /// Interrupt or DMA servicing
    pub mode: TransferMode,
}

impl Default for TransferFormat {
    fn default() -> Self {
        Self::new()
    }
}

impl TransferFormat {
    /// Create a default format: 48 kHz, 16-bit, data line 0, half-FIFO
    /// watermark, interrupt mode.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            sample_rate_hz: DEFAULT_SAMPLE_RATE_HZ,
            word_width: WordWidth::Bits16,
            channel_mask: ChannelMask::CHANNEL0,
            watermark: DEFAULT_WATERMARK,
            mode: TransferMode::Interrupt,
        }
    }

    /// Set the sample rate
    #[must_use]
    pub const fn with_sample_rate(mut self, hz: u32) -> Self {
        self.sample_rate_hz = hz;
        self
    }

    /// Set the word width
    #[must_use]
    pub const fn with_word_width(mut self, width: WordWidth) -> Self {
        self.word_width = width;
        self
    }

    /// Set the enabled data lines
    #[must_use]
    pub const fn with_channel_mask(mut self, mask: ChannelMask) -> Self {
        self.channel_mask = mask;
        self
    }

    /// Set the FIFO watermark
    #[must_use]
    pub const fn with_watermark(mut self, words: usize) -> Self {
        self.watermark = words;
        self
    }

    /// Set the transfer mode
    #[must_use]
    pub const fn with_mode(mut self, mode: TransferMode) -> Self {
        self.mode = mode;
        self
    }

    /// Check the format against the hardware limits
    pub const fn validate(&self) -> ConfigResult<()> {
        if self.watermark == 0 || self.watermark > FIFO_DEPTH {
            return Err(ConfigError::InvalidWatermark);
        }
        if self.channel_mask.is_empty() {
            return Err(ConfigError::NoChannels);
        }
        if self.sample_rate_hz == 0 {
            return Err(ConfigError::InvalidSampleRate);
        }
        Ok(())
    }

    /// Number of enabled data lines
    #[inline]
    pub const fn channel_count(&self) -> usize {
        self.channel_mask.count()
    }

    /// Buffer bytes per FIFO word
    #[inline]
    pub const fn bytes_per_word(&self) -> usize {
        let bytes = self.word_width.bytes();
        if bytes > DATA_REGISTER_BYTES {
            DATA_REGISTER_BYTES
        } else {
            bytes
        }
    }

    /// Words moved per data line on each hardware event
    #[inline]
    pub const fn words_per_event(&self) -> usize {
        match self.mode {
            TransferMode::Interrupt => 1,
            TransferMode::Dma => self.watermark,
        }
    }

    /// Upper bound of buffer bytes moved on each hardware event
    #[inline]
    pub const fn bytes_per_event(&self) -> usize {
        self.words_per_event() * self.channel_count() * self.bytes_per_word()
    }
}

/// State of one transfer direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EngineState {
    /// Queue empty, requests disarmed
    #[default]
    Idle,
    /// At least one transfer queued, requests armed
    Busy,
    /// Hardware fault; needs a reset
    Error,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_default_values() {
        let format = TransferFormat::new();

        assert_eq!(format.sample_rate_hz, DEFAULT_SAMPLE_RATE_HZ);
        assert_eq!(format.word_width, WordWidth::Bits16);
        assert_eq!(format.channel_mask, ChannelMask::CHANNEL0);
        assert_eq!(format.watermark, DEFAULT_WATERMARK);
        assert_eq!(format.mode, TransferMode::Interrupt);
        assert!(format.validate().is_ok());
    }

    #[test]
    fn format_default_trait_matches_new() {
        assert_eq!(TransferFormat::default(), TransferFormat::new());
    }

    #[test]
    fn format_builder_chaining() {
        let format = TransferFormat::new()
            .with_sample_rate(44_100)
            .with_word_width(WordWidth::Bits24)
            .with_channel_mask(ChannelMask::CHANNEL0 | ChannelMask::CHANNEL2)
            .with_watermark(8)
            .with_mode(TransferMode::Dma);

        assert_eq!(format.sample_rate_hz, 44_100);
        assert_eq!(format.word_width, WordWidth::Bits24);
        assert_eq!(format.channel_count(), 2);
        assert_eq!(format.watermark, 8);
        assert_eq!(format.mode, TransferMode::Dma);
    }

    #[test]
    fn format_rejects_zero_watermark() {
        let format = TransferFormat::new().with_watermark(0);
        assert_eq!(format.validate(), Err(ConfigError::InvalidWatermark));
    }

    #[test]
    fn format_rejects_watermark_above_fifo() {
        let format = TransferFormat::new().with_watermark(FIFO_DEPTH + 1);
        assert_eq!(format.validate(), Err(ConfigError::InvalidWatermark));

        let format = TransferFormat::new().with_watermark(FIFO_DEPTH);
        assert!(format.validate().is_ok());
    }

    #[test]
    fn format_rejects_empty_mask() {
        let format = TransferFormat::new().with_channel_mask(ChannelMask::from_bits(0));
        assert_eq!(format.validate(), Err(ConfigError::NoChannels));
    }

    #[test]
    fn format_rejects_zero_sample_rate() {
        let format = TransferFormat::new().with_sample_rate(0);
        assert_eq!(format.validate(), Err(ConfigError::InvalidSampleRate));
    }

    #[test]
    fn words_per_event_follows_mode() {
        let format = TransferFormat::new().with_watermark(6);
        assert_eq!(format.words_per_event(), 1);
        assert_eq!(format.with_mode(TransferMode::Dma).words_per_event(), 6);
    }

    #[test]
    fn bytes_per_event_scales_with_channels() {
        let format = TransferFormat::new()
            .with_word_width(WordWidth::Bits32)
            .with_channel_mask(ChannelMask::from_bits(0b0000_0111))
            .with_watermark(4)
            .with_mode(TransferMode::Dma);
        assert_eq!(format.bytes_per_event(), 4 * 3 * 4);
    }

    #[test]
    fn word_width_bytes() {
        assert_eq!(WordWidth::Bits8.bytes(), 1);
        assert_eq!(WordWidth::Bits16.bytes(), 2);
        assert_eq!(WordWidth::Bits24.bytes(), 3);
        assert_eq!(WordWidth::Bits32.bytes(), 4);
        assert_eq!(WordWidth::Bits24.bits(), 24);
    }

    #[test]
    fn channel_mask_nth_ascending() {
        let mask = ChannelMask::CHANNEL1 | ChannelMask::CHANNEL4 | ChannelMask::CHANNEL7;
        assert_eq!(mask.count(), 3);
        assert_eq!(mask.nth(0), Some(1));
        assert_eq!(mask.nth(1), Some(4));
        assert_eq!(mask.nth(2), Some(7));
        assert_eq!(mask.nth(3), None);
    }

    #[test]
    fn channel_mask_contains() {
        let mask = ChannelMask::from_bits(0b1000_0001);
        assert!(mask.contains(0));
        assert!(mask.contains(7));
        assert!(!mask.contains(3));
        assert!(!mask.contains(8));
    }

    #[test]
    fn channel_mask_default_is_line_zero() {
        assert_eq!(ChannelMask::default().bits(), 0b1);
    }

    #[test]
    fn engine_state_default() {
        assert_eq!(EngineState::default(), EngineState::Idle);
    }
}
