//! Decoding of raw sample frames
//!
//! The MPU-9250 emits big-endian 16-bit words, the AK8963 little-endian
//! words followed by its `ST2` status byte.

use crate::sensors::magnetometer::AK8963_ST2_OVERFLOW;

/// Byte order of the 16-bit words in a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ByteOrder {
    /// High byte first
    BigEndian,
    /// Low byte first
    LittleEndian,
}

/// How to turn a register burst into signed 16-bit words
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrameLayout {
    /// Word byte order
    pub order: ByteOrder,
    /// When set, the frame carries one trailing status byte and the frame
    /// is rejected if any bit of the mask is set in it
    pub overflow_mask: Option<u8>,
}

impl FrameLayout {
    /// MPU-9250 accel, gyro, temperature and FIFO words
    pub const BIG_ENDIAN: Self = Self {
        order: ByteOrder::BigEndian,
        overflow_mask: None,
    };

    /// AK8963 `HXL..ST2` burst
    pub const MAGNETOMETER: Self = Self {
        order: ByteOrder::LittleEndian,
        overflow_mask: Some(AK8963_ST2_OVERFLOW),
    };

    /// Number of bytes a frame of `words` words occupies
    #[must_use]
    pub const fn frame_len(&self, words: usize) -> usize {
        words * 2 + if self.overflow_mask.is_some() { 1 } else { 0 }
    }

    /// Decode `N` words from the start of `bytes`
    ///
    /// Returns `None` when `bytes` is shorter than the frame or when the
    /// status byte flags an overflow.
    #[must_use]
    pub fn decode<const N: usize>(&self, bytes: &[u8]) -> Option<[i16; N]> {
        if bytes.len() < self.frame_len(N) {
            return None;
        }

        if let Some(mask) = self.overflow_mask {
            if bytes[N * 2] & mask != 0 {
                return None;
            }
        }

        let mut words = [0i16; N];
        for (word, pair) in words.iter_mut().zip(bytes.chunks_exact(2)) {
            let pair = [pair[0], pair[1]];
            *word = match self.order {
                ByteOrder::BigEndian => i16::from_be_bytes(pair),
                ByteOrder::LittleEndian => i16::from_le_bytes(pair),
            };
        }
        Some(words)
    }
}

/// Raw signed counts for a three-axis sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawSample3 {
    /// X-axis counts
    pub x: i16,
    /// Y-axis counts
    pub y: i16,
    /// Z-axis counts
    pub z: i16,
}

impl RawSample3 {
    /// Build a sample from its three axes
    #[must_use]
    pub const fn new(x: i16, y: i16, z: i16) -> Self {
        Self { x, y, z }
    }

    /// Axes as an array, X first
    #[must_use]
    pub const fn to_array(self) -> [i16; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<[i16; 3]> for RawSample3 {
    fn from(words: [i16; 3]) -> Self {
        Self::new(words[0], words[1], words[2])
    }
}
