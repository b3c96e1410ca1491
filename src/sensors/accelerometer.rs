//! Accelerometer scale and unit types

use crate::frame::RawSample3;

/// Accelerometer full-scale range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AccelScale {
    /// ±2g range (most sensitive, least range)
    #[default]
    G2 = 0,
    /// ±4g range
    G4 = 1,
    /// ±8g range
    G8 = 2,
    /// ±16g range (least sensitive, most range)
    G16 = 3,
}

impl AccelScale {
    /// Full-scale magnitude in g
    #[must_use]
    pub const fn range_g(self) -> u8 {
        match self {
            Self::G2 => 2,
            Self::G4 => 4,
            Self::G8 => 8,
            Self::G16 => 16,
        }
    }

    /// Size of one LSB in g: `range / 32768`
    #[must_use]
    pub fn resolution(self) -> f32 {
        f32::from(self.range_g()) / 32768.0
    }

    /// Datasheet sensitivity in LSB/g
    ///
    /// At ±2g this is also the raw count of 1 g.
    #[must_use]
    pub const fn sensitivity(self) -> f32 {
        match self {
            Self::G2 => 16384.0,
            Self::G4 => 8192.0,
            Self::G8 => 4096.0,
            Self::G16 => 2048.0,
        }
    }

    /// `ACCEL_FS_SEL` field value
    #[must_use]
    pub const fn fs_sel(self) -> u8 {
        self as u8
    }
}

/// Accelerometer DLPF bandwidth (`ACCEL_CONFIG2.A_DLPFCFG`), 1 kHz output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AccelDlpf {
    /// 218.1 Hz
    Hz218 = 1,
    /// 99 Hz
    Hz99 = 2,
    /// 44.8 Hz
    #[default]
    Hz45 = 3,
    /// 21.2 Hz
    Hz21 = 4,
    /// 10.2 Hz
    Hz10 = 5,
    /// 5.05 Hz
    Hz5 = 6,
}

/// Acceleration in g
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AccelDataG {
    /// X-axis acceleration in g
    pub x: f32,
    /// Y-axis acceleration in g
    pub y: f32,
    /// Z-axis acceleration in g
    pub z: f32,
}

impl AccelDataG {
    /// Scale raw counts by the resolution of the active range
    #[must_use]
    pub fn from_raw(raw: RawSample3, resolution: f32) -> Self {
        Self {
            x: f32::from(raw.x) * resolution,
            y: f32::from(raw.y) * resolution,
            z: f32::from(raw.z) * resolution,
        }
    }

    /// Magnitude of the acceleration vector
    #[must_use]
    pub fn magnitude(&self) -> f32 {
        libm::sqrtf(self.x * self.x + self.y * self.y + self.z * self.z)
    }
}
