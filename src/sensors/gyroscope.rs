//! Gyroscope scale and unit types

use crate::frame::RawSample3;

/// Gyroscope full-scale range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GyroScale {
    /// ±250°/s range
    #[default]
    Dps250 = 0,
    /// ±500°/s range
    Dps500 = 1,
    /// ±1000°/s range
    Dps1000 = 2,
    /// ±2000°/s range
    Dps2000 = 3,
}

impl GyroScale {
    /// Full-scale magnitude in °/s
    #[must_use]
    pub const fn range_dps(self) -> u16 {
        match self {
            Self::Dps250 => 250,
            Self::Dps500 => 500,
            Self::Dps1000 => 1000,
            Self::Dps2000 => 2000,
        }
    }

    /// Size of one LSB in °/s: `range / 32768`
    #[must_use]
    pub fn resolution(self) -> f32 {
        f32::from(self.range_dps()) / 32768.0
    }

    /// Datasheet sensitivity in LSB/(°/s)
    #[must_use]
    pub const fn sensitivity(self) -> f32 {
        match self {
            Self::Dps250 => 131.0,
            Self::Dps500 => 65.5,
            Self::Dps1000 => 32.8,
            Self::Dps2000 => 16.4,
        }
    }

    /// `GYRO_FS_SEL` field value
    #[must_use]
    pub const fn fs_sel(self) -> u8 {
        self as u8
    }
}

/// Gyro and temperature DLPF bandwidth (`CONFIG.DLPF_CFG`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GyroDlpf {
    /// 250 Hz, 8 kHz output
    Hz250 = 0,
    /// 184 Hz
    Hz184 = 1,
    /// 92 Hz
    Hz92 = 2,
    /// 41 Hz, 5.9 ms delay
    #[default]
    Hz41 = 3,
    /// 20 Hz
    Hz20 = 4,
    /// 10 Hz
    Hz10 = 5,
    /// 5 Hz
    Hz5 = 6,
}

/// Angular rate in degrees per second
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GyroDataDps {
    /// X-axis rate in °/s
    pub x: f32,
    /// Y-axis rate in °/s
    pub y: f32,
    /// Z-axis rate in °/s
    pub z: f32,
}

impl GyroDataDps {
    /// Scale raw counts by the resolution of the active range
    #[must_use]
    pub fn from_raw(raw: RawSample3, resolution: f32) -> Self {
        Self {
            x: f32::from(raw.x) * resolution,
            y: f32::from(raw.y) * resolution,
            z: f32::from(raw.z) * resolution,
        }
    }

    /// Convert to radians per second
    #[must_use]
    pub fn to_radians(&self) -> (f32, f32, f32) {
        const DEG_TO_RAD: f32 = core::f32::consts::PI / 180.0;
        (self.x * DEG_TO_RAD, self.y * DEG_TO_RAD, self.z * DEG_TO_RAD)
    }
}
