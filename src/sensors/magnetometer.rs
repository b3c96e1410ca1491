//! Magnetometer (AK8963) scale, mode and unit types

use crate::frame::RawSample3;

/// AK8963 I2C address, reachable once MPU-9250 bypass is enabled
pub const AK8963_I2C_ADDRESS: u8 = 0x0C;

/// Expected `WIA` value for the AK8963
pub const AK8963_WIA_VALUE: u8 = 0x48;

/// `ST2.HOFL`: magnetic sensor overflow
pub const AK8963_ST2_OVERFLOW: u8 = 0x08;

/// Magnetometer output resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MagScale {
    /// 14-bit output, about 5.15 mG (0.6 µT nominal) per LSB
    Bits14 = 0,
    /// 16-bit output, about 1.29 mG (0.15 µT nominal) per LSB
    #[default]
    Bits16 = 1,
}

impl MagScale {
    /// Size of one LSB in milligauss
    #[must_use]
    pub fn resolution(self) -> f32 {
        match self {
            Self::Bits14 => 10.0 * 4219.0 / 8190.0,
            Self::Bits16 => 10.0 * 4219.0 / 32760.0,
        }
    }

    /// `CNTL1.BIT` value
    #[must_use]
    pub const fn output_bit(self) -> bool {
        matches!(self, Self::Bits16)
    }
}

/// AK8963 operating mode (`CNTL1.MODE`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MagMode {
    /// Power-down
    PowerDown = 0x00,
    /// Single measurement
    Single = 0x01,
    /// Continuous measurement at 8 Hz
    #[default]
    Continuous8Hz = 0x02,
    /// Continuous measurement at 100 Hz
    Continuous100Hz = 0x06,
    /// Fuse ROM access
    FuseRom = 0x0F,
}

/// Convert a fuse-ROM `ASA` byte into a sensitivity multiplier
#[must_use]
pub fn sensitivity_adjustment(asa: u8) -> f32 {
    (f32::from(asa) - 128.0) / 256.0 + 1.0
}

/// Magnetic field in milligauss
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MagDataMg {
    /// X-axis field in mG
    pub x: f32,
    /// Y-axis field in mG
    pub y: f32,
    /// Z-axis field in mG
    pub z: f32,
}

impl MagDataMg {
    /// Scale raw counts, apply per-axis factory adjustment, then remove
    /// the hard-iron bias (mG)
    #[must_use]
    pub fn from_raw(
        raw: RawSample3,
        resolution: f32,
        adjustment: [f32; 3],
        bias: [f32; 3],
    ) -> Self {
        Self {
            x: f32::from(raw.x) * resolution * adjustment[0] - bias[0],
            y: f32::from(raw.y) * resolution * adjustment[1] - bias[1],
            z: f32::from(raw.z) * resolution * adjustment[2] - bias[2],
        }
    }

    /// Field magnitude in mG
    #[must_use]
    pub fn magnitude(&self) -> f32 {
        libm::sqrtf(self.x * self.x + self.y * self.y + self.z * self.z)
    }
}
