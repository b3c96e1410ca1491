//! Sensor modules for the MPU-9250
//!
//! Scale tables, filter settings and physical-unit types for each sensor:
//! - Accelerometer (3-axis)
//! - Gyroscope (3-axis)
//! - Magnetometer (3-axis, AK8963)
//!
//! The driver reads live samples through `Mpu9250` using the scales held in
//! [`SensorConfig`].

pub mod accelerometer;
pub mod gyroscope;
pub mod magnetometer;

// Re-export main types
pub use accelerometer::{AccelDataG, AccelDlpf, AccelScale};
pub use gyroscope::{GyroDataDps, GyroDlpf, GyroScale};
pub use magnetometer::{MagDataMg, MagMode, MagScale};

/// Sensor axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Axis {
    /// X axis
    X = 0,
    /// Y axis
    Y = 1,
    /// Z axis
    #[default]
    Z = 2,
}

impl Axis {
    /// Index into an `[x, y, z]` array
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Live measurement configuration owned by the driver
///
/// The defaults give ±2 g, ±250 dps, 16-bit magnetometer output at 8 Hz and
/// a 200 Hz sample rate behind 41/45 Hz low-pass filters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorConfig {
    /// Accelerometer full-scale range
    pub accel_scale: AccelScale,
    /// Gyroscope full-scale range
    pub gyro_scale: GyroScale,
    /// Magnetometer output resolution
    pub mag_scale: MagScale,
    /// Magnetometer measurement mode
    pub mag_mode: MagMode,
    /// Sample rate = 1 kHz / (1 + divider)
    pub sample_rate_divider: u8,
    /// Gyro and temperature low-pass filter
    pub gyro_dlpf: GyroDlpf,
    /// Accelerometer low-pass filter
    pub accel_dlpf: AccelDlpf,
    /// Hard-iron bias subtracted from magnetometer readings (mG)
    pub mag_hard_iron_bias: [f32; 3],
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            accel_scale: AccelScale::G2,
            gyro_scale: GyroScale::Dps250,
            mag_scale: MagScale::Bits16,
            mag_mode: MagMode::Continuous8Hz,
            sample_rate_divider: 4,
            gyro_dlpf: GyroDlpf::Hz41,
            accel_dlpf: AccelDlpf::Hz45,
            mag_hard_iron_bias: [0.0; 3],
        }
    }
}
