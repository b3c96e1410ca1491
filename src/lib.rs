#![no_std]
#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod calibration;
pub mod device;
pub mod frame;
pub mod interface;
pub mod registers;
pub mod sensors;

// Re-export main types
pub use calibration::{
    Averaging, BiasCalibration, BiasVector, CalibrationConfig, FifoBiasCalibrator,
};
pub use device::Mpu9250;
pub use frame::{ByteOrder, FrameLayout, RawSample3};
pub use interface::{DeviceInterface, I2cTransport, RegisterTransport};
pub use self_test::{DEFAULT_TOLERANCE_PERCENT, SelfTestConfig, SelfTestEvaluator, SelfTestReport};
pub use sensors::{
    AccelDataG, AccelDlpf, AccelScale, Axis, GyroDataDps, GyroDlpf, GyroScale, MagDataMg, MagMode,
    MagScale, SensorConfig,
};

/// MPU-9250 I2C address when the AD0 pin is low
pub const I2C_ADDRESS_AD0_LOW: u8 = 0x68;

/// MPU-9250 I2C address when the AD0 pin is high
pub const I2C_ADDRESS_AD0_HIGH: u8 = 0x69;

/// `WHO_AM_I` value of the MPU-9250
pub const WHO_AM_I_MPU9250: u8 = 0x71;

/// `WHO_AM_I` value of the MPU-9255
pub const WHO_AM_I_MPU9255: u8 = 0x73;

/// Driver errors
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Communication error with the device
    Bus(E),
    /// Invalid `WHO_AM_I` register value (contains the actual value read)
    InvalidDevice(u8),
    /// The FIFO held no complete packet after the capture window
    NoSamples,
    /// Invalid configuration parameter
    InvalidConfig,
    /// AK8963 did not answer with the expected `WIA` (contains the value read)
    MagnetometerNotFound(u8),
}

impl<E> From<E> for Error<E> {
    fn from(error: E) -> Self {
        Self::Bus(error)
    }
}
