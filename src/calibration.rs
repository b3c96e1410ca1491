//! FIFO-based gyro and accelerometer bias calibration
//!
//! The device captures accel and gyro samples into its FIFO at 1 kHz for a
//! fixed window. The drained packets are averaged, converted into the
//! offset register formats and written back, so later readings come out
//! bias-corrected from the chip itself.
//!
//! The sensor must be at rest with one axis aligned with gravity.

use embedded_hal::delay::DelayNs;

use crate::Error;
use crate::frame::FrameLayout;
use crate::interface::{DeviceInterface, RegisterTransport};
use crate::registers::mpu::Mpu9250Registers;
use crate::registers::{DataRegister, FIFO_COUNT_HIGH_MASK};
use crate::sensors::{AccelScale, Axis, GyroScale};

/// Bytes per FIFO packet: accel X/Y/Z then gyro X/Y/Z, 16 bits each
pub const FIFO_PACKET_LEN: usize = 12;

/// FIFO capacity in bytes
pub const FIFO_CAPACITY: usize = 512;

/// Longest capture window that cannot overrun the FIFO at 1 kHz
pub const MAX_ACCUMULATION_MS: u32 = (FIFO_CAPACITY / FIFO_PACKET_LEN) as u32;

/// Gyro offset registers count in steps of 4 LSB at ±250 dps
const GYRO_OFFSET_DIVISOR: i32 = 4;

/// Accel offset registers count in steps of 8 LSB at ±2 g
const ACCEL_OFFSET_DIVISOR: i32 = 8;

/// Temperature-compensation flag in the low byte of each accel offset pair
const ACCEL_OFFSET_TEMP_COMP: u8 = 0x01;

/// How running sums are reduced to a mean
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Averaging {
    /// Integer division, truncating toward zero
    #[default]
    Truncate,
    /// Round to the nearest count, halves away from zero
    RoundNearest,
}

impl Averaging {
    /// Reduce `sum` over `count` samples
    ///
    /// `count` must be non-zero.
    #[must_use]
    pub const fn mean(self, sum: i32, count: i32) -> i32 {
        match self {
            Self::Truncate => sum / count,
            Self::RoundNearest => {
                let half = count / 2;
                if sum >= 0 {
                    (sum + half) / count
                } else {
                    (sum - half) / count
                }
            }
        }
    }
}

/// Bias calibration settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalibrationConfig {
    /// FIFO capture window in milliseconds
    ///
    /// At 1 kHz each millisecond adds one packet. The 512-byte FIFO holds
    /// 42 packets, so windows above [`MAX_ACCUMULATION_MS`] are rejected.
    pub accumulation_ms: u32,
    /// Axis aligned with gravity during calibration
    pub gravity_axis: Axis,
    /// Reduction of the packet sums
    pub averaging: Averaging,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            accumulation_ms: 40,
            gravity_axis: Axis::Z,
            averaging: Averaging::Truncate,
        }
    }
}

/// Three-axis bias in physical units
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BiasVector {
    /// X-axis bias
    pub x: f32,
    /// Y-axis bias
    pub y: f32,
    /// Z-axis bias
    pub z: f32,
}

impl BiasVector {
    fn from_counts(counts: [i32; 3], sensitivity: f32) -> Self {
        #[allow(clippy::cast_precision_loss)]
        let scale = |c: i32| c as f32 / sensitivity;
        Self {
            x: scale(counts[0]),
            y: scale(counts[1]),
            z: scale(counts[2]),
        }
    }

    /// Axes as an array, X first
    #[must_use]
    pub const fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }
}

/// Outcome of a bias calibration run
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BiasCalibration {
    /// Gyro bias in °/s
    pub gyro: BiasVector,
    /// Accelerometer bias in g, gravity removed
    pub accel: BiasVector,
    /// Number of FIFO packets averaged
    pub packets: u16,
}

/// Running sums over drained FIFO packets
#[derive(Debug, Clone, Copy, Default)]
pub struct BiasAccumulator {
    accel: [i32; 3],
    gyro: [i32; 3],
    packets: u16,
}

impl BiasAccumulator {
    /// Empty accumulator
    #[must_use]
    pub const fn new() -> Self {
        Self {
            accel: [0; 3],
            gyro: [0; 3],
            packets: 0,
        }
    }

    /// Add one decoded packet: accel X/Y/Z then gyro X/Y/Z
    pub fn push(&mut self, words: [i16; 6]) {
        for axis in 0..3 {
            self.accel[axis] += i32::from(words[axis]);
            self.gyro[axis] += i32::from(words[axis + 3]);
        }
        self.packets += 1;
    }

    /// Packets accumulated so far
    #[must_use]
    pub const fn packets(&self) -> u16 {
        self.packets
    }

    /// Mean accel and gyro counts, or `None` when nothing was accumulated
    #[must_use]
    pub fn mean(&self, averaging: Averaging) -> Option<([i32; 3], [i32; 3])> {
        if self.packets == 0 {
            return None;
        }
        let count = i32::from(self.packets);
        Some((
            self.accel.map(|sum| averaging.mean(sum, count)),
            self.gyro.map(|sum| averaging.mean(sum, count)),
        ))
    }
}

/// Remove 1 g from the mean of the axis carrying gravity
///
/// A positive mean is pulled down by `one_g`, anything else is pushed up.
#[must_use]
pub const fn remove_gravity(mean: i32, one_g: i32) -> i32 {
    if mean > 0 { mean - one_g } else { mean + one_g }
}

/// Gyro offset register pair for a mean bias in ±250 dps counts
///
/// The correction is the negated mean in 4-LSB steps, high byte first.
#[must_use]
pub const fn encode_gyro_offset(mean: i32) -> [u8; 2] {
    let value = -mean / GYRO_OFFSET_DIVISOR;
    [(value >> 8) as u8, value as u8]
}

/// Merge a mean accel bias in ±2 g counts into a factory offset pair
///
/// The bias is removed in 8-LSB steps from the factory value. Bit 0 of the
/// low byte is carried over from the factory pair unchanged.
#[must_use]
pub const fn merge_accel_offset(factory: [u8; 2], mean: i32) -> [u8; 2] {
    let flag = factory[1] & ACCEL_OFFSET_TEMP_COMP;
    let value = i16::from_be_bytes(factory) as i32 - mean / ACCEL_OFFSET_DIVISOR;
    let low = ((value as u8) & !ACCEL_OFFSET_TEMP_COMP) | flag;
    [(value >> 8) as u8, low]
}

/// Drives a FIFO bias calibration against an MPU-9250
#[derive(Debug, Clone, Copy, Default)]
pub struct FifoBiasCalibrator {
    config: CalibrationConfig,
}

impl FifoBiasCalibrator {
    /// Create a calibrator with the given settings
    #[must_use]
    pub const fn new(config: CalibrationConfig) -> Self {
        Self { config }
    }

    /// Active settings
    #[must_use]
    pub const fn config(&self) -> &CalibrationConfig {
        &self.config
    }

    fn validate<E>(&self) -> Result<(), Error<E>> {
        // A longer window wraps the FIFO and misaligns the drained packets
        if self.config.accumulation_ms > MAX_ACCUMULATION_MS {
            return Err(Error::InvalidConfig);
        }
        Ok(())
    }

    /// Run the calibration on the MPU-9250 at `address`
    ///
    /// The device is reset and left at ±2 g / ±250 dps with the FIFO
    /// stopped. Call `Mpu9250::init` afterwards to restore the application
    /// configuration. Offset registers are only written once every read
    /// has succeeded.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] before touching the bus if the
    /// capture window exceeds [`MAX_ACCUMULATION_MS`],
    /// [`Error::NoSamples`] if the FIFO holds no complete packet, or the bus
    /// error of the first failing transaction.
    pub fn run<T, D>(
        &self,
        transport: &mut T,
        address: u8,
        delay: &mut D,
    ) -> Result<BiasCalibration, Error<T::Error>>
    where
        T: RegisterTransport,
        D: DelayNs,
    {
        self.validate()?;
        let mut regs = Mpu9250Registers::new(DeviceInterface::new(transport, address));

        // Reset and select the PLL clock
        regs.pwr_mgmt_1().write(|w| w.set_h_reset(true))?;
        delay.delay_ms(100);
        regs.pwr_mgmt_1().write(|w| w.set_clksel(1))?;
        regs.pwr_mgmt_2().write(|_| {})?;
        delay.delay_ms(200);

        // Quiesce interrupts, FIFO and the auxiliary master
        regs.int_enable().write(|_| {})?;
        regs.fifo_en().write(|_| {})?;
        regs.pwr_mgmt_1().write(|_| {})?;
        regs.i_2_c_mst_ctrl().write(|_| {})?;
        regs.user_ctrl().write(|_| {})?;
        regs.user_ctrl().write(|w| {
            w.set_fifo_rst(true);
            w.set_dmp_rst(true);
        })?;
        delay.delay_ms(15);

        // 188 Hz DLPF, 1 kHz, most sensitive ranges
        regs.config().write(|w| w.set_dlpf_cfg(1))?;
        regs.smplrt_div().write(|w| w.set_smplrt_div(0))?;
        regs.gyro_config().write(|_| {})?;
        regs.accel_config().write(|_| {})?;

        // Capture accel and gyro into the FIFO
        regs.user_ctrl().write(|w| w.set_fifo_en(true))?;
        regs.fifo_en().write(|w| {
            w.set_accel(true);
            w.set_gyro_xout(true);
            w.set_gyro_yout(true);
            w.set_gyro_zout(true);
        })?;
        delay.delay_ms(self.config.accumulation_ms);
        regs.fifo_en().write(|_| {})?;

        let interface = &mut regs.interface;

        let mut count = [0u8; 2];
        interface.read_run(DataRegister::FifoCountH.addr(), &mut count)?;
        let fifo_bytes = u16::from_be_bytes([count[0] & FIFO_COUNT_HIGH_MASK, count[1]]);
        let packets = fifo_bytes / FIFO_PACKET_LEN as u16;

        #[cfg(feature = "defmt")]
        defmt::debug!("FIFO holds {} bytes, {} packets", fifo_bytes, packets);

        if packets == 0 {
            #[cfg(feature = "defmt")]
            defmt::warn!("Bias calibration captured no FIFO packets");
            return Err(Error::NoSamples);
        }

        let mut accumulator = BiasAccumulator::new();
        let mut packet = [0u8; FIFO_PACKET_LEN];
        for _ in 0..packets {
            interface.read_run(DataRegister::FifoRw.addr(), &mut packet)?;
            if let Some(words) = FrameLayout::BIG_ENDIAN.decode::<6>(&packet) {
                accumulator.push(words);
            }
        }

        let (mut accel_mean, gyro_mean) = accumulator
            .mean(self.config.averaging)
            .ok_or(Error::NoSamples)?;

        #[allow(clippy::cast_possible_truncation)]
        let one_g = AccelScale::G2.sensitivity() as i32;
        let gravity = self.config.gravity_axis.index();
        accel_mean[gravity] = remove_gravity(accel_mean[gravity], one_g);

        let mut factory = [[0u8; 2]; 3];
        for (pair, register) in factory.iter_mut().zip(DataRegister::ACCEL_OFFSETS) {
            interface.read_run(register.addr(), pair)?;
        }

        for (mean, register) in gyro_mean.iter().zip(DataRegister::GYRO_OFFSETS) {
            interface.write_pair(register.addr(), encode_gyro_offset(*mean))?;
        }

        for ((mean, pair), register) in accel_mean
            .iter()
            .zip(factory)
            .zip(DataRegister::ACCEL_OFFSETS)
        {
            interface.write_pair(register.addr(), merge_accel_offset(pair, *mean))?;
        }

        #[cfg(feature = "defmt")]
        defmt::debug!("Bias counts: gyro {} accel {}", gyro_mean, accel_mean);

        Ok(BiasCalibration {
            gyro: BiasVector::from_counts(gyro_mean, GyroScale::Dps250.sensitivity()),
            accel: BiasVector::from_counts(accel_mean, AccelScale::G2.sensitivity()),
            packets: accumulator.packets(),
        })
    }
}
