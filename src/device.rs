//! High-level driver API for the MPU-9250
//!
//! [`Mpu9250`] owns the bus transport and the live measurement
//! configuration. It brings up the accel/gyro die and the AK8963, reads
//! samples in raw counts or physical units, and runs the bias calibration
//! and self-test procedures on the same bus.

use embedded_hal::delay::DelayNs;

use crate::calibration::{BiasCalibration, FifoBiasCalibrator};
use crate::frame::{FrameLayout, RawSample3};
use crate::interface::{DeviceInterface, RegisterTransport};
use crate::registers::ak8963::Ak8963Registers;
use crate::registers::mpu::Mpu9250Registers;
use crate::registers::{DataRegister, MagDataRegister};
use crate::self_test::{SelfTestEvaluator, SelfTestReport};
use crate::sensors::magnetometer::{AK8963_I2C_ADDRESS, AK8963_WIA_VALUE, sensitivity_adjustment};
use crate::sensors::{AccelDataG, GyroDataDps, MagDataMg, MagMode, SensorConfig};
use crate::{Error, WHO_AM_I_MPU9250, WHO_AM_I_MPU9255};

/// Temperature sensitivity in LSB/°C
const TEMP_SENSITIVITY: f32 = 333.87;

/// Temperature reading at 0 LSB, in °C
const TEMP_OFFSET_C: f32 = 21.0;

/// Main driver for the MPU-9250
pub struct Mpu9250<T> {
    transport: T,
    address: u8,
    config: SensorConfig,
    mag_adjustment: [f32; 3],
    last_mag: RawSample3,
}

impl<T> Mpu9250<T>
where
    T: RegisterTransport,
{
    /// Create a new driver for the MPU-9250 at `address`
    ///
    /// This verifies `WHO_AM_I` but does not configure the device. Call
    /// [`Mpu9250::init`] after construction.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Communication with the device fails
    /// - `WHO_AM_I` is neither the MPU-9250 nor the MPU-9255 value
    pub fn new(transport: T, address: u8, config: SensorConfig) -> Result<Self, Error<T::Error>> {
        let mut driver = Self {
            transport,
            address,
            config,
            mag_adjustment: [1.0; 3],
            last_mag: RawSample3::default(),
        };

        let who_am_i = driver.read_who_am_i()?;
        if who_am_i != WHO_AM_I_MPU9250 && who_am_i != WHO_AM_I_MPU9255 {
            #[cfg(feature = "defmt")]
            defmt::warn!("Unexpected WHO_AM_I: {=u8:#x}", who_am_i);
            return Err(Error::InvalidDevice(who_am_i));
        }

        Ok(driver)
    }

    fn registers(&mut self) -> Mpu9250Registers<DeviceInterface<'_, T>> {
        Mpu9250Registers::new(DeviceInterface::new(&mut self.transport, self.address))
    }

    fn magnetometer(&mut self) -> Ak8963Registers<DeviceInterface<'_, T>> {
        Ak8963Registers::new(DeviceInterface::new(
            &mut self.transport,
            AK8963_I2C_ADDRESS,
        ))
    }

    /// Read the `WHO_AM_I` register
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_who_am_i(&mut self) -> Result<u8, Error<T::Error>> {
        let reg = self.registers().who_am_i().read()?;
        Ok(reg.who_am_i())
    }

    /// Wake the device and apply the [`SensorConfig`]
    ///
    /// Enables I2C bypass so the AK8963 answers on the host bus, and the
    /// data-ready interrupt.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let mut imu = Mpu9250::new(transport, I2C_ADDRESS_AD0_LOW, SensorConfig::default())?;
    /// imu.init(&mut delay)?;
    /// ```
    pub fn init<D>(&mut self, delay: &mut D) -> Result<(), Error<T::Error>>
    where
        D: DelayNs,
    {
        let config = self.config;
        let mut regs = self.registers();

        // Clear sleep, then select the PLL clock once it has settled
        regs.pwr_mgmt_1().write(|_| {})?;
        delay.delay_ms(100);
        regs.pwr_mgmt_1().write(|w| w.set_clksel(1))?;
        delay.delay_ms(200);

        regs.config()
            .write(|w| w.set_dlpf_cfg(config.gyro_dlpf as u8))?;
        regs.smplrt_div()
            .write(|w| w.set_smplrt_div(config.sample_rate_divider))?;

        regs.gyro_config().modify(|w| {
            w.set_fchoice_b(0);
            w.set_gyro_fs_sel(config.gyro_scale.fs_sel());
        })?;
        regs.accel_config().modify(|w| {
            w.set_accel_fs_sel(config.accel_scale.fs_sel());
        })?;
        regs.accel_config_2().modify(|w| {
            w.set_accel_fchoice_b(false);
            w.set_a_dlpf_cfg(config.accel_dlpf as u8);
        })?;

        // Push-pull active high, latched, bypass to the AK8963
        regs.int_pin_cfg().write(|w| {
            w.set_latch_int_en(true);
            w.set_bypass_en(true);
        })?;
        regs.int_enable().write(|w| w.set_raw_rdy_en(true))?;
        delay.delay_ms(100);

        #[cfg(feature = "defmt")]
        defmt::debug!("MPU-9250 configured: {}", config);

        Ok(())
    }

    /// Bring up the AK8963 magnetometer
    ///
    /// Reads the fuse-ROM sensitivity adjustments, then starts measuring
    /// with the configured resolution and mode. Requires I2C bypass, which
    /// [`Mpu9250::init`] enables.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MagnetometerNotFound`] if `WIA` does not match, or
    /// the bus error if communication fails.
    pub fn init_magnetometer<D>(&mut self, delay: &mut D) -> Result<(), Error<T::Error>>
    where
        D: DelayNs,
    {
        let scale = self.config.mag_scale;
        let mode = self.config.mag_mode;
        let mut mag = self.magnetometer();

        let wia = mag.wia().read()?.wia();
        if wia != AK8963_WIA_VALUE {
            return Err(Error::MagnetometerNotFound(wia));
        }

        mag.cntl_1()
            .write(|w| w.set_mode(MagMode::PowerDown as u8))?;
        delay.delay_ms(10);
        mag.cntl_1().write(|w| w.set_mode(MagMode::FuseRom as u8))?;
        delay.delay_ms(10);

        let mut asa = [0u8; 3];
        mag.interface
            .read_run(MagDataRegister::Asax.addr(), &mut asa)?;

        mag.cntl_1()
            .write(|w| w.set_mode(MagMode::PowerDown as u8))?;
        delay.delay_ms(10);
        mag.cntl_1().write(|w| {
            w.set_output_bit(scale.output_bit());
            w.set_mode(mode as u8);
        })?;
        delay.delay_ms(10);

        self.mag_adjustment = asa.map(sensitivity_adjustment);

        #[cfg(feature = "defmt")]
        defmt::debug!("AK8963 ASA {} -> adjustment {}", asa, self.mag_adjustment);

        Ok(())
    }

    fn read_sample(&mut self, register: DataRegister) -> Result<RawSample3, Error<T::Error>> {
        let mut buffer = [0u8; 6];
        self.registers()
            .interface
            .read_run(register.addr(), &mut buffer)?;
        Ok(FrameLayout::BIG_ENDIAN
            .decode::<3>(&buffer)
            .map(RawSample3::from)
            .unwrap_or_default())
    }

    /// Read accelerometer counts
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_accel_raw(&mut self) -> Result<RawSample3, Error<T::Error>> {
        self.read_sample(DataRegister::AccelXoutH)
    }

    /// Read gyroscope counts
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_gyro_raw(&mut self) -> Result<RawSample3, Error<T::Error>> {
        self.read_sample(DataRegister::GyroXoutH)
    }

    /// Read the raw temperature word
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_temperature_raw(&mut self) -> Result<i16, Error<T::Error>> {
        let mut buffer = [0u8; 2];
        self.registers()
            .interface
            .read_run(DataRegister::TempOutH.addr(), &mut buffer)?;
        let [raw] = FrameLayout::BIG_ENDIAN
            .decode::<1>(&buffer)
            .unwrap_or_default();
        Ok(raw)
    }

    /// Read acceleration in g at the configured range
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_accel(&mut self) -> Result<AccelDataG, Error<T::Error>> {
        let raw = self.read_accel_raw()?;
        Ok(AccelDataG::from_raw(
            raw,
            self.config.accel_scale.resolution(),
        ))
    }

    /// Read angular rate in °/s at the configured range
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_gyro(&mut self) -> Result<GyroDataDps, Error<T::Error>> {
        let raw = self.read_gyro_raw()?;
        Ok(GyroDataDps::from_raw(
            raw,
            self.config.gyro_scale.resolution(),
        ))
    }

    /// Read die temperature in °C
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_temperature_celsius(&mut self) -> Result<f32, Error<T::Error>> {
        let raw = self.read_temperature_raw()?;
        Ok(f32::from(raw) / TEMP_SENSITIVITY + TEMP_OFFSET_C)
    }

    /// Read magnetometer counts
    ///
    /// Returns `Ok(None)` if no new measurement is ready, in which case no
    /// data registers are read, or if the sample overflowed.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the AK8963 fails.
    pub fn read_magnetometer_raw(&mut self) -> Result<Option<RawSample3>, Error<T::Error>> {
        let mut mag = self.magnetometer();
        if !mag.status_1().read()?.drdy() {
            return Ok(None);
        }

        // Six data bytes plus ST2, which also releases the data registers
        let mut buffer = [0u8; 7];
        mag.interface
            .read_run(MagDataRegister::Hxl.addr(), &mut buffer)?;

        let sample = FrameLayout::MAGNETOMETER
            .decode::<3>(&buffer)
            .map(RawSample3::from);

        #[cfg(feature = "defmt")]
        if sample.is_none() {
            defmt::debug!("AK8963 overflow, sample dropped");
        }

        Ok(sample)
    }

    /// Read the magnetic field in mG
    ///
    /// Applies the fuse-ROM adjustment and subtracts the configured
    /// hard-iron bias. When no new sample is available the last good one
    /// is converted again.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the AK8963 fails.
    pub fn read_magnetometer(&mut self) -> Result<MagDataMg, Error<T::Error>> {
        if let Some(raw) = self.read_magnetometer_raw()? {
            self.last_mag = raw;
        }

        Ok(MagDataMg::from_raw(
            self.last_mag,
            self.config.mag_scale.resolution(),
            self.mag_adjustment,
            self.config.mag_hard_iron_bias,
        ))
    }

    /// Run a FIFO bias calibration and load the offset registers
    ///
    /// Leaves the device in the calibration configuration; call
    /// [`Mpu9250::init`] afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoSamples`] if nothing was captured, or the bus
    /// error if communication fails.
    pub fn calibrate_bias<D>(
        &mut self,
        calibrator: &FifoBiasCalibrator,
        delay: &mut D,
    ) -> Result<BiasCalibration, Error<T::Error>>
    where
        D: DelayNs,
    {
        calibrator.run(&mut self.transport, self.address, delay)
    }

    /// Run the accel/gyro self-test
    ///
    /// Leaves the device in the self-test configuration; call
    /// [`Mpu9250::init`] afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] for unusable settings, or the bus
    /// error if communication fails.
    pub fn self_test<D>(
        &mut self,
        evaluator: &SelfTestEvaluator,
        delay: &mut D,
    ) -> Result<SelfTestReport, Error<T::Error>>
    where
        D: DelayNs,
    {
        evaluator.run(&mut self.transport, self.address, delay)
    }

    /// Get the current measurement configuration
    #[must_use]
    pub const fn config(&self) -> &SensorConfig {
        &self.config
    }

    /// Replace the measurement configuration
    ///
    /// Scales take effect for conversions immediately; call
    /// [`Mpu9250::init`] and [`Mpu9250::init_magnetometer`] to push the
    /// rest to the device.
    pub fn set_config(&mut self, config: SensorConfig) {
        self.config = config;
    }

    /// Magnetometer sensitivity adjustment per axis
    ///
    /// `[1.0; 3]` until [`Mpu9250::init_magnetometer`] has run.
    #[must_use]
    pub const fn mag_adjustment(&self) -> [f32; 3] {
        self.mag_adjustment
    }

    /// Bus address of the accel/gyro die
    #[must_use]
    pub const fn address(&self) -> u8 {
        self.address
    }

    /// Consume the driver and return the transport
    pub fn release(self) -> T {
        self.transport
    }
}
