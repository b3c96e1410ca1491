//! Register definitions for the MPU-9250 and its AK8963 magnetometer
//!
//! The MPU-9250 exposes two devices on the host bus once I2C bypass is
//! enabled: the accel/gyro die at `0x68`/`0x69` and the AK8963 at `0x0C`.
//! Each gets its own `device-driver` block below.
//!
//! Control registers are declared field by field. Sample data, offset and
//! self-test trim registers are consumed as raw byte runs and are listed in
//! [`DataRegister`] and [`MagDataRegister`] instead.

/// MPU-9250 accel/gyro register block
pub mod mpu {
    device_driver::create_device!(
        device_name: Mpu9250Registers,
        dsl: {
            config {
                type RegisterAddressType = u8;
                type DefaultByteOrder = BE;
            }

            /// SMPLRT_DIV - Sample Rate Divider (0x19)
            /// Sample rate = internal rate / (1 + divider)
            register SmplrtDiv {
                const ADDRESS = 0x19;
                const SIZE_BITS = 8;

                /// Divider applied to the internal sample rate
                smplrt_div: uint = 0..8,
            },

            /// CONFIG - Gyro/temperature DLPF and FSYNC (0x1A)
            register Config {
                const ADDRESS = 0x1A;
                const SIZE_BITS = 8;

                /// Gyro and temperature DLPF bandwidth
                dlpf_cfg: uint = 0..3,
                /// FSYNC pin sampling
                ext_sync_set: uint = 3..6,
                /// When set, a full FIFO stops accepting writes
                fifo_mode: bool = 6,
            },

            /// GYRO_CONFIG - Gyro full scale and self-test (0x1B)
            register GyroConfig {
                const ADDRESS = 0x1B;
                const SIZE_BITS = 8;

                /// Inverted Fchoice, bypasses the DLPF when non-zero
                fchoice_b: uint = 0..2,
                /// Full scale select (250/500/1000/2000 dps)
                gyro_fs_sel: uint = 3..5,
                /// Z-axis self-test enable
                zg_st: bool = 5,
                /// Y-axis self-test enable
                yg_st: bool = 6,
                /// X-axis self-test enable
                xg_st: bool = 7,
            },

            /// ACCEL_CONFIG - Accel full scale and self-test (0x1C)
            register AccelConfig {
                const ADDRESS = 0x1C;
                const SIZE_BITS = 8;

                /// Full scale select (2/4/8/16 g)
                accel_fs_sel: uint = 3..5,
                /// Z-axis self-test enable
                az_st: bool = 5,
                /// Y-axis self-test enable
                ay_st: bool = 6,
                /// X-axis self-test enable
                ax_st: bool = 7,
            },

            /// ACCEL_CONFIG2 - Accel DLPF (0x1D)
            register AccelConfig2 {
                const ADDRESS = 0x1D;
                const SIZE_BITS = 8;

                /// Accel DLPF bandwidth
                a_dlpf_cfg: uint = 0..3,
                /// Inverted accel Fchoice, bypasses the DLPF when set
                accel_fchoice_b: bool = 3,
            },

            /// FIFO_EN - FIFO capture selection (0x23)
            register FifoEn {
                const ADDRESS = 0x23;
                const SIZE_BITS = 8;

                /// External slave 0..2 capture
                slv_fifo: uint = 0..3,
                /// Accelerometer X/Y/Z capture
                accel: bool = 3,
                /// Gyro Z capture
                gyro_zout: bool = 4,
                /// Gyro Y capture
                gyro_yout: bool = 5,
                /// Gyro X capture
                gyro_xout: bool = 6,
                /// Temperature capture
                temp_out: bool = 7,
            },

            /// I2C_MST_CTRL - Auxiliary I2C master control (0x24)
            register I2cMstCtrl {
                const ADDRESS = 0x24;
                const SIZE_BITS = 8;

                /// Master clock divider
                mst_clk: uint = 0..4,
                /// Stop between reads of consecutive slaves
                mst_p_nsr: bool = 4,
                /// Slave 3 FIFO capture
                slv_three_fifo_en: bool = 5,
                /// Delay data ready until external data is loaded
                wait_for_es: bool = 6,
                /// Multi-master enable
                mult_mst_en: bool = 7,
            },

            /// INT_PIN_CFG - Interrupt pin and bypass configuration (0x37)
            register IntPinCfg {
                const ADDRESS = 0x37;
                const SIZE_BITS = 8;

                /// Host bus reaches the auxiliary bus (AK8963) directly
                bypass_en: bool = 1,
                /// FSYNC acts as an interrupt
                fsync_int_mode_en: bool = 2,
                /// FSYNC active low
                actl_fsync: bool = 3,
                /// Any register read clears interrupt status
                int_anyrd_clear: bool = 4,
                /// INT pin held until status is cleared
                latch_int_en: bool = 5,
                /// INT pin open drain
                open: bool = 6,
                /// INT pin active low
                actl: bool = 7,
            },

            /// INT_ENABLE - Interrupt enable (0x38)
            register IntEnable {
                const ADDRESS = 0x38;
                const SIZE_BITS = 8;

                /// Raw sensor data ready interrupt
                raw_rdy_en: bool = 0,
                /// FSYNC interrupt
                fsync_int_en: bool = 3,
                /// FIFO overflow interrupt
                fifo_overflow_en: bool = 4,
                /// Wake-on-motion interrupt
                wom_en: bool = 6,
            },

            /// USER_CTRL - User control (0x6A)
            register UserCtrl {
                const ADDRESS = 0x6A;
                const SIZE_BITS = 8;

                /// Reset all signal paths and sensor registers
                sig_cond_rst: bool = 0,
                /// Reset the auxiliary I2C master
                i2c_mst_rst: bool = 1,
                /// Reset the FIFO
                fifo_rst: bool = 2,
                /// Reset the DMP
                dmp_rst: bool = 3,
                /// Disable the I2C slave interface (SPI only)
                i2c_if_dis: bool = 4,
                /// Enable the auxiliary I2C master
                i2c_mst_en: bool = 5,
                /// Enable FIFO operation
                fifo_en: bool = 6,
            },

            /// PWR_MGMT_1 - Power management 1 (0x6B)
            register PwrMgmt1 {
                const ADDRESS = 0x6B;
                const SIZE_BITS = 8;

                /// Clock source (0 = internal 20 MHz, 1 = auto select PLL)
                clksel: uint = 0..3,
                /// Power down the PTAT voltage generator
                pd_ptat: bool = 3,
                /// Gyro drive and PLL on, sense paths off
                gyro_standby: bool = 4,
                /// Cycle between sleep and single samples
                cycle: bool = 5,
                /// Sleep mode
                sleep: bool = 6,
                /// Device reset, self-clearing
                h_reset: bool = 7,
            },

            /// PWR_MGMT_2 - Per-axis standby (0x6C)
            register PwrMgmt2 {
                const ADDRESS = 0x6C;
                const SIZE_BITS = 8;

                /// Gyro Z disabled
                disable_zg: bool = 0,
                /// Gyro Y disabled
                disable_yg: bool = 1,
                /// Gyro X disabled
                disable_xg: bool = 2,
                /// Accel Z disabled
                disable_za: bool = 3,
                /// Accel Y disabled
                disable_ya: bool = 4,
                /// Accel X disabled
                disable_xa: bool = 5,
            },

            /// WHO_AM_I - Device ID (0x75)
            /// 0x71 for MPU-9250, 0x73 for MPU-9255
            register WhoAmI {
                const ADDRESS = 0x75;
                const SIZE_BITS = 8;

                /// Device ID
                who_am_i: uint = 0..8,
            },
        }
    );
}

/// AK8963 magnetometer register block (host bus address `0x0C`)
pub mod ak8963 {
    device_driver::create_device!(
        device_name: Ak8963Registers,
        dsl: {
            config {
                type RegisterAddressType = u8;
                type DefaultByteOrder = LE;
            }

            /// WIA - Device ID (0x00), reads 0x48
            register Wia {
                const ADDRESS = 0x00;
                const SIZE_BITS = 8;

                /// Device ID
                wia: uint = 0..8,
            },

            /// ST1 - Status 1 (0x02)
            register Status1 {
                const ADDRESS = 0x02;
                const SIZE_BITS = 8;

                /// A new measurement is ready
                drdy: bool = 0,
                /// A measurement was skipped
                dor: bool = 1,
            },

            /// CNTL1 - Mode and output resolution (0x0A)
            register Cntl1 {
                const ADDRESS = 0x0A;
                const SIZE_BITS = 8;

                /// Operating mode
                mode: uint = 0..4,
                /// Output resolution (0 = 14 bit, 1 = 16 bit)
                output_bit: bool = 4,
            },
        }
    );
}

/// MPU-9250 registers that are read or written as raw byte runs
///
/// Multi-byte runs start at the listed register and auto-increment, except
/// [`DataRegister::FifoRw`], which pops one FIFO byte per read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum DataRegister {
    /// SELF_TEST_X_GYRO, followed by Y and Z
    SelfTestXGyro = 0x00,
    /// SELF_TEST_Y_GYRO
    SelfTestYGyro = 0x01,
    /// SELF_TEST_Z_GYRO
    SelfTestZGyro = 0x02,
    /// SELF_TEST_X_ACCEL, followed by Y and Z
    SelfTestXAccel = 0x0D,
    /// SELF_TEST_Y_ACCEL
    SelfTestYAccel = 0x0E,
    /// SELF_TEST_Z_ACCEL
    SelfTestZAccel = 0x0F,
    /// XG_OFFSET_H (high byte, low byte follows)
    XgOffsetH = 0x13,
    /// YG_OFFSET_H
    YgOffsetH = 0x15,
    /// ZG_OFFSET_H
    ZgOffsetH = 0x17,
    /// ACCEL_XOUT_H, start of the 6-byte accel run
    AccelXoutH = 0x3B,
    /// TEMP_OUT_H, start of the 2-byte temperature run
    TempOutH = 0x41,
    /// GYRO_XOUT_H, start of the 6-byte gyro run
    GyroXoutH = 0x43,
    /// FIFO_COUNTH, start of the 2-byte FIFO count
    FifoCountH = 0x72,
    /// FIFO_R_W
    FifoRw = 0x74,
    /// XA_OFFSET_H (high byte, low byte follows)
    XaOffsetH = 0x77,
    /// YA_OFFSET_H
    YaOffsetH = 0x7A,
    /// ZA_OFFSET_H
    ZaOffsetH = 0x7D,
}

impl DataRegister {
    /// Gyro offset pairs, X/Y/Z
    pub const GYRO_OFFSETS: [Self; 3] = [Self::XgOffsetH, Self::YgOffsetH, Self::ZgOffsetH];

    /// Accel offset pairs, X/Y/Z. The pairs are not contiguous.
    pub const ACCEL_OFFSETS: [Self; 3] = [Self::XaOffsetH, Self::YaOffsetH, Self::ZaOffsetH];

    /// Self-test trim codes in report order: accel X/Y/Z, then gyro X/Y/Z
    pub const SELF_TEST_TRIMS: [Self; 6] = [
        Self::SelfTestXAccel,
        Self::SelfTestYAccel,
        Self::SelfTestZAccel,
        Self::SelfTestXGyro,
        Self::SelfTestYGyro,
        Self::SelfTestZGyro,
    ];

    /// Register address
    #[must_use]
    pub const fn addr(self) -> u8 {
        self as u8
    }
}

/// AK8963 registers that are read as raw byte runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum MagDataRegister {
    /// HXL, start of the 6 data bytes plus ST2
    Hxl = 0x03,
    /// ASAX, start of the 3 fuse-ROM sensitivity adjustment bytes
    Asax = 0x10,
}

impl MagDataRegister {
    /// Register address
    #[must_use]
    pub const fn addr(self) -> u8 {
        self as u8
    }
}

/// FIFO_COUNTH carries only the top five bits of the 13-bit count
pub const FIFO_COUNT_HIGH_MASK: u8 = 0x1F;
