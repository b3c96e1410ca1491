//! Bus transport for the MPU-9250
//!
//! The driver talks to two devices on one bus (the MPU-9250 and, through
//! I2C bypass, the AK8963), so the transport is addressed per call by
//! `(device address, register address)`.
//!
//! [`DeviceInterface`] binds a transport to one device address and plugs it
//! into the `device-driver` register blocks in [`crate::registers`].

use device_driver::RegisterInterface;

/// Register access on a shared serial bus
///
/// Every call blocks until the bus transaction has completed. Errors are
/// surfaced immediately and are never retried by the driver.
pub trait RegisterTransport {
    /// Bus error type
    type Error;

    /// Write one byte to `register` on `device`
    ///
    /// # Errors
    ///
    /// Returns the bus error if the transaction fails.
    fn write_register(&mut self, device: u8, register: u8, value: u8) -> Result<(), Self::Error>;

    /// Read `buffer.len()` sequential bytes starting at `register` on `device`
    ///
    /// # Errors
    ///
    /// Returns the bus error if the transaction fails.
    fn read_registers(
        &mut self,
        device: u8,
        register: u8,
        buffer: &mut [u8],
    ) -> Result<(), Self::Error>;

    /// Read one byte from `register` on `device`
    ///
    /// # Errors
    ///
    /// Returns the bus error if the transaction fails.
    fn read_register(&mut self, device: u8, register: u8) -> Result<u8, Self::Error> {
        let mut buffer = [0u8; 1];
        self.read_registers(device, register, &mut buffer)?;
        Ok(buffer[0])
    }
}

impl<T: RegisterTransport + ?Sized> RegisterTransport for &mut T {
    type Error = T::Error;

    fn write_register(&mut self, device: u8, register: u8, value: u8) -> Result<(), Self::Error> {
        (**self).write_register(device, register, value)
    }

    fn read_registers(
        &mut self,
        device: u8,
        register: u8,
        buffer: &mut [u8],
    ) -> Result<(), Self::Error> {
        (**self).read_registers(device, register, buffer)
    }

    fn read_register(&mut self, device: u8, register: u8) -> Result<u8, Self::Error> {
        (**self).read_register(device, register)
    }
}

/// I2C transport over an `embedded-hal` bus
pub struct I2cTransport<I2C> {
    i2c: I2C,
}

impl<I2C> I2cTransport<I2C> {
    /// Wrap an I2C peripheral
    ///
    /// # Example
    /// ```ignore
    /// let transport = I2cTransport::new(i2c);
    /// let mut imu = Mpu9250::new(transport, I2C_ADDRESS_AD0_LOW, SensorConfig::default())?;
    /// ```
    pub const fn new(i2c: I2C) -> Self {
        Self { i2c }
    }

    /// Consume the transport and return the I2C peripheral
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C, E> RegisterTransport for I2cTransport<I2C>
where
    I2C: embedded_hal::i2c::I2c<Error = E>,
{
    type Error = E;

    fn write_register(&mut self, device: u8, register: u8, value: u8) -> Result<(), Self::Error> {
        self.i2c.write(device, &[register, value])
    }

    fn read_registers(
        &mut self,
        device: u8,
        register: u8,
        buffer: &mut [u8],
    ) -> Result<(), Self::Error> {
        // Repeated start keeps the register pointer for the read phase
        self.i2c.write_read(device, &[register], buffer)
    }
}

/// A transport bound to a single device address
pub struct DeviceInterface<'a, T> {
    transport: &'a mut T,
    device: u8,
}

impl<'a, T> DeviceInterface<'a, T>
where
    T: RegisterTransport,
{
    /// Bind `transport` to `device`
    pub fn new(transport: &'a mut T, device: u8) -> Self {
        Self { transport, device }
    }

    /// Address of the bound device
    #[must_use]
    pub const fn device(&self) -> u8 {
        self.device
    }

    /// Write one raw byte
    ///
    /// # Errors
    ///
    /// Returns the bus error if the transaction fails.
    pub fn write_byte(&mut self, register: u8, value: u8) -> Result<(), T::Error> {
        self.transport.write_register(self.device, register, value)
    }

    /// Write a high/low register pair, high byte first
    ///
    /// # Errors
    ///
    /// Returns the bus error if either write fails.
    pub fn write_pair(&mut self, register: u8, bytes: [u8; 2]) -> Result<(), T::Error> {
        self.write_byte(register, bytes[0])?;
        self.write_byte(register.wrapping_add(1), bytes[1])
    }

    /// Read one raw byte
    ///
    /// # Errors
    ///
    /// Returns the bus error if the transaction fails.
    pub fn read_byte(&mut self, register: u8) -> Result<u8, T::Error> {
        self.transport.read_register(self.device, register)
    }

    /// Read a run of bytes starting at `register`
    ///
    /// # Errors
    ///
    /// Returns the bus error if the transaction fails.
    pub fn read_run(&mut self, register: u8, buffer: &mut [u8]) -> Result<(), T::Error> {
        self.transport.read_registers(self.device, register, buffer)
    }
}

impl<T> RegisterInterface for DeviceInterface<'_, T>
where
    T: RegisterTransport,
{
    type Error = T::Error;
    type AddressType = u8;

    fn read_register(
        &mut self,
        address: Self::AddressType,
        size_bits: u32,
        read_data: &mut [u8],
    ) -> Result<(), Self::Error> {
        let _ = size_bits; // Size is implicit in read_data.len()
        self.read_run(address, read_data)
    }

    fn write_register(
        &mut self,
        address: Self::AddressType,
        size_bits: u32,
        write_data: &[u8],
    ) -> Result<(), Self::Error> {
        let _ = size_bits; // Size is implicit in write_data.len()
        let mut register = address;
        for &byte in write_data {
            self.write_byte(register, byte)?;
            register = register.wrapping_add(1);
        }
        Ok(())
    }
}
