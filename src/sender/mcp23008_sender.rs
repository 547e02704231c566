use embedded_hal::{delay::DelayNs, i2c::I2c};

use crate::{
    command::{RegisterSelection, State},
    error::Error,
    retry::RetryPolicy,
    sender::SendCommand,
    utils::BitOps,
};

// MCP23008 GP7 -> GP0
// BL/DB7/DB6/DB5/DB4/EN/RS/NC

/// Fixed part of the MCP23008 address, the A2..A0 straps are OR'ed into it
pub const MCP23008_BASE_ADDRESS: u8 = 0x20;

const REG_IODIR: u8 = 0x00;
const REG_GPIO: u8 = 0x09;
// register pointer, then IODIR..=GPIO
const RESET_WRITE_LEN: usize = 11;

const PIN_RS: u8 = 1;
const PIN_EN: u8 = 2;
const PIN_BACKLIGHT: u8 = 7;

/// Drive the LCD through an MCP23008 8-bit I/O expander ("I2C backpack")
pub struct Mcp23008Sender<'a, I2cLcd: I2c> {
    i2c: &'a mut I2cLcd,
    addr: u8,
    retry: RetryPolicy,
}

impl<'a, I2cLcd: I2c> Mcp23008Sender<'a, I2cLcd> {
    /// `addr` is the 3 bit strap address (A2..A0), higher bits are ignored
    pub fn new(i2c: &'a mut I2cLcd, addr: u8) -> Self {
        Self {
            i2c,
            addr: MCP23008_BASE_ADDRESS | (addr & 0b111),
            retry: RetryPolicy::default(),
        }
    }

    #[allow(missing_docs)]
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry = policy;
        self
    }

    /// Full 7 bit bus address
    pub fn get_address(&self) -> u8 {
        self.addr
    }

    fn write_retrying(
        &mut self,
        bytes: &[u8],
        delayer: &mut impl DelayNs,
    ) -> Result<(), Error<I2cLcd::Error>> {
        let addr = self.addr;
        let i2c = &mut *self.i2c;
        self.retry
            .run(delayer, || i2c.write(addr, bytes))
            .map_err(Error::Bus)
    }
}

impl<'a, I2cLcd: I2c> SendCommand for Mcp23008Sender<'a, I2cLcd> {
    type Error = Error<I2cLcd::Error>;

    fn configure_outputs(&mut self, delayer: &mut impl DelayNs) -> Result<(), Self::Error> {
        // the expander may hold junk from an earlier run, so first rewrite the whole register file:
        // all lines input, every other register back to 0
        let mut reset = [0u8; RESET_WRITE_LEN];
        reset[0] = REG_IODIR;
        reset[1] = 0xFF;
        self.write_retrying(&reset, delayer)?;

        // then every line output, it is soldered to the LCD
        self.write_retrying(&[REG_IODIR, 0x00], delayer)
    }

    fn burst_bits(&mut self, bits: u8, delayer: &mut impl DelayNs) -> Result<(), Self::Error> {
        self.write_retrying(&[REG_GPIO, bits], delayer)
    }

    fn send(
        &mut self,
        value: u8,
        rs: RegisterSelection,
        backlight: State,
        delayer: &mut impl DelayNs,
    ) -> Result<(), Self::Error> {
        let [high, low] = ExpanderSeq::from_byte(value, rs, backlight).0;

        for nibble in [high, low] {
            let mut enabled = nibble;
            enabled.set_bit(PIN_EN);
            let mut disabled = nibble;
            disabled.clear_bit(PIN_EN);

            // data is latched on the falling edge of EN, an I2C transaction is far longer
            // than the setup time, so no extra delay
            self.burst_bits(enabled, delayer)?;
            self.burst_bits(disabled, delayer)?;
        }

        Ok(())
    }

    fn set_retry_policy(&mut self, policy: RetryPolicy) {
        self.retry = policy;
    }
}

/// The two GPIO images (EN low) carrying one byte
#[derive(Debug, PartialEq)]
struct ExpanderSeq([u8; 2]);

impl ExpanderSeq {
    fn from_byte(value: u8, rs: RegisterSelection, backlight: State) -> Self {
        let mut ctrl = 0u8;

        if rs == RegisterSelection::Data {
            ctrl.set_bit(PIN_RS);
        }

        if backlight == State::On {
            ctrl.set_bit(PIN_BACKLIGHT);
        }

        // DB7..DB4 sit on GP6..GP3
        let high = ((value & 0b1111_0000) >> 1) | ctrl;
        let low = ((value & 0b0000_1111) << 3) | ctrl;

        ExpanderSeq([high, low])
    }
}
