/*!
# Hobbybotics drivers

Two small `no_std` drivers built on `embedded-hal` 1.0:

* [`ad595::Ad595`], an AD595 type K thermocouple amplifier read through any
  [`ad595::AnalogInput`]
* [`lcd::Lcd`], an HD44780 character LCD in 4 bit mode behind an MCP23008 I2C backpack
  ([`sender::Mcp23008Sender`])

Basic Usage for the LCD:

1. Create a "sender" <br/>
    [`sender::Mcp23008Sender::new`] takes the I2C bus and the A2..A0 strap address.
    Any type implementing [`sender::SendCommand`] can be used instead.
<br/>
<br/>
2. Use [`lcd::Lcd::init()`] with a [`lcd::Config`] to create a [`lcd::Lcd`] and run the power-on sequence
<br/>
<br/>
3. use any methods provide by [`lcd::Lcd`] to control the display, or `write!` to it

Every bus transaction goes through a [`retry::RetryPolicy`]. The default retries forever,
like the Arduino libraries these boards shipped with; pick a bounded one to get
[`error::Error::Bus`] back instead of hanging on a missing device.
*/

#![no_std]
#![warn(missing_docs)]

pub mod ad595;
pub mod command;
pub mod error;
pub mod lcd;
pub mod retry;
pub mod sender;
mod state;
pub mod utils;
