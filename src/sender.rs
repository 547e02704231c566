//! Built-in sender
//! If you want to drive the LCD through another chip, you will need to implement [`SendCommand`] trait

use embedded_hal::delay::DelayNs;

use crate::{
    command::{CommandSet, RegisterSelection, State},
    retry::RetryPolicy,
};

mod mcp23008_sender;

pub use mcp23008_sender::{Mcp23008Sender, MCP23008_BASE_ADDRESS};

/// [`SendCommand`] is the trait a sender should implement to communicate with the hardware
///
/// Every method takes the delayer so a sender can back off between retries.
pub trait SendCommand {
    /// Error of the underlying transport
    type Error;

    /// Put the transport into a known state and make every line an output
    fn configure_outputs(&mut self, delayer: &mut impl DelayNs) -> Result<(), Self::Error>;

    /// Write one raw image of the 8 LCD lines (data nibble, EN, RS, backlight)
    fn burst_bits(&mut self, bits: u8, delayer: &mut impl DelayNs) -> Result<(), Self::Error>;

    /// Send a full byte to the instruction or data register, as two strobed nibbles
    fn send(
        &mut self,
        value: u8,
        rs: RegisterSelection,
        backlight: State,
        delayer: &mut impl DelayNs,
    ) -> Result<(), Self::Error>;

    /// Send an instruction
    fn send_command(
        &mut self,
        command: CommandSet,
        backlight: State,
        delayer: &mut impl DelayNs,
    ) -> Result<(), Self::Error> {
        self.send(command.into(), RegisterSelection::Command, backlight, delayer)
    }

    /// Wait specific duration, and send command
    fn delay_and_send(
        &mut self,
        command: CommandSet,
        backlight: State,
        delayer: &mut impl DelayNs,
        delay_us: u32,
    ) -> Result<(), Self::Error> {
        delayer.delay_us(delay_us);
        self.send_command(command, backlight, delayer)
    }

    /// Replace the retry policy used for every following transaction
    fn set_retry_policy(&mut self, policy: RetryPolicy);
}
