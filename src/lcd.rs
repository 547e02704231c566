//! The HD44780 driver itself
//!
//! Every setter follows the same order: update the mirrored flags, then emit
//! the instruction built from those flags. The controller is never read back.

use core::fmt;

use embedded_hal::delay::DelayNs;

use crate::{
    command::{CommandSet, Font, MoveDirection, RegisterSelection, State},
    sender::SendCommand,
    state::LcdState,
};

mod init;

pub use init::Config;

/// DDRAM address of the first column of each row, for 16x4 and 20x4 panels alike
pub const ROW_OFFSETS: [u8; 4] = [0x00, 0x40, 0x14, 0x54];

/// Execution time of Clear Display and Return Home
pub(crate) const CLEAR_DELAY_US: u32 = 2_000;

/// A character LCD behind a [`SendCommand`] sender
pub struct Lcd<'a, 'b, Sender: SendCommand, Delayer: DelayNs> {
    sender: &'a mut Sender,
    delayer: &'b mut Delayer,
    state: LcdState,
    columns: u8,
}

impl<'a, 'b, Sender: SendCommand, Delayer: DelayNs> Lcd<'a, 'b, Sender, Delayer> {
    /// Wrap a sender without touching the hardware
    ///
    /// Call [`Lcd::begin`] before anything else, or use [`Lcd::init`] to do both.
    pub fn new(sender: &'a mut Sender, delayer: &'b mut Delayer) -> Self {
        Self {
            sender,
            delayer,
            state: LcdState::default(),
            columns: 0,
        }
    }

    fn command(&mut self, command: CommandSet) -> Result<(), Sender::Error> {
        self.sender
            .send_command(command, self.state.get_backlight(), self.delayer)
    }

    fn display_control(&mut self) -> Result<(), Sender::Error> {
        self.command(CommandSet::DisplayControl(self.state.get_display_control()))
    }

    fn entry_mode(&mut self) -> Result<(), Sender::Error> {
        self.command(CommandSet::EntryModeSet(self.state.get_display_mode()))
    }
}

impl<'a, 'b, Sender: SendCommand, Delayer: DelayNs> Lcd<'a, 'b, Sender, Delayer> {
    /// Blank the display and put the cursor at (0, 0)
    pub fn clear(&mut self) -> Result<(), Sender::Error> {
        self.command(CommandSet::ClearDisplay)?;
        self.delayer.delay_us(CLEAR_DELAY_US);
        Ok(())
    }

    /// Put the cursor at (0, 0) and undo any scrolling
    pub fn home(&mut self) -> Result<(), Sender::Error> {
        self.command(CommandSet::ReturnHome)?;
        self.delayer.delay_us(CLEAR_DELAY_US);
        Ok(())
    }

    /// Move the cursor to `(column, row)`
    ///
    /// A row past the last configured line lands on the last line.
    pub fn set_cursor_pos(&mut self, pos: (u8, u8)) -> Result<(), Sender::Error> {
        let (col, row) = pos;

        let last_row = self.state.get_line_count().clamp(1, ROW_OFFSETS.len() as u8) - 1;
        let row = row.min(last_row);

        self.state.set_current_line(row);
        let addr = col.wrapping_add(ROW_OFFSETS[row as usize]);
        self.command(CommandSet::SetDDRAM(addr))
    }

    #[allow(missing_docs)]
    pub fn set_display_state(&mut self, display: State) -> Result<(), Sender::Error> {
        self.state.set_display_state(display);
        self.display_control()
    }

    #[allow(missing_docs)]
    pub fn get_display_state(&self) -> State {
        self.state.get_display_state()
    }

    /// Underline cursor
    pub fn set_cursor_state(&mut self, cursor: State) -> Result<(), Sender::Error> {
        self.state.set_cursor_state(cursor);
        self.display_control()
    }

    #[allow(missing_docs)]
    pub fn get_cursor_state(&self) -> State {
        self.state.get_cursor_state()
    }

    /// Blinking block cursor
    pub fn set_cursor_blink_state(&mut self, blink: State) -> Result<(), Sender::Error> {
        self.state.set_cursor_blink(blink);
        self.display_control()
    }

    #[allow(missing_docs)]
    pub fn get_cursor_blink_state(&self) -> State {
        self.state.get_cursor_blink()
    }

    /// Shift the whole display window by one column, DDRAM is left untouched
    pub fn scroll_display(&mut self, dir: MoveDirection) -> Result<(), Sender::Error> {
        self.command(CommandSet::DisplayShift(dir))
    }

    #[allow(missing_docs)]
    pub fn scroll_display_left(&mut self) -> Result<(), Sender::Error> {
        self.scroll_display(MoveDirection::RightToLeft)
    }

    #[allow(missing_docs)]
    pub fn scroll_display_right(&mut self) -> Result<(), Sender::Error> {
        self.scroll_display(MoveDirection::LeftToRight)
    }

    /// Direction the cursor moves after each written character
    pub fn set_direction(&mut self, dir: MoveDirection) -> Result<(), Sender::Error> {
        self.state.set_direction(dir);
        self.entry_mode()
    }

    #[allow(missing_docs)]
    pub fn get_direction(&self) -> MoveDirection {
        self.state.get_direction()
    }

    /// When on, the display shifts on each write instead of the cursor ("right justified" text)
    pub fn set_autoscroll(&mut self, autoscroll: State) -> Result<(), Sender::Error> {
        self.state.set_autoscroll(autoscroll);
        self.entry_mode()
    }

    #[allow(missing_docs)]
    pub fn get_autoscroll(&self) -> State {
        self.state.get_autoscroll()
    }

    /// Switch the backlight
    ///
    /// The expander has no separate latch for it: the new level is written right away, and
    /// every following write carries it along.
    pub fn set_backlight(&mut self, backlight: State) -> Result<(), Sender::Error> {
        self.state.set_backlight(backlight);

        let bits = match backlight {
            State::On => 0b1000_0000,
            State::Off => 0b0000_0000,
        };
        self.sender.burst_bits(bits, self.delayer)
    }

    #[allow(missing_docs)]
    pub fn get_backlight(&self) -> State {
        self.state.get_backlight()
    }

    /// Program one of the 8 custom glyphs
    ///
    /// `index` is taken modulo 8. Each entry of `graph` is one pixel row, low 5 bits used.
    /// The address counter is left in CGRAM, call [`Lcd::set_cursor_pos`] before writing text.
    pub fn write_graph_to_cgram(
        &mut self,
        index: u8,
        graph: &[u8; 8],
    ) -> Result<(), Sender::Error> {
        let index = index & 0b111;

        self.command(CommandSet::SetCGRAM(index << 3))?;

        graph
            .iter()
            .try_for_each(|&line| self.write_u8_to_cur(line).map(|_| ()))
    }

    /// Write one byte to the data register, returns the number of bytes written
    pub fn write_u8_to_cur(&mut self, byte: impl Into<u8>) -> Result<usize, Sender::Error> {
        self.sender.send(
            byte.into(),
            RegisterSelection::Data,
            self.state.get_backlight(),
            self.delayer,
        )?;
        Ok(1)
    }

    /// Write the bytes of `str` as they are, the LCD's CGROM decides what they look like
    pub fn write_str_to_cur(&mut self, str: &str) -> Result<(), Sender::Error> {
        str.bytes()
            .try_for_each(|byte| self.write_u8_to_cur(byte).map(|_| ()))
    }

    #[allow(missing_docs)]
    pub fn write_str_to_pos(&mut self, str: &str, pos: (u8, u8)) -> Result<(), Sender::Error> {
        self.set_cursor_pos(pos)?;
        self.write_str_to_cur(str)
    }

    /// Send a raw instruction byte
    ///
    /// Bypasses the mirrored flags, so a raw Display Control or Entry Mode Set will be
    /// overwritten by the next setter.
    pub fn send_command(&mut self, command: u8) -> Result<(), Sender::Error> {
        self.sender.send(
            command,
            RegisterSelection::Command,
            self.state.get_backlight(),
            self.delayer,
        )
    }

    #[allow(missing_docs)]
    pub fn get_line_count(&self) -> u8 {
        self.state.get_line_count()
    }

    /// Row of the last [`Lcd::set_cursor_pos`], after clamping
    pub fn get_current_line(&self) -> u8 {
        self.state.get_current_line()
    }

    #[allow(missing_docs)]
    pub fn get_columns(&self) -> u8 {
        self.columns
    }

    #[allow(missing_docs)]
    pub fn get_font(&self) -> Font {
        self.state.get_font()
    }

    #[allow(missing_docs)]
    pub fn delay_ms(&mut self, ms: u32) {
        self.delayer.delay_ms(ms);
    }

    #[allow(missing_docs)]
    pub fn delay_us(&mut self, us: u32) {
        self.delayer.delay_us(us);
    }
}

impl<'a, 'b, Sender, Delayer> embedded_io::ErrorType for Lcd<'a, 'b, Sender, Delayer>
where
    Sender: SendCommand,
    Sender::Error: embedded_io::Error,
    Delayer: DelayNs,
{
    type Error = Sender::Error;
}

/// The LCD as a byte sink: every byte goes to the data register
impl<'a, 'b, Sender, Delayer> embedded_io::Write for Lcd<'a, 'b, Sender, Delayer>
where
    Sender: SendCommand,
    Sender::Error: embedded_io::Error,
    Delayer: DelayNs,
{
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        let mut written = 0;
        for &byte in buf {
            written += self.write_u8_to_cur(byte)?;
        }
        Ok(written)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl<'a, 'b, Sender: SendCommand, Delayer: DelayNs> fmt::Write for Lcd<'a, 'b, Sender, Delayer> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.write_str_to_cur(s).map_err(|_| fmt::Error)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::{vec, vec::Vec};

    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

    use super::*;
    use crate::{error::Error, retry::RetryPolicy, sender::Mcp23008Sender};

    #[derive(Default)]
    struct RecordDelay(Vec<u32>);

    impl DelayNs for RecordDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.0.push(ns);
        }
    }

    fn gpio(bits: u8) -> I2cTransaction {
        I2cTransaction::write(0x20, vec![0x09, bits])
    }

    /// The four GPIO writes for one byte, as the expander sees them
    fn byte(value: u8, data: bool, backlight: bool) -> [I2cTransaction; 4] {
        let mut ctrl = 0u8;
        if data {
            ctrl |= 0b0000_0010;
        }
        if backlight {
            ctrl |= 0b1000_0000;
        }
        let high = ((value & 0xF0) >> 1) | ctrl;
        let low = ((value & 0x0F) << 3) | ctrl;
        [
            gpio(high | 0b100),
            gpio(high),
            gpio(low | 0b100),
            gpio(low),
        ]
    }

    fn command(value: u8) -> [I2cTransaction; 4] {
        byte(value, false, false)
    }

    #[test]
    fn clear_twice_is_same_trace_and_delay() {
        let expectations: Vec<_> = [command(0x01), command(0x01)].concat();
        let mut i2c = I2cMock::new(&expectations);
        let mut delay = RecordDelay::default();
        let mut sender = Mcp23008Sender::new(&mut i2c, 0);

        let mut lcd = Lcd::new(&mut sender, &mut delay);
        lcd.clear().unwrap();
        lcd.clear().unwrap();

        assert_eq!(delay.0, [2_000_000, 2_000_000]);
        i2c.done();
    }

    #[test]
    fn home_waits_like_clear() {
        let expectations = command(0x02);
        let mut i2c = I2cMock::new(&expectations);
        let mut delay = RecordDelay::default();
        let mut sender = Mcp23008Sender::new(&mut i2c, 0);

        Lcd::new(&mut sender, &mut delay).home().unwrap();

        assert_eq!(delay.0, [2_000_000]);
        i2c.done();
    }

    #[test]
    fn row_offsets() {
        let expectations: Vec<_> = [
            command(0x80),
            command(0x80 | 0x40),
            command(0x80 | 0x14),
            command(0x80 | (0x54 + 3)),
        ]
        .concat();
        let mut i2c = I2cMock::new(&expectations);
        let mut delay = RecordDelay::default();
        let mut sender = Mcp23008Sender::new(&mut i2c, 0);

        let mut lcd = Lcd::new(&mut sender, &mut delay);
        lcd.state.set_geometry(4, Font::Font5x8);
        lcd.set_cursor_pos((0, 0)).unwrap();
        lcd.set_cursor_pos((0, 1)).unwrap();
        lcd.set_cursor_pos((0, 2)).unwrap();
        lcd.set_cursor_pos((3, 3)).unwrap();
        assert_eq!(lcd.get_current_line(), 3);

        i2c.done();
    }

    #[test]
    fn row_past_last_line_is_clamped() {
        // row 5 on a 2 line panel is row 1
        let expectations: Vec<_> =
            [command(0x80 | (0x40 + 4)), command(0x80 | (0x40 + 4))].concat();
        let mut i2c = I2cMock::new(&expectations);
        let mut delay = RecordDelay::default();
        let mut sender = Mcp23008Sender::new(&mut i2c, 0);

        let mut lcd = Lcd::new(&mut sender, &mut delay);
        lcd.state.set_geometry(2, Font::Font5x8);
        lcd.set_cursor_pos((4, 5)).unwrap();
        assert_eq!(lcd.get_current_line(), 1);
        lcd.set_cursor_pos((4, 1)).unwrap();

        i2c.done();
    }

    #[test]
    fn zero_rows_addresses_first_line() {
        let expectations = command(0x80);
        let mut i2c = I2cMock::new(&expectations);
        let mut delay = RecordDelay::default();
        let mut sender = Mcp23008Sender::new(&mut i2c, 0);

        let mut lcd = Lcd::new(&mut sender, &mut delay);
        lcd.state.set_geometry(0, Font::Font5x8);
        lcd.set_cursor_pos((0, 3)).unwrap();
        assert_eq!(lcd.get_current_line(), 0);

        i2c.done();
    }

    #[test]
    fn rows_beyond_four_stop_at_last_offset() {
        // 0x54 is the fourth row
        let expectations = command(0x80 | 0x54);
        let mut i2c = I2cMock::new(&expectations);
        let mut delay = RecordDelay::default();
        let mut sender = Mcp23008Sender::new(&mut i2c, 0);

        let mut lcd = Lcd::new(&mut sender, &mut delay);
        lcd.state.set_geometry(6, Font::Font5x8);
        lcd.set_cursor_pos((0, 5)).unwrap();
        assert_eq!(lcd.get_current_line(), 3);

        i2c.done();
    }

    #[test]
    fn toggles_rewrite_display_control() {
        let expectations: Vec<_> = [
            command(0x0E), // cursor
            command(0x0F), // blink
            command(0x0B), // display off, cursor and blink kept
            command(0x09), // cursor off
        ]
        .concat();
        let mut i2c = I2cMock::new(&expectations);
        let mut delay = RecordDelay::default();
        let mut sender = Mcp23008Sender::new(&mut i2c, 0);

        let mut lcd = Lcd::new(&mut sender, &mut delay);
        lcd.state.reset_display_control();
        lcd.set_cursor_state(State::On).unwrap();
        lcd.set_cursor_blink_state(State::On).unwrap();
        lcd.set_display_state(State::Off).unwrap();
        lcd.set_cursor_state(State::Off).unwrap();

        assert_eq!(lcd.get_display_state(), State::Off);
        assert_eq!(lcd.get_cursor_blink_state(), State::On);
        i2c.done();
    }

    #[test]
    fn scroll_direction_and_autoscroll() {
        let expectations: Vec<_> = [
            command(0x18),
            command(0x1C),
            command(0x04), // right to left
            command(0x05), // autoscroll
            command(0x07), // left to right
            command(0x06), // no autoscroll
        ]
        .concat();
        let mut i2c = I2cMock::new(&expectations);
        let mut delay = RecordDelay::default();
        let mut sender = Mcp23008Sender::new(&mut i2c, 0);

        let mut lcd = Lcd::new(&mut sender, &mut delay);
        lcd.state.reset_display_mode();
        lcd.scroll_display_left().unwrap();
        lcd.scroll_display_right().unwrap();
        lcd.set_direction(MoveDirection::RightToLeft).unwrap();
        lcd.set_autoscroll(State::On).unwrap();
        lcd.set_direction(MoveDirection::LeftToRight).unwrap();
        lcd.set_autoscroll(State::Off).unwrap();

        i2c.done();
    }

    #[test]
    fn backlight_rides_every_burst_until_switched_off() {
        let expectations: Vec<_> = [
            vec![gpio(0x80)],
            byte(0x01, false, true).to_vec(),
            byte(b'x', true, true).to_vec(),
            vec![gpio(0x00)],
            byte(b'x', true, false).to_vec(),
        ]
        .concat();
        let mut i2c = I2cMock::new(&expectations);
        let mut delay = RecordDelay::default();
        let mut sender = Mcp23008Sender::new(&mut i2c, 0);

        let mut lcd = Lcd::new(&mut sender, &mut delay);
        lcd.set_backlight(State::On).unwrap();
        lcd.clear().unwrap();
        lcd.write_u8_to_cur(b'x').unwrap();
        lcd.set_backlight(State::Off).unwrap();
        lcd.write_u8_to_cur(b'x').unwrap();

        assert_eq!(lcd.get_backlight(), State::Off);
        i2c.done();
    }

    #[test]
    fn glyph_slot_is_masked() {
        let heart = [0x00, 0x00, 0x0A, 0x1F, 0x0E, 0x04, 0x00, 0x00];

        let mut one_trace = command(0x40 | (1 << 3)).to_vec();
        for line in heart {
            one_trace.extend(byte(line, true, false));
        }
        let expectations = [one_trace.clone(), one_trace].concat();

        let mut i2c = I2cMock::new(&expectations);
        let mut delay = RecordDelay::default();
        let mut sender = Mcp23008Sender::new(&mut i2c, 0);

        let mut lcd = Lcd::new(&mut sender, &mut delay);
        lcd.write_graph_to_cgram(1, &heart).unwrap();
        lcd.write_graph_to_cgram(9, &heart).unwrap();

        i2c.done();
    }

    #[test]
    fn write_returns_bytes_written() {
        let expectations: Vec<_> = [byte(b'O', true, false), byte(b'K', true, false)].concat();
        let mut i2c = I2cMock::new(&expectations);
        let mut delay = RecordDelay::default();
        let mut sender = Mcp23008Sender::new(&mut i2c, 0);

        let mut lcd = Lcd::new(&mut sender, &mut delay);
        assert_eq!(lcd.write_u8_to_cur(b'O').unwrap(), 1);
        assert_eq!(embedded_io::Write::write(&mut lcd, b"K").unwrap(), 1);

        i2c.done();
    }

    #[test]
    fn formatted_text_goes_to_data_register() {
        let expectations: Vec<_> = [
            byte(b'4', true, false),
            byte(b'2', true, false),
            byte(b'C', true, false),
        ]
        .concat();
        let mut i2c = I2cMock::new(&expectations);
        let mut delay = RecordDelay::default();
        let mut sender = Mcp23008Sender::new(&mut i2c, 0);

        let mut lcd = Lcd::new(&mut sender, &mut delay);
        fmt::Write::write_fmt(&mut lcd, format_args!("{}C", 42)).unwrap();

        i2c.done();
    }

    #[test]
    fn raw_command_passes_through() {
        let expectations = command(0x10);
        let mut i2c = I2cMock::new(&expectations);
        let mut delay = RecordDelay::default();
        let mut sender = Mcp23008Sender::new(&mut i2c, 0);

        Lcd::new(&mut sender, &mut delay).send_command(0x10).unwrap();

        i2c.done();
    }

    #[test]
    fn bus_error_is_returned_with_bounded_retry() {
        let expectations = [
            gpio(0x04).with_error(ErrorKind::NoAcknowledge(
                embedded_hal::i2c::NoAcknowledgeSource::Address,
            )),
        ];
        let mut i2c = I2cMock::new(&expectations);
        let mut delay = RecordDelay::default();
        let mut sender =
            Mcp23008Sender::new(&mut i2c, 0).with_retry_policy(RetryPolicy::bounded(1));

        let mut lcd = Lcd::new(&mut sender, &mut delay);
        assert_eq!(
            lcd.clear(),
            Err(Error::Bus(ErrorKind::NoAcknowledge(
                embedded_hal::i2c::NoAcknowledgeSource::Address
            )))
        );
        // the clear never went out, so no settle time either
        assert!(delay.0.is_empty());

        i2c.done();
    }
}
