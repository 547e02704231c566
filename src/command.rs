//! HD44780 instruction set, and the small enums used to describe display settings

use crate::utils::BitOps;

/// Instruction opcodes
pub(crate) mod opcode {
    pub const CLEAR_DISPLAY: u8 = 0x01;
    pub const RETURN_HOME: u8 = 0x02;
    pub const ENTRY_MODE_SET: u8 = 0x04;
    pub const DISPLAY_CONTROL: u8 = 0x08;
    pub const CURSOR_SHIFT: u8 = 0x10;
    pub const FUNCTION_SET: u8 = 0x20;
    pub const SET_CGRAM_ADDR: u8 = 0x40;
    pub const SET_DDRAM_ADDR: u8 = 0x80;
}

/// Flag bits, grouped by the instruction they belong to
pub(crate) mod flag {
    // entry mode set
    pub const ENTRY_LEFT: u8 = 0x02;
    pub const ENTRY_SHIFT_INCREMENT: u8 = 0x01;

    // display on/off control
    pub const DISPLAY_ON: u8 = 0x04;
    pub const CURSOR_ON: u8 = 0x02;
    pub const BLINK_ON: u8 = 0x01;
    // never sent to the LCD controller, the expander drives the backlight
    pub const BACKLIGHT: u8 = 0x08;

    // cursor or display shift
    pub const DISPLAY_MOVE: u8 = 0x08;
    pub const MOVE_RIGHT: u8 = 0x04;

    // function set
    pub const TWO_LINE: u8 = 0x08;
    pub const FONT_5X10: u8 = 0x04;
}

/// One instruction the driver can emit
///
/// Flag-carrying instructions take the raw flag byte the driver keeps,
/// so what goes out on the bus is always the mirrored state.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandSet {
    /// Blank DDRAM and move cursor home
    ClearDisplay,
    /// Move cursor home and undo display shifts
    ReturnHome,
    /// Entry mode, raw flags
    EntryModeSet(u8),
    /// Display/cursor/blink, raw flags
    DisplayControl(u8),
    /// Shift the whole display one position, without touching DDRAM
    DisplayShift(MoveDirection),
    /// Data length, line count and font, raw flags
    FunctionSet(u8),
    /// CGRAM address, 6 bit
    SetCGRAM(u8),
    /// DDRAM address, 7 bit
    SetDDRAM(u8),
}

impl From<CommandSet> for u8 {
    fn from(command: CommandSet) -> Self {
        match command {
            CommandSet::ClearDisplay => opcode::CLEAR_DISPLAY,

            CommandSet::ReturnHome => opcode::RETURN_HOME,

            CommandSet::EntryModeSet(flags) => opcode::ENTRY_MODE_SET | (flags & 0b0000_0011),

            // backlight rides in the same flag byte, keep it off the instruction
            CommandSet::DisplayControl(flags) => opcode::DISPLAY_CONTROL | (flags & 0b0000_0111),

            CommandSet::DisplayShift(dir) => {
                let mut raw_bits = opcode::CURSOR_SHIFT | flag::DISPLAY_MOVE;

                if dir == MoveDirection::LeftToRight {
                    raw_bits.set_mask(flag::MOVE_RIGHT);
                }

                raw_bits
            }

            CommandSet::FunctionSet(flags) => opcode::FUNCTION_SET | (flags & 0b0001_1100),

            CommandSet::SetCGRAM(addr) => opcode::SET_CGRAM_ADDR | (addr & 0b0011_1111),

            CommandSet::SetDDRAM(addr) => opcode::SET_DDRAM_ADDR | (addr & 0b0111_1111),
        }
    }
}

/// Which way the text (or the display window) moves
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MoveDirection {
    #[allow(missing_docs)]
    RightToLeft,
    #[allow(missing_docs)]
    #[default]
    LeftToRight,
}

/// Generic on/off switch
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    #[allow(missing_docs)]
    Off,
    #[allow(missing_docs)]
    #[default]
    On,
}

impl From<bool> for State {
    fn from(on: bool) -> Self {
        match on {
            true => State::On,
            false => State::Off,
        }
    }
}

/// Character font
///
/// 5x10 is only honoured on a one line display
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Font {
    #[allow(missing_docs)]
    #[default]
    Font5x8,
    #[allow(missing_docs)]
    Font5x10,
}

/// HD44780 RS line
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegisterSelection {
    /// Instruction register
    Command,
    /// Data register (DDRAM or CGRAM, whichever was addressed last)
    Data,
}
