use crate::{
    command::{flag, Font, MoveDirection, State},
    utils::{BitOps, BitState},
};

const BACKLIGHT_BIT: u8 = 3;

/// Local mirror of the display configuration
///
/// The HD44780 behind an MCP23008 is write-only, so these bytes are the only record of
/// what the controller was last told. Callers update them before emitting the matching command.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct LcdState {
    display_function: u8,
    display_control: u8,
    display_mode: u8,
    line_count: u8,
    current_line: u8,
}

impl Default for LcdState {
    fn default() -> Self {
        // 4 bit, 1 line, 5x8 until begin() says otherwise
        Self {
            display_function: 0,
            display_control: 0,
            display_mode: 0,
            line_count: 1,
            current_line: 0,
        }
    }
}

impl LcdState {
    pub(crate) fn get_display_function(&self) -> u8 {
        self.display_function
    }

    pub(crate) fn get_display_control(&self) -> u8 {
        self.display_control
    }

    pub(crate) fn get_display_mode(&self) -> u8 {
        self.display_mode
    }

    /// Apply the geometry given to `begin()`
    ///
    /// Flags are only ever OR'ed in here, matching a controller that cannot leave 2-line mode
    /// without a power cycle.
    pub(crate) fn set_geometry(&mut self, rows: u8, font: Font) {
        if rows > 1 {
            self.display_function.set_mask(flag::TWO_LINE);
        }

        // 5x10 only exists on single line panels
        if font == Font::Font5x10 && rows == 1 {
            self.display_function.set_mask(flag::FONT_5X10);
        }

        self.line_count = rows;
        self.current_line = 0;
    }

    pub(crate) fn get_line_count(&self) -> u8 {
        self.line_count
    }

    pub(crate) fn get_current_line(&self) -> u8 {
        self.current_line
    }

    pub(crate) fn set_current_line(&mut self, line: u8) {
        self.current_line = line;
    }

    pub(crate) fn get_font(&self) -> Font {
        match state_of(self.display_function, flag::FONT_5X10) {
            State::On => Font::Font5x10,
            State::Off => Font::Font5x8,
        }
    }

    /// Reset control flags to "display on", everything else (backlight included) off
    pub(crate) fn reset_display_control(&mut self) {
        self.display_control = flag::DISPLAY_ON;
    }

    pub(crate) fn get_display_state(&self) -> State {
        state_of(self.display_control, flag::DISPLAY_ON)
    }

    pub(crate) fn set_display_state(&mut self, display: State) {
        write_flag(&mut self.display_control, flag::DISPLAY_ON, display);
    }

    pub(crate) fn get_cursor_state(&self) -> State {
        state_of(self.display_control, flag::CURSOR_ON)
    }

    pub(crate) fn set_cursor_state(&mut self, cursor: State) {
        write_flag(&mut self.display_control, flag::CURSOR_ON, cursor);
    }

    pub(crate) fn get_cursor_blink(&self) -> State {
        state_of(self.display_control, flag::BLINK_ON)
    }

    pub(crate) fn set_cursor_blink(&mut self, blink: State) {
        write_flag(&mut self.display_control, flag::BLINK_ON, blink);
    }

    pub(crate) fn get_backlight(&self) -> State {
        match self.display_control.check_bit(BACKLIGHT_BIT) {
            BitState::Set => State::On,
            BitState::Clear => State::Off,
        }
    }

    pub(crate) fn set_backlight(&mut self, backlight: State) {
        let bit = match backlight {
            State::On => BitState::Set,
            State::Off => BitState::Clear,
        };
        self.display_control.write_bit(BACKLIGHT_BIT, bit);
    }

    /// Entry mode set after init: left to right, no display shift
    pub(crate) fn reset_display_mode(&mut self) {
        self.display_mode = flag::ENTRY_LEFT;
    }

    pub(crate) fn get_direction(&self) -> MoveDirection {
        match state_of(self.display_mode, flag::ENTRY_LEFT) {
            State::On => MoveDirection::LeftToRight,
            State::Off => MoveDirection::RightToLeft,
        }
    }

    pub(crate) fn set_direction(&mut self, dir: MoveDirection) {
        let left = match dir {
            MoveDirection::LeftToRight => State::On,
            MoveDirection::RightToLeft => State::Off,
        };
        write_flag(&mut self.display_mode, flag::ENTRY_LEFT, left);
    }

    pub(crate) fn get_autoscroll(&self) -> State {
        state_of(self.display_mode, flag::ENTRY_SHIFT_INCREMENT)
    }

    pub(crate) fn set_autoscroll(&mut self, autoscroll: State) {
        write_flag(&mut self.display_mode, flag::ENTRY_SHIFT_INCREMENT, autoscroll);
    }
}

fn state_of(reg: u8, mask: u8) -> State {
    State::from(reg & mask != 0)
}

fn write_flag(reg: &mut u8, mask: u8, state: State) {
    match state {
        State::On => reg.set_mask(mask),
        State::Off => reg.clear_mask(mask),
    };
}
