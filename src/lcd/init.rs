use embedded_hal::delay::DelayNs;

use crate::{
    command::{CommandSet, Font, State},
    lcd::Lcd,
    retry::RetryPolicy,
    sender::SendCommand,
};

/// HD44780 datasheet asks for 40 ms after Vcc reaches 2.7 V, with margin
const POWER_ON_DELAY_MS: u32 = 50;

const FUNCTION_SET_DELAY_US: u32 = 5_000;

/// Software reset, written straight to the expander without busy polling:
/// "0011" three times, then "0010" to switch to 4 bit, each nibble strobed EN high then low,
/// with the backlight line high
const RESET_BURSTS: [u8; 8] = [
    0b1001_1100,
    0b1001_1000,
    0b1001_1100,
    0b1001_1000,
    0b1001_1100,
    0b1001_1000,
    0b1001_0100,
    0b1001_0000,
];

/// [`Config`] is the init config of a [`Lcd`]
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    columns: u8,
    rows: u8,
    font: Font,
    backlight: State,
    retry: Option<RetryPolicy>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            columns: 16,
            rows: 2,
            font: Font::Font5x8,
            backlight: State::On,
            retry: None,
        }
    }
}

#[allow(missing_docs)]
impl Config {
    pub fn get_columns(&self) -> u8 {
        self.columns
    }

    pub fn set_columns(mut self, columns: u8) -> Self {
        self.columns = columns;
        self
    }

    pub fn get_rows(&self) -> u8 {
        self.rows
    }

    pub fn set_rows(mut self, rows: u8) -> Self {
        self.rows = rows;
        self
    }

    pub fn get_font(&self) -> Font {
        self.font
    }

    pub fn set_font(mut self, font: Font) -> Self {
        self.font = font;
        self
    }

    /// Backlight state once init is done
    pub fn get_backlight(&self) -> State {
        self.backlight
    }

    pub fn set_backlight(mut self, backlight: State) -> Self {
        self.backlight = backlight;
        self
    }

    /// Policy handed to the sender by [`Lcd::init`], `None` keeps whatever the sender has
    pub fn get_retry_policy(&self) -> Option<RetryPolicy> {
        self.retry
    }

    pub fn set_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = Some(retry);
        self
    }
}

impl<'a, 'b, Sender, Delayer> Lcd<'a, 'b, Sender, Delayer>
where
    Sender: SendCommand,
    Delayer: DelayNs,
{
    /// Create a [`Lcd`] driver, and init LCD hardware
    pub fn init(
        sender: &'a mut Sender,
        delayer: &'b mut Delayer,
        config: Config,
    ) -> Result<Self, Sender::Error> {
        if let Some(policy) = config.get_retry_policy() {
            sender.set_retry_policy(policy);
        }

        let mut lcd = Lcd::new(sender, delayer);
        lcd.begin(config.get_columns(), config.get_rows(), config.get_font())?;

        if config.get_backlight() == State::Off {
            lcd.set_backlight(State::Off)?;
        }

        Ok(lcd)
    }

    /// Power-on sequence
    ///
    /// The LCD may have been powered long before the MCU reset, so this never assumes the
    /// controller is in its reset state: it forces 4 bit mode with the datasheet's software
    /// reset, then sets lines and font, turns the display on, clears it, sets entry mode
    /// left to right without shift and switches the backlight on.
    ///
    /// `font` only takes effect on a single line display.
    pub fn begin(&mut self, columns: u8, rows: u8, font: Font) -> Result<(), Sender::Error> {
        self.delayer.delay_ms(POWER_ON_DELAY_MS);

        self.sender.configure_outputs(self.delayer)?;

        self.columns = columns;
        self.state.set_geometry(rows, font);

        for bits in RESET_BURSTS {
            self.sender.burst_bits(bits, self.delayer)?;
        }

        // 0010NF00, twice
        let function_set = CommandSet::FunctionSet(self.state.get_display_function());
        for _ in 0..2 {
            self.sender.delay_and_send(
                function_set,
                self.state.get_backlight(),
                self.delayer,
                FUNCTION_SET_DELAY_US,
            )?;
        }
        self.delayer.delay_us(FUNCTION_SET_DELAY_US);

        self.state.reset_display_control();
        self.set_display_state(State::On)?;

        self.clear()?;

        self.state.reset_display_mode();
        self.entry_mode()?;

        self.set_backlight(State::On)
    }
}
