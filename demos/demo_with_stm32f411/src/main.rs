//! AD595 thermometer on a 20x4 LCD with an MCP23008 backpack, STM32F411RET6
//!
//! Wiring diagram
//!
//! MCP23008 backpack <-> STM32F411RET6
//!               SCL <-> PB6
//!               SDA <-> PB7
//!               VCC <-> 5V
//!               GND <-> GND
//!   A2/A1/A0 jumpers all open (address 0x20)
//!
//!      AD595 board <-> STM32F411RET6
//!              OUT <-> divider (1:1.5) <-> PA0
//!              VCC <-> 5V
//!              GND <-> GND

#![no_std]
#![no_main]

use core::fmt::Write;

use panic_rtt_target as _;
use rtt_target::{rprintln, rtt_init_print};
use stm32f4xx_hal::{
    adc::{
        config::{AdcConfig, SampleTime},
        Adc,
    },
    gpio::{Analog, Pin},
    i2c::{self, I2c},
    pac,
    prelude::*,
};

use hobbybotics_drivers::{
    ad595::{Ad595, AnalogInput, TemperatureUnit},
    command::State,
    lcd::{Config, Lcd},
    sender::Mcp23008Sender,
};

// a degree sign
const DEGREE: [u8; 8] = [
    0b00110, 0b01001, 0b01001, 0b00110, 0b00000, 0b00000, 0b00000, 0b00000,
];

/// PA0 through ADC1
struct Pa0Input {
    adc: Adc<pac::ADC1>,
    pin: Pin<'A', 0, Analog>,
}

impl AnalogInput for Pa0Input {
    type Error = core::convert::Infallible;

    fn read_sample(&mut self) -> Result<u16, Self::Error> {
        // 12 bit at 3.3 V full scale, with the 1:1.5 divider this is close enough to
        // the 10 bit, 5 V scale the AD595 math expects
        let raw = self.adc.convert(&self.pin, SampleTime::Cycles_480);
        Ok(raw >> 2)
    }
}

#[cortex_m_rt::entry]
fn main() -> ! {
    rtt_init_print!();

    let dp = pac::Peripherals::take().expect("Cannot take device peripherals");
    let cp = pac::CorePeripherals::take().expect("Cannot take core peripherals");

    let rcc = dp.RCC.constrain();
    let clocks = rcc.cfgr.use_hse(12.MHz()).freeze();

    let mut delayer = cp.SYST.delay(&clocks);

    let gpioa = dp.GPIOA.split();
    let gpiob = dp.GPIOB.split();

    let mut i2c = I2c::new(
        dp.I2C1,
        (gpiob.pb6, gpiob.pb7),
        i2c::Mode::standard(100.kHz()),
        &clocks,
    );

    let input = Pa0Input {
        adc: Adc::adc1(dp.ADC1, true, AdcConfig::default()),
        pin: gpioa.pa0.into_analog(),
    };
    let mut thermocouple = match Ad595::init(input) {
        Ok(sensor) => sensor,
        Err(_) => unreachable!(),
    };

    let mut sender = Mcp23008Sender::new(&mut i2c, 0);

    let config = Config::default().set_columns(20).set_rows(4);
    let mut lcd = match Lcd::init(&mut sender, &mut delayer, config) {
        Ok(lcd) => lcd,
        Err(e) => panic!("LCD init failed: {:?}", e),
    };
    rprintln!("LCD ready, {} lines", lcd.get_line_count());

    lcd.write_graph_to_cgram(0, &DEGREE).ok();
    lcd.write_str_to_pos("Thermocouple", (4, 0)).ok();

    let mut toggle = State::On;

    loop {
        let celsius = thermocouple.measure(TemperatureUnit::Celsius);
        let fahrenheit = thermocouple.measure(TemperatureUnit::Fahrenheit);

        match (celsius, fahrenheit) {
            (Ok(c), Ok(f)) => {
                rprintln!("{} C / {} F", c, f);

                lcd.set_cursor_pos((2, 2)).ok();
                write!(lcd, "{:6.1}\x00C {:6.1}\x00F", c, f).ok();
            }
            _ => rprintln!("ADC read failed"),
        }

        // heartbeat on the last line
        lcd.set_cursor_pos((19, 3)).ok();
        let beat = if toggle == State::On { b'*' } else { b' ' };
        lcd.write_u8_to_cur(beat).ok();
        toggle = if toggle == State::On { State::Off } else { State::On };

        lcd.delay_ms(1_000);
    }
}
