use esp_idf_svc::hal::gpio::{AnyIOPin, Input, Pin, PinDriver, Pull};
use esp_idf_svc::sys::EspError;

use camdeck_ui::{Button, ButtonLevels, InputSource};

/// The four navigation buttons, read as plain GPIO levels.
/// Active low with internal pull-ups.
pub struct GpioButtons {
    pins: [PinDriver<'static, AnyIOPin, Input>; 4],
}

impl GpioButtons {
    /// `pins` in [`Button::ALL`] order: Up, Down, Select, Back.
    pub fn new(pins: [AnyIOPin; 4]) -> Result<Self, EspError> {
        let [up, down, select, back] = pins;
        Ok(Self {
            pins: [input(up)?, input(down)?, input(select)?, input(back)?],
        })
    }
}

fn input(pin: AnyIOPin) -> Result<PinDriver<'static, AnyIOPin, Input>, EspError> {
    let gpio = pin.pin();
    let mut driver = PinDriver::input(pin)?;
    driver.set_pull(Pull::Up)?;
    log::debug!("Button on GPIO{}", gpio);
    Ok(driver)
}

impl InputSource for GpioButtons {
    fn sample(&mut self) -> ButtonLevels {
        let mut levels = ButtonLevels::NONE;
        for (button, pin) in Button::ALL.into_iter().zip(&self.pins) {
            levels.set(button, pin.is_low());
        }
        levels
    }
}
