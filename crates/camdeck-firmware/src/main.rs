mod buttons;
mod camera;
mod cloud;
mod config;
mod diagnostics;
mod jpeg;
mod recorder;
mod sd_photos;
mod wifi;

use anyhow::Context;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::{
    delay::FreeRtos,
    gpio::{AnyIOPin, IOPin, PinDriver},
    peripherals::Peripherals,
    spi::{config::Config as SpiConfig, SpiDeviceDriver, SpiDriver, SpiDriverConfig},
    units::Hertz,
};

use camdeck_ui::{App, Config, Devices, InputSource, PhotoStore};
use st7735::{Builder, ColorOrder, Dimensions, Display, Interface, Rotation};

use buttons::GpioButtons;
use camera::EspCamera;
use cloud::CloudAssistant;
use diagnostics::{log_heap, uptime_ms};
use recorder::MicRecorder;
use sd_photos::SdPhotoStore;
use wifi::WifiLink;

fn main() -> anyhow::Result<()> {
    esp_idf_svc::sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();
    log_heap("startup");

    let peripherals = Peripherals::take().context("peripherals already taken")?;
    let pins = peripherals.pins;
    let sys_loop = EspSystemEventLoop::take()?;

    let spi = SpiDriver::new(
        peripherals.spi2,
        pins.gpio12,
        pins.gpio11,
        None::<AnyIOPin>,
        &SpiDriverConfig::default(),
    )
    .context("display SPI bus")?;
    let spi_config = SpiConfig::default()
        .baudrate(Hertz(config::display::SPI_HZ))
        .data_mode(embedded_hal::spi::MODE_0);
    let spi_device = SpiDeviceDriver::new(spi, Some(pins.gpio10), &spi_config)?;
    let dc = PinDriver::output(pins.gpio3)?;
    let rst = PinDriver::output(pins.gpio9)?;
    let mut backlight = PinDriver::output(pins.gpio46)?;

    // The panel is mounted upside down relative to the controller's
    // default scan; MADCTL 0 puts row 0 at the top of the enclosure.
    let panel = Builder::new()
        .dimensions(Dimensions::new(160, 128)?)
        .rotation(Rotation::Rotate0)
        .color_order(ColorOrder::Rgb)
        .build()?;
    let mut delay = FreeRtos;
    let mut display = Display::new(Interface::new(spi_device, dc, rst), panel);
    display.init(&mut delay).context("ST7735 init")?;
    display.fill_screen(0x0000)?;
    backlight.set_high()?;

    let mut buttons = GpioButtons::new([
        pins.gpio4.downgrade(),
        pins.gpio5.downgrade(),
        pins.gpio14.downgrade(),
        pins.gpio13.downgrade(),
    ])
    .context("button GPIOs")?;

    // Boot must reach the menu even when the card, sensor or radio is absent.
    let mut photos = match SdPhotoStore::mount() {
        Ok(store) => store,
        Err(err) => {
            log::warn!("SD card mount failed: {}", err);
            SdPhotoStore::unavailable(err.to_string())
        }
    };
    photos.log_status();

    let camera = match EspCamera::init() {
        Ok(camera) => camera,
        Err(err) => {
            log::warn!("{}", err);
            EspCamera::unavailable()
        }
    };

    let recorder = MicRecorder::new(peripherals.i2s0, pins.gpio17, pins.gpio48, pins.gpio47)
        .context("I2S microphone")?;

    let wifi = match WifiLink::new(peripherals.modem, sys_loop) {
        Ok(link) => Some(link),
        Err(err) => {
            log::warn!("Wi-Fi init failed: {:#}", err);
            None
        }
    };
    log_heap("after_bring_up");

    let devices = Devices::new(
        Box::new(camera),
        Box::new(photos),
        Box::new(recorder),
        Box::new(CloudAssistant::new(wifi)),
    );
    let mut app = App::new(devices, Config::default());

    log::info!("Starting main loop ({} ms period)", config::LOOP_PERIOD_MS);
    loop {
        let levels = buttons.sample();
        if let Some(mode) = app.tick(&mut display, levels, uptime_ms(), &mut delay) {
            log_heap(&format!("enter {:?}", mode));
        }
        FreeRtos::delay_ms(config::LOOP_PERIOD_MS);
    }
}
