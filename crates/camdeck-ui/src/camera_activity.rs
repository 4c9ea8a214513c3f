//! Live camera preview with capture-to-card.

use alloc::format;
use alloc::string::String;

use embedded_graphics::{
    mono_font::MonoTextStyle,
    pixelcolor::Rgb565,
    prelude::*,
    primitives::{PrimitiveStyle, Rectangle},
    text::{Alignment, Baseline, Text},
};

use crate::devices::{CameraError, Frame};
use crate::input::Button;
use crate::mode::Mode;
use crate::ui::theme::{layout, ui_font_small};
use crate::ui::{palette, Activity, BarKey, Banner, ButtonBar, Context};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraState {
    LiveView,
    ShowingCapture,
    Unavailable,
}

const CAPTURE_BAR: ButtonBar<'static> = ButtonBar {
    left: BarKey::new("CAPTURE", palette::HIGHLIGHT),
    right: BarKey::new("BACK", palette::ERROR),
};

const CONTINUE_BAR: ButtonBar<'static> = ButtonBar {
    left: BarKey::new("CONTINUE", palette::SUCCESS).text(palette::BACKGROUND),
    right: BarKey::new("BACK", palette::ERROR),
};

pub struct CameraActivity {
    state: CameraState,
    /// Private copy of the last capture, held only while it is on screen.
    captured: Option<Frame>,
}

impl CameraActivity {
    pub fn new() -> Self {
        Self {
            state: CameraState::LiveView,
            captured: None,
        }
    }

    pub fn state(&self) -> CameraState {
        self.state
    }

    pub fn holds_capture(&self) -> bool {
        self.captured.is_some()
    }

    fn show_unavailable<D: DrawTarget<Color = Rgb565>>(
        &mut self,
        display: &mut D,
    ) -> Result<(), D::Error> {
        self.state = CameraState::Unavailable;
        self.captured = None;
        Banner::new("Camera", palette::ERROR)
            .detail("Camera not available. Press BACK.")
            .render(display)
    }

    fn show_live_view<D: DrawTarget<Color = Rgb565>>(
        &mut self,
        display: &mut D,
    ) -> Result<(), D::Error> {
        self.state = CameraState::LiveView;
        self.captured = None;
        display.clear(palette::BACKGROUND)?;
        CAPTURE_BAR.render(display)
    }

    fn capture<D: DrawTarget<Color = Rgb565>>(
        &mut self,
        ctx: &mut Context<'_, D>,
    ) -> Result<(), D::Error> {
        let frame = match ctx.devices.camera.capture() {
            Ok(frame) => frame,
            Err(CameraError::Unavailable) => return self.show_unavailable(ctx.display),
            Err(err) => {
                log::warn!("Capture failed: {}", err);
                return status_line(ctx.display, "Capture failed", palette::ERROR);
            }
        };

        let status: String = match ctx.devices.photos.save(&frame) {
            Ok(name) => {
                log::info!("Saved {} ({} bytes)", name, frame.encoded.len());
                format!("Saved {}", name)
            }
            Err(err) => {
                log::warn!("Photo not saved: {}", err);
                String::from("Not saved")
            }
        };

        let display = &mut *ctx.display;
        display.clear(palette::BACKGROUND)?;
        frame.draw(display, Point::zero())?;
        Rectangle::new(
            Point::zero(),
            Size::new(display.bounding_box().size.width, layout::VIEWPORT_H),
        )
        .into_styled(PrimitiveStyle::with_stroke(palette::SUCCESS, 2))
        .draw(display)?;
        status_line(display, &status, palette::TEXT)?;
        CONTINUE_BAR.render(display)?;

        self.captured = Some(frame);
        self.state = CameraState::ShowingCapture;
        Ok(())
    }
}

impl Default for CameraActivity {
    fn default() -> Self {
        Self::new()
    }
}

/// One line of text on a dark strip at the top of the viewport.
fn status_line<D: DrawTarget<Color = Rgb565>>(
    display: &mut D,
    text: &str,
    color: Rgb565,
) -> Result<(), D::Error> {
    let width = display.bounding_box().size.width;
    Rectangle::new(Point::new(2, 2), Size::new(width - 4, 12))
        .into_styled(PrimitiveStyle::with_fill(palette::BACKGROUND))
        .draw(display)?;
    Text::with_text_style(
        text,
        Point::new(width as i32 / 2, 8),
        MonoTextStyle::new(ui_font_small(), color),
        embedded_graphics::text::TextStyleBuilder::new()
            .alignment(Alignment::Center)
            .baseline(Baseline::Middle)
            .build(),
    )
    .draw(display)?;
    Ok(())
}

impl<D: DrawTarget<Color = Rgb565>> Activity<D> for CameraActivity {
    fn enter(&mut self, ctx: &mut Context<'_, D>) -> Result<(), D::Error> {
        if ctx.devices.camera.is_available() {
            self.show_live_view(ctx.display)
        } else {
            log::warn!("Camera not available");
            self.show_unavailable(ctx.display)
        }
    }

    fn update(&mut self, ctx: &mut Context<'_, D>) -> Result<(), D::Error> {
        if ctx.input.pressed(Button::Back) {
            self.captured = None;
            ctx.request_transition(Mode::Camera.parent());
            return Ok(());
        }

        match self.state {
            CameraState::Unavailable => Ok(()),
            CameraState::ShowingCapture => {
                if ctx.input.pressed(Button::Up) {
                    self.show_live_view(ctx.display)?;
                }
                Ok(())
            }
            CameraState::LiveView => {
                if ctx.input.pressed(Button::Up) {
                    return self.capture(ctx);
                }
                match ctx.devices.camera.preview() {
                    Ok(frame) => frame.draw(ctx.display, Point::zero()),
                    Err(CameraError::Unavailable) => self.show_unavailable(ctx.display),
                    Err(err) => {
                        log::debug!("Preview frame dropped: {}", err);
                        Ok(())
                    }
                }
            }
        }
    }

    fn exit(&mut self, _devices: &mut crate::devices::Devices) {
        self.captured = None;
    }
}
