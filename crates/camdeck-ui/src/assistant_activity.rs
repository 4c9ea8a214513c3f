//! Push-to-talk voice assistant.
//!
//! Hold Select to record, release to send. The recording is transcribed,
//! the transcript is shown briefly, then the completion is displayed until
//! it times out. Network calls block the tick that makes them, so the
//! Processing and AiThinking screens are drawn one tick before the call.

use alloc::string::{String, ToString};

use embedded_graphics::{
    mono_font::MonoTextStyle,
    pixelcolor::Rgb565,
    prelude::*,
    primitives::{Circle, PrimitiveStyle, Rectangle},
    text::{Alignment, Text},
};

use crate::devices::{AssistantError, Recording};
use crate::input::Button;
use crate::mode::Mode;
use crate::ui::theme::{layout, ui_font_body, ui_font_small, ui_font_title};
use crate::ui::{draw_wrapped, palette, Activity, Banner, Context, Header};

const MSG_TOO_SHORT: &str = "Recording too short. Hold button longer while speaking.";
const MSG_RECORDING_FAILED: &str = "Recording failed";
const MSG_NOT_CONNECTED: &str = "WiFi not connected";
const MSG_NOT_UNDERSTOOD: &str =
    "Speech recognition failed. Try speaking louder or closer to microphone.";

/// Centre of the animated indicator.
const INDICATOR: Point = Point::new(64, 110);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssistantState {
    Inactive,
    Waiting,
    Listening,
    Processing,
    AiThinking,
    ShowingTranscription,
    ShowingResponse,
    Error,
}

pub struct AssistantActivity {
    state: AssistantState,
    state_since_ms: u64,
    /// Blocking call for the current state has yet to run.
    call_pending: bool,
    last_frame_ms: u64,
    anim_frame: u32,
    recording: Option<Recording>,
    transcript: String,
    response: String,
    error: String,
}

impl AssistantActivity {
    pub fn new() -> Self {
        Self {
            state: AssistantState::Inactive,
            state_since_ms: 0,
            call_pending: false,
            last_frame_ms: 0,
            anim_frame: 0,
            recording: None,
            transcript: String::new(),
            response: String::new(),
            error: String::new(),
        }
    }

    pub fn state(&self) -> AssistantState {
        self.state
    }

    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    pub fn response(&self) -> &str {
        &self.response
    }

    pub fn error(&self) -> &str {
        &self.error
    }

    fn reset(&mut self) {
        self.state = AssistantState::Inactive;
        self.call_pending = false;
        self.recording = None;
        self.transcript.clear();
        self.response.clear();
        self.error.clear();
    }

    fn elapsed(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.state_since_ms)
    }

    /// Switch state and draw its screen.
    fn go<D: DrawTarget<Color = Rgb565>>(
        &mut self,
        ctx: &mut Context<'_, D>,
        state: AssistantState,
    ) -> Result<(), D::Error> {
        log::debug!("Assistant {:?} -> {:?}", self.state, state);
        self.state = state;
        self.state_since_ms = ctx.now_ms;
        self.last_frame_ms = ctx.now_ms;
        self.anim_frame = 0;
        self.call_pending = matches!(
            state,
            AssistantState::Processing | AssistantState::AiThinking
        );
        self.render(ctx)
    }

    fn fail<D: DrawTarget<Color = Rgb565>>(
        &mut self,
        ctx: &mut Context<'_, D>,
        message: &str,
    ) -> Result<(), D::Error> {
        log::warn!("Assistant error: {}", message);
        self.recording = None;
        self.error = message.to_string();
        self.go(ctx, AssistantState::Error)
    }

    fn render<D: DrawTarget<Color = Rgb565>>(&self, ctx: &mut Context<'_, D>) -> Result<(), D::Error> {
        let connected = ctx.devices.assistant.is_connected();
        let display = &mut *ctx.display;
        let center_x = display.bounding_box().center().x;
        let body = |color| MonoTextStyle::new(ui_font_body(), color);

        match self.state {
            AssistantState::Inactive => Ok(()),
            AssistantState::Waiting => {
                display.clear(palette::BACKGROUND)?;
                Header::new("AI ASSISTANT").render(display)?;
                let title = MonoTextStyle::new(ui_font_title(), palette::TEXT);
                Text::with_alignment("ASK ME", Point::new(center_x, 50), title, Alignment::Center)
                    .draw(display)?;
                Text::with_alignment(
                    "ANYTHING",
                    Point::new(center_x, 72),
                    title,
                    Alignment::Center,
                )
                .draw(display)?;
                let (wifi, color) = if connected {
                    ("WiFi: connected", palette::SUCCESS)
                } else {
                    ("WiFi: offline", palette::ERROR)
                };
                Text::with_alignment(
                    wifi,
                    Point::new(center_x, 140),
                    MonoTextStyle::new(ui_font_small(), color),
                    Alignment::Center,
                )
                .draw(display)?;
                footer(display, "Hold SELECT to talk")
            }
            AssistantState::Listening => {
                display.clear(palette::BACKGROUND)?;
                Header::new("LISTENING").color(palette::ERROR).render(display)?;
                Text::with_alignment(
                    "Speak now...",
                    Point::new(center_x, 60),
                    body(palette::TEXT),
                    Alignment::Center,
                )
                .draw(display)?;
                footer(display, "Release SELECT to send")
            }
            AssistantState::Processing => {
                display.clear(palette::BACKGROUND)?;
                Header::new("PROCESSING").color(palette::WARNING).render(display)?;
                Text::with_alignment(
                    "Transcribing...",
                    Point::new(center_x, 60),
                    body(palette::TEXT),
                    Alignment::Center,
                )
                .draw(display)?;
                Ok(())
            }
            AssistantState::ShowingTranscription => {
                display.clear(palette::BACKGROUND)?;
                Header::new("YOU SAID").render(display)?;
                draw_wrapped(display, &self.transcript, text_area(), palette::TEXT)?;
                Ok(())
            }
            AssistantState::AiThinking => {
                display.clear(palette::BACKGROUND)?;
                Header::new("THINKING").color(palette::MAGENTA).render(display)?;
                Text::with_alignment(
                    "Asking the AI...",
                    Point::new(center_x, 60),
                    body(palette::TEXT),
                    Alignment::Center,
                )
                .draw(display)?;
                Ok(())
            }
            AssistantState::ShowingResponse => {
                display.clear(palette::BACKGROUND)?;
                Header::new("ANSWER").color(palette::SUCCESS).render(display)?;
                draw_wrapped(display, &self.response, text_area(), palette::TEXT)?;
                Ok(())
            }
            AssistantState::Error => Banner::new("Error", palette::ERROR)
                .detail(&self.error)
                .render(display),
        }
    }

    /// Advance the indicator of the current state if its frame is due.
    fn animate<D: DrawTarget<Color = Rgb565>>(
        &mut self,
        ctx: &mut Context<'_, D>,
    ) -> Result<(), D::Error> {
        let config = ctx.config;
        let timings = &config.assistant;
        let (interval, color) = match self.state {
            AssistantState::Waiting => (timings.waiting_frame_ms, palette::ACCENT),
            AssistantState::Listening => (timings.listening_frame_ms, palette::ERROR),
            AssistantState::Processing => (timings.processing_frame_ms, palette::WARNING),
            AssistantState::AiThinking => (timings.thinking_frame_ms, palette::MAGENTA),
            _ => return Ok(()),
        };
        if ctx.now_ms.saturating_sub(self.last_frame_ms) < interval {
            return Ok(());
        }
        self.last_frame_ms = ctx.now_ms;
        self.anim_frame = self.anim_frame.wrapping_add(1);

        let display = &mut *ctx.display;
        Rectangle::with_center(INDICATOR, Size::new(60, 30))
            .into_styled(PrimitiveStyle::with_fill(palette::BACKGROUND))
            .draw(display)?;
        match self.state {
            AssistantState::Waiting => {
                // Pulsing ring.
                let step = self.anim_frame % 8;
                let diameter = 10 + 2 * if step < 4 { step } else { 8 - step };
                Circle::with_center(INDICATOR, diameter)
                    .into_styled(PrimitiveStyle::with_stroke(color, 2))
                    .draw(display)?;
            }
            AssistantState::Listening => {
                // Level bars.
                for i in 0..5u32 {
                    let h = 4 + (self.anim_frame.wrapping_mul(7).wrapping_add(i * 5) % 20);
                    let x = INDICATOR.x - 22 + i as i32 * 10;
                    Rectangle::new(
                        Point::new(x, INDICATOR.y + 12 - h as i32),
                        Size::new(6, h),
                    )
                    .into_styled(PrimitiveStyle::with_fill(color))
                    .draw(display)?;
                }
            }
            _ => {
                // Three dots, one lit.
                let lit = self.anim_frame % 3;
                for i in 0..3u32 {
                    let fill = if i == lit { color } else { palette::MUTED };
                    Circle::with_center(INDICATOR + Point::new((i as i32 - 1) * 14, 0), 8)
                        .into_styled(PrimitiveStyle::with_fill(fill))
                        .draw(display)?;
                }
            }
        }
        Ok(())
    }

    fn update_listening<D: DrawTarget<Color = Rgb565>>(
        &mut self,
        ctx: &mut Context<'_, D>,
    ) -> Result<(), D::Error> {
        if ctx.input.is_down(Button::Select) {
            if let Err(err) = ctx.devices.recorder.poll() {
                log::warn!("Recorder poll failed: {}", err);
                ctx.devices.recorder.cancel();
                return self.fail(ctx, MSG_RECORDING_FAILED);
            }
            return self.animate(ctx);
        }

        match ctx.devices.recorder.stop() {
            Ok(recording) if recording.duration_secs > ctx.config.assistant.min_recording_secs => {
                log::info!(
                    "Recorded {:.2}s ({} bytes)",
                    recording.duration_secs,
                    recording.audio.len()
                );
                self.recording = Some(recording);
                self.go(ctx, AssistantState::Processing)
            }
            Ok(recording) => {
                log::info!("Recording too short: {:.2}s", recording.duration_secs);
                self.fail(ctx, MSG_TOO_SHORT)
            }
            Err(err) => {
                log::warn!("Recorder stop failed: {}", err);
                self.fail(ctx, MSG_RECORDING_FAILED)
            }
        }
    }

    fn transcribe<D: DrawTarget<Color = Rgb565>>(
        &mut self,
        ctx: &mut Context<'_, D>,
    ) -> Result<(), D::Error> {
        let Some(recording) = self.recording.take() else {
            return self.fail(ctx, MSG_RECORDING_FAILED);
        };
        if !ctx.devices.assistant.is_connected() {
            return self.fail(ctx, MSG_NOT_CONNECTED);
        }
        match ctx.devices.assistant.transcribe(&recording.audio) {
            Ok(text) if is_usable(&text) => {
                log::info!("Transcript: {}", text);
                self.transcript = text.trim().to_string();
                self.go(ctx, AssistantState::ShowingTranscription)
            }
            Ok(text) => {
                log::warn!("Unusable transcript: {:?}", text);
                self.fail(ctx, MSG_NOT_UNDERSTOOD)
            }
            Err(AssistantError::NotConnected) => self.fail(ctx, MSG_NOT_CONNECTED),
            Err(err) => {
                log::warn!("Transcription failed: {}", err);
                self.fail(ctx, MSG_NOT_UNDERSTOOD)
            }
        }
    }

    fn complete<D: DrawTarget<Color = Rgb565>>(
        &mut self,
        ctx: &mut Context<'_, D>,
    ) -> Result<(), D::Error> {
        match ctx.devices.assistant.complete(&self.transcript) {
            Ok(text) if !text.starts_with("Error") => {
                log::info!("Response: {} chars", text.len());
                self.response = text;
                self.go(ctx, AssistantState::ShowingResponse)
            }
            Ok(text) => self.fail(ctx, &text),
            Err(err) => {
                let message = err.to_string();
                self.fail(ctx, &message)
            }
        }
    }
}

impl Default for AssistantActivity {
    fn default() -> Self {
        Self::new()
    }
}

/// A transcript worth sending on.
fn is_usable(text: &str) -> bool {
    let text = text.trim();
    !text.is_empty() && !text.starts_with("Error")
}

fn text_area() -> Rectangle {
    Rectangle::new(
        Point::new(layout::MARGIN, layout::HEADER_H + 6),
        Size::new(118, 124),
    )
}

fn footer<D: DrawTarget<Color = Rgb565>>(display: &mut D, hint: &str) -> Result<(), D::Error> {
    let center_x = display.bounding_box().center().x;
    Text::with_alignment(
        hint,
        Point::new(center_x, layout::FOOTER_TEXT_Y),
        MonoTextStyle::new(ui_font_small(), palette::MUTED),
        Alignment::Center,
    )
    .draw(display)?;
    Ok(())
}

impl<D: DrawTarget<Color = Rgb565>> Activity<D> for AssistantActivity {
    fn enter(&mut self, ctx: &mut Context<'_, D>) -> Result<(), D::Error> {
        self.reset();
        Banner::new("AI Assistant", palette::ACCENT)
            .detail("Hold SELECT and speak, release to send.")
            .render(ctx.display)?;
        ctx.delay.delay_ms(ctx.config.assistant.welcome_ms);

        if !ctx.devices.assistant.is_connected() {
            Banner::new("WiFi", palette::WARNING)
                .detail("Connecting...")
                .render(ctx.display)?;
            if ctx.devices.assistant.connect() {
                log::info!("WiFi connected");
            } else {
                log::warn!("WiFi connection failed; assistant will report errors");
            }
        }
        self.go(ctx, AssistantState::Waiting)
    }

    fn update(&mut self, ctx: &mut Context<'_, D>) -> Result<(), D::Error> {
        if ctx.input.pressed(Button::Back) {
            if ctx.devices.recorder.is_recording() {
                ctx.devices.recorder.cancel();
            }
            self.reset();
            ctx.request_transition(Mode::AiAssistant.parent());
            return Ok(());
        }

        let config = ctx.config;
        let timings = &config.assistant;
        let elapsed = self.elapsed(ctx.now_ms);
        match self.state {
            AssistantState::Inactive => Ok(()),
            AssistantState::Waiting => {
                if ctx.input.pressed(Button::Select) {
                    match ctx.devices.recorder.start() {
                        Ok(()) => self.go(ctx, AssistantState::Listening),
                        Err(err) => {
                            log::warn!("Recorder start failed: {}", err);
                            self.fail(ctx, MSG_RECORDING_FAILED)
                        }
                    }
                } else {
                    self.animate(ctx)
                }
            }
            AssistantState::Listening => self.update_listening(ctx),
            AssistantState::Processing if self.call_pending => {
                self.call_pending = false;
                self.transcribe(ctx)
            }
            AssistantState::AiThinking if self.call_pending => {
                self.call_pending = false;
                self.complete(ctx)
            }
            AssistantState::Processing | AssistantState::AiThinking => self.animate(ctx),
            AssistantState::ShowingTranscription => {
                if elapsed >= timings.transcription_display_ms {
                    self.go(ctx, AssistantState::AiThinking)
                } else {
                    Ok(())
                }
            }
            AssistantState::ShowingResponse => {
                if elapsed >= timings.result_timeout_ms {
                    self.response.clear();
                    self.go(ctx, AssistantState::Waiting)
                } else {
                    Ok(())
                }
            }
            AssistantState::Error => {
                if elapsed >= timings.error_timeout_ms {
                    self.go(ctx, AssistantState::Waiting)
                } else {
                    Ok(())
                }
            }
        }
    }

    fn exit(&mut self, devices: &mut crate::devices::Devices) {
        if devices.recorder.is_recording() {
            devices.recorder.cancel();
        }
        self.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::ButtonLevels;
    use crate::mock::{ActivityRig, MockAssistant, MockHandles};

    fn select() -> ButtonLevels {
        ButtonLevels::NONE.with(Button::Select)
    }

    fn entered(rig: &mut ActivityRig) -> AssistantActivity {
        let mut assistant = AssistantActivity::new();
        assert_eq!(rig.enter(&mut assistant), None);
        assistant
    }

    /// Hold Select for one tick, then release.
    fn talk(rig: &mut ActivityRig, assistant: &mut AssistantActivity, secs: f32) {
        rig.handles.recorder.0.borrow_mut().next_duration_secs = secs;
        rig.step(assistant, select());
        assert_eq!(assistant.state(), AssistantState::Listening);
        rig.step(assistant, select());
        rig.idle(assistant);
    }

    #[test]
    fn enter_shows_welcome_connects_and_waits() {
        let mut rig = ActivityRig::new();
        let assistant = entered(&mut rig);
        assert_eq!(assistant.state(), AssistantState::Waiting);
        assert!(rig.handles.assistant.0.borrow().connected);
        assert_eq!(rig.delay.total_ms(), 1000);
    }

    #[test]
    fn recording_at_or_under_minimum_is_rejected() {
        let mut rig = ActivityRig::new();
        let mut assistant = entered(&mut rig);
        talk(&mut rig, &mut assistant, 0.39);
        assert_eq!(assistant.state(), AssistantState::Error);
        assert_eq!(assistant.error(), MSG_TOO_SHORT);
    }

    #[test]
    fn recording_over_minimum_goes_to_processing() {
        let mut rig = ActivityRig::new();
        let mut assistant = entered(&mut rig);
        talk(&mut rig, &mut assistant, 0.41);
        assert_eq!(assistant.state(), AssistantState::Processing);
        assert!(rig.handles.recorder.0.borrow().polls > 0);
    }

    #[test]
    fn full_round_trip_shows_transcript_then_response() {
        let mut rig = ActivityRig::new();
        let mut assistant = entered(&mut rig);
        rig.handles.assistant.push_transcript(Ok("what is rust"));
        rig.handles.assistant.push_completion(Ok("A language."));
        talk(&mut rig, &mut assistant, 1.2);

        rig.idle(&mut assistant);
        assert_eq!(assistant.state(), AssistantState::ShowingTranscription);
        assert_eq!(assistant.transcript(), "what is rust");

        rig.idle_for(&mut assistant, 3000);
        assert_eq!(assistant.state(), AssistantState::AiThinking);
        rig.idle(&mut assistant);
        assert_eq!(assistant.state(), AssistantState::ShowingResponse);
        assert_eq!(assistant.response(), "A language.");
        assert_eq!(rig.handles.assistant.0.borrow().prompts, ["what is rust"]);
    }

    #[test]
    fn response_times_out_to_waiting_after_eight_seconds() {
        let mut rig = ActivityRig::new();
        let mut assistant = entered(&mut rig);
        talk(&mut rig, &mut assistant, 1.0);
        rig.idle(&mut assistant);
        rig.idle_for(&mut assistant, 3000);
        rig.idle(&mut assistant);
        assert_eq!(assistant.state(), AssistantState::ShowingResponse);

        let t0 = rig.now_ms;
        rig.tick_ms = 7999;
        rig.idle(&mut assistant);
        assert_eq!(rig.now_ms, t0 + 7999);
        assert_eq!(assistant.state(), AssistantState::ShowingResponse);
        rig.tick_ms = 2;
        rig.idle(&mut assistant);
        assert_eq!(assistant.state(), AssistantState::Waiting);
    }

    #[test]
    fn error_clears_after_three_seconds() {
        let mut rig = ActivityRig::new();
        let mut assistant = entered(&mut rig);
        talk(&mut rig, &mut assistant, 0.1);
        assert_eq!(assistant.state(), AssistantState::Error);
        rig.idle_for(&mut assistant, 2900);
        assert_eq!(assistant.state(), AssistantState::Error);
        rig.idle_for(&mut assistant, 200);
        assert_eq!(assistant.state(), AssistantState::Waiting);
    }

    #[test]
    fn empty_or_error_transcripts_are_recognition_failures() {
        for reply in ["", "   ", "Error: timeout"] {
            let mut rig = ActivityRig::new();
            let mut assistant = entered(&mut rig);
            rig.handles.assistant.push_transcript(Ok(reply));
            talk(&mut rig, &mut assistant, 1.0);
            rig.idle(&mut assistant);
            assert_eq!(assistant.state(), AssistantState::Error);
            assert_eq!(assistant.error(), MSG_NOT_UNDERSTOOD);
        }
    }

    #[test]
    fn offline_reports_wifi_error() {
        let mut rig = ActivityRig::with_handles(MockHandles {
            assistant: MockAssistant::new(false),
            ..MockHandles::new()
        });
        let mut assistant = entered(&mut rig);
        assert_eq!(assistant.state(), AssistantState::Waiting);
        talk(&mut rig, &mut assistant, 1.0);
        rig.idle(&mut assistant);
        assert_eq!(assistant.error(), MSG_NOT_CONNECTED);
    }

    #[test]
    fn failed_completion_shows_its_message() {
        let mut rig = ActivityRig::new();
        let mut assistant = entered(&mut rig);
        rig.handles
            .assistant
            .push_completion(Err(AssistantError::Http(503)));
        talk(&mut rig, &mut assistant, 1.0);
        rig.idle(&mut assistant);
        rig.idle_for(&mut assistant, 3000);
        rig.idle(&mut assistant);
        assert_eq!(assistant.state(), AssistantState::Error);
        assert_eq!(assistant.error(), "HTTP 503");
    }

    #[test]
    fn recorder_failure_is_reported() {
        let mut rig = ActivityRig::new();
        let mut assistant = entered(&mut rig);
        rig.handles.recorder.0.borrow_mut().fail_stop = true;
        talk(&mut rig, &mut assistant, 1.0);
        assert_eq!(assistant.error(), MSG_RECORDING_FAILED);
    }

    #[test]
    fn back_while_listening_cancels_recording() {
        let mut rig = ActivityRig::new();
        let mut assistant = entered(&mut rig);
        rig.step(&mut assistant, select());
        assert!(rig.handles.recorder.0.borrow().recording);
        let back = select().with(Button::Back);
        assert_eq!(rig.step(&mut assistant, back), Some(Mode::Menu));
        assert!(!rig.handles.recorder.0.borrow().recording);
        assert_eq!(rig.handles.recorder.0.borrow().cancels, 1);
        assert_eq!(assistant.state(), AssistantState::Inactive);
    }
}
