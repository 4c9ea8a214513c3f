//! Scrolling list navigation shared by the main, game and face menus.
//!
//! A [`MenuNavigator`] keeps a wrapping selection and a scroll window over a
//! fixed option table. After every move the window is adjusted so that
//! `scroll_offset <= selected_index < scroll_offset + visible_count`, with
//! the offset clamped to `[0, len - visible_count]`. Tables that fit on one
//! screen never scroll.

use embedded_graphics::{
    mono_font::MonoTextStyle,
    pixelcolor::Rgb565,
    prelude::*,
    primitives::{PrimitiveStyle, Rectangle},
    text::Text,
};

use crate::input::{Button, InputFrame};
use crate::ui::theme::{layout, palette, ui_font_body};
use crate::ui::Header;

/// A row in a menu.
pub trait MenuOption: Copy {
    fn label(&self) -> &'static str;
}

/// What a navigator input produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction<T> {
    /// Nothing relevant happened this tick.
    None,
    /// Selection moved; `scrolled` is set when the window shifted too.
    Moved { previous: usize, scrolled: bool },
    /// Option chosen with Select.
    Committed(T),
    /// Back pressed; the owner decides where that leads.
    Back,
}

/// Selection and scroll state over a static option table.
#[derive(Debug, Clone)]
pub struct MenuNavigator<T: 'static> {
    title: &'static str,
    options: &'static [T],
    selected_index: usize,
    scroll_offset: usize,
    visible_count: usize,
}

impl<T: MenuOption> MenuNavigator<T> {
    pub fn new(title: &'static str, options: &'static [T], visible_count: usize) -> Self {
        Self {
            title,
            options,
            selected_index: 0,
            scroll_offset: 0,
            visible_count: visible_count.max(1),
        }
    }

    pub fn title(&self) -> &'static str {
        self.title
    }

    pub fn options(&self) -> &'static [T] {
        self.options
    }

    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    pub fn visible_count(&self) -> usize {
        self.visible_count
    }

    pub fn selected(&self) -> Option<T> {
        self.options.get(self.selected_index).copied()
    }

    /// Translate this tick's edges into one action. Up, Down, Select, Back
    /// are checked in that order and the first edge wins.
    pub fn handle(&mut self, input: &InputFrame) -> MenuAction<T> {
        if input.pressed(Button::Up) {
            self.on_up()
        } else if input.pressed(Button::Down) {
            self.on_down()
        } else if input.pressed(Button::Select) {
            self.on_select()
        } else if input.pressed(Button::Back) {
            self.on_back()
        } else {
            MenuAction::None
        }
    }

    pub fn on_up(&mut self) -> MenuAction<T> {
        let count = self.options.len();
        if count == 0 {
            return MenuAction::None;
        }
        let next = (self.selected_index + count - 1) % count;
        self.move_to(next)
    }

    pub fn on_down(&mut self) -> MenuAction<T> {
        let count = self.options.len();
        if count == 0 {
            return MenuAction::None;
        }
        let next = (self.selected_index + 1) % count;
        self.move_to(next)
    }

    pub fn on_select(&self) -> MenuAction<T> {
        match self.selected() {
            Some(option) => MenuAction::Committed(option),
            None => MenuAction::None,
        }
    }

    pub fn on_back(&self) -> MenuAction<T> {
        MenuAction::Back
    }

    fn move_to(&mut self, index: usize) -> MenuAction<T> {
        let previous = self.selected_index;
        let old_offset = self.scroll_offset;
        self.selected_index = index;
        self.auto_scroll();
        MenuAction::Moved {
            previous,
            scrolled: self.scroll_offset != old_offset,
        }
    }

    fn auto_scroll(&mut self) {
        let count = self.options.len();
        let window = self.visible_count;
        if count <= window {
            self.scroll_offset = 0;
            return;
        }
        if self.selected_index < self.scroll_offset {
            self.scroll_offset = self.selected_index;
        } else if self.selected_index >= self.scroll_offset + window {
            self.scroll_offset = self.selected_index + 1 - window;
        }
        self.scroll_offset = self.scroll_offset.min(count - window);
    }

    /// Clear the screen and draw title, visible rows and scroll indicator.
    pub fn render<D: DrawTarget<Color = Rgb565>>(&self, display: &mut D) -> Result<(), D::Error> {
        display.clear(palette::BACKGROUND)?;
        Header::new(self.title).render(display)?;
        self.render_window(display)
    }

    /// Repaint only what `action` changed; never clears the screen.
    pub fn render_action<D: DrawTarget<Color = Rgb565>>(
        &self,
        display: &mut D,
        action: &MenuAction<T>,
    ) -> Result<(), D::Error> {
        match *action {
            MenuAction::Moved { scrolled: true, .. } => self.render_window(display),
            MenuAction::Moved { previous, .. } => {
                self.render_row(display, previous)?;
                self.render_row(display, self.selected_index)
            }
            _ => Ok(()),
        }
    }

    fn render_window<D: DrawTarget<Color = Rgb565>>(&self, display: &mut D) -> Result<(), D::Error> {
        let end = (self.scroll_offset + self.visible_count).min(self.options.len());
        for index in self.scroll_offset..end {
            self.render_row(display, index)?;
        }
        self.render_scroll_indicator(display)
    }

    fn row_bounds(&self, slot: usize, display_width: u32) -> Rectangle {
        Rectangle::new(
            Point::new(0, layout::LIST_TOP + slot as i32 * layout::ROW_H),
            Size::new(
                display_width - layout::SCROLL_BAR_W - 1,
                layout::ROW_H as u32 - 2,
            ),
        )
    }

    fn render_row<D: DrawTarget<Color = Rgb565>>(
        &self,
        display: &mut D,
        index: usize,
    ) -> Result<(), D::Error> {
        if index < self.scroll_offset || index >= self.scroll_offset + self.visible_count {
            return Ok(());
        }
        let Some(option) = self.options.get(index) else {
            return Ok(());
        };
        let width = display.bounding_box().size.width;
        let bounds = self.row_bounds(index - self.scroll_offset, width);
        let selected = index == self.selected_index;

        let fill = if selected {
            palette::HIGHLIGHT
        } else {
            palette::BACKGROUND
        };
        bounds
            .into_styled(PrimitiveStyle::with_fill(fill))
            .draw(display)?;

        let text_color = if selected {
            palette::TEXT
        } else {
            palette::ACCENT
        };
        let marker = if selected { ">" } else { " " };
        let style = MonoTextStyle::new(ui_font_body(), text_color);
        let baseline = bounds.top_left.y + layout::ROW_TEXT_Y;
        Text::new(marker, Point::new(layout::MARGIN, baseline), style).draw(display)?;
        Text::new(
            option.label(),
            Point::new(layout::MARGIN + 10, baseline),
            style,
        )
        .draw(display)?;
        Ok(())
    }

    fn render_scroll_indicator<D: DrawTarget<Color = Rgb565>>(
        &self,
        display: &mut D,
    ) -> Result<(), D::Error> {
        let count = self.options.len();
        if count <= self.visible_count {
            return Ok(());
        }
        let width = display.bounding_box().size.width;
        let track_h = self.visible_count as u32 * layout::ROW_H as u32;
        let x = (width - layout::SCROLL_BAR_W) as i32;
        let track = Rectangle::new(
            Point::new(x, layout::LIST_TOP),
            Size::new(layout::SCROLL_BAR_W, track_h),
        );
        track
            .into_styled(PrimitiveStyle::with_fill(palette::MUTED))
            .draw(display)?;

        let thumb_h = (track_h * self.visible_count as u32 / count as u32).max(4);
        let max_offset = (count - self.visible_count) as u32;
        let thumb_y = (track_h - thumb_h) * self.scroll_offset as u32 / max_offset;
        Rectangle::new(
            Point::new(x, layout::LIST_TOP + thumb_y as i32),
            Size::new(layout::SCROLL_BAR_W, thumb_h),
        )
        .into_styled(PrimitiveStyle::with_fill(palette::ACCENT))
        .draw(display)
    }
}
