//! Photo gallery: thumbnail grid, full-screen viewer and delete confirm.

use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use embedded_graphics::{
    mono_font::MonoTextStyle,
    pixelcolor::Rgb565,
    prelude::*,
    primitives::{PrimitiveStyle, Rectangle},
    text::{Alignment, Text},
};

use crate::config::Config;
use crate::devices::{Frame, PhotoInfo, StorageError};
use crate::input::Button;
use crate::mode::Mode;
use crate::ui::theme::{layout, ui_font_body, ui_font_small};
use crate::ui::{draw_wrapped, palette, Activity, Banner, Context, Header};

const GRID_COLS: usize = 3;
const CELL_W: i32 = 38;
const CELL_H: i32 = 54;
const CELL_GAP: i32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotosState {
    List,
    Viewing,
    ConfirmDelete,
}

pub struct PhotosActivity {
    state: PhotosState,
    per_page: usize,
    photos: Vec<PhotoInfo>,
    list_error: Option<StorageError>,
    selected: usize,
    /// Decoded photo on screen; dropped when leaving the viewer.
    image: Option<Frame>,
    load_error: Option<String>,
}

impl PhotosActivity {
    pub fn new(config: &Config) -> Self {
        Self {
            state: PhotosState::List,
            per_page: config.photos_per_page.max(1),
            photos: Vec::new(),
            list_error: None,
            selected: 0,
            image: None,
            load_error: None,
        }
    }

    pub fn state(&self) -> PhotosState {
        self.state
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn photo_count(&self) -> usize {
        self.photos.len()
    }

    pub fn holds_image(&self) -> bool {
        self.image.is_some()
    }

    fn refresh<D: DrawTarget<Color = Rgb565>>(&mut self, ctx: &mut Context<'_, D>) {
        match ctx.devices.photos.list(ctx.config.max_photos) {
            Ok(photos) => {
                log::info!("Found {} photos", photos.len());
                self.photos = photos;
                self.list_error = None;
            }
            Err(err) => {
                log::warn!("Photo listing failed: {}", err);
                self.photos.clear();
                self.list_error = Some(err);
            }
        }
        self.selected = self.selected.min(self.photos.len().saturating_sub(1));
    }

    fn open<D: DrawTarget<Color = Rgb565>>(
        &mut self,
        ctx: &mut Context<'_, D>,
    ) -> Result<(), D::Error> {
        self.image = None;
        self.load_error = None;
        if let Some(photo) = self.photos.get(self.selected) {
            match ctx.devices.photos.load(&photo.name) {
                Ok(frame) => self.image = Some(frame),
                Err(err) => {
                    log::warn!("Could not open {}: {}", photo.name, err);
                    self.load_error = Some(err.to_string());
                }
            }
        }
        self.state = PhotosState::Viewing;
        self.render_viewer(ctx.display)
    }

    fn close_viewer<D: DrawTarget<Color = Rgb565>>(
        &mut self,
        display: &mut D,
    ) -> Result<(), D::Error> {
        self.image = None;
        self.load_error = None;
        self.state = PhotosState::List;
        self.render_list(display)
    }

    fn render_list<D: DrawTarget<Color = Rgb565>>(&self, display: &mut D) -> Result<(), D::Error> {
        if let Some(err) = &self.list_error {
            let detail = format!("{}. Press BACK.", err);
            return Banner::new("SD Card Error", palette::ERROR)
                .detail(&detail)
                .render(display);
        }
        if self.photos.is_empty() {
            return Banner::new("Photos", palette::WARNING)
                .detail("No photos found")
                .render(display);
        }

        display.clear(palette::BACKGROUND)?;
        let title = format!("PHOTOS ({})", self.photos.len());
        Header::new(&title).render(display)?;

        let per_page = self.per_page;
        let page = self.selected / per_page;
        let first = page * per_page;
        let last = (first + per_page).min(self.photos.len());
        for (slot, index) in (first..last).enumerate() {
            self.render_cell(display, slot, index)?;
        }

        let pages = self.photos.len().div_ceil(per_page);
        let footer = format!("{}/{}", page + 1, pages);
        Text::with_alignment(
            &footer,
            Point::new(display.bounding_box().center().x, layout::FOOTER_TEXT_Y),
            MonoTextStyle::new(ui_font_small(), palette::MUTED),
            Alignment::Center,
        )
        .draw(display)?;
        Ok(())
    }

    fn render_cell<D: DrawTarget<Color = Rgb565>>(
        &self,
        display: &mut D,
        slot: usize,
        index: usize,
    ) -> Result<(), D::Error> {
        let Some(photo) = self.photos.get(index) else {
            return Ok(());
        };
        let col = (slot % GRID_COLS) as i32;
        let row = (slot / GRID_COLS) as i32;
        let cell = Rectangle::new(
            Point::new(
                layout::MARGIN + col * (CELL_W + CELL_GAP),
                layout::LIST_TOP + row * (CELL_H + CELL_GAP),
            ),
            Size::new(CELL_W as u32, CELL_H as u32),
        );
        cell.into_styled(PrimitiveStyle::with_fill(palette::BACKGROUND))
            .draw(display)?;
        let selected = index == self.selected;
        let style = if selected {
            PrimitiveStyle::with_fill(palette::HIGHLIGHT)
        } else {
            PrimitiveStyle::with_stroke(palette::MUTED, 1)
        };
        cell.into_styled(style).draw(display)?;

        Text::with_alignment(
            short_name(&photo.name),
            cell.center() + Point::new(0, 3),
            MonoTextStyle::new(ui_font_small(), palette::TEXT),
            Alignment::Center,
        )
        .draw(display)?;
        Ok(())
    }

    fn render_viewer<D: DrawTarget<Color = Rgb565>>(
        &self,
        display: &mut D,
    ) -> Result<(), D::Error> {
        display.clear(palette::BACKGROUND)?;
        let bounds = display.bounding_box();

        match (&self.image, &self.load_error) {
            (Some(frame), _) => {
                let x = (bounds.size.width.saturating_sub(frame.width) / 2) as i32;
                let y = (layout::VIEWPORT_H.saturating_sub(frame.height) / 2) as i32;
                frame.draw(display, Point::new(x, y))?;
            }
            (None, Some(err)) => {
                Text::with_alignment(
                    "Cannot open photo",
                    Point::new(bounds.center().x, 50),
                    MonoTextStyle::new(ui_font_body(), palette::ERROR),
                    Alignment::Center,
                )
                .draw(display)?;
                draw_wrapped(
                    display,
                    err,
                    Rectangle::new(Point::new(layout::MARGIN, 62), Size::new(118, 40)),
                    palette::TEXT,
                )?;
            }
            (None, None) => {}
        }

        let footer = format!(
            "{}/{}  UP:delete",
            self.selected + 1,
            self.photos.len().max(1)
        );
        Text::new(
            &footer,
            Point::new(layout::MARGIN, layout::FOOTER_TEXT_Y),
            MonoTextStyle::new(ui_font_small(), palette::MUTED),
        )
        .draw(display)?;
        Ok(())
    }

    fn render_confirm<D: DrawTarget<Color = Rgb565>>(
        &self,
        display: &mut D,
    ) -> Result<(), D::Error> {
        let name = self
            .photos
            .get(self.selected)
            .map_or("", |photo| photo.name.as_str());
        let detail = format!("{}\nUP: delete\nother: cancel", name);
        Banner::new("Delete?", palette::ERROR)
            .detail(&detail)
            .render(display)
    }

    /// Step the grid selection. Within a page only the two affected cells
    /// are redrawn; crossing a page boundary repaints the whole list.
    fn move_selection<D: DrawTarget<Color = Rgb565>>(
        &mut self,
        display: &mut D,
        forward: bool,
    ) -> Result<(), D::Error> {
        let previous = self.selected;
        self.step_selection(forward);
        let page = self.selected / self.per_page;
        if previous / self.per_page != page {
            return self.render_list(display);
        }
        let first = page * self.per_page;
        self.render_cell(display, previous - first, previous)?;
        self.render_cell(display, self.selected - first, self.selected)
    }

    fn step_selection(&mut self, forward: bool) {
        let count = self.photos.len();
        if count == 0 {
            return;
        }
        self.selected = if forward {
            (self.selected + 1) % count
        } else {
            (self.selected + count - 1) % count
        };
    }

    fn update_list<D: DrawTarget<Color = Rgb565>>(
        &mut self,
        ctx: &mut Context<'_, D>,
    ) -> Result<(), D::Error> {
        let input = ctx.input;
        if self.photos.is_empty() {
            // Select retries after the card is reinserted.
            if input.pressed(Button::Select) {
                self.refresh(ctx);
                self.render_list(ctx.display)?;
            }
            return Ok(());
        }
        if input.pressed(Button::Up) {
            self.move_selection(ctx.display, false)
        } else if input.pressed(Button::Down) {
            self.move_selection(ctx.display, true)
        } else if input.pressed(Button::Select) {
            self.open(ctx)
        } else {
            Ok(())
        }
    }

    fn update_viewer<D: DrawTarget<Color = Rgb565>>(
        &mut self,
        ctx: &mut Context<'_, D>,
    ) -> Result<(), D::Error> {
        let input = ctx.input;
        if input.pressed(Button::Up) {
            if self.photos.is_empty() {
                return Ok(());
            }
            self.state = PhotosState::ConfirmDelete;
            self.render_confirm(ctx.display)
        } else if input.pressed(Button::Down) {
            self.step_selection(true);
            self.open(ctx)
        } else if input.pressed(Button::Select) {
            self.step_selection(false);
            self.open(ctx)
        } else {
            Ok(())
        }
    }

    fn update_confirm<D: DrawTarget<Color = Rgb565>>(
        &mut self,
        ctx: &mut Context<'_, D>,
    ) -> Result<(), D::Error> {
        let input = ctx.input;
        if input.pressed(Button::Up) {
            if let Some(photo) = self.photos.get(self.selected) {
                match ctx.devices.photos.delete(&photo.name) {
                    Ok(()) => log::info!("Deleted {}", photo.name),
                    Err(err) => log::warn!("Delete of {} failed: {}", photo.name, err),
                }
            }
            self.refresh(ctx);
            self.close_viewer(ctx.display)
        } else if input.any_pressed() {
            self.state = PhotosState::Viewing;
            self.render_viewer(ctx.display)
        } else {
            Ok(())
        }
    }
}

/// Part of the file name that fits in a grid cell.
fn short_name(name: &str) -> &str {
    let stem = name.strip_suffix(".jpg").unwrap_or(name);
    let tail = stem.rsplit('_').next().unwrap_or(stem);
    match tail.char_indices().nth(6) {
        Some((cut, _)) => &tail[..cut],
        None => tail,
    }
}

impl<D: DrawTarget<Color = Rgb565>> Activity<D> for PhotosActivity {
    fn enter(&mut self, ctx: &mut Context<'_, D>) -> Result<(), D::Error> {
        self.state = PhotosState::List;
        self.image = None;
        self.load_error = None;
        self.refresh(ctx);
        self.render_list(ctx.display)
    }

    fn update(&mut self, ctx: &mut Context<'_, D>) -> Result<(), D::Error> {
        match self.state {
            PhotosState::ConfirmDelete => self.update_confirm(ctx),
            PhotosState::Viewing if ctx.input.pressed(Button::Back) => {
                self.close_viewer(ctx.display)
            }
            PhotosState::Viewing => self.update_viewer(ctx),
            PhotosState::List if ctx.input.pressed(Button::Back) => {
                ctx.request_transition(Mode::Photos.parent());
                Ok(())
            }
            PhotosState::List => self.update_list(ctx),
        }
    }

    fn exit(&mut self, _devices: &mut crate::devices::Devices) {
        self.image = None;
        self.load_error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::ButtonLevels;
    use crate::mock::{ActivityRig, MockHandles, MockPhotoStore};

    fn rig_with(count: usize) -> ActivityRig {
        ActivityRig::with_handles(MockHandles {
            photos: MockPhotoStore::with_photos(count),
            ..MockHandles::new()
        })
    }

    #[test]
    fn list_wraps_in_both_directions() {
        let mut rig = rig_with(8);
        let mut photos = PhotosActivity::new(&rig.config);
        rig.enter(&mut photos);
        assert_eq!(photos.photo_count(), 8);
        rig.press(&mut photos, Button::Up);
        assert_eq!(photos.selected(), 7);
        rig.press(&mut photos, Button::Down);
        assert_eq!(photos.selected(), 0);
    }

    #[test]
    fn moving_within_a_page_redraws_only_two_cells() {
        use crate::test_display::TestDisplay;

        let mut rig = rig_with(8);
        let mut photos = PhotosActivity::new(&rig.config);
        rig.enter(&mut photos);
        let header = rig.display.region_hash(0, 0, 128, layout::HEADER_H as u32);

        rig.display.reset_draw_count();
        rig.step(&mut photos, ButtonLevels::NONE.with(Button::Down));
        assert_eq!(photos.selected(), 1);
        let cells = 2 * (CELL_W * CELL_H) as usize;
        assert!(rig.display.draw_count() > 0);
        assert!(rig.display.draw_count() <= 3 * cells);
        assert_eq!(
            rig.display.region_hash(0, 0, 128, layout::HEADER_H as u32),
            header
        );

        let mut fresh = TestDisplay::default_size();
        photos.render_list(&mut fresh).unwrap();
        assert_eq!(fresh.pixels(), rig.display.pixels());
    }

    #[test]
    fn moving_across_a_page_repaints_the_list() {
        let mut rig = rig_with(8);
        let mut photos = PhotosActivity::new(&rig.config);
        rig.enter(&mut photos);
        rig.display.reset_draw_count();
        rig.step(&mut photos, ButtonLevels::NONE.with(Button::Up));
        assert_eq!(photos.selected(), 7);
        assert!(rig.display.draw_count() >= 128 * 160);
    }

    #[test]
    fn viewer_steps_and_back_frees_image() {
        let mut rig = rig_with(3);
        let mut photos = PhotosActivity::new(&rig.config);
        rig.enter(&mut photos);
        rig.press(&mut photos, Button::Select);
        assert_eq!(photos.state(), PhotosState::Viewing);
        assert!(photos.holds_image());

        rig.press(&mut photos, Button::Select);
        assert_eq!(photos.selected(), 2);
        rig.press(&mut photos, Button::Down);
        assert_eq!(photos.selected(), 0);
        assert_eq!(rig.handles.photos.0.borrow().loads, 3);

        assert_eq!(rig.press(&mut photos, Button::Back), None);
        assert_eq!(photos.state(), PhotosState::List);
        assert!(!photos.holds_image());
        assert_eq!(rig.press(&mut photos, Button::Back), Some(Mode::Menu));
    }

    #[test]
    fn confirm_delete_removes_photo_and_clamps_selection() {
        let mut rig = rig_with(2);
        let mut photos = PhotosActivity::new(&rig.config);
        rig.enter(&mut photos);
        rig.press(&mut photos, Button::Up);
        rig.press(&mut photos, Button::Select);
        rig.press(&mut photos, Button::Up);
        assert_eq!(photos.state(), PhotosState::ConfirmDelete);

        rig.press(&mut photos, Button::Up);
        assert_eq!(photos.state(), PhotosState::List);
        assert_eq!(rig.handles.photos.names(), ["IMG_0001.jpg"]);
        assert_eq!(photos.selected(), 0);
    }

    #[test]
    fn any_other_button_cancels_delete() {
        let mut rig = rig_with(2);
        let mut photos = PhotosActivity::new(&rig.config);
        rig.enter(&mut photos);
        rig.press(&mut photos, Button::Select);
        rig.press(&mut photos, Button::Up);
        assert_eq!(rig.press(&mut photos, Button::Back), None);
        assert_eq!(photos.state(), PhotosState::Viewing);
        assert_eq!(rig.handles.photos.names().len(), 2);
    }

    #[test]
    fn unmounted_card_shows_error_and_back_works() {
        let mut rig = ActivityRig::with_handles(MockHandles {
            photos: MockPhotoStore::new(false),
            ..MockHandles::new()
        });
        let mut photos = PhotosActivity::new(&rig.config);
        rig.enter(&mut photos);
        assert!(rig.display.count_color(palette::ERROR) > 0);
        assert_eq!(rig.press(&mut photos, Button::Select), None);
        assert_eq!(photos.state(), PhotosState::List);
        assert_eq!(rig.press(&mut photos, Button::Back), Some(Mode::Menu));
    }

    #[test]
    fn empty_directory_is_not_an_error() {
        let mut rig = rig_with(0);
        let mut photos = PhotosActivity::new(&rig.config);
        rig.enter(&mut photos);
        assert_eq!(photos.photo_count(), 0);
        assert_eq!(rig.display.count_color(palette::ERROR), 0);
        assert_eq!(rig.press(&mut photos, Button::Back), Some(Mode::Menu));
    }

    #[test]
    fn grid_labels_use_name_tail() {
        assert_eq!(short_name("IMG_0007.jpg"), "0007");
        assert_eq!(short_name("IMG_123456789.jpg"), "123456");
        assert_eq!(short_name("holiday"), "holida");
    }
}
