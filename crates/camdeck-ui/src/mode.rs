//! Mode registry: every top-level activity and the options of the three menus.

use crate::menu::MenuOption;

/// The single current top-level activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Menu,
    Camera,
    Photos,
    FaceRecognitionMenu,
    FaceEnroll,
    FaceRecognize,
    ObjectDetection,
    AiAssistant,
    GameMenu,
    Snake,
    Pong,
    Breakout,
    FlappyBird,
    Memory,
}

impl Mode {
    pub const ALL: [Mode; 14] = [
        Mode::Menu,
        Mode::Camera,
        Mode::Photos,
        Mode::FaceRecognitionMenu,
        Mode::FaceEnroll,
        Mode::FaceRecognize,
        Mode::ObjectDetection,
        Mode::AiAssistant,
        Mode::GameMenu,
        Mode::Snake,
        Mode::Pong,
        Mode::Breakout,
        Mode::FlappyBird,
        Mode::Memory,
    ];

    /// Position in [`Mode::ALL`]; used as the registry slot.
    pub const fn index(self) -> usize {
        match self {
            Mode::Menu => 0,
            Mode::Camera => 1,
            Mode::Photos => 2,
            Mode::FaceRecognitionMenu => 3,
            Mode::FaceEnroll => 4,
            Mode::FaceRecognize => 5,
            Mode::ObjectDetection => 6,
            Mode::AiAssistant => 7,
            Mode::GameMenu => 8,
            Mode::Snake => 9,
            Mode::Pong => 10,
            Mode::Breakout => 11,
            Mode::FlappyBird => 12,
            Mode::Memory => 13,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Mode::Menu => "Menu",
            Mode::Camera => "Camera",
            Mode::Photos => "Photos",
            Mode::FaceRecognitionMenu => "Face Recognition",
            Mode::FaceEnroll => "Enroll Face",
            Mode::FaceRecognize => "Recognize",
            Mode::ObjectDetection => "Object Detection",
            Mode::AiAssistant => "AI Assistant",
            Mode::GameMenu => "Games",
            Mode::Snake => "Snake",
            Mode::Pong => "Pong",
            Mode::Breakout => "Breakout",
            Mode::FlappyBird => "Flappy Bird",
            Mode::Memory => "Memory Game",
        }
    }

    /// Where Back from this mode leads.
    pub const fn parent(self) -> Mode {
        match self {
            Mode::FaceEnroll | Mode::FaceRecognize => Mode::FaceRecognitionMenu,
            Mode::Snake | Mode::Pong | Mode::Breakout | Mode::FlappyBird | Mode::Memory => {
                Mode::GameMenu
            }
            _ => Mode::Menu,
        }
    }
}

/// Entries of the main menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainMenuOption {
    Camera,
    Photos,
    FaceRecognition,
    ObjectDetection,
    AiAssistant,
    Games,
}

impl MainMenuOption {
    pub const ALL: [MainMenuOption; 6] = [
        MainMenuOption::Camera,
        MainMenuOption::Photos,
        MainMenuOption::FaceRecognition,
        MainMenuOption::ObjectDetection,
        MainMenuOption::AiAssistant,
        MainMenuOption::Games,
    ];

    pub const fn target(self) -> Mode {
        match self {
            MainMenuOption::Camera => Mode::Camera,
            MainMenuOption::Photos => Mode::Photos,
            MainMenuOption::FaceRecognition => Mode::FaceRecognitionMenu,
            MainMenuOption::ObjectDetection => Mode::ObjectDetection,
            MainMenuOption::AiAssistant => Mode::AiAssistant,
            MainMenuOption::Games => Mode::GameMenu,
        }
    }
}

impl MenuOption for MainMenuOption {
    fn label(&self) -> &'static str {
        self.target().label()
    }
}

/// Entries of the game menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOption {
    Snake,
    Pong,
    Breakout,
    FlappyBird,
    Memory,
}

impl GameOption {
    pub const ALL: [GameOption; 5] = [
        GameOption::Snake,
        GameOption::Pong,
        GameOption::Breakout,
        GameOption::FlappyBird,
        GameOption::Memory,
    ];

    pub const fn target(self) -> Mode {
        match self {
            GameOption::Snake => Mode::Snake,
            GameOption::Pong => Mode::Pong,
            GameOption::Breakout => Mode::Breakout,
            GameOption::FlappyBird => Mode::FlappyBird,
            GameOption::Memory => Mode::Memory,
        }
    }
}

impl MenuOption for GameOption {
    fn label(&self) -> &'static str {
        self.target().label()
    }
}

/// Entries of the face recognition menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceMenuOption {
    Enroll,
    Recognize,
    ViewDatabase,
    DeleteAll,
    Back,
}

impl FaceMenuOption {
    pub const ALL: [FaceMenuOption; 5] = [
        FaceMenuOption::Enroll,
        FaceMenuOption::Recognize,
        FaceMenuOption::ViewDatabase,
        FaceMenuOption::DeleteAll,
        FaceMenuOption::Back,
    ];

    /// Mode this option leaves for, `None` for options handled in place.
    pub const fn target(self) -> Option<Mode> {
        match self {
            FaceMenuOption::Enroll => Some(Mode::FaceEnroll),
            FaceMenuOption::Recognize => Some(Mode::FaceRecognize),
            FaceMenuOption::ViewDatabase | FaceMenuOption::DeleteAll => None,
            FaceMenuOption::Back => Some(Mode::Menu),
        }
    }
}

impl MenuOption for FaceMenuOption {
    fn label(&self) -> &'static str {
        match self {
            FaceMenuOption::Enroll => "Enroll Face",
            FaceMenuOption::Recognize => "Recognize",
            FaceMenuOption::ViewDatabase => "View Database",
            FaceMenuOption::DeleteAll => "Delete All",
            FaceMenuOption::Back => "Back",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_matches_position_in_all() {
        for (i, mode) in Mode::ALL.iter().enumerate() {
            assert_eq!(mode.index(), i);
        }
    }

    #[test]
    fn main_menu_targets_are_distinct_top_level_modes() {
        let targets: alloc::vec::Vec<Mode> =
            MainMenuOption::ALL.iter().map(|o| o.target()).collect();
        assert_eq!(targets[2], Mode::FaceRecognitionMenu);
        assert_eq!(targets[5], Mode::GameMenu);
        for t in &targets {
            assert_eq!(t.parent(), Mode::Menu);
        }
    }

    #[test]
    fn games_return_to_game_menu() {
        for game in GameOption::ALL {
            assert_eq!(game.target().parent(), Mode::GameMenu);
        }
        assert_eq!(Mode::GameMenu.parent(), Mode::Menu);
    }

    #[test]
    fn face_menu_in_place_options_have_no_target() {
        assert_eq!(FaceMenuOption::ViewDatabase.target(), None);
        assert_eq!(FaceMenuOption::DeleteAll.target(), None);
        assert_eq!(FaceMenuOption::Back.target(), Some(Mode::Menu));
        assert_eq!(Mode::FaceEnroll.parent(), Mode::FaceRecognitionMenu);
    }
}
