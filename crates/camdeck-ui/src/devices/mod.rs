//! Narrow interfaces to the hardware collaborators.
//!
//! Activities never talk to drivers directly. The firmware, the simulator
//! and the tests each plug their own implementations into [`Devices`].

mod assistant;
mod camera;
mod recorder;
mod storage;

pub use assistant::{AssistantError, AssistantService};
pub use camera::{Camera, CameraError, Frame};
pub use recorder::{Recorder, RecorderError, Recording};
pub use storage::{PhotoInfo, PhotoStore, StorageError};

use alloc::boxed::Box;

/// The set of collaborators handed to every activity through the context.
pub struct Devices {
    pub camera: Box<dyn Camera>,
    pub photos: Box<dyn PhotoStore>,
    pub recorder: Box<dyn Recorder>,
    pub assistant: Box<dyn AssistantService>,
}

impl Devices {
    pub fn new(
        camera: Box<dyn Camera>,
        photos: Box<dyn PhotoStore>,
        recorder: Box<dyn Recorder>,
        assistant: Box<dyn AssistantService>,
    ) -> Self {
        Self {
            camera,
            photos,
            recorder,
            assistant,
        }
    }
}
