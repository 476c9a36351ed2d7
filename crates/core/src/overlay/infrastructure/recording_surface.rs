use std::sync::{Arc, Mutex};

use crate::overlay::domain::draw_command::DrawCommand;
use crate::overlay::domain::overlay_surface::OverlaySurface;

#[derive(Default)]
struct Recorded {
    commands: Vec<DrawCommand>,
    revision: u64,
}

/// Overlay surface that keeps the latest command list in shared memory.
///
/// Clones share the same state: the capture loop presents into one handle
/// while a GUI canvas reads from another. `revision` bumps on every change so
/// readers can skip redundant redraws.
#[derive(Clone)]
pub struct RecordingSurface {
    size: (u32, u32),
    state: Arc<Mutex<Recorded>>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: (width, height),
            state: Arc::new(Mutex::new(Recorded::default())),
        }
    }

    pub fn commands(&self) -> Vec<DrawCommand> {
        self.lock().commands.clone()
    }

    pub fn revision(&self) -> u64 {
        self.lock().revision
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Recorded> {
        // A poisoned lock only means a reader panicked mid-clone; the data is
        // still a complete command list.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl OverlaySurface for RecordingSurface {
    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn present(&mut self, commands: Vec<DrawCommand>) {
        let mut state = self.lock();
        state.commands = commands;
        state.revision += 1;
    }

    fn clear(&mut self) {
        let mut state = self.lock();
        state.commands.clear();
        state.revision += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_presented_commands() {
        let reader = RecordingSurface::new(640, 480);
        let mut writer = reader.clone();

        writer.present(vec![DrawCommand::Clear {
            width: 640,
            height: 480,
        }]);

        assert_eq!(reader.commands().len(), 1);
        assert_eq!(reader.revision(), 1);
        assert_eq!(reader.size(), (640, 480));
    }

    #[test]
    fn test_clear_empties_and_bumps_revision() {
        let mut surface = RecordingSurface::new(10, 10);
        surface.present(vec![DrawCommand::Clear {
            width: 10,
            height: 10,
        }]);
        surface.clear();

        assert!(surface.commands().is_empty());
        assert_eq!(surface.revision(), 2);
    }
}
