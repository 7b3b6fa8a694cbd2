//! Presentation-layer interfaces
//!
//! The simulation never touches UI, audio or drawing directly. It calls these
//! traits, and any failure they report is logged and dropped at this boundary.

use thiserror::Error;

use crate::Tuning;
use crate::consts::SKY_COLOR;
use crate::sim::{Bird, ObstacleField, Playfield};

/// Failure inside a presentation collaborator
#[derive(Debug, Error)]
pub enum HookError {
    #[error("audio failed: {0}")]
    Audio(String),
    #[error("missing element #{0}")]
    MissingElement(String),
    #[error("render failed: {0}")]
    Render(String),
}

pub type HookResult = Result<(), HookError>;

/// Callbacks fired on state transitions
pub trait GameHooks {
    /// Entered PLAYING (first start or restart)
    fn on_enter_playing(&mut self) -> HookResult;
    fn on_enter_game_over(&mut self, final_score: u32) -> HookResult;
    fn on_enter_win(&mut self, final_score: u32) -> HookResult;
    /// HUD counter update
    fn on_score_changed(&mut self, _score: u32) -> HookResult {
        Ok(())
    }
}

/// Hooks that do nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHooks;

impl GameHooks for NoopHooks {
    fn on_enter_playing(&mut self) -> HookResult {
        Ok(())
    }
    fn on_enter_game_over(&mut self, _final_score: u32) -> HookResult {
        Ok(())
    }
    fn on_enter_win(&mut self, _final_score: u32) -> HookResult {
        Ok(())
    }
}

/// Log and swallow a collaborator failure
pub fn report(hook: &str, result: HookResult) {
    if let Err(e) = result {
        log::warn!("{} hook failed: {}", hook, e);
    }
}

/// Background description handed to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Background {
    pub color: [u8; 3],
}

impl Default for Background {
    fn default() -> Self {
        Self { color: SKY_COLOR }
    }
}

impl Background {
    /// CSS hex form, e.g. `#70c5ce`
    pub fn css(&self) -> String {
        format!(
            "#{:02x}{:02x}{:02x}",
            self.color[0], self.color[1], self.color[2]
        )
    }
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, Copy)]
pub struct RenderFrame<'a> {
    pub bird: &'a Bird,
    pub obstacles: &'a ObstacleField,
    pub background: Background,
    pub playfield: Playfield,
    pub tuning: &'a Tuning,
}

/// Draw primitive, called once per tick
pub trait Renderer {
    /// Clear the drawable surface
    fn clear(&mut self);
    fn render(&mut self, frame: &RenderFrame<'_>) -> HookResult;
}

/// Renderer that draws nothing (headless runs and tests)
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn clear(&mut self) {}
    fn render(&mut self, _frame: &RenderFrame<'_>) -> HookResult {
        Ok(())
    }
}

/// Scheduling primitive - asks the host for one more tick
pub trait FrameScheduler {
    fn request_next_frame(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_background_css() {
        assert_eq!(Background::default().css(), "#70c5ce");
    }

    #[test]
    fn test_report_swallows_errors() {
        report("test", Err(HookError::Audio("no context".into())));
        report("test", Ok(()));
    }
}
