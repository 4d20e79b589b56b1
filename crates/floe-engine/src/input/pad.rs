use log::debug;

use crate::api::config::{KeyBindings, SimConfig};
use crate::api::types::Direction;
use crate::input::queue::InputEvent;

/// Folds key and swipe events into the per-tick direction mask and grab state.
///
/// Held keys stay in the mask until released. A swipe, or a key pressed and
/// released before the next tick, shows up as a one-tick pulse so that quick
/// taps are never lost. The grab key only counts while held.
#[derive(Debug, Clone)]
pub struct DirectionPad {
    bindings: KeyBindings,
    swipe_min_length: f32,
    held: Direction,
    pulse: Direction,
    grab: bool,
}

impl DirectionPad {
    pub fn new(bindings: KeyBindings, swipe_min_length: f32) -> Self {
        Self {
            bindings,
            swipe_min_length,
            held: Direction::NONE,
            pulse: Direction::NONE,
            grab: false,
        }
    }

    pub fn from_config(config: &SimConfig) -> Self {
        Self::new(config.bindings.clone(), config.swipe_min_length)
    }

    pub fn handle(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::KeyDown { key_code } if self.bindings.is_grab(key_code) => {
                self.grab = true;
            }
            InputEvent::KeyUp { key_code } if self.bindings.is_grab(key_code) => {
                self.grab = false;
            }
            InputEvent::KeyDown { key_code } => {
                if let Some(dir) = self.bindings.direction_for(key_code) {
                    self.held = self.held | dir;
                    self.pulse = self.pulse | dir;
                }
            }
            InputEvent::KeyUp { key_code } => {
                if let Some(dir) = self.bindings.direction_for(key_code) {
                    self.held = self.held.without(dir);
                }
            }
            InputEvent::Swipe { dx, dy } => {
                if let Some(dir) = self.swipe_direction(dx, dy) {
                    self.pulse = self.pulse | dir;
                }
            }
            InputEvent::Custom { .. } => {}
        }
    }

    /// Dominant axis of a swipe, or `None` when it is too short.
    fn swipe_direction(&self, dx: f32, dy: f32) -> Option<Direction> {
        if (dx * dx + dy * dy).sqrt() < self.swipe_min_length {
            debug!("ignoring short swipe ({dx}, {dy})");
            return None;
        }
        let dir = if dx.abs() >= dy.abs() {
            if dx > 0.0 { Direction::RIGHT } else { Direction::LEFT }
        } else if dy > 0.0 {
            Direction::DOWN
        } else {
            Direction::UP
        };
        Some(dir)
    }

    /// Mask for the coming tick.
    pub fn mask(&self) -> Direction {
        self.held | self.pulse
    }

    pub fn grab_held(&self) -> bool {
        self.grab
    }

    /// Clear one-tick pulses once a tick has consumed them.
    pub fn end_tick(&mut self) {
        self.pulse = Direction::NONE;
    }

    pub fn clear(&mut self) {
        self.held = Direction::NONE;
        self.pulse = Direction::NONE;
        self.grab = false;
    }
}

impl Default for DirectionPad {
    fn default() -> Self {
        Self::from_config(&SimConfig::default())
    }
}
