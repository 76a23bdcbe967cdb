//! Animation timers and presets
//!
//! Button presses and wheel spin are continuous functions of elapsed active
//! time, advanced by a fixed frame increment. Presets drive the placement
//! parameters from an animation clock that only runs while enabled. Nothing
//! here writes back into the UI: the values the presets produce are reported
//! as [`AnimatedOutputs`] and a UI layer decides what to do with them.

use std::f32::consts::PI;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::gfx::input::{AnimationTriggers, InputSnapshot};

/// Fixed per-frame time step
pub const FRAME_TIME: f32 = 1.0 / 60.0;

pub const PRESS_DURATION: f32 = 0.2;
/// Kept below the button's half height so a pressed button never sinks
/// through the shell.
pub const PRESS_DEPTH: f32 = 0.004;

pub const SCROLL_DURATION: f32 = 0.5;
/// Degrees per second while scrolling
pub const SCROLL_SPEED: f32 = 720.0;

/// `depth · sin(π · min(elapsed / duration, 1))`
pub fn press_offset(elapsed: f32, duration: f32, depth: f32) -> f32 {
    if duration <= 0.0 {
        return 0.0;
    }
    let phase = (elapsed / duration).clamp(0.0, 1.0);
    depth * (PI * phase).sin()
}

/// A one-shot down-and-up motion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PressAnimation {
    active: bool,
    elapsed: f32,
    pub duration: f32,
    pub depth: f32,
}

impl Default for PressAnimation {
    fn default() -> Self {
        Self::new(PRESS_DURATION, PRESS_DEPTH)
    }
}

impl PressAnimation {
    pub fn new(duration: f32, depth: f32) -> Self {
        Self {
            active: false,
            elapsed: 0.0,
            duration,
            depth,
        }
    }

    /// Restarts the cycle from the top, even if one is already running
    pub fn start(&mut self) {
        self.active = true;
        self.elapsed = 0.0;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Advances the timer. Returns `true` on the step that completes a cycle.
    pub fn advance(&mut self, dt: f32) -> bool {
        if !self.active {
            return false;
        }
        self.elapsed += dt;
        if self.elapsed >= self.duration {
            self.active = false;
            self.elapsed = 0.0;
            return true;
        }
        false
    }

    pub fn offset(&self) -> f32 {
        if !self.active {
            return 0.0;
        }
        press_offset(self.elapsed, self.duration, self.depth)
    }
}

/// Wheel spin: the angle keeps accumulating across scroll events
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollAnimation {
    active: bool,
    elapsed: f32,
    angle: f32,
    pub duration: f32,
    pub speed: f32,
}

impl Default for ScrollAnimation {
    fn default() -> Self {
        Self::new(SCROLL_DURATION, SCROLL_SPEED)
    }
}

impl ScrollAnimation {
    pub fn new(duration: f32, speed: f32) -> Self {
        Self {
            active: false,
            elapsed: 0.0,
            angle: 0.0,
            duration,
            speed,
        }
    }

    pub fn start(&mut self) {
        self.active = true;
        self.elapsed = 0.0;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn advance(&mut self, dt: f32) -> bool {
        if !self.active {
            return false;
        }
        self.angle += self.speed * dt;
        self.elapsed += dt;
        if self.elapsed >= self.duration {
            self.active = false;
            self.elapsed = 0.0;
            return true;
        }
        false
    }

    /// Unbounded accumulated angle in degrees
    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Accumulated angle wrapped into `[0, 360)`
    pub fn display_angle(&self) -> f32 {
        self.angle.rem_euclid(360.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationPreset {
    #[default]
    Spin,
    Bounce,
    Pulse,
    Tilt,
    SlideTable,
    SlideMouse,
    AllCombined,
}

impl AnimationPreset {
    pub const ALL: [AnimationPreset; 7] = [
        AnimationPreset::Spin,
        AnimationPreset::Bounce,
        AnimationPreset::Pulse,
        AnimationPreset::Tilt,
        AnimationPreset::SlideTable,
        AnimationPreset::SlideMouse,
        AnimationPreset::AllCombined,
    ];

    pub fn name(self) -> &'static str {
        match self {
            AnimationPreset::Spin => "spin",
            AnimationPreset::Bounce => "bounce",
            AnimationPreset::Pulse => "pulse",
            AnimationPreset::Tilt => "tilt",
            AnimationPreset::SlideTable => "slide_table",
            AnimationPreset::SlideMouse => "slide_mouse",
            AnimationPreset::AllCombined => "all_combined",
        }
    }

    /// Whether running `self` drives the motion of `part`
    pub fn drives(self, part: AnimationPreset) -> bool {
        self == part || self == AnimationPreset::AllCombined
    }
}

impl fmt::Display for AnimationPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AnimationPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AnimationPreset::ALL
            .iter()
            .copied()
            .find(|p| p.name() == s)
            .ok_or_else(|| {
                let names: Vec<_> = AnimationPreset::ALL.iter().map(|p| p.name()).collect();
                format!("unknown preset '{}', expected one of: {}", s, names.join(", "))
            })
    }
}

/// Values the core animated this frame, for an external UI-sync layer.
///
/// Preset-driven fields are `None` when the running preset does not touch
/// them.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AnimatedOutputs {
    pub time: f32,
    pub monitor_yaw: Option<f32>,
    pub monitor_y: Option<f32>,
    pub monitor_scale: Option<f32>,
    pub tilt: Option<f32>,
    pub table_x: Option<f32>,
    pub mouse_x: Option<f32>,
    pub left_press: f32,
    pub right_press: f32,
    pub wheel_angle: f32,
}

/// Mutable animation state carried between frames
#[derive(Debug, Clone, Default)]
pub struct AnimationState {
    time: f32,
    pub left_button: PressAnimation,
    pub right_button: PressAnimation,
    pub wheel: ScrollAnimation,
}

impl AnimationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Preset clock in seconds
    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn trigger(&mut self, triggers: &AnimationTriggers) {
        if triggers.press_left {
            log::debug!("left button press started");
            self.left_button.start();
        }
        if triggers.press_right {
            log::debug!("right button press started");
            self.right_button.start();
        }
        if triggers.scroll {
            log::debug!("wheel scroll started");
            self.wheel.start();
        }
    }

    /// Advances every timer by one fixed step and applies the running preset
    /// to a copy of `input`. The returned snapshot is what this frame draws.
    pub fn step(&mut self, input: &InputSnapshot) -> (InputSnapshot, AnimatedOutputs) {
        self.trigger(&input.triggers);

        if self.left_button.advance(FRAME_TIME) {
            log::debug!("left button press completed");
        }
        if self.right_button.advance(FRAME_TIME) {
            log::debug!("right button press completed");
        }
        if self.wheel.advance(FRAME_TIME) {
            log::debug!("wheel scroll completed");
        }

        let mut frame = input.clone();
        let mut outputs = AnimatedOutputs::default();

        if input.animation.enabled {
            self.time += FRAME_TIME;
            outputs = apply_preset(input.animation.preset, self.time, &mut frame);
        }

        outputs.time = self.time;
        outputs.left_press = self.left_button.offset();
        outputs.right_press = self.right_button.offset();
        outputs.wheel_angle = self.wheel.display_angle();
        (frame, outputs)
    }
}

/// Applies `preset` at clock `t` to the parameters in `frame`
pub fn apply_preset(preset: AnimationPreset, t: f32, frame: &mut InputSnapshot) -> AnimatedOutputs {
    let mut out = AnimatedOutputs {
        time: t,
        ..Default::default()
    };

    if preset.drives(AnimationPreset::Spin) {
        let yaw = t.to_degrees().rem_euclid(360.0);
        frame.monitor.rotation[1] = yaw;
        out.monitor_yaw = Some(yaw);
    }
    if preset.drives(AnimationPreset::Bounce) {
        let y = 0.3 * (2.0 * t).sin();
        frame.monitor.position[1] = y;
        out.monitor_y = Some(y);
    }
    if preset.drives(AnimationPreset::Pulse) {
        let scale = 0.8 + 0.2 * (3.0 * t).sin();
        frame.monitor.scale = scale;
        out.monitor_scale = Some(scale);
    }
    if preset.drives(AnimationPreset::Tilt) {
        let tilt = 15.0 * (1.5 * t).sin();
        frame.monitor.tilt = tilt;
        out.tilt = Some(tilt);
    }
    if preset.drives(AnimationPreset::SlideTable) {
        frame.table.position[0] += 0.4 * t.sin();
        out.table_x = Some(frame.table.position[0]);
    }
    if preset.drives(AnimationPreset::SlideMouse) {
        frame.mouse.position[0] += 0.15 * (2.0 * t).sin();
        out.mouse_x = Some(frame.mouse.position[0]);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_press_offset_profile() {
        let d = 0.3;
        let depth = 0.01;
        assert!(close(press_offset(0.0, d, depth), 0.0));
        assert!(close(press_offset(d / 2.0, d, depth), depth));
        assert!(press_offset(d, d, depth).abs() < 1e-6);
        // Clamped past the end of the cycle
        assert!(press_offset(5.0 * d, d, depth).abs() < 1e-6);
    }

    #[test]
    fn test_press_cycle_deactivates_and_stays_at_rest() {
        let mut press = PressAnimation::new(0.1, 0.005);
        assert_eq!(press.offset(), 0.0);

        press.start();
        assert!(press.is_active());
        assert_eq!(press.offset(), 0.0);

        press.advance(0.05);
        assert!(close(press.offset(), 0.005));

        assert!(press.advance(0.05));
        assert!(!press.is_active());
        assert_eq!(press.offset(), 0.0);

        // No further motion until retriggered
        assert!(!press.advance(0.05));
        assert_eq!(press.offset(), 0.0);

        press.start();
        press.advance(0.025);
        assert!(press.offset() > 0.0);
    }

    #[test]
    fn test_scroll_accumulates_across_events() {
        let mut wheel = ScrollAnimation::new(0.5, 720.0);
        wheel.start();
        assert!(!wheel.advance(0.25));
        assert!(wheel.advance(0.25));
        assert!(!wheel.is_active());
        let first = wheel.angle();
        assert!((first - 360.0).abs() < 1e-3);

        wheel.start();
        wheel.advance(0.25);
        wheel.advance(0.25);
        assert!((wheel.angle() - 2.0 * first).abs() < 1e-3);
        assert!(wheel.display_angle() >= 0.0 && wheel.display_angle() < 360.0);
    }

    #[test]
    fn test_preset_clock_only_runs_while_enabled() {
        let mut state = AnimationState::new();
        let mut input = InputSnapshot::default();

        state.step(&input);
        assert_eq!(state.time(), 0.0);

        input.animation.enabled = true;
        input.animation.preset = AnimationPreset::Pulse;
        let (frame, outputs) = state.step(&input);
        assert!(close(state.time(), FRAME_TIME));
        assert_eq!(outputs.monitor_scale, Some(frame.monitor.scale));
        assert_eq!(outputs.monitor_yaw, None);
        // The caller's snapshot is never mutated
        assert_eq!(input.monitor.scale, 1.0);
    }

    #[test]
    fn test_spin_wraps_at_full_turn() {
        let mut frame = InputSnapshot::default();
        let out = apply_preset(AnimationPreset::Spin, 2.0 * PI + 0.5, &mut frame);
        let yaw = out.monitor_yaw.unwrap();
        assert!((yaw - 0.5f32.to_degrees()).abs() < 1e-3);
    }

    #[test]
    fn test_slides_offset_from_the_configured_position() {
        let mut frame = InputSnapshot::default();
        frame.table.position[0] = 1.0;
        let base_mouse_x = frame.mouse.position[0];
        let t = 0.7;
        apply_preset(AnimationPreset::AllCombined, t, &mut frame);
        assert!(close(frame.table.position[0], 1.0 + 0.4 * t.sin()));
        assert!(close(frame.mouse.position[0], base_mouse_x + 0.15 * (2.0 * t).sin()));
        assert!(close(frame.monitor.tilt, 15.0 * (1.5 * t).sin()));
    }

    #[test]
    fn test_triggers_start_timers() {
        let mut state = AnimationState::new();
        let mut input = InputSnapshot::default();
        input.triggers.press_left = true;
        input.triggers.scroll = true;
        let (_, outputs) = state.step(&input);
        assert!(state.left_button.is_active());
        assert!(!state.right_button.is_active());
        assert!(outputs.left_press > 0.0);
        assert_eq!(outputs.right_press, 0.0);
        assert!(outputs.wheel_angle > 0.0);
    }

    #[test]
    fn test_preset_names_parse_back() {
        for preset in AnimationPreset::ALL {
            assert_eq!(preset.name().parse::<AnimationPreset>().unwrap(), preset);
        }
        assert!("wobble".parse::<AnimationPreset>().is_err());
    }
}
