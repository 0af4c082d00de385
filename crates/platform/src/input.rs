//! Keyboard bindings for the animation knobs.

use corelib::{AnimationState, Knob};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Rotation per key press, radians.
pub const ANGLE_STEP: f32 = std::f32::consts::PI / 36.0;
pub const DISCO_STEP: f32 = 0.1;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    Nudge(Knob, f32),
    ToggleDisco,
    Reset,
}

pub fn command_for(key: PhysicalKey) -> Option<Command> {
    let PhysicalKey::Code(code) = key else {
        return None;
    };
    let cmd = match code {
        KeyCode::ArrowLeft => Command::Nudge(Knob::Yaw, -ANGLE_STEP),
        KeyCode::ArrowRight => Command::Nudge(Knob::Yaw, ANGLE_STEP),
        KeyCode::ArrowUp => Command::Nudge(Knob::Pitch, -ANGLE_STEP),
        KeyCode::ArrowDown => Command::Nudge(Knob::Pitch, ANGLE_STEP),
        KeyCode::KeyQ => Command::Nudge(Knob::Roll, -ANGLE_STEP),
        KeyCode::KeyE => Command::Nudge(Knob::Roll, ANGLE_STEP),
        KeyCode::Equal | KeyCode::NumpadAdd => Command::Nudge(Knob::Disco, DISCO_STEP),
        KeyCode::Minus | KeyCode::NumpadSubtract => Command::Nudge(Knob::Disco, -DISCO_STEP),
        KeyCode::KeyD => Command::ToggleDisco,
        KeyCode::KeyR => Command::Reset,
        _ => return None,
    };
    Some(cmd)
}

pub fn apply(cmd: Command, state: &mut AnimationState) {
    match cmd {
        Command::Nudge(knob, delta) => state.nudge(knob, delta),
        Command::ToggleDisco => state.toggle_disco(),
        Command::Reset => state.reset(),
    }
}
