//! Button sampling
//!
//! Four momentary buttons, polled rather than interrupt-driven. A and X
//! raise brightness, B and Y lower it, and holding A+B together requests an
//! immediate refresh. The chord always wins over single-button adjustment
//! for a given sample.

use crate::store::Brightness;

/// The four physical buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    A,
    B,
    X,
    Y,
}

/// Momentary button inputs, sampled on demand
pub trait ButtonPad {
    /// Whether the button is held right now
    fn is_pressed(&self, button: Button) -> bool;
}

/// Whether the A+B force-refresh chord is currently held
pub fn chord_held<P: ButtonPad>(pad: &P) -> bool {
    pad.is_pressed(Button::A) && pad.is_pressed(Button::B)
}

/// Sample the brightness buttons.
///
/// Returns the adjustment delta for this sample, if any. Callers must check
/// [`chord_held`] first; this only looks at individual buttons.
pub fn poll_adjustment<P: ButtonPad>(pad: &P) -> Option<f32> {
    if pad.is_pressed(Button::A) || pad.is_pressed(Button::X) {
        Some(Brightness::STEP)
    } else if pad.is_pressed(Button::B) || pad.is_pressed(Button::Y) {
        Some(-Brightness::STEP)
    } else {
        None
    }
}
