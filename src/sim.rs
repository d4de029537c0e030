//! Terminal-backed display and button implementations
//!
//! Lets the appliance run on a desk with no hardware attached: the matrix
//! draws as ANSI truecolor cells on stdout, and button presses are typed on
//! stdin (`a`, `b`, `x`, `y`, or `ab` for the refresh chord). A hardware
//! deployment swaps these for real driver-backed implementations in `main`.

use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tokio::io::{AsyncBufReadExt, BufReader};

use crate::input::{Button, ButtonPad};
use crate::matrix::{Matrix, Rgb, HEIGHT, WIDTH};

/// Matrix that repaints the grid in place on every flush
pub struct SimMatrix {
    pixels: [[Rgb; HEIGHT]; WIDTH],
    drawn_before: bool,
}

impl SimMatrix {
    pub fn new() -> Self {
        Self {
            pixels: [[Rgb::BLACK; HEIGHT]; WIDTH],
            drawn_before: false,
        }
    }
}

impl Matrix for SimMatrix {
    fn set_pixel(&mut self, x: usize, y: usize, color: Rgb) {
        if x < WIDTH && y < HEIGHT {
            self.pixels[x][y] = color;
        }
    }

    fn flush(&mut self) {
        let mut out = String::new();
        if self.drawn_before {
            // Move back up over the previous frame
            out.push_str(&format!("\x1b[{}A", HEIGHT));
        }
        for y in 0..HEIGHT {
            for x in 0..WIDTH {
                let Rgb { r, g, b } = self.pixels[x][y];
                out.push_str(&format!("\x1b[48;2;{r};{g};{b}m  "));
            }
            out.push_str("\x1b[0m\n");
        }
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        let _ = handle.write_all(out.as_bytes());
        let _ = handle.flush();
        self.drawn_before = true;
    }
}

/// How long a typed key counts as "held"
const PRESS_WINDOW: Duration = Duration::from_millis(400);

#[derive(Default)]
struct HeldState {
    mask: u8,
    until: Option<Instant>,
}

/// Button pad driven by stdin lines.
///
/// Each line marks the named buttons as held for a short window, which the
/// polling loop then observes like a physical press.
pub struct SimPad {
    held: Arc<Mutex<HeldState>>,
}

impl SimPad {
    /// Start the stdin reader task and return the pad
    pub fn spawn() -> Self {
        let held = Arc::new(Mutex::new(HeldState::default()));
        let writer = Arc::clone(&held);

        tokio::spawn(async move {
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                let mut mask = 0u8;
                for c in line.trim().chars() {
                    mask |= match c.to_ascii_lowercase() {
                        'a' => 1,
                        'b' => 2,
                        'x' => 4,
                        'y' => 8,
                        _ => 0,
                    };
                }
                if mask != 0 {
                    // A reader that panicked mid-poll must not kill input
                    let mut state = writer.lock().unwrap_or_else(|e| e.into_inner());
                    state.mask = mask;
                    state.until = Some(Instant::now() + PRESS_WINDOW);
                }
            }
        });

        Self { held }
    }
}

impl ButtonPad for SimPad {
    fn is_pressed(&self, button: Button) -> bool {
        let bit = match button {
            Button::A => 1,
            Button::B => 2,
            Button::X => 4,
            Button::Y => 8,
        };
        let state = self.held.lock().unwrap_or_else(|e| e.into_inner());
        match state.until {
            Some(until) => Instant::now() < until && state.mask & bit != 0,
            None => false,
        }
    }
}
