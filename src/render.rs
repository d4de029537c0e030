//! Rendering pipeline: contribution levels to pixels
//!
//! Maps levels to the GitHub green palette, applies brightness scaling and
//! writes frames to the display surface. Also owns the one-pixel status
//! indicator and the one-time startup animation.

use std::time::Duration;

use tokio::time::sleep;

use crate::grid::{ContributionGrid, ContributionLevel};
use crate::matrix::{Matrix, Rgb, HEIGHT, WIDTH};
use crate::store::Brightness;

/// Fixed position of the status indicator
const STATUS_PIXEL: (usize, usize) = (0, 0);

const STATUS_ERROR: Rgb = Rgb::new(255, 0, 0);
const STATUS_CONNECTING: Rgb = Rgb::new(0, 0, 255);
const STATUS_FETCHING: Rgb = Rgb::new(255, 255, 0);

/// Color for cells with no activity. Deliberately rendered without
/// brightness scaling so "nothing" stays distinguishable at any setting.
const NONE_DIM: Rgb = Rgb::new(3, 7, 6);

/// Base color per contribution level, scaled for LED output
fn level_color(level: ContributionLevel) -> Rgb {
    match level {
        ContributionLevel::None => NONE_DIM,
        ContributionLevel::FirstQuartile => Rgb::new(14, 80, 41),
        ContributionLevel::SecondQuartile => Rgb::new(0, 140, 50),
        ContributionLevel::ThirdQuartile => Rgb::new(38, 180, 65),
        ContributionLevel::FourthQuartile => Rgb::new(57, 255, 83),
    }
}

/// Draw the full contribution grid
pub fn render<M: Matrix>(matrix: &mut M, grid: &ContributionGrid, brightness: Brightness) {
    for x in 0..WIDTH {
        for y in 0..HEIGHT {
            let level = grid.get(x, y);
            let color = if level == ContributionLevel::None {
                NONE_DIM
            } else {
                brightness.scale(level_color(level))
            };
            matrix.set_pixel(x, y, color);
        }
    }
    matrix.flush();
}

/// Light the status pixel without touching the rest of the frame
pub fn show_status<M: Matrix>(matrix: &mut M, color: Rgb) {
    matrix.set_pixel(STATUS_PIXEL.0, STATUS_PIXEL.1, color);
    matrix.flush();
}

/// Red status pixel. Leaves any rendered grid in place.
pub fn show_error<M: Matrix>(matrix: &mut M) {
    show_status(matrix, STATUS_ERROR);
}

/// Blue status pixel on a cleared display, shown while associating
pub fn show_connecting<M: Matrix>(matrix: &mut M) {
    matrix.clear();
    show_status(matrix, STATUS_CONNECTING);
}

/// Yellow status pixel overlaid on the current frame while fetching
pub fn show_fetching<M: Matrix>(matrix: &mut M) {
    show_status(matrix, STATUS_FETCHING);
}

/// Frame delay for the startup wave sweep
const WAVE_FRAME_DELAY: Duration = Duration::from_millis(40);
/// Step delay for the fade flourish
const FADE_STEP_DELAY: Duration = Duration::from_millis(50);

/// Green gradient for the startup wave, ramping up and back down
const WAVE_COLORS: [Rgb; 8] = [
    Rgb::new(5, 7, 9),
    Rgb::new(14, 68, 41),
    Rgb::new(0, 109, 50),
    Rgb::new(38, 166, 65),
    Rgb::new(57, 211, 83),
    Rgb::new(38, 166, 65),
    Rgb::new(0, 109, 50),
    Rgb::new(14, 68, 41),
];

const FADE_GREEN: Rgb = Rgb::new(57, 211, 83);

fn fill<M: Matrix>(matrix: &mut M, color: Rgb) {
    for x in 0..WIDTH {
        for y in 0..HEIGHT {
            matrix.set_pixel(x, y, color);
        }
    }
    matrix.flush();
}

/// One-time startup sequence: wave sweep across the columns, then a
/// brightness fade-in/fade-out, then clear. Purely cosmetic, bounded frame
/// count.
pub async fn startup_animation<M: Matrix>(matrix: &mut M, brightness: Brightness) {
    matrix.clear();
    matrix.flush();

    let wave_len = WAVE_COLORS.len() as i32;
    for frame in 0..(WIDTH as i32 + wave_len) {
        for x in 0..WIDTH {
            let wave_pos = frame - x as i32;
            if (0..wave_len).contains(&wave_pos) {
                let color = brightness.scale(WAVE_COLORS[wave_pos as usize]);
                for y in 0..HEIGHT {
                    matrix.set_pixel(x, y, color);
                }
            } else if wave_pos >= wave_len {
                // Trail off behind the wave
                for y in 0..HEIGHT {
                    matrix.set_pixel(x, y, Rgb::BLACK);
                }
            }
        }
        matrix.flush();
        sleep(WAVE_FRAME_DELAY).await;
    }

    sleep(Duration::from_millis(100)).await;

    // Fade in
    for step in 0..6u32 {
        let factor = step as f32 / 5.0;
        let color = brightness.scale(Rgb::new(
            (FADE_GREEN.r as f32 * factor) as u8,
            (FADE_GREEN.g as f32 * factor) as u8,
            (FADE_GREEN.b as f32 * factor) as u8,
        ));
        fill(matrix, color);
        sleep(FADE_STEP_DELAY).await;
    }

    sleep(Duration::from_millis(300)).await;

    // Fade out
    for step in (0..6u32).rev() {
        let factor = step as f32 / 5.0;
        let color = brightness.scale(Rgb::new(
            (FADE_GREEN.r as f32 * factor) as u8,
            (FADE_GREEN.g as f32 * factor) as u8,
            (FADE_GREEN.b as f32 * factor) as u8,
        ));
        fill(matrix, color);
        sleep(FADE_STEP_DELAY).await;
    }

    matrix.clear();
    matrix.flush();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::{ContributionCalendar, ContributionDay, Week};
    use crate::matrix::fake::FakeMatrix;

    fn single_cell_grid(level: ContributionLevel) -> ContributionGrid {
        ContributionGrid::from_calendar(&ContributionCalendar {
            weeks: vec![Week {
                contribution_days: vec![ContributionDay {
                    contribution_level: level,
                    weekday: 3,
                }],
            }],
        })
    }

    #[test]
    fn none_cells_ignore_brightness() {
        let grid = ContributionGrid::default();

        for brightness in [Brightness::new(0.1), Brightness::new(1.0)] {
            let mut matrix = FakeMatrix::new();
            render(&mut matrix, &grid, brightness);
            for x in 0..WIDTH {
                for y in 0..HEIGHT {
                    assert_eq!(matrix.get(x, y), NONE_DIM);
                }
            }
        }
    }

    #[test]
    fn active_cells_scale_with_truncation() {
        let grid = single_cell_grid(ContributionLevel::FourthQuartile);
        let mut matrix = FakeMatrix::new();
        render(&mut matrix, &grid, Brightness::new(0.5));

        // floor(base * 0.5) per channel for (57, 255, 83)
        assert_eq!(matrix.get(WIDTH - 1, 3), Rgb::new(28, 127, 41));
    }

    #[test]
    fn full_brightness_is_identity() {
        let grid = single_cell_grid(ContributionLevel::SecondQuartile);
        let mut matrix = FakeMatrix::new();
        render(&mut matrix, &grid, Brightness::new(1.0));

        assert_eq!(matrix.get(WIDTH - 1, 3), Rgb::new(0, 140, 50));
    }

    #[test]
    fn error_indicator_preserves_rendered_grid() {
        let grid = single_cell_grid(ContributionLevel::ThirdQuartile);
        let mut matrix = FakeMatrix::new();
        render(&mut matrix, &grid, Brightness::new(1.0));
        let before = matrix.pixels;

        show_error(&mut matrix);

        for x in 0..WIDTH {
            for y in 0..HEIGHT {
                if (x, y) == STATUS_PIXEL {
                    assert_eq!(matrix.get(x, y), STATUS_ERROR);
                } else {
                    assert_eq!(matrix.get(x, y), before[x][y]);
                }
            }
        }
    }

    #[test]
    fn connecting_clears_before_status() {
        let grid = single_cell_grid(ContributionLevel::FourthQuartile);
        let mut matrix = FakeMatrix::new();
        render(&mut matrix, &grid, Brightness::new(1.0));

        show_connecting(&mut matrix);

        assert_eq!(matrix.get(STATUS_PIXEL.0, STATUS_PIXEL.1), STATUS_CONNECTING);
        assert_eq!(matrix.get(WIDTH - 1, 3), Rgb::BLACK);
    }

    #[tokio::test(start_paused = true)]
    async fn startup_animation_terminates_and_clears() {
        let mut matrix = FakeMatrix::new();
        startup_animation(&mut matrix, Brightness::new(1.0)).await;

        for x in 0..WIDTH {
            for y in 0..HEIGHT {
                assert_eq!(matrix.get(x, y), Rgb::BLACK);
            }
        }
        assert!(matrix.flushes > WIDTH);
    }
}
