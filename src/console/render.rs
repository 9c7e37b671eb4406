//! Text rendering of the countdown ring

use crate::state::DisplayModel;

/// Number of cells in the text ring
pub const RING_WIDTH: usize = 20;

/// Render the progress ring as a bar of filled and empty cells
pub fn render_ring(fraction: f32, width: usize) -> String {
    let filled = ((fraction.clamp(0.0, 1.0) * width as f32).ceil() as usize).min(width);
    format!("[{}{}]", "#".repeat(filled), "·".repeat(width - filled))
}

/// Render one frame: control icon, ring and time text
pub fn render_frame(display: &DisplayModel) -> String {
    format!(
        "{} {} {:>8}",
        display.icon.symbol(),
        render_ring(display.fraction_remaining, RING_WIDTH),
        display.text,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::CountdownState;

    #[test]
    fn full_and_empty_rings() {
        assert_eq!(render_ring(1.0, 4), "[####]");
        assert_eq!(render_ring(0.0, 4), "[····]");
    }

    #[test]
    fn partial_ring_rounds_up() {
        assert_eq!(render_ring(0.5, 4), "[##··]");
        assert_eq!(render_ring(0.01, 4), "[#···]");
    }

    #[test]
    fn idle_frame() {
        let frame = render_frame(&DisplayModel::from(&CountdownState::idle(15_000)));
        assert_eq!(frame, format!("▶ [{}]     0:15", "#".repeat(RING_WIDTH)));
    }
}
