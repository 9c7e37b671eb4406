//! Read-only presentation projection of the countdown

use serde::{Deserialize, Serialize};

use super::CountdownState;

/// Seconds at which the display switches to `H:MM:SS` and the smaller font
pub const HOUR_FORMAT_THRESHOLD_SECS: u64 = 3600;

/// Font size for the time text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    /// Used below one hour
    Large,
    /// Used from one hour upwards
    Small,
}

impl FontSize {
    pub fn for_seconds(total_seconds: u64) -> Self {
        if total_seconds >= HOUR_FORMAT_THRESHOLD_SECS {
            Self::Small
        } else {
            Self::Large
        }
    }

    /// Size in scale-independent pixels
    pub fn sp(&self) -> u32 {
        match self {
            Self::Large => 72,
            Self::Small => 48,
        }
    }
}

/// Colour band of the progress ring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RingBand {
    /// More than 70% left
    Start,
    /// More than 30% left
    Center,
    /// 30% or less left
    End,
}

impl RingBand {
    pub fn for_fraction(fraction: f32) -> Self {
        if fraction > 0.7 {
            Self::Start
        } else if fraction > 0.3 {
            Self::Center
        } else {
            Self::End
        }
    }
}

/// Icon on the start/stop control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlIcon {
    Play,
    Stop,
}

impl ControlIcon {
    pub fn for_running(is_running: bool) -> Self {
        if is_running { Self::Stop } else { Self::Play }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Play => "▶",
            Self::Stop => "■",
        }
    }
}

/// Everything the presentation layer needs to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayModel {
    pub text: String,
    pub font_size: FontSize,
    pub font_size_sp: u32,
    pub fraction_remaining: f32,
    pub ring_band: RingBand,
    pub icon: ControlIcon,
}

impl From<&CountdownState> for DisplayModel {
    fn from(state: &CountdownState) -> Self {
        let font_size = FontSize::for_seconds(state.displayed_seconds());
        Self {
            text: format_remaining(state.remaining_ms),
            font_size,
            font_size_sp: font_size.sp(),
            fraction_remaining: state.fraction_remaining,
            ring_band: RingBand::for_fraction(state.fraction_remaining),
            icon: ControlIcon::for_running(state.is_running),
        }
    }
}

/// Format remaining time as `H:MM:SS` from one hour upwards, `M:SS` below
pub fn format_remaining(remaining_ms: u64) -> String {
    let total_seconds = remaining_ms / 1000;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if total_seconds >= HOUR_FORMAT_THRESHOLD_SECS {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_below_an_hour() {
        assert_eq!(format_remaining(15_000), "0:15");
        assert_eq!(format_remaining(15_999), "0:15");
        assert_eq!(format_remaining(754_000), "12:34");
        assert_eq!(format_remaining(3_599_999), "59:59");
        assert_eq!(format_remaining(0), "0:00");
    }

    #[test]
    fn formats_an_hour_and_above() {
        assert_eq!(format_remaining(3_600_000), "1:00:00");
        assert_eq!(format_remaining(3_723_000), "1:02:03");
        assert_eq!(format_remaining(36_000_000), "10:00:00");
    }

    #[test]
    fn font_switches_at_one_hour() {
        assert_eq!(FontSize::for_seconds(3_599), FontSize::Large);
        assert_eq!(FontSize::for_seconds(3_600), FontSize::Small);
        assert_eq!(FontSize::Large.sp(), 72);
        assert_eq!(FontSize::Small.sp(), 48);
    }

    #[test]
    fn ring_bands_follow_thresholds() {
        assert_eq!(RingBand::for_fraction(1.0), RingBand::Start);
        assert_eq!(RingBand::for_fraction(0.7), RingBand::Center);
        assert_eq!(RingBand::for_fraction(0.31), RingBand::Center);
        assert_eq!(RingBand::for_fraction(0.3), RingBand::End);
        assert_eq!(RingBand::for_fraction(0.0), RingBand::End);
    }

    #[test]
    fn one_hour_countdown_uses_small_font() {
        let display = DisplayModel::from(&CountdownState::idle(3_600_000));
        assert_eq!(display.text, "1:00:00");
        assert_eq!(display.font_size, FontSize::Small);
        assert_eq!(display.font_size_sp, 48);
        assert_eq!(display.icon, ControlIcon::Play);
    }

    #[test]
    fn running_state_shows_stop_icon() {
        let mut state = CountdownState::idle(15_000);
        state.is_running = true;
        state.remaining_ms = 3_000;
        state.fraction_remaining = 0.2;
        let display = DisplayModel::from(&state);
        assert_eq!(display.text, "0:03");
        assert_eq!(display.icon, ControlIcon::Stop);
        assert_eq!(display.ring_band, RingBand::End);
        assert_eq!(display.font_size, FontSize::Large);
    }
}
