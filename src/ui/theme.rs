//! Theme configuration for the TUI.

use ratatui::style::{Color, Modifier, Style};

/// Ratings at or above this are shown in the "high" color
const HIGH_RATING: f64 = 4.5;
/// Ratings below this are shown in the "low" color
const LOW_RATING: f64 = 3.0;

/// Color theme for the application
#[derive(Debug, Clone)]
pub struct Theme {
    pub bg: Color,
    pub fg: Color,
    pub highlight_bg: Color,
    pub highlight_fg: Color,
    pub border: Color,
    pub title: Color,
    pub busy: Color,
    pub error: Color,
    pub rating_high: Color,
    pub rating_mid: Color,
    pub rating_low: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            bg: Color::Reset,
            fg: Color::White,
            highlight_bg: Color::Rgb(60, 60, 80),
            highlight_fg: Color::White,
            border: Color::Rgb(100, 100, 120),
            title: Color::Cyan,
            busy: Color::Yellow,
            error: Color::Red,
            rating_high: Color::Green,
            rating_mid: Color::Yellow,
            rating_low: Color::LightRed,
        }
    }
}

impl Theme {
    /// Base surface style used to paint widget backgrounds
    pub fn surface_style(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    /// Get style for highlighted/selected items
    pub fn highlight_style(&self) -> Style {
        Style::default()
            .fg(self.highlight_fg)
            .bg(self.highlight_bg)
            .add_modifier(Modifier::BOLD)
    }

    /// Get style for borders
    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    /// Get style for titles
    pub fn title_style(&self) -> Style {
        Style::default()
            .fg(self.title)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for the busy indicator
    pub fn busy_style(&self) -> Style {
        Style::default().fg(self.busy).add_modifier(Modifier::BOLD)
    }

    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error).add_modifier(Modifier::BOLD)
    }

    /// Dimmed style for disabled actions
    pub fn disabled_style(&self) -> Style {
        Style::default()
            .fg(self.border)
            .add_modifier(Modifier::DIM)
    }

    /// Color a rating by band
    pub fn rating_style(&self, rating: f64) -> Style {
        let color = if rating >= HIGH_RATING {
            self.rating_high
        } else if rating >= LOW_RATING {
            self.rating_mid
        } else {
            self.rating_low
        };
        Style::default().fg(color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_bands() {
        let theme = Theme::default();
        assert_eq!(theme.rating_style(4.8).fg, Some(theme.rating_high));
        assert_eq!(theme.rating_style(4.5).fg, Some(theme.rating_high));
        assert_eq!(theme.rating_style(3.9).fg, Some(theme.rating_mid));
        assert_eq!(theme.rating_style(1.0).fg, Some(theme.rating_low));
    }

    #[test]
    fn test_nan_rating_is_low() {
        let theme = Theme::default();
        assert_eq!(theme.rating_style(f64::NAN).fg, Some(theme.rating_low));
    }

    #[test]
    fn test_busy_and_error_are_distinct() {
        let theme = Theme::default();
        assert_ne!(theme.busy, theme.error, "Busy and error colors should differ");
    }
}
