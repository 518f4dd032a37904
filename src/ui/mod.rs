//! Terminal User Interface components for places-tui.

mod help;
pub mod popup;
mod theme;
pub mod widgets;

pub use help::HelpOverlay;
pub use theme::Theme;
