//! Popup widgets: sort menu, alert and place details.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::data::{Place, SortMode};

use super::theme::Theme;

/// Create a centered rect for popup dialogs
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Two-action sort chooser
pub struct SortMenu<'a> {
    current: SortMode,
    highlighted: usize,
    theme: &'a Theme,
}

impl<'a> SortMenu<'a> {
    pub fn new(current: SortMode, highlighted: usize, theme: &'a Theme) -> Self {
        SortMenu {
            current,
            highlighted,
            theme,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let popup_area = centered_rect(40, 30, area);
        frame.render_widget(Clear, popup_area);

        let items: Vec<ListItem> = SortMode::ALL
            .iter()
            .map(|mode| {
                let hotkey = match mode {
                    SortMode::ByName => "n",
                    SortMode::ByRating => "r",
                };
                let marker = if *mode == self.current { " ✓" } else { "" };
                ListItem::new(Line::from(vec![
                    Span::styled(format!("[{hotkey}] "), Style::default().fg(self.theme.title)),
                    Span::raw(format!("{}{marker}", mode.action_title())),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .title(" Sort places ")
                    .title_bottom(Line::from(" Esc to cancel ").alignment(Alignment::Right))
                    .borders(Borders::ALL)
                    .border_style(self.theme.border_style())
                    .title_style(self.theme.title_style())
                    .style(self.theme.surface_style()),
            )
            .highlight_style(self.theme.highlight_style())
            .highlight_symbol("> ");

        let mut state = ListState::default();
        state.select(Some(self.highlighted.min(SortMode::ALL.len() - 1)));
        frame.render_stateful_widget(list, popup_area, &mut state);
    }
}

/// A titled one-shot message
pub struct AlertPopup<'a> {
    title: &'a str,
    message: &'a str,
    theme: &'a Theme,
}

impl<'a> AlertPopup<'a> {
    pub fn new(title: &'a str, message: &'a str, theme: &'a Theme) -> Self {
        AlertPopup {
            title,
            message,
            theme,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let popup_area = centered_rect(50, 30, area);
        frame.render_widget(Clear, popup_area);

        let lines = vec![
            Line::from(""),
            Line::from(format!("  {}", self.message)),
            Line::from(""),
            Line::from(Span::styled("  [Enter] OK", self.theme.disabled_style())),
        ];

        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .title(format!(" {} ", self.title))
                    .title_alignment(Alignment::Center)
                    .borders(Borders::ALL)
                    .border_style(self.theme.error_style())
                    .title_style(self.theme.error_style())
                    .style(self.theme.surface_style()),
            )
            .wrap(Wrap { trim: false });

        frame.render_widget(paragraph, popup_area);
    }
}

/// Details of the selected place
pub struct DetailPopup<'a> {
    place: &'a Place,
    theme: &'a Theme,
}

impl<'a> DetailPopup<'a> {
    pub fn new(place: &'a Place, theme: &'a Theme) -> Self {
        DetailPopup { place, theme }
    }

    fn field(&self, label: &str, value: String) -> Line<'static> {
        Line::from(vec![
            Span::styled(format!("  {label:<10}"), Style::default().fg(self.theme.title)),
            Span::raw(value),
        ])
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let popup_area = centered_rect(60, 40, area);
        frame.render_widget(Clear, popup_area);

        let place = self.place;
        let dash = || "-".to_string();
        let lines = vec![
            Line::from(""),
            Line::from(vec![
                Span::styled(format!("  {:<10}", "Rating"), Style::default().fg(self.theme.title)),
                Span::styled(place.rating_label(), self.theme.rating_style(place.rating)),
            ]),
            self.field("Category", place.category.clone().unwrap_or_else(dash)),
            self.field("Address", place.address.clone().unwrap_or_else(dash)),
            self.field(
                "Updated",
                place
                    .updated_at
                    .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_else(dash),
            ),
        ];

        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .title(format!(" {} ", place.name))
                    .title_alignment(Alignment::Center)
                    .borders(Borders::ALL)
                    .border_style(self.theme.border_style())
                    .title_style(self.theme.title_style())
                    .style(self.theme.surface_style()),
            )
            .wrap(Wrap { trim: true });

        frame.render_widget(paragraph, popup_area);
    }
}
