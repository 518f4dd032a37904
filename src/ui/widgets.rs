//! UI widgets for the place browser.

use ratatui::{
    layout::{Constraint, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::data::{Place, SortMode};

use super::theme::Theme;

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

/// Header showing the active sort mode and load state
pub struct Header<'a> {
    sort_mode: SortMode,
    busy: bool,
    tick: usize,
    theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(sort_mode: SortMode, busy: bool, tick: usize, theme: &'a Theme) -> Self {
        Header {
            sort_mode,
            busy,
            tick,
            theme,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![
            Span::styled(" Places ", self.theme.title_style()),
            Span::raw(format!("| Sorted by {} ", self.sort_mode)),
        ];
        if self.busy {
            spans.push(Span::styled(
                format!("| {} Loading...", SPINNER[self.tick % SPINNER.len()]),
                self.theme.busy_style(),
            ));
        }

        let header = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(self.theme.border_style()),
        );
        frame.render_widget(header, area);
    }
}

/// Table of places
pub struct PlaceTable<'a> {
    places: &'a [Place],
    loaded: bool,
    theme: &'a Theme,
}

impl<'a> PlaceTable<'a> {
    pub fn new(places: &'a [Place], loaded: bool, theme: &'a Theme) -> Self {
        PlaceTable {
            places,
            loaded,
            theme,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, state: &mut TableState) {
        let block = Block::default()
            .title(format!(" Places ({}) ", self.places.len()))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(self.theme.border_style());

        if self.places.is_empty() {
            let text = if self.loaded {
                "No places."
            } else {
                "Nothing loaded yet. Press [r] to refresh."
            };
            let paragraph = Paragraph::new(text)
                .style(self.theme.disabled_style())
                .block(block);
            frame.render_widget(paragraph, area);
            return;
        }

        let rows: Vec<Row> = self
            .places
            .iter()
            .map(|p| {
                Row::new(vec![
                    Cell::from(p.name.clone()),
                    Cell::from(p.rating_label()).style(self.theme.rating_style(p.rating)),
                    Cell::from(p.category.clone().unwrap_or_default()),
                ])
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Min(20),
                Constraint::Length(8),
                Constraint::Length(16),
            ],
        )
        .header(
            Row::new(vec!["Name", "Rating", "Category"])
                .style(self.theme.title_style())
                .bottom_margin(1),
        )
        .block(block)
        .row_highlight_style(self.theme.highlight_style())
        .highlight_symbol("> ");

        frame.render_stateful_widget(table, area, state);
    }
}

/// Status bar widget
pub struct StatusBar<'a> {
    count: Option<usize>,
    sort_enabled: bool,
    theme: &'a Theme,
}

impl<'a> StatusBar<'a> {
    pub fn new(count: Option<usize>, sort_enabled: bool, theme: &'a Theme) -> Self {
        StatusBar {
            count,
            sort_enabled,
            theme,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let summary = match self.count {
            Some(n) => format!("places-tui: {n} places"),
            None => "places-tui".to_string(),
        };
        let sort_style = if self.sort_enabled {
            Style::default()
        } else {
            self.theme.disabled_style()
        };

        let line = Line::from(vec![
            Span::raw(format!("{summary} | [r] Refresh ")),
            Span::styled("[s] Sort ", sort_style),
            Span::raw("[h] Help [q] Quit"),
        ]);
        let paragraph = Paragraph::new(line).block(Block::default().borders(Borders::TOP));

        frame.render_widget(paragraph, area);
    }
}
