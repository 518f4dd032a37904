//! Non-interactive `list` command: print places as an aligned table.

use std::io::Write;

use anyhow::Result;
use tracing::warn;

use crate::data::{Place, SortMode};
use crate::presenter::{DisplaySurface, ListPresenter};

/// Surface that only keeps the last rendered rows and any alerts
#[derive(Debug, Default)]
pub struct PlainSurface {
    rows: Option<Vec<Place>>,
    alerts: Vec<String>,
}

impl DisplaySurface for PlainSurface {
    fn render(&mut self, places: &[Place]) {
        self.rows = Some(places.to_vec());
    }

    fn set_busy(&mut self, _busy: bool) {}

    fn show_alert(&mut self, title: &str, message: &str) {
        self.alerts.push(format!("{title}: {message}"));
    }
}

/// Write places as `name  rating  category` columns
pub fn write_table<W: Write>(out: &mut W, places: &[Place]) -> std::io::Result<()> {
    let width = places
        .iter()
        .map(|p| p.name.chars().count())
        .max()
        .unwrap_or(0)
        .max(4);

    writeln!(out, "{:<width$}  {:>6}  CATEGORY", "NAME", "RATING")?;
    for place in places {
        writeln!(
            out,
            "{:<width$}  {:>6}  {}",
            place.name,
            place.rating_label(),
            place.category.as_deref().unwrap_or("-"),
        )?;
    }
    Ok(())
}

/// Load, optionally re-sort and refresh, then print to stdout
pub async fn run(
    mut presenter: ListPresenter<PlainSurface>,
    sort: Option<SortMode>,
    refresh: bool,
) -> Result<()> {
    presenter.initialize();
    if let Some(mode) = sort {
        presenter.set_sort_mode(mode);
    }
    if refresh {
        presenter.begin_load();
        presenter.finish_load().await;
    }

    for alert in &presenter.surface().alerts {
        eprintln!("{alert}");
    }

    match &presenter.surface().rows {
        Some(places) => {
            let stdout = std::io::stdout();
            write_table(&mut stdout.lock(), places)?;
        }
        None => {
            warn!("no places available");
            eprintln!("No places saved yet. Run with --refresh and an --endpoint to fetch them.");
        }
    }
    Ok(())
}
