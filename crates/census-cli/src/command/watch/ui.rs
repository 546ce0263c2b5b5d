use census_engine::Rgb;
use ratatui::{
    Frame,
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Cell, Row, Table, TableState, Widget},
};

use crate::{
    command::watch::app::View,
    prefs::PanelPreferences,
    table::{self, HistogramTable},
};

const DEFAULT_TILE: Color = Color::DarkGray;

fn color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.r, rgb.g, rgb.b)
}

pub(super) fn draw(frame: &mut Frame, view: &View, prefs: PanelPreferences, scroll: usize) {
    let [status_area, main_area, help_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    let status = format!(
        " Pass {} | Step {} | Population {} | {} ",
        view.pass,
        view.steps,
        view.population,
        table::district_label(view.filter),
    );
    frame.render_widget(
        Line::raw(status).style(Style::default().add_modifier(Modifier::REVERSED)),
        status_area,
    );

    let map = BuildingMap { view };
    if prefs.panel_visible {
        let [panel_area, map_area] =
            Layout::horizontal([Constraint::Percentage(60), Constraint::Fill(1)]).areas(main_area);
        frame.render_stateful_widget(
            histogram_table(&view.table),
            panel_area,
            &mut TableState::default().with_offset(scroll),
        );
        frame.render_widget(map, map_area);
    } else {
        frame.render_widget(map, main_area);
    }

    let help_text = Text::from(
        "r/R: Rows | c/C: Columns | d/D: District | m/M: Metric | p: Count/% | h: Panel | ↑/↓: Scroll | q/Esc: Quit",
    )
    .style(Style::default().fg(Color::DarkGray))
    .centered();
    frame.render_widget(help_text, help_area);
}

#[expect(clippy::cast_possible_truncation)]
fn histogram_table(histogram: &HistogramTable) -> Table<'_> {
    let bucket_style = |bucket: usize| {
        let rgb = histogram.column_axis.definition().color(bucket);
        Style::default().fg(color(rgb))
    };
    let buckets = histogram.column_axis.bucket_count();

    let header = Row::new(
        [Cell::from(histogram.row_axis.name())].into_iter().chain(
            histogram.columns.iter().enumerate().map(|(i, label)| {
                let style = if i < buckets {
                    bucket_style(i)
                } else {
                    Style::default()
                };
                Cell::from(Line::raw(label.as_str()).right_aligned()).style(style)
            }),
        ),
    )
    .style(Style::default().add_modifier(Modifier::BOLD));

    let rows = histogram.rows.iter().map(|row| {
        let cells = [Cell::from(row.label.as_str())].into_iter().chain(
            row.cells.iter().map(|&value| {
                Cell::from(Line::raw(table::format_cell(value, histogram.display)).right_aligned())
            }),
        );
        let style = if row.summary {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        Row::new(cells).style(style)
    });

    let widths = [Constraint::Length(histogram.label_width() as u16)]
        .into_iter()
        .chain(
            (0..histogram.columns.len())
                .map(|column| Constraint::Length(histogram.cell_width(column) as u16)),
        );

    let title = format!(
        "{} × {}",
        histogram.row_axis.name(),
        histogram.column_axis.name()
    );
    Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .block(Block::bordered().title(title))
}

/// Buildings as two-cell tiles on the city grid, with a legend of the
/// selected metric's range.
struct BuildingMap<'a> {
    view: &'a View,
}

impl Widget for BuildingMap<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let view = self.view;
        let block = Block::bordered().title(format!("Map: {}", view.metric.name()));
        let inner = block.inner(area);
        block.render(area, buf);

        let [grid_area, legend_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(inner);

        let width = view.grid_width.max(1);
        for (id, tile) in (0..).zip(&view.tiles) {
            let (column, row) = (id % width, id / width);
            let Ok(x) = u16::try_from(column * 2) else {
                continue;
            };
            let Ok(y) = u16::try_from(row) else {
                break;
            };
            if x.saturating_add(1) >= grid_area.width || y >= grid_area.height {
                continue;
            }
            let style = Style::default().fg(tile.map_or(DEFAULT_TILE, color));
            buf.set_string(grid_area.x + x, grid_area.y + y, "██", style);
        }

        let legend = if view.bounds.is_empty() {
            Line::raw("no data")
        } else {
            Line::from(vec![
                Span::raw(format!("{:.1} ", view.bounds.min)),
                Span::styled("██", Style::default().fg(color(view.low))),
                Span::raw(" … "),
                Span::styled("██", Style::default().fg(color(view.high))),
                Span::raw(format!(" {:.1}", view.bounds.max)),
            ])
        };
        legend.render(legend_area, buf);
    }
}
