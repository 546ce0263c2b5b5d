use std::{
    sync::{Arc, RwLock},
    time::Duration,
};

use census_engine::{Axis, CensusReader, DistrictFilter, DistrictId, Metric, Rgb};
use census_sim::SyntheticCity;
use census_stats::range::MetricRange;
use crossterm::event::{Event, KeyCode, KeyEventKind};
use ratatui::Frame;

use crate::{
    command::watch::{read_city, ui},
    prefs::PanelPreferences,
    table::HistogramTable,
    tui::{App, Tui},
};

const UI_TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Everything drawn in one frame, rebuilt when the census publishes or a
/// selection changes.
#[derive(Debug)]
pub(super) struct View {
    pub pass: u64,
    pub steps: u64,
    pub population: usize,
    pub filter: DistrictFilter,
    pub metric: Metric,
    pub bounds: MetricRange,
    pub low: Rgb,
    pub high: Rgb,
    pub table: HistogramTable,
    pub grid_width: u32,
    /// Color of every building in map order; `None` draws the default tile.
    pub tiles: Vec<Option<Rgb>>,
}

#[derive(Debug)]
pub(super) struct WatchApp {
    reader: CensusReader,
    city: Arc<RwLock<SyntheticCity>>,
    prefs: PanelPreferences,
    metric: Metric,
    districts: DistrictId,
    scroll: usize,
    view: View,
    should_exit: bool,
}

impl WatchApp {
    pub(super) fn new(
        reader: CensusReader,
        city: Arc<RwLock<SyntheticCity>>,
        prefs: PanelPreferences,
        districts: DistrictId,
    ) -> Self {
        let metric = prefs.row_axis.metric();
        let view = build_view(&reader, &city, prefs, metric);
        Self {
            reader,
            city,
            prefs,
            metric,
            districts,
            scroll: 0,
            view,
            should_exit: false,
        }
    }

    pub(super) fn preferences(&self) -> PanelPreferences {
        self.prefs
    }

    fn refresh(&mut self) {
        self.view = build_view(&self.reader, &self.city, self.prefs, self.metric);
        self.scroll = self.scroll.min(self.view.table.rows.len().saturating_sub(1));
    }

    fn district_choices(&self) -> Vec<DistrictFilter> {
        [DistrictFilter::EntireCity]
            .into_iter()
            .chain((1..=self.districts).map(DistrictFilter::District))
            .collect()
    }

    fn select_row_axis(&mut self, forward: bool) {
        self.prefs.row_axis = cycle(&Axis::ALL, self.prefs.row_axis, forward);
        self.metric = self.prefs.row_axis.metric();
        self.scroll = 0;
    }

    fn select_column_axis(&mut self, forward: bool) {
        let columns = Axis::ALL
            .into_iter()
            .filter(|axis| axis.is_column_axis())
            .collect::<Vec<_>>();
        self.prefs.column_axis = cycle(&columns, self.prefs.column_axis, forward);
    }

    fn select_district(&mut self, forward: bool) {
        let filter = cycle(
            &self.district_choices(),
            self.reader.district_filter(),
            forward,
        );
        self.reader.set_district_filter(filter);
    }

    fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_exit = true;
                return;
            }
            KeyCode::Char('r') => self.select_row_axis(true),
            KeyCode::Char('R') => self.select_row_axis(false),
            KeyCode::Char('c') => self.select_column_axis(true),
            KeyCode::Char('C') => self.select_column_axis(false),
            KeyCode::Char('d') => self.select_district(true),
            KeyCode::Char('D') => self.select_district(false),
            KeyCode::Char('m') => self.metric = cycle(&Metric::ALL, self.metric, true),
            KeyCode::Char('M') => self.metric = cycle(&Metric::ALL, self.metric, false),
            KeyCode::Char('p') => self.prefs.display = self.prefs.display.toggled(),
            KeyCode::Char('h') => self.prefs.panel_visible = !self.prefs.panel_visible,
            KeyCode::Up => self.scroll = self.scroll.saturating_sub(1),
            KeyCode::Down => {
                let last = self.view.table.rows.len().saturating_sub(1);
                self.scroll = (self.scroll + 1).min(last);
            }
            _ => return,
        }
        self.refresh();
    }
}

impl App for WatchApp {
    fn init(&mut self, tui: &mut Tui) {
        tui.set_tick_interval(UI_TICK_INTERVAL);
    }

    fn should_exit(&self) -> bool {
        self.should_exit
    }

    fn handle_event(&mut self, _tui: &mut Tui, event: &Event) {
        if let Some(key) = event.as_key_event()
            && key.kind == KeyEventKind::Press
        {
            self.handle_key(key.code);
        }
    }

    fn update(&mut self, _tui: &mut Tui) -> bool {
        if !self.reader.take_redraw() {
            return false;
        }
        self.refresh();
        true
    }

    fn draw(&self, frame: &mut Frame) {
        ui::draw(frame, &self.view, self.prefs, self.scroll);
    }
}

fn build_view(
    reader: &CensusReader,
    city: &RwLock<SyntheticCity>,
    prefs: PanelPreferences,
    metric: Metric,
) -> View {
    let snapshot = reader.snapshot();
    let filter = reader.district_filter();
    let data = snapshot.data_rows(prefs.row_axis, prefs.column_axis, filter);
    let city = read_city(city);
    View {
        pass: snapshot.pass(),
        steps: city.steps(),
        population: city.population(),
        filter,
        metric,
        bounds: reader.bounds(metric),
        low: reader.colors().low,
        high: reader.colors().high,
        table: HistogramTable::new(&data, prefs.display),
        grid_width: city.config().grid_width,
        tiles: city
            .building_ids()
            .map(|id| reader.building_color(&*city, id, metric))
            .collect(),
    }
}

/// Returns the item after (or before) `current`, wrapping around.
///
/// An item not in `items` selects the first one.
fn cycle<T>(items: &[T], current: T, forward: bool) -> T
where
    T: Copy + PartialEq,
{
    let Some(pos) = items.iter().position(|&item| item == current) else {
        return items.first().copied().unwrap_or(current);
    };
    let len = items.len();
    let next = if forward {
        (pos + 1) % len
    } else {
        (pos + len - 1) % len
    };
    items[next]
}

#[cfg(test)]
mod tests {
    use census_engine::{CensusConfig, DisplayMode, census};
    use census_sim::CityConfig;

    use super::*;

    fn app() -> (WatchApp, census_engine::CensusWriter) {
        let city = SyntheticCity::generate(CityConfig {
            citizen_capacity: 1_000,
            residential_buildings: 30,
            commercial_buildings: 5,
            grid_width: 8,
            districts: 3,
            ..CityConfig::default()
        })
        .unwrap();
        let (writer, reader) = census::channel(CensusConfig::default());
        let app = WatchApp::new(
            reader,
            Arc::new(RwLock::new(city)),
            PanelPreferences::default(),
            3,
        );
        (app, writer)
    }

    #[test]
    fn test_cycle_wraps() {
        let items = [1, 2, 3];
        assert_eq!(cycle(&items, 3, true), 1);
        assert_eq!(cycle(&items, 1, false), 3);
        assert_eq!(cycle(&items, 2, true), 3);
        assert_eq!(cycle(&items, 9, true), 1);
    }

    #[test]
    fn test_keys_change_selection() {
        let (mut app, _writer) = app();
        app.handle_key(KeyCode::Char('r'));
        assert_eq!(app.prefs.row_axis, Axis::Education);
        assert_eq!(app.metric, Metric::Education);
        assert_eq!(app.view.table.row_axis, Axis::Education);

        app.handle_key(KeyCode::Char('C'));
        assert_eq!(app.prefs.column_axis, Axis::AgeGroup);
        app.handle_key(KeyCode::Char('C'));
        // single-year age is skipped
        assert_eq!(app.prefs.column_axis, Axis::WellBeing);

        app.handle_key(KeyCode::Char('p'));
        assert_eq!(app.view.table.display, DisplayMode::Percent);

        app.handle_key(KeyCode::Char('D'));
        assert_eq!(app.view.filter, DistrictFilter::District(3));
        assert_eq!(app.reader.district_filter(), DistrictFilter::District(3));

        app.handle_key(KeyCode::Char('q'));
        assert!(app.should_exit);
    }

    #[test]
    fn test_update_follows_publication() {
        let (mut app, mut writer) = app();
        let mut tui = Tui::new();
        // the initial empty snapshot is already shown
        assert!(!app.update(&mut tui));
        assert_eq!(app.view.pass, 0);

        let city = Arc::clone(&app.city);
        while !writer.tick(&*read_city(&city)).is_published() {}
        assert!(app.update(&mut tui));
        assert_eq!(app.view.pass, 1);
        assert!(app.view.tiles.iter().any(Option::is_some));
        assert!(!app.update(&mut tui));
    }
}
