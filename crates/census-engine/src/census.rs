//! The simulation-side writer and the presentation-side reader of a census.
//!
//! [`channel`] creates a connected pair sharing one [`SnapshotBuffer`]. The
//! writer is driven once per simulation step and publishes a snapshot each
//! time a pass over the citizen table completes. Readers never block the
//! writer for longer than an `Arc` clone.

use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
    sync::Arc,
};

use census_stats::range::MetricRange;
use tracing::{error, warn};

use crate::{
    aggregate::{DataRows, DistrictFilter, Metric, MetricBounds},
    classify::{Axis, ClassifiedCitizen, Home, classify},
    color::{ColorRamp, Rgb},
    config::{CategoryAllowList, CensusConfig},
    host::{BuildingId, Host, UnitChain},
    scan::{Scanner, Snapshot, SnapshotBuffer},
};

/// Creates a connected writer/reader pair.
#[must_use]
pub fn channel(config: CensusConfig) -> (CensusWriter, CensusReader) {
    let buffer = Arc::new(SnapshotBuffer::new());
    let writer = CensusWriter {
        scanner: Scanner::new(&config),
        slice_size: config.slice_size.max(1),
        buffer: Arc::clone(&buffer),
    };
    let reader = CensusReader {
        buffer,
        colors: config.colors,
        residential_categories: Arc::new(config.residential_categories),
    };
    (writer, reader)
}

/// What a call to [`CensusWriter::tick`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum TickOutcome {
    /// The host was not ready; nothing was scanned.
    NotReady,
    /// A slice was scanned and the pass is still in progress.
    Scanned { processed: u32 },
    /// The pass completed and its snapshot was published.
    Published { pass: u64, citizens: usize },
    /// The tick panicked; the pass in progress was discarded.
    Failed,
}

/// Drives the scanner from the simulation thread.
#[derive(Debug)]
pub struct CensusWriter {
    scanner: Scanner,
    slice_size: u32,
    buffer: Arc<SnapshotBuffer>,
}

impl CensusWriter {
    /// Scans the next slice of the citizen table and publishes the pass if it
    /// is complete.
    ///
    /// A panic raised while scanning is caught here: it is logged, the pass in
    /// progress is discarded and restarted on the next tick, and the
    /// previously published snapshot stays visible.
    pub fn tick<H>(&mut self, host: &H) -> TickOutcome
    where
        H: Host + ?Sized,
    {
        let result = panic::catch_unwind(AssertUnwindSafe(|| self.advance(host)));
        match result {
            Ok(outcome) => outcome,
            Err(payload) => {
                error!(
                    pass = self.scanner.pass(),
                    cursor = self.scanner.cursor(),
                    message = panic_message(payload.as_ref()),
                    "census tick panicked, discarding pass"
                );
                self.scanner.reset();
                TickOutcome::Failed
            }
        }
    }

    fn advance<H>(&mut self, host: &H) -> TickOutcome
    where
        H: Host + ?Sized,
    {
        if !host.is_ready() {
            return TickOutcome::NotReady;
        }
        let end = self.scanner.cursor().saturating_add(self.slice_size);
        let processed = self.scanner.process_slice(host, end);
        if !self.scanner.is_pass_complete(host) {
            return TickOutcome::Scanned { processed };
        }

        let snapshot = self.scanner.finalize_pass();
        let pass = snapshot.pass();
        let citizens = snapshot.citizens().len();
        self.buffer.publish(snapshot);
        TickOutcome::Published { pass, citizens }
    }

    /// Number of the pass in progress.
    #[must_use]
    pub fn pass(&self) -> u64 {
        self.scanner.pass()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "<non-string panic payload>"
    }
}

/// Read access to the published census for the presentation layer.
#[derive(Debug, Clone)]
pub struct CensusReader {
    buffer: Arc<SnapshotBuffer>,
    colors: ColorRamp,
    residential_categories: Arc<CategoryAllowList>,
}

impl CensusReader {
    /// Returns the last published snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.buffer.load()
    }

    /// Builds the histogram of the published snapshot.
    #[must_use]
    pub fn data_rows(&self, row_axis: Axis, column_axis: Axis, filter: DistrictFilter) -> DataRows {
        self.snapshot().data_rows(row_axis, column_axis, filter)
    }

    /// Min/max of `metric` over the qualifying buildings of the selected district.
    #[must_use]
    pub fn bounds(&self, metric: Metric) -> MetricRange {
        self.buffer.bounds().get(metric)
    }

    #[must_use]
    pub fn all_bounds(&self) -> MetricBounds {
        self.buffer.bounds()
    }

    #[must_use]
    pub fn district_filter(&self) -> DistrictFilter {
        self.buffer.filter()
    }

    /// Selects the district used for metric bounds and requests a redraw.
    pub fn set_district_filter(&self, filter: DistrictFilter) {
        self.buffer.set_filter(filter);
    }

    #[must_use]
    pub fn colors(&self) -> &ColorRamp {
        &self.colors
    }

    /// Returns the display color of `building` for `metric`.
    ///
    /// `None` means the host should use its default color: the building is
    /// missing, not operational, or has no demographic in the published
    /// snapshot.
    #[must_use]
    pub fn building_color<H>(&self, host: &H, building: BuildingId, metric: Metric) -> Option<Rgb>
    where
        H: Host + ?Sized,
    {
        let record = host.building(building)?;
        if !record.state.is_operational() {
            return None;
        }
        let (snapshot, bounds) = self.buffer.load_with_bounds();
        let demographic = snapshot.building(building)?;
        let value = demographic.metric_value(metric);
        Some(self.colors.map(value, bounds.get(metric)))
    }

    /// Returns `true` if a redraw was requested since the last call.
    #[must_use]
    pub fn take_redraw(&self) -> bool {
        self.buffer.take_redraw()
    }

    pub fn request_redraw(&self) {
        self.buffer.request_redraw();
    }

    /// Classifies the current residents of `building` directly from the host.
    ///
    /// Walks the building's household units; a corrupt unit chain is logged
    /// and the residents found before the corruption are returned.
    #[must_use]
    pub fn building_residents<H>(&self, host: &H, building: BuildingId) -> Vec<ClassifiedCitizen>
    where
        H: Host + ?Sized,
    {
        let Some(record) = host.building(building) else {
            return vec![];
        };
        if !self.residential_categories.matches(record.category) {
            warn!(building, category = record.category, "not a residential building");
            return vec![];
        }
        let home = Home {
            building,
            district: host.district_at(record.position),
            residential_level: record.level,
        };
        let context = self.snapshot().context();

        let mut residents = vec![];
        for unit in UnitChain::new(host, record.first_unit) {
            let (_, unit) = match unit {
                Ok(unit) => unit,
                Err(e) => {
                    error!(building, error = %e, "corrupt household chain");
                    break;
                }
            };
            if !unit.home {
                continue;
            }
            for id in unit.citizens {
                let Some(citizen) = host.citizen(id) else {
                    continue;
                };
                if citizen.is_resident() {
                    residents.push(classify(id, &citizen, home, context));
                }
            }
        }
        residents
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        CitizenRecord,
        host::{BuildingState, Education},
        testing::{self, TestHost},
    };

    fn publish_all(writer: &mut CensusWriter, host: &TestHost) -> TickOutcome {
        for _ in 0..1000 {
            let outcome = writer.tick(host);
            if outcome.is_published() {
                return outcome;
            }
        }
        panic!("pass did not complete");
    }

    fn config(slice_size: u32) -> CensusConfig {
        CensusConfig {
            slice_size,
            ..CensusConfig::default()
        }
    }

    #[test]
    fn test_pass_publishes_once() {
        let mut host = TestHost::new();
        let house = host.add_building("ResidentialBuildingAI", 1, 0);
        for _ in 0..5 {
            host.add_resident(house, testing::citizen(100));
        }
        let (mut writer, reader) = channel(config(2));

        assert_eq!(writer.tick(&host), TickOutcome::Scanned { processed: 2 });
        assert_eq!(writer.tick(&host), TickOutcome::Scanned { processed: 2 });
        assert!(!reader.take_redraw());
        assert_eq!(reader.snapshot().pass(), 0);
        assert_eq!(
            writer.tick(&host),
            TickOutcome::Published {
                pass: 1,
                citizens: 5
            }
        );
        assert!(reader.take_redraw());
        assert_eq!(reader.snapshot().citizens().len(), 5);
        assert_eq!(writer.pass(), 2);
    }

    #[test]
    fn test_not_ready_tick() {
        let mut host = TestHost::new();
        host.ready = false;
        let (mut writer, reader) = channel(CensusConfig::default());
        assert_eq!(writer.tick(&host), TickOutcome::NotReady);
        assert!(!reader.take_redraw());
    }

    #[test]
    fn test_three_residents_scenario() {
        let mut host = TestHost::new();
        let a = host.add_building("ResidentialBuildingAI", 1, 1);
        let b = host.add_building("ResidentialBuildingAI", 1, 2);
        host.add_resident(a, testing::citizen(10));
        host.add_resident(
            a,
            CitizenRecord {
                moving_in: true,
                education: Education::TwoSchools,
                ..testing::citizen(120)
            },
        );
        host.add_resident(
            b,
            CitizenRecord {
                dead: true,
                education: Education::OneSchool,
                ..testing::citizen(300)
            },
        );
        let (mut writer, reader) = channel(CensusConfig::default());
        publish_all(&mut writer, &host);

        let rows = reader.data_rows(Axis::AgeGroup, Axis::Education, DistrictFilter::EntireCity);
        assert_eq!(rows.rows[0].amount.get(0), 1);
        assert_eq!(rows.rows[0].total(), 1);
        assert_eq!((rows.rows[3].total(), rows.rows[3].moving_in), (0, 1));
        assert_eq!((rows.rows[4].total(), rows.rows[4].deceased), (0, 1));
        assert_eq!(
            (rows.total.total(), rows.total.moving_in, rows.total.deceased),
            (1, 1, 1)
        );
    }

    #[test]
    fn test_single_building_is_high_color() {
        let mut host = TestHost::new();
        let house = host.add_building("ResidentialBuildingAI", 1, 0);
        // real ages 40 and 44
        host.add_resident(house, testing::citizen(140));
        host.add_resident(house, testing::citizen(154));
        let (mut writer, reader) = channel(CensusConfig::default());
        publish_all(&mut writer, &host);

        let range = reader.bounds(Metric::Age);
        assert_eq!((range.min, range.max), (42.0, 42.0));
        let color = reader.building_color(&host, house, Metric::Age);
        assert_eq!(color, Some(reader.colors().high));
    }

    #[test]
    fn test_building_color_fallbacks() {
        let mut host = TestHost::new();
        let young = host.add_building("ResidentialBuildingAI", 1, 1);
        let old = host.add_building("ResidentialBuildingAI", 1, 2);
        let kids = host.add_building("ResidentialBuildingAI", 1, 1);
        let empty = host.add_building("ResidentialBuildingAI", 1, 1);
        host.add_resident(young, testing::citizen(40));
        host.add_resident(old, testing::citizen(280));
        host.add_resident(kids, testing::citizen(7));
        let (mut writer, reader) = channel(CensusConfig::default());
        publish_all(&mut writer, &host);

        let colors = *reader.colors();
        assert_eq!(reader.building_color(&host, empty, Metric::Age), None);
        assert_eq!(reader.building_color(&host, 99, Metric::Age), None);
        assert_eq!(reader.building_color(&host, old, Metric::Age), Some(colors.high));
        // no job-eligible residents anywhere: no data
        assert_eq!(
            reader.building_color(&host, young, Metric::Employment),
            Some(colors.neutral)
        );

        host.set_building_state(old, BuildingState::Abandoned);
        assert_eq!(reader.building_color(&host, old, Metric::Age), None);

        // a district with no qualifying building yields the neutral color
        reader.set_district_filter(DistrictFilter::District(7));
        assert!(reader.take_redraw());
        assert_eq!(
            reader.building_color(&host, young, Metric::Age),
            Some(colors.neutral)
        );
    }

    #[test]
    fn test_panicking_host_keeps_last_snapshot() {
        let mut host = TestHost::new();
        let house = host.add_building("ResidentialBuildingAI", 1, 0);
        host.add_resident(house, testing::citizen(100));
        let (mut writer, reader) = channel(CensusConfig::default());
        publish_all(&mut writer, &host);
        assert!(reader.take_redraw());

        host.panic_on_citizen = Some(0);
        assert_eq!(writer.tick(&host), TickOutcome::Failed);
        assert_eq!(reader.snapshot().pass(), 1);
        assert!(!reader.take_redraw());

        host.panic_on_citizen = None;
        let outcome = publish_all(&mut writer, &host);
        assert_eq!(
            outcome,
            TickOutcome::Published {
                pass: 2,
                citizens: 1
            }
        );
    }

    #[test]
    fn test_building_residents() {
        let mut host = TestHost::new();
        let house = host.add_building("ResidentialBuildingAI", 2, 4);
        let first = host.add_resident(house, testing::citizen(100));
        let second = host.add_resident(house, testing::citizen(20));
        let (_, reader) = channel(CensusConfig::default());

        let residents = reader.building_residents(&host, house);
        let ids = residents.iter().map(|c| c.id).collect::<Vec<_>>();
        assert_eq!(ids, [first, second]);
        assert!(residents.iter().all(|c| c.district == 4));
        assert_eq!(residents[0].bucket(Axis::ResidentialLevel), 1);
    }

    #[test]
    fn test_building_residents_stops_at_cycle() {
        let mut host = TestHost::new();
        let house = host.add_building("ResidentialBuildingAI", 1, 0);
        let citizen = host.add_citizen(CitizenRecord {
            home_building: Some(house),
            ..testing::citizen(100)
        });
        let unit = host.add_unit(house, &[citizen]);
        host.link_unit(unit, Some(unit));
        let (_, reader) = channel(CensusConfig::default());

        // the unit table holds one unit, so the self-link is reported on the second step
        let residents = reader.building_residents(&host, house);
        assert_eq!(residents.len(), 1);
    }
}
