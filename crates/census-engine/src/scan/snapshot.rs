use std::sync::{
    Arc, Mutex, MutexGuard, PoisonError,
    atomic::{AtomicBool, Ordering},
};

use tracing::debug;

use crate::{
    aggregate::{BuildingDemographic, DataRows, DistrictFilter, MetricBounds},
    classify::{Axis, ClassifiedCitizen, ClassifyContext},
    host::BuildingId,
};

/// The result of one complete scan pass.
///
/// Citizens and buildings are always from the same pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pass: u64,
    context: ClassifyContext,
    citizens: Vec<ClassifiedCitizen>,
    buildings: Vec<Option<BuildingDemographic>>,
}

impl Snapshot {
    #[must_use]
    pub fn new(
        pass: u64,
        context: ClassifyContext,
        citizens: Vec<ClassifiedCitizen>,
        buildings: Vec<Option<BuildingDemographic>>,
    ) -> Self {
        Self {
            pass,
            context,
            citizens,
            buildings,
        }
    }

    /// Number of the pass that produced the snapshot; 0 before the first pass.
    #[must_use]
    pub fn pass(&self) -> u64 {
        self.pass
    }

    /// Classification context the pass ran with.
    #[must_use]
    pub fn context(&self) -> ClassifyContext {
        self.context
    }

    #[must_use]
    pub fn citizens(&self) -> &[ClassifiedCitizen] {
        &self.citizens
    }

    /// Returns the demographic of `building`, or `None` if no resident was
    /// classified into it during the pass.
    #[must_use]
    pub fn building(&self, building: BuildingId) -> Option<&BuildingDemographic> {
        self.buildings.get(building as usize)?.as_ref()
    }

    /// Iterates over the buildings with a demographic.
    pub fn buildings(&self) -> impl Iterator<Item = (BuildingId, &BuildingDemographic)> {
        (0..)
            .zip(&self.buildings)
            .filter_map(|(id, slot)| Some((id, slot.as_ref()?)))
    }

    /// Number of buildings with a demographic.
    #[must_use]
    pub fn building_count(&self) -> usize {
        self.buildings.iter().flatten().count()
    }

    #[must_use]
    pub fn data_rows(&self, row_axis: Axis, column_axis: Axis, filter: DistrictFilter) -> DataRows {
        DataRows::build(&self.citizens, row_axis, column_axis, filter)
    }

    #[must_use]
    pub fn bounds(&self, filter: DistrictFilter) -> MetricBounds {
        MetricBounds::compute(self.buildings.iter().flatten(), filter)
    }
}

#[derive(Debug, Default)]
struct Published {
    snapshot: Arc<Snapshot>,
    filter: DistrictFilter,
    /// Bounds of `snapshot` under `filter`.
    bounds: MetricBounds,
}

/// The published side of the double buffer.
///
/// The scanner builds the next snapshot privately and hands it over whole;
/// the swap replaces one `Arc` under the lock. Readers clone the `Arc` and
/// work on the immutable snapshot without holding the lock.
#[derive(Debug, Default)]
pub struct SnapshotBuffer {
    published: Mutex<Published>,
    redraw: AtomicBool,
}

impl SnapshotBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Published> {
        self.published.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replaces the published snapshot and raises the redraw flag.
    pub fn publish(&self, snapshot: Snapshot) {
        let filter = self.lock().filter;
        let bounds = snapshot.bounds(filter);
        let snapshot = Arc::new(snapshot);

        let mut published = self.lock();
        published.bounds = if published.filter == filter {
            bounds
        } else {
            debug!(pass = snapshot.pass(), "district filter changed during publish");
            snapshot.bounds(published.filter)
        };
        published.snapshot = snapshot;
        drop(published);

        self.request_redraw();
    }

    #[must_use]
    pub fn load(&self) -> Arc<Snapshot> {
        Arc::clone(&self.lock().snapshot)
    }

    /// Returns the published snapshot together with its bounds.
    #[must_use]
    pub fn load_with_bounds(&self) -> (Arc<Snapshot>, MetricBounds) {
        let published = self.lock();
        (Arc::clone(&published.snapshot), published.bounds)
    }

    #[must_use]
    pub fn filter(&self) -> DistrictFilter {
        self.lock().filter
    }

    /// Returns the metric bounds of the published snapshot under the current
    /// district filter.
    #[must_use]
    pub fn bounds(&self) -> MetricBounds {
        self.lock().bounds
    }

    /// Selects a district and recomputes the bounds.
    pub fn set_filter(&self, filter: DistrictFilter) {
        let snapshot = {
            let published = self.lock();
            if published.filter == filter {
                return;
            }
            Arc::clone(&published.snapshot)
        };
        let bounds = snapshot.bounds(filter);

        let mut published = self.lock();
        published.bounds = if Arc::ptr_eq(&published.snapshot, &snapshot) {
            bounds
        } else {
            published.snapshot.bounds(filter)
        };
        published.filter = filter;
        drop(published);

        self.request_redraw();
    }

    pub fn request_redraw(&self) {
        self.redraw.store(true, Ordering::Release);
    }

    /// Returns `true` if a redraw was requested since the last call.
    pub fn take_redraw(&self) -> bool {
        self.redraw.swap(false, Ordering::AcqRel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Metric,
        aggregate::BuildingAccumulator,
        classify::{Home, classify, real_age},
        testing,
    };

    fn snapshot(pass: u64, ages: &[(u8, u16)]) -> Snapshot {
        let mut citizens = vec![];
        let mut buildings = vec![];
        for (id, &(district, age)) in (0..).zip(ages) {
            let record = testing::citizen(age);
            let home = Home {
                building: id,
                district,
                residential_level: 1,
            };
            let citizen = classify(id, &record, home, ClassifyContext::default());
            let mut acc = BuildingAccumulator::new(district, 1);
            acc.add(&citizen, real_age(age));
            citizens.push(citizen);
            buildings.push(Some(acc.finalize()));
        }
        Snapshot::new(pass, ClassifyContext::default(), citizens, buildings)
    }

    #[test]
    fn test_initial_state_is_empty() {
        let buffer = SnapshotBuffer::new();
        assert_eq!(buffer.load().pass(), 0);
        assert!(buffer.load().citizens().is_empty());
        assert!(buffer.bounds().get(Metric::Age).is_empty());
        assert!(!buffer.take_redraw());
    }

    #[test]
    fn test_publish_swaps_and_flags_redraw() {
        let buffer = SnapshotBuffer::new();
        let before = buffer.load();
        buffer.publish(snapshot(1, &[(1, 35), (2, 175)]));

        assert!(buffer.take_redraw());
        assert!(!buffer.take_redraw());
        // readers holding the old snapshot keep it
        assert_eq!(before.pass(), 0);
        let after = buffer.load();
        assert_eq!(after.pass(), 1);
        assert_eq!(after.building_count(), 2);
        let range = buffer.bounds().get(Metric::Age);
        assert_eq!((range.min, range.max), (10.0, 50.0));
    }

    #[test]
    fn test_filter_recomputes_bounds() {
        let buffer = SnapshotBuffer::new();
        buffer.publish(snapshot(1, &[(1, 35), (2, 175)]));
        buffer.take_redraw();

        buffer.set_filter(DistrictFilter::District(2));
        assert!(buffer.take_redraw());
        assert_eq!(buffer.filter(), DistrictFilter::District(2));
        let range = buffer.bounds().get(Metric::Age);
        assert!(range.is_degenerate());
        assert_eq!(range.max, 50.0);

        // selecting the same filter again changes nothing
        buffer.set_filter(DistrictFilter::District(2));
        assert!(!buffer.take_redraw());

        // later publishes keep the selected filter
        buffer.publish(snapshot(2, &[(1, 35), (2, 70)]));
        assert_eq!(buffer.bounds().get(Metric::Age).max, 20.0);
    }

    #[test]
    fn test_snapshot_buildings() {
        let snapshot = snapshot(3, &[(0, 100)]);
        assert!(snapshot.building(0).is_some());
        assert!(snapshot.building(1).is_none());
        assert_eq!(snapshot.buildings().map(|(id, _)| id).collect::<Vec<_>>(), [0]);
        let rows = snapshot.data_rows(Axis::Gender, Axis::Wealth, DistrictFilter::EntireCity);
        assert_eq!(rows.total.total(), 1);
    }
}
