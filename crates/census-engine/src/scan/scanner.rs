use std::mem;

use tracing::{debug, info, warn};

use crate::{
    BuildingAccumulator, CategoryAllowList, CategoryRule, CensusConfig,
    classify::{ClassifiedCitizen, ClassifyContext, Home, classify, real_age},
    host::{BuildingId, CitizenId, Host},
};

use super::Snapshot;

/// Walks the host's citizen table in slices, building one snapshot per pass.
///
/// A pass starts at identifier 0 and is complete once the cursor reaches the
/// end of the table; [`Scanner::finalize_pass`] then turns the accumulated
/// state into a [`Snapshot`] and resets for the next pass.
#[derive(Debug)]
pub struct Scanner {
    residential_categories: CategoryAllowList,
    modifier_category: Option<CategoryRule>,
    /// Number of the pass in progress; the first pass is 1.
    pass: u64,
    cursor: CitizenId,
    started: bool,
    context: ClassifyContext,
    citizens: Vec<ClassifiedCitizen>,
    buildings: Vec<Option<BuildingAccumulator>>,
}

impl Scanner {
    #[must_use]
    pub fn new(config: &CensusConfig) -> Self {
        Self {
            residential_categories: config.residential_categories.clone(),
            modifier_category: config.modifier_category.clone(),
            pass: 1,
            cursor: 0,
            started: false,
            context: ClassifyContext::default(),
            citizens: vec![],
            buildings: vec![],
        }
    }

    #[must_use]
    pub fn pass(&self) -> u64 {
        self.pass
    }

    /// First citizen identifier not yet visited in this pass.
    #[must_use]
    pub fn cursor(&self) -> CitizenId {
        self.cursor
    }

    #[must_use]
    pub fn context(&self) -> ClassifyContext {
        self.context
    }

    /// Visits citizen identifiers from the cursor up to `end_exclusive`
    /// (clamped to the citizen table) and returns how many were visited.
    ///
    /// Does nothing while the host is not ready.
    pub fn process_slice<H>(&mut self, host: &H, end_exclusive: CitizenId) -> u32
    where
        H: Host + ?Sized,
    {
        if !host.is_ready() {
            return 0;
        }
        if !self.started {
            self.begin_pass(host);
        }

        let start = self.cursor;
        let end = end_exclusive.min(host.citizen_capacity()).max(start);
        let before = self.citizens.len();
        for id in start..end {
            self.process_citizen(host, id);
        }
        self.cursor = end;
        debug!(
            pass = self.pass,
            start,
            end,
            classified = self.citizens.len() - before,
            "scanned slice"
        );
        end - start
    }

    /// Returns `true` once the cursor has reached the end of the citizen table.
    #[must_use]
    pub fn is_pass_complete<H>(&self, host: &H) -> bool
    where
        H: Host + ?Sized,
    {
        self.started && self.cursor >= host.citizen_capacity()
    }

    /// Finalizes the building averages and returns the pass as a snapshot.
    ///
    /// The scanner is reset; the next [`Scanner::process_slice`] starts a new
    /// pass at identifier 0.
    pub fn finalize_pass(&mut self) -> Snapshot {
        let citizens = mem::take(&mut self.citizens);
        let buildings = mem::take(&mut self.buildings)
            .into_iter()
            .map(|slot| slot.map(|acc| acc.finalize()))
            .collect::<Vec<_>>();
        let snapshot = Snapshot::new(self.pass, self.context, citizens, buildings);
        info!(
            pass = snapshot.pass(),
            citizens = snapshot.citizens().len(),
            buildings = snapshot.building_count(),
            "finalized pass"
        );
        self.pass += 1;
        self.cursor = 0;
        self.started = false;
        snapshot
    }

    /// Discards the pass in progress without publishing it.
    pub fn reset(&mut self) {
        self.citizens = vec![];
        self.buildings = vec![];
        self.cursor = 0;
        self.started = false;
    }

    fn begin_pass<H>(&mut self, host: &H)
    where
        H: Host + ?Sized,
    {
        self.context = ClassifyContext {
            teens_job_eligible: self.modifier_present(host),
        };
        self.citizens.clear();
        self.buildings = vec![None; host.building_capacity() as usize];
        self.started = true;
        debug!(
            pass = self.pass,
            teens_job_eligible = self.context.teens_job_eligible,
            "started pass"
        );
    }

    fn modifier_present<H>(&self, host: &H) -> bool
    where
        H: Host + ?Sized,
    {
        let Some(rule) = &self.modifier_category else {
            return false;
        };
        (0..host.building_capacity())
            .filter_map(|id| host.building(id))
            .any(|building| building.state.is_operational() && rule.matches(building.category))
    }

    fn process_citizen<H>(&mut self, host: &H, id: CitizenId)
    where
        H: Host + ?Sized,
    {
        let Some(record) = host.citizen(id) else {
            return;
        };
        if !record.is_resident() {
            return;
        }
        let Some(building_id) = record.home_building else {
            return;
        };
        let Some(building) = host.building(building_id) else {
            return;
        };
        if !building.state.is_operational()
            || !self.residential_categories.matches(building.category)
        {
            return;
        }

        let context = self.context;
        let pass = self.pass;
        let Some(slot) = self.building_slot(host, building_id) else {
            warn!(
                pass,
                citizen = id,
                building = building_id,
                "home building outside building table"
            );
            return;
        };
        let acc = slot.get_or_insert_with(|| {
            BuildingAccumulator::new(host.district_at(building.position), building.level)
        });
        let home = Home {
            building: building_id,
            district: acc.district(),
            residential_level: acc.residential_level(),
        };
        let citizen = classify(id, &record, home, context);
        if citizen.is_counted() {
            acc.add(&citizen, real_age(record.age));
        }
        self.citizens.push(citizen);
    }

    /// Returns the accumulator slot of `building`, growing the array if the
    /// host's building table grew during the pass.
    fn building_slot<H>(
        &mut self,
        host: &H,
        building: BuildingId,
    ) -> Option<&mut Option<BuildingAccumulator>>
    where
        H: Host + ?Sized,
    {
        let capacity = host.building_capacity();
        if building >= capacity {
            return None;
        }
        if self.buildings.len() < capacity as usize {
            self.buildings.resize(capacity as usize, None);
        }
        self.buildings.get_mut(building as usize)
    }
}
