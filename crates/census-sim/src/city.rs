use arrayvec::ArrayVec;
use census_engine::{
    AgeGroup, BuildingId, BuildingRecord, BuildingState, CitizenId, CitizenRecord, DistrictId,
    Host, Position, UnitId, UnitRecord,
};
use rand::{Rng, SeedableRng as _, seq::SliceRandom as _};
use rand_pcg::Pcg32;
use tracing::debug;

use crate::{CityConfig, CityError, population::CitizenSampler};

/// Side length of one map grid cell.
const CELL_SIZE: f32 = 40.0;

const RESIDENTIAL_CATEGORY: &str = "ResidentialBuildingAI";
const PLOPPABLE_CATEGORY: &str = "PloppableRICO.PloppableResidential";
const COMMERCIAL_CATEGORY: &str = "CommercialBuildingAI";
const COLLIDER_CATEGORY: &str = "HadronColliderAI";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BuildingKind {
    Residential,
    Ploppable,
    Commercial,
    Collider,
}

impl BuildingKind {
    fn category(self) -> &'static str {
        match self {
            Self::Residential => RESIDENTIAL_CATEGORY,
            Self::Ploppable => PLOPPABLE_CATEGORY,
            Self::Commercial => COMMERCIAL_CATEGORY,
            Self::Collider => COLLIDER_CATEGORY,
        }
    }

    fn is_residential(self) -> bool {
        matches!(self, Self::Residential | Self::Ploppable)
    }
}

#[derive(Debug, Clone)]
struct SimBuilding {
    kind: BuildingKind,
    state: BuildingState,
    level: u8,
    position: Position,
    first_unit: Option<UnitId>,
}

/// What one [`SyntheticCity::step`] changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepSummary {
    pub aged: u32,
    pub died: u32,
    /// Deceased citizens whose slot was freed.
    pub removed: u32,
    pub moved_in: u32,
    /// Residents whose move completed.
    pub settled: u32,
    pub abandoned: u32,
    pub restored: u32,
}

/// A generated city implementing [`Host`].
///
/// Buildings are laid out on a square grid and the map is split into
/// vertical district stripes. Households are unit chains of up to five
/// citizens; residential buildings get `1 + 2 * level` units.
#[derive(Debug, Clone)]
pub struct SyntheticCity {
    config: CityConfig,
    rng: Pcg32,
    sampler: CitizenSampler,
    ready: bool,
    step: u64,
    citizens: Vec<Option<CitizenRecord>>,
    /// Unit each citizen lives in.
    homes: Vec<Option<UnitId>>,
    buildings: Vec<SimBuilding>,
    units: Vec<UnitRecord>,
    residential: Vec<BuildingId>,
    workplaces: Vec<BuildingId>,
}

impl SyntheticCity {
    /// Generates a city from `config`.
    pub fn generate(config: CityConfig) -> Result<Self, CityError> {
        config.validate()?;
        let sampler =
            CitizenSampler::new(&config.population).map_err(CityError::Distribution)?;
        let mut city = Self {
            rng: Pcg32::seed_from_u64(config.seed),
            sampler,
            ready: true,
            step: 0,
            citizens: vec![],
            homes: vec![],
            buildings: vec![],
            units: vec![],
            residential: vec![],
            workplaces: vec![],
            config,
        };
        city.build_map();
        city.populate();
        debug!(
            citizens = city.population(),
            buildings = city.buildings.len(),
            units = city.units.len(),
            "generated city"
        );
        Ok(city)
    }

    #[must_use]
    pub fn config(&self) -> &CityConfig {
        &self.config
    }

    /// Number of [`SyntheticCity::step`] calls so far.
    #[must_use]
    pub fn steps(&self) -> u64 {
        self.step
    }

    /// Number of citizen slots in use.
    #[must_use]
    pub fn population(&self) -> usize {
        self.citizens.iter().flatten().count()
    }

    /// Simulates the host's managers still loading.
    pub fn set_ready(&mut self, ready: bool) {
        self.ready = ready;
    }

    /// Identifiers of all buildings in map order.
    pub fn building_ids(&self) -> impl Iterator<Item = BuildingId> + use<> {
        0..u32::try_from(self.buildings.len()).unwrap_or(u32::MAX)
    }

    /// Grid cell of a building as `(column, row)`.
    #[must_use]
    pub fn grid_cell(&self, building: BuildingId) -> (u32, u32) {
        (building % self.config.grid_width, building / self.config.grid_width)
    }

    fn build_map(&mut self) {
        let mut kinds = vec![];
        for i in 0..self.config.residential_buildings {
            // roughly one in twenty homes comes from the ploppable extension
            kinds.push(if i % 20 == 19 {
                BuildingKind::Ploppable
            } else {
                BuildingKind::Residential
            });
        }
        kinds.extend((0..self.config.commercial_buildings).map(|_| BuildingKind::Commercial));
        if self.config.hadron_collider {
            kinds.push(BuildingKind::Collider);
        }
        kinds.shuffle(&mut self.rng);

        for (id, kind) in (0..).zip(kinds) {
            let (column, row) = self.grid_cell(id);
            #[expect(clippy::cast_precision_loss)]
            let position = Position {
                x: (column as f32 + 0.5) * CELL_SIZE,
                z: (row as f32 + 0.5) * CELL_SIZE,
            };
            let state = match self.rng.random_range(0..100) {
                0 => BuildingState::UnderConstruction,
                1 => BuildingState::Abandoned,
                _ => BuildingState::Completed,
            };
            let level = if kind.is_residential() {
                self.rng.random_range(1..=5)
            } else {
                1
            };
            self.buildings.push(SimBuilding {
                kind,
                state,
                level,
                position,
                first_unit: None,
            });
            let unit_count = if kind.is_residential() {
                1 + 2 * u32::from(level)
            } else {
                1
            };
            for _ in 0..unit_count {
                self.push_unit(id, kind.is_residential());
            }
            if kind.is_residential() {
                self.residential.push(id);
            } else if kind == BuildingKind::Commercial {
                self.workplaces.push(id);
            }
        }
    }

    fn push_unit(&mut self, building: BuildingId, home: bool) {
        let id = UnitId::try_from(self.units.len()).unwrap_or(UnitId::MAX);
        let record = &mut self.buildings[building as usize];
        // prepend; the chain order does not matter to the host
        self.units.push(UnitRecord {
            building,
            home,
            citizens: ArrayVec::new(),
            next: record.first_unit.replace(id),
        });
    }

    fn populate(&mut self) {
        let capacity = self.config.citizen_capacity as usize;
        self.citizens = vec![None; capacity];
        self.homes = vec![None; capacity];
        for slot in 0..self.config.citizen_capacity {
            if !self.rng.random_bool(self.config.occupancy) {
                continue;
            }
            if self.rng.random_bool(self.config.tourist_ratio) {
                self.citizens[slot as usize] = Some(self.sampler.tourist(&mut self.rng));
            } else {
                self.move_in(slot, false);
            }
        }
    }

    /// Places a new resident into `slot`; returns `false` if no home was found.
    fn move_in(&mut self, slot: CitizenId, moving_in: bool) -> bool {
        let Some(unit) = self.find_free_unit() else {
            return false;
        };
        let building = self.units[unit as usize].building;
        let mut record = self
            .sampler
            .resident(&mut self.rng, building, &self.workplaces);
        record.moving_in = moving_in;
        self.units[unit as usize].citizens.push(slot);
        self.citizens[slot as usize] = Some(record);
        self.homes[slot as usize] = Some(unit);
        true
    }

    fn find_free_unit(&mut self) -> Option<UnitId> {
        for _ in 0..8 {
            let idx = self.rng.random_range(0..self.residential.len().max(1));
            let building = *self.residential.get(idx)?;
            let mut next = self.buildings[building as usize].first_unit;
            while let Some(id) = next {
                let unit = &self.units[id as usize];
                if unit.home && !unit.citizens.is_full() {
                    return Some(id);
                }
                next = unit.next;
            }
        }
        None
    }

    fn remove(&mut self, slot: CitizenId) {
        self.citizens[slot as usize] = None;
        if let Some(unit) = self.homes[slot as usize].take() {
            self.units[unit as usize].citizens.retain(|&mut id| id != slot);
        }
    }

    /// Advances the simulation by one step of population and building churn.
    pub fn step(&mut self) -> StepSummary {
        let churn = self.config.churn;
        let mut summary = StepSummary::default();

        for slot in 0..self.config.citizen_capacity {
            let Some(mut record) = self.citizens[slot as usize] else {
                if self.rng.random_bool(churn.move_in) && self.move_in(slot, true) {
                    summary.moved_in += 1;
                }
                continue;
            };
            if record.dead {
                self.remove(slot);
                summary.removed += 1;
                continue;
            }
            if record.moving_in {
                record.moving_in = false;
                summary.settled += 1;
            }
            if self.rng.random_bool(churn.aging) && record.age < census_engine::MAX_GAME_AGE {
                record.age += 1;
                summary.aged += 1;
            }
            let senior = AgeGroup::from_game_age(record.age) == AgeGroup::Senior;
            if record.is_resident() && senior && self.rng.random_bool(churn.death) {
                record.dead = true;
                summary.died += 1;
            }
            self.citizens[slot as usize] = Some(record);
        }

        for &id in &self.residential {
            let building = &mut self.buildings[id as usize];
            let state = building.state;
            match state {
                BuildingState::Completed if self.rng.random_bool(churn.abandon) => {
                    building.state = BuildingState::Abandoned;
                    summary.abandoned += 1;
                }
                BuildingState::Abandoned | BuildingState::UnderConstruction
                    if self.rng.random_bool(churn.restore) =>
                {
                    building.state = BuildingState::Completed;
                    summary.restored += 1;
                }
                _ => {}
            }
        }

        self.step += 1;
        summary
    }
}

impl Host for SyntheticCity {
    fn is_ready(&self) -> bool {
        self.ready
    }

    fn citizen_capacity(&self) -> u32 {
        self.config.citizen_capacity
    }

    fn citizen(&self, id: CitizenId) -> Option<CitizenRecord> {
        *self.citizens.get(id as usize)?
    }

    fn building_capacity(&self) -> u32 {
        u32::try_from(self.buildings.len()).unwrap_or(u32::MAX)
    }

    fn building(&self, id: BuildingId) -> Option<BuildingRecord<'_>> {
        let building = self.buildings.get(id as usize)?;
        Some(BuildingRecord {
            category: building.kind.category(),
            state: building.state,
            level: building.level,
            position: building.position,
            first_unit: building.first_unit,
        })
    }

    fn unit_capacity(&self) -> u32 {
        u32::try_from(self.units.len()).unwrap_or(u32::MAX)
    }

    fn unit(&self, id: UnitId) -> Option<UnitRecord> {
        self.units.get(id as usize).cloned()
    }

    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn district_at(&self, position: Position) -> DistrictId {
        let districts = u32::from(self.config.districts);
        if districts == 0 || position.x < 0.0 {
            return 0;
        }
        let column = (position.x / CELL_SIZE) as u32;
        let stripe = column * districts / self.config.grid_width;
        (stripe.min(districts - 1) + 1) as DistrictId
    }
}
