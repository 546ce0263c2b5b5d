//! An in-memory host for unit tests.

use crate::host::{
    BuildingId, BuildingRecord, BuildingState, CitizenId, CitizenKind, CitizenRecord, DistrictId,
    Education, Gender, Host, Location, Position, UNIT_CAPACITY, UnitId, UnitRecord, Wealth,
};

/// A healthy, unemployed male resident of building 0 with the given host age.
pub fn citizen(age: u16) -> CitizenRecord {
    CitizenRecord {
        kind: CitizenKind::Resident,
        dead: false,
        moving_in: false,
        home_building: Some(0),
        work_building: None,
        age,
        education: Education::Uneducated,
        gender: Gender::Male,
        happiness: 50,
        health: 50,
        wellbeing: 50,
        location: Location::Home,
        wealth: Wealth::Low,
        school: None,
    }
}

#[derive(Debug)]
struct TestBuilding {
    category: String,
    state: BuildingState,
    level: u8,
    district: DistrictId,
    first_unit: Option<UnitId>,
    last_unit: Option<UnitId>,
}

/// Tables grow as records are added; identifiers are assigned in order.
#[derive(Debug)]
pub struct TestHost {
    pub ready: bool,
    /// Looking up this citizen panics.
    pub panic_on_citizen: Option<CitizenId>,
    citizens: Vec<Option<CitizenRecord>>,
    buildings: Vec<TestBuilding>,
    units: Vec<UnitRecord>,
}

impl TestHost {
    pub fn new() -> Self {
        Self {
            ready: true,
            panic_on_citizen: None,
            citizens: vec![],
            buildings: vec![],
            units: vec![],
        }
    }

    /// Adds a completed building located in `district`.
    pub fn add_building(&mut self, category: &str, level: u8, district: DistrictId) -> BuildingId {
        let id = self.buildings.len().try_into().unwrap();
        self.buildings.push(TestBuilding {
            category: category.to_owned(),
            state: BuildingState::Completed,
            level,
            district,
            first_unit: None,
            last_unit: None,
        });
        id
    }

    pub fn set_building_state(&mut self, building: BuildingId, state: BuildingState) {
        self.buildings[building as usize].state = state;
    }

    /// Appends a home unit to the end of the building's unit chain.
    pub fn add_unit(&mut self, building: BuildingId, citizens: &[CitizenId]) -> UnitId {
        let id = self.units.len().try_into().unwrap();
        self.units.push(UnitRecord {
            building,
            home: true,
            citizens: citizens.iter().copied().collect(),
            next: None,
        });
        let record = &mut self.buildings[building as usize];
        match record.last_unit.replace(id) {
            Some(last) => self.units[last as usize].next = Some(id),
            None => record.first_unit = Some(id),
        }
        id
    }

    pub fn link_unit(&mut self, unit: UnitId, next: Option<UnitId>) {
        self.units[unit as usize].next = next;
    }

    /// Adds a citizen without placing it in any unit.
    pub fn add_citizen(&mut self, record: CitizenRecord) -> CitizenId {
        let id = self.citizens.len().try_into().unwrap();
        self.citizens.push(Some(record));
        id
    }

    /// Adds a citizen living in `building` and moves it into a home unit.
    pub fn add_resident(&mut self, building: BuildingId, record: CitizenRecord) -> CitizenId {
        let id = self.add_citizen(CitizenRecord {
            home_building: Some(building),
            ..record
        });
        let last = self.buildings[building as usize].last_unit;
        let free = last.filter(|&unit| self.units[unit as usize].citizens.len() < UNIT_CAPACITY);
        match free {
            Some(unit) => self.units[unit as usize].citizens.push(id),
            None => {
                self.add_unit(building, &[id]);
            }
        }
        id
    }

    /// Adds a citizen slot that is not in use.
    pub fn add_empty_slot(&mut self) -> CitizenId {
        let id = self.citizens.len().try_into().unwrap();
        self.citizens.push(None);
        id
    }
}

impl Host for TestHost {
    fn is_ready(&self) -> bool {
        self.ready
    }

    fn citizen_capacity(&self) -> u32 {
        self.citizens.len().try_into().unwrap()
    }

    fn citizen(&self, id: CitizenId) -> Option<CitizenRecord> {
        assert_ne!(self.panic_on_citizen, Some(id), "corrupt citizen record");
        self.citizens.get(id as usize).copied().flatten()
    }

    fn building_capacity(&self) -> u32 {
        self.buildings.len().try_into().unwrap()
    }

    fn building(&self, id: BuildingId) -> Option<BuildingRecord<'_>> {
        let building = self.buildings.get(id as usize)?;
        Some(BuildingRecord {
            category: &building.category,
            state: building.state,
            level: building.level,
            position: Position {
                x: f32::from(building.district),
                z: 0.0,
            },
            first_unit: building.first_unit,
        })
    }

    fn unit_capacity(&self) -> u32 {
        self.units.len().try_into().unwrap()
    }

    fn unit(&self, id: UnitId) -> Option<UnitRecord> {
        self.units.get(id as usize).cloned()
    }

    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn district_at(&self, position: Position) -> DistrictId {
        position.x as DistrictId
    }
}
