//! Read-only access to the simulation host's tables.
//!
//! The host owns every record and may mutate them between calls. The engine
//! never assumes a memory layout: it only performs identifier-keyed lookups
//! through [`Host`] and works on copied records.
//!
//! Identifiers are dense indices into fixed-capacity tables. A lookup
//! returning `None` means the slot is not in use ("not created").

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::UnitChainError;

pub type CitizenId = u32;
pub type BuildingId = u32;
pub type UnitId = u32;
pub type DistrictId = u8;

/// Maximum number of citizens sharing one household unit.
pub const UNIT_CAPACITY: usize = 5;

/// Accessor for the host's citizen, building and household tables.
pub trait Host {
    /// Returns `false` while the host's managers are still initializing.
    fn is_ready(&self) -> bool;

    /// Size of the citizen table; valid identifiers are `0..citizen_capacity()`.
    fn citizen_capacity(&self) -> u32;

    fn citizen(&self, id: CitizenId) -> Option<CitizenRecord>;

    /// Size of the building table; valid identifiers are `0..building_capacity()`.
    fn building_capacity(&self) -> u32;

    fn building(&self, id: BuildingId) -> Option<BuildingRecord<'_>>;

    /// Size of the household unit table.
    fn unit_capacity(&self) -> u32;

    fn unit(&self, id: UnitId) -> Option<UnitRecord>;

    /// Returns the district containing `position` (0 for the unassigned area).
    fn district_at(&self, position: Position) -> DistrictId;
}

impl<H> Host for &H
where
    H: Host + ?Sized,
{
    fn is_ready(&self) -> bool {
        (**self).is_ready()
    }

    fn citizen_capacity(&self) -> u32 {
        (**self).citizen_capacity()
    }

    fn citizen(&self, id: CitizenId) -> Option<CitizenRecord> {
        (**self).citizen(id)
    }

    fn building_capacity(&self) -> u32 {
        (**self).building_capacity()
    }

    fn building(&self, id: BuildingId) -> Option<BuildingRecord<'_>> {
        (**self).building(id)
    }

    fn unit_capacity(&self) -> u32 {
        (**self).unit_capacity()
    }

    fn unit(&self, id: UnitId) -> Option<UnitRecord> {
        (**self).unit(id)
    }

    fn district_at(&self, position: Position) -> DistrictId {
        (**self).district_at(position)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CitizenKind {
    Resident,
    /// A transient visitor; never counted.
    Tourist,
    /// A placeholder the host uses for animation only; never counted.
    Dummy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Education {
    Uneducated,
    OneSchool,
    TwoSchools,
    ThreeSchools,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

/// Where the citizen currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Location {
    Home,
    Work,
    Visit,
    Moving,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Wealth {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SchoolLevel {
    Elementary,
    HighSchool,
    University,
}

/// A copy of one citizen's raw attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CitizenRecord {
    pub kind: CitizenKind,
    pub dead: bool,
    pub moving_in: bool,
    pub home_building: Option<BuildingId>,
    pub work_building: Option<BuildingId>,
    /// Age in host units (`0..=400`); see [`crate::classify::real_age`].
    pub age: u16,
    pub education: Education,
    pub gender: Gender,
    /// `0..=100`, larger values are clamped.
    pub happiness: u8,
    /// `0..=100`, larger values are clamped.
    pub health: u8,
    /// `0..=100`, larger values are clamped.
    pub wellbeing: u8,
    pub location: Location,
    pub wealth: Wealth,
    /// `None` when the citizen is not enrolled anywhere.
    pub school: Option<SchoolLevel>,
}

impl CitizenRecord {
    /// Returns `true` if the record describes a resident the census counts.
    #[must_use]
    pub fn is_resident(&self) -> bool {
        self.kind == CitizenKind::Resident
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::IsVariant)]
pub enum BuildingState {
    UnderConstruction,
    Completed,
    Upgrading,
    Abandoned,
    Collapsed,
}

impl BuildingState {
    /// Returns `true` for buildings that are standing and in use.
    #[must_use]
    pub fn is_operational(self) -> bool {
        matches!(self, Self::Completed | Self::Upgrading)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub z: f32,
}

/// A view of one building.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuildingRecord<'a> {
    /// Host category tag, matched against [`crate::CategoryAllowList`].
    pub category: &'a str,
    pub state: BuildingState,
    /// Residential level `1..=5`.
    pub level: u8,
    pub position: Position,
    /// Head of the building's household unit chain.
    pub first_unit: Option<UnitId>,
}

/// One household unit in a building's unit chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitRecord {
    pub building: BuildingId,
    /// `true` for units that house residents (as opposed to work or visit slots).
    pub home: bool,
    pub citizens: ArrayVec<CitizenId, UNIT_CAPACITY>,
    pub next: Option<UnitId>,
}

/// Iterator over a building's unit chain.
///
/// The host links units through [`UnitRecord::next`]. A corrupt table may form
/// a cycle, so the walk is bounded by the size of the unit table: a chain that
/// visits more units than exist must revisit one. When the bound is exceeded
/// the iterator yields a single [`UnitChainError::Cycle`] and stops.
///
/// A link to a unit that is not in use ends the chain.
#[derive(Debug)]
pub struct UnitChain<'h, H: ?Sized> {
    host: &'h H,
    start: Option<UnitId>,
    next: Option<UnitId>,
    steps: u32,
    limit: u32,
}

impl<'h, H> UnitChain<'h, H>
where
    H: Host + ?Sized,
{
    #[must_use]
    pub fn new(host: &'h H, first: Option<UnitId>) -> Self {
        Self {
            host,
            start: first,
            next: first,
            steps: 0,
            limit: host.unit_capacity(),
        }
    }
}

impl<H> Iterator for UnitChain<'_, H>
where
    H: Host + ?Sized,
{
    type Item = Result<(UnitId, UnitRecord), UnitChainError>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next.take()?;
        let unit = self.host.unit(id)?;
        self.steps += 1;
        if self.steps > self.limit {
            return Some(Err(UnitChainError::Cycle {
                start: self.start.unwrap_or(id),
                limit: self.limit,
            }));
        }
        self.next = unit.next;
        Some(Ok((id, unit)))
    }
}
