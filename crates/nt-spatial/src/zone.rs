//! Named rectangular zones and their category tags.
//!
//! # Categories instead of name matching
//!
//! Planning needs to know which zones are residential, which is the workplace,
//! where meals are served and where agents go to unwind.  Each [`Zone`]
//! carries a [`CategorySet`] resolved once when the zone is constructed;
//! planning looks zones up by category and never inspects names.
//!
//! [`Zone::new`] infers the set from the conventional names used by town maps:
//!
//! | Name contains | Categories        |
//! |---------------|-------------------|
//! | `Home`        | Home              |
//! | `Work`        | Work              |
//! | `Cafe`        | Dining, Leisure   |
//! | `Forest`      | Leisure           |
//! | `Water`       | Leisure           |
//! | `Stadium`     | Leisure           |
//!
//! Homes are never leisure, even if the name also matches a leisure marker.
//! Maps that need a different taxonomy use [`Zone::with_categories`].
//!
//! # Spatial index
//!
//! [`ZoneMap`] keeps zones name-ordered in a `BTreeMap` and mirrors their
//! rectangles into an `rstar` R-tree so [`ZoneMap::zones_at`] does not scan
//! every zone.

use std::collections::BTreeMap;
use std::fmt;

use rstar::{Envelope, PointDistance, RTree, RTreeObject, AABB};

use nt_core::Cell;

use crate::{SpatialError, SpatialResult};

// ── ZoneCategory ──────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ZoneCategory {
    Home,
    Work,
    Dining,
    Leisure,
}

impl ZoneCategory {
    pub const ALL: [ZoneCategory; 4] = [
        ZoneCategory::Home,
        ZoneCategory::Work,
        ZoneCategory::Dining,
        ZoneCategory::Leisure,
    ];

    #[inline]
    fn bit(self) -> u8 {
        1 << self as u8
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ZoneCategory::Home    => "home",
            ZoneCategory::Work    => "work",
            ZoneCategory::Dining  => "dining",
            ZoneCategory::Leisure => "leisure",
        }
    }
}

impl std::str::FromStr for ZoneCategory {
    type Err = SpatialError;

    fn from_str(s: &str) -> SpatialResult<Self> {
        ZoneCategory::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| SpatialError::UnknownCategory(s.to_string()))
    }
}

impl fmt::Display for ZoneCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── CategorySet ───────────────────────────────────────────────────────────────

/// A small set of [`ZoneCategory`] values packed into one byte.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct CategorySet(u8);

impl CategorySet {
    pub const EMPTY: CategorySet = CategorySet(0);

    #[inline]
    pub fn contains(self, category: ZoneCategory) -> bool {
        self.0 & category.bit() != 0
    }

    #[inline]
    pub fn insert(&mut self, category: ZoneCategory) {
        self.0 |= category.bit();
    }

    #[inline]
    pub fn remove(&mut self, category: ZoneCategory) {
        self.0 &= !category.bit();
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = ZoneCategory> {
        ZoneCategory::ALL.into_iter().filter(move |c| self.contains(*c))
    }

    /// Infer categories from a conventional zone name.
    pub fn from_name(name: &str) -> CategorySet {
        let mut set = CategorySet::EMPTY;
        if name.contains("Home") {
            set.insert(ZoneCategory::Home);
        }
        if name.contains("Work") {
            set.insert(ZoneCategory::Work);
        }
        if name.contains("Cafe") {
            set.insert(ZoneCategory::Dining);
            set.insert(ZoneCategory::Leisure);
        }
        if ["Forest", "Water", "Stadium"].iter().any(|m| name.contains(m)) {
            set.insert(ZoneCategory::Leisure);
        }
        if set.contains(ZoneCategory::Home) {
            set.remove(ZoneCategory::Leisure);
        }
        set
    }
}

impl FromIterator<ZoneCategory> for CategorySet {
    fn from_iter<I: IntoIterator<Item = ZoneCategory>>(iter: I) -> Self {
        let mut set = CategorySet::EMPTY;
        for c in iter {
            set.insert(c);
        }
        set
    }
}

// ── Zone ──────────────────────────────────────────────────────────────────────

/// A named axis-aligned rectangle in cell coordinates.
///
/// Covers cells `x .. x + width` horizontally and `y .. y + height`
/// vertically (upper bounds exclusive).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Zone {
    pub name:       String,
    pub x:          i32,
    pub y:          i32,
    pub width:      u32,
    pub height:     u32,
    pub categories: CategorySet,
}

impl Zone {
    /// A zone whose categories are inferred from `name`.
    pub fn new(name: impl Into<String>, x: i32, y: i32, width: u32, height: u32) -> Self {
        let name = name.into();
        let categories = CategorySet::from_name(&name);
        Self { name, x, y, width, height, categories }
    }

    /// A zone with an explicit category set.
    pub fn with_categories(
        name: impl Into<String>,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        categories: CategorySet,
    ) -> Self {
        Self { name: name.into(), x, y, width, height, categories }
    }

    #[inline]
    pub fn contains(&self, cell: Cell) -> bool {
        cell.x >= self.x
            && cell.y >= self.y
            && cell.x < self.x + self.width as i32
            && cell.y < self.y + self.height as i32
    }

    #[inline]
    pub fn has(&self, category: ZoneCategory) -> bool {
        self.categories.contains(category)
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Cell at `(x + width / 2, y + height / 2)`.  For even sides this is
    /// the cell just past the geometric centre.
    pub fn center_cell(&self) -> Cell {
        Cell::new(
            self.x + self.width as i32 / 2,
            self.y + self.height as i32 / 2,
        )
    }

    /// Every cell of the zone, row by row.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (self.y..self.y + self.height as i32)
            .flat_map(move |y| (self.x..self.x + self.width as i32).map(move |x| Cell::new(x, y)))
    }

    fn envelope(&self) -> AABB<[i32; 2]> {
        AABB::from_corners(
            [self.x, self.y],
            [self.x + self.width as i32 - 1, self.y + self.height as i32 - 1],
        )
    }
}

// ── R-tree entry ──────────────────────────────────────────────────────────────

/// Rectangle of one zone as stored in the R-tree.  Corners are inclusive
/// cell coordinates.
#[derive(Clone, Debug)]
struct ZoneEntry {
    aabb: AABB<[i32; 2]>,
    name: String,
}

impl RTreeObject for ZoneEntry {
    type Envelope = AABB<[i32; 2]>;
    fn envelope(&self) -> Self::Envelope {
        self.aabb
    }
}

impl PointDistance for ZoneEntry {
    fn distance_2(&self, point: &[i32; 2]) -> i32 {
        self.aabb.distance_2(point)
    }

    fn contains_point(&self, point: &[i32; 2]) -> bool {
        self.aabb.contains_point(point)
    }
}

// ── ZoneMap ───────────────────────────────────────────────────────────────────

/// All zones of a map, keyed by exact name.
#[derive(Default)]
pub struct ZoneMap {
    zones: BTreeMap<String, Zone>,
    index: RTree<ZoneEntry>,
}

impl ZoneMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a map from a zone list.  A later zone with a duplicate name
    /// replaces the earlier one.
    pub fn from_zones(zones: impl IntoIterator<Item = Zone>) -> SpatialResult<Self> {
        let mut map = BTreeMap::new();
        for zone in zones {
            check_extent(&zone)?;
            map.insert(zone.name.clone(), zone);
        }
        let mut out = Self { zones: map, index: RTree::new() };
        out.reindex();
        Ok(out)
    }

    /// Insert or replace a zone, returning the zone it replaced.
    pub fn insert(&mut self, zone: Zone) -> SpatialResult<Option<Zone>> {
        check_extent(&zone)?;
        let prev = self.zones.insert(zone.name.clone(), zone);
        self.reindex();
        Ok(prev)
    }

    pub fn remove(&mut self, name: &str) -> Option<Zone> {
        let prev = self.zones.remove(name);
        if prev.is_some() {
            self.reindex();
        }
        prev
    }

    fn reindex(&mut self) {
        let entries = self
            .zones
            .values()
            .map(|z| ZoneEntry { aabb: z.envelope(), name: z.name.clone() })
            .collect();
        self.index = RTree::bulk_load(entries);
    }

    // ── Queries ───────────────────────────────────────────────────────────

    #[inline]
    pub fn get(&self, name: &str) -> Option<&Zone> {
        self.zones.get(name)
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Zone names in ascending order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.zones.keys().map(String::as_str)
    }

    /// Zones in ascending name order.
    pub fn iter(&self) -> impl Iterator<Item = &Zone> {
        self.zones.values()
    }

    /// Zones tagged with `category`, in name order.
    pub fn with_category(&self, category: ZoneCategory) -> impl Iterator<Item = &Zone> {
        self.zones.values().filter(move |z| z.has(category))
    }

    /// The first zone (by name) tagged with `category`.
    pub fn first_with_category(&self, category: ZoneCategory) -> Option<&Zone> {
        self.with_category(category).next()
    }

    /// `true` if the named zone exists and carries `category`.
    pub fn is(&self, name: &str, category: ZoneCategory) -> bool {
        self.get(name).is_some_and(|z| z.has(category))
    }

    /// Every zone containing `cell`, in name order.
    pub fn zones_at(&self, cell: Cell) -> Vec<&Zone> {
        let mut hits: Vec<&Zone> = self
            .index
            .locate_all_at_point(&[cell.x, cell.y])
            .filter_map(|e| self.zones.get(&e.name))
            .collect();
        hits.sort_by(|a, b| a.name.cmp(&b.name));
        hits
    }
}

fn check_extent(zone: &Zone) -> SpatialResult<()> {
    if zone.width == 0 || zone.height == 0 {
        return Err(SpatialError::EmptyZone(zone.name.clone()));
    }
    Ok(())
}
