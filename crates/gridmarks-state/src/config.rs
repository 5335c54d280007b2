//! Group layouts and the derived lookup tables.
//!
//! A [`GroupLayout`] assigns each of the 81 cells to one of nine groups (the
//! boxes). From a layout, [`Tables`] precomputes every keyset the engine
//! queries at runtime: per-cell peers, row/column subgroups, the 27 house
//! keysets, and the per-cell union of houses. The tables are read-only once
//! built and are shared between states by [`Arc`]; states built with the
//! standard 3x3 layout all share one lazily-built singleton.

use std::sync::{Arc, LazyLock};

use gridmarks_core::Coord;

use crate::Error;

/// An ordered list of coordinates belonging to some region of the grid.
///
/// Keysets are always in row-major order. Queries that walk a keyset
/// preserve this order in their results.
pub type KeySet = Vec<Coord>;

/// Assignment of each cell to a group (box) index 0-8.
///
/// The standard layout divides the grid into nine 3x3 boxes; custom layouts
/// may carve the grid into any nine 9-cell regions.
///
/// # Examples
///
/// ```
/// use gridmarks_core::Coord;
/// use gridmarks_state::GroupLayout;
///
/// let layout = GroupLayout::standard();
/// assert_eq!(layout.group_of(Coord::new(0, 0)), 0);
/// assert_eq!(layout.group_of(Coord::new(4, 4)), 4);
/// assert_eq!(layout.group_of(Coord::new(8, 8)), 8);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupLayout {
    groups: [u8; 81],
}

impl GroupLayout {
    const STANDARD: Self = {
        let mut groups = [0u8; 81];
        let mut i = 0u8;
        while i < 81 {
            let (row, col) = (i / 9, i % 9);
            groups[i as usize] = (row / 3) * 3 + col / 3;
            i += 1;
        }
        Self { groups }
    };

    /// Returns the standard layout of nine 3x3 boxes.
    #[must_use]
    pub const fn standard() -> Self {
        Self::STANDARD
    }

    /// Builds a layout from a per-cell group table, row-major.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BadLayoutGroup`] if any entry is 9 or larger, and
    /// [`Error::UnbalancedLayout`] if any group does not get exactly nine
    /// cells.
    pub fn from_groups(groups: [u8; 81]) -> Result<Self, Error> {
        let mut counts = [0usize; 9];
        for &g in &groups {
            if g >= 9 {
                return Err(Error::BadLayoutGroup(g));
            }
            counts[g as usize] += 1;
        }
        for (g, &count) in (0u8..).zip(&counts) {
            if count != 9 {
                return Err(Error::UnbalancedLayout { group: g, count });
            }
        }
        Ok(Self { groups })
    }

    /// Builds a layout from a serialized group table.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BadLayoutLength`] when the slice is not 81 entries
    /// long, plus the validation errors of [`GroupLayout::from_groups`].
    pub fn from_slice(groups: &[u8]) -> Result<Self, Error> {
        let groups: [u8; 81] = groups
            .try_into()
            .map_err(|_| Error::BadLayoutLength(groups.len()))?;
        Self::from_groups(groups)
    }

    /// Returns the group index of a cell.
    #[must_use]
    #[inline]
    pub fn group_of(&self, coord: Coord) -> u8 {
        self.groups[coord.index()]
    }

    /// Returns the per-cell group table, row-major.
    #[must_use]
    pub fn as_groups(&self) -> &[u8; 81] {
        &self.groups
    }

    /// Returns `true` if this is the standard 3x3 box layout.
    #[must_use]
    pub fn is_standard(&self) -> bool {
        *self == Self::STANDARD
    }
}

impl Default for GroupLayout {
    fn default() -> Self {
        Self::standard()
    }
}

/// The peers of one cell, split by the house shared with it.
///
/// Every keyset excludes the cell itself. `all` is the union of the other
/// three (20 cells on the standard layout).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Peers {
    /// Cells sharing the group (box).
    pub block: KeySet,
    /// Cells sharing the row.
    pub row: KeySet,
    /// Cells sharing the column.
    pub col: KeySet,
    /// Union of the three, deduplicated, row-major.
    pub all: KeySet,
}

/// Read-only lookup tables derived from a [`GroupLayout`].
///
/// Built once per layout and shared by reference between every state using
/// that layout. The engine never mutates a table after construction.
#[derive(Debug, PartialEq, Eq)]
pub struct Tables {
    layout: GroupLayout,
    peers: Vec<Peers>,
    row_subgroups: Vec<KeySet>,
    col_subgroups: Vec<KeySet>,
    rows: Vec<KeySet>,
    cols: Vec<KeySet>,
    houses: Vec<KeySet>,
    oneset: Vec<KeySet>,
}

static DEFAULT_TABLES: LazyLock<Arc<Tables>> =
    LazyLock::new(|| Arc::new(Tables::compute(GroupLayout::standard())));

/// Returns the shared tables for the standard layout.
#[must_use]
pub fn default_tables() -> Arc<Tables> {
    Arc::clone(&DEFAULT_TABLES)
}

impl Tables {
    /// Computes every table for a layout.
    ///
    /// Layouts are validated at their own construction, so this cannot fail.
    #[must_use]
    pub fn compute(layout: GroupLayout) -> Self {
        let rows: Vec<KeySet> = (0..9)
            .map(|r| (0..9).map(|c| Coord::new(r, c)).collect())
            .collect();
        let cols: Vec<KeySet> = (0..9)
            .map(|c| (0..9).map(|r| Coord::new(r, c)).collect())
            .collect();
        let groups: Vec<KeySet> = (0..9)
            .map(|g| {
                Coord::ALL
                    .into_iter()
                    .filter(|&c| layout.group_of(c) == g)
                    .collect()
            })
            .collect();

        // House index convention: 0-8 groups, 9-17 columns, 18-26 rows.
        let mut houses = Vec::with_capacity(27);
        houses.extend(groups.iter().cloned());
        houses.extend(cols.iter().cloned());
        houses.extend(rows.iter().cloned());

        let mut peers = Vec::with_capacity(81);
        let mut row_subgroups = Vec::with_capacity(81);
        let mut col_subgroups = Vec::with_capacity(81);
        let mut oneset = Vec::with_capacity(81);
        for coord in Coord::ALL {
            let g = usize::from(layout.group_of(coord));
            let block: KeySet = groups[g].iter().copied().filter(|&k| k != coord).collect();
            let row: KeySet = rows[usize::from(coord.row())]
                .iter()
                .copied()
                .filter(|&k| k != coord)
                .collect();
            let col: KeySet = cols[usize::from(coord.col())]
                .iter()
                .copied()
                .filter(|&k| k != coord)
                .collect();
            let mut all: KeySet = block.iter().chain(&row).chain(&col).copied().collect();
            all.sort_unstable();
            all.dedup();

            row_subgroups.push(
                rows[usize::from(coord.row())]
                    .iter()
                    .copied()
                    .filter(|&k| layout.group_of(k) == layout.group_of(coord))
                    .collect(),
            );
            col_subgroups.push(
                cols[usize::from(coord.col())]
                    .iter()
                    .copied()
                    .filter(|&k| layout.group_of(k) == layout.group_of(coord))
                    .collect(),
            );

            let mut one: KeySet = groups[g]
                .iter()
                .chain(&rows[usize::from(coord.row())])
                .chain(&cols[usize::from(coord.col())])
                .copied()
                .collect();
            one.sort_unstable();
            one.dedup();
            oneset.push(one);

            peers.push(Peers {
                block,
                row,
                col,
                all,
            });
        }

        Self {
            layout,
            peers,
            row_subgroups,
            col_subgroups,
            rows,
            cols,
            houses,
            oneset,
        }
    }

    /// Returns shared tables for the given layout.
    ///
    /// `None`, or a layout equal to the standard one, yields the shared
    /// default singleton; anything else computes a fresh set of tables.
    #[must_use]
    pub fn shared(layout: Option<&GroupLayout>) -> Arc<Self> {
        match layout {
            None => default_tables(),
            Some(layout) if layout.is_standard() => default_tables(),
            Some(layout) => Arc::new(Self::compute(layout.clone())),
        }
    }

    /// Returns the layout these tables were derived from.
    #[must_use]
    pub fn layout(&self) -> &GroupLayout {
        &self.layout
    }

    /// Returns the peers of a cell.
    #[must_use]
    pub fn peers(&self, coord: Coord) -> &Peers {
        &self.peers[coord.index()]
    }

    /// Returns the intersection of a cell's row with its group, the cell
    /// included.
    #[must_use]
    pub fn row_subgroup(&self, coord: Coord) -> &[Coord] {
        &self.row_subgroups[coord.index()]
    }

    /// Returns the intersection of a cell's column with its group, the cell
    /// included.
    #[must_use]
    pub fn col_subgroup(&self, coord: Coord) -> &[Coord] {
        &self.col_subgroups[coord.index()]
    }

    /// Returns the nine row keysets.
    #[must_use]
    pub fn rows(&self) -> &[KeySet] {
        &self.rows
    }

    /// Returns the nine column keysets.
    #[must_use]
    pub fn cols(&self) -> &[KeySet] {
        &self.cols
    }

    /// Returns all 27 house keysets in house-index order.
    #[must_use]
    pub fn houses(&self) -> &[KeySet] {
        &self.houses
    }

    /// Returns the union of a cell's three houses, the cell included.
    #[must_use]
    pub fn oneset(&self, coord: Coord) -> &[Coord] {
        &self.oneset[coord.index()]
    }
}
