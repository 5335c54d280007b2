//! The grid state core.
//!
//! [`State`] owns the 81-cell table together with 27 redundant house
//! aggregates (per-group, per-column, per-row solved counts and candidate
//! counts) and a handful of grid-wide aggregates. Every mutation keeps the
//! aggregates in exact lock-step with the cell table, which is what makes
//! the per-house queries constant time inside solver inner loops.
//!
//! The aggregates are redundant by design: any of them could be recomputed
//! by scanning the cell table, and the test suite does exactly that to pin
//! the bookkeeping down.

use std::{
    collections::{BTreeMap, BTreeSet},
    sync::Arc,
};

use gridmarks_core::{CandidateSet, Coord, Digit};
use log::{debug, trace};

use crate::{
    Error,
    config::{GroupLayout, KeySet, Peers, Tables, default_tables},
};

/// One cell of the grid.
///
/// A cell is solved when `value` is set. The candidate mask of a solved cell
/// is preserved rather than cleared, so deleting the clue later restores the
/// candidates the cell had when it was solved; a preserved mask never
/// participates in house candidate counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Cell {
    pub(crate) value: Option<Digit>,
    pub(crate) cands: CandidateSet,
    pub(crate) group: u8,
}

/// Aggregates for one house (group, column, or row).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct House {
    /// Number of solved cells in the house.
    pub(crate) solved: u8,
    /// For each digit, the number of unsolved cells whose candidate mask
    /// includes it.
    pub(crate) cand_count: [u8; 9],
}

/// Offsets into the house table; houses 0-8 are the groups.
pub(crate) const COL_OFFSET: usize = 9;
pub(crate) const ROW_OFFSET: usize = 18;

/// The evolving state of a 9x9 sudoku grid.
///
/// Holds the cell table, the house aggregates, and the read-only
/// configuration tables. All mutations go through the methods here (or the
/// [map views](crate::views) that delegate to them) so that the aggregates
/// stay consistent.
///
/// # Examples
///
/// ```
/// use gridmarks_core::{Coord, Digit};
/// use gridmarks_state::State;
///
/// let state = State::new([
///     (Coord::new(0, 0), Digit::new(0)),
///     (Coord::new(0, 1), Digit::new(1)),
/// ])
/// .unwrap();
///
/// assert_eq!(state.num_solved(), 2);
/// assert_eq!(state.num_remaining(), 79);
///
/// // Pencil marks were filled in: (0, 2) shares a row and group with both
/// // clues, so digits 0 and 1 are not candidates there.
/// let cands = state.candidates().get(Coord::new(0, 2)).unwrap();
/// assert!(!cands.contains(Digit::new(0)));
/// assert!(!cands.contains(Digit::new(1)));
/// assert_eq!(state.candidate_in_houses(Coord::new(0, 2), Digit::new(8)).0, 7);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    cells: [Cell; 81],
    houses: [House; 27],
    solved: u8,
    digit_count: [u8; 9],
    solved_keys: BTreeSet<Coord>,
    tables: Arc<Tables>,
    movehook: Option<Vec<u8>>,
    user_data: BTreeMap<String, Vec<u8>>,
}

impl State {
    /// Builds a state from clues, filling in pencil marks, with the standard
    /// group layout.
    ///
    /// Equivalent to [`State::with_options`] with `dofill = true` and no
    /// layout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyConflict`] if `clues` names the same coordinate
    /// twice.
    pub fn new<I>(clues: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (Coord, Digit)>,
    {
        Self::with_options(clues, true, None)
    }

    /// Builds a state from clues.
    ///
    /// Every clue cell becomes solved. When `dofill` is set, the candidates
    /// of every unsolved cell are then computed naively from its solved
    /// peers; otherwise every candidate set starts empty. A `layout` equal
    /// to the standard one (or `None`) shares the precomputed default
    /// tables.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyConflict`] if `clues` names the same coordinate
    /// twice.
    pub fn with_options<I>(
        clues: I,
        dofill: bool,
        layout: Option<&GroupLayout>,
    ) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (Coord, Digit)>,
    {
        let tables = Tables::shared(layout);
        let mut cells = [Cell {
            value: None,
            cands: CandidateSet::EMPTY,
            group: 0,
        }; 81];
        for coord in Coord::ALL {
            cells[coord.index()].group = tables.layout().group_of(coord);
        }

        let mut state = Self {
            cells,
            houses: [House::default(); 27],
            solved: 0,
            digit_count: [0; 9],
            solved_keys: BTreeSet::new(),
            tables,
            movehook: None,
            user_data: BTreeMap::new(),
        };

        for (coord, digit) in clues {
            if state.cells[coord.index()].value.is_some() {
                return Err(Error::KeyConflict(coord));
            }
            state.cells[coord.index()].value = Some(digit);
            state.solved_keys.insert(coord);
            state.house_solved_up(coord);
            state.digit_count[usize::from(digit.value())] += 1;
            state.solved += 1;
        }

        if dofill {
            state.fill_pencilmarks();
        }

        Ok(state)
    }

    // ------------------------------------------------------------------
    // Attribute surface
    // ------------------------------------------------------------------

    /// Number of solved cells.
    #[must_use]
    pub fn num_solved(&self) -> usize {
        usize::from(self.solved)
    }

    /// Number of unsolved cells.
    #[must_use]
    pub fn num_remaining(&self) -> usize {
        81 - self.num_solved()
    }

    /// Per-digit solved counts: entry `d` is the number of cells solved
    /// with digit `d`.
    #[must_use]
    pub fn digit_counts(&self) -> [u8; 9] {
        self.digit_count
    }

    /// Returns `true` when all 81 cells are solved.
    #[must_use]
    pub fn done(&self) -> bool {
        self.solved == 81
    }

    /// Returns `true` when the state uses the standard 3x3 group layout.
    #[must_use]
    pub fn has_default_config(&self) -> bool {
        Arc::ptr_eq(&self.tables, &default_tables())
    }

    /// The set of solved coordinates, in row-major order.
    #[must_use]
    pub fn solved_keys(&self) -> &BTreeSet<Coord> {
        &self.solved_keys
    }

    /// The group layout in effect.
    #[must_use]
    pub fn group_layout(&self) -> &GroupLayout {
        self.tables.layout()
    }

    /// The peers of a cell.
    #[must_use]
    pub fn peers(&self, coord: Coord) -> &Peers {
        self.tables.peers(coord)
    }

    /// The intersection of a cell's row with its group, the cell included.
    #[must_use]
    pub fn row_subgroup(&self, coord: Coord) -> &[Coord] {
        self.tables.row_subgroup(coord)
    }

    /// The intersection of a cell's column with its group, the cell
    /// included.
    #[must_use]
    pub fn col_subgroup(&self, coord: Coord) -> &[Coord] {
        self.tables.col_subgroup(coord)
    }

    /// The nine row keysets.
    #[must_use]
    pub fn rows(&self) -> &[KeySet] {
        self.tables.rows()
    }

    /// The nine column keysets.
    #[must_use]
    pub fn cols(&self) -> &[KeySet] {
        self.tables.cols()
    }

    /// All 27 house keysets: groups 0-8, columns 9-17, rows 18-26.
    #[must_use]
    pub fn houses(&self) -> &[KeySet] {
        self.tables.houses()
    }

    /// The union of a cell's three houses, the cell included.
    #[must_use]
    pub fn oneset(&self, coord: Coord) -> &[Coord] {
        self.tables.oneset(coord)
    }

    // ------------------------------------------------------------------
    // Movehook mailbox and user data
    // ------------------------------------------------------------------

    /// Stores a payload in the movehook mailbox, replacing any previous one.
    ///
    /// The mailbox is a single slot: hosts use it to hand the next computed
    /// move to whoever reads the state next.
    ///
    /// # Examples
    ///
    /// ```
    /// use gridmarks_state::State;
    ///
    /// let mut state = State::new([]).unwrap();
    /// state.put_movehook(b"move".to_vec());
    /// assert_eq!(state.take_movehook().as_deref(), Some(&b"move"[..]));
    /// // Reading cleared the slot.
    /// assert_eq!(state.take_movehook(), None);
    /// ```
    pub fn put_movehook(&mut self, payload: Vec<u8>) {
        self.movehook = Some(payload);
    }

    /// Takes the movehook payload, clearing the slot.
    pub fn take_movehook(&mut self) -> Option<Vec<u8>> {
        self.movehook.take()
    }

    /// Host-attached metadata carried alongside the grid.
    ///
    /// The engine never interprets it; it participates in snapshots.
    #[must_use]
    pub fn user_data(&self) -> &BTreeMap<String, Vec<u8>> {
        &self.user_data
    }

    /// Mutable access to the host-attached metadata.
    pub fn user_data_mut(&mut self) -> &mut BTreeMap<String, Vec<u8>> {
        &mut self.user_data
    }

    // ------------------------------------------------------------------
    // Mutation primitives
    // ------------------------------------------------------------------

    /// Solves a cell with a digit.
    ///
    /// The cell's candidate mask is preserved but removed from the three
    /// intersecting houses' candidate counts, since the cell is no longer
    /// unsolved.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyConflict`] if the cell is already solved.
    pub fn assign_clue(&mut self, coord: Coord, digit: Digit) -> Result<(), Error> {
        if self.cells[coord.index()].value.is_some() {
            return Err(Error::KeyConflict(coord));
        }
        self.solved_keys.insert(coord);
        self.house_solved_up(coord);
        let preserved = self.cells[coord.index()].cands;
        self.house_cand_down(coord, preserved);
        self.cells[coord.index()].value = Some(digit);
        self.solved += 1;
        self.digit_count[usize::from(digit.value())] += 1;
        Ok(())
    }

    /// Unsolves a cell, returning the digit it held.
    ///
    /// The cell keeps the candidate mask it had when it was solved; that
    /// mask re-enters the three houses' candidate counts.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyConflict`] if the cell is not solved.
    pub fn delete_clue(&mut self, coord: Coord) -> Result<Digit, Error> {
        let Some(digit) = self.cells[coord.index()].value else {
            return Err(Error::KeyConflict(coord));
        };
        self.solved_keys.remove(&coord);
        self.digit_count[usize::from(digit.value())] -= 1;
        self.house_solved_down(coord);
        let preserved = self.cells[coord.index()].cands;
        self.house_cand_up(coord, preserved);
        self.cells[coord.index()].value = None;
        self.solved -= 1;
        Ok(digit)
    }

    /// Adds candidates to a batch of unsolved cells.
    ///
    /// Entries apply in iteration order. Re-adding candidates that are
    /// already present is harmless: house counts only change for candidates
    /// actually introduced.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyConflict`] when an entry names a solved cell.
    /// Entries before the offending one have already been applied.
    pub fn add_candidates<I>(&mut self, change: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = (Coord, CandidateSet)>,
    {
        for (coord, add) in change {
            let cell = self.cells[coord.index()];
            if cell.value.is_some() {
                return Err(Error::KeyConflict(coord));
            }
            // Guard against double counting candidates already present.
            let fresh = add - cell.cands;
            self.house_cand_up(coord, fresh);
            self.cells[coord.index()].cands = cell.cands | add;
        }
        Ok(())
    }

    /// Removes candidates from a batch of unsolved cells.
    ///
    /// Entries apply in iteration order. If any removal empties a cell's
    /// candidate set the batch still runs to completion, then fails with
    /// [`Error::Contradiction`] naming the last emptied cell. Nothing is
    /// rolled back; callers that need the previous state restore it from a
    /// snapshot taken before the call.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyConflict`] when an entry names a solved cell,
    /// and [`Error::Contradiction`] as described above.
    pub fn remove_candidates<I>(&mut self, change: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = (Coord, CandidateSet)>,
    {
        let mut contradiction = None;
        for (coord, rem) in change {
            let cell = self.cells[coord.index()];
            if cell.value.is_some() {
                return Err(Error::KeyConflict(coord));
            }
            // Only candidates actually present leave the house counts.
            let removed = rem & cell.cands;
            self.house_cand_down(coord, removed);
            let left = cell.cands - rem;
            self.cells[coord.index()].cands = left;
            if left.is_empty() {
                contradiction = Some(coord);
            }
        }
        if let Some(coord) = contradiction {
            debug!("candidate removal emptied the set at {coord}");
            return Err(Error::Contradiction(coord));
        }
        Ok(())
    }

    /// Overwrites the candidate set of an unsolved cell, returning the
    /// previous set.
    ///
    /// Assigning the empty set is how deletion through the candidates view
    /// is modeled.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyConflict`] if the cell is solved.
    pub fn set_candidates_at(
        &mut self,
        coord: Coord,
        cands: CandidateSet,
    ) -> Result<CandidateSet, Error> {
        let cell = self.cells[coord.index()];
        if cell.value.is_some() {
            return Err(Error::KeyConflict(coord));
        }
        self.house_cand_down(coord, cell.cands);
        self.house_cand_up(coord, cands);
        self.cells[coord.index()].cands = cands;
        Ok(cell.cands)
    }

    /// Zeroes every cell's candidate mask, solved cells included.
    ///
    /// Only unsolved cells' masks were counted in the houses, so only those
    /// adjust the aggregates.
    pub fn clear_all_candidates(&mut self) {
        for coord in Coord::ALL {
            let cell = self.cells[coord.index()];
            if cell.value.is_none() && !cell.cands.is_empty() {
                self.house_cand_down(coord, cell.cands);
            }
            self.cells[coord.index()].cands = CandidateSet::EMPTY;
        }
    }

    /// Recomputes pencil marks for every unsolved cell from the current
    /// solved cells.
    ///
    /// An unsolved cell's candidates become the nine digits minus every
    /// digit solved among its row, column, and group peers. Solved cells and
    /// their preserved masks are left alone. Candidate house counts are
    /// rebuilt from scratch.
    pub fn fill_pencilmarks(&mut self) {
        trace!("refilling pencil marks from {} solved cells", self.solved);
        for house in &mut self.houses {
            house.cand_count = [0; 9];
        }
        for coord in Coord::ALL {
            if self.cells[coord.index()].value.is_some() {
                continue;
            }
            let mut excluded = CandidateSet::EMPTY;
            for c in 0..9 {
                if let Some(d) = self.cells[Coord::new(coord.row(), c).index()].value {
                    excluded.insert(d);
                }
            }
            for r in 0..9 {
                if let Some(d) = self.cells[Coord::new(r, coord.col()).index()].value {
                    excluded.insert(d);
                }
            }
            for &peer in &self.tables.peers(coord).block {
                if let Some(d) = self.cells[peer.index()].value {
                    excluded.insert(d);
                }
            }
            let cands = !excluded;
            self.cells[coord.index()].cands = cands;
            self.house_cand_up(coord, cands);
        }
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Returns the coordinates in `keyset` whose cell is unsolved and has
    /// `digit` among its candidates, preserving keyset order.
    #[must_use]
    pub fn candidate_in_keyset(&self, digit: Digit, keyset: &[Coord]) -> Vec<Coord> {
        keyset
            .iter()
            .copied()
            .filter(|&coord| {
                let cell = self.cells[coord.index()];
                cell.value.is_none() && cell.cands.contains(digit)
            })
            .collect()
    }

    /// Returns the union of candidate sets over the unsolved cells of
    /// `keyset`.
    #[must_use]
    pub fn candidates_from_keyset(&self, keyset: &[Coord]) -> CandidateSet {
        keyset
            .iter()
            .map(|&coord| self.cells[coord.index()])
            .filter(|cell| cell.value.is_none())
            .fold(CandidateSet::EMPTY, |acc, cell| acc | cell.cands)
    }

    /// Returns how many unsolved cells in each of a cell's three houses
    /// have `digit` as a candidate, as `(group, column, row)` counts.
    ///
    /// Constant time: the counts come straight from the house aggregates.
    #[must_use]
    pub fn candidate_in_houses(&self, coord: Coord, digit: Digit) -> (u8, u8, u8) {
        let d = usize::from(digit.value());
        let [g, c, r] = self.house_ids(coord);
        (
            self.houses[g].cand_count[d],
            self.houses[c].cand_count[d],
            self.houses[r].cand_count[d],
        )
    }

    /// Returns the nine candidate counts of a house.
    ///
    /// `house` follows the house-index convention: 0-8 groups, 9-17
    /// columns, 18-26 rows.
    ///
    /// # Errors
    ///
    /// Returns [`Error::HouseOutOfRange`] if `house` is 27 or larger.
    pub fn candidates_from_house(&self, house: usize) -> Result<[u8; 9], Error> {
        if house >= 27 {
            return Err(Error::HouseOutOfRange(house));
        }
        Ok(self.houses[house].cand_count)
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    pub(crate) fn value_at(&self, coord: Coord) -> Option<Digit> {
        self.cells[coord.index()].value
    }

    pub(crate) fn cands_at(&self, coord: Coord) -> CandidateSet {
        self.cells[coord.index()].cands
    }

    pub(crate) fn is_solved_at(&self, coord: Coord) -> bool {
        self.cells[coord.index()].value.is_some()
    }

    /// Overwrites the preserved mask of a solved cell (snapshot restore).
    pub(crate) fn set_preserved_mask(&mut self, coord: Coord, cands: CandidateSet) {
        debug_assert!(self.cells[coord.index()].value.is_some());
        self.cells[coord.index()].cands = cands;
    }

    pub(crate) fn set_movehook_slot(&mut self, payload: Option<Vec<u8>>) {
        self.movehook = payload;
    }

    pub(crate) fn movehook_slot(&self) -> Option<&Vec<u8>> {
        self.movehook.as_ref()
    }

    pub(crate) fn set_user_data(&mut self, user_data: BTreeMap<String, Vec<u8>>) {
        self.user_data = user_data;
    }

    fn house_ids(&self, coord: Coord) -> [usize; 3] {
        [
            usize::from(self.cells[coord.index()].group),
            COL_OFFSET + usize::from(coord.col()),
            ROW_OFFSET + usize::from(coord.row()),
        ]
    }

    fn house_solved_up(&mut self, coord: Coord) {
        for id in self.house_ids(coord) {
            self.houses[id].solved += 1;
        }
    }

    fn house_solved_down(&mut self, coord: Coord) {
        for id in self.house_ids(coord) {
            self.houses[id].solved -= 1;
        }
    }

    fn house_cand_up(&mut self, coord: Coord, cands: CandidateSet) {
        for id in self.house_ids(coord) {
            for d in cands {
                self.houses[id].cand_count[usize::from(d.value())] += 1;
            }
        }
    }

    fn house_cand_down(&mut self, coord: Coord, cands: CandidateSet) {
        for id in self.house_ids(coord) {
            for d in cands {
                self.houses[id].cand_count[usize::from(d.value())] -= 1;
            }
        }
    }
}
