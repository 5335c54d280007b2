//! Live map views over the state.
//!
//! The clues view is a mapping of solved coordinates to digits; the
//! candidates view a mapping of unsolved coordinates to candidate sets.
//! Neither is a snapshot: they are cheap handles borrowing the state, and
//! every write routes through the state's mutation primitives so that the
//! house aggregates stay consistent. Read views take a shared borrow, write
//! views an exclusive one; the state never owns a view.

use std::collections::BTreeMap;

use gridmarks_core::{CandidateSet, Coord, Digit};

use crate::{
    Error, State,
    iter::{SolvedKeys, UnsolvedKeys},
};

/// Read view of the solved cells as a coordinate-to-digit mapping.
///
/// Obtained from [`State::clues`].
///
/// # Examples
///
/// ```
/// use gridmarks_core::{Coord, Digit};
/// use gridmarks_state::State;
///
/// let state = State::new([(Coord::new(2, 3), Digit::new(6))]).unwrap();
/// let clues = state.clues();
/// assert_eq!(clues.len(), 1);
/// assert_eq!(clues.get(Coord::new(2, 3)).unwrap(), Digit::new(6));
/// assert!(clues.get(Coord::new(0, 0)).is_err());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Clues<'a> {
    state: &'a State,
}

impl<'a> Clues<'a> {
    /// Number of solved cells.
    #[must_use]
    pub fn len(self) -> usize {
        self.state.num_solved()
    }

    /// Returns `true` if no cell is solved.
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if the cell is solved.
    #[must_use]
    pub fn contains(self, coord: Coord) -> bool {
        self.state.is_solved_at(coord)
    }

    /// Returns the digit of a solved cell.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotSolved`] for an unsolved cell.
    pub fn get(self, coord: Coord) -> Result<Digit, Error> {
        self.state.value_at(coord).ok_or(Error::NotSolved(coord))
    }

    /// Iterates over `(coordinate, digit)` pairs in row-major order.
    #[must_use]
    pub fn iter(self) -> ClueEntries<'a> {
        ClueEntries {
            state: self.state,
            keys: self.state.order_solved(),
        }
    }

    /// Materializes the view into a detached map.
    #[must_use]
    pub fn to_map(self) -> BTreeMap<Coord, Digit> {
        self.iter().collect()
    }
}

impl<'a> IntoIterator for Clues<'a> {
    type IntoIter = ClueEntries<'a>;
    type Item = (Coord, Digit);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the entries of a [`Clues`] view.
#[derive(Debug, Clone)]
pub struct ClueEntries<'a> {
    state: &'a State,
    keys: SolvedKeys<'a>,
}

impl Iterator for ClueEntries<'_> {
    type Item = (Coord, Digit);

    fn next(&mut self) -> Option<Self::Item> {
        let coord = self.keys.next()?;
        let digit = self.state.value_at(coord)?;
        Some((coord, digit))
    }
}

/// Write view of the solved cells.
///
/// Obtained from [`State::clues_mut`]. Insertion and removal delegate to
/// [`State::assign_clue`] and [`State::delete_clue`].
#[derive(Debug)]
pub struct CluesMut<'a> {
    state: &'a mut State,
}

impl CluesMut<'_> {
    /// Reborrows as a read view.
    #[must_use]
    pub fn as_view(&self) -> Clues<'_> {
        Clues { state: self.state }
    }

    /// Solves a cell with a digit.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyConflict`] if the cell is already solved.
    pub fn insert(&mut self, coord: Coord, digit: Digit) -> Result<(), Error> {
        self.state.assign_clue(coord, digit)
    }

    /// Unsolves a cell, returning its digit.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyConflict`] if the cell is not solved.
    pub fn remove(&mut self, coord: Coord) -> Result<Digit, Error> {
        self.state.delete_clue(coord)
    }
}

/// Read view of the unsolved cells as a coordinate-to-candidates mapping.
///
/// Obtained from [`State::candidates`].
#[derive(Debug, Clone, Copy)]
pub struct Candidates<'a> {
    state: &'a State,
}

impl<'a> Candidates<'a> {
    /// Number of unsolved cells.
    #[must_use]
    pub fn len(self) -> usize {
        self.state.num_remaining()
    }

    /// Returns `true` if every cell is solved.
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if the cell is unsolved.
    #[must_use]
    pub fn contains(self, coord: Coord) -> bool {
        !self.state.is_solved_at(coord)
    }

    /// Returns the candidate set of an unsolved cell.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Solved`] for a solved cell.
    pub fn get(self, coord: Coord) -> Result<CandidateSet, Error> {
        if self.state.is_solved_at(coord) {
            return Err(Error::Solved(coord));
        }
        Ok(self.state.cands_at(coord))
    }

    /// Iterates over `(coordinate, candidates)` pairs in row-major order.
    #[must_use]
    pub fn iter(self) -> CandidateEntries<'a> {
        CandidateEntries {
            state: self.state,
            keys: self.state.order_simple(),
        }
    }

    /// Materializes the view into a detached map.
    ///
    /// With `include_solved` set, solved cells whose preserved mask is
    /// nonzero are included as well.
    #[must_use]
    pub fn to_map(self, include_solved: bool) -> BTreeMap<Coord, CandidateSet> {
        let mut map: BTreeMap<_, _> = self.iter().collect();
        if include_solved {
            for &coord in self.state.solved_keys() {
                let mask = self.state.cands_at(coord);
                if !mask.is_empty() {
                    map.insert(coord, mask);
                }
            }
        }
        map
    }
}

impl<'a> IntoIterator for Candidates<'a> {
    type IntoIter = CandidateEntries<'a>;
    type Item = (Coord, CandidateSet);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the entries of a [`Candidates`] view.
#[derive(Debug, Clone)]
pub struct CandidateEntries<'a> {
    state: &'a State,
    keys: UnsolvedKeys<'a>,
}

impl Iterator for CandidateEntries<'_> {
    type Item = (Coord, CandidateSet);

    fn next(&mut self) -> Option<Self::Item> {
        let coord = self.keys.next()?;
        Some((coord, self.state.cands_at(coord)))
    }
}

/// Write view of the unsolved cells.
///
/// Obtained from [`State::candidates_mut`]. Writes delegate to
/// [`State::set_candidates_at`]; [`CandidatesMut::fill`] and
/// [`CandidatesMut::clear`] to the corresponding state primitives.
///
/// # Examples
///
/// ```
/// use gridmarks_core::{CandidateSet, Coord, Digit};
/// use gridmarks_state::State;
///
/// let mut state = State::new([]).unwrap();
/// let mut cands = state.candidates_mut();
/// let two = CandidateSet::from_digits([Digit::new(1), Digit::new(2)]);
/// cands.set(Coord::new(0, 0), two).unwrap();
/// assert_eq!(cands.as_view().get(Coord::new(0, 0)).unwrap(), two);
///
/// // Deletion assigns the empty set.
/// cands.remove(Coord::new(0, 0)).unwrap();
/// assert!(cands.as_view().get(Coord::new(0, 0)).unwrap().is_empty());
/// ```
#[derive(Debug)]
pub struct CandidatesMut<'a> {
    state: &'a mut State,
}

impl CandidatesMut<'_> {
    /// Reborrows as a read view.
    #[must_use]
    pub fn as_view(&self) -> Candidates<'_> {
        Candidates { state: self.state }
    }

    /// Overwrites the candidate set of an unsolved cell, returning the
    /// previous set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyConflict`] if the cell is solved.
    pub fn set(&mut self, coord: Coord, cands: CandidateSet) -> Result<CandidateSet, Error> {
        self.state.set_candidates_at(coord, cands)
    }

    /// Empties the candidate set of an unsolved cell, returning the
    /// previous set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyConflict`] if the cell is solved.
    pub fn remove(&mut self, coord: Coord) -> Result<CandidateSet, Error> {
        self.state.set_candidates_at(coord, CandidateSet::EMPTY)
    }

    /// Refills pencil marks from the solved cells.
    ///
    /// See [`State::fill_pencilmarks`].
    pub fn fill(&mut self) {
        self.state.fill_pencilmarks();
    }

    /// Zeroes every candidate mask.
    ///
    /// See [`State::clear_all_candidates`].
    pub fn clear(&mut self) {
        self.state.clear_all_candidates();
    }
}

impl State {
    /// Read view of the solved cells.
    #[must_use]
    pub fn clues(&self) -> Clues<'_> {
        Clues { state: self }
    }

    /// Write view of the solved cells.
    #[must_use]
    pub fn clues_mut(&mut self) -> CluesMut<'_> {
        CluesMut { state: self }
    }

    /// Read view of the unsolved cells.
    #[must_use]
    pub fn candidates(&self) -> Candidates<'_> {
        Candidates { state: self }
    }

    /// Write view of the unsolved cells.
    #[must_use]
    pub fn candidates_mut(&mut self) -> CandidatesMut<'_> {
        CandidatesMut { state: self }
    }
}
