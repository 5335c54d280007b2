//! Engine error type.

use derive_more::{Display, Error, From};
use gridmarks_core::Coord;

/// Errors surfaced at the engine's operation boundaries.
///
/// Input-range errors (digits, coordinates, counts, house indices) are
/// reported before any effect is applied. [`Error::Contradiction`] is the
/// one domain error raised *after* partial effects; see
/// [`State::remove_candidates`](crate::State::remove_candidates).
#[derive(Debug, Display, Error, From)]
#[non_exhaustive]
pub enum Error {
    /// A digit or coordinate outside the grid was supplied.
    #[display("{_0}")]
    Value(gridmarks_core::Error),
    /// A candidate-set size outside the range 1-8 was supplied.
    #[display("bad candidate count: {_0}")]
    #[from(ignore)]
    CountOutOfRange(#[error(not(source))] usize),
    /// A house index outside the range 0-26 was supplied.
    #[display("bad house index: {_0}")]
    #[from(ignore)]
    HouseOutOfRange(#[error(not(source))] usize),
    /// A rectangle corner in the last row or column was supplied.
    #[display("{_0} cannot be the upper left corner of a rectangle")]
    #[from(ignore)]
    BadCorner(#[error(not(source))] Coord),
    /// The operation required the opposite solved/unsolved cell state.
    #[display("cell {_0} is in the wrong solved state for this operation")]
    #[from(ignore)]
    KeyConflict(#[error(not(source))] Coord),
    /// A clues-view lookup named an unsolved cell.
    #[display("cell {_0} is not solved")]
    #[from(ignore)]
    NotSolved(#[error(not(source))] Coord),
    /// A candidates-view lookup named a solved cell.
    #[display("cell {_0} is solved")]
    #[from(ignore)]
    Solved(#[error(not(source))] Coord),
    /// A candidate removal emptied the set at this cell.
    ///
    /// The removals preceding and following the contradiction have all been
    /// applied; the state is not rolled back.
    #[display("empty candidate set at {_0}")]
    #[from(ignore)]
    Contradiction(#[error(not(source))] Coord),
    /// The OS entropy source failed.
    #[display("os entropy source unavailable: {_0}")]
    Entropy(#[error(not(source))] getrandom::Error),
    /// A group layout used a group index outside 0-8.
    #[display("bad group index in layout: {_0}")]
    #[from(ignore)]
    BadLayoutGroup(#[error(not(source))] u8),
    /// A group layout did not assign exactly nine cells to a group.
    #[display("group {group} has {count} cells, expected 9")]
    #[from(ignore)]
    UnbalancedLayout {
        /// The offending group index.
        group: u8,
        /// Number of cells assigned to it.
        count: usize,
    },
    /// A serialized group layout did not contain 81 entries.
    #[display("layout has {_0} entries, expected 81")]
    #[from(ignore)]
    BadLayoutLength(#[error(not(source))] usize),
    /// A serialized candidate mask did not fit in nine bits.
    #[display("candidate bits out of range: {_0:#x}")]
    #[from(ignore)]
    BadSetBits(#[error(not(source))] u16),
    /// A serialized candidate iteration position was out of range.
    #[display("iteration position out of range: {_0}")]
    #[from(ignore)]
    BadIterPos(#[error(not(source))] u8),
}
