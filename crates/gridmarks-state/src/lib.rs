//! The gridmarks Sudoku state engine.
//!
//! This crate holds the evolving state of a 9x9 grid during solving: an
//! 81-cell table coupled with 27 redundant house aggregates (per-group,
//! per-column, per-row solved counts and candidate counts) that stay in
//! exact lock-step with the cells across every mutation and every
//! serialization path. The redundancy buys constant-time aggregate queries
//! for the inner loops of solver tactics; the engine's job is to never let
//! the two representations drift.
//!
//! # Main pieces
//!
//! - [`State`] - the state core: construction, mutation primitives
//!   (clue assignment and removal, batched candidate edits, pencil-mark
//!   fill), and queries over keysets and house aggregates
//! - [`GroupLayout`] / [`Tables`] - the box layout and the read-only
//!   peer/subgroup/housekey tables derived from it, shared between states
//! - [`views`] - live clue and candidate maps over the state
//! - [`iter`] - five orderings over solved and unsolved cells
//! - [`Rectangle`] - results of the rectangle search
//! - [`Snapshot`] - lossless serializable image of a state
//!
//! # Example
//!
//! ```
//! use gridmarks_core::{CandidateSet, Coord, Digit};
//! use gridmarks_state::State;
//!
//! let mut state = State::new([
//!     (Coord::new(0, 0), Digit::new(0)),
//!     (Coord::new(4, 4), Digit::new(7)),
//! ])
//! .unwrap();
//!
//! // Aggregate queries are O(1): how many cells in each house through
//! // (0, 1) can still be 7? The clue at (4, 4) already took 7 away from
//! // one cell of column 1 and one cell of row 0.
//! let (group, col, row) = state.candidate_in_houses(Coord::new(0, 1), Digit::new(7));
//! assert_eq!((group, col, row), (8, 8, 7));
//!
//! // Batched removal detects contradictions but is not rolled back.
//! let snapshot = state.snapshot();
//! let full = CandidateSet::FULL;
//! let err = state.remove_candidates([(Coord::new(0, 1), full)]);
//! assert!(err.is_err());
//! let state = snapshot.restore().unwrap();
//! assert!(!state.candidates().get(Coord::new(0, 1)).unwrap().is_empty());
//! ```

mod config;
mod error;
pub mod iter;
mod rect;
mod snapshot;
mod state;
pub mod views;

pub use self::{
    config::{GroupLayout, KeySet, Peers, Tables, default_tables},
    error::Error,
    rect::Rectangle,
    snapshot::Snapshot,
    state::State,
};
