//! Lossless snapshots of a state.
//!
//! A [`Snapshot`] is a plain serializable record of everything a state
//! holds: the solved cells, every candidate mask worth keeping (all unsolved
//! cells, plus solved cells whose preserved mask is nonzero), the group
//! layout when it is not the standard one, and the host payloads. Domain
//! types are flattened to primitives on the way out and validated on the
//! way back in, so a snapshot deserialized from untrusted bytes cannot
//! produce an inconsistent state.

use std::collections::BTreeMap;

use gridmarks_core::{CandidateSet, Coord, Digit};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::{Error, State, config::GroupLayout};

/// A detached, serializable image of a [`State`].
///
/// Produced by [`State::snapshot`] and turned back into a live state by
/// [`Snapshot::restore`]. Round-tripping is lossless: the restored state
/// compares equal to the original, house aggregates included.
///
/// # Examples
///
/// ```
/// use gridmarks_core::{Coord, Digit};
/// use gridmarks_state::State;
///
/// let mut state = State::new([(Coord::new(0, 0), Digit::new(4))]).unwrap();
/// state.user_data_mut().insert("tag".into(), b"demo".to_vec());
///
/// let snapshot = state.snapshot();
/// let restored = snapshot.restore().unwrap();
/// assert_eq!(restored, state);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Solved coordinate -> digit.
    clues: BTreeMap<(u8, u8), u8>,
    /// Coordinate -> `(mask bits, iteration position)`.
    candidates: BTreeMap<(u8, u8), (u16, u8)>,
    /// Per-cell group table; absent for the standard layout.
    #[serde(default)]
    layout: Option<Vec<u8>>,
    /// Movehook mailbox payload, if the slot is occupied.
    #[serde(default)]
    movehook: Option<Vec<u8>>,
    /// Host-attached metadata.
    #[serde(default)]
    user_data: BTreeMap<String, Vec<u8>>,
}

impl State {
    /// Captures a snapshot of the current state.
    ///
    /// Reading the movehook slot here is not a mailbox read: the slot stays
    /// occupied on the live state.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        let clues = self
            .solved_keys()
            .iter()
            .filter_map(|&coord| {
                self.value_at(coord)
                    .map(|d| ((coord.row(), coord.col()), d.value()))
            })
            .collect();

        let mut candidates = BTreeMap::new();
        for coord in Coord::ALL {
            let mask = self.cands_at(coord);
            if !self.is_solved_at(coord) || !mask.is_empty() {
                candidates.insert((coord.row(), coord.col()), (mask.bits(), 0));
            }
        }

        let layout = if self.has_default_config() {
            None
        } else {
            Some(self.group_layout().as_groups().to_vec())
        };

        Snapshot {
            clues,
            candidates,
            layout,
            movehook: self.movehook_slot().cloned(),
            user_data: self.user_data().clone(),
        }
    }
}

impl Snapshot {
    /// Rebuilds a live state from the snapshot.
    ///
    /// The state is constructed from the clues without pencil-mark fill,
    /// then every recorded candidate mask is written back; masks of
    /// unsolved cells re-enter the house candidate counts, preserved masks
    /// of solved cells do not. Movehook and user data are reattached as
    /// they were.
    ///
    /// # Errors
    ///
    /// Returns the validation error for any out-of-range coordinate, digit,
    /// candidate mask, iteration position, or layout table, and
    /// [`Error::KeyConflict`] for duplicate clue coordinates.
    pub fn restore(&self) -> Result<State, Error> {
        let layout = self
            .layout
            .as_deref()
            .map(GroupLayout::from_slice)
            .transpose()?;

        let mut clues = Vec::with_capacity(self.clues.len());
        for (&(row, col), &digit) in &self.clues {
            clues.push((Coord::try_new(row, col)?, Digit::try_new(digit)?));
        }

        let mut state = State::with_options(clues, false, layout.as_ref())?;

        for (&(row, col), &(bits, pos)) in &self.candidates {
            let coord = Coord::try_new(row, col)?;
            let mask = CandidateSet::try_from_bits(bits).ok_or(Error::BadSetBits(bits))?;
            if pos >= 9 {
                return Err(Error::BadIterPos(pos));
            }
            if state.is_solved_at(coord) {
                state.set_preserved_mask(coord, mask);
            } else {
                state.set_candidates_at(coord, mask)?;
            }
        }

        state.set_movehook_slot(self.movehook.clone());
        state.set_user_data(self.user_data.clone());
        debug!(
            "restored state with {} clues and {} candidate masks",
            self.clues.len(),
            self.candidates.len()
        );
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use crate::state::tests::check_invariants;

    use super::*;

    fn cands(digits: &[u8]) -> CandidateSet {
        digits.iter().map(|&d| Digit::new(d)).collect()
    }

    fn mutated_state() -> State {
        let mut state = State::new([
            (Coord::new(0, 0), Digit::new(0)),
            (Coord::new(3, 5), Digit::new(6)),
        ])
        .expect("valid clues");

        // A spread of mutations: narrowed sets, a removal batch, a clue
        // solved after fill (leaving a preserved mask), and one deleted.
        state
            .set_candidates_at(Coord::new(1, 1), cands(&[2, 3]))
            .unwrap();
        state
            .remove_candidates([(Coord::new(7, 7), cands(&[0, 1, 2]))])
            .unwrap();
        state.assign_clue(Coord::new(5, 5), Digit::new(8)).unwrap();
        state.delete_clue(Coord::new(0, 0)).unwrap();
        state.put_movehook(b"next-move".to_vec());
        state.user_data_mut().insert("origin".into(), b"test".to_vec());
        state
    }

    #[test]
    fn test_round_trip_restores_everything() {
        let state = mutated_state();
        let restored = state.snapshot().restore().expect("valid snapshot");
        assert_eq!(restored, state);
        check_invariants(&restored);

        // The queries agree too, not just the representation.
        assert_eq!(restored.num_solved(), state.num_solved());
        assert_eq!(restored.digit_counts(), state.digit_counts());
        assert_eq!(restored.solved_keys(), state.solved_keys());
        for house in 0..27 {
            assert_eq!(
                restored.candidates_from_house(house).unwrap(),
                state.candidates_from_house(house).unwrap(),
            );
        }
        for coord in Coord::ALL {
            assert_eq!(restored.cands_at(coord), state.cands_at(coord));
            for digit in Digit::ALL {
                assert_eq!(
                    restored.candidate_in_houses(coord, digit),
                    state.candidate_in_houses(coord, digit),
                );
            }
        }
    }

    #[test]
    fn test_restore_does_not_consume_movehook() {
        let state = mutated_state();
        let mut restored = state.snapshot().restore().unwrap();
        // The payload is still in the slot after restore; taking it reads
        // and clears as usual.
        assert_eq!(restored.take_movehook().as_deref(), Some(&b"next-move"[..]));
        assert_eq!(restored.take_movehook(), None);
    }

    #[test]
    fn test_snapshot_keeps_preserved_masks_only_when_nonzero() {
        let state = mutated_state();
        let snapshot = state.snapshot();
        // (5, 5) was solved after fill: preserved mask recorded.
        assert!(snapshot.candidates.contains_key(&(5, 5)));
        // (3, 5) was a construction clue: empty mask, not recorded.
        assert!(!snapshot.candidates.contains_key(&(3, 5)));
        // Unsolved cells are always recorded, even when empty.
        assert_eq!(snapshot.candidates.len(), 80);
    }

    #[test]
    fn test_default_layout_not_recorded() {
        let state = State::new([]).unwrap();
        assert_eq!(state.snapshot().layout, None);
    }

    #[test]
    fn test_custom_layout_round_trips() {
        let mut groups = [0u8; 81];
        for (i, g) in groups.iter_mut().enumerate() {
            #[expect(clippy::cast_possible_truncation)]
            {
                *g = (i % 9) as u8;
            }
        }
        let layout = GroupLayout::from_groups(groups).expect("valid layout");
        let state = State::with_options(
            [(Coord::new(0, 0), Digit::new(3))],
            true,
            Some(&layout),
        )
        .unwrap();
        let snapshot = state.snapshot();
        assert!(snapshot.layout.is_some());
        let restored = snapshot.restore().unwrap();
        assert_eq!(restored, state);
        assert!(!restored.has_default_config());
    }

    #[test]
    fn test_restore_rejects_bad_fields() {
        let good = mutated_state().snapshot();

        let mut bad = good.clone();
        bad.clues.insert((9, 0), 0);
        assert!(matches!(
            bad.restore(),
            Err(Error::Value(gridmarks_core::Error::KeyOutOfRange { .. }))
        ));

        let mut bad = good.clone();
        bad.clues.insert((0, 1), 9);
        assert!(matches!(
            bad.restore(),
            Err(Error::Value(gridmarks_core::Error::DigitOutOfRange(9)))
        ));

        let mut bad = good.clone();
        bad.candidates.insert((0, 0), (0x200, 0));
        assert!(matches!(bad.restore(), Err(Error::BadSetBits(0x200))));

        let mut bad = good.clone();
        bad.candidates.insert((0, 0), (0x1ff, 9));
        assert!(matches!(bad.restore(), Err(Error::BadIterPos(9))));

        let mut bad = good.clone();
        bad.layout = Some(vec![0; 80]);
        assert!(matches!(bad.restore(), Err(Error::BadLayoutLength(80))));
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut state = mutated_state();
        let snapshot = state.snapshot();
        state.clear_all_candidates();
        // Later mutation does not leak into the captured snapshot.
        let restored = snapshot.restore().unwrap();
        assert_ne!(restored, state);
        assert_eq!(restored.cands_at(Coord::new(1, 1)), cands(&[2, 3]));
    }
}
