//! Rectangle search.
//!
//! A rectangle is four unsolved cells at the intersections of two rows and
//! two columns whose candidate sets share at least one digit. Solver tactics
//! built on rectangles (unique rectangles and friends) either anchor the
//! search at a known upper-left corner or sweep the whole grid.

use gridmarks_core::{CandidateSet, Coord};

use crate::{Error, State};

/// A found rectangle.
///
/// `corners` are in clockwise order starting from the upper left:
/// `[ul, ur, lr, ll]`. `cands` is the nonempty intersection of the four
/// corner cells' candidate sets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rectangle {
    /// Candidates shared by all four corners.
    pub cands: CandidateSet,
    /// The corners: upper left, upper right, lower right, lower left.
    pub corners: [Coord; 4],
}

impl State {
    /// Finds rectangles of unsolved cells with shared candidates.
    ///
    /// With a `corner`, only rectangles whose upper-left cell is that
    /// coordinate are returned, ordered by the upper-right column and then
    /// the lower row, both ascending. Without one, every coordinate with
    /// `row < 8` and `col < 8` is tried as an upper-left corner in
    /// row-major order, solved cells skipped.
    ///
    /// With `required`, only rectangles whose shared candidate set includes
    /// every digit of `required` are returned.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BadCorner`] when an anchored search names a corner
    /// in the last row or last column.
    ///
    /// # Examples
    ///
    /// ```
    /// use gridmarks_core::{CandidateSet, Coord};
    /// use gridmarks_state::State;
    ///
    /// let state = State::new([]).unwrap();
    /// // On a freshly filled empty grid every cell shares all nine
    /// // candidates, so an anchored search finds an 8x8 grid of partners.
    /// let found = state
    ///     .find_rectangles(Some(Coord::new(0, 0)), None)
    ///     .unwrap();
    /// assert_eq!(found.len(), 64);
    /// assert_eq!(found[0].cands, CandidateSet::FULL);
    /// ```
    pub fn find_rectangles(
        &self,
        corner: Option<Coord>,
        required: Option<CandidateSet>,
    ) -> Result<Vec<Rectangle>, Error> {
        let required = required.unwrap_or(CandidateSet::EMPTY);
        match corner {
            Some(ul) => {
                if ul.row() == 8 || ul.col() == 8 {
                    return Err(Error::BadCorner(ul));
                }
                if self.is_solved_at(ul) {
                    return Ok(Vec::new());
                }
                Ok(self.rectangles_from(ul, required))
            }
            None => {
                let mut found = Vec::new();
                for row in 0..8 {
                    for col in 0..8 {
                        let ul = Coord::new(row, col);
                        if !self.is_solved_at(ul) {
                            found.extend(self.rectangles_from(ul, required));
                        }
                    }
                }
                Ok(found)
            }
        }
    }

    /// Anchored walk: right from the corner for an upper-right partner,
    /// then down for the bottom edge.
    fn rectangles_from(&self, ul: Coord, required: CandidateSet) -> Vec<Rectangle> {
        let mut found = Vec::new();
        let ul_set = self.cands_at(ul);
        if !required.is_subset(ul_set) {
            return found;
        }
        for c2 in ul.col() + 1..9 {
            let ur = Coord::new(ul.row(), c2);
            if self.is_solved_at(ur) {
                continue;
            }
            let top = ul_set & self.cands_at(ur);
            if top.is_empty() || !required.is_subset(top) {
                continue;
            }
            for r2 in ul.row() + 1..9 {
                let ll = Coord::new(r2, ul.col());
                if self.is_solved_at(ll) {
                    continue;
                }
                let left = top & self.cands_at(ll);
                if left.is_empty() || !required.is_subset(left) {
                    continue;
                }
                let lr = Coord::new(r2, c2);
                if self.is_solved_at(lr) {
                    continue;
                }
                let shared = left & self.cands_at(lr);
                if shared.is_empty() || !required.is_subset(shared) {
                    continue;
                }
                found.push(Rectangle {
                    cands: shared,
                    corners: [ul, ur, lr, ll],
                });
            }
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use gridmarks_core::Digit;

    use super::*;

    fn cands(digits: &[u8]) -> CandidateSet {
        digits.iter().map(|&d| Digit::new(d)).collect()
    }

    /// A state whose only rectangle sharing digit 3 sits at rows 1/4 and
    /// columns 2/5.
    fn one_rectangle_state() -> State {
        let mut state = State::with_options([], false, None).unwrap();
        let corners = [
            Coord::new(1, 2),
            Coord::new(1, 5),
            Coord::new(4, 5),
            Coord::new(4, 2),
        ];
        for (i, &corner) in corners.iter().enumerate() {
            // Shared digit 3 plus per-corner noise that never lines up.
            #[expect(clippy::cast_possible_truncation)]
            let noise = 4 + i as u8;
            state
                .set_candidates_at(corner, cands(&[3, noise]))
                .unwrap();
        }
        state
    }

    #[test]
    fn test_exactly_one_required_rectangle() {
        let state = one_rectangle_state();
        let found = state
            .find_rectangles(None, Some(cands(&[3])))
            .expect("global search");
        assert_eq!(found.len(), 1);
        let rect = &found[0];
        assert_eq!(rect.cands, cands(&[3]));
        assert_eq!(
            rect.corners,
            [
                Coord::new(1, 2),
                Coord::new(1, 5),
                Coord::new(4, 5),
                Coord::new(4, 2),
            ]
        );
    }

    #[test]
    fn test_anchored_matches_global_for_that_corner() {
        let state = one_rectangle_state();
        let anchored = state
            .find_rectangles(Some(Coord::new(1, 2)), Some(cands(&[3])))
            .unwrap();
        assert_eq!(anchored.len(), 1);
        // Anchoring elsewhere finds nothing.
        let other = state
            .find_rectangles(Some(Coord::new(0, 0)), Some(cands(&[3])))
            .unwrap();
        assert!(other.is_empty());
    }

    #[test]
    fn test_bad_corner_rejected_when_anchored() {
        let state = State::new([]).unwrap();
        for corner in [Coord::new(8, 0), Coord::new(0, 8), Coord::new(8, 8)] {
            assert!(matches!(
                state.find_rectangles(Some(corner), None),
                Err(Error::BadCorner(c)) if c == corner
            ));
        }
    }

    #[test]
    fn test_global_search_skips_last_row_and_column() {
        // Only cells in the last row/column carry candidates; the global
        // search must not treat them as upper-left corners.
        let mut state = State::with_options([], false, None).unwrap();
        for i in 0..9 {
            state
                .set_candidates_at(Coord::new(8, i), cands(&[0]))
                .unwrap();
            state
                .set_candidates_at(Coord::new(i, 8), cands(&[0]))
                .unwrap();
        }
        assert_eq!(state.find_rectangles(None, None).unwrap(), Vec::new());
    }

    #[test]
    fn test_solved_anchor_yields_nothing() {
        let mut state = State::new([]).unwrap();
        state.assign_clue(Coord::new(0, 0), Digit::new(1)).unwrap();
        assert!(
            state
                .find_rectangles(Some(Coord::new(0, 0)), None)
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn test_anchored_ordering_is_column_then_row() {
        let state = State::new([]).unwrap();
        let found = state
            .find_rectangles(Some(Coord::new(0, 0)), None)
            .unwrap();
        assert_eq!(found.len(), 64);
        // Upper-right column advances in the outer loop, lower row inner.
        let positions: Vec<_> = found
            .iter()
            .map(|r| (r.corners[1].col(), r.corners[2].row()))
            .collect();
        let mut expected = Vec::new();
        for c2 in 1..9 {
            for r2 in 1..9 {
                expected.push((c2, r2));
            }
        }
        assert_eq!(positions, expected);
    }

    #[test]
    fn test_rectangles_satisfy_predicate() {
        let state = State::new([(Coord::new(0, 0), Digit::new(0))]).unwrap();
        let required = cands(&[5]);
        for rect in state.find_rectangles(None, Some(required)).unwrap() {
            let [ul, ur, lr, ll] = rect.corners;
            assert_eq!(ul.row(), ur.row());
            assert_eq!(ll.row(), lr.row());
            assert_eq!(ul.col(), ll.col());
            assert_eq!(ur.col(), lr.col());
            assert!(ul.row() < ll.row());
            assert!(ul.col() < ur.col());
            assert!(!rect.cands.is_empty());
            assert!(required.is_subset(rect.cands));
            for corner in rect.corners {
                assert!(!state.solved_keys().contains(&corner));
                assert!(rect.cands.is_subset(state.candidates().get(corner).unwrap()));
            }
        }
    }

    #[test]
    fn test_required_filters_out_disjoint_sets() {
        let state = one_rectangle_state();
        // Digit 7 is nowhere shared.
        let found = state.find_rectangles(None, Some(cands(&[7]))).unwrap();
        assert!(found.is_empty());
    }
}
