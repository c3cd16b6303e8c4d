//! Bookkeeping for N-target picking.
//!
//! N targeting repeats a 1×1 anchored pick. Each pick may add several tokens
//! but never more than are still missing, never a token picked before, and a
//! pick that adds nothing does not count.

use std::collections::BTreeSet;

use crate::candidate::{Candidate, TokenId};
use crate::expr::NValue;

use super::SelectionRequest;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NTargetProgress {
    target: NValue,
    /// Selected ids in pick order.
    order: Vec<TokenId>,
    selected: BTreeSet<TokenId>,
}

impl NTargetProgress {
    pub fn new(target: NValue) -> Self {
        Self {
            target,
            order: Vec::new(),
            selected: BTreeSet::new(),
        }
    }

    pub fn target(&self) -> NValue {
        self.target
    }

    pub fn selected_count(&self) -> usize {
        self.order.len()
    }

    pub fn remaining(&self) -> usize {
        self.target.as_usize().saturating_sub(self.order.len())
    }

    pub fn is_complete(&self) -> bool {
        self.remaining() == 0
    }

    /// Selected ids in the order they were picked.
    pub fn selected(&self) -> &[TokenId] {
        &self.order
    }

    /// Picker label, `"{selected}/{target}"`.
    pub fn label(&self) -> String {
        format!("{}/{}", self.selected_count(), self.target)
    }

    /// Copies the already-selected set into `request` for the next pick.
    pub fn prepare(&self, request: SelectionRequest) -> SelectionRequest {
        request.with_already_selected(self.selected.clone())
    }

    /// Records the matches of one pick and returns the ids actually added.
    ///
    /// Matches beyond [`remaining`](Self::remaining) and repeats are ignored.
    pub fn apply<'a>(&mut self, matches: impl IntoIterator<Item = &'a Candidate>) -> Vec<TokenId> {
        let mut added = Vec::new();
        for candidate in matches {
            if self.is_complete() {
                break;
            }
            if self.selected.insert(candidate.id.clone()) {
                self.order.push(candidate.id.clone());
                added.push(candidate.id.clone());
            }
        }
        added
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TargetType;
    use crate::faction::Faction;
    use crate::geometry::{Point, Size, SquareGrid};
    use crate::select::select;

    fn token(id: &str, x: f64) -> Candidate {
        Candidate::new(id, id, Point::new(x, 0.0), Size::square(100.0), Faction::Enemy)
    }

    fn n(value: i64) -> NValue {
        NValue::new(value).unwrap()
    }

    #[test]
    fn never_exceeds_target() {
        let mut progress = NTargetProgress::new(n(2));
        let crowd = [token("a", 0.0), token("b", 0.0), token("c", 0.0)];
        let added = progress.apply(&crowd);
        assert_eq!(added.len(), 2);
        assert!(progress.is_complete());
        assert!(progress.apply(&crowd).is_empty());
        assert_eq!(progress.selected_count(), 2);
    }

    #[test]
    fn repeats_are_not_counted() {
        let mut progress = NTargetProgress::new(n(3));
        let a = token("a", 0.0);
        progress.apply([&a]);
        assert!(progress.apply([&a]).is_empty());
        assert_eq!(progress.remaining(), 2);
        assert_eq!(progress.label(), "1/3");
    }

    #[test]
    fn repeated_picks_skip_previous_selection() {
        let grid = SquareGrid::new(100.0);
        let candidates = vec![token("a", 0.0), token("b", 300.0)];
        let base = SelectionRequest::new(TargetType::N);
        let mut progress = NTargetProgress::new(n(2));

        let first = progress.prepare(base.clone().with_anchor(Point::new(50.0, 50.0)));
        progress.apply(select(&first, &candidates, &grid).unwrap());

        // Same spot again: the only token there is already selected.
        let again = progress.prepare(base.clone().with_anchor(Point::new(50.0, 50.0)));
        let matches = select(&again, &candidates, &grid).unwrap();
        assert!(matches.is_empty());
        assert!(progress.apply(matches).is_empty());
        assert_eq!(progress.remaining(), 1);

        let second = progress.prepare(base.with_anchor(Point::new(350.0, 50.0)));
        progress.apply(select(&second, &candidates, &grid).unwrap());
        assert!(progress.is_complete());
        assert_eq!(progress.selected(), &[TokenId::new("a"), TokenId::new("b")]);
    }
}
