#![cfg(test)]

// Property tests for SliceMap kept inside the crate so they can check the
// internal stores directly.

use crate::error::SliceError;
use crate::slice::{Direction, Slice};
use crate::slice_map::SliceMap;
use core::hash::{BuildHasher, Hasher};
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Op {
    Set(u8, i32),
    Delete(u8),
    Insert {
        anchor: u8,
        key: u8,
        value: i32,
        before: bool,
    },
    DeleteRange(Option<u8>, Option<u8>, bool),
    SetRange(Option<u8>, Option<u8>, bool, Vec<(u8, i32)>),
    PopItem(bool),
    Range(Option<u8>, Option<u8>, bool),
    Clear,
}

fn arb_ops() -> impl Strategy<Value = Vec<Op>> {
    let key = || 0u8..10;
    let bound = || proptest::option::of(0u8..10);
    let op = prop_oneof![
        5 => (key(), any::<i32>()).prop_map(|(k, v)| Op::Set(k, v)),
        2 => key().prop_map(Op::Delete),
        3 => (key(), key(), any::<i32>(), any::<bool>()).prop_map(|(anchor, key, value, before)| {
            Op::Insert { anchor, key, value, before }
        }),
        1 => (bound(), bound(), any::<bool>()).prop_map(|(a, b, r)| Op::DeleteRange(a, b, r)),
        2 => (
            bound(),
            bound(),
            any::<bool>(),
            proptest::collection::vec((key(), any::<i32>()), 0..4)
        )
            .prop_map(|(a, b, r, rep)| Op::SetRange(a, b, r, rep)),
        1 => any::<bool>().prop_map(Op::PopItem),
        2 => (bound(), bound(), any::<bool>()).prop_map(|(a, b, r)| Op::Range(a, b, r)),
        1 => Just(Op::Clear),
    ];
    proptest::collection::vec(op, 1..60)
}

/// Ordered reference model: a plain vector of pairs.
#[derive(Default)]
struct Model(Vec<(u8, i32)>);

impl Model {
    fn pos(&self, k: u8) -> Option<usize> {
        self.0.iter().position(|(kk, _)| *kk == k)
    }

    fn set(&mut self, k: u8, v: i32) {
        match self.pos(k) {
            Some(i) => self.0[i].1 = v,
            None => self.0.push((k, v)),
        }
    }

    /// Indices a walk visits, or an error for an absent bound.
    fn walk(
        &self,
        start: Option<u8>,
        stop: Option<u8>,
        dir: Direction,
    ) -> Result<Vec<usize>, SliceError> {
        let start = match start {
            Some(k) => Some(self.pos(k).ok_or(SliceError::KeyNotFound)?),
            None => None,
        };
        let stop = match stop {
            Some(k) => Some(self.pos(k).ok_or(SliceError::KeyNotFound)?),
            None => None,
        };
        let mut out = Vec::new();
        if self.0.is_empty() {
            return Ok(out);
        }
        match dir {
            Direction::Forward => {
                let mut i = start.unwrap_or(0);
                while i < self.0.len() && Some(i) != stop {
                    out.push(i);
                    i += 1;
                }
            }
            Direction::Backward => {
                let mut i = start.unwrap_or(self.0.len() - 1) as isize;
                while i >= 0 && Some(i as usize) != stop {
                    out.push(i as usize);
                    i -= 1;
                }
            }
        }
        Ok(out)
    }

    /// Position of the zero-length gap a walk leaves behind.
    fn gap(&self, start: Option<u8>, walked: &[usize], dir: Direction) -> usize {
        if let Some(min) = walked.iter().min() {
            return *min;
        }
        match (start.and_then(|k| self.pos(k)), dir) {
            (Some(s), Direction::Forward) => s,
            (Some(s), Direction::Backward) => s + 1,
            (None, Direction::Forward) => 0,
            (None, Direction::Backward) => self.0.len(),
        }
    }

    fn remove_indices(&mut self, walked: &[usize]) {
        let mut sorted = walked.to_vec();
        sorted.sort_unstable();
        for i in sorted.into_iter().rev() {
            self.0.remove(i);
        }
    }

    /// Place `k` at `idx`, moving it if present. Returns the index it ended
    /// up at.
    fn place(&mut self, mut idx: usize, k: u8, v: i32) -> usize {
        if let Some(p) = self.pos(k) {
            self.0.remove(p);
            if p < idx {
                idx -= 1;
            }
        }
        self.0.insert(idx, (k, v));
        idx
    }
}

fn dir_of(rev: bool) -> Direction {
    if rev {
        Direction::Backward
    } else {
        Direction::Forward
    }
}

fn slice_of<'a>(a: &'a Option<u8>, b: &'a Option<u8>, rev: bool) -> Slice<'a, u8> {
    let mut s = Slice::full();
    if let Some(a) = a {
        s = s.with_start(a);
    }
    if let Some(b) = b {
        s = s.with_stop(b);
    }
    if rev {
        s = s.rev();
    }
    s
}

fn apply<S: BuildHasher + Clone>(
    sut: &mut SliceMap<u8, i32, S>,
    model: &mut Model,
    op: Op,
) -> Result<(), TestCaseError> {
    match op {
        Op::Set(k, v) => {
            sut.set(k, v);
            model.set(k, v);
        }
        Op::Delete(k) => {
            let res = sut.delete(&k);
            match model.pos(k) {
                Some(i) => {
                    prop_assert_eq!(res, Ok(()));
                    model.0.remove(i);
                }
                None => prop_assert_eq!(res, Err(SliceError::KeyNotFound)),
            }
        }
        Op::Insert {
            anchor,
            key,
            value,
            before,
        } => {
            let res = sut.insert(&anchor, (key, value), before);
            if model.pos(anchor).is_none() {
                prop_assert_eq!(res, Err(SliceError::KeyNotFound));
            } else if anchor == key {
                prop_assert!(res.is_ok());
                model.set(key, value);
            } else {
                prop_assert!(res.is_ok());
                if let Some(p) = model.pos(key) {
                    model.0.remove(p);
                }
                let a = model.pos(anchor).expect("anchor present");
                let idx = if before { a } else { a + 1 };
                model.0.insert(idx, (key, value));
            }
        }
        Op::DeleteRange(a, b, rev) => {
            let res = sut.delete_range(slice_of(&a, &b, rev));
            match model.walk(a, b, dir_of(rev)) {
                Ok(walked) => {
                    prop_assert_eq!(res, Ok(walked.len()));
                    model.remove_indices(&walked);
                }
                Err(e) => prop_assert_eq!(res, Err(e)),
            }
        }
        Op::SetRange(a, b, rev, rep) => {
            let dir = dir_of(rev);
            let res = sut.set_range(slice_of(&a, &b, rev), rep.clone());
            match model.walk(a, b, dir) {
                Ok(walked) => {
                    prop_assert_eq!(res, Ok(()));
                    let mut idx = model.gap(a, &walked, dir);
                    model.remove_indices(&walked);
                    let mut staged = Model::default();
                    for (k, v) in rep {
                        staged.set(k, v);
                    }
                    for (k, v) in staged.0 {
                        let at = model.place(idx, k, v);
                        idx = match dir {
                            Direction::Forward => at + 1,
                            Direction::Backward => at,
                        };
                    }
                }
                Err(e) => prop_assert_eq!(res, Err(e)),
            }
        }
        Op::PopItem(last) => {
            let res = sut.pop_item(last);
            if model.0.is_empty() {
                prop_assert_eq!(res, Err(SliceError::Empty));
            } else {
                let expected = if last {
                    model.0.pop()
                } else {
                    Some(model.0.remove(0))
                };
                prop_assert_eq!(res.ok(), expected);
            }
        }
        Op::Range(a, b, rev) => {
            let got: Result<Vec<(u8, i32)>, SliceError> = sut
                .range(slice_of(&a, &b, rev))
                .map(|r| r.map(|(k, v)| (*k, *v)).collect());
            let expected = model
                .walk(a, b, dir_of(rev))
                .map(|w| w.into_iter().map(|i| model.0[i]).collect());
            prop_assert_eq!(got, expected);
        }
        Op::Clear => {
            sut.clear();
            model.0.clear();
        }
    }
    Ok(())
}

/// Structural invariants plus equality with the model.
fn check<S: BuildHasher>(sut: &SliceMap<u8, i32, S>, model: &Model) -> Result<(), TestCaseError> {
    sut.check_consistency().map_err(TestCaseError::fail)?;
    let pairs: Vec<(u8, i32)> = sut.iter().map(|(k, v)| (*k, *v)).collect();
    prop_assert_eq!(&pairs, &model.0);
    prop_assert_eq!(sut.len(), model.0.len());
    let mut back: Vec<(u8, i32)> = sut.iter().rev().map(|(k, v)| (*k, *v)).collect();
    back.reverse();
    prop_assert_eq!(&back, &model.0);
    let walked: Vec<u8> = sut
        .range_keys(Slice::<u8>::full())
        .map_err(|e| TestCaseError::fail(e.to_string()))?
        .copied()
        .collect();
    prop_assert_eq!(walked.len(), sut.len());
    for (k, v) in &model.0 {
        prop_assert_eq!(sut.get(k), Ok(v));
    }
    for k in 0u8..10 {
        prop_assert_eq!(sut.contains_key(&k), model.pos(k).is_some());
    }
    Ok(())
}

// Property: state-machine equivalence against an ordered Vec model. After
// every op the index, value store and ring agree with each other and with
// the model, in both walk directions.
proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine(ops in arb_ops()) {
        let mut sut: SliceMap<u8, i32> = SliceMap::new();
        let mut model = Model::default();
        for op in ops {
            apply(&mut sut, &mut model, op)?;
            check(&sut, &model)?;
        }
    }
}

#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;
impl BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;
    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}
impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        0
    }
}

// Property: same invariants with every key in one hash bucket.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions(ops in arb_ops()) {
        let mut sut: SliceMap<u8, i32, ConstBuildHasher> = SliceMap::with_hasher(ConstBuildHasher);
        let mut model = Model::default();
        for op in ops {
            apply(&mut sut, &mut model, op)?;
            check(&sut, &model)?;
        }
    }
}

// Property: a clone equals its source and stays independent of it.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_clone_independent(ops in arb_ops(), extra in any::<i32>()) {
        let mut sut: SliceMap<u8, i32> = SliceMap::new();
        let mut model = Model::default();
        for op in ops {
            apply(&mut sut, &mut model, op)?;
        }
        let mut copy = sut.clone();
        prop_assert!(copy == sut);
        copy.set(200, extra);
        let _ = copy.pop_item(false);
        check(&sut, &model)?;
    }
}
