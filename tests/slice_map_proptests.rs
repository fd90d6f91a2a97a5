use proptest::prelude::*;
use slice_map::{Slice, SliceMap};

fn distinct_pairs() -> impl Strategy<Value = Vec<(u16, i32)>> {
    proptest::collection::vec((any::<u16>(), any::<i32>()), 0..40).prop_map(|v| {
        let mut seen = std::collections::HashSet::new();
        v.into_iter().filter(|(k, _)| seen.insert(*k)).collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]

    // Iteration follows first insertion; re-setting a key keeps its slot.
    #[test]
    fn prop_order_is_first_insertion(pairs in distinct_pairs(), bump in any::<i32>()) {
        let mut m: SliceMap<u16, i32> = pairs.iter().copied().collect();
        if let Some((k, _)) = pairs.first() {
            m.set(*k, bump);
        }
        let keys: Vec<u16> = m.keys().copied().collect();
        let expected: Vec<u16> = pairs.iter().map(|(k, _)| *k).collect();
        prop_assert_eq!(keys, expected);
    }

    // A slice [i, j) by keys yields exactly the entries at positions i..j.
    #[test]
    fn prop_slice_is_half_open(
        pairs in distinct_pairs(),
        a in any::<prop::sample::Index>(),
        b in any::<prop::sample::Index>(),
    ) {
        prop_assume!(!pairs.is_empty());
        let m: SliceMap<u16, i32> = pairs.iter().copied().collect();
        let (i, j) = (a.index(pairs.len()), b.index(pairs.len()));
        let got: Vec<(u16, i32)> = m
            .range(Slice::new(&pairs[i].0, &pairs[j].0))
            .unwrap()
            .map(|(k, v)| (*k, *v))
            .collect();
        let expected: Vec<(u16, i32)> = if i <= j {
            pairs[i..j].to_vec()
        } else {
            pairs[i..].to_vec()
        };
        prop_assert_eq!(got, expected);
    }

    // Reversed full slice is the forward order backwards.
    #[test]
    fn prop_reverse_walk(pairs in distinct_pairs()) {
        let m: SliceMap<u16, i32> = pairs.iter().copied().collect();
        let mut back: Vec<(u16, i32)> = m
            .range(Slice::<u16>::full().rev())
            .unwrap()
            .map(|(k, v)| (*k, *v))
            .collect();
        back.reverse();
        prop_assert_eq!(back, pairs);
    }

    // Deleting a slice and assigning it back restores the map.
    #[test]
    fn prop_delete_then_reassign_restores(
        pairs in distinct_pairs(),
        a in any::<prop::sample::Index>(),
        len in 0usize..10,
    ) {
        prop_assume!(pairs.len() >= 2);
        let i = a.index(pairs.len() - 1);
        let j = (i + len).min(pairs.len() - 1);
        let orig: SliceMap<u16, i32> = pairs.iter().copied().collect();
        let mut m = orig.clone();
        let removed = pairs[i..j].to_vec();
        prop_assert_eq!(m.delete_range(Slice::new(&pairs[i].0, &pairs[j].0)), Ok(j - i));
        prop_assert_eq!(m.len(), pairs.len() - (j - i));
        m.set_range(Slice::new(&pairs[j].0, &pairs[j].0), removed).unwrap();
        prop_assert_eq!(m, orig);
    }
}
