//! serde support (feature `serde`).
//!
//! A map serializes as a sequence of `(key, value)` pairs in iteration
//! order and deserializes by setting each pair in turn, which rebuilds the
//! same order. Duplicate keys in the input keep their first position and
//! their last value.

use crate::slice_map::SliceMap;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::marker::PhantomData;
use serde::de::{Deserialize, Deserializer, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeSeq, Serializer};

impl<K, V, S> Serialize for SliceMap<K, V, S>
where
    K: Serialize,
    V: Serialize,
{
    fn serialize<T: Serializer>(&self, serializer: T) -> Result<T::Ok, T::Error> {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for pair in self.iter() {
            seq.serialize_element(&pair)?;
        }
        seq.end()
    }
}

struct PairsVisitor<K, V, S> {
    _pd: PhantomData<fn() -> SliceMap<K, V, S>>,
}

impl<'de, K, V, S> Visitor<'de> for PairsVisitor<K, V, S>
where
    K: Deserialize<'de> + Eq + Hash,
    V: Deserialize<'de>,
    S: BuildHasher + Default,
{
    type Value = SliceMap<K, V, S>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a sequence of (key, value) pairs")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let capacity = seq.size_hint().unwrap_or(0);
        let mut map = SliceMap::with_capacity_and_hasher(capacity, S::default());
        while let Some((k, v)) = seq.next_element::<(K, V)>()? {
            map.set(k, v);
        }
        Ok(map)
    }
}

impl<'de, K, V, S> Deserialize<'de> for SliceMap<K, V, S>
where
    K: Deserialize<'de> + Eq + Hash,
    V: Deserialize<'de>,
    S: BuildHasher + Default,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_seq(PairsVisitor { _pd: PhantomData })
    }
}
