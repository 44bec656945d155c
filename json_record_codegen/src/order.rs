//! Deterministic iteration over the model's name-keyed maps.
//!
//! The model holds `HashMap`s, whose iteration order changes from run to run.
//! Every place that emits code walks the maps through these helpers instead.

use std::collections::HashMap;

/// Entries of `map` sorted by key.
#[must_use]
pub fn ordered<V>(map: &HashMap<String, V>) -> Vec<(&str, &V)> {
    let mut entries: Vec<(&str, &V)> = map.iter().map(|(k, v)| (k.as_str(), v)).collect();
    entries.sort_unstable_by_key(|(k, _)| *k);
    entries
}

/// Keys of `map`, sorted.
#[must_use]
pub fn ordered_names<V>(map: &HashMap<String, V>) -> Vec<&str> {
    ordered(map).into_iter().map(|(name, _)| name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_sorted_lexicographically() {
        let map: HashMap<String, u8> = ["zeta", "Alpha", "beta", "alpha"]
            .into_iter()
            .map(|k| (k.to_string(), 0))
            .collect();
        assert_eq!(ordered_names(&map), vec!["Alpha", "alpha", "beta", "zeta"]);
    }

    #[test]
    fn ordering_ignores_insertion_order() {
        let forward: HashMap<String, usize> =
            (0..50).map(|i| (format!("field_{i:02}"), i)).collect();
        let backward: HashMap<String, usize> =
            (0..50).rev().map(|i| (format!("field_{i:02}"), i)).collect();
        assert_eq!(ordered(&forward), ordered(&backward));
    }

    #[test]
    fn empty_map_yields_nothing() {
        let map: HashMap<String, ()> = HashMap::new();
        assert!(ordered_names(&map).is_empty());
    }
}
