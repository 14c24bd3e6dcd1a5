//! Stable group-by over borrowed records.

use std::collections::HashMap;
use std::hash::Hash;

/// Groups `records` by `key`, keeping groups in order of first appearance and
/// records within a group in input order.
pub fn group_by<'a, T, K, F>(records: &'a [T], key: F) -> Vec<(K, Vec<&'a T>)>
where
    K: Eq + Hash + Clone,
    F: Fn(&T) -> K,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Vec<&'a T>)> = Vec::new();

    for record in records {
        let k = key(record);
        match index.get(&k) {
            Some(&i) => groups[i].1.push(record),
            None => {
                index.insert(k.clone(), groups.len());
                groups.push((k, vec![record]));
            }
        }
    }

    groups
}
