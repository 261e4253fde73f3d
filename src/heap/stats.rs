// Thu Jan 22 2026 - Alex

use crate::memory::Address;
use crate::structure::TypeDescriptor;
use indexmap::IndexMap;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeStatistics {
    pub type_address: Address,
    pub name: String,
    pub count: u64,
    pub total_size: u64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct HeapStatistics {
    #[serde(serialize_with = "serialize_entries")]
    entries: IndexMap<Address, TypeStatistics>,
    total_objects: u64,
}

fn serialize_entries<S>(
    entries: &IndexMap<Address, TypeStatistics>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_seq(entries.values())
}

impl HeapStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, ty: &TypeDescriptor, size: u64) {
        let entry = self
            .entries
            .entry(ty.address())
            .or_insert_with(|| TypeStatistics {
                type_address: ty.address(),
                name: ty.name().to_string(),
                count: 0,
                total_size: 0,
            });
        entry.count += 1;
        entry.total_size += size;
        self.total_objects += 1;
    }

    /// Folds `other` in; types new to `self` keep `other`'s relative order.
    pub fn merge(&mut self, other: HeapStatistics) {
        for (address, stats) in other.entries {
            let entry = self
                .entries
                .entry(address)
                .or_insert_with(|| TypeStatistics {
                    count: 0,
                    total_size: 0,
                    ..stats.clone()
                });
            entry.count += stats.count;
            entry.total_size += stats.total_size;
        }
        self.total_objects += other.total_objects;
    }

    pub fn sort_by_size(&mut self) {
        self.entries
            .sort_by(|_, a, _, b| a.total_size.cmp(&b.total_size));
    }

    pub fn entries(&self) -> impl Iterator<Item = &TypeStatistics> {
        self.entries.values()
    }

    pub fn get(&self, type_address: Address) -> Option<&TypeStatistics> {
        self.entries.get(&type_address)
    }

    pub fn type_count(&self) -> usize {
        self.entries.len()
    }

    pub fn total_objects(&self) -> u64 {
        self.total_objects
    }

    pub fn total_size(&self) -> u64 {
        self.entries.values().map(|e| e.total_size).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total_objects == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ty(address: u64, name: &str) -> TypeDescriptor {
        TypeDescriptor::new(Address::new(address), name.to_string(), 10, 0)
    }

    #[test]
    fn test_aggregation_totals() {
        let a = ty(0x100, "A");
        let b = ty(0x200, "B");
        let mut stats = HeapStatistics::new();
        for _ in 0..5 {
            stats.add(&b, 10);
        }
        for _ in 0..3 {
            stats.add(&a, 10);
        }

        assert_eq!(stats.get(a.address()).map(|e| (e.count, e.total_size)), Some((3, 30)));
        assert_eq!(stats.get(b.address()).map(|e| (e.count, e.total_size)), Some((5, 50)));
        assert_eq!(stats.total_objects(), 8);
        assert_eq!(stats.entries().map(|e| e.count).sum::<u64>(), 8);
    }

    #[test]
    fn test_first_seen_order_until_sorted() {
        let a = ty(0x100, "A");
        let b = ty(0x200, "B");
        let mut stats = HeapStatistics::new();
        stats.add(&b, 50);
        stats.add(&a, 30);

        let names: Vec<_> = stats.entries().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A"]);

        stats.sort_by_size();
        let names: Vec<_> = stats.entries().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn test_merge_keeps_totals() {
        let a = ty(0x100, "A");
        let b = ty(0x200, "B");
        let mut left = HeapStatistics::new();
        left.add(&a, 8);
        let mut right = HeapStatistics::new();
        right.add(&b, 16);
        right.add(&a, 8);

        left.merge(right);
        assert_eq!(left.total_objects(), 3);
        assert_eq!(left.get(a.address()).map(|e| e.count), Some(2));
        assert_eq!(left.total_size(), 32);
    }

    #[test]
    fn test_json_export() {
        let mut stats = HeapStatistics::new();
        stats.add(&ty(0x100, "A"), 24);
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["total_objects"], 1);
        assert_eq!(json["entries"][0]["name"], "A");
    }
}
