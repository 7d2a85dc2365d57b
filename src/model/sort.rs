use crate::mapping::Resource;

/// Order entities by id; values without an id come first
pub fn sort_by_id<T: Resource>(items: &mut [T]) {
    items.sort_by(|a, b| a.id().cmp(&b.id()));
}
