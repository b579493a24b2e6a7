//! Per-frame draw ordering

use crate::entity::EntityId;

/// One entity to draw this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawEntry {
    /// Entity to draw
    pub entity: EntityId,
    /// Effective draw layer
    pub layer: i32,
    /// Local Y plus the entity's Y-sort offset
    pub sort_y: f32,
}

/// Stable sort by layer, then by `sort_y` when `y_sort` is on. Entries that
/// compare equal keep their input order.
pub fn sort_draw_entries(entries: &mut [DrawEntry], y_sort: bool) {
    if y_sort {
        entries.sort_by(|a, b| a.layer.cmp(&b.layer).then_with(|| a.sort_y.total_cmp(&b.sort_y)));
    } else {
        entries.sort_by_key(|entry| entry.layer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(layers: &[i32], ys: &[f32]) -> Vec<DrawEntry> {
        layers
            .iter()
            .zip(ys)
            .map(|(&layer, &sort_y)| DrawEntry {
                entity: EntityId::next(),
                layer,
                sort_y,
            })
            .collect()
    }

    #[test]
    fn test_layer_sort_is_stable() {
        let mut list = entries(&[2, 1, 2, 1], &[0.0; 4]);
        let ids: Vec<EntityId> = list.iter().map(|e| e.entity).collect();
        sort_draw_entries(&mut list, false);

        let sorted: Vec<EntityId> = list.iter().map(|e| e.entity).collect();
        assert_eq!(sorted, vec![ids[1], ids[3], ids[0], ids[2]]);

        // repeated sorts of unchanged input agree
        let mut again = list.clone();
        sort_draw_entries(&mut again, false);
        assert_eq!(again, list);
    }

    #[test]
    fn test_y_sort_breaks_ties_within_layer() {
        let mut list = entries(&[2, 1, 2, 1], &[5.0, 9.0, -3.0, 1.0]);
        let ids: Vec<EntityId> = list.iter().map(|e| e.entity).collect();
        sort_draw_entries(&mut list, true);

        let sorted: Vec<EntityId> = list.iter().map(|e| e.entity).collect();
        assert_eq!(sorted, vec![ids[3], ids[1], ids[2], ids[0]]);
    }

    #[test]
    fn test_y_sort_keeps_equal_keys_in_order() {
        let mut list = entries(&[0, 0, 0], &[4.0, 4.0, 4.0]);
        let ids: Vec<EntityId> = list.iter().map(|e| e.entity).collect();
        sort_draw_entries(&mut list, true);
        assert_eq!(list.iter().map(|e| e.entity).collect::<Vec<_>>(), ids);
    }
}
