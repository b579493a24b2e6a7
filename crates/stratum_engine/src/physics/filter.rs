//! Collision filtering
//!
//! Every fixture carries a category (what it is), a mask (what it accepts) and
//! a group. Fixtures sharing a non-zero group bypass the category test: a
//! positive group always collides, a negative one never does.

/// Category/mask/group filter applied to fixtures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CollisionFilter {
    /// Category bits this fixture belongs to
    pub category: u16,
    /// Categories this fixture accepts contacts from
    pub mask: u16,
    /// Group index overriding category/mask for members of the same group
    pub group: i16,
}

impl Default for CollisionFilter {
    fn default() -> Self {
        Self {
            category: Self::DEFAULT_CATEGORY,
            mask: Self::ALL,
            group: 0,
        }
    }
}

impl CollisionFilter {
    /// No categories
    pub const NONE: u16 = 0;

    /// All categories
    pub const ALL: u16 = 0xFFFF;

    /// Category given to fixtures that never set one
    pub const DEFAULT_CATEGORY: u16 = 1;

    /// Create a filter
    pub const fn new(category: u16, mask: u16, group: i16) -> Self {
        Self { category, mask, group }
    }

    /// Builder for the category
    #[must_use]
    pub const fn with_category(mut self, category: u16) -> Self {
        self.category = category;
        self
    }

    /// Builder for the mask
    #[must_use]
    pub const fn with_mask(mut self, mask: u16) -> Self {
        self.mask = mask;
        self
    }

    /// Builder for the group
    #[must_use]
    pub const fn with_group(mut self, group: i16) -> Self {
        self.group = group;
        self
    }

    /// Check whether two filtered fixtures may touch
    ///
    /// # Example
    /// ```
    /// use stratum_engine::physics::CollisionFilter;
    ///
    /// let player = CollisionFilter::new(0b01, 0b10, 0);
    /// let enemy = CollisionFilter::new(0b10, 0b01, 0);
    /// assert!(player.should_collide(&enemy));
    /// ```
    pub const fn should_collide(&self, other: &Self) -> bool {
        if self.group == other.group && self.group != 0 {
            return self.group > 0;
        }
        (self.mask & other.category) != 0 && (self.category & other.mask) != 0
    }

    /// Helper to build a mask from several categories
    pub fn mask_of(categories: &[u16]) -> u16 {
        categories.iter().fold(0, |acc, &category| acc | category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAYER: u16 = 1 << 1;
    const ENEMY: u16 = 1 << 2;
    const PROJECTILE: u16 = 1 << 3;

    #[test]
    fn test_should_collide_mutual() {
        let player = CollisionFilter::new(PLAYER, ENEMY, 0);
        let enemy = CollisionFilter::new(ENEMY, PLAYER, 0);
        assert!(player.should_collide(&enemy));
        assert!(enemy.should_collide(&player));
    }

    #[test]
    fn test_should_not_collide_one_way() {
        // Player accepts enemies, but the enemy does not accept players
        let player = CollisionFilter::new(PLAYER, ENEMY, 0);
        let enemy = CollisionFilter::new(ENEMY, PROJECTILE, 0);
        assert!(!player.should_collide(&enemy));
    }

    #[test]
    fn test_group_overrides_masks() {
        let a = CollisionFilter::new(PLAYER, CollisionFilter::NONE, 3);
        let b = CollisionFilter::new(ENEMY, CollisionFilter::NONE, 3);
        assert!(a.should_collide(&b));

        let c = CollisionFilter::default().with_group(-2);
        let d = CollisionFilter::default().with_group(-2);
        assert!(!c.should_collide(&d));

        // different groups fall back to category/mask
        let e = CollisionFilter::default().with_group(-1);
        assert!(c.should_collide(&e));
    }

    #[test]
    fn test_mask_of() {
        assert_eq!(CollisionFilter::mask_of(&[PLAYER, ENEMY, PROJECTILE]), PLAYER | ENEMY | PROJECTILE);
    }
}
