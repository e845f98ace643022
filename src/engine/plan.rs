//! engine::plan
//!
//! Layout planning: grid slots, pile ground heights and in-pile offsets.
//!
//! # Grid
//!
//! Types walk a grid `width` columns wide. Rank `r` among the non-reserved
//! keys lands at column `r % width`, layer `r / width`:
//!
//! ```text
//! x = (column - (width - 1) / 2) * item_spacing
//! y = layer * row_spacing + LAYER_CLEARANCE
//! z = 0
//! ```
//!
//! The grid never advances in depth; overflow pages upward. Keys with a
//! saved override are skipped without consuming a slot.
//!
//! # Piles
//!
//! A [`Pile`] fixes the ground height for one type with a single downward
//! probe from above its center. Every item in the pile reuses that height,
//! so the probe never hits an item placed earlier in the same pile.
//!
//! # Example
//!
//! ```
//! use std::collections::HashSet;
//! use shipsort::core::types::TypeKey;
//! use shipsort::engine::plan::{plan, GridSpec};
//!
//! let keys: Vec<TypeKey> = ["a", "b", "c"].iter().map(|k| TypeKey::new(k).unwrap()).collect();
//! let grid = GridSpec { width: 2, item_spacing: 1.0, row_spacing: 0.8 };
//! let layout = plan(&keys, &HashSet::new(), &grid);
//!
//! let c = layout.get(&keys[2]).unwrap();
//! assert_eq!((c.column, c.layer), (0, 1));
//! ```

use std::collections::{HashMap, HashSet};

use crate::core::config::Config;
use crate::core::types::{TypeKey, Vec3};
use crate::world::{ShipHandle, World, GROUND_LAYER_MASK, PROBE_DISTANCE, PROBE_LIFT};

/// Lift added to every pile so items clear the floor.
pub const LAYER_CLEARANCE: f32 = 0.05;

/// X/Z spacing inside a spread pile.
pub const SPREAD_SPACING: f32 = 0.10;

/// Height of one layer inside a spread pile.
pub const SPREAD_LAYER_HEIGHT: f32 = 0.07;

/// Grid dimensions.
#[derive(Debug, Clone, PartialEq)]
pub struct GridSpec {
    /// Columns per layer (at least 1).
    pub width: usize,
    pub item_spacing: f32,
    pub row_spacing: f32,
}

impl GridSpec {
    pub fn from_config(config: &Config) -> Self {
        Self {
            width: config.items_per_row(),
            item_spacing: config.item_spacing(),
            row_spacing: config.row_spacing(),
        }
    }

    /// Slot for rank `rank`.
    pub fn slot(&self, rank: usize) -> Slot {
        let width = self.width.max(1);
        let column = rank % width;
        let layer = rank / width;
        let center = (width as f32 - 1.0) * 0.5;
        Slot {
            column,
            layer,
            offset: Vec3::new(
                (column as f32 - center) * self.item_spacing,
                layer as f32 * self.row_spacing + LAYER_CLEARANCE,
                0.0,
            ),
        }
    }
}

/// A grid position assigned to one type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slot {
    pub column: usize,
    pub layer: usize,
    /// Offset from the grid origin.
    pub offset: Vec3,
}

/// Grid assignment for one operation, in assignment order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    slots: Vec<(TypeKey, Slot)>,
    /// Position of each key in `slots`.
    index: HashMap<TypeKey, usize>,
}

impl Layout {
    pub fn get(&self, key: &TypeKey) -> Option<&Slot> {
        self.index.get(key).map(|&i| &self.slots[i].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(TypeKey, Slot)> {
        self.slots.iter()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Assign grid slots to `ordered` keys, skipping `reserved` ones.
///
/// Repeated keys keep their first slot.
pub fn plan(ordered: &[TypeKey], reserved: &HashSet<TypeKey>, grid: &GridSpec) -> Layout {
    let mut layout = Layout {
        slots: Vec::with_capacity(ordered.len()),
        index: HashMap::with_capacity(ordered.len()),
    };
    for key in ordered {
        if reserved.contains(key) || layout.index.contains_key(key) {
            continue;
        }
        let rank = layout.slots.len();
        layout.index.insert(key.clone(), rank);
        layout.slots.push((key.clone(), grid.slot(rank)));
    }
    layout
}

/// How items share a pile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PilePolicy {
    /// Same X/Z, rising by `step_y` per item.
    Stacked { step_y: f32 },
    /// Square `width` x `width` sub-grid, layered when full.
    Spread { width: usize },
}

impl PilePolicy {
    pub fn from_config(config: &Config) -> Self {
        if config.stack_same_type_together() {
            PilePolicy::Stacked {
                step_y: config.same_type_stack_step_y(),
            }
        } else {
            PilePolicy::Spread {
                width: config.items_per_row(),
            }
        }
    }

    /// Offset of the `index`th item from the pile base.
    pub fn offset(&self, index: usize) -> Vec3 {
        match *self {
            PilePolicy::Stacked { step_y } => Vec3::new(0.0, index as f32 * step_y.max(0.0), 0.0),
            PilePolicy::Spread { width } => {
                let width = width.max(1);
                let per_layer = width * width;
                let layer = index / per_layer;
                let in_layer = index % per_layer;
                let row = in_layer / width;
                let column = in_layer % width;
                let center = (width as f32 - 1.0) * 0.5;
                Vec3::new(
                    (column as f32 - center) * SPREAD_SPACING,
                    layer as f32 * SPREAD_LAYER_HEIGHT,
                    (row as f32 - center) * SPREAD_SPACING,
                )
            }
        }
    }
}

/// Where one type's items go.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pile {
    /// Ship-local center; `y` is the ground height.
    pub center: Vec3,
    /// Extra height above the ground (grid layer, or clearance).
    pub lift: f32,
}

impl Pile {
    /// Grid pile: probe the ground once above `origin + slot` (X/Z only).
    pub fn from_slot(world: &dyn World, ship: ShipHandle, origin: Vec3, slot: &Slot) -> Self {
        let center = origin + Vec3::new(slot.offset.x, 0.0, slot.offset.z);
        Self {
            center: Vec3::new(center.x, probe_ground(world, ship, center), center.z),
            lift: slot.offset.y,
        }
    }

    /// Override pile: the saved position is used as-is, without a probe.
    pub fn from_override(position: Vec3) -> Self {
        Self {
            center: position,
            lift: LAYER_CLEARANCE,
        }
    }

    /// Pile at an arbitrary ship-local point, probed once.
    pub fn at_point(world: &dyn World, ship: ShipHandle, point: Vec3) -> Self {
        Self {
            center: Vec3::new(point.x, probe_ground(world, ship, point), point.z),
            lift: LAYER_CLEARANCE,
        }
    }

    /// Ship-local target for an item with `vertical_offset` at in-pile `sub` offset.
    pub fn target(&self, vertical_offset: f32, sub: Vec3) -> Vec3 {
        Vec3::new(
            self.center.x + sub.x,
            self.center.y + (vertical_offset - LAYER_CLEARANCE) + self.lift + sub.y,
            self.center.z + sub.z,
        )
    }
}

/// Ship-local ground height under `center`, or `center.y` if the probe misses.
pub fn probe_ground(world: &dyn World, ship: ShipHandle, center: Vec3) -> f32 {
    let start = world.ship_local_to_world(ship, center + Vec3::Y * PROBE_LIFT);
    match world.raycast_down(start, PROBE_DISTANCE, GROUND_LAYER_MASK) {
        Some(hit) => {
            let ground = world.world_to_ship_local(ship, hit.point).y;
            tracing::debug!(x = center.x, z = center.z, ground, "ground probe hit");
            ground
        }
        None => {
            tracing::debug!(x = center.x, z = center.z, "ground probe missed, using pile height");
            center.y
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{MockWorld, Scene, World, WorldOp};

    fn keys(names: &[&str]) -> Vec<TypeKey> {
        names.iter().map(|n| TypeKey::new(n).unwrap()).collect()
    }

    fn grid(width: usize) -> GridSpec {
        GridSpec {
            width,
            item_spacing: 1.0,
            row_spacing: 0.8,
        }
    }

    #[test]
    fn width_two_pages_upward() {
        let keys = keys(&["a", "b", "c"]);
        let layout = plan(&keys, &HashSet::new(), &grid(2));
        let positions: Vec<(usize, usize)> = layout.iter().map(|(_, s)| (s.column, s.layer)).collect();
        assert_eq!(positions, vec![(0, 0), (1, 0), (0, 1)]);

        let c = layout.get(&keys[2]).unwrap();
        assert_eq!(c.offset, Vec3::new(-0.5, 0.8 + LAYER_CLEARANCE, 0.0));
    }

    #[test]
    fn reserved_keys_consume_no_slot() {
        let keys = keys(&["a", "b", "c"]);
        let reserved: HashSet<TypeKey> = [keys[0].clone()].into_iter().collect();
        let layout = plan(&keys, &reserved, &grid(2));

        assert!(layout.get(&keys[0]).is_none());
        assert_eq!(layout.get(&keys[1]).unwrap().column, 0);
        assert_eq!(layout.get(&keys[2]).unwrap().column, 1);
    }

    #[test]
    fn single_column_centers_on_origin() {
        let slot = grid(1).slot(3);
        assert_eq!((slot.column, slot.layer), (0, 3));
        assert_eq!(slot.offset.x, 0.0);
        assert_eq!(slot.offset.z, 0.0);
    }

    #[test]
    fn duplicate_keys_keep_first_slot() {
        let keys = keys(&["a", "a", "b"]);
        let layout = plan(&keys, &HashSet::new(), &grid(3));
        assert_eq!(layout.len(), 2);
        assert_eq!(layout.get(&keys[0]).unwrap().column, 0);
        assert_eq!(layout.get(&keys[2]).unwrap().column, 1);
    }

    #[test]
    fn lookup_matches_assignment_order_for_many_types() {
        let keys: Vec<TypeKey> = (0..500)
            .map(|i| TypeKey::new(format!("type {}", i)).unwrap())
            .collect();
        let layout = plan(&keys, &HashSet::new(), &grid(7));

        assert_eq!(layout.len(), 500);
        for (rank, (key, slot)) in layout.iter().enumerate() {
            assert_eq!(layout.get(key), Some(slot));
            assert_eq!((slot.column, slot.layer), (rank % 7, rank / 7));
        }
        assert!(layout.get(&TypeKey::new("absent").unwrap()).is_none());
    }

    #[test]
    fn stacked_policy_clamps_negative_step() {
        let policy = PilePolicy::Stacked { step_y: -1.0 };
        assert_eq!(policy.offset(4), Vec3::ZERO);

        let policy = PilePolicy::Stacked { step_y: 0.1 };
        assert!((policy.offset(3).y - 0.3).abs() < 1e-6);
    }

    #[test]
    fn spread_policy_layers_when_full() {
        let policy = PilePolicy::Spread { width: 2 };
        assert_eq!(policy.offset(0), Vec3::new(-0.05, 0.0, -0.05));
        assert_eq!(policy.offset(3), Vec3::new(0.05, 0.0, 0.05));
        let fifth = policy.offset(4);
        assert_eq!(fifth.y, SPREAD_LAYER_HEIGHT);
        assert_eq!((fifth.x, fifth.z), (-0.05, -0.05));
    }

    #[test]
    fn pile_probes_once_and_targets_rest_on_ground() {
        let world = MockWorld::with_scene(Scene {
            floor_y: 0.3,
            ..Scene::default()
        });
        let ship = world.find_ship_root().unwrap();
        let slot = grid(1).slot(0);

        let pile = Pile::from_slot(&world, ship, Vec3::new(1.0, 0.5, 2.0), &slot);
        assert_eq!(pile.center, Vec3::new(1.0, 0.3, 2.0));

        let target = pile.target(0.2, Vec3::ZERO);
        assert!((target.y - (0.3 + 0.2)).abs() < 1e-6);

        let probes = world
            .operations()
            .iter()
            .filter(|op| matches!(op, WorldOp::Raycast { .. }))
            .count();
        assert_eq!(probes, 1);
    }

    #[test]
    fn missed_probe_falls_back_to_origin_height() {
        let world = MockWorld::with_scene(Scene {
            floor_y: 10.0,
            ..Scene::default()
        });
        let ship = world.find_ship_root().unwrap();
        assert_eq!(probe_ground(&world, ship, Vec3::new(0.0, 0.5, 0.0)), 0.5);
    }

    #[test]
    fn override_pile_skips_probe() {
        let pile = Pile::from_override(Vec3::new(2.0, 1.25, -1.0));
        let target = pile.target(0.05, Vec3::ZERO);
        assert!((target - Vec3::new(2.0, 1.3, -1.0)).length() < 1e-5);
    }
}
