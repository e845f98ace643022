//! End-to-end engine scenarios against MockWorld.
//!
//! Each test builds a scene, runs operations through the Engine facade and
//! checks what the world saw: placement calls, final positions, notices.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use shipsort::core::config::{Config, ConfigFile, SorterConfig};
use shipsort::core::ops::{CancelReason, Interaction, OperationKind, OperationState};
use shipsort::core::types::{ItemId, ItemState, TypeKey, Vec3};
use shipsort::engine::scan::{scan, SkipPolicy, SkipRules};
use shipsort::engine::{Engine, EngineError, FullSortOptions, MoveOptions, Outcome};
use shipsort::store::{MemoryBindingStore, MemoryPositionStore, PositionStore};
use shipsort::world::{MockWorld, Scene, World, WorldOp};

// =============================================================================
// Test Helpers
// =============================================================================

fn item(id: u64, name: &str, scrap_value: i32) -> ItemState {
    ItemState {
        id: ItemId(id),
        name: name.to_string(),
        scrap_value,
        position: Vec3::new(6.0 + id as f32, 0.0, 6.0),
        ..ItemState::default()
    }
}

fn world_with(items: Vec<ItemState>) -> MockWorld {
    MockWorld::with_scene(Scene {
        items,
        ..Scene::default()
    })
}

fn config(skipped: &str) -> Config {
    Config::from_file(ConfigFile {
        sorter: Some(SorterConfig {
            skipped_items: Some(skipped.to_string()),
            ..SorterConfig::default()
        }),
        ..ConfigFile::default()
    })
    .unwrap()
}

fn engine(world: &MockWorld, config: Config) -> Engine {
    Engine::new(
        Arc::new(world.clone()),
        Arc::new(MemoryPositionStore::new()),
        Arc::new(MemoryBindingStore::new()),
        config,
    )
}

fn keys_and_shovels() -> Vec<ItemState> {
    vec![
        item(1, "key", 3),
        item(2, "Key", 3),
        item(3, "열쇠", 3),
        item(4, "Shovel", 30),
        item(5, "shovel", 30),
    ]
}

// =============================================================================
// Scan
// =============================================================================

#[test]
fn skip_list_excludes_keys_unless_queried() {
    let rules = SkipRules::substring(["body", "key"]);

    let default = scan(keys_and_shovels(), SkipPolicy::Default, &rules);
    assert_eq!(default.keys(), vec![TypeKey::new("shovel").unwrap()]);
    assert_eq!(default.item_count(), 2);

    let explicit = scan(keys_and_shovels(), SkipPolicy::ExplicitQuery, &rules);
    let key_group = explicit.get(&TypeKey::new("key").unwrap()).unwrap();
    assert_eq!(key_group.items.len(), 3);
    assert_eq!(explicit.item_count(), 5);
}

// =============================================================================
// Full sort
// =============================================================================

#[tokio::test]
async fn full_sort_respects_skip_list() {
    let world = world_with(keys_and_shovels());
    let engine = engine(&world, config("body, key"));

    let report = engine.run_full_sort(FullSortOptions::default()).await.unwrap();
    assert_eq!(report.moved, 2);
    assert_eq!(report.piles, 1);

    let untouched = world.item(ItemId(1)).unwrap().position;
    assert_eq!(untouched, Vec3::new(7.0, 0.0, 6.0));
}

#[tokio::test]
async fn full_sort_with_all_flag_ignores_skip_list() {
    let world = world_with(keys_and_shovels());
    let engine = engine(&world, config("body, key"));

    let report = engine
        .run_full_sort(FullSortOptions {
            ignore_skip: true,
            ..FullSortOptions::default()
        })
        .await
        .unwrap();
    assert_eq!(report.moved, 5);
    assert_eq!(report.piles, 2);
}

#[tokio::test]
async fn second_full_sort_places_nothing() {
    let world = world_with(keys_and_shovels());
    let engine = engine(&world, config(""));

    let first = engine.run_full_sort(FullSortOptions::default()).await.unwrap();
    assert_eq!(first.moved, 5);

    world.clear_operations();
    let second = engine.run_full_sort(FullSortOptions::default()).await.unwrap();
    assert_eq!(second.moved, 0);
    assert_eq!(second.skipped_in_place, 5);
    assert_eq!(world.placement_count(), 0);

    // --redo moves everything again
    let forced = engine
        .run_full_sort(FullSortOptions {
            force: true,
            ..FullSortOptions::default()
        })
        .await
        .unwrap();
    assert_eq!(forced.moved, 5);
}

#[tokio::test]
async fn piles_share_one_ground_probe() {
    let world = world_with(keys_and_shovels());
    let engine = engine(&world, config(""));

    engine.run_full_sort(FullSortOptions::default()).await.unwrap();
    let probes = world
        .operations()
        .iter()
        .filter(|op| matches!(op, WorldOp::Raycast { .. }))
        .count();
    assert_eq!(probes, 2);
}

#[tokio::test]
async fn stacked_items_share_x_and_z() {
    let world = world_with(keys_and_shovels());
    let engine = engine(&world, config(""));
    engine.run_full_sort(FullSortOptions::default()).await.unwrap();

    let a = world.item(ItemId(4)).unwrap().position;
    let b = world.item(ItemId(5)).unwrap().position;
    assert_eq!((a.x, a.z), (b.x, b.z));

    let key = world.item(ItemId(1)).unwrap().position;
    assert!((key.x - a.x).abs() > 0.5);
}

// =============================================================================
// Operation guard
// =============================================================================

#[tokio::test]
async fn concurrent_full_sort_is_refused() {
    let world = world_with(keys_and_shovels());
    let engine = engine(&world, config(""));

    let first = engine.run_full_sort(FullSortOptions::default());
    let second = async {
        // the first call holds the tracker by the time this runs
        assert_eq!(world.placement_count(), 0);
        assert!(engine.is_operation_in_progress());
        engine.run_full_sort(FullSortOptions::default()).await
    };
    let (first, second) = tokio::join!(first, second);

    let err = second.unwrap_err();
    assert!(err.is_in_progress());
    assert!(matches!(err, EngineError::InProgress(_)));
    assert_eq!(first.unwrap().moved, 5);
    assert_eq!(world.placement_count(), 5);
    assert_eq!(engine.state(), OperationState::Completed(OperationKind::FullSort));
}

// =============================================================================
// Cancellation and interruption
// =============================================================================

#[tokio::test]
async fn cancel_after_first_placement() {
    let items: Vec<ItemState> = (1..=5).map(|i| item(i, "shovel", 10)).collect();
    let world = world_with(items);
    let engine = engine(&world, config(""));

    let tracker = engine.cancel_handle();
    world.on_placement(move |total| {
        if total == 1 {
            tracker.request_cancel();
        }
    });

    let report = engine.run_full_sort(FullSortOptions::default()).await.unwrap();
    assert_eq!(world.placement_count(), 1);
    assert_eq!(report.moved, 1);
    assert_eq!(report.outcome, Outcome::Cancelled(CancelReason::Requested));
    assert_eq!(
        engine.state(),
        OperationState::Cancelled(OperationKind::FullSort, CancelReason::Requested)
    );
    assert!(!engine.interaction_gate().is_locked());
    assert!(engine.interaction_gate().permits(Interaction::Grab));
}

#[tokio::test]
async fn extraction_interrupts_targeted_move() {
    let items: Vec<ItemState> = (1..=3).map(|i| item(i, "airhorn", 10)).collect();
    let world = world_with(items);
    let engine = engine(&world, config(""));

    let hook_world = world.clone();
    world.on_placement(move |_| hook_world.set_actor_extracted(true));

    let report = engine
        .run_targeted_move("air", MoveOptions::default())
        .await
        .unwrap();
    assert_eq!(report.outcome, Outcome::Cancelled(CancelReason::ActorExtracted));
    assert_eq!(report.moved, 1);
    assert!(world
        .notices()
        .iter()
        .any(|n| n.is_warning() && n.header == "Move cancelled"));
}

#[tokio::test]
async fn lock_is_held_only_while_running() {
    let items: Vec<ItemState> = (1..=2).map(|i| item(i, "shovel", 10)).collect();
    let world = world_with(items);
    let engine = engine(&world, config(""));

    let gate = engine.interaction_gate();
    let locked_during = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&locked_during);
    world.on_placement(move |_| {
        if !gate.permits(Interaction::Drop) {
            seen.fetch_add(1, Ordering::SeqCst);
        }
    });

    engine.run_full_sort(FullSortOptions::default()).await.unwrap();
    assert_eq!(locked_during.load(Ordering::SeqCst), 2);
    assert!(engine.interaction_gate().permits(Interaction::Drop));
}

// =============================================================================
// Preconditions
// =============================================================================

#[tokio::test]
async fn preconditions_block_without_side_effects() {
    let world = world_with(keys_and_shovels());
    world.set_ship_stationary(false);
    let engine = engine(&world, config(""));

    let err = engine.run_full_sort(FullSortOptions::default()).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "cannot start full sort: must be in orbit or stationary at the company"
    );
    assert!(world.operations().is_empty());
    assert!(world.notices().is_empty());
}

#[tokio::test]
async fn actor_outside_landed_ship_can_sort() {
    let world = world_with(keys_and_shovels());
    world.set_actor_in_ship(false);
    let engine = engine(&world, config(""));

    let report = engine.run_full_sort(FullSortOptions::default()).await.unwrap();
    assert_eq!(report.outcome, Outcome::Completed);
    assert_eq!(report.moved, 5);
}

#[tokio::test]
async fn ambiguous_move_lists_candidates() {
    let world = world_with(vec![item(1, "red key", 5), item(2, "redstone", 5)]);
    let engine = engine(&world, config(""));

    let err = engine
        .run_targeted_move("red", MoveOptions::default())
        .await
        .unwrap_err();
    let message = err.to_string();
    assert!(message.contains("red_key"), "{}", message);
    assert!(message.contains("redstone"), "{}", message);
    assert_eq!(world.placement_count(), 0);
}

// =============================================================================
// Saved positions
// =============================================================================

#[tokio::test]
async fn saved_position_overrides_grid() {
    let world = world_with(keys_and_shovels());
    let positions = Arc::new(MemoryPositionStore::new());
    let engine = Engine::new(
        Arc::new(world.clone()),
        positions.clone(),
        Arc::new(MemoryBindingStore::new()),
        config(""),
    );

    // actor stands at the ship origin
    let (key, saved) = engine.set_override_position("shov").unwrap();
    assert_eq!(key.as_str(), "shovel");
    assert_eq!(positions.get(&key).unwrap(), Some(saved));

    engine.run_full_sort(FullSortOptions::default()).await.unwrap();
    let placed = world.item(ItemId(4)).unwrap().position;
    assert!((placed - saved).length() < 1e-4, "{:?} vs {:?}", placed, saved);
}
