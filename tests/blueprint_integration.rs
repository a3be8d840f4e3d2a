//! Room planning integration tests
//!
//! Paint, validate, connect and dig rooms on a plain dirt world.

use formicary::blueprints::{RoomBlueprintManager, RoomType};
use formicary::core::error::PlanningError;
use formicary::core::types::{ColonyId, GridPos};
use formicary::world::{Terrain, WorldGrid};

const NEST: GridPos = GridPos::new(20, 4);

fn dirt_world() -> (RoomBlueprintManager, WorldGrid) {
    let mut world = WorldGrid::new(40, 40, Terrain::Dirt);
    world.dig_cell(NEST);
    let mut manager = RoomBlueprintManager::new(20_000);
    manager.register_nest(ColonyId(0), NEST);
    (manager, world)
}

fn paint_rect(manager: &mut RoomBlueprintManager, world: &WorldGrid, x0: i32, y0: i32, w: i32, h: i32) {
    for y in y0..y0 + h {
        for x in x0..x0 + w {
            manager.add_paint_cell(x, y, world);
        }
    }
}

#[test]
fn test_food_storage_lifecycle() {
    let (mut manager, mut world) = dirt_world();

    manager.start_painting(RoomType::FoodStorage, ColonyId(0));
    paint_rect(&mut manager, &world, 10, 20, 6, 8);
    let bp = manager.finish_painting(&world).unwrap().clone();

    assert_eq!(bp.cells.len(), 48);
    assert!(!bp.path.is_empty());
    assert!(bp.path.iter().all(|p| world.get(*p) == Some(Terrain::Dirt)));
    assert_eq!(manager.blueprints().len(), 1);
    assert_eq!(manager.build_progress(bp.id, &world), Some(0.0));

    // Dig in the order the planner suggests
    while let Some(cell) = manager.next_dig_target(bp.id, &world) {
        assert!(world.dig_cell(cell));
    }
    assert_eq!(manager.build_progress(bp.id, &world), Some(1.0));
    assert!(bp.is_built(&world));
}

#[test]
fn test_connection_path_is_contiguous() {
    let (mut manager, world) = dirt_world();
    manager.start_painting(RoomType::Nursery, ColonyId(0));
    paint_rect(&mut manager, &world, 30, 30, 4, 3);
    let bp = manager.finish_painting(&world).unwrap();

    let first = bp.path[0];
    assert!(bp.cells.iter().any(|c| c.neighbors4().any(|n| n == first)));
    for pair in bp.path.windows(2) {
        assert_eq!(
            (pair[0].x - pair[1].x).abs() + (pair[0].y - pair[1].y).abs(),
            1
        );
    }
    let last = bp.path[bp.path.len() - 1];
    assert!(last.neighbors4().any(|n| n == NEST));

    // BFS gives a shortest tunnel: Manhattan gap from region to nest, minus one
    let gap = (30 - NEST.x).abs() + (30 - NEST.y).abs() - 1;
    assert_eq!(bp.path.len() as i32, gap);
}

#[test]
fn test_one_cell_room_is_too_small() {
    let (mut manager, world) = dirt_world();
    manager.start_painting(RoomType::FoodStorage, ColonyId(0));
    assert!(manager.add_paint_cell(5, 30, &world));

    let err = manager.finish_painting(&world).unwrap_err();
    assert!(err.to_string().contains("too small"));
    assert!(manager.blueprints().is_empty());
}

#[test]
fn test_overlapping_room_is_rejected() {
    let (mut manager, world) = dirt_world();
    manager.start_painting(RoomType::FoodStorage, ColonyId(0));
    paint_rect(&mut manager, &world, 10, 20, 6, 8);
    let first = manager.finish_painting(&world).unwrap().clone();

    manager.start_painting(RoomType::Barracks, ColonyId(0));
    paint_rect(&mut manager, &world, 13, 24, 4, 4);
    let err = manager.finish_painting(&world).unwrap_err();

    assert!(err.to_string().contains("overlap"));
    assert_eq!(manager.blueprints(), &[first]);
}

#[test]
fn test_room_over_tunnel_is_rejected() {
    let (mut manager, world) = dirt_world();
    manager.start_painting(RoomType::FoodStorage, ColonyId(0));
    paint_rect(&mut manager, &world, 10, 20, 6, 8);
    let tunnel_cell = manager.finish_painting(&world).unwrap().path[0];

    manager.start_painting(RoomType::Nursery, ColonyId(0));
    paint_rect(&mut manager, &world, tunnel_cell.x - 1, tunnel_cell.y - 3, 3, 4);
    let err = manager.finish_painting(&world).unwrap_err();
    assert!(matches!(err, PlanningError::Overlap { .. }));
}

#[test]
fn test_walled_off_region_has_no_path() {
    let (mut manager, mut world) = dirt_world();
    // Hardite box around the area, leaving its dirt interior paintable
    for i in 24..=36 {
        for (x, y) in [(i, 24), (i, 36), (24, i), (36, i)] {
            world.set(GridPos::new(x, y), Terrain::Hardite);
        }
    }

    manager.start_painting(RoomType::Nursery, ColonyId(0));
    paint_rect(&mut manager, &world, 28, 28, 4, 3);
    let err = manager.finish_painting(&world).unwrap_err();
    assert_eq!(err, PlanningError::NoPath);
    assert!(err.to_string().contains("no path found"));
}

#[test]
fn test_search_cap_reports_no_path() {
    let mut world = WorldGrid::new(40, 40, Terrain::Dirt);
    world.dig_cell(NEST);
    let mut manager = RoomBlueprintManager::new(5);
    manager.register_nest(ColonyId(0), NEST);

    manager.start_painting(RoomType::Nursery, ColonyId(0));
    paint_rect(&mut manager, &world, 30, 30, 4, 3);
    let err = manager.finish_painting(&world).unwrap_err();
    assert!(matches!(err, PlanningError::SearchExhausted { .. }));
    assert!(err.to_string().contains("no path found"));
    assert!(manager.blueprints().is_empty());
}

#[test]
fn test_painted_cell_turned_solid_is_rejected() {
    let (mut manager, mut world) = dirt_world();
    manager.start_painting(RoomType::Nursery, ColonyId(0));
    paint_rect(&mut manager, &world, 30, 30, 4, 3);

    // Terrain changes under the paint before the plan is confirmed
    world.set(GridPos::new(31, 31), Terrain::Rock);
    let err = manager.finish_painting(&world).unwrap_err();
    assert!(matches!(err, PlanningError::OverlapTerrain { .. }));
    assert!(err.to_string().contains("overlap"));
    assert!(manager.blueprints().is_empty());
    assert!(!manager.is_painting());

    manager.start_painting(RoomType::Nursery, ColonyId(0));
    paint_rect(&mut manager, &world, 10, 30, 4, 3);
    world.set(GridPos::new(13, 32), Terrain::Hardite);
    let err = manager.finish_painting(&world).unwrap_err();
    assert!(err.to_string().contains("overlap"));
    assert!(manager.blueprints().is_empty());
}
