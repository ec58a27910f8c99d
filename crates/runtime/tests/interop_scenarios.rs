use std::io::Write;

use interop_core::{
    ConveyorFlags, Cube, HopperPermissions, InteropConfig, InteropError, ItemId, ItemRecord,
    Operation, SegmentEntity, StockReport, WorldOffset, WorldPosition, find_neighbors,
};
use runtime::{
    ConveyorBelt, MachineBuffer, NativeChest, Recipe, RuntimeConfig, SegmentCoord, SegmentWorld,
    StorageHopper, build_dispatcher,
};

/// Position-only caller standing in for a machine.
struct Caller(WorldPosition);

impl SegmentEntity for Caller {
    fn position(&self) -> WorldPosition {
        self.0
    }
}

/// Rock has no adapter and no storage contract.
struct Rock;

impl SegmentEntity for Rock {
    fn position(&self) -> WorldPosition {
        WorldPosition::ORIGIN
    }
}

fn world_around(positions: &[WorldPosition]) -> SegmentWorld {
    let mut world = SegmentWorld::new();
    for &position in positions {
        world.load_segment_at(position);
    }
    world
}

#[test]
fn hopper_accepts_cube_stack_within_capacity() {
    let dispatcher = build_dispatcher(&InteropConfig::default());
    let mut hopper = StorageHopper::new(WorldPosition::ORIGIN, 5);

    assert_eq!(dispatcher.free_space(None, &hopper).unwrap(), 5);
    let accepted = dispatcher
        .give_item(None, &mut hopper, &ItemRecord::cube_stack(1, 0, 3))
        .expect("give should not fail");

    assert!(accepted);
    assert_eq!(dispatcher.free_space(None, &hopper).unwrap(), 2);
    assert!(
        !dispatcher
            .give_item(None, &mut hopper, &ItemRecord::cube_stack(1, 0, 3))
            .unwrap()
    );
}

#[test]
fn hopper_counts_ore_across_values() {
    let dispatcher = build_dispatcher(&InteropConfig::default());
    let mut hopper = StorageHopper::new(WorldPosition::ORIGIN, 20).with_ore_types([200]);
    for value in [0, 1, 1, 2] {
        assert!(
            dispatcher
                .give_item(None, &mut hopper, &ItemRecord::cube_stack(200, value, 1))
                .unwrap()
        );
    }
    assert!(
        dispatcher
            .give_item(None, &mut hopper, &ItemRecord::cube_stack(1, 1, 2))
            .unwrap()
    );

    let ore = dispatcher
        .has_items(None, &hopper, &ItemRecord::cube_stack(200, 9, 1))
        .unwrap();
    let stone = dispatcher
        .has_items(None, &hopper, &ItemRecord::cube_stack(1, 0, 1))
        .unwrap();

    assert_eq!(ore, StockReport::of(4));
    assert_eq!(stone, StockReport::NONE);
}

#[test]
fn hopper_round_robin_withdrawal_records_logistics() {
    let dispatcher = build_dispatcher(&InteropConfig::default());
    let mut hopper = StorageHopper::new(WorldPosition::ORIGIN, 10);
    hopper.set_logistics(true);
    assert!(
        dispatcher
            .give_item(None, &mut hopper, &ItemRecord::single(ItemId(7)))
            .unwrap()
    );
    assert!(
        dispatcher
            .give_item(None, &mut hopper, &ItemRecord::cube_stack(3, 0, 1))
            .unwrap()
    );

    let first = dispatcher.take_any_item(None, &mut hopper).unwrap();
    let second = dispatcher.take_any_item(None, &mut hopper).unwrap();

    assert_eq!(first, Some(ItemRecord::cube_stack(3, 0, 1)));
    assert_eq!(second, Some(ItemRecord::single(ItemId(7))));
    assert_eq!(hopper.logistics_operations(), 2);
    assert!(hopper.take_update_request());
    assert!(dispatcher.take_any_item(None, &mut hopper).unwrap().is_none());
}

#[test]
fn locked_hopper_yields_nothing() {
    let dispatcher = build_dispatcher(&InteropConfig::default());
    let mut hopper = StorageHopper::new(WorldPosition::ORIGIN, 10);
    assert!(
        dispatcher
            .give_item(None, &mut hopper, &ItemRecord::cube_stack(3, 0, 2))
            .unwrap()
    );

    hopper.set_permissions(HopperPermissions::Locked);
    assert!(dispatcher.take_any_item(None, &mut hopper).unwrap().is_none());

    hopper.set_permissions(HopperPermissions::AddAndRemove);
    hopper.set_logistics(false);
    assert!(dispatcher.take_any_item(None, &mut hopper).unwrap().is_none());
    assert_eq!(hopper.logistics_operations(), 0);
}

#[test]
fn legacy_hopper_take_any_is_neutral() {
    let config = InteropConfig::default().with_hopper_round_robin(false);
    let dispatcher = build_dispatcher(&config);
    let mut hopper = StorageHopper::new(WorldPosition::ORIGIN, 10);
    assert!(
        dispatcher
            .give_item(None, &mut hopper, &ItemRecord::cube_stack(3, 0, 1))
            .unwrap()
    );

    let taken = dispatcher.take_any_item(None, &mut hopper).expect("stub is not an error");

    assert!(taken.is_none());
    assert_eq!(hopper.inventory().len(), 1);
    assert_eq!(
        dispatcher.take_cube(None, &mut hopper, 3, 0).unwrap(),
        Some(ItemRecord::cube_stack(3, 0, 1))
    );
}

#[test]
fn ready_belt_accepts_exactly_once() {
    let dispatcher = build_dispatcher(&InteropConfig::default());
    let mut belt = ConveyorBelt::new(WorldPosition::ORIGIN, WorldOffset::POS_X);
    let item = ItemRecord::single(ItemId(11));

    assert!(!dispatcher.has_item(None, &belt, &item).unwrap());
    assert!(!dispatcher.has_any_items(None, &belt).unwrap());
    assert!(dispatcher.give_item(None, &mut belt, &item).unwrap());
    assert!(!belt.is_ready());
    assert!(!dispatcher.give_item(None, &mut belt, &item).unwrap());
}

#[test]
fn belt_cargo_waits_for_carry_timer() {
    let dispatcher = build_dispatcher(&InteropConfig::default());
    let mut belt = ConveyorBelt::new(WorldPosition::new(1, 0, 0), WorldOffset::NEG_X)
        .with_travel_time(0.5);
    let machine = Caller(WorldPosition::ORIGIN);
    assert!(
        dispatcher
            .give_item(None, &mut belt, &ItemRecord::cube_stack(2, 1, 1))
            .unwrap()
    );

    assert!(dispatcher.take_any_item(Some(&machine), &mut belt).unwrap().is_none());
    belt.advance(0.5);
    assert!(dispatcher.has_any_items(None, &belt).unwrap());
    assert_eq!(
        dispatcher.take_any_item(Some(&machine), &mut belt).unwrap(),
        Some(ItemRecord::cube_stack(2, 1, 1))
    );
    assert_eq!(belt.delivered(), 1);
}

#[test]
fn belt_only_yields_to_faced_machine() {
    let dispatcher = build_dispatcher(&InteropConfig::default());
    let machine = Caller(WorldPosition::ORIGIN);

    let mut away = ConveyorBelt::new(WorldPosition::new(1, 0, 0), WorldOffset::POS_X)
        .with_travel_time(0.0);
    assert!(
        dispatcher
            .give_item(None, &mut away, &ItemRecord::cube_stack(2, 1, 1))
            .unwrap()
    );
    assert!(dispatcher.take_any_item(Some(&machine), &mut away).unwrap().is_none());
    assert_eq!(away.cube(), Some(Cube::new(2, 1)));

    let mut toward = ConveyorBelt::new(WorldPosition::new(1, 0, 0), WorldOffset::NEG_X)
        .with_travel_time(0.0);
    assert!(
        dispatcher
            .give_item(None, &mut toward, &ItemRecord::cube_stack(2, 1, 1))
            .unwrap()
    );
    let cargo = dispatcher.take_any_item(Some(&machine), &mut toward).unwrap();
    assert_eq!(cargo, Some(ItemRecord::cube_stack(2, 1, 1)));
    assert_eq!(toward.cube(), None);
    assert!(toward.is_ready());
}

#[test]
fn facing_belt_rejects_missing_caller() {
    let dispatcher = build_dispatcher(&InteropConfig::default());
    let mut belt =
        ConveyorBelt::new(WorldPosition::ORIGIN, WorldOffset::POS_X).with_travel_time(0.0);
    assert!(
        dispatcher
            .give_item(None, &mut belt, &ItemRecord::cube_stack(2, 1, 1))
            .unwrap()
    );

    let err = dispatcher.take_any_item(None, &mut belt).unwrap_err();

    assert_eq!(
        err,
        InteropError::MissingCaller {
            operation: Operation::TakeAnyItem
        }
    );
    assert_eq!(belt.cube(), Some(Cube::new(2, 1)));
}

#[test]
fn unsupported_provider_is_neutral_everywhere() {
    let dispatcher = build_dispatcher(&InteropConfig::default());
    let mut rock = Rock;
    let item = ItemRecord::cube_stack(1, 0, 1);

    assert!(!dispatcher.supports(&rock));
    assert!(!dispatcher.has_any_items(None, &rock).unwrap());
    assert!(!dispatcher.has_item(None, &rock, &item).unwrap());
    assert_eq!(dispatcher.has_items(None, &rock, &item).unwrap(), StockReport::NONE);
    assert!(!dispatcher.has_free_space(None, &rock, 1).unwrap());
    assert_eq!(dispatcher.free_space(None, &rock).unwrap(), 0);
    assert!(!dispatcher.give_item(None, &mut rock, &item).unwrap());
    assert!(dispatcher.take_item(None, &mut rock, &item).unwrap().is_none());
    assert!(dispatcher.take_any_item(None, &mut rock).unwrap().is_none());
}

#[test]
fn neighbor_scan_reports_unloaded_segments() {
    let world = SegmentWorld::new();

    let scan = find_neighbors(&world, WorldPosition::new(8, 8, 8), |_| true);

    assert!(scan.is_empty());
    assert!(scan.unloaded_encountered());
}

#[test]
fn neighbor_scan_across_segment_border() {
    let center = WorldPosition::new(0, 5, 5);
    let mut world = world_around(&[center]);
    world
        .place(NativeChest::new(WorldPosition::new(1, 5, 5), 4))
        .unwrap();

    {
        let scan = find_neighbors(&world, center, |_| true);
        assert_eq!(scan.len(), 1);
        assert!(scan.unloaded_encountered());
    }

    world.load_segment(SegmentCoord::new(-1, 0, 0));
    world
        .place(NativeChest::new(WorldPosition::new(-1, 5, 5), 4))
        .unwrap();

    let scan = find_neighbors(&world, center, |_| true);
    let positions: Vec<_> = scan.positions().collect();
    assert_eq!(
        positions,
        vec![WorldPosition::new(-1, 5, 5), WorldPosition::new(1, 5, 5)]
    );
    assert!(!scan.unloaded_encountered());
}

#[test]
fn production_line_moves_cargo_between_providers() {
    // ================================================================
    // Layout along -x:
    //   hopper(-3) <- machine B(-2) <- belt(-1, heading -x) <- machine A(0)
    //   chest sits above machine A on +z
    // ================================================================
    let dispatcher = build_dispatcher(&InteropConfig::default());
    let hopper_at = WorldPosition::new(-3, 0, 0);
    let machine_b_at = WorldPosition::new(-2, 0, 0);
    let belt_at = WorldPosition::new(-1, 0, 0);
    let machine_a_at = WorldPosition::ORIGIN;
    let chest_at = WorldPosition::new(0, 0, 1);

    let mut world = world_around(&[hopper_at, machine_a_at]);
    world.load_segment(SegmentCoord::new(1, 0, 0));
    world.load_segment(SegmentCoord::new(0, -1, 0));
    world.load_segment(SegmentCoord::new(0, 0, -1));
    world.load_segment(SegmentCoord::new(-1, -1, 0));
    world.load_segment(SegmentCoord::new(-1, 0, -1));

    world.place(StorageHopper::new(hopper_at, 10)).unwrap();
    world.place(MachineBuffer::new(machine_b_at, 4)).unwrap();
    world
        .place(ConveyorBelt::new(belt_at, WorldOffset::NEG_X).with_travel_time(1.0))
        .unwrap();
    world.place(MachineBuffer::new(machine_a_at, 4)).unwrap();
    world
        .place(NativeChest::new(chest_at, 16).with_items([ItemRecord::cube_stack(5, 0, 3)]))
        .unwrap();

    // ================================================================
    // Machine A pulls from the chest and pushes one unit onto the belt
    // ================================================================
    let pulled = world
        .with_detached::<MachineBuffer, _, _>(machine_a_at, |machine, world| {
            machine.pull(&dispatcher, world)
        })
        .unwrap()
        .unwrap();
    assert_eq!(pulled, 3);
    assert!(world.get::<NativeChest>(chest_at).unwrap().items().is_empty());

    let pushed = world
        .with_detached::<MachineBuffer, _, _>(machine_a_at, |machine, world| {
            machine.push(&dispatcher, world)
        })
        .unwrap()
        .unwrap();
    assert!(pushed);
    assert_eq!(world.get::<ConveyorBelt>(belt_at).unwrap().cube(), Some(Cube::new(5, 0)));

    // ================================================================
    // Machine B cannot take until the cargo has travelled
    // ================================================================
    let early = world
        .with_detached::<MachineBuffer, _, _>(machine_b_at, |machine, world| {
            machine.pull(&dispatcher, world)
        })
        .unwrap()
        .unwrap();
    assert_eq!(early, 0);

    world.get_mut::<ConveyorBelt>(belt_at).unwrap().advance(1.0);

    let arrived = world
        .with_detached::<MachineBuffer, _, _>(machine_b_at, |machine, world| {
            let pulled = machine.pull(&dispatcher, world)?;
            let pushed = machine.push(&dispatcher, world)?;
            Ok::<_, runtime::RuntimeError>((pulled, pushed))
        })
        .unwrap()
        .unwrap();
    assert_eq!(arrived, (1, true));

    // ================================================================
    // Final state
    // ================================================================
    let hopper = world.get::<StorageHopper>(hopper_at).unwrap();
    assert_eq!(hopper.inventory(), [ItemRecord::cube_stack(5, 0, 1)]);
    assert!(world.get::<ConveyorBelt>(belt_at).unwrap().is_ready());
    assert_eq!(
        world.get::<MachineBuffer>(machine_a_at).unwrap().free_space(),
        2
    );
}

#[test]
fn config_file_selects_converting_belt() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "log_filter = \"warn\"\n\n[interop]\nconveyor = \"CONVERT_ON_OFFLOAD\""
    )
    .unwrap();

    let config = RuntimeConfig::load(file.path()).expect("config should load");
    assert_eq!(config.interop.conveyor, ConveyorFlags::CONVERT_ON_OFFLOAD);

    let dispatcher = build_dispatcher(&config.interop);
    let recipe = Recipe {
        input: Cube::new(200, 0),
        output: Cube::new(210, 0),
    };
    let mut belt = ConveyorBelt::new(WorldPosition::ORIGIN, WorldOffset::POS_Y)
        .with_travel_time(0.0)
        .with_recipe(recipe);
    assert!(
        dispatcher
            .give_item(None, &mut belt, &ItemRecord::cube_stack(200, 0, 1))
            .unwrap()
    );

    // No facing requirement, so no caller is needed.
    let cargo = dispatcher.take_any_item(None, &mut belt).unwrap();

    assert_eq!(cargo, Some(ItemRecord::cube_stack(210, 0, 1)));
    assert_eq!(belt.animation_state(), 1);
}

#[test]
fn converting_belt_only_yields_requested_output() {
    let config = InteropConfig::default().with_conveyor(ConveyorFlags::CONVERT_ON_OFFLOAD);
    let dispatcher = build_dispatcher(&config);
    let mut belt = ConveyorBelt::new(WorldPosition::ORIGIN, WorldOffset::POS_Y)
        .with_travel_time(0.0)
        .with_recipe(Recipe {
            input: Cube::new(200, 0),
            output: Cube::new(210, 0),
        });
    let ore = ItemRecord::cube_stack(200, 0, 1);
    assert!(dispatcher.give_item(None, &mut belt, &ore).unwrap());

    assert_eq!(dispatcher.take_item(None, &mut belt, &ore).unwrap(), None);
    assert!(!belt.is_ready());
    assert_eq!(belt.delivered(), 0);

    let bar = ItemRecord::cube_stack(210, 0, 1);
    assert_eq!(dispatcher.take_item(None, &mut belt, &bar).unwrap(), Some(bar));
    assert_eq!(belt.animation_state(), 1);
    assert_eq!(belt.delivered(), 1);
}
