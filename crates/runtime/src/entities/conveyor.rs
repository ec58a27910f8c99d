use interop_core::{ConveyorSlot, Cube, ItemRecord, SegmentEntity, WorldOffset, WorldPosition};
use serde::{Deserialize, Serialize};

/// Cube conversion applied to cargo just before it leaves the belt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub input: Cube,
    pub output: Cube,
}

/// Single-slot belt segment.
///
/// Cargo placed on the belt travels for `travel_time` seconds of
/// [`advance`](Self::advance) before it can be taken.
#[derive(Clone, Debug)]
pub struct ConveyorBelt {
    position: WorldPosition,
    forwards: WorldOffset,
    travel_time: f32,
    carry_timer: f32,
    ready: bool,
    cube: Option<Cube>,
    item: Option<ItemRecord>,
    recipe: Option<Recipe>,
    animation_state: u32,
    delivered: u64,
}

impl ConveyorBelt {
    pub const DEFAULT_TRAVEL_TIME: f32 = 1.0;

    pub fn new(position: WorldPosition, forwards: WorldOffset) -> Self {
        Self {
            position,
            forwards,
            travel_time: Self::DEFAULT_TRAVEL_TIME,
            carry_timer: 0.0,
            ready: true,
            cube: None,
            item: None,
            recipe: None,
            animation_state: 0,
            delivered: 0,
        }
    }

    #[must_use]
    pub fn with_travel_time(mut self, seconds: f32) -> Self {
        self.travel_time = seconds.max(0.0);
        self
    }

    #[must_use]
    pub fn with_recipe(mut self, recipe: Recipe) -> Self {
        self.recipe = Some(recipe);
        self
    }

    /// Moves carried cargo along by `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        if !self.ready {
            self.carry_timer = (self.carry_timer - dt).max(0.0);
        }
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn cube(&self) -> Option<Cube> {
        self.cube
    }

    pub fn item(&self) -> Option<&ItemRecord> {
        self.item.as_ref()
    }

    pub fn animation_state(&self) -> u32 {
        self.animation_state
    }

    /// Number of cargo units handed off so far.
    pub fn delivered(&self) -> u64 {
        self.delivered
    }

    fn load(&mut self) {
        self.ready = false;
        self.carry_timer = self.travel_time;
    }
}

impl SegmentEntity for ConveyorBelt {
    fn position(&self) -> WorldPosition {
        self.position
    }

    fn orientation(&self) -> Option<WorldOffset> {
        Some(self.forwards)
    }
}

impl ConveyorSlot for ConveyorBelt {
    fn ready_to_convey(&self) -> bool {
        self.ready
    }

    fn carry_timer(&self) -> f32 {
        self.carry_timer
    }

    fn forwards(&self) -> WorldOffset {
        self.forwards
    }

    fn carried_cube(&self) -> Option<Cube> {
        self.cube
    }

    fn carried_item(&self) -> Option<&ItemRecord> {
        self.item.as_ref()
    }

    fn add_cube(&mut self, cube: Cube) {
        self.cube = Some(cube);
        self.load();
    }

    fn add_item(&mut self, item: &ItemRecord) {
        self.item = Some(item.clone());
        self.load();
    }

    fn remove_cube(&mut self) {
        self.cube = None;
    }

    fn remove_item(&mut self) {
        self.item = None;
    }

    fn finalise_offloading_cargo(&mut self) {
        self.ready = true;
        self.carry_timer = 0.0;
        self.delivered += 1;
    }

    fn pre_offload_transform(&mut self) {
        let Some(recipe) = self.recipe else {
            return;
        };
        if self.cube == Some(recipe.input) {
            self.cube = Some(recipe.output);
            self.animation_state = self.animation_state.wrapping_add(1);
        }
    }
}
