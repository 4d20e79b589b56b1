use log::debug;

use crate::api::config::SimConfig;
use crate::api::types::{Direction, SimEvent};
use crate::assets::builder::load_level;
use crate::assets::level::{LevelDesc, LevelError};
use crate::bridge::snapshot::FrameBuffer;
use crate::core::time::SimClock;
use crate::core::world::World;
use crate::input::pad::DirectionPad;
use crate::input::queue::{InputEvent, InputQueue};
use crate::systems::goal::GoalDetector;
use crate::systems::movement::{resolve_movement, ResolveParams};
use crate::systems::{destination, grab, input, integrate, pushable};

/// Owns a level's World and runs the tick pipeline over it.
///
/// Each fixed tick runs, in order: input → push-proximity highlight →
/// integrate → push start → resolve → shove release → interpolate → goal
/// detection. The order is fixed; the goal check relies on seeing this
/// tick's resolved destinations.
pub struct Simulation {
    world: World,
    config: SimConfig,
    params: ResolveParams,
    clock: SimClock,
    pad: DirectionPad,
    input: InputQueue,
    goals: GoalDetector,
    events: Vec<SimEvent>,
    ticks: u64,
}

impl Simulation {
    pub fn new(world: World, config: SimConfig) -> Self {
        let params = ResolveParams::from_config(&config, &world.map);
        Self {
            clock: SimClock::new(config.fixed_dt, config.max_steps_per_frame),
            pad: DirectionPad::from_config(&config),
            input: InputQueue::new(),
            goals: GoalDetector::new(),
            events: Vec::new(),
            ticks: 0,
            world,
            config,
            params,
        }
    }

    pub fn from_level(desc: &LevelDesc, config: SimConfig) -> Result<Self, LevelError> {
        Ok(Self::new(load_level(desc)?, config))
    }

    /// Replace the world (level reset or level change), clearing all tick state.
    pub fn reset(&mut self, world: World) {
        self.params = ResolveParams::from_config(&self.config, &world.map);
        self.world = world;
        self.clock.reset();
        self.pad.clear();
        self.input.drain();
        self.goals.reset();
        self.events.clear();
        self.ticks = 0;
    }

    /// Queue a host input event for the next frame.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Advance by a variable frame delta. Returns the number of fixed ticks run.
    pub fn frame(&mut self, frame_dt: f32) -> u32 {
        for event in self.input.drain() {
            self.pad.handle(&event);
        }
        let steps = self.clock.accumulate(frame_dt);
        for _ in 0..steps {
            let mask = self.pad.mask();
            self.tick(mask);
            self.pad.end_tick();
        }
        steps
    }

    /// Run exactly one fixed tick with a raw direction mask, bypassing the
    /// pad's directions. The grab key keeps whatever state the pad holds.
    pub fn tick(&mut self, mask: Direction) {
        self.tick_with_grab(mask, self.pad.grab_held());
    }

    /// Run exactly one fixed tick with a raw direction mask and grab state.
    pub fn tick_with_grab(&mut self, mask: Direction, grab_held: bool) {
        let dt = self.config.fixed_dt;
        input::apply(&mut self.world, mask, grab_held);
        pushable::highlight_adjacent(&mut self.world);
        integrate::integrate(&mut self.world, dt);
        grab::begin_pushes(&mut self.world);
        resolve_movement(&mut self.world, self.params, &mut self.events);
        grab::release_shoves(&mut self.world);
        destination::interpolate(&mut self.world, dt, self.config.speed);
        self.goals.update(&mut self.world, &mut self.events);
        self.ticks += 1;
    }

    /// Tick with an empty mask until every entity rests on its destination,
    /// at most `max_ticks` times. Returns the ticks run.
    pub fn settle(&mut self, max_ticks: u32) -> u32 {
        for n in 0..max_ticks {
            if self.is_settled() {
                return n;
            }
            self.tick(Direction::NONE);
        }
        debug!("still moving after {max_ticks} ticks");
        max_ticks
    }

    /// Whether every entity with a Destination sits exactly on it.
    pub fn is_settled(&self) -> bool {
        self.world.destinations.iter().all(|(id, dest)| {
            self.world.positions.get(id).map_or(true, |p| p.is_at(dest.0))
        })
    }

    /// Ticks run since construction or the last reset.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn is_solved(&self) -> bool {
        self.goals.is_solved()
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    /// Events raised since the last drain.
    pub fn events(&self) -> &[SimEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self, buffer: &mut FrameBuffer) {
        buffer.rebuild(&self.world);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::level::render_board;
    use glam::IVec2;

    fn sim(rows: &[&str]) -> Simulation {
        let desc = LevelDesc {
            name: "test".into(),
            rows: rows.iter().map(|r| r.to_string()).collect(),
        };
        Simulation::from_level(&desc, SimConfig::default()).unwrap()
    }

    fn player_cell(sim: &Simulation) -> IVec2 {
        let id = sim.world().inputs.ids()[0];
        sim.world().cell_of(id).unwrap()
    }

    #[test]
    fn pushing_block_onto_goal_solves_level() {
        let mut sim = sim(&["#####", "#PBG#", "#####"]);
        sim.tick(Direction::RIGHT);
        sim.settle(120);
        assert!(sim.is_solved());
        assert!(sim.events().contains(&SimEvent::Solved));
        assert_eq!(player_cell(&sim), IVec2::new(2, 1));
    }

    #[test]
    fn shove_ends_with_the_move() {
        let mut sim = sim(&["PB..."]);
        sim.tick(Direction::RIGHT);
        assert!(sim.world().pushables.is_empty());
        sim.settle(120);
        assert_eq!(render_board(sim.world()), ".PB..");

        // Walking away leaves the block where it is.
        sim.tick(Direction::LEFT);
        sim.settle(120);
        assert_eq!(render_board(sim.world()), "P.B..");
    }

    #[test]
    fn grab_key_pulls_until_released() {
        let mut sim = sim(&["..PB."]);
        let dt = sim.config().fixed_dt;
        sim.push_input(InputEvent::KeyDown { key_code: 90 });
        sim.push_input(InputEvent::KeyDown { key_code: 37 });
        sim.push_input(InputEvent::KeyUp { key_code: 37 });
        sim.frame(dt);
        assert_eq!(sim.world().pushables.len(), 1);
        sim.settle(120);
        assert_eq!(render_board(sim.world()), ".PB..");

        sim.push_input(InputEvent::KeyUp { key_code: 90 });
        sim.push_input(InputEvent::KeyDown { key_code: 37 });
        sim.push_input(InputEvent::KeyUp { key_code: 37 });
        sim.frame(dt);
        sim.settle(120);
        assert!(sim.world().pushables.is_empty());
        assert_eq!(render_board(sim.world()), "P.B..");
    }

    #[test]
    fn key_events_drive_the_player_through_frames() {
        let mut sim = sim(&["P...."]);
        let dt = sim.config().fixed_dt;
        sim.push_input(InputEvent::KeyDown { key_code: 39 });
        sim.push_input(InputEvent::KeyUp { key_code: 39 });
        assert_eq!(sim.frame(dt), 1);
        sim.settle(120);
        assert_eq!(player_cell(&sim), IVec2::new(1, 0));
        assert!(sim.world().positions.get(sim.world().inputs.ids()[0]).unwrap().is_at(IVec2::new(1, 0)));
    }

    #[test]
    fn held_key_walks_continuously_without_blocks() {
        let mut sim = sim(&["P....."]);
        for _ in 0..30 {
            sim.tick(Direction::RIGHT);
        }
        sim.settle(120);
        assert!(player_cell(&sim).x >= 3);
    }

    #[test]
    fn reset_clears_solved_state() {
        let mut sim = sim(&["PBG"]);
        sim.tick(Direction::RIGHT);
        sim.settle(120);
        assert!(sim.is_solved());
        let desc = LevelDesc::parse("PBG").unwrap();
        sim.reset(load_level(&desc).unwrap());
        assert!(!sim.is_solved());
        assert!(sim.events().is_empty());
    }
}
