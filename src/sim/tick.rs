//! Fixed timestep simulation tick
//!
//! Per-tick order:
//! 1. Controls from the input are copied onto the players.
//! 2. Players, by ascending id: ground pound, power-ups, petrification,
//!    release latches, maze membership.
//! 3. NPCs, by ascending slot over the table length read *after* step 2, so
//!    anything a player spawned this tick gets its first effect update now.
//!    Inactive slots are skipped.
//! 4. The tick counter advances.

use serde::{Deserialize, Serialize};

use super::actions::{player_pound_logic, power_ups, tanooki};
use super::effects::npc_effects;
use super::host::Host;
use super::physics::{MazeDir, MazeStatus, maze_zone_at};
use super::player::Controls;
use super::world::World;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    /// Controls by player id; players past the end keep their last controls
    pub controls: Vec<Controls>,
    /// A cutscene is driving the controls
    pub forced_controls: bool,
}

/// Advance the world by one fixed timestep
pub fn tick(world: &mut World, input: &TickInput, host: &mut dyn Host) {
    world.forced_controls = input.forced_controls;
    for (player, controls) in world.players.iter_mut().zip(&input.controls) {
        player.controls = *controls;
    }

    for id in world.player_ids() {
        if !world.player(id).is_some_and(|p| p.is_alive()) {
            continue;
        }

        player_pound_logic(world, id);
        power_ups(world, id, host);
        tanooki(world, id);

        let Some(loc) = world.player(id).map(|p| p.location) else {
            continue;
        };
        let zone = maze_zone_at(&loc, &world.maze_zones);
        let Some(p) = world.player_mut(id) else {
            continue;
        };
        p.latch_releases();

        if zone != 0 && p.cur_maze_zone == 0 {
            // entering: travel the way the player faces
            let dir = if p.direction > 0 { MazeDir::Right } else { MazeDir::Left };
            p.maze_zone_status = MazeStatus::new(dir);
        }
        p.cur_maze_zone = zone;
    }

    let count = world.npcs.len();
    for index in 0..count {
        let Some(id) = world.npcs.id_at(index) else {
            break;
        };
        if world.npc(id).is_some_and(|n| n.active) {
            npc_effects(world, id, host);
        }
    }

    world.tick_count += 1;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::num::Num;
    use crate::settings::SimConfig;
    use crate::sim::host::{NullHost, RecordingHost};
    use crate::sim::location::Location;
    use crate::sim::npc::{Npc, NpcEffect};
    use crate::sim::player::{Character, Player, PowerState};
    use crate::sim::traits::NpcType;

    fn fire_world(seed: u64) -> World {
        let mut w = World::new(SimConfig::default(), seed);
        let mut p = Player::new(Character::Mario, Location::new(100, 100, 24, 54));
        p.state = PowerState::Fire;
        w.add_player(p);
        w
    }

    fn idle() -> TickInput {
        TickInput {
            controls: vec![Controls::default()],
            ..Default::default()
        }
    }

    fn run_press() -> TickInput {
        TickInput {
            controls: vec![Controls {
                run: true,
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_tick_counts() {
        let mut w = fire_world(1);
        tick(&mut w, &TickInput::default(), &mut NullHost);
        tick(&mut w, &TickInput::default(), &mut NullHost);
        assert_eq!(w.tick_count, 2);
    }

    #[test]
    fn test_held_run_throws_once() {
        let mut w = fire_world(1);
        // key up on the first tick arms the release latch
        tick(&mut w, &TickInput::default(), &mut NullHost);
        assert!(w.players[0].run_release);

        for _ in 0..40 {
            tick(&mut w, &run_press(), &mut NullHost);
        }
        assert_eq!(w.npcs.len(), 1);
        assert!(!w.players[0].run_release);

        tick(&mut w, &idle(), &mut NullHost);
        tick(&mut w, &run_press(), &mut NullHost);
        assert_eq!(w.npcs.len(), 2);
    }

    #[test]
    fn test_spawned_npc_updates_same_tick() {
        let mut w = fire_world(1);
        w.add_maze_zone(Location::new(0, 0, 1000, 1000));
        tick(&mut w, &TickInput::default(), &mut NullHost);
        assert_eq!(w.players[0].cur_maze_zone, 1);

        tick(&mut w, &run_press(), &mut NullHost);
        let id = w.npcs.id_at(0).unwrap();
        let npc = w.npc(id).unwrap();
        assert!(matches!(npc.effect, NpcEffect::Maze { zone: 1, .. }));
        // launched at the right edge plus 24, then one maze step (4 + 1)
        assert_eq!(npc.location.x, Num::from_int(100 + 24 + 24 + 5));
    }

    #[test]
    fn test_inactive_npcs_skipped() {
        let mut w = fire_world(1);
        let mut npc = Npc::new(NpcType::Walker).with_effect(NpcEffect::Waiting { remaining: 1 });
        npc.active = false;
        let id = w.spawn_npc(npc).unwrap();
        tick(&mut w, &TickInput::default(), &mut NullHost);
        assert_eq!(w.npc(id).unwrap().effect, NpcEffect::Waiting { remaining: 1 });

        w.npc_mut(id).unwrap().active = true;
        tick(&mut w, &TickInput::default(), &mut NullHost);
        assert!(w.npc(id).unwrap().effect.is_normal());
    }

    #[test]
    fn test_dead_players_do_nothing() {
        let mut w = fire_world(1);
        w.players[0].dead = true;
        w.players[0].run_release = true;
        let mut host = RecordingHost::default();
        tick(&mut w, &run_press(), &mut host);
        assert!(w.npcs.is_empty());
        assert!(host.sounds.is_empty());
    }

    #[test]
    fn test_determinism() {
        let run = |seed| {
            let mut w = fire_world(seed);
            w.add_maze_zone(Location::new(0, 0, 400, 400));
            let mut host = RecordingHost::default();
            let inputs = [idle(), run_press(), idle(), run_press()];
            for input in inputs.iter().cycle().take(200) {
                tick(&mut w, input, &mut host);
            }
            let npcs: Vec<Npc> = w.npcs.iter().map(|(_, n)| n.clone()).collect();
            (npcs, w.players.clone(), host.sounds)
        };

        let a = run(99999);
        let b = run(99999);
        assert!(!a.0.is_empty());
        assert_eq!(a, b);
    }
}
