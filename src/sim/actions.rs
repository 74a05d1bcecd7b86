//! Player action logic
//!
//! Per-tick player abilities: ground pound, projectile throwing, power-up
//! cooldowns and the petrification toggle. Spawn paths return the new NPC's
//! handle and do nothing at all when the NPC table is near capacity.

use super::host::Host;
use super::location::Location;
use super::npc::{Npc, NpcEffect, NpcId};
use super::physics::{MazeDir, MazeStatus};
use super::player::{Character, Mount, POUND_PET_TYPE, Player, PlayerEffect, PlayerId, PowerState};
use super::traits::{NpcTraits, NpcType};
use super::world::World;
use crate::audio::SoundEffect;
use crate::consts::*;
use crate::num::Num;

/// Offset of a launched maze projectile from the thrower's box
const MAZE_LAUNCH_GAP: i32 = 24;
const MAZE_LAUNCH_SPEED: i32 = 6;

/// Place a thrown item at a corridor exit of the thrower's maze zone and
/// return its travel direction. Velocity is snapped to the corridor.
pub fn player_throw_item_maze(p: &Player, loc: &mut Location) -> MazeStatus {
    loc.speed_x = Num::ZERO;
    loc.speed_y = Num::ZERO;

    let facing = p.maze_zone_status.dir();
    let pl = &p.location;

    if facing.is_vertical() {
        loc.x = pl.x + (pl.width - loc.width) / 2;
    } else {
        loc.y = pl.y + (pl.height - loc.height) / 2;
    }

    let up = (facing == MazeDir::Up && !p.controls.down) || (facing == MazeDir::Down && p.controls.up);
    let dir = if up {
        loc.speed_y = Num::from_int(-MAZE_LAUNCH_SPEED);
        loc.y = pl.y - loc.height - MAZE_LAUNCH_GAP;
        MazeDir::Up
    } else if facing.is_vertical() {
        loc.speed_y = Num::from_int(MAZE_LAUNCH_SPEED);
        loc.y = pl.bottom() + MAZE_LAUNCH_GAP;
        MazeDir::Down
    } else if p.direction <= 0 {
        loc.speed_x = Num::from_int(-MAZE_LAUNCH_SPEED);
        loc.x = pl.x - loc.width - MAZE_LAUNCH_GAP;
        MazeDir::Left
    } else {
        loc.speed_x = Num::from_int(MAZE_LAUNCH_SPEED);
        loc.x = pl.right() + MAZE_LAUNCH_GAP;
        MazeDir::Right
    };

    MazeStatus::new(dir)
}

/// Switch a freshly thrown NPC into maze travel when the thrower is inside a
/// maze zone. Non-clipping types other than bullets are left alone.
pub fn player_thrown_npc_maze_check(p: &Player, npc: &mut Npc, traits: &NpcTraits) {
    if p.cur_maze_zone == 0 {
        return;
    }
    if traits.no_clipping && npc.kind != NpcType::Bullet {
        return;
    }

    let status = player_throw_item_maze(p, &mut npc.location);
    npc.effect = NpcEffect::Maze {
        zone: p.cur_maze_zone,
        status,
    };
}

/// Ground pound state machine for the pounding pet
pub fn player_pound_logic(world: &mut World, id: PlayerId) {
    let by_alt_run = !world.forced_controls && world.config.pound_by_alt_run;
    let Some(p) = world.player_mut(id) else {
        return;
    };

    if p.in_air() {
        if p.mount == Mount::Pet && p.mount_type == POUND_PET_TYPE {
            let (pressed, released) = if by_alt_run {
                (p.controls.alt_run, p.alt_run_release)
            } else {
                (p.controls.down, p.duck_release)
            };

            if pressed && released && p.can_pound {
                p.ground_pound = true;
                p.ground_pound2 = true;
                if p.location.speed_y < Num::ZERO {
                    p.location.speed_y = Num::ZERO;
                }
            }
        }
    } else {
        p.can_pound = false;
    }

    if p.ground_pound {
        if !p.can_pound && p.location.speed_y < Num::ZERO {
            p.ground_pound = false;
        }

        if by_alt_run {
            p.controls.alt_run = true;
        } else {
            p.controls.down = true;
        }

        p.can_jump = false;
        p.controls.left = false;
        p.controls.up = false;
        p.controls.right = false;
        p.controls.jump = true;
        p.location.speed_x *= Num::ratio(95, 100);
        p.run_release = false;
        p.can_fly = false;
        p.fly_count = 0;
        p.can_fly2 = false;
        p.location.speed_y += 1;
        p.can_pound = false;
        p.jump = 0;
    } else {
        if p.location.speed_y < -5 && ((p.jump < 15 && p.jump != 0) || p.can_fly) {
            p.can_pound = true;
        }

        // rebound from hitting the ground
        if p.ground_pound2 {
            p.location.speed_y = Num::from_int(POUND_REBOUND_SPEED);
            p.standing_on_npc = None;
            p.ground_pound2 = false;
        }
    }
}

fn grab_spot(world: &World, p: &Player) -> (i32, i32) {
    let physics = &world.config.physics;
    let (c, s) = (p.character.table_index(), p.state.table_index());
    (physics.grab_spot_x[c][s], physics.grab_spot_y[c][s])
}

/// Speeds of whatever the player stands on, or the player's own when it's
/// not standing on a live NPC
fn footing_speed(world: &World, p: &Player) -> (Num, Num) {
    p.standing_on_npc
        .and_then(|n| world.npc(n))
        .map_or((p.location.speed_x, p.location.speed_y), |n| {
            (n.location.speed_x, n.location.speed_y)
        })
}

fn standing_on_live_npc(world: &World, p: &Player) -> bool {
    p.standing_on_npc.is_some_and(|n| world.npc(n).is_some())
}

/// Fresh projectile with the type's hitbox
fn projectile(world: &World, kind: NpcType, owner: PlayerId) -> (Npc, NpcTraits) {
    let traits = *world.traits.get(kind);
    let mut npc = Npc::new(kind);
    npc.location.width = traits.width;
    npc.location.height = traits.height;
    npc.cant_hurt_player = Some(owner);
    (npc, traits)
}

/// Link's beam (fire rod, ice rod or sword beam by power state)
pub fn player_shoot_char5_beam(world: &mut World, id: PlayerId, host: &mut dyn Host) -> Option<NpcId> {
    if !world.has_spawn_headroom() {
        return None;
    }
    let p = world.player(id)?.clone();
    let sword = p.state == PowerState::Hammer;

    let (sound, kind) = if sword {
        (SoundEffect::HeroSwordBeam, NpcType::Swordbeam)
    } else if p.state.throws_ice() {
        (SoundEffect::HeroIce, NpcType::PlrIceball)
    } else {
        (SoundEffect::HeroFireRod, NpcType::PlrFireball)
    };

    let (mut npc, traits) = projectile(world, kind, id);
    npc.shadow = world.config.shadow_mode;
    npc.projectile = true;

    let pl = &p.location;
    npc.location.x = pl.x + pl.width / 2 + 40 * p.direction - 8;
    npc.location.y = if p.duck {
        pl.y + if sword { 22 } else { 18 }
    } else {
        pl.y + if sword { 12 } else { 5 }
    };

    npc.time_left = NPC_FRESH_TIME;
    npc.cant_hurt = 100;
    npc.special = p.character.number();
    if kind == NpcType::PlrFireball {
        npc.frame = 16;
    }

    // dies if it is inside a wall next tick
    npc.wall_death = 5;
    npc.location.speed_y = Num::ZERO;
    let base = if sword { 9 } else { 5 };
    npc.location.speed_x = Num::from_int(base * p.direction) + pl.speed_x / 3;

    if p.standing_on_npc.is_some() {
        npc.location.y -= pl.speed_y;
    }

    if !sword {
        player_thrown_npc_maze_check(&p, &mut npc, &traits);
    }

    let new = world.spawn_npc(npc)?;
    if let Some(p) = world.player_mut(id) {
        p.fire_ball_cd2 = if sword { 25 } else { 40 };
    }
    host.play_sound(sound, &p.location);
    host.sync_layer(new);
    host.recompute_section(new);
    Some(new)
}

/// Throw (or, while ducking on the ground, place) a bomb
pub fn player_throw_bomb(world: &mut World, id: PlayerId, host: &mut dyn Host) -> Option<NpcId> {
    if !world.has_spawn_headroom() {
        return None;
    }
    let p = world.player(id)?.clone();
    let pl = &p.location;

    let (mut npc, traits) = projectile(world, NpcType::Bomb, id);
    npc.time_left = world.config.physics.npc_time_off_screen;
    npc.section = p.section;
    npc.cant_hurt = 1000;
    npc.location.x = pl.x + (pl.width - npc.location.width) / 2;

    let grounded = pl.speed_y.is_zero() || p.slope > 0 || p.standing_on_npc.is_some();
    let placed = p.duck && grounded;

    if placed {
        npc.location.y = pl.bottom() - npc.location.height;
        npc.location.speed_x = Num::ZERO;
        npc.location.speed_y = Num::ZERO;
    } else {
        npc.location.y = pl.y;
        npc.location.speed_x = Num::from_int(5 * p.direction);
        npc.location.speed_y = Num::from_int(-6);
        npc.projectile = true;
    }

    player_thrown_npc_maze_check(&p, &mut npc, &traits);

    let new = world.spawn_npc(npc)?;
    if let Some(p) = world.player_mut(id) {
        p.bombs -= 1;
        if !placed && grounded {
            p.sword_poke = -10;
        }
    }
    host.play_sound(if placed { SoundEffect::Grab } else { SoundEffect::Throw }, &p.location);
    host.sync_layer(new);
    Some(new)
}

/// Whether Toad already has a boomerang in flight
pub fn player_char4_heavy_out(world: &World, id: PlayerId) -> bool {
    if world.player(id).is_none_or(|p| p.character != Character::Toad) {
        return false;
    }

    world
        .npcs
        .iter()
        .any(|(_, n)| n.active && n.kind == NpcType::Char4Heavy && n.boomerang_owner == Some(id))
}

/// Hammer-state throw: hammer, Peach's heavy or Toad's boomerang
pub fn player_throw_heavy(world: &mut World, id: PlayerId, host: &mut dyn Host) -> Option<NpcId> {
    let run_release = world.player(id)?.run_release;
    if run_release && player_char4_heavy_out(world, id) {
        return None;
    }
    if !world.has_spawn_headroom() {
        return None;
    }

    let p = world.player(id)?.clone();
    let pl = &p.location;
    let dir = p.direction;

    let mut fire_ball_cd = 25;
    let mut hold = false;
    let (kind, sound) = match p.character {
        Character::Peach => {
            fire_ball_cd = 45;
            hold = p.controls.alt_run && p.mount == Mount::None;
            let sound = if hold { SoundEffect::Grab2 } else { SoundEffect::Throw };
            (NpcType::Char3Heavy, sound)
        }
        Character::Toad => {
            fire_ball_cd = if world.config.flamethrower { 40 } else { 0 };
            (NpcType::Char4Heavy, SoundEffect::Throw)
        }
        _ => (NpcType::PlrHeavy, SoundEffect::Hammer),
    };

    let (mut npc, traits) = projectile(world, kind, id);
    npc.shadow = world.config.shadow_mode;
    if p.character == Character::Toad {
        npc.boomerang_owner = Some(id);
        npc.boomerang_direction = dir;
    }

    let (grab_x, grab_y) = grab_spot(world, &p);
    npc.projectile = true;
    npc.location.x = pl.x + grab_x * dir;
    npc.location.y = pl.y + grab_y;
    npc.time_left = NPC_FRESH_TIME;
    npc.cant_hurt = 100;

    let (_, footing_sy) = footing_speed(world, &p);
    let loc = &mut npc.location;
    if p.controls.up {
        loc.speed_x = Num::from_int(2 * dir) + pl.speed_x * Num::ratio(9, 10);
        loc.speed_y = Num::from_int(-8) + footing_sy * Num::ratio(3, 10);
        loc.y -= 24;
        loc.x += -6 * dir;

        match p.character {
            Character::Peach => {
                loc.speed_y += 1;
                loc.speed_x *= Num::ratio(3, 2);
            }
            Character::Toad => {
                loc.speed_y = Num::from_int(-8);
                loc.speed_x = Num::from_int(12 * dir) + pl.speed_x;
            }
            _ => {}
        }
    } else {
        loc.speed_x = Num::from_int(4 * dir) + pl.speed_x * Num::ratio(9, 10);
        loc.speed_y = Num::from_int(-5) + footing_sy * Num::ratio(3, 10);

        match p.character {
            Character::Peach => loc.speed_y += 1,
            Character::Toad => {
                loc.speed_y = Num::from_int(-5);
                loc.speed_x = Num::from_int(10 * dir) + pl.speed_x;
                loc.y -= 12;
            }
            _ => {}
        }
    }

    if p.character == Character::Toad {
        loc.x = pl.x + (pl.width - loc.width) / 2;
    }

    player_thrown_npc_maze_check(&p, &mut npc, &traits);

    let new = world.spawn_npc(npc)?;
    if let Some(p) = world.player_mut(id) {
        p.frame_count = 110;
        p.fire_ball_cd = fire_ball_cd;
    }
    if hold {
        world.holds.grab(id, new);
    }
    host.play_sound(sound, &p.location);
    host.sync_layer(new);
    host.recompute_section(new);
    Some(new)
}

/// Fire/ice ball throw, including the aquatic-swim variant
pub fn player_throw_ball(world: &mut World, id: PlayerId, host: &mut dyn Host) -> Option<NpcId> {
    if !world.has_spawn_headroom() {
        return None;
    }
    let mut p = world.player(id)?.clone();
    if p.spin_jump {
        p.spin_fire_dir = p.direction;
    }

    let throw_ice = p.state.throws_ice();
    let kind = if throw_ice { NpcType::PlrIceball } else { NpcType::PlrFireball };
    let (mut npc, traits) = projectile(world, kind, id);
    npc.shadow = world.config.shadow_mode;

    let pl = p.location;
    let (grab_x, grab_y) = grab_spot(world, &p);
    npc.projectile = true;
    npc.location.x = pl.x + grab_x * p.direction + 4;
    npc.location.y = pl.y + grab_y;
    npc.time_left = NPC_FRESH_TIME;
    npc.cant_hurt = 100;
    npc.special = if throw_ice { 1 } else { p.character.number() };

    // Peach and Toad hold fireballs
    let hold = matches!(p.character, Character::Peach | Character::Toad)
        && p.mount == Mount::None
        && p.controls.alt_run;

    npc.frame = match npc.special {
        2 => 4,
        3 => 8,
        4 => 12,
        _ => npc.frame,
    };

    p.fire_ball_cd = match p.character {
        Character::Luigi => 35,
        Character::Peach => 40,
        Character::Toad => 25,
        _ => 30,
    };
    if p.state == PowerState::Polar && p.slippy {
        p.fire_ball_cd -= 5;
    }

    let mut throw_up = p.controls.up;
    let mut throw_dir = p.direction;
    let loc = &mut npc.location;

    loc.speed_x = Num::from_int(5 * throw_dir) + pl.speed_x * 2 / 7;

    let sound = if throw_ice {
        loc.speed_y = Num::from_int(if throw_up { -8 } else { 5 });
        loc.speed_x *= Num::ratio(8, 10);
        SoundEffect::Iceball
    } else {
        loc.speed_y = Num::from_int(if throw_up { -6 } else { 20 });
        if npc.special == 2 {
            loc.speed_x *= Num::ratio(85, 100);
        }
        SoundEffect::Fireball
    };

    let (footing_sx, footing_sy) = footing_speed(world, &p);
    if throw_up {
        loc.speed_y += footing_sy / 10;
        loc.speed_x *= Num::ratio(9, 10);
    }

    if world.config.flamethrower {
        loc.speed_x *= Num::ratio(3, 2);
        loc.speed_y *= Num::ratio(3, 2);
    }

    if standing_on_live_npc(world, &p) {
        loc.speed_x = Num::from_int(5 * p.direction) + (pl.speed_x + footing_sx) * 2 / 7;
    }

    if p.aquatic_swim {
        p.fire_ball_cd -= 10;

        let mut pose = 16;
        if p.controls.left || p.controls.right {
            // sideways pose
        } else if (p.controls.down && !p.controls.up) || (19..=21).contains(&p.frame) {
            pose = 19;
        } else if p.controls.up || (40..=42).contains(&p.frame) {
            throw_up = true;
            pose = 40;
        }

        if p.swim_count == 0 {
            p.frame = pose;
            p.frame_count = 60;
        }

        // centre the ball when throwing up or down
        if pose != 16 {
            loc.x = pl.x + (pl.width - loc.width) / 2;
            loc.y += if pose == 19 { 8 } else { -8 };
            npc.direction = throw_dir;
            throw_dir = 0;
        }

        // not slowed by water on its first tick
        npc.wet = 2;

        let loc = &mut npc.location;
        loc.speed_x = Num::from_int(4 * throw_dir);
        loc.speed_y = Num::from_int(if throw_dir != 0 { 2 } else { 3 });

        if throw_up {
            npc.low_gravity = true;
            npc.bounce_lock = 3;
            loc.speed_y = -loc.speed_y;
        }

        loc.speed_x += pl.speed_x;
        loc.speed_y += pl.speed_y;
    } else if !p.spin_jump {
        p.frame_count = 110;
    }

    player_thrown_npc_maze_check(&p, &mut npc, &traits);

    let new = world.spawn_npc(npc)?;
    if let Some(slot) = world.player_mut(id) {
        slot.spin_fire_dir = p.spin_fire_dir;
        slot.fire_ball_cd = p.fire_ball_cd;
        slot.frame = p.frame;
        slot.frame_count = p.frame_count;
    }
    if hold {
        world.holds.grab(id, new);
    }
    host.play_sound(sound, &pl);
    host.sync_layer(new);
    host.recompute_section(new);
    Some(new)
}

/// Per-tick power-up router: picks at most one run-triggered action, then
/// advances the tail swipe and cooldowns.
pub fn power_ups(world: &mut World, id: PlayerId, host: &mut dyn Host) {
    let flamethrower = world.config.flamethrower;
    let Some(p) = world.player_mut(id) else {
        return;
    };

    if p.fairy {
        p.sword_poke = 0;
        p.fire_ball_cd = 0;
        p.fire_ball_cd2 = 0;
        p.tail_count = 0;
        return;
    }

    let p = p.clone();
    let holding = world.holds.held_by(id).is_some();
    let free_hands = !p.slide
        && p.vine == 0
        && p.character != Character::Link
        && (!p.duck || p.aquatic_swim)
        && p.mount <= Mount::Boot
        && !holding;

    if free_hands {
        let ready = p.fire_ball_cd <= 0;
        let edge = p.run_release || p.spin_jump || flamethrower;
        match p.state {
            PowerState::Hammer => {
                if ready && p.controls.run && !p.spin_jump && edge {
                    player_throw_heavy(world, id, host);
                }
            }
            PowerState::Fire | PowerState::Ice | PowerState::Polar => {
                let wants = (p.controls.run && !p.spin_jump) || (p.spin_jump && p.direction != p.spin_fire_dir);
                if ready && wants && edge {
                    player_throw_ball(world, id, host);
                }
            }
            PowerState::Leaf | PowerState::Tanooki => {
                let tail_free = p.mount == Mount::None && !p.stoned;
                if tail_free && ((p.controls.run && p.run_release) || p.spin_jump) {
                    if let Some(p) = world.player_mut(id) {
                        if p.tail_count == 0 || p.tail_count >= 12 {
                            p.tail_count = 1;
                            if !p.spin_jump {
                                host.play_sound(SoundEffect::Whip, &p.location);
                            }
                        }
                    }
                }
            }
            _ => {}
        }
    }

    let held = world.holds.held_by(id);
    let holding_fireball = held
        .and_then(|n| world.npc(n))
        .is_some_and(|n| n.kind == NpcType::PlrFireball);
    let Some(p) = world.player_mut(id) else {
        return;
    };

    if p.tail_count > 0 {
        p.tail_count += 1;
        if p.tail_count == TAIL_SWIPE_LENGTH {
            p.tail_count = 0;
        }

        let strong = p.tail_count % 7 == 0 || (p.spin_jump && p.tail_count % 2 == 0);
        host.tail_swipe(id, strong);

        if held.is_some() {
            p.tail_count = 0;
        }
    }

    if p.character == Character::Link && p.vine == 0 && p.mount == Mount::None && !p.stoned && p.fire_ball_cd == 0 {
        host.char5_stab(id);
    }

    p.fire_ball_cd2 = (p.fire_ball_cd2 - 1).max(0);

    // Peach holding a fireball keeps it charged
    if !(p.character == Character::Peach && holding_fireball) {
        p.fire_ball_cd -= 1;
        if flamethrower {
            p.fire_ball_cd -= 3;
        }
        p.fire_ball_cd = p.fire_ball_cd.max(0);
    }
}

/// Petrification: enter/leave requests, duration, expiry blink
pub fn tanooki(world: &mut World, id: PlayerId) {
    let Some(p) = world.player_mut(id) else {
        return;
    };
    if p.fairy {
        return;
    }

    if p.stoned && p.controls.down && p.standing_on_npc.is_none() {
        let loc = &mut p.location;
        loc.speed_x *= Num::ratio(8, 10);
        if loc.speed_x >= Num::ratio(-1, 2) && loc.speed_x <= Num::ratio(1, 2) {
            loc.speed_x = Num::ZERO;
        }
        if loc.speed_y < 8 {
            loc.speed_y += Num::ratio(1, 4);
        }
    }

    if p.stoned_cd == 0 {
        let wants_stone =
            p.mount == Mount::None && p.state == PowerState::Tanooki && p.controls.alt_run && p.bombs == 0;
        if wants_stone != p.stoned {
            p.effect = PlayerEffect::Stone;
        }
    } else {
        p.stoned_cd -= 1;
    }

    if p.stoned {
        p.stoned_time += 1;
        if p.stoned_time >= STONE_MAX_TICKS {
            p.effect = PlayerEffect::Stone;
            p.stoned_cd = STONE_COOLDOWN;
        } else if p.stoned_time >= STONE_BLINK_TICKS {
            p.immune += 1;
            if p.immune % 3 == 0 {
                p.immune2 = !p.immune2;
            }
        }
    }
}
