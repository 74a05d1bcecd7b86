//! NPC effect state machine
//!
//! One call advances one NPC's overlay by exactly one tick. Handlers only read
//! other entities (players, blocks, other NPCs); the single exception is the
//! host, which receives fire-and-forget notifications.

use super::host::Host;
use super::location::{Location, check_collision};
use super::npc::{DropItem, LayerId, NpcEffect, NpcId, WarpDir};
use super::physics::{MazeDir, MazeStatus, maze_step};
use super::player::PlayerId;
use super::spatial::SortMode;
use super::traits::NpcType;
use super::world::{BlockRef, World};
use crate::consts::*;
use crate::num::Num;

/// 8 * sqrt(2), the drop-item step magnitude
const DROP_STEP: Num = Num::ratio(1_131_371, 100_000);
const DROP_FALL_SPEED: Num = Num::ratio(22, 10);
const EMERGE_CLEARANCE: Num = Num::ratio(1, 10);

/// Advance the effect overlay of one NPC. `Normal` (and a stale handle) is a
/// no-op.
pub fn npc_effects(world: &mut World, id: NpcId, host: &mut dyn Host) {
    let Some(effect) = world.npc(id).map(|n| n.effect) else {
        return;
    };

    match effect {
        NpcEffect::Normal => return,
        NpcEffect::EmergeUp { .. } => emerge_up(world, id, host),
        NpcEffect::EmergeDown { .. } => emerge_down(world, id),
        NpcEffect::Encased => encased(world, id),
        NpcEffect::DropItem(drop) => drop_item(world, id, drop),
        NpcEffect::Warp { dir, target } => warp(world, id, dir, target, host),
        NpcEffect::PetTongue { carrier, remaining } => pet_tongue(world, id, carrier, remaining),
        NpcEffect::PetInside { carrier } => pet_inside(world, id, carrier),
        NpcEffect::Waiting { remaining } => waiting(world, id, remaining),
        NpcEffect::Maze { zone, status } => maze(world, id, zone, status, host),
    }

    if let Some(npc) = world.npc(id) {
        if npc.effect.is_normal() {
            log::trace!("npc {:?} effect finished", id);
        }
    }
    world.refresh_npc(id);
}

/// Decide the facing once: toward the nearest player
fn face_nearest_player(world: &mut World, id: NpcId) {
    let Some(npc) = world.npc(id) else {
        return;
    };
    if npc.direction != 0 {
        return;
    }
    let facing = world
        .target_player(&npc.location)
        .and_then(|p| world.player(p))
        .map(|p| -p.direction);
    if let (Some(facing), Some(npc)) = (facing, world.npc_mut(id)) {
        npc.direction = facing;
    }
}

fn emerge_up(world: &mut World, id: NpcId, host: &mut dyn Host) {
    face_nearest_player(world, id);

    let Some(traits) = world.npc_traits(id).copied() else {
        return;
    };
    let Some(npc) = world.npc_mut(id) else {
        return;
    };
    host.npc_frames(npc);

    let NpcEffect::EmergeUp { progress } = &mut npc.effect else {
        return;
    };
    *progress += 1;
    let progress = Num::from_int(*progress);

    npc.location.y -= 1;
    npc.location.height += 1;

    if traits.height_gfx > Num::ZERO {
        if progress >= traits.height_gfx {
            npc.effect = NpcEffect::Normal;
            npc.location.set_height_keep_bottom(traits.height);
        }
    } else if progress >= traits.height {
        npc.effect = NpcEffect::Normal;
        npc.location.height = traits.height;
    }
}

fn emerge_down(world: &mut World, id: NpcId) {
    let is_leaf = world.npc(id).is_some_and(|n| n.kind == NpcType::LeafPower);
    if is_leaf {
        if let Some(npc) = world.npc_mut(id) {
            npc.direction = 1;
        }
    } else {
        face_nearest_player(world, id);
    }

    let Some(traits) = world.npc_traits(id).copied() else {
        return;
    };
    let fix_size = world.config.fix_npc_emerge_size;
    let Some(npc) = world.npc_mut(id) else {
        return;
    };
    let NpcEffect::EmergeDown { progress } = &mut npc.effect else {
        return;
    };
    *progress += 1;
    let done = *progress == EMERGE_DOWN_TICKS;
    npc.location.y += 1;

    if !done {
        return;
    }

    npc.effect = NpcEffect::Normal;
    npc.location.height = if fix_size {
        traits.height
    } else {
        Num::from_int(EMERGE_DOWN_LEGACY_HEIGHT)
    };

    // Two ordered passes; each stops at its first qualifying block
    for temp_pass in [false, true] {
        let Some(loc) = world.npc(id).map(|n| n.location) else {
            return;
        };
        let candidates: Vec<BlockRef> = if temp_pass {
            world.query_temp_blocks(&loc, SortMode::Location).collect()
        } else {
            world.query_blocks(&loc, SortMode::Index).collect()
        };

        let landing = candidates.into_iter().find_map(|b| {
            let block = world.block(b)?;
            let ignored = block.invis || block.hidden || (block.sizable && loc.y > block.location.y);
            (!ignored && check_collision(&loc, &block.location)).then_some(block.location.y)
        });

        if let (Some(block_y), Some(npc)) = (landing, world.npc_mut(id)) {
            npc.location.y = block_y - npc.location.height - EMERGE_CLEARANCE;
        }
    }
}

fn encased(world: &mut World, id: NpcId) {
    let Some(loc) = world.npc(id).map(|n| n.location) else {
        return;
    };

    // Hidden/inactive cases still count
    let still_encased = world.query_npcs(&loc, SortMode::None).any(|other| {
        world
            .npc(other)
            .is_some_and(|o| o.kind == NpcType::BossCase && check_collision(&loc, &o.location))
    });

    if !still_encased {
        if let Some(npc) = world.npc_mut(id) {
            npc.effect = NpcEffect::Normal;
        }
    }
}

fn drop_item(world: &mut World, id: NpcId, drop: DropItem) {
    match drop {
        DropItem::Bound { player, timer } => {
            let Some(p) = world.player(player) else {
                return;
            };
            let p_loc = p.location;
            let anticipate = p.is_normal();
            let view_top = p.view_top;

            let Some(npc) = world.npc_mut(id) else {
                return;
            };
            let n_loc = &mut npc.location;

            let mut target_x = p_loc.x + (p_loc.width - n_loc.width) / 2;
            let mut target_y = p_loc.y + p_loc.height - DROP_HOVER_HEIGHT;
            if anticipate {
                target_x += p_loc.speed_x;
                target_y += p_loc.speed_y;
            }
            // never fully offscreen
            let min_y = view_top.saturating_sub(Num::from_int(8));
            if target_y < min_y {
                target_y = min_y;
            }

            let delta_x = target_x - n_loc.x;
            let delta_y = target_y - n_loc.y;
            let mut move_x = delta_x / 8;
            let mut move_y = delta_y / 8;

            let dist = Num::dist(move_x, move_y);
            if dist > Num::ZERO && dist < DROP_STEP {
                move_x = (move_x * DROP_STEP).divided_by(dist);
                move_y = (move_y * DROP_STEP).divided_by(dist);
            }

            let hovering = timer <= DROP_HOVER_TICKS;
            if delta_y.abs() < move_y.abs() || hovering {
                n_loc.y = target_y;
            } else {
                n_loc.y += move_y;
            }
            if delta_x.abs() < move_x.abs() || hovering {
                n_loc.x = target_x;
            } else {
                n_loc.x += move_x;
            }

            let mut timer = timer;
            if hovering {
                timer -= 1;
            } else if n_loc.x == target_x && n_loc.y == target_y {
                timer = DROP_HOVER_TICKS;
            }

            npc.effect = if timer <= 0 {
                NpcEffect::DropItem(DropItem::Free { frame: 0 })
            } else {
                NpcEffect::DropItem(DropItem::Bound { player, timer })
            };
        }
        DropItem::Free { frame } => {
            let Some(npc) = world.npc_mut(id) else {
                return;
            };
            npc.location.y += DROP_FALL_SPEED;
            let frame = if frame + 1 > DROP_FRAME_COUNT { 1 } else { frame + 1 };
            npc.effect = NpcEffect::DropItem(DropItem::Free { frame });
        }
    }
}

fn warp(world: &mut World, id: NpcId, dir: WarpDir, target: Num, host: &mut dyn Host) {
    let Some(traits) = world.npc_traits(id).copied() else {
        return;
    };
    let mushroom_speed = world.config.physics.npc_mushroom_speed;
    let walking_speed = world.config.physics.npc_walking_speed;
    let Some(npc) = world.npc_mut(id) else {
        return;
    };

    let platform = npc.kind == NpcType::PlatformS1;
    let walk_speed = if npc.kind.warps_at_mushroom_speed() {
        mushroom_speed
    } else if traits.can_walk_on {
        Num::ONE
    } else {
        walking_speed
    };

    let loc = &mut npc.location;
    let arrived = match dir {
        WarpDir::Up => {
            loc.y -= if platform { 2 } else { 1 };
            loc.bottom() <= target
        }
        WarpDir::Down => {
            loc.y += if platform { 2 } else { 1 };
            loc.y >= target
        }
        WarpDir::Left => {
            loc.x -= walk_speed;
            loc.right() <= target
        }
        WarpDir::Right => {
            loc.x += walk_speed;
            loc.x >= target
        }
    };

    if arrived {
        npc.effect = NpcEffect::Normal;
    }

    host.npc_frames(npc);

    if arrived && npc.kind != NpcType::ItemBuried {
        npc.layer = LayerId::SPAWNED_NPCS;
        host.sync_layer(id);
    }
}

fn pet_tongue(world: &mut World, id: NpcId, carrier: PlayerId, remaining: i32) {
    let Some(npc) = world.npc_mut(id) else {
        return;
    };
    npc.time_left = NPC_FRESH_TIME;
    let remaining = remaining - 1;
    npc.effect = if remaining <= 0 {
        NpcEffect::Normal
    } else {
        NpcEffect::PetTongue { carrier, remaining }
    };
}

fn pet_inside(world: &mut World, id: NpcId, carrier: PlayerId) {
    let still_inside = world.player(carrier).and_then(|p| p.pet_mouth) == Some(id);
    let Some(npc) = world.npc_mut(id) else {
        return;
    };
    npc.time_left = NPC_FRESH_TIME;
    if !still_inside {
        npc.effect = NpcEffect::Normal;
    }
}

fn waiting(world: &mut World, id: NpcId, remaining: i32) {
    let Some(npc) = world.npc_mut(id) else {
        return;
    };
    let remaining = remaining - 1;
    npc.effect = if remaining <= 0 {
        NpcEffect::Normal
    } else {
        NpcEffect::Waiting { remaining }
    };
}

fn maze(world: &mut World, id: NpcId, zone: usize, status: MazeStatus, host: &mut dyn Host) {
    let mut zone = zone;
    let mut status = status;

    let Some(npc) = world.npc_mut(id) else {
        return;
    };
    host.npc_frames(npc);
    host.npc_section_wrap(npc);
    host.npc_collide(id, npc);

    if npc.turn_around {
        status.request_flip();
        npc.turn_around = false;
    }

    // balls go slightly faster and keep some speed on exit so they don't bounce forever
    let is_ball = npc.kind.is_player_ball();
    let is_bullet = npc.kind == NpcType::Bullet && npc.cant_hurt > 0;
    let is_thrown = is_ball || matches!(npc.kind, NpcType::Char3Heavy | NpcType::Bomb);
    let speed = if npc.quicksand {
        1
    } else {
        (if npc.wet != 0 { 2 } else { 4 }) + i32::from(is_thrown) + 4 * i32::from(is_bullet)
    };

    let mut loc = npc.location;
    maze_step(
        &mut loc,
        &mut zone,
        &mut status,
        &world.maze_zones,
        Num::from_int(speed),
        |r| maze_blocked(world, r),
    );

    let Some(npc) = world.npc_mut(id) else {
        return;
    };
    npc.location = loc;

    if status.is(MazeDir::Left) {
        npc.direction = -1;
    } else if status.is(MazeDir::Right) {
        npc.direction = 1;
    }

    if zone != 0 {
        npc.effect = NpcEffect::Maze { zone, status };
        return;
    }

    npc.effect = NpcEffect::Normal;
    let is_vert = status.dir().is_vertical();

    if is_bullet {
        let exit_speed = if npc.cant_hurt > 0 { 8 } else { 4 };
        npc.location.speed_x = Num::from_int(exit_speed * npc.direction);
    } else if is_vert {
        if !npc.projectile && npc.wet == 0 {
            npc.projectile = true;
            npc.launch_grace = MAZE_LAUNCH_GRACE;
        }

        if is_ball && npc.special != 5 {
            let coin = world.random_int(2);
            let jitter = world.random_unit();
            if let Some(npc) = world.npc_mut(id) {
                npc.location.speed_x = Num::from_int(1 - 4 * coin) + jitter * 2;
            }
        }
    }
}

/// Solid terrain for corridor travel
fn maze_blocked(world: &World, region: &Location) -> bool {
    world.query_blocks(region, SortMode::None).any(|b| {
        world.block(b).is_some_and(|block| {
            !block.invis && !block.hidden && !block.sizable && check_collision(region, &block.location)
        })
    })
}
