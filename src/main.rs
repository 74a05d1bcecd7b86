//! Platcore headless runner
//!
//! Builds a small demo level, drives it with scripted controls for a number
//! of ticks and logs what the simulation asked of its host.
//!
//! Usage: `platcore [config.json] [ticks]`

mod runner {
    use std::collections::BTreeMap;

    use platcore::SimConfig;
    use platcore::audio::SoundEffect;
    use platcore::fader::{FADE_FULL, FadeShape, ScreenFader};
    use platcore::num::Num;
    use platcore::sim::{
        Block, Character, Controls, Host, Location, Npc, NpcEffect, NpcId, NpcType, Player, PlayerId, PowerState,
        TickInput, WarpDir, World, tick,
    };

    /// Host that logs every request
    #[derive(Default)]
    pub struct LogHost {
        pub sounds: BTreeMap<String, usize>,
        pub layer_syncs: usize,
    }

    impl Host for LogHost {
        fn play_sound(&mut self, sound: SoundEffect, at: &Location) {
            log::debug!("sound {:?} at ({}, {})", sound, at.x, at.y);
            *self.sounds.entry(format!("{:?}", sound)).or_default() += 1;
        }

        fn sync_layer(&mut self, npc: NpcId) {
            log::trace!("layer sync for npc {:?}", npc);
            self.layer_syncs += 1;
        }

        fn tail_swipe(&mut self, player: PlayerId, strong: bool) {
            log::trace!("tail swipe by player {} (strong: {})", player.number(), strong);
        }
    }

    pub fn demo_world(config: SimConfig, seed: u64) -> World {
        let mut world = World::new(config, seed);

        // floor and a ledge
        for i in 0..40 {
            world.add_block(Block::solid(Location::new(i * 32, 512, 32, 32)));
        }
        world.add_block(Block::solid(Location::new(640, 384, 128, 32)));
        world.add_maze_zone(Location::new(896, 256, 384, 256));

        let mut mario = Player::new(Character::Mario, Location::new(64, 458, 24, 54));
        mario.state = PowerState::Fire;
        mario.view_top = Num::ZERO;
        let mario = world.add_player(mario);

        let mut link = Player::new(Character::Link, Location::new(960, 400, 24, 54));
        link.bombs = 5;
        world.add_player(link);

        let spawns = [
            Npc::new(NpcType::PowerS3)
                .at(Location::new(320, 480, 32, 0))
                .with_effect(NpcEffect::EmergeUp { progress: 0 }),
            Npc::new(NpcType::LeafPower)
                .at(Location::new(672, 352, 32, 0))
                .with_effect(NpcEffect::EmergeDown { progress: 0 }),
            Npc::new(NpcType::Walker)
                .at(Location::new(512, 480, 32, 32))
                .with_effect(NpcEffect::Warp {
                    dir: WarpDir::Left,
                    target: Num::from_int(400),
                }),
            Npc::new(NpcType::LifeS3)
                .at(Location::new(200, 0, 32, 32))
                .with_effect(NpcEffect::drop_to(mario)),
            Npc::new(NpcType::Walker)
                .at(Location::new(800, 480, 32, 32))
                .with_effect(NpcEffect::Encased),
            Npc::new(NpcType::BossCase).at(Location::new(784, 448, 64, 64)),
        ];
        for npc in spawns {
            world.spawn_npc(npc);
        }

        world
    }

    /// Mario walks right tapping run; Link taps run every second
    fn scripted_input(t: u64) -> TickInput {
        TickInput {
            controls: vec![
                Controls {
                    right: true,
                    run: t % 20 < 2,
                    ..Default::default()
                },
                Controls {
                    run: t % 60 == 0,
                    ..Default::default()
                },
            ],
            forced_controls: false,
        }
    }

    pub fn run(config: SimConfig, ticks: u64) {
        let mut world = demo_world(config, 0x5eed);
        let mut host = LogHost::default();
        let mut fader = ScreenFader::new();
        fader.setup(2, FADE_FULL, 0, FadeShape::Rect, None);

        log::info!(
            "running {} ticks with {} players, {} npcs",
            ticks,
            world.players.len(),
            world.npcs.len()
        );

        for t in 0..ticks {
            tick(&mut world, &scripted_input(t), &mut host);

            let was_complete = fader.is_complete();
            fader.update();
            if fader.is_complete() && !was_complete {
                log::debug!("fade finished at tick {}", t);
            }
        }

        let mut effects: BTreeMap<&str, usize> = BTreeMap::new();
        for (_, npc) in world.npcs.iter() {
            let name = match npc.effect {
                NpcEffect::Normal => "normal",
                NpcEffect::EmergeUp { .. } => "emerge-up",
                NpcEffect::EmergeDown { .. } => "emerge-down",
                NpcEffect::Encased => "encased",
                NpcEffect::DropItem(_) => "drop-item",
                NpcEffect::Warp { .. } => "warp",
                NpcEffect::PetTongue { .. } => "pet-tongue",
                NpcEffect::PetInside { .. } => "pet-inside",
                NpcEffect::Waiting { .. } => "waiting",
                NpcEffect::Maze { .. } => "maze",
            };
            *effects.entry(name).or_default() += 1;
        }

        log::info!("after {} ticks: {} npcs {:?}", world.tick_count, world.npcs.len(), effects);
        log::info!("sounds {:?}, {} layer syncs", host.sounds, host.layer_syncs);
        log::info!("fader complete: {}", fader.is_complete());
    }
}

fn main() -> std::process::ExitCode {
    env_logger::init();
    log::info!("Platcore (headless) starting...");

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => match platcore::SimConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("{}", e);
                return std::process::ExitCode::FAILURE;
            }
        },
        None => platcore::SimConfig::default(),
    };
    let ticks = args.next().and_then(|s| s.parse().ok()).unwrap_or(600);

    runner::run(config, ticks);
    std::process::ExitCode::SUCCESS
}

