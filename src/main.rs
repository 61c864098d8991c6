//! Monster Invasion headless driver
//!
//! Runs the simulation with plain kinematic bodies standing in for a physics
//! engine and an autopilot on the trigger. Handy for checking balance changes.
//!
//! Usage: `monster-invasion [tuning.json] [seed] [seconds]`

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use glam::Vec2;
    use monster_invasion::consts::SIM_DT;
    use monster_invasion::sim::{
        Contact, Game, GameEvent, KinematicBody, MonsterHandle, Poolable, ProjectileContact,
        ProjectileHandle, TurretInput, kinematic_bodies,
    };
    use monster_invasion::{SimError, Tuning};

    const GRAVITY: f32 = 9.81;
    const FLOOR_Y: f32 = -8.0;
    /// Horizontal distance from the player at which a floor monster reaches it
    const PLAYER_REACH: f32 = 1.0;
    const HIT_RADIUS: f32 = 0.75;
    const ARENA_HALF_WIDTH: f32 = 16.0;
    const ARENA_TOP: f32 = 12.0;
    /// Autopilot fires in bursts and lets go so the generator can recover
    const BURST: f32 = 1.5;
    const PAUSE: f32 = 0.5;

    pub fn run(args: &[String]) -> Result<(), SimError> {
        let tuning = match args.first() {
            Some(path) => Tuning::load(path)?,
            None => Tuning::default(),
        };
        let seed = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(0x5eed);
        let seconds: f32 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(120.0);

        let mut game = Game::new(&tuning, seed, kinematic_bodies(tuning.spawner.home))?;
        game.on_ready();

        let mut autopilot = Autopilot::default();
        let mut runs = 1;
        let mut best = 0;
        let steps = (seconds / SIM_DT) as u64;

        for _ in 0..steps {
            let input = autopilot.input(&game, SIM_DT);
            game.tick(&input, SIM_DT)?;
            physics_step(&mut game, SIM_DT)?;

            for event in game.drain_events() {
                match event {
                    GameEvent::GameOver { final_score } => {
                        best = best.max(final_score);
                    }
                    GameEvent::GameOverScreen => {
                        game.restart();
                        game.on_ready();
                        runs += 1;
                    }
                    GameEvent::EnergyChanged { bars } => log::debug!("Energy at {bars} bars"),
                    other => log::trace!("{other:?}"),
                }
            }
        }

        best = best.max(game.score());
        log::info!("{runs} run(s) over {seconds}s of game time, best score {best}");
        Ok(())
    }

    /// Integrate bodies and turn overlaps into collision reports
    fn physics_step(game: &mut Game<KinematicBody>, dt: f32) -> Result<(), SimError> {
        let mut monster_contacts: Vec<(MonsterHandle, Contact)> = Vec::new();
        for monster in game.spawner_mut().monsters_mut() {
            if !monster.is_active() {
                continue;
            }
            let handle = monster.handle();
            let body = monster.body_mut();
            let was_airborne = body.pos.y > FLOOR_Y;
            body.integrate(dt, GRAVITY);

            if body.pos.y <= FLOOR_Y {
                body.pos.y = FLOOR_Y;
                body.vel.y = body.vel.y.max(0.0);
                if was_airborne {
                    monster_contacts.push((handle, Contact::LandedOnFloor));
                } else if body.pos.x.abs() < PLAYER_REACH {
                    monster_contacts.push((handle, Contact::HitPlayer));
                }
            }
        }

        for projectile in game.projectiles_mut().iter_mut() {
            if projectile.is_active() {
                projectile.pos += projectile.vel * dt;
            }
        }

        let targets: Vec<(MonsterHandle, Vec2)> = game
            .spawner()
            .active_monsters()
            .map(|(handle, monster)| (handle, monster.position()))
            .collect();
        let mut projectile_contacts: Vec<(ProjectileHandle, ProjectileContact)> = Vec::new();
        for (handle, projectile) in game.projectiles().iter_active() {
            let tip = projectile.tip();
            if let Some((target, _)) = targets.iter().find(|(_, pos)| pos.distance(tip) < HIT_RADIUS) {
                projectile_contacts.push((handle, ProjectileContact::Monster(*target)));
            } else if tip.x.abs() > ARENA_HALF_WIDTH || tip.y > ARENA_TOP {
                projectile_contacts.push((handle, ProjectileContact::Boundary));
            }
        }

        for (handle, contact) in monster_contacts {
            game.report_monster_contact(handle, contact)?;
        }
        for (handle, contact) in projectile_contacts {
            game.report_projectile_contact(handle, contact)?;
        }
        Ok(())
    }

    /// Aims at the closest monster and fires in bursts
    #[derive(Debug, Default)]
    struct Autopilot {
        clock: f32,
        firing: bool,
    }

    impl Autopilot {
        fn input(&mut self, game: &Game<KinematicBody>, dt: f32) -> TurretInput {
            self.clock += dt;
            let turret = game.turret();
            let muzzle = turret.muzzle();
            let target = game
                .spawner()
                .active_monsters()
                .map(|(_, monster)| monster.position())
                .min_by(|a, b| a.distance_squared(muzzle).total_cmp(&b.distance_squared(muzzle)));

            let mut input = TurretInput::default();
            if let Some(target) = target {
                let to = target - muzzle;
                let desired = to.x.atan2(to.y).to_degrees();
                input.turn = ((desired - turret.rotation()) / 10.0).clamp(-1.0, 1.0);
            }

            let firing = target.is_some() && self.clock % (BURST + PAUSE) < BURST;
            input.fire_held = firing;
            input.fire_released = self.firing && !firing;
            self.firing = firing;
            input
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), monster_invasion::SimError> {
    env_logger::init();
    log::info!("Monster Invasion (headless) starting...");
    let args: Vec<String> = std::env::args().skip(1).collect();
    headless::run(&args)
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The core is a library on the web; the host page drives it
}
