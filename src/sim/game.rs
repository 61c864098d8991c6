//! Composition root and game-state manager
//!
//! `Game` builds every pool, the spawner, the generator and the turret once
//! and wires them together. Collision reports are applied the moment they
//! arrive, and the signals they raise (score, player death, particle
//! requests) are settled before the call returns.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::body::PhysicsBody;
use super::energy::EnergyGenerator;
use super::events::{Contact, GameEvent, MonsterHandle, ProjectileContact, ProjectileHandle};
use super::monster::MonsterColor;
use super::particles::{ParticleKind, ParticlePools};
use super::pool::{Factory, Pool, Poolable};
use super::projectile::Projectile;
use super::shake::ScreenShake;
use super::spawner::MonsterSpawner;
use super::turret::{Turret, TurretInput};
use crate::consts::{GAME_OVER_SCREEN_DELAY, PLAYER_EXPLODE_POS};
use crate::error::SimError;
use crate::tuning::Tuning;

/// Whether gameplay systems run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Intro, game over, or waiting for a restart
    NonPlayable,
    Playable,
}

#[derive(Debug)]
pub struct Game<B> {
    seed: u64,
    rng: Pcg32,
    phase: GamePhase,
    score: u64,
    final_score: Option<u64>,
    spawner: MonsterSpawner<B>,
    projectiles: Pool<(), Projectile>,
    particles: ParticlePools,
    energy: EnergyGenerator,
    turret: Turret,
    shake: ScreenShake,
    /// Time since the player died, until the game over screen is due
    game_over_timer: Option<f32>,
    events: Vec<GameEvent>,
}

impl<B: PhysicsBody + 'static> Game<B> {
    /// Build a game. `bodies` creates the physics body for every new monster.
    pub fn new<F>(tuning: &Tuning, seed: u64, bodies: F) -> Result<Self, SimError>
    where
        F: Factory<MonsterColor, B> + Clone + 'static,
    {
        tuning.validate()?;
        let mut rng = Pcg32::seed_from_u64(seed);

        let spawner = MonsterSpawner::new(&tuning.spawner, bodies, &mut rng)?;

        let speed = tuning.turret.projectile_speed;
        let mut projectiles = Pool::new((), move |_: (), _: usize| -> Result<Projectile, SimError> {
            Ok(Projectile::new(speed))
        });
        projectiles.prewarm(tuning.turret.projectile_pool_size)?;

        let game = Self {
            seed,
            rng,
            phase: GamePhase::NonPlayable,
            score: 0,
            final_score: None,
            spawner,
            projectiles,
            particles: ParticlePools::new(&tuning.effects)?,
            energy: EnergyGenerator::new(&tuning.energy),
            turret: Turret::new(&tuning.turret),
            shake: ScreenShake::new(&tuning.effects),
            game_over_timer: None,
            events: Vec::new(),
        };
        log::info!("Game created with seed {seed}");
        Ok(game)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_playable(&self) -> bool {
        self.phase == GamePhase::Playable
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn final_score(&self) -> Option<u64> {
        self.final_score
    }

    pub fn spawner(&self) -> &MonsterSpawner<B> {
        &self.spawner
    }

    /// The physics collaborator moves monster bodies through this
    pub fn spawner_mut(&mut self) -> &mut MonsterSpawner<B> {
        &mut self.spawner
    }

    pub fn projectiles(&self) -> &Pool<(), Projectile> {
        &self.projectiles
    }

    pub fn projectiles_mut(&mut self) -> &mut Pool<(), Projectile> {
        &mut self.projectiles
    }

    pub fn particles(&self) -> &ParticlePools {
        &self.particles
    }

    pub fn energy(&self) -> &EnergyGenerator {
        &self.energy
    }

    pub fn turret(&self) -> &Turret {
        &self.turret
    }

    pub fn camera_offset(&self) -> Vec2 {
        self.shake.offset()
    }

    /// Intro finished; gameplay starts
    pub fn on_ready(&mut self) {
        self.phase = GamePhase::Playable;
        log::info!("Game ready");
    }

    /// Clear the previous run. Gameplay resumes on the next [`Game::on_ready`].
    pub fn restart(&mut self) {
        self.spawner.global_reset(&mut self.rng, &mut self.events);
        self.projectiles.release_all();
        self.particles.stop_all();
        self.energy.reset();
        self.turret.reset();
        self.shake.cancel();
        self.score = 0;
        self.final_score = None;
        self.game_over_timer = None;
        self.phase = GamePhase::NonPlayable;
        log::info!("Game restarted");
    }

    /// Advance one frame
    pub fn tick(&mut self, input: &TurretInput, dt: f32) -> Result<(), SimError> {
        let start = self.events.len();

        self.shake.step(dt, &mut self.rng);
        self.particles.step(dt);
        self.energy.step(dt, &mut self.events);

        if self.is_playable() {
            self.turret.update(
                input,
                dt,
                &mut self.energy,
                &mut self.projectiles,
                &mut self.events,
            )?;
        }

        let playable = self.is_playable();
        self.spawner
            .tick(dt, playable, &mut self.rng, &mut self.events)?;
        self.spawner.tick_monsters();

        if let Some(elapsed) = self.game_over_timer.as_mut() {
            *elapsed += dt;
            if *elapsed >= GAME_OVER_SCREEN_DELAY {
                self.game_over_timer = None;
                self.events.push(GameEvent::GameOverScreen);
            }
        }

        self.settle(start)
    }

    /// Apply a monster collision reported by the physics engine
    pub fn report_monster_contact(
        &mut self,
        handle: MonsterHandle,
        contact: Contact,
    ) -> Result<(), SimError> {
        let start = self.events.len();
        self.spawner
            .handle_contact(handle, contact, &mut self.rng, &mut self.events);
        self.settle(start)
    }

    /// Apply a projectile collision reported by the physics engine
    pub fn report_projectile_contact(
        &mut self,
        handle: ProjectileHandle,
        contact: ProjectileContact,
    ) -> Result<(), SimError> {
        let Some(projectile) = self.projectiles.get(handle).filter(|p| p.is_active()) else {
            return Ok(());
        };
        let tip = projectile.tip();
        let start = self.events.len();

        match contact {
            ProjectileContact::Monster(target) => {
                let hittable = self
                    .spawner
                    .monster(target)
                    .is_some_and(|monster| monster.is_alive());
                if !hittable {
                    return Ok(());
                }
                self.spawner.damage(target, &mut self.events);
                self.projectiles.release(handle);
            }
            ProjectileContact::Boundary | ProjectileContact::Platform => {
                self.events.push(GameEvent::ParticleRequested {
                    kind: ParticleKind::ProjectileLost,
                    position: tip,
                });
                self.projectiles.release(handle);
                self.events.push(GameEvent::ProjectileLost(handle));
            }
        }
        self.settle(start)
    }

    /// Hand the accumulated signals to the caller
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// React to every signal raised since `start`, including ones raised
    /// while reacting
    fn settle(&mut self, start: usize) -> Result<(), SimError> {
        let mut i = start;
        while i < self.events.len() {
            match self.events[i] {
                GameEvent::Score { points } => {
                    self.score += u64::from(points);
                }
                GameEvent::PlayerKilled => self.game_over(),
                GameEvent::ParticleRequested { kind, position } => {
                    self.particles.show(kind, position)?;
                }
                _ => {}
            }
            i += 1;
        }
        Ok(())
    }

    fn game_over(&mut self) {
        if !self.is_playable() {
            return;
        }
        self.spawner.global_reset(&mut self.rng, &mut self.events);
        self.phase = GamePhase::NonPlayable;
        self.final_score = Some(self.score);
        self.events.push(GameEvent::GameOver {
            final_score: self.score,
        });
        self.events.push(GameEvent::ParticleRequested {
            kind: ParticleKind::PlayerExplode,
            position: Vec2::new(PLAYER_EXPLODE_POS.0, PLAYER_EXPLODE_POS.1),
        });
        self.shake.start();
        self.game_over_timer = Some(0.0);
        log::info!("Game over, final score {}", self.score);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::body::KinematicBody;
    use crate::sim::monster::MotionState;
    use crate::sim::spawner::kinematic_bodies;

    fn new_game(seed: u64) -> Game<KinematicBody> {
        let tuning = Tuning::default();
        Game::new(&tuning, seed, kinematic_bodies(tuning.spawner.home)).unwrap()
    }

    fn idle() -> TurretInput {
        TurretInput::default()
    }

    /// Tick until the first monster appears
    fn first_spawn(game: &mut Game<KinematicBody>) -> MonsterHandle {
        for _ in 0..1000 {
            game.tick(&idle(), SIM_DT).unwrap();
            if let Some((handle, _)) = game.spawner().active_monsters().next() {
                return handle;
            }
        }
        panic!("no monster spawned");
    }

    #[test]
    fn test_nothing_spawns_before_ready() {
        let mut game = new_game(1);
        for _ in 0..600 {
            game.tick(&idle(), SIM_DT).unwrap();
        }
        assert_eq!(game.spawner().active_monsters().count(), 0);
        assert_eq!(game.phase(), GamePhase::NonPlayable);
    }

    #[test]
    fn test_first_spawn_after_interval() {
        let mut game = new_game(2);
        game.on_ready();
        first_spawn(&mut game);
        let events = game.drain_events();
        assert!(
            events
                .iter()
                .any(|e| matches!(e, GameEvent::MonsterSpawned { .. }))
        );
    }

    #[test]
    fn test_killing_a_monster_scores() {
        let mut game = new_game(3);
        game.on_ready();
        let monster = first_spawn(&mut game);

        let fire = TurretInput {
            fire_held: true,
            ..Default::default()
        };
        game.tick(&fire, SIM_DT).unwrap();
        let (bolt, _) = game.projectiles().iter_active().next().unwrap();

        game.report_projectile_contact(bolt, ProjectileContact::Monster(monster))
            .unwrap();
        assert_eq!(game.score(), 1);
        assert!(!game.projectiles().get(bolt).unwrap().is_active());
        assert!(
            game.particles()
                .pool(ParticleKind::ProjectileHit)
                .active_count()
                > 0
        );
        let events = game.drain_events();
        assert!(events.contains(&GameEvent::Score { points: 1 }));
        assert!(events.contains(&GameEvent::MonsterDeactivated(monster)));
    }

    #[test]
    fn test_projectile_lost_on_boundary() {
        let mut game = new_game(4);
        game.on_ready();
        let fire = TurretInput {
            fire_held: true,
            ..Default::default()
        };
        game.tick(&fire, SIM_DT).unwrap();
        let (bolt, _) = game.projectiles().iter_active().next().unwrap();
        game.report_projectile_contact(bolt, ProjectileContact::Boundary)
            .unwrap();
        assert_eq!(game.projectiles().active_count(), 0);
        assert_eq!(
            game.particles()
                .pool(ParticleKind::ProjectileLost)
                .active_count(),
            1
        );

        // Stale report for the recycled bolt is ignored
        game.report_projectile_contact(bolt, ProjectileContact::Platform)
            .unwrap();
        assert_eq!(
            game.particles()
                .pool(ParticleKind::ProjectileLost)
                .active_count(),
            1
        );
    }

    #[test]
    fn test_player_contact_ends_game() {
        let mut game = new_game(5);
        game.on_ready();
        let monster = first_spawn(&mut game);
        game.drain_events();

        game.report_monster_contact(monster, Contact::HitPlayer)
            .unwrap();
        assert_eq!(game.phase(), GamePhase::NonPlayable);
        assert_eq!(game.final_score(), Some(0));
        assert_eq!(game.spawner().active_monsters().count(), 0);
        assert!(game.camera_offset() == Vec2::ZERO);
        assert_eq!(
            game.particles()
                .pool(ParticleKind::PlayerExplode)
                .active_count(),
            1
        );

        let events = game.drain_events();
        assert!(events.contains(&GameEvent::PlayerKilled));
        assert!(events.contains(&GameEvent::GameOver { final_score: 0 }));
        assert!(!events.contains(&GameEvent::GameOverScreen));

        // Game over screen follows after the delay, and spawning stays off
        let mut screen = false;
        for _ in 0..90 {
            game.tick(&idle(), SIM_DT).unwrap();
            screen |= game.drain_events().contains(&GameEvent::GameOverScreen);
        }
        assert!(screen);
        assert_eq!(game.spawner().active_monsters().count(), 0);
    }

    #[test]
    fn test_restart_clears_score() {
        let mut game = new_game(6);
        game.on_ready();
        let monster = first_spawn(&mut game);
        let fire = TurretInput {
            fire_held: true,
            ..Default::default()
        };
        game.tick(&fire, SIM_DT).unwrap();
        let (bolt, _) = game.projectiles().iter_active().next().unwrap();
        game.report_projectile_contact(bolt, ProjectileContact::Monster(monster))
            .unwrap();
        assert_eq!(game.score(), 1);

        game.restart();
        assert_eq!(game.score(), 0);
        assert_eq!(game.final_score(), None);
        assert_eq!(game.phase(), GamePhase::NonPlayable);
        assert_eq!(game.energy().bars(), game.energy().max_bars());
        assert_eq!(game.projectiles().active_count(), 0);
        game.on_ready();
        assert!(game.is_playable());
    }

    #[test]
    fn test_landing_contacts_drive_motion() {
        let mut game = new_game(7);
        game.on_ready();
        let monster = first_spawn(&mut game);

        let target = game.spawner().monster(monster).unwrap().drop_target();
        game.spawner_mut().monster_mut(monster).unwrap().body_mut().pos = target;
        game.tick(&idle(), SIM_DT).unwrap();
        assert_eq!(
            game.spawner().monster(monster).unwrap().state(),
            MotionState::DroppingDown
        );

        game.report_monster_contact(monster, Contact::LandedOnFloor)
            .unwrap();
        assert_eq!(
            game.spawner().monster(monster).unwrap().state(),
            MotionState::FloorMotion
        );
    }

    #[test]
    fn test_same_seed_same_run() {
        let run = |seed: u64| {
            let mut game = new_game(seed);
            game.on_ready();
            let fire = TurretInput {
                turn: 0.3,
                fire_held: true,
                fire_released: false,
            };
            for _ in 0..900 {
                game.tick(&fire, SIM_DT).unwrap();
            }
            game.drain_events()
        };
        assert_eq!(run(99), run(99));
    }
}
