//! Turret energy generator
//!
//! Sustained fire drains bars; with every bar gone the turret overheats and
//! cannot fire. Releasing the trigger starts a restoration that adds one bar
//! per interval until the generator is full again. Holding the trigger
//! cancels a restoration in progress.

use serde::{Deserialize, Serialize};

use super::events::GameEvent;
use crate::tuning::EnergyTuning;

/// Observable generator phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnergyPhase {
    /// All bars available
    Normal,
    /// At least one bar drawn, not restoring
    Depleting,
    /// No bars left; firing disabled
    Overheated,
    /// Bars regenerating
    Restoring,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnergyGenerator {
    max_bars: u8,
    shots_per_bar: u32,
    restore_interval: f32,
    bars: u8,
    shot_counter: u32,
    /// Elapsed time of the running restoration, `None` when idle
    restore_elapsed: Option<f32>,
}

impl EnergyGenerator {
    pub fn new(tuning: &EnergyTuning) -> Self {
        Self {
            max_bars: tuning.max_bars,
            shots_per_bar: tuning.shots_per_bar.max(1),
            restore_interval: tuning.restore_interval,
            bars: tuning.max_bars,
            shot_counter: 0,
            restore_elapsed: None,
        }
    }

    pub fn bars(&self) -> u8 {
        self.bars
    }

    pub fn max_bars(&self) -> u8 {
        self.max_bars
    }

    pub fn shot_counter(&self) -> u32 {
        self.shot_counter
    }

    pub fn is_overheated(&self) -> bool {
        self.bars == 0
    }

    pub fn is_restoring(&self) -> bool {
        self.restore_elapsed.is_some()
    }

    /// Whether the turret may shoot right now
    pub fn can_fire(&self) -> bool {
        self.bars > 0
    }

    pub fn phase(&self) -> EnergyPhase {
        if self.is_restoring() {
            EnergyPhase::Restoring
        } else if self.bars == 0 {
            EnergyPhase::Overheated
        } else if self.bars < self.max_bars {
            EnergyPhase::Depleting
        } else {
            EnergyPhase::Normal
        }
    }

    /// One frame of sustained fire
    ///
    /// Every `shots_per_bar`-th call drops a bar; the call that completes
    /// the count is the one that pays for it.
    pub fn on_fire_held(&mut self, events: &mut Vec<GameEvent>) {
        self.restore_elapsed = None;

        self.shot_counter += 1;
        if self.shot_counter >= self.shots_per_bar {
            self.shot_counter = 0;
            if self.bars > 0 {
                self.bars -= 1;
                log::debug!("Energy bar dropped, {} left", self.bars);
                events.push(GameEvent::EnergyChanged { bars: self.bars });
                if self.bars == 0 {
                    log::info!("Generator overheated");
                }
            }
        }
    }

    /// Trigger released
    pub fn on_fire_released(&mut self) {
        self.shot_counter = 0;
        if self.bars < self.max_bars && !self.is_restoring() {
            self.restore_elapsed = Some(0.0);
        }
    }

    /// Advance a running restoration
    pub fn step(&mut self, dt: f32, events: &mut Vec<GameEvent>) {
        let Some(mut elapsed) = self.restore_elapsed else {
            return;
        };
        elapsed += dt;
        while elapsed >= self.restore_interval && self.bars < self.max_bars {
            elapsed -= self.restore_interval;
            self.bars += 1;
            events.push(GameEvent::EnergyChanged { bars: self.bars });
        }
        debug_assert!(self.bars <= self.max_bars);

        if self.bars >= self.max_bars {
            self.bars = self.max_bars;
            self.restore_elapsed = None;
            log::debug!("Generator restored");
        } else {
            self.restore_elapsed = Some(elapsed);
        }
    }

    /// Back to full, idle
    pub fn reset(&mut self) {
        self.bars = self.max_bars;
        self.shot_counter = 0;
        self.restore_elapsed = None;
    }
}
