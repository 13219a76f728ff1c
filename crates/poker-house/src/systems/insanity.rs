use serde::{Deserialize, Serialize};

/// Tuning for the insanity meter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsanityConfig {
    /// Rise per second while standing still.
    pub idle_rise: f32,
    /// Fall per second while moving.
    pub moving_fall: f32,
    /// Floor added per kill.
    pub floor_per_kill: f32,
    /// Seconds the floor holds after a kill.
    pub floor_hold: f32,
    /// Floor decay per second once the hold is over.
    pub floor_decay: f32,
}

impl Default for InsanityConfig {
    fn default() -> Self {
        Self {
            idle_rise: 0.01,
            moving_fall: 0.02,
            floor_per_kill: 0.2,
            floor_hold: 30.0,
            floor_decay: 0.05,
        }
    }
}

/// Player status meter in [0, 1] with a sticky floor raised by kills.
#[derive(Debug, Clone, PartialEq)]
pub struct InsanityMeter {
    config: InsanityConfig,
    value: f32,
    floor: f32,
    kills: u32,
    hold_remaining: f32,
}

impl InsanityMeter {
    pub fn new(config: InsanityConfig) -> Self {
        Self {
            config,
            value: 0.0,
            floor: 0.0,
            kills: 0,
            hold_remaining: 0.0,
        }
    }

    pub fn insanity(&self) -> f32 {
        self.value
    }

    pub fn min_insanity(&self) -> f32 {
        self.floor
    }

    pub fn kills(&self) -> u32 {
        self.kills
    }

    pub fn record_kill(&mut self) {
        self.kills += 1;
        self.floor = (self.kills as f32 * self.config.floor_per_kill).min(1.0);
        self.hold_remaining = self.config.floor_hold;
        self.value = self.value.max(self.floor);
        log::info!("kill #{}, insanity floor {:.2}", self.kills, self.floor);
    }

    pub fn update(&mut self, dt: f32, moving: bool) {
        if !(dt > 0.0) {
            return;
        }
        if moving {
            self.value -= self.config.moving_fall * dt;
        } else {
            self.value += self.config.idle_rise * dt;
        }

        // The hold eats into dt first; only what is left decays the floor.
        let held = dt.min(self.hold_remaining);
        self.hold_remaining -= held;
        let decay_time = dt - held;
        if decay_time > 0.0 {
            self.floor = (self.floor - self.config.floor_decay * decay_time).max(0.0);
        }

        self.value = self.value.clamp(self.floor, 1.0);
    }
}

impl Default for InsanityMeter {
    fn default() -> Self {
        Self::new(InsanityConfig::default())
    }
}
