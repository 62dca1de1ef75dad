//! Platform spawner
//!
//! Creates platforms on a simulated-time timer and ramps the rate up as the
//! run goes on. Driven by the tick, so a seed replays the same platforms.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::state::Platform;
use crate::settings::Config;

#[derive(Debug, Clone)]
pub struct Spawner {
    rng: Pcg32,
    /// Current interval between spawns (ms)
    interval_ms: f32,
    /// Time accumulated toward the next spawn (ms)
    elapsed_ms: f32,
    /// Platforms created this run
    created: u32,
    next_id: u32,
}

impl Spawner {
    pub fn new(seed: u64, config: &Config) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            interval_ms: config.spawn_interval_ms,
            elapsed_ms: 0.0,
            created: 0,
            next_id: 1,
        }
    }

    pub fn interval_ms(&self) -> f32 {
        self.interval_ms
    }

    pub fn elapsed_ms(&self) -> f32 {
        self.elapsed_ms
    }

    /// Advance the timer by `dt_ms`; returns a new platform when it fires
    ///
    /// At most one platform per call, even after a long gap.
    pub fn update(&mut self, dt_ms: f32, config: &Config) -> Option<Platform> {
        self.elapsed_ms += dt_ms;
        if self.elapsed_ms < self.interval_ms {
            return None;
        }
        self.elapsed_ms = 0.0;
        Some(self.spawn(config))
    }

    /// Create one platform with a random width and offset
    pub fn spawn(&mut self, config: &Config) -> Platform {
        let (min_w, max_w) = config.platform_width;
        let (min_x, max_x) = config.platform_x;
        let width = self.rng.random_range(min_w..max_w) as f32;
        let x = self.rng.random_range(min_x..max_x) as f32;

        let id = self.next_id;
        self.next_id += 1;
        self.created += 1;

        if self.created.is_multiple_of(config.spawn_ramp_every) {
            let next = (self.interval_ms - config.spawn_interval_step_ms)
                .max(config.spawn_min_interval_ms);
            if next != self.interval_ms {
                log::debug!("Spawn interval {} ms -> {} ms", self.interval_ms, next);
            }
            self.interval_ms = next;
        }

        log::debug!("Spawned platform {} (x={}, width={})", id, x, width);
        Platform::new(id, x, width, config.platform_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_after_interval() {
        let config = Config::default();
        let mut spawner = Spawner::new(1, &config);

        assert!(spawner.update(1999.0, &config).is_none());
        let platform = spawner.update(1.0, &config).expect("timer should fire");
        assert_eq!(platform.id, 1);
        assert_eq!(platform.top(), 0.0);
        assert_eq!(spawner.elapsed_ms(), 0.0);
    }

    #[test]
    fn test_random_ranges() {
        let config = Config::default();
        let mut spawner = Spawner::new(42, &config);
        for _ in 0..200 {
            let p = spawner.spawn(&config);
            assert!(p.size.x >= 10.0 && p.size.x < 40.0);
            assert!(p.pos.x >= 8.0 && p.pos.x < 60.0);
            assert_eq!(p.size.x.fract(), 0.0);
            assert_eq!(p.size.y, config.platform_height);
        }
    }

    #[test]
    fn test_ids_increase() {
        let config = Config::default();
        let mut spawner = Spawner::new(3, &config);
        let ids: Vec<u32> = (0..4).map(|_| spawner.spawn(&config).id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_ramp_reaches_floor() {
        let config = Config::default();
        let mut spawner = Spawner::new(7, &config);

        for _ in 0..5 {
            spawner.spawn(&config);
        }
        assert_eq!(spawner.interval_ms(), 1900.0);

        for _ in 0..200 {
            spawner.spawn(&config);
        }
        assert_eq!(spawner.interval_ms(), config.spawn_min_interval_ms);
    }

    #[test]
    fn test_same_seed_same_platforms() {
        let config = Config::default();
        let mut a = Spawner::new(99, &config);
        let mut b = Spawner::new(99, &config);
        for _ in 0..20 {
            assert_eq!(a.spawn(&config), b.spawn(&config));
        }
    }
}
