//! Game session: owns every entity plus the clock, spawn timer, score and level,
//! and advances them one frame at a time.

use log::{debug, info, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{Arena, Crop, Farmer, InputSource, Key, Obstacle};
use crate::config::GameConfig;

pub const MIN_SPAWN_INTERVAL_MS: f64 = 400.0;
pub const SPAWN_INTERVAL_DECAY: f64 = 0.85;
pub const OBSTACLE_TIME_PENALTY: f64 = 5.0; // seconds
pub const POINTS_PER_LEVEL: u32 = 10;

// Crops spawn this far inside the canvas edges.
const SPAWN_MARGIN: f64 = 16.0;

/// Lifecycle of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,    // constructed, never started
    Running, // frames advance
    Ended,   // clock ran out; waits for reset
}

/// Result of a single [`Game::step`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Session is not running; nothing happened.
    Halted,
    /// Frame advanced; schedule another one.
    Continue,
    /// Time just ran out on this frame.
    Ended { final_score: u32 },
}

pub struct Game<R: Rng = StdRng> {
    arena: Arena,
    config: GameConfig,
    rng: R,
    phase: Phase,
    last_frame_ms: f64,
    score: u32,
    level: u32,
    time_left: f64,     // seconds
    spawn_timer: f64,   // ms accumulated since last spawn
    spawn_interval: f64, // ms
    farmer: Farmer,
    crops: Vec<Crop>,
    obstacles: Vec<Obstacle>,
}

impl Game<StdRng> {
    pub fn new(arena: Arena, config: GameConfig) -> Self {
        Self::with_rng(arena, config, StdRng::from_entropy())
    }
}

impl<R: Rng> Game<R> {
    pub fn with_rng(arena: Arena, config: GameConfig, rng: R) -> Self {
        let config = config.sanitized();
        Self {
            arena,
            config,
            rng,
            phase: Phase::Idle,
            last_frame_ms: 0.0,
            score: 0,
            level: 1,
            time_left: config.initial_time,
            spawn_timer: 0.0,
            spawn_interval: config.spawn_interval,
            farmer: Farmer::default(),
            crops: Vec::new(),
            obstacles: Vec::new(),
        }
    }

    // --- Lifecycle -------------------------------------------------------------

    pub fn start(&mut self, now_ms: f64) {
        self.begin(now_ms);
        info!("session started: {}s on the clock", self.config.initial_time);
    }

    pub fn reset(&mut self, now_ms: f64) {
        self.begin(now_ms);
        info!("session reset");
    }

    fn begin(&mut self, now_ms: f64) {
        self.score = 0;
        self.level = 1;
        self.time_left = self.config.initial_time;
        self.spawn_interval = self.config.spawn_interval.max(MIN_SPAWN_INTERVAL_MS);
        self.spawn_timer = 0.0;
        self.crops.clear();
        self.obstacles.clear();
        self.farmer = Farmer::default();
        self.phase = Phase::Running;
        self.last_frame_ms = now_ms;
    }

    // --- Frame step ------------------------------------------------------------

    /// Advance the session to `now_ms` (an animation-frame timestamp).
    pub fn step(&mut self, now_ms: f64) -> FrameOutcome {
        if self.phase != Phase::Running {
            return FrameOutcome::Halted;
        }
        // rAF timestamps can trail the performance.now() captured at start.
        let dt = (now_ms - self.last_frame_ms).max(0.0) / 1000.0;
        self.last_frame_ms = now_ms;

        self.time_left -= dt;
        self.spawn_timer += dt * 1000.0;

        if self.time_left < 0.0 {
            self.phase = Phase::Ended;
            info!("time's up: final score {} at level {}", self.score, self.level);
            return FrameOutcome::Ended { final_score: self.score };
        }

        if self.spawn_timer >= self.spawn_interval {
            self.spawn_timer = 0.0;
            self.spawn_crop();
        }

        self.farmer.update(dt, self.arena);
        self.harvest_touching_crops();
        self.advance_obstacles(dt);

        FrameOutcome::Continue
    }

    fn spawn_crop(&mut self) {
        let x = self.rng.gen_range(0.0..1.0) * (self.arena.width - 2.0 * SPAWN_MARGIN) + SPAWN_MARGIN;
        let y = self.rng.gen_range(0.0..1.0) * (self.arena.height - 2.0 * SPAWN_MARGIN) + SPAWN_MARGIN;
        let crop = Crop::random_at(x, y, &mut self.rng);
        trace!("spawned {:?} at ({:.0}, {:.0})", crop.kind, x, y);
        self.crops.push(crop);
    }

    // Each live crop is checked exactly once, removals included.
    fn harvest_touching_crops(&mut self) {
        let crops = std::mem::take(&mut self.crops);
        let mut kept = Vec::with_capacity(crops.len());
        for crop in crops {
            if self.farmer.collides_with(&crop) {
                self.score += crop.points();
                if self.score > self.level * POINTS_PER_LEVEL {
                    self.increase_difficulty();
                }
            } else {
                kept.push(crop);
            }
        }
        self.crops = kept;
    }

    fn advance_obstacles(&mut self, dt: f64) {
        let arena = self.arena;
        let farmer = &self.farmer;
        let mut hits = 0u32;
        self.obstacles.retain_mut(|o| {
            o.update(dt, arena);
            if farmer.collides_with(&*o) {
                hits += 1;
                false
            } else {
                true
            }
        });
        if hits > 0 {
            self.time_left -= OBSTACLE_TIME_PENALTY * hits as f64;
            debug!("hit {} obstacle(s): {:.1}s left", hits, self.time_left);
        }
    }

    fn increase_difficulty(&mut self) {
        self.level += 1;
        self.spawn_interval = (self.spawn_interval * SPAWN_INTERVAL_DECAY).max(MIN_SPAWN_INTERVAL_MS);
        let lane_y = 60.0 * ((self.level % 6) + 1) as f64;
        let speed = -80.0 - self.level as f64 * 20.0;
        self.obstacles.push(Obstacle::new(self.arena.width - 60.0, lane_y, Some(speed)));
        info!(
            "level {}: spawn every {:.0}ms, {} obstacle(s)",
            self.level,
            self.spawn_interval,
            self.obstacles.len()
        );
    }

    // --- Input -----------------------------------------------------------------

    pub fn handle_key(&mut self, key: Key, now_ms: f64) {
        if self.phase != Phase::Running {
            return;
        }
        match key {
            Key::Up => self.farmer.move_up(),
            Key::Down => self.farmer.move_down(),
            Key::Left => self.farmer.move_left(),
            Key::Right => self.farmer.move_right(),
            Key::Scythe => {
                let points = self.farmer.use_scythe(&mut self.crops, now_ms);
                self.score += points;
            }
        }
    }

    /// Apply every pending key in arrival order.
    pub fn drain_input<S: InputSource + ?Sized>(&mut self, source: &mut S, now_ms: f64) {
        while let Some(key) = source.poll() {
            self.handle_key(key, now_ms);
        }
    }

    // --- HUD text ----------------------------------------------------------------

    pub fn score_label(&self) -> String {
        format!("Score: {}", self.score)
    }

    pub fn time_label(&self) -> String {
        format!("Time: {}", self.time_left.ceil() as i64)
    }

    pub fn level_label(&self) -> String {
        format!("Level: {}", self.level)
    }

    // --- Accessors -----------------------------------------------------------------

    pub fn phase(&self) -> Phase {
        self.phase
    }
    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }
    pub fn score(&self) -> u32 {
        self.score
    }
    pub fn level(&self) -> u32 {
        self.level
    }
    pub fn time_left(&self) -> f64 {
        self.time_left
    }
    pub fn spawn_interval(&self) -> f64 {
        self.spawn_interval
    }
    pub fn arena(&self) -> Arena {
        self.arena
    }
    pub fn farmer(&self) -> &Farmer {
        &self.farmer
    }
    pub fn crops(&self) -> &[Crop] {
        &self.crops
    }
    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }
}
