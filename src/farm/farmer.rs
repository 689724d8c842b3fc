use super::{Arena, Bounded, Crop, Rect};

pub const FARMER_SIZE: f64 = 28.0;
pub const FARMER_SPEED: f64 = 140.0; // units per second
pub const FARMER_START: (f64, f64) = (40.0, 40.0);

/// Per-step velocity multiplier. Keeps controls snappy: motion dies out quickly
/// once the player stops pressing keys.
pub const DAMPING: f64 = 0.88;

pub const SCYTHE_RANGE: f64 = 48.0;
pub const SCYTHE_EFFECT_MS: f64 = 250.0;

/// The player-controlled farmer.
#[derive(Clone, Debug, PartialEq)]
pub struct Farmer {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    /// Timestamp (ms) until which the scythe sweep is drawn. Purely cosmetic.
    scanning_until_ms: f64,
}

impl Default for Farmer {
    fn default() -> Self {
        Self::new(FARMER_START.0, FARMER_START.1)
    }
}

impl Farmer {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, vx: 0.0, vy: 0.0, scanning_until_ms: f64::NEG_INFINITY }
    }

    /// Integrate, clamp into the arena, then damp.
    pub fn update(&mut self, dt: f64, arena: Arena) {
        self.x += self.vx * dt;
        self.y += self.vy * dt;
        self.x = self.x.min(arena.width - FARMER_SIZE).max(0.0);
        self.y = self.y.min(arena.height - FARMER_SIZE).max(0.0);
        self.vx *= DAMPING;
        self.vy *= DAMPING;
    }

    // Directional input overwrites the axis velocity, it never accumulates.
    pub fn move_up(&mut self) {
        self.vy = -FARMER_SPEED;
    }
    pub fn move_down(&mut self) {
        self.vy = FARMER_SPEED;
    }
    pub fn move_left(&mut self) {
        self.vx = -FARMER_SPEED;
    }
    pub fn move_right(&mut self) {
        self.vx = FARMER_SPEED;
    }

    pub fn collides_with<B: Bounded + ?Sized>(&self, other: &B) -> bool {
        self.bounds().overlaps(&other.bounds())
    }

    /// Sweep the scythe: remove every crop whose centre lies within
    /// [`SCYTHE_RANGE`] of the farmer's centre (boundary inclusive) and return the
    /// points they were worth. Starts the cosmetic sweep effect at `now_ms`.
    pub fn use_scythe(&mut self, crops: &mut Vec<Crop>, now_ms: f64) -> u32 {
        let (fx, fy) = self.bounds().center();
        let mut collected = 0;
        crops.retain(|c| {
            let (cx, cy) = c.bounds().center();
            if (cx - fx).hypot(cy - fy) <= SCYTHE_RANGE {
                collected += c.points();
                false
            } else {
                true
            }
        });
        self.scanning_until_ms = now_ms + SCYTHE_EFFECT_MS;
        collected
    }

    pub fn is_scanning(&self, now_ms: f64) -> bool {
        now_ms < self.scanning_until_ms
    }
}

impl Bounded for Farmer {
    fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, FARMER_SIZE, FARMER_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::farm::CropKind;
    use crate::farm::crop::CROP_SIZE;

    const ARENA: Arena = Arena { width: 800.0, height: 600.0 };

    // Crop whose centre sits `dx` to the right of the default farmer's centre.
    fn crop_right_of_center(dx: f64, kind: CropKind) -> Crop {
        let (fx, fy) = Farmer::default().bounds().center();
        Crop::new(fx + dx - CROP_SIZE / 2.0, fy - CROP_SIZE / 2.0, kind)
    }

    #[test]
    fn test_velocity_decays_geometrically() {
        let mut f = Farmer::default();
        f.move_right();
        f.move_down();
        let mut expected = FARMER_SPEED;
        for _ in 0..30 {
            f.update(1.0 / 60.0, ARENA);
            expected *= DAMPING;
            assert!((f.vx - expected).abs() < 1e-9);
            assert!((f.vy - expected).abs() < 1e-9);
        }
        for _ in 0..300 {
            f.update(1.0 / 60.0, ARENA);
        }
        assert!(f.vx.abs() < 1e-6 && f.vy.abs() < 1e-6);
    }

    #[test]
    fn test_position_clamped_to_arena() {
        let mut f = Farmer::default();
        for _ in 0..20 {
            f.move_left();
            f.move_up();
            f.update(1.0, ARENA);
            assert!(f.x >= 0.0 && f.y >= 0.0);
        }
        assert_eq!((f.x, f.y), (0.0, 0.0));

        for _ in 0..20 {
            f.move_right();
            f.move_down();
            f.update(1.0, ARENA);
            assert!(f.x <= ARENA.width - FARMER_SIZE);
            assert!(f.y <= ARENA.height - FARMER_SIZE);
        }
        assert_eq!(f.x, ARENA.width - FARMER_SIZE);
        assert_eq!(f.y, ARENA.height - FARMER_SIZE);
    }

    #[test]
    fn test_direction_overwrites() {
        let mut f = Farmer::default();
        f.move_left();
        f.move_right();
        assert_eq!(f.vx, FARMER_SPEED);
        f.move_right();
        assert_eq!(f.vx, FARMER_SPEED);
        f.move_down();
        f.move_up();
        assert_eq!(f.vy, -FARMER_SPEED);
    }

    #[test]
    fn test_collides_with_edges() {
        let f = Farmer::new(0.0, 0.0);
        assert!(!f.collides_with(&Rect::new(FARMER_SIZE, 0.0, 10.0, 10.0)));
        assert!(f.collides_with(&Rect::new(FARMER_SIZE - 1.0, 0.0, 10.0, 10.0)));
        assert!(!f.collides_with(&Rect::new(0.0, FARMER_SIZE, 10.0, 10.0)));
    }

    #[test]
    fn test_scythe_range_boundary() {
        let mut f = Farmer::default();
        let mut crops = vec![crop_right_of_center(48.0, CropKind::Gold)];
        assert_eq!(f.use_scythe(&mut crops, 0.0), 5);
        assert!(crops.is_empty());

        let mut crops = vec![crop_right_of_center(48.01, CropKind::Gold)];
        assert_eq!(f.use_scythe(&mut crops, 0.0), 0);
        assert_eq!(crops.len(), 1);
    }

    #[test]
    fn test_scythe_collects_only_nearby() {
        let mut f = Farmer::default();
        let mut crops = vec![
            crop_right_of_center(10.0, CropKind::Wheat),
            crop_right_of_center(300.0, CropKind::Gold),
            crop_right_of_center(-20.0, CropKind::Pumpkin),
        ];
        assert_eq!(f.use_scythe(&mut crops, 0.0), 4);
        assert_eq!(crops.len(), 1);
        assert_eq!(crops[0].kind, CropKind::Gold);
    }

    #[test]
    fn test_scanning_effect_expires() {
        let mut f = Farmer::default();
        assert!(!f.is_scanning(0.0));
        f.use_scythe(&mut Vec::new(), 1_000.0);
        assert!(f.is_scanning(1_000.0));
        assert!(f.is_scanning(1_249.0));
        assert!(!f.is_scanning(1_250.0));
        // a second sweep extends the effect
        f.use_scythe(&mut Vec::new(), 1_200.0);
        assert!(f.is_scanning(1_300.0));
    }
}
