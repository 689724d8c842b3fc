use rand::Rng;

use super::{Bounded, Rect};

pub const CROP_SIZE: f64 = 18.0;

/// Crop varieties. Rarer crops are worth more.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CropKind {
    Wheat,   // common
    Pumpkin, // less common
    Gold,    // rare
}

impl CropKind {
    /// Cumulative probability thresholds: wheat 70%, pumpkin 25%, gold 5%.
    const WHEAT_BELOW: f64 = 0.70;
    const PUMPKIN_BELOW: f64 = 0.95;

    /// Map a uniform roll in `[0, 1)` onto a kind.
    pub fn from_roll(r: f64) -> Self {
        if r < Self::WHEAT_BELOW {
            CropKind::Wheat
        } else if r < Self::PUMPKIN_BELOW {
            CropKind::Pumpkin
        } else {
            CropKind::Gold
        }
    }

    pub fn points(self) -> u32 {
        match self {
            CropKind::Wheat => 1,
            CropKind::Pumpkin => 3,
            CropKind::Gold => 5,
        }
    }
}

/// A collectible sitting on the field. Immutable once placed.
#[derive(Clone, Debug, PartialEq)]
pub struct Crop {
    pub x: f64,
    pub y: f64,
    pub kind: CropKind,
}

impl Crop {
    pub fn new(x: f64, y: f64, kind: CropKind) -> Self {
        Self { x, y, kind }
    }

    /// Place a crop whose kind is drawn from the weighted table.
    pub fn random_at<R: Rng + ?Sized>(x: f64, y: f64, rng: &mut R) -> Self {
        let roll: f64 = rng.gen_range(0.0..1.0);
        Self::new(x, y, CropKind::from_roll(roll))
    }

    pub fn points(&self) -> u32 {
        self.kind.points()
    }
}

impl Bounded for Crop {
    fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, CROP_SIZE, CROP_SIZE)
    }
}
