//! Display colors assigned to tracked bodies

use rand::Rng;

/// One of the four body colors. Bodies sharing a color heal each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BodyColor {
    #[default]
    Red,
    Cyan,
    Blue,
    Yellow,
}

impl BodyColor {
    pub const ALL: [BodyColor; 4] = [
        BodyColor::Red,
        BodyColor::Cyan,
        BodyColor::Blue,
        BodyColor::Yellow,
    ];

    /// Uniformly random color
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> BodyColor {
        BodyColor::ALL[rng.gen_range(0..BodyColor::ALL.len())]
    }

    /// RGB value handed to the renderer
    pub fn rgb(self) -> [u8; 3] {
        match self {
            BodyColor::Red => [247, 89, 89],
            BodyColor::Cyan => [89, 247, 171],
            BodyColor::Blue => [89, 202, 247],
            BodyColor::Yellow => [247, 239, 89],
        }
    }
}
