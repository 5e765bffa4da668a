use rand::Rng;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// An RGB color, serialized as `[r, g, b]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    pub fn css(&self) -> String {
        let [r, g, b] = self.0;
        format!("rgb({}, {}, {})", r, g, b)
    }
}

/// Light colors: every channel drawn from the same inclusive range.
#[derive(Debug, Clone)]
pub struct PastelPalette {
    channel: RangeInclusive<u8>,
}

impl PastelPalette {
    pub fn new(min: u8, max: u8) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        Self { channel: min..=max }
    }

    pub fn bounds(&self) -> (u8, u8) {
        (*self.channel.start(), *self.channel.end())
    }

    pub fn contains(&self, color: &Rgb) -> bool {
        color.0.iter().all(|c| self.channel.contains(c))
    }

    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Rgb {
        Rgb([
            rng.gen_range(self.channel.clone()),
            rng.gen_range(self.channel.clone()),
            rng.gen_range(self.channel.clone()),
        ])
    }
}

impl Default for PastelPalette {
    fn default() -> Self {
        Self::new(150, 255)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColoredToken {
    pub text: String,
    pub color: Rgb,
    pub position: usize,
}

/// Gives each token its own color, in order.
pub fn annotate<R: Rng + ?Sized>(
    tokens: Vec<String>,
    palette: &PastelPalette,
    rng: &mut R,
) -> Vec<ColoredToken> {
    tokens
        .into_iter()
        .enumerate()
        .map(|(position, text)| ColoredToken {
            text,
            color: palette.pick(&mut *rng),
            position,
        })
        .collect()
}
