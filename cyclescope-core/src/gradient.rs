//! Score → line color mapping.
//!
//! Linear interpolation between a cyan "low" endpoint and a magenta "high"
//! endpoint over the clamped z-score range [-2, 2].

/// An RGB triple, channel values 0–255.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Gradient endpoint at z = -2 (deep oversold): cyan.
pub const LOW_COLOR: Rgb = Rgb { r: 0, g: 241, b: 255 };

/// Gradient endpoint at z = +2 (deep overbought): magenta.
pub const HIGH_COLOR: Rgb = Rgb { r: 255, g: 1, b: 154 };

/// Map a z-score to a color along the low→high gradient.
///
/// Scores outside [-2, 2] clamp to the endpoints. NaN never reaches this
/// function through the pipeline: [`crate::domain::ScorePoint::score`]
/// treats NaN as a missing value.
pub fn color_for(score: f64) -> Rgb {
    let t = (score.clamp(-2.0, 2.0) + 2.0) / 4.0;
    Rgb {
        r: lerp_channel(LOW_COLOR.r, HIGH_COLOR.r, t),
        g: lerp_channel(LOW_COLOR.g, HIGH_COLOR.g, t),
        b: lerp_channel(LOW_COLOR.b, HIGH_COLOR.b, t),
    }
}

fn lerp_channel(low: u8, high: u8, t: f64) -> u8 {
    let v = f64::from(low) + (f64::from(high) - f64::from(low)) * t;
    v.round().clamp(0.0, 255.0) as u8
}
