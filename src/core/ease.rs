use super::ParseError;
use std::str::FromStr;

/// Curve direction for the polynomial easings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    In,
    Out,
    InOut,
}

/// Named easing curves, mirroring the names used in the page's stylesheet
/// notes (`power3.out`, `back.out(1.5)`, ...).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Ease {
    Linear,
    /// `powerN`: power1 is quadratic, power2 cubic, and so on.
    Power(u8, Direction),
    BackOut(f32),
    /// Smooth-scroll glide `min(1, 1.001 - 2^(-10t))`.
    ScrollExpo,
}

impl Default for Ease {
    fn default() -> Self {
        Ease::Power(1, Direction::Out)
    }
}

impl Ease {
    pub const POWER2_OUT: Ease = Ease::Power(2, Direction::Out);
    pub const POWER2_IN: Ease = Ease::Power(2, Direction::In);
    pub const POWER2_IN_OUT: Ease = Ease::Power(2, Direction::InOut);
    pub const POWER3_OUT: Ease = Ease::Power(3, Direction::Out);
    pub const POWER3_IN: Ease = Ease::Power(3, Direction::In);
    pub const POWER3_IN_OUT: Ease = Ease::Power(3, Direction::InOut);

    /// Map linear progress `t` in \[0, 1\] to eased progress.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::Power(n, dir) => {
                let p = i32::from(n) + 1;
                let ease_in = |x: f32| x.powi(p);
                match dir {
                    Direction::In => ease_in(t),
                    Direction::Out => 1.0 - ease_in(1.0 - t),
                    Direction::InOut => {
                        if t < 0.5 {
                            ease_in(t * 2.0) / 2.0
                        } else {
                            1.0 - ease_in((1.0 - t) * 2.0) / 2.0
                        }
                    }
                }
            }
            Ease::BackOut(s) => {
                let u = t - 1.0;
                1.0 + (s + 1.0) * u * u * u + s * u * u
            }
            Ease::ScrollExpo => scroll_glide(t),
        }
    }
}

#[inline]
pub fn scroll_glide(t: f32) -> f32 {
    (1.001 - 2.0_f32.powf(-10.0 * t)).min(1.0)
}

impl FromStr for Ease {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        if name == "none" || name == "linear" {
            return Ok(Ease::Linear);
        }
        if name == "expo.scroll" {
            return Ok(Ease::ScrollExpo);
        }
        if let Some(rest) = name.strip_prefix("back.out") {
            let strength = match rest.strip_prefix('(').and_then(|r| r.strip_suffix(')')) {
                Some(arg) => arg
                    .trim()
                    .parse::<f32>()
                    .map_err(|_| ParseError::Ease(name.to_string()))?,
                None if rest.is_empty() => 1.70158,
                None => return Err(ParseError::Ease(name.to_string())),
            };
            return Ok(Ease::BackOut(strength));
        }
        let (family, dir) = name
            .split_once('.')
            .ok_or_else(|| ParseError::Ease(name.to_string()))?;
        let power = family
            .strip_prefix("power")
            .and_then(|n| n.parse::<u8>().ok())
            .filter(|n| (1..=4).contains(n))
            .ok_or_else(|| ParseError::Ease(name.to_string()))?;
        let dir = match dir {
            "in" => Direction::In,
            "out" => Direction::Out,
            "inOut" => Direction::InOut,
            _ => return Err(ParseError::Ease(name.to_string())),
        };
        Ok(Ease::Power(power, dir))
    }
}
