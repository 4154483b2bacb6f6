// Domain models - Core types and data structures

use std::fmt;
use crate::domain::errors::DomainError;

/// Ticks per second of the fixed-point time representation.
///
/// 120000 is divisible by 24, 25, 30, 50 and 60, and by the NTSC timebases
/// 24000 and 30000, so integer frame positions at every common rate convert
/// to ticks without rounding error.
pub const TICKS_PER_SECOND: i64 = 120_000;

/// Number of marker categories in the category table
pub const CATEGORY_COUNT: usize = 5;

/// Display colors indexed by marker category
pub const CATEGORY_COLORS: [&str; CATEGORY_COUNT] =
    ["#ff0000", "#0000ff", "#00ff00", "#ffff00", "#00ffff"];

/// Comment assigned to imported markers that carry none
pub const DEFAULT_COMMENT: &str = "Marker";

/// Display color for a category index, `None` when out of range
pub fn category_color(category: usize) -> Option<&'static str> {
    CATEGORY_COLORS.get(category).copied()
}

/// Exact timeline position used as the ordering and uniqueness key for markers.
///
/// Stored as an integer tick count so that equality and ordering are exact;
/// two markers can never collide or diverge through float drift. Seconds and
/// frame indices are conversions, not state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeSpec {
    ticks: i64,
}

/// Integer division rounding to the nearest quotient, ties away from zero
fn div_round(n: i128, d: i128) -> i64 {
    debug_assert!(d > 0);
    let q = if n >= 0 { (n + d / 2) / d } else { (n - d / 2) / d };
    q as i64
}

impl TimeSpec {
    /// The zero position
    pub fn zero() -> Self {
        Self { ticks: 0 }
    }

    /// Create a TimeSpec from a raw tick count
    pub fn from_ticks(ticks: i64) -> Self {
        Self { ticks }
    }

    /// Create a TimeSpec from seconds, rounded to the nearest tick
    pub fn from_seconds(seconds: f64) -> Self {
        Self {
            ticks: (seconds * TICKS_PER_SECOND as f64).round() as i64,
        }
    }

    /// Create a TimeSpec from a frame index under the given frame rate
    pub fn from_frames(frame: i64, rate: FrameRate) -> Self {
        let n = frame as i128 * TICKS_PER_SECOND as i128 * rate.den() as i128;
        Self {
            ticks: div_round(n, rate.num() as i128),
        }
    }

    /// Raw tick count
    pub fn ticks(&self) -> i64 {
        self.ticks
    }

    /// Position in seconds
    pub fn as_seconds(&self) -> f64 {
        self.ticks as f64 / TICKS_PER_SECOND as f64
    }

    /// Frame index under the given frame rate, rounded to the nearest frame
    pub fn to_frames(&self, rate: FrameRate) -> i64 {
        let n = self.ticks as i128 * rate.num() as i128;
        div_round(n, TICKS_PER_SECOND as i128 * rate.den() as i128)
    }

    /// Parse a time string: seconds (e.g. 123.45), MM:SS.ms or HH:MM:SS.ms
    pub fn parse(time_str: &str) -> Result<Self, DomainError> {
        let trimmed = time_str.trim();

        // Try parsing as seconds (float)
        if let Ok(seconds) = trimmed.parse::<f64>() {
            if seconds < 0.0 {
                return Err(DomainError::BadArgs("Time cannot be negative".to_string()));
            }
            return Ok(Self::from_seconds(seconds));
        }

        let parts: Vec<&str> = trimmed.split(':').collect();
        if parts.len() == 2 {
            // MM:SS.ms format
            let minutes = parts[0]
                .parse::<u32>()
                .map_err(|_| DomainError::InvalidTimeFormat("Invalid minutes".to_string()))?;
            let seconds_part = parts[1]
                .parse::<f64>()
                .map_err(|_| DomainError::InvalidTimeFormat("Invalid seconds".to_string()))?;

            if !(0.0..60.0).contains(&seconds_part) {
                return Err(DomainError::InvalidTimeFormat(
                    "Seconds must be in [0, 60)".to_string(),
                ));
            }

            Ok(Self::from_seconds(minutes as f64 * 60.0 + seconds_part))
        } else if parts.len() == 3 {
            // HH:MM:SS.ms format
            let hours = parts[0]
                .parse::<u32>()
                .map_err(|_| DomainError::InvalidTimeFormat("Invalid hours".to_string()))?;
            let minutes = parts[1]
                .parse::<u32>()
                .map_err(|_| DomainError::InvalidTimeFormat("Invalid minutes".to_string()))?;
            let seconds_part = parts[2]
                .parse::<f64>()
                .map_err(|_| DomainError::InvalidTimeFormat("Invalid seconds".to_string()))?;

            if minutes >= 60 {
                return Err(DomainError::InvalidTimeFormat(
                    "Minutes must be less than 60".to_string(),
                ));
            }
            if !(0.0..60.0).contains(&seconds_part) {
                return Err(DomainError::InvalidTimeFormat(
                    "Seconds must be in [0, 60)".to_string(),
                ));
            }

            Ok(Self::from_seconds(
                hours as f64 * 3600.0 + minutes as f64 * 60.0 + seconds_part,
            ))
        } else {
            Err(DomainError::InvalidTimeFormat(
                "Supported formats: seconds (e.g. 123.45), MM:SS.ms (e.g. 2:30.5), HH:MM:SS.ms (e.g. 1:02:30.5)"
                    .to_string(),
            ))
        }
    }

    /// Format as HH:MM:SS.ms
    pub fn format_hms(&self) -> String {
        let seconds = self.as_seconds();
        let hours = (seconds / 3600.0) as u32;
        let minutes = ((seconds % 3600.0) / 60.0) as u32;
        let secs = (seconds % 60.0) as u32;
        let milliseconds = ((seconds % 1.0) * 1000.0).round() as u32;

        if hours > 0 {
            format!("{}:{:02}:{:02}.{:03}", hours, minutes, secs, milliseconds)
        } else {
            format!("{}:{:02}.{:03}", minutes, secs, milliseconds)
        }
    }
}

impl fmt::Display for TimeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_hms())
    }
}

/// Frames-per-second as an exact rational number.
///
/// Every frame-index conversion in the crate goes through a FrameRate; frame
/// indices are rate-relative snapshots and are never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameRate {
    num: u32,
    den: u32,
}

fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

impl FrameRate {
    /// Create a new frame rate, num/den frames per second
    pub fn new(num: u32, den: u32) -> Result<Self, DomainError> {
        if num == 0 || den == 0 {
            return Err(DomainError::InvalidFrameRate(
                "Numerator and denominator must be nonzero".to_string(),
            ));
        }
        let g = gcd(num, den);
        Ok(Self {
            num: num / g,
            den: den / g,
        })
    }

    /// Numerator (frames)
    pub fn num(&self) -> u32 {
        self.num
    }

    /// Denominator (seconds)
    pub fn den(&self) -> u32 {
        self.den
    }

    /// Frames per second as a float, for display
    pub fn as_fps(&self) -> f64 {
        self.num as f64 / self.den as f64
    }

    /// Parse "25", "23.976" or "30000/1001"
    pub fn parse(rate_str: &str) -> Result<Self, DomainError> {
        let trimmed = rate_str.trim();
        if let Some((num_str, den_str)) = trimmed.split_once('/') {
            let num = num_str.trim().parse::<u32>().map_err(|_| {
                DomainError::InvalidFrameRate(format!("Invalid numerator in '{}'", rate_str))
            })?;
            let den = den_str.trim().parse::<u32>().map_err(|_| {
                DomainError::InvalidFrameRate(format!("Invalid denominator in '{}'", rate_str))
            })?;
            return Self::new(num, den);
        }
        let fps = trimmed.parse::<f64>().map_err(|_| {
            DomainError::InvalidFrameRate(format!("Invalid frame rate '{}'", rate_str))
        })?;
        if fps <= 0.0 || fps > 1000.0 {
            return Err(DomainError::InvalidFrameRate(format!(
                "Frame rate out of range: {}",
                fps
            )));
        }
        // Decimal rates are taken at millifps precision; NTSC rates should be
        // given as rationals ("30000/1001") when exactness matters.
        Self::new((fps * 1000.0).round() as u32, 1000)
    }

    /// Common frame rates
    pub fn fps_24() -> Self {
        Self { num: 24, den: 1 }
    }

    pub fn fps_25() -> Self {
        Self { num: 25, den: 1 }
    }

    pub fn fps_30() -> Self {
        Self { num: 30, den: 1 }
    }

    pub fn fps_ntsc_film() -> Self {
        Self { num: 24000, den: 1001 } // 23.976 fps
    }

    pub fn fps_ntsc() -> Self {
        Self { num: 30000, den: 1001 } // 29.97 fps
    }
}

impl fmt::Display for FrameRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.den == 1 {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.den)
        }
    }
}

/// A labeled point annotation at an exact timeline position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    pub position: TimeSpec,
    pub comment: String,
    pub category: usize,
}

impl Marker {
    /// Create a new marker with category validation
    pub fn new(position: TimeSpec, comment: String, category: usize) -> Result<Self, DomainError> {
        if category >= CATEGORY_COUNT {
            return Err(DomainError::InvalidCategory(format!(
                "Category {} is outside [0, {})",
                category, CATEGORY_COUNT
            )));
        }
        Ok(Self {
            position,
            comment,
            category,
        })
    }

    /// Display color of this marker's category
    pub fn color(&self) -> &'static str {
        CATEGORY_COLORS[self.category]
    }
}

/// Fields exposed by the list-view contract of a marker model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerField {
    /// Marker comment text
    Comment,
    /// Position in seconds
    Position,
    /// Frame index at the current project frame rate, recomputed on demand
    Frame,
    /// Display color of the marker category
    Color,
    /// Category index
    Category,
}

/// Value of a single list-view field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Seconds(f64),
    Frame(i64),
    Color(&'static str),
    Category(usize),
}

#[cfg(test)]
mod tests;
