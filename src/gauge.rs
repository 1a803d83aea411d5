//! Speed to gauge mapping: arc fill, color bucket, needle angle and endpoint.

use crate::random::RandomSource;
use crate::view::Point;

pub const START_ANGLE_DEG: f64 = -135.0;
pub const END_ANGLE_DEG: f64 = 135.0;
pub const MID_THRESHOLD: f64 = 0.55;
pub const HIGH_THRESHOLD: f64 = 0.82;
/// Above this fraction the needle flutters.
pub const JITTER_THRESHOLD: f64 = 0.97;
pub const JITTER_SPAN_DEG: f64 = 1.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorBucket {
    Low,
    Mid,
    High,
}

impl ColorBucket {
    pub fn for_fraction(t: f64) -> Self {
        if t < MID_THRESHOLD {
            ColorBucket::Low
        } else if t < HIGH_THRESHOLD {
            ColorBucket::Mid
        } else {
            ColorBucket::High
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaugeVisual {
    pub arc_fraction: f64,
    pub color_bucket: ColorBucket,
    pub needle_angle_deg: f64,
    pub needle_pivot: Point,
    pub needle_end: Point,
    pub readout: i64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaugeMapper {
    pub max: f64,
    pub pivot: Point,
    pub needle_length: f64,
}

impl Default for GaugeMapper {
    fn default() -> Self {
        Self {
            max: 120.0,
            pivot: Point::new(110.0, 140.0),
            needle_length: 60.0,
        }
    }
}

impl GaugeMapper {
    pub fn map(&self, speed: f64, rng: &mut impl RandomSource) -> GaugeVisual {
        let t = speed.clamp(0.0, self.max) / self.max;

        let mut angle = START_ANGLE_DEG + (END_ANGLE_DEG - START_ANGLE_DEG) * t;
        if t > JITTER_THRESHOLD {
            angle += (rng.next_unit() - 0.5) * JITTER_SPAN_DEG;
        }
        let angle = angle.clamp(START_ANGLE_DEG, END_ANGLE_DEG);

        GaugeVisual {
            arc_fraction: t,
            color_bucket: ColorBucket::for_fraction(t),
            needle_angle_deg: angle,
            needle_pivot: self.pivot,
            needle_end: self.needle_end(angle),
            readout: speed.round() as i64,
        }
    }

    fn needle_end(&self, angle_deg: f64) -> Point {
        let rad = angle_deg.to_radians();
        Point::new(
            self.pivot.x + self.needle_length * rad.cos(),
            self.pivot.y + self.needle_length * rad.sin(),
        )
    }
}
