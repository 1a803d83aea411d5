use std::path::PathBuf;

use bon::Builder;

use crate::gauge::ColorBucket;
use crate::policy::PolicyMode;
use crate::view::DEFAULT_SCALE;

/// Color representation for drawn elements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn as_tuple(self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }
}

/// Colors shared by all panels
#[derive(Debug, Clone)]
pub struct Palette {
    pub background: Color,
    pub grid: Color,
    pub axis: Color,
    pub text: Color,
    pub reference_point: Color,
    pub reference_label: Color,
    pub road: Color,
    pub lane_marking: Color,
    pub car: Color,
    pub obstacle: Color,
    pub gauge_track: Color,
    pub needle: Color,
    pub gauge_low: Color,
    pub gauge_mid: Color,
    pub gauge_high: Color,
    pub gas_lamp: Color,
    pub brake_lamp: Color,
    pub lamp_off: Color,
    pub panel_border: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Color::new(0xff, 0xff, 0xff),
            grid: Color::new(0xe0, 0xe0, 0xe0),
            axis: Color::new(0x00, 0x00, 0x00),
            text: Color::new(0x00, 0x00, 0x00),
            reference_point: Color::new(0x00, 0x00, 0xff),
            reference_label: Color::new(0x11, 0x18, 0x27),
            road: Color::new(0x4b, 0x55, 0x63),
            lane_marking: Color::new(0xf9, 0xfa, 0xfb),
            car: Color::new(0x25, 0x63, 0xeb),
            obstacle: Color::new(0xf9, 0x73, 0x16),
            gauge_track: Color::new(0xd1, 0xd5, 0xdb),
            needle: Color::new(0x11, 0x18, 0x27),
            gauge_low: Color::new(59, 130, 246),
            gauge_mid: Color::new(245, 158, 11),
            gauge_high: Color::new(239, 68, 68),
            gas_lamp: Color::new(0x22, 0xc5, 0x5e),
            brake_lamp: Color::new(0xef, 0x44, 0x44),
            lamp_off: Color::new(0xe5, 0xe7, 0xeb),
            panel_border: Color::new(0x9c, 0xa3, 0xaf),
        }
    }
}

impl Palette {
    pub fn bucket(&self, bucket: ColorBucket) -> Color {
        match bucket {
            ColorBucket::Low => self.gauge_low,
            ColorBucket::Mid => self.gauge_mid,
            ColorBucket::High => self.gauge_high,
        }
    }
}

/// Placement of the gauge inside its panel
#[derive(Debug, Clone)]
pub struct GaugeLayout {
    pub radius: f64,
    pub track_thickness: i32,
    pub value_thickness: i32,
    pub needle_width: f32,
    pub pivot_radius: i32,
    pub readout_offset: i32,
    pub readout_font_size: f32,
    pub lamp_radius: i32,
    pub lamp_spacing: i32,
}

impl Default for GaugeLayout {
    fn default() -> Self {
        Self {
            radius: 80.0,
            track_thickness: 10,
            value_thickness: 10,
            needle_width: 4.0,
            pivot_radius: 6,
            readout_offset: 50,
            readout_font_size: 32.0,
            lamp_radius: 12,
            lamp_spacing: 40,
        }
    }
}

/// Road band and lane markings
#[derive(Debug, Clone)]
pub struct RoadLayout {
    pub road_top: i32,
    pub road_height: i32,
    pub dash_length: i32,
    pub dash_gap: i32,
    pub dash_thickness: f32,
}

impl Default for RoadLayout {
    fn default() -> Self {
        Self {
            road_top: 60,
            road_height: 140,
            dash_length: 30,
            dash_gap: 20,
            dash_thickness: 3.0,
        }
    }
}

#[derive(Debug, Clone, Builder)]
pub struct SimulatorConfig {
    #[builder(default = "Braking Policy".to_string())]
    pub title: String,

    // Window configuration
    #[builder(default = 1200)]
    pub window_width: usize,
    #[builder(default = 640)]
    pub window_height: usize,
    #[builder(default = 60.0)]
    pub max_framerate: f64,

    // Panels: the plane on the left, road over gauge on the right
    #[builder(default = 600)]
    pub graph_width: usize,
    #[builder(default = 260)]
    pub road_height: usize,

    // Plane
    #[builder(default = DEFAULT_SCALE)]
    pub initial_scale: f64,
    #[builder(default = 1.0)]
    pub grid_thickness: f32,
    #[builder(default = 2.0)]
    pub axis_thickness: f32,
    #[builder(default = 2.0)]
    pub boundary_thickness: f32,
    #[builder(default = 6)]
    pub reference_point_radius: i32,
    #[builder(default = 12.0)]
    pub label_font_size: f32,

    // Simulation
    #[builder(default = PolicyMode::Cautious)]
    pub initial_mode: PolicyMode,
    pub seed: Option<u64>,

    #[builder(default)]
    pub gauge: GaugeLayout,
    #[builder(default)]
    pub road: RoadLayout,
    #[builder(default)]
    pub palette: Palette,

    /// Text is skipped when no font is configured.
    pub font_path: Option<PathBuf>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let config = SimulatorConfig::default();
        assert_eq!(config.window_width, 1200);
        assert_eq!(config.graph_width, 600);
        assert_eq!(config.initial_scale, 80.0);
        assert_eq!(config.initial_mode, PolicyMode::Cautious);
        assert!(config.seed.is_none());
        assert!(config.font_path.is_none());
    }

    #[test]
    fn builder_overrides() {
        let config = SimulatorConfig::builder()
            .initial_mode(PolicyMode::Timid)
            .seed(9)
            .font_path(PathBuf::from("font.ttf"))
            .build();
        assert_eq!(config.initial_mode, PolicyMode::Timid);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.font_path, Some(PathBuf::from("font.ttf")));
    }

    #[test]
    fn palette_buckets_are_distinct() {
        let palette = Palette::default();
        let low = palette.bucket(ColorBucket::Low);
        let mid = palette.bucket(ColorBucket::Mid);
        let high = palette.bucket(ColorBucket::High);
        assert_ne!(low, mid);
        assert_ne!(mid, high);
        assert_eq!(high.as_tuple(), (239, 68, 68));
    }
}
