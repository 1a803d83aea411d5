// ============================================================================
// SOFTWARE RENDERER FOR THE THREE PANELS
// ============================================================================

use rusttype::{point, Font, PositionedGlyph, Scale};

use crate::config::{Color, SimulatorConfig};
use crate::frame::Frame;
use crate::gauge::{END_ANGLE_DEG, START_ANGLE_DEG};
use crate::simulation::Pedal;
use crate::view::Point;

/// Pixel rectangle, `x1`/`y1` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl PixelRect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x0: x,
            y0: y,
            x1: x + width,
            y1: y + height,
        }
    }

    pub fn width(&self) -> i32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> i32 {
        self.y1 - self.y0
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x0 && x < self.x1 && y >= self.y0 && y < self.y1
    }

    fn intersect(&self, other: &PixelRect) -> PixelRect {
        PixelRect {
            x0: self.x0.max(other.x0),
            y0: self.y0.max(other.y0),
            x1: self.x1.min(other.x1),
            y1: self.y1.min(other.y1),
        }
    }

    fn is_empty(&self) -> bool {
        self.x0 >= self.x1 || self.y0 >= self.y1
    }
}

/// Plane, road and gauge areas of the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Panels {
    pub graph: PixelRect,
    pub road: PixelRect,
    pub gauge: PixelRect,
}

impl Panels {
    pub fn layout(width: usize, height: usize, config: &SimulatorConfig) -> Self {
        let (width, height) = (width as i32, height as i32);
        let graph_width = (config.graph_width as i32).min(width);
        let road_height = (config.road_height as i32).min(height);
        Self {
            graph: PixelRect::new(0, 0, graph_width, height),
            road: PixelRect::new(graph_width, 0, width - graph_width, road_height),
            gauge: PixelRect::new(graph_width, road_height, width - graph_width, height - road_height),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    Center,
    BottomLeft,
}

// ============================================================================
// RETAINED MODE ABSTRACTIONS
// ============================================================================

#[derive(Clone, Debug)]
enum DrawCommand {
    Clear((u8, u8, u8)),
    Clip(PixelRect),
    Line {
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        thickness: f32,
        tapered: bool,
        color: (u8, u8, u8),
    },
    Rect {
        rect: PixelRect,
        color: (u8, u8, u8),
    },
    Arc {
        cx: i32,
        cy: i32,
        r: i32,
        thickness: i32,
        start_angle: f64,
        arc_span: f64,
        color: (u8, u8, u8),
    },
    Circle {
        cx: i32,
        cy: i32,
        radius: i32,
        color: (u8, u8, u8),
    },
    Text {
        x: i32,
        y: i32,
        text: String,
        font_size: f32,
        anchor: TextAnchor,
        color: (u8, u8, u8),
    },
}

struct Scene {
    commands: Vec<DrawCommand>,
}

impl Scene {
    fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    fn add_command(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    fn line(&mut self, from: (f64, f64), to: (f64, f64), thickness: f32, color: Color) {
        self.add_command(DrawCommand::Line {
            x0: from.0.round() as i32,
            y0: from.1.round() as i32,
            x1: to.0.round() as i32,
            y1: to.1.round() as i32,
            thickness,
            tapered: false,
            color: color.as_tuple(),
        });
    }

    fn render(&self, canvas: &mut Canvas, font: Option<&Font<'static>>) {
        for command in &self.commands {
            match command {
                DrawCommand::Clear(color) => canvas.clear(*color),
                DrawCommand::Clip(rect) => canvas.set_clip(*rect),
                DrawCommand::Line {
                    x0,
                    y0,
                    x1,
                    y1,
                    thickness,
                    tapered,
                    color,
                } => draw_thick_line_aa(canvas, *x0, *y0, *x1, *y1, *thickness, *tapered, *color),
                DrawCommand::Rect { rect, color } => fill_rect(canvas, *rect, *color),
                DrawCommand::Arc {
                    cx,
                    cy,
                    r,
                    thickness,
                    start_angle,
                    arc_span,
                    color,
                } => render_arc(
                    canvas,
                    *cx,
                    *cy,
                    *r,
                    *thickness,
                    *start_angle,
                    *arc_span,
                    *color,
                ),
                DrawCommand::Circle {
                    cx,
                    cy,
                    radius,
                    color,
                } => draw_circle(canvas, *cx, *cy, *radius, *color),
                DrawCommand::Text {
                    x,
                    y,
                    text,
                    font_size,
                    anchor,
                    color,
                } => {
                    if let Some(font) = font {
                        draw_text(
                            canvas,
                            *x,
                            *y,
                            text,
                            font,
                            Scale::uniform(*font_size),
                            *anchor,
                            *color,
                        );
                    }
                }
            }
        }
    }
}

// ============================================================================
// CANVAS
// ============================================================================

pub struct Canvas<'a> {
    frame: &'a mut [u8],
    width: usize,
    height: usize,
    clip: PixelRect,
}

impl<'a> Canvas<'a> {
    /// Wraps an RGBA8 buffer of `width * height` pixels.
    pub fn new(frame: &'a mut [u8], width: usize, height: usize) -> Self {
        let height = height.min(frame.len() / (width.max(1) * 4));
        Self {
            frame,
            width,
            height,
            clip: PixelRect::new(0, 0, width as i32, height as i32),
        }
    }

    fn bounds(&self) -> PixelRect {
        PixelRect::new(0, 0, self.width as i32, self.height as i32)
    }

    fn set_clip(&mut self, rect: PixelRect) {
        self.clip = rect.intersect(&self.bounds());
    }

    fn clear(&mut self, color: (u8, u8, u8)) {
        for chunk in self.frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&[color.0, color.1, color.2, 0xff]);
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y * self.width + x) * 4;
        let mut out = [0; 4];
        out.copy_from_slice(&self.frame[idx..idx + 4]);
        Some(out)
    }

    fn set_pixel(&mut self, x: i32, y: i32, color: (u8, u8, u8), alpha: f32) {
        if !self.clip.contains(x, y) {
            return;
        }
        let idx = (y as usize * self.width + x as usize) * 4;
        let a = alpha.clamp(0.0, 1.0);
        let src = [color.0 as f32, color.1 as f32, color.2 as f32];
        for (channel, value) in src.iter().enumerate() {
            let dst = self.frame[idx + channel] as f32;
            self.frame[idx + channel] = (value * a + dst * (1.0 - a)).round() as u8;
        }
        self.frame[idx + 3] = 0xff;
    }
}

// ============================================================================
// FRAME COMPOSITION
// ============================================================================

/// Draws one simulation frame into `canvas`.
pub fn render_frame(
    canvas: &mut Canvas,
    frame: &Frame,
    config: &SimulatorConfig,
    font: Option<&Font<'static>>,
) {
    let panels = Panels::layout(canvas.width, canvas.height, config);
    let mut scene = Scene::new();
    scene.add_command(DrawCommand::Clear(config.palette.background.as_tuple()));

    add_plane(&mut scene, frame, config, panels.graph);
    add_road(&mut scene, frame, config, panels.road);
    add_gauge(&mut scene, frame, config, panels.gauge);

    // Panel separators
    scene.add_command(DrawCommand::Clip(canvas.bounds()));
    let border = config.palette.panel_border;
    let x = panels.graph.x1 as f64;
    scene.line((x, 0.0), (x, canvas.height as f64), 1.0, border);
    let y = panels.road.y1 as f64;
    scene.line((x, y), (canvas.width as f64, y), 1.0, border);

    scene.render(canvas, font);
}

fn add_plane(scene: &mut Scene, frame: &Frame, config: &SimulatorConfig, panel: PixelRect) {
    let palette = &config.palette;
    scene.add_command(DrawCommand::Clip(panel));

    for segment in frame.grid.iter().filter(|s| touches(panel, s.from, s.to, 0.0)) {
        scene.line(
            (segment.from.x, segment.from.y),
            (segment.to.x, segment.to.y),
            config.grid_thickness,
            palette.grid,
        );
    }
    for axis in frame.axes.iter().filter(|s| touches(panel, s.from, s.to, 0.0)) {
        scene.line(
            (axis.from.x, axis.from.y),
            (axis.to.x, axis.to.y),
            config.axis_thickness,
            palette.axis,
        );
    }
    let labels = frame
        .axis_labels
        .iter()
        .filter(|l| touches(panel, l.at, l.at, LABEL_MARGIN));
    for label in labels {
        scene.add_command(DrawCommand::Text {
            x: label.at.x as i32,
            y: label.at.y as i32,
            text: label.value.to_string(),
            font_size: config.label_font_size,
            anchor: TextAnchor::BottomLeft,
            color: palette.text.as_tuple(),
        });
    }

    let references = frame
        .reference_points
        .iter()
        .filter(|r| touches(panel, r.at, r.at, LABEL_MARGIN));
    for reference in references {
        let (px, py) = (reference.at.x.round() as i32, reference.at.y.round() as i32);
        scene.add_command(DrawCommand::Circle {
            cx: px,
            cy: py,
            radius: config.reference_point_radius,
            color: palette.reference_point.as_tuple(),
        });
        scene.add_command(DrawCommand::Text {
            x: px + 10,
            y: py - 10,
            text: reference.text.to_string(),
            font_size: config.label_font_size,
            anchor: TextAnchor::BottomLeft,
            color: palette.reference_label.as_tuple(),
        });
    }

    for pair in frame.boundary.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if touches(panel, a, b, 0.0) {
            scene.line(
                (a.x, a.y),
                (b.x, b.y),
                config.boundary_thickness,
                frame.boundary_color,
            );
        }
    }
}

/// Room left around a point for the text drawn next to it.
const LABEL_MARGIN: f64 = 64.0;

/// Whether the bounding box of `a`-`b`, grown by `pad`, meets `panel`. Plane
/// geometry is unbounded once panned, so anything failing this is dropped
/// before it is cast to pixels. NaN never touches.
fn touches(panel: PixelRect, a: Point, b: Point, pad: f64) -> bool {
    a.x.min(b.x) < panel.x1 as f64 + pad
        && a.x.max(b.x) >= panel.x0 as f64 - pad
        && a.y.min(b.y) < panel.y1 as f64 + pad
        && a.y.max(b.y) >= panel.y0 as f64 - pad
}

fn add_road(scene: &mut Scene, frame: &Frame, config: &SimulatorConfig, panel: PixelRect) {
    let palette = &config.palette;
    let layout = &config.road;
    let (ox, oy) = (panel.x0, panel.y0);
    scene.add_command(DrawCommand::Clip(panel));

    scene.add_command(DrawCommand::Rect {
        rect: PixelRect::new(ox, oy + layout.road_top, panel.width(), layout.road_height),
        color: palette.road.as_tuple(),
    });
    let dash_y = (oy + layout.road_top + layout.road_height / 4) as f64;
    let mut dash_x = ox;
    while dash_x < panel.x1 {
        scene.line(
            (dash_x as f64, dash_y),
            ((dash_x + layout.dash_length) as f64, dash_y),
            layout.dash_thickness,
            palette.lane_marking,
        );
        dash_x += layout.dash_length + layout.dash_gap;
    }

    let car = frame.car;
    let car_rect = PixelRect::new(
        ox + car.x.round() as i32,
        oy + car.y.round() as i32,
        car.width as i32,
        car.height as i32,
    );
    scene.add_command(DrawCommand::Rect {
        rect: car_rect,
        color: palette.car.as_tuple(),
    });
    for wheel_x in [car_rect.x0 + 16, car_rect.x1 - 16] {
        scene.add_command(DrawCommand::Circle {
            cx: wheel_x,
            cy: car_rect.y1,
            radius: 7,
            color: (0x11, 0x11, 0x11),
        });
    }

    let obstacle = frame.obstacle;
    let obstacle_rect = PixelRect::new(
        ox + obstacle.x.round() as i32,
        oy + obstacle.y.round() as i32,
        obstacle.width as i32,
        obstacle.height as i32,
    );
    scene.add_command(DrawCommand::Rect {
        rect: obstacle_rect,
        color: palette.obstacle.as_tuple(),
    });
    let stripe_y = (obstacle_rect.y0 + obstacle_rect.height() / 2) as f64;
    scene.line(
        (obstacle_rect.x0 as f64, stripe_y),
        (obstacle_rect.x1 as f64, stripe_y),
        4.0,
        palette.lane_marking,
    );
}

fn add_gauge(scene: &mut Scene, frame: &Frame, config: &SimulatorConfig, panel: PixelRect) {
    let palette = &config.palette;
    let layout = &config.gauge;
    let gauge = &frame.gauge;
    let (ox, oy) = (panel.x0 as f64, panel.y0 as f64);
    scene.add_command(DrawCommand::Clip(panel));

    let (cx, cy) = (
        (ox + gauge.needle_pivot.x).round() as i32,
        (oy + gauge.needle_pivot.y).round() as i32,
    );

    let start = START_ANGLE_DEG.to_radians();
    let full_span = (END_ANGLE_DEG - START_ANGLE_DEG).to_radians();
    scene.add_command(DrawCommand::Arc {
        cx,
        cy,
        r: layout.radius as i32,
        thickness: layout.track_thickness,
        start_angle: start,
        arc_span: full_span,
        color: palette.gauge_track.as_tuple(),
    });
    if gauge.arc_fraction > 0.0 {
        scene.add_command(DrawCommand::Arc {
            cx,
            cy,
            r: layout.radius as i32,
            thickness: layout.value_thickness,
            start_angle: start,
            arc_span: full_span * gauge.arc_fraction,
            color: palette.bucket(gauge.color_bucket).as_tuple(),
        });
    }

    scene.add_command(DrawCommand::Line {
        x0: cx,
        y0: cy,
        x1: (ox + gauge.needle_end.x).round() as i32,
        y1: (oy + gauge.needle_end.y).round() as i32,
        thickness: layout.needle_width,
        tapered: true,
        color: palette.needle.as_tuple(),
    });
    scene.add_command(DrawCommand::Circle {
        cx,
        cy,
        radius: layout.pivot_radius,
        color: palette.needle.as_tuple(),
    });
    scene.add_command(DrawCommand::Text {
        x: cx,
        y: cy + layout.readout_offset,
        text: gauge.readout.to_string(),
        font_size: layout.readout_font_size,
        anchor: TextAnchor::Center,
        color: palette.text.as_tuple(),
    });

    let lamp_x = cx + layout.radius as i32 + layout.lamp_spacing * 2;
    for (i, (pedal, on, label)) in [
        (Pedal::Gas, palette.gas_lamp, "GAS"),
        (Pedal::Brake, palette.brake_lamp, "BRAKE"),
    ]
    .into_iter()
    .enumerate()
    {
        let lamp_y = cy - layout.lamp_spacing / 2 + i as i32 * layout.lamp_spacing;
        let color = if frame.pedal == pedal {
            on
        } else {
            palette.lamp_off
        };
        scene.add_command(DrawCommand::Circle {
            cx: lamp_x,
            cy: lamp_y,
            radius: layout.lamp_radius,
            color: color.as_tuple(),
        });
        scene.add_command(DrawCommand::Text {
            x: lamp_x + layout.lamp_radius + 8,
            y: lamp_y + layout.lamp_radius / 2,
            text: label.to_string(),
            font_size: config.label_font_size,
            anchor: TextAnchor::BottomLeft,
            color: palette.text.as_tuple(),
        });
    }

    scene.add_command(DrawCommand::Text {
        x: panel.x0 + 12,
        y: panel.y1 - 12,
        text: format!("mode: {}", frame.mode),
        font_size: config.label_font_size,
        anchor: TextAnchor::BottomLeft,
        color: palette.text.as_tuple(),
    });
}

// ============================================================================
// DRAWING PRIMITIVES
// ============================================================================

fn fill_rect(canvas: &mut Canvas, rect: PixelRect, color: (u8, u8, u8)) {
    let area = rect.intersect(&canvas.clip);
    if area.is_empty() {
        return;
    }
    for y in area.y0..area.y1 {
        for x in area.x0..area.x1 {
            canvas.set_pixel(x, y, color, 1.0);
        }
    }
}

fn draw_thick_line_aa(
    canvas: &mut Canvas,
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
    thickness: f32,
    tapered: bool,
    color: (u8, u8, u8),
) {
    let pad = thickness.ceil() as i32 + 1;
    let area = PixelRect {
        x0: x0.min(x1).saturating_sub(pad),
        y0: y0.min(y1).saturating_sub(pad),
        x1: x0.max(x1).saturating_add(pad + 1),
        y1: y0.max(y1).saturating_add(pad + 1),
    }
    .intersect(&canvas.clip);
    if area.is_empty() {
        return;
    }
    let dx = x1 as f32 - x0 as f32;
    let dy = y1 as f32 - y0 as f32;
    let len_sq = dx * dx + dy * dy;
    for y in area.y0..area.y1 {
        for x in area.x0..area.x1 {
            let px = x as f32 - x0 as f32;
            let py = y as f32 - y0 as f32;
            let t = if len_sq > 0.0 {
                ((px * dx + py * dy) / len_sq).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let lx = x0 as f32 + t * dx;
            let ly = y0 as f32 + t * dy;
            let dist = ((lx - x as f32).powi(2) + (ly - y as f32).powi(2)).sqrt();
            let local_thickness = if tapered {
                thickness * (1.0 - t * 0.95)
            } else {
                thickness
            };
            let aa = (1.0 - (dist - local_thickness / 2.0).clamp(0.0, 1.0)).clamp(0.0, 1.0);
            if aa > 0.01 {
                canvas.set_pixel(x, y, color, aa);
            }
        }
    }
}

fn draw_circle(canvas: &mut Canvas, cx: i32, cy: i32, radius: i32, color: (u8, u8, u8)) {
    for y in -radius - 1..=radius + 1 {
        for x in -radius - 1..=radius + 1 {
            let dist = ((x * x + y * y) as f64).sqrt();
            let aa = if dist > radius as f64 {
                1.0 - (dist - radius as f64).min(1.0)
            } else {
                1.0
            };
            if aa > 0.0 {
                canvas.set_pixel(cx.saturating_add(x), cy.saturating_add(y), color, aa as f32);
            }
        }
    }
}

/// Ring segment from `start_angle` sweeping `arc_span` radians, clockwise on screen.
fn render_arc(
    canvas: &mut Canvas,
    cx: i32,
    cy: i32,
    r: i32,
    thickness: i32,
    start_angle: f64,
    arc_span: f64,
    color: (u8, u8, u8),
) {
    let area = PixelRect::new(cx - r - 1, cy - r - 1, 2 * r + 3, 2 * r + 3).intersect(&canvas.clip);
    if area.is_empty() || arc_span <= 0.0 {
        return;
    }
    let tau = std::f64::consts::TAU;
    for y in area.y0..area.y1 {
        for x in area.x0..area.x1 {
            let dx = (x - cx) as f64;
            let dy = (y - cy) as f64;
            let dist = (dx * dx + dy * dy).sqrt();
            if dist < (r - thickness - 1) as f64 || dist > (r + 1) as f64 {
                continue;
            }
            let swept = (dy.atan2(dx) - start_angle).rem_euclid(tau);
            if swept > arc_span {
                continue;
            }
            let aa = if dist > r as f64 {
                1.0 - (dist - r as f64).min(1.0)
            } else if dist < (r - thickness) as f64 {
                1.0 - ((r - thickness) as f64 - dist).min(1.0)
            } else {
                1.0
            };
            if aa > 0.0 {
                canvas.set_pixel(x, y, color, aa as f32);
            }
        }
    }
}

fn draw_text(
    canvas: &mut Canvas,
    x: i32,
    y: i32,
    text: &str,
    font: &Font,
    scale: Scale,
    anchor: TextAnchor,
    color: (u8, u8, u8),
) {
    let v_metrics = font.v_metrics(scale);
    let glyphs: Vec<PositionedGlyph> = font
        .layout(text, scale, point(0.0, v_metrics.ascent))
        .collect();
    let (min_x, max_x, min_y, max_y) = glyphs.iter().filter_map(|g| g.pixel_bounding_box()).fold(
        (i32::MAX, i32::MIN, i32::MAX, i32::MIN),
        |(min_x, max_x, min_y, max_y), bb| {
            (
                min_x.min(bb.min.x),
                max_x.max(bb.max.x),
                min_y.min(bb.min.y),
                max_y.max(bb.max.y),
            )
        },
    );
    let width_px = if min_x < max_x { max_x - min_x } else { 0 };
    let height_px = if min_y < max_y { max_y - min_y } else { 0 };
    let (offset_x, offset_y) = match anchor {
        TextAnchor::Center => (x - width_px / 2, y - height_px / 2),
        TextAnchor::BottomLeft => (x, y - height_px),
    };
    for glyph in glyphs {
        if let Some(bb) = glyph.pixel_bounding_box() {
            glyph.draw(|gx, gy, v| {
                let px = offset_x + gx as i32 + bb.min.x - min_x;
                let py = offset_y + gy as i32 + bb.min.y - min_y;
                canvas.set_pixel(px, py, color, v);
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::FrameDriver;
    use crate::gauge::GaugeMapper;
    use crate::policy::PolicyMode;
    use crate::random::RngSource;
    use crate::view::ViewTransform;

    const WHITE: [u8; 4] = [0xff, 0xff, 0xff, 0xff];

    #[test]
    fn panels_tile_the_window() {
        let config = SimulatorConfig::default();
        let panels = Panels::layout(1200, 640, &config);
        assert_eq!(panels.graph, PixelRect::new(0, 0, 600, 640));
        assert_eq!(panels.road, PixelRect::new(600, 0, 600, 260));
        assert_eq!(panels.gauge, PixelRect::new(600, 260, 600, 380));
    }

    #[test]
    fn clip_confines_drawing() {
        let mut buffer = vec![0u8; 20 * 10 * 4];
        let mut canvas = Canvas::new(&mut buffer, 20, 10);
        canvas.clear((0xff, 0xff, 0xff));
        canvas.set_clip(PixelRect::new(0, 0, 10, 10));
        fill_rect(&mut canvas, PixelRect::new(-5, -5, 100, 100), (0, 0, 0));
        assert_eq!(canvas.pixel(9, 9), Some([0, 0, 0, 0xff]));
        assert_eq!(canvas.pixel(10, 0), Some(WHITE));
        assert_eq!(canvas.pixel(20, 0), None);
    }

    #[test]
    fn degenerate_line_draws_a_dot() {
        let mut buffer = vec![0u8; 10 * 10 * 4];
        let mut canvas = Canvas::new(&mut buffer, 10, 10);
        canvas.clear((0xff, 0xff, 0xff));
        draw_thick_line_aa(&mut canvas, 5, 5, 5, 5, 2.0, false, (0, 0, 0));
        assert_eq!(canvas.pixel(5, 5), Some([0, 0, 0, 0xff]));
        assert_eq!(canvas.pixel(0, 0), Some(WHITE));
    }

    #[test]
    fn arc_respects_its_span() {
        let mut buffer = vec![0u8; 41 * 41 * 4];
        let mut canvas = Canvas::new(&mut buffer, 41, 41);
        canvas.clear((0xff, 0xff, 0xff));
        // Quarter ring from 3 o'clock to 6 o'clock (screen y grows downwards).
        render_arc(
            &mut canvas,
            20,
            20,
            15,
            3,
            0.0,
            std::f64::consts::FRAC_PI_2,
            (0, 0, 0),
        );
        assert_ne!(canvas.pixel(34, 21), Some(WHITE));
        assert_ne!(canvas.pixel(21, 34), Some(WHITE));
        assert_eq!(canvas.pixel(6, 20), Some(WHITE));
        assert_eq!(canvas.pixel(20, 6), Some(WHITE));
    }

    #[test]
    fn whole_frame_renders_without_a_font() {
        let config = SimulatorConfig::default();
        let panels = Panels::layout(1200, 640, &config);
        let mut driver = FrameDriver::new(
            PolicyMode::Cautious,
            ViewTransform::centered(panels.graph.width() as f64, panels.graph.height() as f64),
            GaugeMapper::default(),
            RngSource::seeded(5),
        );
        let frame = driver.tick(panels.graph.width() as f64, panels.graph.height() as f64);

        let mut buffer = vec![0u8; 1200 * 640 * 4];
        let mut canvas = Canvas::new(&mut buffer, 1200, 640);
        render_frame(&mut canvas, &frame, &config, None);

        // The x axis crosses the middle of the plane in black.
        assert_eq!(canvas.pixel(50, 320), Some([0, 0, 0, 0xff]));
        // Road body under the car.
        let car = config.palette.car;
        let car_px = 600 + frame.car.x as usize + 40;
        let car_py = frame.car.y as usize + 10;
        assert_eq!(canvas.pixel(car_px, car_py), Some([car.r, car.g, car.b, 0xff]));
    }

    #[test]
    fn far_panned_plane_renders_empty() {
        let config = SimulatorConfig::default();
        let mut driver = FrameDriver::new(
            PolicyMode::Risky,
            ViewTransform::centered(600.0, 640.0),
            GaugeMapper::default(),
            RngSource::seeded(9),
        );
        let mut buffer = vec![0u8; 1200 * 640 * 4];
        for (dx, dy) in [(0.0, 3.0e9), (-3.0e9, 0.0), (5.0e12, -5.0e12)] {
            driver.pan(dx, dy);
            let frame = driver.tick(600.0, 640.0);
            let mut canvas = Canvas::new(&mut buffer, 1200, 640);
            render_frame(&mut canvas, &frame, &config, None);
            // Between grid lines, with both axes and the boundary far away.
            let background = config.palette.background;
            assert_eq!(
                canvas.pixel(340, 360),
                Some([background.r, background.g, background.b, 0xff])
            );
        }
    }

    #[test]
    fn saturated_line_endpoints_do_not_overflow() {
        let mut buffer = vec![0u8; 10 * 10 * 4];
        let mut canvas = Canvas::new(&mut buffer, 10, 10);
        canvas.clear((0xff, 0xff, 0xff));
        draw_thick_line_aa(&mut canvas, i32::MIN, 5, i32::MAX, 5, 2.0, false, (0, 0, 0));
        draw_thick_line_aa(&mut canvas, 0, i32::MAX, 9, i32::MAX, 2.0, true, (0, 0, 0));
        draw_circle(&mut canvas, i32::MAX, i32::MAX, 4, (0, 0, 0));
        assert_eq!(canvas.pixel(0, 0), Some(WHITE));
    }
}
