//! Per-tick orchestration: input handling, one simulation step, and the
//! screen-space geometry every panel needs to draw the frame.

use std::sync::mpsc::Receiver;

use log::info;

use crate::config::Color;
use crate::gauge::{GaugeMapper, GaugeVisual};
use crate::policy::{Policy, PolicyCatalog, PolicyMode};
use crate::random::RandomSource;
use crate::simulation::{
    BrakingSimulation, Pedal, StepReport, CAR_HEIGHT, CAR_WIDTH, LANE_Y, OBSTACLE_HEIGHT,
    OBSTACLE_WIDTH,
};
use crate::view::{AxisLabel, Point, Segment, ViewTransform, REFERENCE_POINTS};

/// Input events consumed between ticks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    SelectMode(PolicyMode),
    DragStart(Point),
    DragMove(Point),
    DragEnd,
    Wheel(f64),
    Reset,
}

/// Commands sent from another thread, applied at the start of the next tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimulatorCommand {
    SelectMode(PolicyMode),
    Pan(f64, f64),
    Zoom(f64),
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedLabel {
    pub at: Point,
    pub text: &'static str,
}

/// Everything the renderer needs for one frame. Plane geometry is in
/// graph-panel pixels, road rectangles in road-panel pixels.
#[derive(Debug, Clone)]
pub struct Frame {
    pub mode: PolicyMode,
    pub grid: Vec<Segment>,
    pub axes: [Segment; 2],
    pub axis_labels: Vec<AxisLabel>,
    pub boundary: Vec<Point>,
    pub boundary_color: Color,
    pub reference_points: Vec<PlacedLabel>,
    pub car: Rect,
    pub obstacle: Rect,
    pub speed: f64,
    pub pedal: Pedal,
    pub gauge: GaugeVisual,
    pub step: StepReport,
}

pub struct FrameDriver<R: RandomSource> {
    catalog: PolicyCatalog,
    active: Policy,
    simulation: BrakingSimulation,
    view: ViewTransform,
    gauge: GaugeMapper,
    rng: R,
}

impl<R: RandomSource> FrameDriver<R> {
    pub fn new(mode: PolicyMode, view: ViewTransform, gauge: GaugeMapper, rng: R) -> Self {
        let catalog = PolicyCatalog::new();
        Self {
            active: catalog.get(mode),
            catalog,
            simulation: BrakingSimulation::new(),
            view,
            gauge,
            rng,
        }
    }

    pub fn with_simulation(mut self, simulation: BrakingSimulation) -> Self {
        self.simulation = simulation;
        self
    }

    pub fn policy(&self) -> &Policy {
        &self.active
    }

    pub fn simulation(&self) -> &BrakingSimulation {
        &self.simulation
    }

    pub fn view(&self) -> &ViewTransform {
        &self.view
    }

    pub fn select_mode(&mut self, mode: PolicyMode) {
        if mode != self.active.mode {
            info!("policy {} -> {}", self.active.mode, mode);
        }
        self.active = self.catalog.get(mode);
    }

    pub fn handle(&mut self, event: InputEvent) {
        match event {
            InputEvent::SelectMode(mode) => self.select_mode(mode),
            InputEvent::DragStart(at) => self.view.begin_drag(at),
            InputEvent::DragMove(at) => self.view.drag_to(at),
            InputEvent::DragEnd => self.view.end_drag(),
            InputEvent::Wheel(delta) => self.view.zoom_by(delta),
            InputEvent::Reset => self.simulation.reset(&mut self.rng),
        }
    }

    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.view.pan(dx, dy);
    }

    pub fn apply(&mut self, command: SimulatorCommand) {
        match command {
            SimulatorCommand::SelectMode(mode) => self.select_mode(mode),
            SimulatorCommand::Pan(dx, dy) => self.pan(dx, dy),
            SimulatorCommand::Zoom(delta) => self.view.zoom_by(delta),
            SimulatorCommand::Reset => self.simulation.reset(&mut self.rng),
        }
    }

    /// Applies every queued command without blocking.
    pub fn drain_commands(&mut self, receiver: &Receiver<SimulatorCommand>) {
        while let Ok(command) = receiver.try_recv() {
            self.apply(command);
        }
    }

    /// Advances the simulation once and lays out a `graph_width` x `graph_height` plane.
    pub fn tick(&mut self, graph_width: f64, graph_height: f64) -> Frame {
        let step = self.simulation.step(&self.active, &mut self.rng);
        let state = *self.simulation.state();

        let view = &self.view;
        let reference_points = REFERENCE_POINTS
            .iter()
            .map(|p| PlacedLabel {
                at: view.to_screen(p.at.x, p.at.y),
                text: p.label,
            })
            .collect();

        Frame {
            mode: self.active.mode,
            grid: view.grid_lines(graph_width, graph_height),
            axes: view.axes(graph_width, graph_height),
            axis_labels: view.axis_labels(graph_width, graph_height),
            boundary: view.line_polyline(self.active.slope, self.active.intercept),
            boundary_color: self.active.color,
            reference_points,
            car: Rect {
                x: state.car_position,
                y: LANE_Y,
                width: CAR_WIDTH,
                height: CAR_HEIGHT,
            },
            obstacle: Rect {
                x: state.obstacle_position,
                y: LANE_Y + 6.0,
                width: OBSTACLE_WIDTH,
                height: OBSTACLE_HEIGHT,
            },
            speed: state.speed,
            pedal: step.pedal,
            gauge: self.gauge.map(state.speed, &mut self.rng),
            step,
        }
    }
}
