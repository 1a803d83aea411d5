// ============================================================================
// CRATE CONFIGURATION & IMPORTS
// ============================================================================

pub mod config;
pub mod error;
pub mod frame;
pub mod gauge;
pub mod policy;
pub mod random;
pub mod render;
pub mod simulation;
pub mod view;

pub use config::{Color, SimulatorConfig};
pub use error::{Result, SimulatorError};
pub use frame::{Frame, FrameDriver, InputEvent, SimulatorCommand};
pub use gauge::{ColorBucket, GaugeMapper, GaugeVisual};
pub use policy::{Policy, PolicyCatalog, PolicyMode};
pub use random::{RandomSource, RngSource};
pub use simulation::{BrakingSimulation, Pedal, Phase, SimulationState};
pub use view::{Point, ViewTransform};

// External crate imports
use log::{error, info, warn};
use pixels::{Pixels, SurfaceTexture};
use rusttype::Font;

// Standard library imports
use std::path::Path;
use std::sync::mpsc::Receiver;
use std::time::Instant;

// Window management imports
use winit::dpi::LogicalSize;
use winit::event::{ElementState, Event, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::WindowBuilder;

use render::{Canvas, Panels};

// ============================================================================
// PUBLIC API - MAIN INTERFACE
// ============================================================================

/// The windowed braking-policy simulator.
pub struct Simulator {
    config: SimulatorConfig,
    font: Option<Font<'static>>,
}

impl Simulator {
    /// Fails if a configured font cannot be loaded.
    pub fn new(config: SimulatorConfig) -> Result<Self> {
        let font = match &config.font_path {
            Some(path) => Some(load_font(path)?),
            None => {
                warn!("no font configured, labels and readout will not be drawn");
                None
            }
        };
        Ok(Self { config, font })
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    pub fn show(&self) -> Result<()> {
        self.run_window(None)
    }

    pub fn show_with_commands(&self, receiver: Receiver<SimulatorCommand>) -> Result<()> {
        self.run_window(Some(receiver))
    }

    fn random_source(&self) -> Box<dyn RandomSource> {
        match self.config.seed {
            Some(seed) => {
                info!("using seed {}", seed);
                Box::new(RngSource::seeded(seed))
            }
            None => Box::new(RngSource::from_os_rng()),
        }
    }

    fn run_window(&self, receiver: Option<Receiver<SimulatorCommand>>) -> Result<()> {
        let config = &self.config;

        let event_loop = EventLoop::new()?;
        let window = WindowBuilder::new()
            .with_title(&config.title)
            .with_inner_size(LogicalSize::new(
                config.window_width as f64,
                config.window_height as f64,
            ))
            .with_resizable(true)
            .build(&event_loop)?;

        let window = std::sync::Arc::new(window);
        let window_clone = window.clone();

        let size = window.inner_size();
        let mut fb_width = size.width as usize;
        let mut fb_height = size.height as usize;
        let surface_texture = SurfaceTexture::new(size.width, size.height, &window);
        let mut pixels = Pixels::new(size.width, size.height, surface_texture)?;

        let panels = Panels::layout(fb_width, fb_height, config);
        let mut driver = FrameDriver::new(
            config.initial_mode,
            ViewTransform::new(
                Point::new(
                    panels.graph.width() as f64 / 2.0,
                    panels.graph.height() as f64 / 2.0,
                ),
                config.initial_scale,
            ),
            GaugeMapper::default(),
            self.random_source(),
        );
        info!("starting with {} policy", config.initial_mode);

        let mut cursor = Point::default();
        let frame_duration = std::time::Duration::from_secs_f64(1.0 / config.max_framerate);
        let mut last_frame = Instant::now();

        event_loop.run(move |event, window_target| {
            window_target.set_control_flow(ControlFlow::Poll);
            let panels = Panels::layout(fb_width, fb_height, config);
            match event {
                Event::WindowEvent { event, .. } => match event {
                    WindowEvent::CloseRequested => {
                        window_target.exit();
                    }
                    WindowEvent::Resized(new_size) => {
                        fb_width = new_size.width as usize;
                        fb_height = new_size.height as usize;
                        if let Err(err) = pixels.resize_buffer(new_size.width, new_size.height) {
                            error!("resizing buffer failed: {}", err);
                        }
                        if let Err(err) = pixels.resize_surface(new_size.width, new_size.height) {
                            error!("resizing surface failed: {}", err);
                        }
                    }
                    WindowEvent::CursorMoved { position, .. } => {
                        cursor = Point::new(position.x, position.y);
                        driver.handle(InputEvent::DragMove(cursor));
                    }
                    WindowEvent::MouseInput {
                        state,
                        button: MouseButton::Left,
                        ..
                    } => match state {
                        ElementState::Pressed
                            if panels.graph.contains(cursor.x as i32, cursor.y as i32) =>
                        {
                            driver.handle(InputEvent::DragStart(cursor));
                        }
                        ElementState::Released => driver.handle(InputEvent::DragEnd),
                        _ => {}
                    },
                    WindowEvent::MouseWheel { delta, .. }
                        if panels.graph.contains(cursor.x as i32, cursor.y as i32) =>
                    {
                        // Scrolling towards the user zooms out.
                        let amount = match delta {
                            MouseScrollDelta::LineDelta(_, y) => -(y as f64),
                            MouseScrollDelta::PixelDelta(position) => -position.y,
                        };
                        if amount != 0.0 {
                            driver.handle(InputEvent::Wheel(amount));
                        }
                    }
                    WindowEvent::KeyboardInput {
                        event:
                            KeyEvent {
                                logical_key,
                                state: ElementState::Pressed,
                                ..
                            },
                        ..
                    } => match logical_key.as_ref() {
                        Key::Character("1") => driver.handle(InputEvent::SelectMode(PolicyMode::Cautious)),
                        Key::Character("2") => driver.handle(InputEvent::SelectMode(PolicyMode::Risky)),
                        Key::Character("3") => driver.handle(InputEvent::SelectMode(PolicyMode::Timid)),
                        Key::Character("r") | Key::Character("R") => driver.handle(InputEvent::Reset),
                        Key::Named(NamedKey::Escape) => window_target.exit(),
                        _ => {}
                    },
                    WindowEvent::RedrawRequested => {
                        if let Some(ref receiver) = receiver {
                            driver.drain_commands(receiver);
                        }
                        let frame = driver.tick(
                            panels.graph.width() as f64,
                            panels.graph.height() as f64,
                        );

                        let mut canvas = Canvas::new(pixels.frame_mut(), fb_width, fb_height);
                        render::render_frame(&mut canvas, &frame, config, self.font.as_ref());
                        if let Err(err) = pixels.render() {
                            error!("render failed: {}", err);
                            window_target.exit();
                        }
                    }
                    _ => {}
                },
                Event::AboutToWait => {
                    if last_frame.elapsed() >= frame_duration {
                        window_clone.request_redraw();
                        last_frame = Instant::now();
                    }
                }
                _ => {}
            }
        })?;

        Ok(())
    }
}

fn load_font(path: &Path) -> Result<Font<'static>> {
    let data = std::fs::read(path).map_err(|source| SimulatorError::FontIo {
        path: path.to_path_buf(),
        source,
    })?;
    let font =
        Font::try_from_vec(data).ok_or_else(|| SimulatorError::FontParse(path.to_path_buf()))?;
    info!("loaded font {}", path.display());
    Ok(font)
}
