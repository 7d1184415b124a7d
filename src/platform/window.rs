use glutin::{
    config::{Config, ConfigTemplateBuilder},
    context::{ContextApi, ContextAttributesBuilder, GlProfile, PossiblyCurrentContext, Version},
    display::{Display, GetGlDisplay},
    prelude::*,
    surface::{Surface, SwapInterval, WindowSurface},
};
use glutin_winit::{DisplayBuilder, GlWindow};
use log::{debug, info, warn};
use raw_window_handle::HasRawWindowHandle;
use std::{collections::HashSet, ffi::CString, num::NonZeroU32, ptr, time::Duration};
use thiserror::Error;
use winit::{
    dpi::LogicalSize,
    event::{ElementState, Event, KeyEvent, WindowEvent},
    event_loop::{EventLoop, EventLoopBuilder},
    keyboard::{KeyCode, PhysicalKey},
    platform::pump_events::{EventLoopExtPumpEvents, PumpStatus},
    window::{Window, WindowBuilder},
};

use crate::config::WindowConfig;
use crate::render::frame::{PresentSurface, SurfaceEvent};

/// GL symbols the tutorial programs call. Any of these missing means the
/// driver cannot run them at all.
pub const REQUIRED_ENTRY_POINTS: &[&str] = &[
    "glCreateShader",
    "glShaderSource",
    "glCompileShader",
    "glCreateProgram",
    "glAttachShader",
    "glLinkProgram",
    "glUseProgram",
    "glGenVertexArrays",
    "glBindVertexArray",
    "glGenBuffers",
    "glBufferData",
    "glVertexAttribPointer",
    "glClearColor",
    "glClear",
    "glDrawArrays",
    "glViewport",
];

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("Failed to create event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("Failed to create window: {0}")]
    WindowCreation(String),
    #[error("OpenGL context error: {0}")]
    Context(#[from] glutin::error::Error),
    #[error("Failed to resolve OpenGL entry point {0}")]
    MissingEntryPoint(&'static str),
}

/// A window with a current OpenGL 3.3 core context, polled from the render
/// loop instead of driving it.
pub struct ContextWindow {
    // Field order is drop order: surface and context go before the window,
    // the event loop goes last.
    gl_surface: Surface<WindowSurface>,
    gl_context: PossiblyCurrentContext,
    window: Window,
    event_loop: EventLoop<()>,
    pressed: HashSet<KeyCode>,
}

impl ContextWindow {
    pub fn create(config: &WindowConfig) -> Result<(Self, glow::Context), BootstrapError> {
        info!(
            "Creating {}x{} window \"{}\"",
            config.width, config.height, config.title
        );

        let event_loop = EventLoopBuilder::new().build()?;
        let window_builder = WindowBuilder::new()
            .with_title(config.title.as_str())
            .with_inner_size(LogicalSize::new(config.width, config.height));

        let template = ConfigTemplateBuilder::new().with_alpha_size(8);
        let display_builder = DisplayBuilder::new().with_window_builder(Some(window_builder));

        let (window, gl_config) = display_builder
            .build(&event_loop, template, pick_config)
            .map_err(|e| BootstrapError::WindowCreation(e.to_string()))?;
        let window = window.ok_or_else(|| {
            BootstrapError::WindowCreation("display builder returned no window".to_string())
        })?;

        let context_attributes = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
            .with_profile(GlProfile::Core)
            .build(Some(window.raw_window_handle()));

        let gl_display = gl_config.display();
        let not_current = unsafe { gl_display.create_context(&gl_config, &context_attributes)? };

        let attrs = window.build_surface_attributes(<_>::default());
        let gl_surface = unsafe { gl_display.create_window_surface(&gl_config, &attrs)? };
        let gl_context = not_current.make_current(&gl_surface)?;

        if config.vsync {
            if let Err(e) =
                gl_surface.set_swap_interval(&gl_context, SwapInterval::Wait(NonZeroU32::MIN))
            {
                warn!("Could not enable vsync: {}", e);
            }
        }

        let gl = load_gl(&gl_display)?;
        info!("OpenGL context ready");

        Ok((
            Self {
                gl_surface,
                gl_context,
                window,
                event_loop,
                pressed: HashSet::new(),
            },
            gl,
        ))
    }

    /// Tears the windowing side down. Everything created from the returned
    /// `glow::Context` must already be dropped.
    pub fn terminate(self) {
        info!("Terminating window and OpenGL context");
        drop(self);
    }
}

impl PresentSurface for ContextWindow {
    type Error = glutin::error::Error;

    fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.pressed.contains(&key)
    }

    fn poll_events(&mut self) -> Vec<SurfaceEvent> {
        let Self {
            event_loop,
            pressed,
            gl_surface,
            gl_context,
            ..
        } = self;
        let mut events = Vec::new();

        let status = event_loop.pump_events(Some(Duration::ZERO), |event, _| {
            let Event::WindowEvent { event, .. } = event else {
                return;
            };
            match event {
                WindowEvent::CloseRequested => events.push(SurfaceEvent::CloseRequested),
                WindowEvent::Resized(size) => {
                    // A minimized window reports zero; the surface keeps its old size.
                    if let (Some(width), Some(height)) =
                        (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
                    {
                        gl_surface.resize(gl_context, width, height);
                    }
                    events.push(SurfaceEvent::Resized {
                        width: size.width,
                        height: size.height,
                    });
                }
                WindowEvent::KeyboardInput {
                    event:
                        KeyEvent {
                            physical_key: PhysicalKey::Code(code),
                            state,
                            ..
                        },
                    ..
                } => match state {
                    ElementState::Pressed => {
                        pressed.insert(code);
                    }
                    ElementState::Released => {
                        pressed.remove(&code);
                    }
                },
                WindowEvent::Focused(false) => pressed.clear(),
                _ => {}
            }
        });

        if let PumpStatus::Exit(code) = status {
            debug!("Event loop exited with code {}", code);
            events.push(SurfaceEvent::CloseRequested);
        }
        events
    }

    fn swap_buffers(&mut self) -> Result<(), Self::Error> {
        self.window.pre_present_notify();
        self.gl_surface.swap_buffers(&self.gl_context)
    }
}

fn pick_config(configs: Box<dyn Iterator<Item = Config> + '_>) -> Config {
    // DisplayBuilder::build returns Err before invoking the picker when no
    // config matches the template; the iterator always yields at least one.
    configs
        .reduce(|accum, config| {
            if config.num_samples() > accum.num_samples() {
                config
            } else {
                accum
            }
        })
        .expect("display offered no GL configs")
}

/// Resolves GL entry points through the display, failing on the first
/// required symbol the driver does not export.
fn load_gl(display: &Display) -> Result<glow::Context, BootstrapError> {
    for &name in REQUIRED_ENTRY_POINTS {
        let symbol = CString::new(name).map_err(|_| BootstrapError::MissingEntryPoint(name))?;
        if display.get_proc_address(&symbol).is_null() {
            return Err(BootstrapError::MissingEntryPoint(name));
        }
    }
    debug!("Resolved {} required GL entry points", REQUIRED_ENTRY_POINTS.len());

    Ok(unsafe {
        glow::Context::from_loader_function(|symbol| {
            CString::new(symbol)
                .map(|symbol| display.get_proc_address(&symbol))
                .unwrap_or(ptr::null())
        })
    })
}
