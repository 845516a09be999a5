mod pixel_buffer;

pub use pixel_buffer::{PixelBuffer, BYTES_PER_PIXEL};

use sdl2::event::Event;
use sdl2::mouse::MouseButton;
use sdl2::pixels::PixelFormatEnum;
use sdl2::render::{Canvas, Texture, TextureCreator};
use sdl2::video::{Window, WindowContext};
use sdl2::{EventPump, Sdl};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::input::{InputEvent, InputSnapshot, InputState, MouseButtonKind};

pub const DEFAULT_WIDTH: u32 = 1024;
pub const DEFAULT_HEIGHT: u32 = 768;

/// Anything that can show a finished frame and report input.
///
/// The frame loop depends only on this trait; how the pixels reach the
/// screen is the implementor's business.
pub trait PresentationSurface {
    /// Upload `buffer` and show it. Blocks until the backend's present returns.
    fn present(&mut self, buffer: &PixelBuffer) -> Result<()>;

    /// Drain pending window/input events and return the resulting state
    fn poll_events(&mut self) -> InputSnapshot;
}

/// How the window should be created
#[derive(Debug, Clone)]
pub struct DisplayOptions {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Window pixels per buffer pixel
    pub zoom: f32,
    /// Borderless fullscreen at desktop resolution; overrides width/height
    pub fullscreen: bool,
    pub vsync: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            title: "framekit".to_string(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            zoom: 1.0,
            fullscreen: false,
            vsync: true,
        }
    }
}

pub struct Display {
    canvas: Canvas<Window>,
    event_pump: EventPump,
    input: InputState,
    width: u32,
    height: u32,
    inv_zoom: f32,
}

pub struct RenderTarget<'a> {
    texture: Texture<'a>,
    width: u32,
    height: u32,
}

impl Display {
    /// Create the window and renderer.
    ///
    /// `width()`/`height()` afterwards report the buffer size to use, which in
    /// fullscreen mode is the desktop resolution rather than the requested one.
    pub fn with_options(
        sdl: &Sdl,
        options: &DisplayOptions,
    ) -> Result<(Self, TextureCreator<WindowContext>)> {
        let video_subsystem = sdl.video().map_err(Error::BackendInit)?;

        let (width, height) = if options.fullscreen {
            let mode = video_subsystem
                .desktop_display_mode(0)
                .map_err(Error::BackendInit)?;
            (mode.w as u32, mode.h as u32)
        } else {
            (options.width, options.height)
        };
        let zoom = if options.zoom > 0.0 { options.zoom } else { 1.0 };

        let mut builder = video_subsystem.window(
            &options.title,
            (width as f32 * zoom) as u32,
            (height as f32 * zoom) as u32,
        );
        if options.fullscreen {
            builder.fullscreen_desktop();
        } else {
            builder.position_centered();
        }
        let window = builder
            .build()
            .map_err(|e| Error::BackendInit(e.to_string()))?;

        let mut canvas_builder = window.into_canvas().accelerated();
        if options.vsync {
            canvas_builder = canvas_builder.present_vsync();
        }
        let canvas = canvas_builder
            .build()
            .map_err(|e| Error::BackendInit(e.to_string()))?;

        let texture_creator = canvas.texture_creator();
        let event_pump = sdl.event_pump().map_err(Error::BackendInit)?;

        info!(
            width,
            height,
            zoom,
            fullscreen = options.fullscreen,
            vsync = options.vsync,
            "window created"
        );

        Ok((
            Self {
                canvas,
                event_pump,
                input: InputState::new(),
                width,
                height,
                inv_zoom: 1.0 / zoom,
            },
            texture_creator,
        ))
    }

    /// Buffer width (window width divided by zoom)
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Keep the pointer inside the window while it has focus
    pub fn confine_mouse(&mut self, confine: bool) {
        self.canvas.window_mut().set_mouse_grab(confine);
    }

    pub fn present(&mut self, target: &mut RenderTarget, buffer: &PixelBuffer) -> Result<()> {
        if buffer.width() != target.width || buffer.height() != target.height {
            return Err(Error::InvalidDimensions(format!(
                "buffer is {}x{} but render target is {}x{}",
                buffer.width(),
                buffer.height(),
                target.width,
                target.height
            )));
        }
        target
            .texture
            .update(None, buffer.as_bytes(), buffer.pitch())
            .map_err(|e| Error::Backend(e.to_string()))?;

        self.canvas.clear();
        self.canvas
            .copy(&target.texture, None, None)
            .map_err(Error::Backend)?;
        self.canvas.present();
        Ok(())
    }

    pub fn poll_events(&mut self) -> InputSnapshot {
        let inv_zoom = self.inv_zoom;
        let scale = |x: i32, y: i32| {
            (
                (x as f32 * inv_zoom) as i32,
                (y as f32 * inv_zoom) as i32,
            )
        };

        for event in self.event_pump.poll_iter() {
            let translated = match event {
                Event::Quit { .. } => Some(InputEvent::Quit),
                Event::KeyDown {
                    keycode: Some(k), ..
                } => Some(InputEvent::KeyDown(k)),
                Event::KeyUp {
                    keycode: Some(k), ..
                } => Some(InputEvent::KeyUp(k)),
                Event::MouseMotion { x, y, .. } => {
                    let (x, y) = scale(x, y);
                    Some(InputEvent::MouseMove { x, y })
                },
                Event::MouseButtonDown {
                    x, y, mouse_btn, ..
                } => map_mouse_button(mouse_btn).map(|button| {
                    let (x, y) = scale(x, y);
                    InputEvent::MouseDown { x, y, button }
                }),
                Event::MouseButtonUp {
                    x, y, mouse_btn, ..
                } => map_mouse_button(mouse_btn).map(|button| {
                    let (x, y) = scale(x, y);
                    InputEvent::MouseUp { x, y, button }
                }),
                Event::MouseWheel { y, .. } => Some(InputEvent::MouseWheel(y)),
                Event::ControllerDeviceAdded { which, .. } => {
                    debug!(which, "controller added");
                    Some(InputEvent::ControllerAdded(which))
                },
                Event::ControllerDeviceRemoved { which, .. } => {
                    debug!(which, "controller removed");
                    Some(InputEvent::ControllerRemoved(which))
                },
                _ => None,
            };
            if let Some(ev) = translated {
                self.input.apply(&ev);
            }
        }

        self.input.snapshot()
    }
}

impl<'a> RenderTarget<'a> {
    /// Streaming RGB24 texture matching a buffer of `width` x `height`
    pub fn with_size(
        texture_creator: &'a TextureCreator<WindowContext>,
        width: u32,
        height: u32,
    ) -> Result<Self> {
        let texture = texture_creator
            .create_texture_streaming(PixelFormatEnum::RGB24, width, height)
            .map_err(|e| Error::BackendInit(e.to_string()))?;
        Ok(Self {
            texture,
            width,
            height,
        })
    }
}

/// A window plus the texture frames are uploaded into
pub struct WindowSurface<'a> {
    display: Display,
    target: RenderTarget<'a>,
}

impl<'a> WindowSurface<'a> {
    pub fn new(display: Display, target: RenderTarget<'a>) -> Self {
        Self { display, target }
    }

    pub fn display(&self) -> &Display {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut Display {
        &mut self.display
    }
}

impl PresentationSurface for WindowSurface<'_> {
    fn present(&mut self, buffer: &PixelBuffer) -> Result<()> {
        self.display.present(&mut self.target, buffer)
    }

    fn poll_events(&mut self) -> InputSnapshot {
        self.display.poll_events()
    }
}

fn map_mouse_button(btn: MouseButton) -> Option<MouseButtonKind> {
    match btn {
        MouseButton::Left => Some(MouseButtonKind::Left),
        MouseButton::Right => Some(MouseButtonKind::Right),
        MouseButton::Middle => Some(MouseButtonKind::Middle),
        _ => None,
    }
}
