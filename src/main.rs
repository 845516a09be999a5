use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use framekit::config::DEFAULT_CONFIG_PATH;
use framekit::display::RenderTarget;
use framekit::{
    Bounce, Config, Controllers, Display, FpsCounter, PixelBuffer, SoundManager, SpriteImage, Step,
    WindowSurface,
};

/// How often the frame-rate summary is logged
const FPS_LOG_FRAMES: u64 = 600;

#[derive(Debug, Parser)]
#[command(name = "framekit", version, about = "Bouncing-sprite demo on a software framebuffer")]
struct Args {
    /// Buffer width in pixels
    #[arg(short = 'W', long)]
    width: Option<u32>,

    /// Buffer height in pixels
    #[arg(short = 'H', long)]
    height: Option<u32>,

    /// Buffer size as WxH, e.g. 1920x1080
    #[arg(short, long, value_parser = parse_resolution)]
    resolution: Option<(u32, u32)>,

    /// Window pixels per buffer pixel
    #[arg(short, long)]
    zoom: Option<f32>,

    /// Borderless fullscreen at desktop resolution
    #[arg(long)]
    fullscreen: bool,

    /// Disable VSync for an uncapped frame rate
    #[arg(long)]
    no_vsync: bool,

    /// JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Sprite image
    #[arg(long)]
    sprite: Option<PathBuf>,

    /// Looping music track (WAV)
    #[arg(long)]
    music: Option<PathBuf>,

    /// Sound played when the sprite escapes (WAV)
    #[arg(long)]
    sound: Option<PathBuf>,
}

fn parse_resolution(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WxH, got '{s}'"))?;
    let w = w.trim().parse::<u32>().map_err(|e| e.to_string())?;
    let h = h.trim().parse::<u32>().map_err(|e| e.to_string())?;
    if w == 0 || h == 0 {
        return Err("resolution must be non-zero".to_string());
    }
    Ok((w, h))
}

impl Args {
    /// Load the config file and lay command-line overrides on top
    fn into_config(self) -> framekit::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => {
                let path = PathBuf::from(DEFAULT_CONFIG_PATH);
                if path.exists() {
                    Config::load(&path)?
                } else {
                    debug!("no {} found, using defaults", DEFAULT_CONFIG_PATH);
                    Config::default()
                }
            },
        };

        if let Some(w) = self.width {
            config.width = w;
        }
        if let Some(h) = self.height {
            config.height = h;
        }
        if let Some((w, h)) = self.resolution {
            config.width = w;
            config.height = h;
        }
        if let Some(zoom) = self.zoom {
            config.zoom = zoom;
        }
        config.fullscreen |= self.fullscreen;
        if self.no_vsync {
            config.vsync = false;
        }
        if let Some(sprite) = self.sprite {
            config.sprite = sprite;
        }
        if self.music.is_some() {
            config.music = self.music;
        }
        if self.sound.is_some() {
            config.explosion = self.sound;
        }
        Ok(config)
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if e.is_fatal_startup() {
                error!(error = %e, "startup failed");
            } else {
                error!(error = %e, "exiting");
            }
            ExitCode::FAILURE
        },
    }
}

fn run(args: Args) -> framekit::Result<()> {
    let config = args.into_config()?;

    let sdl = sdl2::init().map_err(framekit::Error::BackendInit)?;
    let (display, texture_creator) = Display::with_options(&sdl, &config.display_options())?;
    let (width, height) = (display.width(), display.height());
    let target = RenderTarget::with_size(&texture_creator, width, height)?;
    let mut surface = WindowSurface::new(display, target);
    let mut buffer = PixelBuffer::with_background(width, height, config.background)?;

    let mut sound = SoundManager::new(&sdl, config.voices_per_sound)?;
    let explosion = match &config.explosion {
        Some(path) => {
            sound.load(path)?;
            Some(path.to_string_lossy().into_owned())
        },
        None => None,
    };
    if let Some(path) = &config.music {
        sound.load_music(path)?;
        sound.play_music();
    }

    let mut controllers = Controllers::new(&sdl)?;

    let sprite = SpriteImage::load(&config.sprite)?;
    info!(
        path = %config.sprite.display(),
        width = sprite.width(),
        height = sprite.height(),
        alpha = sprite.has_alpha(),
        "sprite loaded"
    );
    let mut bounce = Bounce::new(sprite, config.start, config.speed, buffer.extent())?;

    info!("=== framekit ===");
    info!("Resolution: {}x{}", width, height);
    if config.vsync {
        info!("VSync: ON. Use --no-vsync for uncapped.");
    } else {
        info!("VSync: OFF (uncapped framerate)");
    }
    info!("Controls:");
    info!("  W/A/S/D     - Move the sprite");
    info!("  D-pad/stick - Move the sprite (gamepad)");
    info!("  Escape      - Quit (Back on a gamepad)");

    let mut fps_counter = FpsCounter::new(60);
    let mut frames: u64 = 0;

    loop {
        let (_dt, avg_fps) = fps_counter.tick();

        match bounce.frame(&mut surface, &mut buffer, Some(&mut controllers))? {
            Step::Quit => break,
            Step::Continue { escaped, .. } => {
                if escaped {
                    if let Some(name) = &explosion {
                        if let Err(e) = sound.play(name) {
                            warn!(error = %e, "could not play explosion");
                        }
                    }
                    if let Some(pad) = controllers.player_mut(0) {
                        pad.vibrate(0.6, 0.3, 200);
                    }
                }
            },
        }

        frames += 1;
        if frames % FPS_LOG_FRAMES == 0 {
            let (min_fps, max_fps) = fps_counter.min_max_fps();
            debug!(
                avg = avg_fps as u32,
                min = min_fps as u32,
                max = max_fps as u32,
                ms = fps_counter.avg_frame_time_ms() as u32,
                escapes = bounce.escapes(),
                "fps"
            );
        }
    }

    info!(frames, escapes = bounce.escapes(), "bye");
    Ok(())
}
