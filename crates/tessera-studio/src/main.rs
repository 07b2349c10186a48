mod scene;

use std::cell::Cell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{Context, Result};
use tessera_engine::canvas::{CanvasConfig, CanvasHost};
use tessera_engine::coords::{Point2D, Rectangle};
use tessera_engine::device::Surface;
use tessera_engine::host::{HostEvent, HostWidget};
use tessera_engine::logging::{init_logging, LoggingConfig};
use tessera_engine::paint::{Color, FontSlant, FontWeight};
use tessera_engine::render::Renderer;
use tessera_engine::text::FontSystem;

const CANVAS: &str = "MainCanvas";

const SYSTEM_FONTS: [&str; 5] = [
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
];

/// Stand-in widget that writes every presented frame to a PNG file.
struct SnapshotWidget {
    size: Cell<(u32, u32)>,
    out_dir: PathBuf,
    frames: Cell<u32>,
    dirty: Cell<bool>,
}

impl SnapshotWidget {
    fn new(out_dir: PathBuf, width: u32, height: u32) -> Self {
        Self {
            size: Cell::new((width, height)),
            out_dir,
            frames: Cell::new(0),
            dirty: Cell::new(false),
        }
    }
}

impl HostWidget for SnapshotWidget {
    fn pixel_size(&self) -> (u32, u32) {
        self.size.get()
    }

    fn queue_draw(&self) {
        self.dirty.set(true);
    }

    fn present(&self, surface: &Surface) {
        self.dirty.set(false);
        let index = self.frames.get();
        self.frames.set(index + 1);

        let path = self.out_dir.join(format!("frame-{index:02}.png"));
        match surface.save_png(&path) {
            Ok(()) => log::info!(
                "presented {}x{} frame to {}",
                surface.width(),
                surface.height(),
                path.display()
            ),
            Err(e) => log::warn!("{e:#}"),
        }
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let mut args = std::env::args().skip(1);
    let out_dir = PathBuf::from(args.next().unwrap_or_else(|| "tessera-out".to_string()));
    let font_path = args.next().map(PathBuf::from);

    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;

    let mut host = CanvasHost::new(load_fonts(font_path.as_deref())?);
    host.add_canvas(CanvasConfig::default(), scene::draw_scene)?;

    // The widget only reports a size once it is "shown".
    let widget = Rc::new(SnapshotWidget::new(out_dir.clone(), 800, 600));
    host.initialize_canvas(CANVAS, widget.clone())?;
    paint_pending(&mut host, &widget)?;

    widget.size.set((1024, 768));
    let resized = HostEvent::Resized {
        width: 1024,
        height: 768,
    };
    host.dispatch(CANVAS, resized)?;
    paint_pending(&mut host, &widget)?;

    if let Some(canvas) = host.canvas_mut(CANVAS) {
        canvas.camera_mut().zoom(Point2D::new(500.0, 500.0), 2.0);
        canvas.redraw();

        if let Some(mut overlay) = canvas.create_temporary_renderer() {
            overlay.set_color_with_alpha(Color::YELLOW, 96);
            overlay.fill_arc(Point2D::new(500.0, 500.0), 40.0, 0.0, 360.0);
        }
        canvas.camera_mut().reset_world();
    }
    paint_pending(&mut host, &widget)?;

    export_snapshot(&host, 400, 300, &out_dir.join("export-400x300.png"))?;

    log::info!("wrote {} frames to {}", widget.frames.get(), out_dir.display());
    Ok(())
}

/// Answers a queued draw the way a toolkit's paint cycle would.
fn paint_pending(host: &mut CanvasHost, widget: &SnapshotWidget) -> Result<()> {
    if widget.dirty.get() {
        host.dispatch(CANVAS, HostEvent::RepaintRequested)?;
    }
    Ok(())
}

/// Renders the scene off-screen at an arbitrary size, independent of the
/// canvas surface.
fn export_snapshot(host: &CanvasHost, width: u32, height: u32, path: &Path) -> Result<()> {
    let canvas = host.canvas(CANVAS).context("main canvas missing")?;

    let mut camera = canvas.camera().clone();
    let screen = Point2D::new(width as f64, height as f64);
    camera.update_screen(Rectangle::new(Point2D::zero(), screen));

    let surface = Surface::new(width, height)?;
    surface.clear(canvas.background());
    {
        let mut renderer = Renderer::vector_only(&camera, &surface, host.fonts());
        scene::draw_scene(&mut renderer);
    }

    surface.save_png(path)?;
    log::info!("exported {width}x{height} snapshot to {}", path.display());
    Ok(())
}

fn load_fonts(explicit: Option<&Path>) -> Result<FontSystem> {
    let mut fonts = FontSystem::new();

    let bytes = match explicit {
        Some(path) => Some(
            std::fs::read(path)
                .with_context(|| format!("failed to read font {}", path.display()))?,
        ),
        None => SYSTEM_FONTS.iter().find_map(|p| std::fs::read(p).ok()),
    };

    match bytes {
        Some(bytes) => {
            fonts
                .load_font("sans-serif", FontSlant::Normal, FontWeight::Normal, &bytes)
                .context("failed to parse font")?;
        }
        None => log::warn!(
            "no font found; text will not be drawn (pass a .ttf path as the second argument)"
        ),
    }

    Ok(fonts)
}
