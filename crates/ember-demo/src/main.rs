use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use ember_engine::coords::{Size2, Vec2};
use ember_engine::core::{App, AppControl, FrameCtx, Runtime, RuntimeConfig};
use ember_engine::graphics::RendererConfig;
use ember_engine::graphics::headless::HeadlessDevice;
use ember_engine::input::Key;
use ember_engine::logging::{init_logging, LoggingConfig};
use ember_engine::paint::Color;
use ember_engine::scene::{Animator, Easing, Fade, Slide, Sprite};
use ember_engine::{Mat4, Vec3};

const SHEET: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/assets/hero.json");
const FRAME_SIZE: u32 = 16;
const FRAME_COUNT: u32 = 4;

/// Builds the atlas in memory: one solid tile per frame.
fn hero_atlas() -> image::RgbaImage {
    const TINTS: [[u8; 4]; FRAME_COUNT as usize] = [
        [232, 96, 64, 255],
        [240, 168, 72, 255],
        [96, 184, 120, 255],
        [80, 128, 216, 255],
    ];

    image::RgbaImage::from_fn(FRAME_SIZE * FRAME_COUNT, FRAME_SIZE, |x, _| {
        image::Rgba(TINTS[(x / FRAME_SIZE) as usize])
    })
}

#[derive(Default)]
struct Showcase {
    hero: Option<Rc<RefCell<Sprite>>>,
    fade: Option<Rc<RefCell<Animator<Fade>>>>,
    slide: Option<Rc<RefCell<Animator<Slide>>>>,
    projection: Mat4,
}

impl App for Showcase {
    fn start(&mut self, ctx: &mut FrameCtx<'_>) -> Result<()> {
        ctx.cache
            .insert_image("hero.png", &hero_atlas(), false)
            .context("failed to upload hero atlas")?;

        let hero = Sprite::from_file(SHEET, false, ctx.sprite_deps())
            .with_context(|| format!("failed to load {SHEET}"))?;
        hero.borrow_mut().play(true, 0.125);

        let fade = Animator::new(1.0, Fade::new(&hero, 0.0, 1.0, Easing::QuadOut), ctx.scheduler);
        fade.borrow_mut().set_finish_handler(|| log::info!("hero faded in"));
        fade.borrow_mut().start();

        let slide = Animator::new(
            2.0,
            Slide::new(&hero, Vec2::new(-200.0, 0.0), Vec2::zero(), Easing::QuadInOut),
            ctx.scheduler,
        );
        slide.borrow_mut().start();

        let size = ctx.renderer.size();
        self.projection = Mat4::orthographic_rh(
            -size.width / 2.0,
            size.width / 2.0,
            -size.height / 2.0,
            size.height / 2.0,
            -1.0,
            1.0,
        );

        log::info!(
            "hero loaded: {} frames, size {}x{}",
            hero.borrow().frames().len(),
            hero.borrow().size().width,
            hero.borrow().size().height
        );

        self.hero = Some(hero);
        self.fade = Some(fade);
        self.slide = Some(slide);
        Ok(())
    }

    fn update(&mut self, ctx: &mut FrameCtx<'_>) -> AppControl {
        if ctx.input_frame.keys_pressed.contains(&Key::Escape) {
            return AppControl::Exit;
        }

        if let Some(hero) = &self.hero {
            if ctx.input_frame.keys_pressed.contains(&Key::Space) {
                let mut hero = hero.borrow_mut();
                if hero.is_playing() {
                    hero.stop(false);
                } else {
                    hero.play(true, 0.125);
                }
            }

            if ctx.time.frame_index % 30 == 0 {
                let hero = hero.borrow();
                log::debug!(
                    "frame {}: hero frame {} opacity {:.2} offset ({:.1}, {:.1})",
                    ctx.time.frame_index,
                    hero.current_frame(),
                    hero.opacity(),
                    hero.offset().x,
                    hero.offset().y
                );
            }
        }

        AppControl::Continue
    }

    fn draw(&mut self, ctx: &mut FrameCtx<'_>) {
        if let Some(hero) = &self.hero {
            let transform = Mat4::from_scale(Vec3::new(4.0, 4.0, 1.0));
            hero.borrow()
                .draw(ctx.renderer, &self.projection, &transform, Color::WHITE);
        }
    }

    fn stop(&mut self) {
        if let Some(slide) = &self.slide {
            log::info!("slide finished: {}", slide.borrow().is_done());
        }
        if let Some(fade) = &self.fade {
            log::info!("fade finished: {}", fade.borrow().is_done());
        }
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let screenshot: Option<PathBuf> = std::env::args_os().nth(1).map(PathBuf::from);

    let config = RuntimeConfig {
        title: "ember demo".to_string(),
        frame_limit: Some(180),
        fixed_step: Some(Duration::from_secs_f64(1.0 / 60.0)),
        renderer: RendererConfig {
            size: Size2::new(640.0, 360.0),
            clear_color: Color::rgb(24, 20, 37),
            ..RendererConfig::default()
        },
        ..RuntimeConfig::default()
    };

    let mut runtime = Runtime::new(config, Arc::new(HeadlessDevice::new()))?;

    if let Some(path) = &screenshot {
        runtime.renderer().save_screenshot(path);
    }

    let mut app = Showcase::default();
    runtime.run(&mut app).context("demo run failed")?;

    let stats = runtime.last_stats();
    log::info!(
        "{} frames, last frame: {} draw calls, {} indices, {} skipped presents",
        runtime.frames(),
        stats.draw_calls,
        stats.indices,
        runtime.renderer().skipped_presents()
    );

    Ok(())
}
