use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::assets::Cache;
use crate::graphics::{FrameStats, GraphicsDevice, Renderer, RendererConfig};
use crate::input::{InputEvent, InputFrame, InputState};
use crate::time::{FrameClock, FrameTime, TickScheduler};

use super::app::{App, AppControl};
use super::ctx::FrameCtx;

/// Runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    /// Stop after this many frames; `None` runs until the app exits.
    pub frame_limit: Option<u64>,
    /// Advance time by a fixed step instead of wall-clock time.
    pub fixed_step: Option<Duration>,
    pub dt_min: Duration,
    pub dt_max: Duration,
    /// Root for texture names resolved by the resource cache.
    pub asset_root: PathBuf,
    pub renderer: RendererConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "ember".to_string(),
            frame_limit: None,
            fixed_step: None,
            dt_min: Duration::from_micros(100),
            dt_max: Duration::from_millis(250),
            asset_root: PathBuf::from("."),
            renderer: RendererConfig::default(),
        }
    }
}

/// Frame loop over a `GraphicsDevice`.
///
/// Per frame: advance the clock, tick scheduled sprites and animators, let the
/// app update and (when the renderer accepts a frame) draw, swap the draw
/// queue, upload pending resources, hand the snapshot to the device, then
/// service screenshot requests.
pub struct Runtime {
    config: RuntimeConfig,
    device: Arc<dyn GraphicsDevice>,
    renderer: Renderer,
    cache: Cache,
    scheduler: Rc<TickScheduler>,
    clock: FrameClock,

    input_state: InputState,
    input_frame: InputFrame,
    pending_input: Vec<InputEvent>,

    frames: u64,
    last_stats: FrameStats,
}

impl Runtime {
    pub fn new(config: RuntimeConfig, device: Arc<dyn GraphicsDevice>) -> Result<Self> {
        anyhow::ensure!(
            config.dt_min <= config.dt_max,
            "dt_min ({:?}) exceeds dt_max ({:?})",
            config.dt_min,
            config.dt_max
        );

        let renderer = Renderer::new(Arc::clone(&device), config.renderer.clone());
        let cache = Cache::new(Arc::clone(&device), config.asset_root.clone())
            .context("failed to create resource cache")?;
        let clock = FrameClock::with_clamps(config.dt_min, config.dt_max);

        Ok(Self {
            config,
            device,
            renderer,
            cache,
            scheduler: Rc::new(TickScheduler::new()),
            clock,
            input_state: InputState::default(),
            input_frame: InputFrame::default(),
            pending_input: Vec::new(),
            frames: 0,
            last_stats: FrameStats::default(),
        })
    }

    /// Runs `app` until it exits or the frame limit is reached.
    pub fn run<A: App>(&mut self, app: &mut A) -> Result<()> {
        log::info!("{}: starting", self.config.title);

        self.clock.reset();
        let time = self.advance_clock();
        app.start(&mut FrameCtx {
            renderer: &mut self.renderer,
            cache: &self.cache,
            scheduler: &self.scheduler,
            input: &self.input_state,
            input_frame: &self.input_frame,
            time,
        })
        .context("app start failed")?;

        loop {
            if self.config.frame_limit.is_some_and(|limit| self.frames >= limit) {
                break;
            }
            if self.run_frame(app) == AppControl::Exit {
                break;
            }
        }

        app.stop();
        self.renderer.free();
        log::info!("{}: stopped after {} frames", self.config.title, self.frames);
        Ok(())
    }

    /// Runs one frame.
    pub fn run_frame<A: App>(&mut self, app: &mut A) -> AppControl {
        let time = self.advance_clock();

        for ev in self.pending_input.drain(..) {
            self.input_state.apply_event(&mut self.input_frame, ev);
        }

        self.scheduler.update(time.dt);

        let mut ctx = FrameCtx {
            renderer: &mut self.renderer,
            cache: &self.cache,
            scheduler: &self.scheduler,
            input: &self.input_state,
            input_frame: &self.input_frame,
            time,
        };
        let control = app.update(&mut ctx);

        if ctx.renderer.refill_draw_queue() {
            app.draw(&mut ctx);
            ctx.renderer.flush_draw_commands();
        }

        self.renderer.present();
        self.renderer.process_updates();
        self.last_stats = self
            .device
            .execute(self.renderer.draw_queue(), self.renderer.clear_color());

        for path in self.renderer.take_screenshot_requests() {
            if let Err(err) =
                self.device
                    .save_screenshot(&path, self.renderer.size(), self.renderer.clear_color())
            {
                log::error!("failed to save screenshot {}: {err}", path.display());
            }
        }

        self.input_frame.clear();
        self.frames += 1;
        control
    }

    /// Queues an event for the next frame.
    pub fn push_input(&mut self, ev: InputEvent) {
        self.pending_input.push(ev);
    }

    fn advance_clock(&mut self) -> FrameTime {
        match self.config.fixed_step {
            Some(step) => self.clock.tick_fixed(step),
            None => self.clock.tick(),
        }
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut Renderer {
        &mut self.renderer
    }

    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    pub fn scheduler(&self) -> &Rc<TickScheduler> {
        &self.scheduler
    }

    pub fn input(&self) -> &InputState {
        &self.input_state
    }

    /// Frames run so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Statistics of the last executed frame.
    pub fn last_stats(&self) -> FrameStats {
        self.last_stats
    }
}
