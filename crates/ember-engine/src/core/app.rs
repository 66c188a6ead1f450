use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract driven by `core::Runtime`.
pub trait App {
    /// Called once before the first frame; load sprites and start animations here.
    fn start(&mut self, ctx: &mut FrameCtx<'_>) -> anyhow::Result<()> {
        let _ = ctx;
        Ok(())
    }

    /// Called every frame after scheduled ticks ran.
    fn update(&mut self, ctx: &mut FrameCtx<'_>) -> AppControl {
        let _ = ctx;
        AppControl::Continue
    }

    /// Called when the renderer accepts a new frame; queue draw commands here.
    fn draw(&mut self, ctx: &mut FrameCtx<'_>);

    /// Called once after the last frame.
    fn stop(&mut self) {}
}
