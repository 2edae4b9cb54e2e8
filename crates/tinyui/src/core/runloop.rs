use crate::core::{
    backend::EventSource, context::Context, dispatch::Dispatch, error::Result,
};

/// Run one frame: tick update callbacks, drain and dispatch pending events,
/// then draw the tree between `begin` and `present`. Returns `false` once a
/// quit event has been seen; the frame is still drawn in that case.
pub fn run_frame(ctx: &mut Context, events: &mut dyn EventSource) -> Result<bool> {
    ctx.run_updates(events.ticks())?;

    let mut running = true;
    while let Some(event) = events.poll_event()? {
        if !ctx.dispatch(&event)? {
            running = false;
            break;
        }
    }

    let bg = ctx.style.bg;
    ctx.renderer()?.begin(bg)?;
    ctx.render_widgets()?;
    ctx.renderer()?.present()?;
    Ok(running)
}

/// Run frames until a quit event arrives. Returns the number of frames run.
pub fn run(ctx: &mut Context, events: &mut dyn EventSource) -> Result<u64> {
    let mut frames = 0;
    loop {
        frames += 1;
        if !run_frame(ctx, events)? {
            tracing::info!(frames, "session finished");
            return Ok(frames);
        }
    }
}
