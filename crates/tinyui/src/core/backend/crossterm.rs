use std::{
    io::{self, Stderr, Write},
    panic,
    time::{Duration, Instant},
};

use color_backtrace::{BacktracePrinter, default_output_stream};
use crossterm::{
    self, ExecutableCommand, QueueableCommand, cursor as ccursor, event as cevent, style, terminal,
};
use scopeguard::guard;
use unicode_width::UnicodeWidthChar;

use crate::{
    core::{
        backend::{BackendControl, EventSource, Session},
        cache::{Font, Image},
        context::Context,
        dump::dump,
        error::{Error, Result},
        event::{Event, key, mouse},
        kind::Alignment,
        render::RenderBackend,
        runloop::run_frame,
        style::Color4,
    },
    geom::{Point, Rect},
};

/// Translate a toolkit color into a crossterm color. Alpha is ignored.
fn translate_color(c: Color4) -> style::Color {
    style::Color::Rgb {
        r: c.r,
        g: c.g,
        b: c.b,
    }
}

/// Map IO results into toolkit errors.
fn translate_result<T>(e: io::Result<T>) -> Result<T> {
    match e {
        Ok(t) => Ok(t),
        Err(e) => Err(Error::Render(e.to_string())),
    }
}

/// Crossterm-backed implementation of `BackendControl`.
#[derive(Debug)]
pub struct CrosstermControl {
    /// Stderr handle used for control output.
    fp: Stderr,
}

impl CrosstermControl {
    /// Enter alternate screen and raw mode.
    fn enter(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        self.fp.execute(terminal::EnterAlternateScreen)?;
        self.fp.execute(cevent::EnableMouseCapture)?;
        self.fp.execute(ccursor::Hide)?;
        Ok(())
    }

    /// Leave alternate screen and restore terminal state.
    fn exit(&mut self) -> io::Result<()> {
        self.fp.execute(terminal::LeaveAlternateScreen)?;
        self.fp.execute(cevent::DisableMouseCapture)?;
        self.fp.execute(ccursor::Show)?;
        terminal::disable_raw_mode()?;
        Ok(())
    }
}

impl Default for CrosstermControl {
    fn default() -> Self {
        Self { fp: io::stderr() }
    }
}

impl BackendControl for CrosstermControl {
    fn start(&mut self) -> Result<()> {
        translate_result(self.enter())
    }

    fn stop(&mut self) -> Result<()> {
        translate_result(self.exit())
    }
}

/// Crossterm-backed render backend. One terminal cell is one unit of widget
/// geometry.
pub struct CrosstermRender {
    /// Stderr handle used for rendering output.
    fp: Stderr,
    /// Terminal size in cells, refreshed at the start of every frame.
    size: (u16, u16),
}

impl CrosstermRender {
    /// Is the cell on screen?
    fn visible(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.size.0 as i32 && y < self.size.1 as i32
    }

    /// Clip a rectangle to the screen, returning half-open cell bounds
    /// `(x0, y0, x1, y1)`.
    fn clip(&self, r: Rect) -> Option<(u16, u16, u16, u16)> {
        if r.is_unset() {
            return None;
        }
        let x0 = r.top.x.max(0);
        let y0 = r.top.y.max(0);
        let x1 = r.top.x.saturating_add(r.width).min(self.size.0 as i32);
        let y1 = r.top.y.saturating_add(r.height).min(self.size.1 as i32);
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some((x0 as u16, y0 as u16, x1 as u16, y1 as u16))
    }

    /// Write a single cell if it is on screen.
    fn put(&mut self, x: i32, y: i32, ch: char) -> io::Result<()> {
        if self.visible(x, y) {
            self.fp.queue(ccursor::MoveTo(x as u16, y as u16))?;
            self.fp.queue(style::Print(ch))?;
        }
        Ok(())
    }

    /// Fill a rectangle with background-colored spaces.
    fn fill(&mut self, r: Rect, color: Color4) -> io::Result<()> {
        let Some((x0, y0, x1, y1)) = self.clip(r) else {
            return Ok(());
        };
        let row = " ".repeat((x1 - x0) as usize);
        self.fp
            .queue(style::SetBackgroundColor(translate_color(color)))?;
        for y in y0..y1 {
            self.fp.queue(ccursor::MoveTo(x0, y))?;
            self.fp.queue(style::Print(&row))?;
        }
        self.fp.queue(style::ResetColor)?;
        Ok(())
    }

    /// Draw a rectangle outline with box-drawing characters.
    fn outline(&mut self, r: Rect, color: Color4) -> io::Result<()> {
        if r.is_unset() || r.width <= 0 || r.height <= 0 {
            return Ok(());
        }
        let (x0, y0) = (r.top.x, r.top.y);
        let (x1, y1) = (
            x0.saturating_add(r.width - 1),
            y0.saturating_add(r.height - 1),
        );
        self.fp
            .queue(style::SetForegroundColor(translate_color(color)))?;
        let (w, h) = (self.size.0 as i32, self.size.1 as i32);
        for x in x0.max(0)..=x1.min(w) {
            self.put(x, y0, '─')?;
            self.put(x, y1, '─')?;
        }
        for y in y0.max(0)..=y1.min(h) {
            self.put(x0, y, '│')?;
            self.put(x1, y, '│')?;
        }
        if r.width > 1 && r.height > 1 {
            self.put(x0, y0, '┌')?;
            self.put(x1, y0, '┐')?;
            self.put(x0, y1, '└')?;
            self.put(x1, y1, '┘')?;
        }
        self.fp.queue(style::ResetColor)?;
        Ok(())
    }

    /// Sample an image into the rectangle, one pixel per cell.
    fn blit(&mut self, r: Rect, image: &Image) -> io::Result<()> {
        let Some((x0, y0, x1, y1)) = self.clip(r) else {
            return Ok(());
        };
        if image.width == 0 || image.height == 0 || r.width <= 0 || r.height <= 0 {
            return Ok(());
        }
        for y in y0..y1 {
            self.fp.queue(ccursor::MoveTo(x0, y))?;
            for x in x0..x1 {
                let px = sample(x as i32 - r.top.x, r.width, image.width);
                let py = sample(y as i32 - r.top.y, r.height, image.height);
                let [red, green, blue, _] = image.pixel(px, py).unwrap_or([0, 0, 0, 0]);
                self.fp.queue(style::SetBackgroundColor(style::Color::Rgb {
                    r: red,
                    g: green,
                    b: blue,
                }))?;
                self.fp.queue(style::Print(' '))?;
            }
        }
        self.fp.queue(style::ResetColor)?;
        Ok(())
    }

    /// Print text on the middle row of the rectangle.
    fn label(
        &mut self,
        text: &str,
        r: Rect,
        fg: Color4,
        bg: Color4,
        alignment: Alignment,
    ) -> io::Result<()> {
        if r.is_unset() || r.width <= 0 || r.height <= 0 {
            return Ok(());
        }
        let y = r.top.y + r.height / 2;
        let cols = self.size.0 as i32;
        if y < 0 || y >= self.size.1 as i32 {
            return Ok(());
        }
        let (mut txt, width) = fit(text, r.width as usize);
        let mut x = r.top.x + offset(width, r.width as usize, alignment) as i32;
        if x < 0 {
            let (skip, _) = fit(txt, (-x) as usize);
            txt = &txt[skip.len()..];
            x = 0;
        }
        if x >= cols {
            return Ok(());
        }
        let (txt, _) = fit(txt, (cols - x) as usize);
        self.fp.queue(ccursor::MoveTo(x as u16, y as u16))?;
        self.fp
            .queue(style::SetForegroundColor(translate_color(fg)))?;
        self.fp
            .queue(style::SetBackgroundColor(translate_color(bg)))?;
        self.fp.queue(style::Print(txt))?;
        self.fp.queue(style::ResetColor)?;
        Ok(())
    }

    /// Flush pending output.
    fn flush(&mut self) -> io::Result<()> {
        self.fp.flush()?;
        Ok(())
    }
}

/// Map a cell offset within `extent` cells onto `pixels` pixels.
fn sample(offset: i32, extent: i32, pixels: u32) -> u32 {
    let p = offset.max(0) as u64 * pixels as u64 / extent.max(1) as u64;
    (p as u32).min(pixels.saturating_sub(1))
}

/// Return the longest prefix of `text` that fits into `width` columns,
/// together with its display width.
fn fit(text: &str, width: usize) -> (&str, usize) {
    let mut used = 0;
    for (i, c) in text.char_indices() {
        let w = c.width().unwrap_or(0);
        if used + w > width {
            return (&text[..i], used);
        }
        used += w;
    }
    (text, used)
}

/// Column offset of text `width` wide inside `avail` columns.
fn offset(width: usize, avail: usize, alignment: Alignment) -> usize {
    let slack = avail.saturating_sub(width);
    match alignment {
        Alignment::Left => 0,
        Alignment::Center => slack / 2,
        Alignment::Right => slack,
    }
}

impl Default for CrosstermRender {
    fn default() -> Self {
        Self {
            fp: io::stderr(),
            size: terminal::size().unwrap_or((80, 24)),
        }
    }
}

impl RenderBackend for CrosstermRender {
    fn begin(&mut self, bg: Color4) -> Result<()> {
        self.size = translate_result(terminal::size())?;
        translate_result(
            self.fp
                .queue(style::SetBackgroundColor(translate_color(bg)))
                .and_then(|fp| fp.queue(terminal::Clear(terminal::ClearType::All)))
                .map(|_| ()),
        )
    }

    fn draw_rect(&mut self, rect: Rect, filled: bool, color: Color4) -> Result<()> {
        translate_result(if filled {
            self.fill(rect, color)
        } else {
            self.outline(rect, color)
        })
    }

    fn draw_image(&mut self, rect: Rect, image: &Image) -> Result<()> {
        translate_result(self.blit(rect, image))
    }

    fn draw_text(
        &mut self,
        text: &str,
        _font: &Font,
        rect: Rect,
        fg: Color4,
        bg: Color4,
        alignment: Alignment,
    ) -> Result<()> {
        translate_result(self.label(text, rect, fg, bg, alignment))
    }

    fn present(&mut self) -> Result<()> {
        translate_result(self.flush())
    }

    fn load_image(&mut self, filename: &str) -> Result<Image> {
        let decoded = image::open(filename)
            .map_err(|e| Error::ImageLoad(format!("{filename}: {e}")))?
            .to_rgba8();
        let (width, height) = decoded.dimensions();
        Ok(Image {
            name: filename.to_string(),
            width,
            height,
            pixels: decoded.into_raw(),
        })
    }
}

/// Translate crossterm key modifiers into toolkit modifiers.
fn translate_key_modifiers(mods: cevent::KeyModifiers) -> key::Mods {
    key::Mods {
        shift: mods.contains(cevent::KeyModifiers::SHIFT),
        ctrl: mods.contains(cevent::KeyModifiers::CONTROL),
        alt: mods.contains(cevent::KeyModifiers::ALT),
    }
}

/// Translate a crossterm mouse button into a toolkit button.
fn translate_button(b: cevent::MouseButton) -> mouse::Button {
    match b {
        cevent::MouseButton::Left => mouse::Button::Left,
        cevent::MouseButton::Right => mouse::Button::Right,
        cevent::MouseButton::Middle => mouse::Button::Middle,
    }
}

/// Translate a crossterm key code into a toolkit key code.
fn translate_key_code(code: cevent::KeyCode) -> key::KeyCode {
    match code {
        cevent::KeyCode::Char(c) => key::KeyCode::Char(c),
        cevent::KeyCode::Backspace => key::KeyCode::Backspace,
        cevent::KeyCode::Enter => key::KeyCode::Enter,
        cevent::KeyCode::Tab => key::KeyCode::Tab,
        cevent::KeyCode::Esc => key::KeyCode::Esc,
        cevent::KeyCode::Delete => key::KeyCode::Delete,
        cevent::KeyCode::Left => key::KeyCode::Left,
        cevent::KeyCode::Right => key::KeyCode::Right,
        cevent::KeyCode::Up => key::KeyCode::Up,
        cevent::KeyCode::Down => key::KeyCode::Down,
        cevent::KeyCode::Home => key::KeyCode::Home,
        cevent::KeyCode::End => key::KeyCode::End,
        cevent::KeyCode::F(x) => key::KeyCode::F(x),
        _ => key::KeyCode::Unknown,
    }
}

/// Translate a crossterm event into a toolkit event. Events the toolkit has
/// no use for map to `None`. Ctrl+C maps to [`Event::Quit`].
fn translate_event(e: cevent::Event) -> Option<Event> {
    match e {
        cevent::Event::Key(k) => {
            let key = key::Key {
                mods: translate_key_modifiers(k.modifiers),
                code: translate_key_code(k.code),
            };
            if key.mods.ctrl && key.code == key::KeyCode::Char('c') {
                return Some(Event::Quit);
            }
            Some(Event::Key {
                key,
                down: k.kind != cevent::KeyEventKind::Release,
            })
        }
        cevent::Event::Mouse(m) => {
            let point = Point {
                x: m.column.into(),
                y: m.row.into(),
            };
            match m.kind {
                cevent::MouseEventKind::Down(b) => Some(Event::MouseButton {
                    point,
                    button: translate_button(b),
                    down: true,
                }),
                cevent::MouseEventKind::Up(b) => Some(Event::MouseButton {
                    point,
                    button: translate_button(b),
                    down: false,
                }),
                cevent::MouseEventKind::Drag(b) => Some(Event::MouseMove {
                    point,
                    button: translate_button(b),
                }),
                cevent::MouseEventKind::Moved => Some(Event::MouseMove {
                    point,
                    button: mouse::Button::None,
                }),
                _ => None,
            }
        }
        _ => None,
    }
}

/// Crossterm-backed event source. The first poll of each frame waits up to
/// the frame interval for input; later polls in the same frame do not block.
#[derive(Debug)]
pub struct CrosstermEvents {
    /// Clock origin for ticks.
    start: Instant,
    /// How long the first poll of a frame may wait.
    interval: Duration,
    /// Whether the next poll is the first of a frame.
    fresh: bool,
}

impl CrosstermEvents {
    /// Construct an event source with the given frame interval.
    pub fn new(interval: Duration) -> Self {
        Self {
            start: Instant::now(),
            interval,
            fresh: true,
        }
    }
}

impl Default for CrosstermEvents {
    fn default() -> Self {
        Self::new(Duration::from_millis(33))
    }
}

impl EventSource for CrosstermEvents {
    fn poll_event(&mut self) -> Result<Option<Event>> {
        loop {
            let wait = if self.fresh {
                self.interval
            } else {
                Duration::ZERO
            };
            self.fresh = false;
            let ready = cevent::poll(wait).inspect_err(|e| {
                tracing::error!("crossterm event poll error: {e}");
            });
            if !translate_result(ready)? {
                self.fresh = true;
                return Ok(None);
            }
            let evt = cevent::read().inspect_err(|e| {
                tracing::error!("crossterm event read error: {e}");
            });
            if let Some(event) = translate_event(translate_result(evt)?) {
                return Ok(Some(event));
            }
        }
    }

    fn ticks(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

/// Options for configuring the crossterm runloop behavior.
#[derive(Debug, Clone, Copy)]
pub struct RunloopOptions {
    /// Install a panic hook that restores the terminal before printing a backtrace.
    pub install_panic_hook: bool,
    /// Longest wait for input between frames.
    pub frame_interval: Duration,
}

impl Default for RunloopOptions {
    fn default() -> Self {
        Self {
            install_panic_hook: true,
            frame_interval: Duration::from_millis(33),
        }
    }
}

/// Stop the session and print the error with a widget tree dump.
fn handle_frame_error(error: Error, ctx: &Context, session: &mut Session<'_>) -> Error {
    drop(session.stop());
    eprintln!("Frame error: {error}");
    eprintln!("\nWidget tree dump:");
    match dump(ctx) {
        Ok(dump_str) => eprintln!("{dump_str}"),
        Err(dump_err) => eprintln!("Failed to dump widget tree: {dump_err}"),
    }
    error
}

/// Run the frame loop on the terminal until a quit event arrives. The
/// context must already have a renderer, normally a [`CrosstermRender`].
/// Returns the number of frames run.
pub fn runloop(ctx: &mut Context, options: RunloopOptions) -> Result<u64> {
    if !ctx.has_renderer() {
        return Err(Error::InvalidRenderHandle);
    }
    let mut control = CrosstermControl::default();
    let mut session = Session::new(&mut control)?;

    let _panic_hook = if options.install_panic_hook {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(|pi| {
            let mut stderr = io::stderr();
            #[allow(unused_must_use)]
            {
                crossterm::execute!(
                    stderr,
                    terminal::LeaveAlternateScreen,
                    cevent::DisableMouseCapture,
                    ccursor::Show
                );
                terminal::disable_raw_mode();
                BacktracePrinter::new().print_panic_info(pi, &mut default_output_stream());
            }
        }));
        Some(guard(previous, |hook| {
            panic::set_hook(hook);
        }))
    } else {
        None
    };

    let mut events = CrosstermEvents::new(options.frame_interval);
    let mut frames = 0;
    loop {
        frames += 1;
        match run_frame(ctx, &mut events) {
            Ok(true) => {}
            Ok(false) => {
                session.stop()?;
                tracing::info!(frames, "terminal session finished");
                return Ok(frames);
            }
            Err(e) => return Err(handle_frame_error(e, ctx, &mut session)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clip_saturates_wide_rects() {
        let be = CrosstermRender {
            fp: io::stderr(),
            size: (80, 24),
        };
        assert_eq!(be.clip(Rect::new(i32::MAX - 5, 0, 10, 1)), None);
        assert_eq!(
            be.clip(Rect::new(-10, 2, i32::MAX, 3)),
            Some((0, 2, 80, 5))
        );
    }

    #[test]
    fn fit_respects_width() {
        assert_eq!(fit("hello", 3), ("hel", 3));
        assert_eq!(fit("hello", 10), ("hello", 5));
        assert_eq!(fit("日本語", 5), ("日本", 4));
        assert_eq!(fit("", 2), ("", 0));
    }

    #[test]
    fn alignment_offsets() {
        assert_eq!(offset(4, 10, Alignment::Left), 0);
        assert_eq!(offset(4, 10, Alignment::Center), 3);
        assert_eq!(offset(4, 10, Alignment::Right), 6);
        assert_eq!(offset(12, 10, Alignment::Right), 0);
    }

    #[test]
    fn sampling_stays_in_bounds() {
        assert_eq!(sample(0, 10, 100), 0);
        assert_eq!(sample(5, 10, 100), 50);
        assert_eq!(sample(9, 10, 100), 90);
        assert_eq!(sample(20, 10, 4), 3);
        assert_eq!(sample(3, 0, 4), 3);
    }

    #[test]
    fn ctrl_c_is_quit() {
        let e = cevent::Event::Key(cevent::KeyEvent::new(
            cevent::KeyCode::Char('c'),
            cevent::KeyModifiers::CONTROL,
        ));
        assert_eq!(translate_event(e), Some(Event::Quit));
    }

    #[test]
    fn key_translation() {
        let e = cevent::Event::Key(cevent::KeyEvent::new(
            cevent::KeyCode::Char('x'),
            cevent::KeyModifiers::NONE,
        ));
        assert_eq!(
            translate_event(e),
            Some(Event::Key {
                key: key::Key::from('x'),
                down: true
            })
        );
        let e = cevent::Event::Key(cevent::KeyEvent::new(
            cevent::KeyCode::Insert,
            cevent::KeyModifiers::NONE,
        ));
        assert!(matches!(
            translate_event(e),
            Some(Event::Key {
                key: key::Key {
                    code: key::KeyCode::Unknown,
                    ..
                },
                ..
            })
        ));
    }

    #[test]
    fn mouse_translation() {
        let mouse = |kind| {
            cevent::Event::Mouse(cevent::MouseEvent {
                kind,
                column: 4,
                row: 7,
                modifiers: cevent::KeyModifiers::NONE,
            })
        };
        assert_eq!(
            translate_event(mouse(cevent::MouseEventKind::Down(
                cevent::MouseButton::Left
            ))),
            Some(Event::MouseButton {
                point: Point::new(4, 7),
                button: mouse::Button::Left,
                down: true
            })
        );
        assert_eq!(
            translate_event(mouse(cevent::MouseEventKind::Moved)),
            Some(Event::MouseMove {
                point: Point::new(4, 7),
                button: mouse::Button::None
            })
        );
        assert_eq!(translate_event(mouse(cevent::MouseEventKind::ScrollUp)), None);
        assert_eq!(translate_event(cevent::Event::FocusGained), None);
    }
}
