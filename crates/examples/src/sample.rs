use std::rc::Rc;

use tinyui::{
    Alignment, Callback, Context, WidgetFactory,
    error::Result,
    event::{EventKind, EventPayload},
    geom::Rect,
    style::{Color4, FontSpec, Style},
};

/// Outer panel.
pub const PANEL: u64 = 10;
/// Screen title.
pub const TITLE: u64 = 11;
/// Label reporting the last button clicked.
pub const STATUS: u64 = 12;
/// Text entry.
pub const INPUT: u64 = 13;
/// Progress bar driven by update ticks.
pub const PROGRESS: u64 = 14;
/// File tree.
pub const TREE: u64 = 15;
/// Decorative filled box.
pub const SWATCH: u64 = 19;
/// Optional image button.
pub const IMAGE: u64 = 20;
/// The three text buttons.
pub const BUTTONS: [u64; 3] = [1, 2, 3];

/// Entries shown in the file tree.
const TREE_ITEMS: [(u64, &str); 3] = [(16, "src"), (17, "tests"), (18, "Cargo.toml")];

/// Milliseconds per percent of progress.
const MS_PER_PERCENT: u64 = 50;

/// The sample screen's colors, sized for a terminal: one cell per glyph and a
/// one-cell margin.
pub fn sample_style() -> Style {
    Style {
        fg: Color4::new(125, 125, 125, 0),
        bg: Color4::new(0, 0, 0, 0),
        text_color: Color4::new(0, 0, 200, 0),
        margin: 1,
        font: FontSpec {
            size: 1,
            ..FontSpec::default()
        },
        ..Style::default()
    }
}

/// A record that writes "Clicked <caption>" into the status label on release.
fn click_reporter(caption: String) -> Rc<Callback> {
    Callback::new()
        .on(EventKind::MouseButtonUp, move |_, _, ctx| {
            ctx.set_text(STATUS, format!("Clicked {caption}"))
        })
        .shared()
}

/// A record that sweeps the progress bar from 0 to 100 and around again.
fn progress_ticker() -> Rc<Callback> {
    Callback::new()
        .on(EventKind::Update, |id, payload, ctx| {
            if let EventPayload::Tick { now_ms } = payload {
                let fill = (now_ms / MS_PER_PERCENT) % 101;
                ctx.set_progress(id, fill as i32)?;
            }
            Ok(())
        })
        .shared()
}

/// Build the sample screen. An image button is added when `image` names a
/// file.
pub fn build(ctx: &mut Context, image: Option<&str>) -> Result<()> {
    let title = ctx.title().to_string();
    ctx.create_panel(PANEL, 0, Rect::new(1, 1, 78, 22), false, None)?;
    ctx.create_label(TITLE, PANEL, &title, Rect::new(3, 2, 40, 1), Alignment::Left)?;

    for (i, id) in BUTTONS.into_iter().enumerate() {
        let caption = format!("Test {}", i + 1);
        let rect = Rect::new(3, 4 + 4 * i as i32, 12, 3);
        ctx.create_button(id, PANEL, &caption, rect, Some(click_reporter(caption.clone())))?;
    }

    ctx.create_label(STATUS, PANEL, "", Rect::new(20, 4, 30, 1), Alignment::Left)?;
    ctx.create_input_field(INPUT, PANEL, "", Rect::new(20, 6, 30, 3), Alignment::Left)?;
    ctx.create_progress_bar(
        PROGRESS,
        PANEL,
        Rect::new(20, 11, 30, 1),
        0,
        Some(progress_ticker()),
    )?;
    ctx.create_box(SWATCH, PANEL, Rect::new(20, 14, 5, 2), true)?;
    if let Some(path) = image {
        ctx.create_image_button(
            IMAGE,
            PANEL,
            path,
            Rect::new(30, 14, 8, 4),
            Some(click_reporter("image".into())),
        )?;
    }

    ctx.create_tree_view(TREE, PANEL, "Files", Rect::new(54, 4, 22, 10))?;
    for (id, text) in TREE_ITEMS {
        ctx.create_tree_item(id, TREE, text)?;
    }

    let quit = Callback::new()
        .on(EventKind::Quit, |_, _, _| {
            tracing::info!("sample screen closing");
            Ok(())
        })
        .shared();
    ctx.set_callback(0, Some(quit))?;
    Ok(())
}
