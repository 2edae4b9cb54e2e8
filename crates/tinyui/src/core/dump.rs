use std::io::Write;

use termcolor::{Buffer, Color, ColorSpec, WriteColor};

use crate::core::{
    context::Context,
    error::{Error, Result},
    id::NodeId,
};

/// Render the widget tree as an indented listing with ANSI colors: one line
/// per widget, showing id, kind, rectangle, text and state markers. This is a
/// debug function.
pub fn dump(ctx: &Context) -> Result<String> {
    dump_into(Buffer::ansi(), ctx)
}

/// Like [`dump`], without color codes. Suitable for log files.
pub fn dump_plain(ctx: &Context) -> Result<String> {
    dump_into(Buffer::no_color(), ctx)
}

/// Dump the whole tree into a buffer.
fn dump_into(mut buffer: Buffer, ctx: &Context) -> Result<String> {
    if let Some(root) = ctx.tree.root() {
        dump_node(&mut buffer, ctx, root, 0)?;
    }
    Ok(String::from_utf8_lossy(buffer.as_slice()).into_owned())
}

/// Write `text` in a color, then reset.
fn colored(buffer: &mut Buffer, spec: &ColorSpec, text: &str) -> Result<()> {
    buffer.set_color(spec)?;
    write!(buffer, "{text}")?;
    buffer.reset()?;
    Ok(())
}

/// Walk a widget subtree and emit formatted debug output.
fn dump_node(buffer: &mut Buffer, ctx: &Context, node_id: NodeId, level: usize) -> Result<()> {
    let w = ctx
        .tree
        .get(node_id)
        .ok_or_else(|| Error::Internal("missing node".into()))?;

    let indent = "    ".repeat(level);
    write!(buffer, "{indent}")?;
    colored(
        buffer,
        ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true),
        &format!("#{}", w.id),
    )?;
    write!(buffer, " {} {}", w.kind, w.rect)?;
    if !w.text.is_empty() {
        write!(buffer, " {:?}", w.text)?;
    }
    if !w.enabled {
        write!(buffer, " ")?;
        colored(
            buffer,
            ColorSpec::new().set_fg(Some(Color::Yellow)),
            "disabled",
        )?;
    }
    if ctx.focus == Some(node_id) {
        write!(buffer, " ")?;
        colored(
            buffer,
            ColorSpec::new().set_fg(Some(Color::Magenta)),
            "FOCUSED",
        )?;
    }
    writeln!(buffer)?;

    for child in &w.children {
        dump_node(buffer, ctx, *child, level + 1)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::{
            backend::test::TestRender, focus::FocusManager, kind::Alignment,
            registry::WidgetFactory,
        },
        geom::Rect,
    };

    #[test]
    fn plain_listing() -> Result<()> {
        let mut ctx = Context::new("test");
        let (_log, be) = TestRender::create();
        ctx.init_renderer(be)?;
        assert_eq!(dump_plain(&ctx)?, "");
        ctx.create_panel(1, 0, Rect::new(0, 0, 10, 10), false, None)?;
        ctx.create_label(2, 1, "hi", Rect::new(1, 1, 4, 2), Alignment::Left)?;
        ctx.set_enable_state(2, false)?;
        ctx.set_focus(1)?;
        let expected = "\
#0 container (0, 0) 10x10
    #1 panel (0, 0) 10x10 FOCUSED
        #2 label (1, 1) 4x2 \"hi\" disabled
";
        assert_eq!(dump_plain(&ctx)?, expected);
        assert!(dump(&ctx)?.contains("\u{1b}["));
        Ok(())
    }
}
