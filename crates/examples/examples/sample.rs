//! Launch the sample screen.

use std::{fs::File, path::PathBuf, sync::Mutex};

use anyhow::Context as _;
use clap::Parser;
use tinyui::{
    Context,
    backend::crossterm::{CrosstermRender, RunloopOptions, runloop},
    dump::dump,
    style::Style,
};
use tinyui_examples::sample::{build, sample_style};

/// CLI flags for the sample screen.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Session title.
    #[clap(long, default_value = "Sample-Screen")]
    title: String,

    /// JSON style file. Fields left out keep the sample's defaults.
    #[clap(long)]
    style: Option<PathBuf>,

    /// Image file for an extra image button.
    #[clap(long)]
    image: Option<String>,

    /// Write tracing output to this file.
    #[clap(long)]
    log: Option<PathBuf>,

    /// Print the widget tree and exit instead of running the UI.
    #[clap(long)]
    dump: bool,
}

/// Run the sample screen.
fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if let Some(path) = &args.log {
        let file = File::create(path)
            .with_context(|| format!("creating log file {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .init();
    }

    let style = match &args.style {
        Some(path) => Style::load(path)?,
        None => sample_style(),
    };

    let mut ctx = Context::new(args.title);
    ctx.set_style(style);
    ctx.init_renderer(CrosstermRender::default())?;
    build(&mut ctx, args.image.as_deref())?;

    if args.dump {
        println!("{}", dump(&ctx)?);
        return Ok(());
    }

    let frames = runloop(&mut ctx, RunloopOptions::default())?;
    tracing::info!(frames, "done");
    Ok(())
}
