use std::{fs, process};

use anyhow::{Context, Result, bail};
use tracing_subscriber::EnvFilter;

use canvas_driver::{
    compiler::{
        Compiler,
        source::{Element, decode_frames},
    },
    config::DriverConfig,
    driver::TerminalDriver,
    player::Player,
    renderer::GridSurface,
};

fn main() {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

const COMPILE_USAGE: &str = "canvas-driver compile <scene.json> [output.json]";
const RENDER_USAGE: &str = "canvas-driver render <scene.json> <width> <height>";
const PLAY_USAGE: &str = "canvas-driver play <scene.json>";

fn run() -> Result<()> {
    let mut args = std::env::args().skip(1);

    match args.next().as_deref() {
        Some("compile") => {
            let scene_path = args.next().context(COMPILE_USAGE)?;
            compile(&scene_path, args.next().as_deref())
        }
        Some("render") => {
            let scene_path = args.next().context(RENDER_USAGE)?;
            let width = parse_dimension(args.next(), "width")?;
            let height = parse_dimension(args.next(), "height")?;
            render(&scene_path, width, height)
        }
        Some("play") => {
            let path = args.next().context(PLAY_USAGE)?;
            play(&path)
        }
        _ => bail!(
            "Canvas Driver — element trees to canvas instructions\n\nUsage:\n  {COMPILE_USAGE}\n  {RENDER_USAGE}\n  {PLAY_USAGE}"
        ),
    }
}

fn parse_dimension(arg: Option<String>, name: &str) -> Result<u16> {
    let arg = arg.context(RENDER_USAGE)?;
    arg.parse().with_context(|| format!("Invalid {name} `{arg}`"))
}

fn read_frames(path: &str) -> Result<Vec<Option<Element>>> {
    let json = fs::read_to_string(path).with_context(|| format!("Failed to read {path}"))?;
    decode_frames(&json).with_context(|| format!("Failed to parse {path}"))
}

/// Write one instruction list per frame as JSON.
fn compile(scene_path: &str, output_path: Option<&str>) -> Result<()> {
    let frames = read_frames(scene_path)?;
    let compiled = frames
        .iter()
        .enumerate()
        .map(|(i, root)| {
            Compiler::compile(root.as_ref()).with_context(|| format!("Frame {} failed", i + 1))
        })
        .collect::<Result<Vec<_>>>()?;

    let output_json = serde_json::to_string_pretty(&compiled)?;
    match output_path {
        Some(path) => {
            fs::write(path, &output_json).with_context(|| format!("Failed to write {path}"))?;
            eprintln!("Compiled {} frames from {scene_path} -> {path}", compiled.len());
        }
        None => println!("{output_json}"),
    }
    Ok(())
}

/// Draw every frame on an off-screen grid and print the last one as text.
fn render(scene_path: &str, width: u16, height: u16) -> Result<()> {
    let frames = read_frames(scene_path)?;
    let mut surface = GridSurface::new(width, height);
    for (i, root) in frames.iter().enumerate() {
        Player::render(root.as_ref(), &mut surface)
            .with_context(|| format!("Frame {} failed", i + 1))?;
    }
    for row in surface.cells() {
        let line: String = row.iter().map(|c| c.ch).collect();
        println!("{}", line.trim_end());
    }
    Ok(())
}

fn play(path: &str) -> Result<()> {
    let frames = read_frames(path)?;
    let mut driver = TerminalDriver::new(DriverConfig::load())?;
    driver.run(frames)
}
