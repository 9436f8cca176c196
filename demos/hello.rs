//! Minimal producer: builds one element tree per tick and lets the driver
//! draw it. A ball bounces across the screen; clicking counts hits.
//!
//! Run with: cargo run --example hello

use canvas_driver::{
    builders::{ArcOptions, RectOptions, TextOptions, arc, rect, text},
    compiler::source::Paint,
    config::DriverConfig,
    driver::{TerminalDriver, events::Event},
    types::TextAlign,
};

fn main() -> anyhow::Result<()> {
    let config = DriverConfig {
        frame_interval_ms: 50,
        ..DriverConfig::load()
    };
    let mut driver = TerminalDriver::new(config)?;
    let clicks = driver.events().subscribe("click");
    let resizes = driver.events().subscribe("resize");

    let (w, h) = driver.size();
    let (mut width, mut height) = (f64::from(w), f64::from(h));
    let (mut x, mut y, mut dx, mut dy) = (4.0, 4.0, 1.0, 0.5);
    let mut hits = 0;
    let mut tick = 0u32;

    let frames = std::iter::from_fn(|| {
        tick += 1;
        if tick > 2_000 {
            return None;
        }
        hits += clicks.try_iter().count();
        if let Some(Event::Resize { width: w, height: h }) = resizes.try_iter().last() {
            (width, height) = (f64::from(w), f64::from(h));
        }

        x += dx;
        y += dy;
        if x < 2.0 || x > width - 2.0 {
            dx = -dx;
        }
        if y < 2.0 || y > height - 2.0 {
            dy = -dy;
        }

        let scene = rect(RectOptions {
            draw: vec![Paint::fill("navy")],
            ..RectOptions::default()
        })
        .with_children([
            arc(ArcOptions {
                x,
                y,
                radius: 1.5,
                end_angle: std::f64::consts::TAU,
                draw: vec![Paint::fill("orange")],
                ..ArcOptions::default()
            }),
            text(TextOptions {
                value: format!("hits: {hits}   press q to quit"),
                x: width / 2.0,
                y: 0.0,
                text_align: TextAlign::Center,
                draw: vec![Paint::fill("white")],
                ..TextOptions::default()
            }),
        ]);
        Some(Some(scene))
    });

    driver.run(frames)
}
