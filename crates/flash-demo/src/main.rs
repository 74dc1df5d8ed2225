use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use paintflash::surface::PixmapFactory;
use paintflash::{FlashConfig, HostDom, KeyCombo, KeyEvent, Modifiers, Rect, SurfaceFactory, ViewportSize};
use serde::Serialize;

mod page;
mod widgets;

use page::SimDom;
use widgets::{FragmentList, LazyPanel, Mover, Periodic, Toast, Widget};

#[derive(Serialize)]
struct WidgetSummary {
    name: &'static str,
    renders: u32,
}

#[derive(Serialize)]
struct WorkerSummary {
    state: String,
    frames_painted: u64,
    instance_count: usize,
    region_count: usize,
}

#[derive(Serialize)]
struct DemoSummary {
    frames: u32,
    viewport: ViewportSize,
    widgets: Vec<WidgetSummary>,
    resizes: u32,
    toggles: u32,
    running: bool,
    surfaces_created: u32,
    live_nodes: usize,
    worker: WorkerSummary,
    capture_dir: Option<PathBuf>,
}

/// The key event the host would deliver for `combo`.
fn press(combo: &KeyCombo) -> KeyEvent {
    KeyEvent::new(
        combo.key.clone(),
        Modifiers {
            shift: combo.shift.unwrap_or(false),
            ctrl: combo.ctrl.unwrap_or(false),
            alt: combo.alt.unwrap_or(false),
            meta: combo.meta.unwrap_or(false),
        },
    )
}

fn load_config() -> Result<FlashConfig> {
    let path = std::env::args().find_map(|a| a.strip_prefix("--config=").map(PathBuf::from));
    let mut config = match path {
        Some(path) => FlashConfig::load_from_file(&path).with_context(|| format!("loading {:?}", path))?,
        None => FlashConfig::load_or_default(),
    };
    config.merge_with_env();

    if let Some(frames) = std::env::args().find_map(|a| a.strip_prefix("--frames=").and_then(|s| s.parse().ok())) {
        config.demo.frames = frames;
    }
    if std::env::args().any(|a| a == "--capture") && config.demo.capture_every == 0 {
        config.demo.capture_every = 10;
    }
    Ok(config)
}

fn main() -> Result<()> {
    let _ = env_logger::try_init();

    let config = load_config()?;
    let demo = config.demo.clone();
    let key = config.overlay.instance_identifier.clone();

    let mut factory = PixmapFactory::new();
    let capture_dir = (demo.capture_every > 0).then(|| demo.output_dir.clone().unwrap_or_else(|| PathBuf::from("flash-frames")));
    if let Some(dir) = &capture_dir {
        factory = factory.with_capture(dir, demo.capture_every);
        log::info!("capturing every {} frames to {:?}", demo.capture_every, dir);
    }

    let mut dom = SimDom::new(ViewportSize::new(demo.width, demo.height));
    let mut controller = paintflash::install(&config, factory, dom.viewport_size())?;
    let toggle = press(&controller.settings().toggle);

    let frames = demo.frames;
    let below_fold = f64::from(demo.height) + 100.0;
    let mut widgets: Vec<Box<dyn Widget>> = vec![
        Box::new(Periodic::new("header", &key, Rect::new(0.0, 0.0, f64::from(demo.width), 60.0), 10)),
        Box::new(Periodic::new("counter", &key, Rect::new(80.0, 20.0, 120.0, 32.0), 3)),
        Box::new(Periodic::new("footer", &key, Rect::new(below_fold, 0.0, f64::from(demo.width), 40.0), 5)),
        Box::new(Mover::new(&key, 6.0)),
        Box::new(FragmentList::new(&key, 3)),
        Box::new(LazyPanel::new(&key, frames / 4)),
        Box::new(Toast::new(&key, frames / 2)),
    ];
    for widget in &mut widgets {
        widget.mount(&mut dom, &mut controller);
    }

    let frame_time = Duration::from_millis(config.timing.frame_interval_ms.max(1));
    let resize_at = frames / 3;
    let toggle_off = frames * 2 / 3;
    let toggle_on = toggle_off + 10;
    let (mut resizes, mut toggles) = (0, 0);

    for frame in 0..frames {
        for widget in &mut widgets {
            widget.frame(frame, &mut dom, &mut controller);
        }

        let now = Instant::now();
        if frame == resize_at {
            dom.resize(ViewportSize::new(demo.width + demo.width / 4, demo.height + demo.height / 4));
            controller.handle_resize(now);
            resizes += 1;
        }
        if frame == toggle_off || frame == toggle_on {
            controller.handle_key(&toggle, dom.viewport_size());
            toggles += 1;
        }

        controller.tick(&dom, now);
        thread::sleep(frame_time);
    }

    let snapshot = controller.worker().snapshot().context("paint flashing worker exited early")?;
    let summary = DemoSummary {
        frames,
        viewport: dom.viewport_size(),
        widgets: widgets
            .iter()
            .map(|w| WidgetSummary {
                name: w.name(),
                renders: w.renders(),
            })
            .collect(),
        resizes,
        toggles,
        running: controller.is_running(),
        surfaces_created: controller.factory().created(),
        live_nodes: dom.node_count(),
        worker: WorkerSummary {
            state: format!("{:?}", snapshot.state),
            frames_painted: snapshot.frames_painted,
            instance_count: snapshot.instance_count,
            region_count: snapshot.region_count,
        },
        capture_dir,
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);

    if controller.factory().is_attached() {
        controller.stop();
    }
    Ok(())
}
