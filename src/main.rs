#![cfg(not(target_arch = "wasm32"))]

use std::backtrace::Backtrace;
use std::panic;

use anyhow::Context;
use log::{error, info, LevelFilter};

use trebuchet_scene::{SceneConfig, TrebuchetScene};

/// Log the arm pose every this many frames.
const REPORT_INTERVAL: u32 = 60;

fn main() -> anyhow::Result<()> {
    setup_diagnostics();

    let config = match std::env::args().nth(1) {
        Some(path) => SceneConfig::from_path(&path)
            .with_context(|| format!("loading scene config from {path}"))?,
        None => SceneConfig::default(),
    };

    info!(
        "Starting trebuchet demo: {} frame(s) at {:.4}s",
        config.frames, config.timestep
    );
    let mut demo = TrebuchetScene::new(&config).context("building the trebuchet scene")?;

    let mut triggered = demo.is_triggered();
    for frame in 1..=config.frames {
        demo.step(config.timestep);

        if demo.is_triggered() != triggered {
            triggered = demo.is_triggered();
            info!("frame {frame}: trigger {}", if triggered { "on" } else { "off" });
        }

        if frame % REPORT_INTERVAL == 0 {
            if let Some(pose) = demo.arm_pose() {
                let metrics = demo.scene().metrics();
                info!(
                    "frame {frame}: arm at {:.2} | {} awake, {} touching, step {:.2}ms",
                    pose.position,
                    metrics.active_bodies,
                    metrics.contact_pairs,
                    metrics.last_step_time_ms
                );
            }
        }
    }

    info!("Done after {} step(s)", demo.scene().metrics().step_count);
    Ok(())
}

fn setup_diagnostics() {
    env_logger::Builder::new()
        .filter_level(if cfg!(debug_assertions) {
            LevelFilter::Debug
        } else {
            LevelFilter::Warn
        })
        .format_timestamp_millis()
        .format_target(false)
        .parse_default_env()
        .init();

    panic::set_hook(Box::new(|panic_info| {
        let backtrace = Backtrace::force_capture();

        let msg = match panic_info.payload().downcast_ref::<&'static str>() {
            Some(s) => *s,
            None => match panic_info.payload().downcast_ref::<String>() {
                Some(s) => &s[..],
                None => "Box<dyn Any>",
            },
        };
        let location = panic_info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()))
            .unwrap_or_else(|| "unknown".to_string());

        error!("panic at {location}: {msg}\n{backtrace}");
    }));
}
