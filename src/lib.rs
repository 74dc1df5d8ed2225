//! paintflash: highlight regions of a UI as its components re-render.
//!
//! ```no_run
//! use paintflash::{FlashConfig, ViewportSize, surface::PixmapFactory};
//!
//! let config = FlashConfig::load();
//! let controller = paintflash::install(&config, PixmapFactory::default(), ViewportSize::new(800, 600))?;
//! # drop(controller);
//! # Ok::<(), anyhow::Error>(())
//! ```

use std::time::Duration;

use anyhow::Context;

pub use flash_config::{ConfigError, FlashConfig};
pub use flash_core::*;

/// Translate loaded configuration into controller settings.
pub fn overlay_settings(config: &FlashConfig) -> anyhow::Result<OverlaySettings> {
    let color = HighlightColor::parse(&config.overlay.color)
        .with_context(|| format!("invalid overlay color {:?}", config.overlay.color))?;

    let timing = &config.timing;
    let toggle = &config.toggle;
    Ok(OverlaySettings {
        color,
        z_index: config.overlay.z_index,
        canvas_identifier: config.overlay.canvas_identifier.clone(),
        instance_identifier: config.overlay.instance_identifier.clone(),
        toggle: KeyCombo {
            key: toggle.key.clone(),
            shift: toggle.shift,
            ctrl: toggle.ctrl,
            alt: toggle.alt,
            meta: toggle.meta,
        },
        resize_debounce: Duration::from_millis(timing.resize_debounce_ms),
        worker: WorkerConfig {
            frame_interval: Duration::from_millis(timing.frame_interval_ms),
            settings: RenderSettings {
                fade: FadePolicy::new(timing.fade_duration_ms, timing.max_alpha),
                line_width: timing.line_width,
            },
        },
    })
}

/// Build the overlay context for one host.
///
/// Spawns the worker and, when `overlay.start_immediately` is set, attaches
/// a surface sized to `viewport` right away.
pub fn install<F: SurfaceFactory>(
    config: &FlashConfig,
    factory: F,
    viewport: ViewportSize,
) -> anyhow::Result<FlashController<F>> {
    let settings = overlay_settings(config)?;
    let mut controller = FlashController::new(settings, factory).context("failed to spawn paint flashing worker")?;

    if config.overlay.start_immediately {
        controller.start(viewport);
    }
    log::debug!(
        "paint flashing installed (running: {}, toggle: {:?})",
        controller.is_running(),
        config.toggle.key
    );
    Ok(controller)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_from_default_config() {
        let settings = overlay_settings(&FlashConfig::default()).unwrap();
        let defaults = OverlaySettings::default();
        assert_eq!(settings.color.to_rgba8(1.0), defaults.color.to_rgba8(1.0));
        assert_eq!(settings.canvas_identifier, defaults.canvas_identifier);
        assert_eq!(settings.instance_identifier, defaults.instance_identifier);
        assert_eq!(settings.toggle, defaults.toggle);
        assert_eq!(settings.resize_debounce, defaults.resize_debounce);
        assert_eq!(settings.worker, defaults.worker);
    }

    #[test]
    fn test_settings_reject_bad_color() {
        let mut config = FlashConfig::default();
        config.overlay.color = "not-a-color".to_string();
        assert!(overlay_settings(&config).is_err());
    }

    #[test]
    fn test_settings_carry_timing() {
        let mut config = FlashConfig::default();
        config.timing.fade_duration_ms = 1000.0;
        config.timing.frame_interval_ms = 33;
        config.toggle.ctrl = Some(true);

        let settings = overlay_settings(&config).unwrap();
        assert_eq!(settings.worker.frame_interval, Duration::from_millis(33));
        assert_eq!(settings.worker.settings.fade.duration_ms, 1000.0);
        assert_eq!(settings.toggle.ctrl, Some(true));
    }
}
