/// Example program to print the loaded configuration
///
/// Run with: cargo run -p flash-config --example print_config

fn main() {
    let config = flash_config::FlashConfig::load();

    println!("=== Paintflash Configuration ===\n");

    println!("Overlay Settings:");
    println!("  Start Immediately: {}", config.overlay.start_immediately);
    println!("  Color: {}", config.overlay.color);
    println!("  Z-Index: {}", config.overlay.z_index);
    println!("  Canvas Identifier: {}", config.overlay.canvas_identifier);
    println!("  Instance Identifier: {}", config.overlay.instance_identifier);
    println!();

    println!("Toggle Settings:");
    println!("  Key: {}", config.toggle.key);
    println!("  Shift: {:?}", config.toggle.shift);
    println!("  Alt: {:?}", config.toggle.alt);
    println!("  Ctrl: {:?}", config.toggle.ctrl);
    println!("  Meta: {:?}", config.toggle.meta);
    println!();

    println!("Timing Settings:");
    println!("  Fade Duration: {}ms", config.timing.fade_duration_ms);
    println!("  Max Alpha: {}", config.timing.max_alpha);
    println!("  Frame Interval: {}ms", config.timing.frame_interval_ms);
    println!("  Resize Debounce: {}ms", config.timing.resize_debounce_ms);
    println!("  Line Width: {}", config.timing.line_width);
    println!();

    println!("Demo Settings:");
    println!("  Viewport: {}x{}", config.demo.width, config.demo.height);
    println!("  Frames: {}", config.demo.frames);
    match (&config.demo.output_dir, config.demo.capture_every) {
        (_, 0) => println!("  Capture: disabled"),
        (Some(dir), every) => println!("  Capture: every {} frames to {}", every, dir.display()),
        (None, every) => println!("  Capture: every {} frames to ./flash-frames", every),
    }
    println!();

    match toml::to_string_pretty(&config) {
        Ok(toml_str) => {
            println!("=== Serialized Configuration ===");
            println!("{}", toml_str);
        }
        Err(e) => {
            eprintln!("Failed to serialize config: {}", e);
        }
    }
}
