//! Scanline Engine: software 3D rasterizer
//!
//! Renders textured triangle meshes entirely on the CPU into a framebuffer,
//! which is then blitted to the window:
//! - Frustum clipping, back-face culling, flat lighting
//! - Perspective-correct texture mapping with a z-buffer
//! - Wireframe, filled and textured render modes

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod config;
mod rasterizer;
mod world;

use macroquad::prelude::*;
use rasterizer::{Camera, DepthPolicy, CullMode, Framebuffer, Pipeline, RenderMode, HEIGHT, WIDTH};
use world::{load_scene, Scene};

fn window_conf() -> Conf {
    Conf {
        window_title: format!("Scanline Engine v{}", VERSION),
        window_width: WIDTH as i32,
        window_height: HEIGHT as i32,
        window_resizable: true,
        ..Default::default()
    }
}

/// Keyboard handling: camera movement and runtime toggles
fn handle_input(camera: &mut Camera, pipeline: &mut Pipeline, fb: &Framebuffer, dt: f32, screenshots: &mut u32) {
    if is_key_down(KeyCode::W) {
        camera.move_forward(dt);
    }
    if is_key_down(KeyCode::S) {
        camera.move_backward(dt);
    }
    if is_key_down(KeyCode::Up) {
        camera.climb(dt);
    }
    if is_key_down(KeyCode::Down) {
        camera.climb(-dt);
    }
    if is_key_down(KeyCode::A) {
        camera.turn_left(dt);
    }
    if is_key_down(KeyCode::D) {
        camera.turn_right(dt);
    }

    let settings = &mut pipeline.settings;
    if is_key_pressed(KeyCode::C) {
        settings.cull_mode = CullMode::BackFace;
        log::info!("culling: back faces");
    }
    if is_key_pressed(KeyCode::X) {
        settings.cull_mode = CullMode::None;
        log::info!("culling: off");
    }

    let mode_keys = [
        KeyCode::Key1,
        KeyCode::Key2,
        KeyCode::Key3,
        KeyCode::Key4,
        KeyCode::Key5,
        KeyCode::Key6,
    ];
    for (key, mode) in mode_keys.iter().zip(RenderMode::ALL) {
        if is_key_pressed(*key) {
            settings.render_mode = mode;
            log::info!("render mode: {:?}", mode);
        }
    }

    if is_key_pressed(KeyCode::P) {
        settings.depth_policy = match settings.depth_policy {
            DepthPolicy::PerPixel => DepthPolicy::PainterSort,
            DepthPolicy::PainterSort => DepthPolicy::PerPixel,
        };
        log::info!("depth policy: {:?}", settings.depth_policy);
    }

    if is_key_pressed(KeyCode::F12) {
        let path = format!("screenshot-{:03}.png", *screenshots);
        match fb.save_png(&path) {
            Ok(()) => {
                log::info!("saved {}", path);
                *screenshots += 1;
            }
            Err(e) => log::error!("failed to save {}: {}", path, e),
        }
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_path = std::env::args().nth(1).unwrap_or_else(|| "assets/render.ron".to_string());
    let config = match config::load_config(&config_path) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}: {}", config_path, e);
            return;
        }
    };

    let mut scene = match &config.scene {
        Some(path) => match load_scene(path) {
            Ok(scene) => scene,
            Err(e) => {
                log::error!("{}: {}", path, e);
                return;
            }
        },
        None => {
            log::info!("no scene configured, showing the default cube");
            Scene::default_cube()
        }
    };

    let mut fb = Framebuffer::new(config.width, config.height);
    let mut pipeline = Pipeline::new(config.pipeline_settings(), config.width, config.height);
    let mut camera = Camera::new(config.camera_position);
    let mut screenshots = 0;

    log::info!("=== Scanline Engine ===");
    log::info!("W/S move, Up/Down climb, A/D turn, C/X culling, 1-6 render mode, P depth policy, F12 screenshot");

    loop {
        let dt = get_frame_time();
        handle_input(&mut camera, &mut pipeline, &fb, dt, &mut screenshots);
        scene.animate(dt);

        fb.clear(config.clear_color);
        fb.clear_depth();
        if config.show_grid {
            fb.draw_grid(10, rasterizer::Color::GRID);
        }

        let view = camera.view_matrix();
        let stats = pipeline.render_frame(&mut fb, &scene.meshes, &view);
        log::debug!(
            "faces {} culled {} clipped {} drawn {}",
            stats.faces, stats.culled, stats.clipped_away, stats.triangles
        );

        // Convert framebuffer to texture and stretch it over the window
        let texture = Texture2D::from_rgba8(fb.width as u16, fb.height as u16, &fb.pixels);
        texture.set_filter(FilterMode::Nearest);

        clear_background(BLACK);
        draw_texture_ex(
            &texture,
            0.0,
            0.0,
            WHITE,
            DrawTextureParams {
                dest_size: Some(vec2(screen_width(), screen_height())),
                ..Default::default()
            },
        );

        next_frame().await
    }
}
