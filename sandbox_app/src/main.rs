//! Headless sandbox
//!
//! Builds a small scene (a spinning ship, a drifting crate field, a row of
//! stacked barrels, a trigger zone and a following camera) and runs it for a
//! fixed number of frames against a recording backend, logging what happened.
//!
//! Usage: `sandbox [config.toml|config.ron] [frames]`

use rand::Rng;
use stratum_engine::foundation::logging;
use stratum_engine::foundation::time::Timer;
use stratum_engine::prelude::*;
use stratum_engine::entity::PhysicsBody;
use std::path::Path;
use thiserror::Error;

const DEFAULT_FRAMES: u32 = 300;
const FRAME_TIME: f32 = 1.0 / 60.0;
const KEY_LEFT: u32 = 263;
const KEY_RIGHT: u32 = 262;

#[derive(Debug, Error)]
enum SandboxError {
    #[error("config: {0}")]
    Config(#[from] ConfigError),
    #[error("asset: {0}")]
    Asset(#[from] AssetError),
    #[error("input: {0}")]
    Input(#[from] InputError),
    #[error("scene: {0}")]
    Scene(#[from] SceneError),
    #[error("invalid frame count '{0}'")]
    FrameCount(String),
}

/// Loader that pretends every image is 32x32
struct NullLoader;

impl TextureLoader for NullLoader {
    fn load(&mut self, _handle: TextureHandle, path: &Path) -> Result<TextureInfo, AssetError> {
        log::trace!("Pretending to load {}", path.display());
        Ok(TextureInfo { width: 32, height: 32 })
    }

    fn release(&mut self, _handle: TextureHandle) {}
}

/// Turns its entity at a constant rate
struct Spinner {
    degrees_per_second: f32,
}

impl Behavior for Spinner {
    fn update(&mut self, entity: EntityId, scene: &mut dyn SceneServices, delta_time: f32) {
        if let Some(node) = scene.entity_mut(entity) {
            node.transform.rotate_degrees(self.degrees_per_second * delta_time);
        }
    }
}

/// Pushes its body left and right from the input map
struct Thruster {
    force: f32,
}

impl Behavior for Thruster {
    fn fixed_update(&mut self, entity: EntityId, scene: &mut dyn SceneServices, _step: f32) {
        let axis = scene.input().borrow().axis("left", "right");
        if axis != 0.0 {
            scene.apply_force(entity, Vec2::new(axis * self.force, 0.0));
        }
    }

    fn on_collision_start(&mut self, collision: &Collision, _scene: &mut dyn SceneServices) {
        log::info!(
            "Ship touched {}",
            collision.other_name.as_deref().unwrap_or("an unowned body")
        );
    }
}

fn input_map() -> Result<InputMap, InputError> {
    let mut input = InputMap::new();
    input.add_action("left")?;
    input.add_action("right")?;
    input.add_binding("left", InputBinding::Key(KEY_LEFT))?;
    input.add_binding("right", InputBinding::Key(KEY_RIGHT))?;
    Ok(input)
}

fn build_scene(driver: &mut FrameDriver, services: &Services) -> Result<EntityId, SandboxError> {
    let ship_sprite = match &services.textures {
        Some(textures) => Sprite::from_cache(&mut textures.borrow_mut(), "ship.png")?,
        None => Sprite::new(TextureHandle::default(), Vec2::new(32.0, 32.0)),
    };
    let scene = driver.scene_mut();

    let ship = scene.spawn(
        EntityBuilder::new("ship")
            .with_position(Vec2::new(-200.0, 0.0))
            .with_kind(PhysicsBody::new(BodyKind::Dynamic).with_circle(16.0))
            .with_behavior(Thruster { force: 40_000.0 }),
    );
    scene.spawn_child(
        ship,
        EntityBuilder::new("hull")
            .with_kind(ship_sprite.with_origin(Vec2::new(16.0, 16.0)))
            .with_draw_layer(2)
            .with_behavior(Spinner { degrees_per_second: 90.0 }),
    )?;
    let camera = scene.spawn_child(ship, EntityBuilder::new("camera").with_kind(Camera2D::new()))?;

    let mut rng = rand::thread_rng();
    for i in 0..12 {
        let position = Vec2::new(rng.gen_range(-600.0..600.0), rng.gen_range(-300.0..300.0));
        let id = scene.spawn(
            EntityBuilder::new(format!("crate_{i}"))
                .with_position(position)
                .with_kind(Sprite::new(TextureHandle::default(), Vec2::new(24.0, 24.0))),
        );
        scene.register_entity(id);
    }

    let zone = scene.spawn(
        EntityBuilder::new("finish_zone")
            .with_position(Vec2::new(200.0, 0.0))
            .with_kind(PhysicsBody::trigger().with_rect(Vec2::new(64.0, 256.0))),
    );

    for (i, x) in [-80.0, 0.0, 80.0].into_iter().enumerate() {
        let barrel = scene.spawn(
            EntityBuilder::new(format!("barrel_{i}"))
                .with_position(Vec2::new(x, 160.0))
                .with_kind(StackedSprite::new(TextureHandle::default(), Vec2::new(16.0, 16.0), 8, 4))
                .with_draw_layer(1),
        );
        scene.register_entity(barrel);
    }

    let mut outline = ShapeSet::new();
    outline.add_line(Vec2::new(-32.0, -128.0), Vec2::new(-32.0, 128.0), 2.0, Color::GREEN);
    outline.add_line(Vec2::new(32.0, -128.0), Vec2::new(32.0, 128.0), 2.0, Color::GREEN);
    scene.spawn_child(zone, EntityBuilder::new("zone_outline").with_kind(outline))?;

    scene.register_entity(ship);
    scene.register_entity(zone);
    scene.set_current_camera(camera);
    Ok(zone)
}

fn parse_args() -> Result<(EngineConfig, u32), SandboxError> {
    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => EngineConfig::load_from_file(path)?,
        None => EngineConfig::default(),
    };
    let frames = match args.next() {
        Some(raw) => raw.parse().map_err(|_| SandboxError::FrameCount(raw))?,
        None => DEFAULT_FRAMES,
    };
    Ok((config, frames))
}

fn run() -> Result<(), SandboxError> {
    let (config, frames) = parse_args()?;
    logging::init_with(&config.logging);
    log::info!("Starting sandbox for {frames} frames");

    let services = Services::new(TextureCache::new(Box::new(NullLoader)), input_map()?);
    let mut driver = FrameDriver::new("sandbox", &config, services.clone());
    let zone = build_scene(&mut driver, &services)?;

    let mut backend = RecordingBackend::default();
    let mut entered = 0;
    let mut deleted = 0;
    services.input.borrow_mut().press(InputBinding::Key(KEY_RIGHT));

    let mut timer = Timer::new();
    for frame in 0..frames {
        timer.update();
        backend.clear();
        driver.run_frame(FRAME_TIME, &mut backend);

        for event in driver.scene_mut().drain_events() {
            match event {
                SceneEvent::BodyEntered { name, .. } => {
                    log::info!("Frame {frame}: {name} entered the finish zone");
                    entered += 1;
                }
                SceneEvent::BodyExited { name, .. } => log::info!("Frame {frame}: {name} left the finish zone"),
                SceneEvent::EntityDeleted { .. } => deleted += 1,
                SceneEvent::WindowResized { .. } => {}
            }
        }

        if driver.scene().is_body_in_area(zone, "ship") {
            services.input.borrow_mut().release(InputBinding::Key(KEY_RIGHT));
        }
    }

    let scene = driver.scene();
    log::info!(
        "Ran {} frames: {} registered entities, {} bodies, {} draw commands last frame, {entered} trigger entries",
        backend.frame_count(),
        scene.registered_count(),
        scene.physics().body_count(),
        backend.commands().len(),
    );
    log::info!("Headless loop averaged {:.0} frames per second", timer.average_fps());

    driver.scene_mut().teardown();
    deleted += driver
        .scene_mut()
        .drain_events()
        .iter()
        .filter(|event| matches!(event, SceneEvent::EntityDeleted { .. }))
        .count();
    log::info!("Teardown deleted {deleted} entities");
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        log::error!("Sandbox failed: {err}");
        eprintln!("sandbox: {err}");
        std::process::exit(1);
    }
}
