//! # Stratum Engine
//!
//! The runtime core of a 2D scene-graph engine.
//!
//! ## Features
//!
//! - **Entity Tree**: arena-backed hierarchy with relative transforms, layers and visibility
//! - **Physics Bridge**: rigid-body world whose contacts are routed back to owning entities
//! - **Draw Ordering**: stable per-frame sort by layer, optionally tie-broken by Y position
//! - **Fixed Timestep**: accumulator-driven physics stepping with an interpolation fraction
//! - **Services**: reference-counted texture cache and named input actions, injected per scene
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use stratum_engine::prelude::*;
//!
//! let config = EngineConfig::default();
//! let mut driver = FrameDriver::new("level", &config, Services::default());
//!
//! let player = driver.scene_mut().spawn(
//!     EntityBuilder::new("player").with_position(Vec2::new(64.0, 32.0)),
//! );
//! driver.scene_mut().register_entity(player);
//!
//! let mut backend = RecordingBackend::default();
//! driver.run_frame(1.0 / 60.0, &mut backend);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod config;
pub mod entity;
pub mod physics;
pub mod scene;
pub mod assets;
pub mod input;
pub mod render;
pub mod debug;

mod engine;

pub use engine::FrameDriver;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        FrameDriver,
        assets::{AssetError, TextureCache, TextureHandle, TextureInfo, TextureLoader, TileMapData},
        config::{Config, ConfigError, EngineConfig, PhysicsConfig, SceneConfig, WindowConfig},
        entity::{
            AnimatedSprite, Behavior, Camera2D, EntityBuilder, EntityId, EntityKind, EntityNode,
            EntityType, Light2D, ShapeSet, Sprite, StackedSprite, Transform2D, TransformFlags,
        },
        foundation::math::{Color, Rect, Vec2},
        input::{InputBinding, InputError, InputMap},
        physics::{
            BodyDef, BodyHandle, BodyKind, Collision, CollisionFilter, FixtureDef, Shape,
        },
        render::{RecordingBackend, RenderBackend},
        scene::{Scene, SceneError, SceneEvent, SceneServices, Services},
    };
}
