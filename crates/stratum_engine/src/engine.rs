//! Frame driver
//!
//! Owns the active scene and the fixed-step accumulator, and runs the passes
//! of one frame in a fixed order.

use crate::config::EngineConfig;
use crate::foundation::time::FixedTimestep;
use crate::render::RenderBackend;
use crate::scene::{Scene, Services};

/// Drives one scene frame by frame
pub struct FrameDriver {
    scene: Scene,
    timestep: FixedTimestep,
}

impl FrameDriver {
    /// Create a driver around a new scene
    pub fn new(name: impl Into<String>, config: &EngineConfig, services: Services) -> Self {
        Self {
            scene: Scene::new(name, config, services),
            timestep: FixedTimestep::new(config.physics.fixed_timestep, config.physics.max_fixed_steps),
        }
    }

    /// Driven scene
    pub const fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Driven scene, mutably
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// Swap in another scene, returning the old one
    pub fn replace_scene(&mut self, scene: Scene) -> Scene {
        self.timestep.reset();
        std::mem::replace(&mut self.scene, scene)
    }

    /// Seconds per fixed step
    pub const fn fixed_step(&self) -> f32 {
        self.timestep.step()
    }

    /// Run one frame: update, the fixed steps that are due, late update, draw
    pub fn run_frame(&mut self, delta_time: f32, backend: &mut dyn RenderBackend) {
        self.scene.update(delta_time);

        let steps = self.timestep.accumulate(delta_time);
        for _ in 0..steps {
            self.scene.fixed_update(self.timestep.step());
        }
        self.scene.set_physics_fraction(self.timestep.fraction());

        self.scene.late_update(delta_time);
        self.scene.draw(delta_time, backend);

        if let Ok(mut input) = self.scene.services().input.try_borrow_mut() {
            input.end_frame();
        }
    }
}
