//! Draw list construction and submission

use super::draw_order::{sort_draw_entries, DrawEntry};
use super::scene_graph::Scene;
use crate::debug::DebugFlags;
use crate::entity::{CameraView, EntityId, EntityKind, ShapeData, StackedSprite, TileMapLayer};
use crate::foundation::math::{rotate_vector, Color, Rect, Vec2};
use crate::physics::WorldShape;
use crate::render::RenderBackend;

/// Spacing of the debug world grid in world units
const GRID_SPACING: f32 = 64.0;

/// Pose an entity is drawn at
#[derive(Debug, Clone, Copy)]
struct DrawPose {
    position: Vec2,
    rotation: f32,
    scale: Vec2,
}

impl DrawPose {
    fn apply(&self, local: Vec2) -> Vec2 {
        self.position + rotate_vector(local.component_mul(&self.scale), self.rotation)
    }

    fn uniform_scale(&self) -> f32 {
        self.scale.x.abs().max(self.scale.y.abs())
    }
}

impl Scene {
    fn draw_pose(&self, id: EntityId) -> Option<DrawPose> {
        Some(DrawPose {
            position: self.tree.global_position(id)?,
            rotation: self.tree.global_rotation(id)?,
            scale: self.tree.global_scale(id)?,
        })
    }

    /// World-space bounds of a drawable entity
    pub fn world_bounds(&self, id: EntityId) -> Option<Rect> {
        let node = self.tree.get(id)?;
        let pose = self.draw_pose(id)?;
        match &node.kind {
            EntityKind::Sprite(sprite) => Some(sprite.bounds(pose.position, pose.scale)),
            EntityKind::AnimatedSprite(sprite) => Some(sprite.bounds(pose.position, pose.scale)),
            EntityKind::StackedSprite(stack) => {
                let zoom = self.camera_view().map_or(1.0, |view| view.zoom);
                let step = stack.slice_step(self.config.stack_layer_offset, pose.scale.y, zoom);
                Some(stack.bounds(pose.position, pose.scale, step))
            }
            EntityKind::Shape(shapes) => {
                let extent = shapes.extent() * pose.uniform_scale();
                Some(Rect::new(
                    pose.position.x - extent,
                    pose.position.y - extent,
                    extent * 2.0,
                    extent * 2.0,
                ))
            }
            EntityKind::TileMapLayer(layer) => Some(layer.bounds(pose.position, pose.scale)),
            _ => None,
        }
    }

    fn draw_entry(&self, id: EntityId) -> Option<DrawEntry> {
        let node = self.tree.get(id)?;
        Some(DrawEntry {
            entity: id,
            layer: self.tree.draw_layer(id)?,
            sort_y: node.transform.position.y + node.y_sort_offset,
        })
    }

    fn cull_margin(&self, view: &CameraView) -> f32 {
        self.config.cull_margin * view.zoom
    }

    /// Ordered list of what to draw this frame
    pub fn build_draw_list(&self) -> Vec<DrawEntry> {
        let view = self.camera_view();
        let mut entries = Vec::with_capacity(self.drawables.len());

        for &id in &self.drawables {
            let Some(node) = self.tree.get(id) else {
                continue;
            };
            if !node.is_visible() {
                continue;
            }

            if let EntityKind::TileMap(map) = &node.kind {
                // tiles are culled one by one at draw time
                entries.extend(
                    map.layers()
                        .iter()
                        .filter(|&&layer| self.tree.is_visible(layer))
                        .filter_map(|&layer| self.draw_entry(layer)),
                );
                continue;
            }

            if let Some(view) = &view {
                let on_screen = self
                    .world_bounds(id)
                    .is_some_and(|bounds| view.is_on_screen(&bounds, self.cull_margin(view)));
                if !on_screen {
                    continue;
                }
            }
            entries.extend(self.draw_entry(id));
        }

        sort_draw_entries(&mut entries, self.config.y_sort);
        entries
    }

    /// Draw one frame through `backend`
    pub fn draw(&mut self, delta_time: f32, backend: &mut dyn RenderBackend) {
        let view = self
            .camera_view()
            .unwrap_or_else(|| CameraView::identity(self.world_render_size()));
        let entries = self.build_draw_list();

        backend.begin_frame(&view);
        for entry in &entries {
            self.submit(entry.entity, backend);
        }
        self.queue_debug_overlays(&entries, &view);
        self.debug.flush(delta_time, backend);
        backend.end_frame();
    }

    fn submit(&self, id: EntityId, backend: &mut dyn RenderBackend) {
        let (Some(node), Some(pose)) = (self.tree.get(id), self.draw_pose(id)) else {
            return;
        };
        let degrees = pose.rotation.to_degrees();

        match &node.kind {
            EntityKind::Sprite(sprite) => backend.draw_texture(
                sprite.texture,
                sprite.flipped_source(),
                Rect::from_position_size(pose.position, sprite.size.component_mul(&pose.scale)),
                sprite.origin.component_mul(&pose.scale),
                degrees,
                sprite.tint,
            ),
            EntityKind::AnimatedSprite(sprite) => {
                if let Some(source) = sprite.frame_source() {
                    backend.draw_texture(
                        sprite.texture,
                        source,
                        Rect::from_position_size(pose.position, sprite.frame_size().component_mul(&pose.scale)),
                        sprite.frame_origin().component_mul(&pose.scale),
                        degrees,
                        sprite.tint,
                    );
                }
            }
            EntityKind::Shape(shapes) => {
                for shape in shapes.visible() {
                    match *shape {
                        ShapeData::Line { start, end, thickness, color } => {
                            backend.draw_line(pose.apply(start), pose.apply(end), thickness, color);
                        }
                        ShapeData::Circle { center, radius, color } => {
                            backend.draw_circle(pose.apply(center), radius * pose.uniform_scale(), color);
                        }
                    }
                }
            }
            EntityKind::StackedSprite(stack) => self.submit_stack(stack, pose, backend),
            EntityKind::TileMapLayer(layer) => self.submit_tiles(layer, pose, backend),
            _ => {}
        }
    }

    fn submit_stack(&self, stack: &StackedSprite, pose: DrawPose, backend: &mut dyn RenderBackend) {
        let view = self.camera_view();
        let zoom = view.map_or(1.0, |view| view.zoom);
        let step = stack.slice_step(self.config.stack_layer_offset, pose.scale.y, zoom);
        let shift = view
            .filter(|_| stack.uses_perspective_shift(self.config.stack_perspective_shift))
            .map(|view| {
                rotate_vector(
                    view.normalized_screen_coords(pose.position),
                    -view.rotation_degrees.to_radians(),
                )
            });

        let size = stack.slice_size.component_mul(&pose.scale);
        let origin = stack.origin.component_mul(&pose.scale);
        let degrees = pose.rotation.to_degrees();
        for index in 0..stack.slice_count {
            backend.draw_texture(
                stack.texture,
                stack.slice_source(index),
                Rect::from_position_size(pose.position + stack.slice_offset(index, step, shift), size),
                origin,
                degrees,
                stack.tint,
            );
        }
    }

    fn submit_tiles(&self, layer: &TileMapLayer, pose: DrawPose, backend: &mut dyn RenderBackend) {
        let view = self.camera_view();
        let tile_set = layer.tile_set();
        let size = tile_set.tile_size().component_mul(&pose.scale);

        for (index, &tile) in layer.tiles().iter().enumerate() {
            if tile == 0 {
                continue;
            }
            let Some(source) = tile_set.source_rect(tile) else {
                continue;
            };
            let dest = Rect::from_position_size(
                pose.position + tile_set.cell_offset(index).component_mul(&pose.scale),
                size,
            );
            if let Some(view) = &view {
                if !view.is_on_screen(&dest, self.cull_margin(view)) {
                    continue;
                }
            }
            backend.draw_texture(tile_set.atlas(), source, dest, Vec2::zeros(), 0.0, Color::WHITE);
        }
    }

    fn queue_debug_overlays(&mut self, entries: &[DrawEntry], view: &CameraView) {
        let flags = self.config.debug;
        if flags.is_empty() {
            return;
        }

        if flags.contains(DebugFlags::WORLD_GRID) {
            let corners = [
                Vec2::zeros(),
                Vec2::new(view.viewport.x, 0.0),
                view.viewport,
                Vec2::new(0.0, view.viewport.y),
            ]
            .map(|corner| view.screen_to_world(corner));
            if let Some(area) = Rect::from_points(&corners) {
                let color = Color::rgba(255, 255, 255, 40);
                let mut x = (area.x / GRID_SPACING).floor() * GRID_SPACING;
                while x <= area.x + area.width {
                    self.debug
                        .draw_line(Vec2::new(x, area.y), Vec2::new(x, area.y + area.height), color, 0.0);
                    x += GRID_SPACING;
                }
                let mut y = (area.y / GRID_SPACING).floor() * GRID_SPACING;
                while y <= area.y + area.height {
                    self.debug
                        .draw_line(Vec2::new(area.x, y), Vec2::new(area.x + area.width, y), color, 0.0);
                    y += GRID_SPACING;
                }
            }
        }

        if flags.contains(DebugFlags::SPRITE_BOUNDS) {
            let bounds: Vec<Rect> = entries.iter().filter_map(|entry| self.world_bounds(entry.entity)).collect();
            for rect in bounds {
                self.debug.draw_rect(rect, Color::YELLOW, 0.0);
            }
        }

        if flags.contains(DebugFlags::PHYSICS_SHAPES) {
            let shapes: Vec<WorldShape> = self.physics.world_shapes().map(|(_, shape)| shape).collect();
            for shape in shapes {
                match shape {
                    WorldShape::Circle { center, radius } => self.debug.draw_circle(center, radius, Color::GREEN, 0.0),
                    WorldShape::Polygon { vertices, .. } => self.debug.draw_polygon(&vertices, Color::GREEN, 0.0),
                }
            }
        }
    }
}
