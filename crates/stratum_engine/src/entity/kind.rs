//! Entity kinds and capability queries

use super::camera::Camera2D;
use super::light::Light2D;
use super::physics_body::PhysicsBody;
use super::shape::ShapeSet;
use super::sprite::{AnimatedSprite, Sprite};
use super::stacked_sprite::StackedSprite;
use super::tilemap::{TileMap, TileMapLayer};

/// Coarse type tag of an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityType {
    /// Plain transform node
    Generic,
    /// Something drawn directly
    Sprite,
    /// Tilemap root or layer
    TileMap,
    /// 2D light
    Light,
    /// Camera
    Camera,
    /// Physics-linked
    Physical,
}

/// What an entity is, with the data that kind carries
#[derive(Debug, Clone, Default)]
pub enum EntityKind {
    /// Plain transform node
    #[default]
    Generic,
    /// Static textured quad
    Sprite(Sprite),
    /// Frame-animated textured quad
    AnimatedSprite(AnimatedSprite),
    /// Slice stack faking height
    StackedSprite(StackedSprite),
    /// Lines and circles
    Shape(ShapeSet),
    /// Tilemap root; expanded into its layers when drawing
    TileMap(TileMap),
    /// One layer of a tilemap
    TileMapLayer(TileMapLayer),
    /// 2D light
    Light(Light2D),
    /// Camera
    Camera(Camera2D),
    /// Physics body
    Physics(PhysicsBody),
}

impl EntityKind {
    /// Type tag
    pub const fn entity_type(&self) -> EntityType {
        match self {
            Self::Generic => EntityType::Generic,
            Self::Sprite(_) | Self::AnimatedSprite(_) | Self::StackedSprite(_) | Self::Shape(_) => {
                EntityType::Sprite
            }
            Self::TileMap(_) | Self::TileMapLayer(_) => EntityType::TileMap,
            Self::Light(_) => EntityType::Light,
            Self::Camera(_) => EntityType::Camera,
            Self::Physics(_) => EntityType::Physical,
        }
    }

    /// Goes into the scene's drawable set. Tilemap layers are drawn through
    /// their map.
    pub const fn is_drawable(&self) -> bool {
        matches!(
            self,
            Self::Sprite(_)
                | Self::AnimatedSprite(_)
                | Self::StackedSprite(_)
                | Self::Shape(_)
                | Self::TileMap(_)
        )
    }

    /// Owns a physics body
    pub const fn is_physical(&self) -> bool {
        matches!(self, Self::Physics(_))
    }

    /// Is a camera
    pub const fn is_camera(&self) -> bool {
        matches!(self, Self::Camera(_))
    }

    /// Is a light
    pub const fn is_light(&self) -> bool {
        matches!(self, Self::Light(_))
    }

    /// Sprite data, if any
    pub const fn as_sprite(&self) -> Option<&Sprite> {
        match self {
            Self::Sprite(sprite) => Some(sprite),
            _ => None,
        }
    }

    /// Mutable sprite data, if any
    pub fn as_sprite_mut(&mut self) -> Option<&mut Sprite> {
        match self {
            Self::Sprite(sprite) => Some(sprite),
            _ => None,
        }
    }

    /// Animated sprite data, if any
    pub fn as_animated_sprite_mut(&mut self) -> Option<&mut AnimatedSprite> {
        match self {
            Self::AnimatedSprite(sprite) => Some(sprite),
            _ => None,
        }
    }

    /// Sprite stack data, if any
    pub fn as_stacked_sprite_mut(&mut self) -> Option<&mut StackedSprite> {
        match self {
            Self::StackedSprite(stack) => Some(stack),
            _ => None,
        }
    }

    /// Shape data, if any
    pub fn as_shape_mut(&mut self) -> Option<&mut ShapeSet> {
        match self {
            Self::Shape(shapes) => Some(shapes),
            _ => None,
        }
    }

    /// Tilemap data, if any
    pub const fn as_tilemap(&self) -> Option<&TileMap> {
        match self {
            Self::TileMap(map) => Some(map),
            _ => None,
        }
    }

    /// Tilemap layer data, if any
    pub fn as_tilemap_layer_mut(&mut self) -> Option<&mut TileMapLayer> {
        match self {
            Self::TileMapLayer(layer) => Some(layer),
            _ => None,
        }
    }

    /// Light data, if any
    pub const fn as_light(&self) -> Option<&Light2D> {
        match self {
            Self::Light(light) => Some(light),
            _ => None,
        }
    }

    /// Camera data, if any
    pub const fn as_camera(&self) -> Option<&Camera2D> {
        match self {
            Self::Camera(camera) => Some(camera),
            _ => None,
        }
    }

    /// Mutable camera data, if any
    pub fn as_camera_mut(&mut self) -> Option<&mut Camera2D> {
        match self {
            Self::Camera(camera) => Some(camera),
            _ => None,
        }
    }

    /// Physics data, if any
    pub const fn as_physics(&self) -> Option<&PhysicsBody> {
        match self {
            Self::Physics(body) => Some(body),
            _ => None,
        }
    }

    /// Mutable physics data, if any
    pub fn as_physics_mut(&mut self) -> Option<&mut PhysicsBody> {
        match self {
            Self::Physics(body) => Some(body),
            _ => None,
        }
    }
}

macro_rules! impl_from_kind {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for EntityKind {
                fn from(value: $ty) -> Self {
                    Self::$variant(value)
                }
            }
        )*
    };
}

impl_from_kind!(
    Sprite(Sprite),
    AnimatedSprite(AnimatedSprite),
    StackedSprite(StackedSprite),
    Shape(ShapeSet),
    Light(Light2D),
    Camera(Camera2D),
    Physics(PhysicsBody),
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec2;
    use crate::physics::BodyKind;

    #[test]
    fn test_capabilities_follow_kind() {
        let shapes: EntityKind = ShapeSet::new().into();
        assert!(shapes.is_drawable());
        assert_eq!(shapes.entity_type(), EntityType::Sprite);

        let mut stack: EntityKind =
            StackedSprite::new(crate::assets::TextureHandle::default(), Vec2::new(8.0, 8.0), 4, 4).into();
        assert!(stack.is_drawable());
        assert_eq!(stack.entity_type(), EntityType::Sprite);
        assert!(stack.as_stacked_sprite_mut().is_some());

        let body: EntityKind = PhysicsBody::new(BodyKind::Dynamic).into();
        assert!(body.is_physical() && !body.is_drawable());
        assert_eq!(body.entity_type(), EntityType::Physical);

        let camera: EntityKind = Camera2D::new().into();
        assert!(camera.is_camera() && camera.as_camera().is_some());

        let light: EntityKind = Light2D::default().into();
        assert!(light.is_light() && !light.is_drawable());

        assert_eq!(EntityKind::default().entity_type(), EntityType::Generic);
    }
}
