//! Collision shapes and the narrow-phase tests between them

use crate::foundation::math::{cross, rotate_vector, Rect, Vec2};

const EPSILON: f32 = 1e-6;

/// Collision shape in body-local coordinates
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Circle
    Circle {
        /// Centre relative to the body origin
        center: Vec2,
        /// Radius
        radius: f32,
    },
    /// Convex polygon, counter-clockwise
    Polygon {
        /// Vertices relative to the body origin
        vertices: Vec<Vec2>,
    },
}

impl Shape {
    /// Circle centred at `center`
    pub const fn circle(center: Vec2, radius: f32) -> Self {
        Self::Circle { center, radius }
    }

    /// Box of `size` centred at `center`, turned by `angle` radians
    pub fn rect(center: Vec2, size: Vec2, angle: f32) -> Self {
        let half = size * 0.5;
        let vertices = [
            Vec2::new(-half.x, -half.y),
            Vec2::new(half.x, -half.y),
            Vec2::new(half.x, half.y),
            Vec2::new(-half.x, half.y),
        ]
        .iter()
        .map(|&corner| center + rotate_vector(corner, angle))
        .collect();
        Self::Polygon { vertices }
    }

    /// Convex polygon through `points`, in either winding.
    ///
    /// Returns `None` for fewer than three points or a degenerate outline.
    /// Convexity is the caller's responsibility.
    pub fn polygon(points: &[Vec2]) -> Option<Self> {
        if points.len() < 3 {
            return None;
        }
        let area = signed_area(points);
        if area.abs() < EPSILON {
            return None;
        }
        let mut vertices = points.to_vec();
        if area < 0.0 {
            vertices.reverse();
        }
        Some(Self::Polygon { vertices })
    }

    /// Surface area
    pub fn area(&self) -> f32 {
        match self {
            Self::Circle { radius, .. } => std::f32::consts::PI * radius * radius,
            Self::Polygon { vertices } => signed_area(vertices).abs(),
        }
    }

    /// Geometric centre relative to the body origin
    #[allow(clippy::cast_precision_loss)]
    pub fn centroid(&self) -> Vec2 {
        match self {
            Self::Circle { center, .. } => *center,
            Self::Polygon { vertices } => {
                vertices.iter().fold(Vec2::zeros(), |acc, v| acc + v) / vertices.len().max(1) as f32
            }
        }
    }

    /// Rotational inertia about the body origin for the given mass
    pub fn inertia(&self, mass: f32) -> f32 {
        match self {
            Self::Circle { center, radius } => mass * (0.5 * radius * radius + center.norm_squared()),
            Self::Polygon { vertices } => {
                let bounds = Rect::from_points(vertices).unwrap_or_default();
                let extent = bounds.width * bounds.width + bounds.height * bounds.height;
                mass * (extent / 12.0 + self.centroid().norm_squared())
            }
        }
    }

    /// Place the shape at a body pose
    pub fn to_world(&self, position: Vec2, angle: f32) -> WorldShape {
        match self {
            Self::Circle { center, radius } => WorldShape::Circle {
                center: position + rotate_vector(*center, angle),
                radius: *radius,
            },
            Self::Polygon { vertices } => {
                let vertices: Vec<Vec2> = vertices
                    .iter()
                    .map(|&v| position + rotate_vector(v, angle))
                    .collect();
                let normals = edge_normals(&vertices);
                WorldShape::Polygon { vertices, normals }
            }
        }
    }
}

fn signed_area(points: &[Vec2]) -> f32 {
    let mut twice_area = 0.0;
    for (i, &a) in points.iter().enumerate() {
        let b = points[(i + 1) % points.len()];
        twice_area += cross(a, b);
    }
    twice_area * 0.5
}

fn edge_normals(vertices: &[Vec2]) -> Vec<Vec2> {
    (0..vertices.len())
        .map(|i| {
            let edge = vertices[(i + 1) % vertices.len()] - vertices[i];
            let normal = Vec2::new(edge.y, -edge.x);
            let length = normal.norm();
            if length > EPSILON {
                normal / length
            } else {
                Vec2::zeros()
            }
        })
        .collect()
}

/// Shape placed in world space for one step
#[derive(Debug, Clone, PartialEq)]
pub enum WorldShape {
    /// Circle
    Circle {
        /// World centre
        center: Vec2,
        /// Radius
        radius: f32,
    },
    /// Convex polygon with its outward edge normals
    Polygon {
        /// World vertices, counter-clockwise
        vertices: Vec<Vec2>,
        /// Outward normal of the edge starting at the same index
        normals: Vec<Vec2>,
    },
}

impl WorldShape {
    /// Axis-aligned bounds
    pub fn aabb(&self) -> Rect {
        match self {
            Self::Circle { center, radius } => Rect::new(
                center.x - radius,
                center.y - radius,
                radius * 2.0,
                radius * 2.0,
            ),
            Self::Polygon { vertices, .. } => Rect::from_points(vertices).unwrap_or_default(),
        }
    }
}

/// Penetration between two overlapping shapes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Manifold {
    /// Unit normal pointing from the first shape towards the second
    pub normal: Vec2,
    /// Overlap along the normal
    pub depth: f32,
}

/// Narrow-phase test; `None` when the shapes do not overlap
pub fn collide(a: &WorldShape, b: &WorldShape) -> Option<Manifold> {
    match (a, b) {
        (
            WorldShape::Circle { center: ca, radius: ra },
            WorldShape::Circle { center: cb, radius: rb },
        ) => circle_circle(*ca, *ra, *cb, *rb),
        (
            WorldShape::Polygon { vertices, normals },
            WorldShape::Circle { center, radius },
        ) => polygon_circle(vertices, normals, *center, *radius),
        (
            WorldShape::Circle { center, radius },
            WorldShape::Polygon { vertices, normals },
        ) => polygon_circle(vertices, normals, *center, *radius).map(|m| Manifold {
            normal: -m.normal,
            depth: m.depth,
        }),
        (
            WorldShape::Polygon { vertices: va, normals: na },
            WorldShape::Polygon { vertices: vb, normals: nb },
        ) => polygon_polygon(va, na, vb, nb),
    }
}

fn circle_circle(ca: Vec2, ra: f32, cb: Vec2, rb: f32) -> Option<Manifold> {
    let delta = cb - ca;
    let distance = delta.norm();
    let reach = ra + rb;
    if distance > reach {
        return None;
    }
    let normal = if distance > EPSILON {
        delta / distance
    } else {
        Vec2::new(1.0, 0.0)
    };
    Some(Manifold {
        normal,
        depth: reach - distance,
    })
}

/// Normal points from the polygon to the circle
fn polygon_circle(vertices: &[Vec2], normals: &[Vec2], center: Vec2, radius: f32) -> Option<Manifold> {
    let mut separation = f32::NEG_INFINITY;
    let mut face = 0;
    for (i, (v, n)) in vertices.iter().zip(normals).enumerate() {
        let s = n.dot(&(center - v));
        if s > radius {
            return None;
        }
        if s > separation {
            separation = s;
            face = i;
        }
    }

    if separation < EPSILON {
        // centre inside the polygon
        return Some(Manifold {
            normal: normals[face],
            depth: radius - separation,
        });
    }

    let v1 = vertices[face];
    let v2 = vertices[(face + 1) % vertices.len()];
    let edge = v2 - v1;
    let t = ((center - v1).dot(&edge) / edge.norm_squared().max(EPSILON)).clamp(0.0, 1.0);
    let offset = center - (v1 + edge * t);
    let distance = offset.norm();
    if distance > radius {
        return None;
    }
    let normal = if distance > EPSILON {
        offset / distance
    } else {
        normals[face]
    };
    Some(Manifold {
        normal,
        depth: radius - distance,
    })
}

fn max_separation(va: &[Vec2], na: &[Vec2], vb: &[Vec2]) -> (f32, usize) {
    let mut best = f32::NEG_INFINITY;
    let mut face = 0;
    for (i, (v, n)) in va.iter().zip(na).enumerate() {
        let s = vb
            .iter()
            .map(|p| n.dot(&(p - v)))
            .fold(f32::INFINITY, f32::min);
        if s > best {
            best = s;
            face = i;
        }
    }
    (best, face)
}

fn polygon_polygon(va: &[Vec2], na: &[Vec2], vb: &[Vec2], nb: &[Vec2]) -> Option<Manifold> {
    let (separation_a, face_a) = max_separation(va, na, vb);
    if separation_a > 0.0 {
        return None;
    }
    let (separation_b, face_b) = max_separation(vb, nb, va);
    if separation_b > 0.0 {
        return None;
    }

    if separation_a >= separation_b {
        Some(Manifold {
            normal: na[face_a],
            depth: -separation_a,
        })
    } else {
        Some(Manifold {
            normal: -nb[face_b],
            depth: -separation_b,
        })
    }
}

/// Segment cast from `start` to `end`.
///
/// Returns the fraction along the segment of the first hit and the surface
/// normal there. Segments starting inside a shape do not report it.
pub fn ray_cast(shape: &WorldShape, start: Vec2, end: Vec2) -> Option<(f32, Vec2)> {
    let direction = end - start;
    match shape {
        WorldShape::Circle { center, radius } => {
            let s = start - center;
            let b = s.norm_squared() - radius * radius;
            let c = s.dot(&direction);
            let rr = direction.norm_squared();
            let sigma = c * c - rr * b;
            if sigma < 0.0 || rr < EPSILON {
                return None;
            }
            let a = -(c + sigma.sqrt());
            if (0.0..=rr).contains(&a) {
                let fraction = a / rr;
                let normal = (s + direction * fraction).normalize();
                Some((fraction, normal))
            } else {
                None
            }
        }
        WorldShape::Polygon { vertices, normals } => {
            let (mut lower, mut upper) = (0.0_f32, 1.0_f32);
            let mut hit_face = None;
            for (i, (v, n)) in vertices.iter().zip(normals).enumerate() {
                let numerator = n.dot(&(v - start));
                let denominator = n.dot(&direction);
                if denominator.abs() < EPSILON {
                    if numerator < 0.0 {
                        return None;
                    }
                } else if denominator < 0.0 && numerator < lower * denominator {
                    lower = numerator / denominator;
                    hit_face = Some(i);
                } else if denominator > 0.0 && numerator < upper * denominator {
                    upper = numerator / denominator;
                }
                if upper < lower {
                    return None;
                }
            }
            hit_face.map(|face| (lower, normals[face]))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_box_at(x: f32, y: f32) -> WorldShape {
        Shape::rect(Vec2::zeros(), Vec2::new(2.0, 2.0), 0.0).to_world(Vec2::new(x, y), 0.0)
    }

    #[test]
    fn test_polygon_winding_is_normalized() {
        let clockwise = [Vec2::new(0.0, 0.0), Vec2::new(0.0, 1.0), Vec2::new(1.0, 1.0), Vec2::new(1.0, 0.0)];
        let Some(Shape::Polygon { vertices }) = Shape::polygon(&clockwise) else {
            panic!("expected a polygon");
        };
        assert!(signed_area(&vertices) > 0.0);
        assert!(Shape::polygon(&clockwise[..2]).is_none());
        assert_relative_eq!(Shape::polygon(&clockwise).unwrap().area(), 1.0);
    }

    #[test]
    fn test_circle_circle_normal_points_a_to_b() {
        let a = Shape::circle(Vec2::zeros(), 1.0).to_world(Vec2::zeros(), 0.0);
        let b = Shape::circle(Vec2::zeros(), 1.0).to_world(Vec2::new(1.5, 0.0), 0.0);
        let manifold = collide(&a, &b).unwrap();
        assert_relative_eq!(manifold.normal.x, 1.0);
        assert_relative_eq!(manifold.depth, 0.5);

        let far = Shape::circle(Vec2::zeros(), 1.0).to_world(Vec2::new(3.0, 0.0), 0.0);
        assert!(collide(&a, &far).is_none());
    }

    #[test]
    fn test_box_box_overlap() {
        let manifold = collide(&unit_box_at(0.0, 0.0), &unit_box_at(1.5, 0.2)).unwrap();
        assert_relative_eq!(manifold.normal.x, 1.0, epsilon = 1e-5);
        assert_relative_eq!(manifold.depth, 0.5, epsilon = 1e-5);

        assert!(collide(&unit_box_at(0.0, 0.0), &unit_box_at(2.5, 0.0)).is_none());
    }

    #[test]
    fn test_rotated_box_separation() {
        // a diamond whose tip stops short of the box face
        let diamond = Shape::rect(Vec2::zeros(), Vec2::new(2.0, 2.0), std::f32::consts::FRAC_PI_4)
            .to_world(Vec2::new(2.5, 0.0), 0.0);
        assert!(collide(&unit_box_at(0.0, 0.0), &diamond).is_none());

        let touching = Shape::rect(Vec2::zeros(), Vec2::new(2.0, 2.0), std::f32::consts::FRAC_PI_4)
            .to_world(Vec2::new(2.2, 0.0), 0.0);
        assert!(collide(&unit_box_at(0.0, 0.0), &touching).is_some());
    }

    #[test]
    fn test_circle_against_box_corner_and_face() {
        let ground = unit_box_at(0.0, 0.0);
        let above = Shape::circle(Vec2::zeros(), 0.5).to_world(Vec2::new(0.0, -1.3), 0.0);
        let manifold = collide(&ground, &above).unwrap();
        assert_relative_eq!(manifold.normal.y, -1.0, epsilon = 1e-5);
        assert_relative_eq!(manifold.depth, 0.2, epsilon = 1e-5);

        // reversed order flips the normal
        let reversed = collide(&above, &ground).unwrap();
        assert_relative_eq!(reversed.normal.y, 1.0, epsilon = 1e-5);

        let near_corner = Shape::circle(Vec2::zeros(), 0.5).to_world(Vec2::new(1.4, 1.4), 0.0);
        assert!(collide(&ground, &near_corner).is_none());
    }

    #[test]
    fn test_ray_hits_nearest_face() {
        let target = unit_box_at(5.0, 0.0);
        let (fraction, normal) = ray_cast(&target, Vec2::zeros(), Vec2::new(10.0, 0.0)).unwrap();
        assert_relative_eq!(fraction, 0.4, epsilon = 1e-5);
        assert_relative_eq!(normal.x, -1.0, epsilon = 1e-5);

        assert!(ray_cast(&target, Vec2::zeros(), Vec2::new(0.0, 10.0)).is_none());
    }

    #[test]
    fn test_ray_hits_circle() {
        let target = Shape::circle(Vec2::zeros(), 1.0).to_world(Vec2::new(0.0, 5.0), 0.0);
        let (fraction, normal) = ray_cast(&target, Vec2::zeros(), Vec2::new(0.0, 10.0)).unwrap();
        assert_relative_eq!(fraction, 0.4, epsilon = 1e-5);
        assert_relative_eq!(normal.y, -1.0, epsilon = 1e-5);
    }
}
