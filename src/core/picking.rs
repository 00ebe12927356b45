//! Pointer picking: NDC pointer → world ray → nearest star sphere.

use glam::{Vec2, Vec3, Vec4};

use crate::camera::Camera;
use crate::field::StarEntity;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit length.
    pub direction: Vec3,
}

impl Ray {
    /// Smallest non-negative ray parameter where the ray meets the sphere, if any.
    pub fn intersect_sphere(&self, center: Vec3, radius: f32) -> Option<f32> {
        let m = self.origin - center;
        let b = m.dot(self.direction);
        let c = m.length_squared() - radius * radius;
        let disc = b * b - c;
        if disc < 0.0 {
            return None;
        }
        let sqrt_d = disc.sqrt();
        let t1 = -b - sqrt_d;
        let t2 = -b + sqrt_d;
        if t1 >= 0.0 {
            Some(t1)
        } else if t2 >= 0.0 {
            // Origin inside the sphere.
            Some(t2)
        } else {
            None
        }
    }
}

/// Window pixel coordinates to normalized device coordinates (y up).
pub fn window_to_ndc(px: f32, py: f32, width: f32, height: f32) -> Vec2 {
    Vec2::new(
        px / width.max(1.0) * 2.0 - 1.0,
        -(py / height.max(1.0) * 2.0 - 1.0),
    )
}

/// Ray from the camera through the pointer at `ndc`.
pub fn ray_from_camera(camera: &Camera, ndc: Vec2) -> Option<Ray> {
    let inv = camera.view_projection().inverse();
    let far = inv * Vec4::new(ndc.x, ndc.y, 1.0, 1.0);
    if far.w.abs() < f32::EPSILON {
        return None;
    }
    let far = far.truncate() / far.w;
    let direction = (far - camera.position).try_normalize()?;
    Some(Ray {
        origin: camera.position,
        direction,
    })
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickHit {
    /// Index into the field's star slice.
    pub index: usize,
    pub distance: f32,
}

/// Nearest star hit by `ray`. Stars are spheres of `star_radius * scale`.
pub fn pick_nearest(ray: &Ray, stars: &[StarEntity], star_radius: f32) -> Option<PickHit> {
    stars
        .iter()
        .enumerate()
        .filter_map(|(index, s)| {
            ray.intersect_sphere(s.position, star_radius * s.scale)
                .map(|distance| PickHit { index, distance })
        })
        .min_by(|a, b| a.distance.total_cmp(&b.distance))
}
