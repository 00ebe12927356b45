//! macroquad renderer for the frame pipeline.

use macroquad::prelude::*;

use starfield::camera::{Camera as SceneCamera, FocusMode};
use starfield::galaxy::GalaxyCloud;
use starfield::record::Rgb;
use starfield::scheduler::{DrawSink, FrameView};

// macroquad caps geometry per draw call (vertices and indices); stay below both.
const POINTS_PER_MESH: usize = 800;
const POINT_SIZE: f32 = 0.35;
const PATH_COLOR: Color = Color::new(0.55, 0.75, 1.0, 0.45);
const SELECT_COLOR: Color = Color::new(1.0, 0.85, 0.3, 0.9);

fn to_mq(v: starfield::glam::Vec3) -> Vec3 {
    vec3(v.x, v.y, v.z)
}

fn color_of(rgb: Rgb, alpha: f32) -> Color {
    Color::new(rgb.r, rgb.g, rgb.b, alpha)
}

/// Each galaxy point becomes a small cross of two triangles so it reads from any angle.
pub fn make_galaxy_meshes(galaxy: &GalaxyCloud) -> Vec<Mesh> {
    let h = POINT_SIZE;
    galaxy
        .points()
        .chunks(POINTS_PER_MESH)
        .map(|chunk| {
            let mut vertices = Vec::with_capacity(chunk.len() * 6);
            let mut indices = Vec::with_capacity(chunk.len() * 6);

            for (i, pt) in chunk.iter().enumerate() {
                let c = to_mq(pt.position);
                let col = color_of(pt.color, 0.8);
                let base = (i * 6) as u16;
                let corners = [
                    c + vec3(-h, 0.0, 0.0),
                    c + vec3(h, 0.0, 0.0),
                    c + vec3(0.0, h, 0.0),
                    c + vec3(0.0, 0.0, -h),
                    c + vec3(0.0, 0.0, h),
                    c + vec3(0.0, -h, 0.0),
                ];
                for p in corners {
                    vertices.push(Vertex::new(p.x, p.y, p.z, 0.0, 0.0, col));
                }
                indices.extend_from_slice(&[base, base + 1, base + 2, base + 3, base + 4, base + 5]);
            }

            Mesh {
                vertices,
                indices,
                texture: None,
            }
        })
        .collect()
}

fn camera3d(cam: &SceneCamera, yaw: f32) -> Camera3D {
    // Rotating the world by `yaw` about Y is the same as orbiting the eye by `-yaw`.
    let rot = starfield::glam::Quat::from_rotation_y(-yaw);
    Camera3D {
        position: to_mq(rot * cam.position),
        target: to_mq(rot * cam.target),
        up: to_mq(rot * cam.up),
        fovy: cam.fovy,
        aspect: Some(cam.aspect),
        z_near: cam.near,
        z_far: cam.far,
        ..Default::default()
    }
}

pub struct VisSink {
    galaxy_meshes: Vec<Mesh>,
}

impl VisSink {
    pub fn new(galaxy: &GalaxyCloud) -> Self {
        Self {
            galaxy_meshes: make_galaxy_meshes(galaxy),
        }
    }
}

impl DrawSink for VisSink {
    fn draw(&mut self, view: &FrameView<'_>) {
        clear_background(Color::from_rgba(2, 2, 8, 255));

        set_camera(&camera3d(view.camera, view.galaxy.rotation_y()));
        for m in &self.galaxy_meshes {
            draw_mesh(m);
        }

        set_camera(&camera3d(view.camera, 0.0));
        for (i, star) in view.stars.iter().enumerate() {
            let radius = view.star_radius * star.scale;
            let color = color_of(star.record().color, star.opacity());
            draw_sphere(to_mq(star.position), radius, None, color);
            if view.selection == Some(i) {
                draw_sphere_wires(to_mq(star.position), radius * 1.6, None, SELECT_COLOR);
            }
        }

        if let Some(path) = &view.path {
            for seg in path.windows(2) {
                draw_line_3d(to_mq(seg[0]), to_mq(seg[1]), PATH_COLOR);
            }
        }

        set_default_camera();

        if view.mode == FocusMode::Focusing {
            draw_text("focusing...", 16.0, screen_height() - 16.0, 20.0, GRAY);
        }
    }
}
