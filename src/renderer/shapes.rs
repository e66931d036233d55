//! Box mesh generation for layers and fragments

use glam::{Quat, Vec3};

use super::vertex::Vertex;
use crate::sim::GameSession;

/// Face normal plus two in-plane axes with `u x v = n`
const FACES: [(Vec3, Vec3, Vec3); 6] = [
    (Vec3::X, Vec3::Y, Vec3::Z),
    (Vec3::NEG_X, Vec3::Z, Vec3::Y),
    (Vec3::Y, Vec3::Z, Vec3::X),
    (Vec3::NEG_Y, Vec3::X, Vec3::Z),
    (Vec3::Z, Vec3::X, Vec3::Y),
    (Vec3::NEG_Z, Vec3::Y, Vec3::X),
];

/// Corner order around a face, counter-clockwise seen from outside
const CORNERS: [(f32, f32); 4] = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];

pub const VERTICES_PER_BOX: usize = 36;

/// HSL (degrees, 0-1, 0-1) to sRGB
pub fn hsl_to_rgb(hue: f32, saturation: f32, lightness: f32) -> [f32; 3] {
    let h = hue.rem_euclid(360.0) / 60.0;
    let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let m = lightness - c / 2.0;

    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    [r + m, g + m, b + m]
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Linear RGBA for a fully saturated, mid-lightness hue
pub fn layer_color(hue: f32) -> [f32; 4] {
    let [r, g, b] = hsl_to_rgb(hue, 1.0, 0.5);
    [srgb_to_linear(r), srgb_to_linear(g), srgb_to_linear(b), 1.0]
}

/// Append the 36 vertices of an oriented box
pub fn push_box(
    out: &mut Vec<Vertex>,
    center: Vec3,
    half_extents: Vec3,
    rotation: Quat,
    color: [f32; 4],
) {
    for (n, u, v) in FACES {
        let corner = |a: f32, b: f32| center + rotation * ((n + u * a + v * b) * half_extents);
        let normal = (rotation * n).to_array();
        let quad = CORNERS.map(|(a, b)| corner(a, b).to_array());

        for i in [0, 1, 2, 0, 2, 3] {
            out.push(Vertex::new(quad[i], normal, color));
        }
    }
}

/// One oriented, colored box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxInstance {
    pub center: Vec3,
    pub half_extents: Vec3,
    pub rotation: Quat,
    pub hue: f32,
}

/// Every layer in the stack (bottom up) followed by every fragment in flight
///
/// Visibility is left to the depth test, so the order carries no meaning.
pub fn scene_boxes(session: &GameSession) -> Vec<BoxInstance> {
    let layers = session.stack.layers().iter().map(|layer| BoxInstance {
        center: layer.position,
        half_extents: layer.half_extents(),
        rotation: Quat::IDENTITY,
        hue: layer.hue,
    });
    let fragments = session.fragments.transforms().map(|f| BoxInstance {
        center: f.position,
        half_extents: f.half_extents,
        rotation: f.rotation,
        hue: f.hue,
    });

    layers.chain(fragments).collect()
}

/// Vertex list for the whole scene
pub fn scene_vertices(session: &GameSession) -> Vec<Vertex> {
    let boxes = scene_boxes(session);
    let mut vertices = Vec::with_capacity(boxes.len() * VERTICES_PER_BOX);
    for b in &boxes {
        push_box(
            &mut vertices,
            b.center,
            b.half_extents,
            b.rotation,
            layer_color(b.hue),
        );
    }
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::CameraRig;
    use crate::sim::{Difficulty, InputEvent, handle_input};

    fn approx(a: [f32; 3], b: [f32; 3]) -> bool {
        a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-4)
    }

    #[test]
    fn test_hsl_primaries() {
        assert!(approx(hsl_to_rgb(0.0, 1.0, 0.5), [1.0, 0.0, 0.0]));
        assert!(approx(hsl_to_rgb(120.0, 1.0, 0.5), [0.0, 1.0, 0.0]));
        assert!(approx(hsl_to_rgb(240.0, 1.0, 0.5), [0.0, 0.0, 1.0]));
        assert!(approx(hsl_to_rgb(60.0, 1.0, 0.5), [1.0, 1.0, 0.0]));
        assert!(approx(hsl_to_rgb(360.0, 1.0, 0.5), [1.0, 0.0, 0.0]));
        assert!(approx(hsl_to_rgb(200.0, 0.0, 0.25), [0.25, 0.25, 0.25]));
    }

    #[test]
    fn test_box_winding_faces_outward() {
        let mut vertices = Vec::new();
        let center = Vec3::new(1.0, 2.0, 3.0);
        push_box(
            &mut vertices,
            center,
            Vec3::new(1.0, 0.1, 0.5),
            Quat::from_rotation_z(0.7),
            [1.0; 4],
        );
        assert_eq!(vertices.len(), VERTICES_PER_BOX);

        for tri in vertices.chunks(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|v| Vec3::from(v.position));
            let normal = Vec3::from(tri[0].normal);
            let face = (b - a).cross(c - a);
            assert!(face.dot(normal) > 0.0, "triangle wound clockwise");
            assert!((a - center).dot(normal) > 0.0, "normal points inward");
        }
    }

    #[test]
    fn test_box_spans_extents() {
        let mut vertices = Vec::new();
        push_box(
            &mut vertices,
            Vec3::ZERO,
            Vec3::new(1.0, 0.1, 0.5),
            Quat::IDENTITY,
            [1.0; 4],
        );
        let max = vertices
            .iter()
            .fold(Vec3::splat(f32::MIN), |m, v| m.max(Vec3::from(v.position)));
        assert!(approx(max.to_array(), [1.0, 0.1, 0.5]));
    }

    #[test]
    fn test_scene_has_a_box_per_body() {
        let mut session = GameSession::new(5, Difficulty::Easy);
        assert_eq!(scene_vertices(&session).len(), 2 * VERTICES_PER_BOX);

        let fragment = session.stack.layers()[1].to_fragment();
        session.fragments.spawn(&fragment);
        assert_eq!(scene_vertices(&session).len(), 3 * VERTICES_PER_BOX);
    }

    /// Color of the nearest surface under `target`, resolved like a `Less` depth test
    fn nearest_color(vertices: &[Vertex], camera: &CameraRig, target: Vec3) -> Option<[f32; 4]> {
        let view_proj = camera.view_proj();
        let project = |p: Vec3| {
            let clip = view_proj * p.extend(1.0);
            clip.truncate() / clip.w
        };
        let t = project(target);
        let cross = |o: Vec3, p: Vec3, q: Vec3| (p.x - o.x) * (q.y - o.y) - (q.x - o.x) * (p.y - o.y);

        let mut nearest: Option<(f32, [f32; 4])> = None;
        for tri in vertices.chunks(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|v| project(Vec3::from(v.position)));
            let area = cross(a, b, c);
            if area.abs() < 1e-9 {
                continue;
            }
            let wa = cross(t, b, c) / area;
            let wb = cross(t, c, a) / area;
            let wc = 1.0 - wa - wb;
            if wa < 0.0 || wb < 0.0 || wc < 0.0 {
                continue;
            }
            let z = wa * a.z + wb * b.z + wc * c.z;
            if nearest.is_none_or(|(best, _)| z < best) {
                nearest = Some((z, tri[0].color));
            }
        }
        nearest.map(|(_, color)| color)
    }

    #[test]
    fn test_short_drop_stays_visible_over_foundation() {
        let mut session = GameSession::new(5, Difficulty::Hard);
        handle_input(&mut session, InputEvent::Start).expect("start");
        // Mover from -10 to -0.2: lands short of the foundation center
        session.stack.advance(9.8);
        handle_input(&mut session, InputEvent::Place).expect("place");

        let foundation = session.stack.layers()[0].clone();
        let placed = session.stack.layers()[1].clone();
        assert!(placed.position.x < 0.0);

        let camera = CameraRig::new(800, 600);
        let vertices = scene_vertices(&session);

        // Top face of the placed layer wins over the foundation beneath it
        // (points kept off the face diagonals shared by two triangles)
        let top = placed.position + Vec3::new(0.02, placed.height * 0.5, 0.1);
        assert_eq!(nearest_color(&vertices, &camera, top), Some(layer_color(placed.hue)));

        // Uncovered corner of the foundation still shows the foundation
        let corner = Vec3::new(0.2, foundation.height * 0.5, 0.1);
        assert_eq!(
            nearest_color(&vertices, &camera, corner),
            Some(layer_color(foundation.hue))
        );

        // Result does not depend on submission order
        let reversed: Vec<Vertex> = vertices
            .chunks(VERTICES_PER_BOX)
            .rev()
            .flatten()
            .copied()
            .collect();
        assert_eq!(nearest_color(&reversed, &camera, top), Some(layer_color(placed.hue)));
    }
}
