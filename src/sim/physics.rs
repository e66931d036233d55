//! Falling fragment dynamics
//!
//! The physics side owns only detached overhangs. Committed layers never
//! enter here: the stack is authoritative for them. Each fragment is a free
//! rigid box under gravity with a fixed tumble picked at spawn time, and it
//! is dropped once it falls past the kill plane. Transforms flow out to the
//! renderer; nothing flows back in.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::layer::Fragment;
use crate::Axis;
use crate::consts::{FRAGMENT_KILL_DEPTH, GRAVITY};
use crate::error::{SimError, SimResult};

/// Spin applied to an overhang as it tips off the edge (radians/sec)
pub const TUMBLE_RATE: f32 = 2.5;
/// Sideways push away from the surviving layer (units/sec)
pub const EDGE_PUSH: f32 = 0.6;

/// A simulated fragment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FragmentBody {
    pub id: u32,
    pub position: Vec3,
    pub velocity: Vec3,
    pub rotation: Quat,
    pub angular_velocity: Vec3,
    pub half_extents: Vec3,
    pub hue: f32,
}

impl FragmentBody {
    fn from_fragment(id: u32, fragment: &Fragment) -> Self {
        let side = fragment.side;
        // Tip the far edge downward: about -Z for cuts along X, about +X for cuts along Z
        let (angular_velocity, velocity) = match fragment.cut_axis {
            Axis::X => (
                Vec3::new(0.0, 0.0, -side * TUMBLE_RATE),
                Vec3::new(side * EDGE_PUSH, 0.0, 0.0),
            ),
            Axis::Z => (
                Vec3::new(side * TUMBLE_RATE, 0.0, 0.0),
                Vec3::new(0.0, 0.0, side * EDGE_PUSH),
            ),
        };

        Self {
            id,
            position: fragment.position,
            velocity,
            rotation: Quat::IDENTITY,
            angular_velocity,
            half_extents: fragment.size() * 0.5,
            hue: fragment.hue,
        }
    }

    /// Advance one step (semi-implicit Euler)
    fn integrate(&mut self, dt: f32) {
        self.velocity.y += GRAVITY * dt;
        self.position += self.velocity * dt;

        if self.angular_velocity != Vec3::ZERO {
            let spin = Quat::from_scaled_axis(self.angular_velocity * dt);
            self.rotation = (spin * self.rotation).normalize();
        }
    }
}

/// Snapshot of a body for drawing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FragmentTransform {
    pub id: u32,
    pub position: Vec3,
    pub rotation: Quat,
    pub half_extents: Vec3,
    pub hue: f32,
}

/// All fragments currently in flight (sorted by id for determinism)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FragmentWorld {
    bodies: Vec<FragmentBody>,
    next_id: u32,
}

impl Default for FragmentWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl FragmentWorld {
    pub fn new() -> Self {
        Self {
            bodies: Vec::new(),
            next_id: 1,
        }
    }

    /// Hand a fragment over to the simulation and return its handle
    pub fn spawn(&mut self, fragment: &Fragment) -> u32 {
        let id = self.next_id;
        self.next_id = id + 1;
        self.bodies.push(FragmentBody::from_fragment(id, fragment));
        id
    }

    /// Remove a body by handle
    pub fn remove(&mut self, id: u32) -> SimResult<()> {
        let index = self
            .bodies
            .iter()
            .position(|b| b.id == id)
            .ok_or(SimError::UnknownFragment(id))?;
        self.bodies.remove(index);
        Ok(())
    }

    /// Drop every body (used on reset)
    pub fn clear(&mut self) {
        self.bodies.clear();
    }

    /// Advance all bodies and cull the ones that left the world
    pub fn step(&mut self, dt: f32) {
        for body in &mut self.bodies {
            body.integrate(dt);
        }

        let before = self.bodies.len();
        self.bodies.retain(|b| b.position.y > FRAGMENT_KILL_DEPTH);
        let culled = before - self.bodies.len();
        if culled > 0 {
            log::trace!("Culled {} fragment(s), {} in flight", culled, self.bodies.len());
        }
    }

    /// Copy transforms out for rendering
    pub fn transforms(&self) -> impl Iterator<Item = FragmentTransform> + '_ {
        self.bodies.iter().map(|b| FragmentTransform {
            id: b.id,
            position: b.position,
            rotation: b.rotation,
            half_extents: b.half_extents,
            hue: b.hue,
        })
    }

    pub fn get(&self, id: u32) -> Option<&FragmentBody> {
        self.bodies.iter().find(|b| b.id == id)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;

    fn overhang(axis: Axis, side: f32) -> Fragment {
        Fragment {
            position: Vec3::new(1.5, 0.2, 0.0),
            width: 1.0,
            depth: 2.0,
            height: 0.2,
            hue: 40.0,
            cut_axis: axis,
            side,
        }
    }

    #[test]
    fn test_spawn_assigns_unique_ids() {
        let mut world = FragmentWorld::new();
        let a = world.spawn(&overhang(Axis::X, 1.0));
        let b = world.spawn(&overhang(Axis::Z, -1.0));
        assert_ne!(a, b);
        assert_eq!(world.len(), 2);
        assert_eq!(world.get(a).map(|b| b.half_extents), Some(Vec3::new(0.5, 0.1, 1.0)));
    }

    #[test]
    fn test_default_world_hands_out_ids_from_one() {
        let mut world = FragmentWorld::default();
        assert!(world.is_empty());
        assert_eq!(world.spawn(&overhang(Axis::X, 1.0)), 1);
        assert_eq!(world.spawn(&overhang(Axis::X, 1.0)), 2);
        assert_eq!(FragmentWorld::new().spawn(&overhang(Axis::Z, -1.0)), 1);
    }

    #[test]
    fn test_fragment_falls_under_gravity() {
        let mut world = FragmentWorld::new();
        let id = world.spawn(&overhang(Axis::X, 1.0));
        let start = world.get(id).map(|b| b.position).unwrap_or_default();

        for _ in 0..30 {
            world.step(SIM_DT);
        }

        let body = world.get(id).expect("body still in flight");
        assert!(body.position.y < start.y);
        assert!(body.velocity.y < 0.0);
        // Pushed away from the stack on the overhang side
        assert!(body.position.x > start.x);
    }

    #[test]
    fn test_overhang_tips_outward() {
        let mut world = FragmentWorld::new();
        let id = world.spawn(&overhang(Axis::X, 1.0));
        for _ in 0..10 {
            world.step(SIM_DT);
        }
        let body = world.get(id).expect("body still in flight");
        // The +X face should now point partly downward
        let outward = body.rotation * Vec3::X;
        assert!(outward.y < 0.0);

        let id = world.spawn(&overhang(Axis::Z, 1.0));
        for _ in 0..10 {
            world.step(SIM_DT);
        }
        let body = world.get(id).expect("body still in flight");
        let outward = body.rotation * Vec3::Z;
        assert!(outward.y < 0.0);
    }

    #[test]
    fn test_whole_layer_does_not_spin() {
        let mut world = FragmentWorld::new();
        let id = world.spawn(&overhang(Axis::X, 0.0));
        world.step(SIM_DT);
        assert_eq!(world.get(id).map(|b| b.rotation), Some(Quat::IDENTITY));
    }

    #[test]
    fn test_fragments_culled_below_kill_plane() {
        let mut world = FragmentWorld::new();
        world.spawn(&overhang(Axis::X, 1.0));

        // Free fall from y=0.2 to -30 takes well under 5 seconds at g=10
        for _ in 0..(5.0 / SIM_DT) as u32 {
            world.step(SIM_DT);
        }
        assert!(world.is_empty());
    }

    #[test]
    fn test_remove_unknown_fragment() {
        let mut world = FragmentWorld::new();
        let id = world.spawn(&overhang(Axis::X, 1.0));
        assert_eq!(world.remove(id), Ok(()));
        assert_eq!(world.remove(id), Err(SimError::UnknownFragment(id)));
    }

    #[test]
    fn test_transforms_copy_out() {
        let mut world = FragmentWorld::new();
        world.spawn(&overhang(Axis::X, 1.0));
        world.spawn(&overhang(Axis::Z, -1.0));
        let transforms: Vec<_> = world.transforms().collect();
        assert_eq!(transforms.len(), 2);
        assert_eq!(transforms[0].hue, 40.0);
    }
}
