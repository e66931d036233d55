//! Overlap resolution between a moving layer and the layer beneath it
//!
//! The heart of the game: decide how much of a dropped layer survives, how
//! much breaks off as an overhang, and whether the drop missed entirely.
//! Everything here is pure arithmetic along a single horizontal axis.

use serde::{Deserialize, Serialize};

use super::layer::{Fragment, Layer};
use crate::Axis;

/// Outcome of dropping a layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Placement {
    /// No shared extent; the round is over
    Miss,
    /// Part (or all) of the layer rests on the one below
    Hit(Cut),
}

/// Measurements of a successful drop along the active axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cut {
    pub axis: Axis,
    /// Shared extent with the layer below; always > 0
    pub overlap: f32,
    /// Extent of the moving layer before trimming
    pub size: f32,
    /// Signed offset of the moving layer from the one below
    pub delta: f32,
}

impl Cut {
    /// Length of the part that hangs over the edge
    #[inline]
    pub fn overhang(&self) -> f32 {
        self.delta.abs()
    }

    /// True when nothing needs trimming
    #[inline]
    pub fn is_perfect(&self) -> bool {
        self.overhang() <= 0.0
    }

    /// Where the surviving part is centered, given the pre-trim center
    #[inline]
    pub fn trimmed_center(&self, original: f32) -> f32 {
        original - self.delta / 2.0
    }

    /// Offset from the trimmed center to the overhang's center
    ///
    /// Places the overhang flush against the trimmed edge, on the side the
    /// excess stuck out.
    #[inline]
    pub fn overhang_offset(&self) -> f32 {
        self.delta.signum() * (self.overlap / 2.0 + self.overhang() / 2.0)
    }
}

/// Resolve a drop from raw coordinates along one axis
///
/// `top_pos`/`top_size` describe the moving layer, `prev_pos` the center of
/// the layer it lands on. `overlap <= 0` is a miss.
pub fn resolve(axis: Axis, top_pos: f32, top_size: f32, prev_pos: f32) -> Placement {
    let delta = top_pos - prev_pos;
    let overhang = delta.abs();
    let overlap = top_size - overhang;

    if overlap > 0.0 {
        Placement::Hit(Cut {
            axis,
            overlap,
            size: top_size,
            delta,
        })
    } else {
        Placement::Miss
    }
}

/// Resolve a drop of `top` onto `prev` along `top`'s motion axis
pub fn resolve_layers(top: &Layer, prev: &Layer) -> Placement {
    let axis = top.axis;
    resolve(axis, top.coord(axis), top.extent(axis), prev.coord(axis))
}

/// Split a layer according to a cut
///
/// Returns the surviving layer and the overhang. A perfect drop yields no
/// fragment, so callers never see a zero-sized piece.
pub fn split(top: &Layer, cut: &Cut) -> (Layer, Option<Fragment>) {
    let axis = cut.axis;

    let mut trimmed = top.clone();
    trimmed.set_extent(axis, cut.overlap);
    *axis.of_mut(&mut trimmed.position) = cut.trimmed_center(top.coord(axis));

    if cut.is_perfect() {
        return (trimmed, None);
    }

    let mut position = trimmed.position;
    *axis.of_mut(&mut position) += cut.overhang_offset();

    let (width, depth) = match axis {
        Axis::X => (cut.overhang(), trimmed.depth),
        Axis::Z => (trimmed.width, cut.overhang()),
    };

    let fragment = Fragment {
        position,
        width,
        depth,
        height: trimmed.height,
        hue: trimmed.hue,
        cut_axis: axis,
        side: cut.delta.signum(),
    };

    (trimmed, Some(fragment))
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use proptest::prelude::*;

    const EPS: f32 = 1e-5;

    fn layer_at(x: f32, z: f32, width: f32, depth: f32, axis: Axis) -> Layer {
        Layer::new(Vec3::new(x, 0.2, z), width, depth, 0.2, axis, 0.0)
    }

    #[test]
    fn test_resolve_partial_hit_along_x() {
        let top = layer_at(1.0, 0.0, 2.0, 2.0, Axis::X);
        let prev = layer_at(0.0, 0.0, 2.0, 2.0, Axis::Z);

        let Placement::Hit(cut) = resolve_layers(&top, &prev) else {
            panic!("expected a hit");
        };
        assert!((cut.delta - 1.0).abs() < EPS);
        assert!((cut.overhang() - 1.0).abs() < EPS);
        assert!((cut.size - 2.0).abs() < EPS);
        assert!((cut.overlap - 1.0).abs() < EPS);

        let (trimmed, fragment) = split(&top, &cut);
        assert!((trimmed.width - 1.0).abs() < EPS);
        assert!((trimmed.position.x - 0.5).abs() < EPS);
        assert_eq!(trimmed.depth, 2.0);

        let fragment = fragment.expect("overhang expected");
        assert!((fragment.width - 1.0).abs() < EPS);
        assert!((fragment.position.x - 1.5).abs() < EPS);
        assert_eq!(fragment.depth, 2.0);
        assert_eq!(fragment.position.z, 0.0);
        assert_eq!(fragment.side, 1.0);
    }

    #[test]
    fn test_resolve_negative_delta_along_z() {
        let top = layer_at(0.3, -0.5, 1.0, 1.0, Axis::Z);
        let prev = layer_at(0.3, 0.0, 1.0, 1.0, Axis::X);

        let Placement::Hit(cut) = resolve_layers(&top, &prev) else {
            panic!("expected a hit");
        };
        let (trimmed, fragment) = split(&top, &cut);
        assert!((trimmed.depth - 0.5).abs() < EPS);
        assert!((trimmed.position.z - (-0.25)).abs() < EPS);
        // Untouched perpendicular geometry
        assert_eq!(trimmed.width, 1.0);
        assert_eq!(trimmed.position.x, 0.3);

        let fragment = fragment.expect("overhang expected");
        assert!((fragment.depth - 0.5).abs() < EPS);
        assert!((fragment.position.z - (-0.75)).abs() < EPS);
        assert_eq!(fragment.width, trimmed.width);
        assert_eq!(fragment.side, -1.0);
    }

    #[test]
    fn test_resolve_perfect_drop() {
        let top = layer_at(0.0, 0.0, 2.0, 2.0, Axis::X);
        let prev = layer_at(0.0, 0.0, 2.0, 2.0, Axis::Z);

        let Placement::Hit(cut) = resolve_layers(&top, &prev) else {
            panic!("expected a hit");
        };
        assert!(cut.is_perfect());
        assert_eq!(cut.overlap, cut.size);

        let (trimmed, fragment) = split(&top, &cut);
        assert!(fragment.is_none());
        assert_eq!(trimmed, top);
    }

    #[test]
    fn test_resolve_miss() {
        assert_eq!(resolve(Axis::X, 2.5, 2.0, 0.0), Placement::Miss);
        assert_eq!(resolve(Axis::Z, -2.5, 2.0, 0.0), Placement::Miss);
    }

    #[test]
    fn test_resolve_touching_edges_is_miss() {
        // Edges meet but share no extent
        assert_eq!(resolve(Axis::X, 2.0, 2.0, 0.0), Placement::Miss);
    }

    proptest! {
        #[test]
        fn prop_hit_trims_to_overlap(
            size in 0.05f32..4.0,
            prev in -5.0f32..5.0,
            frac in -0.99f32..0.99,
        ) {
            let top_pos = prev + frac * size;
            let top = layer_at(top_pos, 0.0, size, size, Axis::X);
            let below = layer_at(prev, 0.0, size, size, Axis::Z);

            match resolve_layers(&top, &below) {
                Placement::Hit(cut) => {
                    let (trimmed, fragment) = split(&top, &cut);
                    prop_assert!((trimmed.width - cut.overlap).abs() < 1e-4);
                    prop_assert!(trimmed.width <= cut.size);
                    prop_assert!(
                        (trimmed.position.x - (top_pos - cut.delta / 2.0)).abs() < 1e-4
                    );
                    if let Some(f) = fragment {
                        prop_assert!(f.width > 0.0);
                        let expected = trimmed.position.x
                            + cut.delta.signum() * (cut.overlap / 2.0 + cut.overhang() / 2.0);
                        prop_assert!((f.position.x - expected).abs() < 1e-4);
                        // Trimmed part and overhang add back up to the original
                        prop_assert!((trimmed.width + f.width - size).abs() < 1e-4);
                    }
                }
                Placement::Miss => prop_assert!(false, "overlap was positive"),
            }
        }

        #[test]
        fn prop_non_positive_overlap_misses(
            size in 0.05f32..4.0,
            prev in -5.0f32..5.0,
            extra in 0.001f32..5.0,
            negative in any::<bool>(),
        ) {
            let offset = size + extra;
            let top_pos = if negative { prev - offset } else { prev + offset };
            prop_assert_eq!(resolve(Axis::Z, top_pos, size, prev), Placement::Miss);
        }
    }
}
