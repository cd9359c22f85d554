use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};
use std::sync::OnceLock;

use bevy::prelude::*;

/// Projection origin for the bundled dataset.
pub const MAP_CENTER: [f64; 2] = [108.904496, 32.668849];
/// Roll about the projection axis so the dataset's "up" lands on the
/// renderer's Z-up ground-plane convention.
pub const MAP_ROTATE: [f64; 3] = [0.0, 0.0, -FRAC_PI_2];
pub const MAP_SCALE: f64 = 10.0;
pub const MAP_TRANSLATE: [f64; 2] = [0.0, 0.0];

/// Rotated, centered Mercator projection. The derived parameters are
/// computed on the first call and reused for every subsequent coordinate,
/// so projecting is a pure function of the input.
#[derive(Resource, Debug)]
pub struct MercatorProjector {
    center: [f64; 2],
    rotate: [f64; 3],
    scale: f64,
    translate: [f64; 2],
    params: OnceLock<ProjectionParams>,
}

#[derive(Debug)]
struct ProjectionParams {
    rotation: Rotation,
    /// Raw Mercator image of the rotated center; subtracting it maps the
    /// center coordinate exactly onto the translate offset.
    raw_center: [f64; 2],
}

/// Spherical rotation by (delta lambda, delta phi, delta gamma), in radians.
#[derive(Debug)]
struct Rotation {
    delta_lambda: f64,
    cos_phi: f64,
    sin_phi: f64,
    cos_gamma: f64,
    sin_gamma: f64,
}

impl Rotation {
    fn new(rotate: [f64; 3]) -> Self {
        Self {
            delta_lambda: rotate[0],
            cos_phi: rotate[1].cos(),
            sin_phi: rotate[1].sin(),
            cos_gamma: rotate[2].cos(),
            sin_gamma: rotate[2].sin(),
        }
    }

    fn apply(&self, lambda: f64, phi: f64) -> (f64, f64) {
        let lambda = lambda + self.delta_lambda;
        let cos_phi0 = phi.cos();
        let x = lambda.cos() * cos_phi0;
        let y = lambda.sin() * cos_phi0;
        let z = phi.sin();
        let k = z * self.cos_phi + x * self.sin_phi;
        (
            (y * self.cos_gamma - k * self.sin_gamma).atan2(x * self.cos_phi - z * self.sin_phi),
            (k * self.cos_gamma + y * self.sin_gamma).asin(),
        )
    }
}

fn mercator_raw(lambda: f64, phi: f64) -> (f64, f64) {
    (lambda, (FRAC_PI_4 + phi / 2.0).tan().ln())
}

impl MercatorProjector {
    pub fn new(center: [f64; 2], rotate: [f64; 3], scale: f64, translate: [f64; 2]) -> Self {
        Self {
            center,
            rotate,
            scale,
            translate,
            params: OnceLock::new(),
        }
    }

    fn params(&self) -> &ProjectionParams {
        self.params.get_or_init(|| {
            let rotation = Rotation::new(self.rotate);
            let (lambda, phi) =
                rotation.apply(self.center[0].to_radians(), self.center[1].to_radians());
            let (cx, cy) = mercator_raw(lambda, phi);
            ProjectionParams {
                rotation,
                raw_center: [cx, cy],
            }
        })
    }

    /// Projects one lon/lat coordinate onto the ground plane. The projected
    /// (easting, northing) pair is swapped onto (y, x) so the plane matches
    /// the renderer's axis order; z is always 0.
    pub fn project(&self, coord: geo::Coord<f64>) -> Vec3 {
        let params = self.params();
        let (lambda, phi) = params
            .rotation
            .apply(coord.x.to_radians(), coord.y.to_radians());
        let (x, y) = mercator_raw(lambda, phi);
        let screen_x = self.translate[0] + self.scale * (x - params.raw_center[0]);
        let screen_y = self.translate[1] - self.scale * (y - params.raw_center[1]);
        Vec3::new(screen_y as f32, screen_x as f32, 0.0)
    }
}

impl Default for MercatorProjector {
    fn default() -> Self {
        Self::new(MAP_CENTER, MAP_ROTATE, MAP_SCALE, MAP_TRANSLATE)
    }
}
