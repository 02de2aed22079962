use crate::capture::session::SceneSession;
use crate::foundation::core::{Rgba8, Vec3};
use crate::foundation::error::{ViewgridError, ViewgridResult};
use crate::geometry::mesh::bounds;
use crate::raster::Raster;
use crate::render::backend::{RenderCollaborator, RenderSettings};

/// Options for [`PreviewRenderer`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PreviewOpts {
    /// Base surface color before shading.
    pub color: Rgba8,
    /// Background used when the settings ask for an opaque background.
    pub opaque_background: Rgba8,
    /// Fraction of the shorter image side kept free on each side.
    pub margin: f32,
    /// Direction from the surface towards the light.
    pub light_dir: Vec3,
}

impl Default for PreviewOpts {
    fn default() -> Self {
        Self {
            color: Rgba8::opaque(180, 180, 190),
            opaque_background: Rgba8::WHITE,
            margin: 0.1,
            light_dir: Vec3::new(-0.4, -1.0, 0.6),
        }
    }
}

/// Deterministic CPU preview renderer.
///
/// Orthographic front view: the camera looks along +Y with Z up, so screen X is world X and screen
/// Y is world Z. Triangles are flat shaded with a depth buffer; meshes without triangles are drawn
/// as single-pixel points. Framing uses the mesh's bounding sphere, which is the same for every
/// placement, so all views of an asset share one scale.
#[derive(Clone, Debug, Default)]
pub struct PreviewRenderer {
    opts: PreviewOpts,
}

#[derive(Clone, Copy)]
struct Framing {
    center_x: f32,
    center_z: f32,
    scale: f32,
    half_w: f32,
    half_h: f32,
}

impl Framing {
    fn project(&self, p: Vec3) -> (f32, f32, f32) {
        let sx = self.half_w + (p.x - self.center_x) * self.scale;
        let sy = self.half_h - (p.z - self.center_z) * self.scale;
        (sx, sy, p.y)
    }
}

impl PreviewRenderer {
    /// Renderer with explicit options.
    pub fn new(opts: PreviewOpts) -> Self {
        Self { opts }
    }

    fn framing(&self, scene: &SceneSession, placed: &[Vec3], w: u32, h: u32) -> Option<Framing> {
        let (lo, hi) = bounds(scene.mesh().positions())?;
        let model_center = (lo + hi) * 0.5;
        let radius = scene
            .mesh()
            .positions()
            .iter()
            .map(|p| p.distance(model_center))
            .fold(0.0f32, f32::max);
        let (plo, phi) = bounds(placed)?;
        let placed_center = (plo + phi) * 0.5;

        let short_side = w.min(h) as f32;
        let usable = short_side * (1.0 - 2.0 * self.opts.margin.clamp(0.0, 0.45));
        let scale = if radius > 0.0 {
            usable / (2.0 * radius)
        } else {
            1.0
        };
        Some(Framing {
            center_x: placed_center.x,
            center_z: placed_center.z,
            scale,
            half_w: w as f32 * 0.5,
            half_h: h as f32 * 0.5,
        })
    }

    fn shade(&self, normal: Vec3) -> [u8; 4] {
        let light = self.opts.light_dir.normalize_or_zero();
        let lambert = normal.dot(light).abs();
        let k = 0.25 + 0.75 * lambert;
        let c = self.opts.color;
        let ch = |v: u8| ((f32::from(v) * k).round() as i32).clamp(0, 255) as u8;
        [ch(c.r), ch(c.g), ch(c.b), 255]
    }
}

impl RenderCollaborator for PreviewRenderer {
    fn render_view(
        &mut self,
        scene: &SceneSession,
        settings: &RenderSettings,
    ) -> ViewgridResult<Raster> {
        settings.validate()?;
        let (w, h) = (settings.width, settings.height);
        let background = if settings.transparent_background {
            Rgba8::TRANSPARENT
        } else {
            self.opts.opaque_background
        };
        let mut out = Raster::new_filled(w, h, background)?;

        let placed = scene.placed_positions();
        let framing = self
            .framing(scene, &placed, w, h)
            .ok_or_else(|| ViewgridError::render("cannot render an empty mesh"))?;
        let mut depth = vec![f32::INFINITY; (w as usize) * (h as usize)];

        if scene.mesh().triangles().is_empty() {
            let px = self.shade(Vec3::NEG_Y);
            for &p in &placed {
                let (sx, sy, d) = framing.project(p);
                plot(&mut out, &mut depth, sx.floor(), sy.floor(), d, px);
            }
            return Ok(out);
        }

        for tri in scene.mesh().triangles() {
            let [a, b, c] = tri.map(|i| placed[i as usize]);
            let normal = (b - a).cross(c - a).normalize_or_zero();
            if normal == Vec3::ZERO {
                continue;
            }
            let px = self.shade(normal);
            rasterize_triangle(
                &mut out,
                &mut depth,
                [framing.project(a), framing.project(b), framing.project(c)],
                px,
            );
        }
        Ok(out)
    }
}

fn plot(out: &mut Raster, depth: &mut [f32], x: f32, y: f32, d: f32, px: [u8; 4]) {
    if x < 0.0 || y < 0.0 || x >= out.width() as f32 || y >= out.height() as f32 {
        return;
    }
    let (x, y) = (x as u32, y as u32);
    let idx = (y as usize) * (out.width() as usize) + (x as usize);
    if d < depth[idx] {
        depth[idx] = d;
        out.put_pixel(x, y, px);
    }
}

fn rasterize_triangle(
    out: &mut Raster,
    depth: &mut [f32],
    v: [(f32, f32, f32); 3],
    px: [u8; 4],
) {
    let [v0, v1, v2] = v;
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);
    if denom.abs() < 1e-9 {
        return;
    }

    let max_x = out.width() as i64 - 1;
    let max_y = out.height() as i64 - 1;
    let min_xi = (v0.0.min(v1.0).min(v2.0).floor() as i64).max(0);
    let max_xi = (v0.0.max(v1.0).max(v2.0).ceil() as i64).min(max_x);
    let min_yi = (v0.1.min(v1.1).min(v2.1).floor() as i64).max(0);
    let max_yi = (v0.1.max(v1.1).max(v2.1).ceil() as i64).min(max_y);

    for y in min_yi..=max_yi {
        for x in min_xi..=max_xi {
            let (px_x, px_y) = (x as f32 + 0.5, y as f32 + 0.5);
            let w0 = ((v1.1 - v2.1) * (px_x - v2.0) + (v2.0 - v1.0) * (px_y - v2.1)) / denom;
            let w1 = ((v2.1 - v0.1) * (px_x - v2.0) + (v0.0 - v2.0) * (px_y - v2.1)) / denom;
            let w2 = 1.0 - w0 - w1;
            if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                continue;
            }
            let d = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;
            plot(out, depth, x as f32, y as f32, d, px);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/preview.rs"]
mod tests;
