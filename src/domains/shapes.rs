use std::path::Path;

use image::RgbaImage;
use rand::Rng;

use crate::domain::Domain;
use crate::domains::raster::{load_png, pixel_distance};
use crate::error::{ConfigError, Error};
use crate::population::genome::Genome;
use crate::population::organism::Organism;

/// One genome element: a filled shape with an RGBA color, drawn in genome
/// order with source-over blending.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    Triangle {
        p1: (i32, i32),
        p2: (i32, i32),
        p3: (i32, i32),
        color: [u8; 4],
    },
    Circle {
        center: (i32, i32),
        radius: i32,
        color: [u8; 4],
    },
}

/// Which element kind `random_element` rolls.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ShapeKind {
    Triangle,
    Circle { max_radius: i32 },
}

/// Evolves a fixed-length list of shape descriptors whose rendering
/// approximates a target image. Same distance score and convergence rule as
/// the raw raster domain; only the genome representation and the renderer
/// differ.
#[derive(Debug)]
pub struct ShapeDomain {
    target: RgbaImage,
    kind: ShapeKind,
    shape_count: usize,
    distance_limit: f64,
}

impl ShapeDomain {
    pub fn new(
        target: RgbaImage,
        kind: ShapeKind,
        shape_count: usize,
        distance_limit: f64,
    ) -> Result<ShapeDomain, ConfigError> {
        if target.as_raw().is_empty() || shape_count == 0 {
            return Err(ConfigError::EmptyGenome);
        }
        if let ShapeKind::Circle { max_radius } = kind {
            if max_radius <= 0 {
                return Err(ConfigError::CircleRadius(max_radius));
            }
        }
        Ok(ShapeDomain {
            target,
            kind,
            shape_count,
            distance_limit,
        })
    }

    pub fn from_png(
        path: impl AsRef<Path>,
        kind: ShapeKind,
        shape_count: usize,
        distance_limit: f64,
    ) -> Result<ShapeDomain, Error> {
        let target = load_png(path.as_ref())?;
        Ok(Self::new(target, kind, shape_count, distance_limit)?)
    }

    pub fn target(&self) -> &RgbaImage {
        &self.target
    }

    fn random_color<R: Rng + ?Sized>(rng: &mut R) -> [u8; 4] {
        [rng.gen(), rng.gen(), rng.gen(), rng.gen()]
    }
}

impl Domain for ShapeDomain {
    type Element = Shape;
    type Artifact = RgbaImage;

    fn genome_length(&self) -> usize {
        self.shape_count
    }

    fn random_element<R: Rng + ?Sized>(&self, rng: &mut R) -> Shape {
        let w = self.target.width() as i32;
        let h = self.target.height() as i32;

        match self.kind {
            ShapeKind::Triangle => {
                // small triangles: p2 and p3 sit within +/-15 of p1
                let p1 = (rng.gen_range(0..w), rng.gen_range(0..h));
                let p2 = (p1.0 + rng.gen_range(-15..15), p1.1 + rng.gen_range(-15..15));
                let p3 = (p1.0 + rng.gen_range(-15..15), p1.1 + rng.gen_range(-15..15));
                Shape::Triangle {
                    p1,
                    p2,
                    p3,
                    color: Self::random_color(rng),
                }
            }
            ShapeKind::Circle { max_radius } => Shape::Circle {
                center: (rng.gen_range(0..w), rng.gen_range(0..h)),
                radius: rng.gen_range(0..max_radius),
                color: Self::random_color(rng),
            },
        }
    }

    fn render(&self, genome: &Genome<Shape>) -> RgbaImage {
        rasterize(self.target.width(), self.target.height(), genome.elements())
    }

    fn fitness(&self, artifact: &RgbaImage) -> f64 {
        pixel_distance(artifact, &self.target)
    }

    fn better_than(&self, a: f64, b: f64) -> bool {
        a < b
    }

    fn is_converged(&self, best: &Organism<Self>) -> bool {
        best.fitness() <= self.distance_limit
    }
}

/// Draw the shapes in order onto a transparent canvas.
pub fn rasterize(width: u32, height: u32, shapes: &[Shape]) -> RgbaImage {
    let mut canvas = RgbaImage::new(width, height);
    for shape in shapes {
        match *shape {
            Shape::Triangle { p1, p2, p3, color } => fill_triangle(&mut canvas, p1, p2, p3, color),
            Shape::Circle {
                center,
                radius,
                color,
            } => fill_circle(&mut canvas, center, radius, color),
        }
    }
    canvas
}

// source-over blend of `color` onto the pixel at (x, y)
fn blend_pixel(canvas: &mut RgbaImage, x: i32, y: i32, color: [u8; 4]) {
    if x < 0 || y < 0 || x >= canvas.width() as i32 || y >= canvas.height() as i32 {
        return;
    }
    let dst = canvas.get_pixel_mut(x as u32, y as u32);
    let a = u32::from(color[3]);
    for c in 0..3 {
        let src = u32::from(color[c]);
        let under = u32::from(dst.0[c]);
        dst.0[c] = ((src * a + under * (255 - a)) / 255) as u8;
    }
    dst.0[3] = (a + u32::from(dst.0[3]) * (255 - a) / 255) as u8;
}

fn fill_triangle(
    canvas: &mut RgbaImage,
    p1: (i32, i32),
    p2: (i32, i32),
    p3: (i32, i32),
    color: [u8; 4],
) {
    let min_x = p1.0.min(p2.0).min(p3.0);
    let max_x = p1.0.max(p2.0).max(p3.0);
    let min_y = p1.1.min(p2.1).min(p3.1);
    let max_y = p1.1.max(p2.1).max(p3.1);

    let edge = |a: (i32, i32), b: (i32, i32), p: (i32, i32)| -> i64 {
        i64::from(b.0 - a.0) * i64::from(p.1 - a.1) - i64::from(b.1 - a.1) * i64::from(p.0 - a.0)
    };

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let p = (x, y);
            let d1 = edge(p1, p2, p);
            let d2 = edge(p2, p3, p);
            let d3 = edge(p3, p1, p);

            // inside for either winding order
            let has_neg = d1 < 0 || d2 < 0 || d3 < 0;
            let has_pos = d1 > 0 || d2 > 0 || d3 > 0;
            if !(has_neg && has_pos) {
                blend_pixel(canvas, x, y, color);
            }
        }
    }
}

fn fill_circle(canvas: &mut RgbaImage, center: (i32, i32), radius: i32, color: [u8; 4]) {
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy <= radius * radius {
                blend_pixel(canvas, center.0 + dx, center.1 + dy, color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_rasterize_starts_transparent() {
        let canvas = rasterize(4, 4, &[]);
        assert!(canvas.as_raw().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_opaque_circle_paints_its_center() {
        let shape = Shape::Circle {
            center: (5, 5),
            radius: 2,
            color: [200, 10, 30, 255],
        };
        let canvas = rasterize(10, 10, &[shape]);

        assert_eq!(canvas.get_pixel(5, 5).0, [200, 10, 30, 255]);
        // well outside the radius stays untouched
        assert_eq!(canvas.get_pixel(0, 0).0, [0, 0, 0, 0]);
    }

    #[test]
    fn test_triangle_clips_to_canvas() {
        let shape = Shape::Triangle {
            p1: (-10, -10),
            p2: (30, -5),
            p3: (5, 30),
            color: [255, 255, 255, 255],
        };
        // would panic on out-of-bounds writes without clipping
        let canvas = rasterize(8, 8, &[shape]);
        assert!(canvas.as_raw().iter().any(|&b| b != 0));
    }

    #[test]
    fn test_later_shapes_blend_over_earlier() {
        let under = Shape::Circle {
            center: (2, 2),
            radius: 2,
            color: [0, 0, 255, 255],
        };
        let over = Shape::Circle {
            center: (2, 2),
            radius: 2,
            color: [255, 0, 0, 255],
        };
        let canvas = rasterize(5, 5, &[under, over]);

        // fully opaque red replaces the blue underneath
        assert_eq!(canvas.get_pixel(2, 2).0, [255, 0, 0, 255]);
    }

    #[test]
    fn test_random_elements_stay_in_canvas_for_anchor() {
        let target = RgbaImage::new(20, 12);
        let domain = ShapeDomain::new(target, ShapeKind::Triangle, 10, 0.0).unwrap();
        let mut rng = StdRng::seed_from_u64(77);

        for _ in 0..200 {
            match domain.random_element(&mut rng) {
                Shape::Triangle { p1, .. } => {
                    assert!((0..20).contains(&p1.0));
                    assert!((0..12).contains(&p1.1));
                }
                Shape::Circle { .. } => panic!("triangle domain rolled a circle"),
            }
        }
    }

    #[test]
    fn test_matching_render_converges() {
        // target drawn from the same shapes the organism carries
        let shapes = vec![
            Shape::Circle {
                center: (3, 3),
                radius: 2,
                color: [90, 40, 200, 255],
            };
            4
        ];
        let target = rasterize(8, 8, &shapes);
        let domain = ShapeDomain::new(target, ShapeKind::Circle { max_radius: 4 }, 4, 0.0).unwrap();

        let org = Organism::express(&domain, Genome::from_elements(shapes));

        assert_eq!(org.fitness(), 0.0);
        assert!(domain.is_converged(&org));
    }
}
