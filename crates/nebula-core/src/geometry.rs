//! CPU-side geometry for the scene objects.
//!
//! Sphere and icosphere layouts follow the usual latitude/longitude grid and
//! subdivided-icosahedron constructions, so vertex counts are predictable:
//! `(w + 1) * (h + 1)` for a grid sphere and `20 * 3 * (detail + 1)^2` for a
//! non-indexed icosphere.

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::PI;

/// Triangle list over `positions`. Normals of a sphere are its normalized
/// positions, so none are stored.
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    pub positions: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Vertices of a `width_segments` x `height_segments` latitude/longitude grid
/// on a sphere of `radius`. Poles repeat once per column.
pub fn sphere_points(radius: f32, width_segments: u32, height_segments: u32) -> Vec<[f32; 3]> {
    let w = width_segments.max(3);
    let h = height_segments.max(2);
    let mut out = Vec::with_capacity(((w + 1) * (h + 1)) as usize);
    for iy in 0..=h {
        let v = iy as f32 / h as f32;
        for ix in 0..=w {
            let u = ix as f32 / w as f32;
            out.push([
                -radius * (u * 2.0 * PI).cos() * (v * PI).sin(),
                radius * (v * PI).cos(),
                radius * (u * 2.0 * PI).sin() * (v * PI).sin(),
            ]);
        }
    }
    out
}

/// Solid sphere over the same grid as [`sphere_points`].
pub fn uv_sphere(radius: f32, width_segments: u32, height_segments: u32) -> Mesh {
    let w = width_segments.max(3);
    let h = height_segments.max(2);
    let positions = sphere_points(radius, w, h);
    let row = w + 1;
    let mut indices = Vec::with_capacity((w * h * 6) as usize);
    for iy in 0..h {
        for ix in 0..w {
            let a = iy * row + ix + 1;
            let b = iy * row + ix;
            let c = (iy + 1) * row + ix;
            let d = (iy + 1) * row + ix + 1;
            // degenerate triangles at the poles are skipped
            if iy != 0 {
                indices.extend_from_slice(&[a, b, d]);
            }
            if iy != h - 1 {
                indices.extend_from_slice(&[b, c, d]);
            }
        }
    }
    Mesh { positions, indices }
}

const ICOSAHEDRON_FACES: [[usize; 3]; 20] = [
    [0, 11, 5],
    [0, 5, 1],
    [0, 1, 7],
    [0, 7, 10],
    [0, 10, 11],
    [1, 5, 9],
    [5, 11, 4],
    [11, 10, 2],
    [10, 7, 6],
    [7, 1, 8],
    [3, 9, 4],
    [3, 4, 2],
    [3, 2, 6],
    [3, 6, 8],
    [3, 8, 9],
    [4, 9, 5],
    [2, 4, 11],
    [6, 2, 10],
    [8, 6, 7],
    [9, 8, 1],
];

fn icosahedron_vertices() -> [Vec3; 12] {
    let t = (1.0 + 5f32.sqrt()) / 2.0;
    [
        Vec3::new(-1.0, t, 0.0),
        Vec3::new(1.0, t, 0.0),
        Vec3::new(-1.0, -t, 0.0),
        Vec3::new(1.0, -t, 0.0),
        Vec3::new(0.0, -1.0, t),
        Vec3::new(0.0, 1.0, t),
        Vec3::new(0.0, -1.0, -t),
        Vec3::new(0.0, 1.0, -t),
        Vec3::new(t, 0.0, -1.0),
        Vec3::new(t, 0.0, 1.0),
        Vec3::new(-t, 0.0, -1.0),
        Vec3::new(-t, 0.0, 1.0),
    ]
}

/// Icosahedron with every face split into `(detail + 1)^2` triangles and all
/// vertices pushed out to `radius`. Non-indexed: each triangle owns its
/// three vertices, and `indices` is simply `0..n`.
pub fn icosphere(radius: f32, detail: u32) -> Mesh {
    let base = icosahedron_vertices();
    let cols = detail as usize + 1;
    let mut positions = Vec::with_capacity(20 * 3 * cols * cols);

    for face in ICOSAHEDRON_FACES {
        let (a, b, c) = (base[face[0]], base[face[1]], base[face[2]]);

        // rows of points from edge ab towards c
        let mut grid: Vec<Vec<Vec3>> = Vec::with_capacity(cols + 1);
        for i in 0..=cols {
            let f = i as f32 / cols as f32;
            let aj = a.lerp(c, f);
            let bj = b.lerp(c, f);
            let rows = cols - i;
            let mut line = Vec::with_capacity(rows + 1);
            for j in 0..=rows {
                if j == 0 && i == cols {
                    line.push(aj);
                } else {
                    line.push(aj.lerp(bj, j as f32 / rows as f32));
                }
            }
            grid.push(line);
        }

        for i in 0..cols {
            for j in 0..(2 * (cols - i) - 1) {
                let k = j / 2;
                let tri = if j % 2 == 0 {
                    [grid[i][k + 1], grid[i + 1][k], grid[i][k]]
                } else {
                    [grid[i][k + 1], grid[i + 1][k + 1], grid[i + 1][k]]
                };
                for p in tri {
                    positions.push((p.normalize() * radius).to_array());
                }
            }
        }
    }

    let indices = (0..positions.len() as u32).collect();
    Mesh { positions, indices }
}

/// `count` points scattered uniformly in a cube of side `extent` centred on
/// the origin. The same seed always yields the same field.
pub fn starfield(count: usize, extent: f32, seed: u64) -> Vec<[f32; 3]> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            [
                (rng.gen::<f32>() - 0.5) * extent,
                (rng.gen::<f32>() - 0.5) * extent,
                (rng.gen::<f32>() - 0.5) * extent,
            ]
        })
        .collect()
}
