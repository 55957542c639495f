//! Geometry builders for lines, quads and cubes.
//!
//! Builders return plain vertex lists; pair them with [`line_indices`] or
//! [`quad_indices`] and upload through [`Mesh`](super::Mesh).

use glam::{Mat4, Vec2, Vec3};

use super::vertex::{transform, Color, TexCoord, Vertex, Vertices};

pub type Indices = Vec<u32>;

/// Texture coordinates covering the whole image, in quad corner order.
pub const FULL_TEX_COORDS: [TexCoord; 4] = [
    Vec2::new(0.0, 0.0),
    Vec2::new(1.0, 0.0),
    Vec2::new(1.0, 1.0),
    Vec2::new(0.0, 1.0),
];

/// Per-corner attributes applied to each generated quad.
///
/// Corner order is `(-a+b, -a-b, +a-b, +a+b)` in the quad's own axes.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct VertexStyle {
    pub colors: [Color; 4],
    pub tex_coords: [TexCoord; 4],
}

impl Default for VertexStyle {
    fn default() -> Self {
        Self {
            colors: [Color::ZERO; 4],
            tex_coords: FULL_TEX_COORDS,
        }
    }
}

impl VertexStyle {
    pub fn solid(color: Color) -> Self {
        Self {
            colors: [color; 4],
            ..Self::default()
        }
    }

    pub fn with_tex_coords(mut self, tex_coords: [TexCoord; 4]) -> Self {
        self.tex_coords = tex_coords;
        self
    }
}

/// A line segment from `origin` to `origin + length * direction`.
pub fn line(origin: Vec3, direction: Vec3, length: f32, color: Color) -> Vertices {
    let end = origin + length * direction;
    vec![
        Vertex::new(origin, color, Vec2::ZERO, Vec3::ZERO),
        Vertex::new(end, color, Vec2::ZERO, Vec3::ZERO),
    ]
}

/// A square of side `scale` centred on `center`, spanned by unit axes `a` and `b`.
///
/// The face normal is `normalize(a × b)`; corners wind counter-clockwise
/// around it.
pub fn quad(center: Vec3, a: Vec3, b: Vec3, scale: f32, style: &VertexStyle) -> Vertices {
    let normal = a.cross(b).normalize();
    let h = scale / 2.0;
    let corners = [-a + b, -a - b, a - b, a + b];

    corners
        .iter()
        .zip(style.colors)
        .zip(style.tex_coords)
        .map(|((corner, color), tex_coord)| Vertex::new(center + h * *corner, color, tex_coord, normal))
        .collect()
}

/// A cube of side `scale` centred on `center`, with faces perpendicular to the
/// right-handed orthonormal axes `a`, `b`, `c`.
///
/// Every face gets its own four vertices so normals stay flat; all normals
/// point outward.
pub fn cube(center: Vec3, a: Vec3, b: Vec3, c: Vec3, scale: f32, style: &VertexStyle) -> Vertices {
    let h = scale / 2.0;
    let faces = [
        quad(h * a, b, c, scale, style),
        quad(-h * a, c, b, scale, style),
        quad(h * b, c, a, scale, style),
        quad(-h * b, a, c, scale, style),
        quad(h * c, a, b, scale, style),
        quad(-h * c, b, a, scale, style),
    ];

    transform(Mat4::from_translation(center), &faces.concat())
}

/// Indices for consecutive vertex pairs; a trailing unpaired vertex is dropped.
pub fn line_indices(vertices: &[Vertex]) -> Indices {
    let n = vertices.len() - vertices.len() % 2;
    (0..n as u32).collect()
}

/// Two triangles per group of four vertices; trailing vertices are dropped.
pub fn quad_indices(vertices: &[Vertex]) -> Indices {
    const QUAD: [u32; 6] = [0, 1, 2, 2, 3, 0];

    let quads = (vertices.len() / 4) as u32;
    (0..quads)
        .flat_map(|q| QUAD.iter().map(move |i| q * 4 + i))
        .collect()
}
