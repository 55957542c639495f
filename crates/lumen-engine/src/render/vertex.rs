use bytemuck::{Pod, Zeroable};
use glam::{Mat3, Mat4, Vec2, Vec3};

pub type Color = Vec3;
pub type TexCoord = Vec2;

/// Interleaved vertex shared by every program in the viewer.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
    pub tex_coord: [f32; 2],
    pub normal: [f32; 3],
}

pub type Vertices = Vec<Vertex>;

impl Vertex {
    const ATTRS: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x3, // color
        2 => Float32x2, // tex_coord
        3 => Float32x3  // normal
    ];

    pub fn new(position: Vec3, color: Color, tex_coord: TexCoord, normal: Vec3) -> Self {
        Self {
            position: position.to_array(),
            color: color.to_array(),
            tex_coord: tex_coord.to_array(),
            normal: normal.to_array(),
        }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }

    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }

    pub fn normal(&self) -> Vec3 {
        Vec3::from_array(self.normal)
    }

    /// Applies `matrix` to the position and its inverse transpose to the normal.
    ///
    /// Zero normals (line vertices) stay zero.
    pub fn transformed(&self, matrix: Mat4) -> Self {
        let normal_matrix = Mat3::from_mat4(matrix).inverse().transpose();
        Self {
            position: matrix.transform_point3(self.position()).to_array(),
            normal: (normal_matrix * self.normal()).normalize_or_zero().to_array(),
            ..*self
        }
    }
}

/// Applies [`Vertex::transformed`] to every vertex.
pub fn transform(matrix: Mat4, vertices: &[Vertex]) -> Vertices {
    vertices.iter().map(|v| v.transformed(matrix)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_stride_matches_struct() {
        assert_eq!(Vertex::layout().array_stride, 44);
    }

    #[test]
    fn translation_moves_position_not_normal() {
        let v = Vertex::new(Vec3::ONE, Vec3::ZERO, Vec2::ZERO, Vec3::Y);
        let t = v.transformed(Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0)));
        assert_eq!(t.position(), Vec3::new(2.0, 3.0, 4.0));
        assert_eq!(t.normal(), Vec3::Y);
    }

    #[test]
    fn non_uniform_scale_keeps_normals_unit() {
        let v = Vertex::new(Vec3::ZERO, Vec3::ZERO, Vec2::ZERO, Vec3::new(1.0, 1.0, 0.0).normalize());
        let t = v.transformed(Mat4::from_scale(Vec3::new(4.0, 1.0, 1.0)));
        assert!((t.normal().length() - 1.0).abs() < 1e-5);
        // Stretching along X tilts the normal toward Y.
        assert!(t.normal().y > t.normal().x);
    }
}
