use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub(crate) struct QuadVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

/// Four vertices covering the whole viewport in NDC, drawn as a triangle
/// strip. Shared by every frame for the process lifetime.
pub(crate) const QUAD_VERTICES: [QuadVertex; 4] = [
    QuadVertex { position: [-1.0, 1.0, 0.0], uv: [0.0, 1.0] },
    QuadVertex { position: [-1.0, -1.0, 0.0], uv: [0.0, 0.0] },
    QuadVertex { position: [1.0, 1.0, 0.0], uv: [1.0, 1.0] },
    QuadVertex { position: [1.0, -1.0, 0.0], uv: [1.0, 0.0] },
];

/// The draw target for the ray-tracing shader: one vertex buffer, allocated
/// once during renderer setup and owned for the process lifetime. Holding the
/// handle proves the allocation happened, so `draw` needs no lazy-init guard.
pub struct FullscreenQuad {
    vertex_buffer: wgpu::Buffer,
}

impl FullscreenQuad {
    pub fn new(device: &wgpu::Device) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("fullscreen_quad_vertices"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });
        Self { vertex_buffer }
    }

    pub(crate) fn vertex_layout() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
            wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }

    /// Issue the 4-vertex triangle-strip draw. Pipeline and bind groups must
    /// already be set on the pass.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.draw(0..QUAD_VERTICES.len() as u32, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_spans_the_full_viewport() {
        for v in &QUAD_VERTICES {
            assert!(v.position[0].abs() == 1.0);
            assert!(v.position[1].abs() == 1.0);
            assert_eq!(v.position[2], 0.0);
        }
        // Strip order: top-left, bottom-left, top-right, bottom-right.
        assert_eq!(QUAD_VERTICES[0].position[..2], [-1.0, 1.0]);
        assert_eq!(QUAD_VERTICES[3].position[..2], [1.0, -1.0]);
    }

    #[test]
    fn uvs_map_corners_to_unit_square() {
        for v in &QUAD_VERTICES {
            assert_eq!(v.uv[0], (v.position[0] + 1.0) / 2.0);
            assert_eq!(v.uv[1], (v.position[1] + 1.0) / 2.0);
        }
    }

    #[test]
    fn vertex_layout_matches_struct() {
        let layout = FullscreenQuad::vertex_layout();
        assert_eq!(layout.array_stride, 20);
        assert_eq!(layout.attributes.len(), 2);
        assert_eq!(layout.attributes[1].offset, 12);
    }
}
