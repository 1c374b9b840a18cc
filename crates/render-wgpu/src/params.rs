use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use rayview_camera::FlyCamera;
use rayview_common::{QualitySettings, Viewport};
use wgpu::util::DeviceExt;

/// Horizontal oscillation of the animated light: amplitude in world units on
/// the x axis, angular frequency in rad/s.
const LIGHT_SWING_AMPLITUDE: f32 = 3.0;
const LIGHT_SWING_FREQUENCY: f32 = 1.0;

/// The complete per-frame uniform block consumed by the ray-tracing shader.
///
/// Field order and padding follow WGSL uniform layout rules; the struct is
/// written to the GPU as one block, so every field is fresh every frame.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct RayParams {
    pub projection: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub cam_pos: [f32; 3],
    pub max_depth: i32,
    pub viewport_size: [f32; 2],
    _pad0: [f32; 2],
    pub light_position: [f32; 3],
    _pad1: f32,
}

impl RayParams {
    /// Assemble the full parameter set from current inputs. Pure; called once
    /// per frame.
    pub fn new(
        camera: &FlyCamera,
        viewport: Viewport,
        quality: &QualitySettings,
        elapsed: f32,
    ) -> Self {
        let light = animated_light_position(quality, elapsed);
        Self {
            projection: camera
                .projection_matrix(viewport.aspect_ratio())
                .to_cols_array_2d(),
            view: camera.view_matrix().to_cols_array_2d(),
            cam_pos: camera.position.to_array(),
            max_depth: quality.max_depth,
            viewport_size: [viewport.width as f32, viewport.height as f32],
            _pad0: [0.0; 2],
            light_position: light.to_array(),
            _pad1: 0.0,
        }
    }
}

/// Current light position: the configured base, plus a sinusoidal x-axis
/// swing when animation is enabled. Returns the base exactly at integer
/// multiples of the oscillation period.
pub fn animated_light_position(quality: &QualitySettings, elapsed: f32) -> Vec3 {
    if quality.animate_light {
        let swing = (elapsed * LIGHT_SWING_FREQUENCY).sin() * LIGHT_SWING_AMPLITUDE;
        quality.light_position + Vec3::new(swing, 0.0, 0.0)
    } else {
        quality.light_position
    }
}

/// Owns the uniform buffer and bind group for the shader's parameter block.
/// `publish` writes the whole block in a single buffer write per frame.
pub struct ParameterFeed {
    buffer: wgpu::Buffer,
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
}

impl ParameterFeed {
    pub fn new(device: &wgpu::Device) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("ray_params_buffer"),
            contents: bytemuck::bytes_of(&RayParams::zeroed()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("ray_params_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("ray_params_bind_group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });

        Self {
            buffer,
            bind_group_layout,
            bind_group,
        }
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }

    /// Upload the complete parameter block. Called exactly once per frame.
    pub fn publish(&self, queue: &wgpu::Queue, params: &RayParams) {
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(params));
    }
}
