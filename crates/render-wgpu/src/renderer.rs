use crate::params::{ParameterFeed, RayParams};
use crate::pipeline::{RaytracePipeline, ShaderError, DEPTH_FORMAT};
use crate::quad::FullscreenQuad;

/// Owns the GPU resources for the ray-tracing pass: parameter feed, quad
/// geometry, pipeline, depth target. All of them are built once in `new`
/// and live for the process lifetime; nothing is lazily initialized.
pub struct RaytraceRenderer {
    feed: ParameterFeed,
    quad: FullscreenQuad,
    pipeline: RaytracePipeline,
    depth_texture: wgpu::TextureView,
}

impl RaytraceRenderer {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        source: &str,
    ) -> Result<Self, ShaderError> {
        let feed = ParameterFeed::new(device);
        let quad = FullscreenQuad::new(device);
        let pipeline =
            RaytracePipeline::new(device, surface_format, feed.bind_group_layout(), source)?;
        let depth_texture = create_depth_texture(device, width, height);
        Ok(Self {
            feed,
            quad,
            pipeline,
            depth_texture,
        })
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_texture = create_depth_texture(device, width, height);
    }

    /// Swap in recompiled shader source; a failure leaves the active
    /// pipeline untouched.
    pub fn reload_shader(&mut self, device: &wgpu::Device, source: &str) -> Result<(), ShaderError> {
        self.pipeline.reload(device, source)
    }

    /// Render one frame: publish the complete parameter block, clear the
    /// color/depth targets, draw the full-screen quad.
    pub fn render(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        params: &RayParams,
    ) {
        self.feed.publish(queue, params);

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("raytrace_encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("raytrace_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            self.pipeline.bind(&mut pass);
            pass.set_bind_group(0, self.feed.bind_group(), &[]);
            self.quad.draw(&mut pass);
        }

        queue.submit(std::iter::once(encoder.finish()));
    }
}

fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("depth_texture"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&Default::default())
}
