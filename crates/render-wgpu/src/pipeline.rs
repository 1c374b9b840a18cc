use crate::quad::FullscreenQuad;
use thiserror::Error;

/// Embedded default ray tracer. Used when no on-disk shader path is supplied.
pub const DEFAULT_SHADER: &str = include_str!("raytrace.wgsl");

pub(crate) const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("failed to read shader source: {0}")]
    Io(#[from] std::io::Error),
    #[error("shader compilation failed: {0}")]
    Compile(String),
}

/// The hot-reloadable render pipeline for the full-screen ray-tracing pass.
///
/// `reload` builds a candidate pipeline from new WGSL source and swaps it in
/// only when validation succeeds; on failure the previous pipeline stays
/// active and the diagnostic is returned to the caller.
pub struct RaytracePipeline {
    pipeline: wgpu::RenderPipeline,
    layout: wgpu::PipelineLayout,
    surface_format: wgpu::TextureFormat,
}

impl RaytracePipeline {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        params_layout: &wgpu::BindGroupLayout,
        source: &str,
    ) -> Result<Self, ShaderError> {
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("raytrace_pipeline_layout"),
            bind_group_layouts: &[params_layout],
            push_constant_ranges: &[],
        });
        let pipeline = build_pipeline(device, &layout, surface_format, source)?;
        Ok(Self {
            pipeline,
            layout,
            surface_format,
        })
    }

    /// Recompile from new source. On success the new pipeline replaces the
    /// old one; on failure the old one remains active for subsequent frames.
    pub fn reload(&mut self, device: &wgpu::Device, source: &str) -> Result<(), ShaderError> {
        let candidate = build_pipeline(device, &self.layout, self.surface_format, source)?;
        self.pipeline = candidate;
        tracing::info!("shader reloaded");
        Ok(())
    }

    /// Activate the current pipeline on a pass.
    pub fn bind(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_pipeline(&self.pipeline);
    }
}

/// Compile WGSL and build the quad pipeline, capturing validation failures
/// via a wgpu error scope instead of the global error handler.
fn build_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    surface_format: wgpu::TextureFormat,
    source: &str,
) -> Result<wgpu::RenderPipeline, ShaderError> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);

    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("raytrace_shader"),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });

    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("raytrace_pipeline"),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: &module,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &[FullscreenQuad::vertex_layout()],
        },
        fragment: Some(wgpu::FragmentState {
            module: &module,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleStrip,
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Always,
            stencil: Default::default(),
            bias: Default::default(),
        }),
        multisample: Default::default(),
        multiview: None,
        cache: None,
    });

    if let Some(err) = pollster::block_on(device.pop_error_scope()) {
        return Err(ShaderError::Compile(err.to_string()));
    }
    Ok(pipeline)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_shader_declares_the_parameter_interface() {
        // The uniform block names are the shader-facing contract.
        for name in [
            "projection",
            "view",
            "cam_pos",
            "max_depth",
            "viewport_size",
            "light_position",
        ] {
            assert!(
                DEFAULT_SHADER.contains(name),
                "embedded shader is missing uniform `{name}`"
            );
        }
        assert!(DEFAULT_SHADER.contains("@vertex"));
        assert!(DEFAULT_SHADER.contains("@fragment"));
    }

    #[test]
    fn compile_error_formats_the_diagnostic() {
        let err = ShaderError::Compile("expected `;`".into());
        assert!(err.to_string().contains("expected `;`"));
    }
}
