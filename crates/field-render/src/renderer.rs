//! Particle field rendering system

use bytemuck::{Pod, Zeroable};
use field_core::{Field, Link, Particle, GLOW_RADIUS, LINK_WIDTH};

/// Viewport uniform for GPU (matches WGSL)
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct ViewportUniform {
    /// Surface extent in physical pixels
    size: [f32; 2],
    glow_radius: f32,
    link_width: f32,
}

/// Convert an sRGB channel (0-255) to linear space
fn srgb_to_linear(c: u8) -> f64 {
    let x = c as f64 / 255.0;
    if x <= 0.04045 {
        x / 12.92
    } else {
        ((x + 0.055) / 1.055).powf(2.4)
    }
}

pub struct FieldRenderer {
    disc_pipeline: wgpu::RenderPipeline,
    link_pipeline: wgpu::RenderPipeline,
    viewport_buffer: wgpu::Buffer,
    particle_buffer: wgpu::Buffer,
    link_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    link_capacity: u32,
    clear_color: wgpu::Color,
}

impl FieldRenderer {
    /// Build the pipelines and allocate instance buffers sized for a field
    /// of `particle_capacity` particles. Cardinality is fixed for the
    /// session, so the buffers are never reallocated.
    pub fn new(
        device: &wgpu::Device,
        surface_config: &wgpu::SurfaceConfiguration,
        particle_capacity: usize,
    ) -> Self {
        let link_capacity = Field::max_links(particle_capacity);

        // Create viewport buffer
        let viewport_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Viewport Buffer"),
            size: std::mem::size_of::<ViewportUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        // Instance buffers. A zero-particle field still needs one slot so
        // the whole-buffer storage bindings stay valid.
        let particle_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Particle Buffer"),
            size: (std::mem::size_of::<Particle>() * particle_capacity.max(1)) as u64,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let link_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Link Buffer"),
            size: (std::mem::size_of::<Link>() * link_capacity.max(1)) as u64,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        // Load shaders
        let disc_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Disc Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/disc.wgsl").into()),
        });

        let link_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Link Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/link.wgsl").into()),
        });

        // One layout shared by both pipelines
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Field Bind Group Layout"),
            entries: &[
                // Viewport (Uniform) - Binding 0
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                // Particles (Storage) - Binding 1
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: true },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                // Links (Storage) - Binding 2
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: true },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Field Bind Group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: viewport_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: particle_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: link_buffer.as_entire_binding(),
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Field Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let make_pipeline = |label: &str, shader: &wgpu::ShaderModule| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: shader,
                    entry_point: Some("vertex"),
                    buffers: &[],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: shader,
                    entry_point: Some("fragment"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: surface_config.format,
                        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    unclipped_depth: false,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    conservative: false,
                },
                // Pure 2D painter order, no depth buffer
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            })
        };

        let disc_pipeline = make_pipeline("Disc Render Pipeline", &disc_shader);
        let link_pipeline = make_pipeline("Link Render Pipeline", &link_shader);

        log::info!(
            "Field renderer ready ({} particle slots, {} link slots)",
            particle_capacity,
            link_capacity
        );

        // Catppuccin Mocha base, converted to linear for the clear color
        let base = catppuccin::PALETTE.mocha.colors.base.rgb;
        let clear_color = wgpu::Color {
            r: srgb_to_linear(base.r),
            g: srgb_to_linear(base.g),
            b: srgb_to_linear(base.b),
            a: 1.0,
        };

        Self {
            disc_pipeline,
            link_pipeline,
            viewport_buffer,
            particle_buffer,
            link_buffer,
            bind_group,
            link_capacity: link_capacity as u32,
            clear_color,
        }
    }

    /// Push new surface dimensions to the GPU. Both components are written
    /// together, so a frame only ever sees a whole extent.
    pub fn resize(&self, queue: &wgpu::Queue, width: u32, height: u32) {
        let viewport = ViewportUniform {
            size: [width as f32, height as f32],
            glow_radius: GLOW_RADIUS,
            link_width: LINK_WIDTH,
        };
        queue.write_buffer(&self.viewport_buffer, 0, bytemuck::cast_slice(&[viewport]));
    }

    /// Draw one frame: clear the surface, then the glowing discs, then the
    /// links on top (the original paint order).
    pub fn render(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_view: &wgpu::TextureView,
        particles: &[Particle],
        links: &[Link],
    ) {
        if !particles.is_empty() {
            queue.write_buffer(&self.particle_buffer, 0, bytemuck::cast_slice(particles));
        }
        let link_count = (links.len() as u32).min(self.link_capacity);
        if link_count > 0 {
            queue.write_buffer(
                &self.link_buffer,
                0,
                bytemuck::cast_slice(&links[..link_count as usize]),
            );
        }

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Field Render Encoder"),
        });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Field Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: surface_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_bind_group(0, &self.bind_group, &[]);

            render_pass.set_pipeline(&self.disc_pipeline);
            render_pass.draw(0..6, 0..particles.len() as u32);

            render_pass.set_pipeline(&self.link_pipeline);
            render_pass.draw(0..6, 0..link_count);
        }

        queue.submit(std::iter::once(encoder.finish()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gpu_struct_layouts_match_wgsl() {
        // Viewport: vec2<f32> + 2x f32
        assert_eq!(std::mem::size_of::<ViewportUniform>(), 16);
        // Particle: 2x vec2<f32> + f32 + u32, stride 24
        assert_eq!(std::mem::size_of::<Particle>(), 24);
        // Link: 2x vec2<f32> + f32 + padding, stride 24
        assert_eq!(std::mem::size_of::<Link>(), 24);
    }
}
