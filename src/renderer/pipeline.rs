#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SpriteVertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
    /// Tint multiplied with the atlas texel.
    pub color: [f32; 4],
}

impl SpriteVertex {
    const ATTRIBS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x2,  // position
        1 => Float32x2,  // uv
        2 => Float32x4,  // color
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SpriteVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// Append the two triangles of an axis-aligned textured quad.
///
/// `flip_x` mirrors the UVs horizontally so a sprite can face left.
pub fn push_quad(
    out: &mut Vec<SpriteVertex>,
    pos: [f32; 2],
    size: [f32; 2],
    uv_min: [f32; 2],
    uv_max: [f32; 2],
    color: [f32; 4],
    flip_x: bool,
) {
    let (x0, y0) = (pos[0], pos[1]);
    let (x1, y1) = (pos[0] + size[0], pos[1] + size[1]);
    let (u0, u1) = if flip_x { (uv_max[0], uv_min[0]) } else { (uv_min[0], uv_max[0]) };
    let (v0, v1) = (uv_min[1], uv_max[1]);

    let tl = SpriteVertex { position: [x0, y0], uv: [u0, v0], color };
    let tr = SpriteVertex { position: [x1, y0], uv: [u1, v0], color };
    let bl = SpriteVertex { position: [x0, y1], uv: [u0, v1], color };
    let br = SpriteVertex { position: [x1, y1], uv: [u1, v1], color };
    out.extend_from_slice(&[tl, bl, tr, tr, bl, br]);
}

pub struct SpritePipeline {
    pub render_pipeline: wgpu::RenderPipeline,
    pub projection_bind_group_layout: wgpu::BindGroupLayout,
    pub atlas_bind_group_layout: wgpu::BindGroupLayout,
}

pub fn create_sprite_pipeline(
    device: &wgpu::Device,
    surface_format: wgpu::TextureFormat,
) -> SpritePipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("sprite_shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("shaders/sprite.wgsl").into()),
    });

    let projection_bind_group_layout =
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("projection_bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

    let atlas_bind_group_layout =
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("atlas_bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("sprite_pipeline_layout"),
        bind_group_layouts: &[&projection_bind_group_layout, &atlas_bind_group_layout],
        ..Default::default()
    });

    let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("sprite_pipeline"),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[SpriteVertex::layout()],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            ..Default::default()
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    });

    SpritePipeline {
        render_pipeline,
        projection_bind_group_layout,
        atlas_bind_group_layout,
    }
}

/// Orthographic projection matrix (column-major) mapping pixel coords to clip space.
pub fn orthographic_projection(width: f32, height: f32) -> [f32; 16] {
    [
        2.0 / width, 0.0,           0.0, 0.0,
        0.0,         -2.0 / height, 0.0, 0.0,
        0.0,         0.0,           1.0, 0.0,
        -1.0,        1.0,           0.0, 1.0,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_emits_two_triangles() {
        let mut out = Vec::new();
        push_quad(&mut out, [10.0, 20.0], [4.0, 8.0], [0.0, 0.0], [1.0, 1.0], [1.0; 4], false);
        assert_eq!(out.len(), 6);
        assert_eq!(out[0].position, [10.0, 20.0]);
        assert_eq!(out[5].position, [14.0, 28.0]);
    }

    #[test]
    fn flip_x_swaps_horizontal_uvs() {
        let mut out = Vec::new();
        push_quad(&mut out, [0.0, 0.0], [1.0, 1.0], [0.25, 0.0], [0.5, 1.0], [1.0; 4], true);
        // Top-left corner samples the right edge of the frame.
        assert_eq!(out[0].uv, [0.5, 0.0]);
        assert_eq!(out[5].uv, [0.25, 1.0]);
    }

    #[test]
    fn projection_maps_corners_to_clip_space() {
        let m = orthographic_projection(800.0, 600.0);
        // Column-major: x' = m[0]*x + m[12], y' = m[5]*y + m[13]
        let (x, y) = (800.0, 600.0);
        assert_eq!(m[0] * x + m[12], 1.0);
        assert_eq!(m[5] * y + m[13], -1.0);
        assert_eq!(m[12], -1.0);
        assert_eq!(m[13], 1.0);
    }
}
