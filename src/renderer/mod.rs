pub mod font;
pub mod pipeline;
pub mod sprite_atlas;

use std::sync::Arc;

use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use pipeline::{SpritePipeline, SpriteVertex, create_sprite_pipeline, orthographic_projection};
use sprite_atlas::{AtlasImage, SheetData, SpriteAtlas};

use crate::camera::CameraUniform;
use crate::error::GameError;

pub struct Renderer {
    pub window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    sprite_pipeline: SpritePipeline,
    /// Static orthographic projection (no camera); used by the UI pass.
    projection_buffer: wgpu::Buffer,
    projection_bind_group: wgpu::BindGroup,
    /// Camera view-projection buffer; used by the world pass.
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    atlas_bind_group: wgpu::BindGroup,
    atlas: SpriteAtlas,
    // ── UI overlay vertex buffer (persistent, invalidated by FNV hash) ─────
    ui_vertex_buffer: Option<wgpu::Buffer>,
    /// Number of SpriteVertex slots the current ui_vertex_buffer can hold.
    ui_vertex_buffer_capacity: u32,
    /// FNV-1a hash of the last uploaded UI vertex bytes.
    ui_vertex_hash: u64,
}

/// FNV-1a 64-bit hash, used to detect unchanged UI vertex data.
fn fnv1a_64(data: &[u8]) -> u64 {
    data.iter().fold(14695981039346656037u64, |h, &b| {
        (h ^ b as u64).wrapping_mul(1099511628211)
    })
}

impl Renderer {
    /// Create the GPU surface and device for `window` and bake `images` into
    /// the sprite atlas.
    pub async fn new(window: Arc<Window>, images: &[AtlasImage]) -> Result<Self, GameError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::default();
        let surface = instance
            .create_surface(Arc::clone(&window))
            .map_err(|e| GameError::Surface(e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                compatible_surface: Some(&surface),
                ..Default::default()
            })
            .await
            .map_err(|e| GameError::Adapter(e.to_string()))?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor::default())
            .await
            .map_err(|e| GameError::Device(e.to_string()))?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| GameError::Surface("surface reports no formats".into()))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        log::info!("surface configured: {}x{} {:?}", config.width, config.height, format);

        let sprite_pipeline = create_sprite_pipeline(&device, format);
        let atlas = SpriteAtlas::bake(&device, &queue, images);

        // ── Static UI projection buffer (no camera transform) ─────────────
        let proj = orthographic_projection(config.width as f32, config.height as f32);
        let projection_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("projection_buffer"),
            contents: bytemuck::cast_slice(&proj),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let projection_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("projection_bg"),
            layout: &sprite_pipeline.projection_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: projection_buffer.as_entire_binding(),
            }],
        });

        // ── Camera view-projection buffer (world pass) ────────────────────
        let cam_uniform = CameraUniform::identity_ortho(config.width as f32, config.height as f32);
        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("camera_buffer"),
            contents: bytemuck::cast_slice(&[cam_uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("camera_bg"),
            layout: &sprite_pipeline.projection_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let atlas_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("atlas_bg"),
            layout: &sprite_pipeline.atlas_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&atlas.texture_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&atlas.sampler),
                },
            ],
        });

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            sprite_pipeline,
            projection_buffer,
            projection_bind_group,
            camera_buffer,
            camera_bind_group,
            atlas_bind_group,
            atlas,
            ui_vertex_buffer: None,
            ui_vertex_buffer_capacity: 0,
            ui_vertex_hash: 0,
        })
    }

    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);

        let proj = orthographic_projection(new_size.width as f32, new_size.height as f32);
        self.queue
            .write_buffer(&self.projection_buffer, 0, bytemuck::cast_slice(&proj));
    }

    /// Surface size in physical pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Atlas placement of the image registered under `key`.
    pub fn sheet(&self, key: &str) -> Option<&SheetData> {
        self.atlas.sheets.get(key)
    }

    /// Upload a new camera view-projection matrix to the GPU.
    /// Call once per frame, after `Camera::tick` and before `render`.
    pub fn update_camera(&mut self, uniform: &CameraUniform) {
        self.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(std::slice::from_ref(uniform)),
        );
    }

    /// Render one frame.
    ///
    /// `world_verts` are drawn through the camera so they scroll and zoom;
    /// `ui_verts` use the plain projection and stay fixed on screen, on top.
    /// The UI vertex buffer is persistent and only re-uploaded when its
    /// content changes.
    pub fn render(
        &mut self,
        world_verts: &[SpriteVertex],
        ui_verts: &[SpriteVertex],
        clear: [f32; 4],
    ) -> Result<(), wgpu::SurfaceError> {
        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        // ── UI vertex buffer invalidation ─────────────────────────────────
        if !ui_verts.is_empty() {
            let ui_bytes: &[u8] = bytemuck::cast_slice(ui_verts);
            let new_hash = fnv1a_64(ui_bytes);
            let new_count = ui_verts.len() as u32;

            if new_count > self.ui_vertex_buffer_capacity || self.ui_vertex_buffer.is_none() {
                let capacity = new_count.next_power_of_two().max(256);
                self.ui_vertex_buffer = Some(self.device.create_buffer(&wgpu::BufferDescriptor {
                    label: Some("ui_vertex_buffer"),
                    size: capacity as u64 * std::mem::size_of::<SpriteVertex>() as u64,
                    usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                    mapped_at_creation: false,
                }));
                self.ui_vertex_buffer_capacity = capacity;
                self.ui_vertex_hash = !new_hash; // force upload after growing
            }

            if new_hash != self.ui_vertex_hash {
                if let Some(buf) = &self.ui_vertex_buffer {
                    self.queue.write_buffer(buf, 0, ui_bytes);
                    self.ui_vertex_hash = new_hash;
                }
            }
        }

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: None,
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: clear[0] as f64,
                            g: clear[1] as f64,
                            b: clear[2] as f64,
                            a: clear[3] as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            pass.set_pipeline(&self.sprite_pipeline.render_pipeline);
            pass.set_bind_group(1, &self.atlas_bind_group, &[]);

            // ── World pass [camera] ───────────────────────────────────────────
            if !world_verts.is_empty() {
                let vbuf = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("world_vertex_buffer"),
                    contents: bytemuck::cast_slice(world_verts),
                    usage: wgpu::BufferUsages::VERTEX,
                });
                pass.set_bind_group(0, &self.camera_bind_group, &[]);
                pass.set_vertex_buffer(0, vbuf.slice(..));
                pass.draw(0..world_verts.len() as u32, 0..1);
            }

            // ── UI overlay [screen] ───────────────────────────────────────────
            if !ui_verts.is_empty() {
                if let Some(ui_buf) = &self.ui_vertex_buffer {
                    let count = ui_verts.len() as u32;
                    let byte_len = (count as usize * std::mem::size_of::<SpriteVertex>()) as u64;
                    pass.set_bind_group(0, &self.projection_bind_group, &[]);
                    pass.set_vertex_buffer(0, ui_buf.slice(..byte_len));
                    pass.draw(0..count, 0..1);
                }
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }
}
