//! wgpu renderer for the grass field, shared by the browser and desktop hosts.

mod helpers;
pub mod uniforms;

use grass_core::scene::{PropInstance, SceneLayout};
use grass_core::{Camera, FrameInputs, Viewport};
use helpers::{MeshBuffers, BLADE_LAYOUTS, PROP_LAYOUTS};
use uniforms::{GrassUniforms, SceneUniforms};
use wgpu::util::DeviceExt;

pub static GRASS_WGSL: &str = include_str!("../shaders/grass.wgsl");
pub static PROPS_WGSL: &str = include_str!("../shaders/props.wgsl");

/// Per-frame values the renderer uploads before drawing.
pub struct FrameParams<'f> {
    pub time_secs: f32,
    pub inputs: &'f FrameInputs,
    pub clouds: &'f [PropInstance],
}

pub struct GpuState<'a> {
    surface: wgpu::Surface<'a>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    depth_view: wgpu::TextureView,

    scene_buffer: wgpu::Buffer,
    grass_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,

    grass_pipeline: wgpu::RenderPipeline,
    opaque_pipeline: wgpu::RenderPipeline,
    translucent_pipeline: wgpu::RenderPipeline,

    blade_vb: wgpu::Buffer,
    blade_ib: wgpu::Buffer,
    blade_index_count: u32,
    blade_instances: wgpu::Buffer,
    blade_count: u32,

    opaque: MeshBuffers,
    glow: MeshBuffers,
    cloud: MeshBuffers,
    identity_instance: wgpu::Buffer,
    cloud_instances: wgpu::Buffer,
    cloud_capacity: usize,
    cloud_count: u32,

    camera: Camera,
    width: u32,
    height: u32,
    clear_color: wgpu::Color,
}

impl<'a> GpuState<'a> {
    pub async fn new(
        target: impl Into<wgpu::SurfaceTarget<'a>>,
        width: u32,
        height: u32,
        camera: Camera,
        layout: &SceneLayout,
    ) -> anyhow::Result<Self> {
        let width = width.max(1);
        let height = height.max(1);
        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(target)?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No GPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    // default limits keep older WebGPU implementations happy
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;
        let caps = surface.get_capabilities(&adapter);
        let format = helpers::pick_surface_format(&caps.formats)
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        let (_, depth_view) = helpers::create_depth_texture(&device, width, height);

        let scene_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("scene_uniforms"),
            size: std::mem::size_of::<SceneUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let grass_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("grass_uniforms"),
            size: std::mem::size_of::<GrassUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let uniform_entry = |binding: u32| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("scene_bgl"),
            entries: &[uniform_entry(0), uniform_entry(1)],
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("scene_bg"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: scene_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: grass_buffer.as_entire_binding(),
                },
            ],
        });
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("scene_pl"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let grass_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("grass_shader"),
            source: wgpu::ShaderSource::Wgsl(GRASS_WGSL.into()),
        });
        let props_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("props_shader"),
            source: wgpu::ShaderSource::Wgsl(PROPS_WGSL.into()),
        });
        let grass_pipeline = helpers::make_pipeline(
            &device,
            "grass_pipeline",
            &pipeline_layout,
            &grass_shader,
            &BLADE_LAYOUTS,
            format,
            None,
            true,
        );
        let opaque_pipeline = helpers::make_pipeline(
            &device,
            "opaque_pipeline",
            &pipeline_layout,
            &props_shader,
            &PROP_LAYOUTS,
            format,
            None,
            true,
        );
        let translucent_pipeline = helpers::make_pipeline(
            &device,
            "translucent_pipeline",
            &pipeline_layout,
            &props_shader,
            &PROP_LAYOUTS,
            format,
            Some(wgpu::BlendState::ALPHA_BLENDING),
            false,
        );

        let blade_vb = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("blade_vb"),
            contents: bytemuck::cast_slice(&layout.blade.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let blade_ib = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("blade_ib"),
            contents: bytemuck::cast_slice(&layout.blade.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let blade_instances = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("blade_instances"),
            contents: bytemuck::cast_slice(&layout.blades),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let identity_instance = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("identity_instance"),
            contents: bytemuck::bytes_of(&PropInstance::IDENTITY),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let cloud_capacity = layout.clouds.clouds().len().max(1);
        let cloud_instances = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("cloud_instances"),
            size: (std::mem::size_of::<PropInstance>() * cloud_capacity) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        log::info!(
            "renderer ready: {}x{} {:?}, {} blades, {} prop triangles",
            width,
            height,
            format,
            layout.blades.len(),
            layout.opaque.indices.len() / 3
        );

        Ok(Self {
            opaque: MeshBuffers::upload(&device, "opaque_mesh", &layout.opaque),
            glow: MeshBuffers::upload(&device, "glow_mesh", &layout.glow),
            cloud: MeshBuffers::upload(&device, "cloud_mesh", &layout.cloud),
            surface,
            device,
            queue,
            config,
            depth_view,
            scene_buffer,
            grass_buffer,
            bind_group,
            grass_pipeline,
            opaque_pipeline,
            translucent_pipeline,
            blade_vb,
            blade_ib,
            blade_index_count: layout.blade.indices.len() as u32,
            blade_instances,
            blade_count: layout.blades.len() as u32,
            identity_instance,
            cloud_instances,
            cloud_capacity,
            cloud_count: 0,
            camera,
            width,
            height,
            clear_color: uniforms::clear_color(),
        })
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.width as f32, self.height as f32)
    }

    pub fn resize_if_needed(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
            let (_, depth_view) = helpers::create_depth_texture(&self.device, width, height);
            self.depth_view = depth_view;
        }
    }

    /// Re-apply the current configuration after `Lost`/`Outdated`.
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    pub fn render(&mut self, frame: &FrameParams<'_>) -> Result<(), wgpu::SurfaceError> {
        let scene = SceneUniforms::new(&self.camera, &self.viewport(), frame.time_secs);
        self.queue
            .write_buffer(&self.scene_buffer, 0, bytemuck::bytes_of(&scene));
        let grass = GrassUniforms::new(frame.inputs);
        self.queue
            .write_buffer(&self.grass_buffer, 0, bytemuck::bytes_of(&grass));
        let clouds = &frame.clouds[..frame.clouds.len().min(self.cloud_capacity)];
        self.queue
            .write_buffer(&self.cloud_instances, 0, bytemuck::cast_slice(clouds));
        self.cloud_count = clouds.len() as u32;

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rpass.set_bind_group(0, &self.bind_group, &[]);

            rpass.set_pipeline(&self.opaque_pipeline);
            self.opaque.draw(&mut rpass, &self.identity_instance, 1);

            rpass.set_pipeline(&self.grass_pipeline);
            rpass.set_vertex_buffer(0, self.blade_vb.slice(..));
            rpass.set_vertex_buffer(1, self.blade_instances.slice(..));
            rpass.set_index_buffer(self.blade_ib.slice(..), wgpu::IndexFormat::Uint16);
            rpass.draw_indexed(0..self.blade_index_count, 0, 0..self.blade_count);

            rpass.set_pipeline(&self.translucent_pipeline);
            self.glow.draw(&mut rpass, &self.identity_instance, 1);
            self.cloud.draw(&mut rpass, &self.cloud_instances, self.cloud_count);
        }
        self.queue.submit(Some(encoder.finish()));
        output.present();
        Ok(())
    }
}
