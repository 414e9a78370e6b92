use crate::GpuError;
use crate::mesh::GpuMesh;
use crate::program::{ProgramDesc, ShaderProgram};
use crate::replay::{self, PlannedDraw};
use crate::shaders;
use crate::texture::{self, GpuTexture};
use phongview_assets::{MeshData, ModelData, TextureImage, TextureKind};
use phongview_render::{DrawList, ProgramKind, RenderableId, Renderer, UniformSet};
use std::collections::HashSet;
use std::sync::Arc;
use winit::dpi::PhysicalSize;
use winit::window::Window;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// wgpu-based renderer owning the surface, device and every GPU resource.
pub struct WgpuRenderer {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    depth_texture: wgpu::TextureView,
    lit: ShaderProgram,
    lamp: ShaderProgram,
    material_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    default_material: wgpu::BindGroup,
    renderables: Vec<Vec<GpuMesh>>,
    reported_missing: HashSet<RenderableId>,
}

impl WgpuRenderer {
    /// Create the surface for `window` and every pipeline.
    pub fn new(window: Arc<Window>, size: PhysicalSize<u32>) -> Result<Self, GpuError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or(GpuError::NoAdapter)?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("phongview_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(GpuError::NoSurfaceFormat)?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let material_layout = texture::material_bind_group_layout(&device);
        let sampler = texture::repeat_sampler(&device);
        let white_diffuse = GpuTexture::white(&device, &queue, true);
        let white_specular = GpuTexture::white(&device, &queue, false);
        let default_material = texture::material_bind_group(
            &device,
            &material_layout,
            &white_diffuse,
            &white_specular,
            &sampler,
        );

        let lit = ShaderProgram::new(
            &device,
            ProgramDesc {
                label: "lit",
                source: shaders::LIT_SHADER,
                layout: shaders::lit_layout(),
                extra_groups: &[&material_layout],
                color_format: surface_format,
                depth_format: DEPTH_FORMAT,
            },
        );
        let lamp = ShaderProgram::new(
            &device,
            ProgramDesc {
                label: "lamp",
                source: shaders::LAMP_SHADER,
                layout: shaders::lamp_layout(),
                extra_groups: &[],
                color_format: surface_format,
                depth_format: DEPTH_FORMAT,
            },
        );

        let depth_texture = Self::create_depth_texture(&device, config.width, config.height);

        tracing::info!(
            backend = adapter.get_info().backend.to_str(),
            adapter = %adapter.get_info().name,
            format = ?surface_format,
            "GPU initialized"
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            depth_texture,
            lit,
            lamp,
            material_layout,
            sampler,
            default_material,
            renderables: Vec::new(),
            reported_missing: HashSet::new(),
        })
    }

    pub fn size(&self) -> PhysicalSize<u32> {
        PhysicalSize::new(self.config.width, self.config.height)
    }

    /// Upload a mesh drawn with the default (white) maps.
    pub fn upload_mesh(&mut self, mesh: &MeshData) -> RenderableId {
        let gpu = GpuMesh::upload(&self.device, mesh);
        self.register(vec![gpu])
    }

    /// Upload a mesh with its own diffuse and specular maps.
    pub fn upload_textured_mesh(
        &mut self,
        mesh: &MeshData,
        diffuse: &TextureImage,
        specular: &TextureImage,
    ) -> RenderableId {
        let mut gpu = GpuMesh::upload(&self.device, mesh);
        gpu.material = Some(self.create_material(
            &GpuTexture::from_image(&self.device, &self.queue, diffuse, true, "diffuse_map"),
            &GpuTexture::from_image(&self.device, &self.queue, specular, false, "specular_map"),
        ));
        self.register(vec![gpu])
    }

    /// Upload every mesh of a model as one renderable. Each mesh sets its own
    /// shininess and map usage before it is drawn.
    pub fn upload_model(&mut self, model: &ModelData) -> RenderableId {
        let textures: Vec<GpuTexture> = model
            .images
            .iter()
            .enumerate()
            .map(|(i, image)| {
                GpuTexture::from_image(&self.device, &self.queue, image, true, &format!("model_image_{i}"))
            })
            .collect();
        let white = GpuTexture::white(&self.device, &self.queue, false);

        let mut meshes = Vec::with_capacity(model.meshes.len());
        for data in &model.meshes {
            let lookup = |kind| data.texture(kind).and_then(|i| textures.get(i));
            let diffuse = lookup(TextureKind::Diffuse);
            let specular = lookup(TextureKind::Specular);
            if data.texture(TextureKind::Diffuse).is_some() && diffuse.is_none() {
                tracing::warn!(mesh = %data.name, "diffuse texture index out of range, using white");
            }

            let mut gpu = GpuMesh::upload(&self.device, data);
            gpu.material = Some(self.create_material(
                diffuse.unwrap_or(&white),
                specular.unwrap_or(&white),
            ));
            gpu.overrides = UniformSet::new()
                .with("material.shininess", data.shininess)
                .with("material.useMaps", i32::from(diffuse.is_some()));
            meshes.push(gpu);
        }
        tracing::info!(meshes = meshes.len(), textures = textures.len(), "model uploaded");
        self.register(meshes)
    }

    /// Reconfigure the surface and depth buffer. Zero sizes are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_texture = Self::create_depth_texture(&self.device, width, height);
    }

    fn register(&mut self, meshes: Vec<GpuMesh>) -> RenderableId {
        let id = RenderableId(self.renderables.len() as u32);
        self.renderables.push(meshes);
        id
    }

    fn create_material(&self, diffuse: &GpuTexture, specular: &GpuTexture) -> wgpu::BindGroup {
        texture::material_bind_group(
            &self.device,
            &self.material_layout,
            diffuse,
            specular,
            &self.sampler,
        )
    }

    /// Replay the draw list into the programs' arenas and upload them.
    fn plan(&mut self, frame: &DrawList) -> Vec<PlannedDraw> {
        self.lit.begin_frame();
        self.lamp.begin_frame();

        let planned = replay::replay(
            frame,
            &mut self.lit,
            &mut self.lamp,
            &self.renderables,
            &mut self.reported_missing,
        );

        self.lit.upload(&self.device, &self.queue);
        self.lamp.upload(&self.device, &self.queue);
        planned
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
}

impl Renderer for WgpuRenderer {
    type Output = Result<(), GpuError>;

    /// Execute one frame, submit and present. A lost or outdated surface is
    /// reconfigured and the frame skipped.
    fn render(&mut self, frame: &DrawList) -> Result<(), GpuError> {
        let output = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                tracing::debug!("surface lost or outdated, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                tracing::warn!("surface timeout, frame skipped");
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let planned = self.plan(frame);

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame_encoder"),
            });
        {
            let [r, g, b, a] = frame.clear_color.map(f64::from);
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("main_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
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

            for draw in &planned {
                let mesh = &self.renderables[draw.renderable][draw.mesh];
                match draw.program {
                    ProgramKind::Lit => {
                        self.lit.bind(&mut pass, draw.snapshot);
                        let material = mesh.material.as_ref().unwrap_or(&self.default_material);
                        pass.set_bind_group(1, material, &[]);
                    }
                    ProgramKind::Lamp => self.lamp.bind(&mut pass, draw.snapshot),
                }
                mesh.draw(&mut pass);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}
