//! Shader programs with GL-style named uniforms.
//!
//! # Invariants
//! - Uniform writes persist in a program's [`UniformBlock`] until overwritten.
//! - Every draw sees the block exactly as it was when the draw was recorded:
//!   the block is snapshotted into a per-frame arena and bound with a dynamic
//!   offset.
//! - The arena is only reallocated between frames, never while a pass that
//!   references it is being recorded.

use crate::mesh;
use crate::replay::UniformTarget;
use phongview_render::{UniformBlock, UniformLayout};

/// Per-frame storage for uniform snapshots, one aligned slot per draw.
struct UniformArena {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    stride: u64,
    capacity: u64,
    staged: Vec<u8>,
    used: u64,
}

impl UniformArena {
    const INITIAL_SLOTS: u64 = 64;

    fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        label: &str,
        block_size: u64,
        alignment: u64,
    ) -> Self {
        let stride = block_size.div_ceil(alignment) * alignment;
        let (buffer, bind_group) =
            Self::allocate(device, layout, label, stride, block_size, Self::INITIAL_SLOTS);
        Self {
            buffer,
            bind_group,
            stride,
            capacity: Self::INITIAL_SLOTS,
            staged: Vec::new(),
            used: 0,
        }
    }

    fn allocate(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        label: &str,
        stride: u64,
        block_size: u64,
        slots: u64,
    ) -> (wgpu::Buffer, wgpu::BindGroup) {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("{label}_uniform_arena")),
            size: stride * slots,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{label}_uniform_bind_group")),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(block_size),
                }),
            }],
        });
        (buffer, bind_group)
    }

    fn reset(&mut self) {
        self.staged.clear();
        self.used = 0;
    }

    /// Copy `bytes` into the next slot and return its dynamic offset.
    fn push(&mut self, bytes: &[u8]) -> u32 {
        let offset = self.used * self.stride;
        self.staged.extend_from_slice(bytes);
        self.staged.resize(((self.used + 1) * self.stride) as usize, 0);
        self.used += 1;
        offset as u32
    }

    /// Grow if needed, then upload this frame's snapshots.
    fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        label: &str,
        block_size: u64,
    ) {
        if self.used == 0 {
            return;
        }
        if self.used > self.capacity {
            let slots = self.used.next_power_of_two();
            tracing::debug!(program = label, slots, "growing uniform arena");
            let (buffer, bind_group) =
                Self::allocate(device, layout, label, self.stride, block_size, slots);
            self.buffer = buffer;
            self.bind_group = bind_group;
            self.capacity = slots;
        }
        queue.write_buffer(&self.buffer, 0, &self.staged);
    }
}

/// A render pipeline together with its uniform block.
pub struct ShaderProgram {
    label: String,
    pipeline: wgpu::RenderPipeline,
    uniform_layout: wgpu::BindGroupLayout,
    block: UniformBlock,
    arena: UniformArena,
}

/// Pipeline state shared by both programs.
pub(crate) struct ProgramDesc<'a> {
    pub label: &'a str,
    pub source: &'a str,
    pub layout: UniformLayout,
    /// Bind groups after the uniform group (group 0).
    pub extra_groups: &'a [&'a wgpu::BindGroupLayout],
    pub color_format: wgpu::TextureFormat,
    pub depth_format: wgpu::TextureFormat,
}

impl ShaderProgram {
    pub(crate) fn new(device: &wgpu::Device, desc: ProgramDesc<'_>) -> Self {
        let block_size = u64::from(desc.layout.size());
        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(&format!("{}_uniform_layout", desc.label)),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(block_size),
                },
                count: None,
            }],
        });

        let mut groups = vec![&uniform_layout];
        groups.extend_from_slice(desc.extra_groups);
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(&format!("{}_pipeline_layout", desc.label)),
            bind_group_layouts: &groups,
            push_constant_ranges: &[],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(&format!("{}_shader", desc.label)),
            source: wgpu::ShaderSource::Wgsl(desc.source.into()),
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(&format!("{}_pipeline", desc.label)),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[mesh::vertex_layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: desc.color_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: Some(wgpu::Face::Back),
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: desc.depth_format,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        let alignment = u64::from(device.limits().min_uniform_buffer_offset_alignment);
        let arena = UniformArena::new(device, &uniform_layout, desc.label, block_size, alignment);

        tracing::debug!(program = desc.label, block_size, "shader program created");
        Self {
            label: desc.label.to_string(),
            pipeline,
            uniform_layout,
            block: UniformBlock::new(desc.label, desc.layout),
            arena,
        }
    }

    pub(crate) fn begin_frame(&mut self) {
        self.arena.reset();
    }

    pub(crate) fn upload(&mut self, device: &wgpu::Device, queue: &wgpu::Queue) {
        let block_size = u64::from(self.block.layout().size());
        self.arena
            .upload(device, queue, &self.uniform_layout, &self.label, block_size);
    }

    pub(crate) fn bind(&self, pass: &mut wgpu::RenderPass<'_>, offset: u32) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.arena.bind_group, &[offset]);
    }
}

impl UniformTarget for ShaderProgram {
    fn block_mut(&mut self) -> &mut UniformBlock {
        &mut self.block
    }

    /// Copies the block into the arena; the handle is its dynamic offset.
    fn snapshot(&mut self) -> u32 {
        self.arena.push(self.block.bytes())
    }
}
