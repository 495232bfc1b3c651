use std::num::NonZeroU64;
use std::sync::Arc;

use anyhow::{Context, Result};
use glam::{Mat4, Vec3, Vec4};
use image::RgbaImage;
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::graphics::{
    locations, AttribLocation, BufferHandle, Graphics, Primitive, TextureHandle, UniformLocation,
};
use crate::model::{mip_chain, UploadPolicy};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
const UNIFORM_STRIDE: usize = 512;
const INITIAL_UNIFORM_CAPACITY: usize = 64;
// Enough zeroed bytes for any 16-bit-indexed mesh in the widest slot.
const ZERO_BUFFER_SIZE: wgpu::BufferAddress = 65536 * 16;

const SLOT_COMPONENTS: [u32; 4] = [3, 3, 2, 4];
const POSITION_ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];
const NORMAL_ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![1 => Float32x3];
const TEX_COORD_ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![2 => Float32x2];
const COLOR_ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![3 => Float32x4];

fn vertex_layouts() -> [wgpu::VertexBufferLayout<'static>; 4] {
    let layout = |components: u32, attributes: &'static [wgpu::VertexAttribute]| wgpu::VertexBufferLayout {
        array_stride: (components as usize * std::mem::size_of::<f32>()) as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes,
    };
    [
        layout(SLOT_COMPONENTS[0], &POSITION_ATTRIBUTES),
        layout(SLOT_COMPONENTS[1], &NORMAL_ATTRIBUTES),
        layout(SLOT_COMPONENTS[2], &TEX_COORD_ATTRIBUTES),
        layout(SLOT_COMPONENTS[3], &COLOR_ATTRIBUTES),
    ]
}

/// Per-draw snapshot of every uniform, laid out to match `DrawUniforms` in the shader.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct UniformBlock {
    model: [[f32; 4]; 4],
    view: [[f32; 4]; 4],
    projection: [[f32; 4]; 4],
    normal: [[f32; 4]; 4],
    ambient: [f32; 4],
    directional_color: [f32; 4],
    directional_dir: [f32; 4],
    point_position: [f32; 4],
    point_color: [f32; 4],
    fragment_color: [f32; 4],
    flags: [i32; 4],
}

impl UniformBlock {
    fn new() -> Self {
        Self {
            model: Mat4::IDENTITY.to_cols_array_2d(),
            view: Mat4::IDENTITY.to_cols_array_2d(),
            projection: Mat4::IDENTITY.to_cols_array_2d(),
            normal: Mat4::IDENTITY.to_cols_array_2d(),
            ambient: [1.0; 4],
            directional_color: [0.0; 4],
            directional_dir: [0.0, -1.0, 0.0, 0.0],
            point_position: [0.0; 4],
            point_color: [0.0; 4],
            fragment_color: [1.0; 4],
            flags: [0; 4],
        }
    }
}

/// Pipeline state accumulated between draws.
#[derive(Debug, Clone, Copy)]
struct DrawState {
    attributes: [Option<BufferHandle>; 4],
    index_buffer: Option<BufferHandle>,
    texture: Option<TextureHandle>,
    uniforms: UniformBlock,
}

#[derive(Debug, Clone, Copy)]
struct DrawCall {
    primitive: Primitive,
    count: u32,
    indexed: bool,
    attributes: [Option<BufferHandle>; 4],
    index_buffer: Option<BufferHandle>,
    texture: Option<TextureHandle>,
    uniforms: UniformBlock,
}

/// wgpu implementation of [`Graphics`].
///
/// Draw calls are collected during the frame and encoded into a single render
/// pass by `end_frame`; each call keeps its own uniform snapshot at a dynamic
/// offset.
pub struct Renderer {
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
    triangle_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,
    uniform_layout: wgpu::BindGroupLayout,
    texture_layout: wgpu::BindGroupLayout,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    uniform_capacity: usize,
    depth_view: wgpu::TextureView,
    zero_buffer: wgpu::Buffer,
    default_texture: wgpu::BindGroup,
    buffers: Vec<wgpu::Buffer>,
    textures: Vec<wgpu::BindGroup>,
    state: DrawState,
    draws: Vec<DrawCall>,
    clear_color: wgpu::Color,
}

impl Renderer {
    pub fn new(window: Arc<Window>) -> Result<Self> {
        let size = window.inner_size();
        let instance = wgpu::Instance::default();
        let surface = instance
            .create_surface(window)
            .context("failed to create surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("no suitable GPU adapter")?;

        let info = adapter.get_info();
        log::info!("Using adapter {} ({:?})", info.name, info.backend);

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("Primary Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_defaults().using_resolution(adapter.limits()),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("failed to create device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|format| format.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .context("surface reports no formats")?;
        log::info!("Selected surface format: {:?}", surface_format);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Draw Uniform Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: NonZeroU64::new(std::mem::size_of::<UniformBlock>() as u64),
                },
                count: None,
            }],
        });

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Texture Layout"),
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

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scooter Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/scooter.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Render Pipeline Layout"),
            bind_group_layouts: &[&uniform_layout, &texture_layout],
            push_constant_ranges: &[],
        });

        let triangle_pipeline = create_pipeline(
            &device,
            &pipeline_layout,
            &shader,
            config.format,
            wgpu::PrimitiveTopology::TriangleList,
        );
        let line_pipeline = create_pipeline(
            &device,
            &pipeline_layout,
            &shader,
            config.format,
            wgpu::PrimitiveTopology::LineList,
        );

        let uniform_buffer = create_uniform_buffer(&device, INITIAL_UNIFORM_CAPACITY);
        let uniform_bind_group = create_uniform_bind_group(&device, &uniform_layout, &uniform_buffer);
        let depth_view = create_depth_view(&device, &config);

        let zero_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Disabled Attribute Buffer"),
            size: ZERO_BUFFER_SIZE,
            usage: wgpu::BufferUsages::VERTEX,
            mapped_at_creation: false,
        });

        let white = RgbaImage::from_pixel(1, 1, image::Rgba([255, 255, 255, 255]));
        let default_texture = upload_texture(&device, &queue, &texture_layout, &white);

        Ok(Self {
            device,
            queue,
            surface,
            config,
            triangle_pipeline,
            line_pipeline,
            uniform_layout,
            texture_layout,
            uniform_buffer,
            uniform_bind_group,
            uniform_capacity: INITIAL_UNIFORM_CAPACITY,
            depth_view,
            zero_buffer,
            default_texture,
            buffers: Vec::new(),
            textures: Vec::new(),
            state: DrawState {
                attributes: [None; 4],
                index_buffer: None,
                texture: None,
                uniforms: UniformBlock::new(),
            },
            draws: Vec::new(),
            clear_color: wgpu::Color::BLACK,
        })
    }

    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    fn buffer(&self, handle: BufferHandle) -> Result<&wgpu::Buffer> {
        self.buffers
            .get(handle.0 as usize)
            .with_context(|| format!("unknown buffer {:?}", handle))
    }

    fn ensure_uniform_capacity(&mut self, draws: usize) {
        if draws <= self.uniform_capacity {
            return;
        }
        let capacity = draws.next_power_of_two();
        log::debug!("Growing uniform buffer to {} draws", capacity);
        self.uniform_buffer = create_uniform_buffer(&self.device, capacity);
        self.uniform_bind_group =
            create_uniform_bind_group(&self.device, &self.uniform_layout, &self.uniform_buffer);
        self.uniform_capacity = capacity;
    }

    fn record_draw(&mut self, primitive: Primitive, count: u32, indexed: bool) {
        let mut uniforms = self.state.uniforms;
        uniforms.flags[1] = self.state.attributes[1].is_some() as i32;
        uniforms.flags[2] = self.state.attributes[3].is_some() as i32;
        let use_texture = uniforms.flags[0] != 0;

        self.draws.push(DrawCall {
            primitive,
            count,
            indexed,
            attributes: self.state.attributes,
            index_buffer: self.state.index_buffer,
            texture: self.state.texture.filter(|_| use_texture),
            uniforms,
        });
    }

    fn encode(&self, view: &wgpu::TextureView, draws: &[DrawCall]) -> Result<wgpu::CommandBuffer> {
        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Render Encoder"),
        });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
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
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            for (index, draw) in draws.iter().enumerate() {
                let pipeline = match draw.primitive {
                    Primitive::Triangles => &self.triangle_pipeline,
                    Primitive::Lines => &self.line_pipeline,
                };
                render_pass.set_pipeline(pipeline);
                render_pass.set_bind_group(0, &self.uniform_bind_group, &[(index * UNIFORM_STRIDE) as u32]);

                let texture = match draw.texture {
                    Some(handle) => self
                        .textures
                        .get(handle.0 as usize)
                        .with_context(|| format!("unknown texture {:?}", handle))?,
                    None => &self.default_texture,
                };
                render_pass.set_bind_group(1, texture, &[]);

                for (slot, attribute) in draw.attributes.iter().enumerate() {
                    let buffer = match attribute {
                        Some(handle) => self.buffer(*handle)?,
                        None => &self.zero_buffer,
                    };
                    render_pass.set_vertex_buffer(slot as u32, buffer.slice(..));
                }

                if draw.indexed {
                    let indices = draw.index_buffer.context("indexed draw without an index buffer")?;
                    render_pass.set_index_buffer(self.buffer(indices)?.slice(..), wgpu::IndexFormat::Uint16);
                    render_pass.draw_indexed(0..draw.count, 0, 0..1);
                } else {
                    render_pass.draw(0..draw.count, 0..1);
                }
            }
        }

        Ok(encoder.finish())
    }
}

impl Graphics for Renderer {
    fn create_vertex_buffer(&mut self, data: &[f32]) -> BufferHandle {
        let buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Vertex Buffer"),
            contents: bytemuck::cast_slice(data),
            usage: wgpu::BufferUsages::VERTEX,
        });
        self.buffers.push(buffer);
        BufferHandle(self.buffers.len() as u32 - 1)
    }

    fn create_index_buffer(&mut self, data: &[u16]) -> BufferHandle {
        let buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Index Buffer"),
            contents: bytemuck::cast_slice(data),
            usage: wgpu::BufferUsages::INDEX,
        });
        self.buffers.push(buffer);
        BufferHandle(self.buffers.len() as u32 - 1)
    }

    fn create_texture(&mut self, image: &RgbaImage) -> Result<TextureHandle> {
        let (width, height) = image.dimensions();
        let max = self.device.limits().max_texture_dimension_2d;
        anyhow::ensure!(width > 0 && height > 0, "cannot upload an empty texture");
        anyhow::ensure!(
            width <= max && height <= max,
            "texture {}x{} exceeds the device limit of {}",
            width,
            height,
            max
        );

        let bind_group = upload_texture(&self.device, &self.queue, &self.texture_layout, image);
        self.textures.push(bind_group);
        Ok(TextureHandle(self.textures.len() as u32 - 1))
    }

    fn begin_frame(&mut self, clear_color: [f32; 4]) {
        let [r, g, b, a] = clear_color.map(f64::from);
        self.clear_color = wgpu::Color { r, g, b, a };
        self.draws.clear();
    }

    fn end_frame(&mut self) -> Result<()> {
        let draws = std::mem::take(&mut self.draws);
        self.ensure_uniform_capacity(draws.len());

        if !draws.is_empty() {
            let mut bytes = vec![0u8; draws.len() * UNIFORM_STRIDE];
            for (chunk, draw) in bytes.chunks_exact_mut(UNIFORM_STRIDE).zip(&draws) {
                let block = bytemuck::bytes_of(&draw.uniforms);
                chunk[..block.len()].copy_from_slice(block);
            }
            self.queue.write_buffer(&self.uniform_buffer, 0, &bytes);
        }

        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost or outdated; reconfiguring and skipping the frame");
                self.surface.configure(&self.device, &self.config);
                return Ok(());
            }
            Err(error) => return Err(error).context("failed to acquire the next surface texture"),
        };
        let view = frame.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let commands = self.encode(&view, &draws)?;
        self.queue.submit(Some(commands));
        frame.present();
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            log::warn!("Ignoring resize to {}x{}", width, height);
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_view = create_depth_view(&self.device, &self.config);
    }

    fn set_vertex_attribute(&mut self, location: AttribLocation, components: u32, buffer: BufferHandle) {
        let slot = location.0 as usize;
        match SLOT_COMPONENTS.get(slot) {
            Some(&expected) if expected == components => self.state.attributes[slot] = Some(buffer),
            Some(&expected) => log::warn!(
                "Attribute {} takes {} components, got {}; ignoring",
                slot,
                expected,
                components
            ),
            None => log::warn!("No vertex slot for attribute location {}", slot),
        }
    }

    fn disable_vertex_attribute(&mut self, location: AttribLocation) {
        if let Some(attribute) = self.state.attributes.get_mut(location.0 as usize) {
            *attribute = None;
        }
    }

    fn bind_index_buffer(&mut self, buffer: BufferHandle) {
        self.state.index_buffer = Some(buffer);
    }

    fn bind_texture(&mut self, texture: TextureHandle) {
        self.state.texture = Some(texture);
    }

    fn set_uniform_matrix4(&mut self, location: UniformLocation, value: &Mat4) {
        let uniforms = &mut self.state.uniforms;
        let target = match location {
            locations::MODEL_MATRIX => &mut uniforms.model,
            locations::VIEW_MATRIX => &mut uniforms.view,
            locations::PROJECTION_MATRIX => &mut uniforms.projection,
            locations::NORMAL_MATRIX => &mut uniforms.normal,
            _ => {
                log::warn!("Uniform {} is not a matrix", location.0);
                return;
            }
        };
        *target = value.to_cols_array_2d();
    }

    fn set_uniform_vec3(&mut self, location: UniformLocation, value: Vec3) {
        self.set_uniform_vec4(location, value.extend(0.0));
    }

    fn set_uniform_vec4(&mut self, location: UniformLocation, value: Vec4) {
        let uniforms = &mut self.state.uniforms;
        let target = match location {
            locations::AMBIENT_LIGHT => &mut uniforms.ambient,
            locations::DIRECTIONAL_LIGHT => &mut uniforms.directional_color,
            locations::DIRECTIONAL_DIR => &mut uniforms.directional_dir,
            locations::POINT_LIGHT_POS => &mut uniforms.point_position,
            locations::POINT_LIGHT_COLOR => &mut uniforms.point_color,
            locations::FRAGMENT_COLOR => &mut uniforms.fragment_color,
            _ => {
                log::warn!("Uniform {} is not a vector", location.0);
                return;
            }
        };
        *target = value.to_array();
    }

    fn set_uniform_int(&mut self, location: UniformLocation, value: i32) {
        match location {
            locations::USE_TEXTURE => self.state.uniforms.flags[0] = value,
            // One texture unit; the bound texture always samples from it.
            locations::SAMPLER => {}
            _ => log::warn!("Uniform {} is not an integer", location.0),
        }
    }

    fn draw_indexed(&mut self, primitive: Primitive, count: u32) {
        self.record_draw(primitive, count, true);
    }

    fn draw_arrays(&mut self, primitive: Primitive, count: u32) {
        self.record_draw(primitive, count, false);
    }
}

fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    format: wgpu::TextureFormat,
    topology: wgpu::PrimitiveTopology,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(match topology {
            wgpu::PrimitiveTopology::LineList => "Line Pipeline",
            _ => "Triangle Pipeline",
        }),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &vertex_layouts(),
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            // Open cylinders and rims are seen from both sides.
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
        cache: None,
    })
}

fn create_uniform_buffer(device: &wgpu::Device, draws: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Draw Uniform Buffer"),
        size: (draws * UNIFORM_STRIDE) as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_uniform_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    buffer: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Draw Uniform Bind Group"),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer,
                offset: 0,
                size: NonZeroU64::new(std::mem::size_of::<UniformBlock>() as u64),
            }),
        }],
    })
}

fn create_depth_view(device: &wgpu::Device, config: &wgpu::SurfaceConfiguration) -> wgpu::TextureView {
    let depth_texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: config.width,
            height: config.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    depth_texture.create_view(&wgpu::TextureViewDescriptor::default())
}

fn upload_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    layout: &wgpu::BindGroupLayout,
    image: &RgbaImage,
) -> wgpu::BindGroup {
    let policy = UploadPolicy::for_image(image);
    let levels = match policy {
        UploadPolicy::Mipmapped => mip_chain(image),
        UploadPolicy::ClampToEdge => vec![image.clone()],
    };

    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Part Texture"),
        size: wgpu::Extent3d {
            width: image.width(),
            height: image.height(),
            depth_or_array_layers: 1,
        },
        mip_level_count: levels.len() as u32,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    for (level, data) in levels.iter().enumerate() {
        queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &texture,
                mip_level: level as u32,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            data.as_raw(),
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(4 * data.width()),
                rows_per_image: Some(data.height()),
            },
            wgpu::Extent3d {
                width: data.width(),
                height: data.height(),
                depth_or_array_layers: 1,
            },
        );
    }

    let (address_mode, mipmap_filter) = match policy {
        UploadPolicy::Mipmapped => (wgpu::AddressMode::Repeat, wgpu::FilterMode::Linear),
        UploadPolicy::ClampToEdge => (wgpu::AddressMode::ClampToEdge, wgpu::FilterMode::Nearest),
    };
    let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("Part Sampler"),
        address_mode_u: address_mode,
        address_mode_v: address_mode,
        address_mode_w: address_mode,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter,
        ..Default::default()
    });

    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Texture Bind Group"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(&sampler),
            },
        ],
    })
}
