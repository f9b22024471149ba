//! WebGPU renderer for the volumetric cloud
//!
//! Renders motes as instanced billboard circles over a transparent surface.
//! Only compiled with the `webgpu` feature.

use web_sys::HtmlCanvasElement;
use wgpu::util::DeviceExt;

use crate::camera3d::CloudCamera;
use crate::scene_types::Rgb;
use crate::volumetric::ParticleCloud;

/// Billboard radius in world units for a render scale of 1.0
const MOTE_RADIUS: f32 = 0.1;

/// Alpha applied to every mote
const MOTE_ALPHA: f32 = 0.8;

/// Largest instance buffer we allocate up front
const MAX_MOTES: usize = 1024;

/// Vertex for mote rendering (quad corner in local space)
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct MoteVertex {
    position: [f32; 2],
}

/// Instance data for each mote
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct MoteInstance {
    world_pos: [f32; 3],
    radius: f32,
    color: [f32; 4],
}

/// Uniform buffer for the combined transform
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct CloudUniforms {
    mvp: [f32; 16],
    canvas_size: [f32; 2],
    _padding: [f32; 2],
}

/// WebGPU cloud renderer
pub struct CloudRenderer {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,

    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    instance_buffer: wgpu::Buffer,
    instance_count: u32,

    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,

    camera: CloudCamera,

    width: u32,
    height: u32,
}

impl CloudRenderer {
    /// Create a new renderer for the given canvas (async)
    pub async fn new(canvas: HtmlCanvasElement) -> Result<Self, String> {
        let width = canvas.width();
        let height = canvas.height();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas))
            .map_err(|e| format!("Failed to create surface: {}", e))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or("Failed to find adapter")?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("constella-viz"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await
            .map_err(|e| format!("Failed to create device: {}", e))?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: wgpu::CompositeAlphaMode::Auto,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let camera = CloudCamera::new(width as f32 / height.max(1) as f32);
        let uniforms = CloudUniforms {
            mvp: camera.mvp(0.0, 0.0).to_array(),
            canvas_size: [width as f32, height as f32],
            _padding: [0.0, 0.0],
        };

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Cloud Uniform Buffer"),
            contents: bytemuck::cast_slice(&[uniforms]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Cloud Bind Group Layout"),
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

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Cloud Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Mote Shader"),
            source: wgpu::ShaderSource::Wgsl(MOTE_SHADER.into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Mote Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Mote Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[
                    // Vertex buffer (quad)
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<MoteVertex>() as wgpu::BufferAddress,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &wgpu::vertex_attr_array![0 => Float32x2],
                    },
                    // Instance buffer
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<MoteInstance>() as wgpu::BufferAddress,
                        step_mode: wgpu::VertexStepMode::Instance,
                        attributes: &wgpu::vertex_attr_array![1 => Float32x3, 2 => Float32, 3 => Float32x4],
                    },
                ],
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
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        // Two triangles forming the billboard quad
        let vertices = [
            MoteVertex {
                position: [-1.0, -1.0],
            },
            MoteVertex {
                position: [1.0, -1.0],
            },
            MoteVertex {
                position: [1.0, 1.0],
            },
            MoteVertex {
                position: [-1.0, -1.0],
            },
            MoteVertex {
                position: [1.0, 1.0],
            },
            MoteVertex {
                position: [-1.0, 1.0],
            },
        ];

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mote Vertex Buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Mote Instance Buffer"),
            size: (MAX_MOTES * std::mem::size_of::<MoteInstance>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            vertex_buffer,
            instance_buffer,
            instance_count: 0,
            uniform_buffer,
            bind_group,
            camera,
            width,
            height,
        })
    }

    /// Resize the renderer
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.width = width;
            self.height = height;
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
            self.camera.resize(width as f32, height as f32);
        }
    }

    /// Render the cloud's current state
    pub fn render(&mut self, cloud: &ParticleCloud, palette: &[Rgb]) {
        self.update_instances(cloud, palette);

        let uniforms = CloudUniforms {
            mvp: self.camera.mvp(cloud.yaw(), cloud.roll()).to_array(),
            canvas_size: [self.width as f32, self.height as f32],
            _padding: [0.0, 0.0],
        };
        self.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniforms]));

        let output = match self.surface.get_current_texture() {
            Ok(t) => t,
            Err(_) => {
                self.surface.configure(&self.device, &self.config);
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Cloud Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Cloud Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if self.instance_count > 0 {
                render_pass.set_pipeline(&self.pipeline);
                render_pass.set_bind_group(0, &self.bind_group, &[]);
                render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
                render_pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
                render_pass.draw(0..6, 0..self.instance_count);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }

    /// Rebuild the instance buffer from the cloud, applying the pulse to
    /// each mote's billboard radius.
    fn update_instances(&mut self, cloud: &ParticleCloud, palette: &[Rgb]) {
        let instances: Vec<MoteInstance> = cloud
            .motes()
            .iter()
            .enumerate()
            .take(MAX_MOTES)
            .map(|(i, m)| {
                let color = palette
                    .get(m.color)
                    .copied()
                    .unwrap_or(Rgb(255, 255, 255))
                    .normalized(MOTE_ALPHA);
                MoteInstance {
                    world_pos: [m.x, m.y, m.z],
                    radius: cloud.render_scale(i) * MOTE_RADIUS,
                    color,
                }
            })
            .collect();

        if !instances.is_empty() {
            self.queue
                .write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&instances));
        }
        self.instance_count = instances.len() as u32;
    }
}

const MOTE_SHADER: &str = r#"
struct CloudUniforms {
    mvp: mat4x4<f32>,
    canvas_size: vec2<f32>,
    _padding: vec2<f32>,
}

@group(0) @binding(0)
var<uniform> cloud: CloudUniforms;

struct VertexInput {
    @location(0) position: vec2<f32>,
}

struct InstanceInput {
    @location(1) world_pos: vec3<f32>,
    @location(2) radius: f32,
    @location(3) color: vec4<f32>,
}

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
    @location(1) local_pos: vec2<f32>,
}

@vertex
fn vs_main(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    var out: VertexOutput;

    // Project the mote center, then offset the quad corner in clip space so
    // the billboard always faces the camera.
    let center_clip = cloud.mvp * vec4<f32>(instance.world_pos, 1.0);
    let aspect = cloud.canvas_size.x / cloud.canvas_size.y;
    let billboard_scale = instance.radius * 2.0;

    out.clip_position = center_clip;
    out.clip_position.x += vertex.position.x * billboard_scale / aspect;
    out.clip_position.y += vertex.position.y * billboard_scale;

    out.color = instance.color;
    out.local_pos = vertex.position;

    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    // Circular footprint with a soft edge
    let dist = length(in.local_pos);
    if (dist > 1.0) {
        discard;
    }
    let alpha = smoothstep(1.0, 0.8, dist);

    return vec4<f32>(in.color.rgb, in.color.a * alpha);
}
"#;
