//! Rendering system for the rotating rod

use common::{
    create_dynamic_vertex_buffer, create_vertex_buffer, Camera2D, CameraUniform,
    GraphicsContext, Vertex,
};
use glam::Vec2;
use inertia_sim::FrameUpdate;

/// Half thickness of the drawn rod (m)
const ROD_HALF_WIDTH: f32 = 0.05;
const MASS_RADIUS: f32 = 0.12;

const ROD_COLOR: [f32; 4] = [0.25, 0.45, 1.0, 1.0];
const MASS_COLOR: [f32; 4] = [1.0, 0.15, 0.15, 1.0];
const AXIS_COLOR: [f32; 4] = [0.3, 0.3, 0.35, 1.0];

/// Instance data for one mass marker
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MarkerInstance {
    pub position: [f32; 3],
    pub radius: f32,
    pub color: [f32; 4],
}

impl MarkerInstance {
    const ATTRIBS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        2 => Float32x3,
        3 => Float32,
        4 => Float32x4,
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MarkerInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// Quad vertex for instanced rendering
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct QuadVertex {
    pub position: [f32; 2],
}

impl QuadVertex {
    const ATTRIBS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

// Unit quad vertices
const QUAD_VERTICES: &[QuadVertex] = &[
    QuadVertex { position: [-1.0, -1.0] },
    QuadVertex { position: [1.0, -1.0] },
    QuadVertex { position: [1.0, 1.0] },
    QuadVertex { position: [-1.0, -1.0] },
    QuadVertex { position: [1.0, 1.0] },
    QuadVertex { position: [-1.0, 1.0] },
];

/// Two triangles covering a thick segment from `start` to `end`
pub fn rod_quad(start: Vec2, end: Vec2, half_width: f32, color: [f32; 4]) -> [Vertex; 6] {
    let normal = (end - start).normalize_or_zero().perp() * half_width;
    let a = start - normal;
    let b = end - normal;
    let c = end + normal;
    let d = start + normal;
    [a, b, c, a, c, d].map(|p| Vertex::flat(p.x, p.y, color))
}

/// Marker instances for the frame's mass positions
pub fn mass_markers(frame: &FrameUpdate) -> Vec<MarkerInstance> {
    frame
        .masses
        .iter()
        .map(|p| {
            let p = p.as_vec2();
            MarkerInstance {
                position: [p.x, p.y, 0.0],
                radius: MASS_RADIUS,
                color: MASS_COLOR,
            }
        })
        .collect()
}

fn axis_vertices(extent: f32) -> [Vertex; 4] {
    [
        Vertex::flat(-extent, 0.0, AXIS_COLOR),
        Vertex::flat(extent, 0.0, AXIS_COLOR),
        Vertex::flat(0.0, -extent, AXIS_COLOR),
        Vertex::flat(0.0, extent, AXIS_COLOR),
    ]
}

pub struct Renderer {
    axis_pipeline: wgpu::RenderPipeline,
    rod_pipeline: wgpu::RenderPipeline,
    marker_pipeline: wgpu::RenderPipeline,
    quad_buffer: wgpu::Buffer,
    axis_buffer: wgpu::Buffer,
    rod_buffer: wgpu::Buffer,
    marker_buffer: wgpu::Buffer,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    marker_capacity: usize,
}

impl Renderer {
    pub fn new(ctx: &GraphicsContext, initial_markers: usize, view_extent: f32) -> Self {
        let device = &ctx.device;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Rod Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/rod.wgsl").into()),
        });

        let camera_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Camera Buffer"),
            size: std::mem::size_of::<CameraUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Camera Bind Group Layout"),
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

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera Bind Group"),
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Render Pipeline Layout"),
            bind_group_layouts: &[&camera_bind_group_layout],
            push_constant_ranges: &[],
        });

        let flat_pipeline = |label: &str, topology: wgpu::PrimitiveTopology| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: "vs_flat",
                    buffers: &[Vertex::LAYOUT],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: "fs_flat",
                    targets: &[Some(wgpu::ColorTargetState {
                        format: ctx.config.format,
                        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology,
                    ..Default::default()
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
            })
        };

        let axis_pipeline = flat_pipeline("Axis Pipeline", wgpu::PrimitiveTopology::LineList);
        let rod_pipeline = flat_pipeline("Rod Pipeline", wgpu::PrimitiveTopology::TriangleList);

        let marker_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Marker Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_marker",
                buffers: &[QuadVertex::layout(), MarkerInstance::layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_marker",
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.config.format,
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
            multiview: None,
        });

        let quad_buffer = create_vertex_buffer(device, "Quad Buffer", QUAD_VERTICES);
        let axis_buffer = create_vertex_buffer(device, "Axis Buffer", &axis_vertices(view_extent));
        let rod_buffer = create_dynamic_vertex_buffer::<Vertex>(device, "Rod Buffer", 6);

        let marker_capacity = initial_markers.max(1).next_power_of_two();
        let marker_buffer =
            create_dynamic_vertex_buffer::<MarkerInstance>(device, "Marker Buffer", marker_capacity);

        Self {
            axis_pipeline,
            rod_pipeline,
            marker_pipeline,
            quad_buffer,
            axis_buffer,
            rod_buffer,
            marker_buffer,
            camera_buffer,
            camera_bind_group,
            marker_capacity,
        }
    }

    pub fn update_camera(&self, queue: &wgpu::Queue, camera: &Camera2D) {
        let uniform = CameraUniform::from_camera_2d(camera);
        queue.write_buffer(&self.camera_buffer, 0, bytemuck::cast_slice(&[uniform]));
    }

    /// Upload rod and mass geometry; returns the number of markers to draw.
    ///
    /// The marker buffer grows as masses are added, since the mass list is
    /// unbounded.
    pub fn update_frame(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        frame: &FrameUpdate,
    ) -> u32 {
        let (pivot, tip) = frame.rod;
        let rod = rod_quad(pivot.as_vec2(), tip.as_vec2(), ROD_HALF_WIDTH, ROD_COLOR);
        queue.write_buffer(&self.rod_buffer, 0, bytemuck::cast_slice(&rod));

        let markers = mass_markers(frame);
        if markers.len() > self.marker_capacity {
            self.marker_capacity = markers.len().next_power_of_two();
            log::debug!("growing marker buffer to {}", self.marker_capacity);
            self.marker_buffer = create_dynamic_vertex_buffer::<MarkerInstance>(
                device,
                "Marker Buffer",
                self.marker_capacity,
            );
        }
        if !markers.is_empty() {
            queue.write_buffer(&self.marker_buffer, 0, bytemuck::cast_slice(&markers));
        }

        markers.len() as u32
    }

    pub fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        num_markers: u32,
    ) {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: 0.05,
                        g: 0.05,
                        b: 0.08,
                        a: 1.0,
                    }),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        render_pass.set_bind_group(0, &self.camera_bind_group, &[]);

        render_pass.set_pipeline(&self.axis_pipeline);
        render_pass.set_vertex_buffer(0, self.axis_buffer.slice(..));
        render_pass.draw(0..4, 0..1);

        render_pass.set_pipeline(&self.rod_pipeline);
        render_pass.set_vertex_buffer(0, self.rod_buffer.slice(..));
        render_pass.draw(0..6, 0..1);

        // Masses on top of the rod
        if num_markers > 0 {
            render_pass.set_pipeline(&self.marker_pipeline);
            render_pass.set_vertex_buffer(0, self.quad_buffer.slice(..));
            render_pass.set_vertex_buffer(1, self.marker_buffer.slice(..));
            render_pass.draw(0..6, 0..num_markers);
        }
    }
}
