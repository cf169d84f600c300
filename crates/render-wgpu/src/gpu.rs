use crate::shaders;
use crate::textures::GpuTextures;
use bytemuck::{Pod, Zeroable};
use chamber_camera::Camera;
use chamber_scene::{
    CLEAR_COLOR, CUBE_VERTEX_COUNT, FrameInstance, LIGHT_COLOR, OBJECT_COLOR, SCENE, Vertex,
    cube_vertices, light_marker, light_position,
};
use glam::Mat3;
use wgpu::util::DeviceExt;

/// Per-frame uniforms shared by both pipelines. Vectors are padded to vec4.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
struct FrameUniforms {
    projection: [[f32; 4]; 4],
    view: [[f32; 4]; 4],
    light_pos: [f32; 4],
    view_pos: [f32; 4],
    light_color: [f32; 4],
    object_color: [f32; 4],
}

impl FrameUniforms {
    fn new(camera: &Camera, aspect: f32, elapsed: f32) -> Self {
        Self {
            projection: camera.projection_matrix(aspect).to_cols_array_2d(),
            view: camera.view_matrix().to_cols_array_2d(),
            light_pos: light_position(elapsed).extend(1.0).to_array(),
            view_pos: camera.position.extend(1.0).to_array(),
            light_color: LIGHT_COLOR.extend(1.0).to_array(),
            object_color: OBJECT_COLOR.extend(1.0).to_array(),
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
struct InstanceData {
    model: [[f32; 4]; 4],
    normal: [[f32; 4]; 3],
    texture: u32,
}

impl From<FrameInstance> for InstanceData {
    fn from(instance: FrameInstance) -> Self {
        // Inverse-transpose keeps normals perpendicular under non-uniform
        // and negative scale.
        let normal = Mat3::from_mat4(instance.model).inverse().transpose();
        Self {
            model: instance.model.to_cols_array_2d(),
            normal: [
                normal.x_axis.extend(0.0).to_array(),
                normal.y_axis.extend(0.0).to_array(),
                normal.z_axis.extend(0.0).to_array(),
            ],
            texture: instance.texture,
        }
    }
}

/// Lit scene instances in table order, followed by the light marker.
fn frame_instances(elapsed: f32) -> Vec<InstanceData> {
    SCENE
        .iter()
        .map(|descriptor| descriptor.at(elapsed))
        .chain(std::iter::once(light_marker(elapsed)))
        .map(InstanceData::from)
        .collect()
}

/// Index of the light marker in the instance buffer.
const MARKER_INSTANCE: u32 = SCENE.len() as u32;
const INSTANCE_CAPACITY: u64 = SCENE.len() as u64 + 1;

/// wgpu renderer for the chamber.
pub struct ChamberRenderer {
    lit_pipeline: wgpu::RenderPipeline,
    marker_pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    textures: GpuTextures,
    cube_vertex_buffer: wgpu::Buffer,
    instance_buffer: wgpu::Buffer,
    depth_texture: wgpu::TextureView,
    surface_format: wgpu::TextureFormat,
}

impl ChamberRenderer {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        textures: GpuTextures,
    ) -> Self {
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("frame_uniform_buffer"),
            contents: bytemuck::bytes_of(&FrameUniforms::zeroed()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("frame_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("frame_bind_group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("chamber_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout, textures.bind_group_layout()],
            push_constant_ranges: &[],
        });

        let lit_pipeline = create_cube_pipeline(
            device,
            &pipeline_layout,
            surface_format,
            "lit",
            &shaders::lit_shader(),
        );
        let marker_pipeline = create_cube_pipeline(
            device,
            &pipeline_layout,
            surface_format,
            "light_marker",
            &shaders::marker_shader(),
        );

        let cube_vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("cube_vertex_buffer"),
            contents: bytemuck::cast_slice(cube_vertices()),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("instance_buffer"),
            size: INSTANCE_CAPACITY * std::mem::size_of::<InstanceData>() as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let depth_texture = Self::create_depth_texture(device, width, height);

        Self {
            lit_pipeline,
            marker_pipeline,
            uniform_buffer,
            uniform_bind_group,
            textures,
            cube_vertex_buffer,
            instance_buffer,
            depth_texture,
            surface_format,
        }
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_texture = Self::create_depth_texture(device, width, height);
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_format
    }

    pub fn textures(&self) -> &GpuTextures {
        &self.textures
    }

    /// Render one frame of the chamber at `elapsed` seconds.
    pub fn render(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        camera: &Camera,
        aspect: f32,
        elapsed: f32,
    ) {
        queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&FrameUniforms::new(camera, aspect, elapsed)),
        );
        let instances = frame_instances(elapsed);
        queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&instances));

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("chamber_encoder"),
        });

        {
            let [r, g, b, a] = CLEAR_COLOR;
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("chamber_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
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

            pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            pass.set_bind_group(1, self.textures.bind_group(), &[]);
            pass.set_vertex_buffer(0, self.cube_vertex_buffer.slice(..));
            pass.set_vertex_buffer(1, self.instance_buffer.slice(..));

            pass.set_pipeline(&self.lit_pipeline);
            for instance in 0..MARKER_INSTANCE {
                pass.draw(0..CUBE_VERTEX_COUNT, instance..instance + 1);
            }

            pass.set_pipeline(&self.marker_pipeline);
            pass.draw(0..CUBE_VERTEX_COUNT, MARKER_INSTANCE..MARKER_INSTANCE + 1);
        }

        queue.submit(std::iter::once(encoder.finish()));
    }

    fn create_depth_texture(
        device: &wgpu::Device,
        width: u32,
        height: u32,
    ) -> wgpu::TextureView {
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
            format: wgpu::TextureFormat::Depth32Float,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&Default::default())
    }
}

fn create_cube_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    surface_format: wgpu::TextureFormat,
    name: &str,
    source: &str,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(&format!("{name}_shader")),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(&format!("{name}_pipeline")),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &[
                wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<Vertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![
                        0 => Float32x3,
                        1 => Unorm8x4,
                        2 => Float32x2,
                        3 => Float32x3,
                    ],
                },
                wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<InstanceData>() as u64,
                    step_mode: wgpu::VertexStepMode::Instance,
                    attributes: &wgpu::vertex_attr_array![
                        4 => Float32x4,
                        5 => Float32x4,
                        6 => Float32x4,
                        7 => Float32x4,
                        8 => Float32x4,
                        9 => Float32x4,
                        10 => Float32x4,
                        11 => Uint32,
                    ],
                },
            ],
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        // Table legs use a negative scale, which flips their winding.
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: wgpu::TextureFormat::Depth32Float,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: Default::default(),
            bias: Default::default(),
        }),
        multisample: Default::default(),
        multiview: None,
        cache: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chamber_scene::slot;
    use glam::{Mat4, Vec3};

    #[test]
    fn gpu_structs_are_tightly_packed() {
        assert_eq!(std::mem::size_of::<FrameUniforms>(), 192);
        assert_eq!(std::mem::size_of::<InstanceData>(), 116);
        assert_eq!(std::mem::size_of::<Vertex>(), 36);
    }

    #[test]
    fn instances_end_with_light_marker() {
        let instances = frame_instances(1.5);
        assert_eq!(instances.len() as u64, INSTANCE_CAPACITY);
        let marker = instances[MARKER_INSTANCE as usize];
        assert_eq!(marker.texture, slot::SUN);
        let centre = Mat4::from_cols_array_2d(&marker.model).transform_point3(Vec3::ZERO);
        assert!(centre.abs_diff_eq(light_position(1.5), 1e-5));
    }

    #[test]
    fn instances_follow_scene_table() {
        let instances = frame_instances(0.0);
        for (data, descriptor) in instances.iter().zip(SCENE.iter()) {
            assert_eq!(data.texture, descriptor.texture);
            assert_eq!(data.model, descriptor.model_matrix(0.0).to_cols_array_2d());
        }
    }

    #[test]
    fn normal_matrix_undoes_non_uniform_scale() {
        // The floor slab is 8 x 0.1 x 10; its top normal must stay +Y.
        let floor = InstanceData::from(SCENE[8].at(0.0));
        let n = Mat3::from_cols(
            Vec3::from_slice(&floor.normal[0][..3]),
            Vec3::from_slice(&floor.normal[1][..3]),
            Vec3::from_slice(&floor.normal[2][..3]),
        );
        let up = (n * Vec3::Y).normalize();
        assert!(up.abs_diff_eq(Vec3::Y, 1e-5));
        let tilted = (n * Vec3::new(1.0, 1.0, 0.0)).normalize();
        // 0.1 thick slab: normals bend strongly toward its short axis
        assert!(tilted.y > 0.99);
    }

    #[test]
    fn uniforms_carry_camera_and_light() {
        let camera = Camera::default();
        let u = FrameUniforms::new(&camera, 1280.0 / 720.0, 0.0);
        assert_eq!(u.view_pos, [0.0, 2.0, 5.0, 1.0]);
        assert_eq!(u.light_pos, [0.0, 2.0, 5.5, 1.0]);
        assert_eq!(u.light_color, [1.0, 0.68, 0.26, 1.0]);
        assert_eq!(u.object_color[..3], [0.01, 0.01, 0.01]);
        assert_eq!(u.projection, camera.projection_matrix(1280.0 / 720.0).to_cols_array_2d());
    }
}
