use crate::blit::BlitResources;
use crate::mesh::{OCEAN_SEGMENTS, OCEAN_SIZE, PlaneVertex, plane_mesh};
use crate::shaders;
use crate::targets::{DEPTH_FORMAT, RenderTargets, SAMPLE_COUNT, SCENE_COLOR_FORMAT};
use crate::uniforms::{GlobalUniforms, MaterialUniforms, ObjectUniforms, WaterUniforms};
use seaside_assets::{AssetId, ModelData, ModelVertex, TextureData};
use seaside_render::Lighting;
use seaside_scene::SceneState;
use wgpu::util::DeviceExt;

fn uniform_entry(binding: u32, visibility: wgpu::ShaderStages) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn depth_state() -> Option<wgpu::DepthStencilState> {
    Some(wgpu::DepthStencilState {
        format: DEPTH_FORMAT,
        depth_write_enabled: true,
        depth_compare: wgpu::CompareFunction::Less,
        stencil: Default::default(),
        bias: Default::default(),
    })
}

fn multisample_state() -> wgpu::MultisampleState {
    wgpu::MultisampleState {
        count: SAMPLE_COUNT,
        ..Default::default()
    }
}

fn scene_target() -> [Option<wgpu::ColorTargetState>; 1] {
    [Some(wgpu::ColorTargetState {
        format: SCENE_COLOR_FORMAT,
        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
        write_mask: wgpu::ColorWrites::ALL,
    })]
}

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    /// Index into `GpuModel::materials`; `None` draws with the default.
    material: Option<usize>,
}

struct GpuModel {
    id: AssetId,
    meshes: Vec<GpuMesh>,
    materials: Vec<wgpu::BindGroup>,
    default_material: wgpu::BindGroup,
}

/// wgpu scene renderer: ocean plane and floating model.
pub struct SceneRenderer {
    globals_buffer: wgpu::Buffer,
    globals_bind_group: wgpu::BindGroup,

    water_pipeline: wgpu::RenderPipeline,
    water_buffer: wgpu::Buffer,
    water_bind_group: wgpu::BindGroup,
    ocean_vertex_buffer: wgpu::Buffer,
    ocean_index_buffer: wgpu::Buffer,
    ocean_index_count: u32,

    model_pipeline: wgpu::RenderPipeline,
    material_layout: wgpu::BindGroupLayout,
    object_buffer: wgpu::Buffer,
    object_bind_group: wgpu::BindGroup,
    sampler: wgpu::Sampler,
    white_texture: wgpu::TextureView,
    model: Option<GpuModel>,

    targets: RenderTargets,
    blit: BlitResources,
    lighting: Lighting,
    surface_format: wgpu::TextureFormat,
}

impl SceneRenderer {
    /// Build all pipelines. `width`/`height` are the drawable size.
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> Self {
        let lighting = Lighting::default();

        // Group 0: globals
        let globals_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("globals_bgl"),
            entries: &[uniform_entry(
                0,
                wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            )],
        });
        let globals_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("globals_buffer"),
            contents: bytemuck::bytes_of(&GlobalUniforms::new(&Default::default(), &lighting)),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let globals_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("globals_bg"),
            layout: &globals_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
        });

        // Water
        let water_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("water_bgl"),
            entries: &[uniform_entry(
                0,
                wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            )],
        });
        let water_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("water_buffer"),
            contents: bytemuck::bytes_of(&WaterUniforms::new(&Default::default(), 0.0)),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let water_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("water_bg"),
            layout: &water_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: water_buffer.as_entire_binding(),
            }],
        });
        let water_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("water_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::water_shader().into()),
        });
        let water_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("water_pl"),
            bind_group_layouts: &[&globals_layout, &water_layout],
            push_constant_ranges: &[],
        });
        let water_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("water_pipeline"),
            layout: Some(&water_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &water_shader,
                entry_point: Some("vs_water"),
                compilation_options: Default::default(),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<PlaneVertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![
                        0 => Float32x3,
                        1 => Float32x2,
                    ],
                }],
            },
            fragment: Some(wgpu::FragmentState {
                module: &water_shader,
                entry_point: Some("fs_water"),
                compilation_options: Default::default(),
                targets: &scene_target(),
            }),
            // displaced crests can show their underside
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: depth_state(),
            multisample: multisample_state(),
            multiview: None,
            cache: None,
        });

        let (ocean_vertices, ocean_indices) = plane_mesh(OCEAN_SIZE, OCEAN_SEGMENTS);
        let ocean_vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("ocean_vertex_buffer"),
            contents: bytemuck::cast_slice(&ocean_vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let ocean_index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("ocean_index_buffer"),
            contents: bytemuck::cast_slice(&ocean_indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let ocean_index_count = ocean_indices.len() as u32;

        // Model: group 1 material, group 2 object
        let material_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("material_bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
                uniform_entry(2, wgpu::ShaderStages::FRAGMENT),
            ],
        });
        let object_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("object_bgl"),
            entries: &[uniform_entry(0, wgpu::ShaderStages::VERTEX)],
        });
        let object_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("object_buffer"),
            contents: bytemuck::bytes_of(&ObjectUniforms::from_matrix(glam::Mat4::IDENTITY)),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let object_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("object_bg"),
            layout: &object_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: object_buffer.as_entire_binding(),
            }],
        });
        let model_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("model_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::model_shader().into()),
        });
        let model_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("model_pl"),
            bind_group_layouts: &[&globals_layout, &material_layout, &object_layout],
            push_constant_ranges: &[],
        });
        let model_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("model_pipeline"),
            layout: Some(&model_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &model_shader,
                entry_point: Some("vs_model"),
                compilation_options: Default::default(),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<ModelVertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![
                        0 => Float32x3,
                        1 => Float32x3,
                        2 => Float32x2,
                    ],
                }],
            },
            fragment: Some(wgpu::FragmentState {
                module: &model_shader,
                entry_point: Some("fs_model"),
                compilation_options: Default::default(),
                targets: &scene_target(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: Some(wgpu::Face::Back),
                ..Default::default()
            },
            depth_stencil: depth_state(),
            multisample: multisample_state(),
            multiview: None,
            cache: None,
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("model_sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        let white = TextureData {
            width: 1,
            height: 1,
            rgba: vec![255; 4],
        };
        let white_texture = upload_texture(device, queue, "white_texture", &white);

        let targets = RenderTargets::new(device, width, height);
        let blit = BlitResources::new(device, surface_format, &targets.resolve_view);

        tracing::info!(
            ?surface_format,
            width = targets.width,
            height = targets.height,
            samples = SAMPLE_COUNT,
            ocean_triangles = ocean_index_count / 3,
            "scene renderer ready"
        );

        Self {
            globals_buffer,
            globals_bind_group,
            water_pipeline,
            water_buffer,
            water_bind_group,
            ocean_vertex_buffer,
            ocean_index_buffer,
            ocean_index_count,
            model_pipeline,
            material_layout,
            object_buffer,
            object_bind_group,
            sampler,
            white_texture,
            model: None,
            targets,
            blit,
            lighting,
            surface_format,
        }
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_format
    }

    /// Current offscreen size in pixels.
    pub fn drawable_size(&self) -> (u32, u32) {
        (self.targets.width, self.targets.height)
    }

    /// Resize the offscreen targets to a new drawable size.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        if self.targets.recreate(device, width, height) {
            self.blit.rebind(device, &self.targets.resolve_view);
            tracing::debug!(width, height, "offscreen targets recreated");
        }
    }

    pub fn model_id(&self) -> Option<AssetId> {
        self.model.as_ref().map(|m| m.id)
    }

    /// Upload a decoded model, replacing any previous one.
    pub fn set_model(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, model: &ModelData) {
        let textures: Vec<wgpu::TextureView> = model
            .textures
            .iter()
            .enumerate()
            .map(|(i, tex)| upload_texture(device, queue, &format!("{}_texture_{i}", model.name), tex))
            .collect();

        let materials = model
            .materials
            .iter()
            .map(|m| {
                let view = m
                    .texture
                    .and_then(|t| textures.get(t))
                    .unwrap_or(&self.white_texture);
                self.material_bind_group(device, &m.name, view, m.base_color)
            })
            .collect();
        let default_material =
            self.material_bind_group(device, "default", &self.white_texture, [1.0, 1.0, 1.0, 1.0]);

        let meshes = model
            .meshes
            .iter()
            .filter(|mesh| !mesh.indices.is_empty())
            .map(|mesh| GpuMesh {
                vertex_buffer: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("{}_vertices", mesh.name)),
                    contents: bytemuck::cast_slice(&mesh.vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                }),
                index_buffer: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("{}_indices", mesh.name)),
                    contents: bytemuck::cast_slice(&mesh.indices),
                    usage: wgpu::BufferUsages::INDEX,
                }),
                index_count: mesh.indices.len() as u32,
                material: mesh.material.filter(|&m| m < model.materials.len()),
            })
            .collect::<Vec<_>>();

        tracing::info!(
            id = %model.id,
            name = %model.name,
            meshes = meshes.len(),
            textures = textures.len(),
            "model uploaded"
        );
        self.model = Some(GpuModel {
            id: model.id,
            meshes,
            materials,
            default_material,
        });
    }

    fn material_bind_group(
        &self,
        device: &wgpu::Device,
        name: &str,
        texture: &wgpu::TextureView,
        base_color: [f32; 4],
    ) -> wgpu::BindGroup {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{name}_material")),
            contents: bytemuck::bytes_of(&MaterialUniforms::new(base_color)),
            usage: wgpu::BufferUsages::UNIFORM,
        });
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{name}_material_bg")),
            layout: &self.material_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(texture),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: buffer.as_entire_binding(),
                },
            ],
        })
    }

    /// Render one frame of `scene` into `target` (the surface view).
    ///
    /// The model is drawn only while the scene reports the floating object
    /// as ready and a model has been uploaded.
    pub fn render(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        target: &wgpu::TextureView,
        scene: &SceneState,
    ) {
        queue.write_buffer(
            &self.globals_buffer,
            0,
            bytemuck::bytes_of(&GlobalUniforms::new(&scene.camera, &self.lighting)),
        );
        queue.write_buffer(
            &self.water_buffer,
            0,
            bytemuck::bytes_of(&WaterUniforms::new(&scene.params, scene.time())),
        );
        let floating = scene.floating().zip(self.model.as_ref());
        if let Some((object, _)) = floating {
            queue.write_buffer(
                &self.object_buffer,
                0,
                bytemuck::bytes_of(&ObjectUniforms::from_pose(object.pose())),
            );
        }

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("scene_encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.targets.msaa_view,
                    resolve_target: Some(&self.targets.resolve_view),
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Discard,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.targets.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            pass.set_pipeline(&self.water_pipeline);
            pass.set_bind_group(0, &self.globals_bind_group, &[]);
            pass.set_bind_group(1, &self.water_bind_group, &[]);
            pass.set_vertex_buffer(0, self.ocean_vertex_buffer.slice(..));
            pass.set_index_buffer(self.ocean_index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(0..self.ocean_index_count, 0, 0..1);

            if let Some((_, model)) = floating {
                pass.set_pipeline(&self.model_pipeline);
                pass.set_bind_group(0, &self.globals_bind_group, &[]);
                pass.set_bind_group(2, &self.object_bind_group, &[]);
                for mesh in &model.meshes {
                    let material = mesh
                        .material
                        .and_then(|m| model.materials.get(m))
                        .unwrap_or(&model.default_material);
                    pass.set_bind_group(1, material, &[]);
                    pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                    pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                    pass.draw_indexed(0..mesh.index_count, 0, 0..1);
                }
            }
        }

        self.blit.blit(&mut encoder, target);
        queue.submit(std::iter::once(encoder.finish()));
    }
}

fn upload_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    label: &str,
    data: &TextureData,
) -> wgpu::TextureView {
    let size = wgpu::Extent3d {
        width: data.width.max(1),
        height: data.height.max(1),
        depth_or_array_layers: 1,
    };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        &data.rgba,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * size.width),
            rows_per_image: None,
        },
        size,
    );
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}
