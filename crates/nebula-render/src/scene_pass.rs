//! Geometry buffers, uniforms and pipelines for the four scene objects.

use crate::helpers::{self, ScenePipelineDesc};
use glam::Mat4;
use nebula_core::geometry::{icosphere, sphere_points, starfield, uv_sphere};
use nebula_core::{
    SceneState, ShaderUniforms, Transform, FIELD_EXTENT, FIELD_PARTICLE_COUNT,
    FIELD_POINT_OPACITY, FIELD_SEED, INNER_SPHERE_RADIUS, INNER_SPHERE_SEGMENTS,
    NOISE_MESH_DETAIL, NOISE_MESH_RADIUS, PARTICLE_SPHERE_RADIUS, PARTICLE_SPHERE_SEGMENTS,
    POINT_SIZE, SPHERE_POINT_OPACITY,
};
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct Globals {
    view_proj: [[f32; 4]; 4],
    cam_right: [f32; 4],
    cam_up: [f32; 4],
    uniforms: ShaderUniforms,
}

impl Globals {
    pub(crate) fn from_scene(scene: &SceneState) -> Self {
        let view = scene.camera.view_matrix();
        // rows of the view rotation are the camera basis in world space
        let right = view.row(0).truncate().extend(0.0);
        let up = view.row(1).truncate().extend(0.0);
        Self {
            view_proj: scene.camera.view_proj().to_cols_array_2d(),
            cam_right: right.to_array(),
            cam_up: up.to_array(),
            uniforms: scene.uniforms,
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct ObjectUniforms {
    model: [[f32; 4]; 4],
    tint: [f32; 4],
    params: [f32; 4],
}

impl ObjectUniforms {
    fn new(model: Mat4, tint: [f32; 4], point_size: f32, round_sprite: bool) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            tint,
            params: [point_size, if round_sprite { 1.0 } else { 0.0 }, 0.0, 0.0],
        }
    }

    fn points(t: &Transform, rgb: [f32; 3], opacity: f32, round_sprite: bool) -> Self {
        Self::new(
            t.model_matrix(),
            [rgb[0], rgb[1], rgb[2], opacity],
            POINT_SIZE,
            round_sprite,
        )
    }
}

/// Per-object uniforms in draw order: inner sphere, noise mesh, particle
/// sphere, particle field.
pub(crate) fn object_uniforms(scene: &SceneState) -> [ObjectUniforms; 4] {
    [
        ObjectUniforms::new(Mat4::IDENTITY, [1.0; 4], 0.0, false),
        ObjectUniforms::new(scene.noise_mesh.model_matrix(), [1.0; 4], 0.0, false),
        ObjectUniforms::points(
            &scene.particle_sphere,
            [1.0, 1.0, 1.0],
            SPHERE_POINT_OPACITY,
            false,
        ),
        ObjectUniforms::points(
            &scene.particle_field,
            scene.particle_color,
            FIELD_POINT_OPACITY,
            true,
        ),
    ]
}

struct DrawBuffer {
    buffer: wgpu::Buffer,
    count: u32,
}

fn vertex_buffer(device: &wgpu::Device, label: &str, points: &[[f32; 3]]) -> DrawBuffer {
    DrawBuffer {
        buffer: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(points),
            usage: wgpu::BufferUsages::VERTEX,
        }),
        count: points.len() as u32,
    }
}

pub(crate) struct SceneResources {
    globals_buffer: wgpu::Buffer,
    globals_group: wgpu::BindGroup,
    object_buffers: Vec<wgpu::Buffer>,
    object_groups: Vec<wgpu::BindGroup>,
    solid_pipeline: wgpu::RenderPipeline,
    noise_pipeline: wgpu::RenderPipeline,
    points_pipeline: wgpu::RenderPipeline,
    inner_vertices: DrawBuffer,
    inner_indices: DrawBuffer,
    noise_vertices: DrawBuffer,
    sphere_points: DrawBuffer,
    field_points: DrawBuffer,
}

impl SceneResources {
    pub(crate) fn new(device: &wgpu::Device) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene_shader"),
            source: wgpu::ShaderSource::Wgsl(nebula_core::SCENE_WGSL.into()),
        });

        let globals_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("globals_bgl"),
            entries: &[helpers::uniform_layout_entry(0)],
        });
        let object_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("object_bgl"),
            entries: &[helpers::uniform_layout_entry(0)],
        });

        let globals_buffer =
            helpers::uniform_buffer(device, "globals", std::mem::size_of::<Globals>());
        let globals_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("globals_bg"),
            layout: &globals_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
        });

        let mut object_buffers = Vec::with_capacity(4);
        let mut object_groups = Vec::with_capacity(4);
        for label in ["inner_sphere", "noise_mesh", "particle_sphere", "particle_field"] {
            let buffer =
                helpers::uniform_buffer(device, label, std::mem::size_of::<ObjectUniforms>());
            object_groups.push(device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(label),
                layout: &object_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                }],
            }));
            object_buffers.push(buffer);
        }

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pl_scene"),
            bind_group_layouts: &[&globals_layout, &object_layout],
            push_constant_ranges: &[],
        });
        let solid_pipeline = helpers::make_scene_pipeline(
            device,
            &layout,
            &shader,
            &ScenePipelineDesc {
                label: "solid_pipeline",
                vs_entry: "vs_solid",
                fs_entry: "fs_solid",
                vertex_step: wgpu::VertexStepMode::Vertex,
                blend: None,
                depth_write: true,
            },
        );
        let noise_pipeline = helpers::make_scene_pipeline(
            device,
            &layout,
            &shader,
            &ScenePipelineDesc {
                label: "noise_pipeline",
                vs_entry: "vs_noise",
                fs_entry: "fs_noise",
                vertex_step: wgpu::VertexStepMode::Vertex,
                blend: Some(helpers::additive_blend()),
                depth_write: false,
            },
        );
        let points_pipeline = helpers::make_scene_pipeline(
            device,
            &layout,
            &shader,
            &ScenePipelineDesc {
                label: "points_pipeline",
                vs_entry: "vs_points",
                fs_entry: "fs_points",
                vertex_step: wgpu::VertexStepMode::Instance,
                blend: Some(helpers::additive_blend()),
                depth_write: false,
            },
        );

        let inner = uv_sphere(INNER_SPHERE_RADIUS, INNER_SPHERE_SEGMENTS, INNER_SPHERE_SEGMENTS);
        let inner_indices = DrawBuffer {
            buffer: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("inner_sphere_ib"),
                contents: bytemuck::cast_slice(&inner.indices),
                usage: wgpu::BufferUsages::INDEX,
            }),
            count: inner.indices.len() as u32,
        };
        let noise = icosphere(NOISE_MESH_RADIUS, NOISE_MESH_DETAIL);
        log::info!(
            "scene geometry: noise mesh {} tris, field {} points",
            noise.triangle_count(),
            FIELD_PARTICLE_COUNT
        );

        Self {
            globals_buffer,
            globals_group,
            object_buffers,
            object_groups,
            solid_pipeline,
            noise_pipeline,
            points_pipeline,
            inner_vertices: vertex_buffer(device, "inner_sphere_vb", &inner.positions),
            inner_indices,
            noise_vertices: vertex_buffer(device, "noise_mesh_vb", &noise.positions),
            sphere_points: vertex_buffer(
                device,
                "particle_sphere_vb",
                &sphere_points(
                    PARTICLE_SPHERE_RADIUS,
                    PARTICLE_SPHERE_SEGMENTS,
                    PARTICLE_SPHERE_SEGMENTS,
                ),
            ),
            field_points: vertex_buffer(
                device,
                "particle_field_vb",
                &starfield(FIELD_PARTICLE_COUNT, FIELD_EXTENT, FIELD_SEED),
            ),
        }
    }

    pub(crate) fn write_uniforms(&self, queue: &wgpu::Queue, scene: &SceneState) {
        queue.write_buffer(
            &self.globals_buffer,
            0,
            bytemuck::bytes_of(&Globals::from_scene(scene)),
        );
        for (buffer, uniforms) in self.object_buffers.iter().zip(object_uniforms(scene)) {
            queue.write_buffer(buffer, 0, bytemuck::bytes_of(&uniforms));
        }
    }

    pub(crate) fn draw<'p>(&'p self, rpass: &mut wgpu::RenderPass<'p>) {
        rpass.set_bind_group(0, &self.globals_group, &[]);

        rpass.set_pipeline(&self.solid_pipeline);
        rpass.set_bind_group(1, &self.object_groups[0], &[]);
        rpass.set_vertex_buffer(0, self.inner_vertices.buffer.slice(..));
        rpass.set_index_buffer(self.inner_indices.buffer.slice(..), wgpu::IndexFormat::Uint32);
        rpass.draw_indexed(0..self.inner_indices.count, 0, 0..1);

        rpass.set_pipeline(&self.noise_pipeline);
        rpass.set_bind_group(1, &self.object_groups[1], &[]);
        rpass.set_vertex_buffer(0, self.noise_vertices.buffer.slice(..));
        rpass.draw(0..self.noise_vertices.count, 0..1);

        rpass.set_pipeline(&self.points_pipeline);
        for (group, points) in [
            (&self.object_groups[2], &self.sphere_points),
            (&self.object_groups[3], &self.field_points),
        ] {
            rpass.set_bind_group(1, group, &[]);
            rpass.set_vertex_buffer(0, points.buffer.slice(..));
            rpass.draw(0..6, 0..points.count);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nebula_core::VisualParams;

    #[test]
    fn globals_match_wgsl_layout() {
        assert_eq!(std::mem::size_of::<Globals>(), 128);
        assert_eq!(std::mem::size_of::<ObjectUniforms>(), 96);
    }

    #[test]
    fn camera_basis_is_orthonormal() {
        let scene = SceneState::new(&VisualParams::defaults("x"), 1.5);
        let g = Globals::from_scene(&scene);
        let r = glam::Vec4::from_array(g.cam_right).truncate();
        let u = glam::Vec4::from_array(g.cam_up).truncate();
        assert!((r.length() - 1.0).abs() < 1e-5);
        assert!((u.length() - 1.0).abs() < 1e-5);
        assert!(r.dot(u).abs() < 1e-5);
    }

    #[test]
    fn field_tint_follows_particle_color() {
        let mut params = VisualParams::defaults("x");
        params.red = 0.7;
        let scene = SceneState::new(&params, 1.0);
        let objects = object_uniforms(&scene);
        assert_eq!(objects[3].tint, [0.7, 0.02, 0.5, 1.0]);
        assert_eq!(objects[3].params[1], 1.0);
        assert_eq!(objects[2].tint[3], SPHERE_POINT_OPACITY);
    }
}
