use crate::helpers;
use crate::targets::RenderTargets;
use nebula_core::BloomSettings;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct PostUniforms {
    texel: [f32; 2],
    direction: [f32; 2],
    threshold: f32,
    strength: f32,
    radius: f32,
    _pad: f32,
}

impl PostUniforms {
    pub(crate) fn new(bloom: &BloomSettings, sampled_size: (u32, u32), direction: [f32; 2]) -> Self {
        Self {
            texel: [
                1.0 / sampled_size.0.max(1) as f32,
                1.0 / sampled_size.1.max(1) as f32,
            ],
            direction,
            threshold: bloom.threshold,
            strength: bloom.strength,
            radius: bloom.radius,
            _pad: 0.0,
        }
    }
}

/// One uniform buffer per pass. Queue writes all land before the single
/// submit, so passes sharing a buffer would all see the last write.
pub(crate) struct PostBuffers {
    pub(crate) main: wgpu::Buffer,
    pub(crate) blur_h: wgpu::Buffer,
    pub(crate) blur_v: wgpu::Buffer,
}

pub(crate) struct PostResources {
    pub(crate) bgl0: wgpu::BindGroupLayout, // tex+sampler+uniform
    pub(crate) bgl1: wgpu::BindGroupLayout, // tex+sampler
    pub(crate) buffers: PostBuffers,
    pub(crate) bright_pipeline: wgpu::RenderPipeline,
    pub(crate) blur_pipeline: wgpu::RenderPipeline,
    pub(crate) composite_pipeline: wgpu::RenderPipeline,
}

pub(crate) struct PostBindGroups {
    pub(crate) from_hdr: wgpu::BindGroup,
    pub(crate) blur_from_a: wgpu::BindGroup,
    pub(crate) blur_from_b: wgpu::BindGroup,
    pub(crate) bloom_a_only: wgpu::BindGroup,
}

fn texture_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            multisampled: false,
            view_dimension: wgpu::TextureViewDimension::D2,
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
        },
        count: None,
    }
}

fn sampler_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
        count: None,
    }
}

pub(crate) fn create_post_resources(
    device: &wgpu::Device,
    post_shader: &wgpu::ShaderModule,
    swap_format: wgpu::TextureFormat,
) -> PostResources {
    let bgl0 = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("post_bgl0"),
        entries: &[
            texture_entry(0),
            sampler_entry(1),
            wgpu::BindGroupLayoutEntry {
                visibility: wgpu::ShaderStages::FRAGMENT,
                ..helpers::uniform_layout_entry(2)
            },
        ],
    });
    let bgl1 = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("post_bgl1"),
        entries: &[texture_entry(0), sampler_entry(1)],
    });
    let size = std::mem::size_of::<PostUniforms>();
    let buffers = PostBuffers {
        main: helpers::uniform_buffer(device, "post_uniforms", size),
        blur_h: helpers::uniform_buffer(device, "post_uniforms_blur_h", size),
        blur_v: helpers::uniform_buffer(device, "post_uniforms_blur_v", size),
    };
    let pl_bright_blur = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("pl_post_0"),
        bind_group_layouts: &[&bgl0],
        push_constant_ranges: &[],
    });
    let pl_composite = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("pl_post_comp"),
        bind_group_layouts: &[&bgl0, &bgl1],
        push_constant_ranges: &[],
    });
    let bright_pipeline = helpers::make_post_pipeline(
        device,
        &pl_bright_blur,
        post_shader,
        "fs_bright",
        helpers::HDR_FORMAT,
        None,
    );
    let blur_pipeline = helpers::make_post_pipeline(
        device,
        &pl_bright_blur,
        post_shader,
        "fs_blur",
        helpers::HDR_FORMAT,
        None,
    );
    let composite_pipeline = helpers::make_post_pipeline(
        device,
        &pl_composite,
        post_shader,
        "fs_composite",
        swap_format,
        Some(wgpu::BlendState::REPLACE),
    );

    PostResources {
        bgl0,
        bgl1,
        buffers,
        bright_pipeline,
        blur_pipeline,
        composite_pipeline,
    }
}

fn source_group(
    device: &wgpu::Device,
    label: &str,
    layout: &wgpu::BindGroupLayout,
    view: &wgpu::TextureView,
    sampler: &wgpu::Sampler,
    uniforms: Option<&wgpu::Buffer>,
) -> wgpu::BindGroup {
    let mut entries = vec![
        wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::TextureView(view),
        },
        wgpu::BindGroupEntry {
            binding: 1,
            resource: wgpu::BindingResource::Sampler(sampler),
        },
    ];
    if let Some(buf) = uniforms {
        entries.push(wgpu::BindGroupEntry {
            binding: 2,
            resource: buf.as_entire_binding(),
        });
    }
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &entries,
    })
}

/// Bind groups reference target views, so they are rebuilt on every resize.
pub(crate) fn build_bind_groups(
    device: &wgpu::Device,
    post: &PostResources,
    sampler: &wgpu::Sampler,
    targets: &RenderTargets,
) -> PostBindGroups {
    let b = &post.buffers;
    PostBindGroups {
        from_hdr: source_group(
            device,
            "bg_hdr",
            &post.bgl0,
            &targets.hdr_view,
            sampler,
            Some(&b.main),
        ),
        blur_from_a: source_group(
            device,
            "bg_blur_from_a",
            &post.bgl0,
            &targets.bloom_a_view,
            sampler,
            Some(&b.blur_h),
        ),
        blur_from_b: source_group(
            device,
            "bg_blur_from_b",
            &post.bgl0,
            &targets.bloom_b_view,
            sampler,
            Some(&b.blur_v),
        ),
        bloom_a_only: source_group(
            device,
            "bg_bloom_a_only",
            &post.bgl1,
            &targets.bloom_a_view,
            sampler,
            None,
        ),
    }
}

pub(crate) fn write_post_uniforms(
    queue: &wgpu::Queue,
    post: &PostResources,
    bloom: &BloomSettings,
    full_size: (u32, u32),
    bloom_size: (u32, u32),
) {
    let b = &post.buffers;
    let main = PostUniforms::new(bloom, full_size, [0.0, 0.0]);
    let h = PostUniforms::new(bloom, bloom_size, [1.0, 0.0]);
    let v = PostUniforms::new(bloom, bloom_size, [0.0, 1.0]);
    queue.write_buffer(&b.main, 0, bytemuck::bytes_of(&main));
    queue.write_buffer(&b.blur_h, 0, bytemuck::bytes_of(&h));
    queue.write_buffer(&b.blur_v, 0, bytemuck::bytes_of(&v));
}

pub(crate) fn blit(
    encoder: &mut wgpu::CommandEncoder,
    label: &str,
    target: &wgpu::TextureView,
    pipeline: &wgpu::RenderPipeline,
    bg0: &wgpu::BindGroup,
    bg1: Option<&wgpu::BindGroup>,
) {
    let mut r = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some(label),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: target,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                store: wgpu::StoreOp::Store,
            },
        })],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
    });
    r.set_pipeline(pipeline);
    r.set_bind_group(0, bg0, &[]);
    if let Some(g1) = bg1 {
        r.set_bind_group(1, g1, &[]);
    }
    r.draw(0..3, 0..1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_uniforms_carry_bloom_and_texel() {
        let bloom = BloomSettings {
            threshold: 0.2,
            strength: 1.5,
            radius: 0.5,
        };
        let u = PostUniforms::new(&bloom, (400, 200), [1.0, 0.0]);
        assert_eq!(u.texel, [1.0 / 400.0, 1.0 / 200.0]);
        assert_eq!(u.direction, [1.0, 0.0]);
        assert_eq!(u.strength, 1.5);
        assert_eq!(std::mem::size_of::<PostUniforms>(), 32);
    }
}
