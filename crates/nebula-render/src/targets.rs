use crate::helpers::{self, HDR_FORMAT};

/// Offscreen targets for the render pipeline.
///
/// Contains a full-resolution HDR scene color with its depth buffer and two
/// half-resolution bloom ping-pong textures.
///
/// - `hdr_*` hold the scene color in Rgba16Float for post-processing.
/// - `bloom_*` are half-res buffers used for bright-pass and blur.
pub(crate) struct RenderTargets {
    pub(crate) hdr_view: wgpu::TextureView,
    pub(crate) depth_view: wgpu::TextureView,
    pub(crate) bloom_a_view: wgpu::TextureView,
    pub(crate) bloom_b_view: wgpu::TextureView,
    pub(crate) bloom_size: (u32, u32),
    // keep the textures alive alongside their views
    _textures: [wgpu::Texture; 4],
}

pub(crate) fn bloom_size(width: u32, height: u32) -> (u32, u32) {
    ((width.max(1) / 2).max(1), (height.max(1) / 2).max(1))
}

impl RenderTargets {
    pub(crate) fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let usage = wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING;
        let (hdr_tex, hdr_view) =
            helpers::create_color_texture(device, "hdr_tex", width, height, HDR_FORMAT, usage);
        let (depth_tex, depth_view) = helpers::create_depth_texture(device, width, height);
        let (bw, bh) = bloom_size(width, height);
        let (bloom_a, bloom_a_view) =
            helpers::create_color_texture(device, "bloom_a", bw, bh, HDR_FORMAT, usage);
        let (bloom_b, bloom_b_view) =
            helpers::create_color_texture(device, "bloom_b", bw, bh, HDR_FORMAT, usage);
        Self {
            hdr_view,
            depth_view,
            bloom_a_view,
            bloom_b_view,
            bloom_size: (bw, bh),
            _textures: [hdr_tex, depth_tex, bloom_a, bloom_b],
        }
    }

    pub(crate) fn recreate(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        *self = Self::new(device, width, height);
    }
}
