/// MSAA sample count of the scene pass.
pub const SAMPLE_COUNT: u32 = 4;
/// Offscreen scene color. sRGB so shaders write linear values.
pub const SCENE_COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

fn create_texture(
    device: &wgpu::Device,
    label: &str,
    width: u32,
    height: u32,
    format: wgpu::TextureFormat,
    sample_count: u32,
    usage: wgpu::TextureUsages,
) -> (wgpu::Texture, wgpu::TextureView) {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    (texture, view)
}

/// Offscreen targets for the scene pass, sized to the drawable size.
///
/// - `msaa_*` is the multisampled color attachment.
/// - `resolve_*` receives the resolved image and is sampled by the blit.
/// - `depth_*` is multisampled to match the color attachment.
pub(crate) struct RenderTargets {
    pub(crate) width: u32,
    pub(crate) height: u32,
    _msaa_tex: wgpu::Texture,
    pub(crate) msaa_view: wgpu::TextureView,
    _resolve_tex: wgpu::Texture,
    pub(crate) resolve_view: wgpu::TextureView,
    _depth_tex: wgpu::Texture,
    pub(crate) depth_view: wgpu::TextureView,
}

impl RenderTargets {
    pub(crate) fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let (width, height) = (width.max(1), height.max(1));
        let (_msaa_tex, msaa_view) = create_texture(
            device,
            "scene_msaa",
            width,
            height,
            SCENE_COLOR_FORMAT,
            SAMPLE_COUNT,
            wgpu::TextureUsages::RENDER_ATTACHMENT,
        );
        let (_resolve_tex, resolve_view) = create_texture(
            device,
            "scene_resolve",
            width,
            height,
            SCENE_COLOR_FORMAT,
            1,
            wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        );
        let (_depth_tex, depth_view) = create_texture(
            device,
            "scene_depth",
            width,
            height,
            DEPTH_FORMAT,
            SAMPLE_COUNT,
            wgpu::TextureUsages::RENDER_ATTACHMENT,
        );
        Self {
            width,
            height,
            _msaa_tex,
            msaa_view,
            _resolve_tex,
            resolve_view,
            _depth_tex,
            depth_view,
        }
    }

    /// Recreate at a new size. Returns false when the size is unchanged.
    pub(crate) fn recreate(&mut self, device: &wgpu::Device, width: u32, height: u32) -> bool {
        if (width.max(1), height.max(1)) == (self.width, self.height) {
            return false;
        }
        *self = Self::new(device, width, height);
        true
    }
}
