use chamber_assets::{DecodedImage, TextureSet};
use chamber_scene::slot;

/// What an unloaded slot samples as: opaque black.
const PLACEHOLDER_PIXEL: [u8; 4] = [0, 0, 0, 255];

/// The four texture slots on the GPU, bound together as group 1.
pub struct GpuTextures {
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
    loaded: [bool; slot::COUNT],
}

impl GpuTextures {
    /// Upload every decoded slot. Slots that failed to decode, are absent
    /// from `set`, or exceed the device's texture size get a 1x1 placeholder
    /// so draws referencing them still run.
    pub fn upload(device: &wgpu::Device, queue: &wgpu::Queue, set: &TextureSet) -> Self {
        let max_dimension = device.limits().max_texture_dimension_2d;
        let mut loaded = [false; slot::COUNT];
        let views: Vec<wgpu::TextureView> = (0..slot::COUNT)
            .map(|index| {
                let image = set.get(index).and_then(|s| s.image.as_ref());
                match slot_source(image, max_dimension) {
                    SlotSource::Image(image) => {
                        loaded[index] = true;
                        create_texture(device, queue, index, image.width, image.height, &image.rgba)
                    }
                    SlotSource::Placeholder(reason) => {
                        tracing::warn!(slot = index, reason, "using placeholder texture");
                        create_texture(device, queue, index, 1, 1, &PLACEHOLDER_PIXEL)
                    }
                }
            })
            .collect();

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("chamber_sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let mut layout_entries: Vec<wgpu::BindGroupLayoutEntry> = (0..slot::COUNT as u32)
            .map(|binding| wgpu::BindGroupLayoutEntry {
                binding,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            })
            .collect();
        layout_entries.push(wgpu::BindGroupLayoutEntry {
            binding: slot::COUNT as u32,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
            count: None,
        });
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("texture_bind_group_layout"),
            entries: &layout_entries,
        });

        let mut entries: Vec<wgpu::BindGroupEntry> = views
            .iter()
            .enumerate()
            .map(|(binding, view)| wgpu::BindGroupEntry {
                binding: binding as u32,
                resource: wgpu::BindingResource::TextureView(view),
            })
            .collect();
        entries.push(wgpu::BindGroupEntry {
            binding: slot::COUNT as u32,
            resource: wgpu::BindingResource::Sampler(&sampler),
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("texture_bind_group"),
            layout: &bind_group_layout,
            entries: &entries,
        });

        Self {
            bind_group_layout,
            bind_group,
            loaded,
        }
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }

    /// Whether slot `index` holds a real image rather than the placeholder.
    pub fn is_loaded(&self, index: usize) -> bool {
        self.loaded.get(index).copied().unwrap_or(false)
    }
}

/// What a slot is uploaded from.
#[derive(Debug, PartialEq)]
enum SlotSource<'a> {
    Image(&'a DecodedImage),
    Placeholder(&'static str),
}

/// Pick the slot's decoded image, or the placeholder when there is nothing
/// usable to upload. Images beyond the device's 2D limit would produce an
/// invalid texture and poison the shared bind group.
fn slot_source(image: Option<&DecodedImage>, max_dimension: u32) -> SlotSource<'_> {
    match image {
        None => SlotSource::Placeholder("not loaded"),
        Some(image) if image.rgba.is_empty() || image.width == 0 || image.height == 0 => {
            SlotSource::Placeholder("no pixels")
        }
        Some(image) if image.width > max_dimension || image.height > max_dimension => {
            SlotSource::Placeholder("exceeds device texture size")
        }
        Some(image) => SlotSource::Image(image),
    }
}

fn create_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    index: usize,
    width: u32,
    height: u32,
    rgba: &[u8],
) -> wgpu::TextureView {
    let size = wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    };
    let label = format!("texture_slot_{index}");
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(&label),
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
        rgba,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * width),
            rows_per_image: Some(height),
        },
        size,
    );
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(width: u32, height: u32) -> DecodedImage {
        DecodedImage {
            width,
            height,
            source_channels: 3,
            rgba: vec![255; (width * height * 4) as usize],
        }
    }

    #[test]
    fn missing_slot_uses_placeholder() {
        assert_eq!(slot_source(None, 8192), SlotSource::Placeholder("not loaded"));
    }

    #[test]
    fn released_pixels_use_placeholder() {
        let mut emptied = image(4, 4);
        emptied.rgba.clear();
        assert_eq!(slot_source(Some(&emptied), 8192), SlotSource::Placeholder("no pixels"));
    }

    #[test]
    fn oversized_image_uses_placeholder() {
        let wide = image(10_000, 1);
        assert_eq!(
            slot_source(Some(&wide), 8192),
            SlotSource::Placeholder("exceeds device texture size")
        );
        let tall = image(1, 9000);
        assert_eq!(
            slot_source(Some(&tall), 8192),
            SlotSource::Placeholder("exceeds device texture size")
        );
    }

    #[test]
    fn image_at_limit_is_uploaded() {
        let edge = image(8192, 1);
        assert_eq!(slot_source(Some(&edge), 8192), SlotSource::Image(&edge));
        let small = image(2, 2);
        assert_eq!(slot_source(Some(&small), 8192), SlotSource::Image(&small));
    }
}
