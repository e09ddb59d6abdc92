use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::RgbaImage;

use crate::gpu::GpuContext;

/// Where an image texture comes from.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TextureSource {
    /// Decode an image file from disk.
    File(PathBuf),
    /// Procedural sky-to-ground gradient, a stand-in for a panorama.
    Horizon,
    /// Procedural UV test grid.
    UvGrid,
}

impl TextureSource {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File(path.into())
    }
}

/// A sampled GPU texture.
#[derive(Debug)]
pub struct Texture {
    #[allow(dead_code)]
    pub(crate) texture: wgpu::Texture,
    pub(crate) view: wgpu::TextureView,
    pub width: u32,
    pub height: u32,
}

impl Texture {
    /// Create a single-level texture from raw RGBA data.
    pub fn from_rgba(gpu: &GpuContext, data: &[u8], width: u32, height: u32, label: &str) -> Self {
        Self::upload(gpu, data, width, height, 1, label)
    }

    /// Create a texture with a full mip chain from `image`.
    pub fn from_image(gpu: &GpuContext, image: RgbaImage, label: &str) -> Self {
        let (width, height) = image.dimensions();
        let chain = mip_chain(image);
        let data: Vec<u8> = chain.iter().flat_map(|level| level.as_raw().iter().copied()).collect();
        Self::upload(gpu, &data, width, height, chain.len() as u32, label)
    }

    /// `data` holds every mip level, largest first.
    fn upload(
        gpu: &GpuContext,
        data: &[u8],
        width: u32,
        height: u32,
        mip_level_count: u32,
        label: &str,
    ) -> Self {
        use wgpu::util::DeviceExt;

        let texture = gpu.device.create_texture_with_data(
            &gpu.queue,
            &wgpu::TextureDescriptor {
                label: Some(label),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            data,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            texture,
            view,
            width,
            height,
        }
    }

    /// Load a texture from an image file.
    ///
    /// Images larger than the device allows are scaled down to fit.
    pub fn from_file(gpu: &GpuContext, path: &Path) -> Result<Self, image::ImageError> {
        let img = image::open(path)?.to_rgba8();
        let (width, height) = img.dimensions();
        let max = gpu.device.limits().max_texture_dimension_2d;
        let fitted = fit_within(width, height, max);

        let img = if fitted == (width, height) {
            img
        } else {
            log::warn!(
                "{} is {width}x{height}, above the {max} texture limit; scaling to {}x{}",
                path.display(),
                fitted.0,
                fitted.1
            );
            imageops::resize(&img, fitted.0, fitted.1, FilterType::Triangle)
        };

        Ok(Self::from_image(gpu, img, &path.display().to_string()))
    }

    /// A 1x1 opaque white texture for unbound sampler slots.
    pub fn white(gpu: &GpuContext) -> Self {
        Self::from_rgba(gpu, &[255, 255, 255, 255], 1, 1, "White Texture")
    }

    /// Load `source`, falling back to `fallback` if the file cannot be decoded.
    ///
    /// A failed load is logged and does not stop the session.
    pub fn load(gpu: &GpuContext, source: &TextureSource, fallback: &TextureSource) -> Self {
        match source {
            TextureSource::File(path) => match Self::from_file(gpu, path) {
                Ok(texture) => {
                    log::debug!(
                        "loaded texture {} ({}x{})",
                        path.display(),
                        texture.width,
                        texture.height
                    );
                    texture
                }
                Err(err) => {
                    log::error!("failed to load texture {}: {err}", path.display());
                    match fallback {
                        TextureSource::File(_) => Self::procedural(gpu, &TextureSource::UvGrid),
                        other => Self::procedural(gpu, other),
                    }
                }
            },
            other => Self::procedural(gpu, other),
        }
    }

    fn procedural(gpu: &GpuContext, source: &TextureSource) -> Self {
        const SIZE: u32 = 256;
        let (pixels, width, height, label) = match source {
            TextureSource::Horizon => (horizon_pixels(SIZE * 2, SIZE), SIZE * 2, SIZE, "Horizon Texture"),
            _ => (uv_grid_pixels(SIZE), SIZE, SIZE, "UV Grid Texture"),
        };
        match RgbaImage::from_raw(width, height, pixels) {
            Some(image) => Self::from_image(gpu, image, label),
            None => {
                log::error!("{label}: pixel buffer does not match {width}x{height}");
                Self::white(gpu)
            }
        }
    }
}

/// Number of mip levels from `width × height` down to 1x1.
pub(crate) fn mip_level_count(width: u32, height: u32) -> u32 {
    32 - width.max(height).max(1).leading_zeros()
}

/// `base` followed by successive half-size levels, ending at 1x1.
pub(crate) fn mip_chain(base: RgbaImage) -> Vec<RgbaImage> {
    let levels = mip_level_count(base.width(), base.height()) as usize;
    let mut chain = Vec::with_capacity(levels);
    chain.push(base);
    while chain.len() < levels {
        let prev = &chain[chain.len() - 1];
        let (w, h) = ((prev.width() / 2).max(1), (prev.height() / 2).max(1));
        let next = imageops::resize(prev, w, h, FilterType::Triangle);
        chain.push(next);
    }
    chain
}

/// Largest size with the aspect ratio of `width × height` whose sides are
/// both at most `max`. Sizes that already fit are returned unchanged.
pub(crate) fn fit_within(width: u32, height: u32, max: u32) -> (u32, u32) {
    let max = max.max(1);
    if width <= max && height <= max {
        return (width, height);
    }
    let scale = max as f64 / width.max(height) as f64;
    let fit = |side: u32| ((side as f64 * scale).round() as u32).clamp(1, max);
    (fit(width), fit(height))
}

/// RGBA pixels of a `size × size` UV test grid.
///
/// Red grows with `u`, green with `v`, and dark lines mark every eighth of
/// the image so stretching and orientation are easy to read.
pub(crate) fn uv_grid_pixels(size: u32) -> Vec<u8> {
    let size = size.max(1);
    let cell = (size / 8).max(1);
    let mut data = vec![0u8; (size * size * 4) as usize];

    for y in 0..size {
        for x in 0..size {
            let idx = ((y * size + x) * 4) as usize;
            let on_line = x % cell == 0 || y % cell == 0;
            let checker = ((x / cell) + (y / cell)) % 2 == 0;
            let shade = if on_line {
                0.2
            } else if checker {
                1.0
            } else {
                0.8
            };

            let u = x as f32 / size as f32;
            let v = y as f32 / size as f32;
            data[idx] = (255.0 * u * shade) as u8;
            data[idx + 1] = (255.0 * v * shade) as u8;
            data[idx + 2] = (255.0 * 0.6 * shade) as u8;
            data[idx + 3] = 255;
        }
    }

    data
}

/// RGBA pixels of an equirectangular sky-to-ground gradient.
pub(crate) fn horizon_pixels(width: u32, height: u32) -> Vec<u8> {
    let width = width.max(1);
    let height = height.max(1);
    let sky_top = [40.0, 70.0, 140.0];
    let sky_low = [170.0, 200.0, 230.0];
    let ground_high = [90.0, 85.0, 70.0];
    let ground_low = [35.0, 30.0, 25.0];

    let mut data = vec![0u8; (width * height * 4) as usize];
    for y in 0..height {
        let v = y as f32 / (height - 1).max(1) as f32;
        let color = if v < 0.5 {
            lerp3(sky_top, sky_low, v * 2.0)
        } else {
            lerp3(ground_high, ground_low, (v - 0.5) * 2.0)
        };
        for x in 0..width {
            let idx = ((y * width + x) * 4) as usize;
            data[idx] = color[0] as u8;
            data[idx + 1] = color[1] as u8;
            data[idx + 2] = color[2] as u8;
            data[idx + 3] = 255;
        }
    }

    data
}

fn lerp3(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uv_grid_is_opaque_and_sized() {
        let pixels = uv_grid_pixels(64);
        assert_eq!(pixels.len(), 64 * 64 * 4);
        assert!(pixels.chunks(4).all(|p| p[3] == 255));
    }

    #[test]
    fn uv_grid_red_grows_along_u() {
        let size = 64;
        let pixels = uv_grid_pixels(size);
        // Row 3, inside a cell, left vs right edge of the image.
        let left = pixels[((3 * size + 1) * 4) as usize];
        let right = pixels[((3 * size + size - 2) * 4) as usize];
        assert!(right > left);
    }

    #[test]
    fn horizon_sky_is_bluer_than_ground() {
        let (w, h) = (8, 16);
        let pixels = horizon_pixels(w, h);
        assert_eq!(pixels.len(), (w * h * 4) as usize);

        let top = &pixels[0..4];
        let bottom = &pixels[((h - 1) * w * 4) as usize..((h - 1) * w * 4 + 4) as usize];
        assert!(top[2] > top[0]);
        assert!(top[2] > bottom[2]);
    }

    #[test]
    fn file_sources_compare_by_path() {
        assert_eq!(TextureSource::file("a.jpg"), TextureSource::File("a.jpg".into()));
        assert_ne!(TextureSource::file("a.jpg"), TextureSource::file("b.jpg"));
    }

    #[test]
    fn mip_levels_reach_one_pixel() {
        assert_eq!(mip_level_count(1, 1), 1);
        assert_eq!(mip_level_count(256, 256), 9);
        assert_eq!(mip_level_count(512, 256), 10);
        assert_eq!(mip_level_count(1000, 3), 10);
        assert_eq!(mip_level_count(0, 0), 1);
    }

    #[test]
    fn mip_chain_halves_each_level() {
        let base = RgbaImage::from_pixel(8, 2, image::Rgba([200, 100, 50, 255]));
        let chain = mip_chain(base);
        let sizes: Vec<_> = chain.iter().map(|level| level.dimensions()).collect();
        assert_eq!(sizes, vec![(8, 2), (4, 1), (2, 1), (1, 1)]);

        // A flat image stays flat at every level.
        assert_eq!(chain[3].get_pixel(0, 0), &image::Rgba([200, 100, 50, 255]));
    }

    #[test]
    fn oversized_images_fit_the_device_limit() {
        assert_eq!(fit_within(100, 50, 8192), (100, 50));
        assert_eq!(fit_within(8192, 8192, 8192), (8192, 8192));
        assert_eq!(fit_within(16384, 8192, 8192), (8192, 4096));
        assert_eq!(fit_within(9000, 10, 8192), (8192, 9));
        assert_eq!(fit_within(1, 20000, 8192), (1, 8192));
    }
}
