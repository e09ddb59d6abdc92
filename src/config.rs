use crate::frame::TIME_STEP;
use crate::texture::TextureSource;
use crate::ui::Color;

/// Start-up settings for a sketch window.
///
/// # Example
/// ```ignore
/// blendsketch::run(
///     SketchConfig::new()
///         .title("Blend")
///         .size(1280, 720)
///         .sphere_texture(TextureSource::Horizon),
/// )?;
/// ```
#[derive(Clone, Debug)]
pub struct SketchConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Clear color of every render target and the screen.
    pub clear_color: Color,
    /// Image wrapped around the inside of the sphere.
    pub sphere_texture: TextureSource,
    /// Image on the plane.
    pub plane_texture: TextureSource,
    /// Time added per tick.
    pub time_step: f32,
    /// Initial compositor blend.
    pub progress: f32,
}

impl Default for SketchConfig {
    fn default() -> Self {
        Self {
            title: "blendsketch".to_string(),
            width: 800,
            height: 600,
            clear_color: Color::hex(0x111111),
            sphere_texture: TextureSource::file("assets/mountain.jpg"),
            plane_texture: TextureSource::file("assets/uv.jpg"),
            time_step: TIME_STEP,
            progress: 0.5,
        }
    }
}

impl SketchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn clear_color(mut self, color: Color) -> Self {
        self.clear_color = color;
        self
    }

    pub fn sphere_texture(mut self, source: TextureSource) -> Self {
        self.sphere_texture = source;
        self
    }

    pub fn plane_texture(mut self, source: TextureSource) -> Self {
        self.plane_texture = source;
        self
    }

    pub fn time_step(mut self, step: f32) -> Self {
        self.time_step = step;
        self
    }

    pub fn progress(mut self, progress: f32) -> Self {
        self.progress = progress;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_blend_scene() {
        let config = SketchConfig::default();
        assert_eq!((config.width, config.height), (800, 600));
        assert_eq!(config.clear_color, Color::hex(0x111111));
        assert_eq!(config.sphere_texture, TextureSource::file("assets/mountain.jpg"));
        assert_eq!(config.plane_texture, TextureSource::file("assets/uv.jpg"));
        assert_eq!(config.time_step, 0.05);
        assert_eq!(config.progress, 0.5);
    }

    #[test]
    fn builder_overrides_fields() {
        let config = SketchConfig::new()
            .title("test")
            .size(320, 240)
            .plane_texture(TextureSource::UvGrid)
            .time_step(0.1)
            .progress(0.2);
        assert_eq!(config.title, "test");
        assert_eq!((config.width, config.height), (320, 240));
        assert_eq!(config.plane_texture, TextureSource::UvGrid);
        assert_eq!(config.time_step, 0.1);
        assert_eq!(config.progress, 0.2);
    }
}
