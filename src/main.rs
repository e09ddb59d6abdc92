use anyhow::Result;
use blendsketch::SketchConfig;

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info"))
        .filter_module("wgpu_hal", log::LevelFilter::Warn)
        .filter_module("naga", log::LevelFilter::Warn)
        .init();

    blendsketch::run(SketchConfig::default())?;
    Ok(())
}
