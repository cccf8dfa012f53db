fn main(){
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(error) = write_default_texture() {
        log::error!("{}", error);
        std::process::exit(1);
    }
}

fn write_default_texture() -> worley_noise::prelude::Result<()> {
    use worley_noise::prelude::*;

    let directory = std::env::current_dir()
        .map_err(|source| Error::Io { path: ".".into(), source })?;

    let mut generator: NoiseGenerator = NoiseGenerator::new(NoiseConfig::default());
    generator.export_png(&directory)?;
    generator.on_teardown();

    Ok(())
}
