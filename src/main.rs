use std::path::PathBuf;

use anyhow::{ Context, Result };
use clap::Parser;
use log::info;

use ray_caster::consts::{ DEFAULT_NUM_THREADS, DEFAULT_OUT_FILE };
use ray_caster::scene::Scene;

/// Renders a scene of spheres and planes to a PPM image.
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// JSON scene description; the built-in demo scene if omitted
    #[clap(short, long)]
    scene: Option<PathBuf>,

    /// Canvas width in pixels, overriding the scene
    #[clap(long)]
    width: Option<usize>,

    /// Canvas height in pixels, overriding the scene
    #[clap(long)]
    height: Option<usize>,

    /// Number of render threads; 1 renders on the main thread
    #[clap(short = 'j', long, default_value_t = DEFAULT_NUM_THREADS)]
    threads: usize,

    /// Where to write the PPM image
    #[clap(short, long, default_value = DEFAULT_OUT_FILE)]
    output: PathBuf,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    ).init();

    let args = Args::parse();

    let mut scene = match &args.scene {
        Some(path) => Scene::load(path)
            .with_context(|| format!("failed to load scene {}", path.display()))?,
        None => {
            info!("no scene given, using the demo scene");
            Scene::demo()
        },
    };

    if args.width.is_some() || args.height.is_some() {
        let width = args.width.unwrap_or(scene.camera.hsize);
        let height = args.height.unwrap_or(scene.camera.vsize);
        scene.resize(width, height)
            .context("invalid canvas size")?;
    }

    info!("rendering {} objects, {} lights at {}x{}",
        scene.world.objects.len(), scene.world.lights.len(),
        scene.camera.hsize, scene.camera.vsize);

    let canvas = scene.render(args.threads);

    canvas.save(&args.output)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    info!("saved render to {}", args.output.display());

    Ok(())
}
