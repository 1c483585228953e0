use std::{
    f64::consts::PI,
    fs,
    path::{Path, PathBuf},
    rc::Rc,
};

use anyhow::Context;
use clap::Parser;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde_json::{json, Value};
use tracing::info;

use raytracing::{
    geometry::{Vec2, Vec3},
    materials::{TextureCache, BITMAP_TYPE_TAG},
    sampling::warp,
    scene::{Registries, Scene, SceneObject, Shared},
};

#[derive(Debug, clap::Parser)]
#[command(about = "Inspect, re-save and merge scene documents")]
struct CommandLineArguments {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, clap::Subcommand)]
enum Command {
    #[command(about = "Load a scene and list its contents")]
    Info {
        #[arg(help = "Scene document")]
        scene: PathBuf,
        #[arg(long, value_enum, default_value_t, help = "Listing format")]
        format: InfoFormat,
        #[arg(long, action, help = "Decode every bitmap texture the scene references")]
        decode_textures: bool,
    },
    #[command(about = "Load a scene and save it again")]
    Resave {
        #[arg(help = "Scene document")]
        scene: PathBuf,
        #[arg(help = "Where to write the re-saved document")]
        output: PathBuf,
    },
    #[command(about = "Merge the primitives of several scenes into the first one")]
    Merge {
        #[arg(help = "Scene to merge into")]
        scene: PathBuf,
        #[arg(required = true, num_args = 1.., help = "Scenes whose primitives are added")]
        others: Vec<PathBuf>,
        #[arg(short, long, help = "Where to write the merged document")]
        output: PathBuf,
    },
    #[command(about = "List every registered type tag per family as JSON")]
    Types,
    #[command(about = "Monte-Carlo estimate of the integral of every warp's pdf")]
    Warps {
        #[arg(short = 'n', long, default_value_t = 100_000, help = "Samples per estimate")]
        samples: u32,
        #[arg(long, default_value_t = 0, help = "Random seed")]
        seed: u64,
    },
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum InfoFormat {
    #[default]
    Text,
    Json,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli_args = CommandLineArguments::parse();
    match cli_args.command {
        Command::Info {
            scene,
            format,
            decode_textures,
        } => {
            let scene = load_scene(&scene, &Rc::new(TextureCache::new()))?;
            if decode_textures {
                scene
                    .texture_cache()
                    .load_resources()
                    .context("failed to decode bitmap textures")?;
            }
            match format {
                InfoFormat::Text => print_info(&scene),
                InfoFormat::Json => println!("{}", serde_json::to_string_pretty(&info_json(&scene))?),
            }
        }
        Command::Resave { scene, output } => {
            let mut scene = load_scene(&scene, &Rc::new(TextureCache::new()))?;
            save_scene(&mut scene, &output)?;
        }
        Command::Merge {
            scene,
            others,
            output,
        } => {
            let cache = Rc::new(TextureCache::new());
            let mut merged = load_scene(&scene, &cache)?;
            for other in &others {
                merged.merge(load_scene(other, &cache)?);
            }
            info!(
                "merged {} scenes into {} primitives",
                others.len() + 1,
                merged.primitives().len()
            );
            save_scene(&mut merged, &output)?;
        }
        Command::Types => print_types()?,
        Command::Warps { samples, seed } => print_warp_estimates(samples, seed),
    }

    Ok(())
}

fn load_scene(path: &Path, cache: &Rc<TextureCache>) -> anyhow::Result<Scene> {
    // absolute asset paths survive saving into a different directory
    let path = fs::canonicalize(path).with_context(|| format!("unable to find scene '{}'", path.display()))?;
    Scene::load(&path, Some(Rc::clone(cache)))
        .with_context(|| format!("failed to load scene '{}'", path.display()))
}

fn save_scene(scene: &mut Scene, output: &Path) -> anyhow::Result<()> {
    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let dir = fs::canonicalize(dir)
        .with_context(|| format!("output directory '{}' does not exist", dir.display()))?;

    scene.set_src_dir(dir);
    scene
        .save(output)
        .with_context(|| format!("failed to save scene to '{}'", output.display()))?;
    info!("wrote '{}'", output.display());
    Ok(())
}

fn print_list<T: ?Sized + SceneObject>(title: &str, list: &[Shared<T>]) {
    println!("{title}: {}", list.len());
    for object in list {
        let object = object.borrow();
        let name = if object.name().is_empty() { "<anonymous>" } else { object.name() };
        println!("  {:<24} {}", name, object.type_tag());
    }
}

fn print_info(scene: &Scene) {
    println!("scene: {}", scene.path().display());
    print_list("media", scene.media());
    print_list("bsdfs", scene.bsdfs());
    print_list("primitives", scene.primitives());

    let camera = scene.camera().borrow();
    let [width, height] = camera.resolution();
    println!("camera: {} {width}x{height}", camera.type_tag());
    println!("integrator: {}", scene.integrator().borrow().type_tag());
    println!("bitmap textures: {}", scene.texture_cache().len());
}

fn list_json<T: ?Sized + SceneObject>(list: &[Shared<T>]) -> Value {
    list.iter()
        .map(|object| {
            let object = object.borrow();
            json!({ "name": object.name(), "type": object.type_tag() })
        })
        .collect()
}

fn info_json(scene: &Scene) -> Value {
    let camera = scene.camera().borrow();
    json!({
        "scene": scene.path().display().to_string(),
        "media": list_json(scene.media()),
        "bsdfs": list_json(scene.bsdfs()),
        "primitives": list_json(scene.primitives()),
        "camera": { "type": camera.type_tag(), "resolution": camera.resolution() },
        "integrator": scene.integrator().borrow().type_tag(),
        "bitmap_textures": scene.texture_cache().len(),
    })
}

fn print_types() -> anyhow::Result<()> {
    let registries = Registries::default();
    let mut textures = registries.textures.tags();
    textures.push(BITMAP_TYPE_TAG);
    textures.sort_unstable();

    let types = json!({
        "primitive": registries.primitives.tags(),
        "bsdf": registries.bsdfs.tags(),
        "medium": registries.media.tags(),
        "camera": registries.cameras.tags(),
        "integrator": registries.integrators.tags(),
        "texture": textures,
    });
    println!("{}", serde_json::to_string_pretty(&types)?);
    Ok(())
}

// uniform over the unit sphere by rejection, so the estimates do not depend
// on the warps they check
fn random_direction(rng: &mut ChaCha8Rng) -> Vec3 {
    loop {
        let v = Vec3(
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
        );
        let length = v.length();
        if length > 1e-3 && length <= 1.0 {
            return v / length;
        }
    }
}

/// Integral over the sphere of directions of a density
fn sphere_estimate(rng: &mut ChaCha8Rng, samples: u32, pdf: impl Fn(Vec3) -> f32) -> f64 {
    let sum: f64 = (0..samples).map(|_| pdf(random_direction(rng)) as f64).sum();
    4.0 * PI * sum / samples as f64
}

/// Integral over the square `[-1, 1]²` of the disk density
fn disk_estimate(rng: &mut ChaCha8Rng, samples: u32) -> f64 {
    let inside = (0..samples)
        .filter(|_| {
            let p = Vec2(rng.random_range(-1.0..1.0), rng.random_range(-1.0..1.0));
            p.x() * p.x() + p.y() * p.y() <= 1.0
        })
        .count();
    4.0 * warp::uniform_disk_pdf() as f64 * inside as f64 / samples as f64
}

fn print_warp_estimates(samples: u32, seed: u64) {
    let samples = samples.max(1);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let (a, b, c) = (Vec3(0.0, 0.0, 0.0), Vec3(2.0, 0.0, 0.0), Vec3(0.0, 1.0, 1.0));
    let triangle_area = 0.5 * Vec3::cross(b - a, c - a).length() as f64;

    let rows = vec![
        (
            "uniform_hemisphere",
            sphere_estimate(&mut rng, samples, |w| {
                if w.z() >= 0.0 { warp::uniform_hemisphere_pdf(w) } else { 0.0 }
            }),
        ),
        (
            "cosine_hemisphere",
            sphere_estimate(&mut rng, samples, |w| {
                if w.z() >= 0.0 { warp::cosine_hemisphere_pdf(w) } else { 0.0 }
            }),
        ),
        (
            "uniform_sphere",
            sphere_estimate(&mut rng, samples, |_| warp::uniform_sphere_pdf()),
        ),
        (
            "uniform_spherical_cap",
            sphere_estimate(&mut rng, samples, |w| {
                if w.z() >= 0.5 { warp::uniform_spherical_cap_pdf(0.5) } else { 0.0 }
            }),
        ),
        (
            "phong_hemisphere",
            sphere_estimate(&mut rng, samples, |w| {
                if w.z() >= 0.0 { warp::phong_hemisphere_pdf(w, 10.0) } else { 0.0 }
            }),
        ),
        ("uniform_disk", disk_estimate(&mut rng, samples)),
        // constant densities over surfaces of known area
        ("uniform_cylinder", 4.0 * PI * warp::uniform_cylinder_pdf() as f64),
        ("uniform_triangle", triangle_area * warp::uniform_triangle_pdf(a, b, c) as f64),
    ];

    println!("{:<24} {:>10}", "warp", "integral");
    for (name, estimate) in rows {
        println!("{name:<24} {estimate:>10.4}");
    }
}
