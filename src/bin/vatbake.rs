use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::filter::LevelFilter;

#[derive(Parser, Debug)]
#[command(name = "vatbake", version, about = "Bake mesh animation into vertex animation textures")]
struct Cli {
    /// Log per-clip and per-task progress.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Bake a pose rig into one texture per clip, or one texture array.
    Bake(BakeArgs),
    /// Print frame counts and texture sizes without baking.
    Plan(PlanArgs),
    /// Write a copy of a mesh with the texture lookup UVs in one channel.
    Uv(UvArgs),
    /// Bake the rest pose of a mesh into a single-frame texture.
    Mesh(MeshArgs),
    /// Apply translation/rotation/scale curves to a baked texture.
    Transform(TransformArgs),
}

#[derive(Args, Debug)]
struct SpecArgs {
    /// Bake settings JSON. Flags below override its fields.
    #[arg(long)]
    spec: Option<PathBuf>,

    #[arg(long)]
    fps: Option<u32>,

    #[arg(long)]
    scaler: Option<f32>,

    #[arg(long, value_enum)]
    color: Option<ColorChoice>,

    #[arg(long, value_enum)]
    mode: Option<ModeChoice>,

    /// Clip to bake; repeat for several. Defaults to every clip.
    #[arg(long = "clip")]
    clips: Vec<String>,

    /// First encoded frame (single mode).
    #[arg(long)]
    min_frame: Option<u32>,

    /// Exclusive end frame (single mode).
    #[arg(long)]
    max_frame: Option<u32>,

    /// Pack into power-of-two textures.
    #[arg(long)]
    pot: bool,

    /// Power-of-two optimization passes (0-8).
    #[arg(long)]
    iterations: Option<u8>,
}

#[derive(Args, Debug)]
struct BakeArgs {
    /// Input pose rig JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    #[command(flatten)]
    spec: SpecArgs,

    /// Output root; textures land in `{out}/{sub-object}/`.
    #[arg(long)]
    out: PathBuf,

    /// Run sub-objects on a thread pool instead of interleaving them.
    #[arg(long)]
    parallel: bool,

    /// Worker count for `--parallel`.
    #[arg(long, requires = "parallel")]
    threads: Option<usize>,

    /// Write EXR channels as 16-bit floats.
    #[arg(long)]
    half: bool,
}

#[derive(Args, Debug)]
struct PlanArgs {
    /// Input pose rig JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    #[command(flatten)]
    spec: SpecArgs,
}

#[derive(Args, Debug)]
struct UvArgs {
    /// Input mesh JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// UV channel to fill (0-7).
    #[arg(long, default_value_t = 1)]
    channel: u8,

    /// Add the vertex index to existing `u` values instead of replacing them.
    #[arg(long)]
    combine: bool,

    /// Uniform scale applied to positions.
    #[arg(long, default_value_t = 1.0)]
    scale: f32,

    /// Output mesh JSON.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct MeshArgs {
    /// Input mesh JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    #[arg(long, default_value_t = 1.0)]
    scaler: f32,

    #[arg(long, value_enum, default_value_t = ColorChoice::Hdr)]
    color: ColorChoice,

    /// Output directory; the file name follows the baked texture convention.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct TransformArgs {
    /// Baked texture (PNG or EXR).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Transform curves JSON.
    #[arg(long)]
    curves: PathBuf,

    /// Pivot in encoded space, as `x,y,z`.
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    pivot: Option<Vec<f32>>,

    /// Output texture; PNG or EXR by extension.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ColorChoice {
    Ldr,
    Hdr,
}

impl From<ColorChoice> for vatbake::ColorMode {
    fn from(c: ColorChoice) -> Self {
        match c {
            ColorChoice::Ldr => Self::Ldr,
            ColorChoice::Hdr => Self::Hdr,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeChoice {
    Single,
    All,
    Array,
}

impl From<ModeChoice> for vatbake::BakeMode {
    fn from(m: ModeChoice) -> Self {
        match m {
            ModeChoice::Single => Self::Single,
            ModeChoice::All => Self::AllIndividual,
            ModeChoice::Array => Self::ArrayAll,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);
    match cli.cmd {
        Command::Bake(args) => cmd_bake(args),
        Command::Plan(args) => cmd_plan(args),
        Command::Uv(args) => cmd_uv(args),
        Command::Mesh(args) => cmd_mesh(args),
        Command::Transform(args) => cmd_transform(args),
    }
}

fn init_tracing(verbose: bool, quiet: bool) {
    let level = if verbose {
        LevelFilter::DEBUG
    } else if quiet {
        LevelFilter::WARN
    } else {
        LevelFilter::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_spec(args: &SpecArgs) -> anyhow::Result<vatbake::BakeSpec> {
    let mut spec = match &args.spec {
        Some(path) => vatbake::BakeSpec::from_json_path(path)?,
        None => vatbake::BakeSpec::default(),
    };
    if let Some(fps) = args.fps {
        spec.fps = vatbake::Fps::new(fps)?;
    }
    if let Some(scaler) = args.scaler {
        spec.scaler = scaler;
    }
    if let Some(color) = args.color {
        spec.color_mode = color.into();
    }
    if let Some(mode) = args.mode {
        spec.bake_mode = mode.into();
    }
    if !args.clips.is_empty() {
        spec.clips = args.clips.clone();
    }
    if let Some(min) = args.min_frame {
        spec.min_frame = min;
    }
    if args.max_frame.is_some() {
        spec.max_frame = args.max_frame;
    }
    if args.pot {
        spec.power_of_two = true;
    }
    if let Some(n) = args.iterations {
        spec.optimization_iterations = n;
    }
    spec.validate()?;
    Ok(spec)
}

fn print_conditions(conditions: &vatbake::ConditionSet) {
    for c in conditions.iter() {
        eprintln!("{c}");
    }
}

/// Load the rig and run the precondition chain; conditions are printed either way.
fn prepare_rig(path: &Path, spec: &vatbake::BakeSpec) -> anyhow::Result<Arc<vatbake::PoseRig>> {
    let rig = Arc::new(vatbake::PoseRig::from_json_path(path)?);

    let source: &dyn vatbake::RigSource = &*rig;
    let selected: Vec<String> = if spec.clips.is_empty() {
        source.clips().iter().map(|c| c.name.clone()).collect()
    } else {
        spec.clips.clone()
    };
    let mut conditions = vatbake::ConditionSet::new();
    let ok = vatbake::check_bake_preconditions(&mut conditions, Some(source), &selected);
    print_conditions(&conditions);
    if !ok {
        anyhow::bail!("rig '{}' cannot be baked", path.display());
    }
    Ok(rig)
}

fn cmd_plan(args: PlanArgs) -> anyhow::Result<()> {
    let spec = load_spec(&args.spec)?;
    let rig = prepare_rig(&args.in_path, &spec)?;
    let plan = vatbake::BakePlan::new(&*rig, &spec)?;
    print!("{plan}");
    Ok(())
}

fn cmd_bake(args: BakeArgs) -> anyhow::Result<()> {
    let spec = load_spec(&args.spec)?;
    let rig = prepare_rig(&args.in_path, &spec)?;

    let precision = if args.half {
        vatbake::ExrPrecision::Half
    } else {
        vatbake::ExrPrecision::Full
    };

    let mut scheduler = vatbake::BakeScheduler::new();
    for task in vatbake::BakeTask::for_each_sub_object(rig, &spec)? {
        scheduler.register(
            task,
            vatbake::DirectorySink::new(&args.out).with_precision(precision),
        );
    }

    let results = if args.parallel {
        scheduler.run_parallel(args.threads)?
    } else {
        let ticks = scheduler.run();
        tracing::debug!(ticks, "bake finished");
        scheduler.into_results()
    };

    let mut failed = 0usize;
    for r in results {
        print_conditions(r.task.conditions());
        match r.outcome {
            Ok(_) => {
                for path in r.sink.written() {
                    eprintln!("wrote {}", path.display());
                }
            }
            Err(e) => {
                eprintln!("bake of '{}' failed: {e}", r.task.name());
                failed += 1;
            }
        }
    }
    if failed > 0 {
        anyhow::bail!("{failed} bake task(s) failed");
    }
    Ok(())
}

fn cmd_uv(args: UvArgs) -> anyhow::Result<()> {
    let mesh = vatbake::Mesh::from_json_path(&args.in_path)?;
    let channel = vatbake::UvChannel::new(args.channel)?;

    let mut conditions = vatbake::ConditionSet::new();
    let out = vatbake::build_uv_mesh(&mesh, channel, args.combine, args.scale, &mut conditions)?;
    print_conditions(&conditions);

    create_parent_dir(&args.out)?;
    out.write_json_path(&args.out)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_mesh(args: MeshArgs) -> anyhow::Result<()> {
    let mesh = vatbake::Mesh::from_json_path(&args.in_path)?;

    let mut conditions = vatbake::ConditionSet::new();
    let baked =
        vatbake::bake_static_mesh(&mesh, args.scaler, args.color.into(), &mut conditions)?;
    print_conditions(&conditions);

    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("create output dir '{}'", args.out.display()))?;
    let path = args.out.join(baked.name.to_string());
    vatbake::write_texture(
        &path,
        &baked.texture,
        baked.color_mode,
        &baked.layer_names,
        vatbake::ExrPrecision::Full,
    )?;
    eprintln!("wrote {}", path.display());
    Ok(())
}

fn cmd_transform(args: TransformArgs) -> anyhow::Result<()> {
    let loaded = vatbake::load_texture(&args.in_path)?;
    let curves = vatbake::TransformCurves::from_json_path(&args.curves)?;

    let pivot = match args.pivot.as_deref() {
        Some(&[x, y, z]) => vatbake::Vec3::new(x, y, z),
        Some(other) => anyhow::bail!("--pivot takes 3 values, got {}", other.len()),
        None => vatbake::Vec3::ZERO,
    };

    let mut conditions = vatbake::ConditionSet::new();
    let out = vatbake::transform_texture(
        &loaded.buffer,
        &curves,
        vatbake::TransformOptions { pivot },
        &mut conditions,
    )?;
    print_conditions(&conditions);

    let color_mode = args
        .out
        .extension()
        .and_then(|e| e.to_str())
        .map(vatbake::ColorMode::from_extension)
        .unwrap_or(loaded.color_mode);

    create_parent_dir(&args.out)?;
    vatbake::write_texture(
        &args.out,
        &out,
        color_mode,
        &loaded.layer_names,
        vatbake::ExrPrecision::Full,
    )?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn create_parent_dir(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}
