use std::{
    fs::File,
    io::{BufReader, Read as _, Write as _},
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "target-lines", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a scripted scene through the overlay and print per-frame stats as JSON lines.
    Simulate(SimulateArgs),
    /// Print the default configuration document.
    Defaults,
}

#[derive(Parser, Debug)]
struct SimulateArgs {
    /// Scene JSON (entities, camera, UI and scripted events).
    #[arg(long)]
    scene: PathBuf,

    /// Configuration JSON. Defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of frames to run. Defaults to one second past the last scripted event.
    #[arg(long)]
    frames: Option<u64>,

    /// Record merged UI rectangles and print them with each frame.
    #[arg(long)]
    debug_occlusion: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Simulate(args) => cmd_simulate(args),
        Command::Defaults => cmd_defaults(),
    }
}

fn read_text(path: &Path, what: &str) -> anyhow::Result<String> {
    let f = File::open(path).with_context(|| format!("open {what} '{}'", path.display()))?;
    let mut s = String::new();
    BufReader::new(f)
        .read_to_string(&mut s)
        .with_context(|| format!("read {what} '{}'", path.display()))?;
    Ok(s)
}

fn read_config_json(path: Option<&Path>) -> anyhow::Result<Arc<target_lines::ConfigSnapshot>> {
    let Some(path) = path else {
        return Ok(Arc::new(target_lines::ConfigSnapshot::default()));
    };
    let s = read_text(path, "config")?;
    target_lines::ConfigSnapshot::from_json_str(&s).with_context(|| "parse config JSON")
}

fn read_scene_json(path: &Path) -> anyhow::Result<target_lines::SimScene> {
    let s = read_text(path, "scene")?;
    target_lines::SimScene::from_json_str(&s).with_context(|| "parse scene JSON")
}

fn cmd_simulate(args: SimulateArgs) -> anyhow::Result<()> {
    let snapshot = read_config_json(args.config.as_deref())?;
    let mut scene = read_scene_json(&args.scene)?;

    let frames = args.frames.unwrap_or_else(|| {
        let tail = (1.0 / scene.dt()).ceil() as u64;
        scene.last_event_frame().map_or(tail, |f| f + 1 + tail)
    });

    let mut overlay = target_lines::Overlay::new(snapshot);
    overlay.set_occlusion_debug(args.debug_occlusion);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for frame in 0..frames {
        scene.apply_events(frame);
        let output = overlay.frame(&scene, scene.dt());

        let mut line = serde_json::json!({
            "frame": frame,
            "processed_lines": output.stats.processed_lines,
            "rendered_lines": output.stats.rendered_lines,
            "commands": output.commands.len(),
        });
        if let Some(debug) = overlay.occlusion().debug() {
            line["collected_rects"] = debug.collected.len().into();
            line["occluders"] = serde_json::to_value(&debug.merged)
                .with_context(|| "serialize occluders")?;
        }
        serde_json::to_writer(&mut out, &line).with_context(|| "write frame stats")?;
        writeln!(out).with_context(|| "write frame stats")?;
    }

    eprintln!("simulated {frames} frames");
    Ok(())
}

fn cmd_defaults() -> anyhow::Result<()> {
    let s = target_lines::ConfigSnapshot::default()
        .to_json_string()
        .with_context(|| "serialize default config")?;
    println!("{s}");
    Ok(())
}
