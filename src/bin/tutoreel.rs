use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use tutoreel::media::tools::MediaTools;
use tutoreel::runtime::action::load_actions;
use tutoreel::{Action, DiffKind, Runtime, RuntimeConfig};

#[derive(Parser, Debug)]
#[command(name = "tutoreel", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Execute an action stream and merge the result (requires `ffmpeg` unless dry-running).
    Render(RenderArgs),
    /// Print the encoding signature of a media file (requires `ffprobe`).
    Probe(ProbeArgs),
    /// Print the line-level diff between two files.
    Diff(DiffArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Action stream JSON.
    #[arg(long)]
    script: PathBuf,

    /// Runtime configuration JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output MP4 path; appends a final `merge` when the script has none.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Log actions without rendering anything.
    #[arg(long)]
    dry_run: bool,
}

#[derive(Parser, Debug)]
struct ProbeArgs {
    /// Media file to inspect.
    file: PathBuf,

    /// Configuration JSON providing the ffprobe path.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct DiffArgs {
    /// Original file.
    before: PathBuf,
    /// Changed file.
    after: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Probe(args) => cmd_probe(args),
        Command::Diff(args) => cmd_diff(args),
    }
}

fn read_config(path: Option<&Path>) -> anyhow::Result<RuntimeConfig> {
    match path {
        Some(p) => Ok(RuntimeConfig::from_json_file(p)?),
        None => Ok(RuntimeConfig::default()),
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut config = read_config(args.config.as_deref())?;
    if args.dry_run {
        config.render_video = false;
    } else if args.config.is_none() {
        config.render_video = true;
    }
    if config.project_dir.is_none() {
        let script_dir = args.script.parent().filter(|p| !p.as_os_str().is_empty());
        config.project_dir = Some(script_dir.unwrap_or(Path::new(".")).to_path_buf());
    }

    let mut actions = load_actions(&args.script)?;
    if let Some(out) = &args.out {
        match actions.iter_mut().rev().find_map(|a| match a {
            Action::Merge { output } => Some(output),
            _ => None,
        }) {
            Some(output) => *output = Some(out.clone()),
            None => actions.push(Action::Merge {
                output: Some(out.clone()),
            }),
        }
    }

    let mut runtime = Runtime::new(config)?;
    runtime.run(&actions)?;
    match runtime.output() {
        Some(out) => eprintln!("wrote {}", out.display()),
        None => eprintln!("{} actions, nothing rendered", runtime.actions().len()),
    }
    Ok(())
}

fn cmd_probe(args: ProbeArgs) -> anyhow::Result<()> {
    let config = read_config(args.config.as_deref())?;
    let tools = MediaTools::new(&config.ffmpeg);
    let sig = tools
        .probe_signature(&args.file)
        .with_context(|| format!("probe '{}'", args.file.display()))?;
    println!("{sig}");
    Ok(())
}

fn cmd_diff(args: DiffArgs) -> anyhow::Result<()> {
    let read = |p: &Path| {
        std::fs::read_to_string(p).with_context(|| format!("read '{}'", p.display()))
    };
    let before = read(&args.before)?;
    let after = read(&args.after)?;
    for op in tutoreel::diff_lines(&before, &after) {
        let marker = match op.kind {
            DiffKind::Equal => ' ',
            DiffKind::Insert => '+',
            DiffKind::Delete => '-',
        };
        for line in &op.items {
            println!("{marker} {line}");
        }
    }
    Ok(())
}
