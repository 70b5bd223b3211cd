use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "pbrmask", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Flatten labeled mask layers into an indexed mask PNG plus color map.
    Mask(MaskArgs),
    /// Measure per-region statistics of packed material images.
    Analyze(AnalyzeArgs),
    /// Rewrite packed material images under their mask assignments.
    Edit(EditArgs),
}

#[derive(Parser, Debug)]
struct MaskArgs {
    /// Layer directories, one per source image; each holds `<label>.png`
    /// layer files. Artifacts are written next to each directory.
    #[arg(required = true)]
    layers: Vec<PathBuf>,
}

#[derive(Parser, Debug)]
struct AnalyzeArgs {
    /// Settings JSON.
    #[arg(long)]
    settings: PathBuf,
}

#[derive(Parser, Debug)]
struct EditArgs {
    /// Settings JSON.
    #[arg(long)]
    settings: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Mask(args) => cmd_mask(args),
        Command::Analyze(args) => cmd_analyze(args),
        Command::Edit(args) => cmd_edit(args),
    }
}

fn cmd_mask(args: MaskArgs) -> anyhow::Result<()> {
    for dir in &args.layers {
        let export = pbrmask::export_mask(dir)?;
        for (color, label) in export.color_map.iter() {
            eprintln!("{color}: {label}");
        }
        eprintln!("wrote {}", export.map_path.display());
        eprintln!("wrote {}", export.mask_path.display());
    }
    Ok(())
}

fn cmd_analyze(args: AnalyzeArgs) -> anyhow::Result<()> {
    let settings = pbrmask::load_settings(&args.settings)?;
    for outcome in pbrmask::analyze_all(&settings)? {
        print_diagnostics(&outcome.diagnostics);
        eprintln!("wrote {}", outcome.stats_path.display());
    }
    Ok(())
}

fn cmd_edit(args: EditArgs) -> anyhow::Result<()> {
    let settings = pbrmask::load_settings(&args.settings)?;
    for outcome in pbrmask::edit_all(&settings)? {
        print_diagnostics(&outcome.diagnostics);
        eprintln!("wrote {}", outcome.output_path.display());
    }
    Ok(())
}

fn print_diagnostics(diagnostics: &[pbrmask::Diagnostic]) {
    for diagnostic in diagnostics {
        eprintln!("warning: {diagnostic}");
    }
}
