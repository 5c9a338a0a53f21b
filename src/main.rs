use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use riffgen::{
    create_midi_file, generate_riff, scale_info, tab_to_midi, validate_in_scale, Fretboard,
    PitchClass, RawRiffRequest, RiffRequest, Scale, Tuning,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Guitar scale patterns as tab and MIDI
#[derive(Parser)]
#[command(name = "riffgen")]
#[command(about = "Generate guitar scale patterns as ASCII tab and MIDI")]
struct Cli {
    /// YAML riff request; command-line flags override its values
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a pattern as six-line tab
    Tab {
        #[command(flatten)]
        riff: RiffArgs,
        /// Print the pattern as JSON instead of tab
        #[arg(long)]
        json: bool,
    },

    /// Write a pattern as a format-0 MIDI file
    Midi {
        #[command(flatten)]
        riff: RiffArgs,
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Show the notes of a scale
    Info { root: String, scale: String },

    /// Read a tab file and print its MIDI notes
    Parse {
        file: PathBuf,
        #[arg(short, long)]
        tuning: Option<String>,
        /// Check the notes against a scale (needs --scale)
        #[arg(short, long, requires = "scale")]
        root: Option<String>,
        #[arg(short, long, requires = "root")]
        scale: Option<String>,
        /// Also write the notes to a MIDI file
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long, default_value_t = riffgen::config::DEFAULT_TEMPO)]
        tempo: u16,
    },

    /// List the box fingering a request anchors to
    Positions {
        #[command(flatten)]
        riff: RiffArgs,
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug, Default)]
struct RiffArgs {
    #[arg(short, long)]
    root: Option<String>,
    #[arg(short, long)]
    scale: Option<String>,
    #[arg(short, long)]
    pattern: Option<String>,
    #[arg(short, long)]
    bars: Option<usize>,
    #[arg(long)]
    position: Option<u8>,
    #[arg(short, long)]
    tuning: Option<String>,
    #[arg(long)]
    progression: Option<String>,
    #[arg(long)]
    tempo: Option<u16>,
    #[arg(long)]
    seed: Option<u64>,
}

impl From<RiffArgs> for RawRiffRequest {
    fn from(args: RiffArgs) -> Self {
        RawRiffRequest {
            root: args.root,
            scale: args.scale,
            pattern: args.pattern,
            bars: args.bars,
            position: args.position,
            tuning: args.tuning,
            progression: args.progression,
            tempo: args.tempo,
            seed: args.seed,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config.as_deref();

    match cli.command {
        Commands::Tab { riff, json } => tab(load_request(config, riff)?, json),
        Commands::Midi { riff, output } => midi(load_request(config, riff)?, &output),
        Commands::Info { root, scale } => info(&root, &scale),
        Commands::Parse {
            file,
            tuning,
            root,
            scale,
            output,
            tempo,
        } => parse(&file, tuning.as_deref(), root.zip(scale), output.as_deref(), tempo),
        Commands::Positions { riff, json } => positions(load_request(config, riff)?, json),
    }
}

fn load_request(config: Option<&Path>, args: RiffArgs) -> Result<RiffRequest> {
    let file = match config {
        Some(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config '{}'", path.display()))?;
            RawRiffRequest::from_yaml(&content)?
        }
        None => RawRiffRequest::default(),
    };
    Ok(RiffRequest::from_raw(file.merge(args.into()))?)
}

fn tab(request: RiffRequest, json: bool) -> Result<()> {
    let riff = generate_riff(&request)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&riff.pattern)?);
    } else {
        println!("{}", riff.tab);
    }
    if let Some(seed) = riff.pattern.seed {
        eprintln!("seed: {}", seed);
    }
    Ok(())
}

fn midi(request: RiffRequest, output: &Path) -> Result<()> {
    let riff = generate_riff(&request)?;
    fs::write(output, riff.midi.as_bytes())
        .with_context(|| format!("Failed to write '{}'", output.display()))?;
    eprintln!(
        "Wrote {} columns at {} BPM to {}",
        riff.pattern.len(),
        request.tempo,
        output.display()
    );
    Ok(())
}

fn info(root: &str, scale: &str) -> Result<()> {
    let info = scale_info(root, scale)?;
    println!("{}: {} ({} notes)", info.name, info.notes, info.note_count);
    Ok(())
}

fn parse(
    file: &Path,
    tuning: Option<&str>,
    scale_check: Option<(String, String)>,
    output: Option<&Path>,
    tempo: u16,
) -> Result<()> {
    let text = fs::read_to_string(file)
        .with_context(|| format!("Failed to read tab '{}'", file.display()))?;
    let tuning = match tuning {
        Some(key) => Tuning::lookup(key)?,
        None => Tuning::standard(),
    };

    let notes = tab_to_midi(&text, tuning)?;
    let listing: Vec<String> = notes.iter().map(u8::to_string).collect();
    println!("{}", listing.join(" "));

    if let Some(path) = output {
        let midi = create_midi_file(&notes, tempo)?;
        fs::write(path, midi.as_bytes())
            .with_context(|| format!("Failed to write '{}'", path.display()))?;
        eprintln!("Wrote {} notes to {}", notes.len(), path.display());
    }

    if let Some((root, scale)) = scale_check {
        let report = validate_in_scale(&notes, PitchClass::parse(&root)?, Scale::lookup(&scale)?);
        for message in report.messages() {
            eprintln!("{}", message);
        }
        if !report.is_valid() {
            bail!("{} of {} notes outside the scale", report.violations.len(), report.checked);
        }
    }
    Ok(())
}

fn positions(request: RiffRequest, json: bool) -> Result<()> {
    let board = Fretboard::new(request.tuning);
    let shape = board.box_position(request.root, request.scale, request.position)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&shape)?);
        return Ok(());
    }

    for note in &shape {
        println!(
            "string {} fret {:>2}  {:<2} finger {}{}",
            note.string + 1,
            note.fret,
            note.note,
            note.finger.unwrap_or(0),
            if note.is_root { "  root" } else { "" }
        );
    }
    Ok(())
}
