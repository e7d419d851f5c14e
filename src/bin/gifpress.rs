//! gifpress CLI - Animated GIF compression tool
//!
//! A command-line interface for the gifpress library.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use clap::{Parser, ValueEnum};
use log::info;

use gifpress::{codec, CompressionOptions, Preset, ResizeAlgorithm};

type CliResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Shrink animated GIFs by dropping frames, resizing, reducing palettes and
/// cropping frames to what changes.
#[derive(Parser, Debug)]
#[command(name = "gifpress")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "\
EXAMPLES:
    gifpress anim.gif                          Re-quantize to 256 colors
    gifpress anim.gif -o small.gif --preset high
    gifpress anim.gif --colors 64 -r 75 --optimize
    gifpress a.gif b.gif c.gif --preset medium Compress several files
    cat anim.gif | gifpress - -o -             Read stdin, write stdout
    gifpress anim.gif -v                       Verbose output with timing")]
struct Args {
    /// Input GIF files (`-` for stdin)
    #[arg(value_name = "INPUT", required = true)]
    inputs: Vec<PathBuf>,

    /// Output file path (single input only; `-` for stdout)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Maximum palette size per frame (2-256)
    #[arg(long, value_parser = clap::value_parser!(u16).range(2..=256))]
    colors: Option<u16>,

    /// Output size in percent of the input (10-100)
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(10..=100))]
    resize: Option<u8>,

    /// Lossy level (0-100); above 50 disables dithering
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    lossy: Option<u8>,

    /// Crop frames to the region that changes
    #[arg(long)]
    optimize: bool,

    /// Frames dropped between two kept frames (0-10)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=10))]
    frame_skip: Option<u8>,

    /// Compression preset (explicit flags override it)
    #[arg(long, value_enum)]
    preset: Option<PresetArg>,

    /// Resampling filter used when resizing
    #[arg(long, value_enum)]
    filter: Option<FilterArg>,

    /// Show verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(long)]
    quiet: bool,

    /// Output results as JSON (for scripting)
    #[arg(long)]
    json: bool,

    /// Preview the operation without writing any files
    #[arg(long, short = 'n')]
    dry_run: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PresetArg {
    /// 128 colors, 90% size, frame optimization
    Light,
    /// 64 colors, 75% size, frame optimization
    Medium,
    /// 32 colors, 50% size, frame optimization, skip 1
    High,
    /// 16 colors, 40% size, frame optimization, skip 2, lossy 50
    Maximum,
}

impl From<PresetArg> for Preset {
    fn from(arg: PresetArg) -> Self {
        match arg {
            PresetArg::Light => Preset::Light,
            PresetArg::Medium => Preset::Medium,
            PresetArg::High => Preset::High,
            PresetArg::Maximum => Preset::Maximum,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FilterArg {
    /// Nearest neighbor (pixel art)
    Nearest,
    /// Bilinear
    Bilinear,
    /// Catmull-Rom bicubic (default)
    CatmullRom,
    /// Lanczos3 (sharpest, slowest)
    Lanczos3,
}

impl From<FilterArg> for ResizeAlgorithm {
    fn from(arg: FilterArg) -> Self {
        match arg {
            FilterArg::Nearest => ResizeAlgorithm::Nearest,
            FilterArg::Bilinear => ResizeAlgorithm::Bilinear,
            FilterArg::CatmullRom => ResizeAlgorithm::CatmullRom,
            FilterArg::Lanczos3 => ResizeAlgorithm::Lanczos3,
        }
    }
}

/// Outcome of compressing one input.
struct Report {
    input: String,
    output: String,
    input_size: u64,
    output_size: u64,
    frames_in: usize,
    frames_out: usize,
    dimensions_in: (u32, u32),
    dimensions_out: (u32, u32),
    compress_time: Duration,
    to_stdout: bool,
}

impl Report {
    fn ratio(&self) -> f64 {
        if self.input_size > 0 {
            (self.output_size as f64 / self.input_size as f64) * 100.0
        } else {
            0.0
        }
    }
}

fn main() {
    // Show concise help if no arguments provided
    if std::env::args().len() == 1 {
        print_concise_help();
        std::process::exit(0);
    }

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn print_concise_help() {
    eprintln!("gifpress - Animated GIF compression tool");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("    gifpress <INPUT>... [OPTIONS]");
    eprintln!();
    eprintln!("EXAMPLES:");
    eprintln!("    gifpress anim.gif --preset medium      Balanced size/quality");
    eprintln!("    gifpress anim.gif --colors 32 -r 50    Fewer colors, half size");
    eprintln!("    gifpress anim.gif --optimize           Crop frames to changes");
    eprintln!();
    eprintln!("For more options, run: gifpress --help");
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn build_options(args: &Args) -> CompressionOptions {
    let mut builder = CompressionOptions::builder();

    if let Some(preset) = args.preset {
        builder = builder.preset(preset.into());
    }
    // Explicit flags still override preset
    if let Some(colors) = args.colors {
        builder = builder.color_count(colors);
    }
    if let Some(percent) = args.resize {
        builder = builder.resize_percent(percent);
    }
    if let Some(lossy) = args.lossy {
        builder = builder.lossy_level(lossy);
    }
    if args.optimize {
        builder = builder.optimize_frames(true);
    }
    if let Some(skip) = args.frame_skip {
        builder = builder.frame_skip(skip);
    }
    if let Some(filter) = args.filter {
        builder = builder.resize_algorithm(filter.into());
    }

    builder.build()
}

fn run() -> CliResult<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    if args.inputs.len() > 1 && args.output.is_some() {
        return Err("-o/--output can only be used with a single input".into());
    }

    let options = build_options(&args);
    options.validate()?;
    info!("options: {options:?}");

    let results = process_all(&args, &options);

    let total = results.len();
    let mut failed = 0;
    for (input, result) in args.inputs.iter().zip(results) {
        match result {
            Ok(report) => print_report(&args, &report),
            Err(e) => {
                failed += 1;
                if total == 1 {
                    return Err(e);
                }
                eprintln!("Error: {}: {e}", display_input(input));
            }
        }
    }

    if failed > 0 {
        return Err(format!("{failed} of {total} inputs failed").into());
    }
    Ok(())
}

#[cfg(feature = "parallel")]
fn process_all(args: &Args, options: &CompressionOptions) -> Vec<CliResult<Report>> {
    use rayon::prelude::*;

    args.inputs
        .par_iter()
        .map(|input| process(input, args, options))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn process_all(args: &Args, options: &CompressionOptions) -> Vec<CliResult<Report>> {
    args.inputs
        .iter()
        .map(|input| process(input, args, options))
        .collect()
}

fn is_dash(path: &Path) -> bool {
    path.as_os_str() == "-"
}

fn display_input(path: &Path) -> String {
    if is_dash(path) {
        "<stdin>".to_string()
    } else {
        path.display().to_string()
    }
}

/// Read all bytes from stdin
fn read_stdin() -> io::Result<Vec<u8>> {
    let mut buffer = Vec::new();
    io::stdin().read_to_end(&mut buffer)?;
    Ok(buffer)
}

fn read_input(path: &Path) -> CliResult<Vec<u8>> {
    if is_dash(path) {
        return read_stdin().map_err(|e| format!("Can't read from stdin: {e}").into());
    }
    fs::read(path).map_err(|e| {
        if path.exists() {
            format!("Can't read '{}': {e}", path.display()).into()
        } else {
            format!(
                "File not found: '{}'. Check that the path is correct.",
                path.display()
            )
            .into()
        }
    })
}

/// `<stem>.compressed.gif` next to the input.
fn default_output_path(input: &Path) -> PathBuf {
    let mut path = input.to_path_buf();
    path.set_extension("compressed.gif");
    path
}

fn process(input: &Path, args: &Args, options: &CompressionOptions) -> CliResult<Report> {
    let is_stdin = is_dash(input);
    let output_path = match &args.output {
        Some(path) => path.clone(),
        None if is_stdin => {
            return Err(
                "When reading from stdin (-), you must specify an output file with -o/--output"
                    .into(),
            )
        }
        None => default_output_path(input),
    };
    let is_stdout = is_dash(&output_path);

    let data = read_input(input)?;
    if !codec::is_gif(&data) {
        return Err("Unknown image format. Supported: GIF (GIF87a, GIF89a)".into());
    }

    let start = Instant::now();
    let image = codec::decode(&data)?;
    let frames_in = image.frame_count();
    let dimensions_in = (image.width, image.height);

    let image = gifpress::compress(image, options)?;
    let frames_out = image.frame_count();
    let dimensions_out = (image.width, image.height);

    let mut output_data = Vec::new();
    codec::encode_into(&mut output_data, &image)?;
    let compress_time = start.elapsed();

    let output_display = if is_stdout {
        "<stdout>".to_string()
    } else {
        output_path.display().to_string()
    };

    if !args.dry_run {
        if is_stdout {
            io::stdout()
                .lock()
                .write_all(&output_data)
                .map_err(|e| format!("Can't write to stdout: {e}"))?;
        } else {
            fs::write(&output_path, &output_data).map_err(|e| {
                format!(
                    "Can't write to '{}': {}. Check that the directory exists and is writable.",
                    output_path.display(),
                    e
                )
            })?;
        }
    }

    Ok(Report {
        input: display_input(input),
        output: output_display,
        input_size: data.len() as u64,
        output_size: output_data.len() as u64,
        frames_in,
        frames_out,
        dimensions_in,
        dimensions_out,
        compress_time,
        to_stdout: is_stdout,
    })
}

fn print_report(args: &Args, report: &Report) {
    if args.quiet {
        return;
    }

    // Results go to stderr when the GIF itself goes to stdout.
    let print_results = |msg: &str| {
        if report.to_stdout {
            eprintln!("{msg}");
        } else {
            println!("{msg}");
        }
    };

    let ratio = report.ratio();
    if args.json {
        let dry_run = if args.dry_run { r#""dry_run":true,"# } else { "" };
        print_results(&format!(
            r#"{{{dry_run}"input":{},"output":{},"input_size":{},"output_size":{},"ratio":{ratio:.1},"frames_in":{},"frames_out":{}}}"#,
            json_string(&report.input),
            json_string(&report.output),
            report.input_size,
            report.output_size,
            report.frames_in,
            report.frames_out,
        ));
        return;
    }

    if args.dry_run {
        eprintln!("Dry run: would write to {}", report.output);
    }

    if args.verbose {
        let (w_in, h_in) = report.dimensions_in;
        let (w_out, h_out) = report.dimensions_out;
        eprintln!("{} -> {}", report.input, report.output);
        eprintln!("  Dimensions: {w_in}x{h_in} -> {w_out}x{h_out}");
        eprintln!("  Frames: {} -> {}", report.frames_in, report.frames_out);
        eprintln!("  Time: {:.2?}", report.compress_time);
        eprintln!(
            "  Size: {} -> {} ({:.1}%)",
            format_size(report.input_size),
            format_size(report.output_size),
            ratio
        );
    } else {
        print_results(&format!(
            "{}: {} -> {} ({:.1}%)",
            report.input,
            format_size(report.input_size),
            format_size(report.output_size),
            ratio
        ));
    }
}

fn json_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        let mb = bytes as f64 / MB as f64;
        format!("{mb:.2} MB")
    } else if bytes >= KB {
        let kb = bytes as f64 / KB as f64;
        format!("{kb:.2} KB")
    } else {
        format!("{bytes} B")
    }
}
