//! SSD1306 animation CLI - inspect, preview and repack frame sequences.

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use std::fs;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use std::time::Instant;

use ssd1306_anim::{
    animation::{FrameReader, SequenceDescriptor, SequenceRecorder, TextPreview, play},
    schema::{Config, EncoderConfig},
};

fn main() {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    env_logger::init();

    let mut args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "--example") {
        print_example_config();
        return;
    }

    let mut config = take_config(&mut args);
    if let Some(pos) = args.iter().position(|a| a == "--force" || a == "-f") {
        args.remove(pos);
        config.encoder.overwrite = true;
    }

    if args.len() < 3 {
        print_usage(&args[0]);
        std::process::exit(1);
    }

    let path = PathBuf::from(&args[2]);
    let result = match args[1].as_str() {
        "info" => info(&path, &config),
        "play" => {
            let cycles: u64 = args.get(3).and_then(|s| s.parse().ok()).unwrap_or(1);
            preview(&path, &config, cycles)
        }
        "repack" => repack(&path, &config),
        other => {
            eprintln!("Unknown command: {}", other);
            print_usage(&args[0]);
            std::process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn print_usage(program: &str) {
    eprintln!(
        "Usage: {} <command> <sequence> [args] [--config config.json] [--force]",
        program
    );
    eprintln!();
    eprintln!("Inspect and play SSD1306 frame sequences.");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  info <sequence>            Show geometry, frame count and compression");
    eprintln!("  play <sequence> [cycles]   Print every frame as text (default: 1 cycle)");
    eprintln!("  repack <sequence>          Rewrite compressed as raw, or raw as compressed");
    eprintln!();
    eprintln!("repack refuses to replace an existing file unless --force is given.");
    eprintln!("Sequence names look like name.128x64.36img.raw or name.128x64.36img.z");
    eprintln!("Example configuration is printed with --example.");
}

/// Remove `--config <path>` from `args` and load it, or fall back to defaults.
fn take_config(args: &mut Vec<String>) -> Config {
    let Some(pos) = args.iter().position(|a| a == "--config") else {
        return Config::default();
    };
    if pos + 1 >= args.len() {
        eprintln!("--config needs a path");
        std::process::exit(1);
    }
    let config_path = args.remove(pos + 1);
    args.remove(pos);

    let config_str = fs::read_to_string(&config_path).unwrap_or_else(|e| {
        eprintln!("Error reading config file: {}", e);
        std::process::exit(1);
    });

    let config: Config = serde_json::from_str(&config_str).unwrap_or_else(|e| {
        eprintln!("Error parsing config: {}", e);
        std::process::exit(1);
    });

    if let Err(e) = config.validate() {
        eprintln!("Invalid config: {}", e);
        std::process::exit(1);
    }
    config
}

fn info(path: &Path, config: &Config) -> ssd1306_anim::Result<()> {
    let declared = SequenceDescriptor::from_path(path)?;
    let reader = FrameReader::open(path, config.playback.clone())?;
    let stored = fs::metadata(path)?.len();

    println!("Sequence: {}", path.display());
    println!("  Geometry: {}", reader.geometry());
    println!(
        "  Frames: {}{}",
        reader.frame_count(),
        if declared.frame_count.is_none() {
            " (measured)"
        } else {
            ""
        }
    );
    println!("  Frame size: {} bytes", reader.frame_size());
    println!(
        "  Compression: {}",
        if declared.is_compressed() {
            "deflate"
        } else {
            "none"
        }
    );
    println!("  Stored: {} bytes", stored);
    Ok(())
}

fn preview(path: &Path, config: &Config, cycles: u64) -> ssd1306_anim::Result<()> {
    let mut reader = FrameReader::open(path, config.playback.clone())?;
    let total = reader.frame_count() as u64 * cycles;

    let stdout = io::stdout();
    let mut sink = TextPreview::new(BufWriter::new(stdout.lock()), reader.geometry());

    let start = Instant::now();
    play(&mut reader, &mut sink, total)?;
    let elapsed = start.elapsed();

    eprintln!(
        "{} frames in {:.2}s ({:.1} frames/s)",
        total,
        elapsed.as_secs_f32(),
        total as f32 / elapsed.as_secs_f32().max(f32::EPSILON)
    );
    Ok(())
}

fn repack(path: &Path, config: &Config) -> ssd1306_anim::Result<()> {
    let (base, declared) = {
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        SequenceDescriptor::parse_with_base(name)?
    };
    let mut reader = FrameReader::open(path, config.playback.clone())?;

    let encoder = EncoderConfig {
        compressed: !declared.is_compressed(),
        ..config.encoder.clone()
    };
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut recorder = SequenceRecorder::create(dir, &base, reader.geometry(), &encoder)?;

    let frames = reader.frame_count() as u64;
    play(&mut reader, &mut recorder, frames)?;
    let stats = recorder.finalize()?;

    println!("Repacked {}", path.display());
    println!("  {}", stats);
    Ok(())
}

fn print_example_config() {
    let config = Config::default();

    println!("Example configuration (config.json):");
    println!("{}", serde_json::to_string_pretty(&config).unwrap_or_default());
}
