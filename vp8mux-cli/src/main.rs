//! vp8mux CLI Tool
//!
//! Command-line interface for muxing WebP keyframes into WebM and inspecting
//! the results.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{filter::LevelFilter, EnvFilter};
use vp8mux_core::{ids, parse_elements, Element, SimpleBlock};
use vp8mux_decoder::{parse_chunks, ChunkMap, ChunkValue, FrameInput};
use vp8mux_muxer::{Muxer, MuxerConfig};

#[derive(Parser)]
#[command(name = "vp8mux")]
#[command(about = "vp8mux - Mux WebP keyframes into a WebM video without re-encoding")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Mux WebP frames into a WebM file
    Mux {
        /// Input WebP files, in presentation order
        inputs: Vec<PathBuf>,

        /// Text file with one data:image/webp;base64 URI per line
        #[arg(long)]
        data_uris: Option<PathBuf>,

        /// Output WebM file path
        #[arg(short, long)]
        output: PathBuf,

        /// Frame rate used for the default frame duration
        #[arg(long, default_value = "15")]
        fps: f64,

        /// Override the duration of every frame, in milliseconds
        #[arg(long)]
        duration: Option<u32>,

        /// Capture quality (0-100) recorded in the configuration
        #[arg(long, default_value = "100")]
        quality: u8,

        /// MuxingApp / WritingApp string
        #[arg(long, default_value = "vp8mux")]
        app_name: String,
    },

    /// Show the VP8 geometry of a WebP file
    Probe {
        /// Input WebP file path
        input: PathBuf,
    },

    /// Print the EBML element tree of a WebM file
    Inspect {
        /// Input WebM file path
        input: PathBuf,

        /// Emit JSON instead of an indented tree
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Mux {
            inputs,
            data_uris,
            output,
            fps,
            duration,
            quality,
            app_name,
        } => {
            let config = MuxerConfig {
                fps,
                quality,
                app_name,
            };
            mux_frames(inputs, data_uris, output, config, duration)?
        }

        Commands::Probe { input } => probe_webp(input)?,

        Commands::Inspect { input, json } => inspect_webm(input, json)?,
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let env_filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_target(true)
        .with_level(true)
        .with_env_filter(env_filter)
        .init();
}

fn mux_frames(
    inputs: Vec<PathBuf>,
    data_uris: Option<PathBuf>,
    output: PathBuf,
    config: MuxerConfig,
    duration: Option<u32>,
) -> Result<()> {
    let mut muxer = Muxer::new(config).context("Invalid muxer configuration")?;
    let mut add = |input: FrameInput| match duration {
        Some(ms) => muxer.add_frame_with_duration(input, ms),
        None => muxer.add_frame(input),
    };

    for path in &inputs {
        let bytes = fs::read(path)
            .with_context(|| format!("Failed to read frame {}", path.display()))?;
        add(FrameInput::Bytes(bytes));
    }

    if let Some(list) = &data_uris {
        let text = fs::read_to_string(list)
            .with_context(|| format!("Failed to read data URI list {}", list.display()))?;
        for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
            add(FrameInput::DataUri(line.to_string()));
        }
    }

    if muxer.frames().is_empty() {
        warn!("No frames given, writing an empty video");
    }
    info!(frames = muxer.frames().len(), "Muxing frames");

    let webm = muxer.compile().context("Failed to compile WebM")?;

    let file = File::create(&output).context("Failed to create output file")?;
    webm.write_to(BufWriter::new(file))
        .context("Failed to write WebM file")?;

    info!(
        "Wrote {} ({}x{}, {} ms, {} clusters, {} bytes)",
        output.display(),
        webm.info().width,
        webm.info().height,
        webm.info().total_duration_ms,
        webm.cluster_count(),
        webm.bytes().len()
    );

    Ok(())
}

fn probe_webp(input: PathBuf) -> Result<()> {
    let data = fs::read(&input).context("Failed to read WebP file")?;
    let chunks = parse_chunks(&data).context("Failed to parse RIFF container")?;

    println!("\n=== {} ===", input.display());
    print_chunks(&chunks, 0);

    let frame = FrameInput::Bytes(data)
        .decode()
        .context("Failed to decode VP8 keyframe")?;
    println!("Resolution: {}x{}", frame.width, frame.height);
    println!(
        "Scale: horizontal {}, vertical {}",
        frame.horizontal_scale, frame.vertical_scale
    );
    println!("VP8 payload: {} bytes", frame.payload.len());

    Ok(())
}

fn print_chunks(map: &ChunkMap, depth: usize) {
    for id in map.ids() {
        for value in map.get(id) {
            let name = String::from_utf8_lossy(id);
            match value {
                ChunkValue::Bytes(bytes) => {
                    println!("{}{} ({} bytes)", "  ".repeat(depth), name, bytes.len())
                }
                ChunkValue::List(inner) => {
                    println!("{}{}", "  ".repeat(depth), name);
                    print_chunks(inner, depth + 1);
                }
            }
        }
    }
}

fn inspect_webm(input: PathBuf, json: bool) -> Result<()> {
    let data = fs::read(&input).context("Failed to read WebM file")?;
    let elements = parse_elements(&data).context("Failed to parse EBML")?;

    let Some(header) = elements.iter().find(|e| e.id() == ids::EBML) else {
        bail!("{} has no EBML header", input.display());
    };
    if let Some(doc_type) = header.find(ids::DOC_TYPE).and_then(Element::as_str) {
        if doc_type != "webm" {
            warn!(doc_type, "Not a webm document");
        }
    }

    if json {
        let summaries: Vec<_> = elements.iter().map(Element::summary).collect();
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    let mut out = String::new();
    for element in &elements {
        element.summary().render(0, &mut out);
    }
    print!("{out}");

    print_blocks(&elements)?;
    Ok(())
}

fn print_blocks(elements: &[Element]) -> Result<()> {
    let clusters = elements
        .iter()
        .filter(|e| e.id() == ids::SEGMENT)
        .flat_map(|segment| segment.find_all(ids::CLUSTER));

    println!("\n=== Blocks ===");
    for cluster in clusters {
        let base = cluster
            .find(ids::TIMECODE)
            .and_then(Element::as_uint)
            .unwrap_or(0);
        for raw in cluster.find_all(ids::SIMPLE_BLOCK).filter_map(Element::as_bytes) {
            let block = SimpleBlock::parse(raw).context("Failed to parse SimpleBlock")?;
            println!(
                "  track {} at {}ms{} ({} bytes)",
                block.track_number(),
                base as i64 + i64::from(block.relative_timecode()),
                if block.flags().keyframe { " [key]" } else { "" },
                block.payload().len()
            );
        }
    }
    Ok(())
}
