//! vnode-svg CLI
//!
//! Usage:
//!   vnode-svg [OPTIONS] [FILE]
//!
//! Options:
//!   -f, --fonts <FILE>    Font configuration file (TOML format)
//!   -o, --output <FILE>   Write the SVG to a file instead of stdout
//!   --padding <N>         Padding around the computed bounds
//!   --compact             Single-line output
//!   --no-declaration      Omit the XML declaration
//!   -d, --debug           Log the laid-out tree
//!   -h, --help            Print help

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::Parser;

use vnode_svg::{
    install_global, render_document, ComponentRegistry, FontConfig, LayoutConfig, RenderConfig,
    RenderError, SvgConfig,
};

#[derive(Parser)]
#[command(name = "vnode-svg")]
#[command(about = "Render JSON node trees to SVG")]
struct Cli {
    /// Input file (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Font configuration file (TOML format)
    #[arg(short, long)]
    fonts: Option<PathBuf>,

    /// Output file (writes to stdout if not provided)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Padding around the computed bounds
    #[arg(long, default_value_t = 0.0)]
    padding: f64,

    /// Single-line output
    #[arg(long)]
    compact: bool,

    /// Omit the XML declaration
    #[arg(long)]
    no_declaration: bool,

    /// Debug mode: log the laid-out tree
    #[arg(short, long)]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();

    log::set_logger(&LOGGER).unwrap_or_default();
    log::set_max_level(if cli.debug {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    });

    // Fonts must be installed before anything is measured
    let mut layout = LayoutConfig::default();
    if let Some(path) = &cli.fonts {
        let config = match FontConfig::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading fonts '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        };
        let registry = match config.load_registry() {
            Ok(r) => r,
            Err(e) => {
                eprintln!("Error loading fonts '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        };
        if let Err(e) = install_global(registry) {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
        layout = layout.with_font(config.defaults.clone());
    }

    // Read input
    let (source, filename) = match &cli.input {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => (content, path.display().to_string()),
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => (buffer, "<stdin>".to_string()),
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    std::process::exit(1);
                }
            }
        }
    };

    let svg = SvgConfig::new()
        .with_viewbox_padding(cli.padding)
        .with_pretty_print(!cli.compact)
        .with_standalone(!cli.no_declaration);
    let config = RenderConfig::new()
        .with_layout(layout)
        .with_svg(svg)
        .with_debug(cli.debug);

    let output = match render_document(&source, &ComponentRegistry::new(), &config) {
        Ok(svg) => svg,
        Err(RenderError::Load(e)) => {
            eprint!("{}", e.format(&source, &filename));
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    match &cli.output {
        Some(path) => {
            if let Err(e) = fs::write(path, output + "\n") {
                eprintln!("Error writing file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        }
        None => println!("{}", output),
    }
}

static LOGGER: SimpleLogger = SimpleLogger;

struct SimpleLogger;

impl log::Log for SimpleLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            let target = if !record.target().is_empty() {
                record.target()
            } else {
                record.module_path().unwrap_or_default()
            };

            let line = record.line().unwrap_or(0);
            let args = record.args();

            match record.level() {
                log::Level::Error => eprintln!("Error (in {}:{}): {}", target, line, args),
                log::Level::Warn => eprintln!("Warning (in {}:{}): {}", target, line, args),
                log::Level::Info => eprintln!("Info (in {}:{}): {}", target, line, args),
                log::Level::Debug => eprintln!("Debug (in {}:{}): {}", target, line, args),
                log::Level::Trace => eprintln!("Trace (in {}:{}): {}", target, line, args),
            }
        }
    }

    fn flush(&self) {}
}
