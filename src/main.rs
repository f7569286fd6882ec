use clap::Parser;
use eframe::egui;
use jgemu::ui::JgemuApp;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "jgemu")]
#[command(about = "Jolly Good Emulation - pick a system, pick a game, play")]
#[command(version)]
struct Args {
    /// Path to the platforms configuration file
    #[arg(short, long, default_value = jgemu::DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Also write the log to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

/// A writer that writes to both stdout and a file
struct DualWriter {
    file: File,
}

impl DualWriter {
    fn new(file: File) -> Self {
        Self { file }
    }
}

impl Write for DualWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stdout().write_all(buf)?;
        self.file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()?;
        self.file.flush()
    }
}

fn init_logging(args: &Args) {
    let mut builder = env_logger::Builder::from_default_env();

    // RUST_LOG wins over --debug
    if std::env::var_os("RUST_LOG").is_none() {
        builder.filter_level(if args.debug {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        });
    }

    if let Some(ref path) = args.log_file {
        match File::create(path) {
            Ok(file) => {
                builder.target(env_logger::Target::Pipe(Box::new(DualWriter::new(file))));
            }
            Err(e) => eprintln!("Warning: Could not create log file {}: {}", path.display(), e),
        }
    }

    builder.init();
}

/// Window icon from `icon.png` in the working directory, if there is one
fn load_icon(path: &Path) -> Option<egui::IconData> {
    let image = match image::open(path) {
        Ok(image) => image.to_rgba8(),
        Err(e) => {
            log::debug!("No window icon loaded from {}: {}", path.display(), e);
            return None;
        }
    };
    let (width, height) = image.dimensions();
    Some(egui::IconData {
        rgba: image.into_raw(),
        width,
        height,
    })
}

fn main() -> Result<(), eframe::Error> {
    let args = Args::parse();
    init_logging(&args);

    log::info!("Starting Jolly Good Emulation {}", env!("CARGO_PKG_VERSION"));
    log::info!("Config file: {}", args.config.display());

    let mut viewport = egui::ViewportBuilder::default()
        .with_title("Jolly Good Emulation")
        .with_inner_size([800.0, 600.0])
        .with_min_inner_size([800.0, 600.0])
        .with_drag_and_drop(true);
    if let Some(icon) = load_icon(Path::new("icon.png")) {
        viewport = viewport.with_icon(icon);
    }

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    let config = args.config;
    eframe::run_native(
        "Jolly Good Emulation",
        options,
        Box::new(|_cc| Ok(Box::new(JgemuApp::new(config)))),
    )
}
