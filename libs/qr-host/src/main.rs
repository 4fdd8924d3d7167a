//! `qr-solid` command-line front end.
//!
//! Runs the QR code and signboard commands (or compiles a matrix file
//! directly) and optionally writes the resulting document as STL.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use qr_host::commands::{
    BoardInputs, IconInputs, QrCodeInputs, SignboardInputs, SignboardQrInputs,
};
use qr_host::{addin, messages, registry, CommandError, Document};
use qr_solid::{generate, ErrorCorrection, ModuleMatrix, Placement, QrOptions};
use solid_mesh::{write_stl_ascii, write_stl_binary, MeshKernel};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Turns QR codes into printable solids")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,

    /// Write the document as STL to this file
    #[arg(long, short, global = true)]
    output: Option<PathBuf>,

    /// Write ASCII STL instead of binary
    #[arg(long, global = true)]
    ascii: bool,

    /// Log pipeline details
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a QR code, optionally on a base plate
    Qr(QrArgs),
    /// Generate a signboard with an embossed QR code and icon
    Signboard(SignboardArgs),
    /// Compile a matrix text file ('#' filled, '.' empty)
    Matrix(MatrixArgs),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum EcLevel {
    Low,
    Medium,
    Quartile,
    High,
}

impl From<EcLevel> for ErrorCorrection {
    fn from(level: EcLevel) -> Self {
        match level {
            EcLevel::Low => ErrorCorrection::Low,
            EcLevel::Medium => ErrorCorrection::Medium,
            EcLevel::Quartile => ErrorCorrection::Quartile,
            EcLevel::High => ErrorCorrection::High,
        }
    }
}

#[derive(Args, Debug)]
struct PlateArgs {
    /// Side length of the code footprint in mm
    #[arg(long, default_value_t = config::constants::DEFAULT_QR_SIZE)]
    size: f64,
    /// Module extrusion height in mm
    #[arg(long, default_value_t = config::constants::DEFAULT_QR_THICKNESS)]
    thickness: f64,
    /// Skip the backing plate
    #[arg(long)]
    no_base: bool,
    /// Plate overhang beyond the footprint in mm
    #[arg(long, default_value_t = config::constants::DEFAULT_BASE_MARGIN)]
    margin: f64,
    /// Plate thickness in mm
    #[arg(long, default_value_t = config::constants::DEFAULT_BASE_THICKNESS)]
    base_thickness: f64,
}

impl PlateArgs {
    fn options(&self) -> QrOptions {
        QrOptions {
            size: self.size,
            thickness: self.thickness,
            create_base: !self.no_base,
            margin: self.margin,
            base_thickness: self.base_thickness,
        }
    }
}

#[derive(Args, Debug)]
struct QrArgs {
    /// Text to encode
    #[arg(default_value = config::constants::DEFAULT_QR_TEXT)]
    text: String,
    #[command(flatten)]
    plate: PlateArgs,
    /// Error correction level
    #[arg(long, value_enum, default_value_t = EcLevel::Low)]
    ec: EcLevel,
    /// Smallest QR version to use
    #[arg(long, default_value_t = config::constants::DEFAULT_MIN_VERSION)]
    min_version: u8,
}

impl QrArgs {
    fn inputs(&self) -> QrCodeInputs {
        let options = self.plate.options();
        QrCodeInputs {
            text: self.text.clone(),
            size: options.size,
            thickness: options.thickness,
            create_base: options.create_base,
            margin: options.margin,
            base_thickness: options.base_thickness,
            error_correction: self.ec.into(),
            min_version: self.min_version,
        }
    }
}

#[derive(Args, Debug)]
struct SignboardArgs {
    /// Text to encode
    #[arg(default_value = config::constants::DEFAULT_SIGNBOARD_TEXT)]
    text: String,
    #[arg(long, default_value_t = config::constants::DEFAULT_BOARD_WIDTH)]
    board_width: f64,
    #[arg(long, default_value_t = config::constants::DEFAULT_BOARD_HEIGHT)]
    board_height: f64,
    #[arg(long, default_value_t = config::constants::DEFAULT_BOARD_THICKNESS)]
    board_thickness: f64,
    #[arg(long, default_value_t = config::constants::DEFAULT_SIGNBOARD_QR_SIZE)]
    qr_size: f64,
    #[arg(long, default_value_t = config::constants::DEFAULT_SIGNBOARD_QR_POSITION[0])]
    qr_x: f64,
    #[arg(long, default_value_t = config::constants::DEFAULT_SIGNBOARD_QR_POSITION[1])]
    qr_y: f64,
    /// Leave out the icon
    #[arg(long)]
    no_icon: bool,
    #[arg(long, default_value_t = config::constants::DEFAULT_ICON_SIZE)]
    icon_size: f64,
    #[arg(long, default_value_t = config::constants::DEFAULT_ICON_POSITION[0])]
    icon_x: f64,
    #[arg(long, default_value_t = config::constants::DEFAULT_ICON_POSITION[1])]
    icon_y: f64,
}

impl SignboardArgs {
    fn inputs(&self) -> SignboardInputs {
        SignboardInputs {
            board: BoardInputs {
                width: self.board_width,
                height: self.board_height,
                thickness: self.board_thickness,
            },
            qr: SignboardQrInputs {
                text: self.text.clone(),
                size: self.qr_size,
                x: self.qr_x,
                y: self.qr_y,
                ..SignboardQrInputs::default()
            },
            icon: IconInputs {
                enabled: !self.no_icon,
                size: self.icon_size,
                x: self.icon_x,
                y: self.icon_y,
                ..IconInputs::default()
            },
        }
    }
}

#[derive(Args, Debug)]
struct MatrixArgs {
    /// Matrix file, one row per line
    file: PathBuf,
    #[command(flatten)]
    plate: PlateArgs,
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "qr_solid=debug,qr_host=debug,solid_mesh=debug"
    } else {
        "qr_solid=info,qr_host=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn user_error(err: CommandError) -> anyhow::Error {
    anyhow!("{}: {}", messages::title(&err), messages::user_message(&err))
}

fn run_command(id: &str, inputs: String, document: &mut Document) -> Result<()> {
    let mut registry = registry::global()
        .lock()
        .map_err(|_| anyhow!("command registry lock is poisoned"))?;
    addin::run(&mut registry);
    let result = registry.execute(id, &inputs, document);
    addin::stop(&mut registry);
    result.map(|_| ()).map_err(user_error)
}

fn compile_matrix(args: &MatrixArgs, document: &mut Document) -> Result<()> {
    let text = fs::read_to_string(&args.file)
        .with_context(|| format!("reading {}", args.file.display()))?;
    let matrix = ModuleMatrix::parse(&text)
        .map_err(|err| user_error(CommandError::Generate(err.into())))?;
    let name = args
        .file
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("Matrix")
        .to_string();

    generate(&MeshKernel::new(), &matrix, &args.plate.options())
        .map_err(|err| user_error(err.into()))?
        .emit(document, name, Placement::identity())
        .map_err(|err| user_error(err.into()))?;
    Ok(())
}

fn write_stl(document: &Document, path: &Path, ascii: bool) -> Result<usize> {
    let mesh = document.to_mesh().context("meshing document")?;
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut out = BufWriter::new(file);
    let name = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("qr_solid");
    if ascii {
        write_stl_ascii(&mesh, name, &mut out)?;
    } else {
        write_stl_binary(&mesh, name, &mut out)?;
    }
    Ok(mesh.triangle_count())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut document = Document::new();
    match &cli.cmd {
        Command::Qr(args) => run_command(
            addin::QR_CODE_COMMAND_ID,
            serde_json::to_string(&args.inputs())?,
            &mut document,
        )?,
        Command::Signboard(args) => run_command(
            addin::SIGNBOARD_COMMAND_ID,
            serde_json::to_string(&args.inputs())?,
            &mut document,
        )?,
        Command::Matrix(args) => compile_matrix(args, &mut document)?,
    }

    let triangles = match &cli.output {
        Some(path) => {
            let triangles = write_stl(&document, path, cli.ascii)?;
            info!(path = %path.display(), triangles, "wrote STL");
            triangles
        }
        None => document.to_mesh().context("meshing document")?.triangle_count(),
    };

    let bounds = document
        .world_bounds()
        .ok_or_else(|| anyhow!("the document is empty"))?;
    let names: Vec<_> = document.components().iter().map(|c| c.name.as_str()).collect();
    println!(
        "{} component(s) [{}], {} triangles, bounds ({:.3}, {:.3}, {:.3}) .. ({:.3}, {:.3}, {:.3})",
        document.len(),
        names.join(", "),
        triangles,
        bounds.min.x,
        bounds.min.y,
        bounds.min.z,
        bounds.max.x,
        bounds.max.y,
        bounds.max.z,
    );
    Ok(())
}
