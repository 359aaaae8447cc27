//! Command line arithmetic and conversion of mesh tallies
//!
//! # Usage
//!
//! ```text
//! Usage: meshcalc <command> [options]
//! ```
//!
//! Help is printed with the `-h` flag, and `--help` will show examples and
//! default values for every command.
//!
//! ### > How to see what is in a meshtal file
//!
//! ```bash
//! # Header values and every tally format, without reading voxel data
//! meshcalc info /path/to/meshtal.msht
//!
//! # Full summary of specific tallies
//! meshcalc info /path/to/meshtal.msht --ids 104 204
//! ```
//!
//! ### > How to convert a mesh
//!
//! ```bash
//! # Rescale to a source rate and write all arrays as csv
//! meshcalc convert /path/to/meshtal.msht 104 --format csv --scale 6.5e18
//!
//! # Cell-under-Voxel results normalised by the volume of cells 10 and 11
//! meshcalc convert /path/to/meshtal.msht 44 --norm celf --cells 10 11
//! ```
//!
//! ### > How to combine meshes
//!
//! ```bash
//! # Difference of two tallies from the same run
//! meshcalc combine run0.msht 104 204 --f2 -1 --correlated
//!
//! # Sum of the same tally from independent runs
//! meshcalc combine run0.msht 104 104 --other run1.msht
//! ```

// meshops modules
use meshops::mesh::operations::{combine, identical, scale, sum_energy_groups};
use meshops::mesh::reader::{CuvNormalisation, MeshtalReader};
use meshops::mesh::vtk::{write_vtk, MeshToVtk, VtkFormat};
use meshops::mesh::writer::{output_path, write_mesh, OutputFormat};
use meshops::mesh::{Correlation, Group, Mesh, Meshtal, ReadOptions};
use meshops::utils::f;

// external crates
use anyhow::{anyhow, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::*;
use vtkio::model::ByteOrder;

// standard library
use std::path::{Path, PathBuf};

#[doc(hidden)]
fn main() -> Result<()> {
    let cli = Cli::parse();

    // set up logging (+2 to make Info the default)
    logging_init(cli.verbose as usize + 2, cli.quiet)?;

    match &cli.command {
        Command::Info(args) => info_command(args, &cli),
        Command::Convert(args) => convert_command(args, &cli),
        Command::Combine(args) => combine_command(args, &cli),
        Command::Compare(args) => compare_command(args, &cli),
    }
}

/// Arithmetic and conversion of MCNP mesh tallies
///
/// Examples
/// --------
///
///  Summary of a meshtal file:
///     $ meshcalc info run0.msht
///
///  Convert a mesh to csv:
///     $ meshcalc convert run0.msht 104 --format csv
///
///  Correlated difference of two tallies:
///     $ meshcalc combine run0.msht 104 204 --f2 -1 --correlated
///
///  Compare two tallies:
///     $ meshcalc compare run0.msht 104 104 --other run1.msht
///
/// Notes
/// -----
///
/// Errors are relative. Scaling never changes them, and any voxel with a
/// zero result has a zero error.
#[doc(hidden)]
#[derive(Parser)]
#[command(
    verbatim_doc_comment,
    arg_required_else_help(true),
    before_help(banner()),
    after_help("Typical use: meshcalc convert run0.msht 104 --format csv\n\nNOTE: --help shows more detail and examples"),
    term_width(70),
    hide_possible_values(true),
    override_usage("meshcalc <command> [options]")
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    // * Flags
    /// Verbose logging (-v, -vv)
    ///
    /// If specified, the default log level of INFO is increased to DEBUG (-v)
    /// or TRACE (-vv). Errors and Warnings are always logged unless in quiet
    /// (-q) mode.
    #[arg(short, long, global = true)]
    #[arg(action = clap::ArgAction::Count)]
    verbose: u8,

    /// Supress all log output (overrules --verbose)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[doc(hidden)]
#[derive(Subcommand)]
enum Command {
    /// Print a summary of a meshtal file
    Info(InfoArgs),
    /// Convert a mesh to VTK or tabular formats
    Convert(ConvertArgs),
    /// Combine two meshes as f1*A + f2*B
    Combine(CombineArgs),
    /// Compare the particle, geometry, and kind of two meshes
    Compare(CompareArgs),
}

#[doc(hidden)]
#[derive(Args)]
struct InfoArgs {
    /// Path to input meshtal file
    #[arg(name = "meshtal")]
    meshtal: PathBuf,

    /// Read and summarise these tallies in full
    #[arg(long, num_args = 1.., value_delimiter = ' ')]
    #[arg(value_name = "list")]
    ids: Vec<u32>,
}

/// Options shared by every command that reads voxel data
#[doc(hidden)]
#[derive(Args)]
struct CuvArgs {
    /// CuV normalisation
    ///
    /// Combined cell results are divided by either:
    ///     > vtot - total voxel volume (default)
    ///     > celf - volume of the included cells
    #[arg(help_heading("CuV options"))]
    #[arg(long, value_enum)]
    #[arg(hide_default_value(true))]
    #[arg(default_value_t = CliNorm::Vtot)]
    #[arg(verbatim_doc_comment)]
    #[arg(value_name = "norm")]
    norm: CliNorm,

    /// CuV cells to include, all by default
    #[arg(help_heading("CuV options"))]
    #[arg(long, num_args = 1.., value_delimiter = ' ')]
    #[arg(value_name = "list")]
    cells: Vec<u32>,
}

/// Options shared by every command that writes a mesh
#[doc(hidden)]
#[derive(Args)]
struct OutputArgs {
    /// Output format
    ///
    /// Available formats:
    ///     > vtk (default)
    ///     > csv
    ///     > point-cloud
    ///     > ip-fluent
    #[arg(help_heading("Output options"))]
    #[arg(short, long, value_enum)]
    #[arg(hide_default_value(true))]
    #[arg(default_value_t = CliFormat::Vtk)]
    #[arg(verbatim_doc_comment)]
    #[arg(value_name = "format")]
    format: CliFormat,

    /// Only write the named arrays, e.g. "Value - Total"
    #[arg(help_heading("Output options"))]
    #[arg(long, num_args = 1..)]
    #[arg(value_name = "names")]
    arrays: Vec<String>,

    /// Directory for the output files
    #[arg(help_heading("Output options"))]
    #[arg(short, long, default_value = ".")]
    #[arg(value_name = "dir")]
    output: PathBuf,

    /// Output file prefix
    ///
    /// Defaults to the meshtal file stem, with a "_combined" tag for the
    /// result of the combine command.
    #[arg(help_heading("Output options"))]
    #[arg(long)]
    #[arg(value_name = "name")]
    name: Option<String>,

    /// VTK file format
    ///
    /// Available visual toolkit file formats:
    ///     > xml (default)
    ///     > legacy-ascii
    ///     > legacy-binary
    #[arg(help_heading("Vtk options"))]
    #[arg(long, value_enum)]
    #[arg(hide_default_value(true))]
    #[arg(default_value_t = CliVtkFormat::Xml)]
    #[arg(verbatim_doc_comment)]
    #[arg(value_name = "format")]
    vtk_format: CliVtkFormat,

    /// Byte ordering
    ///
    /// Visit only reads big endian, most sytems are little endian.
    ///     > big-endian (default)
    ///     > little-endian
    #[arg(help_heading("Vtk options"))]
    #[arg(long, value_enum)]
    #[arg(hide_default_value(true))]
    #[arg(default_value_t = CliByteOrder::BigEndian)]
    #[arg(verbatim_doc_comment)]
    #[arg(value_name = "endian")]
    endian: CliByteOrder,

    /// Only convert these energy groups
    ///
    /// Groups are named by their upper bin edge in MeV, or "total".
    /// e.g. `--energy 1e1 total`
    #[arg(help_heading("Vtk options"))]
    #[arg(long, num_args = 1..)]
    #[arg(value_name = "groups")]
    energy: Vec<String>,

    /// Cylindrical mesh resolution
    ///
    /// Every theta bin is split into this many segments to round off the
    /// cylinder. Large values increase file size significantly.
    #[arg(help_heading("Vtk options"))]
    #[arg(long)]
    #[arg(value_name = "res")]
    resolution: Option<u8>,
}

#[doc(hidden)]
#[derive(Args)]
struct ConvertArgs {
    /// Path to input meshtal file
    #[arg(name = "meshtal")]
    meshtal: PathBuf,

    /// Mesh tally identifier
    ///
    /// e.g. 104 for FMESH104:n
    #[arg(name = "number")]
    number: u32,

    /// Multiply all results by a constant
    ///
    /// Errors are relative and are therefore unchanged.
    #[arg(help_heading("Mesh options"))]
    #[arg(short, long)]
    #[arg(value_name = "cst")]
    #[arg(allow_negative_numbers(true))]
    scale: Option<f64>,

    /// Collapse energy groups into one, by EMESH bin index
    ///
    /// e.g. `--sum-groups 0 1 2` for the first three groups. Errors are
    /// combined as independent.
    #[arg(help_heading("Mesh options"))]
    #[arg(long, num_args = 1.., value_delimiter = ' ')]
    #[arg(value_name = "list")]
    sum_groups: Vec<usize>,

    #[command(flatten)]
    cuv: CuvArgs,

    #[command(flatten)]
    output: OutputArgs,
}

#[doc(hidden)]
#[derive(Args)]
struct CombineArgs {
    /// Path to input meshtal file
    #[arg(name = "meshtal")]
    meshtal: PathBuf,

    /// Tally number of mesh A
    #[arg(value_name = "a")]
    id_a: u32,

    /// Tally number of mesh B
    #[arg(value_name = "b")]
    id_b: u32,

    /// Read mesh B from a different meshtal file
    #[arg(help_heading("Mesh options"))]
    #[arg(long)]
    #[arg(value_name = "path")]
    other: Option<PathBuf>,

    /// Multiplier for mesh A
    #[arg(help_heading("Mesh options"))]
    #[arg(long, default_value_t = 1.0)]
    #[arg(allow_negative_numbers(true))]
    f1: f64,

    /// Multiplier for mesh B
    #[arg(help_heading("Mesh options"))]
    #[arg(long, default_value_t = 1.0)]
    #[arg(allow_negative_numbers(true))]
    f2: f64,

    /// Treat the meshes as correlated
    ///
    /// Absolute errors add linearly for results that share random samples,
    /// otherwise they add in quadrature.
    #[arg(help_heading("Mesh options"))]
    #[arg(long)]
    correlated: bool,

    #[command(flatten)]
    cuv: CuvArgs,

    #[command(flatten)]
    output: OutputArgs,
}

#[doc(hidden)]
#[derive(Args)]
struct CompareArgs {
    /// Path to input meshtal file
    #[arg(name = "meshtal")]
    meshtal: PathBuf,

    /// Tally number of mesh A
    #[arg(value_name = "a")]
    id_a: u32,

    /// Tally number of mesh B
    #[arg(value_name = "b")]
    id_b: u32,

    /// Read mesh B from a different meshtal file
    #[arg(long)]
    #[arg(value_name = "path")]
    other: Option<PathBuf>,
}

// Wrapper for the output formats
#[doc(hidden)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
enum CliFormat {
    Vtk,
    Csv,
    PointCloud,
    IpFluent,
}

// Wrapper for the CuV normalisation
#[doc(hidden)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
enum CliNorm {
    Vtot,
    Celf,
}

// Wrapper for the vtk formats
#[doc(hidden)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
enum CliVtkFormat {
    Xml,
    LegacyAscii,
    LegacyBinary,
}

// Wrapper for byte order used by vtkio
#[doc(hidden)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
enum CliByteOrder {
    BigEndian,
    LittleEndian,
}

#[doc(hidden)]
fn banner() -> String {
    let mut s = f!("{:-<1$}\n", "", 70);
    s += &f!("{:^70}\n", "Meshops :: MeshCalc");
    s += &f!("{:-<1$}", "", 70);
    s
}

#[doc(hidden)]
fn logging_init(verbosity: usize, quiet: bool) -> Result<()> {
    stderrlog::new()
        .modules(vec![module_path!(), "meshops_mesh"])
        .quiet(quiet)
        .verbosity(verbosity)
        .show_level(false)
        .color(stderrlog::ColorChoice::Never)
        .timestamp(stderrlog::Timestamp::Off)
        .init()?;
    Ok(())
}

#[doc(hidden)]
fn info_command(args: &InfoArgs, cli: &Cli) -> Result<()> {
    let mut meshtal = Meshtal::open(&args.meshtal)?;

    if !args.ids.is_empty() {
        meshtal.read(&ReadOptions {
            ids: args.ids.clone(),
            progress: show_progress(cli),
            ..Default::default()
        })?;
    }

    meshtal.print_info();
    for mesh in meshtal.meshes() {
        mesh.print_info();
    }

    Ok(())
}

#[doc(hidden)]
fn convert_command(args: &ConvertArgs, cli: &Cli) -> Result<()> {
    info!("Reading {}", args.meshtal.display());
    let mut mesh = try_meshtal_read(&args.meshtal, args.number, &args.cuv, cli)?;
    debug!("{mesh}");

    if let Some(factor) = args.scale {
        info!("Scaling results by {:.5e}", factor);
        mesh = scale(&mesh, factor);
    }

    if !args.sum_groups.is_empty() {
        info!("Summing energy groups {:?}", args.sum_groups);
        mesh = sum_energy_groups(&mesh, &args.sum_groups, Correlation::Independent)?;
    }

    let prefix = output_prefix(&args.output, &args.meshtal, None);
    write_output(&mesh, &prefix, &args.output)
}

#[doc(hidden)]
fn combine_command(args: &CombineArgs, cli: &Cli) -> Result<()> {
    let other = args.other.as_deref().unwrap_or(&args.meshtal);

    let a = try_meshtal_read(&args.meshtal, args.id_a, &args.cuv, cli)?;
    let b = try_meshtal_read(other, args.id_b, &args.cuv, cli)?;

    let check = identical(&a, &b);
    if !check.all() {
        warn!("Warning: Meshes {} and {} differ\n{check}", a.id, b.id);
    }

    let correlation = Correlation::from(args.correlated);
    info!(
        "Combining {} x mesh {} + {} x mesh {} ({:?})",
        args.f1, a.id, args.f2, b.id, correlation
    );
    let result = combine(&a, &b, args.f1, args.f2, correlation)?;

    let prefix = output_prefix(&args.output, &args.meshtal, Some("combined"));
    write_output(&result, &prefix, &args.output)
}

#[doc(hidden)]
fn compare_command(args: &CompareArgs, cli: &Cli) -> Result<()> {
    let other = args.other.as_deref().unwrap_or(&args.meshtal);
    let cuv = CuvArgs {
        norm: CliNorm::Vtot,
        cells: Vec::new(),
    };

    let a = try_meshtal_read(&args.meshtal, args.id_a, &cuv, cli)?;
    let b = try_meshtal_read(other, args.id_b, &cuv, cli)?;

    println!("{}", identical(&a, &b));
    Ok(())
}

#[doc(hidden)]
fn show_progress(cli: &Cli) -> bool {
    !(cli.quiet || cli.verbose > 1)
}

#[doc(hidden)]
fn try_meshtal_read(path: &Path, number: u32, cuv: &CuvArgs, cli: &Cli) -> Result<Mesh> {
    let mut reader = MeshtalReader::new();
    reader.set_target_id(number);
    reader.set_cell_filters(&cuv.cells);
    reader.set_normalisation(match cuv.norm {
        CliNorm::Vtot => CuvNormalisation::VoxelVolume,
        CliNorm::Celf => CuvNormalisation::CellVolume,
    });

    if !show_progress(cli) {
        reader.disable_progress();
    }

    reader
        .parse(path)?
        .into_iter()
        .next()
        .ok_or_else(|| anyhow!("Mesh {number} not found in {}", path.display()))
}

#[doc(hidden)]
fn output_prefix(args: &OutputArgs, meshtal: &Path, tag: Option<&str>) -> String {
    if let Some(name) = &args.name {
        return name.clone();
    }

    let stem = meshtal
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or(String::from("fmesh"));

    match tag {
        Some(tag) => f!("{stem}_{tag}"),
        None => stem,
    }
}

#[doc(hidden)]
fn energy_indices(mesh: &Mesh, labels: &[String]) -> Result<Vec<usize>> {
    labels
        .iter()
        .map(|label| -> Result<usize> {
            Ok(mesh.energy_group_index(Group::try_from(label.as_str())?)?)
        })
        .collect()
}

#[doc(hidden)]
fn write_output(mesh: &Mesh, prefix: &str, args: &OutputArgs) -> Result<()> {

    let format = match args.format {
        CliFormat::Vtk => OutputFormat::Vtk,
        CliFormat::Csv => OutputFormat::Csv,
        CliFormat::PointCloud => OutputFormat::PointCloud,
        CliFormat::IpFluent => OutputFormat::IpFluent,
    };

    // tabular formats need nothing more than the array names
    if format != OutputFormat::Vtk {
        let path = write_mesh(mesh, &args.output, prefix, format, &args.arrays)?;
        info!("Written to {}", path.display());
        return Ok(());
    }

    let vtk_format = match args.vtk_format {
        CliVtkFormat::Xml => VtkFormat::Xml,
        CliVtkFormat::LegacyAscii => VtkFormat::LegacyAscii,
        CliVtkFormat::LegacyBinary => VtkFormat::LegacyBinary,
    };

    let mut builder = MeshToVtk::builder()
        .include_errors(true)
        .arrays(args.arrays.clone())
        .energy_groups(energy_indices(mesh, &args.energy)?)
        .byte_order(match args.endian {
            CliByteOrder::LittleEndian => ByteOrder::LittleEndian,
            CliByteOrder::BigEndian => ByteOrder::BigEndian,
        });

    if let Some(resolution) = args.resolution {
        builder = builder.resolution(resolution);
    }

    let vtk = builder.build().convert(mesh)?;

    let path = output_path(mesh, &args.output, prefix, format)
        .with_extension(vtk_format.extension(mesh));
    info!("Writing VTK to {}", path.display());
    write_vtk(vtk, path, vtk_format)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use rstest::rstest;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[rstest]
    #[case(&["meshcalc", "info", "run0.msht"])]
    #[case(&["meshcalc", "info", "run0.msht", "--ids", "104", "204"])]
    #[case(&["meshcalc", "convert", "run0.msht", "104", "--scale", "-2.5"])]
    #[case(&["meshcalc", "convert", "run0.msht", "44", "--norm", "celf", "--cells", "10", "11"])]
    #[case(&["meshcalc", "convert", "run0.msht", "104", "-f", "point-cloud", "-o", "out"])]
    #[case(&["meshcalc", "convert", "run0.msht", "104", "--sum-groups", "0", "1"])]
    #[case(&["meshcalc", "convert", "run0.msht", "104", "--energy", "1e1", "total"])]
    #[case(&["meshcalc", "combine", "run0.msht", "104", "204", "--f2", "-1", "--correlated"])]
    #[case(&["meshcalc", "compare", "run0.msht", "104", "104", "--other", "run1.msht"])]
    fn accepted_arguments(#[case] args: &[&str]) {
        assert!(Cli::try_parse_from(args).is_ok());
    }

    #[rstest]
    #[case(&["meshcalc", "convert", "run0.msht"])]
    #[case(&["meshcalc", "convert", "run0.msht", "104", "--norm", "other"])]
    #[case(&["meshcalc", "combine", "run0.msht", "104"])]
    fn rejected_arguments(#[case] args: &[&str]) {
        assert!(Cli::try_parse_from(args).is_err());
    }

    fn output_args(args: &[&str]) -> OutputArgs {
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Command::Convert(args) => args.output,
            Command::Combine(args) => args.output,
            _ => panic!("expected a command with output options"),
        }
    }

    #[test]
    fn combined_results_get_their_own_prefix() {
        let meshtal = Path::new("runs/run0.msht");

        let convert = output_args(&["meshcalc", "convert", "run0.msht", "104"]);
        assert_eq!(output_prefix(&convert, meshtal, None), "run0");

        let combine = output_args(&["meshcalc", "combine", "run0.msht", "104", "204"]);
        assert_eq!(output_prefix(&combine, meshtal, Some("combined")), "run0_combined");

        let named = output_args(&["meshcalc", "combine", "run0.msht", "104", "204", "--name", "diff"]);
        assert_eq!(output_prefix(&named, meshtal, Some("combined")), "diff");
    }

    #[test]
    fn energy_groups_by_label() {
        let mesh = Mesh {
            eints: 2,
            emesh: vec![0.0, 1.0, 20.0],
            ..Default::default()
        };
        let labels = |names: &[&str]| names.iter().map(|n| n.to_string()).collect::<Vec<_>>();

        assert_eq!(energy_indices(&mesh, &labels(&["total", "1e0"])).unwrap(), vec![2, 0]);
        assert!(energy_indices(&mesh, &labels(&["100"])).is_err());
        assert!(energy_indices(&mesh, &labels(&["high"])).is_err());
        assert!(energy_indices(&mesh, &[]).unwrap().is_empty());
    }

    #[test]
    fn combine_defaults() {
        let cli = Cli::try_parse_from(["meshcalc", "combine", "run0.msht", "104", "204"]).unwrap();
        let Command::Combine(args) = cli.command else {
            panic!("expected the combine command");
        };
        assert_eq!((args.f1, args.f2), (1.0, 1.0));
        assert!(!args.correlated);
        assert_eq!(args.output.format, CliFormat::Vtk);
        assert_eq!(args.cuv.norm, CliNorm::Vtot);
    }
}
