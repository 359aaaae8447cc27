//! Line grammars for meshtal files
//!
//! Every line is trimmed before it gets here. Data records are tried first by
//! the reader, anything else goes through [classify] to find out what it
//! describes.

// crate modules
use crate::format::Format;
use crate::geometry::Geometry;
use crate::group::Group;
use crate::reader::{CellData, VoidRecord};
use crate::voxel::Voxel;

// external crates
use log::warn;

// nom parser combinators
use nom::branch::alt;
use nom::bytes::complete::{tag, tag_no_case, take_till1, take_until, take_until1};
use nom::character::complete::{char, digit1, one_of, space0, space1, u32 as integer};
use nom::combinator::{map, map_parser, opt, recognize, rest, value};
use nom::multi::{many1, many1_count};
use nom::number::complete::double;
use nom::sequence::{pair, preceded, terminated, tuple};
use nom::IResult;

/// What a line in the body of a mesh block describes
///
/// Only the lines the reader acts on are listed. Anything else, like table
/// headings or blank lines, classifies as `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderLine {
    /// `origin at`, with `axis in` and `VEC direction` for cylinders
    Orientation,
    /// `neutron   mesh tally.`
    Particle,
    /// `X direction:`, `Theta direction (revolutions):`, etc...
    SpatialBounds,
    /// `Energy bin boundaries:` or `Time bin boundaries:`
    GroupBounds,
    /// `Energy Bin: ...` or `Total Time Bin` before a set of matrix tables
    GroupMarker,
    /// `Z bin: ...` before every result/error table pair
    TableMarker,
    /// Whitespace separated numbers, i.e. a matrix table row
    Numbers,
    /// `Void_Record=on` or `Void_Record=off`
    VoidRecord,
    /// Row of the material cells per voxel array
    MaterialCells,
}

/// Work out what a non-data line describes for a mesh of the given format
///
/// The matrix and CuV specific lines are only looked for in those formats.
pub fn classify(line: &str, format: Format) -> Option<HeaderLine> {
    if line.contains("origin at") {
        return Some(HeaderLine::Orientation);
    }
    if line.trim_end().ends_with("mesh tally.") {
        return Some(HeaderLine::Particle);
    }
    if spatial_bound_tag(line).is_ok() {
        return Some(HeaderLine::SpatialBounds);
    }
    if group_bound_tag(line).is_ok() {
        return Some(HeaderLine::GroupBounds);
    }

    match format {
        Format::IJ | Format::IK | Format::JK => {
            if is_group_marker(line) {
                Some(HeaderLine::GroupMarker)
            } else if is_table_marker(line) {
                Some(HeaderLine::TableMarker)
            } else if is_number_row(line) {
                Some(HeaderLine::Numbers)
            } else {
                None
            }
        }
        Format::CUV => {
            if line.starts_with("Void_Record=") {
                Some(HeaderLine::VoidRecord)
            } else if is_integer_row(line) {
                Some(HeaderLine::MaterialCells)
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Work out the output format from the table heading of a mesh
///
/// `Z bin` tables are IJ for rectangular meshes but IK for cylinders, so the
/// geometry has to be known before the first table.
pub fn detect_format(line: &str, geometry: Geometry) -> Option<Format> {
    if is_cuv_heading(line) {
        return Some(Format::CUV);
    }

    if is_column_heading(line) {
        return match line.contains("Volume") {
            true => Some(Format::CF),
            false => Some(Format::COL),
        };
    }

    if !is_table_marker(line) {
        return None;
    }

    match line.chars().next()? {
        'X' | 'R' => Some(Format::JK),
        'Y' => Some(Format::IK),
        'T' => Some(Format::IJ),
        'Z' if geometry == Geometry::Rectangular => Some(Format::IJ),
        'Z' => Some(Format::IK),
        _ => None,
    }
}

/// Geometry from the first bounds line, `X direction:` or `R direction:`
pub fn mesh_geometry(line: &str) -> Option<Geometry> {
    let parsed: IResult<&str, char> =
        terminated(one_of("XR"), pair(space1, tag("direction:")))(line);
    match parsed.ok()?.1 {
        'R' => Some(Geometry::Cylindrical),
        _ => Some(Geometry::Rectangular),
    }
}

/// First line of the file, e.g. `mcnp   version 6  ...  probid = ...`
pub fn is_mcnp_header(i: &str) -> bool {
    i.starts_with("mcnp")
}

pub fn is_histories(i: &str) -> bool {
    i.starts_with("Number of histories")
}

pub fn is_new_mesh(i: &str) -> bool {
    i.starts_with("Mesh Tally Number")
}

/// `Energy Bin:`, `Total Energy Bin`, `Time Bin:` or `Total Time Bin`
fn is_group_marker(i: &str) -> bool {
    ["Energy Bin:", "Total Energy Bin", "Time Bin:", "Total Time Bin"]
        .iter()
        .any(|marker| i.starts_with(marker))
}

/// Any coordinate followed by `bin`, e.g. `Z bin:` or `Theta bin (revolutions):`
///
/// Tables are ij, ik, or jk so the k coordinate never comes first in a
/// heading, but `Theta` is still recognised for completeness.
fn is_table_marker(i: &str) -> bool {
    tuple((coordinate, space1, tag("bin")))(i).is_ok()
}

/// Column headings for COL and CF, e.g. `Energy  X  Y  Z  Result  Rel Error`
fn is_column_heading(i: &str) -> bool {
    tuple((
        group_headings,
        one_of("XR"),
        space1,
        one_of("YZ"),
        space1,
        one_of("ZT"),
    ))(i)
    .is_ok()
}

/// Column headings for CuV, e.g. `Energy  Cell  Mat  Density  Volume ...`
fn is_cuv_heading(i: &str) -> bool {
    pair(group_headings, tag("Cell"))(i).is_ok()
}

/// Optional `Energy` and `Time` columns at the start of a heading
fn group_headings(i: &str) -> IResult<&str, ()> {
    value(
        (),
        pair(
            terminated(opt(tag("Energy")), space0),
            terminated(opt(tag("Time")), space0),
        ),
    )(i)
}

/// Numbers in sequence, e.g. `-0.73 0.00000E+00`
fn is_number_row(i: &str) -> bool {
    many1_count(terminated(double::<&str, ()>, space0))(i).is_ok()
}

/// Integers only, which is how the material cells per voxel are written
fn is_integer_row(i: &str) -> bool {
    !i.contains('.')
        && !i.chars().any(char::is_alphabetic)
        && many1_count(terminated(digit1::<&str, ()>, space0))(i).is_ok()
}

/// `X`, `Y`, `Z`, `R` or `Theta`
fn coordinate(i: &str) -> IResult<&str, &str> {
    alt((tag("X"), tag("Y"), tag("Z"), tag("R"), tag("Theta")))(i)
}

fn spatial_bound_tag(i: &str) -> IResult<&str, &str> {
    terminated(coordinate, pair(space1, tag("direction")))(i)
}

fn group_bound_tag(i: &str) -> IResult<&str, &str> {
    terminated(
        alt((tag("Energy"), tag("Time"))),
        pair(space1, tag("bin boundaries:")),
    )(i)
}

/// Text of a number in scientific notation, e.g. `-1.0e+03`
pub fn scientific(i: &str) -> IResult<&str, &str> {
    recognize(tuple((
        opt(one_of("-+")),
        digit1,
        opt(preceded(char('.'), digit1)),
        one_of("Ee"),
        opt(one_of("-+")),
        digit1,
    )))(i)
}

fn scientific_f64(i: &str) -> IResult<&str, f64> {
    map_parser(scientific, double)(i)
}

/// Scientific numbers that lost their `E` to a three digit exponent
///
/// Fortran drops the `E` when it needs the room, which happens for tiny CuV
/// results:
///
/// ```text
/// Energy     ...     Result   Rel Error
/// 1.047E-11  ...  8.15942-132 1.00000E+00
/// ```
///
/// The mantissa and exponent are stitched back together. Anything that still
/// fails to parse becomes zero with a warning.
pub fn exponent_without_e(i: &str) -> IResult<&str, f64> {
    let (i, (mantissa, sign, exponent)) = tuple((double, one_of("-+"), digit1))(i)?;
    let text = format!("{mantissa}e{sign}{exponent}");
    warn!("Reformatted \"{text}\" from a missing exponent tag");

    let number = text.parse::<f64>().unwrap_or_else(|_| {
        warn!("  \"{text}\" is not a number, using 0.0");
        0.0
    });
    Ok((i, number))
}

/// Result or error in a CuV record, with or without the exponent tag
fn cuv_number(i: &str) -> IResult<&str, f64> {
    alt((scientific_f64, exponent_without_e))(i)
}

/// Energy or time group of a data record
///
/// Files without the group column have an implied total, so nothing is
/// consumed in that case.
fn group(i: &str) -> IResult<&str, Group> {
    map(
        opt(alt((
            value(Group::Total, tag_no_case("Total")),
            map(scientific_f64, Group::Value),
        ))),
        |g| g.unwrap_or(Group::Total),
    )(i)
}

/// The energy and time columns that lead every data record
fn groups(i: &str) -> IResult<&str, (Group, Group)> {
    pair(terminated(group, space0), terminated(group, space0))(i)
}

/// Three whitespace separated voxel centre coordinates
fn centre(i: &str) -> IResult<&str, (f64, f64, f64)> {
    tuple((double, preceded(space1, double), preceded(space1, double)))(i)
}

/// Record of column data as a [Voxel] with a placeholder index
///
/// ```text
/// Energy  X  Y  Z  Result  Rel Error
/// ```
pub fn column_record(i: &str) -> IResult<&str, Voxel> {
    let (i, (_, _, result, error)) = tuple((
        groups,
        centre,
        preceded(space0, scientific_f64),
        preceded(space0, scientific_f64),
    ))(i)?;

    Ok((i, Voxel { index: 0, result, error }))
}

/// Record of UKAEA Cell-under-Voxel data as a [Voxel] and its [CellData]
///
/// ```text
/// Energy  Cell  Mat  Density  Volume  X  Y  Z  Result  Rel Error
/// ```
///
/// The density is the only scientific number before the coordinates, which
/// keeps rows of the material cells per voxel array from matching.
pub fn cuv_record(i: &str) -> IResult<&str, (Voxel, CellData)> {
    let (i, ((energy, time), cell, material, density, volume)) = tuple((
        groups,
        double,
        preceded(space1, double),
        preceded(space1, scientific_f64),
        preceded(space1, double),
    ))(i)?;

    let (i, ((i_coord, j_coord, k_coord), result, error)) = tuple((
        preceded(space1, centre),
        preceded(space0, cuv_number),
        preceded(space0, cuv_number),
    ))(i)?;

    let cell_data = CellData {
        energy,
        time,
        i_coord,
        j_coord,
        k_coord,
        cell: cell as u32,
        material: material as u32,
        density,
        volume,
    };

    Ok((i, (Voxel { index: 0, result, error }, cell_data)))
}

/// Problem id following the `probid =` tag of the first line
pub fn probid(i: &str) -> IResult<&str, &str> {
    let (i, _) = take_until("probid")(i)?;
    let (i, _) = tuple((tag("probid"), space0, char('='), space0))(i)?;
    map(rest, str::trim)(i)
}

/// Value after the `=` of a line, e.g. the number of histories
pub fn value_after_equals(i: &str) -> IResult<&str, f64> {
    preceded(tuple((take_until1("="), char('='), space0)), double)(i)
}

/// Every value after the `:` of a bounds line
pub fn values_after_colon(i: &str) -> IResult<&str, Vec<f64>> {
    preceded(
        tuple((take_until1(":"), char(':'), space1)),
        many1(terminated(double, space0)),
    )(i)
}

/// Three numbers following `label`, ignoring separating commas
///
/// ```text
/// Cylinder origin at 0.0 0.0 -5.0, axis in 0.0 0.0 1.0 direction, VEC direction 1.0 0.0 0.0
/// ```
pub fn labelled_triplet<'a>(i: &'a str, label: &str) -> IResult<&'a str, [f64; 3]> {
    let (mut i, _) = preceded(take_until(label), tag(label))(i)?;
    let mut xyz = [0.0; 3];
    for v in xyz.iter_mut() {
        let (remaining, number) = double(i.trim_start_matches([' ', '\t', ',']))?;
        *v = number;
        i = remaining;
    }
    Ok((i, xyz))
}

/// Tally number following `Mesh Tally Number`
pub fn mesh_id(i: &str) -> IResult<&str, u32> {
    preceded(pair(tag("Mesh Tally Number"), space1), integer)(i)
}

/// Case-insensitive `on` or `off` after the `Void_Record=` tag
pub fn void_record_status(i: &str) -> IResult<&str, VoidRecord> {
    preceded(
        tuple((take_until1("="), char('='), space0)),
        alt((
            value(VoidRecord::On, tag_no_case("on")),
            value(VoidRecord::Off, tag_no_case("off")),
        )),
    )(i)
}

/// Whitespace separated list of integers
pub fn integer_list(i: &str) -> IResult<&str, Vec<u32>> {
    many1(terminated(integer, space0))(i)
}

/// First whitespace delimited token, e.g. `mu_minus` from the particle line
pub fn first_word(i: &str) -> IResult<&str, &str> {
    take_till1(char::is_whitespace)(i)
}

/// Tally number of a `Mesh Tally Number` line, if there is one
pub fn parse_mesh_id(i: &str) -> Option<u32> {
    mesh_id(i).ok().map(|(_, id)| id)
}

#[cfg(test)]
mod classify_tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("neutron   mesh tally.", Format::COL, Some(HeaderLine::Particle))]
    #[case("X direction:     -1.00      0.00", Format::COL, Some(HeaderLine::SpatialBounds))]
    #[case("Theta direction (revolutions):  0.000  1.000", Format::COL, Some(HeaderLine::SpatialBounds))]
    #[case("Energy bin boundaries:  0.00E+00 1.00E+36", Format::IJ, Some(HeaderLine::GroupBounds))]
    #[case("Cylinder origin at 0.0 0.0 0.0, axis in", Format::CUV, Some(HeaderLine::Orientation))]
    #[case("Energy Bin:  0.00E+00 - 1.00E+00", Format::IJ, Some(HeaderLine::GroupMarker))]
    #[case("Total Energy Bin", Format::JK, Some(HeaderLine::GroupMarker))]
    #[case("Z bin:     0.00  -     1.00", Format::IJ, Some(HeaderLine::TableMarker))]
    #[case("0.50  1.00000E+00  4.00000E+00", Format::IJ, Some(HeaderLine::Numbers))]
    #[case("Void_Record=off", Format::CUV, Some(HeaderLine::VoidRecord))]
    #[case("1     0     2", Format::CUV, Some(HeaderLine::MaterialCells))]
    #[case("Number_of_material_cells_per_voxel", Format::CUV, None)]
    #[case("Tally Results:  X (across) by Y (down)", Format::IJ, None)]
    #[case("Relative Errors", Format::IJ, None)]
    #[case("Z bin:     0.00  -     1.00", Format::COL, None)]
    #[case("1     0     2", Format::COL, None)]
    fn line_kinds(#[case] line: &str, #[case] format: Format, #[case] expected: Option<HeaderLine>) {
        assert_eq!(classify(line, format), expected);
    }

    #[rstest]
    #[case("Energy         X         Y         Z     Result     Rel Error", Geometry::Rectangular, Some(Format::COL))]
    #[case("R         Z         Th    Result     Rel Error", Geometry::Cylindrical, Some(Format::COL))]
    #[case("X         Y         Z     Result     Rel Error     Volume    Rslt * Vol", Geometry::Rectangular, Some(Format::CF))]
    #[case("Energy   Cell Mat  Density     Volume      X", Geometry::Rectangular, Some(Format::CUV))]
    #[case("Z bin:   0.00  -   1.00", Geometry::Rectangular, Some(Format::IJ))]
    #[case("Z bin:   0.00  -   1.00", Geometry::Cylindrical, Some(Format::IK))]
    #[case("Theta bin (revolutions):  0.0 - 1.0", Geometry::Cylindrical, Some(Format::IJ))]
    #[case("Y bin:   0.00  -   1.00", Geometry::Rectangular, Some(Format::IK))]
    #[case("X bin:   0.00  -   1.00", Geometry::Rectangular, Some(Format::JK))]
    #[case("Energy bin boundaries:  0.00E+00 1.00E+36", Geometry::Rectangular, None)]
    fn table_formats(#[case] line: &str, #[case] geometry: Geometry, #[case] expected: Option<Format>) {
        assert_eq!(detect_format(line, geometry), expected);
    }

    #[test]
    fn geometry_from_bounds() {
        assert_eq!(mesh_geometry("X direction:  0.0  1.0"), Some(Geometry::Rectangular));
        assert_eq!(mesh_geometry("R direction:  0.0  1.0"), Some(Geometry::Cylindrical));
        assert_eq!(mesh_geometry("Z direction:  0.0  1.0"), None);
        assert_eq!(mesh_geometry("R direction  0.0  1.0"), None);
    }

    #[test]
    fn coordinate_tags() {
        assert_eq!(coordinate("Theta"), Ok(("", "Theta")));
        assert!(coordinate("x").is_err());
        assert!(coordinate("T").is_err());
        assert!(group_bound_tag("Energybin boundaries:").is_err());
        assert!(group_bound_tag("time bin boundaries:").is_err());
    }
}

#[cfg(test)]
mod record_tests {
    use super::*;

    #[test]
    fn missing_exponent_tag() {
        assert_eq!(
            exponent_without_e("1.111+001 2.222E+02"),
            Ok((" 2.222E+02", 11.11))
        );
        assert_eq!(
            exponent_without_e("1.111-001-2.222E+02"),
            Ok(("-2.222E+02", 0.1111))
        );
    }

    #[test]
    fn header_values() {
        let line = "mcnp   version 6     ld=05/08/13  probid =  05/14/24 13:29:11";
        assert_eq!(probid(line).unwrap().1, "05/14/24 13:29:11");

        let line = "Number of histories used for normalizing tallies =      1000000.00";
        assert_eq!(value_after_equals(line).unwrap().1, 1e6);

        assert_eq!(parse_mesh_id("Mesh Tally Number       304"), Some(304));
        assert_eq!(parse_mesh_id("Mesh Tally Number"), None);
    }

    #[test]
    fn bounds() {
        let (_, values) = values_after_colon("X direction:  0.00  1.00  2.00").unwrap();
        assert_eq!(values, vec![0.0, 1.0, 2.0]);

        let (_, values) = values_after_colon("Energy bin boundaries:  0.00E+00 1.00E+36").unwrap();
        assert_eq!(values, vec![0.0, 1e36]);
    }

    #[test]
    fn cylinder_orientation() {
        let line = "Cylinder origin at   0.00E+00  1.00E+00 -5.00E+00, \
                    axis in  0.000E+00 0.000E+00 1.000E+00 direction, \
                    VEC direction  1.000E+00 0.000E+00 0.000E+00";

        let (i, o) = labelled_triplet(line, "origin at").unwrap();
        assert_eq!(o, [0.0, 1.0, -5.0]);
        let (i, a) = labelled_triplet(i, "axis in").unwrap();
        assert_eq!(a, [0.0, 0.0, 1.0]);
        let (_, v) = labelled_triplet(i, "VEC direction").unwrap();
        assert_eq!(v, [1.0, 0.0, 0.0]);
    }

    #[test]
    fn column_records() {
        let line = "1.000E+36     0.500     1.500     0.500 9.00000E+00 1.00000E+00";
        let (_, voxel) = column_record(line).unwrap();
        assert_eq!(voxel.result, 9.0);
        assert_eq!(voxel.error, 1.0);

        let line = "0.500     1.500     0.500 9.00000E+00-1.00000E+00";
        let (_, voxel) = column_record(line).unwrap();
        assert_eq!(voxel.error, -1.0);

        assert!(column_record("X         Y         Z     Result     Rel Error").is_err());
    }

    #[test]
    fn cuv_records() {
        let line = "1.000E+36    2    1  1.00000E+00 2.50000E-01  0.500  0.500  0.500 4.00000E+00 1.00000E-01";
        let (_, (voxel, cell)) = cuv_record(line).unwrap();
        assert_eq!(voxel.result, 4.0);
        assert_eq!(cell.cell, 2);
        assert_eq!(cell.material, 1);
        assert_eq!(cell.volume, 0.25);
        assert_eq!(cell.energy, Group::Value(1e36));
        assert_eq!(cell.time, Group::Total);

        assert!(cuv_record("1     0     2").is_err());
    }

    #[test]
    fn void_records() {
        assert_eq!(void_record_status("Void_Record=on").unwrap().1, VoidRecord::On);
        assert_eq!(void_record_status("Void_Record= OFF").unwrap().1, VoidRecord::Off);
        assert!(void_record_status("Void_Record=maybe").is_err());
    }
}
