use std::{collections::HashMap, fs::File, io, path::PathBuf};

use csv::{ReaderBuilder, StringRecord, Trim};

use pcd_core::pointcloud::point::ReferencePoint;

use super::Parser;
use crate::error::ParseError;

const REQUIRED_COLUMNS: [&str; 3] = ["x", "y", "z"];

pub struct CsvParser {
    pub filename: PathBuf,
    pub delimiter: u8,
}

impl CsvParser {
    pub fn new(filename: PathBuf) -> Self {
        Self {
            filename,
            delimiter: b',',
        }
    }
}

impl Parser for CsvParser {
    type Output = Vec<ReferencePoint>;

    fn parse(&self) -> Result<Vec<ReferencePoint>, ParseError> {
        let start = std::time::Instant::now();
        let file = File::open(&self.filename)?;
        let points = load_reference_points(file, self.delimiter)?;
        log::info!(
            "Read {} reference points in {:?}",
            points.len(),
            start.elapsed()
        );
        Ok(points)
    }
}

/// Reads x/y/z reference points from a delimited table with a header row.
///
/// Column names are trimmed and matched case-insensitively; other columns are
/// ignored. Rows whose x, y or z is missing or not a finite number are dropped,
/// the rest keep their original order.
pub fn load_reference_points<R: io::Read>(
    reader: R,
    delimiter: u8,
) -> Result<Vec<ReferencePoint>, ParseError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let field_mapping = create_field_mapping(&headers)?;

    let mut points = Vec::new();
    let mut dropped = 0usize;
    for record in reader.records() {
        let record = record?;
        match parse_point(&record, &field_mapping) {
            Some(point) => points.push(point),
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        log::warn!("Dropped {} CSV rows with missing or non-numeric x/y/z", dropped);
    }

    Ok(points)
}

fn create_field_mapping(
    headers: &StringRecord,
) -> Result<HashMap<&'static str, usize>, ParseError> {
    let mut mapping = HashMap::new();

    for (index, header) in headers.iter().enumerate() {
        let normalized_header = header.trim().to_lowercase();
        for attr_name in REQUIRED_COLUMNS {
            if normalized_header == attr_name {
                // first matching column wins
                mapping.entry(attr_name).or_insert(index);
            }
        }
    }

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|name| !mapping.contains_key(*name))
        .map(|name| name.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ParseError::Schema { missing });
    }

    Ok(mapping)
}

fn get_field_value<'a>(
    record: &'a StringRecord,
    field_mapping: &HashMap<&'static str, usize>,
    field_name: &str,
) -> Option<&'a str> {
    field_mapping
        .get(field_name)
        .and_then(|&index| record.get(index))
}

fn parse_coordinate(
    record: &StringRecord,
    field_mapping: &HashMap<&'static str, usize>,
    field_name: &str,
) -> Option<f64> {
    let value = get_field_value(record, field_mapping, field_name)?;
    value.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_point(
    record: &StringRecord,
    field_mapping: &HashMap<&'static str, usize>,
) -> Option<ReferencePoint> {
    Some(ReferencePoint::new(
        parse_coordinate(record, field_mapping, "x")?,
        parse_coordinate(record, field_mapping, "y")?,
        parse_coordinate(record, field_mapping, "z")?,
    ))
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use super::*;

    fn load(text: &str) -> Result<Vec<ReferencePoint>, ParseError> {
        load_reference_points(text.as_bytes(), b',')
    }

    #[test]
    fn test_columns_are_case_insensitive_and_extra_columns_ignored() {
        let text = "id, X ,Y,Z,code\n1,506000.5,312000.25,10.5,A\n2,506001,312001,11,B\n";
        let points = load(text).unwrap();

        assert_eq!(
            points,
            vec![
                ReferencePoint::new(506000.5, 312000.25, 10.5),
                ReferencePoint::new(506001.0, 312001.0, 11.0),
            ]
        );
    }

    #[test]
    fn test_missing_column_is_schema_error() {
        let err = load("x,y,height\n1,2,3\n").unwrap_err();
        match err {
            ParseError::Schema { missing } => assert_eq!(missing, vec!["z".to_string()]),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_empty_input_is_schema_error() {
        assert!(matches!(load(""), Err(ParseError::Schema { .. })));
    }

    #[test]
    fn test_invalid_rows_are_dropped_in_order() {
        let points = load("x,y,z\n1,1,1\n2,,2\nabc,3,3\n4,4,4\n5,5\n6,6,NaN\n7,7,7\n").unwrap();

        let xs: Vec<f64> = points.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![1.0, 4.0, 7.0]);
    }

    #[test]
    fn test_header_only_yields_no_points() {
        assert!(load("x,y,z\n").unwrap().is_empty());
    }

    #[test]
    fn test_semicolon_delimiter() {
        let points = load_reference_points("X;Y;Z\n1.5;2.5;3.5\n".as_bytes(), b';').unwrap();
        assert_eq!(points, vec![ReferencePoint::new(1.5, 2.5, 3.5)]);
    }

    #[test]
    fn test_parse_from_file() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "x,y,z").unwrap();
        writeln!(file, "0,0,10.5").unwrap();

        let parser = CsvParser::new(file.path().to_path_buf());
        assert_eq!(parser.parse().unwrap(), vec![ReferencePoint::new(0.0, 0.0, 10.5)]);
    }
}
