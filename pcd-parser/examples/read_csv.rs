use std::path::PathBuf;

use pcd_parser::parsers::{csv::CsvParser, Parser as _};

fn main() {
    let filename = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("examples/data/sample.csv"));
    let parser = CsvParser::new(filename);

    let points = parser.parse().unwrap();

    println!("Number of points: {num_points}", num_points = points.len());
    if let Some(first) = points.first() {
        println!("First point: {:?}", first);
    }
}
