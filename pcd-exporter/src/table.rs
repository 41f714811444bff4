use std::io;

use serde::{Serialize, Serializer};

use pcd_matcher::{matcher::round_for_display, ClassificationTier, MatchResult};

use crate::error::ExportError;

fn three_decimals<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&format_args!("{:.3}", round_for_display(*value)))
}

#[derive(Debug, Serialize)]
struct ResultRow {
    #[serde(rename = "CSV X", serialize_with = "three_decimals")]
    csv_x: f64,
    #[serde(rename = "CSV Y", serialize_with = "three_decimals")]
    csv_y: f64,
    #[serde(rename = "CSV Z", serialize_with = "three_decimals")]
    csv_z: f64,
    #[serde(rename = "LAS X", serialize_with = "three_decimals")]
    las_x: f64,
    #[serde(rename = "LAS Y", serialize_with = "three_decimals")]
    las_y: f64,
    #[serde(rename = "LAS Z", serialize_with = "three_decimals")]
    las_z: f64,
    #[serde(rename = "Dist (m)", serialize_with = "three_decimals")]
    distance: f64,
    #[serde(rename = "ΔZ (m)", serialize_with = "three_decimals")]
    delta_z: f64,
    #[serde(rename = "Klasifikācija")]
    tier: ClassificationTier,
}

impl From<&MatchResult> for ResultRow {
    fn from(result: &MatchResult) -> Self {
        Self {
            csv_x: result.reference.x,
            csv_y: result.reference.y,
            csv_z: result.reference.z,
            las_x: result.ground.x,
            las_y: result.ground.y,
            las_z: result.ground.z,
            distance: result.display_distance(),
            delta_z: result.display_delta_z(),
            tier: result.tier,
        }
    }
}

/// Writes one row per match, in result order, with a header row.
pub fn write_results<W: io::Write>(
    writer: W,
    results: &[MatchResult],
) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_writer(writer);
    for result in results {
        writer.serialize(ResultRow::from(result))?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use pcd_core::pointcloud::point::{GroundPoint, ReferencePoint};
    use pcd_matcher::{compare, MaxDistance};

    use super::*;

    fn sample_results() -> Vec<MatchResult> {
        compare(
            vec![
                GroundPoint::new(506000.0, 312000.0, 10.0),
                GroundPoint::new(506010.0, 312000.0, 12.0),
            ],
            &[
                ReferencePoint::new(506000.05, 312000.0, 10.5),
                ReferencePoint::new(506005.0, 312000.0, 11.0),
                ReferencePoint::new(506010.0, 312000.1, 11.95),
            ],
            MaxDistance::default(),
        )
        .results
    }

    #[test]
    fn test_table_layout() {
        let mut buffer = Vec::new();
        write_results(&mut buffer, &sample_results()).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "CSV X,CSV Y,CSV Z,LAS X,LAS Y,LAS Z,Dist (m),ΔZ (m),Klasifikācija"
        );
        assert_eq!(
            lines[1],
            "506000.050,312000.000,10.500,506000.000,312000.000,10.000,0.050,0.500,sarkana"
        );
        assert_eq!(
            lines[2],
            "506010.000,312000.100,11.950,506010.000,312000.000,12.000,0.100,-0.050,zaļa"
        );
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_empty_results_write_nothing() {
        let mut buffer = Vec::new();
        write_results(&mut buffer, &[]).unwrap();
        assert!(buffer.is_empty());
    }
}
