//! Reads the declared coordinate reference system from LAS variable length records.
//!
//! Two encodings are recognised:
//! - GeoTIFF GeoKeyDirectoryTag (`LASF_Projection`, record 34735)
//! - OGC WKT (`LASF_Projection`, record 2112)

use std::io::Cursor;

use byteorder::{LittleEndian, ReadBytesExt};
use las::Vlr;

use pcd_core::crs::EpsgCode;

const PROJECTION_USER_ID: &str = "LASF_Projection";
const GEO_KEY_DIRECTORY_RECORD_ID: u16 = 34735;
const OGC_WKT_RECORD_ID: u16 = 2112;

const GEOGRAPHIC_TYPE_GEO_KEY: u16 = 2048;
const PROJECTED_CS_TYPE_GEO_KEY: u16 = 3072;
const USER_DEFINED: u16 = 32767;

pub fn read_epsg<'a>(vlrs: impl IntoIterator<Item = &'a Vlr>) -> Option<EpsgCode> {
    let mut from_wkt = None;
    for vlr in vlrs {
        if vlr.user_id.trim_end_matches('\0') != PROJECTION_USER_ID {
            continue;
        }
        match vlr.record_id {
            GEO_KEY_DIRECTORY_RECORD_ID => {
                if let Some(epsg) = epsg_from_geo_keys(&vlr.data) {
                    return Some(epsg);
                }
            }
            OGC_WKT_RECORD_ID => {
                from_wkt = from_wkt.or_else(|| epsg_from_wkt(&vlr.data));
            }
            _ => {}
        }
    }
    from_wkt
}

/// Projected CRS key wins over the geographic one.
pub fn epsg_from_geo_keys(data: &[u8]) -> Option<EpsgCode> {
    let mut cursor = Cursor::new(data);
    let _key_directory_version = cursor.read_u16::<LittleEndian>().ok()?;
    let _key_revision = cursor.read_u16::<LittleEndian>().ok()?;
    let _minor_revision = cursor.read_u16::<LittleEndian>().ok()?;
    let number_of_keys = cursor.read_u16::<LittleEndian>().ok()?;

    let mut geographic = None;
    for _ in 0..number_of_keys {
        let key_id = cursor.read_u16::<LittleEndian>().ok()?;
        let tiff_tag_location = cursor.read_u16::<LittleEndian>().ok()?;
        let _count = cursor.read_u16::<LittleEndian>().ok()?;
        let value_offset = cursor.read_u16::<LittleEndian>().ok()?;

        // Non-zero location means the value lives in another tag, not an EPSG code.
        if tiff_tag_location != 0 || value_offset == 0 || value_offset == USER_DEFINED {
            continue;
        }
        match key_id {
            PROJECTED_CS_TYPE_GEO_KEY => return Some(value_offset),
            GEOGRAPHIC_TYPE_GEO_KEY => geographic = Some(value_offset),
            _ => {}
        }
    }
    geographic
}

/// The outermost authority is the last `EPSG` identifier in WKT1 and WKT2 alike.
pub fn epsg_from_wkt(data: &[u8]) -> Option<EpsgCode> {
    let wkt = String::from_utf8_lossy(data);
    let position = wkt.rfind("\"EPSG\"")?;
    let rest = wkt[position + "\"EPSG\"".len()..]
        .trim_start()
        .strip_prefix(',')?
        .trim_start()
        .trim_start_matches('"');
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}
