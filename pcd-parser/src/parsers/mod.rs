use std::{ffi::OsStr, path::Path};

use crate::error::ParseError;

pub mod csv;
pub mod las;

pub trait Parser {
    type Output;

    fn parse(&self) -> Result<Self::Output, ParseError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extension {
    Las,
    Laz,
    Csv,
    Txt,
}

impl Extension {
    pub fn is_point_cloud(self) -> bool {
        matches!(self, Extension::Las | Extension::Laz)
    }

    pub fn is_table(self) -> bool {
        matches!(self, Extension::Csv | Extension::Txt)
    }
}

pub fn get_extension(extension: &str) -> Result<Extension, ParseError> {
    match extension.to_ascii_lowercase().as_str() {
        "las" => Ok(Extension::Las),
        "laz" => Ok(Extension::Laz),
        "csv" => Ok(Extension::Csv),
        "txt" => Ok(Extension::Txt),
        _ => Err(ParseError::UnsupportedExtension(extension.to_string())),
    }
}

pub fn extension_of(path: &Path) -> Result<Extension, ParseError> {
    let extension = path
        .extension()
        .and_then(OsStr::to_str)
        .ok_or_else(|| ParseError::UnsupportedExtension(path.display().to_string()))?;
    get_extension(extension)
}
