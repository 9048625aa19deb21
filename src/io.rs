pub mod lp;
pub mod report;
pub mod stp;

use crate::error::SteinerError;
use crate::instance::Instance;
use std::fs::File;
use std::io::prelude::*;
use std::path::Path;
use thiserror::Error;

/// Failure to read an instance file
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read instance file: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(#[from] stp::ParseError),
    #[error(transparent)]
    Instance(#[from] SteinerError),
}

///
/// read and parse an instance file in the section-delimited format
///
pub fn load_instance<P: AsRef<Path>>(path: P) -> Result<Instance, LoadError> {
    let text = std::fs::read_to_string(path)?;
    text.parse()
}

///
/// write string into a file
///
pub fn write_string<P: AsRef<Path>>(path: P, string: &str) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(string.as_bytes())?;
    Ok(())
}
