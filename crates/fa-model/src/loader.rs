//! JSON description loader.
//!
//! Loading only checks that the document is well-formed and has the right
//! shape.  Name resolution and every structural rule are checked by
//! [`NetworkModel::build`](crate::NetworkModel::build), so a description
//! can be loaded, inspected, and fixed before it is compiled.

use std::io::Read;
use std::path::Path;

use crate::{ModelError, ModelResult, NetworkDescription};

/// Load a [`NetworkDescription`] from a JSON file.
pub fn load_description_json(path: &Path) -> ModelResult<NetworkDescription> {
    let file = std::fs::File::open(path).map_err(ModelError::Io)?;
    load_description_reader(std::io::BufReader::new(file))
}

/// Like [`load_description_json`] but accepts any `Read` source.
///
/// Useful for testing (pass a `std::io::Cursor`) or for descriptions
/// embedded in a binary.
pub fn load_description_reader<R: Read>(reader: R) -> ModelResult<NetworkDescription> {
    serde_json::from_reader(reader).map_err(|e| ModelError::Parse(e.to_string()))
}
