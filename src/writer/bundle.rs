use crate::error::EmsResult;
use crate::types::Artifact;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Pack artifacts into one ZIP archive
///
/// A file name that appears twice keeps only its last artifact.
pub fn bundle_zip(artifacts: &[&Artifact]) -> EmsResult<Vec<u8>> {
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

    for (idx, artifact) in artifacts.iter().enumerate() {
        let superseded = artifacts[idx + 1..]
            .iter()
            .any(|later| later.file_name == artifact.file_name);
        if superseded {
            continue;
        }

        zip.start_file(artifact.file_name.as_str(), options)?;
        zip.write_all(&artifact.bytes)?;
    }

    Ok(zip.finish()?.into_inner())
}
