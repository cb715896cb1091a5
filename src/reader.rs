use crate::error::Converter;
use crate::header_dump::dump_scan_header;
use crate::{Pose, Result, ScanFile};
use e57::E57Reader;
use log::debug;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Source of scan metadata.
///
/// Implementations open a single scan container file and
/// return the header fields of its first scan.
pub trait ScanReader {
    /// Reads the metadata of the first scan in the file.
    fn open(&self, path: &Path) -> Result<ScanFile>;
}

impl<R: ScanReader + ?Sized> ScanReader for &R {
    fn open(&self, path: &Path) -> Result<ScanFile> {
        (**self).open(path)
    }
}

/// Reads scan metadata from E57 files.
///
/// Only the first point cloud of a file is inspected,
/// any additional scans are ignored.
#[derive(Clone, Debug, Default)]
pub struct E57ScanReader {
    validate_crc: bool,
}

impl E57ScanReader {
    /// Creates a reader without checksum validation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables checksum validation of all pages before a file is opened.
    /// This reads the whole file once and can be slow for big files.
    pub fn validate_crc(mut self, enable: bool) -> Self {
        self.validate_crc = enable;
        self
    }
}

impl ScanReader for E57ScanReader {
    fn open(&self, path: &Path) -> Result<ScanFile> {
        let display = path.display();
        if self.validate_crc {
            let file = File::open(path).extraction_err(format!("Cannot open file {display}"))?;
            E57Reader::validate_crc(BufReader::new(file))
                .extraction_err(format!("Checksum validation failed for {display}"))?;
        }

        let reader = E57Reader::from_file(path)
            .extraction_err(format!("Cannot open E57 file {display}"))?;
        let pointclouds = reader.pointclouds();
        let pointcloud = pointclouds
            .first()
            .extraction_err(format!("File {display} contains no scans"))?;
        if pointclouds.len() > 1 {
            debug!(
                "Ignoring {} additional scan(s) in {display}",
                pointclouds.len() - 1
            );
        }

        let pose = match &pointcloud.transform {
            Some(t) => Pose::from_quaternion(
                t.rotation.w,
                t.rotation.x,
                t.rotation.y,
                t.rotation.z,
                [t.translation.x, t.translation.y, t.translation.z],
            ),
            None => Pose::default(),
        };
        let header_text = dump_scan_header(reader.xml(), 0)?;

        Ok(ScanFile::new(path, pointcloud.records, &pose, header_text))
    }
}
