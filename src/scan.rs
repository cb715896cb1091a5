use std::path::{Path, PathBuf};

/// Rigid body transformation of a scan into the file-level coordinate system.
#[derive(Clone, Debug, PartialEq)]
pub struct Pose {
    /// Row-major 3x3 rotation matrix.
    pub rotation: [[f64; 3]; 3],
    /// Translation in meters.
    pub translation: [f64; 3],
}

impl Pose {
    /// Builds a pose from a rotation quaternion and a translation vector.
    ///
    /// The quaternion is normalized before conversion.
    /// A zero quaternion is treated as no rotation.
    pub fn from_quaternion(w: f64, x: f64, y: f64, z: f64, translation: [f64; 3]) -> Self {
        let norm = (w * w + x * x + y * y + z * z).sqrt();
        if norm == 0.0 || !norm.is_finite() {
            return Self {
                translation,
                ..Self::default()
            };
        }
        let (w, x, y, z) = (w / norm, x / norm, y / norm, z / norm);
        let rotation = [
            [
                1.0 - 2.0 * (y * y + z * z),
                2.0 * (x * y - z * w),
                2.0 * (x * z + y * w),
            ],
            [
                2.0 * (x * y + z * w),
                1.0 - 2.0 * (x * x + z * z),
                2.0 * (y * z - x * w),
            ],
            [
                2.0 * (x * z - y * w),
                2.0 * (y * z + x * w),
                1.0 - 2.0 * (x * x + y * y),
            ],
        ];
        Self {
            rotation,
            translation,
        }
    }

    /// Transforms a point from local scan coordinates into file coordinates.
    pub fn apply(&self, point: [f64; 3]) -> [f64; 3] {
        let mut result = self.translation;
        for (row, out) in self.rotation.iter().zip(result.iter_mut()) {
            *out += row[0] * point[0] + row[1] * point[1] + row[2] * point[2];
        }
        result
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            rotation: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
            translation: [0.0, 0.0, 0.0],
        }
    }
}

/// Header metadata of the first scan inside a scan container file.
#[derive(Clone, Debug)]
pub struct ScanFile {
    /// Location of the file this metadata was read from.
    pub path: PathBuf,
    /// Number of points in the scan.
    pub point_count: u64,
    /// Rotation part of the scan pose.
    pub rotation: [[f64; 3]; 3],
    /// Translation part of the scan pose.
    pub translation: [f64; 3],
    /// Position of the scanner in file coordinates.
    pub scan_position: [f64; 3],
    /// Pretty printed dump of all header fields, one entry per line.
    pub header_text: Vec<String>,
}

impl ScanFile {
    /// Creates the record for a scan, deriving the scan position from the pose.
    pub fn new(path: &Path, point_count: u64, pose: &Pose, header_text: Vec<String>) -> Self {
        Self {
            path: path.to_path_buf(),
            point_count,
            rotation: pose.rotation,
            translation: pose.translation,
            scan_position: pose.apply([0.0, 0.0, 0.0]),
            header_text,
        }
    }

    /// File name without directories, as shown in reports.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: [f64; 3], b: [f64; 3]) {
        for i in 0..3 {
            assert!((a[i] - b[i]).abs() < 1e-12, "{a:?} != {b:?}");
        }
    }

    #[test]
    fn identity_quaternion() {
        let pose = Pose::from_quaternion(1.0, 0.0, 0.0, 0.0, [1.0, 2.0, 3.0]);
        assert_eq!(pose.rotation, Pose::default().rotation);
        assert_eq!(pose.apply([0.0, 0.0, 0.0]), [1.0, 2.0, 3.0]);
    }

    #[test]
    fn zero_quaternion_is_identity() {
        let pose = Pose::from_quaternion(0.0, 0.0, 0.0, 0.0, [4.0, 5.0, 6.0]);
        assert_eq!(pose.rotation, Pose::default().rotation);
        assert_eq!(pose.translation, [4.0, 5.0, 6.0]);
    }

    #[test]
    fn quarter_turn_around_z() {
        let half = std::f64::consts::FRAC_1_SQRT_2;
        let pose = Pose::from_quaternion(half, 0.0, 0.0, half, [0.0, 0.0, 0.0]);
        assert_close(pose.apply([1.0, 0.0, 0.0]), [0.0, 1.0, 0.0]);
        assert_close(pose.apply([0.0, 1.0, 0.0]), [-1.0, 0.0, 0.0]);
    }

    #[test]
    fn unnormalized_quaternion() {
        let pose = Pose::from_quaternion(2.0, 0.0, 0.0, 2.0, [10.0, 0.0, 0.0]);
        assert_close(pose.apply([1.0, 0.0, 0.0]), [10.0, 1.0, 0.0]);
    }

    #[test]
    fn scan_position_is_translation() {
        let pose = Pose::from_quaternion(0.5, 0.5, 0.5, 0.5, [7.0, -8.0, 9.5]);
        let scan = ScanFile::new(Path::new("dir/a.e57"), 12, &pose, Vec::new());
        assert_eq!(scan.scan_position, [7.0, -8.0, 9.5]);
        assert_eq!(scan.file_name(), "a.e57");
    }
}
