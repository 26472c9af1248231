//! Per-stage observation of intermediate matrices.
//!
//! The pipeline hands every intermediate result to a [`StageObserver`] as it
//! crosses a stage boundary. Observers only borrow the matrix; they cannot
//! alter what the next stage receives.
//!
//! Provided observers:
//! - [`NoopObserver`] ignores everything.
//! - [`RecordingObserver`] keeps owned copies in memory, for tests and
//!   interactive inspection without touching the filesystem.
//! - [`CsvDumpObserver`] writes each matrix to `<dir>/<stage>.csv`, creating
//!   `<dir>` on the first dump. Write failures are logged and otherwise
//!   ignored.
//!
//! Closures `FnMut(Stage, StageMatrix<'_>)` are observers too.

use ndarray::{Array2, ArrayView2};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::OutputError;
use crate::io::write_matrix_csv;

/// Stage boundaries at which the pipeline reports a matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Raw 8-bit intensity input
    Input,
    /// Gaussian-smoothed intensity
    Smoothed,
    /// Gradient magnitude
    GradientMagnitude,
    /// Gradient angle in radians
    GradientAngle,
    /// Magnitude after non-maximum suppression
    Suppressed,
    /// Strong/weak/none map
    Classified,
    /// Binary mask after hysteresis
    Linked,
    /// Mask after dilation
    Dilated,
    /// Final mask after erosion
    Closed,
}

impl Stage {
    /// Every stage in pipeline order.
    pub const ALL: [Stage; 9] = [
        Stage::Input,
        Stage::Smoothed,
        Stage::GradientMagnitude,
        Stage::GradientAngle,
        Stage::Suppressed,
        Stage::Classified,
        Stage::Linked,
        Stage::Dilated,
        Stage::Closed,
    ];

    /// File stem used for dumps of this stage.
    pub fn file_stem(self) -> &'static str {
        match self {
            Stage::Input => "orig",
            Stage::Smoothed => "gaussian",
            Stage::GradientMagnitude => "grad_mag",
            Stage::GradientAngle => "grad_angle",
            Stage::Suppressed => "nms",
            Stage::Classified => "threshold",
            Stage::Linked => "hysteresis",
            Stage::Dilated => "dilated",
            Stage::Closed => "final_edges",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_stem())
    }
}

/// Borrowed view of an intermediate matrix.
#[derive(Debug, Clone, Copy)]
pub enum StageMatrix<'a> {
    Float(ArrayView2<'a, f64>),
    Byte(ArrayView2<'a, u8>),
}

impl StageMatrix<'_> {
    pub fn dim(&self) -> (usize, usize) {
        match self {
            StageMatrix::Float(m) => m.dim(),
            StageMatrix::Byte(m) => m.dim(),
        }
    }

    pub fn to_recorded(&self) -> RecordedMatrix {
        match self {
            StageMatrix::Float(m) => RecordedMatrix::Float(m.to_owned()),
            StageMatrix::Byte(m) => RecordedMatrix::Byte(m.to_owned()),
        }
    }

    /// Write as comma-separated text.
    pub fn write_csv(&self, path: &Path) -> Result<(), OutputError> {
        match self {
            StageMatrix::Float(m) => write_matrix_csv(m, path),
            StageMatrix::Byte(m) => write_matrix_csv(m, path),
        }
    }
}

/// Owned copy of an intermediate matrix.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedMatrix {
    Float(Array2<f64>),
    Byte(Array2<u8>),
}

/// Receives intermediate matrices at each stage boundary.
pub trait StageObserver {
    fn observe(&mut self, stage: Stage, matrix: StageMatrix<'_>);
}

impl<F> StageObserver for F
where
    F: FnMut(Stage, StageMatrix<'_>),
{
    fn observe(&mut self, stage: Stage, matrix: StageMatrix<'_>) {
        self(stage, matrix)
    }
}

/// Observer that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl StageObserver for NoopObserver {
    fn observe(&mut self, _stage: Stage, _matrix: StageMatrix<'_>) {}
}

/// Observer that keeps an owned copy of every matrix it sees.
#[derive(Debug, Default, Clone)]
pub struct RecordingObserver {
    records: Vec<(Stage, RecordedMatrix)>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stages seen so far, in order.
    pub fn stages(&self) -> Vec<Stage> {
        self.records.iter().map(|(stage, _)| *stage).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, stage: Stage) -> Option<&RecordedMatrix> {
        self.records
            .iter()
            .find(|(s, _)| *s == stage)
            .map(|(_, m)| m)
    }

    /// Recorded floating point matrix for a stage, if any.
    pub fn float(&self, stage: Stage) -> Option<&Array2<f64>> {
        match self.get(stage) {
            Some(RecordedMatrix::Float(m)) => Some(m),
            _ => None,
        }
    }

    /// Recorded 8-bit matrix for a stage, if any.
    pub fn byte(&self, stage: Stage) -> Option<&Array2<u8>> {
        match self.get(stage) {
            Some(RecordedMatrix::Byte(m)) => Some(m),
            _ => None,
        }
    }
}

impl StageObserver for RecordingObserver {
    fn observe(&mut self, stage: Stage, matrix: StageMatrix<'_>) {
        self.records.push((stage, matrix.to_recorded()));
    }
}

/// Observer that dumps every matrix to a CSV file in a directory.
///
/// The directory (and any missing parents) is created when the first stage
/// arrives, so a run that fails before its first stage leaves nothing on
/// disk. Failed writes are logged at `warn` level and do not interrupt the
/// pipeline.
#[derive(Debug, Clone)]
pub struct CsvDumpObserver {
    dir: PathBuf,
    dir_ready: bool,
    failures: usize,
}

impl CsvDumpObserver {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            dir_ready: false,
            failures: 0,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path the given stage is dumped to.
    pub fn path_for(&self, stage: Stage) -> PathBuf {
        self.dir.join(format!("{}.csv", stage.file_stem()))
    }

    /// Number of dumps that could not be written.
    pub fn failures(&self) -> usize {
        self.failures
    }
}

impl StageObserver for CsvDumpObserver {
    fn observe(&mut self, stage: Stage, matrix: StageMatrix<'_>) {
        if !self.dir_ready {
            match std::fs::create_dir_all(&self.dir) {
                Ok(()) => self.dir_ready = true,
                Err(e) => {
                    self.failures += 1;
                    log::warn!(
                        "Skipping {stage} dump: cannot create {}: {e}",
                        self.dir.display()
                    );
                    return;
                }
            }
        }

        let path = self.path_for(stage);
        if let Err(e) = matrix.write_csv(&path) {
            self.failures += 1;
            log::warn!("Skipping {stage} dump: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr2;
    use tempfile::tempdir;

    #[test]
    fn test_stage_file_stems_are_unique() {
        let mut stems: Vec<_> = Stage::ALL.iter().map(|s| s.file_stem()).collect();
        stems.sort_unstable();
        stems.dedup();
        assert_eq!(stems.len(), Stage::ALL.len());
        assert_eq!(Stage::Closed.to_string(), "final_edges");
    }

    #[test]
    fn test_recording_observer() {
        let mut observer = RecordingObserver::new();
        let bytes = arr2(&[[1u8, 2]]);
        let floats = arr2(&[[0.5]]);

        observer.observe(Stage::Input, StageMatrix::Byte(bytes.view()));
        observer.observe(Stage::Smoothed, StageMatrix::Float(floats.view()));

        assert_eq!(observer.stages(), vec![Stage::Input, Stage::Smoothed]);
        assert_eq!(observer.byte(Stage::Input), Some(&bytes));
        assert_eq!(observer.float(Stage::Smoothed), Some(&floats));
        assert!(observer.float(Stage::Input).is_none());
        assert!(observer.get(Stage::Closed).is_none());
    }

    #[test]
    fn test_closure_observer() {
        let mut seen = Vec::new();
        {
            let mut observer = |stage: Stage, matrix: StageMatrix<'_>| {
                seen.push((stage, matrix.dim()));
            };
            let m = Array2::<u8>::zeros((2, 3));
            observer.observe(Stage::Linked, StageMatrix::Byte(m.view()));
        }
        assert_eq!(seen, vec![(Stage::Linked, (2, 3))]);
    }

    #[test]
    fn test_csv_dump_observer_writes_named_files() {
        let dir = tempdir().unwrap();
        let mut observer = CsvDumpObserver::new(dir.path());
        let m = arr2(&[[0u8, 255], [128, 0]]);

        observer.observe(Stage::Classified, StageMatrix::Byte(m.view()));

        let text = std::fs::read_to_string(dir.path().join("threshold.csv")).unwrap();
        assert_eq!(text, "0,255\n128,0\n");
        assert_eq!(observer.failures(), 0);
    }

    #[test]
    fn test_csv_dump_observer_creates_missing_dir() {
        let dir = tempdir().unwrap();
        let dump_dir = dir.path().join("dumps").join("run1");
        let mut observer = CsvDumpObserver::new(&dump_dir);
        assert!(!dump_dir.exists());

        let m = arr2(&[[3u8]]);
        observer.observe(Stage::Input, StageMatrix::Byte(m.view()));
        observer.observe(Stage::Linked, StageMatrix::Byte(m.view()));

        assert_eq!(std::fs::read_to_string(dump_dir.join("orig.csv")).unwrap(), "3\n");
        assert!(dump_dir.join("hysteresis.csv").exists());
        assert_eq!(observer.failures(), 0);
    }

    #[test]
    fn test_csv_dump_observer_ignores_unwritable_dir() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"not a directory").unwrap();
        let mut observer = CsvDumpObserver::new(blocker.join("sub"));
        let m = arr2(&[[1.0]]);

        observer.observe(Stage::Smoothed, StageMatrix::Float(m.view()));
        observer.observe(Stage::GradientMagnitude, StageMatrix::Float(m.view()));
        assert_eq!(observer.failures(), 2);
    }
}
