use e57_metadata::{
    plan, run_batch, run_jobs, BatchConfig, DryRunRunner, Error, FilterRunner, ProcessRunner,
};
use std::ffi::OsString;
use std::fs::write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Records all invocations and answers with a list of exit codes.
struct RecordingRunner {
    calls: Vec<(PathBuf, Vec<String>)>,
    exit_codes: Vec<Option<i32>>,
}

impl RecordingRunner {
    fn new(exit_codes: Vec<Option<i32>>) -> Self {
        Self {
            calls: Vec::new(),
            exit_codes,
        }
    }
}

impl FilterRunner for RecordingRunner {
    fn invoke(&mut self, program: &Path, args: &[OsString]) -> e57_metadata::Result<Option<i32>> {
        let args = args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        self.calls.push((program.to_path_buf(), args));
        let index = self.calls.len() - 1;
        Ok(self.exit_codes.get(index).copied().unwrap_or(Some(0)))
    }
}

fn config_with_manifest(dir: &TempDir, manifest: &str) -> BatchConfig {
    let manifest_path = dir.path().join("input.txt");
    write(&manifest_path, manifest).unwrap();
    BatchConfig {
        executable: PathBuf::from("CloudCompare"),
        input_dir: dir.path().join("in"),
        output_dir: dir.path().join("out"),
        manifest: manifest_path,
        ..BatchConfig::default()
    }
}

#[test]
fn three_entries_get_substituted_output_names() {
    let dir = TempDir::new().unwrap();
    let manifest = "Site_Scanner1_001.las\nSite_Scanner1_002.las\n\nSite_Scanner1_003.las\n";
    let config = config_with_manifest(&dir, manifest);

    let mut runner = RecordingRunner::new(Vec::new());
    let summary = run_batch(&config, &mut runner).unwrap();
    assert_eq!(summary.results.len(), 3);
    assert_eq!(summary.failed(), 0);
    assert_eq!(summary.collisions(), 0);
    assert_eq!(runner.calls.len(), 3);

    for (i, (program, args)) in runner.calls.iter().enumerate() {
        let n = i + 1;
        let input = dir.path().join("in").join(format!("Site_Scanner1_00{n}.las"));
        let output = dir
            .path()
            .join("out")
            .join(format!("Site_Scanner1_output_00{n}.las"));
        assert_eq!(program, &PathBuf::from("CloudCompare"));
        assert_eq!(args.len(), 13);
        assert_eq!(args[2], input.display().to_string());
        assert_eq!(args[12], output.display().to_string());
        assert_eq!(args[12].matches("_Scanner1_output_").count(), 1);
    }
}

#[test]
fn name_without_pattern_is_passed_through() {
    let dir = TempDir::new().unwrap();
    let config = config_with_manifest(&dir, "Site_Scanner2_001.las\n");

    let mut runner = RecordingRunner::new(Vec::new());
    let summary = run_batch(&config, &mut runner).unwrap();
    assert_eq!(summary.collisions(), 1);
    assert!(summary.results[0].job.collides);

    let args = &runner.calls[0].1;
    let input_name = Path::new(&args[2]).file_name().unwrap().to_owned();
    let output_name = Path::new(&args[12]).file_name().unwrap().to_owned();
    assert_eq!(input_name, output_name);
    assert_eq!(input_name, "Site_Scanner2_001.las");
}

#[test]
fn failing_jobs_do_not_stop_the_batch() {
    let dir = TempDir::new().unwrap();
    let config = config_with_manifest(&dir, "a_Scanner1_.las\nb_Scanner1_.las\nc_Scanner1_.las");

    let mut runner = RecordingRunner::new(vec![Some(0), Some(2), None]);
    let summary = run_batch(&config, &mut runner).unwrap();
    assert_eq!(runner.calls.len(), 3);
    assert_eq!(summary.failed(), 2);
    assert!(summary.results[0].succeeded());
    assert_eq!(summary.results[1].exit_code, Some(2));
    assert_eq!(summary.results[2].exit_code, None);
}

/// Runner that cannot start any program.
struct BrokenRunner {
    calls: usize,
}

impl FilterRunner for BrokenRunner {
    fn invoke(&mut self, _program: &Path, _args: &[OsString]) -> e57_metadata::Result<Option<i32>> {
        self.calls += 1;
        Err(Error::Invoke {
            reason: String::from("not installed"),
            source: None,
        })
    }
}

#[test]
fn start_failure_aborts_the_batch() {
    let dir = TempDir::new().unwrap();
    let config = config_with_manifest(&dir, "a_Scanner1_.las\nb_Scanner1_.las");

    let mut runner = BrokenRunner { calls: 0 };
    let err = run_batch(&config, &mut runner).unwrap_err();
    assert!(matches!(err, Error::Invoke { .. }));
    assert_eq!(runner.calls, 1);
}

#[test]
fn missing_executable() {
    let dir = TempDir::new().unwrap();
    let mut config = config_with_manifest(&dir, "a_Scanner1_.las");
    config.executable = dir.path().join("no_such_point_cloud_tool");

    let err = run_batch(&config, &mut ProcessRunner).unwrap_err();
    assert!(matches!(err, Error::Invoke { .. }));
}

#[test]
fn missing_manifest() {
    let dir = TempDir::new().unwrap();
    let config = BatchConfig {
        manifest: dir.path().join("missing.txt"),
        ..BatchConfig::default()
    };
    let mut runner = RecordingRunner::new(Vec::new());
    assert!(run_batch(&config, &mut runner).is_err());
    assert!(runner.calls.is_empty());
}

#[test]
fn dry_run_reports_success() {
    let config = BatchConfig::default();
    let names = vec![String::from("x_Scanner1_1.las"), String::from("y.las")];
    let jobs = plan(&names, &config);
    assert_eq!(jobs.len(), 2);
    assert!(!jobs[0].collides);
    assert!(jobs[1].collides);

    let summary = run_jobs(jobs, &config, &mut DryRunRunner).unwrap();
    assert_eq!(summary.failed(), 0);
    assert_eq!(summary.collisions(), 1);
}

#[test]
fn empty_manifest_runs_nothing() {
    let dir = TempDir::new().unwrap();
    let config = config_with_manifest(&dir, "\n \n");
    let mut runner = RecordingRunner::new(Vec::new());
    let summary = run_batch(&config, &mut runner).unwrap();
    assert!(summary.results.is_empty());
    assert!(runner.calls.is_empty());
}
