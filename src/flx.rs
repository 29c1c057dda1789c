use alloc::format;
use alloc::vec::Vec;

use crate::config::Layout;
use crate::os::{Os, Path, Result};
use crate::phase::Phase;
use crate::runtime::check_collisions;
use crate::steps::BuildSteps;

/// Copies the `.flx` sources into the library directory, unmodified.
///
/// Returns the destination paths reported by the copy step.
pub fn build_flx(
    os: &dyn Os,
    steps: &dyn BuildSteps,
    _builder: &Phase,
    layout: &Layout,
) -> Result<Vec<Path>> {
    let files = layout.flx_sources().expand(os)?;
    let lib_dir = layout.flx_dir();

    check_collisions(&lib_dir, &files)?;

    os.print(&format!("Copying {} files to {lib_dir}", files.len()));
    steps.copy_flxs_to_lib(&lib_dir, &files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{Call, MemOs, RecordingSteps, phase};

    fn layout() -> Layout {
        Layout::new(Path::from("src/tre"), Path::from("build"))
    }

    #[test]
    fn test_only_flx_files() {
        let os = MemOs::new().with_files([
            "src/tre/tre.flx",
            "src/tre/posix.flx",
            "src/tre/regcomp.c",
            "src/tre/tre-regex.h",
            "src/tre/flx.txt",
            "src/tre/._tre.flx",
            "src/tre/nested/inner.flx",
        ]);
        let steps = RecordingSteps::new();
        let staged = build_flx(&os, &steps, &phase(), &layout()).unwrap();

        assert_eq!(
            steps.calls(),
            vec![Call::CopyFlxs(
                Path::from("build/lib"),
                vec![Path::from("src/tre/posix.flx"), Path::from("src/tre/tre.flx")]
            )]
        );
        assert_eq!(
            staged,
            vec![Path::from("build/lib/posix.flx"), Path::from("build/lib/tre.flx")]
        );
    }

    #[test]
    fn test_no_matches() {
        let os = MemOs::new().with_files(["src/tre/regcomp.c"]);
        let steps = RecordingSteps::new();
        let staged = build_flx(&os, &steps, &phase(), &layout()).unwrap();

        assert!(staged.is_empty());
        assert_eq!(
            steps.calls(),
            vec![Call::CopyFlxs(Path::from("build/lib"), vec![])]
        );
    }

    #[test]
    fn test_stable_destinations() {
        let os = MemOs::new().with_files(["src/tre/tre.flx"]);
        let steps = RecordingSteps::new();
        let first = build_flx(&os, &steps, &phase(), &layout()).unwrap();
        let second = build_flx(&os, &steps, &phase(), &layout()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_copy_error_propagates() {
        let os = MemOs::new().with_files(["src/tre/tre.flx"]);
        let steps = RecordingSteps::new().failing_on("copy_flxs_to_lib");
        let err = build_flx(&os, &steps, &phase(), &layout()).unwrap_err();
        assert_eq!(err.to_string(), "copy_flxs_to_lib failed");
    }
}
