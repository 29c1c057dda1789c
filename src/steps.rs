use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use as_any::AsAny;

use crate::os::{Path, Result};
use crate::phase::Phase;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    StaticLibrary,
    SharedLibrary,
}

/// Handle to something the build framework produced.
///
/// The adapter only needs the path; implementations attach whatever build
/// metadata they track and get it back with [`downcast_ref`](dyn Artifact::downcast_ref).
pub trait Artifact: fmt::Debug + AsAny {
    fn kind(&self) -> ArtifactKind;
    fn path(&self) -> &Path;
}

impl dyn Artifact {
    pub fn downcast_ref<T: Artifact>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}

/// A C library to compile: every source goes into one output at `dst`.
///
/// `dst` carries no platform prefix or suffix; picking `libtre.a`,
/// `tre.dll` and friends is the framework's job.
#[derive(Debug, Clone, PartialEq)]
pub struct CLibrary {
    pub dst: Path,
    pub sources: Vec<Path>,
    pub include_dirs: Vec<Path>,
    pub macros: Vec<String>,
}

/// A file whose content is generated rather than copied.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigureFile {
    pub path: Path,
    pub content: String,
}

/// Build framework primitives the adapter drives.
///
/// The adapter decides what to build and where; implementations decide how.
/// Errors returned from any method abort the calling entry point and reach
/// the caller untouched.
pub trait BuildSteps: 'static {
    /// Writes a generated file
    ///
    /// # Arguments
    /// * `file` - Target path and full content
    fn configure_file(&self, file: &ConfigureFile) -> Result<()>;

    /// Copies headers into the runtime include directory
    ///
    /// Each header keeps its file name. Returns the destination paths in the
    /// order of `headers`.
    ///
    /// # Arguments
    /// * `rtl_dir` - Runtime include directory
    /// * `headers` - Header files to copy verbatim
    fn copy_hpps_to_rtl(&self, rtl_dir: &Path, headers: &[Path]) -> Result<Vec<Path>>;

    /// Copies high-level source files into the library directory
    ///
    /// Each file keeps its file name. Returns the destination paths in the
    /// order of `files`.
    ///
    /// # Arguments
    /// * `lib_dir` - Library output directory
    /// * `files` - Files to copy verbatim
    fn copy_flxs_to_lib(&self, lib_dir: &Path, files: &[Path]) -> Result<Vec<Path>>;

    /// Compiles `lib.sources` and archives them into a static library
    ///
    /// # Arguments
    /// * `phase` - Toolchain and machine the library is built for
    /// * `lib` - Sources, include directories, macros and destination
    fn build_c_static_lib(&self, phase: &Phase, lib: &CLibrary) -> Result<Rc<dyn Artifact>>;

    /// Compiles `lib.sources` and links them into a shared library
    ///
    /// # Arguments
    /// * `phase` - Toolchain and machine the library is built for
    /// * `lib` - Sources, include directories, macros and destination
    fn build_c_shared_lib(&self, phase: &Phase, lib: &CLibrary) -> Result<Rc<dyn Artifact>>;
}
