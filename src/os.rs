use alloc::string::String;
use alloc::vec::Vec;

pub use crate::path::Path;

pub type Result<T> = anyhow::Result<T>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineInfo {
    pub system: String,
    pub cpu: String,
    pub endian: String,
}

impl MachineInfo {
    pub fn is_windows(&self) -> bool {
        self.system == "windows"
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerInfo {
    pub bin: Path,
    pub flags: Vec<String>,
}

/// Platform view the adapter runs against.
///
/// Everything the adapter learns about the machine or the file system goes
/// through this trait, so a build description can be evaluated against a
/// real disk or an in-memory tree alike.
pub trait Os: 'static {
    // output
    fn print(&self, msg: &str);

    // machine
    fn build_machine(&self) -> Result<MachineInfo>;
    fn host_machine(&self) -> Result<MachineInfo>;

    // fs
    fn is_dir(&self, path: &Path) -> Result<bool>;
    /// Entries of `path` as full paths (`path` joined with each name).
    fn list_dir(&self, path: &Path) -> Result<Vec<Path>>;

    // compiler
    fn get_compiler(&self, lang: &str) -> Result<CompilerInfo>;
}
