//! In-memory `Os` and call-recording `BuildSteps` for unit tests.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use anyhow::bail;

use crate::os::{CompilerInfo, MachineInfo, Os, Path, Result};
use crate::phase::Phase;
use crate::steps::{Artifact, ArtifactKind, BuildSteps, CLibrary, ConfigureFile};

pub fn phase() -> Phase {
    let machine = MachineInfo {
        system: "linux".into(),
        cpu: "x86_64".into(),
        endian: "little".into(),
    };
    Phase {
        build_machine: machine.clone(),
        host_machine: machine,
        c: CompilerInfo {
            bin: Path::from("cc"),
            flags: vec![],
        },
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemOs {
    files: BTreeSet<Path>,
    printed: Rc<RefCell<Vec<String>>>,
}

impl MemOs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_files<'a>(mut self, files: impl IntoIterator<Item = &'a str>) -> Self {
        self.files.extend(files.into_iter().map(Path::from));
        self
    }

    pub fn printed(&self) -> Vec<String> {
        self.printed.borrow().clone()
    }

    fn dirs(&self) -> BTreeSet<Path> {
        let mut dirs = BTreeSet::new();
        for file in &self.files {
            let mut dir = file.parent();
            while !dir.as_ref().is_empty() && dirs.insert(dir.clone()) {
                dir = dir.parent();
            }
        }
        dirs
    }
}

impl Os for MemOs {
    fn print(&self, msg: &str) {
        self.printed.borrow_mut().push(msg.to_string());
    }

    fn build_machine(&self) -> Result<MachineInfo> {
        Ok(phase().build_machine)
    }

    fn host_machine(&self) -> Result<MachineInfo> {
        Ok(phase().host_machine)
    }

    fn is_dir(&self, path: &Path) -> Result<bool> {
        Ok(self.dirs().contains(path))
    }

    fn list_dir(&self, path: &Path) -> Result<Vec<Path>> {
        if !self.dirs().contains(path) {
            bail!("No such directory: {path}");
        }
        let children = self
            .files
            .iter()
            .chain(self.dirs().iter())
            .filter(|p| &p.parent() == path)
            .cloned()
            .collect::<BTreeSet<_>>();
        Ok(children.into_iter().collect())
    }

    fn get_compiler(&self, lang: &str) -> Result<CompilerInfo> {
        match lang {
            "c" => Ok(phase().c),
            _ => bail!("Unsupported language: {lang}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    ConfigureFile(Path),
    CopyHpps(Path, Vec<Path>),
    CopyFlxs(Path, Vec<Path>),
    StaticLib(CLibrary),
    SharedLib(CLibrary),
}

#[derive(Debug)]
pub struct RecordedLib {
    pub kind: ArtifactKind,
    pub lib: CLibrary,
}

impl Artifact for RecordedLib {
    fn kind(&self) -> ArtifactKind {
        self.kind
    }

    fn path(&self) -> &Path {
        &self.lib.dst
    }
}

/// Records every primitive call; clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingSteps {
    calls: Rc<RefCell<Vec<Call>>>,
    fail_on: Option<&'static str>,
}

impl RecordingSteps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(mut self, name: &'static str) -> Self {
        self.fail_on = Some(name);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn compiled(&self) -> Vec<(ArtifactKind, CLibrary)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::StaticLib(lib) => Some((ArtifactKind::StaticLibrary, lib)),
                Call::SharedLib(lib) => Some((ArtifactKind::SharedLibrary, lib)),
                _ => None,
            })
            .collect()
    }

    fn record(&self, name: &str, call: Call) -> Result<()> {
        if self.fail_on == Some(name) {
            bail!("{name} failed");
        }
        self.calls.borrow_mut().push(call);
        Ok(())
    }
}

fn copied_to(dir: &Path, files: &[Path]) -> Vec<Path> {
    files.iter().map(|f| dir.join(f.file_name())).collect()
}

impl BuildSteps for RecordingSteps {
    fn configure_file(&self, file: &ConfigureFile) -> Result<()> {
        self.record("configure_file", Call::ConfigureFile(file.path.clone()))
    }

    fn copy_hpps_to_rtl(&self, rtl_dir: &Path, headers: &[Path]) -> Result<Vec<Path>> {
        self.record(
            "copy_hpps_to_rtl",
            Call::CopyHpps(rtl_dir.clone(), headers.to_vec()),
        )?;
        Ok(copied_to(rtl_dir, headers))
    }

    fn copy_flxs_to_lib(&self, lib_dir: &Path, files: &[Path]) -> Result<Vec<Path>> {
        self.record(
            "copy_flxs_to_lib",
            Call::CopyFlxs(lib_dir.clone(), files.to_vec()),
        )?;
        Ok(copied_to(lib_dir, files))
    }

    fn build_c_static_lib(&self, _phase: &Phase, lib: &CLibrary) -> Result<Rc<dyn Artifact>> {
        self.record("build_c_static_lib", Call::StaticLib(lib.clone()))?;
        Ok(Rc::new(RecordedLib {
            kind: ArtifactKind::StaticLibrary,
            lib: lib.clone(),
        }))
    }

    fn build_c_shared_lib(&self, _phase: &Phase, lib: &CLibrary) -> Result<Rc<dyn Artifact>> {
        self.record("build_c_shared_lib", Call::SharedLib(lib.clone()))?;
        Ok(Rc::new(RecordedLib {
            kind: ArtifactKind::SharedLibrary,
            lib: lib.clone(),
        }))
    }
}
