use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::rc::Rc;

use anyhow::{Context, bail};
use tre_rtl::os::MachineInfo;
use tre_rtl::path::Path as OsPath;
use tre_rtl::phase::Phase;
use tre_rtl::steps::{self, Artifact, ArtifactKind, CLibrary, ConfigureFile};

/// Build steps that run directly against the local file system and toolchain.
///
/// Every call rebuilds from scratch.
pub struct Steps;

#[derive(Debug)]
pub struct Library {
    pub kind: ArtifactKind,
    pub path: OsPath,
    pub objects: usize,
}

impl Artifact for Library {
    fn kind(&self) -> ArtifactKind {
        self.kind
    }

    fn path(&self) -> &OsPath {
        &self.path
    }
}

/// Output file for a library whose destination stem is `dst`.
pub fn library_file(dst: &OsPath, kind: ArtifactKind, host: &MachineInfo) -> OsPath {
    let name = dst.file_name();
    let file = match (kind, host.system.as_str()) {
        (ArtifactKind::StaticLibrary, "windows") => format!("{name}.lib"),
        (ArtifactKind::StaticLibrary, _) => format!("lib{name}.a"),
        (ArtifactKind::SharedLibrary, "windows") => format!("{name}.dll"),
        (ArtifactKind::SharedLibrary, "macos" | "ios") => format!("lib{name}.dylib"),
        (ArtifactKind::SharedLibrary, _) => format!("lib{name}.so"),
    };
    dst.parent().join(file)
}

fn copy_into(dir: &OsPath, files: &[OsPath]) -> anyhow::Result<Vec<OsPath>> {
    fs::create_dir_all(dir.as_ref()).with_context(|| format!("Failed to create {dir}"))?;
    files
        .iter()
        .map(|file| -> anyhow::Result<OsPath> {
            let dst = dir.join(file.file_name());
            tracing::debug!("Copying {file} to {dst}");
            fs::copy(file.as_ref(), dst.as_ref())
                .with_context(|| format!("Failed to copy {file} to {dst}"))?;
            Ok(dst)
        })
        .collect()
}

fn run(cmd: &mut Command) -> anyhow::Result<()> {
    tracing::debug!("Running command: {cmd:?}");
    let output = cmd
        .output()
        .with_context(|| format!("Failed to run {:?}", cmd.get_program()))?;
    if !output.status.success() {
        bail!(
            "{:?} exited with {}:\n{}",
            cmd.get_program(),
            output.status,
            String::from_utf8_lossy(&output.stderr)
        );
    }
    Ok(())
}

/// Only gcc-style drivers (gcc, clang, MinGW) understand the flags used here.
fn check_gcc_style(phase: &Phase) -> anyhow::Result<()> {
    let bin = Path::new(phase.c.bin.as_ref());
    let stem = bin
        .file_stem()
        .map(|s| s.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    if stem == "cl" || stem == "clang-cl" {
        bail!(
            "MSVC-style compiler '{}' is not supported; use a gcc-style toolchain such as MinGW",
            phase.c.bin
        );
    }
    Ok(())
}

fn compile_objects(
    phase: &Phase,
    lib: &CLibrary,
    pic: bool,
    obj_dir: &Path,
) -> anyhow::Result<Vec<PathBuf>> {
    check_gcc_style(phase)?;
    lib.sources
        .iter()
        .map(|src| -> anyhow::Result<PathBuf> {
            let obj = obj_dir.join(OsPath::from(src.file_name()).set_extension("o").as_ref());

            let mut cmd = Command::new(phase.c.bin.as_ref());
            cmd.args(&phase.c.flags).arg("-c");
            if pic && !phase.host_machine.is_windows() {
                cmd.arg("-fPIC");
            }
            for dir in &lib.include_dirs {
                cmd.arg(format!("-I{dir}"));
            }
            for macro_name in &lib.macros {
                cmd.arg(format!("-D{macro_name}"));
            }
            cmd.arg(src.as_ref()).arg("-o").arg(&obj);

            run(&mut cmd).with_context(|| format!("Failed to compile {src}"))?;
            Ok(obj)
        })
        .collect()
}

/// Scratch directory for object files, next to the final library.
fn object_dir(out: &OsPath) -> anyhow::Result<tempfile::TempDir> {
    let parent = out.parent();
    let parent = if parent.as_ref().is_empty() {
        OsPath::from(".")
    } else {
        parent
    };
    fs::create_dir_all(parent.as_ref()).with_context(|| format!("Failed to create {parent}"))?;
    tempfile::Builder::new()
        .prefix(".tre-obj")
        .tempdir_in(parent.as_ref())
        .context("Failed to create object directory")
}

impl steps::BuildSteps for Steps {
    fn configure_file(&self, file: &ConfigureFile) -> anyhow::Result<()> {
        tracing::info!("Writing {} bytes to {}", file.content.len(), file.path);
        let parent = file.path.parent();
        if !parent.as_ref().is_empty() {
            fs::create_dir_all(parent.as_ref())
                .with_context(|| format!("Failed to create {parent}"))?;
        }
        fs::write(file.path.as_ref(), &file.content)
            .with_context(|| format!("Failed to write {}", file.path))
    }

    fn copy_hpps_to_rtl(&self, rtl_dir: &OsPath, headers: &[OsPath]) -> anyhow::Result<Vec<OsPath>> {
        tracing::info!("Installing {} headers to {rtl_dir}", headers.len());
        copy_into(rtl_dir, headers)
    }

    fn copy_flxs_to_lib(&self, lib_dir: &OsPath, files: &[OsPath]) -> anyhow::Result<Vec<OsPath>> {
        tracing::info!("Copying {} files to {lib_dir}", files.len());
        copy_into(lib_dir, files)
    }

    fn build_c_static_lib(&self, phase: &Phase, lib: &CLibrary) -> anyhow::Result<Rc<dyn Artifact>> {
        let out = library_file(&lib.dst, ArtifactKind::StaticLibrary, &phase.host_machine);
        tracing::info!("Building static library: {out}");

        let obj_dir = object_dir(&out)?;
        let objects = compile_objects(phase, lib, false, obj_dir.path())?;

        let ar = env::var("AR").unwrap_or_else(|_| "ar".into());
        let ar = which::which(&ar).with_context(|| format!("Archiver '{ar}' not found"))?;
        // `ar rcs` appends to an existing archive.
        match fs::remove_file(out.as_ref()) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => {
                return Err(e).with_context(|| format!("Failed to remove stale {out}"));
            }
            _ => {}
        }
        run(Command::new(ar).arg("rcs").arg(out.as_ref()).args(&objects))
            .with_context(|| format!("Failed to archive {out}"))?;

        Ok(Rc::new(Library {
            kind: ArtifactKind::StaticLibrary,
            path: out,
            objects: objects.len(),
        }))
    }

    fn build_c_shared_lib(&self, phase: &Phase, lib: &CLibrary) -> anyhow::Result<Rc<dyn Artifact>> {
        let out = library_file(&lib.dst, ArtifactKind::SharedLibrary, &phase.host_machine);
        tracing::info!("Building shared library: {out}");

        let obj_dir = object_dir(&out)?;
        let objects = compile_objects(phase, lib, true, obj_dir.path())?;

        run(Command::new(phase.c.bin.as_ref())
            .args(&phase.c.flags)
            .arg("-shared")
            .arg("-o")
            .arg(out.as_ref())
            .args(&objects))
        .with_context(|| format!("Failed to link {out}"))?;

        Ok(Rc::new(Library {
            kind: ArtifactKind::SharedLibrary,
            path: out,
            objects: objects.len(),
        }))
    }
}
