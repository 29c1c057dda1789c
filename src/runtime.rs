use alloc::format;
use alloc::rc::Rc;
use alloc::string::ToString as _;
use alloc::vec;
use alloc::vec::Vec;

use hashbrown::HashSet;

use crate::config::{BUILD_MACRO, Config, EmptySources, Layout};
use crate::error::{TreError, bail_collision_error};
use crate::os::{Os, Path, Result};
use crate::phase::Phase;
use crate::steps::{Artifact, BuildSteps, CLibrary};

/// The static and shared runtime libraries of one build.
#[derive(Debug, Clone)]
pub struct RuntimeLibs {
    pub static_lib: Rc<dyn Artifact>,
    pub shared_lib: Rc<dyn Artifact>,
}

impl RuntimeLibs {
    /// Looks an artifact up by record key, `"static"` or `"shared"`.
    pub fn get(&self, key: &str) -> Option<&Rc<dyn Artifact>> {
        match key {
            "static" => Some(&self.static_lib),
            "shared" => Some(&self.shared_lib),
            _ => None,
        }
    }
}

/// Proof that the runtime headers are in place. Compiling requires one.
#[derive(Debug)]
pub struct StagedHeaders {
    pub include_dir: Path,
    pub headers: Vec<Path>,
}

/// Stages the runtime headers, then builds the static and shared libraries.
pub fn build_runtime(
    os: &dyn Os,
    steps: &dyn BuildSteps,
    phase: &Phase,
    layout: &Layout,
    config: &Config,
) -> Result<RuntimeLibs> {
    let staged = stage_headers(steps, phase, layout, config)?;
    compile(os, steps, phase, layout, config, &staged)
}

pub fn stage_headers(
    steps: &dyn BuildSteps,
    phase: &Phase,
    layout: &Layout,
    config: &Config,
) -> Result<StagedHeaders> {
    let include_dir = layout.include_dir();
    let generated = config.config_header(layout, &phase.host_machine);
    let verbatim = layout.verbatim_headers();

    check_collisions(
        &include_dir,
        core::iter::once(&generated.path).chain(verbatim.iter()),
    )?;

    steps.configure_file(&generated)?;
    let copied = steps.copy_hpps_to_rtl(&include_dir, &verbatim)?;

    let mut headers = vec![generated.path];
    headers.extend(copied);
    Ok(StagedHeaders {
        include_dir,
        headers,
    })
}

pub fn compile(
    os: &dyn Os,
    steps: &dyn BuildSteps,
    phase: &Phase,
    layout: &Layout,
    config: &Config,
    staged: &StagedHeaders,
) -> Result<RuntimeLibs> {
    let glob = layout.c_sources();
    let sources = glob.expand(os)?;

    if sources.is_empty() {
        match config.empty_sources {
            EmptySources::Allow => os.print(&format!("No C sources match {glob}")),
            EmptySources::Error => return Err(TreError::EmptySources(glob.to_string().into()).into()),
        }
    }

    let lib = CLibrary {
        dst: layout.lib_dst(),
        sources,
        include_dirs: vec![staged.include_dir.clone()],
        macros: vec![BUILD_MACRO.to_string()],
    };

    os.print(&format!(
        "Building {} from {} sources",
        lib.dst,
        lib.sources.len()
    ));

    let static_lib = steps.build_c_static_lib(phase, &lib)?;
    let shared_lib = steps.build_c_shared_lib(phase, &lib)?;

    Ok(RuntimeLibs {
        static_lib,
        shared_lib,
    })
}

/// Rejects two files that would land on the same name in `dir`.
pub(crate) fn check_collisions<'a>(
    dir: &Path,
    files: impl IntoIterator<Item = &'a Path>,
) -> Result<()> {
    let mut seen = HashSet::new();
    for file in files {
        if !seen.insert(file.file_name()) {
            bail_collision_error!("'{}' staged twice into {dir}", file.file_name());
        }
    }
    Ok(())
}
