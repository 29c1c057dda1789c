#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod config;
pub mod error;
pub mod flx;
pub mod glob;
pub mod os;
pub mod path;
pub mod phase;
pub mod runtime;
pub mod steps;

#[cfg(test)]
mod testutil;

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashMap;

use crate::config::{Config, DEFAULT_SOURCE_DIR, Layout};
use crate::path::Path;
use crate::phase::Phase;
pub use crate::runtime::RuntimeLibs;

/// Build description for the TRE runtime library.
///
/// Owns the platform and framework implementations and the string options,
/// and exposes the two entry points the orchestrator calls.
pub struct Tre {
    os: Rc<dyn os::Os>,
    steps: Rc<dyn steps::BuildSteps>,
    options: HashMap<String, String>,
}

impl Tre {
    pub fn new(os: impl os::Os, steps: impl steps::BuildSteps) -> Self {
        let os = Rc::new(os);
        let steps = Rc::new(steps);
        let options = Default::default();
        Self { os, steps, options }
    }

    pub fn option(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.options.insert(name.into(), value.into());
        self
    }

    pub fn phase(&self) -> anyhow::Result<Phase> {
        Phase::from_os(self.os.as_ref())
    }

    fn layout(&self, buildroot: &str) -> anyhow::Result<(Config, Layout)> {
        let config = Config::from_options(&self.options)?;
        let layout = config.layout(&Path::from(DEFAULT_SOURCE_DIR), &Path::from(buildroot));
        Ok((config, layout))
    }

    /// Stages the runtime headers and builds `libtre` under `buildroot`.
    pub fn build_runtime(
        &self,
        phase: &Phase,
        buildroot: impl AsRef<str>,
    ) -> anyhow::Result<RuntimeLibs> {
        let (config, layout) = self.layout(buildroot.as_ref())?;
        runtime::build_runtime(
            self.os.as_ref(),
            self.steps.as_ref(),
            phase,
            &layout,
            &config,
        )
    }

    /// Copies the `.flx` sources into the library directory under `buildroot`.
    pub fn build_flx(
        &self,
        builder: &Phase,
        buildroot: impl AsRef<str>,
    ) -> anyhow::Result<Vec<Path>> {
        let (_, layout) = self.layout(buildroot.as_ref())?;
        flx::build_flx(self.os.as_ref(), self.steps.as_ref(), builder, &layout)
    }
}
