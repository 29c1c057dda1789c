use crate::os::{CompilerInfo, MachineInfo, Os, Result};

/// Toolchain and machine settings for one build.
///
/// The adapter reads it and hands it to the compile primitives. It is also the
/// builder context of [`build_flx`](crate::flx::build_flx), which ignores it.
#[derive(Debug, Clone, PartialEq)]
pub struct Phase {
    pub build_machine: MachineInfo,
    pub host_machine: MachineInfo,
    pub c: CompilerInfo,
}

impl Phase {
    pub fn from_os(os: &dyn Os) -> Result<Self> {
        Ok(Self {
            build_machine: os.build_machine()?,
            host_machine: os.host_machine()?,
            c: os.get_compiler("c")?,
        })
    }
}
