use std::env::consts::{ARCH, OS};
use std::path::Path;
use std::{env, fs};

use anyhow::{Context, bail};
use tre_rtl::os::{self, CompilerInfo};
use tre_rtl::path::Path as OsPath;

pub struct Os;

const ENDIAN: &str = if cfg!(target_endian = "little") {
    "little"
} else {
    "big"
};

impl os::Os for Os {
    fn print(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    fn build_machine(&self) -> os::Result<os::MachineInfo> {
        Ok(os::MachineInfo {
            system: OS.into(),
            cpu: ARCH.into(),
            endian: ENDIAN.into(),
        })
    }

    fn host_machine(&self) -> os::Result<os::MachineInfo> {
        let system = env::var("CARGO_CFG_TARGET_OS").unwrap_or(OS.into());
        let cpu = env::var("CARGO_CFG_TARGET_ARCH").unwrap_or(ARCH.into());
        let endian = env::var("CARGO_CFG_TARGET_ENDIAN").unwrap_or(ENDIAN.into());
        Ok(os::MachineInfo {
            system,
            cpu,
            endian,
        })
    }

    fn is_dir(&self, path: &OsPath) -> os::Result<bool> {
        Ok(Path::new(path.as_ref()).is_dir())
    }

    fn list_dir(&self, path: &OsPath) -> os::Result<Vec<OsPath>> {
        let entries = fs::read_dir(path.as_ref())
            .with_context(|| format!("Failed to read directory {path}"))?;
        entries
            .map(|entry| -> os::Result<OsPath> {
                let entry = entry?;
                let name = entry.file_name().to_string_lossy().into_owned();
                Ok(path.join(name))
            })
            .collect()
    }

    fn get_compiler(&self, lang: &str) -> os::Result<CompilerInfo> {
        match lang {
            "c" => {
                let cc = env::var("CC").unwrap_or_else(|_| "cc".into());
                let bin = which::which(&cc).with_context(|| format!("C compiler '{cc}' not found"))?;
                let flags = env::var("CFLAGS").unwrap_or_default();
                let flags = flags.split_whitespace().map(String::from).collect();
                Ok(CompilerInfo {
                    bin: OsPath::from(bin.to_string_lossy().into_owned()),
                    flags,
                })
            }
            _ => bail!("Unsupported language: {lang}"),
        }
    }
}
