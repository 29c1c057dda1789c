use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Context;
use clap::{Parser, ValueEnum};

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Target {
    /// Stage the runtime headers and build the static and shared libraries
    Runtime,

    /// Copy the .flx sources into the library directory
    Flx,

    /// Both of the above
    All,
}

impl Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Target::Runtime => "runtime",
            Target::Flx => "flx",
            Target::All => "all",
        };
        write!(f, "{s}")
    }
}

#[derive(Parser, Debug)]
#[command(name = "tre-rtl")]
#[command(about = "Build the TRE regex runtime library")]
#[command(version)]
pub struct Args {
    /// What to build
    #[arg(long, value_name = "target", default_value = "all")]
    pub target: Target,

    /// Build root directory
    #[arg(long, value_name = "dir", default_value = "build")]
    pub buildroot: PathBuf,

    /// Set build options (can be used multiple times)
    #[arg(short = 'D', value_name = "option=value")]
    pub define: Vec<Define>,

    /// TRE source directory
    #[arg(default_value = "src/tre")]
    pub source_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Define {
    pub key: String,
    pub value: String,
}

impl FromStr for Define {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (key, value) = s.split_once("=").context("No value specified for option")?;
        Ok(Define {
            key: key.to_string(),
            value: value.to_string(),
        })
    }
}

pub fn parse() -> Args {
    Args::parse()
}
