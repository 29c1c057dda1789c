use tracing_subscriber::EnvFilter;
use tre_rtl::Tre;

mod cli;
mod os;
mod steps;

use cli::Target;
use steps::Library;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = cli::parse();

    let mut tre = Tre::new(os::Os, steps::Steps);
    tre.option("source_dir", args.source_dir.to_string_lossy());
    for define in args.define {
        tre.option(define.key, define.value);
    }

    let buildroot = args.buildroot.to_string_lossy();
    let phase = tre.phase()?;
    tracing::debug!(?phase, "Resolved build phase");
    tracing::info!("Building target '{}' into {buildroot}", args.target);

    if matches!(args.target, Target::Runtime | Target::All) {
        let libs = tre.build_runtime(&phase, &buildroot)?;
        for key in ["static", "shared"] {
            let Some(lib) = libs.get(key) else { continue };
            let objects = lib.downcast_ref::<Library>().map_or(0, |l| l.objects);
            tracing::info!("Built {key} library {} ({objects} objects)", lib.path());
        }
    }

    if matches!(args.target, Target::Flx | Target::All) {
        let staged = tre.build_flx(&phase, &buildroot)?;
        tracing::info!("Staged {} flx files", staged.len());
    }

    Ok(())
}
