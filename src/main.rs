//! Command-line entry point: print and optionally bundle the DLLs of a binary.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use leviso_pe::{bundle, Blacklist, BundleError, BundleOptions, Objdump, SearchPaths};

/// Find the DLLs a mingw-built EXE or DLL needs, and optionally copy them next to it.
///
/// Search directories come from MINGW_BUNDLEDLLS_SEARCH_PATH (path-separator
/// delimited) when set, otherwise from a built-in list of mingw locations.
#[derive(Parser, Debug)]
#[command(name = "leviso-pe", version)]
struct Cli {
    /// EXE or DLL file that you need to bundle dependencies for
    exe_file: PathBuf,

    /// In addition to printing out the dependencies, also copy them next to EXE_FILE
    #[arg(long)]
    copy: bool,

    /// Only valid with --copy. Run UPX on all the DLLs and EXE
    #[arg(long)]
    upx: bool,

    /// objdump to read import tables with
    #[arg(long, value_name = "PROGRAM", default_value = "objdump")]
    objdump: String,

    /// Compressor invoked by --upx
    #[arg(long, value_name = "PROGRAM", default_value = "upx")]
    upx_program: String,

    /// Enable verbose/debug output
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let options = BundleOptions::new(cli.copy, cli.upx)?.with_upx_program(cli.upx_program);
    let search_paths = SearchPaths::from_env();
    let blacklist = Blacklist::default();
    let objdump = Objdump::new(cli.objdump);
    tracing::debug!(
        dirs = ?search_paths.dirs(),
        objdump = objdump.program(),
        blacklisted = blacklist.len(),
        "resolution settings"
    );

    let stdout = io::stdout();
    bundle(
        &cli.exe_file,
        &options,
        &search_paths,
        &blacklist,
        &objdump,
        &mut stdout.lock(),
    )
    .with_context(|| format!("Failed to bundle dependencies of {}", cli.exe_file.display()))?;
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            let code = err
                .downcast_ref::<BundleError>()
                .map_or(1, BundleError::exit_code);
            ExitCode::from(code)
        }
    }
}
