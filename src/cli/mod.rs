//! Command line interface
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use color_eyre::eyre::{self, WrapErr};
use contract_pdf::{asset::AssetRef, generate, GenerateOptions, Generated, MetaInfo};
use env_logger::Env;
use futures_lite::future::block_on;
use log::{info, LevelFilter};

pub mod opt;
pub mod record;

use opt::Options;

/// Set up CLI
pub fn init<T: clap::Parser>() -> color_eyre::Result<T> {
    color_eyre::install()?;
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .format_timestamp(None)
        .parse_env(Env::new().filter("CONTRACT_TOOL_LOG"))
        .init();
    let args = T::parse();
    Ok(args)
}

#[cfg(feature = "http")]
fn source(root: PathBuf) -> contract_pdf::asset::HttpSource {
    contract_pdf::asset::HttpSource::new(root)
}

#[cfg(not(feature = "http"))]
fn source(root: PathBuf) -> contract_pdf::asset::FsSource {
    contract_pdf::asset::FsSource::new(root)
}

/// Generate the contract for the record in `opt`
pub fn run(opt: Options) -> eyre::Result<()> {
    let record = record::read(&opt.record)?;

    let options = GenerateOptions {
        logo: opt.logo.as_deref().map(AssetRef::parse),
        signature: opt.signature.as_deref().map(AssetRef::parse),
        meta: MetaInfo {
            title: opt.title.clone(),
            ..MetaInfo::default()
        },
        ..GenerateOptions::default()
    };

    let cwd = std::env::current_dir().wrap_err("Failed to get the working directory")?;
    let generated = block_on(generate(&record, &source(cwd), &options))
        .wrap_err_with(|| format!("Failed to generate a contract for `{}`", opt.record.display()))?;

    handle_out(opt.out.as_deref(), &generated)
}

/// Write the PDF to stdout (`-`) or into a folder
pub fn handle_out(out: Option<&Path>, generated: &Generated) -> eyre::Result<()> {
    if out == Some(Path::new("-")) {
        let stdout = std::io::stdout();
        let mut stdolock = stdout.lock();
        stdolock.write_all(&generated.bytes)?;
        stdolock.flush()?;
        Ok(())
    } else {
        let dir = out.unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(dir)
            .wrap_err_with(|| format!("Failed to create `{}`", dir.display()))?;
        let path = dir.join(&generated.file_name);
        let out_file = File::create(&path)
            .wrap_err_with(|| format!("Failed to create `{}`", path.display()))?;
        let mut out_buf = BufWriter::new(out_file);
        info!("Writing `{}` ...", path.display());
        out_buf.write_all(&generated.bytes)?;
        out_buf.flush()?;
        info!("Done! ({} pages)", generated.pages);
        Ok(())
    }
}
