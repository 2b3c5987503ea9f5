//! Command line options
use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[clap(name = "contract-tool", version, about)]
/// Generate a freelancer work contract as PDF
pub struct Options {
    /// A content record (RON, or JSON with a `.json` extension)
    pub record: PathBuf,

    /// The output folder, or `-` for stdout
    #[clap(long, short)]
    pub out: Option<PathBuf>,

    /// The cover logo: a path, an http(s) URL or a `data:` URL
    #[clap(long)]
    pub logo: Option<String>,

    /// The employer's signature, instead of the one in the record
    #[clap(long)]
    pub signature: Option<String>,

    /// The document title (defaults to the file name)
    #[clap(long)]
    pub title: Option<String>,
}
