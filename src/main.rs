use color_eyre::eyre;
use contract_tool::cli::{self, opt::Options};

fn main() -> eyre::Result<()> {
    let opt: Options = cli::init()?;
    cli::run(opt)
}
