use std::path::PathBuf;

use flappy_engine::SimConfig;

use crate::util::Output;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct DumpConfigArg {
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &DumpConfigArg) -> anyhow::Result<()> {
    Output::save_json(&SimConfig::default(), arg.output.clone())
}
