use eyre::Result;
use std::path::PathBuf;

use super::{load_document, print_structured};
use crate::cli::{MergeMode, OutputFormat};
use mixkit::config::Config;
use mixkit::merge::{MixMode, OwnMembers, mix};
use mixkit::value::Value;

pub fn run(files: &[PathBuf], mode: Option<MergeMode>, format: Option<OutputFormat>, config: &Config) -> Result<()> {
    let mode = mode.map(MixMode::from).unwrap_or(config.merge.mode);

    let mut documents = files
        .iter()
        .map(|path| load_document(&Config::expand_path(path)))
        .collect::<Result<Vec<_>>>()?;
    if documents.is_empty() {
        eyre::bail!("Nothing to merge");
    }

    let mut target = documents.remove(0);
    let sources: Vec<&dyn OwnMembers> = documents.iter().map(|d| d as &dyn OwnMembers).collect();
    log::info!("Merging {} sources ({:?})", sources.len(), mode);
    mix(mode, &mut target, &sources);

    let merged = Value::from(target).to_json();
    if !print_structured(OutputFormat::resolve(format), &merged)? {
        println!("{}", serde_json::to_string_pretty(&merged)?);
    }

    Ok(())
}
