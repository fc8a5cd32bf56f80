use std::time::Instant;

use log::{debug, error, info};

use galley::{Cookbook, JsonDir, LoadOptions, Publisher};
use galley::error::Result;
use galley::fstree::FsTree;
use galley::publish::DOCUMENTS;

use crate::config::Config;
use crate::discover::Layout;

mod config;
mod discover;
mod util;

pub const CONFIG_FILE: &str = "cookbook.toml";
pub const PATH_PREFIX_VAR: &str = "PATH_PREFIX";
pub const CONTENT_DIRS: &[&str] = &["src/content", "content"];
pub const IMAGE_DIRS: &[&str] = &["src/images", "images"];
pub const DATA_DIR: &str = "_data";

mod flags {
    use std::path::PathBuf;

    xflags::xflags! {
        /// Loads a cookbook site's recipes and writes the data its templates read.
        cmd cookbook {
            /// The site directory.
            required site: PathBuf
            /// Where to write the data files.
            optional -o, --output output: PathBuf
            /// Keep recipes marked as drafts.
            optional --drafts
            /// Fail on recipes that do not pass schema validation.
            optional --validate
            /// Log every file as it is processed.
            optional -v, --verbose
        }
    }
}

pub fn main() {
    let flags = flags::Cookbook::from_env_or_exit();
    let filter = if flags.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    if let Err(e) = run(flags) {
        error!("{e}");
        std::process::exit(1);
    }
}

fn run(flags: flags::Cookbook) -> Result<()> {
    let start = Instant::now();
    let tree = FsTree::build(&flags.site, 2)?;
    let config = Config::discover(&tree)?;
    let layout = Layout::discover(&tree, &config)?;

    let options = LoadOptions {
        include_drafts: flags.drafts || config.settings.drafts,
        validate: flags.validate || config.settings.validate,
    };

    debug!("content root: {}", layout.content_root.display());
    let cookbook = Cookbook::new(layout.loader(options));
    let library = cookbook.library()?;

    let output = flags.output.unwrap_or(layout.output);
    JsonDir::new(&output).publish(&library, &config.prefix)?;
    info!("wrote {} documents to {} in {}ms",
        DOCUMENTS.len(), output.display(), start.elapsed().as_millis());

    Ok(())
}
