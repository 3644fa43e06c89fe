use std::io::{self, IsTerminal, Write};

use tracing::debug;
use tracing_subscriber::EnvFilter;

use formly::cli::{self, Session};
use formly::config::Config;
use formly::error::Error;
use formly::store::{SqliteStore, Store};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("formly=warn".parse()?))
        .with_writer(io::stderr)
        .init();

    let args = cli::collect_args(std::env::args_os().skip(1))?;

    let config = Config::load()?;
    let db_path = config.ensure_data_dir()?;
    debug!("Using database at {}", db_path.display());

    let store = SqliteStore::new(&db_path)?;
    store.initialize()?;

    let result = {
        let stdin = io::stdin();
        let terminal = stdin.is_terminal();
        let mut output = io::stdout().lock();
        let session = Session {
            input: &mut stdin.lock(),
            output: &mut output,
            terminal,
        };
        let result = cli::run(&store, &args, session);
        output.flush()?;
        result
    };

    match result {
        Ok(()) => Ok(()),
        Err(Error::Cli(e)) => e.exit(),
        Err(e) => Err(e.into()),
    }
}
