use anyhow::Result;
use log::info;

use mailbackup::config::Config;
use mailbackup::gui::{self, Theme};

fn main() -> Result<()> {
    // Load .env if present
    dotenv::dotenv().ok();

    env_logger::init();

    let config = Config::new()?;
    info!("Starting mailbackup window ({}:{})", config.imap.server, config.imap.port);

    gui::run(config, Theme::from_env()).map_err(|err| anyhow::anyhow!(err.to_string()))
}
