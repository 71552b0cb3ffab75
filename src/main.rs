use anyhow::Result;

use ingress2albconfig::{app::App, cmd::Command, config::Config, logging::Logger};

fn main() -> Result<()> {
    let cmd = Command::init();

    let config = Config::load(cmd.config_load_option())?;

    if cmd.logging {
        Logger::init(&config.logging)?;
    }

    App::run(cmd, config)
}
