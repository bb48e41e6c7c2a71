use crate::config::AppConfig;
use crate::errors::AppResult;
use clap::Args;

#[derive(Args)]
pub struct ShowConfigCommand {}

impl ShowConfigCommand {
    pub fn run(&self) -> AppResult<()> {
        let config = AppConfig::load()?;
        print!("{}", config.to_toml()?);
        Ok(())
    }
}
