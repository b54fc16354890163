use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::Result;

use crate::{
  app::App,
  cli::Cli,
  config::Config,
  store::JsonFileStore,
  utils::{get_data_dir, initialize_logging, initialize_panic_handler},
};

pub mod action;
pub mod app;
pub mod cli;
pub mod components;
pub mod config;
pub mod error;
pub mod form;
pub mod mode;
pub mod store;
pub mod tui;
pub mod utils;

async fn tokio_main() -> Result<()> {
  initialize_logging()?;
  initialize_panic_handler()?;

  let args = Cli::parse();
  let config = Config::new()?;

  let data_file = args
    .data_file
    .clone()
    .or_else(|| config.data_file.clone())
    .unwrap_or_else(|| get_data_dir().join("items.json"));
  let store = Arc::new(JsonFileStore::new(data_file));

  let mut app = App::new(config, store, args.tick_rate, args.frame_rate)?;
  app.run().await?;

  Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
  if let Err(e) = tokio_main().await {
    eprintln!("{} error: Something went wrong", env!("CARGO_PKG_NAME"));
    Err(e)
  } else {
    Ok(())
  }
}
