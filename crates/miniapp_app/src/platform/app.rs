use std::io::{self, Write};
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use miniapp_engine::{
    ApiGateway, FileLocalStorage, GatewaySettings, ReqwestGateway, SessionController,
};
use miniapp_logging::{miniapp_debug, miniapp_info, miniapp_warn};
use tokio::io::{AsyncBufReadExt, BufReader};

use super::command::{self, Command, HELP_TEXT};
use super::config::{AppConfig, Args};
use super::host::{load_launch_context, TerminalNavigator};
use super::{logging, ui};

pub fn run_app() -> anyhow::Result<()> {
    let args = Args::parse();
    let config =
        AppConfig::load(&args, |key| std::env::var(key).ok()).context("loading configuration")?;
    logging::initialize(config.log_destination);
    miniapp_info!(
        "Starting mini app api_base={} storage_dir={:?}",
        config.api_base,
        config.storage_dir
    );

    // One thread: every request is awaited where the user triggered it.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("starting async runtime")?;
    runtime.block_on(run(config))
}

async fn run(config: AppConfig) -> anyhow::Result<()> {
    let gateway = Arc::new(
        ReqwestGateway::new(GatewaySettings {
            base_url: config.api_base.clone(),
        })
        .context("configuring API gateway")?,
    );
    let launch = Arc::new(load_launch_context(config.launch_file.as_deref(), |key| {
        std::env::var(key).ok()
    })?);
    let storage = Arc::new(FileLocalStorage::new(config.storage_dir.clone()));

    let mut controller =
        SessionController::new(gateway.clone(), launch, storage, Arc::new(TerminalNavigator));
    controller.start().await;
    print_screen(&mut controller);
    println!("Type `help` for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print_prompt();
        let Some(line) = lines.next_line().await.context("reading stdin")? else {
            break;
        };
        match command::parse(&line) {
            None => {}
            Some(Command::Quit) => break,
            Some(Command::Help) => println!("{HELP_TEXT}"),
            Some(Command::Health) => match gateway.health().await {
                Ok(()) => println!("API at {} is healthy.", gateway.base_url()),
                Err(err) => {
                    miniapp_warn!("Health check failed: {}", err);
                    println!("API at {} is not healthy: {err}", gateway.base_url());
                }
            },
            Some(Command::Dispatch(msg)) => {
                controller.dispatch(msg).await;
                if controller.consume_dirty() {
                    print_view(&controller);
                }
            }
            Some(Command::Unknown(input)) => {
                println!("Unknown command `{input}`. Type `help` for commands.");
            }
        }
    }

    miniapp_info!("Mini app exiting");
    Ok(())
}

fn print_screen(controller: &mut SessionController) {
    controller.consume_dirty();
    print_view(controller);
}

fn print_view(controller: &SessionController) {
    for line in ui::render::render(&controller.view()) {
        println!("{line}");
    }
}

fn print_prompt() {
    if let Err(err) = write_prompt(&mut io::stdout()) {
        miniapp_debug!("Failed to show input prompt: {}", err);
    }
}

fn write_prompt(out: &mut impl Write) -> io::Result<()> {
    out.write_all(b"> ")?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }
    }

    #[test]
    fn prompt_is_written_and_flushed() {
        let mut out = Vec::new();
        write_prompt(&mut out).unwrap();
        assert_eq!(out, b"> ");
    }

    #[test]
    fn prompt_flush_failure_is_reported() {
        let err = write_prompt(&mut BrokenPipe).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }
}
