mod cli;
mod config;
mod dispatch;
mod fetcher;
mod render;
mod spinner;
mod terminal;
#[cfg(test)]
mod test_utils;
mod text;

use crate::cli::Args;
use crate::config::{ensure_config_file, load_config, resolve_config_path};
use crate::dispatch::dispatch;
use crate::fetcher::QueryFetcher;
use crate::render::{render, write_lines};
use crate::spinner::Spinner;
use crate::terminal::{enable_virtual_terminal, header_style, init_tracing, stdout_is_terminal};
use clap::Parser;
use jira_client::{JiraApiContext, JiraClient};
use protocol::config::QjConfig;
use protocol::Query;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use system_utils::process::{editor_argv, run_attached};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    enable_virtual_terminal();
    let args = Args::parse();
    init_tracing(args.log_to_stderr)?;

    let config_path = resolve_config_path(args.config.as_deref())?;
    if args.show_config_path {
        println!("config file location: {}", config_path.display());
        return Ok(());
    }
    if args.edit_config {
        return edit_config(&config_path).await;
    }

    let config = load_config(&config_path)?;
    let queries = select_queries(&config, args.query.as_deref());
    if queries.is_empty() {
        warn!(config = %config_path.display(), "no queries configured");
    }
    let timeout = config.request_timeout().map_err(anyhow::Error::msg)?;
    let client = JiraClient::new(
        JiraApiContext {
            email: config.email,
            api_key: config.api_key,
            base_url: config.base_url,
        },
        timeout,
    )?;
    info!(url = %client.search_url(), queries = queries.len(), "qj starting");
    let fetcher = QueryFetcher::new(Arc::new(client));

    let interactive = stdout_is_terminal();
    let cancel = CancellationToken::new();
    let interrupt = spawn_interrupt_watcher(cancel.clone());
    let spinner = Spinner::start(interactive);
    let started = Instant::now();
    let dispatched = dispatch(&fetcher, &queries, &cancel).await;
    spinner.stop().await;
    interrupt.abort();
    let results = dispatched?;
    info!(
        results = results.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "queries fetched"
    );

    let style = header_style(interactive, std::env::var_os("NO_COLOR").is_some());
    let lines = render(&results, &queries, style);
    write_lines(&mut std::io::stdout().lock(), &lines)?;
    Ok(())
}

/// An ad-hoc query replaces the whole configured set.
fn select_queries(config: &QjConfig, ad_hoc: Option<&str>) -> Vec<Query> {
    match ad_hoc.filter(|jql| !jql.trim().is_empty()) {
        Some(jql) => vec![Query::ad_hoc(jql)],
        None => config.queries.clone(),
    }
}

async fn edit_config(path: &Path) -> anyhow::Result<()> {
    ensure_config_file(path)?;
    let editor = std::env::var("EDITOR").ok();
    if editor.as_deref().map_or(true, |value| value.trim().is_empty()) {
        println!("no $EDITOR set, trying nvim");
    }
    let argv = editor_argv(editor.as_deref())?;
    run_attached(&argv, path, "editor").await
}

fn spawn_interrupt_watcher(cancel: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received, cancelling queries");
            cancel.cancel();
        }
    })
}
