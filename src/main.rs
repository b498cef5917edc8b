use clap::Parser;
use dfs_console::client::http::HttpStoreClient;
use dfs_console::client::store::RemoteStore;
use dfs_console::client::types::FileName;
use dfs_console::config::{Command, ConsoleConfig};
use dfs_console::files::controller::FileController;
use dfs_console::files::types::{AssumeYes, ControllerError, DeleteConfirmation};
use dfs_console::metadata::aggregator::MetadataAggregator;
use dfs_console::metadata::types::AggregationRow;
use dfs_console::reducers::distribution::{
    alive_dead_split, cluster_summary, extension_histogram,
};
use dfs_console::status::poller::StatusPoller;
use dfs_console::status::types::SystemStatus;
use std::io::{BufRead, Write};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ConsoleConfig::parse();

    tracing_subscriber::fmt()
        .with_max_level(if config.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(std::io::stderr)
        .init();

    let base_url = config.base_url();
    tracing::debug!("Using cluster API at {}", base_url);

    let store: Arc<dyn RemoteStore> = Arc::new(HttpStoreClient::new(&base_url));
    let controller = FileController::new(store.clone());

    match config.command {
        Command::Ls => {
            settle(&controller, controller.refresh_list().await)?;
            for file in controller.files() {
                println!("{}", file);
            }
        }
        Command::Cat { name } => {
            settle(&controller, controller.select(name).await)?;
            print_buffer(&controller);
        }
        Command::Create { name, content } => {
            settle(&controller, controller.create(name, &content).await)?;
            // Creation refreshes the listing; a failure there is reported but not fatal.
            if let Some(error) = controller.editor().error {
                tracing::warn!("{}", error);
            }
            if let Some(file) = controller.editor().selected_file {
                println!("created {}", file);
            }
        }
        Command::Write { name, content } => {
            settle(&controller, controller.write(name.clone(), &content).await)?;
            println!("wrote {} ({} bytes)", name, content.len());
        }
        Command::Append { name, text } => {
            settle(&controller, controller.append(name, &text).await)?;
            print_buffer(&controller);
        }
        Command::Rm { name, yes } => {
            let confirmation: &dyn DeleteConfirmation = if yes { &AssumeYes } else { &Prompt };
            match controller.delete(name.clone(), confirmation).await {
                Err(ControllerError::Declined) => println!("kept {}", name),
                result => {
                    settle(&controller, result)?;
                    println!("deleted {}", name);
                }
            }
        }
        Command::Meta { name } => {
            let aggregator = MetadataAggregator::new(store.clone());
            let distribution = aggregator.file_distribution(&FileName::from(name)).await?;
            let snapshot = &distribution.snapshot;

            println!("File:               {}", snapshot.file_name);
            println!("Total chunks:       {}", snapshot.total_chunk_count);
            println!("Replication factor: {}", snapshot.replication_factor());
            println!();
            for chunk in &snapshot.chunks {
                let nodes: Vec<String> = chunk.replica_nodes.iter().map(|n| n.to_string()).collect();
                println!(
                    "  chunk {:>4}  {} replica(s)  nodes [{}]",
                    chunk.chunk_id,
                    chunk.replica_count,
                    nodes.join(", ")
                );
            }
            println!();
            for (node, chunks) in &distribution.usage {
                println!("  Node {:>3}: {} chunk(s)", node, chunks);
            }
        }
        Command::Analytics => {
            let aggregator = MetadataAggregator::new(store.clone());
            let rows = aggregator.aggregate_cluster().await?;
            print!("{}", analytics_table(&rows));
        }
        Command::Types => {
            let files = store.list_files().await?;
            for (extension, count) in extension_histogram(&files) {
                println!("{:<16} {}", extension, count);
            }
        }
        Command::Status => {
            let status = store.system_status().await?;
            print_status(&status);
        }
        Command::Health => {
            if store.health().await? {
                println!("healthy");
            } else {
                println!("master unavailable");
                std::process::exit(2);
            }
        }
        Command::Watch { ticks } => watch(store, ticks).await?,
    }

    Ok(())
}

/// Turns a controller failure into the message the controller recorded.
fn settle(controller: &FileController, result: Result<(), ControllerError>) -> anyhow::Result<()> {
    match result {
        Ok(()) => Ok(()),
        Err(e) => {
            let message = controller.editor().error.unwrap_or_else(|| e.to_string());
            Err(anyhow::anyhow!(message))
        }
    }
}

/// Chunk placement table, or a single notice when there is nothing to tabulate.
fn analytics_table(rows: &[AggregationRow]) -> String {
    if rows.is_empty() {
        return "No files available for analytics.\n".to_string();
    }

    let mut table = format!("{:<32} {:>7} {:>9}  NODES\n", "FILE", "CHUNKS", "REPLICAS");
    for row in rows {
        let nodes: Vec<String> = row.node_ids.iter().map(|n| format!("Node {}", n)).collect();
        table.push_str(&format!(
            "{:<32} {:>7} {:>9}  {}\n",
            row.file_name,
            row.chunk_count,
            row.replica_entry_count,
            if nodes.is_empty() { "-".to_string() } else { nodes.join(", ") }
        ));
    }
    table
}

fn print_buffer(controller: &FileController) {
    let editor = controller.editor();
    if editor.partial {
        tracing::warn!("Some chunks were unavailable; content is incomplete");
    }
    println!("{}", editor.content);
}

fn print_status(status: &SystemStatus) {
    let summary = cluster_summary(status);
    let split = alive_dead_split(&status.nodes);

    println!(
        "Cluster:      {}",
        if summary.healthy { "Operational" } else { "Degraded" }
    );
    if !status.master_available {
        return;
    }
    println!("Files:        {}", summary.file_count);
    println!(
        "Active nodes: {} / {} ({} dead)",
        summary.alive_nodes, summary.total_nodes, summary.dead_nodes
    );
    println!("Reported:     {} alive, {} dead", split.alive, split.dead);
    for node in status.nodes.values() {
        println!(
            "  Node {:>3}  {}",
            node.node_id,
            if node.state.is_alive() { "alive" } else { "dead" }
        );
    }
}

async fn watch(store: Arc<dyn RemoteStore>, ticks: Option<u64>) -> anyhow::Result<()> {
    let poller = StatusPoller::new(store);
    let mut revisions = poller.subscribe();
    poller.start();

    let mut seen = 0u64;
    loop {
        tokio::select! {
            changed = revisions.changed() => {
                if changed.is_err() {
                    break;
                }
                seen += 1;

                let history = poller.history();
                match (history.file_count.latest(), history.alive_nodes.latest(), &history.latest) {
                    (Some(files), Some(nodes), Some(latest)) if latest.master_available => {
                        println!(
                            "{}  files={:<5} alive_nodes={:<3} samples={}",
                            files.label,
                            files.value,
                            nodes.value,
                            history.file_count.len()
                        );
                    }
                    _ => println!("status unavailable ({} failed polls)", history.failed_ticks),
                }

                if ticks.is_some_and(|limit| seen >= limit) {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    poller.stop();
    Ok(())
}

/// Asks on stderr before a delete is sent.
struct Prompt;

impl DeleteConfirmation for Prompt {
    fn confirm_delete(&self, name: &FileName) -> bool {
        eprint!("Are you sure you want to delete \"{}\"? [y/N] ", name);
        let _ = std::io::stderr().flush();

        let mut answer = String::new();
        if std::io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
    }
}
