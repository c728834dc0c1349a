use std::{path::PathBuf, sync::Arc};

use anyhow::Result;
use clap::Parser;
use map_integration::{
    catalog::{demo_catalog, load_catalog},
    InMemoryEmbedder, MapEmbedder, MissingMapEmbedder, MountSurface,
};
use map_session::{MapSession, SessionPhase, SurfaceKey, TableAction};
use shared::{domain::LayerId, error::MirrorOutcome};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use commands::{parse_command, Command, CommandError, HELP};

#[derive(Parser, Debug)]
#[command(about = "Choose which layers an embedded map shows")]
struct Args {
    /// Config file; defaults to ./layer_picker.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    map_id: Option<String>,
    /// JSON array of layer records served by the in-memory controller.
    #[arg(long)]
    catalog: Option<PathBuf>,
    /// Simulate a map controller that never initializes.
    #[arg(long)]
    offline: bool,
    /// Print every controller call as JSON.
    #[arg(long)]
    trace_calls: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref()))
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = config::load_settings(args.config.as_deref());
    if let Some(map_id) = args.map_id {
        settings.map_id = map_id;
    }
    if let Some(catalog) = args.catalog {
        settings.catalog_path = Some(catalog);
    }

    let layers = match &settings.catalog_path {
        Some(path) => load_catalog(path)?,
        None => demo_catalog(),
    };
    let in_memory = Arc::new(InMemoryEmbedder::new(layers));
    let embedder: Arc<dyn MapEmbedder> = if args.offline {
        Arc::new(MissingMapEmbedder)
    } else {
        in_memory.clone()
    };

    let mut session = MapSession::new(embedder, settings.embed_settings());
    session.mount(&MountSurface::new(settings.mount_element.clone()));
    session.settle().await;

    let mut tracer = CallTracer::new(in_memory, args.trace_calls);
    tracer.flush();

    if session.phase() != SessionPhase::Ready {
        println!("Map is unavailable; layer selection is disabled.");
        return Ok(());
    }
    print_status(&session);
    print_rows(&session);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        session.pump();
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(CommandError::Empty) => continue,
            Err(err) => {
                println!("{err}");
                continue;
            }
        };

        if command == Command::Quit {
            break;
        }
        run_command(&mut session, command);

        // Mirror calls are detached; give them a turn so the trace shows them.
        tokio::task::yield_now().await;
        tracer.flush();
    }

    Ok(())
}

/// `RUST_LOG` directives when set and valid, `info` otherwise.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

fn run_command(session: &mut MapSession, command: Command) {
    match command {
        Command::List(query) => {
            if picker_closed(session) {
                return;
            }
            session.selection_mut().set_query(query);
            print_rows(session);
        }
        Command::Show(_) | Command::Hide(_) if picker_closed(session) => {}
        Command::Show(layer_id) => toggle(session, layer_id, true),
        Command::Hide(layer_id) => toggle(session, layer_id, false),
        Command::Table => match session.toggle_table() {
            Some(TableAction::Opened { layer_id, outcome }) => {
                println!("Showing data table for {layer_id}{}", failure_note(&outcome));
            }
            Some(TableAction::Closed { outcome }) => {
                println!("Data table hidden{}", failure_note(&outcome));
            }
            None => println!("The data table is available once a layer is visible."),
        },
        Command::Select => {
            session.selection_mut().open();
            print_rows(session);
        }
        Command::Done => session.selection_mut().close(),
        Command::Escape => {
            session.selection_mut().on_key(SurfaceKey::Escape);
        }
        Command::Status => print_status(session),
        Command::Help => println!("{HELP}"),
        Command::Quit => {}
    }
}

fn toggle(session: &mut MapSession, layer_id: LayerId, show: bool) {
    match session.toggle_layer(&layer_id, show) {
        // Dropping the tasks detaches the controller calls.
        Some(_tasks) => {
            let verb = if show { "Showing" } else { "Hiding" };
            println!("{verb} {layer_id}; {}", session.view().summary);
        }
        None => println!("Unknown layer '{layer_id}'."),
    }
}

fn picker_closed(session: &MapSession) -> bool {
    let closed = !session.selection().is_open();
    if closed {
        println!("The layer picker is closed; type 'select' to open it.");
    }
    closed
}

fn failure_note(outcome: &MirrorOutcome) -> String {
    match outcome {
        MirrorOutcome::Ok => String::new(),
        MirrorOutcome::Failed(reason) => format!(" (controller reported: {reason})"),
    }
}

fn print_status(session: &MapSession) {
    let view = session.view();
    println!(
        "map ready: {} | picker: {} | {} | table: {}",
        view.map_surface_ready,
        if view.selection_open { "open" } else { "closed" },
        view.summary,
        if session.is_table_open() { "open" } else { "closed" },
    );
    if view.show_table_button {
        println!("[{}]", view.table_button_label);
    }
}

fn print_rows(session: &MapSession) {
    let rows = session.selection_rows();
    println!("Select Data Layers ({})", rows.summary);
    if let Some(message) = &rows.empty_message {
        println!("  {message}");
    }
    for layer in &rows.rows {
        let mark = if layer.visible { 'x' } else { ' ' };
        match layer.caption() {
            Some(caption) => println!("  [{mark}] {:<16} {} - {caption}", layer.id(), layer.name()),
            None => println!("  [{mark}] {:<16} {}", layer.id(), layer.name()),
        }
    }
}

/// Prints controller calls recorded since the previous flush.
struct CallTracer {
    embedder: Arc<InMemoryEmbedder>,
    enabled: bool,
    printed_embeds: usize,
    printed_calls: usize,
}

impl CallTracer {
    fn new(embedder: Arc<InMemoryEmbedder>, enabled: bool) -> Self {
        Self {
            embedder,
            enabled,
            printed_embeds: 0,
            printed_calls: 0,
        }
    }

    fn flush(&mut self) {
        if !self.enabled {
            return;
        }
        let embeds = self.embedder.embed_calls();
        let calls = self.embedder.controller().calls();
        for call in embeds
            .iter()
            .skip(self.printed_embeds)
            .chain(calls.iter().skip(self.printed_calls))
        {
            match serde_json::to_string(call) {
                Ok(json) => println!("-> {json}"),
                Err(err) => tracing::warn!(error = %err, "failed to encode controller call"),
            }
        }
        self.printed_embeds = embeds.len();
        self.printed_calls = calls.len();
    }
}
