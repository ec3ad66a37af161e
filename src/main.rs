use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use color_eyre::Result;

use proctop::app::App;
use proctop::config::{self, load_config, load_config_from_path};
use proctop::event::{Event, EventHandler};
use proctop::system::counters::{CounterSource, ProcFs};
use proctop::ui;

#[derive(Parser)]
#[command(name = "proctop", about = "Terminal resource monitor sampled from /proc")]
struct Cli {
    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Refresh rate in milliseconds
    #[arg(long)]
    refresh_rate: Option<u64>,

    /// Sort key: cpu, memory, age, pid
    #[arg(long)]
    sort: Option<String>,

    /// Theme: dark, light
    #[arg(long)]
    theme: Option<String>,

    /// Color support: auto, 256, truecolor, mono
    #[arg(long)]
    color: Option<String>,

    /// Sample an alternate proc tree instead of /proc (fixtures, containers)
    #[arg(long)]
    proc_root: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;

    #[cfg(feature = "sample-tracing")]
    tracing_subscriber::fmt()
        .json()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config_for_cli(&cli);
    let source: Box<dyn CounterSource> = match &cli.proc_root {
        Some(root) => Box::new(ProcFs::with_roots(root.clone(), "/etc")),
        None => Box::new(ProcFs::new()),
    };

    let mut terminal = ratatui::init();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        ratatui::restore();
        original_hook(panic_info);
    }));

    let result = run(&mut terminal, config, source).await;

    ratatui::restore();

    result
}

async fn run(
    terminal: &mut ratatui::DefaultTerminal,
    config: config::Config,
    source: Box<dyn CounterSource>,
) -> Result<()> {
    let tick_rate = Duration::from_millis(config.general.refresh_rate_ms);
    let mut app = App::new(config, source);
    let mut events = EventHandler::new(tick_rate);

    terminal.draw(|frame| ui::draw(frame, &mut app))?;

    while app.running {
        if let Some(event) = events.next().await {
            let mut should_draw = false;
            match event {
                Event::Key(key) => {
                    if key.kind == crossterm::event::KeyEventKind::Press {
                        let action = app.map_key(key);
                        app.dispatch(action);
                        should_draw = true;
                    }
                }
                Event::Tick => {
                    app.refresh_data();
                    should_draw = true;
                }
                Event::Resize => {
                    should_draw = true;
                }
            }
            if should_draw {
                terminal.draw(|frame| ui::draw(frame, &mut app))?;
            }
        }
    }

    Ok(())
}

fn load_config_for_cli(cli: &Cli) -> config::Config {
    let mut config = match &cli.config {
        Some(path) => load_config_from_path(path),
        None => load_config(),
    };

    if let Some(rate) = cli.refresh_rate {
        config.general.refresh_rate_ms = rate;
    }
    if let Some(ref sort) = cli.sort {
        config.general.default_sort = sort.clone();
    }
    if let Some(ref theme) = cli.theme {
        config.general.theme = theme.clone();
    }
    if let Some(ref support) = cli.color {
        config.general.color_support = support.clone();
    }

    config
}
