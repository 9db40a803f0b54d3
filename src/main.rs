use anyhow::{bail, Context, Result};
use clap::Parser;
use hotcharts::{graph, parser, stats, ChartDispatcher, Dataset, RenderOptions};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "hotcharts")]
#[command(about = "Render charts and summary statistics from a song dataset", long_about = None)]
struct Args {
    /// Chart request (e.g., 'histogram(streams)' or 'scatter(x: bpm, y: energy)')
    request: Option<String>,

    /// CSV file to load
    #[arg(long, default_value = "spotify-data.csv")]
    data: PathBuf,

    /// JSON file with rendering options
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the image here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the statistics table for the requested attributes instead of an image
    #[arg(long)]
    summary: bool,

    /// Accept any dataset column, not just the song attributes
    #[arg(long)]
    unrestricted: bool,

    /// List the attributes that can be charted and exit
    #[arg(long)]
    list_attributes: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let dataset = Dataset::load(&args.data)
        .with_context(|| format!("Failed to load dataset {}", args.data.display()))?;

    let options = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            RenderOptions::from_json_str(&text)
                .with_context(|| format!("Invalid config {}", path.display()))?
        }
        None => RenderOptions::default(),
    };

    let dispatcher = if args.unrestricted {
        ChartDispatcher::unrestricted(&dataset)
    } else {
        ChartDispatcher::new(&dataset)
    }
    .with_options(options);

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    if args.list_attributes {
        for name in dispatcher.available_attributes() {
            writeln!(handle, "{}", name).context("Failed to write to stdout")?;
        }
        return Ok(());
    }

    let Some(text) = args.request.as_deref() else {
        bail!("No chart request given (try 'histogram(streams)')");
    };
    let request = parser::parse_request(text).context("Invalid chart request")?;

    if args.summary {
        let names = request.selector.names();
        let table = stats::summarize(dispatcher.dataset(), &names)
            .context("Failed to summarize attributes")?;
        write!(handle, "{}", table).context("Failed to write to stdout")?;
        return Ok(());
    }

    let figure = dispatcher
        .dispatch_request(&request)
        .with_context(|| format!("Failed to build {} chart", request.kind))?;
    let bytes = graph::render(&figure, dispatcher.options()).context("Failed to render chart")?;

    match &args.output {
        Some(path) => {
            fs::write(path, &bytes)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), bytes = bytes.len(), "wrote chart");
        }
        None => {
            handle
                .write_all(&bytes)
                .context("Failed to write image to stdout")?;
            handle.flush().context("Failed to flush stdout")?;
        }
    }

    Ok(())
}
