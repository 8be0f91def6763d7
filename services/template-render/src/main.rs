//! Template Render
//!
//! Renders a GeoJSON document in any of the feature template output formats.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use feature_common::Crs;
use template_render::input::load_features;
use template_render::render::{render_features, RenderOptions};
use template_writers::{create_writer, OutputFormat, WriterConfig};

/// Template Render
#[derive(Parser, Debug)]
#[command(name = "template-render")]
#[command(about = "Render GeoJSON features as GeoJSON, JSON-LD, GML or XHTML")]
struct Args {
    /// Input GeoJSON file, `-` for standard input
    input: PathBuf,

    /// Output format (geojson, jsonld, gml2, gml31, gml32, html or a media type)
    #[arg(short, long, default_value = "geojson")]
    format: String,

    /// Writer configuration file (YAML)
    #[arg(short, long, env = "TEMPLATE_RENDER_CONFIG")]
    config: Option<PathBuf>,

    /// CRS of the input coordinates, e.g. EPSG:4326 or urn:ogc:def:crs:EPSG::4326
    #[arg(long)]
    crs: Option<String>,

    /// Qualified GML feature type name
    #[arg(long, default_value = "feature:Feature")]
    type_name: String,

    /// JSON-LD context file
    #[arg(long)]
    context: Option<PathBuf>,

    /// Encode a single feature instead of a collection
    #[arg(long)]
    single: bool,

    /// Flatten nested properties into suffixed keys (JSON formats)
    #[arg(long)]
    flat: bool,

    /// Output file, standard output when absent
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "warn", env = "RUST_LOG")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

fn main() {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(&args);

    if let Err(e) = run(args) {
        tracing::error!("Render failed: {:#}", e);
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_tracing(args: &Args) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(io::stderr);
    if args.log_json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn run(args: Args) -> Result<()> {
    let format = OutputFormat::from_query_param(&args.format)
        .with_context(|| format!("Unsupported output format: {}", args.format))?;

    let mut config = match &args.config {
        Some(path) => WriterConfig::load_from_file(path)?,
        None => WriterConfig::default(),
    };
    config.single_feature_request |= args.single;
    config.flat_output |= args.flat;

    let crs = args
        .crs
        .as_deref()
        .map(Crs::parse)
        .transpose()
        .context("Invalid --crs")?;
    let srid = crs
        .as_ref()
        .and_then(Crs::epsg_code)
        .and_then(|code| i32::try_from(code).ok())
        .unwrap_or(0);

    let features = load_features(&args.input, srid)?;
    if config.single_feature_request && features.len() != 1 {
        anyhow::bail!(
            "--single needs exactly one input feature, found {}",
            features.len()
        );
    }

    if let Some((prefix, _)) = args.type_name.split_once(':') {
        if !config.gml.namespaces.contains_key(prefix) {
            let uri = format!("urn:template-render:{}", prefix);
            warn!(prefix, uri = %uri, "type name prefix not configured, declaring a placeholder");
            config.gml.namespaces.insert(prefix.to_string(), uri);
        }
    }

    let context = match &args.context {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read: {:?}", path))?;
            Some(serde_json::from_str(&text).context("Failed to parse JSON-LD context")?)
        }
        None => None,
    };

    let options = RenderOptions {
        format,
        type_name: args.type_name.clone(),
        crs,
        number_matched: None,
        single_feature: config.single_feature_request,
        context,
    };

    info!(
        format = ?format,
        content_type = format.content_type(),
        features = features.len(),
        "Rendering features"
    );

    let sink: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create: {:?}", path))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    let mut writer = create_writer(format, sink, &config);
    let rendered = render_features(&mut *writer, &features, &options);
    let closed = writer.close();
    rendered.context("Failed to render features")?;
    closed.context("Failed to flush output")?;
    Ok(())
}
