use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use medi_features::{records_from_ndjson, TrainedSchema};
use medi_model::ModelVersion;
use medi_readmit::{
    load_config, router, service_from_config, InferenceService, LoadMode, ServiceConfig,
};
use serde_json::Value as JsonValue;

#[derive(Debug, Parser)]
#[command(
    name = "medi-readmit",
    version,
    about = "Patient readmission prediction service",
    long_about = "medi-readmit serves predictions from a trained readmission classifier.\n\n\
        Raw patient attributes are one-hot encoded and reconciled onto the column\n\
        layout frozen at training time before the model sees them.\n\n\
        EXAMPLES:\n\
        \n  medi-readmit serve --config readmit.toml           Start the HTTP service\n\
        \n  medi-readmit predict patient.json                  Score one record offline\n\
        \n  medi-readmit derive-schema -i train.ndjson -o feature_columns.json"
)]
struct Cli {
    /// Increase verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// TOML configuration file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve predictions over HTTP
    Serve(ServeArgs),
    /// Score a single JSON record and print the response
    Predict(PredictArgs),
    /// Build a trained schema from newline-delimited JSON training records
    DeriveSchema(DeriveArgs),
}

#[derive(Debug, Args, Clone, Default)]
struct ArtifactArgs {
    /// Model artifact (JSON)
    #[arg(long, value_name = "FILE")]
    model: Option<PathBuf>,

    /// Trained schema artifact (JSON)
    #[arg(long, value_name = "FILE")]
    schema: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct ServeArgs {
    #[arg(long)]
    host: Option<String>,

    #[arg(short, long)]
    port: Option<u16>,

    /// Load artifacts on the first prediction instead of at startup
    #[arg(long)]
    lazy: bool,

    #[command(flatten)]
    artifacts: ArtifactArgs,
}

#[derive(Debug, Args)]
struct PredictArgs {
    /// JSON record (reads from stdin if not provided)
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    #[command(flatten)]
    artifacts: ArtifactArgs,
}

#[derive(Debug, Args)]
struct DeriveArgs {
    /// Training records, one JSON object per line
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,

    /// Where to write the schema
    #[arg(short, long, value_name = "FILE")]
    output: PathBuf,

    /// Schema version, e.g. 1.0.0
    #[arg(long = "schema-version", value_name = "VERSION")]
    schema_version: Option<String>,
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .try_init();
}

fn base_config(cli: &Cli) -> Result<ServiceConfig, String> {
    match &cli.config {
        Some(path) => load_config(path).map_err(|e| e.to_string()),
        None => Ok(ServiceConfig::default()),
    }
}

fn apply_artifact_args(config: &mut ServiceConfig, args: &ArtifactArgs) {
    if let Some(model) = &args.model {
        config.artifacts.model = model.clone();
    }
    if let Some(schema) = &args.schema {
        config.artifacts.schema = schema.clone();
    }
}

fn run_serve(mut config: ServiceConfig, args: &ServeArgs) -> i32 {
    if let Some(host) = &args.host {
        config.server.host = host.clone();
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if args.lazy {
        config.artifacts.load = LoadMode::Lazy;
    }
    apply_artifact_args(&mut config, &args.artifacts);

    let addr = match config.socket_addr() {
        Ok(addr) => addr,
        Err(e) => {
            eprintln!("error: {e}");
            return 2;
        }
    };
    let service = match service_from_config(&config) {
        Ok(s) => Arc::new(s),
        Err(e) => {
            eprintln!("error: {e}");
            return 2;
        }
    };
    if config.artifacts.load == LoadMode::Eager {
        // A failed load leaves the process up; /health reports it.
        if let Err(e) = service.warm_up() {
            log::error!("starting degraded: {e}");
        }
    }

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("error: failed to start runtime: {e}");
            return 2;
        }
    };
    let app = router(service, config.server.cors_allow_any_origin);
    let result = runtime.block_on(async move {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        println!("medi-readmit listening on http://{addr}");
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
                log::info!("shutdown requested");
            })
            .await
    });
    match result {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("error: {e}");
            2
        }
    }
}

fn read_input(input: Option<&PathBuf>) -> io::Result<String> {
    match input {
        Some(path) => fs::read_to_string(path),
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

/// Score one JSON document; returns the exit code and the JSON to print.
///
/// Exit codes: 0 on success, 1 when the input is at fault, 2 when the
/// artifacts or the service itself are.
fn predict_document(config: &ServiceConfig, text: &str) -> (i32, JsonValue) {
    let service: InferenceService = match service_from_config(config) {
        Ok(s) => s,
        Err(e) => return (2, serde_json::json!({ "error": e.to_string() })),
    };
    let body: JsonValue = match serde_json::from_str(text) {
        Ok(v) => v,
        Err(e) => return (1, serde_json::json!({ "error": format!("invalid JSON: {e}") })),
    };
    match service.predict(&body) {
        Ok(result) => (0, serde_json::json!(result)),
        Err(e) => {
            let code = if e.is_client_error() { 1 } else { 2 };
            (code, serde_json::json!({ "error": e.to_string() }))
        }
    }
}

fn run_predict(mut config: ServiceConfig, args: &PredictArgs) -> i32 {
    apply_artifact_args(&mut config, &args.artifacts);
    let text = match read_input(args.input.as_ref()) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("error: failed to read input: {e}");
            return 1;
        }
    };
    let (code, output) = predict_document(&config, &text);
    println!("{output}");
    code
}

fn run_derive_schema(config: ServiceConfig, args: &DeriveArgs) -> i32 {
    let fields = match config.feature_set() {
        Ok(f) => f,
        Err(e) => {
            eprintln!("error: {e}");
            return 2;
        }
    };
    let version = match args.schema_version.as_deref().map(ModelVersion::parse) {
        None => None,
        Some(Ok(v)) => Some(v),
        Some(Err(e)) => {
            eprintln!("error: {e}");
            return 1;
        }
    };
    let text = match fs::read_to_string(&args.input) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("error: {}: {e}", args.input.display());
            return 1;
        }
    };
    let records = match records_from_ndjson(&text) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return 1;
        }
    };
    let schema = match TrainedSchema::derive_numbered(
        records.iter().map(|(line, record)| (*line, record)),
        &fields,
    ) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return 1;
        }
    };
    let schema = match version {
        Some(v) => schema.with_version(v),
        None => schema,
    };
    if let Err(e) = schema.save(&args.output) {
        eprintln!("error: {e}");
        return 2;
    }
    log::info!(
        "derived {} columns from {} records into {}",
        schema.len(),
        records.len(),
        args.output.display()
    );
    0
}

fn run_cli() -> i32 {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = match base_config(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return 2;
        }
    };
    match &cli.command {
        Command::Serve(args) => run_serve(config, args),
        Command::Predict(args) => run_predict(config, args),
        Command::DeriveSchema(args) => run_derive_schema(config, args),
    }
}

fn main() {
    std::process::exit(run_cli());
}
