mod cleanup;
mod config;
mod error;
mod logging;
mod params;
mod summary;

use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use dataforge_core::{load_schema, parse_schema};
use dataforge_generate::{FilePrefix, GenerationEngine};
use tracing::{error, info, warn};

use config::{DEFAULT_CONFIG_PATH, load_settings, write_default_settings};
use error::CliResult;
use params::{Overrides, RunParams};

const SCHEMA_PREVIEW_CHARS: usize = 100;

#[derive(Parser, Debug)]
#[command(
    name = "dataforge",
    version,
    about = "Generate line-delimited JSON test data from a field schema"
)]
struct Cli {
    /// Directory that receives the generated files.
    #[arg(value_name = "PATH_TO_SAVE_FILES", required_unless_present = "write_default_config")]
    path_to_save_files: Option<PathBuf>,
    /// Number of files to create. 0 prints records to stdout.
    #[arg(long, alias = "files_count", allow_negative_numbers = true)]
    files_count: Option<i64>,
    /// Base name shared by every generated file.
    #[arg(long, alias = "file_name")]
    file_name: Option<String>,
    /// Prefix placed before the base name: count, random or uuid.
    #[arg(long, alias = "file_prefix")]
    file_prefix: Option<FilePrefix>,
    /// Schema as inline JSON or a path to a JSON file.
    #[arg(long, alias = "data_schema")]
    data_schema: Option<String>,
    /// Records per file.
    #[arg(long, alias = "data_lines", allow_negative_numbers = true)]
    data_lines: Option<i64>,
    /// Remove existing *.json files from the output directory first.
    #[arg(long, alias = "clear_path", default_value_t = false)]
    clear_path: bool,
    /// Number of parallel workers, capped to the cpu count.
    #[arg(long, allow_negative_numbers = true)]
    multiprocessing: Option<i64>,
    /// Seed for reproducible output.
    #[arg(long)]
    seed: Option<u64>,
    /// Settings file.
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    /// Write the default settings to --config and exit.
    #[arg(long, default_value_t = false)]
    write_default_config: bool,
    /// Also append JSON log events to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            files_count: self.files_count,
            file_name: self.file_name.clone(),
            file_prefix: self.file_prefix,
            data_schema: self.data_schema.clone(),
            data_lines: self.data_lines,
            multiprocessing: self.multiprocessing,
            seed: self.seed,
            clear_path: self.clear_path,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let loaded = load_settings(&cli.config);
    if let Err(err) = logging::init_logging(&loaded.settings.log_level, cli.log_file.as_deref()) {
        eprintln!("dataforge: {err}");
        return ExitCode::FAILURE;
    }

    let result = if cli.write_default_config {
        write_config(&cli)
    } else {
        for warning in &loaded.warnings {
            warn!("{warning}");
        }
        run(&cli, &loaded.settings).await
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(event = "run_failed", error = %err, "dataforge failed");
            ExitCode::FAILURE
        }
    }
}

fn write_config(cli: &Cli) -> CliResult<()> {
    if write_default_settings(&cli.config)? {
        info!(event = "config_written", path = %cli.config.display(), "wrote default config");
    } else {
        warn!(path = %cli.config.display(), "config file already exists, left untouched");
    }
    Ok(())
}

async fn run(cli: &Cli, settings: &config::Settings) -> CliResult<()> {
    let available_cpus = std::thread::available_parallelism()
        .map(|count| count.get())
        .unwrap_or(1);
    let params = params::resolve(
        cli.path_to_save_files.as_deref(),
        settings,
        cli.overrides(),
        available_cpus,
    )?;
    log_params(&params);

    let raw_schema = load_schema(&params.data_schema)?;
    let schema = parse_schema(&raw_schema)?;
    for warning in schema.warnings() {
        warn!(field = %warning.field, code = warning.code, "{}", warning.message);
    }
    info!(
        event = "schema_parsed",
        fields = schema.len(),
        names = %schema.field_names().collect::<Vec<_>>().join(", "),
        "schema parsed"
    );

    let engine = GenerationEngine::new(params.generate_options());

    if params.console_mode() {
        let stdout = std::io::stdout();
        let mut writer = BufWriter::new(stdout.lock());
        let stats = engine.write_console(&schema, &mut writer)?;
        writer.flush()?;
        info!(event = "console_finished", lines = stats.lines, "console output finished");
        return Ok(());
    }

    if params.clear_path {
        if let Some(out_dir) = &params.out_dir {
            let removed = cleanup::clear_json_files(out_dir)?;
            info!(
                event = "path_cleared",
                removed,
                path = %out_dir.display(),
                "cleared output directory"
            );
        }
    }

    let report = if engine.should_parallelize() {
        engine.generate_files_parallel(&raw_schema).await?
    } else {
        engine.generate_files(&schema)?
    };
    summary::log_report(&report);
    Ok(())
}

fn log_params(params: &RunParams) {
    let preview: String = params.data_schema.chars().take(SCHEMA_PREVIEW_CHARS).collect();
    let truncated = params.data_schema.chars().count() > SCHEMA_PREVIEW_CHARS;
    info!(
        event = "run_started",
        out_dir = ?params.out_dir,
        files_count = params.files_count,
        file_name = %params.file_name,
        file_prefix = %params.file_prefix,
        data_lines = params.data_lines,
        workers = params.workers,
        clear_path = params.clear_path,
        seed = ?params.seed,
        "run parameters"
    );
    info!(
        "schema: {preview}{}",
        if truncated { "..." } else { "" }
    );
}
