use clap::{Parser, Subcommand};
use serde::Serialize;
use simple_border::config::{self, AppConfig, Overrides};
use simple_border::imaging::{
    BorderSpec, ImageLoader, ImageSource, RustLoader, compositor, supported_input_extensions,
};
use simple_border::intake::{self, ArgsPicker, DropRoute, Picker};
use simple_border::naming::bordered_file_name;
use simple_border::output::{self, SingleSummary};
use simple_border::process::{self, BatchOptions, BatchReport};
use simple_border::queue::ImageQueue;
use simple_border::save::{
    self, FsGateway, ItemSaveResult, PersistenceGateway, SaveOutcome, SaveSummary,
};
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "simple-border")]
#[command(about = "Add a 4:5 border to photos, one at a time or in bulk")]
#[command(long_about = "\
Add a 4:5 border to photos, one at a time or in bulk

Every image is placed, unscaled, on the smallest 4:5 rectangle that holds it,
then padded on all sides by a percentage of that rectangle. Output is PNG data
saved as:

  bordered_<name>_4x5_<pct>pct_<colour>.<original extension>

Accepted inputs: jpg, jpeg, png, gif, bmp, webp. Directories are searched
recursively.

Settings come from (later wins): built-in defaults, simple-border.toml (or
--config), then --border / --color.

Run 'simple-border gen-config' to generate a documented config file.")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    settings: SettingsArgs,

    #[command(subcommand)]
    command: Command,
}

/// Flags layered on top of the config file.
#[derive(clap::Args)]
struct SettingsArgs {
    /// Config file [default: ./simple-border.toml if present]
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Border thickness, percent of the 4:5 base (0-100)
    #[arg(long, global = true)]
    border: Option<f64>,

    /// Border colour, #rrggbb or #rgb
    #[arg(long, global = true)]
    color: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Print a stock simple-border.toml with all options documented
    GenConfig,
    #[command(flatten)]
    Image(ImageCommand),
}

/// Commands that load settings and work on images.
#[derive(Subcommand)]
enum ImageCommand {
    /// Border one image and save it
    Single {
        input: PathBuf,
        /// Output file, or directory to save under the conventional name
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },
    /// Border many images and save them into one folder
    Bulk {
        /// Images or directories
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        /// Output folder, created if missing
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
        /// Write a JSON report of the run to this file
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Add images like a drop: one goes through the single flow, more go to bulk
    Add {
        /// Images or directories; `-` reads one image from stdin
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
        /// File name for the stdin image
        #[arg(long, default_value = "stdin.png")]
        name: String,
    },
    /// Show original and bordered sizes without saving
    Preview {
        input: PathBuf,
        /// Also write a downscaled PNG preview here
        #[arg(long)]
        preview_out: Option<PathBuf>,
    },
}

/// Machine-readable summary written by `bulk --report`.
#[derive(Serialize)]
struct RunReport<'a> {
    processing: BatchReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    save: Option<SaveSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    output_folder: Option<&'a Path>,
    results: &'a [ItemSaveResult],
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
            Ok(())
        }
        Command::Image(command) => {
            let app_config = load_app_config(&cli.settings)?;
            run_command(command, &app_config)
        }
    }
}

fn run_command(
    command: ImageCommand,
    app_config: &AppConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let border = app_config.border_spec()?;

    match command {
        ImageCommand::Single { input, output } => {
            single_flow(ImageSource::Path(input), border, app_config, output)?;
        }
        ImageCommand::Bulk {
            inputs,
            output,
            report,
        } => {
            let paths = ArgsPicker::new(inputs, None).pick_many(supported_input_extensions());
            if paths.is_empty() {
                return Err("No valid image files found".into());
            }
            let sources = paths.into_iter().map(ImageSource::Path).collect();
            bulk_flow(sources, border, app_config, output, report.as_deref())?;
        }
        ImageCommand::Add {
            inputs,
            output,
            name,
        } => {
            let dropped = dropped_sources(&inputs, &name)?;
            match intake::route_drop(dropped) {
                DropRoute::Empty => return Err("No valid image files found".into()),
                DropRoute::Single(source) => {
                    single_flow(source, border, app_config, output)?;
                }
                DropRoute::Bulk(sources) => {
                    bulk_flow(sources, border, app_config, output, None)?;
                }
            }
        }
        ImageCommand::Preview { input, preview_out } => {
            let source = ImageSource::Path(input);
            let handle = RustLoader::new().load(&source)?;
            let result = compositor::render(&handle, &border)?;
            output::print_single_output(&SingleSummary {
                name: &source.display_name(),
                border: &border,
                original: handle.dimensions(),
                bordered: (result.width, result.height),
                preview_box: app_config.preview_box(),
            });
            if let Some(path) = preview_out {
                let small = compositor::preview(&result.surface, app_config.preview_box());
                std::fs::write(&path, compositor::encode_png(&small)?)?;
                println!("Preview written to {}", path.display());
            }
        }
    }

    Ok(())
}

/// Defaults → config file → command-line flags.
fn load_app_config(settings: &SettingsArgs) -> Result<AppConfig, Box<dyn std::error::Error>> {
    let path = match &settings.config {
        Some(path) if !path.exists() => {
            return Err(format!("config file not found: {}", path.display()).into());
        }
        Some(path) => path.clone(),
        None => PathBuf::from(config::DEFAULT_CONFIG_FILE),
    };
    let overrides = Overrides {
        percentage: settings.border,
        color: settings.color.clone(),
    };
    Ok(config::load_config(&path, &overrides)?)
}

/// Turn `add` arguments into sources: `-` is a stdin blob, directories expand.
fn dropped_sources(inputs: &[PathBuf], stdin_name: &str) -> std::io::Result<Vec<ImageSource>> {
    let mut sources = Vec::new();
    for input in inputs {
        if input.as_os_str() == "-" {
            let mut bytes = Vec::new();
            std::io::stdin().read_to_end(&mut bytes)?;
            sources.push(ImageSource::blob(stdin_name, bytes));
        } else if input.is_dir() {
            sources.extend(
                intake::collect_image_paths(std::slice::from_ref(input))
                    .into_iter()
                    .map(ImageSource::Path),
            );
        } else {
            sources.push(ImageSource::Path(input.clone()));
        }
    }
    Ok(sources)
}

fn single_flow(
    source: ImageSource,
    border: BorderSpec,
    app_config: &AppConfig,
    destination: PathBuf,
) -> Result<(), Box<dyn std::error::Error>> {
    let handle = RustLoader::new().load(&source)?;
    let result = compositor::render(&handle, &border)?;
    output::print_single_output(&SingleSummary {
        name: &source.display_name(),
        border: &border,
        original: handle.dimensions(),
        bordered: (result.width, result.height),
        preview_box: app_config.preview_box(),
    });

    let picker = ArgsPicker::new(vec![], Some(destination));
    let file_name = bordered_file_name(&source.original_name(), &result.border);
    match FsGateway::new(&picker).save_single(&result.encoded, &file_name)? {
        SaveOutcome::Saved(path) => println!("{}", output::format_saved(&path)),
        SaveOutcome::Cancelled => println!("{}", output::format_cancelled("Save")),
    }
    Ok(())
}

fn bulk_flow(
    sources: Vec<ImageSource>,
    border: BorderSpec,
    app_config: &AppConfig,
    output_folder: PathBuf,
    report_path: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let offered = sources.len();
    let mut queue = ImageQueue::new();
    let added = queue.extend(sources);
    println!("{}", output::format_queued(added, offered));

    init_thread_pool(&app_config.processing);

    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            for line in output::format_process_event(&event) {
                println!("{}", line);
            }
        }
    });
    let options = BatchOptions {
        item_delay: app_config.batch.item_delay(),
    };
    let batch = process::run(&mut queue, border, &RustLoader::new(), &options, Some(tx));
    printer
        .join()
        .map_err(|_| "progress printer thread panicked")?;

    let requests = save::bulk_requests(&queue);
    let saved = if requests.is_empty() {
        println!("Nothing to save");
        None
    } else {
        let picker = ArgsPicker::new(vec![], Some(output_folder));
        match FsGateway::new(&picker).save_bulk(&requests)? {
            SaveOutcome::Saved(report) => {
                output::print_save_report(&report);
                Some(report)
            }
            SaveOutcome::Cancelled => {
                println!("{}", output::format_cancelled("Bulk save"));
                None
            }
        }
    };

    if let Some(path) = report_path {
        let run_report = RunReport {
            processing: batch,
            save: saved.as_ref().map(|r| r.summary()),
            output_folder: saved.as_ref().map(|r| r.output_folder.as_path()),
            results: saved.as_ref().map(|r| r.results.as_slice()).unwrap_or(&[]),
        };
        std::fs::write(path, serde_json::to_string_pretty(&run_report)?)?;
    }
    Ok(())
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores — user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
