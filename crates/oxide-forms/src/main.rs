//! oxide-forms CLI
//!
//! Command-line tool for inspecting, binding and validating HTML forms.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

use oxide_forms::{
    form_data_from_json, parse_urlencoded, FormData, FormOptions, HtmlForm, ValidateOptions,
};

/// Forms defined by plain HTML markup.
#[derive(Parser)]
#[command(name = "oxide-forms")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Id of the form to use (the first form if not specified).
    #[arg(short, long, env = "OXIDE_FORMS_FORM_ID")]
    form_id: Option<String>,

    /// Class of each generated error element.
    #[arg(long, default_value = "error")]
    error_class: String,

    /// Class of the element wrapping a field's errors.
    #[arg(long, default_value = "error-list")]
    error_list_class: String,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the extracted fields as JSON.
    Fields {
        /// HTML file containing the form.
        file: PathBuf,
    },

    /// Print the current field values as JSON.
    Values {
        /// HTML file containing the form.
        file: PathBuf,
    },

    /// Bind data, validate and print the annotated markup.
    Validate {
        /// HTML file containing the form.
        file: PathBuf,

        #[command(flatten)]
        data: DataArgs,

        /// Skip type checks such as email and url format.
        #[arg(long)]
        no_enforce_types: bool,

        /// Do not render errors into the markup.
        #[arg(long)]
        no_annotate: bool,
    },

    /// Bind data and print the markup without validating.
    Render {
        /// HTML file containing the form.
        file: PathBuf,

        #[command(flatten)]
        data: DataArgs,
    },
}

#[derive(Args)]
struct DataArgs {
    /// JSON file with an object of field values.
    #[arg(long, conflicts_with = "query")]
    data: Option<PathBuf>,

    /// URL-encoded field values, e.g. `name=John&tags[]=a&tags[]=b`.
    #[arg(long)]
    query: Option<String>,
}

impl DataArgs {
    fn load(&self) -> anyhow::Result<Option<FormData>> {
        if let Some(path) = &self.data {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let json: serde_json::Value = serde_json::from_str(&raw)
                .with_context(|| format!("{} is not valid JSON", path.display()))?;
            return Ok(Some(form_data_from_json(&json)?));
        }
        match &self.query {
            Some(query) => Ok(Some(parse_urlencoded(query)?)),
            None => Ok(None),
        }
    }
}

fn load_form(path: &Path, options: &FormOptions) -> anyhow::Result<HtmlForm> {
    let form = HtmlForm::from_file(path, options.clone())
        .with_context(|| format!("failed to load form from {}", path.display()))?;
    debug!(fields = form.fields().len(), "loaded form");
    Ok(form)
}

fn bind_data(form: &mut HtmlForm, data: &DataArgs) -> anyhow::Result<()> {
    if let Some(data) = data.load()? {
        info!(keys = data.len(), "binding submitted data");
        form.bind(&data);
    }
    Ok(())
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut options = FormOptions::new()
        .error_class(cli.error_class)
        .error_list_class(cli.error_list_class);
    options.form_id = cli.form_id;

    match cli.command {
        Commands::Fields { file } => {
            let form = load_form(&file, &options)?;
            println!("{}", serde_json::to_string_pretty(form.fields())?);
        }

        Commands::Values { file } => {
            let form = load_form(&file, &options)?;
            println!("{}", serde_json::to_string_pretty(&form.values())?);
        }

        Commands::Validate {
            file,
            data,
            no_enforce_types,
            no_annotate,
        } => {
            let mut form = load_form(&file, &options)?;
            bind_data(&mut form, &data)?;
            let valid = form.validate_with(ValidateOptions::new(!no_enforce_types, !no_annotate));
            println!("{form}");
            if !valid {
                for (field, message) in form.errors().all_errors() {
                    info!("{field}: {message}");
                }
                return Ok(ExitCode::FAILURE);
            }
            info!("Form is valid.");
        }

        Commands::Render { file, data } => {
            let mut form = load_form(&file, &options)?;
            bind_data(&mut form, &data)?;
            println!("{form}");
        }
    }

    Ok(ExitCode::SUCCESS)
}
