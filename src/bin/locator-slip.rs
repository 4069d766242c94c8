use std::{
    path::{Path, PathBuf},
    process::ExitCode,
    sync::Arc,
};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use locator_slip::{
    DirectoryExporter, Field, FormController, FormState, HttpSubmitter, Notice, NoticeLevel,
    Notifier, SlipConfig, SubmitOutcome, ValidationErrors, validate_form,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "locator-slip", version, about = "File a locator slip and save its receipt")]
struct Cli {
    /// JSON configuration overriding the built-in endpoint, approver and branding.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate, submit, and save the receipt JPEG.
    Submit(SubmitArgs),
    /// Validate the form without sending anything.
    Check(FormArgs),
    /// List the accepted ranks.
    Ranks,
}

#[derive(Args, Debug)]
struct SubmitArgs {
    #[command(flatten)]
    form: FormArgs,

    /// Directory the receipt is saved into.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
}

#[derive(Args, Debug)]
struct FormArgs {
    /// Complete name: first name, middle initial, surname (e.g. "Juan M. Dela Cruz").
    #[arg(long)]
    full_name: Option<String>,

    /// Rank or position (see `locator-slip ranks`).
    #[arg(long)]
    rank: Option<String>,

    /// Time to be out, 24-hour HH:MM.
    #[arg(long)]
    time_out: Option<String>,

    /// Time to return, 24-hour HH:MM.
    #[arg(long)]
    time_return: Option<String>,

    /// Place(s) to be visited.
    #[arg(long)]
    places: Option<String>,

    /// Reason(s) for the visit.
    #[arg(long)]
    reason: Option<String>,

    /// Certify the information is true and digitally sign the request.
    #[arg(long)]
    agree: bool,
}

impl FormArgs {
    fn entries(&self) -> [(Field, Option<&str>); 6] {
        [
            (Field::FullName, self.full_name.as_deref()),
            (Field::Rank, self.rank.as_deref()),
            (Field::TimeOut, self.time_out.as_deref()),
            (Field::TimeReturn, self.time_return.as_deref()),
            (Field::PlacesToVisit, self.places.as_deref()),
            (Field::ReasonForVisit, self.reason.as_deref()),
        ]
    }
}

/// Prints notices the way a dialog would interrupt the user.
struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn notify(&self, notice: &Notice) {
        let tag = match notice.level {
            NoticeLevel::Success => "ok",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Failure => "error",
        };
        eprintln!("[{tag}] {}", notice.message);
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.cmd {
        Command::Submit(args) => cmd_submit(config, args).await,
        Command::Check(args) => cmd_check(&config, &args),
        Command::Ranks => {
            for rank in &config.valid_ranks {
                println!("{rank}");
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<SlipConfig> {
    match path {
        Some(p) => SlipConfig::load(p).with_context(|| format!("load config '{}'", p.display())),
        None => Ok(SlipConfig::default()),
    }
}

async fn cmd_submit(config: SlipConfig, args: SubmitArgs) -> anyhow::Result<ExitCode> {
    let submitter = HttpSubmitter::new(config.endpoint_url.clone());
    let exporter = DirectoryExporter::new(args.out_dir);
    let ctrl = FormController::new(Arc::new(config), submitter, exporter)
        .with_notifier(StderrNotifier);

    for (field, value) in args.form.entries() {
        if let Some(v) = value {
            ctrl.update_field(field, v)?;
        }
    }
    ctrl.set_agreed(args.form.agree);

    match ctrl.submit().await {
        SubmitOutcome::Submitted(artifact) => {
            println!("transaction: {}", artifact.transaction_id);
            println!("receipt:     {}", artifact.location.display());
            Ok(ExitCode::SUCCESS)
        }
        SubmitOutcome::Invalid(errors) => {
            print_errors(&errors);
            Ok(ExitCode::from(2))
        }
        SubmitOutcome::Failed { reason } => {
            eprintln!("  cause: {reason}");
            Ok(ExitCode::FAILURE)
        }
        SubmitOutcome::SubmittedWithoutReceipt { reason, .. } => {
            eprintln!("  cause: {reason}");
            Ok(ExitCode::from(3))
        }
        SubmitOutcome::Busy => anyhow::bail!("a submission is already in progress"),
    }
}

fn cmd_check(config: &SlipConfig, args: &FormArgs) -> anyhow::Result<ExitCode> {
    let mut form = FormState::default();
    for (field, value) in args.entries() {
        if let Some(v) = value {
            form.set(field, v)?;
        }
    }
    form.set_agreed(args.agree);

    let errors = validate_form(&form, config);
    if errors.is_empty() {
        println!("form is valid");
        Ok(ExitCode::SUCCESS)
    } else {
        print_errors(&errors);
        Ok(ExitCode::from(2))
    }
}

fn print_errors(errors: &ValidationErrors) {
    eprintln!("the form has {} problem(s):", errors.len());
    for (field, message) in errors.iter() {
        eprintln!("  {:<24} {message}", field.label());
    }
}
