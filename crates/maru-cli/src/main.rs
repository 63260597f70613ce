mod commands;
mod output;
mod prompt;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use commands::GlobalOpts;
use maru_build::RenderError;
use maru_core::CONFIG_FILE_NAME;

/// Exit code for fatal configuration and validation errors.
const EXIT_FATAL: u8 = 2;

#[derive(Parser)]
#[command(
    name = "maru",
    about = "Scaffold, build, run and push containers for scientific software"
)]
#[command(version)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct GlobalArgs {
    /// Project config file
    #[arg(long, global = true, value_name = "PATH", default_value = CONFIG_FILE_NAME)]
    config: PathBuf,

    /// Verbose logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Environment variable for the container (repeatable)
    #[arg(short, long = "env", global = true, value_name = "KEY=VAL", value_parser = parse_env)]
    env: Vec<String>,

    /// User to run the container as
    #[arg(short, long, global = true)]
    user: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or update the project in the current directory
    Init {
        /// Project flavor (prompted when omitted)
        flavor: Option<String>,
    },
    /// Build the container image
    Build {
        /// Extra or overriding build argument for this build only; the value
        /// may use `$version` and `$git_tag`
        #[arg(long = "build-arg", value_name = "KEY=VAL", value_parser = parse_key_val)]
        build_args: Vec<(String, String)>,
    },
    /// Run the container, forwarding any extra arguments
    Run {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Open an interactive shell inside the container
    Shell,
    /// Tag and push the image to every configured remote
    Push,
    /// Show the status of the current project
    Status,
    /// Print the maru version
    Version,
    /// Set a project variable (`version` or `git_tag`)
    Set {
        variable: String,
        value: String,
    },
    /// Manage the registries the image is pushed to
    Remote {
        #[command(subcommand)]
        action: Option<RemoteAction>,
    },
    /// Convert or run the image with Singularity
    Singularity {
        #[command(subcommand)]
        action: SingularityAction,
    },
}

#[derive(Subcommand)]
enum RemoteAction {
    /// List configured remotes
    List,
    /// Add a remote (e.g. docker.io/acme)
    Add { remote: String },
    /// Remove a remote; images already pushed are left alone
    Rm { remote: String },
}

#[derive(Subcommand)]
enum SingularityAction {
    /// Convert the Docker image into a SIF file
    Build {
        /// Output file (defaults to <tmpdir>/<name>_<version>.sif)
        output: Option<PathBuf>,
    },
    /// Run the Docker image with Singularity
    Run {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
}

impl From<GlobalArgs> for GlobalOpts {
    fn from(args: GlobalArgs) -> Self {
        Self {
            config_path: args.config,
            debug: args.debug,
            env: args.env,
            user: args.user,
        }
    }
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VAL, got '{s}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing key in '{s}'"));
    }
    Ok((key.to_owned(), value.to_owned()))
}

fn parse_env(s: &str) -> Result<String, String> {
    parse_key_val(s).map(|(k, v)| format!("{k}={v}"))
}

/// True when the user declined or interrupted a prompt somewhere in the chain.
fn is_cancellation(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause
            .downcast_ref::<maru_core::Error>()
            .is_some_and(maru_core::Error::is_cancellation)
            || cause
                .downcast_ref::<RenderError>()
                .is_some_and(RenderError::is_cancellation)
    })
}

fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

async fn dispatch(command: Commands, opts: &GlobalOpts) -> anyhow::Result<()> {
    match command {
        Commands::Init { flavor } => commands::init_project(opts, flavor.as_deref())?,
        Commands::Build { build_args } => commands::build(opts, build_args).await?,
        Commands::Run { args } => commands::run(opts, &args).await?,
        Commands::Shell => commands::shell(opts).await?,
        Commands::Push => commands::push(opts).await?,
        Commands::Status => commands::status(opts).await?,
        Commands::Version => commands::version(),
        Commands::Set { variable, value } => commands::set(opts, &variable, &value)?,
        Commands::Remote { action } => match action.unwrap_or(RemoteAction::List) {
            RemoteAction::List => commands::remote_list(opts)?,
            RemoteAction::Add { remote } => commands::remote_add(opts, &remote)?,
            RemoteAction::Rm { remote } => commands::remote_remove(opts, &remote)?,
        },
        Commands::Singularity { action } => match action {
            SingularityAction::Build { output } => commands::singularity_build(opts, output).await?,
            SingularityAction::Run { args } => commands::singularity_run(opts, &args).await?,
        },
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.global.debug);

    let opts = GlobalOpts::from(cli.global);
    tracing::debug!(config = %opts.config_path.display(), "starting");

    match dispatch(cli.command, &opts).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if is_cancellation(&e) => {
            output::hint(&e);
            ExitCode::SUCCESS
        }
        Err(e) => {
            output::fatal(&e);
            ExitCode::from(EXIT_FATAL)
        }
    }
}
