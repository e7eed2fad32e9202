use std::io::IsTerminal;
use std::path::PathBuf;

use clap::Parser;

use nmscan::config::settings::{SizeMode, AGE_CHOICES};
use nmscan::models::report::DeletionPolicy;
use nmscan::ui::prompt;

#[derive(Parser, Debug)]
#[command(name = "nmscan", version, about = "Scans a directory tree for node_modules folders")]
struct Cli {
    /// Directory to scan, relative to the current directory (prompted when omitted)
    path: Option<PathBuf>,

    /// Delete node_modules in projects older than --older-than days
    #[arg(long)]
    delete: bool,

    /// Age threshold in days for --delete
    #[arg(long, value_parser = parse_age)]
    older_than: Option<u32>,

    /// Report what would be deleted without removing anything
    #[arg(long)]
    dry_run: bool,

    /// Never prompt; use defaults for anything not given
    #[arg(short = 'y', long)]
    yes: bool,

    /// Follow symbolic links
    #[arg(long)]
    follow_symlinks: bool,

    /// Maximum directory depth below the root to search
    #[arg(short = 'd', long)]
    max_depth: Option<usize>,

    /// Maximum concurrent size probes
    #[arg(short = 'c', long)]
    concurrency: Option<usize>,

    /// Measure allocated disk blocks instead of file lengths
    #[arg(long)]
    on_disk: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Export the report as JSON to file
    #[arg(long)]
    export_json: Option<PathBuf>,

    /// Export the report as Markdown to file
    #[arg(long)]
    export_markdown: Option<PathBuf>,
}

fn parse_age(s: &str) -> Result<u32, String> {
    let days: u32 = s.parse().map_err(|_| format!("'{}' is not a number of days", s))?;
    if AGE_CHOICES.contains(&days) {
        Ok(days)
    } else {
        Err(format!("must be one of {:?}", AGE_CHOICES))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (logs to stderr)
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let interactive = !cli.yes && std::io::stdin().is_terminal();

    let directory = match cli.path {
        Some(path) => path,
        None if interactive => PathBuf::from(prompt::ask_directory()?),
        None => PathBuf::from("."),
    };

    let auto_delete = if cli.delete || cli.older_than.is_some() {
        true
    } else if interactive {
        prompt::confirm_auto_delete()?
    } else {
        false
    };

    let policy = if auto_delete {
        let days = match cli.older_than {
            Some(days) => days,
            None if interactive => prompt::choose_age()?,
            None => AGE_CHOICES[0],
        };
        DeletionPolicy::new(days)?
    } else {
        DeletionPolicy::disabled()
    };

    // Build settings
    let mut settings = nmscan::config::settings::Settings::default();
    if let Some(depth) = cli.max_depth {
        settings.max_depth = Some(depth);
    }
    if let Some(conc) = cli.concurrency {
        settings.max_concurrent_probes = conc;
    }
    settings.follow_symlinks = cli.follow_symlinks;
    settings.dry_run = cli.dry_run;
    if cli.on_disk {
        settings.size_mode = SizeMode::OnDisk;
    }

    // Relative paths resolve against the working directory
    let root = std::env::current_dir()?.join(directory);

    let color = !cli.no_color
        && std::env::var_os("NO_COLOR").is_none()
        && std::io::stdout().is_terminal();

    let options = nmscan::app::RunOptions {
        root,
        policy,
        color,
        live_progress: std::io::stderr().is_terminal(),
        quiet: false,
        export_json: cli.export_json,
        export_markdown: cli.export_markdown,
    };

    let app = nmscan::app::App::new(settings, options);
    app.run().await?;
    Ok(())
}
