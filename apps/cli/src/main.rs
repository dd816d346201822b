use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use stickymarks_core::{
    build_listing, clean_line_text, live_markers, Command, EditorHost, MemoryHost,
    NavigationTarget, Settings, SettingsStore, Synchronizer, ViewId, NO_BOOKMARKS_MESSAGE,
};

#[derive(Parser)]
#[command(
    name = "stickymarks-cli",
    about = "Manage sticky bookmarks that follow their lines across edits",
    author,
    version
)]
struct Cli {
    /// 工作區識別檔（例如專案檔）；未指定時不保存書籤。 / Project file identifying the
    /// workspace; bookmarks are not persisted without it.
    #[arg(long, global = true, value_name = "FILE")]
    project: Option<PathBuf>,
    /// 設定檔路徑。 / Settings JSON file.
    #[arg(long, global = true, value_name = "FILE")]
    settings: Option<PathBuf>,
    /// 輸出除錯紀錄。 / Print debug logs on stderr.
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 切換指定行的書籤。 / Toggle bookmarks on the given lines of a file.
    Mark(MarkArgs),
    /// 顯示檔案目前的書籤位置。 / Show where a file's bookmarks land now.
    Show(FileArgs),
    /// 列出工作區所有書籤。 / List every bookmark in the workspace.
    List(ListArgs),
    /// 清除單一檔案的書籤。 / Clear the bookmarks of one file.
    Clear(FileArgs),
    /// 清除工作區所有書籤。 / Clear every bookmark in the workspace.
    ClearAll,
}

#[derive(Args)]
struct MarkArgs {
    /// 目標檔案。 / File to mark.
    #[arg(value_name = "FILE")]
    file: PathBuf,
    /// 以 1 起算的行號。 / 1-based line numbers to toggle.
    #[arg(required = true, value_name = "LINE")]
    lines: Vec<usize>,
}

#[derive(Args)]
struct FileArgs {
    #[arg(value_name = "FILE")]
    file: PathBuf,
}

#[derive(Args)]
struct ListArgs {
    /// 視為已開啟的檔案。 / Files to treat as open views.
    #[arg(long = "open", value_name = "FILE")]
    open: Vec<PathBuf>,
    /// 選取第 N 筆（1 起算）並輸出目的地。 / Select the Nth entry (1-based) and print
    /// where it leads.
    #[arg(long, value_name = "N")]
    select: Option<usize>,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings = load_settings(cli.settings.as_deref())?;
    let mut host = match &cli.project {
        Some(project) => MemoryHost::with_identity(absolute(project)?),
        None => {
            log::warn!("no --project given; bookmarks will not be saved");
            MemoryHost::new()
        }
    };
    let mut sync = Synchronizer::for_host(&host, &settings);

    match cli.command {
        Commands::Mark(args) => mark(&mut host, &mut sync, args)?,
        Commands::Show(args) => show(&mut host, &mut sync, &args.file)?,
        Commands::List(args) => list(&mut host, &mut sync, args)?,
        Commands::Clear(args) => {
            open_view(&mut host, &mut sync, &args.file)?;
            sync.dispatch(&mut host, Command::ClearFile);
            println!("Cleared bookmarks in {}", args.file.display());
        }
        Commands::ClearAll => {
            sync.dispatch(&mut host, Command::ClearAll);
            println!("Cleared all bookmarks");
        }
    }

    if let Some(err) = sync.last_save_error() {
        bail!("bookmarks were not saved: {err}");
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_settings(path: Option<&Path>) -> Result<Settings> {
    match path {
        Some(path) => {
            let store = SettingsStore::load(path)
                .with_context(|| format!("failed to load settings from {}", path.display()))?;
            Ok(store.into_settings())
        }
        None => Ok(Settings::default()),
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("failed to resolve current directory")?;
    Ok(cwd.join(path))
}

/// 將檔案載入為視圖並觸發載入事件。 / Loads a file as a view and fires the load event.
fn open_view(host: &mut MemoryHost, sync: &mut Synchronizer, file: &Path) -> Result<ViewId> {
    let path = fs::canonicalize(file)
        .with_context(|| format!("file '{}' does not exist", file.display()))?;
    let text = fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let view = host.open_file(&path, text);
    sync.dispatch(host, Command::FileLoaded(view));
    Ok(view)
}

fn mark(host: &mut MemoryHost, sync: &mut Synchronizer, args: MarkArgs) -> Result<()> {
    let view = open_view(host, sync, &args.file)?;
    let layer = sync.layer().to_string();
    let line_count = host.text(view).map_or(0, |buffer| buffer.line_count());
    for line in args.lines {
        let index = line
            .checked_sub(1)
            .ok_or_else(|| anyhow!("line numbers start at 1"))?;
        if index >= line_count {
            bail!("{} has no line {line}", args.file.display());
        }
        let verb = if host.toggle_marker(view, &layer, index) {
            "Marked"
        } else {
            "Unmarked"
        };
        println!("{verb} {}:{line}", args.file.display());
    }
    sync.dispatch(host, Command::FileClosed(view));
    Ok(())
}

fn show(host: &mut MemoryHost, sync: &mut Synchronizer, file: &Path) -> Result<()> {
    let view = open_view(host, sync, file)?;
    let markers = live_markers(&*host, view, sync.layer()).unwrap_or_default();
    if markers.is_empty() {
        println!("{NO_BOOKMARKS_MESSAGE}");
    }
    for marker in &markers {
        println!("{}: {}", marker.line + 1, clean_line_text(&marker.text));
    }
    // Closing re-captures the re-anchored positions.
    sync.dispatch(host, Command::FileClosed(view));
    Ok(())
}

fn list(host: &mut MemoryHost, sync: &mut Synchronizer, args: ListArgs) -> Result<()> {
    for file in &args.open {
        open_view(host, sync, file)?;
    }

    let entries = build_listing(&*host, sync.markers(), sync.layer());
    if entries.is_empty() {
        println!("{NO_BOOKMARKS_MESSAGE}");
        return Ok(());
    }
    for (idx, entry) in entries.iter().enumerate() {
        println!("{:>3}. {}", idx + 1, entry.label);
    }

    if let Some(choice) = args.select {
        host.answer_next_choice(choice.checked_sub(1));
        match sync.dispatch(host, Command::List) {
            Some(NavigationTarget::ClosedFile { path, line }) => {
                println!("Open {path}:{}", line + 1);
            }
            Some(NavigationTarget::OpenView { view, offset }) => {
                let line = host
                    .text(view)
                    .map(|buffer| buffer.row_col(offset).0 + 1)
                    .unwrap_or(1);
                let name = host.file_name(view).unwrap_or_default();
                println!("Focus {name}:{line}");
            }
            None => bail!("no bookmark number {choice}"),
        }
    }
    Ok(())
}
