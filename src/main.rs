use clap::Parser;
use log::info;
use pulse::collector::SnapshotCollector;
use pulse::config::Config;
use pulse::dialog::{DialogAction, DialogOutcome, DialogSession, DialogView};
use pulse::error::ProbeError;
use pulse::export::Exporter;
use pulse::highlight::HighlightLevel;
use pulse::host::{
    DocumentSource, EntityCounts, HookRegistry, MessageRegistry, ModuleCounts, ModuleRegistry,
    PatchRegistry, SceneSource, SystemHost,
};
use pulse::sampler::Sampler;
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

/// Command-line arguments for the pulse diagnostics demo
#[derive(Parser)]
#[command(
    name = "pulse",
    about = "Host diagnostics snapshot collector",
    long_about = "Collects runtime diagnostics from a set of host probes, renders the \
                  grouped report with highlight thresholds, and optionally samples \
                  snapshots on a fixed interval or exports the report as JSON."
)]
struct Cli {
    /// Path to configuration file (TOML format)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    verbose: bool,

    /// Export the collected snapshot as JSON after rendering
    #[arg(short, long)]
    export: bool,

    /// Run a tracking session for the given number of seconds, then print
    /// the collected sample count
    #[arg(short, long, value_name = "SECONDS")]
    track: Option<u64>,
}

/// Demo host with representative registry contents.
///
/// Stands in for the real host application so the binary can exercise the
/// full probe set; memory readings come from the actual process via
/// [`SystemHost`].
struct DemoHost;

impl DocumentSource for DemoHost {
    fn element_count(&self) -> Result<u64, ProbeError> {
        Ok(4_812)
    }
}

impl HookRegistry for DemoHost {
    fn callbacks_per_extension(&self) -> Result<Vec<(String, u64)>, ProbeError> {
        Ok(vec![
            ("core".to_string(), 64),
            ("dice-tray".to_string(), 9),
            ("token-magic".to_string(), 21),
        ])
    }
}

impl PatchRegistry for DemoHost {
    fn patches_per_extension(&self) -> Result<Vec<(String, u64)>, ProbeError> {
        Ok(vec![
            ("token-magic".to_string(), 6),
            ("lib-themes".to_string(), 2),
        ])
    }
}

impl MessageRegistry for DemoHost {
    fn handlers_per_extension(&self) -> Result<Vec<(String, u64)>, ProbeError> {
        Ok(vec![("dice-tray".to_string(), 3)])
    }
}

impl ModuleRegistry for DemoHost {
    fn module_counts(&self) -> Result<ModuleCounts, ProbeError> {
        Ok(ModuleCounts {
            active: 12,
            total: 30,
        })
    }
}

impl SceneSource for DemoHost {
    fn entity_counts(&self) -> Result<EntityCounts, ProbeError> {
        Ok(EntityCounts {
            actors: 2_450,
            items: 1_180,
            journals: 96,
            scenes: 14,
            active_scene_tokens: 87,
            active_scene_unique_actors: 23,
        })
    }

    fn force_redraw<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<(), ProbeError>> + Send + 'a>> {
        Box::pin(async {
            tokio::time::sleep(Duration::from_millis(35)).await;
            Ok(())
        })
    }
}

fn print_view(view: &DialogView) {
    println!(
        "Diagnostics report ({}){}",
        view.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
        if view.is_tracking { " [tracking]" } else { "" }
    );
    for group in &view.groups {
        println!("\n{}", group.title);
        for row in &group.rows {
            let flag = match row.highlight {
                HighlightLevel::None => "",
                HighlightLevel::Orange => "  [orange]",
                HighlightLevel::Red => "  [RED]",
            };
            println!("  {:<32} {}{}", row.label, row.value, flag);
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut builder = env_logger::Builder::from_default_env();
    if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();

    let config = Config::load(cli.config.as_deref())?;
    info!(
        "Loaded configuration: period={:?}, export prefix '{}'",
        config.tracking_period(),
        config.export.prefix
    );

    let demo = Arc::new(DemoHost);
    let collector = Arc::new(SnapshotCollector::standard(
        Arc::new(SystemHost),
        Arc::clone(&demo) as Arc<dyn DocumentSource>,
        Arc::clone(&demo) as Arc<dyn HookRegistry>,
        Some(Arc::clone(&demo) as Arc<dyn PatchRegistry>),
        Some(Arc::clone(&demo) as Arc<dyn MessageRegistry>),
        Arc::clone(&demo) as Arc<dyn ModuleRegistry>,
        Arc::clone(&demo) as Arc<dyn SceneSource>,
    ));

    let sampler = Sampler::new(Arc::clone(&collector), config.tracking_period());
    let exporter = Exporter::new(config.export.directory.clone(), config.export.prefix.clone());

    let mut session = DialogSession::open(Arc::clone(&collector), sampler, exporter).await;
    print_view(&session.view());

    if cli.export {
        if let DialogOutcome::Exported(path) = session.handle(DialogAction::Export).await? {
            println!("\nExported report to {}", path.display());
        }
    }

    if let Some(seconds) = cli.track {
        println!("\nTracking for {} seconds...", seconds);
        session.handle(DialogAction::ToggleTracking).await?;
        tokio::time::sleep(Duration::from_secs(seconds)).await;
        session.handle(DialogAction::ToggleTracking).await?;
        let samples = session.sampler().series();
        println!("Collected {} sample(s)", samples.len());
    }

    session.handle(DialogAction::Close).await?;
    Ok(())
}
