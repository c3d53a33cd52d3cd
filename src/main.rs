use api_drift::config::ChangerConfig;
use api_drift::logic::ApiChanger;
use api_drift::store::SnapshotStore;

fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    // Initialize logging with INFO level only (suppress DEBUG logs)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("api-drift: API model version synthesizer");

    // Load configuration
    let config = ChangerConfig::load()?;
    println!(
        "Configuration loaded: versions_dir={}, base=v{}, groups={}, seed={}",
        config.paths.versions_dir, config.run.base_version, config.run.group_count, config.run.seed
    );

    let snapshots = SnapshotStore::new(
        &config.paths.versions_dir,
        &config.paths.system_model_file,
        &config.paths.annotation_file,
        &config.paths.transitions_file,
    );

    // A missing or unreadable base snapshot is fatal: nothing to mutate
    let (system, annotation, transitions) = snapshots.load_version(config.run.base_version)?;
    println!(
        "Base snapshot v{} loaded: {} interfaces, {} inputs, {} transitions",
        config.run.base_version,
        system.interfaces.len(),
        annotation.inputs.len(),
        transitions.transitions.len()
    );

    let mut changer = ApiChanger::new(
        system,
        annotation,
        transitions,
        snapshots,
        &config.run,
        &config.exclusions,
    )?;
    changer.run()?;

    println!(
        "Done: versions v{} through v{} written to {}",
        config.run.base_version + 1,
        config.run.base_version + config.run.group_count as u32,
        config.paths.versions_dir
    );

    Ok(())
}
