//! Custom Render Pipeline Runner
//!
//! Loads a pipeline asset and renders a demo scene through the headless
//! render context, logging the shadow and lighting state each frame
//! publishes.
//!
//! Run with: cargo run -p crp_runtime -- [pipeline.toml]
//!  verbose: RUST_LOG=debug cargo run --bin crp

mod demo_scene;
mod pipeline_config;

use pipeline_config::RuntimeConfig;

fn main() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    ).init();

    let config = match RuntimeConfig::load() {
        Ok(config) => config,
        Err(err) => {
            log::error!("{}", err);
            std::process::exit(1);
        }
    };
    config.print_summary();

    let stats = demo_scene::run(&config);
    log::info!(
        "Done: {} camera(s) rendered, {} skipped over {} frame(s)",
        stats.cameras_rendered,
        stats.cameras_skipped,
        config.frames
    );
}
