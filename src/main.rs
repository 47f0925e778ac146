use std::env;
use std::path::PathBuf;
use std::process;

use tracing::{error, info};

use chalk_grains::playback::{write_playback_params, PlaybackParams};
use chalk_grains::{BatchGenerator, Result, SynthConfig};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        eprintln!(r#"Usage: chalk_grains ["/abs/to/out_dir"] [--params]"#);
        process::exit(0);
    }

    let mut config = SynthConfig::from_env();
    if let Some(out_dir) = args.iter().find(|a| !a.starts_with("--")) {
        config.out_dir = PathBuf::from(out_dir);
    }
    let emit_params = args.iter().any(|a| a == "--params");

    match render_grains(&config, emit_params) {
        Ok(_) => {
            println!("{}", config.out_dir.display())
        }
        Err(err) => {
            error!("Problem while generating grains: {}", err);
            process::exit(1);
        }
    }
}

fn render_grains(config: &SynthConfig, emit_params: bool) -> Result<()> {
    let batch = BatchGenerator::from_config(config).generate()?;
    batch.write(&config.out_dir)?;

    if emit_params {
        write_playback_params(&PlaybackParams::default(), &config.out_dir)?;
        info!("wrote playback params to {}", config.out_dir.display());
    }
    Ok(())
}
