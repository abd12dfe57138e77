mod cli;

use swarmscore::{analysis, config};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use serde::Serialize;
use std::path::Path;
use swarm_ancestry::{Contributors, Inherit, Piece};
use swarm_core::{ChunkLog, Session};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "swarmscore=debug,swarm_core=debug,swarm_ancestry=debug,swarm_interpret=debug"
                .to_string()
        } else {
            "swarmscore=info,swarm_core=info,swarm_ancestry=info,swarm_interpret=warn".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Interpret { log, annotate } => {
            interpret_log(&log, cli.config.as_deref(), annotate)
        }
        Commands::Ancestry {
            log,
            segments,
            contributors,
            filenum,
        } => ancestry_log(&log, cli.config.as_deref(), segments, contributors, filenum),
        Commands::Contributions { log, filenum } => {
            contributions_log(&log, cli.config.as_deref(), filenum)
        }
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("swarmscore {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn load_session(log: &Path, config: &config::Config) -> Result<Session> {
    tracing::info!("Loading chunk log: {:?}", log);
    let mut session = ChunkLog::load(log)
        .with_context(|| format!("Failed to read chunk log: {:?}", log))?
        .into_session()
        .with_context(|| format!("Invalid chunk log: {:?}", log))?;

    if config.session.ignore_undescribed_files {
        session.retain_described_files();
    }
    tracing::info!("Found {} chunks", session.chunks.len());
    Ok(session)
}

fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[derive(Serialize)]
struct AnnotatedInterpretation<'a> {
    segments: &'a [swarm_core::Segment],
    chunks: &'a [swarm_core::Chunk],
}

fn interpret_log(log: &Path, config_path: Option<&Path>, annotate: bool) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let mut session = load_session(log, &config)?;

    let segments = analysis::interpret_session(&mut session, &config)?;
    tracing::info!("Interpreted {} segments", segments.len());

    if annotate {
        print_json(&AnnotatedInterpretation {
            segments: &segments,
            chunks: &session.chunks,
        })
    } else {
        print_json(&segments)
    }
}

fn ancestry_log(
    log: &Path,
    config_path: Option<&Path>,
    from_segments: bool,
    contributors: bool,
    filenum: Option<u32>,
) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let mut session = load_session(log, &config)?;
    analysis::select_file(&mut session, filenum).context("Use --filenum to pick one file")?;

    let segments = if from_segments {
        Some(analysis::interpret_session(&mut session, &config)?)
    } else {
        None
    };

    if contributors {
        print_pieces::<Contributors>(&session, segments.as_deref(), &config)
    } else {
        print_pieces::<()>(&session, segments.as_deref(), &config)
    }
}

fn print_pieces<P>(
    session: &Session,
    segments: Option<&[swarm_core::Segment]>,
    config: &config::Config,
) -> Result<()>
where
    P: Inherit + Serialize,
    for<'a> Piece<P>: From<&'a swarm_core::Chunk> + From<&'a swarm_core::Segment>,
{
    let tracker = match segments {
        Some(segments) => analysis::track_ancestry(segments.iter().map(Piece::<P>::from), config)?,
        None => analysis::track_ancestry(session.chunks.iter().map(Piece::<P>::from), config)?,
    };
    let pieces: Vec<&Piece<P>> = tracker.last_pieces().collect();
    print_json(&pieces)
}

fn contributions_log(log: &Path, config_path: Option<&Path>, filenum: Option<u32>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let mut session = load_session(log, &config)?;
    if let Some(filenum) = filenum {
        session.retain_file(filenum);
    }
    print_json(&analysis::peer_coverage(&session)?)
}

fn validate_config(config_path: Option<&Path>) -> Result<()> {
    match config_path {
        Some(path) => {
            config::load_config(path)?;
            println!("Configuration is valid: {}", path.display());
        }
        None => {
            config::load_config_or_default(None)?;
            println!("Configuration is valid (defaults)");
        }
    }
    Ok(())
}
