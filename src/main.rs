//! Command-line front end for the save/blueprint codec.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use satisfactory_save_codec::{
    blueprint_to_json, parse_blueprint, parse_save, save_to_json, write_blueprint, write_save, CompressionStats,
    ParseOptions, WriteOptions,
};

#[derive(Parser)]
#[command(name = "satisfactory-save-codec")]
#[command(about = "Decode and encode factory-building-game save and blueprint files")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a .sav file and print a summary report
    ParseSave {
        /// Input .sav file path
        #[arg(short, long)]
        input: PathBuf,

        /// Report detail (summary, detailed)
        #[arg(short, long, default_value = "summary")]
        format: String,
    },

    /// Parse and then re-encode a .sav file, verifying the round trip
    WriteSave {
        /// Input .sav file path
        #[arg(short, long)]
        input: PathBuf,

        /// Where to write the re-encoded file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Parse a blueprint file pair (.sbp main file + .sbpcfg config file)
    ParseBlueprint {
        #[arg(long)]
        main: PathBuf,

        #[arg(long)]
        config: PathBuf,

        #[arg(short, long, default_value = "summary")]
        format: String,
    },

    /// Parse and then re-encode a blueprint file pair, verifying the round trip
    WriteBlueprint {
        #[arg(long)]
        main: PathBuf,

        #[arg(long)]
        config: PathBuf,

        #[arg(long)]
        output_main: PathBuf,

        #[arg(long)]
        output_config: PathBuf,
    },

    /// Render a save or blueprint as indented JSON
    Stringify {
        /// Input .sav file, or a blueprint's main file when --config is set
        #[arg(short, long)]
        input: PathBuf,

        /// Blueprint config file path; omit to treat --input as a save file
        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long, default_value_t = 2)]
        indent: usize,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::ParseSave { input, format } => parse_save_command(input, format),
        Commands::WriteSave { input, output } => write_save_command(input, output),
        Commands::ParseBlueprint { main, config, format } => parse_blueprint_command(main, config, format),
        Commands::WriteBlueprint {
            main,
            config,
            output_main,
            output_config,
        } => write_blueprint_command(main, config, output_main, output_config),
        Commands::Stringify { input, config, indent, output } => stringify_command(input, config, indent, output),
    }
}

fn parse_save_command(input: PathBuf, format: String) -> Result<()> {
    let bytes = std::fs::read(&input).with_context(|| format!("reading {}", input.display()))?;
    tracing::debug!(path = %input.display(), bytes = bytes.len(), "decoding save file");

    let save = parse_save(&input.display().to_string(), &bytes, ParseOptions::default())?;
    for warning in save.header.validate() {
        println!("⚠ {warning}");
    }
    println!("✓ parsed {}", input.display());
    println!("{}", save.header.describe());

    if format == "detailed" {
        for (i, level) in save.levels.iter().enumerate() {
            println!(
                "  level {} ({}): {} objects, {} collectables",
                i,
                save.level_name(i),
                level.objects.len(),
                level.collectables.len()
            );
        }
    }
    Ok(())
}

fn write_save_command(input: PathBuf, output: PathBuf) -> Result<()> {
    let bytes = std::fs::read(&input).with_context(|| format!("reading {}", input.display()))?;
    let save = parse_save(&input.display().to_string(), &bytes, ParseOptions::default())?;

    let (encoded, summaries) = write_save(&save, |_header| {}, |_summary, _bytes| {}, WriteOptions::default())?;

    let roundtrip = parse_save(&output.display().to_string(), &encoded, ParseOptions::default())?;
    if roundtrip != save {
        anyhow::bail!("round-trip check failed: re-decoded save does not match the original");
    }

    std::fs::write(&output, &encoded).with_context(|| format!("writing {}", output.display()))?;
    let stats = CompressionStats::summarize(&summaries);
    println!(
        "✓ wrote {} ({} chunks, {:.1}% smaller, round-trip verified)",
        output.display(),
        stats.chunk_count,
        stats.efficiency_percent()
    );
    Ok(())
}

fn parse_blueprint_command(main: PathBuf, config: PathBuf, format: String) -> Result<()> {
    let main_bytes = std::fs::read(&main).with_context(|| format!("reading {}", main.display()))?;
    let config_bytes = std::fs::read(&config).with_context(|| format!("reading {}", config.display()))?;

    let blueprint = parse_blueprint(
        &main.display().to_string(),
        &main_bytes,
        &config_bytes,
        ParseOptions::default(),
    )?;
    println!("✓ parsed {} ({} objects)", main.display(), blueprint.objects.len());
    if format == "detailed" {
        for object in &blueprint.objects {
            println!("  {object:?}");
        }
    }
    Ok(())
}

fn write_blueprint_command(
    main: PathBuf,
    config: PathBuf,
    output_main: PathBuf,
    output_config: PathBuf,
) -> Result<()> {
    let main_bytes = std::fs::read(&main).with_context(|| format!("reading {}", main.display()))?;
    let config_bytes = std::fs::read(&config).with_context(|| format!("reading {}", config.display()))?;
    let blueprint = parse_blueprint(
        &main.display().to_string(),
        &main_bytes,
        &config_bytes,
        ParseOptions::default(),
    )?;

    let (encoded_main, summaries, encoded_config) =
        write_blueprint(&blueprint, |_| {}, |_, _| {}, WriteOptions::default())?;

    let roundtrip = parse_blueprint(
        &output_main.display().to_string(),
        &encoded_main,
        &encoded_config,
        ParseOptions::default(),
    )?;
    if roundtrip != blueprint {
        anyhow::bail!("round-trip check failed: re-decoded blueprint does not match the original");
    }

    std::fs::write(&output_main, &encoded_main).with_context(|| format!("writing {}", output_main.display()))?;
    std::fs::write(&output_config, &encoded_config)
        .with_context(|| format!("writing {}", output_config.display()))?;
    let stats = CompressionStats::summarize(&summaries);
    println!(
        "✓ wrote {} and {} ({:.1}% smaller, round-trip verified)",
        output_main.display(),
        output_config.display(),
        stats.efficiency_percent()
    );
    Ok(())
}

fn stringify_command(input: PathBuf, config: Option<PathBuf>, indent: usize, output: Option<PathBuf>) -> Result<()> {
    let input_bytes = std::fs::read(&input).with_context(|| format!("reading {}", input.display()))?;

    let json = match config {
        Some(config_path) => {
            let config_bytes =
                std::fs::read(&config_path).with_context(|| format!("reading {}", config_path.display()))?;
            let blueprint = parse_blueprint(
                &input.display().to_string(),
                &input_bytes,
                &config_bytes,
                ParseOptions::default(),
            )?;
            satisfactory_save_codec::json::stringify(&blueprint_to_json(&blueprint), indent)
        }
        None => {
            let save = parse_save(&input.display().to_string(), &input_bytes, ParseOptions::default())?;
            satisfactory_save_codec::json::stringify(&save_to_json(&save), indent)
        }
    };

    match output {
        Some(path) => {
            std::fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
            println!("✓ wrote {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
