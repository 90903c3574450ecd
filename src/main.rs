use std::path::PathBuf;

use clap::{Parser, Subcommand};

use notefold::{convert_all, preview, ConvertOptions};

#[derive(Parser)]
#[command(name = "notefold", about = "Convert flat note exports into a categorized notebook tree", version)]
struct Cli {
    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
enum OutputFormat {
    Plain,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Convert every top-level folder under the input root
    Convert {
        /// Root folder containing the export's input folders
        input_root: PathBuf,
        /// Folder to write the converted notebooks into
        output_root: PathBuf,
        /// Name of the asset pool folder inside each input folder
        #[arg(long, default_value = "Files")]
        assets_dir: String,
        /// Name of the optional pre-existing notebook-structure folder
        #[arg(long, default_value = "Notebook")]
        structure_dir: String,
    },

    /// Scan an input root and report what a conversion would process
    Preview {
        /// Root folder containing the export's input folders
        input_root: PathBuf,
        /// Name of the asset pool folder inside each input folder
        #[arg(long, default_value = "Files")]
        assets_dir: String,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Command::Convert {
            input_root,
            output_root,
            assets_dir,
            structure_dir,
        } => {
            let opts = ConvertOptions {
                assets_dir,
                structure_dir,
            };
            let report = convert_all(&input_root, &output_root, &opts)?;

            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
                OutputFormat::Plain => {
                    for folder in &report.folders {
                        println!(
                            "{}: placed {}/{} note(s), copied {} asset(s)",
                            folder.folder,
                            folder.notes_placed,
                            folder.notes_total,
                            folder.assets_copied
                        );
                        for warning in &folder.warnings {
                            println!("  warning: {}", warning);
                        }
                    }
                    for error in &report.errors {
                        eprintln!("error: {}", error);
                    }
                }
            }

            if !report.success() {
                std::process::exit(1);
            }
        }
        Command::Preview {
            input_root,
            assets_dir,
        } => {
            let opts = ConvertOptions {
                assets_dir,
                ..ConvertOptions::default()
            };
            let result = preview(&input_root, &opts)?;

            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
                OutputFormat::Plain => {
                    println!(
                        "{} folder(s), {} note(s), {} asset(s), {} categorie(s)",
                        result.folder_count,
                        result.note_count,
                        result.asset_count,
                        result.category_count
                    );
                    for name in &result.notes {
                        println!("  {}", name);
                    }
                    for warning in &result.warnings {
                        println!("  warning: {}", warning);
                    }
                }
            }
        }
    }

    Ok(())
}
