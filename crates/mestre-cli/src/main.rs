use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::Result;
use eyre::WrapErr as _;
use mestre_pix::{EncoderConfig, decode, encode_strict, encode_with, validate};

mod input;
mod keys;

#[derive(Parser)]
#[command(name = "mestre-pix")]
#[command(about = "Build and read Pix \"Copia e Cola\" payloads", long_about = None)]
struct Cli {
    /// Enable debug logging, RUST_LOG takes precedence
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Saved key store, defaults to <data dir>/mestre-pix/keys.json
    #[arg(long, global = true, env = "MESTRE_PIX_STORE")]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the payload for a key, merchant and optional payment details
    Encode {
        #[command(flatten)]
        input: input::PixInput,

        /// Refuse inputs that would need fallbacks or truncation
        #[arg(long)]
        strict: bool,

        /// JSON file overriding the fallback name and city
        #[arg(long, conflicts_with = "strict")]
        config: Option<PathBuf>,
    },

    /// Print the fields of a payload as JSON
    Decode {
        /// The "Copia e Cola" string
        payload: String,
    },

    /// List every problem the strict encoder would report, exits with 1 if there is any
    Validate {
        #[command(flatten)]
        input: input::PixInput,
    },

    /// Manage saved keys
    #[command(subcommand)]
    Keys(keys::KeysCommands),
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    mestre_pix::logging::init(cli.verbose);

    // only `--saved` and `keys` touch the store
    let store = cli.store.as_deref();

    match cli.command {
        Commands::Encode { input, strict, config } => {
            let (key, merchant, payment) = input.resolve(store)?;

            let payload = if strict {
                encode_strict(&key, &merchant, &payment)?
            } else {
                let config = match config {
                    Some(path) => EncoderConfig::from_json_file(&path)?,
                    None => EncoderConfig::default(),
                };

                encode_with(&config, &key, &merchant, &payment)
            };

            println!("{payload}");
            Ok(())
        }

        Commands::Decode { payload } => {
            let decoded = decode(&payload).wrap_err("unable to decode payload")?;
            let json = serde_json::to_string_pretty(&decoded)?;

            println!("{json}");
            Ok(())
        }

        Commands::Validate { input } => {
            let (key, merchant, payment) = input.resolve(store)?;
            let errors = validate(&key, &merchant, &payment);

            if errors.is_empty() {
                println!("ok");
                return Ok(());
            }

            for error in &errors {
                println!("{error}");
            }

            std::process::exit(1);
        }

        Commands::Keys(command) => keys::run(command, &keys::store_path(store)?),
    }
}
