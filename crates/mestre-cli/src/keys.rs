use std::path::{Path, PathBuf};

use clap::Subcommand;
use color_eyre::Result;
use eyre::{WrapErr as _, eyre};
use mestre_pix::{
    KeyType, MerchantInfo, PixKey,
    saved_keys::{JsonFileKeyStore, KeyStore as _, SavedKey},
};
use tracing::info;

#[derive(Subcommand)]
pub enum KeysCommands {
    /// Show every saved key
    List,

    /// Save a key under a label, replacing any key with the same label
    Add {
        label: String,

        /// cpf, cnpj, email, phone or random
        key_type: KeyType,

        key: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        city: Option<String>,
    },

    /// Forget a saved key
    Remove { label: String },
}

/// The `--store` path, or `<data dir>/mestre-pix/keys.json`
pub fn store_path(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }

    let data_dir = dirs::data_dir().ok_or_else(|| eyre!("no data directory on this platform"))?;
    Ok(data_dir.join("mestre-pix").join("keys.json"))
}

pub fn run(command: KeysCommands, store_path: &Path) -> Result<()> {
    let store = JsonFileKeyStore::open(store_path)
        .wrap_err_with(|| format!("unable to open {}", store_path.display()))?;

    match command {
        KeysCommands::List => {
            for saved in store.list()? {
                match &saved.merchant {
                    Some(merchant) => {
                        println!("{}\t{}\t{} / {}", saved.label, saved.key, merchant.name, merchant.city)
                    }
                    None => println!("{}\t{}", saved.label, saved.key),
                }
            }
        }

        KeysCommands::Add { label, key_type, key, name, city } => {
            let mut saved = SavedKey::new(label, PixKey::new(key_type, key));
            if name.is_some() || city.is_some() {
                saved = saved.with_merchant(MerchantInfo::new(
                    name.unwrap_or_default(),
                    city.unwrap_or_default(),
                ));
            }

            store.save(saved)?;
            info!("saved key to {}", store.path().display());
        }

        KeysCommands::Remove { label } => {
            let removed = store.remove(&label)?;
            info!("removed {}", removed.key);
        }
    }

    Ok(())
}
