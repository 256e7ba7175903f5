use std::path::Path;

use clap::Args;
use color_eyre::Result;
use eyre::{WrapErr as _, eyre};
use mestre_pix::{
    Amount, KeyType, MerchantInfo, PaymentRequest, PixKey,
    saved_keys::{JsonFileKeyStore, KeyStore as _},
};

use crate::keys;

/// Payload inputs shared by `encode` and `validate`
#[derive(Debug, Args)]
pub struct PixInput {
    /// cpf, cnpj, email, phone or random
    #[arg(long, requires = "key")]
    pub key_type: Option<KeyType>,

    #[arg(long, requires = "key_type")]
    pub key: Option<String>,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub city: Option<String>,

    /// In reais, "10.50" or "10,50"
    #[arg(long)]
    pub amount: Option<Amount>,

    #[arg(long)]
    pub txid: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    /// Start from a saved key, the other flags override what it stores
    #[arg(long)]
    pub saved: Option<String>,
}

impl PixInput {
    /// `store` is only looked at, or defaulted, when `--saved` is given
    pub fn resolve(self, store: Option<&Path>) -> Result<(PixKey, MerchantInfo, PaymentRequest)> {
        let (saved_key, saved_merchant) = match &self.saved {
            Some(label) => {
                let store_path = keys::store_path(store)?;
                let store = JsonFileKeyStore::open(&store_path)
                    .wrap_err_with(|| format!("unable to open {}", store_path.display()))?;

                let saved = store.get(label)?;
                (Some(saved.key), saved.merchant.unwrap_or_default())
            }
            None => (None, MerchantInfo::default()),
        };

        let key = match (self.key_type, self.key) {
            (Some(key_type), Some(key)) => PixKey::new(key_type, key),
            _ => saved_key.ok_or_else(|| eyre!("--key-type and --key are required without --saved"))?,
        };

        let merchant = MerchantInfo {
            name: self.name.unwrap_or(saved_merchant.name),
            city: self.city.unwrap_or(saved_merchant.city),
        };

        let payment = PaymentRequest { amount: self.amount, txid: self.txid, description: self.description };

        Ok((key, merchant, payment))
    }
}
