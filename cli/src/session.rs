use crate::config::GspConfig;
use crate::error::CliError;
use anchor_client::{Client, Cluster, Program};
use anchor_lang::AccountDeserialize;
use serde::Serialize;
use solana_client::rpc_client::RpcClient;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::instruction::Instruction;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{read_keypair_file, Keypair, Signature, Signer};
use solana_sdk::transaction::Transaction;
use std::rc::Rc;

pub type GspProgram = Program<Rc<Keypair>>;

pub fn parse_pubkey(value: &str) -> Result<Pubkey, CliError> {
    value
        .parse::<Pubkey>()
        .map_err(|_| CliError::InvalidPubkey(value.to_string()))
}

/// Connection, signer and target mint shared by every command.
pub struct Session {
    client: Client<Rc<Keypair>>,
    rpc: RpcClient,
    payer: Rc<Keypair>,
    mint: Option<Pubkey>,
    pub json: bool,
    pub config: GspConfig,
}

impl Session {
    pub fn open(config: GspConfig, json: bool) -> Result<Self, CliError> {
        let path = config.keypair_file();
        let keypair = read_keypair_file(&path)
            .map_err(|e| CliError::KeypairError(format!("{}: {e}", path.display())))?;
        let payer = Rc::new(keypair);

        let commitment = CommitmentConfig::confirmed();
        let client = Client::new_with_options(
            Cluster::Custom(config.rpc_url.clone(), config.ws_url()),
            payer.clone(),
            commitment,
        );
        let rpc = RpcClient::new_with_commitment(config.rpc_url.clone(), commitment);
        let mint = config.asset_mint.as_deref().map(parse_pubkey).transpose()?;

        tracing::debug!(rpc = %config.rpc_url, payer = %payer.pubkey(), "session opened");
        Ok(Self {
            client,
            rpc,
            payer,
            mint,
            json,
            config,
        })
    }

    pub fn payer(&self) -> Pubkey {
        self.payer.pubkey()
    }

    pub fn mint(&self) -> Result<Pubkey, CliError> {
        self.mint.ok_or(CliError::MissingMint)
    }

    pub fn gatekeeper(&self) -> Result<GspProgram, CliError> {
        Ok(self.client.program(gsp_gatekeeper::ID)?)
    }

    pub fn oracle(&self) -> Result<GspProgram, CliError> {
        Ok(self.client.program(gsp_oracle_module::ID)?)
    }

    pub fn token(&self) -> Result<GspProgram, CliError> {
        Ok(self.client.program(gsp_token::ID)?)
    }

    pub fn rpc(&self) -> &RpcClient {
        &self.rpc
    }

    /// Reads an Anchor account, `None` when it does not exist.
    pub fn fetch<T: AccountDeserialize>(&self, address: &Pubkey) -> Result<Option<T>, CliError> {
        let account = self
            .rpc
            .get_account_with_commitment(address, self.rpc.commitment())?
            .value;
        account
            .map(|account| {
                T::try_deserialize(&mut account.data.as_slice())
                    .map_err(|e| CliError::InvalidAccountData(format!("{address}: {e}")))
            })
            .transpose()
    }

    pub fn fetch_required<T: AccountDeserialize>(&self, address: &Pubkey) -> Result<T, CliError> {
        self.fetch(address)?
            .ok_or_else(|| CliError::AccountNotFound(address.to_string()))
    }

    /// Sends instructions that need signers beyond the payer.
    pub fn send_with_signers(
        &self,
        instructions: &[Instruction],
        extra_signers: &[&Keypair],
    ) -> Result<Signature, CliError> {
        let mut signers: Vec<&dyn Signer> = vec![self.payer.as_ref()];
        signers.extend(extra_signers.iter().map(|k| *k as &dyn Signer));

        let blockhash = self.rpc.get_latest_blockhash()?;
        let tx = Transaction::new_signed_with_payer(
            instructions,
            Some(&self.payer()),
            &signers,
            blockhash,
        );
        Ok(self.rpc.send_and_confirm_transaction(&tx)?)
    }

    pub fn report(&self, action: &str, signature: Signature) {
        tracing::info!(%signature, "{action}");
        if self.json {
            println!("{}", serde_json::json!({ "action": action, "signature": signature.to_string() }));
        } else {
            println!("{action}: {signature}");
        }
    }

    pub fn show<T: Serialize>(&self, value: &T, text: impl FnOnce(&T) -> String) -> Result<(), CliError> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            println!("{}", text(value));
        }
        Ok(())
    }
}
