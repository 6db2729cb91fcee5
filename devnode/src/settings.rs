use {
  blockfund_client::Filter,
  blockfund_primitives::CampaignId,
  clap::{Parser, Subcommand},
  humantime::Duration,
  std::path::{Path, PathBuf},
};

/// BlockFund Local Devnode
///
/// A single process crowdfunding ledger with a terminal front-end,
/// for local development, demos and CI. Campaigns and donations are
/// kept in an on-disk database, the wallet is a local ed25519 key.
#[derive(Debug, Parser)]
pub struct SystemSettings {
  /// Directory holding the ledger database and the wallet key
  #[clap(short, long,
    default_value = ".blockfund",
    value_name = "PATH")]
  data_dir: PathBuf,

  /// Simulated confirmation latency of ledger writes
  #[clap(long, short,
    value_name = "DURATION",
    default_value = "0s")]
  latency: Duration,

  /// Approve wallet connection prompts, creating a key if none exists
  #[clap(long, short)]
  yes: bool,

  #[clap(subcommand)]
  command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
  /// List campaigns
  List {
    /// One of: all, active, ended
    #[clap(long, short, default_value = "all")]
    filter: Filter,
  },

  /// Launch a new campaign owned by the wallet account
  Create {
    title: String,
    description: String,

    /// Funding target in ETH, e.g. 1.5
    target: String,

    /// Last day of the campaign, YYYY-MM-DD
    deadline: String,
  },

  /// Donate to a campaign from the wallet account
  Donate {
    campaign: CampaignId,

    /// Amount in ETH, e.g. 0.25
    amount: String,
  },

  /// Show donations made to a campaign
  Donations { campaign: CampaignId },

  /// Show the wallet account, connecting if approved
  Account,
}

impl SystemSettings {
  pub fn data_dir(&self) -> &Path {
    &self.data_dir
  }

  pub fn ledger_path(&self) -> PathBuf {
    self.data_dir.join("ledger")
  }

  pub fn keyfile(&self) -> PathBuf {
    self.data_dir.join("wallet.key")
  }

  pub fn latency(&self) -> std::time::Duration {
    self.latency.into()
  }

  pub fn auto_approve(&self) -> bool {
    self.yes
  }

  pub fn command(&self) -> &Command {
    &self.command
  }
}
