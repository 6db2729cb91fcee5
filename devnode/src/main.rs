use {
  crate::{
    settings::{Command, SystemSettings},
    storage::OnDiskCampaignStore,
    wallet::LocalWallet,
  },
  anyhow::{anyhow, bail},
  blockfund_client::{
    AppContext,
    CreateOutcome,
    DonateOutcome,
    Filter,
    Gated,
    Route,
  },
  blockfund_primitives::CampaignId,
  clap::Parser,
  std::sync::Arc,
  time::OffsetDateTime,
  tracing::{info, subscriber::set_global_default},
  tracing_subscriber::{EnvFilter, FmtSubscriber},
};

mod render;
mod settings;
mod storage;
mod wallet;

async fn list(app: &AppContext, filter: Filter) {
  app.navigate(Route::Campaigns).await;
  let now = OffsetDateTime::now_utc();
  let listing = app.campaigns().state().listing(filter, now);
  println!("{}", render::listing(&listing, filter, now));
}

async fn create(
  app: &AppContext,
  title: &str,
  description: &str,
  target: &str,
  deadline: &str,
) -> anyhow::Result<()> {
  app.navigate(Route::CreateCampaign).await;
  app.create_form().edit(|draft| {
    draft.title = title.to_owned();
    draft.description = description.to_owned();
    draft.target = target.to_owned();
    draft.deadline = deadline.to_owned();
  });

  match app.create_form().submit().await {
    CreateOutcome::Created(id) => {
      println!("Created campaign {id}");
      Ok(())
    }
    CreateOutcome::Failed(e) => Err(e.into()),
    CreateOutcome::Discarded => bail!("wallet connection abandoned"),
    CreateOutcome::Ignored => bail!("a campaign is already being submitted"),
  }
}

async fn donate(
  app: &AppContext,
  id: CampaignId,
  amount: &str,
) -> anyhow::Result<()> {
  app.navigate(Route::Campaigns).await;
  let campaign = app
    .campaigns()
    .state()
    .campaigns()
    .iter()
    .find(|c| c.id == id)
    .cloned()
    .ok_or_else(|| anyhow!("campaign {id} not found"))?;

  let workflow = app.contribution();
  if let Gated::Discarded = workflow.request(campaign).await {
    bail!("wallet connection abandoned");
  }

  workflow.set_amount(amount);
  match workflow.confirm().await {
    DonateOutcome::Donated(receipt) => {
      println!("{}", render::receipt(&receipt));
      Ok(())
    }
    DonateOutcome::Failed(e) => Err(e.into()),
    DonateOutcome::Discarded => bail!("wallet connection abandoned"),
    DonateOutcome::Ignored => bail!("donation modal is not open"),
  }
}

async fn account(app: &AppContext) -> anyhow::Result<()> {
  let account = app
    .gate()
    .connect()
    .await
    .map_err(|e| anyhow!("{e}, rerun with --yes to create a wallet key"))?;
  println!("{account}");
  Ok(())
}

async fn run(app: &AppContext, command: &Command) -> anyhow::Result<()> {
  match command {
    Command::List { filter } => list(app, *filter).await,
    Command::Create {
      title,
      description,
      target,
      deadline,
    } => create(app, title, description, target, deadline).await?,
    Command::Donate { campaign, amount } => {
      donate(app, *campaign, amount).await?
    }
    Command::Donations { campaign } => {
      let donations = app.campaigns().donations(*campaign).await;
      println!("{}", render::donations(&donations));
    }
    Command::Account => account(app).await?,
  }
  Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // configure logging, RUST_LOG overrides the default level
  set_global_default(
    FmtSubscriber::builder()
      .with_env_filter(
        EnvFilter::try_from_default_env()
          .unwrap_or_else(|_| EnvFilter::new("info")),
      )
      .with_writer(std::io::stderr)
      .finish(),
  )?;

  // gather CLI parameters
  let settings = SystemSettings::parse();
  info!("startup settings: {settings:#?}");

  std::fs::create_dir_all(settings.data_dir())?;
  let store = Arc::new(OnDiskCampaignStore::open(
    &settings.ledger_path(),
    settings.latency(),
  )?);
  let wallet = Arc::new(LocalWallet::new(
    settings.keyfile(),
    settings.auto_approve(),
  ));

  let app = AppContext::new(store, wallet);
  if let Some(account) = app.gate().restore().await {
    info!("using wallet account {account}");
  }

  let result = run(&app, settings.command()).await;
  app.shutdown();
  result
}
