use {
  crate::{
    CampaignCache,
    CampaignStore,
    ConnectionGate,
    ContributionWorkflow,
    CreateCampaignForm,
    Session,
    Wallet,
  },
  parking_lot::Mutex,
  std::{fmt::Display, str::FromStr, sync::Arc},
  thiserror::Error,
  tracing::{debug, info},
};

/// Pages of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
  Home,
  CreateCampaign,
  Campaigns,
  Team,
}

#[derive(Debug, Error)]
#[error("Unknown route '{0}'")]
pub struct UnknownRoute(String);

impl Route {
  pub fn path(&self) -> &'static str {
    match self {
      Route::Home => "/",
      Route::CreateCampaign => "/create-campaign",
      Route::Campaigns => "/campaigns",
      Route::Team => "/team",
    }
  }
}

impl FromStr for Route {
  type Err = UnknownRoute;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim_end_matches('/') {
      "" => Ok(Route::Home),
      "/create-campaign" => Ok(Route::CreateCampaign),
      "/campaigns" => Ok(Route::Campaigns),
      "/team" => Ok(Route::Team),
      _ => Err(UnknownRoute(s.to_owned())),
    }
  }
}

impl Display for Route {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.path())
  }
}

/// Owns all state shared across the application for one session.
///
/// Everything starts disconnected and empty. Components receive their
/// collaborators from here instead of reaching for globals, and
/// observe changes through the `subscribe` methods of each part.
pub struct AppContext {
  session: Session,
  gate: ConnectionGate,
  campaigns: CampaignCache,
  contribution: ContributionWorkflow,
  create_form: CreateCampaignForm,
  route: Mutex<Option<Route>>,
}

impl AppContext {
  pub fn new(store: Arc<dyn CampaignStore>, wallet: Arc<dyn Wallet>) -> Self {
    let session = Session::default();
    let gate = ConnectionGate::new(wallet, session.clone());
    let campaigns = CampaignCache::new(store.clone());
    campaigns.unmount();

    Self {
      contribution: ContributionWorkflow::new(
        store.clone(),
        campaigns.clone(),
        gate.clone(),
      ),
      create_form: CreateCampaignForm::new(
        store,
        campaigns.clone(),
        gate.clone(),
      ),
      route: Mutex::new(None),
      session,
      gate,
      campaigns,
    }
  }

  pub fn session(&self) -> &Session {
    &self.session
  }

  pub fn gate(&self) -> &ConnectionGate {
    &self.gate
  }

  pub fn campaigns(&self) -> &CampaignCache {
    &self.campaigns
  }

  pub fn contribution(&self) -> &ContributionWorkflow {
    &self.contribution
  }

  pub fn create_form(&self) -> &CreateCampaignForm {
    &self.create_form
  }

  pub fn route(&self) -> Option<Route> {
    *self.route.lock()
  }

  /// Switches the current page.
  ///
  /// Leaving the campaigns page unmounts the collection, so fetches
  /// still in flight are dropped on arrival. Entering it mounts the
  /// collection and loads it.
  pub async fn navigate(&self, route: Route) {
    let previous = self.route.lock().replace(route);
    debug!("navigating from {previous:?} to {route}");

    if previous == Some(Route::Campaigns) && route != Route::Campaigns {
      self.campaigns.unmount();
    }

    if route == Route::Campaigns {
      self.campaigns.mount();
      self.campaigns.load().await;
    }
  }

  /// Ends the session: the wallet account is forgotten, open dialogs
  /// are closed and the collection is dropped.
  pub fn shutdown(&self) {
    info!("shutting down session");
    self.route.lock().take();
    self.contribution.close();
    self.create_form.reset();
    self.campaigns.unmount();
    self.session.clear();
  }
}
