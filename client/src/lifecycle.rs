//! Campaign life-cycle classification.
//!
//! Whether a campaign is active is never stored. It is a pure function of
//! the campaign record and the current time, and callers sample `now` once
//! per evaluation and pass it in explicitly. Derived views must be
//! recomputed whenever they are displayed, time moves on even when the
//! data does not.

use {
  blockfund_primitives::Campaign,
  std::{fmt::Display, str::FromStr},
  thiserror::Error,
  time::OffsetDateTime,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleState {
  Active,
  Ended,
}

/// Which campaigns a listing should show.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Filter {
  #[default]
  All,
  Active,
  Ended,
}

#[derive(Debug, Error)]
#[error("Unknown campaign filter '{0}'. Expected one of: all, active, ended")]
pub struct UnknownFilter(String);

impl Filter {
  pub fn admits(&self, state: LifecycleState) -> bool {
    match self {
      Filter::All => true,
      Filter::Active => state == LifecycleState::Active,
      Filter::Ended => state == LifecycleState::Ended,
    }
  }
}

impl FromStr for Filter {
  type Err = UnknownFilter;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "all" => Ok(Filter::All),
      "active" => Ok(Filter::Active),
      "ended" => Ok(Filter::Ended),
      _ => Err(UnknownFilter(s.to_owned())),
    }
  }
}

impl Display for Filter {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(match self {
      Filter::All => "all",
      Filter::Active => "active",
      Filter::Ended => "ended",
    })
  }
}

/// A campaign has ended once its deadline is reached (inclusive) or once
/// its collected total reached the target, whichever comes first.
pub fn classify(campaign: &Campaign, now: OffsetDateTime) -> LifecycleState {
  if now >= campaign.deadline || campaign.amount_collected >= campaign.target {
    LifecycleState::Ended
  } else {
    LifecycleState::Active
  }
}

/// Campaigns admitted by `selection`, in input order.
pub fn filter(
  campaigns: &[Campaign],
  selection: Filter,
  now: OffsetDateTime,
) -> Vec<Campaign> {
  filter_refs(campaigns, selection, now).cloned().collect()
}

pub fn filter_refs(
  campaigns: &[Campaign],
  selection: Filter,
  now: OffsetDateTime,
) -> impl Iterator<Item = &Campaign> {
  campaigns
    .iter()
    .filter(move |c| selection.admits(classify(c, now)))
}

/// Share of the target already collected, clamped to `[0, 100]`.
/// Over-funded campaigns report 100.
pub fn progress_percent(campaign: &Campaign) -> u8 {
  campaign.amount_collected.percent_of(campaign.target)
}

#[cfg(test)]
mod tests {
  use {
    super::*,
    blockfund_primitives::{Address, Amount, CampaignId},
    rand::{rngs::StdRng, Rng, SeedableRng},
    std::collections::HashSet,
    time::{macros::datetime, Duration},
  };

  const NOW: OffsetDateTime = datetime!(2026-06-01 12:00 UTC);

  fn campaign(
    id: u64,
    target: Amount,
    collected: Amount,
    deadline: OffsetDateTime,
  ) -> Campaign {
    Campaign {
      id: CampaignId::new(id),
      owner: Address::new([0; 32]),
      title: format!("campaign {id}"),
      description: String::new(),
      target,
      amount_collected: collected,
      deadline,
    }
  }

  #[test]
  fn reaching_target_ends_campaign_early() {
    let target = Amount::whole(10);
    let future = NOW + Duration::days(3);

    let funded = campaign(0, target, target, future);
    assert_eq!(classify(&funded, NOW), LifecycleState::Ended);

    let almost = campaign(
      1,
      target,
      Amount::from_minor_units(target.minor_units() - 1),
      future,
    );
    assert_eq!(classify(&almost, NOW), LifecycleState::Active);
  }

  #[test]
  fn deadline_boundary_is_inclusive() {
    let c = campaign(0, Amount::whole(10), Amount::ZERO, NOW);
    assert_eq!(classify(&c, NOW), LifecycleState::Ended);
    assert_eq!(
      classify(&c, NOW - Duration::nanoseconds(1)),
      LifecycleState::Active
    );
  }

  #[test]
  fn classification_depends_on_now() {
    let c = campaign(0, Amount::whole(10), Amount::whole(1), NOW);
    assert_eq!(classify(&c, NOW - Duration::hours(1)), LifecycleState::Active);
    assert_eq!(classify(&c, NOW + Duration::hours(1)), LifecycleState::Ended);
  }

  #[test]
  fn all_filter_preserves_input() {
    let campaigns = vec![
      campaign(2, Amount::whole(1), Amount::whole(1), NOW),
      campaign(0, Amount::whole(5), Amount::ZERO, NOW + Duration::days(1)),
      campaign(1, Amount::whole(5), Amount::whole(9), NOW - Duration::days(1)),
    ];
    assert_eq!(filter(&campaigns, Filter::All, NOW), campaigns);
  }

  #[test]
  fn active_and_ended_partition_the_input() {
    let mut rng = StdRng::seed_from_u64(0xB10C);
    for _ in 0..50 {
      let campaigns: Vec<_> = (0..rng.gen_range(0..40))
        .map(|id| {
          let target = Amount::whole(rng.gen_range(0..20));
          let collected = Amount::whole(rng.gen_range(0..40));
          let deadline = NOW + Duration::hours(rng.gen_range(-48..48));
          campaign(id, target, collected, deadline)
        })
        .collect();

      let active = filter(&campaigns, Filter::Active, NOW);
      let ended = filter(&campaigns, Filter::Ended, NOW);
      assert_eq!(active.len() + ended.len(), campaigns.len());

      let active_ids: HashSet<_> = active.iter().map(|c| c.id).collect();
      let ended_ids: HashSet<_> = ended.iter().map(|c| c.id).collect();
      assert!(active_ids.is_disjoint(&ended_ids));

      let all: HashSet<_> = campaigns.iter().map(|c| c.id).collect();
      assert_eq!(&active_ids | &ended_ids, all);

      // each partition keeps the relative input order
      let order = |subset: &[Campaign]| {
        subset.windows(2).all(|w| w[0].id < w[1].id)
      };
      assert!(order(&active) && order(&ended));
    }
  }

  #[test]
  fn progress_is_clamped_for_overfunded_campaigns() {
    let target = Amount::whole(8);
    let future = NOW + Duration::days(1);
    assert_eq!(
      progress_percent(&campaign(0, target, Amount::whole(16), future)),
      100
    );
    assert_eq!(
      progress_percent(&campaign(0, target, Amount::whole(2), future)),
      25
    );
    assert_eq!(progress_percent(&campaign(0, target, Amount::ZERO, future)), 0);
  }

  #[test]
  fn filter_parsing() -> anyhow::Result<()> {
    assert_eq!("Active".parse::<Filter>()?, Filter::Active);
    assert_eq!("ended".parse::<Filter>()?, Filter::Ended);
    assert_eq!(Filter::default(), Filter::All);
    assert!("pending".parse::<Filter>().is_err());
    Ok(())
  }
}
