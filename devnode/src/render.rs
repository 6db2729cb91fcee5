use {
  blockfund_client::{
    lifecycle::{classify, progress_percent},
    Filter,
    LifecycleState,
    Listing,
  },
  blockfund_primitives::{Campaign, Donation, DonationReceipt, ToBase58String},
  time::{macros::format_description, OffsetDateTime},
};

const BAR_WIDTH: usize = 20;

pub fn listing(listing: &Listing, filter: Filter, now: OffsetDateTime) -> String {
  match listing {
    Listing::Loading => "Loading campaigns...".into(),
    Listing::Empty => "No campaigns found".into(),
    Listing::Campaigns(campaigns) if campaigns.is_empty() => {
      format!("No {filter} campaigns")
    }
    Listing::Campaigns(campaigns) => campaigns
      .iter()
      .map(|c| card(c, now))
      .collect::<Vec<_>>()
      .join("\n"),
  }
}

pub fn card(campaign: &Campaign, now: OffsetDateTime) -> String {
  let badge = match classify(campaign, now) {
    LifecycleState::Ended => " [Ended]",
    LifecycleState::Active => "",
  };

  let percent = progress_percent(campaign);
  format!(
    "{} {}{badge}\n  {}\n  Target: {} ETH  Raised: {} ETH\n  {} {percent}%\n  \
     Deadline: {}\n  Owner: {}\n",
    campaign.id,
    campaign.title,
    campaign.description,
    campaign.target,
    campaign.amount_collected,
    bar(percent),
    date(campaign.deadline),
    campaign.owner,
  )
}

pub fn donations(donations: &[Donation]) -> String {
  if donations.is_empty() {
    return "No donations yet".into();
  }

  donations
    .iter()
    .map(|d| format!("{} ETH from {} on {}", d.amount, d.donor, date(d.timestamp)))
    .collect::<Vec<_>>()
    .join("\n")
}

pub fn receipt(receipt: &DonationReceipt) -> String {
  format!(
    "Donated {} ETH to campaign {}\n  tx: {}",
    receipt.amount,
    receipt.campaign,
    receipt.tx_hash.to_b58()
  )
}

fn bar(percent: u8) -> String {
  let filled = usize::from(percent.min(100)) * BAR_WIDTH / 100;
  format!("[{}{}]", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}

fn date(at: OffsetDateTime) -> String {
  at.format(format_description!("[year]-[month]-[day]"))
    .unwrap_or_else(|_| at.to_string())
}

#[cfg(test)]
mod tests {
  use {
    super::*,
    blockfund_primitives::{Address, Amount, CampaignId},
    time::{macros::datetime, Duration},
  };

  const NOW: OffsetDateTime = datetime!(2026-10-19 12:00 UTC);

  fn campaign(collected: u64, days: i64) -> Campaign {
    Campaign {
      id: CampaignId::new(3),
      owner: Address::new([7; 32]),
      title: "Library roof".into(),
      description: "Fix the leaks".into(),
      target: Amount::whole(4),
      amount_collected: Amount::whole(collected),
      deadline: NOW + Duration::days(days),
    }
  }

  #[test]
  fn progress_bar() {
    assert_eq!(bar(0), format!("[{}]", ".".repeat(20)));
    assert_eq!(bar(50), format!("[{}{}]", "#".repeat(10), ".".repeat(10)));
    assert_eq!(bar(100), format!("[{}]", "#".repeat(20)));
  }

  #[test]
  fn active_and_ended_cards() {
    let active = card(&campaign(1, 5), NOW);
    assert!(active.starts_with("#3 Library roof\n"));
    assert!(active.contains("Target: 4 ETH  Raised: 1 ETH"));
    assert!(active.contains("25%"));
    assert!(active.contains("Deadline: 2026-10-24"));
    assert_eq!(active.lines().count(), 6);
    assert!(active.ends_with(&format!("  Owner: {}\n", Address::new([7; 32]))));

    let funded = card(&campaign(4, 5), NOW);
    assert!(funded.starts_with("#3 Library roof [Ended]"));
    assert!(funded.contains("100%"));

    let expired = card(&campaign(0, -1), NOW);
    assert!(expired.starts_with("#3 Library roof [Ended]"));
  }

  #[test]
  fn empty_listings() {
    assert_eq!(listing(&Listing::Empty, Filter::All, NOW), "No campaigns found");
    assert_eq!(
      listing(&Listing::Campaigns(vec![]), Filter::Ended, NOW),
      "No ended campaigns"
    );
    assert_eq!(donations(&[]), "No donations yet");
  }
}
