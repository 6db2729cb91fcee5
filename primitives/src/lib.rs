mod address;
mod amount;
mod b58;
mod campaign;
mod donation;

pub use {
  address::{Address, Error as AddressError},
  amount::{Amount, Error as AmountError},
  b58::ToBase58String,
  campaign::{Campaign, CampaignId, NewCampaign},
  donation::{Donation, DonationReceipt},
};
