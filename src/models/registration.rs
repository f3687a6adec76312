//! Registration of a player or two-player team into a tournament.

use crate::models::player::PlayerId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a registration.
pub type RegistrationId = Uuid;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStatus {
    #[default]
    Pending,
    Confirmed,
    CheckedIn,
    Cancelled,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Refunded,
    Waived,
}

/// A player, or a team of two, entered into one tournament.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Registration {
    pub id: RegistrationId,
    pub team_name: Option<String>,
    /// Primary player; unique per tournament.
    pub player_1: PlayerId,
    pub player_2: Option<PlayerId>,
    pub status: RegistrationStatus,
    pub payment_status: Option<PaymentStatus>,
    pub payment_date: Option<DateTime<Utc>>,
    pub check_in_date: Option<DateTime<Utc>>,
    pub seed_number: Option<u32>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Registration {
    pub fn new(player_1: PlayerId, player_2: Option<PlayerId>, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            team_name: None,
            player_1,
            player_2,
            status: RegistrationStatus::Pending,
            payment_status: None,
            payment_date: None,
            check_in_date: None,
            seed_number: None,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_team(&self) -> bool {
        self.player_2.is_some()
    }

    pub fn is_ready_to_play(&self) -> bool {
        self.status == RegistrationStatus::CheckedIn
    }

    pub fn is_active(&self) -> bool {
        self.status != RegistrationStatus::Cancelled
    }

    /// Confirmed or checked in: takes part once registration closes.
    pub fn is_accepted(&self) -> bool {
        match self.status {
            RegistrationStatus::Confirmed | RegistrationStatus::CheckedIn => true,
            RegistrationStatus::Pending | RegistrationStatus::Cancelled => false,
        }
    }

    pub fn players(&self) -> Vec<PlayerId> {
        std::iter::once(self.player_1).chain(self.player_2).collect()
    }

    pub fn includes(&self, player: PlayerId) -> bool {
        self.player_1 == player || self.player_2 == Some(player)
    }
}
