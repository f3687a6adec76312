//! Registration ledger: sign-up, confirmation, payment, check-in, seeding.

use crate::models::{
    PaymentStatus, PlayerId, Registration, RegistrationId, RegistrationStatus, Tournament,
    TournamentError, TournamentResult,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Sign-up request for one player or a two-player team.
#[derive(Clone, Debug, Deserialize)]
pub struct NewRegistration {
    pub player_1: PlayerId,
    #[serde(default)]
    pub player_2: Option<PlayerId>,
    #[serde(default)]
    pub team_name: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Register a player or team. Registration must be open and the field not full; a player
/// can be in only one active registration per tournament.
pub fn register(
    tournament: &mut Tournament,
    request: NewRegistration,
    now: DateTime<Utc>,
) -> TournamentResult<RegistrationId> {
    if tournament.is_full() {
        return Err(TournamentError::TournamentFull);
    }
    if !tournament.is_registration_open(now) {
        return Err(TournamentError::RegistrationNotOpen);
    }
    match (tournament.requires_partner(), request.player_2) {
        (true, None) => return Err(TournamentError::PartnerRequired),
        (false, Some(_)) => return Err(TournamentError::PartnerNotAllowed),
        (true, Some(p2)) if p2 == request.player_1 => return Err(TournamentError::SamePlayerTwice),
        _ => {}
    }
    let incoming = std::iter::once(request.player_1).chain(request.player_2);
    for player in incoming {
        let taken = tournament
            .registrations
            .iter()
            .any(|r| r.is_active() && r.includes(player));
        if taken {
            return Err(TournamentError::DuplicateRegistration(player));
        }
    }

    let mut registration = Registration::new(request.player_1, request.player_2, now);
    registration.team_name = request.team_name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());
    registration.notes = request.notes;
    let id = registration.id;
    tournament.registrations.push(registration);
    tournament.current_participants += 1;
    tournament.updated_at = now;
    log::info!(
        "tournament {}: registration {} ({}/{})",
        tournament.id,
        id,
        tournament.current_participants,
        tournament.max_participants
    );
    Ok(id)
}

fn active_registration_mut(
    tournament: &mut Tournament,
    id: RegistrationId,
) -> TournamentResult<&mut Registration> {
    let registration = tournament.registration_mut(id)?;
    if !registration.is_active() {
        return Err(TournamentError::RegistrationCancelled(id));
    }
    Ok(registration)
}

/// Organizer accepts a pending registration.
pub fn confirm_registration(
    tournament: &mut Tournament,
    id: RegistrationId,
    now: DateTime<Utc>,
) -> TournamentResult<()> {
    let registration = active_registration_mut(tournament, id)?;
    if registration.status == RegistrationStatus::Pending {
        registration.status = RegistrationStatus::Confirmed;
        registration.updated_at = now;
    }
    Ok(())
}

/// Record a payment status change. Paying also confirms a pending registration.
pub fn record_payment(
    tournament: &mut Tournament,
    id: RegistrationId,
    status: PaymentStatus,
    now: DateTime<Utc>,
) -> TournamentResult<()> {
    let registration = active_registration_mut(tournament, id)?;
    registration.payment_status = Some(status);
    match status {
        PaymentStatus::Paid => {
            registration.payment_date = Some(now);
            if registration.status == RegistrationStatus::Pending {
                registration.status = RegistrationStatus::Confirmed;
            }
        }
        PaymentStatus::Waived | PaymentStatus::Pending | PaymentStatus::Refunded => {}
    }
    registration.updated_at = now;
    Ok(())
}

/// Mark the player/team as present on the day.
pub fn check_in(tournament: &mut Tournament, id: RegistrationId, now: DateTime<Utc>) -> TournamentResult<()> {
    let registration = active_registration_mut(tournament, id)?;
    registration.status = RegistrationStatus::CheckedIn;
    registration.check_in_date = Some(now);
    registration.updated_at = now;
    Ok(())
}

/// Set or clear a seed number. Seeds are unique within a tournament.
pub fn assign_seed(
    tournament: &mut Tournament,
    id: RegistrationId,
    seed: Option<u32>,
    now: DateTime<Utc>,
) -> TournamentResult<()> {
    if tournament.bracket.is_some() || !tournament.rounds.is_empty() {
        return Err(TournamentError::InvalidState(tournament.status));
    }
    if let Some(seed) = seed {
        let taken = tournament
            .registrations
            .iter()
            .any(|r| r.id != id && r.is_active() && r.seed_number == Some(seed));
        if taken {
            return Err(TournamentError::DuplicateSeed(seed));
        }
    }
    let registration = active_registration_mut(tournament, id)?;
    registration.seed_number = seed;
    registration.updated_at = now;
    Ok(())
}

/// Withdraw a registration. The row stays; it stops counting toward capacity.
pub fn cancel_registration(
    tournament: &mut Tournament,
    id: RegistrationId,
    now: DateTime<Utc>,
) -> TournamentResult<()> {
    if tournament.bracket.is_some() || !tournament.rounds.is_empty() {
        return Err(TournamentError::InvalidState(tournament.status));
    }
    let registration = active_registration_mut(tournament, id)?;
    registration.status = RegistrationStatus::Cancelled;
    registration.seed_number = None;
    registration.updated_at = now;
    tournament.current_participants = tournament.current_participants.saturating_sub(1);
    tournament.updated_at = now;
    Ok(())
}

/// Confirmed and checked-in registrations, best seed first: explicit seeds ascending,
/// then unseeded ones in sign-up order.
pub fn seeded_entrants(tournament: &Tournament) -> Vec<&Registration> {
    let mut accepted: Vec<&Registration> = tournament
        .registrations
        .iter()
        .filter(|r| r.is_accepted())
        .collect();
    accepted.sort_by_key(|r| (r.seed_number.is_none(), r.seed_number, r.created_at));
    accepted
}
