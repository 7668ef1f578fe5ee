//! Derived statistics over activities and attendees.
//!
//! Everything here is read-only: inputs are borrowed and never reordered.

use crate::types::{ActivityOption, Attendee, RsvpStatus, UserId};

/// Aggregate figures for a set of activities
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VotingStats<'a> {
    /// Votes across every activity
    pub total_votes: usize,
    /// Number of activities
    pub total_activities: usize,
    /// `total_votes / total_activities`, or `0.0` when there are none
    pub average_votes_per_activity: f64,
    /// Activity with the most votes; the first one wins ties.
    ///
    /// [`ActivityOption::empty`] when there are no activities.
    pub most_voted_activity: &'a ActivityOption,
}

/// Attendee responses grouped by status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RsvpSummary {
    /// Attending
    pub yes: usize,
    /// Not attending
    pub no: usize,
    /// No response yet
    pub pending: usize,
}

impl RsvpSummary {
    /// Total number of attendees counted
    #[must_use]
    pub const fn total(&self) -> usize {
        self.yes + self.no + self.pending
    }
}

/// Number of votes on `activity`
#[must_use]
pub fn vote_count(activity: &ActivityOption) -> usize {
    activity.votes.len()
}

/// Whether `user_id` voted for `activity`
#[must_use]
pub fn has_voted(activity: &ActivityOption, user_id: &UserId) -> bool {
    activity.vote_by(user_id).is_some()
}

/// Activities `user_id` voted for, in input order
#[must_use]
pub fn voted_activities<'a>(activities: &'a [ActivityOption], user_id: &UserId) -> Vec<&'a ActivityOption> {
    activities
        .iter()
        .filter(|activity| has_voted(activity, user_id))
        .collect()
}

/// Users who voted for `activity`, in vote order
#[must_use]
pub fn voters(activity: &ActivityOption) -> Vec<&UserId> {
    activity.votes.iter().map(|vote| &vote.user_id).collect()
}

/// Aggregate statistics for `activities`
#[must_use]
#[allow(clippy::cast_precision_loss)] // Vote counts stay far below 2^52
pub fn voting_stats(activities: &[ActivityOption]) -> VotingStats<'_> {
    let total_votes: usize = activities.iter().map(vote_count).sum();
    let total_activities = activities.len();

    let average_votes_per_activity = if total_activities == 0 {
        0.0
    } else {
        total_votes as f64 / total_activities as f64
    };

    // `max_by_key` keeps the last maximum; fold keeps the first.
    let most_voted_activity = activities
        .iter()
        .fold(None::<&ActivityOption>, |best, activity| match best {
            Some(best) if vote_count(best) >= vote_count(activity) => Some(best),
            _ => Some(activity),
        })
        .unwrap_or(ActivityOption::empty());

    VotingStats {
        total_votes,
        total_activities,
        average_votes_per_activity,
        most_voted_activity,
    }
}

/// Activities ordered by vote count, highest first
///
/// The sort is stable: activities with equal counts keep their input order.
#[must_use]
pub fn sort_by_votes(activities: &[ActivityOption]) -> Vec<&ActivityOption> {
    let mut sorted: Vec<&ActivityOption> = activities.iter().collect();
    sorted.sort_by(|a, b| vote_count(b).cmp(&vote_count(a)));
    sorted
}

/// Counts attendees by RSVP status
#[must_use]
pub fn rsvp_summary(attendees: &[Attendee]) -> RsvpSummary {
    attendees
        .iter()
        .fold(RsvpSummary::default(), |mut summary, attendee| {
            match attendee.rsvp() {
                RsvpStatus::Yes => summary.yes += 1,
                RsvpStatus::No => summary.no += 1,
                RsvpStatus::Pending => summary.pending += 1,
            }
            summary
        })
}

/// Sum of `estimated_cost` over `activities`
#[must_use]
pub fn total_estimated_cost(activities: &[ActivityOption]) -> f64 {
    activities.iter().map(|activity| activity.estimated_cost).sum()
}
