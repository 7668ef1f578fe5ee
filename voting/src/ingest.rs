//! Normalisation of snapshots arriving from outside the reducer.
//!
//! Fetched and seeded data is not trusted to uphold the model's invariants.
//! Repairs keep the first occurrence and are logged at `warn`.

use crate::types::{ActivityOption, Attendee};
use std::collections::HashSet;

/// Enforces activity-id uniqueness, vote ownership and one vote per user.
#[must_use]
pub fn normalize_activities(activities: Vec<ActivityOption>) -> Vec<ActivityOption> {
    let mut seen = HashSet::with_capacity(activities.len());
    let mut normalized = Vec::with_capacity(activities.len());

    for mut activity in activities {
        if !seen.insert(activity.id.clone()) {
            tracing::warn!(activity_id = %activity.id, "Dropping activity with duplicate id");
            continue;
        }

        let mut voters = HashSet::with_capacity(activity.votes.len());
        let before = activity.votes.len();
        activity.votes.retain(|vote| voters.insert(vote.user_id.clone()));
        if activity.votes.len() != before {
            tracing::warn!(
                activity_id = %activity.id,
                dropped = before - activity.votes.len(),
                "Dropping duplicate votes"
            );
        }

        let mut reassigned = 0_usize;
        for vote in &mut activity.votes {
            if vote.activity_id != activity.id {
                vote.activity_id = activity.id.clone();
                reassigned += 1;
            }
        }
        if reassigned > 0 {
            tracing::warn!(activity_id = %activity.id, reassigned, "Repaired vote ownership");
        }

        normalized.push(activity);
    }

    normalized
}

/// Enforces attendee-id uniqueness.
#[must_use]
pub fn dedupe_attendees(attendees: Vec<Attendee>) -> Vec<Attendee> {
    let mut seen = HashSet::with_capacity(attendees.len());
    let before = attendees.len();

    let deduped: Vec<Attendee> = attendees
        .into_iter()
        .filter(|attendee| seen.insert(attendee.id.clone()))
        .collect();

    if deduped.len() != before {
        tracing::warn!(dropped = before - deduped.len(), "Dropping attendees with duplicate id");
    }

    deduped
}
