//! Demo: seed an Austin weekend, vote on it, print the leaderboard.
//!
//! Run with `RUST_LOG=tripvote=debug` to watch every transition. Set
//! `TRIPVOTE_API_URL` and sign in first to see live attendees.

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tripvote_client::{ClientConfig, Planner};
use tripvote_voting::stats::{rsvp_summary, sort_by_votes, total_estimated_cost, vote_count, voting_stats};
use tripvote_voting::{AppState, Category, NewActivity, VotingAction};

/// (name, description, cost, category, voters)
const SEED: [(&str, &str, f64, Category, &[&str]); 4] = [
    (
        "Go Kart Racing",
        "K1 Speed, Austin - 2025-10-15 at 14:00",
        50.0,
        Category::Entertainment,
        &["user-1", "user-3", "user-4"],
    ),
    (
        "BBQ Dinner",
        "Franklin Barbecue, Austin - 2025-10-15 at 18:30",
        75.0,
        Category::Food,
        &["user-1", "user-2", "user-4"],
    ),
    (
        "Brewery Tour",
        "Jester King Brewery, Austin - 2025-10-16 at 15:00",
        40.0,
        Category::Entertainment,
        &["user-2", "user-3"],
    ),
    (
        "Hotel Downtown",
        "Hilton Austin, Downtown - Check-in 2025-10-15",
        200.0,
        Category::Accommodation,
        &["user-1", "user-2", "user-3", "user-4"],
    ),
];

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tripvote=info,tripvote_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

async fn seed(planner: &Planner) -> anyhow::Result<()> {
    for (name, description, cost, category, voters) in SEED {
        planner
            .dispatch(VotingAction::AddActivityOption(
                NewActivity::new(name, category)
                    .with_description(description)
                    .with_cost(cost),
            ))
            .await?;

        let id = planner
            .snapshot()
            .await
            .voting
            .activities
            .last()
            .map(|activity| activity.id.clone())
            .context("seeded activity missing from state")?;

        for voter in voters {
            planner.dispatch(VotingAction::cast_vote(id.clone(), *voter)).await?;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = ClientConfig::from_env();
    tracing::info!(api_url = %config.api_url, session = %config.session_path.display(), "Starting tripvote");

    let planner = Planner::from_config(&config, AppState::default()).context("failed to build planner")?;

    if planner.restore().await.context("failed to restore session")? {
        if let Err(error) = planner.refresh_attendees().await {
            tracing::warn!(%error, "Continuing without attendees");
        }
    } else {
        tracing::info!("Not signed in; attendees unavailable");
    }

    seed(&planner).await?;

    let state = planner.snapshot().await;
    let activities = &state.voting.activities;

    println!("Leaderboard");
    for (rank, activity) in sort_by_votes(activities).into_iter().enumerate() {
        println!(
            "{:>2}. {:<16} {:>2} votes  ${:>6.2}  [{}]",
            rank + 1,
            activity.name,
            vote_count(activity),
            activity.estimated_cost,
            activity.category
        );
    }

    let stats = voting_stats(activities);
    println!();
    println!(
        "{} votes over {} activities ({:.2} per activity), top pick: {}",
        stats.total_votes,
        stats.total_activities,
        stats.average_votes_per_activity,
        stats.most_voted_activity.name
    );
    println!("Estimated total: ${:.2}", total_estimated_cost(activities));

    let rsvps = rsvp_summary(&state.voting.attendees);
    println!("RSVPs: {} yes, {} no, {} pending", rsvps.yes, rsvps.no, rsvps.pending);

    planner.store().shutdown();
    Ok(())
}
