//! Terminal rendering of a narrowing run.

use std::sync::Arc;

use anyhow::Context;
use scout_core::{CampaignBrief, EnrichedInfluencer};
use scout_pipeline::{NarrowingPipeline, RunHandle, RunSnapshot, Stage};

/// Run `brief` to completion, echoing each status row once and then the
/// finalists.
///
/// # Errors
///
/// Returns an error if the run fails or its task panics.
pub(crate) async fn run_search(
    pipeline: &Arc<NarrowingPipeline>,
    brief: CampaignBrief,
) -> anyhow::Result<()> {
    println!(
        "Searching {} influencers for {}...",
        brief.category, brief.company_name
    );

    let RunHandle { mut progress, task } = pipeline.spawn(brief);
    let mut printed = Vec::new();
    loop {
        let snapshot = progress.borrow_and_update().clone();
        for line in new_status_lines(&snapshot, &mut printed) {
            println!("{line}");
        }
        if snapshot.is_terminal() || progress.changed().await.is_err() {
            break;
        }
    }

    let finalists = task
        .await
        .context("narrowing task panicked")?
        .context("narrowing run failed")?;

    println!();
    print!("{}", render_finalists(&finalists));
    Ok(())
}

/// Status rows of `snapshot` not yet in `printed`, formatted for the
/// terminal. A watch receiver may skip intermediate snapshots, so a stage's
/// pending row can be missed; its complete row never is.
fn new_status_lines(snapshot: &RunSnapshot, printed: &mut Vec<(Stage, bool)>) -> Vec<String> {
    snapshot
        .status_rows()
        .into_iter()
        .filter(|row| {
            let key = (row.stage, row.complete);
            if printed.contains(&key) {
                false
            } else {
                printed.push(key);
                true
            }
        })
        .map(|row| {
            let marker = if row.complete { "[x]" } else { "[ ]" };
            format!("{marker} {}", row.text)
        })
        .collect()
}

fn render_finalists(finalists: &[EnrichedInfluencer]) -> String {
    if finalists.is_empty() {
        return "No influencers matched this brief.\n".to_string();
    }

    let mut out = format!("Here are the top {} influencers for you:\n", finalists.len());
    for (i, influencer) in finalists.iter().enumerate() {
        let c = &influencer.candidate;
        out.push_str(&format!("\n{}. {} (@{})\n", i + 1, c.name, c.username));
        out.push_str(&format!(
            "   {} followers | {:.1} stars ({} reviews)\n",
            group_thousands(c.follower_count),
            c.average_rating,
            c.rating_count
        ));
        if let Some(package) = influencer.packages.first() {
            out.push_str(&format!("   From ${}: {}\n", package.price, package.title));
        }
        if let Some(feed) = &influencer.feed {
            out.push_str(&format!("   Feed: {}\n", feed.description));
        }
    }
    out
}

fn group_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if n < 0 {
        grouped.insert(0, '-');
    }
    grouped
}
