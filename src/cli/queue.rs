//! Moderation queue commands

use super::Context;
use crate::backend::SubmissionStatus;
use crate::moderation::{Decision, ReviewedSubmission};
use crate::pagination::Page;
use clap::Args;

#[derive(Args, Debug)]
pub struct QueueArgs {
    /// Submission status: pending, approved or rejected
    #[arg(long, default_value = "pending")]
    pub status: String,

    /// Page number, starting at 1
    #[arg(long, default_value = "1")]
    pub page: u32,

    /// Only show flagged submissions from the requested page
    #[arg(long)]
    pub flagged: bool,
}

impl QueueArgs {
    pub async fn execute(&self, ctx: &Context) -> anyhow::Result<()> {
        let status: SubmissionStatus = self.status.parse()?;
        let page = ctx.moderation_queue()?.page(status, self.page).await?;

        println!(
            "{:>6}  {:<28} {:<18} {:<5} {:>10} {:>10}  FLAG",
            "ID", "STATION", "USER", "FUEL", "PRICE", "AVERAGE"
        );
        let shown = visible(&page, self.flagged);
        for item in &shown {
            let s = &item.submission;
            let average = s
                .average_price
                .map(|a| format!("₦{}", a.round_dp(2)))
                .unwrap_or_else(|| "-".to_string());
            println!(
                "{:>6}  {:<28} {:<18} {:<5} {:>10} {:>10}  {}",
                s.id,
                s.station_name,
                s.user_name.as_deref().unwrap_or("Unknown"),
                s.fuel_type,
                format!("₦{}", s.submitted_price),
                average,
                if item.is_suspicious() { "!" } else { "" }
            );
            if let Some(reason) = item.assessment.as_ref().and_then(|a| a.reason.as_ref()) {
                println!("        {}", reason);
            }
        }
        println!("{}", footer(&page, shown.len(), self.flagged));
        Ok(())
    }
}

/// Rows of `page` to print, optionally only the suspicious ones
fn visible(page: &Page<ReviewedSubmission>, flagged: bool) -> Vec<&ReviewedSubmission> {
    page.items
        .iter()
        .filter(|i| !flagged || i.is_suspicious())
        .collect()
}

fn footer(page: &Page<ReviewedSubmission>, shown: usize, flagged: bool) -> String {
    let position = format!("page {} of {}", page.page, page.total_pages().max(1));
    if flagged {
        format!(
            "{} flagged of {} on {}; {} submissions in total",
            shown,
            page.items.len(),
            position,
            page.total
        )
    } else {
        format!("{} ({})", page.summary(), position)
    }
}

#[derive(Args, Debug)]
pub struct DecideArgs {
    /// Submission id
    pub id: i64,

    /// approve or reject
    pub decision: String,
}

impl DecideArgs {
    pub async fn execute(&self, ctx: &Context) -> anyhow::Result<()> {
        let decision: Decision = self.decision.parse()?;
        let message = ctx.moderation_queue()?.decide(self.id, decision).await?;
        println!("{}", message);
        Ok(())
    }
}
