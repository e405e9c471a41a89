//! Classify command implementation

use super::Context;
use crate::moderation::{validate_with_default, FlagPriceInput, FlagPriceOutput, RawNumber};
use clap::Args;

#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// Submitted price in naira
    #[arg(long)]
    pub price: String,

    /// Average approved price in naira
    #[arg(long)]
    pub average_price: String,

    /// Deviation threshold as a fraction, e.g. 0.3 for 30%
    #[arg(long)]
    pub threshold: Option<String>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

impl ClassifyArgs {
    fn input(&self) -> FlagPriceInput {
        FlagPriceInput {
            price: RawNumber::from(self.price.as_str()),
            average_price: RawNumber::from(self.average_price.as_str()),
            deviation_threshold: self.threshold.as_deref().map(RawNumber::from),
        }
    }

    pub async fn execute(&self, ctx: &Context) -> anyhow::Result<()> {
        let moderator = ctx.moderator()?;
        let request = validate_with_default(&self.input(), moderator.default_threshold())?;
        let result = moderator.flag_request(&request).await;

        if self.json {
            let output = FlagPriceOutput::from(result);
            println!("{}", serde_json::to_string_pretty(&output)?);
            return Ok(());
        }

        println!("Submitted: ₦{}", request.submitted_price());
        println!("Average:   ₦{}", request.average_price());
        println!("Threshold: {}", request.deviation_threshold());
        println!("Deviation: {}", result.deviation_ratio.round_dp(4));
        println!(
            "Status:    {}",
            if result.is_suspicious { "SUSPICIOUS" } else { "ok" }
        );
        if let Some(reason) = &result.reason {
            println!("Reason:    {}", reason);
        }
        Ok(())
    }
}
