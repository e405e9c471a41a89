//! Notify command implementation

use super::Context;
use crate::notifications::{Broadcaster, NotificationDraft, Segment};
use clap::Args;

#[derive(Args, Debug)]
pub struct NotifyArgs {
    /// Audience: all, android, ios, lagos-users or abuja-users
    #[arg(long, default_value = "all")]
    pub segment: String,

    /// Notification title
    #[arg(long)]
    pub title: String,

    /// Notification body
    #[arg(long)]
    pub message: String,
}

impl NotifyArgs {
    pub async fn execute(&self, ctx: &Context) -> anyhow::Result<()> {
        let segment: Segment = self.segment.parse()?;
        let draft = NotificationDraft::new(segment, &self.title, &self.message)?;
        let confirmation = ctx.broadcaster().broadcast(&draft).await?;
        println!("{}", confirmation);
        Ok(())
    }
}
