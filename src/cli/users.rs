//! User commands

use super::Context;
use clap::{Args, Subcommand};
use uuid::Uuid;

#[derive(Args, Debug)]
pub struct UsersArgs {
    #[command(subcommand)]
    pub command: UserCommand,
}

#[derive(Subcommand, Debug)]
pub enum UserCommand {
    /// List users, newest first
    List {
        #[arg(long, default_value = "1")]
        page: u32,
    },
    /// Show a profile with recent activity
    Show { id: Uuid },
    /// Suspend an account
    Suspend { id: Uuid },
    /// Approve a pending account
    Approve { id: Uuid },
}

impl UsersArgs {
    pub async fn execute(&self, ctx: &Context) -> anyhow::Result<()> {
        let service = ctx.user_service()?;
        match &self.command {
            UserCommand::List { page } => {
                let page = service.list(*page).await?;
                println!(
                    "{:<36}  {:<22} {:<13} {:<16} JOINED",
                    "ID", "NAME", "ROLE", "STATUS"
                );
                for user in &page.items {
                    println!(
                        "{:<36}  {:<22} {:<13} {:<16} {}",
                        user.id,
                        user.display_name(),
                        format!("{:?}", user.role),
                        user.status,
                        user.created_at.format("%Y-%m-%d")
                    );
                }
                println!("{}", page.summary());
            }
            UserCommand::Show { id } => {
                let detail = service.detail(*id).await?;
                let profile = &detail.profile;
                println!("{}", profile.display_name());
                println!("  Email:     {}", profile.email.as_deref().unwrap_or("-"));
                println!("  Phone:     {}", profile.phone.as_deref().unwrap_or("-"));
                println!("  Role:      {:?}", profile.role);
                println!("  Status:    {}", profile.status);
                println!("  Provider:  {}", detail.provider);
                println!("  Joined:    {}", profile.created_at.format("%Y-%m-%d"));
                match profile.last_sign_in_at {
                    Some(at) => println!("  Last seen: {}", at.format("%Y-%m-%d %H:%M")),
                    None => println!("  Last seen: never"),
                }
                if detail.recent_reports.is_empty() {
                    println!("  No recent activity");
                }
                for report in &detail.recent_reports {
                    let price = report
                        .price
                        .map(|p| format!("₦{}", p))
                        .unwrap_or_else(|| "-".to_string());
                    println!(
                        "  {}  {:<28} {}",
                        report.created_at.format("%Y-%m-%d"),
                        report.station_name,
                        price
                    );
                }
            }
            UserCommand::Suspend { id } => {
                let profile = service.suspend(*id).await?;
                println!("{} is now {}.", profile.display_name(), profile.status);
            }
            UserCommand::Approve { id } => {
                let profile = service.approve(*id).await?;
                println!("{} is now {}.", profile.display_name(), profile.status);
            }
        }
        Ok(())
    }
}
