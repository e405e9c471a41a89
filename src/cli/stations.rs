//! Station commands

use super::Context;
use crate::stations::NewStation;
use clap::{Args, Subcommand};

#[derive(Args, Debug)]
pub struct StationsArgs {
    #[command(subcommand)]
    pub command: StationCommand,
}

#[derive(Subcommand, Debug)]
pub enum StationCommand {
    /// List stations
    List {
        #[arg(long, default_value = "1")]
        page: u32,
    },
    /// Register a new station
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        address: Option<String>,
        /// Nigerian state, e.g. Lagos or FCT (stored as Abuja)
        #[arg(long)]
        state: String,
        /// Free-form notes, e.g. opening hours
        #[arg(long)]
        metadata: Option<String>,
    },
    /// Print map markers for stations with coordinates
    Map {
        /// Print the full map view as JSON
        #[arg(long)]
        json: bool,
    },
}

impl StationsArgs {
    pub async fn execute(&self, ctx: &Context) -> anyhow::Result<()> {
        let service = ctx.station_service()?;
        match &self.command {
            StationCommand::List { page } => {
                let page = service.list(*page).await?;
                println!(
                    "{:>5}  {:<28} {:<12} {:<8} {:>11}",
                    "ID", "NAME", "STATE", "STATUS", "SUBMISSIONS"
                );
                for station in &page.items {
                    println!(
                        "{:>5}  {:<28} {:<12} {:<8} {:>11}",
                        station.id,
                        station.name,
                        station.state,
                        format!("{:?}", station.status),
                        station.submissions
                    );
                }
                println!("{}", page.summary());
            }
            StationCommand::Add {
                name,
                address,
                state,
                metadata,
            } => {
                let created = service
                    .add(NewStation {
                        name: name.clone(),
                        address: address.clone(),
                        state: state.clone(),
                        metadata: metadata.clone(),
                    })
                    .await?;
                println!("Station \"{}\" added with id {}.", created.name, created.id);
            }
            StationCommand::Map { json } => {
                let view = service.map().await?;
                if *json {
                    println!("{}", serde_json::to_string_pretty(&view)?);
                    return Ok(());
                }
                println!(
                    "Center {:.4}, {:.4} at zoom {}",
                    view.center.lat, view.center.lng, view.zoom
                );
                for marker in &view.markers {
                    println!(
                        "{:>5}  {:<28} {:>9.4} {:>9.4}",
                        marker.id, marker.title, marker.position.lat, marker.position.lng
                    );
                }
            }
        }
        Ok(())
    }
}
