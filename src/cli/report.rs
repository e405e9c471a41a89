//! Report command implementation

use super::Context;
use crate::region::Region;
use crate::report::{ExportFormat, ReportCriteria};
use chrono::{Months, NaiveDate, Utc};
use clap::Args;

#[derive(Args, Debug)]
pub struct ReportArgs {
    /// State name or "all"
    #[arg(long, default_value = "all")]
    pub region: String,

    /// First day (YYYY-MM-DD), defaults to one month ago
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Last day (YYYY-MM-DD), defaults to today
    #[arg(long)]
    pub to: Option<NaiveDate>,

    /// Output format: csv, pdf or xlsx
    #[arg(long, default_value = "csv")]
    pub format: String,
}

impl ReportArgs {
    fn criteria(&self, today: NaiveDate) -> anyhow::Result<ReportCriteria> {
        let region: Region = self.region.parse()?;
        let format: ExportFormat = self.format.parse()?;
        let to = self.to.unwrap_or(today);
        let from = self
            .from
            .or_else(|| to.checked_sub_months(Months::new(1)))
            .unwrap_or(to);
        Ok(ReportCriteria::new(region, from, to, format)?)
    }

    pub async fn execute(&self, ctx: &Context) -> anyhow::Result<()> {
        let criteria = self.criteria(Utc::now().date_naive())?;
        let report = ctx.report_generator()?.generate(&criteria).await?;
        println!(
            "Your {} report has been generated: {} ({} rows)",
            criteria.format,
            report.path.display(),
            report.rows
        );
        Ok(())
    }
}
