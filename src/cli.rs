//! Command-line interface definitions using clap

use clap::Parser;

use crate::runtime::RunTarget;

/// trafficsheet - accumulate GitHub traffic statistics into Google Sheets
#[derive(Parser, Debug)]
#[command(name = "trafficsheet")]
#[command(version)]
#[command(about = "Accumulate GitHub repository traffic into a Google spreadsheet", long_about = None)]
pub struct Cli {
    /// Target spreadsheet id
    #[arg(long, alias = "spreadsheet_id", required_unless_present = "generate_config")]
    pub spreadsheet_id: Option<String>,

    /// Repository owner (user or organization)
    #[arg(long, alias = "github_owner_name", required_unless_present = "generate_config")]
    pub github_owner_name: Option<String>,

    /// Repository name
    #[arg(long, alias = "github_project_name", required_unless_present = "generate_config")]
    pub github_project_name: Option<String>,

    /// Print a sample configuration file and exit
    #[arg(long)]
    pub generate_config: bool,
}

impl Cli {
    /// 三个目标参数齐全时返回运行目标
    pub fn target(&self) -> Option<RunTarget> {
        Some(RunTarget {
            spreadsheet_id: self.spreadsheet_id.clone()?,
            owner: self.github_owner_name.clone()?,
            repo: self.github_project_name.clone()?,
        })
    }
}
