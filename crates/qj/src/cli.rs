use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "qj", version, about = "Run saved JIRA searches and print them as tables")]
pub(crate) struct Args {
    /// Show the location of the config file
    #[arg(short = 'c', long = "config-path", default_value_t = false)]
    pub(crate) show_config_path: bool,
    /// Open the config file in $EDITOR
    #[arg(short = 'e', long = "edit", default_value_t = false)]
    pub(crate) edit_config: bool,
    /// Run an ad-hoc JQL query instead of the saved ones
    #[arg(short = 'q', long = "query", value_name = "JQL")]
    pub(crate) query: Option<String>,
    /// Use this config file instead of the default location
    #[arg(long, value_name = "PATH")]
    pub(crate) config: Option<PathBuf>,
    #[arg(long, default_value_t = false)]
    pub(crate) log_to_stderr: bool,
}
