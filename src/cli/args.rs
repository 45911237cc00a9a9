//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueHint};

use crate::application::services::{DeployOptions, LoginArgs};
use crate::domain::EnvVar;

/// Deploy applications to a Function-as-a-Service platform
///
/// One action per run: inspect deployments, delete one, or deploy a
/// repository or a local directory.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "faasctl")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Print a report of existing deployments and exit
    #[arg(short = 'i', long)]
    pub inspect: bool,

    /// Interactively delete a ready deployment
    #[arg(short = 'D', long)]
    pub delete: bool,

    /// Deploy this local directory
    #[arg(short = 'w', long, value_hint = ValueHint::DirPath)]
    pub workdir: Option<PathBuf>,

    /// Deploy this repository URL
    #[arg(short = 'a', long, value_hint = ValueHint::Url)]
    pub addrepo: Option<String>,

    /// Plan for the deployment (prompted for if omitted)
    #[arg(short = 'P', long)]
    pub plan: Option<String>,

    /// Deployment name for a directory deploy (default: directory name)
    #[arg(short = 'n', long)]
    pub project_name: Option<String>,

    /// Environment variable for the deployment, NAME=VALUE (repeatable)
    #[arg(short = 'e', long = "env", value_name = "NAME=VALUE", action = ArgAction::Append)]
    pub env: Vec<EnvVar>,

    /// API token (skips login)
    #[arg(short = 't', long)]
    pub token: Option<String>,

    /// Login email
    #[arg(long)]
    pub email: Option<String>,

    /// Login password
    #[arg(long)]
    pub password: Option<String>,

    /// Use the local development server
    #[arg(long)]
    pub dev: bool,

    /// Platform URL, overrides --dev and the configured URL
    #[arg(long, value_hint = ValueHint::Url)]
    pub server_url: Option<String>,

    /// Debug level: -d info, -dd debug, -ddd trace
    #[arg(short = 'd', long, action = ArgAction::Count)]
    pub debug: u8,

    /// Print shell completions and exit
    #[arg(long = "completion", value_enum, value_name = "SHELL")]
    pub completion: Option<clap_complete::Shell>,
}

impl Cli {
    /// `--workdir`, treating an empty path as unset.
    pub fn workdir(&self) -> Option<&PathBuf> {
        self.workdir
            .as_ref()
            .filter(|p| !p.as_os_str().is_empty())
    }

    /// `--addrepo`, treating an empty string as unset.
    pub fn addrepo(&self) -> Option<&str> {
        self.addrepo.as_deref().filter(|u| !u.trim().is_empty())
    }

    /// `--plan`, treating an empty string as unset.
    pub fn plan(&self) -> Option<&str> {
        self.plan.as_deref().filter(|p| !p.trim().is_empty())
    }

    pub fn login_args(&self) -> LoginArgs {
        LoginArgs {
            token: self.token.clone(),
            email: self.email.clone(),
            password: self.password.clone(),
            dev: self.dev,
            server_url: self.server_url.clone(),
        }
    }

    pub fn deploy_options(&self) -> DeployOptions {
        DeployOptions {
            project_name: self
                .project_name
                .clone()
                .filter(|n| !n.trim().is_empty()),
            env: self.env.clone(),
        }
    }
}
