//! `greenlink route`: resolve the screen a session would render.

use anyhow::Result;
use clap::Args;

use greenlink_core::{Role, User};
use greenlink_sim::{Screen, Session, View};

#[derive(Args, Debug)]
pub struct RouteArgs {
    /// Role of the signed-in user. Omit for an anonymous visitor.
    #[arg(long, value_parser = parse_role)]
    pub role: Option<Role>,

    /// Treat a professional user as already verified.
    #[arg(long)]
    pub verified: bool,

    /// Navigate here after sign-in: landing, network, or a role name.
    #[arg(long, value_parser = parse_view)]
    pub goto: Option<View>,

    /// Open the profile page.
    #[arg(long)]
    pub profile: bool,
}

fn parse_role(s: &str) -> Result<Role, String> {
    s.parse().map_err(|e: greenlink_core::GreenlinkError| e.to_string())
}

fn parse_view(s: &str) -> Result<View, String> {
    match s.to_ascii_lowercase().as_str() {
        "landing" => Ok(View::Landing),
        "network" => Ok(View::Network),
        other => parse_role(other).map(View::Dashboard),
    }
}

pub fn resolve(args: &RouteArgs) -> Screen {
    let mut session = Session::new();
    if let Some(role) = args.role {
        let mut user = User::register(None, None, role);
        if args.verified {
            user.mark_verified();
        }
        session.login(user);
    }
    if let Some(view) = args.goto {
        session.navigate(view);
    }
    if args.profile && session.open_profile().is_err() {
        tracing::warn!("--profile ignored: no user signed in");
    }
    session.route()
}

pub fn run_route(args: &RouteArgs) -> Result<u8> {
    let screen = resolve(args);
    crate::print_json(&screen)?;
    Ok(0)
}
