use std::env;

use job_tracker::config::Config;
use job_tracker::dto::auth_dto::LoginRequest;
use job_tracker::registry::EnumDisplay;
use job_tracker::utils::time::format_date_fr;
use job_tracker::ClientState;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let config = Config::from_env()?;
    let state = ClientState::new(config)?;

    if let (Ok(email), Ok(password)) = (env::var("TRACKER_EMAIL"), env::var("TRACKER_PASSWORD")) {
        let response = state.auth.login(&LoginRequest { email, password }).await?;
        info!(user = %response.user.display_name(), "Signed in");
    }
    if !state.auth.is_authenticated() {
        warn!("No session; set TRACKER_EMAIL and TRACKER_PASSWORD to sign in");
        return Ok(());
    }

    let candidatures = state.candidatures.load_all().await?;
    info!(
        total = candidatures.len(),
        active = state.candidatures.store().total_active(),
        "Candidatures loaded"
    );

    let mut view = state.list_view();
    let page_size = state.config.page_size(None);
    let (rows, info) = view.page(1, page_size);
    for c in &rows {
        println!(
            "{:>5}  {:<30} {:<30} {:<20} {}",
            c.id,
            c.company,
            c.position,
            c.status.label(),
            format_date_fr(c.application_date)
        );
    }
    println!(
        "page {}/{} ({} candidatures)",
        info.current_page, info.total_pages, info.total_items
    );

    match state.statistics.global().await {
        Ok(stats) => println!(
            "total {} | entretiens {}% | acceptées {}% | refusées {}%",
            stats.total,
            stats.interview_rate(),
            stats.acceptance_rate(),
            stats.rejection_rate()
        ),
        Err(e) => warn!(error = %e, "Statistics unavailable"),
    }

    for toast in state.notifications.toasts() {
        warn!(kind = ?toast.kind, message = %toast.message, "Notification");
    }
    Ok(())
}
