//! services/dashboard/src/bin/dashboard.rs

use dashboard_lib::{
    adapters::{
        read_upload, FileSessionStore, HeadlessDialogs, RecordingNavigator, ReqwestTransport,
        SnapshotView,
    },
    config::{Config, PageKind},
    error::DashboardError,
    web::{AdminPage, AppState, LoadOutcome, MemberPage},
};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn report(outcomes: &[LoadOutcome]) {
    for outcome in outcomes {
        if *outcome != LoadOutcome::Rendered {
            warn!("A page load did not render: {:?}", outcome);
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), DashboardError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    info!("Configuration loaded. Talking to {}", config.api_url);

    // --- 2. Initialize Adapters ---
    let navigator = Arc::new(RecordingNavigator::default());
    let view = Arc::new(SnapshotView::default());
    let state = AppState {
        store: Arc::new(FileSessionStore::new(&config.session_file)),
        navigator: navigator.clone(),
        dialogs: Arc::new(HeadlessDialogs::new(config.assume_yes)),
        view: view.clone(),
        transport: Arc::new(ReqwestTransport::new(config.request_timeout)?),
        config: config.clone(),
    };

    // --- 3. Boot the Requested Page ---
    let booted = match config.page {
        PageKind::Admin => {
            let page = AdminPage::new(&state);
            page.boot().await.map(|outcomes| report(&outcomes)).is_some()
        }
        PageKind::Member => {
            let page = MemberPage::new(&state);
            match page.boot().await {
                Some(outcomes) => {
                    report(&outcomes);
                    if let Some(path) = &config.upload_path {
                        let file = read_upload(path, config.max_upload_bytes).await?;
                        let outcome = page.upload(file).await;
                        info!("Upload of {} finished: {:?}", path.display(), outcome);
                    }
                    true
                }
                None => false,
            }
        }
    };

    if !booted {
        let target = navigator.last().map(|r| r.path()).unwrap_or("index.html");
        println!("Not signed in for this page; redirected to {}", target);
        return Ok(());
    }

    // --- 4. Print What the Page Shows ---
    print!("{}", view.render());
    Ok(())
}
