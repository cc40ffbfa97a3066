use std::{process, sync::Arc};

use pygments_service::{
    application::{error::AppError, highlight::HighlightService, highlight::theme_names},
    config,
    infra::{
        error::InfraError,
        http::{self, HttpState},
        platform::PlatformEnv,
        telemetry,
    },
};
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(config::ServeArgs::default()));

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::Themes => {
            for name in theme_names() {
                println!("{name}");
            }
            Ok(())
        }
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    telemetry::init(&settings.logging)?;

    let platform = PlatformEnv::from_env()?;
    info!(
        target = "pygments_service::bootstrap",
        relationships = platform.relationships().len(),
        "platform environment validated"
    );

    let highlighter = HighlightService::from_settings(&settings.render)?;
    let state = HttpState {
        highlighter: Arc::new(highlighter),
        platform: Arc::new(platform),
    };

    let addr = state.platform.listen_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(InfraError::from)?;
    info!(
        target = "pygments_service::bootstrap",
        addr = %addr,
        theme = %settings.render.theme,
        "listening"
    );

    axum::serve(listener, http::build_router(state))
        .await
        .map_err(|err| AppError::unexpected(format!("server error: {err}")))
}
