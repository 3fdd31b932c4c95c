use std::{future::IntoFuture as _, io, process::ExitCode, sync::OnceLock};

use application::{
    view::{self, layout},
    Args, Config, Context,
};
use service::{
    command::RestoreState,
    infra::{storage, transport::client::Client},
    Command as _, Guard, Service,
};
use tracing as log;
use tracing_subscriber::{
    filter::filter_fn,
    layer::{Layer as _, SubscriberExt as _},
    util::SubscriberInitExt as _,
};

const STDERR_LEVELS: &[log::Level] = &[log::Level::WARN, log::Level::ERROR];

static LOG_LEVEL: OnceLock<log::Level> = OnceLock::new();

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_ansi(true)
                .with_writer(io::stdout)
                .with_filter(filter_fn(|meta| {
                    meta.is_span()
                        || (!STDERR_LEVELS.contains(meta.level()))
                            && LOG_LEVEL
                                .get()
                                .copied()
                                .unwrap_or(log::Level::WARN)
                                >= *meta.level()
                })),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_ansi(true)
                .with_writer(io::stderr)
                .with_filter(filter_fn(|meta| {
                    meta.is_span()
                        || (STDERR_LEVELS.contains(meta.level()))
                            && LOG_LEVEL
                                .get()
                                .copied()
                                .unwrap_or(log::Level::WARN)
                                >= *meta.level()
                })),
        )
        .init();

    match start().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(()) => ExitCode::FAILURE,
    }
}

async fn start() -> Result<(), ()> {
    let Args { config, command } = Args::parse().unwrap_or_else(|e| e.exit());

    let config = Config::new(config).map_err(|e| {
        log::error!("failed to load `Config`: {e}");
    })?;

    LOG_LEVEL
        .set(config.log.level.into())
        .unwrap_or_else(|_| unreachable!("first initialization"));

    let transport = Client::new(&(&config.api).into()).map_err(|e| {
        log::error!("failed to initialize HTTP `Client`: {e}");
    })?;
    let storage = storage::File::from(config.storage.clone());

    let (service, background) =
        Service::new(config.service(), storage, transport);
    let ctx = Context::new(service, Guard::from(config.guard));

    if let Err(e) = ctx.service().execute(RestoreState).await {
        log::warn!("failed to restore persisted state: {e}");
    }

    let output = tokio::select! {
        res = view::open(&ctx, command) => res,
        res = background.into_future() => {
            log::error!("background task stopped: {res:?}");
            return Err(());
        }
    };

    // Failures of the view are among the notifications already.
    let notifications = layout::notifications(&ctx);
    if !notifications.is_empty() {
        eprintln!("{notifications}");
    }
    output.map(|out| println!("{out}")).map_err(drop)
}
