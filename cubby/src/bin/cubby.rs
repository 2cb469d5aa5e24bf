use std::io::stdout;

use clap::Parser;
use cubby::{LogOptions, Opts, start_share};
use tracing::{Level, info};
use tracing_subscriber::{
    EnvFilter, Registry, fmt, fmt::writer::MakeWriterExt, layer::SubscriberExt,
    util::SubscriberInitExt,
};

fn log_init(opts: &LogOptions, log_prefix: String) -> Result<(), Box<dyn std::error::Error>> {
    let level = if opts.debug {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let env_filter = EnvFilter::from_default_env().add_directive(format!("cubby={level}").parse()?);

    let formatting_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_ansi(true)
        .with_line_number(true)
        .with_writer(stdout.with_max_level(level));

    let file_appender = tracing_appender::rolling::daily(
        opts.log_path.as_str(),
        format!("cubby-{}.log", log_prefix),
    );

    let file_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_ansi(false)
        .with_line_number(true)
        .with_writer(file_appender.with_max_level(level));

    Registry::default()
        .with(env_filter)
        .with(formatting_layer)
        .with(file_layer)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let opts = Opts::parse();

    let log_prefix = format!("{}-{}", opts.server.ip, opts.server.port);
    log_init(&opts.log, log_prefix)?;
    info!("opts: {:?}", opts);

    info!("starting share server....");
    start_share(opts.server).await?;

    Ok(())
}
