use cubby_common::sys::shutdown_signal;

mod args;
pub use args::{LogOptions, Opts, ServerOptions};

mod errors;
pub use errors::ShareError;

mod http;
mod server;
pub use server::ShareServer;

pub async fn start_share(options: ServerOptions) -> Result<(), Box<dyn std::error::Error>> {
    let mut server = ShareServer::new(options);

    server.start().await?;
    shutdown_signal().await;
    server.stop().await?;

    Ok(())
}
