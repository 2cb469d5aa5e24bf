use clap::{Args, Parser};
use faststr::FastStr;

#[derive(Parser, Debug)]
#[command(name = "cubby")]
#[command(author, version, about, long_about = None)]
pub struct Opts {
    #[command(flatten)]
    pub log: LogOptions,
    #[command(flatten)]
    pub server: ServerOptions,
}

#[derive(Args, Debug, Clone)]
pub struct ServerOptions {
    #[arg(long, default_value("127.0.0.1"))]
    pub ip: FastStr,
    #[arg(long, default_value_t = 8080)]
    pub port: u16,
    /// per-file cap in mebibytes
    #[arg(long, default_value_t = 50)]
    pub max_file_size_mb: u64,
}

impl ServerOptions {
    pub fn max_file_size(&self) -> u64 {
        self.max_file_size_mb * 1024 * 1024
    }
}

#[derive(Args, Debug)]
pub struct LogOptions {
    #[arg(long, default_value("./target/logs"))]
    pub log_path: FastStr,
    /// log at debug level
    #[arg(long, default_value_t = false)]
    pub debug: bool,
}
