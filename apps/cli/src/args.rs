use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "betslip-analyzer")]
#[command(about = "Token-gated betslip analyzer service")]
pub struct CliArgs {
    #[arg(short, long, help = "Path to the configuration file")]
    pub config: Option<PathBuf>,

    #[arg(short, long, help = "Override the configured port for this run only")]
    pub port: Option<u16>,

    #[arg(long, help = "Override the configured data directory")]
    pub data_dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_overrides() {
        let args = CliArgs::try_parse_from([
            "betslip-analyzer",
            "--port",
            "4000",
            "--data-dir",
            "/tmp/betslip",
        ])
        .expect("parse");
        assert_eq!(args.port, Some(4000));
        assert_eq!(args.data_dir, Some(PathBuf::from("/tmp/betslip")));
        assert!(args.config.is_none());
    }

    #[test]
    fn rejects_bad_port() {
        assert!(CliArgs::try_parse_from(["betslip-analyzer", "--port", "http"]).is_err());
    }
}
