use clap::Parser;
use std::path::PathBuf;

/// Kernel telemetry agent.
#[derive(Debug, Parser)]
#[command(name = "pcopp-agent", version)]
pub struct Args {
    /// YAML configuration file. Built-in defaults apply when omitted.
    #[arg(short, long, env = "PCOPP_AGENT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Overrides `ingest_url` from the configuration.
    #[arg(long)]
    pub ingest_url: Option<String>,

    /// Overrides `node_id` from the configuration.
    #[arg(long)]
    pub node_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_config_and_overrides() {
        let args = Args::parse_from([
            "pcopp-agent",
            "-c",
            "/etc/pcopp/agent.yml",
            "--ingest-url",
            "http://backend:8001/ingest",
        ]);
        assert_eq!(args.config, Some(PathBuf::from("/etc/pcopp/agent.yml")));
        assert_eq!(args.ingest_url.as_deref(), Some("http://backend:8001/ingest"));
        assert!(args.node_id.is_none());
    }
}
