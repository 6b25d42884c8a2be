use clap::Args;
use emerald_models::ServerConfig;
use std::path::PathBuf;

/// Flags shared by both servers. Flags win over the config file and environment.
#[derive(Args, Debug, Clone, Default)]
pub struct ServerArgs {
    /// TOML config file
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Address to bind
    #[arg(long)]
    pub bind: Option<String>,

    /// Port to listen on
    #[arg(long, short = 'p')]
    pub port: Option<u16>,
}

impl ServerArgs {
    pub fn apply(&self, server: &mut ServerConfig) {
        if let Some(bind) = &self.bind {
            server.bind = bind.clone();
        }
        if let Some(port) = self.port {
            server.port = port;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use emerald_models::ServiceConfig;

    #[test]
    fn flags_override_server_section() {
        let mut config = ServiceConfig::default();
        let args = ServerArgs {
            config: None,
            bind: Some("127.0.0.1".to_string()),
            port: Some(8000),
        };
        args.apply(&mut config.server);
        assert_eq!(config.server.address(), "127.0.0.1:8000");
    }

    #[test]
    fn absent_flags_keep_config() {
        let mut config = ServiceConfig::default();
        ServerArgs::default().apply(&mut config.server);
        assert_eq!(config.server.address(), "0.0.0.0:80");
    }
}
