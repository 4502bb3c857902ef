pub struct CliConfig {
    api_host: String,
    use_https: bool,
    token: Option<String>,
}

const DEFAULT_API_HOST: &str = "http://localhost:8080";

impl CliConfig {
    pub fn init() -> Self {
        let api_host = std::env::var("API_HOST").unwrap_or_else(|_| DEFAULT_API_HOST.to_string());
        let token = std::env::var("PROVISIONER_TOKEN")
            .ok()
            .filter(|token| !token.is_empty());
        Self::new(&api_host, token)
    }

    pub fn new(api_host: &str, token: Option<String>) -> Self {
        let (api_host, use_https) = if let Some(host) = api_host.strip_prefix("http://") {
            (host, false)
        } else if let Some(host) = api_host.strip_prefix("https://") {
            (host, true)
        } else {
            (api_host, true)
        };
        log::debug!("Using provisioning API host: {api_host}");

        CliConfig {
            api_host: api_host.trim_end_matches('/').to_string(),
            use_https,
            token,
        }
    }

    pub fn url(&self, path: &str) -> String {
        let scheme = if self.use_https { "https" } else { "http" };
        format!("{}://{}{}", scheme, self.api_host, path)
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}
