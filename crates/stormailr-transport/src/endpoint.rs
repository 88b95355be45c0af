use crate::config::ConnectionConfig;

/// API path used when the DSN has no `endpoint` option
pub const DEFAULT_ENDPOINT: &str = "/api/v1/emails";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    Http,
    Https,
}

impl Protocol {
    /// `https` when the scheme mentions it, plain `http` otherwise
    pub fn from_scheme(scheme: &str) -> Self {
        if scheme.contains("https") {
            Self::Https
        } else {
            Self::Http
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }
}

/// Where a message is POSTed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub protocol: Protocol,
    pub url: String,
}

pub fn resolve_endpoint(config: &ConnectionConfig) -> Endpoint {
    let protocol = Protocol::from_scheme(&config.scheme);
    let path = config.endpoint().unwrap_or(DEFAULT_ENDPOINT);
    Endpoint {
        protocol,
        url: format!("{}://{}{}", protocol.as_str(), config.host, path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(scheme: &str) -> ConnectionConfig {
        ConnectionConfig::new(scheme, "mail.example.com", "u", "s")
    }

    #[test]
    fn test_default_path() {
        let endpoint = resolve_endpoint(&config("stormailr+https"));
        assert_eq!(endpoint.protocol, Protocol::Https);
        assert_eq!(endpoint.url, "https://mail.example.com/api/v1/emails");
    }

    #[test]
    fn test_endpoint_override() {
        let endpoint =
            resolve_endpoint(&config("stormailr").with_option("endpoint", "/custom/send"));
        assert_eq!(endpoint.url, "http://mail.example.com/custom/send");
    }

    #[test]
    fn test_protocol_from_scheme() {
        assert_eq!(Protocol::from_scheme("stormailr+https"), Protocol::Https);
        assert_eq!(Protocol::from_scheme("stormailr+http"), Protocol::Http);
        assert_eq!(Protocol::from_scheme("stormailr"), Protocol::Http);
    }
}
