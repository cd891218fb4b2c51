//! Backend endpoint paths.

use reqwest::Url;

use crate::error::NetError;

pub const QUESTIONS: &str = "perguntas";
pub const REPLIES: &str = "respostas";
pub const LOGIN: &str = "usuarios/login";

/// Resolved endpoint URLs for one backend instance.
#[derive(Debug, Clone)]
pub struct Routes {
    base: Url,
}

impl Routes {
    /// Parse `base_url`. A trailing slash is added when missing so that
    /// joining keeps any path prefix (`https://host/api` -> `/api/perguntas`).
    pub fn new(base_url: &str) -> Result<Self, NetError> {
        let trimmed = base_url.trim();
        let normalized = if trimmed.ends_with('/') {
            trimmed.to_string()
        } else {
            format!("{trimmed}/")
        };

        let base = Url::parse(&normalized).map_err(|e| NetError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        if !matches!(base.scheme(), "http" | "https") {
            return Err(NetError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: format!("unsupported scheme {}", base.scheme()),
            });
        }

        Ok(Self { base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    pub fn questions(&self) -> Url {
        self.join(QUESTIONS)
    }

    pub fn replies(&self) -> Url {
        self.join(REPLIES)
    }

    pub fn login(&self) -> Url {
        self.join(LOGIN)
    }

    fn join(&self, path: &str) -> Url {
        // `path` is a relative constant, joining cannot fail
        self.base.join(path).unwrap_or_else(|_| self.base.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routes_without_trailing_slash() {
        let routes = Routes::new("http://localhost:3004").unwrap();
        assert_eq!(routes.questions().as_str(), "http://localhost:3004/perguntas");
        assert_eq!(routes.login().as_str(), "http://localhost:3004/usuarios/login");
    }

    #[test]
    fn test_routes_keep_path_prefix() {
        let routes = Routes::new("https://forum.example/api/").unwrap();
        assert_eq!(routes.replies().as_str(), "https://forum.example/api/respostas");
    }

    #[test]
    fn test_rejects_bad_urls() {
        assert!(Routes::new("not a url").is_err());
        assert!(Routes::new("ftp://host").is_err());
    }
}
