use rand::seq::SliceRandom;
use reqwest::{Client, Proxy};
use std::time::Duration;
use tracing::warn;

/// Source of outbound proxies. Asked once per request attempt.
pub trait ProxyProvider: Send + Sync {
    /// Proxy URL for the next attempt, `None` for a direct connection.
    fn next_proxy(&self) -> Option<String>;
}

/// Proxies loaded from a line file, picked at random on every call.
#[derive(Debug, Clone, Default)]
pub struct ProxyList {
    proxies: Vec<String>,
}

impl ProxyList {
    /// Build from raw lines, dropping the ones that don't look like a proxy.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut proxies = Vec::new();
        for line in lines {
            match normalize_proxy(line.as_ref()) {
                Some(url) => proxies.push(url),
                None => warn!("Skipping malformed proxy line: {}", line.as_ref()),
            }
        }
        Self { proxies }
    }

    pub fn len(&self) -> usize {
        self.proxies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proxies.is_empty()
    }
}

impl ProxyProvider for ProxyList {
    fn next_proxy(&self) -> Option<String> {
        self.proxies.choose(&mut rand::thread_rng()).cloned()
    }
}

/// Turn the usual proxy list notations into a URL reqwest understands.
///
/// Accepts `scheme://...`, `user:pass@host:port`, `host:port:user:pass`
/// and `host:port`. Scheme defaults to `http`.
pub fn normalize_proxy(line: &str) -> Option<String> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    if line.contains("://") {
        return Some(line.to_string());
    }
    if line.contains('@') {
        return Some(format!("http://{line}"));
    }

    let parts: Vec<&str> = line.split(':').collect();
    match parts.as_slice() {
        [host, port] if port.parse::<u16>().is_ok() => Some(format!("http://{host}:{port}")),
        [host, port, user, pass] if port.parse::<u16>().is_ok() => {
            Some(format!("http://{user}:{pass}@{host}:{port}"))
        }
        _ => None,
    }
}

/// HTTP client routed through `proxy`, or direct when there is none.
pub fn build_client(proxy: Option<&str>, timeout: Duration) -> reqwest::Result<Client> {
    let builder = Client::builder().timeout(timeout);
    let builder = match proxy {
        Some(url) => builder.proxy(Proxy::all(url)?),
        // ignore HTTP(S)_PROXY from the environment
        None => builder.no_proxy(),
    };
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_common_notations() {
        assert_eq!(
            normalize_proxy("socks5://u:p@1.2.3.4:1080").as_deref(),
            Some("socks5://u:p@1.2.3.4:1080")
        );
        assert_eq!(
            normalize_proxy("u:p@1.2.3.4:8080").as_deref(),
            Some("http://u:p@1.2.3.4:8080")
        );
        assert_eq!(
            normalize_proxy("1.2.3.4:8080:u:p").as_deref(),
            Some("http://u:p@1.2.3.4:8080")
        );
        assert_eq!(
            normalize_proxy(" 1.2.3.4:8080 ").as_deref(),
            Some("http://1.2.3.4:8080")
        );
        assert_eq!(normalize_proxy("1.2.3.4:notaport"), None);
        assert_eq!(normalize_proxy(""), None);
    }

    #[test]
    fn empty_list_means_direct() {
        let list = ProxyList::from_lines(Vec::<String>::new());
        assert!(list.is_empty());
        assert_eq!(list.next_proxy(), None);
    }

    #[test]
    fn picks_from_loaded_proxies() {
        let list = ProxyList::from_lines(["1.1.1.1:80", "garbage", "2.2.2.2:81"]);
        assert_eq!(list.len(), 2);
        for _ in 0..20 {
            let p = list.next_proxy().unwrap();
            assert!(p == "http://1.1.1.1:80" || p == "http://2.2.2.2:81");
        }
    }

    #[test]
    fn builds_direct_and_proxied_clients() {
        let timeout = Duration::from_secs(1);
        assert!(build_client(None, timeout).is_ok());
        assert!(build_client(Some("http://u:p@127.0.0.1:3128"), timeout).is_ok());
    }
}
