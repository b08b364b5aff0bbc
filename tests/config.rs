use core::time::Duration;
use livepatch_dom::{Config, Endpoint, Error};

#[test]
fn defaults() {
	let config = Config::default();
	assert_eq!(config.host, None);
	assert_eq!(config.alert_container, "info");
	assert_eq!(config.scroll_container, "page");
	assert_eq!(config.alert_timeout(), Duration::from_millis(2000));
	assert_eq!(config.alert_fade(), Duration::from_millis(300));
	assert_eq!(config.fade(), Duration::from_millis(500));
}

#[test]
fn partial_json_keeps_defaults() {
	let config = Config::from_json(r#"{"host": "example.net:8080", "fade_ms": 200, "unrelated": [1, 2]}"#).unwrap();
	assert_eq!(config.host.as_deref(), Some("example.net:8080"));
	assert_eq!(config.fade(), Duration::from_millis(200));
	assert_eq!(config.alert_timeout(), Duration::from_millis(2000));
}

#[test]
fn invalid_json() {
	assert!(matches!(Config::from_json(r#"{"host": 5}"#), Err(Error::Decode(_))));
}

#[test]
fn urls() {
	let config = Config::from_json(r#"{"host": "example.net"}"#).unwrap();
	assert_eq!(config.url(Endpoint::Control, "http:").unwrap(), "ws://example.net/api/control");
	assert_eq!(config.url(Endpoint::Charger, "http:").unwrap(), "ws://example.net/api/laden");
	assert_eq!(config.url(Endpoint::Control, "https:").unwrap(), "wss://example.net/api/control");
}

#[test]
fn forced_scheme() {
	let config = Config::from_json(r#"{"host": "example.net", "secure": false}"#).unwrap();
	assert_eq!(config.url(Endpoint::Control, "https:").unwrap(), "ws://example.net/api/control");
}

#[test]
fn no_host_no_url() {
	assert!(matches!(Config::default().url(Endpoint::Control, "http:"), Err(Error::MissingHost)));
	let empty = Config::from_json(r#"{"host": ""}"#).unwrap();
	assert!(matches!(empty.url(Endpoint::Control, "http:"), Err(Error::MissingHost)));
	assert_eq!(Error::MissingHost.to_string(), "Internal error! Please try again later.");
}
