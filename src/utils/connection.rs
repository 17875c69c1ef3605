use crate::config::Settings;

/// Builds `mongodb://[user:pass@]hosts/[?replicaSet=name]`.
///
/// Credentials are embedded only when both parts are non-empty, and are
/// percent-encoded so reserved characters survive the URI parser.
pub fn connection_uri(settings: &Settings) -> String {
    let auth = if settings.has_credentials() {
        format!(
            "{}:{}@",
            urlencoding::encode(&settings.username),
            urlencoding::encode(&settings.password)
        )
    } else {
        String::new()
    };

    let options = match settings.replica_set.as_deref() {
        Some(name) if !name.is_empty() => format!("?replicaSet={}", urlencoding::encode(name)),
        _ => String::new(),
    };

    format!("mongodb://{}{}/{}", auth, settings.host.joined(), options)
}

/// Same as [`connection_uri`] with the password masked, for logs.
pub fn redacted_uri(settings: &Settings) -> String {
    if settings.has_credentials() {
        let masked = Settings {
            password: "REDACTED".to_string(),
            ..settings.clone()
        };
        connection_uri(&masked)
    } else {
        connection_uri(settings)
    }
}
