use url::Url;

/// Validate that a probe target is an absolute http/https URL with a host.
pub fn validate_probe_url(target: &str) -> Result<(), String> {
    if target.trim().is_empty() {
        return Err("URL cannot be empty".to_string());
    }

    match Url::parse(target) {
        Ok(url) => {
            let scheme = url.scheme();
            if scheme != "http" && scheme != "https" {
                return Err(format!("Invalid scheme '{scheme}'. Must be http or https"));
            }

            if url.host_str().is_none() {
                return Err("URL must have a valid host".to_string());
            }

            Ok(())
        }
        Err(e) => {
            // If it fails to parse, check if it's missing a scheme
            if !target.contains("://") {
                Err("URL must include scheme (http:// or https://)".to_string())
            } else {
                Err(format!("Invalid URL: {e}"))
            }
        }
    }
}
