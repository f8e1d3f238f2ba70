use crate::config::OAuthConfig;
use crate::error::api::ApiError;

use url::Url;

/// Builds the identity provider's authorize URL for the code flow.
pub fn build_authorize_url(config: &OAuthConfig) -> Result<Url, ApiError> {
    let mut url = Url::parse(&config.authorize_url)?;

    url.query_pairs_mut()
        .append_pair("client_id", &config.client_id)
        .append_pair("response_type", "code")
        .append_pair("redirect_uri", &config.redirect_uri)
        .append_pair("scope", &config.scopes.join(" "))
        .append_pair(
            "show_dialog",
            if config.show_dialog { "true" } else { "false" },
        );

    Ok(url)
}
