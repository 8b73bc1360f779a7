use reqwest::Url;
use tracing::warn;

use crate::{
    args::{FormParams, HttpMethod},
    error::ValidationError,
};

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Immutable description of the request every worker repeats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSpec {
    url: Url,
    method: HttpMethod,
    form: Option<FormParams>,
    echo: bool,
}

impl RequestSpec {
    /// Validates the target URL and builds the request description.
    ///
    /// Form params are kept only for POST; they are dropped with a warning
    /// for any other method.
    ///
    /// # Errors
    ///
    /// Returns an error when the URL does not parse, is not http/https, or
    /// has no host.
    pub fn new(
        url: &str,
        method: HttpMethod,
        params: Option<FormParams>,
        echo: bool,
    ) -> Result<Self, ValidationError> {
        let parsed = Url::parse(url).map_err(|err| ValidationError::InvalidUrl {
            url: url.to_owned(),
            source: err,
        })?;
        match parsed.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(ValidationError::UnsupportedScheme {
                    url: url.to_owned(),
                    scheme: scheme.to_owned(),
                });
            }
        }
        if parsed.host_str().is_none_or(str::is_empty) {
            return Err(ValidationError::MissingHost {
                url: url.to_owned(),
            });
        }

        let form = match params.filter(|params| !params.is_empty()) {
            Some(params) if method == HttpMethod::Post => Some(params),
            Some(_) => {
                warn!("--params is ignored unless --method is POST.");
                None
            }
            None => None,
        };

        Ok(Self {
            url: parsed,
            method,
            form,
            echo,
        })
    }

    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    #[must_use]
    pub const fn method(&self) -> HttpMethod {
        self.method
    }

    #[must_use]
    pub const fn form(&self) -> Option<&FormParams> {
        self.form.as_ref()
    }

    #[must_use]
    pub const fn echo(&self) -> bool {
        self.echo
    }

    /// URL-encoded body, present only for POST with params.
    #[must_use]
    pub fn form_body(&self) -> Option<String> {
        self.form.as_ref().map(FormParams::encode)
    }
}
