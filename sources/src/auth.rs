use std::fmt::{Display, Formatter};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::AuthError;

/// Describe the possible ways to authenticate oneself
///
#[derive(Clone, Debug, Default, Deserialize, Eq, JsonSchema, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Auth {
    /// Nothing special, no auth
    #[default]
    Anon,
    /// Using an API key sent as the Basic username with an empty password
    Key { api_key: String },
    /// Using plain login/password
    Login { username: String, password: String },
}

impl Auth {
    /// Value of the `Authorization` header, if any.
    ///
    pub fn header(&self) -> Result<Option<String>, AuthError> {
        match self {
            Auth::Anon => Ok(None),
            Auth::Key { api_key } => {
                if api_key.is_empty() {
                    return Err(AuthError::NoAPIKey);
                }
                Ok(Some(basic_auth(api_key, "")))
            }
            Auth::Login { username, password } => {
                if username.is_empty() {
                    return Err(AuthError::BadParam("username".to_string()));
                }
                Ok(Some(basic_auth(username, password)))
            }
        }
    }
}

/// `Basic base64(user:password)` as in RFC 7617
///
pub fn basic_auth(user: &str, password: &str) -> String {
    let credentials = format!("{user}:{password}");
    format!("Basic {}", base64_light::base64_encode(&credentials))
}

impl Display for Auth {
    /// Obfuscate the passwords & keys
    ///
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // Hide passwords & API keys
        //
        let auth = match self.clone() {
            Auth::Key { .. } => Auth::Key {
                api_key: "HIDDEN".to_string(),
            },
            Auth::Login { username, .. } => Auth::Login {
                username,
                password: "HIDDEN".to_string(),
            },
            Auth::Anon => Auth::Anon,
        };
        write!(f, "{:?}", auth)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("abc", "", "Basic YWJjOg==")]
    #[case("token", "", "Basic dG9rZW46")]
    #[case("Aladdin", "open sesame", "Basic QWxhZGRpbjpvcGVuIHNlc2FtZQ==")]
    fn test_basic_auth(#[case] user: &str, #[case] pwd: &str, #[case] res: &str) {
        assert_eq!(res, basic_auth(user, pwd));
    }

    #[test]
    fn test_header_key() {
        let a = Auth::Key {
            api_key: "abc".to_string(),
        };
        assert_eq!(Ok(Some("Basic YWJjOg==".to_string())), a.header());
    }

    #[test]
    fn test_header_empty_key() {
        let a = Auth::Key {
            api_key: "".to_string(),
        };
        assert_eq!(Err(AuthError::NoAPIKey), a.header());
    }

    #[test]
    fn test_header_anon() {
        assert_eq!(Ok(None), Auth::Anon.header());
    }

    #[test]
    fn test_display_hides_secrets() {
        let a = Auth::Key {
            api_key: "secret".to_string(),
        };
        let s = a.to_string();
        assert!(!s.contains("secret"));
        assert!(s.contains("HIDDEN"));

        let a = Auth::Login {
            username: "john".to_string(),
            password: "secret".to_string(),
        };
        let s = a.to_string();
        assert!(s.contains("john"));
        assert!(!s.contains("secret"));
    }
}
