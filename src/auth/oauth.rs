//! OAuth 1.0a HMAC-SHA1 signing (RFC 5849 §3.4) for Flickr API requests.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use hmac::{Hmac, Mac};
use rand::distributions::Alphanumeric;
use rand::Rng;
use sha1::Sha1;

use super::Credentials;

type HmacSha1 = Hmac<Sha1>;

const NONCE_LENGTH: usize = 32;

/// RFC 3986 percent-encoding: everything except `A-Za-z0-9-._~`.
pub fn percent_encode(s: &str) -> String {
    urlencoding::encode(s).into_owned()
}

/// Append the `oauth_*` protocol parameters and the signature to `params`.
///
/// `params` must hold every request parameter that takes part in the
/// signature (query and form fields, but never file parts).
pub fn sign(
    credentials: &Credentials,
    method: &str,
    url: &str,
    params: &mut Vec<(String, String)>,
) {
    let nonce: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(NONCE_LENGTH)
        .map(char::from)
        .collect();
    let timestamp = chrono::Utc::now().timestamp();
    sign_with(credentials, method, url, params, &nonce, timestamp);
}

fn sign_with(
    credentials: &Credentials,
    method: &str,
    url: &str,
    params: &mut Vec<(String, String)>,
    nonce: &str,
    timestamp: i64,
) {
    params.extend([
        ("oauth_consumer_key".to_string(), credentials.api_key.clone()),
        ("oauth_nonce".to_string(), nonce.to_string()),
        ("oauth_signature_method".to_string(), "HMAC-SHA1".to_string()),
        ("oauth_timestamp".to_string(), timestamp.to_string()),
        ("oauth_token".to_string(), credentials.oauth_token.clone()),
        ("oauth_version".to_string(), "1.0".to_string()),
    ]);

    let base = signature_base_string(method, url, params);
    let signature = hmac_sha1_signature(
        &base,
        &credentials.api_secret,
        &credentials.oauth_token_secret,
    );
    params.push(("oauth_signature".to_string(), signature));
}

/// `METHOD&encoded-url&encoded-normalized-params`.
pub(crate) fn signature_base_string(method: &str, url: &str, params: &[(String, String)]) -> String {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| (percent_encode(k), percent_encode(v)))
        .collect();
    encoded.sort();

    let normalized = encoded
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}&{}&{}",
        method.to_ascii_uppercase(),
        percent_encode(url),
        percent_encode(&normalized)
    )
}

fn hmac_sha1_signature(base: &str, consumer_secret: &str, token_secret: &str) -> String {
    let key = format!(
        "{}&{}",
        percent_encode(consumer_secret),
        percent_encode(token_secret)
    );
    let mut mac = HmacSha1::new_from_slice(key.as_bytes()).expect("HMAC takes keys of any size");
    mac.update(base.as_bytes());
    BASE64.encode(mac.finalize().into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds() -> Credentials {
        Credentials {
            api_key: "key".to_string(),
            api_secret: "secret".to_string(),
            oauth_token: "token".to_string(),
            oauth_token_secret: "token secret".to_string(),
        }
    }

    fn find<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
        params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_percent_encode_unreserved_passthrough() {
        assert_eq!(percent_encode("AZaz09-._~"), "AZaz09-._~");
        assert_eq!(percent_encode("a b+c/d"), "a%20b%2Bc%2Fd");
    }

    #[test]
    fn test_base_string_sorts_and_double_encodes() {
        let params = vec![
            ("title".to_string(), "Boat trip".to_string()),
            ("format".to_string(), "json".to_string()),
        ];
        let base = signature_base_string("post", "https://api.flickr.com/services/rest/", &params);
        assert_eq!(
            base,
            "POST&https%3A%2F%2Fapi.flickr.com%2Fservices%2Frest%2F&format%3Djson%26title%3DBoat%2520trip"
        );
    }

    #[test]
    fn test_sign_adds_protocol_params() {
        let mut params = vec![("method".to_string(), "flickr.test.login".to_string())];
        sign_with(&creds(), "GET", "https://example.com/", &mut params, "abc", 1700000000);

        assert_eq!(find(&params, "oauth_consumer_key"), Some("key"));
        assert_eq!(find(&params, "oauth_token"), Some("token"));
        assert_eq!(find(&params, "oauth_nonce"), Some("abc"));
        assert_eq!(find(&params, "oauth_timestamp"), Some("1700000000"));
        assert_eq!(find(&params, "oauth_signature_method"), Some("HMAC-SHA1"));
        // base64 of a 20-byte SHA-1 MAC
        assert_eq!(find(&params, "oauth_signature").map(str::len), Some(28));
    }

    #[test]
    fn test_signature_is_deterministic_for_fixed_nonce() {
        let mut a = vec![("x".to_string(), "1".to_string())];
        let mut b = a.clone();
        sign_with(&creds(), "POST", "https://example.com/", &mut a, "n", 1);
        sign_with(&creds(), "POST", "https://example.com/", &mut b, "n", 1);
        assert_eq!(find(&a, "oauth_signature"), find(&b, "oauth_signature"));

        let mut c = vec![("x".to_string(), "2".to_string())];
        sign_with(&creds(), "POST", "https://example.com/", &mut c, "n", 1);
        assert_ne!(find(&a, "oauth_signature"), find(&c, "oauth_signature"));
    }

    /// Worked example from the OAuth Core 1.0 appendix (photos.example.net).
    #[test]
    fn test_signature_known_answer() {
        let creds = Credentials {
            api_key: "dpf43f3p2l4k3l03".to_string(),
            api_secret: "kd94hf93k423kf44".to_string(),
            oauth_token: "nnch734d00sl2jdk".to_string(),
            oauth_token_secret: "pfkkdhi9sl3r4s00".to_string(),
        };
        let url = "http://photos.example.net/photos";
        let mut params = vec![
            ("file".to_string(), "vacation.jpg".to_string()),
            ("size".to_string(), "original".to_string()),
        ];
        sign_with(&creds, "GET", url, &mut params, "kllo9940pd9333jh", 1191242096);

        let unsigned: Vec<(String, String)> = params
            .iter()
            .filter(|(k, _)| k != "oauth_signature")
            .cloned()
            .collect();
        assert_eq!(
            signature_base_string("GET", url, &unsigned),
            "GET&http%3A%2F%2Fphotos.example.net%2Fphotos&file%3Dvacation.jpg\
             %26oauth_consumer_key%3Ddpf43f3p2l4k3l03%26oauth_nonce%3Dkllo9940pd9333jh\
             %26oauth_signature_method%3DHMAC-SHA1%26oauth_timestamp%3D1191242096\
             %26oauth_token%3Dnnch734d00sl2jdk%26oauth_version%3D1.0%26size%3Doriginal"
        );
        assert_eq!(
            find(&params, "oauth_signature"),
            Some("tR3+Ty81lMeYAr/Fid0kMTYa/WM=")
        );
    }

    #[test]
    fn test_sign_uses_random_nonce() {
        let mut a = Vec::new();
        let mut b = Vec::new();
        sign(&creds(), "GET", "https://example.com/", &mut a);
        sign(&creds(), "GET", "https://example.com/", &mut b);
        assert_ne!(find(&a, "oauth_nonce"), find(&b, "oauth_nonce"));
        assert_eq!(find(&a, "oauth_nonce").map(str::len), Some(NONCE_LENGTH));
    }
}
