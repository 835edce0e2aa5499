// HTTP digest access authentication (RFC 2617, MD5, qop=auth).
//
// Local printers answer unauthenticated requests with a digest
// challenge instead of accepting a static header. We answer exactly
// one challenge per request; a second 401 means the credentials are
// wrong and classifies as an auth failure, not a retry candidate.

use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;
use uuid::Uuid;

use crate::error::{check_status, decode_json, Error};

/// Parsed `WWW-Authenticate: Digest ...` challenge.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Challenge {
    pub realm: String,
    pub nonce: String,
    pub opaque: Option<String>,
    pub qop: bool,
}

/// Parse the challenge header value.
///
/// Only the fields we use are extracted; `algorithm` other than MD5 is
/// rejected since that is all the target devices speak.
pub(crate) fn parse_challenge(header: &str) -> Result<Challenge, Error> {
    let rest = header
        .strip_prefix("Digest ")
        .ok_or_else(|| malformed("not a digest challenge"))?;

    let mut realm = None;
    let mut nonce = None;
    let mut opaque = None;
    let mut qop = false;

    for (key, value) in split_params(rest) {
        match key.as_str() {
            "realm" => realm = Some(value),
            "nonce" => nonce = Some(value),
            "opaque" => opaque = Some(value),
            // value may be a list like "auth,auth-int"
            "qop" => qop = value.split(',').any(|q| q.trim() == "auth"),
            "algorithm" => {
                if !value.eq_ignore_ascii_case("md5") {
                    return Err(malformed(&format!("unsupported algorithm {value}")));
                }
            }
            _ => {}
        }
    }

    Ok(Challenge {
        realm: realm.ok_or_else(|| malformed("missing realm"))?,
        nonce: nonce.ok_or_else(|| malformed("missing nonce"))?,
        opaque,
        qop,
    })
}

fn malformed(message: &str) -> Error {
    Error::DigestChallenge {
        message: message.into(),
    }
}

/// Split `key="value", key=value, ...` respecting quoted strings.
fn split_params(input: &str) -> Vec<(String, String)> {
    let mut params = Vec::new();
    let mut chars = input.chars().peekable();

    loop {
        // skip separators
        while matches!(chars.peek(), Some(',' | ' ')) {
            chars.next();
        }
        let key: String = chars.by_ref().take_while(|c| *c != '=').collect();
        if key.is_empty() {
            break;
        }

        let mut value = String::new();
        if chars.peek() == Some(&'"') {
            chars.next();
            for c in chars.by_ref() {
                if c == '"' {
                    break;
                }
                value.push(c);
            }
        } else {
            while let Some(&c) = chars.peek() {
                if c == ',' {
                    break;
                }
                value.push(c);
                chars.next();
            }
        }
        params.push((key.trim().to_owned(), value.trim().to_owned()));
    }

    params
}

/// Compute the `Authorization` header value answering `challenge`.
pub(crate) fn answer(
    challenge: &Challenge,
    method: &str,
    uri: &str,
    username: &str,
    password: &str,
    cnonce: &str,
) -> String {
    let ha1 = md5_hex(&format!("{username}:{}:{password}", challenge.realm));
    let ha2 = md5_hex(&format!("{method}:{uri}"));

    let response = if challenge.qop {
        md5_hex(&format!(
            "{ha1}:{}:00000001:{cnonce}:auth:{ha2}",
            challenge.nonce
        ))
    } else {
        md5_hex(&format!("{ha1}:{}:{ha2}", challenge.nonce))
    };

    let mut header = format!(
        "Digest username=\"{username}\", realm=\"{}\", nonce=\"{}\", uri=\"{uri}\", \
         algorithm=MD5, response=\"{response}\"",
        challenge.realm, challenge.nonce
    );
    if challenge.qop {
        header.push_str(&format!(", qop=auth, nc=00000001, cnonce=\"{cnonce}\""));
    }
    if let Some(ref opaque) = challenge.opaque {
        header.push_str(&format!(", opaque=\"{opaque}\""));
    }
    header
}

fn md5_hex(input: &str) -> String {
    format!("{:x}", md5::compute(input.as_bytes()))
}

/// GET `url` as JSON, answering a digest challenge if one is issued.
pub(crate) async fn get_json<T: DeserializeOwned>(
    http: &reqwest::Client,
    url: Url,
    username: &str,
    password: &SecretString,
) -> Result<T, Error> {
    let resp = http.get(url.clone()).send().await.map_err(Error::Transport)?;

    if resp.status() != reqwest::StatusCode::UNAUTHORIZED {
        return decode_json(check_status(resp)?).await;
    }

    let header = resp
        .headers()
        .get(reqwest::header::WWW_AUTHENTICATE)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| malformed("401 without WWW-Authenticate header"))?
        .to_owned();
    let challenge = parse_challenge(&header)?;
    debug!(realm = %challenge.realm, "answering digest challenge");

    let cnonce = Uuid::new_v4().simple().to_string();
    let authorization = answer(
        &challenge,
        "GET",
        url.path(),
        username,
        password.expose_secret(),
        &cnonce,
    );

    let resp = http
        .get(url)
        .header(reqwest::header::AUTHORIZATION, authorization)
        .send()
        .await
        .map_err(Error::Transport)?;

    // A second 401 is a credential problem, not another challenge.
    decode_json(check_status(resp)?).await
}
