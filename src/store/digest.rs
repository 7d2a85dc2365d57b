//! HTTP authentication challenges
//!
//! Triple stores commonly protect their update endpoint with Digest
//! authentication (RFC 7616). The client answers the first `401` with the
//! matching `Authorization` header.

use md5::{Digest, Md5};
use rand::Rng;
use regex::Regex;
use sha2::Sha256;
use std::collections::HashMap;
use std::sync::LazyLock;

static PARAM: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r#"(\w+)\s*=\s*(?:"([^"]*)"|([^\s,]+))"#).ok());

/// Hash function named by a digest challenge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    Md5,
    Sha256,
}

impl Algorithm {
    fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "MD5" => Some(Algorithm::Md5),
            "SHA-256" => Some(Algorithm::Sha256),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Algorithm::Md5 => "MD5",
            Algorithm::Sha256 => "SHA-256",
        }
    }

    fn hex(self, data: &str) -> String {
        match self {
            Algorithm::Md5 => format!("{:x}", Md5::digest(data.as_bytes())),
            Algorithm::Sha256 => format!("{:x}", Sha256::digest(data.as_bytes())),
        }
    }
}

/// Parameters of a `WWW-Authenticate: Digest` challenge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestChallenge {
    pub realm: String,
    pub nonce: String,
    pub opaque: Option<String>,
    /// `auth` when the server offers it
    pub qop: Option<String>,
    pub algorithm: Algorithm,
}

/// Authentication scheme requested by the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Challenge {
    Basic,
    Digest(DigestChallenge),
}

impl Challenge {
    /// Parse a `WWW-Authenticate` header value.
    ///
    /// Returns `None` for unknown schemes, unsupported algorithms or a digest
    /// challenge without realm and nonce.
    pub fn parse(header: &str) -> Option<Self> {
        let header = header.trim();
        let (scheme, rest) = header.split_once(char::is_whitespace).unwrap_or((header, ""));

        if scheme.eq_ignore_ascii_case("basic") {
            return Some(Challenge::Basic);
        }
        if !scheme.eq_ignore_ascii_case("digest") {
            return None;
        }

        let params = parse_params(rest)?;
        let algorithm = match params.get("algorithm") {
            Some(name) => Algorithm::parse(name)?,
            None => Algorithm::Md5,
        };
        // Only `auth` is answered; `auth-int` would need the request body hash
        let qop = params.get("qop").and_then(|offered| {
            offered
                .split(',')
                .map(str::trim)
                .find(|q| *q == "auth")
                .map(str::to_string)
        });

        Some(Challenge::Digest(DigestChallenge {
            realm: params.get("realm")?.clone(),
            nonce: params.get("nonce")?.clone(),
            opaque: params.get("opaque").cloned(),
            qop,
            algorithm,
        }))
    }
}

impl DigestChallenge {
    /// `Authorization` header value for one request with a random client nonce
    pub fn authorization(&self, user: &str, password: &str, method: &str, uri: &str) -> String {
        let cnonce = format!("{:016x}", rand::thread_rng().gen::<u64>());
        self.authorization_with(user, password, method, uri, &cnonce, 1)
    }

    /// `Authorization` header value with an explicit client nonce and count
    pub fn authorization_with(
        &self,
        user: &str,
        password: &str,
        method: &str,
        uri: &str,
        cnonce: &str,
        nc: u32,
    ) -> String {
        let nc = format!("{nc:08x}");
        let response = self.response(user, password, method, uri, cnonce, &nc);

        let mut header = format!(
            "Digest username=\"{user}\", realm=\"{}\", nonce=\"{}\", uri=\"{uri}\", algorithm={}, response=\"{response}\"",
            self.realm,
            self.nonce,
            self.algorithm.name(),
        );
        if let Some(qop) = &self.qop {
            header.push_str(&format!(", qop={qop}, nc={nc}, cnonce=\"{cnonce}\""));
        }
        if let Some(opaque) = &self.opaque {
            header.push_str(&format!(", opaque=\"{opaque}\""));
        }
        header
    }

    fn response(
        &self,
        user: &str,
        password: &str,
        method: &str,
        uri: &str,
        cnonce: &str,
        nc: &str,
    ) -> String {
        let ha1 = self.algorithm.hex(&format!("{user}:{}:{password}", self.realm));
        let ha2 = self.algorithm.hex(&format!("{method}:{uri}"));
        match &self.qop {
            Some(qop) => self
                .algorithm
                .hex(&format!("{ha1}:{}:{nc}:{cnonce}:{qop}:{ha2}", self.nonce)),
            None => self.algorithm.hex(&format!("{ha1}:{}:{ha2}", self.nonce)),
        }
    }
}

fn parse_params(input: &str) -> Option<HashMap<String, String>> {
    let re = PARAM.as_ref()?;
    Some(
        re.captures_iter(input)
            .filter_map(|c| {
                let key = c.get(1)?.as_str().to_ascii_lowercase();
                let value = c.get(2).or_else(|| c.get(3))?.as_str().to_string();
                Some((key, value))
            })
            .collect(),
    )
}
