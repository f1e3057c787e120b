use std::mem;

use crate::{Error, Result};
use http::uri::Authority;
use http::uri::PathAndQuery;
use http::uri::Scheme;
use http::HeaderMap;
use http::HeaderValue;
use http::Method;
use http::Uri;

/// Signing context for a request, parsed out of a URL.
///
/// The query is kept as decoded key/value pairs in their original order;
/// keys are not necessarily unique. Signing code encodes pairs before the
/// request is serialized back to a URL.
#[derive(Debug)]
pub struct SigningRequest {
    /// HTTP method.
    pub method: Method,
    /// HTTP scheme.
    pub scheme: Scheme,
    /// HTTP authority.
    pub authority: Authority,
    /// HTTP path.
    pub path: String,
    /// HTTP query parameters.
    pub query: Vec<(String, String)>,
    /// HTTP headers.
    pub headers: HeaderMap,
}

impl SigningRequest {
    /// Build a signing context from an absolute URL string.
    ///
    /// The method is fixed to GET; this library signs resource fetches only.
    pub fn from_url(url: &str) -> Result<Self> {
        let uri: Uri = url
            .parse()
            .map_err(|e: http::uri::InvalidUri| Error::from(e))?;
        Self::from_uri(uri)
    }

    /// Build a signing context from a parsed URI.
    pub fn from_uri(uri: Uri) -> Result<Self> {
        let parts = uri.into_parts();
        let paq = parts
            .path_and_query
            .unwrap_or_else(|| PathAndQuery::from_static("/"));

        Ok(SigningRequest {
            method: Method::GET,
            scheme: parts
                .scheme
                .ok_or_else(|| Error::request_invalid("url without scheme cannot be signed"))?,
            authority: parts
                .authority
                .ok_or_else(|| Error::request_invalid("url without authority cannot be signed"))?,
            path: paq.path().to_string(),
            query: paq
                .query()
                .map(|v| {
                    form_urlencoded::parse(v.as_bytes())
                        .map(|(k, v)| (k.into_owned(), v.into_owned()))
                        .collect()
                })
                .unwrap_or_default(),
            headers: HeaderMap::new(),
        })
    }

    /// Serialize the signing context back into a URL string.
    ///
    /// Query pairs are written verbatim in their current order; callers must
    /// have percent-encoded them already.
    pub fn into_url(mut self) -> Result<String> {
        let query_size = self.query_size();

        let paq = if self.query.is_empty() {
            mem::take(&mut self.path)
        } else {
            let mut s = mem::take(&mut self.path);
            // Every pair renders as `key=value` plus a separator.
            s.reserve(query_size + 2 * self.query.len() + 1);

            s.push('?');
            for (i, (k, v)) in self.query.iter().enumerate() {
                if i > 0 {
                    s.push('&');
                }

                s.push_str(k);
                s.push('=');
                s.push_str(v);
            }

            s
        };

        let uri = Uri::builder()
            .scheme(self.scheme)
            .authority(self.authority)
            .path_and_query(PathAndQuery::try_from(paq.as_str())?)
            .build()?;

        Ok(uri.to_string())
    }

    /// Get query size.
    #[inline]
    pub fn query_size(&self) -> usize {
        self.query
            .iter()
            .map(|(k, v)| k.len() + v.len())
            .sum::<usize>()
    }

    /// Push a new query pair into query list.
    #[inline]
    pub fn query_push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.query.push((key.into(), value.into()));
    }

    /// Normalize header value: trim surrounding spaces, collapse internal
    /// whitespace runs to a single space.
    pub fn header_value_normalize(v: &mut HeaderValue) {
        let bs = v.as_bytes();

        let mut out = Vec::with_capacity(bs.len());
        let mut in_run = false;
        for &b in bs.iter() {
            if b == b' ' || b == b'\t' {
                in_run = true;
                continue;
            }
            if in_run && !out.is_empty() {
                out.push(b' ');
            }
            in_run = false;
            out.push(b);
        }

        // This can't fail because we started with a valid HeaderValue and only removed whitespace
        *v = HeaderValue::from_bytes(&out).expect("invalid header value")
    }

    /// Get header names as sorted vector.
    pub fn header_name_to_vec_sorted(&self) -> Vec<&str> {
        let mut h = self
            .headers
            .keys()
            .map(|k| k.as_str())
            .collect::<Vec<&str>>();
        h.sort_unstable();

        h
    }
}
