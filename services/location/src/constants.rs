use percent_encoding::AsciiSet;
use percent_encoding::NON_ALPHANUMERIC;

// Signing query parameters, appended to every presigned URL.
pub const X_AMZ_ALGORITHM: &str = "X-Amz-Algorithm";
pub const X_AMZ_CREDENTIAL: &str = "X-Amz-Credential";
pub const X_AMZ_DATE: &str = "X-Amz-Date";
pub const X_AMZ_SIGNED_HEADERS: &str = "X-Amz-SignedHeaders";
pub const X_AMZ_SECURITY_TOKEN: &str = "X-Amz-Security-Token";
pub const X_AMZ_SIGNATURE: &str = "X-Amz-Signature";

// Protocol identifiers.
pub const ALGORITHM: &str = "AWS4-HMAC-SHA256";
pub const KEY_TYPE: &str = "aws4_request";
pub const KEY_PREFIX: &str = "AWS4";

/// The only header that participates in URL signing.
pub const HOST_HEADER: &str = "host";

/// SHA-256 of the empty byte string; presigned requests never carry a body.
pub const EMPTY_PAYLOAD_HASH: &str =
    "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

// Signing service identifiers for the two API families.
pub const SERVICE_STANDALONE_MAPS: &str = "geo-maps";
pub const SERVICE_CONSOLIDATED: &str = "geo";

/// First path segment marking the standalone maps API family.
pub const STANDALONE_VERSION_MARKER: &str = "v2";

// Env values used by the environment credential provider.
pub const AWS_ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";
pub const AWS_SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";
pub const AWS_SESSION_TOKEN: &str = "AWS_SESSION_TOKEN";

/// AsciiSet for canonical URI encoding.
///
/// URI-encode every byte except the unreserved characters 'A'-'Z', 'a'-'z',
/// '0'-'9', '-', '.', '_', '~', and the path separator. The default
/// form-encoder leaves `!`, `'`, `(`, `)` and `*` alone; this protocol
/// requires them escaped with uppercase hex.
pub static URI_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// AsciiSet for canonical query encoding. Same rule, but `/` is escaped too.
pub static QUERY_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');
