/// Master playlist name under each video directory on the edge.
pub const MANIFEST_FILENAME: &str = "index.m3u8";

/// Query parameter the edge reads the token from.
pub const TOKEN_QUERY_PARAM: &str = "token";

/// Build the playlist link handed to the player.
///
/// `{base_url}/{video_id}/index.m3u8?token={token}`, with any trailing `/`
/// removed from `base_url`. Nothing is validated or escaped: tokens are
/// base64url already.
pub fn compose_playlist_url(base_url: &str, video_id: &str, token: &str) -> String {
    let base = base_url.trim_end_matches('/');
    format!("{base}/{video_id}/{MANIFEST_FILENAME}?{TOKEN_QUERY_PARAM}={token}")
}
