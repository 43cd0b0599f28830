//! Shared fixtures for pipeline integration tests.

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// Build an in-memory tar.bz2 archive from (path, contents) pairs.
pub fn build_archive(files: &[(&str, &[u8])]) -> Vec<u8> {
    let encoder = bzip2::write::BzEncoder::new(Vec::new(), bzip2::Compression::default());
    let mut builder = tar::Builder::new(encoder);

    for (path, content) in files {
        let mut header = tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder.append_data(&mut header, path, *content).unwrap();
    }

    builder.into_inner().unwrap().finish().unwrap()
}

/// Responder that honors `Range: bytes=a-b` with 206 slices and serves
/// the full body with 200 otherwise, like the binary CDN does.
pub struct RangeBody(pub Vec<u8>);

impl Respond for RangeBody {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let range = request
            .headers
            .get("range")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("bytes="))
            .and_then(|value| {
                let (start, end) = value.split_once('-')?;
                Some((start.parse::<usize>().ok()?, end.parse::<usize>().ok()?))
            });

        match range {
            Some((start, end)) if end < self.0.len() => ResponseTemplate::new(206)
                .insert_header(
                    "content-range",
                    format!("bytes {}-{}/{}", start, end, self.0.len()).as_str(),
                )
                .set_body_bytes(self.0[start..=end].to_vec()),
            _ => ResponseTemplate::new(200).set_body_bytes(self.0.clone()),
        }
    }
}

/// Mount the build index plus a range-capable archive endpoint for the
/// 100.0.0 / 100.0.4896.0 stable build.
pub async fn mount_cdn(server: &MockServer, key: &str, file_name: &str, archive: Vec<u8>) {
    mount_index(server, key).await;

    Mock::given(method("HEAD"))
        .and(path(format!("/{}", file_name)))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-length", archive.len().to_string().as_str()),
        )
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/{}", file_name)))
        .respond_with(RangeBody(archive))
        .mount(server)
        .await;
}

/// Mount only the build index for the 100.0.0 / 100.0.4896.0 stable build.
pub async fn mount_index(server: &MockServer, key: &str) {
    let builds = serde_json::json!({
        "versions": [{
            "cef_version": "100.0.0",
            "chromium_version": "100.0.4896.0",
            "channel": "stable"
        }]
    });
    let mut index = serde_json::Map::new();
    index.insert(key.to_string(), builds);

    Mock::given(method("GET"))
        .and(path("/index.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::Value::Object(index)))
        .mount(server)
        .await;
}
