//! Verify header encoding, URL coercion and request building against JSON
//! test vectors stored in `test-vectors/`.
//!
//! Each vector file lists named cases with inputs and expected outputs. JSON
//! bodies are compared as parsed values so key order and whitespace in the
//! vector files do not matter; everything else is compared as text.

use netkit_core::{
    quality_encoded, HttpHeaders, HttpMethod, JsonEncoding, NetworkError, ParameterEncoding, Request,
    RequestConvertible, UrlConvertible, UrlEncoding,
};

fn pairs(value: &serde_json::Value) -> Vec<(String, String)> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|h| {
            let arr = h.as_array().unwrap();
            (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
        })
        .collect()
}

/// Parse the encoding name used in test vectors.
fn parse_encoding(s: &str) -> ParameterEncoding {
    match s {
        "json" => JsonEncoding::default().into(),
        "json_pretty" => JsonEncoding::pretty().into(),
        "form" => UrlEncoding::default().into(),
        "form_query" => UrlEncoding::query_string().into(),
        "form_body" => UrlEncoding::http_body().into(),
        other => panic!("unknown encoding: {other}"),
    }
}

// ---------------------------------------------------------------------------
// Quality-weighted lists
// ---------------------------------------------------------------------------

#[test]
fn quality_test_vectors() {
    let raw = include_str!("../../test-vectors/quality.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let input: Vec<String> = serde_json::from_value(case["input"].clone()).unwrap();
        assert_eq!(quality_encoded(&input), case["expected"].as_str().unwrap(), "{name}");
    }
}

// ---------------------------------------------------------------------------
// URL coercion
// ---------------------------------------------------------------------------

#[test]
fn url_test_vectors() {
    let raw = include_str!("../../test-vectors/urls.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let input = case["input"].as_str().unwrap();

        match input.as_url() {
            Ok(url) => {
                assert!(case["valid"].as_bool().unwrap(), "{name}: expected failure");
                assert_eq!(url.as_str(), case["expected"].as_str().unwrap(), "{name}");
            }
            Err(NetworkError::InvalidUrl { input: reported }) => {
                assert!(!case["valid"].as_bool().unwrap(), "{name}: expected success");
                assert_eq!(reported, input, "{name}: reported input");
            }
            Err(other) => panic!("{name}: unexpected error {other}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Request building
// ---------------------------------------------------------------------------

#[test]
fn request_test_vectors() {
    let raw = include_str!("../../test-vectors/requests.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let method: HttpMethod = case["method"].as_str().unwrap().parse().unwrap();

        let mut request = Request::new(case["url"].as_str().unwrap(), method)
            .headers(pairs(&case["headers"]).into_iter().collect::<HttpHeaders>())
            .encoding(parse_encoding(case["encoding"].as_str().unwrap()));
        request.parameters = case["parameters"].as_object().cloned();

        let req = request.as_request().unwrap();
        let expected = &case["expected_request"];

        assert_eq!(req.method.as_str(), expected["method"].as_str().unwrap(), "{name}: method");
        assert_eq!(req.url.as_str(), expected["url"].as_str().unwrap(), "{name}: url");

        let headers: Vec<(String, String)> = req
            .headers
            .iter()
            .map(|h| (h.name.clone(), h.value.clone()))
            .collect();
        assert_eq!(headers, pairs(&expected["headers"]), "{name}: headers");

        match expected["body"].as_str() {
            None => assert!(req.body.is_none(), "{name}: body should be None"),
            Some(expected_body) => {
                let body = String::from_utf8(req.body.clone().unwrap()).unwrap();
                if req.content_type() == Some("application/json") {
                    let actual: serde_json::Value = serde_json::from_str(&body).unwrap();
                    let wanted: serde_json::Value = serde_json::from_str(expected_body).unwrap();
                    assert_eq!(actual, wanted, "{name}: body");
                } else {
                    assert_eq!(body, expected_body, "{name}: body text");
                }
            }
        }
    }
}
