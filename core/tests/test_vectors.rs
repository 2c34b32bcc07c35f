//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses,
//! and expected parse results. Comparing parsed JSON (not raw strings) avoids
//! false negatives from field-ordering differences.

use inventory_core::{ApiError, HttpMethod, HttpRequest, HttpResponse, Product, ProductClient, ProductRequest};

const BASE_URL: &str = "http://localhost:8080";

fn client() -> ProductClient {
    ProductClient::new(BASE_URL)
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn simulated(case: &serde_json::Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse {
        status: sim["status"].as_u64().unwrap() as u16,
        headers: Vec::new(),
        body: sim["body"].as_str().unwrap().to_string(),
    }
}

fn status_only(status: u64) -> HttpResponse {
    HttpResponse {
        status: status as u16,
        headers: Vec::new(),
        body: String::new(),
    }
}

/// Compare method, url and (when present) headers and JSON body.
fn assert_request(name: &str, req: &HttpRequest, expected: &serde_json::Value) {
    assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
    assert_eq!(req.url, format!("{BASE_URL}{}", expected["path"].as_str().unwrap()), "{name}: url");

    match expected.get("headers") {
        Some(headers) => {
            let expected_headers: Vec<(String, String)> = headers
                .as_array()
                .unwrap()
                .iter()
                .map(|h| {
                    let arr = h.as_array().unwrap();
                    (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
                })
                .collect();
            assert_eq!(req.headers, expected_headers, "{name}: headers");
        }
        None => assert!(req.headers.is_empty(), "{name}: headers should be empty"),
    }

    match expected.get("body") {
        Some(body) => {
            let req_body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
            assert_eq!(&req_body, body, "{name}: body");
        }
        None => assert!(req.body.is_none(), "{name}: body should be None"),
    }
}

fn assert_error_kind(name: &str, err: ApiError, kind: &str) {
    match (kind, &err) {
        ("not_found", ApiError::NotFound) => {}
        ("http_error", ApiError::HttpError { .. }) => {}
        _ => panic!("{name}: expected {kind}, got {err:?}"),
    }
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[test]
fn create_test_vectors() {
    let raw = include_str!("../../test-vectors/create.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let input: ProductRequest = serde_json::from_value(case["input"].clone()).unwrap();

        let req = c.build_create_product(&input).unwrap();
        assert_request(name, &req, &case["expected_request"]);

        let product = c.parse_create_product(simulated(case)).unwrap();
        let expected: Product = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(product, expected, "{name}: parsed result");
    }
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

#[test]
fn list_test_vectors() {
    let raw = include_str!("../../test-vectors/list.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();

        let req = c.build_list_products();
        assert_request(name, &req, &case["expected_request"]);

        let products = c.parse_list_products(simulated(case)).unwrap();
        let expected: Vec<Product> = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(products, expected, "{name}: parsed result");
    }
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[test]
fn update_test_vectors() {
    let raw = include_str!("../../test-vectors/update.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let id = case["input_id"].as_i64().unwrap();
        let input: ProductRequest = serde_json::from_value(case["input"].clone()).unwrap();

        let req = c.build_update_product(id, &input).unwrap();
        assert_request(name, &req, &case["expected_request"]);

        let product = c.parse_update_product(simulated(case)).unwrap();
        let expected: Product = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(product, expected, "{name}: parsed result");
    }

    for case in vectors["error_cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let err = c
            .parse_update_product(status_only(case["status"].as_u64().unwrap()))
            .unwrap_err();
        assert_error_kind(name, err, case["expected_error"].as_str().unwrap());
    }
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[test]
fn delete_test_vectors() {
    let raw = include_str!("../../test-vectors/delete.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let id = case["input_id"].as_i64().unwrap();

        let req = c.build_delete_product(id);
        assert_request(name, &req, &case["expected_request"]);
        assert!(c.parse_delete_product(simulated(case)).is_ok(), "{name}: parse");
    }

    for case in vectors["error_cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let err = c
            .parse_delete_product(status_only(case["status"].as_u64().unwrap()))
            .unwrap_err();
        assert_error_kind(name, err, case["expected_error"].as_str().unwrap());
    }
}

// ---------------------------------------------------------------------------
// Search / low stock
// ---------------------------------------------------------------------------

#[test]
fn query_test_vectors() {
    let raw = include_str!("../../test-vectors/queries.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["search_cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let req = c.build_search_products(case["input"].as_str().unwrap());
        assert_request(name, &req, &case["expected_request"]);
    }

    for case in vectors["low_stock_cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let threshold = case["input"].as_i64().unwrap() as i32;
        let req = c.build_low_stock_products(threshold);
        assert_request(name, &req, &case["expected_request"]);
    }
}
