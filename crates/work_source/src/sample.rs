//! Built-in sample document

/// Three-node document used when no input is provided
pub const SAMPLE_DOCUMENT: &str = r#"{
    "name": "Json.CN",
    "url": "http://www.json.cn",
    "page": 88,
    "isNonProfit": true,
    "address": {
        "street": "科技园路.",
        "city": "江苏苏州",
        "country": "中国"
    },
    "nodes": [
        { "name": "Google", "url": "http://www.google.com" },
        { "name": "Baidu", "url": "http://www.baidu.com" },
        { "name": "SoSo", "url": "http://www.SoSo.com" }
    ]
}"#;
