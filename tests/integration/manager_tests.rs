use bot_warden::config::Config;
use bot_warden::manager::BotManager;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BOT_UA: &str = "Mozilla/5.0 AppleWebKit/537.36 (KHTML, like Gecko; compatible; \
     GPTBot/1.0; +https://openai.com/gptbot)";
const BROWSER_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/134.0.0.0 Safari/537.36";

const SAMPLE_JSON: &str = r#"{
    "GPTBot": {
        "operator": "OpenAI",
        "respect": "Yes",
        "function": "Scrapes data to train OpenAI's products",
        "frequency": "No information",
        "description": "Used to train GPT models"
    },
    "TestBot": {
        "operator": "Test.lan",
        "respect": "Yes",
        "function": "integration tests",
        "frequency": "n/a",
        "description": "used for this crate's integration tests"
    }
}"#;

/// Base configuration pointing at a mock catalog URL
fn test_config(source_url: String) -> Config {
    Config {
        robots_source_url: source_url,
        cache_update_interval: "1h".to_string(),
        robots_source_retry_interval: "1m".to_string(),
        ..Config::default()
    }
}

/// Mounts a JSON catalog at /robots.json and returns the server
async fn json_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.json"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(SAMPLE_JSON, "application/json"))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_default_match() {
    let server = json_server().await;
    let config = test_config(format!("{}/robots.json", server.uri()));
    let manager = BotManager::new(&config).await.unwrap();

    let result = manager.classify(BOT_UA).await.unwrap().unwrap();
    assert_eq!(result.name, "GPTBot");
    let metadata = result.entry.metadata.unwrap();
    assert_eq!(metadata.operator, "OpenAI");
    assert_eq!(metadata.respects_robots_txt, "Yes");
}

#[tokio::test]
async fn test_non_bot_passthrough() {
    let server = json_server().await;
    let config = test_config(format!("{}/robots.json", server.uri()));
    let manager = BotManager::new(&config).await.unwrap();

    assert!(manager.classify(BROWSER_UA).await.unwrap().is_none());
}

#[tokio::test]
async fn test_robots_txt_content() {
    let server = json_server().await;
    let config = test_config(format!("{}/robots.json", server.uri()));
    let manager = BotManager::new(&config).await.unwrap();

    let mut out = Vec::new();
    manager.render_robots_txt(&mut out, false).await.unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.contains("User-agent: GPTBot\n"));
    assert!(text.contains("User-agent: TestBot\n"));
    assert_eq!(text.matches("Disallow: /").count(), 1);
}

#[tokio::test]
async fn test_cached_rendering_is_byte_equal() {
    let server = json_server().await;
    let config = test_config(format!("{}/robots.json", server.uri()));
    let manager = BotManager::new(&config).await.unwrap();

    let mut first = Vec::new();
    let mut second = Vec::new();
    let mut fresh = Vec::new();
    manager.render_robots_txt(&mut first, true).await.unwrap();
    manager.render_robots_txt(&mut second, true).await.unwrap();
    manager.render_robots_txt(&mut fresh, false).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first, fresh);
}

#[tokio::test]
async fn test_disallow_all() {
    let server = json_server().await;
    let config = Config {
        robots_txt_disallow_all: true,
        ..test_config(format!("{}/robots.json", server.uri()))
    };
    let manager = BotManager::new(&config).await.unwrap();

    let mut out = Vec::new();
    manager.render_robots_txt(&mut out, true).await.unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "User-agent: *\nDisallow: /\n");
}

#[tokio::test]
async fn test_exclusion_format_source() {
    let server = MockServer::start().await;
    let body = "User-agent: GPTBot\nUser-agent: CCBot\nDisallow: /\nAllow: /sitemap.xml";
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/plain"))
        .mount(&server)
        .await;

    let config = test_config(format!("{}/robots.txt", server.uri()));
    let manager = BotManager::new(&config).await.unwrap();

    let result = manager.classify(BOT_UA).await.unwrap().unwrap();
    assert_eq!(result.name, "GPTBot");
    assert!(result.entry.metadata.is_none());
    assert_eq!(result.entry.disallow, vec!["/".to_string()]);
    assert_eq!(result.entry.allow, vec!["/sitemap.xml".to_string()]);
    assert_eq!(manager.bot_count(), 2);
}

#[tokio::test]
async fn test_plaintext_source() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/bots"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("GPTBot\nFooBot", "text/plain"))
        .mount(&server)
        .await;

    let config = test_config(format!("{}/bots", server.uri()));
    let manager = BotManager::new(&config).await.unwrap();

    assert!(manager.classify(BOT_UA).await.unwrap().is_some());
    assert!(manager.classify("FooBot/0.1").await.unwrap().is_some());
    assert!(manager.classify(BROWSER_UA).await.unwrap().is_none());
}

#[tokio::test]
async fn test_multi_source_merge_last_writer_wins() {
    let server = MockServer::start().await;
    let first = r#"{
        "GPTBot": {
            "operator": "First",
            "respect": "Yes", "function": "x", "frequency": "x", "description": "x"
        },
        "OnlyInFirst": {
            "operator": "First",
            "respect": "Yes", "function": "x", "frequency": "x", "description": "x"
        }
    }"#;
    let second = r#"{
        "GPTBot": {
            "operator": "Second",
            "respect": "Yes", "function": "x", "frequency": "x", "description": "x"
        }
    }"#;
    Mock::given(method("GET"))
        .and(path("/first.json"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(first, "application/json"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/second.json"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(second, "application/json"))
        .mount(&server)
        .await;

    let config = test_config(format!(
        "{}/first.json,{}/second.json",
        server.uri(),
        server.uri()
    ));
    let manager = BotManager::new(&config).await.unwrap();

    assert_eq!(manager.bot_count(), 2);
    let result = manager.classify(BOT_UA).await.unwrap().unwrap();
    assert_eq!(result.entry.metadata.unwrap().operator, "Second");
    assert!(manager
        .classify("Mozilla/5.0 (compatible; OnlyInFirst/1.0)")
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn test_first_boot_failure_yields_no_manager() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let config = test_config(format!("{}/robots.json", server.uri()));
    assert!(BotManager::new(&config).await.is_err());
}

#[tokio::test]
async fn test_malformed_source_fails_construction() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.json"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("{\"Bot\": {}}", "application/json"))
        .mount(&server)
        .await;

    let config = test_config(format!("{}/robots.json", server.uri()));
    assert!(BotManager::new(&config).await.is_err());
}

#[tokio::test]
async fn test_failed_refresh_retries_after_interval() {
    let server = MockServer::start().await;
    // one good response for construction, then the source goes dark
    Mock::given(method("GET"))
        .and(path("/robots.json"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(SAMPLE_JSON, "application/json"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/robots.json"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let config = Config {
        cache_update_interval: "5ns".to_string(),
        robots_source_retry_interval: "30s".to_string(),
        ..test_config(format!("{}/robots.json", server.uri()))
    };
    let manager = BotManager::new(&config).await.unwrap();

    // the 5ns deadline has long passed: the first trigger refetches and
    // fails, later triggers inside the retry window must not hit the network
    for _ in 0..3 {
        let result = manager.classify(BOT_UA).await.unwrap();
        assert_eq!(result.unwrap().name, "GPTBot");
    }
    assert_eq!(server.received_requests().await.unwrap().len(), 2);

    // the failed refresh left the published index untouched
    assert_eq!(manager.bot_count(), 2);
}

#[tokio::test]
async fn test_refresh_recovers_when_source_returns() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.json"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(SAMPLE_JSON, "application/json"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/robots.json"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let config = Config {
        cache_update_interval: "5ns".to_string(),
        robots_source_retry_interval: "200ms".to_string(),
        ..test_config(format!("{}/robots.json", server.uri()))
    };
    let manager = BotManager::new(&config).await.unwrap();

    // construction consumed the one good response; this trigger fails and
    // enters the retry window, still serving the prior index
    assert!(manager.classify(BOT_UA).await.unwrap().is_some());

    // replace the dead source with a healthy one serving a new catalog
    server.reset().await;
    let recovered = r#"{
        "NewBot": {
            "operator": "x", "respect": "x", "function": "x",
            "frequency": "x", "description": "x"
        }
    }"#;
    Mock::given(method("GET"))
        .and(path("/robots.json"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(recovered, "application/json"))
        .mount(&server)
        .await;

    tokio::time::sleep(Duration::from_millis(250)).await;

    // next trigger refreshes; the new index replaces the old one and the UA
    // cache is reset along with it
    assert!(manager
        .classify("Mozilla/5.0 (compatible; NewBot/1.0)")
        .await
        .unwrap()
        .is_some());
    assert!(manager.classify(BOT_UA).await.unwrap().is_none());
    assert_eq!(manager.bot_count(), 1);
}

#[tokio::test]
async fn test_concurrent_classification() {
    let server = json_server().await;
    let config = Config {
        cache_size: 1,
        ..test_config(format!("{}/robots.json", server.uri()))
    };
    let manager = Arc::new(BotManager::new(&config).await.unwrap());

    let mut handles = Vec::new();
    for i in 0..50 {
        let manager = Arc::clone(&manager);
        handles.push(tokio::spawn(async move {
            let expect_bot = i % 2 == 0;
            let user_agent = if expect_bot { BOT_UA } else { BROWSER_UA };
            let verdict = manager.classify(user_agent).await.unwrap().is_some();
            assert_eq!(verdict, expect_bot, "wrong verdict for task {}", i);
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }
}

#[tokio::test]
async fn test_content_kind_detected_once() {
    let server = MockServer::start().await;
    // served without a JSON content type or .json suffix: only the leading
    // brace identifies it, and only on the first fetch
    Mock::given(method("GET"))
        .and(path("/catalog"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(SAMPLE_JSON, "text/plain"))
        .mount(&server)
        .await;

    let config = Config {
        cache_update_interval: "5ns".to_string(),
        ..test_config(format!("{}/catalog", server.uri()))
    };
    let manager = BotManager::new(&config).await.unwrap();

    // a second refresh reuses the remembered kind and still parses as JSON
    let result = manager.classify(BOT_UA).await.unwrap();
    assert_eq!(result.unwrap().name, "GPTBot");
    assert!(server.received_requests().await.unwrap().len() >= 2);
}
