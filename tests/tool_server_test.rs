use serde_json::{Value, json};
use std::sync::Arc;
use stockcast::application::PredictionService;
use stockcast::config::ModelConfig;
use stockcast::domain::market::Period;
use stockcast::infrastructure::MockMarketDataProvider;
use stockcast::interfaces::tool_server::ToolServer;
use tokio::io::BufReader;

fn server(provider: MockMarketDataProvider) -> ToolServer {
    let service = PredictionService::new(Arc::new(provider), ModelConfig::default(), Period::TwoYears);
    ToolServer::new(Arc::new(service))
}

async fn call_tool(server: &ToolServer, name: &str, ticker: &str) -> Value {
    let request = json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "tools/call",
        "params": {"name": name, "arguments": {"ticker": ticker}}
    });
    let line = server.handle_line(&request.to_string()).await.unwrap();
    serde_json::from_str(&line).unwrap()
}

fn text(response: &Value) -> &str {
    response["result"]["content"][0]["text"].as_str().unwrap()
}

#[tokio::test]
async fn test_predict_trend_text() {
    let server = server(MockMarketDataProvider::default());
    let response = call_tool(&server, "predict_trend", "nvda").await;

    assert_eq!(response["result"]["isError"], false);
    let text = text(&response);
    let mut lines = text.lines();
    let first = lines.next().unwrap();
    assert!(
        first.starts_with("Prediction for nvda: Buy (Confidence: ")
            || first.starts_with("Prediction for nvda: Sell (Confidence: "),
        "{}",
        first
    );
    assert!(lines.next().unwrap().starts_with("Model Precision on Test Data: "));
}

#[tokio::test]
async fn test_predict_trend_short_history() {
    let short = MockMarketDataProvider::default().generate("IPO", 60);
    let server = server(MockMarketDataProvider::default().with_series(short));
    let response = call_tool(&server, "predict_trend", "IPO").await;

    assert_eq!(response["result"]["isError"], false);
    assert_eq!(text(&response), "Not enough data to predict for IPO");
}

#[tokio::test]
async fn test_predict_trend_unknown_ticker() {
    let server = server(MockMarketDataProvider::default().with_missing("ZZZZQ"));
    let response = call_tool(&server, "predict_trend", "ZZZZQ").await;

    assert_eq!(response["result"]["isError"], true);
    assert_eq!(
        text(&response),
        "Error predicting for ZZZZQ: No data found for ticker ZZZZQ"
    );
}

#[tokio::test]
async fn test_session_over_stream() {
    let server = server(MockMarketDataProvider::default());
    let input = [
        json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {}}),
        json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
        json!({"jsonrpc": "2.0", "id": 2, "method": "resources/templates/list"}),
        json!({"jsonrpc": "2.0", "id": 3, "method": "tools/call", "params": {"name": "get_stock_price", "arguments": {"ticker": "AAPL"}}}),
    ]
    .iter()
    .map(|v| format!("{}\n", v))
    .collect::<String>();

    let mut output = Vec::new();
    server
        .run(BufReader::new(input.as_bytes()), &mut output)
        .await
        .unwrap();

    let responses: Vec<Value> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(responses.len(), 3);
    assert_eq!(
        responses[1]["result"]["resourceTemplates"][0]["uriTemplate"],
        "stock://{ticker}/info"
    );
    assert!(text(&responses[2]).starts_with("AAPL Price: $"));
}
