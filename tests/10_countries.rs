mod common;

use anyhow::Result;
use reqwest::StatusCode;

// Country endpoints are read-only; rows come from the seed data.

#[tokio::test]
async fn list_countries_returns_array() -> Result<()> {
    if !common::database_configured() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }
    let pool = common::pool().await?;
    common::seed_countries(&pool).await?;
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/v1/countries", server.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let payload = res.json::<serde_json::Value>().await?;
    let data = payload.as_array().cloned().unwrap_or_default();
    assert!(data.len() >= 3, "expected seeded countries, got: {}", payload);
    for country in &data {
        assert!(country.get("iso3").is_some());
        assert!(country.get("name").is_some());
    }

    Ok(())
}

#[tokio::test]
async fn list_countries_filters_by_iso3_and_name_substring() -> Result<()> {
    if !common::database_configured() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }
    let pool = common::pool().await?;
    common::seed_countries(&pool).await?;
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    // iso3 substring
    let res = client
        .get(format!("{}/api/v1/countries?iso3=DN", server.base_url))
        .send()
        .await?;
    let data = res.json::<serde_json::Value>().await?;
    let data = data.as_array().cloned().unwrap_or_default();
    assert!(data.iter().all(|c| c["iso3"].as_str().unwrap().contains("DN")));
    assert!(data.iter().any(|c| c["iso3"] == "DNK"));

    // name substring, combined with iso3 (AND semantics)
    let res = client
        .get(format!(
            "{}/api/v1/countries?iso3=DNK&name=Denm",
            server.base_url
        ))
        .send()
        .await?;
    let data = res.json::<serde_json::Value>().await?;
    let data = data.as_array().cloned().unwrap_or_default();
    assert_eq!(data.len(), 1, "expected exactly Denmark: {:?}", data);
    assert_eq!(data[0]["name"], "Denmark");

    // substring match is case-sensitive
    let res = client
        .get(format!("{}/api/v1/countries?name=denmark", server.base_url))
        .send()
        .await?;
    let data = res.json::<serde_json::Value>().await?;
    assert_eq!(data.as_array().map(|a| a.len()), Some(0));

    Ok(())
}

#[tokio::test]
async fn get_country_by_iso3() -> Result<()> {
    if !common::database_configured() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }
    let pool = common::pool().await?;
    common::seed_countries(&pool).await?;
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/v1/countries/FRA", server.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let country = res.json::<serde_json::Value>().await?;
    assert_eq!(country, serde_json::json!({"iso3": "FRA", "name": "France"}));

    Ok(())
}

#[tokio::test]
async fn get_unknown_country_answers_404_with_error_body() -> Result<()> {
    if !common::database_configured() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/v1/countries/XXX", server.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["error"], serde_json::json!(true));
    assert!(body["message"].as_str().unwrap().contains("XXX"));

    Ok(())
}
