use anyhow::{Context, Result};
use tokviz::api::{Client, SchemeResult, TokenizeRequest, TokenizeResponse};
use tokviz::app::{create_router, AppState, Server};
use tokviz::core::{annotate, Dispatcher, PastelPalette, Scheme, SchemeStatus};
use tokviz::envconfig::EnvConfig;
use tokviz::rng::request_rng;

pub async fn serve(host: Option<String>, port: Option<u16>) -> Result<()> {
    let config = EnvConfig::from_env();
    let dispatcher = Dispatcher::from_config(&config);
    let state = AppState::new(dispatcher).allowed_hosts(config.allowed_hosts.clone());

    Server::new()
        .host(host.unwrap_or(config.host.host))
        .port(port.unwrap_or(config.host.port))
        .routes(create_router(state))
        .run()
        .await
}

pub async fn tokenize(
    text: &str,
    schemes: Vec<Scheme>,
    seed: Option<u64>,
    remote: bool,
    json: bool,
) -> Result<()> {
    let mut request = TokenizeRequest::new(text);
    if !schemes.is_empty() {
        request = request.schemes(schemes);
    }
    if let Some(seed) = seed {
        request = request.seed(seed);
    }

    let response = if remote {
        let client = Client::from_env()?;
        client
            .tokenize(&request)
            .await
            .with_context(|| format!("Could not reach server at {}", client.base_url()))?
    } else {
        tokenize_local(&request).await?
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        for result in &response.results {
            print_result(result);
        }
    }

    Ok(())
}

async fn tokenize_local(request: &TokenizeRequest) -> Result<TokenizeResponse> {
    let dispatcher = Dispatcher::from_config(&EnvConfig::from_env());
    let outcomes = dispatcher.tokenize_all(&request.text, &request.schemes).await?;

    let palette = PastelPalette::default();
    let mut rng = request_rng(request.seed);
    let results = outcomes
        .into_iter()
        .map(|mut outcome| {
            let tokens = annotate(std::mem::take(&mut outcome.tokens), &palette, &mut rng);
            SchemeResult::from_outcome(outcome, tokens)
        })
        .collect();

    Ok(TokenizeResponse { results })
}

fn print_result(result: &SchemeResult) {
    let status = match result.status {
        SchemeStatus::Ok => String::new(),
        SchemeStatus::Degraded => " [degraded]".to_string(),
        SchemeStatus::Unavailable => " [unavailable]".to_string(),
    };
    println!("{} ({} tokens){}", result.name, result.token_count, status);
    if let Some(detail) = &result.detail {
        println!("  note: {}", detail);
    }
    if !result.tokens.is_empty() {
        let joined: Vec<String> = result.tokens.iter().map(|t| format!("{:?}", t.text)).collect();
        println!("  {}", joined.join(" "));
    }
    println!();
}

pub async fn schemes(remote: bool) -> Result<()> {
    if remote {
        let client = Client::from_env()?;
        for info in client.schemes().await? {
            println!("{:<14} {}", info.scheme_id.id(), info.name);
        }
    } else {
        for scheme in Scheme::ALL {
            println!("{:<14} {}", scheme.id(), scheme.display_name());
        }
    }
    Ok(())
}
